pub mod location;

use std::time::{Duration, Instant};

use tracing::{debug, info};

use crate::debounce::Debouncer;
use crate::lookup::{LookupError, Profile};
use self::location::LocationSync;

/// A lookup the frontend must start on the widget's behalf. The sequence
/// number comes back with the completion so stale results can be dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupRequest {
    pub seq: u64,
    pub login: String,
}

/// What the output region shows. First match wins: a lookup in flight
/// beats a loaded card, which beats the idle prompt.
#[derive(Debug)]
pub enum View<'a> {
    Loading,
    Card(&'a Profile),
    Prompt,
}

/// The profile lookup widget.
///
/// A pure state machine: event-handling methods mutate state and hand back
/// a [`LookupRequest`] when a fetch must start, but perform no I/O
/// themselves. The frontend owns the event loop, runs the fetches, and
/// feeds completions back through [`App::finish`].
pub struct App {
    input: String,
    debouncer: Debouncer<String>,
    loading: bool,
    profile: Option<Profile>,
    notice: Option<String>,
    seq: u64,
    location: Box<dyn LocationSync>,
}

impl App {
    /// A fresh widget starts idle: empty input, no profile, not loading.
    /// The first render is always the prompt, never the loading state.
    pub fn new(delay: Duration, location: Box<dyn LocationSync>) -> Self {
        Self {
            input: String::new(),
            debouncer: Debouncer::new(String::new(), delay),
            loading: false,
            profile: None,
            notice: None,
            seq: 0,
            location,
        }
    }

    /// A keystroke. Updates the raw input synchronously and feeds the
    /// debouncer; never triggers a lookup by itself.
    pub fn input_char(&mut self, c: char, now: Instant) {
        self.input.push(c);
        self.notice = None;
        self.debouncer.update(self.input.clone(), now);
    }

    pub fn backspace(&mut self, now: Instant) {
        self.input.pop();
        self.notice = None;
        self.debouncer.update(self.input.clone(), now);
    }

    /// Explicit submit: fires immediately with the current raw input,
    /// regardless of debounce timing. Ignored while a lookup is in flight
    /// (the Find control is disabled).
    pub fn submit(&mut self) -> Option<LookupRequest> {
        if self.loading {
            return None;
        }
        Some(self.begin_lookup(self.input.clone()))
    }

    /// Drive the debouncer. A commit that changes the value to something
    /// non-empty triggers an automatic lookup; an empty commit never does,
    /// so a freshly mounted widget cannot fire a lookup on its own.
    pub fn tick(&mut self, now: Instant) -> Option<LookupRequest> {
        let committed = self.debouncer.poll(now)?.clone();
        if committed.is_empty() {
            return None;
        }
        Some(self.begin_lookup(committed))
    }

    fn begin_lookup(&mut self, login: String) -> LookupRequest {
        self.seq += 1;
        self.loading = true;
        self.notice = None;
        info!(seq = self.seq, login = %login, "starting lookup");
        LookupRequest {
            seq: self.seq,
            login,
        }
    }

    /// Apply a lookup completion.
    ///
    /// Completions carrying anything but the latest sequence number are
    /// discarded whole, so an older in-flight request can never overwrite
    /// the result of a newer one. The loading flag is cleared on every
    /// applied completion, success or failure, so the UI cannot get stuck.
    pub fn finish(&mut self, seq: u64, result: Result<Profile, LookupError>) {
        if seq != self.seq {
            debug!(seq, current = self.seq, "discarding stale lookup completion");
            return;
        }
        self.loading = false;
        match result {
            Ok(profile) => {
                self.location.set_login_param(&profile.login);
                info!(login = %profile.login, "profile loaded");
                self.profile = Some(profile);
            }
            Err(e) => {
                debug!(error = %e, "lookup failed");
                // The previously loaded card stays in place; only the
                // notice tells the user this attempt failed.
                self.notice = Some(e.user_message().to_string());
            }
        }
    }

    pub fn view(&self) -> View<'_> {
        if self.loading {
            View::Loading
        } else if let Some(profile) = &self.profile {
            View::Card(profile)
        } else {
            View::Prompt
        }
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn page_href(&self) -> String {
        self.location.href()
    }

    /// When the debouncer next wants a [`App::tick`], if at all. The event
    /// loop sleeps until this.
    pub fn debounce_deadline(&self) -> Option<Instant> {
        self.debouncer.deadline()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    const DELAY: Duration = Duration::from_millis(100);

    /// Records every login written, instead of touching a real URL.
    #[derive(Default)]
    struct RecordingLocation {
        logins: Rc<RefCell<Vec<String>>>,
    }

    impl LocationSync for RecordingLocation {
        fn set_login_param(&mut self, login: &str) {
            self.logins.borrow_mut().push(login.to_string());
        }

        fn href(&self) -> String {
            match self.logins.borrow().last() {
                Some(login) => format!("https://octofind.invalid/search?login={login}"),
                None => "https://octofind.invalid/search".to_string(),
            }
        }
    }

    fn app() -> (App, Rc<RefCell<Vec<String>>>) {
        let location = RecordingLocation::default();
        let logins = location.logins.clone();
        (App::new(DELAY, Box::new(location)), logins)
    }

    fn type_str(app: &mut App, s: &str, now: Instant) {
        for c in s.chars() {
            app.input_char(c, now);
        }
    }

    fn octocat() -> Profile {
        serde_json::from_str(
            r#"{
                "id": 1,
                "login": "octocat",
                "avatar_url": "http://x/a.png",
                "name": "The Octocat",
                "location": "San Francisco",
                "bio": "",
                "public_repos": 8,
                "followers": 10000,
                "following": 9,
                "email": ""
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_fresh_widget_shows_prompt() {
        let (app, _) = app();
        assert!(matches!(app.view(), View::Prompt));
        assert_eq!(app.input(), "");
        assert!(!app.is_loading());
    }

    #[test]
    fn test_typing_alone_never_fires_a_lookup() {
        let (mut app, _) = app();
        let now = Instant::now();
        type_str(&mut app, "octocat", now);
        assert_eq!(app.input(), "octocat");
        // Before the quiet period elapses, a tick is a no-op.
        assert_eq!(app.tick(now + DELAY / 2), None);
        assert!(!app.is_loading());
    }

    #[test]
    fn test_debounce_settle_fires_one_lookup_with_final_value() {
        let (mut app, _) = app();
        let mut now = Instant::now();
        for c in "octocat".chars() {
            app.input_char(c, now);
            now += DELAY / 4;
        }
        let req = app.tick(now + DELAY).unwrap();
        assert_eq!(req.login, "octocat");
        assert!(app.is_loading());
        assert!(matches!(app.view(), View::Loading));
        // The settle already committed; no further tick fires.
        assert_eq!(app.tick(now + DELAY * 2), None);
    }

    #[test]
    fn test_empty_settle_never_fires() {
        let (mut app, _) = app();
        let now = Instant::now();
        app.input_char('x', now);
        app.backspace(now + DELAY / 2);
        assert_eq!(app.tick(now + DELAY * 2), None);
        assert!(!app.is_loading());
    }

    #[test]
    fn test_submit_uses_raw_input_regardless_of_debounce() {
        let (mut app, _) = app();
        let now = Instant::now();
        type_str(&mut app, "oc", now);
        // Submitted long before the debounce would settle.
        let req = app.submit().unwrap();
        assert_eq!(req.login, "oc");
        assert!(app.is_loading());
    }

    #[test]
    fn test_submit_disabled_while_loading() {
        let (mut app, _) = app();
        let now = Instant::now();
        type_str(&mut app, "octocat", now);
        assert!(app.submit().is_some());
        assert!(app.submit().is_none());
    }

    #[test]
    fn test_success_stores_profile_and_syncs_login() {
        let (mut app, logins) = app();
        type_str(&mut app, "octocat", Instant::now());
        let req = app.submit().unwrap();

        app.finish(req.seq, Ok(octocat()));

        assert!(!app.is_loading());
        match app.view() {
            View::Card(profile) => {
                assert_eq!(profile.name.as_deref(), Some("The Octocat"));
                assert_eq!(profile.login, "octocat");
                assert_eq!(profile.public_repos, Some(8));
                assert_eq!(profile.followers, Some(10000));
                assert_eq!(profile.following, Some(9));
            }
            other => panic!("expected card, got {other:?}"),
        }
        assert_eq!(*logins.borrow(), ["octocat"]);
        assert_eq!(
            app.page_href(),
            "https://octofind.invalid/search?login=octocat"
        );
    }

    #[test]
    fn test_failure_sets_notice_and_keeps_previous_profile() {
        let (mut app, logins) = app();
        type_str(&mut app, "octocat", Instant::now());
        let req = app.submit().unwrap();
        app.finish(req.seq, Ok(octocat()));

        let req = app.submit().unwrap();
        app.finish(
            req.seq,
            Err(LookupError::NotFound {
                status: reqwest::StatusCode::NOT_FOUND,
            }),
        );

        assert!(!app.is_loading());
        assert_eq!(app.notice(), Some("user not found"));
        // The stale card is deliberately still there.
        assert!(matches!(app.view(), View::Card(_)));
        // The URL was only synced by the success.
        assert_eq!(logins.borrow().len(), 1);
    }

    #[test]
    fn test_failure_without_prior_profile_falls_back_to_prompt() {
        let (mut app, _) = app();
        type_str(&mut app, "nonexistent-user-xyz", Instant::now());
        let req = app.submit().unwrap();
        app.finish(req.seq, Err(LookupError::Unreachable("timed out".into())));

        assert!(!app.is_loading());
        assert_eq!(app.notice(), Some("server error"));
        assert!(matches!(app.view(), View::Prompt));
    }

    #[test]
    fn test_stale_completion_is_discarded() {
        let (mut app, logins) = app();
        let now = Instant::now();
        type_str(&mut app, "first", now);
        let older = app.tick(now + DELAY).unwrap();
        assert!(app.is_loading());

        // The user keeps typing while the first lookup is in flight; the
        // next settle starts a second lookup that supersedes it.
        type_str(&mut app, "x", now + DELAY);
        let newer = app.tick(now + DELAY * 3).unwrap();
        assert_eq!(newer.login, "firstx");
        assert!(newer.seq > older.seq);

        // The older completion arrives last and must be dropped whole.
        let mut stale_profile = octocat();
        stale_profile.login = "stale".to_string();
        app.finish(older.seq, Ok(stale_profile));

        assert!(app.is_loading());
        assert!(matches!(app.view(), View::Loading));
        assert!(logins.borrow().is_empty());

        // The newer completion still applies normally.
        app.finish(newer.seq, Ok(octocat()));
        assert!(!app.is_loading());
        assert_eq!(*logins.borrow(), ["octocat"]);
    }

    #[test]
    fn test_typing_clears_notice() {
        let (mut app, _) = app();
        let req = app.submit().unwrap();
        app.finish(req.seq, Err(LookupError::Unexpected("boom".into())));
        assert!(app.notice().is_some());

        app.input_char('a', Instant::now());
        assert!(app.notice().is_none());
    }
}
