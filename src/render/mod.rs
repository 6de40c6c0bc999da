use colored::Colorize;

use crate::app::{App, View};
use crate::lookup::Profile;

const TITLE: &str = "octofind";
const PLACEHOLDER: &str = "Enter a GitHub account";
const FIND_LABEL: &str = "[ Find ]";
const LOADING_MSG: &str = "Please wait, loading…";
const PROMPT_MSG: &str = "Enter a username in the search bar";

/// Format the whole frame as terminal lines: title, address bar, the input
/// line with the Find control, an optional notice, then whichever of the
/// three view states the widget is in.
pub fn screen(app: &App) -> Vec<String> {
    let mut lines = vec![
        TITLE.bold().to_string(),
        app.page_href().dimmed().to_string(),
        String::new(),
        input_line(app),
    ];

    if let Some(notice) = app.notice() {
        lines.push(notice.red().bold().to_string());
    }
    lines.push(String::new());

    match app.view() {
        View::Loading => lines.push(LOADING_MSG.yellow().to_string()),
        View::Card(profile) => lines.extend(card(profile)),
        View::Prompt => lines.push(PROMPT_MSG.to_string()),
    }

    lines
}

/// The text input with a cursor marker and the Find control, which renders
/// disabled while a lookup is in flight.
fn input_line(app: &App) -> String {
    let text = if app.input().is_empty() {
        PLACEHOLDER.dimmed().italic().to_string()
    } else {
        format!("{}{}", app.input(), "_".blink())
    };
    let button = if app.is_loading() {
        FIND_LABEL.dimmed().to_string()
    } else {
        FIND_LABEL.green().bold().to_string()
    };
    format!("> {text}  {button}")
}

/// The profile card: avatar, name with the `@login` handle, bio, the three
/// stats, location, email.
///
/// Absent numeric stats print the literal text `null`, and the email link
/// target is the raw email string rather than a `mailto:` URL. Both match
/// the widget this reproduces, so they stay as they are.
pub fn card(profile: &Profile) -> Vec<String> {
    let mut lines = Vec::new();

    if let Some(avatar_url) = &profile.avatar_url {
        lines.push(format!("avatar: {}", avatar_url.dimmed()));
    }

    let handle = format!("@{}", profile.login).cyan().to_string();
    let name_line = match profile.name.as_deref().filter(|name| !name.is_empty()) {
        Some(name) => format!("{} {}", name.bold(), handle),
        None => handle,
    };
    lines.push(name_line);
    lines.push(profile.bio.clone().unwrap_or_default());
    lines.push(String::new());

    lines.push(format!("Repositories  {}", stat(profile.public_repos)));
    lines.push(format!("Followers     {}", stat(profile.followers)));
    lines.push(format!("Following     {}", stat(profile.following)));
    lines.push(String::new());

    lines.push(profile.location.clone().unwrap_or_default());
    let email = profile.email.clone().unwrap_or_default();
    lines.push(hyperlink(&email, &email));

    lines
}

fn stat(value: Option<u64>) -> String {
    match value {
        Some(n) => n.to_string(),
        None => "null".to_string(),
    }
}

/// OSC 8 terminal hyperlink.
fn hyperlink(target: &str, label: &str) -> String {
    format!("\x1b]8;;{target}\x1b\\{label}\x1b]8;;\x1b\\")
}
