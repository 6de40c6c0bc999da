use reqwest::Url;

/// One-way sync of the resolved login into a shareable page URL.
///
/// The widget never touches the URL directly; it only holds this
/// collaborator, so tests can record writes instead of mutating real
/// location state. The `login` parameter is write-only: nothing reads a
/// pre-existing value back out on startup.
pub trait LocationSync {
    /// Set the `login` query parameter to the resolved login, replacing
    /// any previous value and leaving other parameters untouched.
    fn set_login_param(&mut self, login: &str);

    /// The current page URL, shown in the address-bar line.
    fn href(&self) -> String;
}

/// Production implementation: an in-place query-parameter update on the
/// configured page URL, with no navigation involved.
pub struct PageUrl {
    url: Url,
}

impl PageUrl {
    pub fn new(url: Url) -> Self {
        Self { url }
    }
}

impl LocationSync for PageUrl {
    fn set_login_param(&mut self, login: &str) {
        let others: Vec<(String, String)> = self
            .url
            .query_pairs()
            .filter(|(key, _)| key != "login")
            .map(|(key, value)| (key.into_owned(), value.into_owned()))
            .collect();

        let mut pairs = self.url.query_pairs_mut();
        pairs.clear();
        for (key, value) in &others {
            pairs.append_pair(key, value);
        }
        pairs.append_pair("login", login);
    }

    fn href(&self) -> String {
        self.url.to_string()
    }
}
