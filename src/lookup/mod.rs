pub mod types;

pub use types::Profile;

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::StatusCode;
use thiserror::Error;
use tracing::{debug, instrument};

const USER_AGENT: &str = concat!("octofind/", env!("CARGO_PKG_VERSION"));
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Failure classes for a profile lookup. Each maps to a fixed user-facing
/// message; the payload only feeds logging.
#[derive(Debug, Error)]
pub enum LookupError {
    /// The remote answered, but with an error status (404 for an unknown login).
    #[error("user not found (HTTP {status})")]
    NotFound { status: StatusCode },

    /// The request went out but no usable response came back.
    #[error("server error: {0}")]
    Unreachable(String),

    /// Anything else: client construction, body read, decode.
    #[error("something went wrong: {0}")]
    Unexpected(String),
}

impl LookupError {
    /// The message shown to the user. None of these are fatal; the input
    /// stays as typed so the user can retry.
    pub fn user_message(&self) -> &'static str {
        match self {
            LookupError::NotFound { .. } => "user not found",
            LookupError::Unreachable(_) => "server error",
            LookupError::Unexpected(_) => "something went wrong ¯\\_(ツ)_/¯",
        }
    }
}

/// The network collaborator the widget talks to. Behind a trait so tests
/// can substitute canned responses for the real GitHub API.
#[async_trait]
pub trait UserLookup: Send + Sync {
    async fn fetch_profile(&self, login: &str) -> Result<Profile, LookupError>;
}

/// Production lookup against the GitHub REST API.
pub struct GitHubLookup {
    client: reqwest::Client,
    api_url: String,
    token: Option<String>,
}

impl GitHubLookup {
    /// Build the shared HTTP client. GitHub rejects requests without a
    /// User-Agent, and the v3 Accept header pins the response media type.
    pub fn new(api_url: impl Into<String>, token: Option<String>) -> Result<Self, LookupError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github.v3+json"),
        );

        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| LookupError::Unexpected(e.to_string()))?;

        Ok(Self {
            client,
            api_url: api_url.into(),
            token,
        })
    }

    fn profile_url(&self, login: &str) -> String {
        format!("{}/users/{}", self.api_url.trim_end_matches('/'), login)
    }
}

#[async_trait]
impl UserLookup for GitHubLookup {
    #[instrument(skip(self))]
    async fn fetch_profile(&self, login: &str) -> Result<Profile, LookupError> {
        let url = self.profile_url(login);

        let mut request = self.client.get(&url);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        debug!(%url, "fetching profile");
        let response = request.send().await.map_err(classify_send_error)?;

        let status = response.status();
        if !status.is_success() {
            debug!(%status, "remote answered with an error status");
            return Err(LookupError::NotFound { status });
        }

        let body = response
            .text()
            .await
            .map_err(|e| LookupError::Unreachable(e.to_string()))?;

        let profile: Profile =
            serde_json::from_str(&body).map_err(|e| LookupError::Unexpected(e.to_string()))?;
        debug!(login = %profile.login, "decoded profile");

        Ok(profile)
    }
}

/// A send error means the request never produced a response. Builder
/// failures are our own fault; everything else is transport.
fn classify_send_error(e: reqwest::Error) -> LookupError {
    if e.is_builder() {
        LookupError::Unexpected(e.to_string())
    } else {
        LookupError::Unreachable(e.to_string())
    }
}
