use serde::Deserialize;

/// Public profile attributes returned for a looked-up login, from the
/// `/users/{login}` endpoint.
///
/// Decoding is deliberately lenient: everything beyond the identifier and
/// the login itself may be absent or null upstream (privacy settings,
/// partial responses), so those fields are optional. A `Profile` is only
/// ever constructed from a successfully decoded 2xx response body.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Profile {
    pub id: u64,
    pub login: String,
    pub avatar_url: Option<String>,
    pub name: Option<String>,
    pub location: Option<String>,
    pub bio: Option<String>,
    pub public_repos: Option<u64>,
    pub followers: Option<u64>,
    pub following: Option<u64>,
    pub email: Option<String>,
}
