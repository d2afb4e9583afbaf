use ::scraper::error::SelectorErrorKind;

use crate::model::Platform;

/// All errors that can occur while fetching profile statistics.
#[derive(thiserror::Error, Debug)]
pub enum StatsError {
    /// HTTP request failed (network, DNS, TLS, timeout, etc.).
    #[error("http request failed for {url}: {source}")]
    Http {
        url: String,
        source: reqwest::Error,
    },

    /// The HTTP client could not be built from the configuration.
    #[error("failed to build http client: {0}")]
    ClientBuild(#[source] reqwest::Error),

    /// Server returned a non-success HTTP status code.
    #[error("unexpected status {status} for {url}")]
    UnexpectedStatus {
        url: String,
        status: reqwest::StatusCode,
    },

    /// Failed to read the response body as text.
    #[error("failed to read response body from {url}: {source}")]
    ResponseBody {
        url: String,
        source: reqwest::Error,
    },

    /// The response body was not the JSON shape we expected.
    #[error("failed to decode json from {url}: {source}")]
    Json {
        url: String,
        source: serde_json::Error,
    },

    /// A GraphQL endpoint answered without data.
    #[error("graphql query failed at {url}: {message}")]
    GraphQl { url: String, message: String },

    /// The upstream answered but reported a failure in its own payload.
    #[error("{platform} reported a failure: {message}")]
    Upstream { platform: Platform, message: String },

    /// The upstream has no such user.
    #[error("{platform} user not found: {username}")]
    UserNotFound { platform: Platform, username: String },

    /// A credential required by the upstream is not configured.
    #[error("missing credential: {0}")]
    MissingCredential(&'static str),

    /// A configured endpoint could not be turned into a request URL.
    #[error("invalid url {url}: {reason}")]
    InvalidUrl { url: String, reason: String },

    /// A CSS selector string could not be parsed.
    #[error("invalid CSS selector: {0}")]
    Selector(String),
}

impl<'a> From<SelectorErrorKind<'a>> for StatsError {
    fn from(err: SelectorErrorKind<'a>) -> Self {
        StatsError::Selector(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, StatsError>;
