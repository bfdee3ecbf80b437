use ::scraper::error::SelectorErrorKind;
use std::path::PathBuf;

/// All errors that can occur while scraping and persisting a roster snapshot.
#[derive(thiserror::Error, Debug)]
pub enum RosterError {
    /// HTTP request failed (network, DNS, TLS, timeout, etc.).
    #[error("http request failed for {url}: {source}")]
    Http {
        url: String,
        source: reqwest::Error,
    },

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

    /// Failed to build the underlying HTTP client.
    #[error("failed to build http client: {0}")]
    ClientBuild(reqwest::Error),

    /// A CSS selector string could not be parsed.
    #[error("invalid CSS selector: {0}")]
    Selector(String),

    /// A configuration value was present but could not be interpreted.
    #[error("invalid value {value:?} for {key}: {reason}")]
    Config {
        key: &'static str,
        value: String,
        reason: String,
    },

    /// Writing the snapshot file failed.
    #[error("failed to write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// A built-in text pattern failed to compile.
    #[error("invalid pattern: {0}")]
    Pattern(#[from] regex::Error),

    /// The snapshot could not be serialized.
    #[error("failed to serialize snapshot: {0}")]
    Json(#[from] serde_json::Error),
}

impl<'a> From<SelectorErrorKind<'a>> for RosterError {
    fn from(err: SelectorErrorKind<'a>) -> Self {
        RosterError::Selector(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, RosterError>;
