use thiserror::Error;

/// Errors returned by the realtor search engine.
#[derive(Debug, Error)]
pub enum RealtorError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The response body was not valid JSON.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("invalid endpoint URL \"{url}\": {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    /// Caller-supplied search parameters are inconsistent (bad dates, radius).
    #[error("invalid search request: {0}")]
    InvalidRequest(String),
}
