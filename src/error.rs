//! Error types for unnotion library.

use thiserror::Error;

/// Result type alias for unnotion operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while fetching or rendering Notion content.
#[derive(Error, Debug)]
pub enum Error {
    /// Fetching the children of a container failed at some page.
    ///
    /// A render that hits this error is aborted as a whole; no partial
    /// markup is produced.
    #[error("Failed to fetch children of {container}: {source}")]
    Provider {
        /// Id of the container whose children were being listed
        container: String,
        /// Underlying failure
        #[source]
        source: Box<Error>,
    },

    /// Transport-level HTTP failure.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-success status.
    #[error("API error {status} ({code}): {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Machine-readable error code from the response body
        code: String,
        /// Human-readable message from the response body
        message: String,
    },

    /// Response body could not be decoded.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The input does not contain a valid Notion id.
    #[error("Invalid Notion id: {0}")]
    InvalidId(String),

    /// Missing or invalid configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic error with message.
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Wrap an error raised while listing the children of `container`.
    pub fn provider(container: impl Into<String>, source: Error) -> Self {
        Error::Provider {
            container: container.into(),
            source: Box::new(source),
        }
    }

    /// Check if this error comes from the content provider.
    pub fn is_provider(&self) -> bool {
        matches!(self, Error::Provider { .. })
    }
}
