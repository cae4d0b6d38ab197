use thiserror::Error;

/// Errors raised while retrieving entries from the content source.
#[derive(Debug, Error)]
pub enum SourceError {
    /// A required configuration variable is missing or empty.
    #[error("Missing required configuration variable: {0}")]
    MissingVariable(String),

    /// A configuration value could not be used.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The HTTP request could not be sent or its body not read.
    #[error("Request to the content API failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The content API answered with a non-success status.
    #[error("Content API returned {status}: {body}")]
    Status { status: u16, body: String },

    /// The response body is not the expected JSON shape.
    #[error("Failed to decode content API response: {0}")]
    Decode(#[from] serde_json::Error),
}
