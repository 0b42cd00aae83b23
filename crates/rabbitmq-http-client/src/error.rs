//! Error types for management API client operations

use thiserror::Error;

use crate::resource::Resource;

/// Result type alias for management API client operations
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors that can occur during management API client operations
#[derive(Error, Debug)]
pub enum ClientError {
    /// HTTP request failed before a response was received
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Invalid URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Endpoint URL uses a scheme other than http or https
    #[error("Unsupported URL scheme: {0}")]
    UnsupportedScheme(String),

    /// Server responded with 404
    #[error("Resource not found: {url}")]
    NotFound { url: String, body: String },

    /// Server responded with any other non-2xx status
    #[error("Server returned {status} for {url}: {body}")]
    Api {
        status: u16,
        url: String,
        body: String,
    },

    /// Response body did not have the expected shape
    #[error("Failed to decode response: {0}")]
    Decode(String),

    /// Request body could not be serialized
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Caller input rejected before issuing a request
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Configuration document could not be parsed
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ClientError {
    /// Build the error for a non-2xx response.
    pub fn from_status(status: u16, url: impl Into<String>, body: impl Into<String>) -> Self {
        if status == 404 {
            Self::NotFound {
                url: url.into(),
                body: body.into(),
            }
        } else {
            Self::Api {
                status,
                url: url.into(),
                body: body.into(),
            }
        }
    }

    /// HTTP status carried by the error, if the server responded at all
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::NotFound { .. } => Some(404),
            Self::Api { status, .. } => Some(*status),
            Self::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Whether the server reported that the resource does not exist
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    /// Raw response body of a non-2xx response
    pub fn body(&self) -> Option<&str> {
        match self {
            Self::NotFound { body, .. } | Self::Api { body, .. } => Some(body),
            _ => None,
        }
    }

    /// Decode the response body of a non-2xx response, e.g. `{"error": ..., "reason": ...}`.
    pub fn body_resource(&self) -> Option<Resource> {
        let body = self.body()?;
        crate::response::decode_resource(body.as_bytes(), true).ok()
    }
}
