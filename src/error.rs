use thiserror::Error;

use crate::endpoint::LocationError;

/// Fallback shown when the service rejects a file without saying why
pub const FAILED_TO_CONVERT: &str = "Failed to convert file";

/// Fallback shown when a failure carries no description at all
pub const UNKNOWN_ERROR: &str = "An unknown error occurred";

/// Problems caught before any request is sent
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SelectionError {
    #[error("Invalid file format: {name}")]
    InvalidFormat { name: String },

    #[error("No file selected")]
    NoFileSelected,
}

/// Failures of a single conversion request
#[derive(Debug, Error)]
pub enum ConvertError {
    /// The service answered with a non-success status
    #[error("Conversion service returned {status}: {}", .detail.as_deref().unwrap_or(FAILED_TO_CONVERT))]
    Service { status: u16, detail: Option<String> },

    /// The request never produced a readable response
    #[error("{0}")]
    Transport(#[from] reqwest::Error),

    /// A success response whose body is not `{content, filename}`
    #[error("Malformed response from conversion service: {0}")]
    MalformedResponse(#[from] serde_json::Error),

    #[error(transparent)]
    Endpoint(#[from] LocationError),
}

impl ConvertError {
    /// Message shown in the error panel and the failure toast
    pub fn user_message(&self) -> String {
        match self {
            ConvertError::Service {
                detail: Some(detail),
                ..
            } => detail.clone(),
            ConvertError::Service { detail: None, .. } | ConvertError::MalformedResponse(_) => {
                FAILED_TO_CONVERT.to_string()
            }
            ConvertError::Endpoint(e) => e.to_string(),
            ConvertError::Transport(e) => {
                let message = e.to_string();
                if message.trim().is_empty() {
                    UNKNOWN_ERROR.to_string()
                } else {
                    message
                }
            }
        }
    }
}

#[derive(Debug, Error)]
#[error("Clipboard unavailable: {0}")]
pub struct ClipboardError(pub String);
