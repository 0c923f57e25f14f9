use thiserror::Error;

use super::schema::SchemaViolation;

/// Shown to the user for every failed analysis. Detail goes to the log.
pub const ANALYSIS_FAILED_MESSAGE: &str =
    "Failed to analyze chart pattern. Please ensure the image is clear.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Network failure, timeout, non-2xx, empty body
    Transport,
    /// Reply was not JSON or did not match the declared schema
    Schema,
    /// Nothing valid to send (no image, no credential)
    Input,
}

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("no API key: set GEMINI_API_KEY or API_KEY")]
    MissingApiKey,
    #[error("no image to analyze")]
    EmptyImage,
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("model endpoint returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("model returned no text")]
    EmptyReply,
    #[error("reply is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("reply violates schema `{schema}` v{version}: {violation}")]
    Schema {
        schema: &'static str,
        version: u32,
        violation: SchemaViolation,
    },
}

impl AnalysisError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AnalysisError::MissingApiKey | AnalysisError::EmptyImage => ErrorKind::Input,
            AnalysisError::Http(_) | AnalysisError::Status { .. } | AnalysisError::EmptyReply => {
                ErrorKind::Transport
            }
            AnalysisError::Json(_) | AnalysisError::Schema { .. } => ErrorKind::Schema,
        }
    }

    /// The same message for every kind, so the UI never leaks internals.
    pub fn user_message(&self) -> &'static str {
        ANALYSIS_FAILED_MESSAGE
    }
}
