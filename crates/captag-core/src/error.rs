//! Error types for the captag pipeline.
//!
//! Errors are organized by stage. Each stage error carries full detail for the
//! logs, and exposes a fixed user-facing summary through `user_message()` so
//! callers never show raw transport or parse errors to end users.

use thiserror::Error;

/// User-facing summary for any captioning failure.
pub const CAPTION_FAILED_MESSAGE: &str =
    "Could not generate a caption for this image. Please try again later.";

/// User-facing summary for any subject suggestion failure.
pub const SUBJECTS_FAILED_MESSAGE: &str =
    "Subject suggestions are unavailable right now. The caption is shown without subjects.";

/// Top-level error type for captag operations.
#[derive(Error, Debug)]
pub enum CaptagError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Captioning stage errors
    #[error("Caption error: {0}")]
    Caption(#[from] CaptionError),

    /// Subject suggestion stage errors
    #[error("Subject error: {0}")]
    Subject(#[from] SubjectError),
}

/// Configuration-specific errors. Always fatal at startup.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the config file from disk
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    /// Failed to parse TOML configuration
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// A required setting is absent from both the environment and the config file
    #[error("Missing required setting {name}: set the {name} environment variable")]
    Missing { name: &'static str },

    /// Configuration values are invalid
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Failure of the captioning stage.
///
/// Every variant collapses to the same user-facing message; the variant and
/// its payload exist for the logs.
#[derive(Error, Debug)]
pub enum CaptionError {
    /// Request never produced an HTTP response (DNS, connect, TLS, body read)
    #[error("VLM request failed: {0}")]
    Transport(String),

    /// Service answered with a non-success status
    #[error("VLM HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// Body was not the expected chat completion JSON
    #[error("Malformed VLM response: {0}")]
    Response(String),

    /// Image could not be decoded or re-encoded as JPEG
    #[error("Image encoding failed: {0}")]
    Image(String),

    /// Caller supplied unusable input (e.g. blank prompt)
    #[error("Invalid caption input: {0}")]
    InvalidInput(String),

    /// Stage did not finish within its deadline
    #[error("Captioning timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },
}

impl CaptionError {
    /// HTTP status code, when the service answered at all.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            CaptionError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Redacted summary safe to show to end users.
    pub fn user_message(&self) -> &'static str {
        CAPTION_FAILED_MESSAGE
    }
}

/// Failure of the subject suggestion stage.
#[derive(Error, Debug)]
pub enum SubjectError {
    /// Request never produced an HTTP response
    #[error("Annif request failed: {0}")]
    Transport(String),

    /// Service answered with a non-success status
    #[error("Annif HTTP {status}: {detail}")]
    Status { status: u16, detail: String },

    /// Body was not the expected suggestion JSON
    #[error("Malformed Annif response: {0}")]
    Response(String),

    /// Caller supplied unusable input (e.g. empty caption)
    #[error("Invalid subject input: {0}")]
    InvalidInput(String),

    /// Stage did not finish within its deadline
    #[error("Subject suggestion timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },
}

impl SubjectError {
    /// HTTP status code, when the service answered at all.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            SubjectError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Redacted summary safe to show to end users.
    pub fn user_message(&self) -> &'static str {
        SUBJECTS_FAILED_MESSAGE
    }
}

/// Convenience type alias for captag results.
pub type Result<T> = std::result::Result<T, CaptagError>;
