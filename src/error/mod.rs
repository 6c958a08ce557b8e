use std::fmt;

use thiserror::Error;

/// Reasons an input is refused before any request reaches the model.
///
/// The `Display` text of each issue is the message shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationIssue {
    /// Symptom text was empty or whitespace only
    EmptySymptoms,
    /// A report submission was attempted with no file selected
    MissingFile,
    /// The selected file is not a PDF, JPEG or PNG
    UnsupportedFileType { mime_type: String },
    /// The selected file exceeds the upload limit
    FileTooLarge { size: u64, limit: u64 },
    /// "Find a doctor" was requested before any specialty was matched
    NoSpecialty,
    /// The same workflow already has a request in flight
    InFlight,
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationIssue::EmptySymptoms => f.write_str("Please describe your symptoms"),
            ValidationIssue::MissingFile => f.write_str("Please upload a report file"),
            ValidationIssue::UnsupportedFileType { .. } => {
                f.write_str("Please upload a PDF or image file (JPEG/PNG)")
            }
            ValidationIssue::FileTooLarge { .. } => f.write_str("File size should be less than 5MB"),
            ValidationIssue::NoSpecialty => f.write_str("Please analyze your symptoms first."),
            ValidationIssue::InFlight => f.write_str("A request is already in progress"),
        }
    }
}

/// Error types for the smart health assistant.
///
/// Validation failures are raised synchronously before any network call.
/// Everything else comes from talking to the generative-language API and is
/// normalized to a generic message by the page controller.
///
/// # Examples
///
/// ```
/// use smart_health::{SmartHealthError, ValidationIssue};
///
/// let err = SmartHealthError::ValidationError(ValidationIssue::EmptySymptoms);
/// assert_eq!(err.to_string(), "Validation error: Please describe your symptoms");
/// assert!(err.is_validation());
/// ```
#[derive(Error, Debug)]
pub enum SmartHealthError {
    /// Error interacting with the generative-language API
    #[error("API error: {0}")]
    ApiError(String),

    /// Input refused before any request was made
    #[error("Validation error: {0}")]
    ValidationError(ValidationIssue),

    /// Operation timed out
    #[error("Timeout error")]
    Timeout,

    /// HTTP client error (from reqwest)
    #[error("HTTP client error: {0}")]
    HttpError(#[from] reqwest::Error),

    /// JSON serialization error (from serde_json)
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Reading a report file from disk failed
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

impl SmartHealthError {
    /// Build an `ApiError` tagged with the provider that produced it.
    pub fn api_error(provider_name: &str, details: impl fmt::Display) -> Self {
        SmartHealthError::ApiError(format!("{} API error: {}", provider_name, details))
    }

    /// True when the error was raised by input validation rather than the API.
    pub fn is_validation(&self) -> bool {
        matches!(self, SmartHealthError::ValidationError(_))
    }

    /// The validation issue behind this error, if any.
    pub fn validation_issue(&self) -> Option<&ValidationIssue> {
        match self {
            SmartHealthError::ValidationError(issue) => Some(issue),
            _ => None,
        }
    }
}

impl From<ValidationIssue> for SmartHealthError {
    fn from(issue: ValidationIssue) -> Self {
        SmartHealthError::ValidationError(issue)
    }
}

// HttpError, JsonError and IoError never compare equal: their sources don't implement PartialEq
impl PartialEq for SmartHealthError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::ApiError(a), Self::ApiError(b)) => a == b,
            (Self::ValidationError(a), Self::ValidationError(b)) => a == b,
            (Self::Timeout, Self::Timeout) => true,
            _ => false,
        }
    }
}

/// A specialized Result type for smart health operations.
pub type Result<T> = std::result::Result<T, SmartHealthError>;
