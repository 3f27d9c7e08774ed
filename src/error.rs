//! Error handling and custom error types
//!
//! Provides unified error handling across the application using thiserror.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Unsupported document format: {0}")]
    UnsupportedFormat(String),

    #[error("Failed to read document: {0}")]
    DocumentRead(String),

    #[error("Missing input: {0}")]
    MissingInput(&'static str),

    #[error("Generation backend unavailable: {0}")]
    BackendUnavailable(String),

    #[error("Backend returned an empty response")]
    EmptyResponse,

    #[error("Malformed backend payload: {0}")]
    MalformedPayload(String),

    #[error("Backend payload violates the expected schema: {0}")]
    SchemaViolation(String),

    #[error("Chat session is closed")]
    SessionClosed,

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        Error::BackendUnavailable(e.to_string())
    }
}

impl Error {
    /// Generic message suitable for end users. The three untrusted-payload
    /// kinds collapse into one string; `Display` stays distinct for logs.
    pub fn user_message(&self) -> &'static str {
        match self {
            Error::UnsupportedFormat(_) => "Please upload a PDF or Word document.",
            Error::DocumentRead(_) => "We could not read that document. Please re-upload it.",
            Error::MissingInput(_) => "Please provide both a resume and a job description.",
            Error::BackendUnavailable(_) => "The AI service is unreachable. Please try again.",
            Error::EmptyResponse | Error::MalformedPayload(_) | Error::SchemaViolation(_) => {
                "Failed to analyze resume. Please try again."
            }
            _ => "Something went wrong. Please try again.",
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
