//! Submission error types

use thiserror::Error;

/// Why a submission did not succeed
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SubmissionError {
    /// The endpoint answered with a non-2xx status
    #[error("expense API answered {status}: {body}")]
    Rejected { status: u16, body: String },

    /// No response was received
    #[error("expense API unreachable: {0}")]
    Transport(String),
}

impl SubmissionError {
    pub fn transport(message: impl Into<String>) -> Self {
        SubmissionError::Transport(message.into())
    }

    /// Classify a reqwest failure that happened before a response arrived
    pub fn from_reqwest(err: &reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::transport(format!("Request timeout: {err}"))
        } else if err.is_connect() {
            Self::transport(format!("Connection failed: {err}"))
        } else {
            Self::transport(format!("Request failed: {err}"))
        }
    }
}
