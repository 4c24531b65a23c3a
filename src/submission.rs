//! Expense submission to the external storage API
//!
//! One POST per completed draft, never retried.

mod error;
mod http;
mod record;

pub use error::SubmissionError;
pub use http::HttpExpenseSubmitter;
pub use record::ExpenseRecord;

use crate::state_machine::SubmissionOutcome;
use async_trait::async_trait;
use std::sync::Arc;

/// Acknowledgement of an accepted expense
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ack {
    pub status: u16,
}

/// Client for the expense storage endpoint
#[async_trait]
pub trait ExpenseSubmitter: Send + Sync {
    /// Submit a single record. Ownership of the record moves to the call.
    async fn submit(&self, record: ExpenseRecord) -> Result<Ack, SubmissionError>;
}

#[async_trait]
impl<T: ExpenseSubmitter + ?Sized> ExpenseSubmitter for Arc<T> {
    async fn submit(&self, record: ExpenseRecord) -> Result<Ack, SubmissionError> {
        (**self).submit(record).await
    }
}

impl From<Result<Ack, SubmissionError>> for SubmissionOutcome {
    fn from(result: Result<Ack, SubmissionError>) -> Self {
        match result {
            Ok(_) => SubmissionOutcome::Accepted,
            Err(SubmissionError::Rejected { status, body }) => {
                SubmissionOutcome::Rejected { status, body }
            }
            Err(SubmissionError::Transport(error)) => SubmissionOutcome::Unreachable { error },
        }
    }
}

/// Logging wrapper for submitters
pub struct LoggingSubmitter<S> {
    inner: S,
}

impl<S: ExpenseSubmitter> LoggingSubmitter<S> {
    pub fn new(inner: S) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<S: ExpenseSubmitter> ExpenseSubmitter for LoggingSubmitter<S> {
    async fn submit(&self, record: ExpenseRecord) -> Result<Ack, SubmissionError> {
        let start = std::time::Instant::now();
        let category = record.category.clone();
        let value = record.value;
        let result = self.inner.submit(record).await;
        let duration = start.elapsed();

        match &result {
            Ok(ack) => {
                tracing::info!(
                    duration_ms = %duration.as_millis(),
                    status = ack.status,
                    category = %category,
                    value,
                    "Expense submitted"
                );
            }
            Err(SubmissionError::Rejected { status, body }) => {
                tracing::error!(
                    duration_ms = %duration.as_millis(),
                    status,
                    body = %body,
                    "Expense API rejected submission"
                );
            }
            Err(SubmissionError::Transport(error)) => {
                tracing::error!(
                    duration_ms = %duration.as_millis(),
                    error = %error,
                    "Expense API request failed"
                );
            }
        }

        result
    }
}
