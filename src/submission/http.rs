//! HTTP implementation of the expense submitter

use super::{Ack, ExpenseRecord, ExpenseSubmitter, SubmissionError};
use async_trait::async_trait;
use reqwest::Client;

/// Posts records as JSON to a fixed endpoint
pub struct HttpExpenseSubmitter {
    client: Client,
    endpoint: String,
}

impl HttpExpenseSubmitter {
    /// No request timeout is set: a hung endpoint stalls only the
    /// conversation waiting on it.
    pub fn new(endpoint: impl Into<String>) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .user_agent(concat!("expense_bot/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }
}

#[async_trait]
impl ExpenseSubmitter for HttpExpenseSubmitter {
    async fn submit(&self, record: ExpenseRecord) -> Result<Ack, SubmissionError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&record)
            .send()
            .await
            .map_err(|e| SubmissionError::from_reqwest(&e))?;

        let status = response.status();
        if status.is_success() {
            return Ok(Ack {
                status: status.as_u16(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| SubmissionError::transport(format!("Failed to read response: {e}")))?;

        Err(SubmissionError::Rejected {
            status: status.as_u16(),
            body,
        })
    }
}
