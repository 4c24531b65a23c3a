//! Submission payload

use crate::state_machine::Draft;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Serialize, Serializer};

/// Immutable snapshot of a completed draft, as sent to the endpoint
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseRecord {
    pub description: String,
    pub category: String,
    pub value: f64,
    #[serde(serialize_with = "iso8601_millis")]
    pub date: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub initiator_name: Option<String>,
}

impl ExpenseRecord {
    /// Snapshot `draft`, stamped with the submission time
    pub fn from_draft(draft: &Draft, date: DateTime<Utc>) -> Self {
        Self {
            description: draft.description.clone(),
            category: draft.category.clone(),
            value: draft.value,
            date,
            initiator_name: draft.initiator_name.clone(),
        }
    }
}

/// `2024-05-01T12:30:00.000Z`
fn iso8601_millis<S: Serializer>(
    date: &DateTime<Utc>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&date.to_rfc3339_opts(SecondsFormat::Millis, true))
}
