//! Events that can occur in an expense conversation

use uuid::Uuid;

/// Events that trigger state transitions
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    // Command events
    /// `/start`
    Start,
    /// Begin-expense command; replaces any draft in progress
    BeginExpense { initiator_name: Option<String> },
    /// Any other `/command`
    OtherCommand { name: String },

    // Free-text events
    Text { text: String },

    // Runtime events
    SubmissionFinished {
        draft_id: Uuid,
        outcome: SubmissionOutcome,
    },
}

impl Event {
    pub fn text(text: impl Into<String>) -> Self {
        Event::Text { text: text.into() }
    }

    /// Short label for logging
    pub fn kind(&self) -> &'static str {
        match self {
            Event::Start => "start",
            Event::BeginExpense { .. } => "begin_expense",
            Event::OtherCommand { .. } => "other_command",
            Event::Text { .. } => "text",
            Event::SubmissionFinished { .. } => "submission_finished",
        }
    }
}

/// How a submission attempt ended, as seen by the conversation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionOutcome {
    /// Endpoint answered 2xx
    Accepted,
    /// Endpoint answered with any other status
    Rejected { status: u16, body: String },
    /// No response received
    Unreachable { error: String },
}
