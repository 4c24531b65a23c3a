//! Effects produced by state transitions

use super::state::Draft;

/// Text formatting requested for an outbound message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Formatting {
    #[default]
    Plain,
    /// Lightweight markup, `*bold*`
    Markdown,
}

/// Effects to be executed after state transition
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Send a message to the chat the event came from
    SendMessage { text: String, formatting: Formatting },

    /// Submit the completed draft (spawns as background task)
    SubmitExpense { draft: Draft },
}

impl Effect {
    pub fn plain(text: impl Into<String>) -> Self {
        Effect::SendMessage {
            text: text.into(),
            formatting: Formatting::Plain,
        }
    }

    pub fn markdown(text: impl Into<String>) -> Self {
        Effect::SendMessage {
            text: text.into(),
            formatting: Formatting::Markdown,
        }
    }

    pub fn submit(draft: Draft) -> Self {
        Effect::SubmitExpense { draft }
    }
}
