//! Draft types

use uuid::Uuid;

/// Which answer the conversation is waiting for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DraftState {
    #[default]
    AwaitingDescription,
    AwaitingCategory,
    AwaitingValue,
    /// All fields collected, submission in flight
    Completed,
}

impl DraftState {
    /// The state reached after a valid answer, `None` once completed
    pub fn next(self) -> Option<Self> {
        match self {
            DraftState::AwaitingDescription => Some(DraftState::AwaitingCategory),
            DraftState::AwaitingCategory => Some(DraftState::AwaitingValue),
            DraftState::AwaitingValue => Some(DraftState::Completed),
            DraftState::Completed => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DraftState::AwaitingDescription => "awaiting_description",
            DraftState::AwaitingCategory => "awaiting_category",
            DraftState::AwaitingValue => "awaiting_value",
            DraftState::Completed => "completed",
        }
    }
}

/// In-progress expense for one chat
#[derive(Debug, Clone, PartialEq)]
pub struct Draft {
    /// Identity of this draft; a replacement draft gets a new one
    pub id: Uuid,
    pub state: DraftState,
    pub description: String,
    pub category: String,
    pub value: f64,
    pub initiator_name: Option<String>,
}

impl Draft {
    /// Fresh draft with every field cleared
    pub fn new(initiator_name: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            state: DraftState::AwaitingDescription,
            description: String::new(),
            category: String::new(),
            value: 0.0,
            initiator_name,
        }
    }

    pub fn is_completed(&self) -> bool {
        self.state == DraftState::Completed
    }
}
