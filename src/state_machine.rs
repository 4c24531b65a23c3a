//! Expense conversation state machine
//!
//! Pure transitions over (draft, event) pairs. The runtime owns the store and
//! executes the effects returned here.

mod effect;
pub mod event;
pub mod state;
pub(crate) mod transition;

#[cfg(test)]
mod proptests;

pub use effect::{Effect, Formatting};
pub use event::{Event, SubmissionOutcome};
pub use state::{Draft, DraftState};
pub use transition::{parse_value, transition, DraftChange, TransitionResult};
