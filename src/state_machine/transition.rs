//! Pure state transition function
//!
//! Total over (draft, event): every pair yields a result, and pairs with no
//! meaning for the conversation yield no draft change and no effects.

use super::{Draft, DraftState, Effect, Event, SubmissionOutcome};
use crate::prompts;
use uuid::Uuid;

/// What the store must do with the chat's draft
#[derive(Debug, Clone, PartialEq)]
pub enum DraftChange {
    Unchanged,
    /// Create or overwrite with a cleared draft
    Begin { initiator_name: Option<String> },
    /// Replace the existing draft with this one
    Advance(Draft),
    /// Drop the draft with this id
    Remove { draft_id: Uuid },
}

/// Result of a state transition
#[derive(Debug)]
pub struct TransitionResult {
    pub change: DraftChange,
    pub effects: Vec<Effect>,
}

impl TransitionResult {
    pub fn new(change: DraftChange) -> Self {
        Self {
            change,
            effects: vec![],
        }
    }

    pub fn unchanged() -> Self {
        Self::new(DraftChange::Unchanged)
    }

    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }

    /// True when the transition neither touches the draft nor sends anything
    pub fn is_noop(&self) -> bool {
        self.change == DraftChange::Unchanged && self.effects.is_empty()
    }
}

/// Pure transition function
///
/// Given the chat's current draft (if any) and an event, returns the draft
/// change and the effects to run, in order. No I/O happens here.
pub fn transition(draft: Option<&Draft>, event: Event) -> TransitionResult {
    match (draft, event) {
        // ============================================================
        // Commands
        // ============================================================
        (_, Event::Start) => {
            TransitionResult::unchanged().with_effect(Effect::plain(prompts::greeting()))
        }

        // Overwrites any draft in progress, no merge
        (_, Event::BeginExpense { initiator_name }) => {
            TransitionResult::new(DraftChange::Begin { initiator_name })
                .with_effect(Effect::markdown(prompts::ask_description()))
        }

        (_, Event::OtherCommand { .. }) | (None, Event::Text { .. }) => {
            TransitionResult::unchanged()
        }

        // ============================================================
        // Answers
        // ============================================================
        (Some(_), Event::Text { text }) if text.is_empty() => TransitionResult::unchanged(),

        (Some(current), Event::Text { text }) => answer(current, text),

        // ============================================================
        // Submission result
        // ============================================================

        // The draft that was submitted is still the stored one: drop it
        (Some(current), Event::SubmissionFinished { draft_id, outcome })
            if current.id == draft_id && current.is_completed() =>
        {
            TransitionResult::new(DraftChange::Remove { draft_id })
                .with_effect(Effect::plain(result_message(&outcome)))
        }

        // Replaced or already gone: report, leave the store alone
        (_, Event::SubmissionFinished { outcome, .. }) => {
            TransitionResult::unchanged().with_effect(Effect::plain(result_message(&outcome)))
        }
    }
}

fn answer(current: &Draft, text: String) -> TransitionResult {
    match current.state {
        DraftState::AwaitingDescription => {
            let prompt = prompts::ask_category(&text);
            let next = Draft {
                description: text,
                state: DraftState::AwaitingCategory,
                ..current.clone()
            };
            TransitionResult::new(DraftChange::Advance(next)).with_effect(Effect::markdown(prompt))
        }

        DraftState::AwaitingCategory => {
            let prompt = prompts::ask_value(&text);
            let next = Draft {
                category: text,
                state: DraftState::AwaitingValue,
                ..current.clone()
            };
            TransitionResult::new(DraftChange::Advance(next)).with_effect(Effect::markdown(prompt))
        }

        DraftState::AwaitingValue => match parse_value(&text) {
            Some(value) => {
                let next = Draft {
                    value,
                    state: DraftState::Completed,
                    ..current.clone()
                };
                let summary = prompts::summary(&next.description, &next.category, next.value);
                TransitionResult::new(DraftChange::Advance(next.clone()))
                    .with_effect(Effect::markdown(summary))
                    .with_effect(Effect::submit(next))
            }
            // Local recovery: report and stay put
            None => {
                TransitionResult::unchanged().with_effect(Effect::plain(prompts::invalid_value()))
            }
        },

        // Submission in flight
        DraftState::Completed => TransitionResult::unchanged(),
    }
}

fn result_message(outcome: &SubmissionOutcome) -> String {
    match outcome {
        SubmissionOutcome::Accepted => prompts::submission_accepted(),
        SubmissionOutcome::Rejected { status, body } => prompts::submission_rejected(*status, body),
        SubmissionOutcome::Unreachable { .. } => prompts::submission_unreachable(),
    }
}

/// Parse a monetary answer, strictly positive.
///
/// The first comma counts as a decimal point. Only the leading number is
/// read, so trailing text such as a currency ("50 reais") is ignored.
pub fn parse_value(text: &str) -> Option<f64> {
    let normalized = text.trim_start().replacen(',', ".", 1);
    let value: f64 = numeric_prefix(&normalized).parse().ok()?;
    (value.is_finite() && value > 0.0).then_some(value)
}

/// Longest prefix of `text` shaped like a decimal number with an optional
/// sign and exponent. Empty when `text` does not start with one.
fn numeric_prefix(text: &str) -> &str {
    let bytes = text.as_bytes();
    let digits_from = |mut i: usize| {
        while bytes.get(i).is_some_and(u8::is_ascii_digit) {
            i += 1;
        }
        i
    };

    let mut end = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));
    let int_end = digits_from(end);
    let mut mantissa_digits = int_end - end;
    end = int_end;

    if bytes.get(end) == Some(&b'.') {
        let frac_end = digits_from(end + 1);
        mantissa_digits += frac_end - end - 1;
        end = frac_end;
    }
    if mantissa_digits == 0 {
        return "";
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp = end + 1;
        if matches!(bytes.get(exp), Some(b'+' | b'-')) {
            exp += 1;
        }
        let exp_end = digits_from(exp);
        if exp_end > exp {
            end = exp_end;
        }
    }

    text.get(..end).unwrap_or_default()
}
