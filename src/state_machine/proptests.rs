//! Property-based tests for the state machine
//!
//! These tests verify key invariants hold across all possible inputs.

use super::*;
use proptest::prelude::*;
use uuid::Uuid;

// ============================================================================
// Arbitrary Generators
// ============================================================================

fn arb_draft_state() -> impl Strategy<Value = DraftState> {
    prop_oneof![
        Just(DraftState::AwaitingDescription),
        Just(DraftState::AwaitingCategory),
        Just(DraftState::AwaitingValue),
        Just(DraftState::Completed),
    ]
}

fn arb_draft() -> impl Strategy<Value = Draft> {
    (
        arb_draft_state(),
        "[a-zA-Z ]{0,20}",
        "[a-zA-Z ]{0,20}",
        0.0f64..10_000.0,
        proptest::option::of("[A-Z][a-z]{2,10}"),
    )
        .prop_map(|(state, description, category, value, initiator_name)| Draft {
            state,
            description,
            category,
            value,
            ..Draft::new(initiator_name)
        })
}

fn arb_outcome() -> impl Strategy<Value = SubmissionOutcome> {
    prop_oneof![
        Just(SubmissionOutcome::Accepted),
        (400u16..600, "[a-z ]{0,20}")
            .prop_map(|(status, body)| SubmissionOutcome::Rejected { status, body }),
        "[a-z ]{1,20}".prop_map(|error| SubmissionOutcome::Unreachable { error }),
    ]
}

fn arb_event() -> impl Strategy<Value = Event> {
    prop_oneof![
        Just(Event::Start),
        proptest::option::of("[A-Z][a-z]{2,10}")
            .prop_map(|initiator_name| Event::BeginExpense { initiator_name }),
        "[a-z]{1,10}".prop_map(|name| Event::OtherCommand { name }),
        ".{0,30}".prop_map(Event::text),
        "-?[0-9]{1,5}([.,][0-9]{1,2})?".prop_map(Event::text),
        arb_outcome().prop_map(|outcome| Event::SubmissionFinished {
            draft_id: Uuid::new_v4(),
            outcome,
        }),
    ]
}

fn message_count(result: &TransitionResult) -> usize {
    result
        .effects
        .iter()
        .filter(|e| matches!(e, Effect::SendMessage { .. }))
        .count()
}

// ============================================================================
// Property Tests
// ============================================================================

proptest! {
    /// Begin always resets, whatever the current draft looks like
    #[test]
    fn prop_begin_always_resets(
        draft in proptest::option::of(arb_draft()),
        name in proptest::option::of("[A-Z][a-z]{2,10}"),
    ) {
        let event = Event::BeginExpense { initiator_name: name.clone() };
        let result = transition(draft.as_ref(), event);
        prop_assert_eq!(&result.change, &DraftChange::Begin { initiator_name: name });
        prop_assert_eq!(result.effects.len(), 1);
    }

    /// Commands other than begin never touch the draft
    #[test]
    fn prop_other_commands_are_noops(draft in arb_draft(), name in "[a-z]{1,10}") {
        let result = transition(Some(&draft), Event::OtherCommand { name });
        prop_assert!(result.is_noop());
    }

    /// Text answers are stored exactly and advance by one step
    #[test]
    fn prop_text_answers_stored_verbatim(
        draft in arb_draft(),
        text in ".{1,40}",
    ) {
        prop_assume!(matches!(
            draft.state,
            DraftState::AwaitingDescription | DraftState::AwaitingCategory
        ));

        let result = transition(Some(&draft), Event::text(text.clone()));
        let DraftChange::Advance(next) = &result.change else {
            return Err(TestCaseError::fail("expected Advance"));
        };

        prop_assert_eq!(Some(next.state), draft.state.next());
        prop_assert_eq!(next.id, draft.id);
        if draft.state == DraftState::AwaitingDescription {
            prop_assert_eq!(&next.description, &text);
        } else {
            prop_assert_eq!(&next.category, &text);
        }
        prop_assert_eq!(message_count(&result), 1);
    }

    /// Positive decimals complete the draft with the parsed value
    #[test]
    fn prop_positive_values_complete(
        draft in arb_draft(),
        whole in 0u32..100_000,
        cents in 1u32..100,
        comma in any::<bool>(),
    ) {
        let draft = Draft { state: DraftState::AwaitingValue, ..draft };
        let sep = if comma { ',' } else { '.' };
        let text = format!("{whole}{sep}{cents:02}");
        let expected = f64::from(whole) + f64::from(cents) / 100.0;

        let result = transition(Some(&draft), Event::text(text));
        let DraftChange::Advance(next) = &result.change else {
            return Err(TestCaseError::fail("expected Advance"));
        };
        prop_assert_eq!(next.state, DraftState::Completed);
        prop_assert!((next.value - expected).abs() < 1e-6);
        prop_assert_eq!(message_count(&result), 1);
        let submits = result
            .effects
            .iter()
            .any(|e| matches!(e, Effect::SubmitExpense { .. }));
        prop_assert!(submits);
    }

    /// Zero and negative values are rejected in place
    #[test]
    fn prop_non_positive_values_rejected(draft in arb_draft(), value in -100_000i64..=0) {
        let draft = Draft { state: DraftState::AwaitingValue, ..draft };
        let result = transition(Some(&draft), Event::text(value.to_string()));
        prop_assert_eq!(&result.change, &DraftChange::Unchanged);
        prop_assert_eq!(message_count(&result), 1);
    }

    /// Structural invariants for any (draft, event) pair
    #[test]
    fn prop_effects_match_change(draft in proptest::option::of(arb_draft()), event in arb_event()) {
        let result = transition(draft.as_ref(), event);

        let submits: Vec<_> = result
            .effects
            .iter()
            .filter_map(|e| match e {
                Effect::SubmitExpense { draft } => Some(draft),
                Effect::SendMessage { .. } => None,
            })
            .collect();

        match &result.change {
            DraftChange::Begin { .. } => prop_assert_eq!(message_count(&result), 1),
            DraftChange::Advance(next) => {
                prop_assert_eq!(message_count(&result), 1);
                if next.is_completed() {
                    prop_assert_eq!(submits.len(), 1);
                    prop_assert_eq!(submits[0], next);
                    prop_assert!(next.value > 0.0);
                } else {
                    prop_assert!(submits.is_empty());
                }
            }
            DraftChange::Remove { draft_id } => {
                let current = draft.as_ref().expect("remove requires a draft");
                prop_assert_eq!(*draft_id, current.id);
                prop_assert_eq!(message_count(&result), 1);
            }
            DraftChange::Unchanged => prop_assert!(submits.is_empty()),
        }
    }

    /// Submission results are always reported
    #[test]
    fn prop_submission_result_always_reported(
        draft in proptest::option::of(arb_draft()),
        outcome in arb_outcome(),
        same_draft in any::<bool>(),
    ) {
        let draft_id = match (&draft, same_draft) {
            (Some(d), true) => d.id,
            _ => Uuid::new_v4(),
        };
        let result = transition(draft.as_ref(), Event::SubmissionFinished { draft_id, outcome });
        prop_assert_eq!(message_count(&result), 1);

        let should_remove = draft
            .as_ref()
            .is_some_and(|d| d.id == draft_id && d.is_completed());
        let removed = matches!(result.change, DraftChange::Remove { .. });
        prop_assert_eq!(removed, should_remove);
    }
}
