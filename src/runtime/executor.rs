//! Conversation runtime executor

use super::outbox::Outbox;
use super::traits::ChatTransport;
use super::Envelope;
use crate::state_machine::{transition, DraftChange, DraftState, Effect, Event, SubmissionOutcome};
use crate::store::{ChatId, DraftStore};
use crate::submission::{ExpenseRecord, ExpenseSubmitter};
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tokio::task::{self, JoinError, JoinSet};
use uuid::Uuid;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

/// Upper bound on the interval between housekeeping sweeps
const MAX_SWEEP_PERIOD: Duration = Duration::from_secs(60);

/// Generic conversation runtime that can work with any transport and submitter
pub struct ConversationRuntime<T, S>
where
    T: ChatTransport + 'static,
    S: ExpenseSubmitter + 'static,
{
    store: DraftStore,
    outbox: Outbox<T>,
    submitter: Arc<S>,
    inbound_rx: mpsc::Receiver<Envelope>,
    /// Submissions in flight; each resolves to a `SubmissionFinished` envelope
    submissions: JoinSet<Envelope>,
    /// Chat and draft of each submission task, for tasks that die without a result
    in_flight: HashMap<task::Id, (ChatId, Uuid)>,
    /// Idle drafts older than this are dropped; `None` keeps them forever
    draft_ttl: Option<Duration>,
    shutdown: CancellationToken,
}

impl<T, S> ConversationRuntime<T, S>
where
    T: ChatTransport + 'static,
    S: ExpenseSubmitter + 'static,
{
    pub fn new(
        transport: Arc<T>,
        submitter: Arc<S>,
        inbound_rx: mpsc::Receiver<Envelope>,
        shutdown: CancellationToken,
    ) -> Self {
        Self {
            store: DraftStore::new(),
            outbox: Outbox::new(transport),
            submitter,
            inbound_rx,
            submissions: JoinSet::new(),
            in_flight: HashMap::new(),
            draft_ttl: None,
            shutdown,
        }
    }

    pub fn with_draft_ttl(mut self, ttl: Option<Duration>) -> Self {
        self.draft_ttl = ttl.filter(|ttl| !ttl.is_zero());
        self
    }

    /// Process envelopes until shutdown, or until every ingestion source has
    /// gone away and the last submission has reported back.
    pub async fn run(mut self) {
        tracing::info!(
            draft_ttl_secs = ?self.draft_ttl.map(|t| t.as_secs()),
            "Starting conversation runtime"
        );

        let sweep_period = self
            .draft_ttl
            .map_or(MAX_SWEEP_PERIOD, |ttl| ttl.min(MAX_SWEEP_PERIOD));
        let mut sweep = tokio::time::interval(sweep_period);
        sweep.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let mut inbound_open = true;

        loop {
            if !inbound_open && self.submissions.is_empty() {
                // Deliver what the last results queued before stopping
                self.outbox.flush().await;
                break;
            }

            tokio::select! {
                () = self.shutdown.cancelled() => break,
                Some(joined) = self.submissions.join_next_with_id() => {
                    if let Some(envelope) = self.finished_submission(joined) {
                        self.handle(envelope);
                    }
                }
                received = self.inbound_rx.recv(), if inbound_open => {
                    match received {
                        Some(envelope) => self.handle(envelope),
                        None => inbound_open = false,
                    }
                }
                _ = sweep.tick() => self.sweep(Instant::now()),
            }
        }

        tracing::info!(
            pending_drafts = self.store.len(),
            submissions_in_flight = self.submissions.len(),
            chats_sending = self.outbox.pending_chats(),
            "Conversation runtime stopped"
        );
    }

    /// Run one event through the state machine and dispatch its effects.
    /// Never waits on I/O: sends and submissions run on their own tasks.
    pub fn handle(&mut self, envelope: Envelope) {
        let Envelope { chat_id, event } = envelope;
        let kind = event.kind();
        let from = self.store.get(chat_id).map(|d| d.state);
        let is_text = matches!(event, Event::Text { .. });

        let result = transition(self.store.get(chat_id), event);

        if result.is_noop() {
            tracing::debug!(chat_id, event = kind, "Event ignored");
            return;
        }

        if is_text
            && from == Some(DraftState::AwaitingValue)
            && result.change == DraftChange::Unchanged
        {
            tracing::info!(chat_id, "Rejected expense value");
        }

        self.apply_change(chat_id, result.change);
        tracing::debug!(
            chat_id,
            event = kind,
            from = from.map(DraftState::as_str),
            to = self.store.get(chat_id).map(|d| d.state.as_str()),
            "Transition"
        );

        for effect in result.effects {
            self.execute_effect(chat_id, effect);
        }
    }

    /// Turn a joined submission task into its result envelope. A task that
    /// panicked or was aborted reports as unreachable so its draft still
    /// gets cleaned up.
    fn finished_submission(
        &mut self,
        joined: Result<(task::Id, Envelope), JoinError>,
    ) -> Option<Envelope> {
        match joined {
            Ok((id, envelope)) => {
                self.in_flight.remove(&id);
                Some(envelope)
            }
            Err(e) => {
                let Some((chat_id, draft_id)) = self.in_flight.remove(&e.id()) else {
                    tracing::error!(error = %e, "Unknown submission task failed");
                    return None;
                };
                tracing::error!(
                    chat_id,
                    draft_id = %draft_id,
                    error = %e,
                    "Submission task failed"
                );
                let outcome = SubmissionOutcome::Unreachable {
                    error: e.to_string(),
                };
                Some(Envelope::new(
                    chat_id,
                    Event::SubmissionFinished { draft_id, outcome },
                ))
            }
        }
    }

    fn apply_change(&mut self, chat_id: ChatId, change: DraftChange) {
        match change {
            DraftChange::Unchanged => {}
            DraftChange::Begin { initiator_name } => {
                let draft = self.store.begin(chat_id, initiator_name);
                tracing::info!(chat_id, draft_id = %draft.id, "Expense draft started");
            }
            DraftChange::Advance(next) => {
                if !self.store.advance(chat_id, |draft| *draft = next) {
                    tracing::warn!(chat_id, "Advance for a chat without draft");
                }
            }
            DraftChange::Remove { draft_id } => {
                self.store.remove(chat_id);
                tracing::debug!(chat_id, draft_id = %draft_id, "Expense draft discarded");
            }
        }
    }

    fn execute_effect(&mut self, chat_id: ChatId, effect: Effect) {
        match effect {
            Effect::SendMessage { text, formatting } => {
                self.outbox.send(chat_id, text, formatting);
            }

            Effect::SubmitExpense { draft } => {
                let record = ExpenseRecord::from_draft(&draft, Utc::now());
                let draft_id = draft.id;
                let submitter = Arc::clone(&self.submitter);

                let task = self.submissions.spawn(async move {
                    let outcome = SubmissionOutcome::from(submitter.submit(record).await);
                    Envelope::new(chat_id, Event::SubmissionFinished { draft_id, outcome })
                });
                self.in_flight.insert(task.id(), (chat_id, draft_id));
            }
        }
    }

    fn sweep(&mut self, now: Instant) {
        self.outbox.prune();

        let Some(ttl) = self.draft_ttl else {
            return;
        };
        for chat_id in self.store.evict_stale(now, ttl) {
            tracing::info!(chat_id, ttl_secs = ttl.as_secs(), "Evicted idle draft");
        }
    }

    /// Wait for every in-flight submission, process its result and deliver
    /// every queued message
    #[cfg(test)]
    pub async fn settle(&mut self) {
        while let Some(joined) = self.submissions.join_next_with_id().await {
            if let Some(envelope) = self.finished_submission(joined) {
                self.handle(envelope);
            }
        }
        self.outbox.flush().await;
    }

    #[cfg(test)]
    pub async fn flush_messages(&mut self) {
        self.outbox.flush().await;
    }

    #[cfg(test)]
    pub fn sweep_at(&mut self, now: Instant) {
        self.sweep(now);
    }

    #[cfg(test)]
    pub fn store(&self) -> &DraftStore {
        &self.store
    }
}
