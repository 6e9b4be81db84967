//! Conversation session: one serialized turn at a time.
//!
//! A turn goes `Idle -> Pending -> {Committed, Failed, Cancelled} -> Idle`.
//! Submitting while a turn is pending is rejected with [`SessionError::Busy`].

use atelier_core::{
    Artifact, ArtifactIndex, CancellationToken, CompletionClient, CompletionOutcome,
    ErrorDescriptor, Message,
};
use serde::Serialize;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use thiserror::Error;
use tokio::sync::{RwLock, broadcast};

use crate::synthesizer::ArtifactSynthesizer;

const EVENT_CAPACITY: usize = 64;
const EMPTY_REPLY: &str = "Sorry, I couldn't process that request.";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("A turn is already in progress")]
    Busy,

    #[error("Message is empty")]
    EmptyMessage,
}

/// How a submitted turn resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnOutcome {
    /// The assistant reply was appended; `artifact` is already indexed.
    Committed {
        message: Message,
        artifact: Option<Artifact>,
    },
    /// Recorded as `last_error`; the user message stays in the log.
    Failed(ErrorDescriptor),
    Cancelled,
}

/// Notifications for observers of a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    MessageAppended(Message),
    TurnStarted { turn_id: String },
    TurnCommitted {
        message: Message,
        artifact: Option<Artifact>,
    },
    TurnFailed(ErrorDescriptor),
    TurnCancelled { turn_id: String },
    Cleared,
}

/// Point-in-time view for the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionSnapshot {
    pub messages: Vec<Message>,
    pub pending: bool,
    pub last_error: Option<ErrorDescriptor>,
}

struct PendingTurn {
    turn_id: String,
    cancel: CancellationToken,
}

#[derive(Default)]
struct SessionState {
    messages: Vec<Message>,
    pending: Option<PendingTurn>,
    last_error: Option<ErrorDescriptor>,
}

impl SessionState {
    fn settle(&mut self, turn_id: &str) {
        if self
            .pending
            .as_ref()
            .is_some_and(|pending| pending.turn_id == turn_id)
        {
            self.pending = None;
        }
    }
}

pub struct ConversationSession {
    client: Arc<dyn CompletionClient>,
    synthesizer: ArtifactSynthesizer,
    index: Arc<RwLock<ArtifactIndex>>,
    state: Mutex<SessionState>,
    events: broadcast::Sender<SessionEvent>,
}

impl ConversationSession {
    pub fn new(
        client: Arc<dyn CompletionClient>,
        synthesizer: ArtifactSynthesizer,
        index: Arc<RwLock<ArtifactIndex>>,
    ) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            client,
            synthesizer,
            index,
            state: Mutex::new(SessionState::default()),
            events,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let state = self.state();
        SessionSnapshot {
            messages: state.messages.clone(),
            pending: state.pending.is_some(),
            last_error: state.last_error.clone(),
        }
    }

    pub fn messages(&self) -> Vec<Message> {
        self.state().messages.clone()
    }

    pub fn is_pending(&self) -> bool {
        self.state().pending.is_some()
    }

    pub fn last_error(&self) -> Option<ErrorDescriptor> {
        self.state().last_error.clone()
    }

    /// Runs one turn to resolution.
    ///
    /// The user message is appended before the completion call. Remote
    /// failures resolve to [`TurnOutcome::Failed`], not `Err`; `Err` means the
    /// turn never started.
    pub async fn submit(&self, text: &str) -> Result<TurnOutcome, SessionError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(SessionError::EmptyMessage);
        }

        let (user_message, history, cancel) = {
            let mut state = self.state();
            if state.pending.is_some() {
                return Err(SessionError::Busy);
            }
            let user_message = Message::user(text);
            let cancel = CancellationToken::new();
            state.messages.push(user_message.clone());
            state.pending = Some(PendingTurn {
                turn_id: user_message.id.clone(),
                cancel: cancel.clone(),
            });
            (user_message, state.messages.clone(), cancel)
        };

        let turn_id = user_message.id.clone();
        let _guard = TurnGuard {
            session: self,
            turn_id: &turn_id,
            cancel: cancel.clone(),
        };
        self.emit(SessionEvent::MessageAppended(user_message.clone()));
        self.emit(SessionEvent::TurnStarted {
            turn_id: turn_id.clone(),
        });
        tracing::debug!(
            "[ConversationSession] Turn {} started with {} messages",
            turn_id,
            history.len()
        );

        let completion = match self.client.complete(&history, cancel.clone()).await {
            Ok(CompletionOutcome::Completed(completion)) => completion,
            Ok(CompletionOutcome::Cancelled) => return Ok(self.finish_cancelled(&turn_id)),
            Err(err) => {
                tracing::warn!(
                    "[ConversationSession] Turn {} failed via {}: {}",
                    turn_id,
                    self.client.provider_name(),
                    err
                );
                let descriptor = ErrorDescriptor::from(&err);
                {
                    let mut state = self.state();
                    state.last_error = Some(descriptor.clone());
                    state.settle(&turn_id);
                }
                self.emit(SessionEvent::TurnFailed(descriptor.clone()));
                return Ok(TurnOutcome::Failed(descriptor));
            }
        };

        if cancel.is_cancelled() {
            return Ok(self.finish_cancelled(&turn_id));
        }

        let artifact = self
            .synthesizer
            .synthesize(&turn_id, text, &completion.text, &completion.tool_calls)
            .await;

        let content = if !completion.text.trim().is_empty() {
            completion.text
        } else if let Some(artifact) = &artifact {
            format!("Here is a design draft: {}", artifact.title)
        } else {
            EMPTY_REPLY.to_string()
        };
        let message = Message::assistant(content, artifact.as_ref().map(|a| a.id.clone()));

        {
            // Index first, then the message, both under their locks, so no
            // observer sees a message whose artifact is missing.
            let mut index = self.index.write().await;
            let mut state = self.state();
            if cancel.is_cancelled() {
                drop(state);
                drop(index);
                return Ok(self.finish_cancelled(&turn_id));
            }
            if let Some(artifact) = &artifact {
                index.add(artifact.clone());
            }
            state.messages.push(message.clone());
            state.last_error = None;
            state.settle(&turn_id);
        }

        tracing::info!(
            "[ConversationSession] Turn {} committed{}",
            turn_id,
            if artifact.is_some() { " with artifact" } else { "" }
        );
        self.emit(SessionEvent::TurnCommitted {
            message: message.clone(),
            artifact: artifact.clone(),
        });
        Ok(TurnOutcome::Committed { message, artifact })
    }

    /// Cancels the pending turn. Returns `false` when idle.
    pub fn cancel(&self) -> bool {
        let state = self.state();
        match &state.pending {
            Some(pending) => {
                tracing::debug!("[ConversationSession] Cancelling turn {}", pending.turn_id);
                pending.cancel.cancel();
                true
            }
            None => false,
        }
    }

    /// Empties the message log. The artifact index is left untouched.
    pub fn clear(&self) -> Result<(), SessionError> {
        {
            let mut state = self.state();
            if state.pending.is_some() {
                return Err(SessionError::Busy);
            }
            state.messages.clear();
        }
        self.emit(SessionEvent::Cleared);
        Ok(())
    }

    /// Replaces the message log with restored messages.
    pub fn restore(&self, messages: Vec<Message>) -> Result<(), SessionError> {
        let mut state = self.state();
        if state.pending.is_some() {
            return Err(SessionError::Busy);
        }
        state.messages = messages;
        Ok(())
    }

    fn finish_cancelled(&self, turn_id: &str) -> TurnOutcome {
        self.state().settle(turn_id);
        tracing::info!("[ConversationSession] Turn {} cancelled", turn_id);
        self.emit(SessionEvent::TurnCancelled {
            turn_id: turn_id.to_string(),
        });
        TurnOutcome::Cancelled
    }

    fn emit(&self, event: SessionEvent) {
        // No subscribers is fine.
        let _ = self.events.send(event);
    }

    fn state(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Returns the session to idle if `submit` is dropped mid-turn.
struct TurnGuard<'a> {
    session: &'a ConversationSession,
    turn_id: &'a str,
    cancel: CancellationToken,
}

impl Drop for TurnGuard<'_> {
    fn drop(&mut self) {
        let mut state = self.session.state();
        if state
            .pending
            .as_ref()
            .is_some_and(|pending| pending.turn_id == self.turn_id)
        {
            tracing::debug!(
                "[ConversationSession] Turn {} abandoned, cancelling",
                self.turn_id
            );
            self.cancel.cancel();
            state.pending = None;
        }
    }
}
