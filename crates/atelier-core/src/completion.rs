//! Remote chat-completion contract.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio_util::sync::CancellationToken;

use crate::directive::ToolCallDirective;
use crate::message::Message;

/// Successful result of a completion call.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Completion {
    /// Assistant text, possibly empty when the model only called tools.
    pub text: String,
    /// Recognised directives, in the order the model emitted them.
    pub tool_calls: Vec<ToolCallDirective>,
}

/// Resolution of a completion call that did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompletionOutcome {
    Completed(Completion),
    /// The caller cancelled the request. Not an error.
    Cancelled,
}

/// Coarse failure classes; callers react differently to each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Missing or rejected credential. The user must supply one.
    Auth,
    /// Transport failure or timeout. Retrying may succeed.
    Network,
    /// The service answered with an application error.
    Upstream,
}

impl ErrorKind {
    pub fn suggests_retry(&self) -> bool {
        matches!(self, ErrorKind::Network)
    }

    pub fn needs_credentials(&self) -> bool {
        matches!(self, ErrorKind::Auth)
    }
}

/// Failure of a completion call.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CompletionError {
    #[error("Authentication error: {0}")]
    Auth(String),

    /// Timeouts surface here too.
    #[error("Network error: {0}")]
    Network(String),

    #[error("{message}")]
    Upstream {
        status: Option<u16>,
        message: String,
    },
}

impl CompletionError {
    pub fn upstream(status: Option<u16>, message: impl Into<String>) -> Self {
        Self::Upstream {
            status,
            message: message.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            CompletionError::Auth(_) => ErrorKind::Auth,
            CompletionError::Network(_) => ErrorKind::Network,
            CompletionError::Upstream { .. } => ErrorKind::Upstream,
        }
    }
}

/// What a session records as its `last_error`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorDescriptor {
    pub kind: ErrorKind,
    pub message: String,
}

impl From<&CompletionError> for ErrorDescriptor {
    fn from(err: &CompletionError) -> Self {
        // Upstream messages are surfaced verbatim.
        let message = match err {
            CompletionError::Upstream { message, .. } => message.clone(),
            other => other.to_string(),
        };
        Self {
            kind: err.kind(),
            message,
        }
    }
}

/// Sends one conversation turn to a remote chat-completion endpoint.
///
/// Implementations must not retry, must not mutate `history`, and must
/// resolve to [`CompletionOutcome::Cancelled`] rather than a late result
/// once `cancel` has fired.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// `history` ends with the new user turn.
    async fn complete(
        &self,
        history: &[Message],
        cancel: CancellationToken,
    ) -> Result<CompletionOutcome, CompletionError>;

    fn provider_name(&self) -> &str;
}
