//! Domain layer for Atelier.
//!
//! Holds the records exchanged between the conversation pipeline and its
//! collaborators (messages, artifacts, tool-call directives), the traits the
//! remote adapters implement, the configuration model, and the artifact
//! gallery with its derived views.

pub mod artifact;
pub mod completion;
pub mod config;
pub mod credential;
pub mod directive;
pub mod error;
pub mod gallery;
pub mod image;
pub mod message;
pub mod text;

pub use artifact::Artifact;
pub use completion::{
    Completion, CompletionClient, CompletionError, CompletionOutcome, ErrorDescriptor, ErrorKind,
};
pub use credential::{ApiCredential, Credentials};
pub use directive::ToolCallDirective;
pub use error::{AtelierError, Result};
pub use gallery::ArtifactIndex;
pub use image::{ImageError, ImageProvider};
pub use message::{Message, MessageRole};

/// Re-exported so adapters and callers share one cancellation token type.
pub use tokio_util::sync::CancellationToken;
