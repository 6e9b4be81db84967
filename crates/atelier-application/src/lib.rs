//! Application layer: the conversation session, artifact synthesis and the
//! workbench that wires them to the remote adapters.

pub mod fallback;
pub mod session;
pub mod synthesizer;
pub mod workbench;

pub use session::{ConversationSession, SessionError, SessionEvent, SessionSnapshot, TurnOutcome};
pub use synthesizer::ArtifactSynthesizer;
pub use workbench::Workbench;
