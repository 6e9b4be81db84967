//! Design artifact (gallery card) record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A generated design output.
///
/// Created by the synthesizer on behalf of one conversation turn and never
/// mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artifact {
    pub id: String,
    pub title: String,
    pub description: String,
    /// Resolvable URI (https or data URI) of the rendered design.
    pub image_ref: String,
    pub created_at: DateTime<Utc>,
}

impl Artifact {
    /// Derives the artifact id for the turn opened by `turn_id`.
    ///
    /// The id is a pure function of the turn, so synthesizing twice for the
    /// same turn yields the same id.
    pub fn id_for_turn(turn_id: &str) -> String {
        Uuid::new_v5(&Uuid::NAMESPACE_OID, turn_id.as_bytes()).to_string()
    }

    /// Lowercased `title description` text used by search, tags and stats.
    pub fn searchable_text(&self) -> String {
        format!("{} {}", self.title, self.description).to_lowercase()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_for_turn_is_deterministic() {
        assert_eq!(Artifact::id_for_turn("turn-1"), Artifact::id_for_turn("turn-1"));
        assert_ne!(Artifact::id_for_turn("turn-1"), Artifact::id_for_turn("turn-2"));
    }
}
