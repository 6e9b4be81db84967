use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::artifact::Artifact;

/// Gallery sort orders.
///
/// Every order is stable: artifacts with equal keys keep their insertion
/// order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    #[default]
    Newest,
    Oldest,
    /// Case-insensitive lexicographic by title.
    Title,
}

impl SortKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::Newest => "newest",
            SortKey::Oldest => "oldest",
            SortKey::Title => "title",
        }
    }

    /// Sorts `items` in place. Callers pass their own copy.
    pub(crate) fn apply(&self, items: &mut [Artifact]) {
        match self {
            SortKey::Newest => items.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
            SortKey::Oldest => items.sort_by(|a, b| a.created_at.cmp(&b.created_at)),
            SortKey::Title => items.sort_by_cached_key(|a| a.title.to_lowercase()),
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "newest" => Ok(SortKey::Newest),
            "oldest" => Ok(SortKey::Oldest),
            "title" => Ok(SortKey::Title),
            other => Err(format!(
                "unknown sort key '{other}' (expected newest, oldest or title)"
            )),
        }
    }
}
