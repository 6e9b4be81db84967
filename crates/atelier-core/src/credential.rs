//! API credentials passed explicitly into the remote adapters.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A single API key. `Debug` never prints the secret.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ApiCredential(String);

impl ApiCredential {
    /// Returns `None` for blank keys.
    pub fn new(key: impl Into<String>) -> Option<Self> {
        let key = key.into();
        let trimmed = key.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiCredential(***)")
    }
}

/// Credentials available to one process.
///
/// `chat` is required for any conversation; `image` is optional and its
/// absence sends artifact synthesis straight to the fallback providers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    pub chat: Option<ApiCredential>,
    pub image: Option<ApiCredential>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_key_is_rejected() {
        assert!(ApiCredential::new("   ").is_none());
        assert_eq!(ApiCredential::new(" sk-1 ").unwrap().expose(), "sk-1");
    }

    #[test]
    fn test_debug_is_redacted() {
        let creds = Credentials {
            chat: ApiCredential::new("sk-secret"),
            image: None,
        };
        assert!(!format!("{creds:?}").contains("sk-secret"));
    }
}
