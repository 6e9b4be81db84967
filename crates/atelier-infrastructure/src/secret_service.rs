//! Credential resolution: `secret.json` first, environment second.

use atelier_core::{ApiCredential, Credentials};

use crate::error::StorageError;
use crate::storage::{SecretConfig, SecretStorage};

pub const CHAT_KEY_ENV: &str = "OPENROUTER_API_KEY";
pub const IMAGE_KEY_ENVS: [&str; 2] = ["ATELIER_IMAGE_API_KEY", "OPENAI_API_KEY"];

pub struct SecretService {
    storage: SecretStorage,
}

impl SecretService {
    pub fn new() -> Result<Self, StorageError> {
        Ok(Self {
            storage: SecretStorage::new()?,
        })
    }

    pub fn with_storage(storage: SecretStorage) -> Self {
        Self { storage }
    }

    /// Resolves credentials against the process environment.
    pub fn load_credentials(&self) -> Result<Credentials, StorageError> {
        self.load_credentials_with(|name| std::env::var(name).ok())
    }

    /// Resolves credentials, consulting `env` for keys missing from the file.
    pub fn load_credentials_with(
        &self,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Credentials, StorageError> {
        let secrets = self.storage.load()?.unwrap_or_default();
        let credentials = resolve(&secrets, env);
        tracing::debug!(
            "[SecretService] chat key: {}, image key: {}",
            if credentials.chat.is_some() { "present" } else { "missing" },
            if credentials.image.is_some() { "present" } else { "missing" }
        );
        Ok(credentials)
    }
}

fn resolve(secrets: &SecretConfig, env: impl Fn(&str) -> Option<String>) -> Credentials {
    let from_file = |key: &Option<String>| key.as_deref().and_then(ApiCredential::new);

    let chat = from_file(&secrets.openrouter_api_key)
        .or_else(|| env(CHAT_KEY_ENV).and_then(ApiCredential::new));
    let image = from_file(&secrets.image_api_key).or_else(|| {
        IMAGE_KEY_ENVS
            .iter()
            .find_map(|name| env(*name).and_then(ApiCredential::new))
    });

    Credentials { chat, image }
}
