//! Wires a session, its synthesizer and the shared gallery from configuration.

use atelier_core::config::AtelierConfig;
use atelier_core::{
    Artifact, ArtifactIndex, AtelierError, CompletionClient, Credentials, ImageProvider, Message,
};
use atelier_interaction::{ChatCompletionClient, HostedImageProvider};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::session::{ConversationSession, SessionError};
use crate::synthesizer::ArtifactSynthesizer;

/// Runtime objects for one process: the conversation and the gallery it
/// feeds.
pub struct Workbench {
    config: AtelierConfig,
    session: Arc<ConversationSession>,
    gallery: Arc<RwLock<ArtifactIndex>>,
}

impl Workbench {
    /// Builds the remote adapters from `credentials`.
    ///
    /// A missing chat credential is not an error here; the first turn fails
    /// with an auth error instead. A missing image credential leaves the
    /// synthesizer on its fallback providers.
    pub fn new(config: AtelierConfig, credentials: Credentials) -> Result<Self, AtelierError> {
        let client = ChatCompletionClient::new(config.completion.clone(), credentials.chat)?;

        let primary: Option<Arc<dyn ImageProvider>> = match credentials.image {
            Some(credential) => Some(Arc::new(HostedImageProvider::new(
                config.image.clone(),
                credential,
            )?)),
            None => {
                tracing::info!("[Workbench] No image credential, designs use placeholder images");
                None
            }
        };

        Ok(Self::with_client(config, Arc::new(client), primary))
    }

    /// Builds a workbench around an existing completion client.
    pub fn with_client(
        config: AtelierConfig,
        client: Arc<dyn CompletionClient>,
        primary: Option<Arc<dyn ImageProvider>>,
    ) -> Self {
        let gallery = Arc::new(RwLock::new(ArtifactIndex::with_settings(&config.gallery)));
        let synthesizer = ArtifactSynthesizer::new(&config.synthesis, primary);
        let session = Arc::new(ConversationSession::new(
            client,
            synthesizer,
            gallery.clone(),
        ));
        Self {
            config,
            session,
            gallery,
        }
    }

    pub fn config(&self) -> &AtelierConfig {
        &self.config
    }

    pub fn session(&self) -> Arc<ConversationSession> {
        self.session.clone()
    }

    pub fn gallery(&self) -> Arc<RwLock<ArtifactIndex>> {
        self.gallery.clone()
    }

    /// Loads a previously saved conversation and gallery. The gallery is
    /// replaced; duplicate artifact ids in `artifacts` are dropped.
    pub async fn restore(
        &self,
        messages: Vec<Message>,
        artifacts: Vec<Artifact>,
    ) -> Result<(), SessionError> {
        self.session.restore(messages)?;
        let restored = ArtifactIndex::from_artifacts(artifacts, &self.config.gallery);
        tracing::debug!("[Workbench] Restored {} artifacts", restored.len());
        *self.gallery.write().await = restored;
        Ok(())
    }

    /// Messages and artifacts to persist.
    pub async fn export(&self) -> (Vec<Message>, Vec<Artifact>) {
        let messages = self.session.messages();
        let artifacts = self.gallery.read().await.artifacts().to_vec();
        (messages, artifacts)
    }
}
