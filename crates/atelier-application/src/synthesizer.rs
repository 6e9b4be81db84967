//! Turns a completed conversation turn into an optional gallery artifact.

use atelier_core::config::SynthesisPolicy;
use atelier_core::text::mentions;
use atelier_core::{Artifact, ImageProvider, ToolCallDirective};
use chrono::Utc;
use std::sync::Arc;

use crate::fallback::{MockDesignProvider, PlaceholderImages};

const DEFAULT_DIRECTIVE_TITLE: &str = "Generated design";
const DEFAULT_DIRECTIVE_DESCRIPTION: &str = "Design generated from your request";
const MOCK_DESCRIPTION: &str = "Design draft generated automatically from your request";

/// Decides whether a turn yields an artifact and renders its image.
///
/// Never fails: provider errors degrade to the placeholder image.
pub struct ArtifactSynthesizer {
    keywords: Vec<String>,
    primary: Option<Arc<dyn ImageProvider>>,
    placeholder: PlaceholderImages,
    mock: MockDesignProvider,
}

impl ArtifactSynthesizer {
    /// `primary` is `None` when no image credential is configured.
    pub fn new(policy: &SynthesisPolicy, primary: Option<Arc<dyn ImageProvider>>) -> Self {
        Self {
            keywords: policy
                .design_keywords
                .iter()
                .map(|k| k.to_lowercase())
                .filter(|k| !k.is_empty())
                .collect(),
            primary,
            placeholder: PlaceholderImages::new(policy),
            mock: MockDesignProvider::new(policy),
        }
    }

    /// Produces the artifact for the turn opened by the user message
    /// `turn_id`, if any.
    ///
    /// 1. A `generate_design_image` directive renders through the primary
    ///    provider, falling back to a placeholder.
    /// 2. Without a directive, design vocabulary in either text yields a mock
    ///    artifact.
    /// 3. Otherwise no artifact.
    pub async fn synthesize(
        &self,
        turn_id: &str,
        user_text: &str,
        assistant_text: &str,
        directives: &[ToolCallDirective],
    ) -> Option<Artifact> {
        let id = Artifact::id_for_turn(turn_id);

        if let Some(ToolCallDirective::GenerateDesignImage {
            prompt,
            title,
            description,
        }) = directives.first()
        {
            let prompt = non_blank(prompt).unwrap_or(user_text);
            let image_ref = self.render(prompt).await;
            return Some(Artifact {
                id,
                title: non_blank(title)
                    .unwrap_or(DEFAULT_DIRECTIVE_TITLE)
                    .to_string(),
                description: non_blank(description)
                    .unwrap_or(DEFAULT_DIRECTIVE_DESCRIPTION)
                    .to_string(),
                image_ref,
                created_at: Utc::now(),
            });
        }

        if self.looks_like_design_request(user_text, assistant_text) {
            tracing::debug!("[ArtifactSynthesizer] Design keywords matched, using mock provider");
            return Some(Artifact {
                id,
                title: self.mock.title_for(user_text),
                description: MOCK_DESCRIPTION.to_string(),
                image_ref: self.mock.image(user_text),
                created_at: Utc::now(),
            });
        }

        None
    }

    /// Case-insensitive whole-word keyword match over both texts; one hit is
    /// enough.
    pub fn looks_like_design_request(&self, user_text: &str, assistant_text: &str) -> bool {
        let text = format!("{} {}", user_text, assistant_text).to_lowercase();
        self.keywords.iter().any(|keyword| mentions(&text, keyword))
    }

    async fn render(&self, prompt: &str) -> String {
        let Some(provider) = &self.primary else {
            return self.placeholder.image_for(prompt);
        };

        match provider.generate(prompt).await {
            Ok(uri) if !uri.trim().is_empty() => uri,
            Ok(_) => {
                tracing::warn!(
                    "[ArtifactSynthesizer] {} returned an empty image reference, using placeholder",
                    provider.provider_name()
                );
                self.placeholder.image_for(prompt)
            }
            Err(err) => {
                tracing::warn!(
                    "[ArtifactSynthesizer] {} failed, using placeholder: {}",
                    provider.provider_name(),
                    err
                );
                self.placeholder.image_for(prompt)
            }
        }
    }
}

fn non_blank(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use atelier_core::ImageError;

    struct FixedProvider(Result<String, ImageError>);

    #[async_trait]
    impl ImageProvider for FixedProvider {
        async fn generate(&self, _prompt: &str) -> Result<String, ImageError> {
            self.0.clone()
        }

        fn provider_name(&self) -> &str {
            "fixed"
        }
    }

    fn directive(prompt: &str, title: &str, description: &str) -> Vec<ToolCallDirective> {
        vec![ToolCallDirective::GenerateDesignImage {
            prompt: prompt.into(),
            title: title.into(),
            description: description.into(),
        }]
    }

    fn synthesizer(primary: Option<Result<String, ImageError>>) -> ArtifactSynthesizer {
        ArtifactSynthesizer::new(
            &SynthesisPolicy::default(),
            primary.map(|r| Arc::new(FixedProvider(r)) as Arc<dyn ImageProvider>),
        )
    }

    #[tokio::test]
    async fn test_directive_uses_primary_provider() {
        let synth = synthesizer(Some(Ok("https://cdn.example.com/1.png".into())));
        let artifact = synth
            .synthesize("turn-1", "hi", "", &directive("login", "Login", "Form"))
            .await
            .unwrap();
        assert_eq!(artifact.image_ref, "https://cdn.example.com/1.png");
        assert_eq!(artifact.title, "Login");
        assert_eq!(artifact.id, Artifact::id_for_turn("turn-1"));
    }

    #[tokio::test]
    async fn test_provider_failure_falls_back_to_placeholder() {
        let synth = synthesizer(Some(Err(ImageError::Request("connection reset".into()))));
        let artifact = synth
            .synthesize("turn-1", "hi", "", &directive("login page", "", ""))
            .await
            .unwrap();
        assert!(artifact.image_ref.ends_with("text=login%20page"));
        assert_eq!(artifact.title, DEFAULT_DIRECTIVE_TITLE);
        assert_eq!(artifact.description, DEFAULT_DIRECTIVE_DESCRIPTION);
    }

    #[tokio::test]
    async fn test_empty_prompt_uses_user_text() {
        let synth = synthesizer(None);
        let artifact = synth
            .synthesize("turn-1", "pricing table", "", &directive(" ", "T", "D"))
            .await
            .unwrap();
        assert!(artifact.image_ref.ends_with("text=pricing%20table"));
    }

    #[tokio::test]
    async fn test_keywords_yield_mock_artifact() {
        let synth = synthesizer(None);
        let artifact = synth
            .synthesize("turn-1", "Please make a LAYOUT for me", "Sure", &[])
            .await
            .unwrap();
        assert!(artifact.title.starts_with("Design based on"));
        assert!(SynthesisPolicy::default().mock_images.contains(&artifact.image_ref));
    }

    #[tokio::test]
    async fn test_small_talk_yields_nothing() {
        let synth = synthesizer(None);
        let artifact = synth
            .synthesize("turn-1", "hello, how are you?", "I'm fine, thanks.", &[])
            .await;
        assert!(artifact.is_none());

        let artifact = synth
            .synthesize("turn-2", "hello, how are you?", "I'm quite well, thanks!", &[])
            .await;
        assert!(artifact.is_none());
    }

    #[test]
    fn test_keywords_match_whole_words_only() {
        let synth = synthesizer(None);
        assert!(!synth.looks_like_design_request("let's build a guide", "a deluxe suite"));
        assert!(synth.looks_like_design_request("improve the UI", ""));
        assert!(synth.looks_like_design_request("", "Here are two page designs"));
        assert!(synth.looks_like_design_request("帮我设计一个登录页", ""));
    }

    #[tokio::test]
    async fn test_same_turn_yields_same_artifact_id() {
        let synth = synthesizer(None);
        let first = synth
            .synthesize("turn-1", "design a card", "", &[])
            .await
            .unwrap();
        let second = synth
            .synthesize("turn-1", "design a card", "", &[])
            .await
            .unwrap();
        assert_eq!(first.id, second.id);

        let mut index = atelier_core::ArtifactIndex::new();
        assert!(index.add(first));
        assert!(!index.add(second));
        assert_eq!(index.len(), 1);
    }
}
