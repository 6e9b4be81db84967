//! Application configuration model (`config.toml`).
//!
//! Every field has a default so a partial or missing file still yields a
//! usable configuration.

use serde::{Deserialize, Serialize};

use crate::gallery::SortKey;

const DEFAULT_SYSTEM_PROMPT: &str = "You are a professional UI/UX design assistant. \
Understand the user's design needs, give professional design advice and describe concrete \
design drafts. When the user wants a design image, call the generate_design_image tool.";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AtelierConfig {
    pub completion: CompletionSettings,
    pub image: ImageSettings,
    pub synthesis: SynthesisPolicy,
    pub gallery: GallerySettings,
}

/// Chat-completion endpoint settings (OpenAI-compatible API).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompletionSettings {
    pub endpoint: String,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub timeout_secs: u64,
    pub system_prompt: String,
    /// Sent as `HTTP-Referer` (OpenRouter attribution).
    pub referer: Option<String>,
    /// Sent as `X-Title` (OpenRouter attribution).
    pub app_title: Option<String>,
}

impl Default for CompletionSettings {
    fn default() -> Self {
        Self {
            endpoint: "https://openrouter.ai/api/v1/chat/completions".to_string(),
            model: "openai/gpt-4.1-mini".to_string(),
            temperature: 0.7,
            max_tokens: 1000,
            timeout_secs: 60,
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            referer: Some("http://localhost".to_string()),
            app_title: Some("Atelier".to_string()),
        }
    }
}

/// Hosted image-generation settings (primary artifact provider).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageSettings {
    pub endpoint: String,
    pub model: String,
    pub size: String,
    pub timeout_secs: u64,
}

impl Default for ImageSettings {
    fn default() -> Self {
        Self {
            endpoint: "https://api.openai.com/v1/images/generations".to_string(),
            model: "dall-e-3".to_string(),
            size: "1024x1024".to_string(),
            timeout_secs: 120,
        }
    }
}

/// Policy for deciding whether and how a turn produces an artifact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SynthesisPolicy {
    /// Design-intent vocabulary for turns without a directive. Matching is
    /// case-insensitive on whole words (substring for CJK terms); one hit is
    /// enough.
    pub design_keywords: Vec<String>,
    /// Rotation pool for the mock provider.
    pub mock_images: Vec<String>,
    /// Placeholder URI template; `{text}` receives the encoded prompt.
    pub placeholder_template: String,
    /// Prompt characters kept in placeholder URIs.
    pub placeholder_prompt_chars: usize,
    /// User-text characters kept in mock titles.
    pub title_excerpt_chars: usize,
}

impl Default for SynthesisPolicy {
    fn default() -> Self {
        let keywords = [
            "design", "interface", "page", "layout", "component", "ui", "ux", "prototype",
            "mockup", "wireframe", "create", "generate", "设计", "界面", "页面", "布局", "组件",
            "原型", "设计稿", "生成", "创建",
        ];
        let mock_images = [
            "https://images.unsplash.com/photo-1561070791-2526d30994b5?w=400&h=300&fit=crop",
            "https://images.unsplash.com/photo-1558655146-9f40138edfeb?w=400&h=300&fit=crop",
            "https://images.unsplash.com/photo-1586717791821-3f44a563fa4c?w=400&h=300&fit=crop",
            "https://images.unsplash.com/photo-1561070791-36e60a6b6d1a?w=400&h=300&fit=crop",
        ];
        Self {
            design_keywords: keywords.iter().map(|k| k.to_string()).collect(),
            mock_images: mock_images.iter().map(|u| u.to_string()).collect(),
            placeholder_template: "https://via.placeholder.com/400x300/4F46E5/FFFFFF?text={text}"
                .to_string(),
            placeholder_prompt_chars: 100,
            title_excerpt_chars: 20,
        }
    }
}

/// Gallery presentation defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GallerySettings {
    pub default_sort: SortKey,
    pub item_height: f64,
    pub overscan: usize,
    pub recent_search_limit: usize,
    pub popular_tag_limit: usize,
}

impl Default for GallerySettings {
    fn default() -> Self {
        Self {
            default_sort: SortKey::Newest,
            item_height: 320.0,
            overscan: 3,
            recent_search_limit: 5,
            popular_tag_limit: 8,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: AtelierConfig = toml::from_str(
            r#"
            [completion]
            model = "anthropic/claude-3.5-sonnet"

            [gallery]
            default_sort = "title"
            "#,
        )
        .unwrap();

        assert_eq!(config.completion.model, "anthropic/claude-3.5-sonnet");
        assert_eq!(config.completion.max_tokens, 1000);
        assert_eq!(config.gallery.default_sort, SortKey::Title);
        assert_eq!(config.synthesis.mock_images.len(), 4);
    }

    #[test]
    fn test_round_trips_through_toml() {
        let config = AtelierConfig::default();
        let text = toml::to_string_pretty(&config).unwrap();
        let back: AtelierConfig = toml::from_str(&text).unwrap();
        assert_eq!(back, config);
    }
}
