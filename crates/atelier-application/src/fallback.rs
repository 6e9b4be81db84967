//! Offline image sources used when the hosted provider is missing or fails.
//! Neither of them can fail.

use atelier_core::config::SynthesisPolicy;
use rand::Rng;

const DEFAULT_PLACEHOLDER_TEXT: &str = "Design";

/// Derives a placeholder image URI from prompt text.
///
/// Deterministic: the same prompt always yields the same URI.
#[derive(Debug, Clone)]
pub struct PlaceholderImages {
    template: String,
    max_chars: usize,
}

impl PlaceholderImages {
    pub fn new(policy: &SynthesisPolicy) -> Self {
        Self {
            template: policy.placeholder_template.clone(),
            max_chars: policy.placeholder_prompt_chars,
        }
    }

    pub fn image_for(&self, prompt: &str) -> String {
        let excerpt: String = prompt.trim().chars().take(self.max_chars).collect();
        let text = if excerpt.is_empty() {
            DEFAULT_PLACEHOLDER_TEXT
        } else {
            excerpt.as_str()
        };
        self.template.replace("{text}", &urlencoding::encode(text))
    }
}

/// Picks sample design images for turns that look like design requests but
/// carry no directive.
#[derive(Debug, Clone)]
pub struct MockDesignProvider {
    pool: Vec<String>,
    placeholder: PlaceholderImages,
    title_chars: usize,
}

impl MockDesignProvider {
    pub fn new(policy: &SynthesisPolicy) -> Self {
        Self {
            pool: policy.mock_images.clone(),
            placeholder: PlaceholderImages::new(policy),
            title_chars: policy.title_excerpt_chars,
        }
    }

    pub fn title_for(&self, user_text: &str) -> String {
        let excerpt: String = user_text.trim().chars().take(self.title_chars).collect();
        format!("Design based on \"{excerpt}...\"")
    }

    /// Random pool entry; an empty pool falls back to a placeholder.
    pub fn image(&self, user_text: &str) -> String {
        if self.pool.is_empty() {
            return self.placeholder.image_for(user_text);
        }
        let index = rand::thread_rng().gen_range(0..self.pool.len());
        self.pool[index].clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder_encodes_and_truncates_prompt() {
        let placeholder = PlaceholderImages::new(&SynthesisPolicy::default());
        let uri = placeholder.image_for("login page & form");
        assert_eq!(
            uri,
            "https://via.placeholder.com/400x300/4F46E5/FFFFFF?text=login%20page%20%26%20form"
        );

        let long = "a".repeat(300);
        let uri = placeholder.image_for(&long);
        assert!(uri.ends_with(&"a".repeat(100)));
        assert!(!uri.ends_with(&"a".repeat(101)));
    }

    #[test]
    fn test_placeholder_for_blank_prompt_is_still_a_uri() {
        let placeholder = PlaceholderImages::new(&SynthesisPolicy::default());
        assert!(placeholder.image_for("  ").ends_with("text=Design"));
    }

    #[test]
    fn test_mock_title_and_pool() {
        let policy = SynthesisPolicy::default();
        let mock = MockDesignProvider::new(&policy);
        assert_eq!(
            mock.title_for("create a dashboard for sales teams"),
            "Design based on \"create a dashboard f...\""
        );
        for _ in 0..20 {
            assert!(policy.mock_images.contains(&mock.image("x")));
        }
    }

    #[test]
    fn test_mock_with_empty_pool_uses_placeholder() {
        let policy = SynthesisPolicy {
            mock_images: Vec::new(),
            ..SynthesisPolicy::default()
        };
        let mock = MockDesignProvider::new(&policy);
        assert!(mock.image("card").starts_with("https://via.placeholder.com/"));
    }
}
