use std::collections::BTreeSet;

use crate::artifact::Artifact;
use crate::text::mentions;

/// Keyword → tag mapping. A tag applies when any of its keywords is
/// mentioned in the artifact's title or description.
const TAG_RULES: &[(&[&str], &str)] = &[
    (&["登录", "login", "sign in", "signin"], "login page"),
    (&["按钮", "button"], "button"),
    (&["卡片", "card"], "card"),
    (&["导航", "nav", "navbar", "navigation"], "navigation"),
    (&["移动", "mobile"], "mobile"),
    (&["网页", "web", "website", "webpage"], "web"),
    (&["仪表", "dashboard"], "dashboard"),
    (&["表单", "form"], "form"),
];

/// Derives coarse tags from an artifact's text.
pub fn extract_tags(artifact: &Artifact) -> BTreeSet<String> {
    let text = artifact.searchable_text();
    TAG_RULES
        .iter()
        .filter(|(keywords, _)| keywords.iter().any(|k| mentions(&text, k)))
        .map(|(_, tag)| tag.to_string())
        .collect()
}

/// Tag name with the number of artifacts carrying it.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct TagCount {
    pub tag: String,
    pub count: usize,
}
