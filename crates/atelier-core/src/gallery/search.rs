//! Keyword search helpers: synonym expansion, relevance, recent queries.

/// Groups of interchangeable search terms. Every term in a group matches
/// every other term in the same group, which keeps the relation symmetric.
const SYNONYM_GROUPS: &[&[&str]] = &[
    &["登录", "login", "signin", "sign in", "登陆", "登入"],
    &["按钮", "button", "btn", "按键"],
    &["卡片", "card", "卡片式", "卡片组件"],
    &["导航", "nav", "navigation", "菜单", "menu"],
    &["移动", "mobile", "手机", "app", "移动端"],
    &["网页", "web", "website", "网站", "pc"],
];

/// Fixed synonym table used to widen queries.
#[derive(Debug, Clone)]
pub struct SynonymTable {
    groups: Vec<Vec<String>>,
}

impl Default for SynonymTable {
    fn default() -> Self {
        Self::new(
            SYNONYM_GROUPS
                .iter()
                .map(|group| group.iter().map(|t| t.to_string()).collect())
                .collect(),
        )
    }
}

impl SynonymTable {
    pub fn new(groups: Vec<Vec<String>>) -> Self {
        let groups = groups
            .into_iter()
            .map(|group| group.into_iter().map(|t| t.to_lowercase()).collect())
            .collect();
        Self { groups }
    }

    /// Returns every synonym of any term contained in `query` (lowercased).
    pub fn expand(&self, query: &str) -> Vec<&str> {
        let mut terms = Vec::new();
        for group in &self.groups {
            if group.iter().any(|term| query.contains(term.as_str())) {
                terms.extend(group.iter().map(String::as_str));
            }
        }
        terms
    }
}

/// Title hits weigh 2, description hits 1.
pub(crate) fn relevance(query: &str, title: &str, description: &str) -> u8 {
    let title_score = if title.contains(query) { 2 } else { 0 };
    let description_score = if description.contains(query) { 1 } else { 0 };
    title_score + description_score
}

/// Most-recent-first list of distinct queries.
#[derive(Debug, Clone)]
pub struct RecentSearches {
    entries: Vec<String>,
    limit: usize,
}

impl RecentSearches {
    pub fn new(limit: usize) -> Self {
        Self {
            entries: Vec::new(),
            limit,
        }
    }

    /// Records `query` at the front. Blank queries are ignored; a repeated
    /// query moves to the front instead of appearing twice.
    pub fn record(&mut self, query: &str) {
        let query = query.trim();
        if query.is_empty() || self.limit == 0 {
            return;
        }
        self.entries.retain(|existing| existing != query);
        self.entries.insert(0, query.to_string());
        self.entries.truncate(self.limit);
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_returns_whole_group() {
        let table = SynonymTable::default();
        let terms = table.expand("login screen");
        assert!(terms.contains(&"signin"));
        assert!(terms.contains(&"登录"));
        assert!(!terms.contains(&"button"));
    }

    #[test]
    fn test_expansion_is_symmetric_for_every_pair() {
        let table = SynonymTable::default();
        for group in SYNONYM_GROUPS {
            for a in group.iter() {
                for b in group.iter() {
                    assert!(table.expand(a).contains(b), "{a} should expand to {b}");
                    assert!(table.expand(b).contains(a), "{b} should expand to {a}");
                }
            }
        }
    }

    #[test]
    fn test_relevance_weights_title_over_description() {
        assert_eq!(relevance("login", "login page", "a login form"), 3);
        assert_eq!(relevance("login", "login page", "a form"), 2);
        assert_eq!(relevance("login", "page", "a login form"), 1);
        assert_eq!(relevance("login", "page", "form"), 0);
    }

    #[test]
    fn test_recent_searches_dedupe_and_cap() {
        let mut recent = RecentSearches::new(3);
        for q in ["a", "b", "c", "a", "  ", "d"] {
            recent.record(q);
        }
        assert_eq!(recent.entries(), &["d", "a", "c"]);

        recent.clear();
        assert!(recent.entries().is_empty());
    }
}
