//! Artifact gallery: the index plus its derived views (search, sort, tags,
//! windowing and statistics).

pub mod analytics;
pub mod search;
pub mod sort;
pub mod tags;
pub mod window;

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::{BTreeSet, HashMap, HashSet};

use crate::artifact::Artifact;
use crate::config::GallerySettings;

pub use analytics::{DailyCount, GalleryStats, TermCount, TimeRange};
pub use search::{RecentSearches, SynonymTable};
pub use sort::SortKey;
pub use tags::{TagCount, extract_tags};
pub use window::{Viewport, VisibleWindow, visible_window};

/// One page of gallery results for the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GalleryPage {
    /// Materialized items, i.e. `results[window.start..window.end]`.
    pub items: Vec<Artifact>,
    pub window: VisibleWindow,
    /// Size of the full result set the window was taken from.
    pub total_count: usize,
}

/// Deduplicated collection of artifacts.
///
/// The underlying collection is kept in insertion order and never reordered;
/// sorting and searching return fresh vectors.
#[derive(Debug, Clone)]
pub struct ArtifactIndex {
    artifacts: Vec<Artifact>,
    ids: HashSet<String>,
    sort_key: SortKey,
    synonyms: SynonymTable,
    recent: RecentSearches,
    popular_tag_limit: usize,
}

impl Default for ArtifactIndex {
    fn default() -> Self {
        Self::with_settings(&GallerySettings::default())
    }
}

impl ArtifactIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings(settings: &GallerySettings) -> Self {
        Self {
            artifacts: Vec::new(),
            ids: HashSet::new(),
            sort_key: settings.default_sort,
            synonyms: SynonymTable::default(),
            recent: RecentSearches::new(settings.recent_search_limit),
            popular_tag_limit: settings.popular_tag_limit,
        }
    }

    /// Builds an index from restored artifacts. Later duplicates are dropped.
    pub fn from_artifacts(
        artifacts: impl IntoIterator<Item = Artifact>,
        settings: &GallerySettings,
    ) -> Self {
        let mut index = Self::with_settings(settings);
        for artifact in artifacts {
            index.add(artifact);
        }
        index
    }

    /// Inserts `artifact`. Returns `false` (and changes nothing) when an
    /// artifact with the same id is already present.
    pub fn add(&mut self, artifact: Artifact) -> bool {
        if !self.ids.insert(artifact.id.clone()) {
            tracing::debug!(id = %artifact.id, "Artifact already indexed, skipping");
            return false;
        }
        self.artifacts.push(artifact);
        true
    }

    pub fn len(&self) -> usize {
        self.artifacts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.artifacts.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    pub fn get(&self, id: &str) -> Option<&Artifact> {
        self.artifacts.iter().find(|a| a.id == id)
    }

    /// Artifacts in insertion order.
    pub fn artifacts(&self) -> &[Artifact] {
        &self.artifacts
    }

    pub fn sort_key(&self) -> SortKey {
        self.sort_key
    }

    /// Makes `key` the active order and returns the collection in that order.
    pub fn sorted_by(&mut self, key: SortKey) -> Vec<Artifact> {
        self.sort_key = key;
        self.view()
    }

    /// The collection in the active sort order.
    pub fn view(&self) -> Vec<Artifact> {
        let mut items = self.artifacts.clone();
        self.sort_key.apply(&mut items);
        items
    }

    /// Case-insensitive search over title and description, widened by the
    /// synonym table.
    ///
    /// A blank query returns [`view`](Self::view) unchanged. Otherwise results
    /// are ordered by score (title hit 2, description hit 1) with ties kept in
    /// the active sort order.
    pub fn search(&self, query: &str) -> Vec<Artifact> {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return self.view();
        }

        let synonyms = self.synonyms.expand(&query);
        let mut scored: Vec<(u8, Artifact)> = self
            .view()
            .into_iter()
            .filter_map(|artifact| {
                let title = artifact.title.to_lowercase();
                let description = artifact.description.to_lowercase();
                let score = std::iter::once(query.as_str())
                    .chain(synonyms.iter().copied())
                    .map(|term| search::relevance(term, &title, &description))
                    .max()
                    .unwrap_or(0);
                (score > 0).then_some((score, artifact))
            })
            .collect();

        // Stable, so equal scores keep the active order.
        scored.sort_by(|a, b| b.0.cmp(&a.0));
        scored.into_iter().map(|(_, artifact)| artifact).collect()
    }

    pub fn remember_search(&mut self, query: &str) {
        self.recent.record(query);
    }

    pub fn recent_searches(&self) -> &[String] {
        self.recent.entries()
    }

    pub fn clear_recent_searches(&mut self) {
        self.recent.clear();
    }

    pub fn extract_tags(artifact: &Artifact) -> BTreeSet<String> {
        tags::extract_tags(artifact)
    }

    /// Number of artifacts per tag, most common first, ties by tag name.
    pub fn tag_counts(&self) -> Vec<TagCount> {
        let mut counts: HashMap<String, usize> = HashMap::new();
        for artifact in &self.artifacts {
            for tag in tags::extract_tags(artifact) {
                *counts.entry(tag).or_default() += 1;
            }
        }
        let mut counts: Vec<TagCount> = counts
            .into_iter()
            .map(|(tag, count)| TagCount { tag, count })
            .collect();
        counts.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.tag.cmp(&b.tag)));
        counts
    }

    /// The `limit` most common tags; `None` uses the configured limit.
    pub fn popular_tags(&self, limit: Option<usize>) -> Vec<TagCount> {
        let mut counts = self.tag_counts();
        counts.truncate(limit.unwrap_or(self.popular_tag_limit));
        counts
    }

    /// Window over the full collection.
    pub fn visible_window(
        &self,
        scroll_offset: f64,
        viewport_height: f64,
        item_height: f64,
        overscan: usize,
    ) -> VisibleWindow {
        visible_window(
            self.len(),
            scroll_offset,
            viewport_height,
            item_height,
            overscan,
        )
    }

    /// Searches (blank query = current view) and materializes the window of
    /// results visible in `viewport`.
    pub fn page(&self, query: &str, viewport: Viewport) -> GalleryPage {
        let results = self.search(query);
        let window = visible_window(
            results.len(),
            viewport.scroll_offset,
            viewport.viewport_height,
            viewport.item_height,
            viewport.overscan,
        );
        GalleryPage {
            items: results[window.range()].to_vec(),
            window,
            total_count: results.len(),
        }
    }

    pub fn stats(&self, range: TimeRange, now: DateTime<Utc>) -> GalleryStats {
        GalleryStats::compute(&self.artifacts, range, now)
    }
}
