//! Virtualization window over an ordered collection.

use serde::{Deserialize, Serialize};
use std::ops::Range;

/// Scroll geometry supplied by the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub scroll_offset: f64,
    pub viewport_height: f64,
    pub item_height: f64,
    pub overscan: usize,
}

/// Half-open index range `[start, end)` of items to materialize.
///
/// Empty only for an empty collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct VisibleWindow {
    pub start: usize,
    pub end: usize,
}

impl VisibleWindow {
    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    /// Inclusive last index, `None` when empty.
    pub fn last(&self) -> Option<usize> {
        (!self.is_empty()).then(|| self.end - 1)
    }
}

/// Computes the window for a collection of `len` items.
///
/// `start = max(0, floor(offset / h) - overscan)` and the inclusive last
/// index is `min(len - 1, ceil((offset + viewport) / h) + overscan)`. Both are
/// clamped into `[0, len - 1]`. Negative or non-finite geometry is treated as
/// zero; a non-positive item height materializes the whole collection.
pub fn visible_window(
    len: usize,
    scroll_offset: f64,
    viewport_height: f64,
    item_height: f64,
    overscan: usize,
) -> VisibleWindow {
    if len == 0 {
        return VisibleWindow::default();
    }
    if !(item_height.is_finite() && item_height > 0.0) {
        return VisibleWindow { start: 0, end: len };
    }

    let last_index = len - 1;
    let offset = non_negative(scroll_offset);
    let height = non_negative(viewport_height);

    // f64 -> usize casts saturate.
    let first_visible = (offset / item_height).floor() as usize;
    let last_visible = ((offset + height) / item_height).ceil() as usize;

    let start = first_visible.saturating_sub(overscan).min(last_index);
    let last = last_visible.saturating_add(overscan).min(last_index);

    VisibleWindow {
        start,
        end: last + 1,
    }
}

fn non_negative(value: f64) -> f64 {
    if value.is_finite() { value.max(0.0) } else { 0.0 }
}
