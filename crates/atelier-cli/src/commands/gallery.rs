//! `atelier gallery` and `atelier stats`.

use anyhow::Result;
use atelier_core::gallery::{SortKey, TimeRange, Viewport};
use chrono::Utc;

use super::render;

pub struct ListOptions {
    pub query: Option<String>,
    pub sort: Option<SortKey>,
    pub page: usize,
    pub rows: usize,
    pub json: bool,
}

pub async fn list(options: ListOptions) -> Result<()> {
    let (workbench, _store) = super::open_workbench().await?;
    let gallery = workbench.gallery();
    let mut index = gallery.write().await;

    if let Some(key) = options.sort {
        index.sorted_by(key);
    }
    let query = options.query.unwrap_or_default();

    let item_height = workbench.config().gallery.item_height;
    let rows = options.rows.max(1) as f64;
    let viewport = Viewport {
        scroll_offset: options.page as f64 * rows * item_height,
        viewport_height: (rows - 1.0) * item_height,
        item_height,
        overscan: 0,
    };
    let page = index.page(&query, viewport);

    if options.json {
        println!("{}", serde_json::to_string_pretty(&page)?);
    } else {
        render::page(&page);
    }
    Ok(())
}

pub async fn stats(range: TimeRange, json: bool) -> Result<()> {
    let (workbench, _store) = super::open_workbench().await?;
    let stats = workbench.gallery().read().await.stats(range, Utc::now());

    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
    } else {
        render::stats(&stats);
    }
    Ok(())
}
