//! Product gallery: ordered media items with exactly one active at a time.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::catalog::{Catalog, Variant};

/// Trailing CDN size token before the extension: `_800x600`, `_800x`, `_800`.
static SIZE_SUFFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)_(?:\d+x\d+|\d+x|\d+)(\.[a-z0-9]+)$").expect("valid size suffix regex")
});

/// Normalizes a media locator for comparison.
///
/// Strips the query string and fragment, then any trailing size token
/// immediately before the file extension. `//cdn/a_800x.jpg?v=1` becomes
/// `//cdn/a.jpg`.
#[must_use]
pub fn normalize_locator(src: &str) -> String {
    let trimmed = src.trim();
    let without_query = trimmed
        .split_once(['?', '#'])
        .map_or(trimmed, |(head, _)| head);
    SIZE_SUFFIX.replace(without_query, "$1").into_owned()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MediaItem {
    pub id: String,
    /// Normalized locator, see [`normalize_locator`].
    pub locator: Option<String>,
    pub active: bool,
}

/// Media items in display order. At most one item is active; a non-empty
/// gallery starts with its first item active.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Gallery {
    items: Vec<MediaItem>,
}

impl Gallery {
    #[must_use]
    pub fn new<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = (S, Option<S>)>,
        S: Into<String>,
    {
        let items = items
            .into_iter()
            .enumerate()
            .map(|(idx, (id, src))| MediaItem {
                id: id.into(),
                locator: src.map(|s| {
                    let s: String = s.into();
                    normalize_locator(&s)
                }),
                active: idx == 0,
            })
            .collect();
        Self { items }
    }

    /// Gallery built from the media declared in the catalog document.
    #[must_use]
    pub fn from_catalog(catalog: &Catalog) -> Self {
        Self::new(
            catalog
                .media
                .iter()
                .map(|m| (m.id.clone(), m.src.clone())),
        )
    }

    #[must_use]
    pub fn items(&self) -> &[MediaItem] {
        &self.items
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[must_use]
    pub fn active_id(&self) -> Option<&str> {
        self.items
            .iter()
            .find(|item| item.active)
            .map(|item| item.id.as_str())
    }

    /// Makes `id` the only active item. Unknown IDs leave the gallery as is.
    pub fn activate(&mut self, id: &str) -> bool {
        if !self.items.iter().any(|item| item.id == id) {
            return false;
        }
        for item in &mut self.items {
            item.active = item.id == id;
        }
        true
    }

    /// The item that should be shown for `variant`: exact ID match on the
    /// variant's media reference first, then normalized locator match.
    #[must_use]
    pub fn match_variant(&self, variant: &Variant) -> Option<&str> {
        let by_id = variant
            .media_id
            .as_deref()
            .and_then(|id| self.items.iter().find(|item| item.id == id));

        let by_locator = || {
            let wanted = normalize_locator(variant.media_src.as_deref()?);
            self.items
                .iter()
                .find(|item| item.locator.as_deref() == Some(wanted.as_str()))
        };

        by_id.or_else(by_locator).map(|item| item.id.as_str())
    }
}
