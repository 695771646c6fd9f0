//! Detection of the option that encodes a bundle ("pack") size.
//!
//! Detection runs once per catalog. The result is immutable and answers three
//! questions for the rest of the engine: is pack semantics active, which
//! option index carries it, and which raw value stands for a given size.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::catalog::Catalog;

/// Sizes offered when the catalog has no pack option and quantity is a plain
/// multiplier.
pub const DEFAULT_PACK_SIZES: [u32; 3] = [1, 2, 4];

/// Parses a bundle size from a raw option value.
///
/// The size is the first maximal run of ASCII digits anywhere in the value,
/// so `"4-pack"`, `"Pack of 4"` and `"4"` all yield `4`. Values without
/// digits, runs that parse to zero, and runs that overflow `u32` yield `None`.
#[must_use]
pub fn parse_pack_size(raw: &str) -> Option<u32> {
    let start = raw.find(|c: char| c.is_ascii_digit())?;
    let rest = &raw[start..];
    let end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    rest[..end].parse::<u32>().ok().filter(|n| *n > 0)
}

/// Explicit widget overrides for detection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PackOverrides {
    /// Force this option index when it is in range.
    pub option_index: Option<usize>,
    /// `Some(false)` disables pack semantics outright.
    pub enabled: Option<bool>,
}

/// The designated pack option and its size ↔ raw-value lookup.
///
/// An inactive designation has no index and no sizes; in that state quantity
/// multiplies a single variant's price instead of selecting a bundle variant.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PackDesignation {
    option_index: Option<usize>,
    sizes: BTreeMap<u32, String>,
}

impl PackDesignation {
    #[must_use]
    pub fn disabled() -> Self {
        Self::default()
    }

    /// Detects the pack option with no overrides.
    #[must_use]
    pub fn detect(catalog: &Catalog) -> Self {
        Self::detect_with(catalog, PackOverrides::default())
    }

    /// Detects the pack option.
    ///
    /// Precedence: an in-range `overrides.option_index`; else the first option
    /// whose name contains "pack" (case-insensitive) and yields at least one
    /// size; else the option with the most distinct sizes, lowest index on a
    /// tie. A candidate whose values yield no size is never designated.
    #[must_use]
    pub fn detect_with(catalog: &Catalog, overrides: PackOverrides) -> Self {
        if overrides.enabled == Some(false) {
            tracing::debug!("pack semantics disabled by configuration");
            return Self::disabled();
        }

        let option_count = catalog.option_count();

        let forced = overrides.option_index.and_then(|idx| {
            if idx < option_count {
                Some(idx)
            } else {
                tracing::warn!(
                    index = idx,
                    option_count,
                    "pack option override out of range, falling back to detection"
                );
                None
            }
        });

        let chosen = forced
            .or_else(|| {
                catalog
                    .options
                    .iter()
                    .find(|o| {
                        o.name.to_lowercase().contains("pack")
                            && !size_map(catalog, o.position).is_empty()
                    })
                    .map(|o| o.position)
            })
            .or_else(|| most_sized_option(catalog));

        let Some(index) = chosen else {
            return Self::disabled();
        };

        let sizes = size_map(catalog, index);
        if sizes.is_empty() {
            return Self::disabled();
        }

        tracing::debug!(
            index,
            sizes = ?sizes.keys().collect::<Vec<_>>(),
            "pack option detected"
        );
        Self {
            option_index: Some(index),
            sizes,
        }
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.option_index.is_some()
    }

    #[must_use]
    pub fn option_index(&self) -> Option<usize> {
        self.option_index
    }

    /// Canonical raw value for `size`: the first value in catalog order that
    /// parsed to it.
    #[must_use]
    pub fn value_for_size(&self, size: u32) -> Option<&str> {
        self.sizes.get(&size).map(String::as_str)
    }

    /// Bundle size encoded by a raw pack-option value. `None` when inactive.
    #[must_use]
    pub fn size_of(&self, raw: &str) -> Option<u32> {
        if self.is_active() {
            parse_pack_size(raw)
        } else {
            None
        }
    }

    /// Known sizes in ascending order.
    pub fn sizes(&self) -> impl Iterator<Item = u32> + '_ {
        self.sizes.keys().copied()
    }

    /// Clamps a requested size to one the widget can offer.
    ///
    /// Allowed sizes are the detected sizes when active, else `fallback`.
    /// A disallowed request becomes `1` if `1` is allowed, else the smallest
    /// allowed size. With nothing allowed at all the request is `1`.
    #[must_use]
    pub fn normalize_size(&self, requested: u32, fallback: &[u32]) -> u32 {
        let allowed: Vec<u32> = if self.is_active() {
            self.sizes().collect()
        } else {
            fallback.to_vec()
        };

        if allowed.contains(&requested) {
            requested
        } else if allowed.is_empty() || allowed.contains(&1) {
            1
        } else {
            allowed.iter().copied().min().unwrap_or(1)
        }
    }
}

/// size → first-seen raw value for option `index`, in catalog order.
fn size_map(catalog: &Catalog, index: usize) -> BTreeMap<u32, String> {
    let mut map = BTreeMap::new();
    for value in catalog.variants.iter().filter_map(|v| v.value(index)) {
        if let Some(size) = parse_pack_size(value) {
            map.entry(size).or_insert_with(|| value.to_string());
        }
    }
    map
}

fn most_sized_option(catalog: &Catalog) -> Option<usize> {
    let mut best: Option<(usize, usize)> = None;
    for index in 0..catalog.option_count() {
        let count = size_map(catalog, index).len();
        if count > 0 && best.is_none_or(|(_, c)| count > c) {
            best = Some((index, count));
        }
    }
    best.map(|(index, _)| index)
}
