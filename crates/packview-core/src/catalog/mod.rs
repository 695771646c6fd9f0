//! Typed catalog model: a product's ordered options and its variants.
//!
//! The model is pure data. Raw storefront JSON is normalized into this shape
//! in [`normalize`]; nothing downstream of this module sees the raw document.

pub(crate) mod normalize;
pub(crate) mod raw;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use normalize::parse_catalog;

/// Amount in minor currency units (cents for USD).
pub type MinorUnits = u64;

/// A named product attribute at a fixed position in every variant's tuple.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductOption {
    pub name: String,
    /// 0-based index into [`Variant::values`].
    pub position: usize,
}

/// One purchasable catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variant {
    /// Storefront variant ID, stored as a string to avoid precision loss.
    pub id: String,
    /// One raw value per [`ProductOption`], in option order.
    pub values: Vec<String>,
    pub price: MinorUnits,
    /// `0` when the variant carries no comparison price.
    pub compare_at_price: MinorUnits,
    pub available: bool,
    /// Media item to show when this variant is active, by ID.
    pub media_id: Option<String>,
    /// Media item to show when this variant is active, by source URL.
    pub media_src: Option<String>,
}

impl Variant {
    /// Builds an available variant with no compare-at price or media.
    #[must_use]
    pub fn new(id: impl Into<String>, values: &[&str], price: MinorUnits) -> Self {
        Self {
            id: id.into(),
            values: values.iter().map(|v| (*v).to_string()).collect(),
            price,
            compare_at_price: 0,
            available: true,
            media_id: None,
            media_src: None,
        }
    }

    #[must_use]
    pub fn with_compare_at(mut self, compare_at_price: MinorUnits) -> Self {
        self.compare_at_price = compare_at_price;
        self
    }

    #[must_use]
    pub fn with_available(mut self, available: bool) -> Self {
        self.available = available;
        self
    }

    #[must_use]
    pub fn with_media_id(mut self, media_id: impl Into<String>) -> Self {
        self.media_id = Some(media_id.into());
        self
    }

    #[must_use]
    pub fn with_media_src(mut self, media_src: impl Into<String>) -> Self {
        self.media_src = Some(media_src.into());
        self
    }

    /// Value at option `index`, if the tuple has one.
    #[must_use]
    pub fn value(&self, index: usize) -> Option<&str> {
        self.values.get(index).map(String::as_str)
    }
}

/// A gallery entry declared by the catalog document (`media` / `images`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaSource {
    pub id: String,
    pub src: Option<String>,
}

/// A product's options and variants in catalog order.
///
/// Catalog order is significant: every fallback in the resolution engine
/// breaks ties by taking the earliest variant.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    pub options: Vec<ProductOption>,
    pub variants: Vec<Variant>,
    #[serde(default)]
    pub media: Vec<MediaSource>,
}

impl Catalog {
    /// A catalog with no options and no variants. Everything projected from
    /// it is in the sold-out state.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Builds a catalog from option names and variants, padding or truncating
    /// each variant's values so every tuple has one value per option.
    #[must_use]
    pub fn new<S: AsRef<str>>(option_names: &[S], variants: Vec<Variant>) -> Self {
        let options: Vec<ProductOption> = option_names
            .iter()
            .enumerate()
            .map(|(position, name)| ProductOption {
                name: name.as_ref().to_string(),
                position,
            })
            .collect();

        let width = options.len();
        let variants = variants
            .into_iter()
            .map(|mut v| {
                v.values.resize(width, String::new());
                v
            })
            .collect();

        Self {
            options,
            variants,
            media: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_media(mut self, media: Vec<MediaSource>) -> Self {
        self.media = media;
        self
    }

    /// Parses a catalog document, degrading to [`Catalog::empty`] on any
    /// failure. The failure is logged at `warn`.
    #[must_use]
    pub fn from_json(json: &str) -> Self {
        match parse_catalog(json) {
            Ok(catalog) => catalog,
            Err(e) => {
                tracing::warn!(error = %e, "catalog unusable, continuing with an empty catalog");
                Self::empty()
            }
        }
    }

    #[must_use]
    pub fn option_count(&self) -> usize {
        self.options.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.variants.is_empty()
    }

    /// Case-insensitive lookup of an option's index by name.
    #[must_use]
    pub fn option_index(&self, name: &str) -> Option<usize> {
        self.options
            .iter()
            .find(|o| o.name.eq_ignore_ascii_case(name.trim()))
            .map(|o| o.position)
    }

    /// Catalog position of the variant with `id`. Blank ids never match.
    #[must_use]
    pub fn position_of(&self, id: &str) -> Option<usize> {
        let needle = id.trim();
        if needle.is_empty() {
            return None;
        }
        self.variants.iter().position(|v| v.id == needle)
    }

    #[must_use]
    pub fn first_variant(&self) -> Option<&Variant> {
        self.variants.first()
    }

    #[must_use]
    pub fn has_available_variants(&self) -> bool {
        self.variants.iter().any(|v| v.available)
    }
}

/// Why a catalog document could not be used.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog JSON could not be parsed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("catalog document root must be an object")]
    NotAnObject,

    #[error("catalog has no usable variants")]
    NoVariants,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Catalog {
        Catalog::new(
            &["Color", "Pack"],
            vec![
                Variant::new("1", &["Red", "1-pack"], 2000).with_available(false),
                Variant::new("2", &["Red", "2-pack"], 3600),
                Variant::new("3", &["Blue"], 3800),
            ],
        )
    }

    #[test]
    fn new_pads_short_value_tuples() {
        let catalog = sample();
        assert_eq!(catalog.variants[2].values, vec!["Blue", ""]);
    }

    #[test]
    fn new_truncates_long_value_tuples() {
        let catalog = Catalog::new(&["Color"], vec![Variant::new("1", &["Red", "extra"], 1)]);
        assert_eq!(catalog.variants[0].values, vec!["Red"]);
    }

    #[test]
    fn option_index_is_case_insensitive() {
        let catalog = sample();
        assert_eq!(catalog.option_index("pack"), Some(1));
        assert_eq!(catalog.option_index(" COLOR "), Some(0));
        assert_eq!(catalog.option_index("Size"), None);
    }

    #[test]
    fn position_of_ignores_blank_needle() {
        let catalog = sample();
        assert!(catalog.position_of("").is_none());
        assert!(catalog.position_of("   ").is_none());
        assert_eq!(catalog.position_of(" 2 "), Some(1));
    }

    #[test]
    fn availability_ignores_sold_out_variants() {
        let catalog = sample();
        assert!(catalog.has_available_variants());
        assert_eq!(catalog.first_variant().map(|v| v.id.as_str()), Some("1"));

        let sold_out = Catalog::new(
            &["Color"],
            vec![Variant::new("1", &["Red"], 1).with_available(false)],
        );
        assert!(!sold_out.has_available_variants());
    }

    #[test]
    fn empty_catalog_has_no_variants() {
        let catalog = Catalog::empty();
        assert!(catalog.is_empty());
        assert!(!catalog.has_available_variants());
        assert!(catalog.first_variant().is_none());
    }

    #[test]
    fn from_json_degrades_to_empty_on_garbage() {
        assert_eq!(Catalog::from_json("not json"), Catalog::empty());
        assert_eq!(Catalog::from_json("[1, 2, 3]"), Catalog::empty());
    }
}
