//! Raw catalog document shapes as emitted by storefront product JSON.
//!
//! ## Observed shapes
//!
//! ### `options`
//! Either a list of names (`["Color", "Pack"]`, the Liquid `product | json`
//! form) or a list of objects (`[{"name": "Color", "position": 1}]`, the
//! `products.json` form). Object positions are 1-based.
//!
//! ### Variant option values
//! Liquid emits an `options` array per variant. `products.json` emits
//! `option1` / `option2` / `option3` and no array. Some themes hand-roll a
//! `values` array. Values are normally strings but numeric values (`2`) have
//! been seen on hand-written fixtures.
//!
//! ### `price` / `compare_at_price`
//! Liquid emits integers in minor units (`2000`). `products.json` emits
//! decimal strings in major units (`"20.00"`). `compare_at_price` is `null`
//! when no sale is active.
//!
//! ### Media reference
//! `featured_media` (object with `id` and `preview_image.src`) on newer
//! themes, `featured_image` (object with `id` and `src`) on older ones,
//! `image_id` on `products.json`.

use serde::Deserialize;

/// Top-level catalog document. Variants are kept as raw JSON so that one
/// malformed variant can be skipped without losing the rest.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct RawCatalog {
    #[serde(default)]
    pub options: Vec<RawOption>,

    #[serde(default)]
    pub variants: Vec<serde_json::Value>,

    #[serde(default)]
    pub media: Vec<serde_json::Value>,

    #[serde(default)]
    pub images: Vec<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum RawOption {
    Name(String),
    Object(RawOptionObject),
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawOptionObject {
    pub name: String,
    /// 1-based position.
    #[serde(default)]
    pub position: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawVariant {
    pub id: RawId,

    #[serde(default)]
    pub options: Option<Vec<serde_json::Value>>,

    #[serde(default)]
    pub values: Option<Vec<serde_json::Value>>,

    #[serde(default)]
    pub option1: Option<serde_json::Value>,

    #[serde(default)]
    pub option2: Option<serde_json::Value>,

    #[serde(default)]
    pub option3: Option<serde_json::Value>,

    #[serde(default)]
    pub price: Option<RawAmount>,

    #[serde(default)]
    pub compare_at_price: Option<RawAmount>,

    /// Treated as `false` (sold out) when absent.
    #[serde(default)]
    pub available: Option<bool>,

    #[serde(default)]
    pub featured_media: Option<RawMedia>,

    #[serde(default)]
    pub featured_image: Option<RawImageRef>,

    #[serde(default)]
    pub image_id: Option<RawId>,
}

/// Numeric or string identifier.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub(crate) enum RawId {
    Number(serde_json::Number),
    Text(String),
}

impl RawId {
    pub fn into_string(self) -> Option<String> {
        let s = match self {
            RawId::Number(n) => n.to_string(),
            RawId::Text(s) => s.trim().to_string(),
        };
        (!s.is_empty()).then_some(s)
    }
}

/// Price as emitted by either JSON flavour.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub(crate) enum RawAmount {
    Integer(i64),
    Float(f64),
    Text(String),
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct RawMedia {
    #[serde(default)]
    pub id: Option<RawId>,

    #[serde(default)]
    pub src: Option<String>,

    #[serde(default)]
    pub preview_image: Option<RawImage>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct RawImage {
    #[serde(default)]
    pub id: Option<RawId>,

    #[serde(default)]
    pub src: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum RawImageRef {
    Src(String),
    Object(RawImage),
}
