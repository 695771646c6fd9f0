//! Normalization from the raw catalog document to [`Catalog`].
//!
//! Every heterogeneous field encoding is collapsed here into the fixed
//! `values[]` tuple shape. Individual variants that fail to deserialize are
//! skipped with a warning; the document as a whole only fails when it is not
//! JSON, not an object, or yields no variants at all.

use std::str::FromStr;

use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;

use super::raw::{RawAmount, RawCatalog, RawId, RawImageRef, RawMedia, RawOption, RawVariant};
use super::{Catalog, CatalogError, MediaSource, MinorUnits, Variant};

/// Parses and normalizes a catalog document.
///
/// # Errors
///
/// Returns [`CatalogError`] if the document is not valid JSON, its root is
/// not an object, or it contains no usable variants. Callers that want the
/// degrade-to-empty behaviour should use [`Catalog::from_json`].
pub fn parse_catalog(json: &str) -> Result<Catalog, CatalogError> {
    let value: serde_json::Value = serde_json::from_str(json)?;
    if !value.is_object() {
        return Err(CatalogError::NotAnObject);
    }
    let raw: RawCatalog = serde_json::from_value(value)?;
    normalize_catalog(raw)
}

pub(crate) fn normalize_catalog(raw: RawCatalog) -> Result<Catalog, CatalogError> {
    let variants: Vec<Variant> = raw
        .variants
        .into_iter()
        .enumerate()
        .filter_map(
            |(idx, value)| match serde_json::from_value::<RawVariant>(value) {
                Ok(variant) => normalize_variant(variant),
                Err(e) => {
                    tracing::warn!(index = idx, error = %e, "skipping malformed variant");
                    None
                }
            },
        )
        .collect();

    if variants.is_empty() {
        return Err(CatalogError::NoVariants);
    }

    let widest = variants.iter().map(|v| v.values.len()).max().unwrap_or(0);
    let names = option_names(raw.options, widest);

    let mut media: Vec<MediaSource> = raw
        .media
        .into_iter()
        .filter_map(|value| serde_json::from_value::<RawMedia>(value).ok())
        .filter_map(media_source)
        .collect();
    media.extend(
        raw.images
            .into_iter()
            .filter_map(|value| serde_json::from_value::<RawImageRef>(value).ok())
            .filter_map(image_source),
    );

    Ok(Catalog::new(&names, variants).with_media(media))
}

/// Orders option names by their declared 1-based position when every option
/// declares one; otherwise keeps document order. With no declared options,
/// names are synthesized from the widest variant tuple.
fn option_names(raw: Vec<RawOption>, widest: usize) -> Vec<String> {
    if raw.is_empty() {
        return (1..=widest).map(|n| format!("Option {n}")).collect();
    }

    let mut entries: Vec<(Option<usize>, String)> = raw
        .into_iter()
        .map(|option| match option {
            RawOption::Name(name) => (None, name),
            RawOption::Object(obj) => (obj.position, obj.name),
        })
        .collect();

    if entries.iter().all(|(position, _)| position.is_some()) {
        entries.sort_by_key(|(position, _)| *position);
    }

    entries.into_iter().map(|(_, name)| name).collect()
}

fn normalize_variant(raw: RawVariant) -> Option<Variant> {
    let Some(id) = raw.id.into_string() else {
        tracing::warn!("skipping variant with blank id");
        return None;
    };

    let values = match (raw.options, raw.values) {
        (Some(list), _) | (None, Some(list)) => list.iter().map(scalar_to_string).collect(),
        (None, None) => indexed_values([raw.option1, raw.option2, raw.option3]),
    };

    let media_id = raw
        .featured_media
        .as_ref()
        .and_then(|m| m.id.clone())
        .or_else(|| match &raw.featured_image {
            Some(RawImageRef::Object(image)) => image.id.clone(),
            _ => None,
        })
        .or(raw.image_id)
        .and_then(RawId::into_string);

    let media_src = raw
        .featured_media
        .and_then(|m| m.preview_image.and_then(|p| p.src).or(m.src))
        .or_else(|| match raw.featured_image {
            Some(RawImageRef::Src(src)) => Some(src),
            Some(RawImageRef::Object(image)) => image.src,
            None => None,
        })
        .filter(|s| !s.trim().is_empty());

    Some(Variant {
        id,
        values,
        price: amount_to_minor(raw.price),
        compare_at_price: amount_to_minor(raw.compare_at_price),
        available: raw.available.unwrap_or(false),
        media_id,
        media_src,
    })
}

/// Collects `option1..option3`, stopping after the last present field.
/// Gaps before that are filled with the empty string.
fn indexed_values(fields: [Option<serde_json::Value>; 3]) -> Vec<String> {
    let last_present = fields
        .iter()
        .rposition(|f| f.as_ref().is_some_and(|v| !v.is_null()));
    match last_present {
        None => Vec::new(),
        Some(last) => fields[..=last]
            .iter()
            .map(|f| f.as_ref().map(scalar_to_string).unwrap_or_default())
            .collect(),
    }
}

fn scalar_to_string(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Number(n) => n.to_string(),
        serde_json::Value::Bool(b) => b.to_string(),
        _ => String::new(),
    }
}

/// Converts a raw price to minor units.
///
/// Integers and digit-only strings are already minor units. Decimal strings
/// are major units (`"20.00"` → `2000`). Floats are truncated minor units.
/// Anything negative or unparseable is `0`.
pub(crate) fn amount_to_minor(raw: Option<RawAmount>) -> MinorUnits {
    match raw {
        None => 0,
        Some(RawAmount::Integer(n)) => u64::try_from(n).unwrap_or(0),
        Some(RawAmount::Float(f)) => Decimal::from_f64(f)
            .filter(|d| d.is_sign_positive())
            .and_then(|d| d.trunc().to_u64())
            .unwrap_or(0),
        Some(RawAmount::Text(s)) => parse_amount_text(&s),
    }
}

fn parse_amount_text(s: &str) -> MinorUnits {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return 0;
    }
    if trimmed.bytes().all(|b| b.is_ascii_digit()) {
        return trimmed.parse::<u64>().unwrap_or(0);
    }
    Decimal::from_str(trimmed)
        .ok()
        .filter(|d| d.is_sign_positive())
        .and_then(|d| (d * Decimal::ONE_HUNDRED).round().to_u64())
        .unwrap_or(0)
}

fn media_source(raw: RawMedia) -> Option<MediaSource> {
    let src = raw.preview_image.and_then(|p| p.src).or(raw.src);
    let id = raw.id.and_then(RawId::into_string)?;
    Some(MediaSource { id, src })
}

/// Bare-string images have no ID of their own; their URL stands in for one.
fn image_source(raw: RawImageRef) -> Option<MediaSource> {
    match raw {
        RawImageRef::Src(src) if !src.trim().is_empty() => Some(MediaSource {
            id: src.clone(),
            src: Some(src),
        }),
        RawImageRef::Src(_) => None,
        RawImageRef::Object(image) => {
            let id = image
                .id
                .and_then(RawId::into_string)
                .or_else(|| image.src.clone())?;
            Some(MediaSource { id, src: image.src })
        }
    }
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
