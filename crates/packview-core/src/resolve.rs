//! Resolution engine: full selection tuple → one catalog variant.
//!
//! Resolution is a pure function of `(catalog, pack designation, selection)`.
//! The rules are tried in order and the first hit wins; catalog order breaks
//! every tie. "No variant" is a normal outcome, not an error.
//!
//! 1. Exact tuple match, regardless of availability.
//! 2. Available variant matching every index except the pack index.
//! 3. First available variant sharing at least one selected value.
//! 4. First available variant.
//! 5. First variant.

use serde::Serialize;

use crate::catalog::{Catalog, Variant};
use crate::pack::PackDesignation;

/// Which rule produced a resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchKind {
    Exact,
    PackRelaxed,
    PartialOverlap,
    FirstAvailable,
    FirstInCatalog,
}

/// A resolved variant, its catalog position, and the rule that found it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution<'a> {
    pub index: usize,
    pub variant: &'a Variant,
    pub kind: MatchKind,
}

/// Resolves `selection` against `catalog`.
#[must_use]
pub fn resolve<'a>(
    catalog: &'a Catalog,
    pack: &PackDesignation,
    selection: &[String],
) -> Option<Resolution<'a>> {
    let found = find(catalog, MatchKind::Exact, |v| is_exact(v, selection))
        .or_else(|| {
            let pack_index = pack.option_index()?;
            find(catalog, MatchKind::PackRelaxed, |v| {
                v.available && matches_except(v, selection, pack_index)
            })
        })
        .or_else(|| {
            find(catalog, MatchKind::PartialOverlap, |v| {
                v.available && overlaps(v, selection)
            })
        })
        .or_else(|| find(catalog, MatchKind::FirstAvailable, |v| v.available))
        .or_else(|| find(catalog, MatchKind::FirstInCatalog, |_| true));

    match &found {
        Some(res) if res.kind != MatchKind::Exact => {
            tracing::debug!(
                selection = ?selection,
                variant_id = %res.variant.id,
                kind = ?res.kind,
                "selection resolved by fallback"
            );
        }
        None => tracing::debug!("catalog has no variants to resolve"),
        Some(_) => {}
    }

    found
}

/// Resolves the variant the shopper would get by switching only the pack
/// option to `size`, keeping every other selected value.
///
/// `selection` is borrowed immutably; the substitution happens on a copy.
/// Without an active pack designation, or for a size the catalog does not
/// carry, the selection is resolved as-is.
#[must_use]
pub fn resolve_for_pack_size<'a>(
    catalog: &'a Catalog,
    pack: &PackDesignation,
    selection: &[String],
    size: u32,
) -> Option<Resolution<'a>> {
    let substituted = pack.option_index().zip(pack.value_for_size(size));
    match substituted {
        Some((index, value)) if index < selection.len() => {
            let mut hypothetical = selection.to_vec();
            value.clone_into(&mut hypothetical[index]);
            resolve(catalog, pack, &hypothetical)
        }
        _ => resolve(catalog, pack, selection),
    }
}

fn find<'a>(
    catalog: &'a Catalog,
    kind: MatchKind,
    predicate: impl Fn(&Variant) -> bool,
) -> Option<Resolution<'a>> {
    catalog
        .variants
        .iter()
        .enumerate()
        .find(|(_, v)| predicate(v))
        .map(|(index, variant)| Resolution {
            index,
            variant,
            kind,
        })
}

fn is_exact(variant: &Variant, selection: &[String]) -> bool {
    variant.values.len() == selection.len()
        && variant.values.iter().zip(selection).all(|(a, b)| a == b)
}

fn matches_except(variant: &Variant, selection: &[String], skip: usize) -> bool {
    variant.values.len() == selection.len()
        && variant
            .values
            .iter()
            .zip(selection)
            .enumerate()
            .all(|(idx, (a, b))| idx == skip || a == b)
}

/// Blank values are padding, not choices, and never count as overlap.
fn overlaps(variant: &Variant, selection: &[String]) -> bool {
    variant
        .values
        .iter()
        .zip(selection)
        .any(|(a, b)| !b.is_empty() && a == b)
}
