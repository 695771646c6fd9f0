//! The shopper's per-option choices.
//!
//! Slots are sparse while the shopper is interacting and are filled to a full
//! tuple only at resolution time.

use serde::Serialize;

use crate::catalog::{Catalog, Variant};

/// One slot per option index, each unset or holding a raw value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SelectionState {
    slots: Vec<Option<String>>,
}

impl SelectionState {
    /// An all-unset selection for a catalog with `option_count` options.
    #[must_use]
    pub fn new(option_count: usize) -> Self {
        Self {
            slots: vec![None; option_count],
        }
    }

    /// A selection with every slot set from `variant`'s tuple.
    #[must_use]
    pub fn from_variant(variant: &Variant) -> Self {
        Self {
            slots: variant.values.iter().cloned().map(Some).collect(),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&str> {
        self.slots.get(index).and_then(Option::as_deref)
    }

    /// Sets slot `index`. Returns `false` and leaves the selection untouched
    /// when the index is out of range.
    pub fn set(&mut self, index: usize, value: impl Into<String>) -> bool {
        match self.slots.get_mut(index) {
            Some(slot) => {
                *slot = Some(value.into());
                true
            }
            None => false,
        }
    }

    /// Full value tuple for resolution.
    ///
    /// Each slot is taken from, in priority order: this selection, the
    /// currently resolved variant, the catalog's first variant. A slot with no
    /// source at all (empty catalog) is the empty string.
    #[must_use]
    pub fn filled(&self, resolved: Option<&Variant>, catalog: &Catalog) -> Vec<String> {
        let first = catalog.first_variant();
        (0..catalog.option_count().max(self.slots.len()))
            .map(|idx| {
                self.get(idx)
                    .or_else(|| resolved.and_then(|v| v.value(idx)))
                    .or_else(|| first.and_then(|v| v.value(idx)))
                    .unwrap_or_default()
                    .to_string()
            })
            .collect()
    }

    /// Rewrites every slot to `variant`'s own tuple so option controls never
    /// disagree with the active variant.
    pub fn reconcile(&mut self, variant: &Variant) {
        self.slots = variant.values.iter().cloned().map(Some).collect();
    }
}
