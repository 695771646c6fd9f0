//! Derived view projection.
//!
//! Every display-facing value is computed here from one resolved variant plus
//! the selection and pack state. Nothing is patched incrementally: each
//! selection change produces a fresh [`DerivedView`].

use serde::Serialize;

use crate::catalog::{Catalog, MinorUnits, Variant};
use crate::config::WidgetConfig;
use crate::media::Gallery;
use crate::money::Money;
use crate::pack::PackDesignation;
use crate::resolve::{resolve_for_pack_size, MatchKind, Resolution};

/// Compare-at amount to display, if any. Shown only when strictly above both
/// the displayed price and zero.
#[must_use]
pub fn visible_compare_at(price: MinorUnits, compare_at: MinorUnits) -> Option<MinorUnits> {
    (compare_at > price && compare_at > 0).then_some(compare_at)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PriceCluster {
    pub unit_price: MinorUnits,
    /// Pack size when quantity multiplies one variant, else `1`.
    pub multiplier: u32,
    pub price: MinorUnits,
    pub compare_at_price: Option<MinorUnits>,
}

impl PriceCluster {
    /// With pack semantics active the bundle price is already the variant's
    /// price, so the multiplier is `1`.
    #[must_use]
    pub fn compute(variant: &Variant, pack_size: u32, pack_active: bool) -> Self {
        let multiplier = if pack_active { 1 } else { pack_size.max(1) };
        let price = variant.price.saturating_mul(u64::from(multiplier));
        let compare = variant
            .compare_at_price
            .saturating_mul(u64::from(multiplier));
        Self {
            unit_price: variant.price,
            multiplier,
            price,
            compare_at_price: visible_compare_at(price, compare),
        }
    }
}

/// One bundle size, priced independently of the global selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OfferCard {
    pub size: u32,
    pub variant_id: Option<String>,
    pub price: Option<MinorUnits>,
    pub compare_at_price: Option<MinorUnits>,
    pub available: bool,
    /// `false` when the catalog has no variant for this size (assortment gap).
    pub selectable: bool,
    /// This card's size is the current pack size.
    pub active: bool,
}

impl OfferCard {
    fn gap(size: u32, active: bool) -> Self {
        Self {
            size,
            variant_id: None,
            price: None,
            compare_at_price: None,
            available: false,
            selectable: false,
            active,
        }
    }
}

/// Add-to-cart button state, shared by the main form and the sticky bar.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CallToAction {
    pub enabled: bool,
    pub label: String,
}

/// What a submit would send to the commerce backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LineItem {
    pub variant_id: String,
    pub quantity: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DerivedView {
    pub variant_id: Option<String>,
    pub match_kind: Option<MatchKind>,
    /// Option values the controls should display.
    pub selection: Vec<String>,
    pub pack_active: bool,
    pub pack_size: u32,
    pub price: Option<PriceCluster>,
    pub sold_out: bool,
    pub offers: Vec<OfferCard>,
    pub active_media_id: Option<String>,
    pub call_to_action: CallToAction,
    pub line_item: Option<LineItem>,
}

/// Amounts from a [`DerivedView`] rendered through a [`Money`] chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormattedView {
    pub price: Option<String>,
    pub compare_at_price: Option<String>,
    pub sticky_price: Option<String>,
    pub offers: Vec<FormattedOffer>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormattedOffer {
    pub size: u32,
    pub price: Option<String>,
    pub compare_at_price: Option<String>,
    pub available: bool,
    pub selectable: bool,
    pub active: bool,
}

impl DerivedView {
    #[must_use]
    pub fn format(&self, money: &Money) -> FormattedView {
        let price = self.price.map(|p| money.format(p.price));
        FormattedView {
            compare_at_price: self
                .price
                .and_then(|p| p.compare_at_price)
                .map(|c| money.format(c)),
            sticky_price: price.clone(),
            price,
            offers: self
                .offers
                .iter()
                .map(|card| FormattedOffer {
                    size: card.size,
                    price: card.price.map(|p| money.format(p)),
                    compare_at_price: card.compare_at_price.map(|c| money.format(c)),
                    available: card.available,
                    selectable: card.selectable,
                    active: card.active,
                })
                .collect(),
        }
    }
}

/// Projects resolved state into a [`DerivedView`].
#[derive(Debug, Clone, Copy)]
pub struct Projector<'a> {
    catalog: &'a Catalog,
    pack: &'a PackDesignation,
    config: &'a WidgetConfig,
}

impl<'a> Projector<'a> {
    #[must_use]
    pub fn new(catalog: &'a Catalog, pack: &'a PackDesignation, config: &'a WidgetConfig) -> Self {
        Self {
            catalog,
            pack,
            config,
        }
    }

    /// Builds the full view. The gallery is only read: when the variant
    /// names no matching media the currently active item is kept.
    #[must_use]
    pub fn project(
        &self,
        resolution: Option<Resolution<'_>>,
        selection: &[String],
        pack_size: u32,
        gallery: &Gallery,
    ) -> DerivedView {
        let variant = resolution.map(|r| r.variant);
        let pack_active = self.pack.is_active();
        let sold_out = variant.is_none_or(|v| !v.available);

        let active_media_id = variant
            .and_then(|v| gallery.match_variant(v))
            .or_else(|| gallery.active_id())
            .map(str::to_string);

        let call_to_action = CallToAction {
            enabled: !sold_out,
            label: if sold_out {
                self.config.sold_out_text.clone()
            } else {
                self.config.add_to_cart_text.clone()
            },
        };

        let line_item = variant.filter(|_| !sold_out).map(|v| LineItem {
            variant_id: v.id.clone(),
            quantity: if pack_active { 1 } else { pack_size.max(1) },
        });

        DerivedView {
            variant_id: variant.map(|v| v.id.clone()),
            match_kind: resolution.map(|r| r.kind),
            selection: selection.to_vec(),
            pack_active,
            pack_size,
            price: variant.map(|v| PriceCluster::compute(v, pack_size, pack_active)),
            sold_out,
            offers: self.offers(variant, selection, pack_size),
            active_media_id,
            call_to_action,
            line_item,
        }
    }

    /// One card per offered size.
    ///
    /// With pack semantics each card resolves its own hypothetical variant;
    /// a size whose lookup lands on a different bundle size is a gap. Without
    /// pack semantics each configured size multiplies the resolved variant.
    #[must_use]
    pub fn offers(
        &self,
        resolved: Option<&Variant>,
        selection: &[String],
        pack_size: u32,
    ) -> Vec<OfferCard> {
        let Some(pack_index) = self.pack.option_index() else {
            return self
                .config
                .pack_sizes
                .iter()
                .map(|&size| match resolved {
                    Some(v) => {
                        let cluster = PriceCluster::compute(v, size, false);
                        OfferCard {
                            size,
                            variant_id: Some(v.id.clone()),
                            price: Some(cluster.price),
                            compare_at_price: cluster.compare_at_price,
                            available: v.available,
                            selectable: true,
                            active: size == pack_size,
                        }
                    }
                    None => OfferCard::gap(size, size == pack_size),
                })
                .collect();
        };

        self.pack
            .sizes()
            .map(|size| {
                let active = size == pack_size;
                let hit = resolve_for_pack_size(self.catalog, self.pack, selection, size)
                    .map(|r| r.variant)
                    .filter(|v| {
                        v.value(pack_index)
                            .and_then(|raw| self.pack.size_of(raw))
                            == Some(size)
                    });
                match hit {
                    Some(v) => OfferCard {
                        size,
                        variant_id: Some(v.id.clone()),
                        price: Some(v.price),
                        compare_at_price: visible_compare_at(v.price, v.compare_at_price),
                        available: v.available,
                        selectable: true,
                        active,
                    },
                    None => OfferCard::gap(size, active),
                }
            })
            .collect()
    }
}
