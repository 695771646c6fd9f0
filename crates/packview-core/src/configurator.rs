//! The single mutator context for one product widget.
//!
//! All four mutation paths (option pickers, pack radios, pack pick buttons and
//! the sticky pack control) funnel into [`Configurator::refresh`], which
//! fills the selection, resolves, reconciles and projects in one synchronous
//! step. Collaborators render the returned [`Update`] and nothing else.

use thiserror::Error;

use crate::catalog::{Catalog, Variant};
use crate::config::WidgetConfig;
use crate::media::Gallery;
use crate::money::{Money, TemplateFormatter};
use crate::pack::PackDesignation;
use crate::resolve::{resolve, resolve_for_pack_size};
use crate::selection::SelectionState;
use crate::view::{DerivedView, FormattedView, LineItem, Projector};

/// Which control changed the pack size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackSource {
    Radio,
    /// Offer card "pick" button; also asks the host to bring the form into view.
    PickButton,
    Sticky,
}

/// Result of one interaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Update {
    pub view: DerivedView,
    /// The host should scroll the main form into view.
    pub focus_form: bool,
}

#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("the selected variant is sold out")]
    SoldOut,

    #[error("submission rejected: {0}")]
    Rejected(String),
}

/// Host capability that posts a line item to the commerce backend.
pub trait Submitter {
    /// # Errors
    ///
    /// Returns [`SubmitError::Rejected`] when the backend refuses the line.
    fn submit(&mut self, line: &LineItem) -> Result<(), SubmitError>;
}

#[derive(Debug)]
pub struct Configurator {
    catalog: Catalog,
    pack: PackDesignation,
    config: WidgetConfig,
    money: Money,
    selection: SelectionState,
    /// Index into `catalog.variants`.
    resolved: Option<usize>,
    pack_size: u32,
    gallery: Gallery,
    view: DerivedView,
}

impl Configurator {
    /// Builds the widget state and performs the initial resolution.
    ///
    /// A configured `initial_variant_id` that exists in the catalog seeds the
    /// selection and wins over `default_pack`. Otherwise the selection starts
    /// from the first variant with the default pack size applied.
    #[must_use]
    pub fn new(catalog: Catalog, config: WidgetConfig) -> Self {
        let gallery = Gallery::from_catalog(&catalog);
        Self::with_gallery(catalog, config, gallery)
    }

    #[must_use]
    pub fn with_gallery(catalog: Catalog, config: WidgetConfig, gallery: Gallery) -> Self {
        let pack = PackDesignation::detect_with(&catalog, config.pack_overrides());

        let mut money = Money::new(config.currency_code.clone(), config.locale.clone());
        if let Some(template) = &config.money_format {
            money = money.with_host(Box::new(TemplateFormatter::new(template.clone())));
        }

        let initial = config
            .initial_variant_id
            .as_deref()
            .and_then(|id| catalog.position_of(id));

        let selection = match initial.and_then(|idx| catalog.variants.get(idx)) {
            Some(variant) => SelectionState::from_variant(variant),
            None => SelectionState::new(catalog.option_count()),
        };

        let pack_size = pack.normalize_size(config.default_pack, &config.pack_sizes);

        let mut configurator = Self {
            catalog,
            pack,
            config,
            money,
            selection,
            resolved: initial,
            pack_size,
            gallery,
            view: DerivedView::default(),
        };

        if initial.is_none() {
            configurator.apply_pack_to_selection();
        }
        configurator.refresh();

        tracing::debug!(
            variants = configurator.catalog.variants.len(),
            pack_active = configurator.pack.is_active(),
            pack_size = configurator.pack_size,
            variant_id = ?configurator.view.variant_id,
            "configurator initialized"
        );
        configurator
    }

    // -----------------------------------------------------------------------
    // Mutation paths
    // -----------------------------------------------------------------------

    /// An option picker changed. Out-of-range indexes are ignored but still
    /// produce a fresh view.
    pub fn select_option(&mut self, index: usize, value: impl Into<String>) -> Update {
        if !self.selection.set(index, value) {
            tracing::warn!(index, "option index out of range");
        }
        self.refresh();
        Update {
            view: self.view.clone(),
            focus_form: false,
        }
    }

    /// A pack radio, pick button or the sticky pack control changed.
    ///
    /// The size is clamped to an offered size. With pack semantics the pack
    /// option slot moves to that size's canonical value and the variant is
    /// re-resolved; without, only the multiplier changes.
    pub fn choose_pack(&mut self, size: u32, source: PackSource) -> Update {
        let normalized = self.pack.normalize_size(size, &self.config.pack_sizes);
        if normalized != size {
            tracing::debug!(requested = size, normalized, ?source, "pack size clamped");
        }
        self.pack_size = normalized;
        self.apply_pack_to_selection();
        self.refresh();
        Update {
            view: self.view.clone(),
            focus_form: source == PackSource::PickButton,
        }
    }

    /// A gallery thumbnail was clicked. Does not touch the selection.
    pub fn select_media(&mut self, media_id: &str) -> bool {
        let changed = self.gallery.activate(media_id);
        if changed {
            self.view.active_media_id = Some(media_id.to_string());
        }
        changed
    }

    /// Submits the current line item. Main and sticky submit buttons both
    /// land here.
    ///
    /// # Errors
    ///
    /// Returns [`SubmitError::SoldOut`] without calling the submitter when
    /// nothing purchasable is selected, and forwards the submitter's error
    /// otherwise.
    pub fn submit(&self, submitter: &mut dyn Submitter) -> Result<LineItem, SubmitError> {
        let line = self.view.line_item.clone().ok_or(SubmitError::SoldOut)?;
        submitter.submit(&line)?;
        tracing::info!(
            variant_id = %line.variant_id,
            quantity = line.quantity,
            "line item submitted"
        );
        Ok(line)
    }

    // -----------------------------------------------------------------------
    // Read-only capabilities
    // -----------------------------------------------------------------------

    #[must_use]
    pub fn view(&self) -> &DerivedView {
        &self.view
    }

    #[must_use]
    pub fn formatted_view(&self) -> FormattedView {
        self.view.format(&self.money)
    }

    #[must_use]
    pub fn resolved_variant(&self) -> Option<&Variant> {
        self.resolved.and_then(|idx| self.catalog.variants.get(idx))
    }

    #[must_use]
    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    #[must_use]
    pub fn pack_size(&self) -> u32 {
        self.pack_size
    }

    #[must_use]
    pub fn pack(&self) -> &PackDesignation {
        &self.pack
    }

    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    #[must_use]
    pub fn gallery(&self) -> &Gallery {
        &self.gallery
    }

    #[must_use]
    pub fn money(&self) -> &Money {
        &self.money
    }

    #[must_use]
    pub fn config(&self) -> &WidgetConfig {
        &self.config
    }

    /// Previews the variant for bundle `size` against the live selection.
    /// The live selection is never modified.
    #[must_use]
    pub fn resolve_for_pack_size(&self, size: u32) -> Option<&Variant> {
        let filled = self.filled_selection();
        resolve_for_pack_size(&self.catalog, &self.pack, &filled, size).map(|r| r.variant)
    }

    // -----------------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------------

    fn filled_selection(&self) -> Vec<String> {
        self.selection.filled(self.resolved_variant(), &self.catalog)
    }

    fn apply_pack_to_selection(&mut self) {
        let slot = self
            .pack
            .option_index()
            .zip(self.pack.value_for_size(self.pack_size));
        if let Some((index, value)) = slot {
            let value = value.to_string();
            self.selection.set(index, value);
        }
    }

    /// Fill → resolve → reconcile → project. The only place the resolved
    /// variant, the selection and the view change together.
    fn refresh(&mut self) {
        let filled = self.filled_selection();
        let resolution = resolve(&self.catalog, &self.pack, &filled);

        self.resolved = resolution.map(|r| r.index);

        let displayed = match resolution {
            Some(res) => {
                self.selection.reconcile(res.variant);
                if let Some(size) = self
                    .pack
                    .option_index()
                    .and_then(|idx| res.variant.value(idx))
                    .and_then(|raw| self.pack.size_of(raw))
                {
                    self.pack_size = size;
                }
                res.variant.values.clone()
            }
            None => filled,
        };

        let projector = Projector::new(&self.catalog, &self.pack, &self.config);
        let view = projector.project(resolution, &displayed, self.pack_size, &self.gallery);

        if let Some(media_id) = &view.active_media_id {
            self.gallery.activate(media_id);
        }
        self.view = view;
    }
}

#[cfg(test)]
#[path = "configurator_test.rs"]
mod tests;
