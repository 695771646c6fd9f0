//! Variant selection and derived-view engine for product pages that sell
//! bundles ("packs") of a product.

pub mod catalog;
pub mod config;
pub mod configurator;
pub mod media;
pub mod money;
pub mod pack;
pub mod resolve;
pub mod selection;
pub mod sticky;
pub mod view;

use thiserror::Error;

pub use catalog::{
    parse_catalog, Catalog, CatalogError, MediaSource, MinorUnits, ProductOption, Variant,
};
pub use config::{load_widget_config_file, load_widget_config_from_env, WidgetConfig};
pub use configurator::{Configurator, PackSource, SubmitError, Submitter, Update};
pub use media::{normalize_locator, Gallery, MediaItem};
pub use money::{
    fallback_format, FormatError, LocaleFormatter, Money, MoneyFormatter, TemplateFormatter,
};
pub use pack::{parse_pack_size, PackDesignation, PackOverrides, DEFAULT_PACK_SIZES};
pub use resolve::{resolve, resolve_for_pack_size, MatchKind, Resolution};
pub use selection::SelectionState;
pub use sticky::{compute_sticky_visibility, StickyVisibility, Surface, ViewportSample};
pub use view::{
    visible_compare_at, CallToAction, DerivedView, FormattedOffer, FormattedView, LineItem,
    OfferCard, PriceCluster, Projector,
};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    FileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file: {0}")]
    FileParse(#[source] serde_yaml::Error),
}
