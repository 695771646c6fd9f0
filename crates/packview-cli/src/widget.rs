//! Command handlers that drive a [`Configurator`] from the command line.
//!
//! Every handler prints one JSON document to stdout. Logs go to stderr so the
//! output stays pipeable.

use std::path::Path;

use anyhow::Context;
use clap::ValueEnum;
use serde::Serialize;

use packview_core::{
    parse_catalog, resolve, resolve_for_pack_size, Catalog, Configurator, DerivedView,
    FormattedOffer, FormattedView, MatchKind, Money, OfferCard, PackSource, SelectionState,
    StickyVisibility, Surface, TemplateFormatter, Variant, WidgetConfig,
};

/// Pack control names accepted by `--source`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PackSourceArg {
    Radio,
    Pick,
    Sticky,
}

impl From<PackSourceArg> for PackSource {
    fn from(arg: PackSourceArg) -> Self {
        match arg {
            PackSourceArg::Radio => PackSource::Radio,
            PackSourceArg::Pick => PackSource::PickButton,
            PackSourceArg::Sticky => PackSource::Sticky,
        }
    }
}

/// Reads widget options from `path`, or from `PACKVIEW_*` env vars when no
/// file is given.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not a YAML mapping.
pub(crate) fn load_config(path: Option<&Path>) -> anyhow::Result<WidgetConfig> {
    match path {
        Some(path) => packview_core::load_widget_config_file(path)
            .with_context(|| format!("loading widget config from {}", path.display())),
        None => Ok(packview_core::load_widget_config_from_env()),
    }
}

/// Reads and normalizes a catalog document.
///
/// Unlike the widget itself, the CLI refuses to run against an unusable
/// catalog instead of rendering an empty one.
///
/// # Errors
///
/// Returns an error if no path is given, the file cannot be read, or the
/// document has no usable variants.
pub(crate) fn load_catalog(path: Option<&Path>) -> anyhow::Result<Catalog> {
    let path = path.context("no catalog given; pass --catalog or set PACKVIEW_CATALOG_PATH")?;
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("reading catalog {}", path.display()))?;
    let catalog =
        parse_catalog(&json).with_context(|| format!("parsing catalog {}", path.display()))?;
    tracing::info!(
        path = %path.display(),
        options = catalog.option_count(),
        variants = catalog.variants.len(),
        "catalog loaded"
    );
    if !catalog.has_available_variants() {
        tracing::warn!(path = %path.display(), "every variant in the catalog is sold out");
    }
    Ok(catalog)
}

/// Parses `Name=Value` or `index=Value` into an option index and value.
///
/// # Errors
///
/// Returns an error if the argument has no `=` or names an unknown option.
pub(crate) fn parse_selection_arg(
    catalog: &Catalog,
    arg: &str,
) -> anyhow::Result<(usize, String)> {
    let (key, value) = arg
        .split_once('=')
        .with_context(|| format!("selection '{arg}' must look like OPTION=VALUE"))?;
    let key = key.trim();

    let index = match key.parse::<usize>() {
        Ok(index) if index < catalog.option_count() => index,
        Ok(index) => anyhow::bail!(
            "option index {index} out of range (catalog has {} options)",
            catalog.option_count()
        ),
        Err(_) => catalog
            .option_index(key)
            .with_context(|| format!("unknown option '{key}'"))?,
    };
    Ok((index, value.trim().to_string()))
}

fn apply_selections(configurator: &mut Configurator, select: &[String]) -> anyhow::Result<()> {
    for arg in select {
        let (index, value) = parse_selection_arg(configurator.catalog(), arg)?;
        tracing::debug!(index, value = %value, "applying selection");
        configurator.select_option(index, value);
    }
    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    let out = serde_json::to_string_pretty(value).context("serializing output")?;
    println!("{out}");
    Ok(())
}

#[derive(Debug, Serialize)]
struct VariantReport<'a> {
    id: &'a str,
    values: &'a [String],
    price: u64,
    compare_at_price: u64,
    available: bool,
}

impl<'a> From<&'a Variant> for VariantReport<'a> {
    fn from(v: &'a Variant) -> Self {
        Self {
            id: &v.id,
            values: &v.values,
            price: v.price,
            compare_at_price: v.compare_at_price,
            available: v.available,
        }
    }
}

#[derive(Debug, Serialize)]
struct ResolveReport<'a> {
    selection: Vec<String>,
    match_kind: Option<MatchKind>,
    variant: Option<VariantReport<'a>>,
    pack_size: Option<u32>,
    preview: Option<PreviewReport<'a>>,
}

#[derive(Debug, Serialize)]
struct PreviewReport<'a> {
    pack_size: u32,
    variant: Option<VariantReport<'a>>,
}

/// Builds the full value tuple for `select` in one pass.
///
/// Explicit values win; every other slot comes from the widget's initial
/// variant, then the catalog's first variant. The result does not depend on
/// argument order.
///
/// # Errors
///
/// Returns an error if a selection argument is invalid.
pub(crate) fn selection_tuple(
    configurator: &Configurator,
    select: &[String],
) -> anyhow::Result<Vec<String>> {
    let catalog = configurator.catalog();
    let mut selection = SelectionState::new(catalog.option_count());
    for arg in select {
        let (index, value) = parse_selection_arg(catalog, arg)?;
        selection.set(index, value);
    }
    Ok(selection.filled(configurator.resolved_variant(), catalog))
}

/// Resolves the selection and, with `pack`, previews that pack size.
///
/// # Errors
///
/// Returns an error if a selection argument is invalid.
pub(crate) fn run_resolve(
    catalog: Catalog,
    config: WidgetConfig,
    select: &[String],
    pack: Option<u32>,
) -> anyhow::Result<()> {
    let configurator = Configurator::new(catalog, config);
    let tuple = selection_tuple(&configurator, select)?;
    let catalog = configurator.catalog();
    let designation = configurator.pack();
    let resolution = resolve(catalog, designation, &tuple);
    tracing::debug!(selection = ?tuple, kind = ?resolution.map(|r| r.kind), "resolved");

    let report = ResolveReport {
        match_kind: resolution.map(|r| r.kind),
        variant: resolution.map(|r| VariantReport::from(r.variant)),
        pack_size: resolution.and_then(|r| {
            let value = r.variant.value(designation.option_index()?)?;
            designation.size_of(value)
        }),
        preview: pack.map(|size| PreviewReport {
            pack_size: size,
            variant: resolve_for_pack_size(catalog, designation, &tuple, size)
                .map(|r| VariantReport::from(r.variant)),
        }),
        selection: tuple,
    };
    print_json(&report)
}

#[derive(Debug, Serialize)]
struct ViewReport<'a> {
    view: &'a DerivedView,
    formatted: FormattedView,
    focus_form: bool,
}

/// Applies selections, an optional pack choice and an optional media click,
/// then prints the resulting view.
///
/// # Errors
///
/// Returns an error if a selection argument is invalid.
pub(crate) fn run_view(
    catalog: Catalog,
    config: WidgetConfig,
    select: &[String],
    pack: Option<u32>,
    source: PackSourceArg,
    media: Option<&str>,
) -> anyhow::Result<()> {
    let mut configurator = Configurator::new(catalog, config);
    apply_selections(&mut configurator, select)?;

    let focus_form =
        pack.is_some_and(|size| configurator.choose_pack(size, source.into()).focus_form);

    if let Some(id) = media {
        if !configurator.select_media(id) {
            tracing::warn!(media_id = id, "unknown media id, gallery unchanged");
        }
    }

    print_json(&ViewReport {
        view: configurator.view(),
        formatted: configurator.formatted_view(),
        focus_form,
    })
}

#[derive(Debug, Serialize)]
struct OfferReport<'a> {
    #[serde(flatten)]
    card: &'a OfferCard,
    formatted: &'a FormattedOffer,
}

/// Prints one entry per offer card with raw and formatted amounts.
///
/// # Errors
///
/// Returns an error if a selection argument is invalid.
pub(crate) fn run_offers(
    catalog: Catalog,
    config: WidgetConfig,
    select: &[String],
    pack: Option<u32>,
) -> anyhow::Result<()> {
    let mut configurator = Configurator::new(catalog, config);
    apply_selections(&mut configurator, select)?;
    if let Some(size) = pack {
        configurator.choose_pack(size, PackSource::Radio);
    }

    let formatted = configurator.formatted_view();
    let report: Vec<OfferReport<'_>> = configurator
        .view()
        .offers
        .iter()
        .zip(&formatted.offers)
        .map(|(card, formatted)| OfferReport { card, formatted })
        .collect();
    print_json(&report)
}

#[derive(Debug, Serialize)]
struct StickyReport {
    narrow: bool,
    show: bool,
    aria_hidden: bool,
}

/// # Errors
///
/// Returns an error if the report cannot be serialized.
pub(crate) fn run_sticky(
    config: &WidgetConfig,
    hero: bool,
    form: bool,
    footer: bool,
    width: u32,
) -> anyhow::Result<()> {
    let mut sticky = StickyVisibility::new();
    let narrow = width <= config.narrow_breakpoint_px;
    sticky.set_viewport_width(width, config.narrow_breakpoint_px);
    sticky.update(Surface::Hero, hero);
    sticky.update(Surface::Form, form);
    sticky.update(Surface::Footer, footer);

    print_json(&StickyReport {
        narrow,
        show: sticky.show(),
        aria_hidden: sticky.aria_hidden(),
    })
}

/// Formats `cents` with the configured money chain, optionally overriding
/// currency and locale.
pub(crate) fn run_format(
    config: &WidgetConfig,
    cents: u64,
    currency: Option<String>,
    locale: Option<String>,
) {
    let currency = currency.map_or_else(
        || config.currency_code.clone(),
        |c| c.trim().to_ascii_uppercase(),
    );
    let locale = locale.unwrap_or_else(|| config.locale.clone());

    let mut money = Money::new(currency, locale);
    if let Some(template) = &config.money_format {
        money = money.with_host(Box::new(TemplateFormatter::new(template.clone())));
    }
    println!("{}", money.format(cents));
}
