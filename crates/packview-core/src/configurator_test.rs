use super::*;
use crate::media::Gallery;
use crate::resolve::MatchKind;

fn catalog() -> Catalog {
    Catalog::new(
        &["Color", "Pack"],
        vec![
            Variant::new("1", &["Red", "1-pack"], 2000).with_media_id("m1"),
            Variant::new("2", &["Red", "2-pack"], 3600).with_compare_at(4000),
            Variant::new("3", &["Red", "4-pack"], 6800).with_available(false),
            Variant::new("4", &["Blue", "2-pack"], 3800).with_media_id("m4"),
        ],
    )
}

fn gallery() -> Gallery {
    Gallery::new([
        ("m1", Some("//cdn/red.jpg")),
        ("m2", Some("//cdn/lifestyle.jpg")),
        ("m4", Some("//cdn/blue.jpg")),
    ])
}

fn configurator() -> Configurator {
    Configurator::with_gallery(catalog(), WidgetConfig::default(), gallery())
}

#[derive(Default)]
struct Recording {
    lines: Vec<LineItem>,
}

impl Submitter for Recording {
    fn submit(&mut self, line: &LineItem) -> Result<(), SubmitError> {
        self.lines.push(line.clone());
        Ok(())
    }
}

struct Rejecting;

impl Submitter for Rejecting {
    fn submit(&mut self, _line: &LineItem) -> Result<(), SubmitError> {
        Err(SubmitError::Rejected("cart is full".into()))
    }
}

#[test]
fn initial_state_applies_default_pack_to_first_variant() {
    let c = configurator();
    assert_eq!(c.pack_size(), 2);
    assert_eq!(c.view().variant_id.as_deref(), Some("2"));
    assert_eq!(c.view().match_kind, Some(MatchKind::Exact));
    assert_eq!(c.view().selection, vec!["Red", "2-pack"]);
    assert!(!c.view().sold_out);
}

#[test]
fn initial_variant_id_wins_over_default_pack() {
    let config = WidgetConfig {
        initial_variant_id: Some("3".into()),
        ..WidgetConfig::default()
    };
    let c = Configurator::new(catalog(), config);
    assert_eq!(c.view().variant_id.as_deref(), Some("3"));
    assert_eq!(c.pack_size(), 4, "pack size follows the resolved variant");
    assert!(c.view().sold_out);
}

#[test]
fn unknown_initial_variant_id_is_ignored() {
    let config = WidgetConfig {
        initial_variant_id: Some("999".into()),
        default_pack: 1,
        ..WidgetConfig::default()
    };
    let c = Configurator::new(catalog(), config);
    assert_eq!(c.view().variant_id.as_deref(), Some("1"));
}

#[test]
fn select_option_resolves_exact_variant() {
    let mut c = configurator();
    let update = c.select_option(0, "Blue");
    assert!(!update.focus_form);
    assert_eq!(update.view.variant_id.as_deref(), Some("4"));
    assert_eq!(update.view.price.map(|p| p.price), Some(3800));
    assert_eq!(update.view.active_media_id.as_deref(), Some("m4"));
    assert_eq!(c.gallery().active_id(), Some("m4"));
}

#[test]
fn select_option_out_of_range_keeps_state() {
    let mut c = configurator();
    let before = c.view().clone();
    let update = c.select_option(7, "Green");
    assert_eq!(update.view, before);
}

#[test]
fn pack_relaxation_reconciles_selection() {
    let mut c = configurator();
    c.select_option(0, "Blue");
    let update = c.choose_pack(1, PackSource::Radio);

    // Blue has no 1-pack, so the pack axis relaxes back to Blue/2-pack.
    assert_eq!(update.view.variant_id.as_deref(), Some("4"));
    assert_eq!(update.view.match_kind, Some(MatchKind::PackRelaxed));
    assert_eq!(c.selection().get(1), Some("2-pack"));
    assert_eq!(c.pack_size(), 2);
}

#[test]
fn every_pack_path_converges_on_the_same_view() {
    let sources = [PackSource::Radio, PackSource::PickButton, PackSource::Sticky];
    let views: Vec<DerivedView> = sources
        .iter()
        .map(|&source| {
            let mut c = configurator();
            c.choose_pack(4, source).view
        })
        .collect();

    let mut by_picker = configurator();
    let picked = by_picker.select_option(1, "4-pack").view;

    for view in &views {
        assert_eq!(view, &picked);
    }
    assert_eq!(picked.variant_id.as_deref(), Some("3"));
    assert!(picked.sold_out);
    assert_eq!(picked.call_to_action.label, "Sold out");
}

#[test]
fn pick_button_requests_form_focus() {
    let mut c = configurator();
    assert!(c.choose_pack(1, PackSource::PickButton).focus_form);
    assert!(!c.choose_pack(2, PackSource::Sticky).focus_form);
    assert!(!c.choose_pack(2, PackSource::Radio).focus_form);
}

#[test]
fn unsupported_pack_size_is_clamped() {
    let mut c = configurator();
    let update = c.choose_pack(3, PackSource::Radio);
    assert_eq!(c.pack_size(), 1);
    assert_eq!(update.view.variant_id.as_deref(), Some("1"));
}

#[test]
fn virtual_resolution_does_not_touch_live_selection() {
    let mut c = configurator();
    c.select_option(0, "Blue");
    let before = c.selection().clone();

    let preview = c.resolve_for_pack_size(2).map(|v| v.id.as_str());
    assert_eq!(preview, Some("4"));
    assert_eq!(c.selection(), &before);

    c.select_option(0, "Red");
    assert_eq!(c.resolve_for_pack_size(4).map(|v| v.id.as_str()), Some("3"));
    assert_eq!(c.selection().get(1), Some("2-pack"));
}

#[test]
fn select_media_only_moves_the_gallery() {
    let mut c = configurator();
    let selection = c.selection().clone();
    assert!(c.select_media("m2"));
    assert_eq!(c.gallery().active_id(), Some("m2"));
    assert_eq!(c.view().active_media_id.as_deref(), Some("m2"));
    assert_eq!(c.selection(), &selection);
    assert!(!c.select_media("missing"));
    assert_eq!(c.gallery().active_id(), Some("m2"));
}

#[test]
fn submit_sends_the_line_item() {
    let c = configurator();
    let mut submitter = Recording::default();
    let line = c.submit(&mut submitter).expect("purchasable");
    assert_eq!(
        line,
        LineItem {
            variant_id: "2".into(),
            quantity: 1
        }
    );
    assert_eq!(submitter.lines, vec![line]);
}

#[test]
fn submit_refuses_sold_out_without_calling_host() {
    let mut c = configurator();
    c.choose_pack(4, PackSource::Radio);
    let mut submitter = Recording::default();
    let result = c.submit(&mut submitter);
    assert!(matches!(result, Err(SubmitError::SoldOut)));
    assert!(submitter.lines.is_empty());
}

#[test]
fn submit_forwards_host_rejection() {
    let c = configurator();
    let result = c.submit(&mut Rejecting);
    assert!(matches!(result, Err(SubmitError::Rejected(ref msg)) if msg == "cart is full"));
}

#[test]
fn single_sku_catalog_multiplies_quantity() {
    let catalog = Catalog::new(
        &["Color"],
        vec![Variant::new("1", &["Red"], 2000).with_compare_at(2500)],
    );
    let mut c = Configurator::new(catalog, WidgetConfig::default());
    assert!(!c.view().pack_active);
    assert_eq!(c.view().price.map(|p| p.price), Some(4000));
    assert_eq!(c.view().line_item.as_ref().map(|l| l.quantity), Some(2));

    let update = c.choose_pack(4, PackSource::Sticky);
    assert_eq!(update.view.price.map(|p| p.price), Some(8000));
    assert_eq!(update.view.price.and_then(|p| p.compare_at_price), Some(10_000));
    assert_eq!(update.view.line_item.map(|l| l.quantity), Some(4));
}

#[test]
fn money_format_template_drives_formatted_view() {
    let config = WidgetConfig {
        money_format: Some("{{amount_with_comma_separator}} EUR".into()),
        ..WidgetConfig::default()
    };
    let c = Configurator::new(catalog(), config);
    let formatted = c.formatted_view();
    assert_eq!(formatted.price.as_deref(), Some("36,00 EUR"));
    assert_eq!(formatted.compare_at_price.as_deref(), Some("40,00 EUR"));
}

#[test]
fn empty_catalog_is_sold_out() {
    let c = Configurator::new(Catalog::empty(), WidgetConfig::default());
    assert!(c.view().variant_id.is_none());
    assert!(c.view().sold_out);
    assert!(!c.view().call_to_action.enabled);
    assert!(c.resolved_variant().is_none());
}
