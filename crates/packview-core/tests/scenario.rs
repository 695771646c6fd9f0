//! End-to-end tests driving the public API from a storefront JSON document.
//!
//! The fixture is a four-variant Color × Pack catalog:
//! Red in 1/2/4-packs (4-pack sold out) and Blue in a 2-pack only.

use serde_json::json;

use packview_core::{
    compute_sticky_visibility, parse_catalog, resolve, resolve_for_pack_size, Catalog,
    Configurator, MatchKind, PackDesignation, PackSource, StickyVisibility, Surface, WidgetConfig,
};

fn catalog_json() -> serde_json::Value {
    json!({
        "options": ["Color", "Pack"],
        "variants": [
            { "id": 1, "options": ["Red", "1-pack"], "price": 2000, "compare_at_price": 0, "available": true,
              "featured_media": { "id": 11, "preview_image": { "src": "//cdn.example.com/red.jpg" } } },
            { "id": 2, "options": ["Red", "2-pack"], "price": 3600, "compare_at_price": 4000, "available": true },
            { "id": 3, "options": ["Red", "4-pack"], "price": 6800, "compare_at_price": null, "available": false },
            { "id": 4, "options": ["Blue", "2-pack"], "price": 3800, "available": true,
              "featured_image": { "id": 44, "src": "//cdn.example.com/blue_800x.jpg?v=2" } }
        ],
        "media": [
            { "id": 11, "preview_image": { "src": "//cdn.example.com/red.jpg" } },
            { "id": 44, "src": "//cdn.example.com/blue.jpg" }
        ]
    })
}

fn catalog() -> Catalog {
    parse_catalog(&catalog_json().to_string()).expect("fixture parses")
}

fn sel(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| (*v).to_string()).collect()
}

// ---------------------------------------------------------------------------
// Resolution
// ---------------------------------------------------------------------------

#[test]
fn exact_match_on_sold_out_variant_is_shown_sold_out() {
    let catalog = catalog();
    let pack = PackDesignation::detect(&catalog);
    let res = resolve(&catalog, &pack, &sel(&["Red", "4-pack"])).expect("resolves");
    assert_eq!(res.variant.id, "3");
    assert_eq!(res.kind, MatchKind::Exact);
    assert!(!res.variant.available);

    let config = WidgetConfig {
        initial_variant_id: Some("3".into()),
        ..WidgetConfig::default()
    };
    let c = Configurator::new(catalog, config);
    let view = c.view();
    assert!(view.sold_out);
    assert_eq!(view.price.map(|p| p.price), Some(6800));
    assert_eq!(view.price.and_then(|p| p.compare_at_price), None);
}

#[test]
fn unknown_color_falls_back_to_partial_overlap() {
    let catalog = catalog();
    let pack = PackDesignation::detect(&catalog);
    let res = resolve(&catalog, &pack, &sel(&["Green", "2-pack"])).expect("resolves");
    assert_eq!(res.variant.id, "2");
    assert_eq!(res.kind, MatchKind::PartialOverlap);
    assert_eq!(res.variant.price, 3600);
    assert_eq!(res.variant.compare_at_price, 4000);
}

#[test]
fn pack_preview_keeps_the_other_options() {
    let catalog = catalog();
    let pack = PackDesignation::detect(&catalog);
    let selection = sel(&["Blue", "1-pack"]);
    let res = resolve_for_pack_size(&catalog, &pack, &selection, 2).expect("resolves");
    assert_eq!(res.variant.id, "4");
    assert_eq!(res.variant.price, 3800);
    assert_eq!(selection, sel(&["Blue", "1-pack"]));
}

// ---------------------------------------------------------------------------
// Configurator session
// ---------------------------------------------------------------------------

#[test]
fn session_walks_through_colors_and_packs() {
    let mut c = Configurator::new(catalog(), WidgetConfig::default());
    assert_eq!(c.view().variant_id.as_deref(), Some("2"));

    let formatted = c.formatted_view();
    assert_eq!(formatted.price.as_deref(), Some("$36.00"));
    assert_eq!(formatted.compare_at_price.as_deref(), Some("$40.00"));

    let update = c.select_option(0, "Blue");
    assert_eq!(update.view.variant_id.as_deref(), Some("4"));
    assert_eq!(update.view.active_media_id.as_deref(), Some("44"));
    assert_eq!(c.formatted_view().compare_at_price, None);

    let gaps: Vec<u32> = update
        .view
        .offers
        .iter()
        .filter(|o| !o.selectable)
        .map(|o| o.size)
        .collect();
    assert_eq!(gaps, vec![1, 4], "Blue only comes as a 2-pack");

    c.select_option(0, "Red");
    let update = c.choose_pack(1, PackSource::PickButton);
    assert!(update.focus_form);
    assert_eq!(update.view.variant_id.as_deref(), Some("1"));
    assert_eq!(update.view.active_media_id.as_deref(), Some("11"));
}

#[test]
fn catalog_from_products_json_shape() {
    let document = json!({
        "options": [
            { "name": "Pack", "position": 2, "values": ["1 Pack", "3 Pack"] },
            { "name": "Scent", "position": 1, "values": ["Lavender"] }
        ],
        "variants": [
            { "id": 10, "option1": "Lavender", "option2": "1 Pack", "price": "12.00", "available": true },
            { "id": 11, "option1": "Lavender", "option2": "3 Pack", "price": "30.00",
              "compare_at_price": "36.00", "available": true }
        ]
    });
    let catalog = parse_catalog(&document.to_string()).expect("parses");
    assert_eq!(catalog.option_index("Scent"), Some(0));
    assert_eq!(catalog.option_index("Pack"), Some(1));

    let mut c = Configurator::new(catalog, WidgetConfig::default());
    // Default pack 2 is not offered; the nearest allowed size is 1.
    assert_eq!(c.pack_size(), 1);
    assert_eq!(c.view().price.map(|p| p.price), Some(1200));

    let update = c.choose_pack(3, PackSource::Sticky);
    assert_eq!(update.view.variant_id.as_deref(), Some("11"));
    assert_eq!(update.view.price.and_then(|p| p.compare_at_price), Some(3600));
    assert_eq!(update.view.line_item.map(|l| l.quantity), Some(1));
}

#[test]
fn variant_without_availability_renders_sold_out() {
    let document = json!({ "variants": [{ "id": 1, "options": ["Red"], "price": 2000 }] });
    let c = Configurator::new(Catalog::from_json(&document.to_string()), WidgetConfig::default());
    assert_eq!(c.view().variant_id.as_deref(), Some("1"));
    assert!(c.view().sold_out);
    assert!(!c.view().call_to_action.enabled);
}

#[test]
fn malformed_document_degrades_to_empty_catalog() {
    let c = Configurator::new(Catalog::from_json("{ not json"), WidgetConfig::default());
    assert!(c.view().sold_out);
    assert!(c.view().variant_id.is_none());
    assert!(!c.view().call_to_action.enabled);
}

// ---------------------------------------------------------------------------
// Sticky summary
// ---------------------------------------------------------------------------

#[test]
fn sticky_bar_shows_only_when_everything_is_out_of_view() {
    assert!(compute_sticky_visibility(false, false, false, true));
    assert!(!compute_sticky_visibility(false, false, true, true));

    let mut sticky = StickyVisibility::new();
    sticky.set_viewport_width(375, WidgetConfig::default().narrow_breakpoint_px);
    sticky.update(Surface::Hero, false);
    sticky.update(Surface::Form, false);
    assert!(sticky.update(Surface::Footer, false));
    assert!(!sticky.update(Surface::Footer, true));
}
