use super::*;

use packview_core::{Catalog, Variant, WidgetConfig};

fn catalog() -> Catalog {
    Catalog::new(
        &["Color", "Pack"],
        vec![
            Variant::new("1", &["Red", "1-pack"], 2000),
            Variant::new("2", &["Blue", "2-pack"], 3800),
        ],
    )
}

#[test]
fn no_command_is_none() {
    let cli = Cli::try_parse_from(["packview-cli"]).expect("expected valid cli args");
    assert!(cli.command.is_none());
}

#[test]
fn parses_resolve_with_repeated_selections() {
    let cli = Cli::try_parse_from([
        "packview-cli",
        "resolve",
        "--catalog",
        "product.json",
        "--select",
        "Color=Blue",
        "--select",
        "1=2-pack",
        "--pack",
        "4",
    ])
    .expect("expected valid cli args");

    assert_eq!(
        cli.catalog.as_deref(),
        Some(std::path::Path::new("product.json"))
    );
    assert!(matches!(
        cli.command,
        Some(Commands::Resolve { ref select, pack: Some(4) })
            if select == &["Color=Blue".to_string(), "1=2-pack".to_string()]
    ));
}

#[test]
fn parses_view_with_pick_source() {
    let cli = Cli::try_parse_from([
        "packview-cli",
        "view",
        "--pack",
        "2",
        "--source",
        "pick",
        "--media",
        "m4",
    ])
    .expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Some(Commands::View {
            pack: Some(2),
            source: PackSourceArg::Pick,
            media: Some(ref m),
            ..
        }) if m == "m4"
    ));
}

#[test]
fn view_source_defaults_to_radio() {
    let cli = Cli::try_parse_from(["packview-cli", "view"]).expect("expected valid cli args");
    assert!(matches!(
        cli.command,
        Some(Commands::View {
            source: PackSourceArg::Radio,
            pack: None,
            media: None,
            ..
        })
    ));
}

#[test]
fn parses_sticky_flags() {
    let cli = Cli::try_parse_from(["packview-cli", "sticky", "--footer", "--width", "375"])
        .expect("expected valid cli args");
    assert!(matches!(
        cli.command,
        Some(Commands::Sticky {
            hero: false,
            form: false,
            footer: true,
            width: 375
        })
    ));
}

#[test]
fn sticky_requires_width() {
    assert!(Cli::try_parse_from(["packview-cli", "sticky"]).is_err());
}

#[test]
fn parses_format_with_overrides() {
    let cli = Cli::try_parse_from([
        "packview-cli",
        "format",
        "123456",
        "--currency",
        "eur",
        "--locale",
        "de-DE",
    ])
    .expect("expected valid cli args");
    assert!(matches!(
        cli.command,
        Some(Commands::Format {
            cents: 123_456,
            currency: Some(ref c),
            locale: Some(ref l),
        }) if c == "eur" && l == "de-DE"
    ));
}

#[test]
fn rejects_invalid_pack_source() {
    assert!(Cli::try_parse_from(["packview-cli", "view", "--source", "carousel"]).is_err());
}

#[test]
fn selection_arg_by_name_and_index() {
    let catalog = catalog();
    assert_eq!(
        widget::parse_selection_arg(&catalog, "color=Blue").expect("valid"),
        (0, "Blue".to_string())
    );
    assert_eq!(
        widget::parse_selection_arg(&catalog, "1 = 2-pack").expect("valid"),
        (1, "2-pack".to_string())
    );
}

#[test]
fn selection_arg_errors() {
    let catalog = catalog();
    assert!(widget::parse_selection_arg(&catalog, "Blue").is_err());
    assert!(widget::parse_selection_arg(&catalog, "Size=Large").is_err());
    assert!(widget::parse_selection_arg(&catalog, "5=Blue").is_err());
}

#[test]
fn pack_source_arg_maps_to_core_source() {
    assert_eq!(
        packview_core::PackSource::from(PackSourceArg::Pick),
        packview_core::PackSource::PickButton
    );
}

#[test]
fn load_catalog_requires_a_path() {
    let err = widget::load_catalog(None).expect_err("no path");
    assert!(err.to_string().contains("--catalog"));
}

fn four_variant_catalog() -> Catalog {
    Catalog::new(
        &["Color", "Pack"],
        vec![
            Variant::new("1", &["Red", "1-pack"], 2000),
            Variant::new("2", &["Red", "2-pack"], 3600),
            Variant::new("3", &["Red", "4-pack"], 6800).with_available(false),
            Variant::new("4", &["Blue", "2-pack"], 3800),
        ],
    )
}

#[test]
fn resolve_tuple_ignores_argument_order() {
    let configurator =
        packview_core::Configurator::new(four_variant_catalog(), WidgetConfig::default());
    let forward = ["Color=Green".to_string(), "Pack=4-pack".to_string()];
    let reverse = ["Pack=4-pack".to_string(), "Color=Green".to_string()];

    let tuple = widget::selection_tuple(&configurator, &forward).expect("valid");
    assert_eq!(tuple, vec!["Green", "4-pack"]);
    assert_eq!(
        widget::selection_tuple(&configurator, &reverse).expect("valid"),
        tuple
    );

    let res = packview_core::resolve(configurator.catalog(), configurator.pack(), &tuple)
        .expect("resolves");
    assert_eq!(res.variant.id, "1");
    assert_eq!(res.kind, packview_core::MatchKind::FirstAvailable);
}

#[test]
fn resolve_tuple_fills_unselected_options_from_initial_variant() {
    let configurator =
        packview_core::Configurator::new(four_variant_catalog(), WidgetConfig::default());
    assert_eq!(
        configurator.resolved_variant().map(|v| v.id.as_str()),
        Some("2")
    );
    let tuple =
        widget::selection_tuple(&configurator, &["Pack=1-pack".to_string()]).expect("valid");
    assert_eq!(tuple, vec!["Red", "1-pack"]);
}
