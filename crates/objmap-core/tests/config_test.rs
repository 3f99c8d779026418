//! Integration test: configuration, settings and shared use
//!
//! Builds configurations from YAML settings and a profile catalog, and
//! maps concurrently through mappers sharing one registry.

use objmap_core::{
    DeclareMaps, Error, Fields, Mappable, MapperConfig, MapperSettings, Profile, ProfileCatalog,
    ServiceRegistry, TypeKey, TypePair,
};
use std::path::PathBuf;
use std::sync::Arc;
use std::thread;
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter(EnvFilter::from_default_env())
        .try_init();
}

#[derive(Debug, Default, Clone, PartialEq)]
struct Line {
    sku: String,
    cents: i64,
}

impl Mappable for Line {
    fn describe(fields: &mut Fields<Self>) {
        fields
            .value("Sku", |l| &l.sku, |l| &mut l.sku)
            .value("Price", |l| &l.cents, |l| &mut l.cents);
    }
}

#[derive(Debug, Default, Clone, PartialEq)]
struct LineView {
    sku: String,
    price: String,
}

impl Mappable for LineView {
    fn describe(fields: &mut Fields<Self>) {
        fields
            .value("Sku", |l| &l.sku, |l| &mut l.sku)
            .value("Price", |l| &l.price, |l| &mut l.price);
    }
}

#[derive(Debug, Default, Clone, PartialEq)]
struct Order {
    lines: Vec<Line>,
}

impl Mappable for Order {
    fn describe(fields: &mut Fields<Self>) {
        fields.list("Lines", |o| &o.lines, |o| &mut o.lines);
    }
}

#[derive(Debug, Default, Clone, PartialEq)]
struct OrderView {
    lines: Vec<LineView>,
}

impl Mappable for OrderView {
    fn describe(fields: &mut Fields<Self>) {
        fields.list("Lines", |o| &o.lines, |o| &mut o.lines);
    }
}

/// Currency symbol handed to callbacks as a service
struct Currency(&'static str);

/// Formats cents as a price; reads the currency from the mapper's services
#[derive(Default)]
struct PriceFormatting;

impl Profile for PriceFormatting {
    fn declare(&self, maps: &mut DeclareMaps<'_>) {
        maps.map(
            |mapper, cents: &i64, price: &mut String| {
                let symbol = mapper.service::<Currency>().map(|c| c.0).unwrap_or("");
                *price = format!("{symbol}{}.{:02}", cents / 100, cents % 100);
                Ok(())
            },
            false,
        );
    }
}

/// Uppercases SKUs after the default pass
#[derive(Default)]
struct LineItems;

impl Profile for LineItems {
    fn declare(&self, maps: &mut DeclareMaps<'_>) {
        maps.map(
            |_, _: &Line, view: &mut LineView| {
                view.sku = view.sku.to_uppercase();
                Ok(())
            },
            true,
        );
    }
}

fn catalog() -> ProfileCatalog {
    ProfileCatalog::new()
        .with::<PriceFormatting>()
        .with::<LineItems>()
}

fn order() -> Order {
    Order {
        lines: vec![
            Line {
                sku: "ab-1".to_string(),
                cents: 1250,
            },
            Line {
                sku: "cd-2".to_string(),
                cents: 99,
            },
        ],
    }
}

#[test]
fn test_config_from_settings_file() -> anyhow::Result<()> {
    init_tracing();
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/data/mapper_settings.yaml");

    let settings = MapperSettings::parse_file(&path)?;
    assert_eq!(settings.max_depth, 24);

    let config = MapperConfig::from_settings(&settings, &catalog())?;
    assert_eq!(
        config.loaded_profiles(),
        &[TypeKey::of::<PriceFormatting>(), TypeKey::of::<LineItems>()]
    );

    let view: OrderView = config.mapper().map(&order())?;
    assert_eq!(
        view.lines,
        vec![
            LineView {
                sku: "AB-1".to_string(),
                price: "12.50".to_string()
            },
            LineView {
                sku: "CD-2".to_string(),
                price: "0.99".to_string()
            },
        ]
    );
    Ok(())
}

#[test]
fn test_services_reach_callbacks() -> anyhow::Result<()> {
    init_tracing();
    let services = ServiceRegistry::new();
    services.insert(Currency("$"));

    let mut config = MapperConfig::new().with_services(Arc::new(services));
    config.add_profiles(&catalog());

    let view: LineView = config.mapper().map(&order().lines[0])?;
    assert_eq!(view.price, "$12.50");
    Ok(())
}

#[test]
fn test_unknown_profile_is_configuration_error() {
    init_tracing();
    let settings = MapperSettings::parse("profiles: [Missing]").expect("valid yaml");

    let err = MapperConfig::from_settings(&settings, &catalog()).unwrap_err();
    assert!(matches!(err, Error::Configuration { ref type_name } if type_name == "Missing"));
    assert_eq!(
        err.to_string(),
        "Configuration error: 'Missing' is not a mapping profile"
    );
}

#[test]
fn test_non_profile_type_is_configuration_error() {
    init_tracing();
    let mut config = MapperConfig::new();

    let err = config
        .add_profile_type(&catalog(), TypeKey::of::<Order>())
        .unwrap_err();
    match err {
        Error::Configuration { type_name } => assert!(type_name.ends_with("Order")),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_depth_limit_from_settings() {
    init_tracing();
    let settings = MapperSettings {
        profiles: Vec::new(),
        max_depth: 1,
    };
    let config = MapperConfig::from_settings(&settings, &catalog()).expect("config");

    // Order -> OrderView descends once, each line a second time
    let err = config.mapper().map::<OrderView>(&order()).unwrap_err();
    assert!(matches!(err, Error::DepthExceeded { limit: 1, .. }));
}

#[test]
fn test_concurrent_mapping_shares_registry() {
    init_tracing();
    let mut config = MapperConfig::new();
    config.add_profiles(&catalog());
    let mapper = config.mapper();

    thread::scope(|scope| {
        for worker in 0..8 {
            let mapper = mapper.clone();
            scope.spawn(move || {
                for i in 0..50 {
                    let line = Line {
                        sku: format!("w{worker}-{i}"),
                        cents: i,
                    };
                    let view: LineView = mapper.map(&line).expect("mapping");
                    assert_eq!(view.sku, format!("W{worker}-{i}"));
                    assert_eq!(view.price, format!("0.{i:02}"));
                }
            });
        }
    });

    assert!(config.registry().contains(&TypePair::of::<Line, LineView>()));
    assert_eq!(mapper.shapes().len(), 2);
}
