use std::collections::HashMap;
use std::env::VarError;
use std::path::Path;

use crate::pack::{PackOverrides, DEFAULT_PACK_SIZES};
use crate::ConfigError;

/// Environment variable prefix used by [`load_widget_config_from_env`].
pub const ENV_PREFIX: &str = "PACKVIEW_";

/// Recognized widget options. Every field has a safe default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WidgetConfig {
    /// Pack size selected on load.
    pub default_pack: u32,
    /// Forces the pack option to this index.
    pub pack_option_index: Option<usize>,
    /// `Some(false)` disables pack semantics; `None` means auto-detect.
    pub has_pack: Option<bool>,
    pub currency_code: String,
    pub locale: String,
    /// Host money template, e.g. `"${{amount}}"`.
    pub money_format: Option<String>,
    /// Sizes offered when the catalog has no pack option.
    pub pack_sizes: Vec<u32>,
    /// Viewports at or below this width are "narrow".
    pub narrow_breakpoint_px: u32,
    /// Variant selected on load, if it exists in the catalog.
    pub initial_variant_id: Option<String>,
    pub add_to_cart_text: String,
    pub sold_out_text: String,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            default_pack: 2,
            pack_option_index: None,
            has_pack: None,
            currency_code: "USD".to_string(),
            locale: "en-US".to_string(),
            money_format: None,
            pack_sizes: DEFAULT_PACK_SIZES.to_vec(),
            narrow_breakpoint_px: 989,
            initial_variant_id: None,
            add_to_cart_text: "Add to cart".to_string(),
            sold_out_text: "Sold out".to_string(),
        }
    }
}

impl WidgetConfig {
    #[must_use]
    pub fn pack_overrides(&self) -> PackOverrides {
        PackOverrides {
            option_index: self.pack_option_index,
            enabled: self.has_pack,
        }
    }

    /// Builds a config from data-attribute style key/value pairs.
    ///
    /// Keys may be given as `default_pack`, `default-pack`, or
    /// `data-default-pack`.
    #[must_use]
    pub fn from_attributes(attributes: &HashMap<String, String>) -> Self {
        let normalized: HashMap<String, String> = attributes
            .iter()
            .map(|(k, v)| {
                let key = k.trim().trim_start_matches("data-").replace('-', "_");
                (key.to_ascii_lowercase(), v.clone())
            })
            .collect();
        build_widget_config(|key| normalized.get(key).cloned().ok_or(VarError::NotPresent))
    }
}

/// Load widget configuration from `PACKVIEW_*` environment variables.
///
/// Does not load `.env` files; the binary does that once at startup.
#[must_use]
pub fn load_widget_config_from_env() -> WidgetConfig {
    build_widget_config(|key| std::env::var(format!("{ENV_PREFIX}{}", key.to_ascii_uppercase())))
}

/// Load widget configuration from a YAML mapping of option → scalar.
///
/// Values go through the same lenient parsing as every other source, so an
/// unparseable value falls back to its default rather than failing the load.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read or is not a YAML mapping.
pub fn load_widget_config_file(path: &Path) -> Result<WidgetConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let raw: HashMap<String, serde_yaml::Value> =
        serde_yaml::from_str(&content).map_err(ConfigError::FileParse)?;

    let values: HashMap<String, String> = raw
        .into_iter()
        .filter_map(|(k, v)| yaml_scalar(&v).map(|s| (k.to_ascii_lowercase(), s)))
        .collect();

    Ok(build_widget_config(|key| {
        values.get(key).cloned().ok_or(VarError::NotPresent)
    }))
}

fn yaml_scalar(value: &serde_yaml::Value) -> Option<String> {
    match value {
        serde_yaml::Value::String(s) => Some(s.clone()),
        serde_yaml::Value::Number(n) => Some(n.to_string()),
        serde_yaml::Value::Bool(b) => Some(b.to_string()),
        serde_yaml::Value::Sequence(items) => Some(
            items
                .iter()
                .filter_map(yaml_scalar)
                .collect::<Vec<_>>()
                .join(","),
        ),
        _ => None,
    }
}

/// Build widget configuration using the provided lookup function.
///
/// This is the core parsing logic, decoupled from the actual environment so
/// it can be tested with a pure `HashMap` lookup. It never fails: absent keys
/// take their default and unparseable values log a warning and take their
/// default.
fn build_widget_config<F>(lookup: F) -> WidgetConfig
where
    F: Fn(&str) -> Result<String, VarError>,
{
    let defaults = WidgetConfig::default();

    let get = |key: &str| -> Option<String> {
        lookup(key)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    };

    let warn_invalid = |key: &str, raw: &str| {
        tracing::warn!(key, value = raw, "invalid widget option, using default");
    };

    let parse_u32 = |key: &str, default: u32| -> u32 {
        match get(key) {
            None => default,
            Some(raw) => raw.parse::<u32>().unwrap_or_else(|_| {
                warn_invalid(key, &raw);
                default
            }),
        }
    };

    let default_pack = match parse_u32("default_pack", defaults.default_pack) {
        0 => {
            warn_invalid("default_pack", "0");
            defaults.default_pack
        }
        n => n,
    };

    let pack_option_index = get("pack_option_index").and_then(|raw| {
        raw.parse::<usize>()
            .map_err(|_| warn_invalid("pack_option_index", &raw))
            .ok()
    });

    let has_pack = get("has_pack").and_then(|raw| {
        let parsed = parse_bool(&raw);
        if parsed.is_none() {
            warn_invalid("has_pack", &raw);
        }
        parsed
    });

    let currency_code = get("currency_code")
        .and_then(|raw| {
            let code = raw.to_ascii_uppercase();
            if code.len() == 3 && code.bytes().all(|b| b.is_ascii_alphabetic()) {
                Some(code)
            } else {
                warn_invalid("currency_code", &raw);
                None
            }
        })
        .unwrap_or(defaults.currency_code);

    let pack_sizes = get("pack_sizes")
        .and_then(|raw| {
            let parsed = parse_size_list(&raw);
            if parsed.is_none() {
                warn_invalid("pack_sizes", &raw);
            }
            parsed
        })
        .unwrap_or(defaults.pack_sizes);

    WidgetConfig {
        default_pack,
        pack_option_index,
        has_pack,
        currency_code,
        locale: get("locale").unwrap_or(defaults.locale),
        money_format: get("money_format"),
        pack_sizes,
        narrow_breakpoint_px: parse_u32("narrow_breakpoint_px", defaults.narrow_breakpoint_px),
        initial_variant_id: get("initial_variant_id"),
        add_to_cart_text: get("add_to_cart_text").unwrap_or(defaults.add_to_cart_text),
        sold_out_text: get("sold_out_text").unwrap_or(defaults.sold_out_text),
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// `"1, 2,4"` → `[1, 2, 4]`, sorted and deduplicated. Any bad or zero entry
/// rejects the whole list.
fn parse_size_list(raw: &str) -> Option<Vec<u32>> {
    let mut sizes = raw
        .split(',')
        .map(|part| part.trim().parse::<u32>().ok().filter(|n| *n > 0))
        .collect::<Option<Vec<u32>>>()?;
    sizes.sort_unstable();
    sizes.dedup();
    (!sizes.is_empty()).then_some(sizes)
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
