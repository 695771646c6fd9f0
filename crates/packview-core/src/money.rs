//! Money formatting with a three-stage fallback chain.
//!
//! 1. The host's template formatter (storefront `money_format`, e.g.
//!    `"${{amount}}"`), when one is configured.
//! 2. A locale-aware ISO 4217 currency formatter (`rusty_money`).
//! 3. A fixed `"$" + two decimals` rendering that cannot fail.
//!
//! Each stage returns a `Result`; a failure is logged and the next stage runs.
//! Callers only ever see a `String`.

use rust_decimal::{Decimal, RoundingStrategy};
use rusty_money::{iso, FormattableCurrency, Formatter, LocalFormat, Locale, Params, Position};
use thiserror::Error;

use crate::catalog::MinorUnits;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormatError {
    #[error("money template has no recognized placeholder: {0}")]
    Template(String),

    #[error("unsupported currency code: {0}")]
    UnsupportedCurrency(String),

    #[error("unsupported locale: {0}")]
    UnsupportedLocale(String),

    #[error("amount out of range: {0}")]
    OutOfRange(MinorUnits),
}

/// A pluggable money formatter.
pub trait MoneyFormatter {
    /// Renders `amount` (minor units) in `currency`.
    ///
    /// # Errors
    ///
    /// Returns [`FormatError`] when this formatter cannot render the amount;
    /// the caller falls through to the next stage.
    fn format(&self, amount: MinorUnits, currency: &str) -> Result<String, FormatError>;
}

fn to_major(amount: MinorUnits) -> Result<Decimal, FormatError> {
    let minor = i64::try_from(amount).map_err(|_| FormatError::OutOfRange(amount))?;
    Ok(Decimal::new(minor, 2))
}

/// Inserts `sep` between groups of three digits in an unsigned integer string.
fn group_thousands(digits: &str, sep: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3 * sep.len());
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (len - idx) % 3 == 0 {
            out.push_str(sep);
        }
        out.push(ch);
    }
    out
}

/// `1234.5` → `"1,234.50"` with `group = ","`, `decimal = "."`, `places = 2`.
fn render_number(value: Decimal, places: u32, group: &str, decimal: &str) -> String {
    let rounded = value.round_dp_with_strategy(places, RoundingStrategy::MidpointAwayFromZero);
    let text = format!("{rounded:.prec$}", prec = places as usize);
    let (int_part, frac_part) = text.split_once('.').unwrap_or((text.as_str(), ""));
    let grouped = group_thousands(int_part, group);
    if frac_part.is_empty() {
        grouped
    } else {
        format!("{grouped}{decimal}{frac_part}")
    }
}

// ---------------------------------------------------------------------------
// Stage 1: host template
// ---------------------------------------------------------------------------

/// Storefront-style template formatter.
///
/// Recognized placeholders: `{{amount}}`, `{{amount_no_decimals}}`,
/// `{{amount_with_comma_separator}}`,
/// `{{amount_no_decimals_with_comma_separator}}`,
/// `{{amount_with_apostrophe_separator}}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateFormatter {
    template: String,
}

impl TemplateFormatter {
    #[must_use]
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
        }
    }
}

impl MoneyFormatter for TemplateFormatter {
    fn format(&self, amount: MinorUnits, _currency: &str) -> Result<String, FormatError> {
        let start = self
            .template
            .find("{{")
            .ok_or_else(|| FormatError::Template(self.template.clone()))?;
        let end = self.template[start..]
            .find("}}")
            .map(|rel| start + rel)
            .ok_or_else(|| FormatError::Template(self.template.clone()))?;

        let placeholder = self.template[start + 2..end].trim();
        let value = to_major(amount)?;
        let rendered = match placeholder {
            "amount" => render_number(value, 2, ",", "."),
            "amount_no_decimals" => render_number(value, 0, ",", "."),
            "amount_with_comma_separator" => render_number(value, 2, ".", ","),
            "amount_no_decimals_with_comma_separator" => render_number(value, 0, ".", ","),
            "amount_with_apostrophe_separator" => render_number(value, 2, "'", "."),
            _ => return Err(FormatError::Template(self.template.clone())),
        };

        Ok(format!(
            "{}{}{}",
            &self.template[..start],
            rendered,
            &self.template[end + 2..]
        ))
    }
}

// ---------------------------------------------------------------------------
// Stage 2: locale currency formatter
// ---------------------------------------------------------------------------

/// Separator conventions and symbol placement for a locale's language.
///
/// Languages not listed here use the currency's own conventions.
fn locale_conventions(language: &str) -> Option<(Locale, bool)> {
    let conventions = match language {
        "en" | "ja" | "zh" | "ko" | "th" | "he" => (Locale::EnUs, true),
        "hi" | "bn" | "ta" | "te" | "mr" => (Locale::EnIn, true),
        "pt" | "tr" | "id" => (Locale::EnEu, true),
        "de" | "nl" | "it" | "es" | "da" | "el" | "ro" | "hr" => (Locale::EnEu, false),
        "fr" | "sv" | "pl" | "cs" | "sk" | "fi" | "nb" | "no" | "ru" | "uk" | "hu" => {
            (Locale::EnBy, false)
        }
        _ => return None,
    };
    Some(conventions)
}

/// Locale-aware currency formatter backed by the ISO 4217 table in
/// `rusty_money`.
///
/// The currency supplies the symbol and the number of decimal places. The
/// locale's language picks digit separators and symbol placement; an unlisted
/// language falls back to the currency's home conventions. Unknown currency
/// codes are an error so the chain can fall through.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocaleFormatter {
    locale: String,
}

impl LocaleFormatter {
    #[must_use]
    pub fn new(locale: impl Into<String>) -> Self {
        Self {
            locale: locale.into(),
        }
    }

    fn language(&self) -> Result<String, FormatError> {
        let language = self
            .locale
            .trim()
            .split(['-', '_'])
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();
        if language.is_empty() || !language.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(FormatError::UnsupportedLocale(self.locale.clone()));
        }
        Ok(language)
    }
}

impl MoneyFormatter for LocaleFormatter {
    fn format(&self, amount: MinorUnits, currency: &str) -> Result<String, FormatError> {
        let code = currency.trim().to_ascii_uppercase();
        let iso_currency =
            iso::find(&code).ok_or_else(|| FormatError::UnsupportedCurrency(code.clone()))?;
        let language = self.language()?;
        let (locale, symbol_first) = locale_conventions(&language)
            .unwrap_or_else(|| (iso_currency.locale(), iso_currency.symbol_first()));

        // Storefront amounts are always hundredths of the major unit, whatever
        // the currency's own exponent.
        let places = iso_currency.exponent();
        let mut major = to_major(amount)?;
        major = major.round_dp_with_strategy(places, RoundingStrategy::MidpointAwayFromZero);
        major.rescale(places);

        let separators = LocalFormat::from_locale(locale);
        let positions = if symbol_first {
            vec![Position::Sign, Position::Symbol, Position::Amount]
        } else {
            vec![Position::Sign, Position::Amount, Position::Space, Position::Symbol]
        };
        let params = Params {
            digit_separator: separators.digit_separator,
            exponent_separator: separators.exponent_separator,
            separator_pattern: separators.digit_separator_pattern(),
            positions,
            rounding: Some(places),
            symbol: Some(iso_currency.symbol()),
            code: Some(iso_currency.code()),
        };

        let money = rusty_money::Money::from_decimal(major, iso_currency);
        Ok(Formatter::money(&money, params))
    }
}

// ---------------------------------------------------------------------------
// Stage 3 and the chain
// ---------------------------------------------------------------------------

/// `"$" + two decimals`, saturating on amounts too large to represent.
#[must_use]
pub fn fallback_format(amount: MinorUnits) -> String {
    let minor = i64::try_from(amount).unwrap_or(i64::MAX);
    format!("${:.2}", Decimal::new(minor, 2))
}

/// The full formatting chain for one widget.
pub struct Money {
    host: Option<Box<dyn MoneyFormatter>>,
    locale: LocaleFormatter,
    currency: String,
}

impl std::fmt::Debug for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Money")
            .field("host", &self.host.as_ref().map(|_| "<formatter>"))
            .field("locale", &self.locale)
            .field("currency", &self.currency)
            .finish()
    }
}

impl Money {
    #[must_use]
    pub fn new(currency: impl Into<String>, locale: impl Into<String>) -> Self {
        Self {
            host: None,
            locale: LocaleFormatter::new(locale),
            currency: currency.into(),
        }
    }

    #[must_use]
    pub fn with_host(mut self, host: Box<dyn MoneyFormatter>) -> Self {
        self.host = Some(host);
        self
    }

    /// Formats `amount` through the chain. Never fails.
    #[must_use]
    pub fn format(&self, amount: MinorUnits) -> String {
        if let Some(host) = &self.host {
            match host.format(amount, &self.currency) {
                Ok(s) => return s,
                Err(e) => tracing::debug!(error = %e, "host money formatter failed"),
            }
        }

        match self.locale.format(amount, &self.currency) {
            Ok(s) => s,
            Err(e) => {
                tracing::debug!(error = %e, "locale money formatter failed");
                fallback_format(amount)
            }
        }
    }
}
