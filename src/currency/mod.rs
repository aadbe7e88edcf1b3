use serde::{Deserialize, Serialize};

/// No-break space placed between a currency symbol and the amount.
pub const NBSP: char = '\u{a0}';

/// ISO 4217 currency representation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct CurrencyCode(pub String);

impl CurrencyCode {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into().to_uppercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for CurrencyCode {
    fn default() -> Self {
        Self::new("IDR")
    }
}

/// Locale-aware number formatting preferences.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LocaleConfig {
    pub language_tag: String,
    pub decimal_separator: char,
    pub grouping_separator: char,
    pub space_after_symbol: bool,
}

impl Default for LocaleConfig {
    fn default() -> Self {
        Self::indonesian()
    }
}

impl LocaleConfig {
    /// `id-ID`: `.` groups thousands, `,` marks decimals, `Rp 1.000`.
    pub fn indonesian() -> Self {
        Self {
            language_tag: "id-ID".into(),
            decimal_separator: ',',
            grouping_separator: '.',
            space_after_symbol: true,
        }
    }

    pub fn us_english() -> Self {
        Self {
            language_tag: "en-US".into(),
            decimal_separator: '.',
            grouping_separator: ',',
            space_after_symbol: false,
        }
    }

    /// Looks up the formatting rules for a BCP 47 language tag.
    pub fn for_tag(tag: &str) -> Option<Self> {
        match tag.trim().to_ascii_lowercase().as_str() {
            "id-id" | "id" => Some(Self::indonesian()),
            "en-us" | "en" => Some(Self::us_english()),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum CurrencyDisplay {
    #[default]
    Symbol,
    Code,
}

pub fn symbol_for(code: &str) -> String {
    match code {
        "IDR" => "Rp".into(),
        "USD" => "$".into(),
        "EUR" => "€".into(),
        "SGD" => "S$".into(),
        "JPY" => "¥".into(),
        _ => code.into(),
    }
}

pub fn minor_units_for(code: &str) -> u8 {
    match code {
        "IDR" | "JPY" => 0,
        "KWD" | "BHD" => 3,
        _ => 2,
    }
}

/// Rounds half away from zero at the given precision.
fn round_half_away(value: f64, precision: u8) -> f64 {
    let factor = 10f64.powi(i32::from(precision));
    (value * factor).round() / factor
}

pub fn format_number(locale: &LocaleConfig, value: f64, precision: u8) -> String {
    let rounded = round_half_away(value, precision);
    let body = format!("{:.*}", precision as usize, rounded);
    let (int_part, frac_part) = match body.split_once('.') {
        Some((int_part, frac_part)) => (int_part, Some(frac_part)),
        None => (body.as_str(), None),
    };
    let grouped = match int_part.strip_prefix('-') {
        Some(digits) => format!("-{}", group_digits(digits, locale.grouping_separator)),
        None => group_digits(int_part, locale.grouping_separator),
    };
    match frac_part {
        Some(frac) => format!("{}{}{}", grouped, locale.decimal_separator, frac),
        None => grouped,
    }
}

fn group_digits(digits: &str, separator: char) -> String {
    let mut grouped = String::new();
    for (count, ch) in digits.chars().rev().enumerate() {
        if count != 0 && count % 3 == 0 {
            grouped.insert(0, separator);
        }
        grouped.insert(0, ch);
    }
    grouped
}

pub fn format_currency_value(
    amount: f64,
    code: &CurrencyCode,
    locale: &LocaleConfig,
    display: CurrencyDisplay,
) -> String {
    let precision = minor_units_for(code.as_str());
    let body = format_number(locale, amount.abs(), precision);
    let sign = if amount < 0.0 && body.chars().any(|c| c.is_ascii_digit() && c != '0') {
        "-"
    } else {
        ""
    };
    match display {
        CurrencyDisplay::Symbol => {
            let symbol = symbol_for(code.as_str());
            if locale.space_after_symbol {
                format!("{sign}{symbol}{NBSP}{body}")
            } else {
                format!("{sign}{symbol}{body}")
            }
        }
        CurrencyDisplay::Code => format!("{sign}{}{NBSP}{body}", code.as_str()),
    }
}

/// Formats money amounts with one fixed currency, locale and display style.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoneyFormatter {
    pub code: CurrencyCode,
    pub locale: LocaleConfig,
    pub display: CurrencyDisplay,
}

impl Default for MoneyFormatter {
    fn default() -> Self {
        Self::rupiah()
    }
}

impl MoneyFormatter {
    pub fn new(code: CurrencyCode, locale: LocaleConfig, display: CurrencyDisplay) -> Self {
        Self {
            code,
            locale,
            display,
        }
    }

    /// Indonesian Rupiah in the `id-ID` locale, e.g. `Rp 750.000.000`.
    pub fn rupiah() -> Self {
        Self::new(
            CurrencyCode::default(),
            LocaleConfig::indonesian(),
            CurrencyDisplay::Symbol,
        )
    }

    pub fn format(&self, amount: f64) -> String {
        format_currency_value(amount, &self.code, &self.locale, self.display)
    }

    /// Renders `"<lower> - <upper>"`.
    pub fn format_range(&self, lower: f64, upper: f64) -> String {
        format!("{} - {}", self.format(lower), self.format(upper))
    }
}
