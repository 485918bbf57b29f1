use crate::config::CurrencySpec;
use crate::core::currency::CurrencyCode;
use serde::{Deserialize, Serialize};

/// Currencies whose issuing country is not their code's first two letters.
const COUNTRY_OVERRIDES: &[(&str, &str)] = &[
    ("XOF", "bj"),
    ("XAF", "cm"),
    ("EUR", "eu"),
    ("ANG", "cw"),
];

/// One settlement currency as offered in the currency dropdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrencyEntry {
    pub code: CurrencyCode,
    pub label: String,
    /// Flag image of the issuing country.
    pub icon_ref: String,
    pub disabled: bool,
    /// 1 for the user's local currency once the locale is known, else 0.
    pub locale_rank: u32,
}

impl CurrencyEntry {
    pub fn new(code: CurrencyCode, label: impl Into<String>) -> Self {
        let icon_ref = flag_url(&country_for_currency(&code));
        Self {
            code,
            label: label.into(),
            icon_ref,
            disabled: false,
            locale_rank: 0,
        }
    }

    /// Lower-case ISO 3166-1 alpha-2 country of this currency.
    pub fn country(&self) -> String {
        country_for_currency(&self.code)
    }
}

impl From<&CurrencySpec> for CurrencyEntry {
    fn from(spec: &CurrencySpec) -> Self {
        Self::new(spec.code.clone(), spec.label.clone())
    }
}

/// Issuing country of an ISO 4217 code, lower case.
///
/// ```
/// use swap_form_engine::catalog::entry::country_for_currency;
/// use swap_form_engine::core::currency::CurrencyCode;
///
/// assert_eq!(country_for_currency(&CurrencyCode::new("NGN")), "ng");
/// assert_eq!(country_for_currency(&CurrencyCode::new("XOF")), "bj");
/// ```
pub fn country_for_currency(code: &CurrencyCode) -> String {
    let upper = code.as_str().to_ascii_uppercase();
    COUNTRY_OVERRIDES
        .iter()
        .find(|(currency, _)| *currency == upper)
        .map(|(_, country)| country.to_string())
        .unwrap_or_else(|| upper.chars().take(2).collect::<String>().to_ascii_lowercase())
}

pub fn flag_url(country: &str) -> String {
    format!("https://flagcdn.com/h24/{}.webp", country)
}
