use crate::core::amount::{round_half_away, Field};
use crate::core::currency::{AssetCode, CurrencyCode};
use rust_decimal::Decimal;
use std::str::FromStr;

/// Decimal places kept from seeded amounts.
const SEED_DECIMAL_PLACES: u32 = 2;

/// Initial form values, usually taken from the page's query string.
///
/// # Examples
///
/// ```
/// use swap_form_engine::core::amount::Field;
/// use swap_form_engine::form::seed::SeedParams;
/// use rust_decimal_macros::dec;
///
/// let seed = SeedParams::from_query("?token=USDC&tokenAmount=25&fiatAmount=40000");
/// // The fiat amount wins and makes Receive the driving field.
/// assert_eq!(seed.seed_amount(), Some((Field::Receive, dec!(40000))));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeedParams {
    pub token: Option<AssetCode>,
    pub currency: Option<CurrencyCode>,
    pub token_amount: Option<Decimal>,
    pub fiat_amount: Option<Decimal>,
}

impl SeedParams {
    /// Parse `token`, `currency`, `tokenAmount` and `fiatAmount`.
    ///
    /// Amounts are rounded to 2 places; empty, zero or unparsable values
    /// count as absent. Unknown keys are ignored.
    pub fn from_query(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        let mut seed = SeedParams::default();
        for (key, value) in form_urlencoded::parse(query.as_bytes()) {
            let value = value.trim();
            if value.is_empty() {
                continue;
            }
            match key.as_ref() {
                "token" => seed.token = Some(AssetCode::new(value)),
                "currency" => seed.currency = Some(CurrencyCode::new(value)),
                "tokenAmount" => seed.token_amount = parse_seed_amount(value),
                "fiatAmount" => seed.fiat_amount = parse_seed_amount(value),
                _ => {}
            }
        }
        seed
    }

    /// The amount to pre-fill and the field it drives.
    ///
    /// A fiat amount takes precedence over a token amount.
    pub fn seed_amount(&self) -> Option<(Field, Decimal)> {
        let positive = |v: Option<Decimal>| v.filter(|v| *v > Decimal::ZERO);
        match (positive(self.token_amount), positive(self.fiat_amount)) {
            (_, Some(fiat)) => Some((Field::Receive, fiat)),
            (Some(token), None) => Some((Field::Send, token)),
            (None, None) => None,
        }
    }
}

fn parse_seed_amount(value: &str) -> Option<Decimal> {
    Decimal::from_str(value)
        .ok()
        .map(|v| round_half_away(v, SEED_DECIMAL_PLACES))
        .filter(|v| *v > Decimal::ZERO)
}
