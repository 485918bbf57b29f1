use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// ISO 4217-style settlement currency code.
///
/// # Examples
///
/// ```
/// use swap_form_engine::core::currency::CurrencyCode;
///
/// let ngn = CurrencyCode::new("NGN");
/// let kes = CurrencyCode::new("KES");
/// assert_ne!(ngn, kes);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CurrencyCode(String);

impl CurrencyCode {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for CurrencyCode {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Symbol of a sendable on-chain asset (e.g. `USDC`, `cNGN`).
///
/// Asset symbols are case-sensitive: `cNGN` and `CNGN` are different assets.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssetCode(String);

impl AssetCode {
    pub fn new(symbol: impl Into<String>) -> Self {
        Self(symbol.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AssetCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for AssetCode {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// A chain the form can send from.
///
/// Holds the human-readable chain name; rate lookups address the
/// network by its [`slug`](Network::slug).
///
/// ```
/// use swap_form_engine::core::currency::Network;
///
/// assert_eq!(Network::new("Arbitrum One").slug(), "arbitrum-one");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Network(String);

impl Network {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn name(&self) -> &str {
        &self.0
    }

    /// Lower-cased name with whitespace runs collapsed to `-`.
    pub fn slug(&self) -> String {
        self.0
            .to_lowercase()
            .split_whitespace()
            .collect::<Vec<_>>()
            .join("-")
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Network {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Errors arising from exchange rate values.
#[derive(Debug, Error, PartialEq)]
pub enum RateError {
    #[error("exchange rate must be positive, got {0}")]
    NotPositive(Decimal),
    #[error("exchange rate '{0}' is not a decimal number")]
    Unparsable(String),
}

/// Units of settlement currency per one unit of asset.
///
/// Always strictly positive. A missing or zero rate is modelled as
/// `Option<ExchangeRate>::None`, which suspends conversion.
///
/// ```
/// use swap_form_engine::core::currency::ExchangeRate;
/// use rust_decimal_macros::dec;
///
/// let rate = ExchangeRate::new(dec!(1500)).unwrap();
/// assert_eq!(rate.value(), dec!(1500));
/// assert!(ExchangeRate::new(dec!(0)).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct ExchangeRate(Decimal);

impl ExchangeRate {
    pub fn new(rate: Decimal) -> Result<Self, RateError> {
        if rate <= Decimal::ZERO {
            return Err(RateError::NotPositive(rate));
        }
        Ok(Self(rate))
    }

    /// Lenient constructor for collaborator input: zero, negative or
    /// absent values all mean "no rate".
    pub fn from_optional(rate: Option<Decimal>) -> Option<Self> {
        rate.and_then(|r| Self::new(r).ok())
    }

    pub fn value(&self) -> Decimal {
        self.0
    }
}

impl TryFrom<Decimal> for ExchangeRate {
    type Error = RateError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ExchangeRate> for Decimal {
    fn from(rate: ExchangeRate) -> Self {
        rate.0
    }
}

impl FromStr for ExchangeRate {
    type Err = RateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = Decimal::from_str(s.trim()).map_err(|_| RateError::Unparsable(s.to_string()))?;
        Self::new(value)
    }
}

impl fmt::Display for ExchangeRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
