//! Narrow interfaces to the collaborators the form engine consumes.
//!
//! Transport, authentication and the KYC flow live behind these traits;
//! the engine only sees their results.

pub mod fixed;

use crate::core::currency::{AssetCode, CurrencyCode, Network};
use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failures reported by collaborators.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceError {
    #[error("network error: {0}")]
    Network(String),
    #[error("no available quote: {0}")]
    NoQuote(String),
    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },
    #[error("locale lookup failed: {0}")]
    Locale(String),
}

impl ServiceError {
    /// HTTP 404, which the verification endpoint uses for "unknown address".
    pub fn is_not_found(&self) -> bool {
        matches!(self, ServiceError::Http { status: 404, .. })
    }
}

/// Parameters of a price lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateQuery {
    pub asset: AssetCode,
    pub amount: Decimal,
    pub currency: CurrencyCode,
    /// Network slug, e.g. `arbitrum-one`.
    pub network: String,
}

impl RateQuery {
    pub fn new(asset: AssetCode, amount: Decimal, currency: CurrencyCode, network: &Network) -> Self {
        Self {
            asset,
            amount,
            currency,
            network: network.slug(),
        }
    }
}

/// Verification state of a wallet address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerificationStatus {
    Pending,
    Success,
    NotFound,
}

/// Quotes the price of an asset in a settlement currency.
#[async_trait]
pub trait RateService: Send + Sync {
    /// Price per unit as a decimal string.
    async fn fetch_rate(&self, query: &RateQuery) -> Result<String, ServiceError>;
}

/// Reports the KYC status of a wallet address.
#[async_trait]
pub trait VerificationService: Send + Sync {
    async fn fetch_status(&self, address: &str) -> Result<VerificationStatus, ServiceError>;
}

/// Infers the user's country (ISO 3166-1 alpha-2).
#[async_trait]
pub trait LocaleResolver: Send + Sync {
    async fn country_code(&self) -> Result<String, ServiceError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_not_found_detection() {
        let not_found = ServiceError::Http {
            status: 404,
            message: "user not found".into(),
        };
        let server = ServiceError::Http {
            status: 500,
            message: "boom".into(),
        };
        assert!(not_found.is_not_found());
        assert!(!server.is_not_found());
        assert!(!ServiceError::Network("offline".into()).is_not_found());
    }

    #[test]
    fn test_rate_query_uses_slug() {
        let query = RateQuery::new(
            AssetCode::new("USDC"),
            dec!(1),
            CurrencyCode::new("NGN"),
            &Network::new("BNB Smart Chain"),
        );
        assert_eq!(query.network, "bnb-smart-chain");
    }
}
