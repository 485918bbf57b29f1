use crate::config::FormConfig;
use crate::constraints::bounds::AssetConstraint;
use crate::core::currency::{AssetCode, CurrencyCode, Network};
use crate::services::{RateQuery, RateService, ServiceError};
use log::debug;
use rust_decimal::Decimal;
use std::str::FromStr;
use thiserror::Error;

/// Units of the probe asset priced when scaling pegged-asset bounds.
pub const PROBE_AMOUNT: Decimal = Decimal::ONE;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConstraintError {
    #[error(transparent)]
    Service(#[from] ServiceError),
    #[error("quote '{0}' is not a positive price")]
    InvalidQuote(String),
}

/// Computes the sendable range for an asset.
///
/// Ordinary assets get the default bounds. The pegged asset is
/// denominated in the reference fiat unit, so its bounds are the defaults
/// multiplied by the price of one probe asset in that unit.
#[derive(Debug, Clone)]
pub struct ConstraintResolver {
    defaults: AssetConstraint,
    pegged_asset: AssetCode,
    reference_currency: CurrencyCode,
    probe_asset: AssetCode,
}

impl ConstraintResolver {
    pub fn new(config: &FormConfig) -> Self {
        Self {
            defaults: config.default_bounds,
            pegged_asset: config.pegged_asset.clone(),
            reference_currency: config.reference_currency.clone(),
            probe_asset: config.probe_asset.clone(),
        }
    }

    pub fn defaults(&self) -> AssetConstraint {
        self.defaults
    }

    /// Whether `asset` needs a price lookup before its bounds are known.
    pub fn requires_lookup(&self, asset: &AssetCode) -> bool {
        asset == &self.pegged_asset
    }

    pub fn probe_query(&self, network: &Network) -> RateQuery {
        RateQuery::new(
            self.probe_asset.clone(),
            PROBE_AMOUNT,
            self.reference_currency.clone(),
            network,
        )
    }

    /// Bounds for `asset` on `network`.
    ///
    /// Errors only for the pegged asset; the caller keeps its previous
    /// bounds in that case.
    pub async fn resolve(
        &self,
        asset: &AssetCode,
        network: &Network,
        rates: &dyn RateService,
    ) -> Result<AssetConstraint, ConstraintError> {
        if !self.requires_lookup(asset) {
            return Ok(self.defaults);
        }
        let query = self.probe_query(network);
        debug!(
            "pricing {} {} in {} on {} for {} bounds",
            query.amount, query.asset, query.currency, query.network, asset
        );
        let quote = rates.fetch_rate(&query).await?;
        self.scale_by_quote(&quote)
    }

    /// Scale the defaults by a quoted price string. The price must be
    /// positive and the scaled bounds must fit in a `Decimal`.
    pub fn scale_by_quote(&self, quote: &str) -> Result<AssetConstraint, ConstraintError> {
        Decimal::from_str(quote.trim())
            .ok()
            .filter(|price| *price > Decimal::ZERO)
            .and_then(|price| self.defaults.scaled(price))
            .ok_or_else(|| ConstraintError::InvalidQuote(quote.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::fixed::FixedRateService;
    use rust_decimal_macros::dec;

    fn resolver() -> ConstraintResolver {
        ConstraintResolver::new(&FormConfig::default())
    }

    #[tokio::test]
    async fn test_ordinary_asset_uses_defaults_without_lookup() {
        let rates = FixedRateService::quoting("1600");
        let bounds = resolver()
            .resolve(&AssetCode::new("USDC"), &Network::new("Base"), &rates)
            .await
            .unwrap();
        assert_eq!(bounds, AssetConstraint::default());
        assert!(rates.queries().is_empty());
    }

    #[tokio::test]
    async fn test_pegged_asset_scaled_by_quote() {
        let rates = FixedRateService::quoting("1600");
        let bounds = resolver()
            .resolve(&AssetCode::new("cNGN"), &Network::new("Arbitrum One"), &rates)
            .await
            .unwrap();
        assert_eq!(bounds, AssetConstraint::new(dec!(800), dec!(16_000_000)));

        let queries = rates.queries();
        assert_eq!(queries.len(), 1);
        assert_eq!(queries[0].asset, AssetCode::new("USDC"));
        assert_eq!(queries[0].amount, dec!(1));
        assert_eq!(queries[0].currency, CurrencyCode::new("NGN"));
        assert_eq!(queries[0].network, "arbitrum-one");
    }

    #[tokio::test]
    async fn test_service_failure_propagates() {
        let rates = FixedRateService::failing(ServiceError::NoQuote("no provider".into()));
        let err = resolver()
            .resolve(&AssetCode::new("cNGN"), &Network::new("Base"), &rates)
            .await
            .unwrap_err();
        assert_eq!(
            err,
            ConstraintError::Service(ServiceError::NoQuote("no provider".into()))
        );
    }

    #[test]
    fn test_non_positive_quote_is_invalid() {
        let resolver = resolver();
        for quote in ["0", "-5", "", "n/a"] {
            assert!(matches!(
                resolver.scale_by_quote(quote),
                Err(ConstraintError::InvalidQuote(_))
            ));
        }
    }

    #[tokio::test]
    async fn test_quote_too_large_to_scale_is_invalid() {
        let rates = FixedRateService::quoting("10000000000000000000000000");
        let err = resolver()
            .resolve(&AssetCode::new("cNGN"), &Network::new("Base"), &rates)
            .await
            .unwrap_err();
        assert_eq!(
            err,
            ConstraintError::InvalidQuote("10000000000000000000000000".into())
        );
    }
}
