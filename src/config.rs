//! Engine configuration.
//!
//! Every field has a default, so a config file only needs to list what it
//! overrides:
//!
//! ```json
//! {
//!   "default_network": "Polygon",
//!   "default_disabled": ["GHS"]
//! }
//! ```

use crate::constraints::bounds::AssetConstraint;
use crate::core::asset::AssetRegistry;
use crate::core::currency::{AssetCode, CurrencyCode, Network};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file '{path}': {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// A settlement currency offered by the form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrencySpec {
    pub code: CurrencyCode,
    pub label: String,
}

impl CurrencySpec {
    pub fn new(code: &str, label: &str) -> Self {
        Self {
            code: CurrencyCode::new(code),
            label: label.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormConfig {
    /// Bounds for every asset before any reference scaling.
    pub default_bounds: AssetConstraint,
    /// Asset whose settlement currency is pinned to `reference_currency`.
    pub pegged_asset: AssetCode,
    pub reference_currency: CurrencyCode,
    /// Asset priced in `reference_currency` to scale the pegged asset's bounds.
    pub probe_asset: AssetCode,
    /// Currencies disabled unless the pegged asset forces otherwise.
    pub default_disabled: Vec<CurrencyCode>,
    /// Settlement currencies in their base display order.
    pub currencies: Vec<CurrencySpec>,
    pub assets: AssetRegistry,
    pub default_network: Network,
}

impl Default for FormConfig {
    fn default() -> Self {
        let stables = |extra: &[&str]| {
            ["USDC", "USDT"]
                .iter()
                .chain(extra)
                .map(|s| AssetCode::new(*s))
                .collect::<Vec<_>>()
        };
        Self {
            default_bounds: AssetConstraint::default(),
            pegged_asset: AssetCode::new("cNGN"),
            reference_currency: CurrencyCode::new("NGN"),
            probe_asset: AssetCode::new("USDC"),
            default_disabled: ["GHS", "BRL", "ARS"]
                .iter()
                .map(|c| CurrencyCode::new(*c))
                .collect(),
            currencies: vec![
                CurrencySpec::new("KES", "Kenyan Shilling"),
                CurrencySpec::new("NGN", "Nigerian Naira"),
                CurrencySpec::new("GHS", "Ghanaian Cedi"),
                CurrencySpec::new("TZS", "Tanzanian Shilling"),
                CurrencySpec::new("UGX", "Ugandan Shilling"),
                CurrencySpec::new("MWK", "Malawian Kwacha"),
                CurrencySpec::new("BRL", "Brazilian Real"),
                CurrencySpec::new("ARS", "Argentine Peso"),
            ],
            assets: AssetRegistry::new()
                .with_network(Network::new("Base"), stables(&["cNGN"]))
                .with_network(Network::new("BNB Smart Chain"), stables(&["cNGN"]))
                .with_network(Network::new("Arbitrum One"), stables(&[]))
                .with_network(Network::new("Polygon"), stables(&[])),
            default_network: Network::new("Base"),
        }
    }
}

impl FormConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&content)
    }
}
