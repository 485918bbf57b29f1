use crate::core::currency::{AssetCode, Network};
use serde::{Deserialize, Serialize};

/// Assets supported on one network, in display order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkAssets {
    pub network: Network,
    pub assets: Vec<AssetCode>,
}

/// Which assets can be sent from which network.
///
/// The first asset listed for a network is the one selected when the
/// current asset is not available after a network switch.
///
/// # Examples
///
/// ```
/// use swap_form_engine::core::asset::AssetRegistry;
/// use swap_form_engine::core::currency::{AssetCode, Network};
///
/// let registry = AssetRegistry::new()
///     .with_network(Network::new("Base"), vec![AssetCode::new("USDC"), AssetCode::new("cNGN")]);
///
/// let base = Network::new("Base");
/// assert!(registry.is_supported(&base, &AssetCode::new("cNGN")));
/// assert_eq!(registry.default_asset(&base), Some(&AssetCode::new("USDC")));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssetRegistry {
    networks: Vec<NetworkAssets>,
}

impl AssetRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) the asset list of a network.
    pub fn with_network(mut self, network: Network, assets: Vec<AssetCode>) -> Self {
        self.networks.retain(|entry| entry.network != network);
        self.networks.push(NetworkAssets { network, assets });
        self
    }

    pub fn supported_assets(&self, network: &Network) -> &[AssetCode] {
        self.networks
            .iter()
            .find(|entry| &entry.network == network)
            .map(|entry| entry.assets.as_slice())
            .unwrap_or(&[])
    }

    pub fn is_supported(&self, network: &Network, asset: &AssetCode) -> bool {
        self.supported_assets(network).contains(asset)
    }

    pub fn default_asset(&self, network: &Network) -> Option<&AssetCode> {
        self.supported_assets(network).first()
    }

    pub fn networks(&self) -> impl Iterator<Item = &Network> {
        self.networks.iter().map(|entry| &entry.network)
    }
}
