use crate::catalog::entry::CurrencyEntry;
use crate::config::{CurrencySpec, FormConfig};
use crate::core::currency::{AssetCode, CurrencyCode};
use crate::services::LocaleResolver;
use log::{debug, warn};
use serde::Serialize;

/// Which currencies an asset may settle in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogPolicy {
    pub pegged_asset: AssetCode,
    pub reference_currency: CurrencyCode,
    pub default_disabled: Vec<CurrencyCode>,
}

impl CatalogPolicy {
    pub fn new(config: &FormConfig) -> Self {
        Self {
            pegged_asset: config.pegged_asset.clone(),
            reference_currency: config.reference_currency.clone(),
            default_disabled: config.default_disabled.clone(),
        }
    }
}

/// Result of applying the asset rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetRuleOutcome {
    pub catalog: CurrencyCatalog,
    /// The selection is pinned to the reference currency.
    pub locked: bool,
    /// Currency that must replace the current selection, if any.
    pub force_select: Option<CurrencyCode>,
}

/// Ordered list of settlement currencies.
///
/// Every operation returns a new catalog; nothing is mutated in place, so
/// the result of an update depends only on its inputs.
///
/// # Examples
///
/// ```
/// use swap_form_engine::catalog::currency_catalog::{CatalogPolicy, CurrencyCatalog};
/// use swap_form_engine::config::FormConfig;
/// use swap_form_engine::core::currency::{AssetCode, CurrencyCode};
///
/// let config = FormConfig::default();
/// let base = CurrencyCatalog::from_specs(&config.currencies);
/// let outcome = base.apply_asset_rule(
///     Some(&AssetCode::new("cNGN")),
///     Some(&CurrencyCode::new("KES")),
///     &CatalogPolicy::new(&config),
/// );
///
/// assert_eq!(outcome.force_select, Some(CurrencyCode::new("NGN")));
/// assert_eq!(outcome.catalog.enabled_codes(), vec![CurrencyCode::new("NGN")]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct CurrencyCatalog {
    entries: Vec<CurrencyEntry>,
}

impl CurrencyCatalog {
    pub fn new(entries: Vec<CurrencyEntry>) -> Self {
        Self { entries }
    }

    pub fn from_specs(specs: &[CurrencySpec]) -> Self {
        Self::new(specs.iter().map(CurrencyEntry::from).collect())
    }

    pub fn entries(&self) -> &[CurrencyEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, code: &CurrencyCode) -> Option<&CurrencyEntry> {
        self.entries.iter().find(|e| &e.code == code)
    }

    /// Known and currently selectable.
    pub fn is_enabled(&self, code: &CurrencyCode) -> bool {
        self.get(code).map_or(false, |e| !e.disabled)
    }

    pub fn codes(&self) -> Vec<CurrencyCode> {
        self.entries.iter().map(|e| e.code.clone()).collect()
    }

    pub fn enabled_codes(&self) -> Vec<CurrencyCode> {
        self.entries
            .iter()
            .filter(|e| !e.disabled)
            .map(|e| e.code.clone())
            .collect()
    }

    /// Recompute `disabled` for the selected asset, then partition.
    ///
    /// The pegged asset may only settle in the reference currency, which
    /// becomes the forced selection. Any other asset gets the default
    /// disabled set and an unlocked selection; a selection that is
    /// disabled under that set is dropped.
    pub fn apply_asset_rule(
        &self,
        asset: Option<&AssetCode>,
        selected: Option<&CurrencyCode>,
        policy: &CatalogPolicy,
    ) -> AssetRuleOutcome {
        let pegged = asset == Some(&policy.pegged_asset);
        let entries = self
            .entries
            .iter()
            .map(|entry| CurrencyEntry {
                disabled: if pegged {
                    entry.code != policy.reference_currency
                } else {
                    policy.default_disabled.contains(&entry.code)
                },
                ..entry.clone()
            })
            .collect();
        let catalog = CurrencyCatalog::new(entries).partition_enabled();

        let force_select = if pegged {
            (selected != Some(&policy.reference_currency))
                .then(|| policy.reference_currency.clone())
        } else {
            None
        };

        debug!(
            "asset rule for {:?}: {} of {} currencies enabled",
            asset.map(|a| a.as_str()),
            catalog.enabled_codes().len(),
            catalog.len()
        );

        AssetRuleOutcome {
            catalog,
            locked: pegged,
            force_select,
        }
    }

    /// Stable partition: enabled entries first, each group keeping its
    /// relative order.
    pub fn partition_enabled(&self) -> Self {
        let (enabled, disabled): (Vec<_>, Vec<_>) =
            self.entries.iter().cloned().partition(|e| !e.disabled);
        Self::new(enabled.into_iter().chain(disabled).collect())
    }

    /// Float the currency of `country` to the front when it is present
    /// and enabled; otherwise return the catalog unchanged.
    pub fn apply_locale_rank(&self, country: &str) -> Self {
        let country = country.trim().to_ascii_lowercase();
        let Some(index) = self
            .entries
            .iter()
            .position(|e| !e.disabled && e.country() == country)
        else {
            return self.clone();
        };

        let mut local = self.entries[index].clone();
        local.locale_rank = 1;
        let rest = self
            .entries
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != index)
            .map(|(_, e)| CurrencyEntry {
                locale_rank: 0,
                ..e.clone()
            });
        Self::new(std::iter::once(local).chain(rest).collect())
    }

    /// Resolve the user's country and rank by it. Lookup failures leave
    /// the order untouched.
    pub async fn rank_by_locale(&self, resolver: &dyn LocaleResolver) -> Self {
        match resolver.country_code().await {
            Ok(country) => self.apply_locale_rank(&country),
            Err(e) => {
                warn!("locale lookup failed, keeping catalog order: {}", e);
                self.clone()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::fixed::FixedLocaleResolver;
    use crate::services::ServiceError;

    fn code(c: &str) -> CurrencyCode {
        CurrencyCode::new(c)
    }

    fn config() -> FormConfig {
        FormConfig::default()
    }

    fn base() -> CurrencyCatalog {
        CurrencyCatalog::from_specs(&config().currencies)
    }

    fn policy() -> CatalogPolicy {
        CatalogPolicy::new(&config())
    }

    #[test]
    fn test_pegged_asset_enables_reference_only() {
        let outcome = base().apply_asset_rule(Some(&AssetCode::new("cNGN")), None, &policy());
        assert!(outcome.locked);
        assert_eq!(outcome.force_select, Some(code("NGN")));
        assert_eq!(outcome.catalog.enabled_codes(), vec![code("NGN")]);
        assert_eq!(outcome.catalog.entries()[0].code, code("NGN"));
        assert_eq!(outcome.catalog.len(), base().len());
    }

    #[test]
    fn test_pegged_asset_with_reference_selected_does_not_force() {
        let outcome =
            base().apply_asset_rule(Some(&AssetCode::new("cNGN")), Some(&code("NGN")), &policy());
        assert!(outcome.locked);
        assert_eq!(outcome.force_select, None);
    }

    #[test]
    fn test_ordinary_asset_restores_defaults() {
        let base = base();
        let pegged = base
            .apply_asset_rule(Some(&AssetCode::new("cNGN")), None, &policy())
            .catalog;
        let outcome = base.apply_asset_rule(Some(&AssetCode::new("USDC")), None, &policy());
        // The pegged result is a separate list; the base order survives.
        assert_eq!(pegged.entries()[0].code, code("NGN"));
        assert!(!outcome.locked);
        assert_eq!(outcome.force_select, None);
        assert_eq!(
            outcome.catalog.codes(),
            vec![
                code("KES"),
                code("NGN"),
                code("TZS"),
                code("UGX"),
                code("MWK"),
                code("GHS"),
                code("BRL"),
                code("ARS"),
            ]
        );
        for c in ["GHS", "BRL", "ARS"] {
            assert!(!outcome.catalog.is_enabled(&code(c)));
        }
    }

    #[test]
    fn test_partition_is_stable() {
        let mut entries: Vec<CurrencyEntry> = ["A1", "B1", "A2", "B2", "A3"]
            .iter()
            .map(|c| CurrencyEntry::new(code(c), *c))
            .collect();
        for e in entries.iter_mut() {
            e.disabled = e.code.as_str().starts_with('B');
        }
        let partitioned = CurrencyCatalog::new(entries).partition_enabled();
        assert_eq!(
            partitioned.codes(),
            vec![code("A1"), code("A2"), code("A3"), code("B1"), code("B2")]
        );
    }

    #[test]
    fn test_locale_rank_moves_local_currency_first() {
        let ranked = base().apply_locale_rank("TZ");
        assert_eq!(ranked.entries()[0].code, code("TZS"));
        assert_eq!(ranked.entries()[0].locale_rank, 1);
        assert_eq!(
            ranked.codes()[1..4].to_vec(),
            vec![code("KES"), code("NGN"), code("GHS")]
        );
        assert!(ranked.entries()[1..].iter().all(|e| e.locale_rank == 0));
    }

    #[test]
    fn test_locale_rank_skips_disabled_and_unknown() {
        let catalog = base()
            .apply_asset_rule(Some(&AssetCode::new("USDC")), None, &policy())
            .catalog;
        assert_eq!(catalog.apply_locale_rank("gh"), catalog);
        assert_eq!(catalog.apply_locale_rank("fr"), catalog);
    }

    #[test]
    fn test_locale_rank_does_not_mutate_input() {
        let catalog = base();
        let before = catalog.clone();
        let _ = catalog.apply_locale_rank("ug");
        assert_eq!(catalog, before);
    }

    #[tokio::test]
    async fn test_rank_by_locale_failure_keeps_order() {
        let resolver = FixedLocaleResolver::failing(ServiceError::Locale("timeout".into()));
        let catalog = base();
        assert_eq!(catalog.rank_by_locale(&resolver).await, catalog);
    }

    #[tokio::test]
    async fn test_rank_by_locale_success() {
        let resolver = FixedLocaleResolver::country("UG");
        let ranked = base().rank_by_locale(&resolver).await;
        assert_eq!(ranked.entries()[0].code, code("UGX"));
    }
}
