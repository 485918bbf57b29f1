use crate::catalog::currency_catalog::{CatalogPolicy, CurrencyCatalog};
use crate::config::FormConfig;
use crate::constraints::bounds::AssetConstraint;
use crate::constraints::resolver::{ConstraintError, ConstraintResolver};
use crate::conversion::rate_converter::{RateConverter, Recomputed};
use crate::core::amount::{
    round_half_away, AmountField, Field, InputRejection, SEND_DECIMAL_PLACES,
};
use crate::core::asset::AssetRegistry;
use crate::core::currency::{AssetCode, CurrencyCode, ExchangeRate, Network};
use crate::core::direction::Direction;
use crate::form::generation::{RequestGenerations, RequestKind};
use crate::form::notice::Notice;
use crate::form::requests::{
    ConstraintRequest, ConstraintResponse, LocaleRequest, LocaleResponse, VerificationRequest,
    VerificationResponse,
};
use crate::form::seed::SeedParams;
use crate::form::validation::{validate, FieldErrors, ValidationContext};
use crate::form::verification::{interpret, VerificationOutcome};
use crate::services::{LocaleResolver, RateService, VerificationService};
use log::{debug, info, warn};
use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionError {
    #[error("asset {asset} is not supported on {network}")]
    UnsupportedAsset { asset: AssetCode, network: Network },
    #[error("unknown currency {0}")]
    UnknownCurrency(CurrencyCode),
    #[error("currency {0} is not available for the selected asset")]
    CurrencyDisabled(CurrencyCode),
}

/// The swap form: two amount fields kept consistent with a rate, plus
/// the asset, network and currency selections they depend on.
///
/// Every input has one explicit update call, and each call recomputes
/// exactly the quantities derived from that input. Asynchronous work
/// (bounds, locale, verification) is split into `begin_*`, a fetch
/// against the collaborator, and `apply_*`; responses that were
/// superseded, or that arrive after [`unmount`](Self::unmount), are
/// dropped.
///
/// # Examples
///
/// ```
/// use swap_form_engine::config::FormConfig;
/// use swap_form_engine::core::amount::Field;
/// use swap_form_engine::form::transaction::TransactionForm;
/// use rust_decimal_macros::dec;
///
/// let mut form = TransactionForm::new(&FormConfig::default());
/// form.set_rate(Some(dec!(1500)));
/// form.input(Field::Send, "1,234.5678").unwrap();
/// assert_eq!(form.receive().display_text(), "1,851,851.7");
///
/// form.input(Field::Receive, "1000000").unwrap();
/// assert_eq!(form.send().numeric_value(), dec!(666.6667));
/// ```
#[derive(Debug)]
pub struct TransactionForm {
    resolver: ConstraintResolver,
    policy: CatalogPolicy,
    assets: AssetRegistry,
    base_catalog: CurrencyCatalog,
    catalog: CurrencyCatalog,
    send: AmountField,
    receive: AmountField,
    direction: Direction,
    rate: Option<ExchangeRate>,
    network: Network,
    asset: Option<AssetCode>,
    currency: Option<CurrencyCode>,
    currency_locked: bool,
    bounds: AssetConstraint,
    constraint_error: Option<ConstraintError>,
    /// Resolved once per mount, lower-case ISO 3166-1 alpha-2.
    country: Option<String>,
    balance: Option<Decimal>,
    wallet_address: Option<String>,
    verified: bool,
    kyc_prompt_open: bool,
    generations: RequestGenerations,
    notices: Vec<Notice>,
    seeded: bool,
}

impl TransactionForm {
    /// A fresh form on the configured default network with its first
    /// supported asset selected.
    ///
    /// If that asset needs a bounds lookup, call
    /// [`begin_constraint_resolution`](Self::begin_constraint_resolution).
    pub fn new(config: &FormConfig) -> Self {
        let base_catalog = CurrencyCatalog::from_specs(&config.currencies);
        let network = config.default_network.clone();
        let asset = config.assets.default_asset(&network).cloned();
        let mut form = Self {
            resolver: ConstraintResolver::new(config),
            policy: CatalogPolicy::new(config),
            assets: config.assets.clone(),
            catalog: base_catalog.clone(),
            base_catalog,
            send: AmountField::send(),
            receive: AmountField::receive(),
            direction: Direction::default(),
            rate: None,
            network,
            asset,
            currency: None,
            currency_locked: false,
            bounds: config.default_bounds,
            constraint_error: None,
            country: None,
            balance: None,
            wallet_address: None,
            verified: false,
            kyc_prompt_open: false,
            generations: RequestGenerations::new(),
            notices: Vec::new(),
            seeded: false,
        };
        form.refresh_catalog();
        form
    }

    // --- Amounts ---

    /// Keystroke into `field`: `raw` is the full text of the input.
    ///
    /// A rejected keystroke changes nothing, not even the direction.
    pub fn input(&mut self, field: Field, raw: &str) -> Result<(), InputRejection> {
        self.field_mut(field).apply_input(raw)?;
        self.direction = Direction::from(field);
        self.recompute();
        Ok(())
    }

    /// Decimal-point key pressed in `field`. Returns `false` when the
    /// field already has a decimal point.
    pub fn decimal_key(&mut self, field: Field) -> bool {
        if !self.field_mut(field).apply_decimal_key() {
            return false;
        }
        self.direction = Direction::from(field);
        self.recompute();
        true
    }

    /// New rate from the quote collaborator. Zero or `None` suspends
    /// conversion; a positive rate re-derives the non-driving field.
    pub fn set_rate(&mut self, rate: Option<Decimal>) {
        self.rate = ExchangeRate::from_optional(rate);
        debug!("rate set to {:?}", self.rate.map(|r| r.value()));
        self.recompute();
    }

    pub fn set_balance(&mut self, balance: Option<Decimal>) {
        self.balance = balance;
    }

    /// Fill Send with the whole wallet balance. No-op without a positive
    /// balance.
    pub fn use_max_balance(&mut self) -> bool {
        let Some(balance) = self.balance.filter(|b| *b > Decimal::ZERO) else {
            return false;
        };
        self.send
            .set_value(round_half_away(balance, SEND_DECIMAL_PLACES));
        self.direction = Direction::SendDriven;
        self.recompute();
        true
    }

    fn recompute(&mut self) {
        let update = RateConverter::recompute(
            self.direction,
            Some(self.send.numeric_value()),
            Some(self.receive.numeric_value()),
            self.rate,
        );
        let Some(update) = update else {
            return;
        };
        debug!("{}: {} set to {}", self.direction, update.field(), update.value());
        match update {
            Recomputed::AmountSent(value) => self.send.set_value(value),
            Recomputed::AmountReceived(value) => self.receive.set_value(value),
        }
    }

    fn field_mut(&mut self, field: Field) -> &mut AmountField {
        match field {
            Field::Send => &mut self.send,
            Field::Receive => &mut self.receive,
        }
    }

    // --- Selections ---

    /// Select the asset to send. Recomputes the catalog and starts a
    /// bounds resolution; the returned request needs fetching only for
    /// the pegged asset.
    pub fn select_asset(
        &mut self,
        asset: AssetCode,
    ) -> Result<Option<ConstraintRequest>, SelectionError> {
        if !self.assets.is_supported(&self.network, &asset) {
            return Err(SelectionError::UnsupportedAsset {
                asset,
                network: self.network.clone(),
            });
        }
        info!("asset selected: {}", asset);
        self.asset = Some(asset);
        self.refresh_catalog();
        Ok(self.begin_constraint_resolution())
    }

    /// Switch networks, falling back to the network's first asset when the
    /// current one is not available there.
    pub fn select_network(&mut self, network: Network) -> Option<ConstraintRequest> {
        info!("network selected: {}", network);
        self.network = network;
        let supported = self
            .asset
            .as_ref()
            .map_or(false, |asset| self.assets.is_supported(&self.network, asset));
        if !supported {
            self.asset = self.assets.default_asset(&self.network).cloned();
            debug!("asset reset to {:?} for {}", self.asset, self.network);
        }
        self.refresh_catalog();
        self.begin_constraint_resolution()
    }

    pub fn select_currency(&mut self, currency: CurrencyCode) -> Result<(), SelectionError> {
        match self.catalog.get(&currency) {
            None => Err(SelectionError::UnknownCurrency(currency)),
            Some(entry) if entry.disabled => Err(SelectionError::CurrencyDisabled(currency)),
            Some(_) => {
                self.currency = Some(currency);
                Ok(())
            }
        }
    }

    /// Rebuild the catalog from the base list: asset rule first, then the
    /// cached locale rank.
    fn refresh_catalog(&mut self) {
        let outcome = self.base_catalog.apply_asset_rule(
            self.asset.as_ref(),
            self.currency.as_ref(),
            &self.policy,
        );
        self.catalog = match &self.country {
            Some(country) => outcome.catalog.apply_locale_rank(country),
            None => outcome.catalog,
        };
        self.currency_locked = outcome.locked;

        if let Some(forced) = outcome.force_select {
            info!("currency forced to {}", forced);
            self.currency = Some(forced);
        } else if let Some(selected) = &self.currency {
            if !self.catalog.is_enabled(selected) {
                debug!("{} is no longer available, clearing selection", selected);
                self.currency = None;
            }
        }
    }

    // --- Bounds ---

    /// Start resolving the bounds of the selected asset, superseding any
    /// earlier resolution.
    ///
    /// Assets without a lookup get the default bounds immediately and
    /// `None` is returned.
    pub fn begin_constraint_resolution(&mut self) -> Option<ConstraintRequest> {
        let ticket = self.generations.begin(RequestKind::Constraints);
        match self.asset.clone() {
            Some(asset) if self.resolver.requires_lookup(&asset) => Some(ConstraintRequest {
                ticket,
                asset,
                network: self.network.clone(),
                resolver: self.resolver.clone(),
            }),
            _ => {
                self.bounds = self.resolver.defaults();
                self.constraint_error = None;
                None
            }
        }
    }

    /// Apply a bounds response. Returns `false` if it was stale.
    ///
    /// On failure the previous bounds stay in force and an error notice
    /// is queued.
    pub fn apply_constraints(&mut self, response: ConstraintResponse) -> bool {
        if !self.generations.is_current(response.ticket) {
            debug!("dropping stale bounds for {}", response.asset);
            return false;
        }
        match response.result {
            Ok(bounds) => {
                info!("bounds for {}: {}", response.asset, bounds);
                self.bounds = bounds;
                self.constraint_error = None;
            }
            Err(e) => {
                warn!("bounds lookup for {} failed, keeping {}: {}", response.asset, self.bounds, e);
                self.notices
                    .push(Notice::error("No available quote", e.to_string()));
                self.constraint_error = Some(e);
            }
        }
        true
    }

    pub async fn resolve_constraints(&mut self, rates: &dyn RateService) -> bool {
        match self.begin_constraint_resolution() {
            Some(request) => {
                let response = request.fetch(rates).await;
                self.apply_constraints(response)
            }
            None => true,
        }
    }

    // --- Locale ---

    /// Start the country lookup. `None` once the country is known: it is
    /// resolved at most once per mount.
    pub fn begin_locale_lookup(&mut self) -> Option<LocaleRequest> {
        if self.country.is_some() {
            return None;
        }
        Some(LocaleRequest {
            ticket: self.generations.begin(RequestKind::Locale),
        })
    }

    /// Apply a country lookup. Failures keep the current order.
    pub fn apply_locale(&mut self, response: LocaleResponse) -> bool {
        if !self.generations.is_current(response.ticket) {
            debug!("dropping stale locale response");
            return false;
        }
        match response.result {
            Ok(country) => {
                let country = country.trim().to_ascii_lowercase();
                info!("ranking currencies for country {}", country);
                self.country = Some(country);
                self.refresh_catalog();
            }
            Err(e) => debug!("locale lookup failed, keeping catalog order: {}", e),
        }
        true
    }

    pub async fn refresh_locale(&mut self, resolver: &dyn LocaleResolver) -> bool {
        match self.begin_locale_lookup() {
            Some(request) => {
                let response = request.fetch(resolver).await;
                self.apply_locale(response)
            }
            None => true,
        }
    }

    // --- Verification ---

    /// Track the active wallet. A new address starts a status check;
    /// clearing it supersedes any check in flight.
    pub fn set_wallet_address(&mut self, address: Option<String>) -> Option<VerificationRequest> {
        if address == self.wallet_address {
            return None;
        }
        self.wallet_address = address;
        if self.wallet_address.is_none() {
            self.generations.invalidate(RequestKind::Verification);
            return None;
        }
        self.begin_verification_check()
    }

    /// Poll the status of the current wallet address again.
    pub fn begin_verification_check(&mut self) -> Option<VerificationRequest> {
        let address = self.wallet_address.clone()?;
        Some(VerificationRequest {
            ticket: self.generations.begin(RequestKind::Verification),
            address,
        })
    }

    pub fn apply_verification(&mut self, response: VerificationResponse) -> bool {
        if !self.generations.is_current(response.ticket) {
            debug!("dropping stale verification status for {}", response.address);
            return false;
        }
        match interpret(&response.address, response.result) {
            VerificationOutcome::PromptKyc => self.kyc_prompt_open = true,
            VerificationOutcome::Verified => self.verified = true,
            VerificationOutcome::Unchanged => {}
        }
        true
    }

    pub async fn check_verification(&mut self, service: &dyn VerificationService) -> bool {
        match self.begin_verification_check() {
            Some(request) => {
                let response = request.fetch(service).await;
                self.apply_verification(response)
            }
            None => false,
        }
    }

    pub fn dismiss_kyc_prompt(&mut self) {
        self.kyc_prompt_open = false;
    }

    // --- Lifecycle ---

    /// Apply the initial seed. The first call never warns about an
    /// unsupported asset; later calls do.
    pub fn apply_seed(&mut self, seed: &SeedParams) -> Option<ConstraintRequest> {
        let first_load = !self.seeded;
        self.seeded = true;

        let mut request = None;
        if let Some(token) = &seed.token {
            match self.select_asset(token.clone()) {
                Ok(r) => request = r,
                Err(e) => {
                    debug!("ignoring seeded asset: {}", e);
                    if !first_load {
                        self.notices.push(Notice::warning(
                            "Unsupported Token",
                            format!("{} token is not supported on the current network.", token),
                        ));
                    }
                }
            }
        }

        if let Some(currency) = &seed.currency {
            if let Err(e) = self.select_currency(currency.clone()) {
                debug!("ignoring seeded currency: {}", e);
            }
        }

        if let Some((field, amount)) = seed.seed_amount() {
            self.field_mut(field).set_value(amount);
            self.direction = Direction::from(field);
            self.recompute();
        }
        request
    }

    /// The form is gone: every outstanding response will be dropped.
    pub fn unmount(&mut self) {
        info!("form unmounted");
        self.generations.close();
    }

    pub fn is_unmounted(&self) -> bool {
        self.generations.is_closed()
    }

    /// Drain the queued user-visible notices.
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    // --- Derived state ---

    pub fn errors(&self) -> FieldErrors {
        validate(
            &self.send,
            &self.receive,
            &ValidationContext {
                bounds: self.bounds,
                balance: self.balance,
                asset_selected: self.asset.is_some(),
                currency_selected: self.currency.is_some(),
            },
        )
    }

    /// Everything needed to submit is present and valid.
    pub fn is_complete(&self) -> bool {
        self.rate.is_some()
            && self.asset.is_some()
            && self.currency.is_some()
            && self.errors().is_empty()
    }

    pub fn snapshot(&self) -> FormSnapshot {
        FormSnapshot {
            network: self.network.clone(),
            asset: self.asset.clone(),
            currency: self.currency.clone(),
            currency_locked: self.currency_locked,
            direction: self.direction,
            rate: self.rate.map(|r| r.value()),
            amount_sent: self.send.display_text().to_string(),
            amount_received: self.receive.display_text().to_string(),
            bounds: self.bounds,
            constraint_error: self.constraint_error.as_ref().map(|e| e.to_string()),
            currencies: self.catalog.codes(),
            enabled_currencies: self.catalog.enabled_codes(),
            errors: self.errors(),
            verified: self.verified,
            kyc_prompt_open: self.kyc_prompt_open,
        }
    }

    // --- Accessors ---

    pub fn send(&self) -> &AmountField {
        &self.send
    }

    pub fn receive(&self) -> &AmountField {
        &self.receive
    }

    pub fn field(&self, field: Field) -> &AmountField {
        match field {
            Field::Send => &self.send,
            Field::Receive => &self.receive,
        }
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn rate(&self) -> Option<ExchangeRate> {
        self.rate
    }

    pub fn network(&self) -> &Network {
        &self.network
    }

    pub fn asset(&self) -> Option<&AssetCode> {
        self.asset.as_ref()
    }

    pub fn currency(&self) -> Option<&CurrencyCode> {
        self.currency.as_ref()
    }

    pub fn is_currency_locked(&self) -> bool {
        self.currency_locked
    }

    pub fn bounds(&self) -> AssetConstraint {
        self.bounds
    }

    pub fn constraint_error(&self) -> Option<&ConstraintError> {
        self.constraint_error.as_ref()
    }

    pub fn catalog(&self) -> &CurrencyCatalog {
        &self.catalog
    }

    pub fn country(&self) -> Option<&str> {
        self.country.as_deref()
    }

    pub fn balance(&self) -> Option<Decimal> {
        self.balance
    }

    pub fn is_verified(&self) -> bool {
        self.verified
    }

    pub fn is_kyc_prompt_open(&self) -> bool {
        self.kyc_prompt_open
    }
}

/// Serializable view of the form, as printed by the CLI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormSnapshot {
    pub network: Network,
    pub asset: Option<AssetCode>,
    pub currency: Option<CurrencyCode>,
    pub currency_locked: bool,
    pub direction: Direction,
    pub rate: Option<Decimal>,
    pub amount_sent: String,
    pub amount_received: String,
    pub bounds: AssetConstraint,
    pub constraint_error: Option<String>,
    pub currencies: Vec<CurrencyCode>,
    pub enabled_currencies: Vec<CurrencyCode>,
    pub errors: FieldErrors,
    pub verified: bool,
    pub kyc_prompt_open: bool,
}
