use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use swap_form_engine::config::FormConfig;
use swap_form_engine::constraints::bounds::AssetConstraint;
use swap_form_engine::core::amount::Field;
use swap_form_engine::core::currency::{AssetCode, CurrencyCode, Network};
use swap_form_engine::core::direction::Direction;
use swap_form_engine::form::notice::NoticeLevel;
use swap_form_engine::form::seed::SeedParams;
use swap_form_engine::form::transaction::TransactionForm;
use swap_form_engine::form::validation::ValidationError;
use swap_form_engine::services::fixed::{
    FixedLocaleResolver, FixedRateService, FixedVerificationService,
};
use swap_form_engine::services::{ServiceError, VerificationStatus};

fn codes(list: &[&str]) -> Vec<CurrencyCode> {
    list.iter().map(|c| CurrencyCode::new(*c)).collect()
}

/// Typing into Send at 1500 NGN per USDC, then switching to Receive.
#[test]
fn typing_in_both_fields() {
    let mut form = TransactionForm::new(&FormConfig::default());
    form.set_rate(Some(dec!(1500)));

    for text in ["1", "12", "1,23", "1,234", "1,234.", "1,234.5", "1,234.5678"] {
        form.input(Field::Send, text).unwrap();
    }
    assert_eq!(form.send().display_text(), "1,234.5678");
    assert_eq!(form.receive().numeric_value(), dec!(1851851.70));
    assert_eq!(form.receive().display_text(), "1,851,851.7");

    // A fifth decimal is rejected and nothing moves.
    assert!(form.input(Field::Send, "1,234.56789").is_err());
    assert_eq!(form.send().numeric_value(), dec!(1234.5678));

    form.input(Field::Receive, "1000000").unwrap();
    assert_eq!(form.direction(), Direction::ReceiveDriven);
    assert_eq!(form.receive().display_text(), "1,000,000");
    assert_eq!(form.send().numeric_value(), dec!(666.6667));
    assert_eq!(form.send().display_text(), "666.6667");
}

/// Rate ticks re-derive from the field the user last touched.
#[test]
fn rate_updates_follow_direction() {
    let mut form = TransactionForm::new(&FormConfig::default());
    form.input(Field::Receive, "1,000,000").unwrap();
    assert!(form.send().is_empty());

    form.set_rate(Some(dec!(1500)));
    assert_eq!(form.send().numeric_value(), dec!(666.6667));

    form.set_rate(Some(dec!(1600)));
    assert_eq!(form.receive().numeric_value(), dec!(1000000));
    assert_eq!(form.send().numeric_value(), dec!(625));

    // Conversion suspended: the last derived value stays.
    form.set_rate(None);
    form.input(Field::Receive, "2,000,000").unwrap();
    assert_eq!(form.send().numeric_value(), dec!(625));
}

/// Selecting the pegged asset pins the currency, resolves scaled bounds
/// and validates against them.
#[tokio::test]
async fn pegged_asset_session() {
    let mut form = TransactionForm::new(&FormConfig::default());
    form.select_currency(CurrencyCode::new("KES")).unwrap();

    let rates = FixedRateService::quoting("1600");
    let request = form.select_asset(AssetCode::new("cNGN")).unwrap().unwrap();
    assert_eq!(form.currency(), Some(&CurrencyCode::new("NGN")));
    assert_eq!(form.catalog().enabled_codes(), codes(&["NGN"]));
    assert_eq!(
        form.catalog().codes(),
        codes(&["NGN", "KES", "GHS", "TZS", "UGX", "MWK", "BRL", "ARS"])
    );

    assert!(form.apply_constraints(request.fetch(&rates).await));
    assert_eq!(
        form.bounds(),
        AssetConstraint::new(dec!(800), dec!(16_000_000))
    );

    // The probe asks for one USDC in NGN on the current network.
    let queries = rates.queries();
    assert_eq!(queries.len(), 1);
    assert_eq!(queries[0].asset, AssetCode::new("USDC"));
    assert_eq!(queries[0].amount, Decimal::ONE);
    assert_eq!(queries[0].currency, CurrencyCode::new("NGN"));
    assert_eq!(queries[0].network, "base");

    form.set_rate(Some(dec!(1)));
    form.input(Field::Send, "500").unwrap();
    let errors = form.errors();
    assert_eq!(errors.amount_sent, Some(ValidationError::BelowMinimum(dec!(800))));
    assert_eq!(
        errors.amount_sent.map(|e| e.to_string()),
        Some("Minimum amount is 800".to_string())
    );

    form.input(Field::Send, "20,000,000").unwrap();
    assert_eq!(
        form.errors().amount_sent.map(|e| e.to_string()),
        Some("Maximum amount is 16,000,000".to_string())
    );

    form.input(Field::Send, "5,000").unwrap();
    assert!(form.is_complete());
}

/// A lookup for an asset the user already left never lands.
#[tokio::test]
async fn superseded_bounds_are_dropped() {
    let mut form = TransactionForm::new(&FormConfig::default());
    let rates = FixedRateService::quoting("1600");

    let stale = form.select_asset(AssetCode::new("cNGN")).unwrap().unwrap();
    let fresh = form.select_asset(AssetCode::new("cNGN")).unwrap().unwrap();

    assert!(!form.apply_constraints(stale.fetch(&rates).await));
    assert!(form.apply_constraints(fresh.fetch(&rates).await));
    assert_eq!(form.bounds().min_send, dec!(800));

    // Leaving for an ordinary asset restores the defaults synchronously.
    let late = form.begin_constraint_resolution().unwrap();
    assert!(form.select_asset(AssetCode::new("USDT")).unwrap().is_none());
    assert_eq!(form.bounds(), AssetConstraint::default());
    assert!(!form.apply_constraints(late.fetch(&rates).await));
    assert_eq!(form.bounds(), AssetConstraint::default());
}

#[tokio::test]
async fn failed_quote_keeps_bounds_and_notifies() {
    let mut form = TransactionForm::new(&FormConfig::default());
    form.select_asset(AssetCode::new("cNGN")).unwrap();

    let failing = FixedRateService::failing(ServiceError::Http {
        status: 503,
        message: "unavailable".into(),
    });
    assert!(form.resolve_constraints(&failing).await);
    assert_eq!(form.bounds(), AssetConstraint::default());
    assert!(form.constraint_error().is_some());

    let notices = form.take_notices();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].level, NoticeLevel::Error);
    assert_eq!(notices[0].title, "No available quote");

    // Non-positive quotes count as failures too.
    assert!(form.resolve_constraints(&FixedRateService::quoting("0")).await);
    assert_eq!(form.bounds(), AssetConstraint::default());

    assert!(form.resolve_constraints(&FixedRateService::quoting("1600")).await);
    assert!(form.constraint_error().is_none());
}

#[tokio::test]
async fn unmounted_form_ignores_responses() {
    let mut form = TransactionForm::new(&FormConfig::default());
    let bounds = form.select_asset(AssetCode::new("cNGN")).unwrap().unwrap();
    let locale = form.begin_locale_lookup().unwrap();
    let kyc = form.set_wallet_address(Some("0xabc".into())).unwrap();
    let before = form.snapshot();

    form.unmount();

    let rates = FixedRateService::quoting("1600");
    let resolver = FixedLocaleResolver::country("KE");
    let service = FixedVerificationService::new(Ok(VerificationStatus::Pending));
    assert!(!form.apply_constraints(bounds.fetch(&rates).await));
    assert!(!form.apply_locale(locale.fetch(&resolver).await));
    assert!(!form.apply_verification(kyc.fetch(&service).await));

    assert_eq!(form.snapshot(), before);
    assert!(form.take_notices().is_empty());
}

#[tokio::test]
async fn locale_ranks_local_currency_first() {
    let mut form = TransactionForm::new(&FormConfig::default());
    assert!(form.refresh_locale(&FixedLocaleResolver::country("UG")).await);
    assert_eq!(
        form.catalog().codes(),
        codes(&["UGX", "KES", "NGN", "TZS", "MWK", "GHS", "BRL", "ARS"])
    );
    assert_eq!(form.catalog().entries()[0].locale_rank, 1);

    // A disabled local currency is not promoted.
    let mut ghana = TransactionForm::new(&FormConfig::default());
    ghana
        .refresh_locale(&FixedLocaleResolver::country("GH"))
        .await;
    assert_eq!(ghana.catalog().codes()[0], CurrencyCode::new("KES"));
}

#[tokio::test]
async fn locale_failure_is_silent() {
    let mut form = TransactionForm::new(&FormConfig::default());
    let before = form.catalog().codes();
    let failing = FixedLocaleResolver::failing(ServiceError::Network("timeout".into()));
    assert!(form.refresh_locale(&failing).await);
    assert_eq!(form.catalog().codes(), before);
    assert!(form.take_notices().is_empty());
}

#[tokio::test]
async fn verification_flow() {
    let mut form = TransactionForm::new(&FormConfig::default());
    let missing = FixedVerificationService::new(Err(ServiceError::Http {
        status: 404,
        message: "not found".into(),
    }));
    let request = form.set_wallet_address(Some("0xabc".into())).unwrap();
    assert!(form.apply_verification(request.fetch(&missing).await));
    assert!(!form.is_verified());
    assert!(!form.is_kyc_prompt_open());

    let pending = FixedVerificationService::new(Ok(VerificationStatus::Pending));
    assert!(form.check_verification(&pending).await);
    assert!(form.is_kyc_prompt_open());

    // Disconnecting supersedes the check in flight.
    let in_flight = form.begin_verification_check().unwrap();
    assert!(form.set_wallet_address(None).is_none());
    let success = FixedVerificationService::new(Ok(VerificationStatus::Success));
    assert!(!form.apply_verification(in_flight.fetch(&success).await));
    assert!(!form.is_verified());
    assert!(!form.check_verification(&success).await);
}

#[tokio::test]
async fn seeded_session() {
    let mut form = TransactionForm::new(&FormConfig::default());
    form.set_rate(Some(dec!(1600)));
    let seed = SeedParams::from_query("?token=cNGN&currency=KES&tokenAmount=1000.555");
    let request = form.apply_seed(&seed).unwrap();

    // The pegged asset wins over the seeded currency.
    assert_eq!(form.asset(), Some(&AssetCode::new("cNGN")));
    assert_eq!(form.currency(), Some(&CurrencyCode::new("NGN")));
    assert_eq!(form.send().numeric_value(), dec!(1000.56));
    assert_eq!(form.receive().numeric_value(), dec!(1600896));

    assert!(form.apply_constraints(request.fetch(&FixedRateService::quoting("1600")).await));
    assert!(form.errors().is_empty());
}

#[test]
fn network_switch_and_unsupported_seed() {
    let mut form = TransactionForm::new(&FormConfig::default());
    form.apply_seed(&SeedParams::default());
    form.select_network(Network::new("Arbitrum One"));

    form.apply_seed(&SeedParams::from_query("token=cNGN"));
    assert_eq!(form.asset(), Some(&AssetCode::new("USDC")));
    let notices = form.take_notices();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].level, NoticeLevel::Warning);
    assert_eq!(
        notices[0].description,
        "cNGN token is not supported on the current network."
    );
}

#[test]
fn balance_checks() {
    let mut form = TransactionForm::new(&FormConfig::default());
    form.set_rate(Some(dec!(1500)));
    form.set_balance(Some(dec!(250)));
    form.input(Field::Send, "300").unwrap();
    assert_eq!(
        form.errors().amount_sent,
        Some(ValidationError::InsufficientBalance(dec!(250)))
    );
    assert!(form.use_max_balance());
    assert_eq!(form.send().display_text(), "250");
    assert_eq!(form.receive().display_text(), "375,000");
    assert_eq!(form.errors().amount_sent, None);
}

#[test]
fn config_overrides_defaults() {
    let json = r#"{
        "default_bounds": { "min_send": "1", "max_send": "500" },
        "default_disabled": [],
        "default_network": "Polygon"
    }"#;
    let config = FormConfig::from_json_str(json).unwrap();
    let mut form = TransactionForm::new(&config);
    assert_eq!(form.network(), &Network::new("Polygon"));
    assert!(form.catalog().is_enabled(&CurrencyCode::new("GHS")));

    form.input(Field::Send, "501").unwrap();
    assert_eq!(
        form.errors().amount_sent,
        Some(ValidationError::AboveMaximum(dec!(500)))
    );
}

/// Amounts too large to convert leave the other field as it was.
#[test]
fn oversized_amounts_suspend_conversion() {
    let mut form = TransactionForm::new(&FormConfig::default());
    form.set_rate(Some(dec!(1500)));
    form.input(Field::Send, "2").unwrap();
    assert_eq!(form.receive().numeric_value(), dec!(3000));

    form.input(Field::Send, "99999999999999999999999999").unwrap();
    assert_eq!(form.direction(), Direction::SendDriven);
    assert_eq!(form.receive().numeric_value(), dec!(3000));

    form.set_rate(Some(dec!(0.0001)));
    form.input(Field::Receive, "9999999999999999999999999999").unwrap();
    assert_eq!(form.direction(), Direction::ReceiveDriven);
    assert_eq!(
        form.send().numeric_value(),
        dec!(99999999999999999999999999)
    );

    // Digits beyond what a decimal can hold are refused outright.
    assert!(form.input(Field::Receive, "999999999999999999999999999999").is_err());

    // Back in range, conversion resumes.
    form.input(Field::Receive, "15").unwrap();
    assert_eq!(form.send().numeric_value(), dec!(150000));
}

#[tokio::test]
async fn oversized_quote_keeps_bounds() {
    let mut form = TransactionForm::new(&FormConfig::default());
    form.select_asset(AssetCode::new("cNGN")).unwrap();
    let huge = FixedRateService::quoting("10000000000000000000000000");
    assert!(form.resolve_constraints(&huge).await);
    assert_eq!(form.bounds(), AssetConstraint::default());
    assert!(form.constraint_error().is_some());
    assert_eq!(form.take_notices().len(), 1);
}
