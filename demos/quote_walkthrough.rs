//! Walk through a swap form session.
//!
//! Types into both fields, switches to the pegged asset and watches the
//! currency list and bounds follow, then shows a stale lookup being
//! dropped.

use rust_decimal_macros::dec;
use swap_form_engine::config::FormConfig;
use swap_form_engine::core::amount::Field;
use swap_form_engine::core::currency::{AssetCode, CurrencyCode};
use swap_form_engine::form::transaction::TransactionForm;
use swap_form_engine::services::fixed::{FixedLocaleResolver, FixedRateService};

fn show(form: &TransactionForm) {
    println!(
        "  Send:     {} {}",
        form.send().display_text(),
        form.asset().map_or("-", |a| a.as_str())
    );
    println!(
        "  Receive:  {} {}",
        form.receive().display_text(),
        form.currency().map_or("-", |c| c.as_str())
    );
    println!("  Bounds:   {}", form.bounds());
    let errors = form.errors();
    if let Some(e) = errors.amount_sent {
        println!("  Error:    {}", e);
    }
    println!();
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    println!("╔══════════════════════════════════════════╗");
    println!("║  swap-form-engine: Quote Walkthrough     ║");
    println!("╚══════════════════════════════════════════╝\n");

    let mut form = TransactionForm::new(&FormConfig::default());
    form.refresh_locale(&FixedLocaleResolver::country("KE")).await;

    // --- Scenario 1: typing into either field ---
    println!("━━━ Scenario 1: Send-driven, then Receive-driven ━━━\n");

    form.select_currency(CurrencyCode::new("KES")).ok();
    form.set_rate(Some(dec!(129.4)));
    for raw in ["2", "25", "250", "250.", "250.7"] {
        form.input(Field::Send, raw).ok();
    }
    show(&form);

    form.input(Field::Receive, "50,000").ok();
    show(&form);

    // --- Scenario 2: the pegged asset ---
    println!("━━━ Scenario 2: Pegged asset ━━━\n");

    let rates = FixedRateService::quoting("1600");
    if let Ok(Some(request)) = form.select_asset(AssetCode::new("cNGN")) {
        let response = request.fetch(&rates).await;
        form.apply_constraints(response);
    }
    form.set_rate(Some(dec!(1)));
    form.input(Field::Send, "500").ok();
    println!("  Currencies: {:?}", form.catalog().enabled_codes());
    show(&form);

    // --- Scenario 3: a superseded lookup ---
    println!("━━━ Scenario 3: Stale bounds ━━━\n");

    let stale = form.begin_constraint_resolution();
    form.select_asset(AssetCode::new("USDC")).ok();
    if let Some(request) = stale {
        let applied = form.apply_constraints(request.fetch(&rates).await);
        println!("  Late response applied: {}", applied);
    }
    show(&form);
}
