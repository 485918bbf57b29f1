//! swap-form CLI
//!
//! Drive the swap-form engine from the command line.
//!
//! # Usage
//!
//! ```bash
//! # Apply a keystroke to an empty amount field
//! swap-form format --field send --value 1234.5678
//!
//! # Convert between the two fields at a given rate
//! swap-form convert --rate 1500 --receive 1000000
//!
//! # Show the currency list for an asset, ranked for a country
//! swap-form catalog --asset cNGN --country ng
//!
//! # Replay a scripted form session
//! swap-form session --input session.json --format json
//! ```

use log::{debug, info};
use rust_decimal::Decimal;
use std::fs;
use std::process;
use swap_form_engine::catalog::currency_catalog::{CatalogPolicy, CurrencyCatalog};
use swap_form_engine::config::FormConfig;
use swap_form_engine::conversion::rate_converter::RateConverter;
use swap_form_engine::core::amount::{
    format_decimal, AmountField, Field, RECEIVE_DECIMAL_PLACES, SEND_DECIMAL_PLACES,
};
use swap_form_engine::core::currency::{AssetCode, CurrencyCode, ExchangeRate, Network};
use swap_form_engine::form::notice::Notice;
use swap_form_engine::form::requests::{ConstraintRequest, VerificationRequest};
use swap_form_engine::form::seed::SeedParams;
use swap_form_engine::form::transaction::{FormSnapshot, TransactionForm};
use swap_form_engine::services::fixed::{
    FixedLocaleResolver, FixedRateService, FixedVerificationService,
};
use swap_form_engine::services::{ServiceError, VerificationStatus};

fn print_usage() {
    eprintln!(
        r#"swap-form — crypto-to-fiat swap form engine

USAGE:
    swap-form <COMMAND> [OPTIONS]

COMMANDS:
    format      Apply one keystroke to an empty amount field
    convert     Derive one amount from the other at a rate
    catalog     List settlement currencies for an asset
    session     Replay a JSON script of form events
    help        Show this message

OPTIONS (format):
    --field <FIELD>     send (default) or receive
    --value <TEXT>      Full text of the input after the keystroke

OPTIONS (convert):
    --rate <RATE>       Currency units per asset unit
    --send <AMOUNT>     Amount of asset sent
    --receive <AMOUNT>  Amount of fiat received

OPTIONS (catalog):
    --asset <SYMBOL>    Selected asset
    --country <CODE>    ISO 3166-1 alpha-2 code to rank by
    --config <FILE>     Path to JSON form configuration

OPTIONS (session):
    --input <FILE>      Path to JSON session script
    --config <FILE>     Path to JSON form configuration

OPTIONS (all):
    --format <FORMAT>   Output format: text (default) or json

EXAMPLES:
    swap-form format --field receive --value 1000000.5
    swap-form convert --rate 1500 --send 1234.5678
    swap-form catalog --asset cNGN --format json
    swap-form session --input session.json"#
    );
}

/// Options shared by every command. Unset options are `None`.
#[derive(Default)]
struct Options {
    field: Option<String>,
    value: Option<String>,
    rate: Option<String>,
    send: Option<String>,
    receive: Option<String>,
    asset: Option<String>,
    country: Option<String>,
    config: Option<String>,
    input: Option<String>,
    format: Option<String>,
}

impl Options {
    fn json(&self) -> bool {
        self.format.as_deref() == Some("json")
    }
}

fn parse_options(args: &[String], allowed: &[&str]) -> Options {
    let mut options = Options::default();
    let mut i = 0;
    while i < args.len() {
        let flag = args[i].as_str();
        if !allowed.contains(&flag) && flag != "--format" {
            eprintln!("Unknown option: {}", flag);
            process::exit(1);
        }
        i += 1;
        let value = args.get(i).cloned().unwrap_or_else(|| {
            eprintln!("{} requires a value", flag);
            process::exit(1);
        });
        let slot = match flag {
            "--field" => &mut options.field,
            "--value" => &mut options.value,
            "--rate" => &mut options.rate,
            "--send" => &mut options.send,
            "--receive" => &mut options.receive,
            "--asset" => &mut options.asset,
            "--country" => &mut options.country,
            "--config" => &mut options.config,
            "--input" => &mut options.input,
            _ => &mut options.format,
        };
        *slot = Some(value);
        i += 1;
    }
    options
}

fn parse_decimal(flag: &str, text: &str) -> Decimal {
    text.parse().unwrap_or_else(|e| {
        eprintln!("Invalid {} '{}': {}", flag, text, e);
        process::exit(1);
    })
}

fn load_config(path: Option<&str>) -> FormConfig {
    match path {
        Some(path) => FormConfig::from_json_file(path).unwrap_or_else(|e| {
            eprintln!("Error loading config: {}", e);
            process::exit(1);
        }),
        None => FormConfig::default(),
    }
}

fn to_json<T: serde::Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|e| {
        eprintln!("Error serializing output: {}", e);
        process::exit(1);
    })
}

fn cmd_format(args: &[String]) {
    let options = parse_options(args, &["--field", "--value"]);
    let field: Field = options
        .field
        .as_deref()
        .unwrap_or("send")
        .parse()
        .unwrap_or_else(|e| {
            eprintln!("Error: {}", e);
            process::exit(1);
        });
    let raw = options.value.clone().unwrap_or_else(|| {
        eprintln!("Error: --value <TEXT> is required");
        process::exit(1);
    });

    let mut amount = match field {
        Field::Send => AmountField::send(),
        Field::Receive => AmountField::receive(),
    };
    if let Err(e) = amount.apply_input(&raw) {
        eprintln!("Rejected: {}", e);
        process::exit(1);
    }

    if options.json() {
        println!("{}", to_json(&amount));
    } else {
        println!("Display: {}", amount.display_text());
        println!("Value:   {}", amount.numeric_value());
    }
}

#[derive(serde::Serialize)]
struct ConversionOutput {
    rate: Decimal,
    amount_sent: Decimal,
    amount_received: Decimal,
}

fn out_of_range() -> Decimal {
    eprintln!("Error: converted amount is out of range");
    process::exit(1);
}

fn cmd_convert(args: &[String]) {
    let options = parse_options(args, &["--rate", "--send", "--receive"]);
    let rate_text = options.rate.clone().unwrap_or_else(|| {
        eprintln!("Error: --rate <RATE> is required");
        process::exit(1);
    });
    let rate: ExchangeRate = rate_text.parse().unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        process::exit(1);
    });

    let output = match (&options.send, &options.receive) {
        (Some(send), None) => {
            let sent = parse_decimal("--send", send);
            ConversionOutput {
                rate: rate.value(),
                amount_sent: sent,
                amount_received: RateConverter::receive_for(sent, rate)
                    .unwrap_or_else(out_of_range),
            }
        }
        (None, Some(receive)) => {
            let received = parse_decimal("--receive", receive);
            ConversionOutput {
                rate: rate.value(),
                amount_sent: RateConverter::send_for(received, rate)
                    .unwrap_or_else(out_of_range),
                amount_received: received,
            }
        }
        _ => {
            eprintln!("Error: exactly one of --send or --receive is required");
            process::exit(1);
        }
    };

    if options.json() {
        println!("{}", to_json(&output));
    } else {
        println!("Rate:     {}", output.rate);
        println!("Send:     {}", format_decimal(output.amount_sent, SEND_DECIMAL_PLACES));
        println!(
            "Receive:  {}",
            format_decimal(output.amount_received, RECEIVE_DECIMAL_PLACES)
        );
    }
}

fn cmd_catalog(args: &[String]) {
    let options = parse_options(args, &["--asset", "--country", "--config"]);
    let config = load_config(options.config.as_deref());
    let asset = options.asset.as_deref().map(AssetCode::new);

    let base = CurrencyCatalog::from_specs(&config.currencies);
    let outcome = base.apply_asset_rule(asset.as_ref(), None, &CatalogPolicy::new(&config));
    let catalog = match &options.country {
        Some(country) => outcome.catalog.apply_locale_rank(country),
        None => outcome.catalog,
    };

    if options.json() {
        println!("{}", to_json(&catalog));
        return;
    }

    if outcome.locked {
        println!("Currency locked to {}", config.reference_currency);
    }
    for entry in catalog.entries() {
        println!(
            "  {:<4} {:<22} {}{}",
            entry.code.as_str(),
            entry.label,
            if entry.disabled { "disabled" } else { "enabled" },
            if entry.locale_rank > 0 { " (local)" } else { "" }
        );
    }
}

/// Collaborator responses and the events to replay.
#[derive(serde::Deserialize)]
struct SessionScript {
    /// Price returned by the quote service; absent means no quote.
    #[serde(default)]
    quote: Option<String>,
    /// Country returned by the locale resolver; absent means lookup fails.
    #[serde(default)]
    country: Option<String>,
    #[serde(default)]
    verification: Option<VerificationStatus>,
    events: Vec<SessionEvent>,
}

#[derive(serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum SessionEvent {
    Seed { query: String },
    Rate { value: Option<Decimal> },
    Input { field: Field, text: String },
    DecimalKey { field: Field },
    Asset { symbol: String },
    Network { name: String },
    Currency { code: String },
    Balance { value: Option<Decimal> },
    MaxBalance,
    Wallet { address: Option<String> },
    Locale,
    Unmount,
}

#[derive(serde::Serialize)]
struct SessionOutput {
    log: Vec<String>,
    notices: Vec<Notice>,
    complete: bool,
    form: FormSnapshot,
}

struct Session {
    form: TransactionForm,
    rates: FixedRateService,
    locale: FixedLocaleResolver,
    verification: FixedVerificationService,
    log: Vec<String>,
    notices: Vec<Notice>,
}

impl Session {
    async fn constraints(&mut self, request: Option<ConstraintRequest>) {
        if let Some(request) = request {
            let response = request.fetch(&self.rates).await;
            if !self.form.apply_constraints(response) {
                self.log.push("bounds response dropped".to_string());
            }
        }
    }

    async fn verification(&mut self, request: Option<VerificationRequest>) {
        if let Some(request) = request {
            let response = request.fetch(&self.verification).await;
            if !self.form.apply_verification(response) {
                self.log.push("verification response dropped".to_string());
            }
        }
    }

    async fn replay(&mut self, event: SessionEvent) {
        match event {
            SessionEvent::Seed { query } => {
                let request = self.form.apply_seed(&SeedParams::from_query(&query));
                self.constraints(request).await;
            }
            SessionEvent::Rate { value } => self.form.set_rate(value),
            SessionEvent::Input { field, text } => {
                if let Err(e) = self.form.input(field, &text) {
                    self.log.push(format!("{} input '{}' rejected: {}", field, text, e));
                }
            }
            SessionEvent::DecimalKey { field } => {
                if !self.form.decimal_key(field) {
                    self.log.push(format!("{} already has a decimal point", field));
                }
            }
            SessionEvent::Asset { symbol } => match self.form.select_asset(AssetCode::new(symbol)) {
                Ok(request) => self.constraints(request).await,
                Err(e) => self.log.push(e.to_string()),
            },
            SessionEvent::Network { name } => {
                let request = self.form.select_network(Network::new(name));
                self.constraints(request).await;
            }
            SessionEvent::Currency { code } => {
                if let Err(e) = self.form.select_currency(CurrencyCode::new(code)) {
                    self.log.push(e.to_string());
                }
            }
            SessionEvent::Balance { value } => self.form.set_balance(value),
            SessionEvent::MaxBalance => {
                if !self.form.use_max_balance() {
                    self.log.push("no balance to use".to_string());
                }
            }
            SessionEvent::Wallet { address } => {
                let request = self.form.set_wallet_address(address);
                self.verification(request).await;
            }
            SessionEvent::Locale => {
                self.form.refresh_locale(&self.locale).await;
            }
            SessionEvent::Unmount => self.form.unmount(),
        }
        self.notices.extend(self.form.take_notices());
    }
}

fn describe(snapshot: &FormSnapshot) {
    let opt = |v: Option<String>| v.unwrap_or_else(|| "-".to_string());
    println!("Network:   {}", snapshot.network);
    println!("Asset:     {}", opt(snapshot.asset.as_ref().map(|a| a.to_string())));
    println!(
        "Currency:  {}{}",
        opt(snapshot.currency.as_ref().map(|c| c.to_string())),
        if snapshot.currency_locked { " (locked)" } else { "" }
    );
    println!("Rate:      {}", opt(snapshot.rate.map(|r| r.to_string())));
    println!("Direction: {}", snapshot.direction);
    println!("Send:      {}", snapshot.amount_sent);
    println!("Receive:   {}", snapshot.amount_received);
    println!("Bounds:    {}", snapshot.bounds);
    if let Some(e) = &snapshot.constraint_error {
        println!("           last lookup failed: {}", e);
    }
    let codes: Vec<String> = snapshot.currencies.iter().map(|c| c.to_string()).collect();
    println!("Catalog:   {}", codes.join(", "));
    if let Some(e) = &snapshot.errors.amount_sent {
        println!("Send error:    {}", e);
    }
    if let Some(e) = &snapshot.errors.amount_received {
        println!("Receive error: {}", e);
    }
    println!("Verified:  {}", snapshot.verified);
    if snapshot.kyc_prompt_open {
        println!("KYC prompt open");
    }
}

async fn cmd_session(args: &[String]) {
    let options = parse_options(args, &["--input", "--config"]);
    let config = load_config(options.config.as_deref());
    let path = options.input.clone().unwrap_or_else(|| {
        eprintln!("Error: --input <FILE> is required");
        process::exit(1);
    });
    let content = fs::read_to_string(&path).unwrap_or_else(|e| {
        eprintln!("Error reading file '{}': {}", path, e);
        process::exit(1);
    });
    let script: SessionScript = serde_json::from_str(&content).unwrap_or_else(|e| {
        eprintln!("Error parsing JSON: {}", e);
        eprintln!("Expected format:");
        eprintln!(
            r#"{{
  "quote": "1600",
  "country": "NG",
  "verification": "success",
  "events": [
    {{ "type": "rate", "value": "1500" }},
    {{ "type": "input", "field": "send", "text": "1234.5678" }}
  ]
}}"#
        );
        process::exit(1);
    });

    let rates = match script.quote {
        Some(price) => FixedRateService::quoting(price),
        None => FixedRateService::failing(ServiceError::NoQuote("no quote configured".into())),
    };
    let locale = match script.country {
        Some(country) => FixedLocaleResolver::country(country),
        None => FixedLocaleResolver::failing(ServiceError::Locale("no country configured".into())),
    };
    let verification = match script.verification {
        Some(status) => FixedVerificationService::new(Ok(status)),
        None => FixedVerificationService::new(Ok(VerificationStatus::NotFound)),
    };

    let mut session = Session {
        form: TransactionForm::new(&config),
        rates,
        locale,
        verification,
        log: Vec::new(),
        notices: Vec::new(),
    };
    let initial = session.form.begin_constraint_resolution();
    session.constraints(initial).await;

    info!("replaying {} events from {}", script.events.len(), path);
    for event in script.events {
        session.replay(event).await;
    }
    debug!("{} rate queries issued", session.rates.queries().len());

    let output = SessionOutput {
        complete: session.form.is_complete(),
        form: session.form.snapshot(),
        log: session.log,
        notices: session.notices,
    };

    if options.json() {
        println!("{}", to_json(&output));
    } else {
        describe(&output.form);
        println!("Complete:  {}", output.complete);
        for line in &output.log {
            println!("  - {}", line);
        }
        for notice in &output.notices {
            println!("  ! {}", notice);
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    env_logger::init();
    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        process::exit(1);
    }

    let command = args[1].as_str();
    let rest = &args[2..];

    match command {
        "format" => cmd_format(rest),
        "convert" => cmd_convert(rest),
        "catalog" => cmd_catalog(rest),
        "session" => cmd_session(rest).await,
        "help" | "--help" | "-h" => print_usage(),
        _ => {
            eprintln!("Unknown command: {}", command);
            print_usage();
            process::exit(1);
        }
    }
}
