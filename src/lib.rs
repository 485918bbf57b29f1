//! # swap-form-engine
//!
//! State engine for a crypto-to-fiat swap form.
//!
//! Two amount fields (asset sent, fiat received) stay consistent with a
//! quoted exchange rate while the user types into either one. The engine
//! also resolves per-asset sending bounds, filters and orders the
//! settlement currencies for the selected asset, and guards every
//! asynchronous lookup against stale responses.
//!
//! ## Architecture
//!
//! - **core** — Foundational types: amount fields, codes, rates, direction
//! - **conversion** — Deriving one amount from the other
//! - **constraints** — Sending bounds and their resolution from a quote
//! - **catalog** — Settlement currency filtering and ordering
//! - **services** — Async collaborator traits (quotes, KYC, locale)
//! - **form** — The transaction form tying it all together

pub mod catalog;
pub mod config;
pub mod constraints;
pub mod conversion;
pub mod core;
pub mod form;
pub mod services;

/// Convenience re-exports for common usage.
pub mod prelude {
    pub use crate::catalog::currency_catalog::CurrencyCatalog;
    pub use crate::config::FormConfig;
    pub use crate::constraints::bounds::AssetConstraint;
    pub use crate::constraints::resolver::ConstraintResolver;
    pub use crate::conversion::rate_converter::RateConverter;
    pub use crate::core::amount::{AmountField, Field};
    pub use crate::core::currency::{AssetCode, CurrencyCode, ExchangeRate, Network};
    pub use crate::core::direction::Direction;
    pub use crate::form::seed::SeedParams;
    pub use crate::form::transaction::TransactionForm;
}
