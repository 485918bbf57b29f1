use crate::constraints::bounds::AssetConstraint;
use crate::core::amount::{decimal_places, format_decimal, strip_grouping, AmountField, SEND_DECIMAL_PLACES};
use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;

/// Inline, per-field validation failures. They never block typing.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", content = "limit", rename_all = "snake_case")]
pub enum ValidationError {
    #[error("Amount is required")]
    Required,
    #[error("Minimum amount is {}", grouped(.0))]
    BelowMinimum(Decimal),
    #[error("Maximum amount is {}", grouped(.0))]
    AboveMaximum(Decimal),
    #[error("Maximum {0} decimal places allowed")]
    TooManyDecimals(u32),
    #[error("Insufficient balance")]
    InsufficientBalance(Decimal),
}

fn grouped(value: &Decimal) -> String {
    format_decimal(*value, SEND_DECIMAL_PLACES)
}

/// Validation errors of both amount fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FieldErrors {
    pub amount_sent: Option<ValidationError>,
    pub amount_received: Option<ValidationError>,
}

impl FieldErrors {
    pub fn is_empty(&self) -> bool {
        self.amount_sent.is_none() && self.amount_received.is_none()
    }
}

/// Inputs the validation rules depend on besides the fields themselves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationContext {
    pub bounds: AssetConstraint,
    pub balance: Option<Decimal>,
    pub asset_selected: bool,
    pub currency_selected: bool,
}

/// Check the Send field: required, precision, bounds, then balance.
///
/// The field is inactive (always valid) until an asset is selected.
///
/// ```
/// use swap_form_engine::constraints::bounds::AssetConstraint;
/// use swap_form_engine::core::amount::AmountField;
/// use swap_form_engine::form::validation::{validate_send, ValidationContext};
///
/// let ctx = ValidationContext {
///     bounds: AssetConstraint::default(),
///     balance: None,
///     asset_selected: true,
///     currency_selected: true,
/// };
/// let mut send = AmountField::send();
/// send.apply_input("20000").unwrap();
/// let err = validate_send(&send, &ctx).unwrap();
/// assert_eq!(err.to_string(), "Maximum amount is 10,000");
/// ```
pub fn validate_send(field: &AmountField, ctx: &ValidationContext) -> Option<ValidationError> {
    if !ctx.asset_selected {
        return None;
    }
    if field.is_empty() {
        return Some(ValidationError::Required);
    }
    if decimal_places(&strip_grouping(field.display_text())) > SEND_DECIMAL_PLACES as usize {
        return Some(ValidationError::TooManyDecimals(SEND_DECIMAL_PLACES));
    }
    let amount = field.numeric_value();
    if amount < ctx.bounds.min_send {
        return Some(ValidationError::BelowMinimum(ctx.bounds.min_send));
    }
    if amount > ctx.bounds.max_send {
        return Some(ValidationError::AboveMaximum(ctx.bounds.max_send));
    }
    match ctx.balance {
        Some(balance) if amount > balance => Some(ValidationError::InsufficientBalance(balance)),
        _ => None,
    }
}

/// Check the Receive field: required once both an asset and a currency
/// are selected. Bounds are enforced on the Send side only.
pub fn validate_receive(field: &AmountField, ctx: &ValidationContext) -> Option<ValidationError> {
    if ctx.asset_selected && ctx.currency_selected && field.is_empty() {
        return Some(ValidationError::Required);
    }
    None
}

pub fn validate(send: &AmountField, receive: &AmountField, ctx: &ValidationContext) -> FieldErrors {
    FieldErrors {
        amount_sent: validate_send(send, ctx),
        amount_received: validate_receive(receive, ctx),
    }
}
