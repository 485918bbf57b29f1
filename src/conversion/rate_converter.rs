use crate::core::amount::{round_half_away, Field, RECEIVE_DECIMAL_PLACES, SEND_DECIMAL_PLACES};
use crate::core::currency::ExchangeRate;
use crate::core::direction::Direction;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The non-driving amount produced by a recomputation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Recomputed {
    AmountSent(Decimal),
    AmountReceived(Decimal),
}

impl Recomputed {
    /// The field this value must be written to.
    pub fn field(&self) -> Field {
        match self {
            Recomputed::AmountSent(_) => Field::Send,
            Recomputed::AmountReceived(_) => Field::Receive,
        }
    }

    pub fn value(&self) -> Decimal {
        match self {
            Recomputed::AmountSent(v) | Recomputed::AmountReceived(v) => *v,
        }
    }
}

/// Keeps the two amount fields consistent with the exchange rate.
///
/// Stateless: every call derives the non-driving amount from its inputs
/// alone, so the caller decides when to recompute (any change to either
/// amount or to the rate).
///
/// # Examples
///
/// ```
/// use swap_form_engine::conversion::rate_converter::{RateConverter, Recomputed};
/// use swap_form_engine::core::currency::ExchangeRate;
/// use swap_form_engine::core::direction::Direction;
/// use rust_decimal_macros::dec;
///
/// let rate = ExchangeRate::new(dec!(1500)).ok();
/// let out = RateConverter::recompute(Direction::SendDriven, Some(dec!(1234.5678)), None, rate);
/// assert_eq!(out, Some(Recomputed::AmountReceived(dec!(1851851.70))));
/// ```
pub struct RateConverter;

impl RateConverter {
    /// Derive the non-driving amount.
    ///
    /// Returns `None` (no-op) when there is no rate, when neither amount
    /// is positive, or when the result does not fit in a `Decimal`. The
    /// driving amount is never part of the output.
    pub fn recompute(
        direction: Direction,
        amount_sent: Option<Decimal>,
        amount_received: Option<Decimal>,
        rate: Option<ExchangeRate>,
    ) -> Option<Recomputed> {
        let rate = rate?;
        let positive = |v: Option<Decimal>| v.map_or(false, |v| v > Decimal::ZERO);
        if !positive(amount_sent) && !positive(amount_received) {
            return None;
        }

        match direction {
            Direction::ReceiveDriven => {
                Self::send_for(amount_received.unwrap_or(Decimal::ZERO), rate)
                    .map(Recomputed::AmountSent)
            }
            Direction::SendDriven => {
                Self::receive_for(amount_sent.unwrap_or(Decimal::ZERO), rate)
                    .map(Recomputed::AmountReceived)
            }
        }
    }

    /// Fiat received for `amount_sent` units of asset, to 2 places.
    /// `None` on overflow.
    pub fn receive_for(amount_sent: Decimal, rate: ExchangeRate) -> Option<Decimal> {
        rate.value()
            .checked_mul(amount_sent)
            .map(|v| round_half_away(v, RECEIVE_DECIMAL_PLACES))
    }

    /// Asset needed to receive `amount_received` fiat, to 4 places.
    /// `None` on overflow.
    pub fn send_for(amount_received: Decimal, rate: ExchangeRate) -> Option<Decimal> {
        amount_received
            .checked_div(rate.value())
            .map(|v| round_half_away(v, SEND_DECIMAL_PLACES))
    }
}
