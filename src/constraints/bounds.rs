use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Sendable range for the selected asset, in asset units.
///
/// # Examples
///
/// ```
/// use swap_form_engine::constraints::bounds::AssetConstraint;
/// use rust_decimal_macros::dec;
///
/// let bounds = AssetConstraint::default().scaled(dec!(1600)).unwrap();
/// assert_eq!(bounds.min_send, dec!(800));
/// assert_eq!(bounds.max_send, dec!(16_000_000));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetConstraint {
    pub min_send: Decimal,
    pub max_send: Decimal,
}

impl Default for AssetConstraint {
    fn default() -> Self {
        Self {
            min_send: dec!(0.5),
            max_send: dec!(10000),
        }
    }
}

impl AssetConstraint {
    pub fn new(min_send: Decimal, max_send: Decimal) -> Self {
        Self { min_send, max_send }
    }

    /// Both bounds multiplied by a reference price. `None` on overflow.
    pub fn scaled(&self, price: Decimal) -> Option<Self> {
        Some(Self {
            min_send: self.min_send.checked_mul(price)?,
            max_send: self.max_send.checked_mul(price)?,
        })
    }

    pub fn contains(&self, amount: Decimal) -> bool {
        amount >= self.min_send && amount <= self.max_send
    }
}

impl fmt::Display for AssetConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.min_send, self.max_send)
    }
}
