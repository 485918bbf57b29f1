use crate::core::amount::Field;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which amount field the user edited last.
///
/// The driving field is never overwritten by rate conversion; the other
/// field is derived from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    #[default]
    SendDriven,
    ReceiveDriven,
}

impl Direction {
    /// The field the user is typing into.
    pub fn driving_field(self) -> Field {
        match self {
            Direction::SendDriven => Field::Send,
            Direction::ReceiveDriven => Field::Receive,
        }
    }

    /// The field rate conversion writes to.
    pub fn derived_field(self) -> Field {
        match self {
            Direction::SendDriven => Field::Receive,
            Direction::ReceiveDriven => Field::Send,
        }
    }
}

impl From<Field> for Direction {
    fn from(field: Field) -> Self {
        match field {
            Field::Send => Direction::SendDriven,
            Field::Receive => Direction::ReceiveDriven,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::SendDriven => write!(f, "send-driven"),
            Direction::ReceiveDriven => write!(f, "receive-driven"),
        }
    }
}
