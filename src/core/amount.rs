use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Thousands separator inserted for display and stripped before parsing.
pub const GROUPING_SEPARATOR: char = ',';

/// Decimal places accepted in the Send (asset) field.
pub const SEND_DECIMAL_PLACES: u32 = 4;

/// Decimal places accepted in the Receive (fiat) field.
pub const RECEIVE_DECIMAL_PLACES: u32 = 2;

static PLAIN_DECIMAL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]*\.?[0-9]*$").expect("static regex"));

/// One of the two amount inputs of the swap form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    /// Amount of asset the user sends.
    Send,
    /// Amount of fiat the recipient receives.
    Receive,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Field::Send => write!(f, "send"),
            Field::Receive => write!(f, "receive"),
        }
    }
}

impl FromStr for Field {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "send" => Ok(Field::Send),
            "receive" => Ok(Field::Receive),
            other => Err(format!("unknown field '{}'", other)),
        }
    }
}

/// Why a keystroke was ignored. Rejections never change field state and
/// are not surfaced to the user.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputRejection {
    #[error("'{0}' is not a plain decimal number")]
    Malformed(String),
    #[error("at most {max} decimal places are allowed")]
    TooManyDecimals { max: u32 },
}

/// Text and value of one amount input.
///
/// Invariant: `numeric_value == parse_amount(&strip_grouping(display_text))`
/// and the fractional part of `display_text` never exceeds
/// `max_decimal_places` digits.
///
/// # Examples
///
/// ```
/// use swap_form_engine::core::amount::AmountField;
/// use rust_decimal_macros::dec;
///
/// let mut send = AmountField::send();
/// send.apply_input("1234.5").unwrap();
/// assert_eq!(send.display_text(), "1,234.5");
/// assert_eq!(send.numeric_value(), dec!(1234.5));
///
/// // A fifth decimal place is refused and nothing changes.
/// send.apply_input("1234.56785").unwrap_err();
/// assert_eq!(send.display_text(), "1,234.5");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmountField {
    display_text: String,
    numeric_value: Decimal,
    max_decimal_places: u32,
}

impl AmountField {
    pub fn new(max_decimal_places: u32) -> Self {
        Self {
            display_text: String::new(),
            numeric_value: Decimal::ZERO,
            max_decimal_places,
        }
    }

    pub fn send() -> Self {
        Self::new(SEND_DECIMAL_PLACES)
    }

    pub fn receive() -> Self {
        Self::new(RECEIVE_DECIMAL_PLACES)
    }

    // --- Accessors ---

    pub fn display_text(&self) -> &str {
        &self.display_text
    }

    pub fn numeric_value(&self) -> Decimal {
        self.numeric_value
    }

    pub fn max_decimal_places(&self) -> u32 {
        self.max_decimal_places
    }

    pub fn is_empty(&self) -> bool {
        self.display_text.is_empty()
    }

    /// Process the full text of the input after a keystroke.
    ///
    /// On rejection the field is left exactly as it was.
    pub fn apply_input(&mut self, raw: &str) -> Result<(), InputRejection> {
        *self = self.edit(raw)?;
        Ok(())
    }

    /// Compute the field that results from `raw` without mutating `self`.
    pub fn edit(&self, raw: &str) -> Result<AmountField, InputRejection> {
        if raw == "." {
            return Ok(self.with("0.".to_string(), Decimal::ZERO));
        }

        let current = strip_grouping(&self.display_text);
        if raw.ends_with('.') && !current.is_empty() && !current.contains('.') {
            let pending = format!("{}.", current);
            let value = parse_amount(&pending);
            return Ok(self.with(format_grouped(&pending, self.max_decimal_places), value));
        }

        let cleaned = strip_grouping(raw);
        if cleaned.is_empty() {
            return Ok(self.with(String::new(), Decimal::ZERO));
        }

        if !PLAIN_DECIMAL.is_match(&cleaned) {
            return Err(InputRejection::Malformed(raw.to_string()));
        }

        if decimal_places(&cleaned) > self.max_decimal_places as usize {
            return Err(InputRejection::TooManyDecimals {
                max: self.max_decimal_places,
            });
        }

        let value = try_parse_amount(&cleaned)
            .ok_or_else(|| InputRejection::Malformed(raw.to_string()))?;
        Ok(self.with(format_grouped(&cleaned, self.max_decimal_places), value))
    }

    /// Dedicated handler for the decimal-point key.
    ///
    /// Returns `false` (and does nothing) when the display already holds a
    /// decimal point; the ordinary input path then takes over.
    pub fn apply_decimal_key(&mut self) -> bool {
        if self.display_text.contains('.') {
            return false;
        }
        let value = parse_amount(&strip_grouping(&self.display_text));
        self.display_text = if self.display_text.is_empty() {
            "0.".to_string()
        } else {
            format!("{}.", self.display_text)
        };
        self.numeric_value = value;
        true
    }

    /// Programmatic assignment: rounds to the field's precision and renders
    /// without trailing zeros.
    pub fn set_value(&mut self, value: Decimal) {
        let rounded = round_half_away(value.max(Decimal::ZERO), self.max_decimal_places);
        self.display_text = format_decimal(rounded, self.max_decimal_places);
        self.numeric_value = rounded;
    }

    pub fn clear(&mut self) {
        self.display_text.clear();
        self.numeric_value = Decimal::ZERO;
    }

    fn with(&self, display_text: String, numeric_value: Decimal) -> AmountField {
        AmountField {
            display_text,
            numeric_value,
            max_decimal_places: self.max_decimal_places,
        }
    }
}

/// Remove every grouping separator.
pub fn strip_grouping(text: &str) -> String {
    text.chars().filter(|c| *c != GROUPING_SEPARATOR).collect()
}

/// Number of digits after the first decimal point.
pub fn decimal_places(text: &str) -> usize {
    text.split_once('.').map(|(_, frac)| frac.len()).unwrap_or(0)
}

/// Parse a plain (separator-free) decimal string. Partial forms such as
/// `"12."` or `".5"` are accepted; anything unparsable yields zero.
pub fn parse_amount(cleaned: &str) -> Decimal {
    try_parse_amount(cleaned).unwrap_or(Decimal::ZERO)
}

/// Like [`parse_amount`], but `None` when the text is not a decimal or
/// does not fit in one.
pub fn try_parse_amount(cleaned: &str) -> Option<Decimal> {
    let (int_part, frac_part) = cleaned.split_once('.').unwrap_or((cleaned, ""));
    let int_part = if int_part.is_empty() { "0" } else { int_part };
    let normalized = if frac_part.is_empty() {
        int_part.to_string()
    } else {
        format!("{}.{}", int_part, frac_part)
    };
    Decimal::from_str(&normalized).ok()
}

/// Group the integer part of a plain or already-grouped decimal string.
///
/// The fractional part is kept verbatim up to `max_decimal_places` digits
/// and never padded. Idempotent.
///
/// ```
/// use swap_form_engine::core::amount::format_grouped;
///
/// assert_eq!(format_grouped("1234567.5", 4), "1,234,567.5");
/// assert_eq!(format_grouped("1,234,567.5", 4), "1,234,567.5");
/// assert_eq!(format_grouped("12.", 2), "12.");
/// assert_eq!(format_grouped(".", 2), "0.");
/// ```
pub fn format_grouped(text: &str, max_decimal_places: u32) -> String {
    if text.is_empty() {
        return String::new();
    }
    let plain = strip_grouping(text);
    match plain.split_once('.') {
        Some((int_part, frac_part)) => {
            let int_part = if int_part.is_empty() { "0" } else { int_part };
            let frac: String = frac_part.chars().take(max_decimal_places as usize).collect();
            format!("{}.{}", group_thousands(int_part), frac)
        }
        None => group_thousands(&plain),
    }
}

/// Render a decimal value for display, without trailing zeros.
pub fn format_decimal(value: Decimal, max_decimal_places: u32) -> String {
    let text = value.normalize().to_string();
    format_grouped(&text, max_decimal_places)
}

/// Round half away from zero to `dp` decimal places.
pub fn round_half_away(value: Decimal, dp: u32) -> Decimal {
    value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero)
}

fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(GROUPING_SEPARATOR);
        }
        out.push(ch);
    }
    out
}
