use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use thiserror::Error;

/// Money is a fixed-point decimal so balances and rates never pick up
/// floating-point drift. 1000.50 is stored exactly.
pub type Money = Decimal;

/// Format an amount with exactly two decimal places.
/// Example: 1500 -> "1500.00", 60.005 -> "60.01", -12.3 -> "-12.30"
pub fn format_amount(amount: Money) -> String {
    format!(
        "{:.2}",
        amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
    )
}

/// Parse user-typed text into an amount.
/// Example: "50.00" -> 50.00, "12.5" -> 12.5, " 100 " -> 100
///
/// The sign is kept; deciding whether a negative value is acceptable is up to
/// the operation receiving it.
pub fn parse_amount(input: &str) -> Result<Money, ParseAmountError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(ParseAmountError::Empty);
    }

    Decimal::from_str(input).map_err(|_| ParseAmountError::InvalidFormat(input.to_string()))
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseAmountError {
    #[error("empty amount")]
    Empty,

    #[error("invalid amount format: {0}")]
    InvalidFormat(String),
}
