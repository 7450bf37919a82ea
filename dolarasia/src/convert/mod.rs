//! Conversion arithmetic. Buying means spending IDR to acquire foreign
//! currency, selling means surrendering foreign currency for IDR. The
//! rounding asymmetry is deliberate: IDR amounts are integral, foreign
//! amounts carry cents.

use serde::{Deserialize, Serialize};

pub const LOCAL_CURRENCY: &str = "IDR";

/// Minimum amount of IDR spent on a buy.
pub const MIN_BUY_LOCAL: f64 = 50_000.0;
/// Minimum amount of foreign units surrendered on a sell.
pub const MIN_SELL_FOREIGN: f64 = 10.0;

#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Buy,
    Sell,
}

/// Pure. Callers validate the inputs first.
pub fn convert(amount: f64, rate: f64, direction: Direction) -> f64 {
    match direction {
        Direction::Buy => ((amount / rate) * 100.0).round() / 100.0,
        Direction::Sell => (amount * rate).round(),
    }
}

/// The minimum for the direction, in the currency the amount is denominated
/// in.
pub fn minimum_amount(direction: Direction) -> f64 {
    match direction {
        Direction::Buy => MIN_BUY_LOCAL,
        Direction::Sell => MIN_SELL_FOREIGN,
    }
}
