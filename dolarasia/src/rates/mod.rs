//! Mock rate board. The catalog is a fixed set of constants and every read
//! applies an independent multiplicative perturbation per price, so the board
//! drifts a little on each refresh with no memory of prior reads. Prices are
//! quoted in IDR per unit of foreign currency.

use rand::thread_rng;
use rand_distr::{Distribution, Uniform};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct ExchangeRate {
    pub code: String,
    pub display_name: String,
    pub buy_price: f64,
    pub sell_price: f64,
    pub glyph: String,
}

const BASE_RATES: [(&str, &str, f64, f64, &str); 6] = [
    ("USD", "US Dollar", 15850.0, 15750.0, "🇺🇸"),
    ("EUR", "Euro", 17200.0, 17050.0, "🇪🇺"),
    ("GBP", "British Pound", 19800.0, 19600.0, "🇬🇧"),
    ("JPY", "Japanese Yen", 106.0, 104.0, "🇯🇵"),
    ("AUD", "Australian Dollar", 10450.0, 10300.0, "🇦🇺"),
    ("SGD", "Singapore Dollar", 11750.0, 11600.0, "🇸🇬"),
];

#[derive(Clone, Debug)]
pub struct RateBoard {
    base: Vec<ExchangeRate>,
}

impl RateBoard {
    pub fn new() -> Self {
        let base = BASE_RATES
            .iter()
            .map(|(code, display_name, buy_price, sell_price, glyph)| ExchangeRate {
                code: (*code).to_string(),
                display_name: (*display_name).to_string(),
                buy_price: *buy_price,
                sell_price: *sell_price,
                glyph: (*glyph).to_string(),
            })
            .collect();
        Self { base }
    }

    pub fn base(&self) -> &[ExchangeRate] {
        &self.base
    }

    /// Jitter is at most ±0.5% of the base price, sampled independently for
    /// every price on every call.
    pub fn fluctuated(&self) -> Vec<ExchangeRate> {
        let jitter = Uniform::new(0.0, 0.01);
        let mut rng = thread_rng();

        self.base
            .iter()
            .map(|rate| ExchangeRate {
                buy_price: (rate.buy_price * (0.995 + jitter.sample(&mut rng))).round(),
                sell_price: (rate.sell_price * (0.995 + jitter.sample(&mut rng))).round(),
                ..rate.clone()
            })
            .collect()
    }
}

impl Default for RateBoard {
    fn default() -> Self {
        Self::new()
    }
}
