//! Synthetic Market Data
//!
//! Random-walk price history used whenever a live quote cannot be read.
//! Seedable so tests are deterministic.

use std::sync::Mutex;

use chrono::{Days, NaiveDate, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rust_decimal::Decimal;

use super::{PricePoint, PriceQuote, QuoteSource};

/// Days of history generated per symbol
pub const SYNTHETIC_DAYS: u64 = 30;

/// Daily upward drift added to every step
const DRIFT: f64 = 0.001;

/// Reference price a synthetic walk is anchored to
pub fn base_price(symbol: &str) -> f64 {
    match symbol.to_uppercase().as_str() {
        "BTC" => 65_000.0,
        "ETH" => 3_500.0,
        "SOL" => 140.0,
        "VTI" => 260.0,
        _ => 100.0,
    }
}

/// Maximum daily move, as a fraction
pub fn volatility(symbol: &str) -> f64 {
    match symbol.to_uppercase().as_str() {
        "BTC" | "ETH" | "SOL" => 0.04,
        _ => 0.015,
    }
}

/// Random-walk quote generator
pub struct SyntheticMarket {
    rng: Mutex<StdRng>,
}

impl Default for SyntheticMarket {
    fn default() -> Self {
        Self::new()
    }
}

impl SyntheticMarket {
    pub fn new() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Deterministic generator (for testing)
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    /// Generate a quote ending today
    pub fn quote(&self, symbol: &str) -> PriceQuote {
        self.quote_ending(symbol, Utc::now().date_naive())
    }

    /// Generate 30 daily closes ending on `last_day`
    ///
    /// The walk starts at 95% of the base price; each step moves by a
    /// uniform draw within the symbol's volatility plus a small drift.
    pub fn quote_ending(&self, symbol: &str, last_day: NaiveDate) -> PriceQuote {
        let vol = volatility(symbol);
        let mut price = base_price(symbol) * 0.95;
        let mut history = Vec::with_capacity(SYNTHETIC_DAYS as usize);

        {
            let mut rng = self.rng.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
            for offset in (0..SYNTHETIC_DAYS).rev() {
                let change: f64 = rng.gen_range(-vol..=vol) + DRIFT;
                price *= 1.0 + change;

                let date = last_day.checked_sub_days(Days::new(offset)).unwrap_or(last_day);
                let value = Decimal::from_f64_retain(price).unwrap_or(Decimal::ONE_HUNDRED).round_dp(4);
                history.push(PricePoint { date, price: value });
            }
        }

        PriceQuote::from_points(symbol, history, QuoteSource::Synthetic)
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 1, 15).unwrap()
    }

    #[test]
    fn test_thirty_daily_points_ending_today() {
        let quote = SyntheticMarket::with_seed(7).quote_ending("SOL", day());

        assert_eq!(quote.history.len(), 30);
        assert_eq!(quote.history.last().unwrap().date, day());
        assert_eq!(quote.history[0].date, NaiveDate::from_ymd_opt(2025, 12, 17).unwrap());
        assert_eq!(quote.source, QuoteSource::Synthetic);
        assert_eq!(quote.price, quote.history.last().unwrap().price);
    }

    #[test]
    fn test_steps_stay_within_volatility() {
        let quote = SyntheticMarket::with_seed(42).quote_ending("BTC", day());

        // First point: one step away from 95% of 65000
        let start = dec!(61750);
        let first = quote.history[0].price;
        assert!(first > start * dec!(0.95) && first < start * dec!(1.05));

        for pair in quote.history.windows(2) {
            let step = (pair[1].price - pair[0].price) / pair[0].price;
            assert!(step.abs() <= dec!(0.0415), "step {step} too large");
        }
    }

    #[test]
    fn test_equity_is_calmer_than_crypto() {
        assert!(volatility("VTI") < volatility("ETH"));
        assert!((base_price("doge") - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_change_follows_last_two_closes() {
        for (seed, symbol) in [(3, "SOL"), (11, "VTI"), (99, "GLD")] {
            let quote = SyntheticMarket::with_seed(seed).quote_ending(symbol, day());
            let history = &quote.history;
            let previous = history[history.len() - 2].price;
            let last = history[history.len() - 1].price;

            assert_eq!(quote.price, last);
            assert_eq!(quote.change_24h, crate::market::percent_change(previous, last));
        }
    }

    #[test]
    fn test_same_seed_same_walk() {
        let a = SyntheticMarket::with_seed(1).quote_ending("ETH", day());
        let b = SyntheticMarket::with_seed(1).quote_ending("ETH", day());
        assert_eq!(a.history, b.history);
        assert_eq!(a.change_24h, b.change_24h);
    }
}
