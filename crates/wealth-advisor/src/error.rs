//! Error Types for the Wealth Advisor

use thiserror::Error;

pub type Result<T> = std::result::Result<T, AdvisorError>;

#[derive(Error, Debug)]
pub enum AdvisorError {
    #[error("Market data error: {0}")]
    MarketData(String),

    #[error("Market data rate limited by {0}")]
    RateLimited(String),

    #[error("Not enough price history for {symbol}: {points} points")]
    InsufficientHistory { symbol: String, points: usize },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}
