//! Market Data
//!
//! Price history for the tracked symbols, cached on a TTL and backed by
//! synthetic data whenever the live source fails.

mod synthetic;
mod yahoo;
mod yields;

pub use synthetic::SyntheticMarket;
pub use yahoo::YahooChartSource;
pub use yields::{DefiYield, defi_yields};

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tokio::time::Instant;

use crate::error::{AdvisorError, Result};

/// Default cache lifetime
pub const DEFAULT_TTL_SECS: u64 = 300;

/// Price-history source (Strategy pattern)
///
/// Implement this for each data vendor.
#[async_trait]
pub trait MarketDataSource: Send + Sync {
    /// Daily closes for about one month, oldest first
    async fn daily_closes(&self, ticker: &str) -> Result<Vec<PricePoint>>;

    /// Source name
    fn name(&self) -> &str;
}

/// One daily close
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub price: Decimal,
}

/// Where a quote came from
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuoteSource {
    Live,
    Synthetic,
}

/// Latest price plus its history
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PriceQuote {
    pub symbol: String,

    /// Last close
    pub price: Decimal,

    /// Percent change between the last two closes
    pub change_24h: Decimal,

    pub history: Vec<PricePoint>,
    pub source: QuoteSource,
}

impl PriceQuote {
    /// Build from history; at least two closes are required
    pub fn from_history(symbol: &str, history: Vec<PricePoint>, source: QuoteSource) -> Result<Self> {
        if history.len() < 2 {
            return Err(AdvisorError::InsufficientHistory {
                symbol: symbol.to_string(),
                points: history.len(),
            });
        }
        Ok(Self::from_points(symbol, history, source))
    }

    pub(crate) fn from_points(symbol: &str, history: Vec<PricePoint>, source: QuoteSource) -> Self {
        let (price, change_24h) = match history.as_slice() {
            [.., prev, last] => (last.price, percent_change(prev.price, last.price)),
            [last] => (last.price, Decimal::ZERO),
            [] => (Decimal::ZERO, Decimal::ZERO),
        };

        Self {
            symbol: symbol.to_uppercase(),
            price,
            change_24h,
            history,
            source,
        }
    }
}

/// Percent change from `previous` to `current`, 4 decimal places
pub fn percent_change(previous: Decimal, current: Decimal) -> Decimal {
    if previous.is_zero() {
        return Decimal::ZERO;
    }
    ((current - previous) / previous * Decimal::ONE_HUNDRED).round_dp(4)
}

/// Quotes for every tracked symbol at one point in time
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MarketSnapshot {
    pub quotes: BTreeMap<String, PriceQuote>,
    pub fetched_at: DateTime<Utc>,
}

impl MarketSnapshot {
    pub fn new(quotes: impl IntoIterator<Item = PriceQuote>) -> Self {
        Self {
            quotes: quotes.into_iter().map(|q| (q.symbol.clone(), q)).collect(),
            fetched_at: Utc::now(),
        }
    }

    pub fn get(&self, symbol: &str) -> Option<&PriceQuote> {
        self.quotes.get(&symbol.to_uppercase())
    }

    pub fn change_24h(&self, symbol: &str) -> Option<Decimal> {
        self.get(symbol).map(|q| q.change_24h)
    }

    /// True when every quote is synthetic
    pub fn is_synthetic(&self) -> bool {
        self.quotes.values().all(|q| q.source == QuoteSource::Synthetic)
    }
}

/// A display symbol and the vendor ticker it maps to
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackedSymbol {
    pub symbol: String,
    pub ticker: String,
}

impl TrackedSymbol {
    pub fn new(symbol: impl Into<String>, ticker: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            ticker: ticker.into(),
        }
    }

    /// BTC, ETH, SOL and the total-market ETF
    pub fn defaults() -> Vec<Self> {
        vec![
            Self::new("BTC", "BTC-USD"),
            Self::new("ETH", "ETH-USD"),
            Self::new("SOL", "SOL-USD"),
            Self::new("VTI", "VTI"),
        ]
    }
}

/// Market data configuration
#[derive(Clone, Debug)]
pub struct MarketConfig {
    /// How long a snapshot is served from cache
    pub ttl: Duration,
    pub symbols: Vec<TrackedSymbol>,
}

impl Default for MarketConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(DEFAULT_TTL_SECS),
            symbols: TrackedSymbol::defaults(),
        }
    }
}

impl MarketConfig {
    /// Defaults, with `MARKET_CACHE_TTL_SECS` applied when set
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Some(secs) = std::env::var("MARKET_CACHE_TTL_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
        {
            config.ttl = Duration::from_secs(secs);
        }
        config
    }
}

struct CachedSnapshot {
    stored_at: Instant,
    snapshot: MarketSnapshot,
}

/// Cached market reads with per-symbol synthetic fallback
pub struct MarketDataService {
    source: Option<Arc<dyn MarketDataSource>>,
    synthetic: SyntheticMarket,
    config: MarketConfig,
    cache: RwLock<Option<CachedSnapshot>>,
}

impl MarketDataService {
    pub fn new(source: Arc<dyn MarketDataSource>, config: MarketConfig) -> Self {
        Self {
            source: Some(source),
            synthetic: SyntheticMarket::new(),
            config,
            cache: RwLock::new(None),
        }
    }

    /// Service that never goes to the network
    pub fn synthetic_only(config: MarketConfig) -> Self {
        Self {
            source: None,
            synthetic: SyntheticMarket::new(),
            config,
            cache: RwLock::new(None),
        }
    }

    pub fn with_synthetic(mut self, synthetic: SyntheticMarket) -> Self {
        self.synthetic = synthetic;
        self
    }

    pub fn config(&self) -> &MarketConfig {
        &self.config
    }

    /// Snapshot of the configured symbols, served from cache while fresh
    pub async fn get_live_market_data(&self) -> MarketSnapshot {
        {
            let cache = self.cache.read().await;
            if let Some(cached) = cache.as_ref().filter(|c| c.stored_at.elapsed() < self.config.ttl) {
                tracing::debug!("Market snapshot served from cache");
                return cached.snapshot.clone();
            }
        }

        let snapshot = self.fetch_snapshot(&self.config.symbols).await;

        let mut cache = self.cache.write().await;
        *cache = Some(CachedSnapshot {
            stored_at: Instant::now(),
            snapshot: snapshot.clone(),
        });
        snapshot
    }

    /// Uncached read of arbitrary symbols; never fails
    pub async fn fetch_snapshot(&self, symbols: &[TrackedSymbol]) -> MarketSnapshot {
        let mut quotes = Vec::with_capacity(symbols.len());

        for tracked in symbols {
            let quote = match self.fetch_live(tracked).await {
                Ok(quote) => quote,
                Err(e) => {
                    tracing::warn!(symbol = %tracked.symbol, error = %e, "Live quote unavailable, using synthetic data");
                    self.synthetic.quote(&tracked.symbol)
                }
            };
            quotes.push(quote);
        }

        let snapshot = MarketSnapshot::new(quotes);
        tracing::info!(
            symbols = snapshot.quotes.len(),
            synthetic = snapshot.is_synthetic(),
            "Market snapshot refreshed"
        );
        snapshot
    }

    async fn fetch_live(&self, tracked: &TrackedSymbol) -> Result<PriceQuote> {
        let source = self
            .source
            .as_ref()
            .ok_or_else(|| AdvisorError::MarketData("no live source configured".into()))?;

        let history = source.daily_closes(&tracked.ticker).await?;
        PriceQuote::from_history(&tracked.symbol, history, QuoteSource::Live)
    }
}

/// One-paragraph summary of prices and yields for prompts
pub fn market_narrative(snapshot: &MarketSnapshot, yields: &[DefiYield]) -> String {
    let mut text = String::from("Current market: ");

    let prices: Vec<String> = snapshot
        .quotes
        .values()
        .map(|q| format!("{} ${:.2} ({:+.2}% 24h)", q.symbol, q.price, q.change_24h))
        .collect();
    text.push_str(&prices.join(", "));
    text.push('.');

    if !yields.is_empty() {
        text.push_str(" Solana DeFi yields: ");
        let rates: Vec<String> = yields
            .iter()
            .map(|y| format!("{} {}% APY (TVL {})", y.protocol, y.apy, y.tvl))
            .collect();
        text.push_str(&rates.join(", "));
        text.push('.');
    }

    if snapshot.is_synthetic() {
        text.push_str(" (Prices are simulated; live data was unavailable.)");
    }

    text
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};

    use rust_decimal_macros::dec;

    use super::*;

    /// Live source that serves fixed closes for known tickers and counts calls
    struct FixedSource {
        calls: AtomicU32,
    }

    impl FixedSource {
        fn new() -> Self {
            Self { calls: AtomicU32::new(0) }
        }
    }

    #[async_trait]
    impl MarketDataSource for FixedSource {
        async fn daily_closes(&self, ticker: &str) -> Result<Vec<PricePoint>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let day = |d| NaiveDate::from_ymd_opt(2026, 1, d).unwrap();
            match ticker {
                "SOL-USD" => Ok(vec![
                    PricePoint { date: day(1), price: dec!(150) },
                    PricePoint { date: day(2), price: dec!(140) },
                ]),
                "BTC-USD" => Ok(vec![PricePoint { date: day(2), price: dec!(60000) }]),
                _ => Err(AdvisorError::MarketData(format!("{ticker}: HTTP 500"))),
            }
        }

        fn name(&self) -> &str {
            "fixed"
        }
    }

    #[test]
    fn test_percent_change() {
        assert_eq!(percent_change(dec!(100), dec!(105)), dec!(5));
        assert_eq!(percent_change(dec!(150), dec!(140)), dec!(-6.6667));
        assert_eq!(percent_change(Decimal::ZERO, dec!(1)), Decimal::ZERO);
    }

    #[test]
    fn test_quote_needs_two_closes() {
        let day = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        let err = PriceQuote::from_history(
            "BTC",
            vec![PricePoint { date: day, price: dec!(1) }],
            QuoteSource::Live,
        )
        .unwrap_err();

        assert!(matches!(err, AdvisorError::InsufficientHistory { points: 1, .. }));
    }

    #[tokio::test]
    async fn test_failed_symbols_become_synthetic() {
        let service = MarketDataService::new(Arc::new(FixedSource::new()), MarketConfig::default())
            .with_synthetic(SyntheticMarket::with_seed(3));

        let snapshot = service.get_live_market_data().await;

        assert_eq!(snapshot.quotes.len(), 4);
        let sol = snapshot.get("SOL").unwrap();
        assert_eq!(sol.source, QuoteSource::Live);
        assert_eq!(sol.price, dec!(140));
        assert_eq!(sol.change_24h, dec!(-6.6667));

        // One close only, and HTTP errors, both fall back
        assert_eq!(snapshot.get("BTC").unwrap().source, QuoteSource::Synthetic);
        assert_eq!(snapshot.get("ETH").unwrap().source, QuoteSource::Synthetic);
        assert_eq!(snapshot.get("vti").unwrap().history.len(), 30);
        assert!(!snapshot.is_synthetic());
    }

    #[tokio::test]
    async fn test_no_source_is_all_synthetic() {
        let service = MarketDataService::synthetic_only(MarketConfig::default());
        let snapshot = service.get_live_market_data().await;

        assert_eq!(snapshot.quotes.len(), 4);
        assert!(snapshot.is_synthetic());
    }

    #[tokio::test(start_paused = true)]
    async fn test_snapshot_cached_until_ttl() {
        let source = Arc::new(FixedSource::new());
        let service = MarketDataService::new(source.clone(), MarketConfig::default());

        service.get_live_market_data().await;
        service.get_live_market_data().await;
        assert_eq!(source.calls.load(Ordering::SeqCst), 4);

        tokio::time::advance(Duration::from_secs(DEFAULT_TTL_SECS + 1)).await;
        service.get_live_market_data().await;
        assert_eq!(source.calls.load(Ordering::SeqCst), 8);
    }

    #[test]
    fn test_narrative_mentions_prices_and_yields() {
        let day = |d| NaiveDate::from_ymd_opt(2026, 1, d).unwrap();
        let quote = PriceQuote::from_points(
            "sol",
            vec![
                PricePoint { date: day(1), price: dec!(100) },
                PricePoint { date: day(2), price: dec!(103) },
            ],
            QuoteSource::Live,
        );
        let snapshot = MarketSnapshot::new([quote]);

        let text = market_narrative(&snapshot, &defi_yields());
        assert!(text.contains("SOL $103.00 (+3.00% 24h)"));
        assert!(text.contains("Jito Staking 7.8% APY (TVL 1.8B)"));
        assert!(!text.contains("simulated"));
    }
}
