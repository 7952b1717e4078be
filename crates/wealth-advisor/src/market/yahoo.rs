//! Yahoo Finance chart source
//!
//! Reads one month of daily closes per ticker from the public chart endpoint.

use std::time::Duration;

use async_trait::async_trait;
use chrono::DateTime;
use reqwest::StatusCode;
use rust_decimal::Decimal;
use serde::Deserialize;

use super::{MarketDataSource, PricePoint};
use crate::error::{AdvisorError, Result};

const DEFAULT_BASE_URL: &str = "https://query1.finance.yahoo.com";

#[derive(Debug, Deserialize)]
struct ChartEnvelope {
    chart: Chart,
}

#[derive(Debug, Deserialize)]
struct Chart {
    result: Option<Vec<ChartResult>>,
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    #[serde(default)]
    timestamp: Vec<i64>,
    indicators: Indicators,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    #[serde(default)]
    quote: Vec<QuoteSeries>,
}

#[derive(Debug, Deserialize)]
struct QuoteSeries {
    #[serde(default)]
    close: Vec<Option<f64>>,
}

/// Daily closes from Yahoo Finance
pub struct YahooChartSource {
    client: reqwest::Client,
    base_url: String,
}

impl YahooChartSource {
    pub fn new() -> Result<Self> {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .user_agent("Mozilla/5.0 (compatible; goalwealth/0.1)")
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn chart_url(&self, ticker: &str) -> String {
        format!("{}/v8/finance/chart/{ticker}", self.base_url)
    }
}

/// Pair timestamps with closes, dropping missing closes
fn parse_chart(ticker: &str, envelope: ChartEnvelope) -> Result<Vec<PricePoint>> {
    if let Some(err) = envelope.chart.error {
        return Err(AdvisorError::MarketData(format!(
            "{ticker}: {}",
            err.description.unwrap_or_else(|| "chart error".into())
        )));
    }

    let result = envelope
        .chart
        .result
        .and_then(|r| r.into_iter().next())
        .ok_or_else(|| AdvisorError::MarketData(format!("{ticker}: empty chart")))?;

    let closes = result
        .indicators
        .quote
        .into_iter()
        .next()
        .map(|q| q.close)
        .unwrap_or_default();

    let points = result
        .timestamp
        .into_iter()
        .zip(closes)
        .filter_map(|(ts, close)| {
            let date = DateTime::from_timestamp(ts, 0)?.date_naive();
            let price = Decimal::from_f64_retain(close?)?.round_dp(4);
            Some(PricePoint { date, price })
        })
        .collect();

    Ok(points)
}

#[async_trait]
impl MarketDataSource for YahooChartSource {
    async fn daily_closes(&self, ticker: &str) -> Result<Vec<PricePoint>> {
        let response = self
            .client
            .get(self.chart_url(ticker))
            .query(&[("range", "1mo"), ("interval", "1d")])
            .send()
            .await?;

        match response.status() {
            StatusCode::TOO_MANY_REQUESTS => {
                return Err(AdvisorError::RateLimited(format!("Yahoo chart for {ticker}")));
            }
            status if !status.is_success() => {
                return Err(AdvisorError::MarketData(format!("{ticker}: HTTP {status}")));
            }
            _ => {}
        }

        let envelope: ChartEnvelope = response.json().await?;
        parse_chart(ticker, envelope)
    }

    fn name(&self) -> &str {
        "Yahoo Finance"
    }
}
