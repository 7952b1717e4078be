//! # wealth-advisor
//!
//! GoalWealth's investment guidance: chat advice, full plans, education
//! guides and rebalance reports, all generated through the model tiers and
//! all with a deterministic answer when the models are unreachable.
//!
//! ## Guarantees
//!
//! - **Never empty** - every generator returns text, even with no credential
//! - **Never fails** - provider errors are retried, skipped, or replaced by templates
//! - **Decimal money** - amounts are `rust_decimal::Decimal`, never f64
//!
//! ## Answer sources
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  question + profile (+ market narrative)                    │
//! ├─────────────────────────────────────────────────────────────┤
//! │  no credential      → static knowledge base     static_kb   │
//! │  tier 0..n answers  → model text (+ audit)      model       │
//! │  tiers exhausted    → profile template          fallback    │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Market data follows the same rule: a symbol that cannot be fetched live
//! is filled with a synthetic 30-day random walk.

pub mod advisor;
pub mod education;
pub mod error;
pub mod market;
pub mod model;
pub mod opportunities;
pub mod planner;
pub mod projection;
pub mod rebalance;

pub use advisor::AdviceGenerator;
pub use education::{AVAILABLE_GUIDES, GuideTopic, GuideWriter, LearnerLevel};
pub use error::{AdvisorError, Result};
pub use market::{
    DefiYield, MarketConfig, MarketDataService, MarketSnapshot, PriceQuote, YahooChartSource, defi_yields,
    market_narrative,
};
pub use model::{AdviceRequest, AdviceResponse, AdviceSource, Holding, ProfileInput, RiskTolerance, UserProfile};
pub use opportunities::{Opportunity, OpportunityKind, check_opportunities};
pub use planner::{PlanResponse, Planner, export_text};
pub use projection::{MAX_PROJECTION_YEARS, ProjectionPoint, portfolio_growth_projection, projected_value};
pub use rebalance::RebalanceAnalyst;
