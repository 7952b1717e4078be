//! Application State

use std::sync::Arc;

use agent_core::{LlmProvider, ModelTiers, TieredGenerator};
use wealth_advisor::{AdviceGenerator, GuideWriter, MarketDataService, Planner, RebalanceAnalyst};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// LLM provider (None when no credential is configured)
    pub provider: Option<Arc<dyn LlmProvider>>,

    /// Model identifiers tried in order
    pub tiers: ModelTiers,

    pub advisor: AdviceGenerator,
    pub planner: Planner,
    pub guides: GuideWriter,
    pub rebalance: RebalanceAnalyst,

    /// TTL-cached market data
    pub market: Arc<MarketDataService>,
}

impl AppState {
    /// Wire every generator to the same tier engine
    pub fn new(
        provider: Option<Arc<dyn LlmProvider>>,
        tiers: ModelTiers,
        market: Arc<MarketDataService>,
        audit: bool,
    ) -> Self {
        let engine = provider
            .clone()
            .map(|p| TieredGenerator::new(p, tiers.clone()));

        Self {
            provider,
            tiers,
            advisor: AdviceGenerator::from_engine(engine.clone()).with_audit(audit),
            planner: Planner::new(engine.clone()),
            guides: GuideWriter::new(engine.clone()),
            rebalance: RebalanceAnalyst::new(engine),
            market,
        }
    }

    pub fn provider_name(&self) -> Option<&str> {
        self.provider.as_deref().map(LlmProvider::name)
    }
}
