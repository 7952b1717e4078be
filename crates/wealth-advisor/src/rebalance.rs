//! Rebalance Analyst
//!
//! Tactical rebalance report for current holdings against a target risk tier.

use agent_core::TieredGenerator;

use crate::advisor::fallback::{AllocationWeights, percent};
use crate::advisor::{attempt, prompt};
use crate::model::{AdviceResponse, Holding, RiskTolerance, UserProfile};

#[derive(Clone)]
pub struct RebalanceAnalyst {
    engine: Option<TieredGenerator>,
}

impl RebalanceAnalyst {
    pub fn new(engine: Option<TieredGenerator>) -> Self {
        Self { engine }
    }

    pub async fn analyze_rebalance(
        &self,
        holdings: &[Holding],
        target_risk: RiskTolerance,
        profile: &UserProfile,
    ) -> AdviceResponse {
        let generated = match &self.engine {
            Some(engine) if !holdings.is_empty() => {
                attempt(engine, &prompt::rebalance(holdings, target_risk, profile), "rebalance").await
            }
            _ => None,
        };

        match generated {
            Some(success) => AdviceResponse::from_model(success.text(), &success.model),
            None => AdviceResponse::fallback(fallback_report(holdings, target_risk)),
        }
    }
}

/// Deterministic checklist naming the holdings and the target tier
pub fn fallback_report(holdings: &[Holding], target_risk: RiskTolerance) -> String {
    let symbols = if holdings.is_empty() {
        "no recorded holdings".to_string()
    } else {
        holdings.iter().map(|h| h.symbol.as_str()).collect::<Vec<_>>().join(", ")
    };
    let weights = AllocationWeights::for_risk(target_risk);

    format!(
        "# Tactical Rebalance Recommendation\n\
         *Target profile: {target_risk}*\n\n\
         ### 1. Allocation audit\n\
         Your portfolio containing **{symbols}** was checked against the GoalWealth **{target_risk}** benchmark: \
         {traditional} traditional, {crypto} core crypto, {defi} Solana DeFi, {alternatives} alternatives.\n\n\
         ### 2. High-conviction actions\n\
         - **Equity core:** keep VTI or VOO at least half of the growth bucket.\n\
         - **Crypto exposure:** hold SOL and BTC near the {crypto} crypto target for a {target_risk} profile.\n\
         - **Yield capture:** move idle capital into Jito staking or Kamino for 8-12% APY.\n\n\
         ### 3. Execution checklist\n\
         1. **Sell** portions of assets that drifted more than 5% above target weight.\n\
         2. **Rotate** proceeds into under-weighted sectors.\n\
         3. **Privacy:** route large orders through Arcium to keep trade intent confidential.\n\n\
         ---\n\
         *Generated by GoalWealth's deterministic rebalancing engine.*\n",
        traditional = percent(weights.traditional),
        crypto = percent(weights.crypto),
        defi = percent(weights.defi),
        alternatives = percent(weights.alternatives),
    )
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;
    use crate::model::AdviceSource;

    #[tokio::test]
    async fn test_fallback_names_symbols_and_target() {
        let holdings = [
            Holding::new("sol", dec!(40), dec!(5600)),
            Holding::new("VTI", dec!(10), dec!(2600)),
        ];
        let report = RebalanceAnalyst::new(None)
            .analyze_rebalance(&holdings, RiskTolerance::Low, &UserProfile::default())
            .await;

        assert_eq!(report.source, AdviceSource::FallbackTemplate);
        assert!(report.text.contains("**SOL, VTI**"));
        assert!(report.text.contains("*Target profile: Low*"));
        assert!(report.text.contains("75% traditional"));
    }

    #[test]
    fn test_empty_holdings() {
        let text = fallback_report(&[], RiskTolerance::High);
        assert!(text.contains("no recorded holdings"));
        assert!(text.contains("30% core crypto"));
    }
}
