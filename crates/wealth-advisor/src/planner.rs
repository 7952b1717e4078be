//! Investment Planner
//!
//! Generates the multi-section plan through the tier engine. Thin plans are
//! regenerated once; when every tier fails a deterministic plan is built
//! from the profile.

use agent_core::TieredGenerator;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;

use crate::advisor::fallback::{AllocationWeights, percent};
use crate::advisor::{attempt, prompt};
use crate::model::{AdviceResponse, UserProfile};
use crate::projection::projected_value;

/// A generated plan carries the same fields as an advice answer
pub type PlanResponse = AdviceResponse;

/// Protocols a complete plan must name
pub const KEY_PROTOCOLS: &[&str] = &["Jito", "Raydium", "Kamino"];

/// Minimum currency-symbol count for a plan to count as specific
pub const MIN_CURRENCY_MENTIONS: usize = 15;

/// Minimum number of `KEY_PROTOCOLS` a plan must mention
pub const MIN_PROTOCOLS: usize = 2;

/// Return assumed by the fallback plan's projections
const FALLBACK_ANNUAL_RETURN: Decimal = dec!(0.08);

/// Specificity check over a generated plan
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PlanQuality {
    pub currency_mentions: usize,
    pub protocols: Vec<&'static str>,
}

impl PlanQuality {
    pub fn assess(text: &str, currency_symbol: &str) -> Self {
        let currency_mentions = if currency_symbol.is_empty() {
            0
        } else {
            text.matches(currency_symbol).count()
        };

        Self {
            currency_mentions,
            protocols: KEY_PROTOCOLS.iter().copied().filter(|p| text.contains(p)).collect(),
        }
    }

    pub fn is_acceptable(&self) -> bool {
        self.currency_mentions >= MIN_CURRENCY_MENTIONS && self.protocols.len() >= MIN_PROTOCOLS
    }
}

/// Plan generation over an optional model engine
#[derive(Clone)]
pub struct Planner {
    engine: Option<TieredGenerator>,
}

impl Planner {
    pub fn new(engine: Option<TieredGenerator>) -> Self {
        Self { engine }
    }

    /// Create a plan; always returns text
    pub async fn create_plan(&self, profile: &UserProfile, market_context: Option<&str>) -> PlanResponse {
        let Some(engine) = &self.engine else {
            return AdviceResponse::fallback(fallback_plan(profile));
        };

        let prompt = prompt::plan(profile, market_context);
        let Some(first) = attempt(engine, &prompt, "plan").await else {
            return AdviceResponse::fallback(fallback_plan(profile));
        };

        let quality = PlanQuality::assess(first.text(), &profile.currency_symbol);
        if quality.is_acceptable() {
            return AdviceResponse::from_model(first.text(), &first.model);
        }

        tracing::info!(
            currency_mentions = quality.currency_mentions,
            protocols = quality.protocols.len(),
            "Plan too thin, regenerating once"
        );

        // The second draft is kept even if it is still thin
        match attempt(engine, &prompt, "plan-retry").await {
            Some(second) => AdviceResponse::from_model(second.text(), &second.model),
            None => AdviceResponse::from_model(first.text(), &first.model),
        }
    }
}

/// Deterministic plan from the profile's risk tier and amounts
pub fn fallback_plan(profile: &UserProfile) -> String {
    let weights = AllocationWeights::for_risk(profile.risk_tolerance);
    let mut text = format!(
        "# GoalWealth Investment Plan ({risk} Risk)\n\n\
         *Generated by GoalWealth's deterministic planner while AI models are unavailable.*\n\n\
         ## 1. Profile\n\
         - {summary}\n\
         - Goal: {goal}\n\
         - Starting capital: {capital}\n\
         - Monthly investment: {monthly}\n\n\
         ## 2. Allocation\n\n\
         | Channel | Weight | Starting capital | Monthly |\n\
         |---|---|---|---|\n",
        risk = profile.risk_tolerance,
        summary = profile.summary(),
        goal = profile.goal,
        capital = profile.money(profile.capital),
        monthly = profile.money(profile.monthly_contribution),
    );

    for (label, weight) in weights.rows() {
        text.push_str(&format!(
            "| {label} | {} | {} | {} |\n",
            percent(weight),
            profile.money(profile.capital * weight),
            profile.money(profile.monthly_contribution * weight),
        ));
    }

    let defi_capital = profile.capital * weights.defi;
    text.push_str(&format!(
        "\n## 3. Solana DeFi Layer\n\
         - Jito staking (8-9% APY): {jito}\n\
         - Raydium SOL-USDC pools (20-25% APY): {raydium}\n\
         - Kamino vaults (25-35% APY): {kamino}\n\
         - Arcium: privacy tool only, no allocation\n\n\
         ## 4. Projections (8% average annual return)\n",
        jito = profile.money(defi_capital * dec!(0.5)),
        raydium = profile.money(defi_capital * dec!(0.3)),
        kamino = profile.money(defi_capital * dec!(0.2)),
    ));

    let mut horizons = vec![5, 10, profile.timeline_years];
    horizons.sort_unstable();
    horizons.dedup();
    for years in horizons.into_iter().filter(|y| *y > 0) {
        let line = projected_value(
            profile.capital,
            profile.monthly_contribution,
            years,
            FALLBACK_ANNUAL_RETURN,
        )
        .map_or_else(|| "beyond projection range".to_string(), |value| profile.money(value));
        text.push_str(&format!("- {years} years: {line}\n"));
    }

    text.push_str(
        "\n## 5. Risk Warnings\n\
         - Crypto can fall 50-80% in a bear market\n\
         - Smart contract bugs and impermanent loss in DeFi pools\n\
         - Leverage in Kamino vaults can be liquidated\n\n\
         ## 6. Execution\n\
         1. Week 1: open brokerage and exchange accounts, set up a Solana wallet\n\
         2. Week 2: buy core positions and stake SOL with Jito\n\
         3. Week 3: add Raydium liquidity only after reading about impermanent loss\n\
         4. Ongoing: invest monthly, rebalance quarterly\n",
    );

    text
}

/// Plain-text document for download
pub fn export_text(plan: &PlanResponse, profile: &UserProfile) -> String {
    let rule = "=".repeat(60);
    let source = match &plan.model {
        Some(model) => format!("model {model}"),
        None => "GoalWealth deterministic planner".to_string(),
    };

    format!(
        "{rule}\nGOALWEALTH INVESTMENT PLAN\n{rule}\n\n\
         Age: {age}\n\
         Risk tolerance: {risk}\n\
         Timeline: {years} years\n\
         Starting capital: {capital}\n\
         Monthly investment: {monthly}\n\
         Goal: {goal}\n\
         Generated by: {source}\n\n\
         {rule}\n\n\
         {body}\n",
        age = profile.age,
        risk = profile.risk_tolerance,
        years = profile.timeline_years,
        capital = profile.money(profile.capital),
        monthly = profile.money(profile.monthly_contribution),
        goal = profile.goal,
        body = plan.text.trim_end(),
    )
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU32, Ordering};

    use agent_core::{AgentError, Completion, GenerationOptions, LlmProvider, ModelTiers, Result};
    use async_trait::async_trait;

    use super::*;
    use crate::model::{AdviceSource, ProfileInput};

    fn rich_plan() -> String {
        let mut plan = String::from("Stake with Jito, pool on Raydium, vault on Kamino.\n");
        for i in 0..15 {
            plan.push_str(&format!("- Line item: ${i}00\n"));
        }
        plan
    }

    /// Serves each scripted plan once, then errors
    struct PlanProvider {
        plans: Vec<String>,
        calls: AtomicU32,
    }

    #[async_trait]
    impl LlmProvider for PlanProvider {
        fn name(&self) -> &str {
            "plans"
        }

        async fn health_check(&self) -> Result<bool> {
            Ok(true)
        }

        async fn complete(&self, _prompt: &str, options: &GenerationOptions) -> Result<Completion> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst) as usize;
            self.plans
                .get(call)
                .map(|p| Completion::text(&options.model, p.clone()))
                .ok_or_else(|| AgentError::InvalidRequest("no more plans".into()))
        }
    }

    fn planner(plans: Vec<String>) -> (Planner, Arc<PlanProvider>) {
        let provider = Arc::new(PlanProvider {
            plans,
            calls: AtomicU32::new(0),
        });
        let engine = TieredGenerator::new(provider.clone(), ModelTiers::new(["plan-model"]));
        (Planner::new(Some(engine)), provider)
    }

    fn profile() -> UserProfile {
        ProfileInput {
            age: Some(28),
            risk_tolerance: Some("High".into()),
            capital: Some(dec!(15000)),
            monthly_contribution: Some(dec!(800)),
            timeline_years: Some(30),
            ..Default::default()
        }
        .into()
    }

    #[test]
    fn test_quality_assessment() {
        let quality = PlanQuality::assess(&rich_plan(), "$");
        assert_eq!(quality.currency_mentions, 15);
        assert_eq!(quality.protocols, vec!["Jito", "Raydium", "Kamino"]);
        assert!(quality.is_acceptable());

        let thin = PlanQuality::assess("Buy Jito. $5", "$");
        assert!(!thin.is_acceptable());
    }

    #[tokio::test]
    async fn test_good_plan_accepted_first_time() {
        let (planner, provider) = planner(vec![rich_plan()]);
        let plan = planner.create_plan(&profile(), None).await;

        assert_eq!(plan.source, AdviceSource::Model);
        assert_eq!(plan.text, rich_plan());
        assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_thin_plan_regenerated_once() {
        let (planner, provider) = planner(vec!["Thin plan.".into(), "Still thin.".into(), rich_plan()]);
        let plan = planner.create_plan(&profile(), None).await;

        assert_eq!(plan.text, "Still thin.");
        assert_eq!(provider.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_failed_regeneration_keeps_first_plan() {
        let (planner, _) = planner(vec!["Thin plan.".into()]);
        let plan = planner.create_plan(&profile(), None).await;

        assert_eq!(plan.source, AdviceSource::Model);
        assert_eq!(plan.text, "Thin plan.");
    }

    #[tokio::test]
    async fn test_no_engine_uses_fallback_plan() {
        let plan = Planner::new(None).create_plan(&profile(), None).await;

        assert_eq!(plan.source, AdviceSource::FallbackTemplate);
        assert!(plan.text.contains("(High Risk)"));
        // 45% of 15,000
        assert!(plan.text.contains("| 45% | $6,750.00 | $360.00 |"));
    }

    #[test]
    fn test_fallback_plan_projects_each_horizon() {
        let text = fallback_plan(&profile());
        assert!(text.contains("- 5 years: $"));
        assert!(text.contains("- 10 years: $"));
        assert!(text.contains("- 30 years: $"));
        assert!(text.contains("Jito staking (8-9% APY): $1,500.00"));
    }

    #[tokio::test]
    async fn test_long_timeline_fallback_plan_completes() {
        let unbounded = UserProfile {
            timeline_years: 1000,
            capital: dec!(10000),
            ..UserProfile::default()
        };
        let plan = Planner::new(None).create_plan(&unbounded, None).await;
        assert_eq!(plan.source, AdviceSource::FallbackTemplate);
        assert!(plan.text.contains("- 1000 years: beyond projection range"));

        let clamped: UserProfile = ProfileInput {
            timeline_years: Some(1000),
            capital: Some(dec!(10000)),
            ..Default::default()
        }
        .into();
        assert!(fallback_plan(&clamped).contains("- 100 years: $"));
    }

    #[test]
    fn test_export_text() {
        let plan = AdviceResponse::from_model("## Plan body\n", "gemini-2.5-flash");
        let doc = export_text(&plan, &profile());

        assert!(doc.starts_with(&"=".repeat(60)));
        assert!(doc.contains("GOALWEALTH INVESTMENT PLAN"));
        assert!(doc.contains("Risk tolerance: High"));
        assert!(doc.contains("Starting capital: $15,000.00"));
        assert!(doc.contains("Generated by: model gemini-2.5-flash"));
        assert!(doc.ends_with("## Plan body\n"));
    }
}
