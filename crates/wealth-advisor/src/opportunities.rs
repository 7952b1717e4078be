//! Opportunity Scanner
//!
//! Rule-based alerts from the profile and the latest SOL/BTC moves.

use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::market::MarketSnapshot;
use crate::model::{RiskTolerance, UserProfile, group_thousands};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OpportunityKind {
    BuyDip,
    YieldFarming,
    DefiPools,
    AutomatedVaults,
    BtcDca,
    Rebalance,
    JitoStaking,
    Education,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Opportunity {
    #[serde(rename = "type")]
    pub kind: OpportunityKind,
    pub asset: String,
    pub reason: String,
    pub action: String,
    pub risk: String,
}

impl Opportunity {
    fn new(kind: OpportunityKind, asset: &str, reason: String, action: String, risk: &str) -> Self {
        Self {
            kind,
            asset: asset.into(),
            reason,
            action,
            risk: risk.into(),
        }
    }
}

/// Evaluate every rule in order; with no SOL or BTC quote, return the fixed list
pub fn check_opportunities(profile: &UserProfile, snapshot: Option<&MarketSnapshot>) -> Vec<Opportunity> {
    let quotes = snapshot.and_then(|s| Some((s.get("SOL")?, s.get("BTC")?)));
    let Some((sol, btc)) = quotes else {
        tracing::debug!("SOL or BTC quote missing, returning default opportunities");
        return default_opportunities();
    };

    let sol_change = sol.change_24h;
    let btc_change = btc.change_24h;
    let risk = profile.risk_tolerance;
    let mut found = Vec::new();

    if sol_change < dec!(-5) {
        found.push(Opportunity::new(
            OpportunityKind::BuyDip,
            "Solana (SOL)",
            format!("SOL is down {:.1}% in 24h - potential buy opportunity", sol_change.abs()),
            format!("Consider buying at ${:.2} and dollar-cost averaging", sol.price),
            "Medium",
        ));
    }

    if sol_change.abs() > dec!(3) {
        found.push(Opportunity::new(
            OpportunityKind::YieldFarming,
            "Jito Staking",
            format!("Market volatility ({:.1}%) - lock in stable 8-9% APY", sol_change.abs()),
            "Stake SOL on Jito (jito.network) for MEV rewards".into(),
            "Low",
        ));
    }

    if risk == RiskTolerance::High {
        found.push(Opportunity::new(
            OpportunityKind::DefiPools,
            "Raydium Liquidity Pools",
            "High risk tolerance - eligible for 20-25% APY liquidity pools".into(),
            "Provide SOL-USDC liquidity on Raydium (raydium.io)".into(),
            "High (Impermanent Loss)",
        ));
    }

    if profile.capital > dec!(5000) && matches!(risk, RiskTolerance::Medium | RiskTolerance::High) {
        found.push(Opportunity::new(
            OpportunityKind::AutomatedVaults,
            "Kamino Finance Vaults",
            format!(
                "Capital of {}{} can benefit from automated strategies",
                profile.currency_symbol,
                group_thousands(profile.capital, 0)
            ),
            "Explore Kamino vaults (kamino.finance) for 25-35% APY".into(),
            "High (Leverage Risk)",
        ));
    }

    if btc_change < dec!(-3) && matches!(risk, RiskTolerance::Low | RiskTolerance::Medium) {
        found.push(Opportunity::new(
            OpportunityKind::BtcDca,
            "Bitcoin (BTC)",
            format!("BTC down {:.1}% - good time to dollar-cost average", btc_change.abs()),
            "Add to Bitcoin holdings as digital gold hedge".into(),
            "Medium",
        ));
    }

    if profile.age < 35 && risk != RiskTolerance::High {
        found.push(Opportunity::new(
            OpportunityKind::Rebalance,
            "Portfolio Rebalance",
            "Young age + long timeline - consider increasing growth allocation".into(),
            "Review portfolio: Target 70% stocks, 20% crypto, 10% bonds".into(),
            "Low",
        ));
    }

    found
}

/// Shown when market data is unavailable
pub fn default_opportunities() -> Vec<Opportunity> {
    vec![
        Opportunity::new(
            OpportunityKind::JitoStaking,
            "Jito Liquid Staking",
            "Earn stable 8-9% APY with low risk".into(),
            "Visit jito.network to stake SOL".into(),
            "Low",
        ),
        Opportunity::new(
            OpportunityKind::Education,
            "Learning Resources",
            "Build your knowledge before investing".into(),
            "Check the education guides before committing capital".into(),
            "None",
        ),
    ]
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    use super::*;
    use crate::market::{PricePoint, PriceQuote, QuoteSource};
    use crate::model::ProfileInput;

    fn quote(symbol: &str, prev: Decimal, last: Decimal) -> PriceQuote {
        let day = |d| NaiveDate::from_ymd_opt(2026, 1, d).unwrap();
        PriceQuote::from_history(
            symbol,
            vec![
                PricePoint { date: day(1), price: prev },
                PricePoint { date: day(2), price: last },
            ],
            QuoteSource::Live,
        )
        .unwrap()
    }

    fn snapshot(sol_change_to: Decimal, btc_change_to: Decimal) -> MarketSnapshot {
        MarketSnapshot::new([
            quote("SOL", dec!(100), sol_change_to),
            quote("BTC", dec!(100), btc_change_to),
        ])
    }

    fn profile(age: u32, risk: &str, capital: Decimal) -> UserProfile {
        ProfileInput {
            age: Some(age),
            risk_tolerance: Some(risk.into()),
            capital: Some(capital),
            ..Default::default()
        }
        .into()
    }

    fn kinds(opps: &[Opportunity]) -> Vec<OpportunityKind> {
        opps.iter().map(|o| o.kind).collect()
    }

    #[test]
    fn test_sol_dip_triggers_buy_and_staking() {
        let opps = check_opportunities(&profile(40, "Low", dec!(1000)), Some(&snapshot(dec!(93), dec!(100))));

        assert_eq!(kinds(&opps), vec![OpportunityKind::BuyDip, OpportunityKind::YieldFarming]);
        assert_eq!(opps[0].reason, "SOL is down 7.0% in 24h - potential buy opportunity");
        assert_eq!(opps[0].action, "Consider buying at $93.00 and dollar-cost averaging");
    }

    #[test]
    fn test_rally_triggers_yield_farming_only() {
        let opps = check_opportunities(&profile(40, "Low", dec!(1000)), Some(&snapshot(dec!(104), dec!(100))));
        assert_eq!(kinds(&opps), vec![OpportunityKind::YieldFarming]);
    }

    #[test]
    fn test_thresholds_are_strict() {
        // SOL at exactly -5% is not a dip, BTC at exactly -3% is not a DCA signal
        let opps = check_opportunities(&profile(40, "Low", dec!(5000)), Some(&snapshot(dec!(95), dec!(97))));
        assert_eq!(kinds(&opps), vec![OpportunityKind::YieldFarming]);

        let calm = check_opportunities(&profile(40, "Medium", dec!(5000)), Some(&snapshot(dec!(103), dec!(97))));
        assert!(calm.is_empty());
    }

    #[test]
    fn test_high_risk_large_capital() {
        let opps = check_opportunities(&profile(30, "High", dec!(15000)), Some(&snapshot(dec!(100), dec!(90))));

        // BTC dip is ignored for High risk, as is the young-investor rebalance
        assert_eq!(kinds(&opps), vec![OpportunityKind::DefiPools, OpportunityKind::AutomatedVaults]);
        assert_eq!(opps[1].reason, "Capital of $15,000 can benefit from automated strategies");
    }

    #[test]
    fn test_conservative_btc_dip_and_young_rebalance() {
        let opps = check_opportunities(&profile(28, "Medium", dec!(2000)), Some(&snapshot(dec!(100), dec!(95))));
        assert_eq!(kinds(&opps), vec![OpportunityKind::BtcDca, OpportunityKind::Rebalance]);
    }

    #[test]
    fn test_missing_quotes_give_fixed_list() {
        let p = profile(30, "High", dec!(15000));
        assert_eq!(
            kinds(&check_opportunities(&p, None)),
            vec![OpportunityKind::JitoStaking, OpportunityKind::Education]
        );

        let only_sol = MarketSnapshot::new([quote("SOL", dec!(100), dec!(80))]);
        assert_eq!(check_opportunities(&p, Some(&only_sol)), default_opportunities());
    }

    #[test]
    fn test_kind_serializes_screaming_snake() {
        let json = serde_json::to_value(&default_opportunities()[0]).unwrap();
        assert_eq!(json["type"], "JITO_STAKING");
    }
}
