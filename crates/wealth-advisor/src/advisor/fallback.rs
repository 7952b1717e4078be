//! Deterministic fallback text
//!
//! Returned when every model tier has failed. Pure formatting over the
//! profile; no I/O.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::model::{RiskTolerance, UserProfile};

/// Target split across the four channels; sums to 1
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocationWeights {
    /// Stocks and bonds (VTI, VXUS, BND)
    pub traditional: Decimal,
    /// BTC, ETH, SOL
    pub crypto: Decimal,
    /// Jito, Raydium, Kamino
    pub defi: Decimal,
    /// REITs and gold
    pub alternatives: Decimal,
}

impl AllocationWeights {
    pub fn for_risk(risk: RiskTolerance) -> Self {
        match risk {
            RiskTolerance::Low => Self {
                traditional: dec!(0.75),
                crypto: dec!(0.10),
                defi: dec!(0.05),
                alternatives: dec!(0.10),
            },
            RiskTolerance::Medium => Self {
                traditional: dec!(0.55),
                crypto: dec!(0.25),
                defi: dec!(0.12),
                alternatives: dec!(0.08),
            },
            RiskTolerance::High => Self {
                traditional: dec!(0.45),
                crypto: dec!(0.30),
                defi: dec!(0.20),
                alternatives: dec!(0.05),
            },
        }
    }

    /// (label, weight) rows in display order
    pub fn rows(&self) -> [(&'static str, Decimal); 4] {
        [
            ("Traditional markets (VTI, VXUS, BND)", self.traditional),
            ("Core crypto (BTC, ETH, SOL)", self.crypto),
            ("Solana DeFi (Jito, Raydium, Kamino)", self.defi),
            ("Alternatives (VNQ, GLD)", self.alternatives),
        ]
    }
}

/// Whole-number percentage of a weight, e.g. 0.55 -> "55%"
pub fn percent(weight: Decimal) -> String {
    format!("{}%", (weight * Decimal::ONE_HUNDRED).normalize())
}

/// One-line stance for the user's stage of life
fn stage_note(age: u32) -> &'static str {
    match age {
        0..35 => "With decades of compounding ahead, growth assets can carry most of the weight.",
        35..50 => "Balance growth with stability; keep an emergency fund outside these allocations.",
        _ => "Capital preservation matters more now; shift gradually toward bonds and staking income.",
    }
}

/// Templated answer for a question the models could not handle
pub fn advice(question: &str, profile: &UserProfile) -> String {
    let weights = AllocationWeights::for_risk(profile.risk_tolerance);

    let mut text = format!(
        "Our AI advisors are busy right now, so here is guidance from the GoalWealth playbook.\n\n\
         **Your profile:** Age {}, {} risk tolerance, {}-year timeline. Goal: {}.\n\n",
        profile.age, profile.risk_tolerance, profile.timeline_years, profile.goal
    );

    if !question.trim().is_empty() {
        text.push_str(&format!("**Your question:** \"{}\"\n\n", question.trim()));
    }

    text.push_str(&format!(
        "**Suggested allocation for a {} risk profile:**\n",
        profile.risk_tolerance
    ));
    for (label, weight) in weights.rows() {
        text.push_str(&format!("- {}: {label}\n", percent(weight)));
    }

    text.push_str(&format!(
        "\n**Stage of life:** {}\n\n\
         **Key risks:**\n\
         - Crypto can fall 50-80% in a bear market\n\
         - DeFi protocols carry smart contract and impermanent-loss risk\n\n\
         **Next steps:**\n\
         1. Automate a monthly contribution and dollar-cost average\n\
         2. Start DeFi exposure with Jito staking (8-9% APY) before Raydium or Kamino\n\
         3. Rebalance once or twice a year\n\n\
         *Generated by GoalWealth's deterministic engine. Try again shortly for a personalized answer.*\n",
        stage_note(profile.age)
    ));

    text
}
