//! Static Knowledge Base
//!
//! Pre-written answers picked by keyword, used when no model credential is
//! configured. Every entry is rendered against the caller's profile.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::model::{UserProfile, group_thousands};
use crate::projection::MAX_PROJECTION_YEARS;

/// Which canned entry a question maps to
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Topic {
    BitcoinVsSolana,
    JitoStaking,
    DefiRisks,
    Arcium,
    Gold,
    General,
}

impl Topic {
    /// First matching rule wins; matching is case-insensitive substring containment
    pub fn classify(question: &str) -> Self {
        let q = question.to_lowercase();
        if q.contains("bitcoin") && q.contains("solana") {
            Self::BitcoinVsSolana
        } else if q.contains("jito") || q.contains("staking") {
            Self::JitoStaking
        } else if q.contains("defi") && q.contains("risk") {
            Self::DefiRisks
        } else if q.contains("arcium") {
            Self::Arcium
        } else if q.contains("gold") {
            Self::Gold
        } else {
            Self::General
        }
    }
}

/// Answer a question from the knowledge base
pub fn answer(question: &str, profile: &UserProfile) -> String {
    match Topic::classify(question) {
        Topic::BitcoinVsSolana => bitcoin_vs_solana(profile),
        Topic::JitoStaking => jito_staking(profile),
        Topic::DefiRisks => defi_risks(profile),
        Topic::Arcium => arcium(profile),
        Topic::Gold => gold(profile),
        Topic::General => general(question, profile),
    }
}

/// `principal` compounded yearly at `rate`, floored to the nearest thousand
fn grown(principal: Decimal, rate: Decimal, years: u32) -> String {
    let factor = Decimal::ONE + rate;
    let value = (0..years.min(MAX_PROJECTION_YEARS)).try_fold(principal, |v, _| v.checked_mul(factor));

    match value {
        Some(value) if years <= MAX_PROJECTION_YEARS => {
            let thousands = (value / dec!(1000)).floor() * dec!(1000);
            format!("${}", group_thousands(thousands, 0))
        }
        _ => "an amount beyond projection range".to_string(),
    }
}

fn bitcoin_vs_solana(p: &UserProfile) -> String {
    let risk_lower = p.risk_tolerance.label().to_lowercase();
    format!(
        r"Given your profile (Age {age}, {risk} risk tolerance, {years}-year timeline), here's my analysis:

**Short Answer:** Both are valuable, but I'd prioritize Solana for higher growth potential at your age.

**Analysis:**
- **Bitcoin:** Safer store of value, ~100% annual returns historically (volatile)
- **Solana:** Higher risk/reward, fast blockchain, growing DeFi ecosystem

**For Your Profile:**
With {years} years ahead and {risk_lower} risk tolerance, I recommend:
- 60% Bitcoin (digital gold, lower volatility)
- 40% Solana (growth potential, DeFi access)

**Action Steps:**
1. Dollar-cost average into both (split $500/month 60/40)
2. Use 50% of SOL for Jito staking (8-9% APY)
3. Hold BTC long-term as portfolio anchor

**Risks:**
- Crypto volatility (can drop 50-80% in bear markets)
- Regulatory uncertainty
- Technology risk (Solana has had network outages)

**Mitigation:** Never invest more than 20-30% of total portfolio in crypto.
",
        age = p.age,
        risk = p.risk_tolerance,
        years = p.timeline_years,
    )
}

fn jito_staking(p: &UserProfile) -> String {
    format!(
        r"Great question! Jito is one of the best low-risk DeFi opportunities on Solana.

**How Jito Staking Works:**
1. You deposit SOL tokens with Jito protocol
2. Receive JitoSOL (liquid staking token) 1:1
3. Your JitoSOL earns 8-9% APY automatically from:
   - Standard Solana staking rewards (~7%)
   - MEV (Maximal Extractable Value) rewards (~1-2%)
4. You can use JitoSOL in other DeFi protocols while earning

**For Your Profile (Age {age}, {risk} Risk, {years}-year timeline):**
At 8-9% APY over {years} years:
- $10,000 → {projected} (conservative)
- Low risk compared to other DeFi

**Action Steps:**
1. Visit jito.network
2. Connect Phantom or Solflare wallet
3. Stake your SOL → receive JitoSOL
4. Hold long-term or use in other protocols

**Risks to Consider:**
- Smart contract risk (protocol is audited but not zero risk)
- Validator slashing risk (minimal, ~0.1% chance)
- JitoSOL might temporarily depeg during extreme market stress

**Best Practice:** Start with 25-50% of your SOL in Jito, keep rest liquid.

Website: https://jito.network
",
        age = p.age,
        risk = p.risk_tolerance,
        years = p.timeline_years,
        projected = grown(dec!(10000), dec!(0.09), p.timeline_years),
    )
}

fn defi_risks(p: &UserProfile) -> String {
    format!(
        r"Important question! DeFi offers high yields but comes with significant risks.

**Top DeFi Risks:**

1. **Smart Contract Risk (HIGH)**
   - Bugs in code can be exploited
   - Even audited protocols have been hacked
   - Mitigation: Only use well-audited protocols (Jito, Raydium, Kamino)

2. **Impermanent Loss (MEDIUM-HIGH)**
   - In liquidity pools, price changes reduce your holdings
   - Can lose 5-25% compared to just holding
   - Mitigation: Use stable pairs (SOL-USDC) or single-asset vaults

3. **Liquidation Risk (HIGH)**
   - Leveraged positions get liquidated in volatile markets
   - Can lose entire position
   - Mitigation: Use low leverage (2-3x max), monitor positions

4. **Rug Pulls/Scams (VERY HIGH for unknown protocols)**
   - Malicious developers drain funds
   - Mitigation: Only use top protocols with locked liquidity

5. **Regulatory Risk (MEDIUM)**
   - Government crackdowns could affect DeFi access
   - Mitigation: Stay informed, diversify geographically

**For Your Profile (Age {age}, {risk} risk tolerance):**
{stance}
- Max 20% of portfolio in DeFi
- Start with low-risk options (Jito 8-9% APY)
- Graduate to medium-risk (Raydium 20-25%) after learning

**Recommended DeFi Allocation:**
- 50% Jito staking (low risk, 8-9%)
- 30% Raydium pools (medium risk, 20-25%)
- 20% Kamino vaults (high risk, 25-35%)

**Action Steps:**
1. Start with Jito (safest)
2. Learn about impermanent loss before Raydium
3. Never invest more than you can afford to lose
",
        age = p.age,
        risk = p.risk_tolerance,
        stance = match p.risk_tolerance {
            crate::model::RiskTolerance::High => "You can handle DeFi better than most, but still:",
            _ => "Keep DeFi a small satellite position:",
        },
    )
}

fn arcium(p: &UserProfile) -> String {
    format!(
        r#"Important clarification: **Arcium is NOT an investment!**

**What Arcium Actually Is:**
Arcium is a **privacy SDK/tool** for Solana, not a token you can buy or hold.

**What It Does:**
- Provides confidential computing for Solana transactions
- Enables private transfers between DeFi protocols
- Developer tool for building privacy-focused dApps

**There is NO "ARCIUM" token to invest in.**

**For Your Investment Goals (Age {age}, {risk} risk tolerance):**
Instead of "investing in Arcium," consider:

1. **Invest in Solana (SOL):**
   - Arcium builds ON Solana
   - Benefits from Solana ecosystem growth
   - Current opportunity: SOL for long-term hold

2. **Use Arcium-powered protocols** (when available):
   - Private DeFi transactions
   - Enhanced security for your investments

3. **Actual Solana DeFi investments:**
   - Jito staking: 8-9% APY (low risk)
   - Raydium pools: 20-25% APY (medium risk)
   - Kamino vaults: 25-35% APY (high risk)

**Action Steps:**
1. Don't search for "Arcium token"
2. Invest in SOL and stake with Jito
3. Use Arcium SDK when using DeFi (for privacy)
4. Follow Arcium's development for privacy features

**Your Best Move:**
Allocate to actual Solana investments:
- 40% SOL (hold)
- 30% Jito staking (8-9% APY)
- 30% Raydium or Kamino (higher yield)

Website: https://arcium.io (for info, not investing)
"#,
        age = p.age,
        risk = p.risk_tolerance,
    )
}

fn gold(p: &UserProfile) -> String {
    let risk_lower = p.risk_tolerance.label().to_lowercase();
    format!(
        r"Gold is having a moment, but let me give you the full picture for someone your age.

**Why Gold Is Relevant Now:**
1. **Near all-time highs**
2. **Inflation hedge:** Maintains purchasing power (3-5% annual historical return)
3. **Geopolitical uncertainty:** Safe haven demand
4. **Central bank buying:** Countries accumulating reserves

**BUT - For Age {age} with {risk} Risk Tolerance:**
Gold should be **MINOR** in your portfolio (5-10% max). Here's why:

**Problems with Gold:**
- Low returns (~5% annually vs stocks 10%+)
- No cash flow (no dividends/interest)
- Opportunity cost (missing stock/crypto growth)

**Better Allocation for You:**
Instead of heavy gold, consider:
- **60% Stocks** (VTI, VXUS) - growth engine
- **20% Crypto** (BTC, SOL) - high upside
- **10% DeFi** (Jito 8-9%, Raydium 20-25%)
- **5% Gold** (GLD ETF) - insurance only
- **5% Bonds** - stability

**When Gold Makes Sense:**
- Portfolio insurance (small allocation)
- Economic crisis hedge
- Diversification (low correlation to stocks)

**How to Invest in Gold:**
1. **GLD ETF** - Easiest (buy like stock)
2. **Physical gold** - Requires secure storage
3. **Gold miners (GDX)** - Higher risk/reward

**Action Steps:**
1. Buy 5-10% in GLD for diversification
2. Focus growth capital on stocks/crypto
3. Rebalance annually

**Real Talk:**
At {age} with {risk_lower} risk tolerance, use gold as insurance, not as your growth engine.

**{years}-Year Projection:**
- Gold: $10,000 → {gold} (5% annual)
- Stocks: $10,000 → {stocks} (10% annual)
- SOL/DeFi: $10,000 → {defi}+ (15%+ annual, higher risk)
",
        age = p.age,
        risk = p.risk_tolerance,
        years = p.timeline_years,
        gold = grown(dec!(10000), dec!(0.05), p.timeline_years),
        stocks = grown(dec!(10000), dec!(0.10), p.timeline_years),
        defi = grown(dec!(10000), dec!(0.15), p.timeline_years),
    )
}

fn general(question: &str, p: &UserProfile) -> String {
    format!(
        r#"Based on your profile ({summary}), here are key investment principles:

**Diversification Strategy:**
- 50-60% Traditional (VTI stocks, BND bonds)
- 20-30% Cryptocurrency (BTC, ETH, SOL)
- 10-20% Solana DeFi (Jito 8-9%, Raydium 20-25%)
- 5-10% Alternatives (Gold, REITs)

**Regarding your question: "{question}"**

**General Guidance:**
1. Match investments to your risk tolerance and timeline
2. Start with safer options (Jito staking at 8-9% APY)
3. Research thoroughly before high-risk strategies
4. Never invest more than you can afford to lose

**Top Opportunities for Your Profile:**
- **Low Risk:** Jito staking (8-9% APY) - Visit jito.network
- **Medium Risk:** Raydium pools (20-25% APY) - Visit raydium.io
- **High Risk:** Kamino vaults (25-35% APY) - Visit kamino.finance

**Common Questions I Can Answer:**
- "How does Jito staking work?"
- "What are the risks of DeFi?"
- "Should I buy Bitcoin or Solana?"
- "Is Arcium a good investment?"
- "Why invest in gold?"

Try asking one of these specific questions for detailed advice!
"#,
        summary = p.summary(),
        question = question.trim(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ProfileInput, RiskTolerance};

    fn profile(age: u32, risk: RiskTolerance, years: u32) -> UserProfile {
        UserProfile {
            age,
            risk_tolerance: risk,
            timeline_years: years,
            ..ProfileInput::default().into()
        }
    }

    #[test]
    fn test_rule_order() {
        assert_eq!(Topic::classify("Should I buy BITCOIN or Solana?"), Topic::BitcoinVsSolana);
        // "staking" beats "defi ... risk"
        assert_eq!(Topic::classify("Is DeFi staking a risk?"), Topic::JitoStaking);
        assert_eq!(Topic::classify("What are the risks of DeFi?"), Topic::DefiRisks);
        assert_eq!(Topic::classify("Is Arcium a good investment?"), Topic::Arcium);
        assert_eq!(Topic::classify("Why invest in gold?"), Topic::Gold);
        assert_eq!(Topic::classify("Bitcoin only?"), Topic::General);
    }

    #[test]
    fn test_reference_profile_reproduces_canned_text() {
        let text = answer("bitcoin or solana", &profile(30, RiskTolerance::High, 30));

        assert!(text.starts_with(
            "Given your profile (Age 30, High risk tolerance, 30-year timeline), here's my analysis:"
        ));
        assert!(text.contains("With 30 years ahead and high risk tolerance, I recommend:"));
        assert!(text.contains("split $500/month 60/40"));
    }

    #[test]
    fn test_projections_follow_timeline() {
        let p = profile(30, RiskTolerance::High, 30);
        assert!(answer("jito?", &p).contains("$10,000 → $132,000 (conservative)"));

        let gold_text = answer("gold?", &p);
        assert!(gold_text.contains("Gold: $10,000 → $43,000"));
        assert!(gold_text.contains("Stocks: $10,000 → $174,000"));
    }

    #[test]
    fn test_every_entry_carries_age_and_risk() {
        let p = profile(52, RiskTolerance::Low, 12);
        for question in [
            "bitcoin vs solana",
            "jito",
            "defi risk",
            "arcium",
            "gold",
            "what about index funds?",
        ] {
            let text = answer(question, &p);
            assert!(text.contains("52"), "{question}: missing age");
            assert!(text.contains("Low"), "{question}: missing risk label");
        }
    }

    #[test]
    fn test_extreme_timeline_does_not_overflow() {
        for years in [600, 1000] {
            let p = profile(30, RiskTolerance::High, years);
            let gold_text = answer("Why invest in gold?", &p);
            assert!(gold_text.contains("Gold: $10,000 → an amount beyond projection range"));
            assert!(answer("jito staking", &p).contains("beyond projection range"));
        }
        assert!(answer("gold", &profile(30, RiskTolerance::High, 100)).contains("Gold: $10,000 → $1,315,000"));
    }

    #[test]
    fn test_arcium_is_not_an_investment() {
        let text = answer("Is Arcium a good investment?", &UserProfile::default());
        assert!(text.contains("Arcium is NOT an investment"));
    }

    #[test]
    fn test_general_echoes_question() {
        let text = answer("  Should I pay off my mortgage?  ", &UserProfile::default());
        assert!(text.contains(r#"Regarding your question: "Should I pay off my mortgage?""#));
        assert!(text.contains("Age 30, Medium risk, 30-year timeline"));
    }

    #[test]
    fn test_answers_are_deterministic() {
        let p = UserProfile::default();
        assert_eq!(answer("gold", &p), answer("gold", &p));
    }
}
