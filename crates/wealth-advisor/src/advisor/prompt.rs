//! Prompt builders
//!
//! Every model call in the crate gets its text from here.

use crate::model::{Holding, RiskTolerance, UserProfile};

const ADVISOR_ROLE: &str = "You are an expert investment advisor specializing in traditional markets, \
cryptocurrency, and Solana DeFi protocols.";

fn profile_block(profile: &UserProfile) -> String {
    format!(
        "USER PROFILE (PERSONALIZE YOUR RESPONSE):\n\
         - Age: {} years old\n\
         - Risk Tolerance: {}\n\
         - Starting Capital: {}\n\
         - Monthly Investment: {}\n\
         - Investment Timeline: {} years\n\
         - Goal: {}\n",
        profile.age,
        profile.risk_tolerance,
        profile.whole_money(profile.capital),
        profile.whole_money(profile.monthly_contribution),
        profile.timeline_years,
        profile.goal,
    )
}

fn market_block(market_context: Option<&str>) -> String {
    market_context
        .filter(|c| !c.trim().is_empty())
        .map(|c| format!("\nMARKET CONTEXT:\n{c}\n"))
        .unwrap_or_default()
}

/// Chat answer prompt
pub fn advice(question: &str, profile: &UserProfile, market_context: Option<&str>) -> String {
    format!(
        "{ADVISOR_ROLE}\n\n{profile}{market}\nUSER QUESTION: {question}\n\n\
         Provide a helpful, actionable answer that:\n\
         1. Answers their question directly in the first sentence\n\
         2. Includes specific numbers, percentages, or APY rates\n\
         3. Mentions relevant Solana DeFi opportunities (Jito 8-9% APY, Raydium 20-25%, Kamino 25-35%)\n\
         4. Lists at least 2 specific risks\n\
         5. Provides 2-3 actionable next steps\n\
         6. If asked about Arcium: Clarify it's a privacy SDK/tool, NOT an investment\n\n\
         Keep response 150-300 words. Be specific and actionable.\n",
        profile = profile_block(profile),
        market = market_block(market_context),
        question = question.trim(),
    )
}

/// Self-critique pass over a model draft
pub fn audit(question: &str, draft: &str, profile: &UserProfile) -> String {
    format!(
        "You are a compliance reviewer for investment guidance.\n\n\
         The user ({summary}) asked: {question}\n\n\
         DRAFT ANSWER:\n{draft}\n\n\
         Review the draft and return a corrected final answer:\n\
         - Fix any wrong or implausible numbers (APYs, returns, percentages)\n\
         - Make sure at least 2 concrete risks are listed\n\
         - Make sure Arcium, if mentioned, is described as a privacy tool and not an investment\n\
         - Keep the structure and length of the draft\n\n\
         Return only the final answer text, without commentary about the review.\n",
        summary = profile.summary(),
        question = question.trim(),
    )
}

/// Ten-section investment plan prompt
pub fn plan(profile: &UserProfile, market_context: Option<&str>) -> String {
    let sym = &profile.currency_symbol;
    format!(
        "You are an expert financial advisor specializing in multi-channel investing with deep \
         knowledge of the Solana DeFi ecosystem.\n\n\
         USER PROFILE:\n\
         - Age: {age}\n\
         - Currency: {currency}\n\
         - Annual Income: {income}\n\
         - Starting Capital: {capital}\n\
         - Monthly Investment: {monthly}\n\
         - Investment Timeline: {years} years\n\
         - Risk Tolerance: {risk}\n\
         - Investment Goal: {goal}\n\
         {market}\n\
         IMPORTANT: All amounts in the plan must use the {sym} currency symbol.\n\n\
         CREATE A COMPREHENSIVE MULTI-CHANNEL INVESTMENT PLAN:\n\n\
         1. RISK ASSESSMENT (1-10 scale) with reasoning.\n\
         2. MULTI-CHANNEL ASSET ALLOCATION with exact amounts in {sym}:\n\
            A. Traditional markets: VTI, BND, VXUS\n\
            B. Crypto core: BTC, ETH, SOL\n\
            C. Solana ecosystem: JitoSOL liquid staking (8-9% APY), Raydium pools (15-30% APY), \
         Jupiter (JUP), Kamino vaults (20-40% APY)\n\
            D. Alternatives: VNQ, GLD\n\
            Arcium is a privacy SDK, NOT an investment: allocate nothing to it.\n\
         3. ADVANCED SOLANA STRATEGIES: Jito staking amount and annual passive income, \
         Raydium SOL-USDC pools, Kamino automated vaults.\n\
         4. MONTHLY BREAKDOWN of {monthly} across traditional, crypto, Solana ecosystem and alternatives.\n\
         5. MULTI-LAYER YIELD PROJECTIONS: JitoSOL at 8.5%, DeFi at 25%, traditional at 4%; \
         total annual passive income in {sym}.\n\
         6. PORTFOLIO PROJECTIONS at 5, 10 and {years} years, in Conservative, Moderate and \
         Aggressive scenarios.\n\
         7. RISK MANAGEMENT: smart contract bugs, impermanent loss, Solana network outages, \
         Kamino leverage, market volatility.\n\
         8. EXECUTION GUIDE, week by week: wallet setup, Jito staking, Raydium liquidity, \
         Kamino vaults, then ongoing monitoring and quarterly rebalancing.\n\
         9. WHY THIS APPROACH WORKS.\n\
         10. PROTOCOL-SPECIFIC RECOMMENDATIONS for Jito, Raydium, Kamino, Jupiter and Arcium \
         (allocation ZERO for Arcium).\n\n\
         BE EXTREMELY SPECIFIC with amounts in {sym}. Explain both opportunities AND risks.\n\
         Format clearly with headers, bullet points, and tables.\n",
        age = profile.age,
        currency = profile.currency,
        income = profile.whole_money(profile.annual_income),
        capital = profile.whole_money(profile.capital),
        monthly = profile.whole_money(profile.monthly_contribution),
        years = profile.timeline_years,
        risk = profile.risk_tolerance,
        goal = profile.goal,
        market = market_block(market_context),
    )
}

/// Educational guide prompt
pub fn guide(topic: &str, level: &str) -> String {
    format!(
        "Create a comprehensive but concise educational guide on: {topic}\n\n\
         Target audience: {level} investors\n\n\
         Structure your guide with:\n\n\
         1. WHAT IS IT? (2-3 sentences explaining the concept)\n\
         2. WHY IT MATTERS (2-3 sentences on relevance to investing)\n\
         3. HOW IT WORKS (3-5 bullet points with specific details)\n\
         4. KEY NUMBERS TO KNOW (specific percentages, APYs, risks)\n\
         5. GETTING STARTED (3-4 actionable steps)\n\
         6. COMMON MISTAKES (2-3 pitfalls to avoid)\n\
         7. RESOURCES (specific websites or protocols to use)\n\n\
         Keep total length under 400 words. Use simple language. Include specific numbers.\n"
    )
}

/// Tactical rebalance report prompt
pub fn rebalance(holdings: &[Holding], target: RiskTolerance, profile: &UserProfile) -> String {
    let lines: Vec<String> = holdings
        .iter()
        .map(|h| {
            format!(
                "- {}: {} units (Cost: {})",
                h.symbol,
                h.quantity.normalize(),
                profile.money(h.cost)
            )
        })
        .collect();

    format!(
        "You are an elite portfolio rebalancing specialist.\n\n\
         CURRENT HOLDINGS:\n{holdings}\n\n\
         TARGET RISK PROFILE: {target}\n\
         USER CONTEXT: Age {age}, Goal: {goal}\n\n\
         TASK:\n\
         1. Analyze the current weighting of assets.\n\
         2. Identify over-concentrations or gaps for the {target} risk profile.\n\
         3. Recommend SPECIFIC SELL and BUY actions to reach target weights.\n\
         4. For every execution step, state how Arcium's confidential computing protects \
         trade intent against front-running.\n\
         5. Focus on execution efficiency.\n\n\
         Format as a Tactical Rebalance Report in Markdown. Use bold for actionable steps.\n",
        holdings = lines.join("\n"),
        age = profile.age,
        goal = profile.goal,
    )
}
