//! Domain Models
//!
//! Profile, request and response types shared by every advisor.
//! Uses `rust_decimal` for all monetary values - never use f64 for money!

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::projection::MAX_PROJECTION_YEARS;

pub const DEFAULT_AGE: u32 = 30;
pub const DEFAULT_TIMELINE_YEARS: u32 = 30;
pub const DEFAULT_GOAL: &str = "Build long-term wealth";

/// Self-reported risk tolerance
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RiskTolerance {
    Low,
    #[default]
    Medium,
    High,
}

impl RiskTolerance {
    /// Parse a free-form label; anything unrecognised is Medium
    pub fn parse_lenient(label: &str) -> Self {
        label.parse().unwrap_or_default()
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }
}

impl FromStr for RiskTolerance {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" | "conservative" => Ok(Self::Low),
            "medium" | "moderate" => Ok(Self::Medium),
            "high" | "aggressive" => Ok(Self::High),
            other => Err(format!("unknown risk tolerance: {other}")),
        }
    }
}

impl fmt::Display for RiskTolerance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A complete financial profile, fixed for the duration of one request
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub age: u32,
    pub risk_tolerance: RiskTolerance,
    pub annual_income: Decimal,
    pub capital: Decimal,
    pub monthly_contribution: Decimal,
    pub timeline_years: u32,
    pub goal: String,
    /// ISO code, e.g. "USD"
    pub currency: String,
    /// Display symbol, e.g. "$"
    pub currency_symbol: String,
}

impl Default for UserProfile {
    fn default() -> Self {
        ProfileInput::default().into()
    }
}

impl UserProfile {
    /// Short "(Age 30, High risk, 30-year timeline)" summary used in prompts and templates
    pub fn summary(&self) -> String {
        format!(
            "Age {}, {} risk, {}-year timeline",
            self.age, self.risk_tolerance, self.timeline_years
        )
    }

    /// Format an amount in the profile's currency, e.g. "$1,234.50"
    pub fn money(&self, amount: Decimal) -> String {
        format!("{}{}", self.currency_symbol, group_thousands(amount, 2))
    }

    /// Whole-unit amount, e.g. "$15,000"
    pub fn whole_money(&self, amount: Decimal) -> String {
        format!("{}{}", self.currency_symbol, group_thousands(amount, 0))
    }
}

/// Render an amount with `,` thousands separators and `dp` decimals
pub fn group_thousands(amount: Decimal, dp: u32) -> String {
    let rendered = format!("{:.*}", dp as usize, amount.round_dp(dp).abs());
    let (int_part, frac_part) = rendered.split_once('.').map_or((rendered.as_str(), None), |(i, f)| (i, Some(f)));

    let mut grouped = String::with_capacity(rendered.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if let Some(frac) = frac_part {
        grouped.push('.');
        grouped.push_str(frac);
    }

    if amount.is_sign_negative() && !amount.round_dp(dp).is_zero() {
        format!("-{grouped}")
    } else {
        grouped
    }
}

/// Partially filled profile as it arrives from a form or request body
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ProfileInput {
    #[serde(default)]
    pub age: Option<u32>,
    #[serde(default)]
    pub risk_tolerance: Option<String>,
    #[serde(default)]
    pub annual_income: Option<Decimal>,
    #[serde(default)]
    pub capital: Option<Decimal>,
    #[serde(default)]
    pub monthly_contribution: Option<Decimal>,
    #[serde(default)]
    pub timeline_years: Option<u32>,
    #[serde(default)]
    pub goal: Option<String>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub currency_symbol: Option<String>,
}

impl From<ProfileInput> for UserProfile {
    fn from(input: ProfileInput) -> Self {
        let non_blank = |s: Option<String>| s.map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        Self {
            age: input.age.unwrap_or(DEFAULT_AGE),
            risk_tolerance: input
                .risk_tolerance
                .as_deref()
                .map(RiskTolerance::parse_lenient)
                .unwrap_or_default(),
            annual_income: input.annual_income.unwrap_or(Decimal::ZERO),
            capital: input.capital.unwrap_or(Decimal::ZERO),
            monthly_contribution: input.monthly_contribution.unwrap_or(Decimal::ZERO),
            timeline_years: input
                .timeline_years
                .unwrap_or(DEFAULT_TIMELINE_YEARS)
                .clamp(1, MAX_PROJECTION_YEARS),
            goal: non_blank(input.goal).unwrap_or_else(|| DEFAULT_GOAL.into()),
            currency: non_blank(input.currency).unwrap_or_else(|| "USD".into()),
            currency_symbol: non_blank(input.currency_symbol).unwrap_or_else(|| "$".into()),
        }
    }
}

/// One question to the advisor
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AdviceRequest {
    pub question: String,
    pub profile: UserProfile,
    /// Narrative summary of fetched prices and yields, if any
    pub market_context: Option<String>,
}

impl AdviceRequest {
    pub fn new(question: impl Into<String>, profile: UserProfile) -> Self {
        Self {
            question: question.into(),
            profile,
            market_context: None,
        }
    }

    pub fn with_market_context(mut self, context: impl Into<String>) -> Self {
        self.market_context = Some(context.into());
        self
    }
}

/// Where a piece of generated text came from
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdviceSource {
    /// A hosted or local model answered
    Model,
    /// Every model tier failed; deterministic template
    FallbackTemplate,
    /// No credential; canned knowledge-base entry
    StaticKb,
}

/// Text returned to the caller; never empty
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AdviceResponse {
    pub text: String,
    pub source: AdviceSource,
    /// Model identifier that answered, when `source` is `Model`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    /// Whether the audit pass rewrote the draft
    #[serde(default)]
    pub audited: bool,
}

impl AdviceResponse {
    pub fn from_model(text: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            source: AdviceSource::Model,
            model: Some(model.into()),
            audited: false,
        }
    }

    pub fn fallback(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            source: AdviceSource::FallbackTemplate,
            model: None,
            audited: false,
        }
    }

    pub fn static_kb(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            source: AdviceSource::StaticKb,
            model: None,
            audited: false,
        }
    }
}

/// A position the user already holds
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Holding {
    /// Ticker symbol (e.g., "SOL", "VTI")
    pub symbol: String,

    /// Units held
    pub quantity: Decimal,

    /// Total amount paid
    pub cost: Decimal,
}

impl Holding {
    pub fn new(symbol: impl Into<String>, quantity: Decimal, cost: Decimal) -> Self {
        Self {
            symbol: symbol.into().to_uppercase(),
            quantity,
            cost,
        }
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn test_empty_input_gets_defaults() {
        let profile: UserProfile = ProfileInput::default().into();

        assert_eq!(profile.age, 30);
        assert_eq!(profile.risk_tolerance, RiskTolerance::Medium);
        assert_eq!(profile.timeline_years, 30);
        assert_eq!(profile.goal, DEFAULT_GOAL);
        assert_eq!(profile.currency_symbol, "$");
    }

    #[test]
    fn test_timeline_is_clamped() {
        let long: UserProfile = ProfileInput {
            timeline_years: Some(600),
            ..Default::default()
        }
        .into();
        assert_eq!(long.timeline_years, MAX_PROJECTION_YEARS);

        let zero: UserProfile = ProfileInput {
            timeline_years: Some(0),
            ..Default::default()
        }
        .into();
        assert_eq!(zero.timeline_years, 1);
    }

    #[test]
    fn test_risk_parsing_is_lenient() {
        assert_eq!(RiskTolerance::parse_lenient("HIGH"), RiskTolerance::High);
        assert_eq!(RiskTolerance::parse_lenient(" low "), RiskTolerance::Low);
        assert_eq!(RiskTolerance::parse_lenient("aggressive"), RiskTolerance::High);
        assert_eq!(RiskTolerance::parse_lenient("yolo"), RiskTolerance::Medium);
    }

    #[test]
    fn test_blank_strings_fall_back() {
        let input = ProfileInput {
            goal: Some("   ".into()),
            currency_symbol: Some("€".into()),
            ..Default::default()
        };
        let profile = UserProfile::from(input);

        assert_eq!(profile.goal, DEFAULT_GOAL);
        assert_eq!(profile.currency_symbol, "€");
    }

    #[test]
    fn test_profile_input_from_json() {
        let input: ProfileInput = serde_json::from_str(
            r#"{"age": 45, "risk_tolerance": "Low", "capital": 50000, "monthly_contribution": "1500.50"}"#,
        )
        .unwrap();
        let profile = UserProfile::from(input);

        assert_eq!(profile.age, 45);
        assert_eq!(profile.capital, dec!(50000));
        assert_eq!(profile.monthly_contribution, dec!(1500.50));
        assert_eq!(profile.summary(), "Age 45, Low risk, 30-year timeline");
    }

    #[test]
    fn test_money_formatting() {
        let profile = UserProfile::default();
        assert_eq!(profile.money(dec!(1234.5)), "$1,234.50");
        assert_eq!(profile.whole_money(dec!(15000)), "$15,000");
        assert_eq!(group_thousands(dec!(999), 0), "999");
        assert_eq!(group_thousands(dec!(1234567.891), 2), "1,234,567.89");
        assert_eq!(group_thousands(dec!(-2500), 0), "-2,500");
    }
}
