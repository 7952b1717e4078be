//! Education Guides
//!
//! Short topic guides written by the tier engine, with a fixed skeleton as
//! fallback.

use std::fmt;
use std::str::FromStr;

use agent_core::TieredGenerator;
use serde::{Deserialize, Serialize};

use crate::advisor::{attempt, prompt};
use crate::model::AdviceResponse;

/// A catalog entry
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct GuideTopic {
    pub title: &'static str,
    pub slug: &'static str,
}

/// Guides offered in the education tab
pub const AVAILABLE_GUIDES: &[GuideTopic] = &[
    GuideTopic { title: "Jito Staking", slug: "jito-staking" },
    GuideTopic { title: "Raydium Liquidity Pools", slug: "raydium-liquidity" },
    GuideTopic { title: "Kamino Vaults", slug: "kamino-vaults" },
    GuideTopic { title: "Dollar-Cost Averaging", slug: "dca" },
    GuideTopic { title: "Impermanent Loss", slug: "impermanent-loss" },
    GuideTopic { title: "Risk Management", slug: "risk-management" },
    GuideTopic { title: "Portfolio Rebalancing", slug: "rebalancing" },
];

/// Look up a topic by slug or title, case-insensitively
pub fn find_guide(key: &str) -> Option<&'static GuideTopic> {
    let key = key.trim();
    AVAILABLE_GUIDES
        .iter()
        .find(|g| g.slug.eq_ignore_ascii_case(key) || g.title.eq_ignore_ascii_case(key))
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LearnerLevel {
    #[default]
    Beginner,
    Intermediate,
    Advanced,
}

impl LearnerLevel {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Beginner => "beginner",
            Self::Intermediate => "intermediate",
            Self::Advanced => "advanced",
        }
    }
}

impl fmt::Display for LearnerLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LearnerLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "beginner" => Ok(Self::Beginner),
            "intermediate" => Ok(Self::Intermediate),
            "advanced" => Ok(Self::Advanced),
            other => Err(format!("unknown level: {other}")),
        }
    }
}

/// Guide generation over an optional model engine
#[derive(Clone)]
pub struct GuideWriter {
    engine: Option<TieredGenerator>,
}

impl GuideWriter {
    pub fn new(engine: Option<TieredGenerator>) -> Self {
        Self { engine }
    }

    /// Write a guide; catalog slugs resolve to their title, other topics pass through
    pub async fn generate_guide(&self, topic: &str, level: LearnerLevel) -> AdviceResponse {
        let title = find_guide(topic).map_or_else(|| topic.trim(), |g| g.title);

        let generated = match &self.engine {
            Some(engine) => attempt(engine, &prompt::guide(title, level.as_str()), "guide").await,
            None => None,
        };

        match generated {
            Some(success) => AdviceResponse::from_model(success.text(), &success.model),
            None => AdviceResponse::fallback(fallback_guide(title, level)),
        }
    }
}

/// Seven-section skeleton naming the topic
pub fn fallback_guide(title: &str, level: LearnerLevel) -> String {
    format!(
        "# {title}: a {level} guide\n\n\
         *The full AI-written guide is temporarily unavailable. Here is the outline to study from.*\n\n\
         ## 1. What is it?\n\
         {title} is a building block of modern portfolios. Start with the official documentation.\n\n\
         ## 2. Why it matters\n\
         Understanding {title} helps you judge yield against risk before committing capital.\n\n\
         ## 3. How it works\n\
         - Read how returns are generated\n\
         - Note where your funds are held and who controls them\n\
         - Check fees and lock-up periods\n\n\
         ## 4. Key numbers to know\n\
         - Jito staking: 8-9% APY\n\
         - Raydium pools: 20-25% APY\n\
         - Kamino vaults: 25-35% APY\n\n\
         ## 5. Getting started\n\
         1. Start with a small amount you can afford to lose\n\
         2. Use audited protocols only\n\
         3. Track results monthly\n\n\
         ## 6. Common mistakes\n\
         - Chasing the highest APY without understanding the risk\n\
         - Ignoring impermanent loss and leverage\n\n\
         ## 7. Resources\n\
         - jito.network, raydium.io, kamino.finance\n"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog() {
        assert_eq!(AVAILABLE_GUIDES.len(), 7);
        assert_eq!(find_guide("dca").unwrap().title, "Dollar-Cost Averaging");
        assert_eq!(find_guide("impermanent loss").unwrap().slug, "impermanent-loss");
        assert!(find_guide("options trading").is_none());
    }

    #[test]
    fn test_level_parsing() {
        assert_eq!("Advanced".parse::<LearnerLevel>().unwrap(), LearnerLevel::Advanced);
        assert!("expert".parse::<LearnerLevel>().is_err());
        let level: LearnerLevel = serde_json::from_str(r#""intermediate""#).unwrap();
        assert_eq!(level, LearnerLevel::Intermediate);
    }

    #[tokio::test]
    async fn test_without_engine_returns_skeleton() {
        let guide = GuideWriter::new(None).generate_guide("kamino-vaults", LearnerLevel::Beginner).await;

        assert_eq!(guide.source, crate::model::AdviceSource::FallbackTemplate);
        assert!(guide.text.starts_with("# Kamino Vaults: a beginner guide"));
        for section in 1..=7 {
            assert!(guide.text.contains(&format!("## {section}. ")));
        }
    }
}
