//! Server configuration from the environment

use std::str::FromStr;

use agent_core::ModelTiers;

/// Default local model when running against Ollama
const OLLAMA_DEFAULT_MODEL: &str = "llama3.2";

/// Which LLM backend serves the model tiers
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ProviderKind {
    #[default]
    Gemini,
    Ollama,
}

impl FromStr for ProviderKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "gemini" | "" => Ok(Self::Gemini),
            "ollama" => Ok(Self::Ollama),
            other => Err(format!("unknown LLM_PROVIDER: {other}")),
        }
    }
}

#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// `BIND_ADDR`, default `0.0.0.0:3000`
    pub bind_addr: String,

    /// `LLM_PROVIDER`, default gemini
    pub provider: ProviderKind,

    /// `ADVICE_AUDIT`: run the self-critique pass on advice drafts
    pub audit: bool,

    /// `GOALWEALTH_MODELS`, when set
    pub models: Option<ModelTiers>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:3000".into(),
            provider: ProviderKind::default(),
            audit: false,
            models: None,
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let provider = std::env::var("LLM_PROVIDER")
            .ok()
            .map(|p| {
                p.parse().unwrap_or_else(|e: String| {
                    tracing::warn!("{e}, using Gemini");
                    ProviderKind::Gemini
                })
            })
            .unwrap_or_default();

        Self {
            bind_addr: std::env::var("BIND_ADDR").unwrap_or(defaults.bind_addr),
            provider,
            audit: std::env::var("ADVICE_AUDIT").is_ok_and(|v| parse_flag(&v)),
            models: ModelTiers::from_env(),
        }
    }

    /// Tier list for the selected provider
    pub fn tiers(&self) -> ModelTiers {
        match (&self.models, self.provider) {
            (Some(models), _) => models.clone(),
            (None, ProviderKind::Gemini) => ModelTiers::default(),
            (None, ProviderKind::Ollama) => ModelTiers::new([OLLAMA_DEFAULT_MODEL]),
        }
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(value.trim().to_lowercase().as_str(), "1" | "true" | "yes" | "on")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_parsing() {
        assert_eq!("Ollama".parse::<ProviderKind>().unwrap(), ProviderKind::Ollama);
        assert_eq!("".parse::<ProviderKind>().unwrap(), ProviderKind::Gemini);
        assert!("openai".parse::<ProviderKind>().is_err());
    }

    #[test]
    fn test_tiers_per_provider() {
        let mut config = ServerConfig::default();
        assert_eq!(config.tiers(), ModelTiers::default());

        config.provider = ProviderKind::Ollama;
        assert_eq!(config.tiers(), ModelTiers::new(["llama3.2"]));

        config.models = Some(ModelTiers::from_csv("a, b"));
        assert_eq!(config.tiers().len(), 2);
    }

    #[test]
    fn test_flags() {
        assert!(parse_flag("TRUE"));
        assert!(parse_flag(" 1 "));
        assert!(!parse_flag("no"));
    }
}
