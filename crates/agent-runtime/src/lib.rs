//! # agent-runtime
//!
//! Concrete LLM providers for GoalWealth.
//!
//! ## Providers
//!
//! - **Gemini** (default): hosted Generative Language API, one API key
//! - **Ollama** (feature `ollama`): local inference
//!
//! ## Usage
//!
//! ```rust,ignore
//! use agent_core::{ModelTiers, TieredGenerator};
//! use agent_runtime::{GeminiConfig, GeminiProvider};
//!
//! if let Some(config) = GeminiConfig::from_env() {
//!     let provider = GeminiProvider::new(config)?;
//!     let engine = TieredGenerator::new(Arc::new(provider), ModelTiers::default());
//! }
//! ```

pub mod gemini;

#[cfg(feature = "ollama")]
pub mod ollama;

pub use gemini::{GeminiConfig, GeminiProvider};

#[cfg(feature = "ollama")]
pub use ollama::{OllamaConfig, OllamaProvider};

// Re-export core types for convenience
pub use agent_core::{
    AgentError, Completion, GenerationOptions, LlmProvider, ModelTiers, Result, RetryPolicy,
    TieredGenerator,
};
