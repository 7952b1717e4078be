//! # agent-core
//!
//! Provider-agnostic LLM abstraction and the tiered retry/fallback engine.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    TieredGenerator                           │
//! │  ┌─────────────┐  ┌─────────────┐  ┌─────────────────────┐  │
//! │  │ ModelTiers  │  │ RetryPolicy │  │   LlmProvider       │  │
//! │  │ (priority)  │──│ (3 × 5s·n)  │──│   (Strategy)        │  │
//! │  └─────────────┘  └─────────────┘  └─────────────────────┘  │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! The `LlmProvider` trait enables swapping between Gemini, Ollama, or any
//! other backend without changing the retry and fallback rules.

pub mod provider;
pub mod tiers;
pub mod error;

pub use error::{AgentError, Result};
pub use provider::{Completion, GenerationOptions, LlmProvider};
pub use tiers::{ModelTiers, RetryPolicy, TierSuccess, TieredGenerator};
