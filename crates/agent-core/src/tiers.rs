//! Tiered Model Generation
//!
//! Tries a priority-ordered list of model identifiers against one provider.
//!
//! ```text
//!   TRYING(0) ──ok──────────────────────────▶ DONE(model 0)
//!      │ transient: retry with 5s × attempt, up to 3 calls
//!      │ permanent / sentinel / empty / retries spent
//!      ▼
//!   TRYING(1) ──ok──────────────────────────▶ DONE(model 1)
//!      │
//!      ▼
//!     ...  list exhausted ──────────────────▶ Err(Exhausted)
//! ```
//!
//! The engine holds no per-request state; every call to
//! [`TieredGenerator::generate`] starts again at the first tier.

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{AgentError, Result};
use crate::provider::{Completion, GenerationOptions, LlmProvider};

/// Default tiers, newest first, most reliable last
pub const DEFAULT_MODEL_TIERS: &[&str] = &["gemini-2.5-flash", "gemini-2.0-flash", "gemini-1.5-flash"];

/// Phrases a provider may put in an otherwise successful reply when it is overloaded
pub const CAPACITY_SENTINELS: &[&str] = &[
    "the model is overloaded",
    "model is currently overloaded",
    "over capacity",
    "experiencing high demand",
    "resource has been exhausted",
];

/// Ordered list of model identifiers to try
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModelTiers(Vec<String>);

impl Default for ModelTiers {
    fn default() -> Self {
        Self::new(DEFAULT_MODEL_TIERS.iter().copied())
    }
}

impl ModelTiers {
    pub fn new<I, S>(models: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(models.into_iter().map(Into::into).collect())
    }

    /// Parse a comma-separated list, dropping blanks
    pub fn from_csv(csv: &str) -> Self {
        Self::new(
            csv.split(',')
                .map(str::trim)
                .filter(|m| !m.is_empty()),
        )
    }

    /// Read `GOALWEALTH_MODELS`, or `None` when unset or blank
    pub fn from_env() -> Option<Self> {
        std::env::var("GOALWEALTH_MODELS")
            .ok()
            .map(|csv| Self::from_csv(&csv))
            .filter(|tiers| !tiers.is_empty())
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Retry policy for transient errors on one model
#[derive(Clone, Debug)]
pub struct RetryPolicy {
    /// Total calls allowed per model, first attempt included
    pub max_attempts: u32,

    /// Backoff unit; attempt `n` waits `n × base_backoff`
    pub base_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_backoff: Duration::from_secs(5),
        }
    }
}

impl RetryPolicy {
    /// Linear backoff after a failed attempt (1-based)
    pub fn backoff_for(&self, attempt: u32) -> Duration {
        self.base_backoff * attempt
    }
}

/// A successful tiered generation
#[derive(Clone, Debug)]
pub struct TierSuccess {
    /// The usable completion
    pub completion: Completion,

    /// Identifier of the tier that answered
    pub model: String,

    /// Provider calls made across all tiers, this one included
    pub attempts: u32,
}

impl TierSuccess {
    pub fn text(&self) -> &str {
        &self.completion.content
    }
}

/// Runs a prompt through the model tiers with retry and skip rules
#[derive(Clone)]
pub struct TieredGenerator {
    provider: Arc<dyn LlmProvider>,
    tiers: ModelTiers,
    retry: RetryPolicy,
    options: GenerationOptions,
}

impl TieredGenerator {
    pub fn new(provider: Arc<dyn LlmProvider>, tiers: ModelTiers) -> Self {
        Self {
            provider,
            tiers,
            retry: RetryPolicy::default(),
            options: GenerationOptions::default(),
        }
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Sampling settings applied to every tier (the model field is overridden)
    pub fn with_options(mut self, options: GenerationOptions) -> Self {
        self.options = options;
        self
    }

    pub const fn tiers(&self) -> &ModelTiers {
        &self.tiers
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    /// Walk the tiers until one yields usable text
    pub async fn generate(&self, prompt: &str) -> Result<TierSuccess> {
        let mut attempts = 0;

        for model in self.tiers.iter() {
            match self.try_model(model, prompt, &mut attempts).await {
                Ok(completion) => {
                    tracing::info!(model, attempts, "Model tier answered");
                    return Ok(TierSuccess {
                        completion,
                        model: model.to_string(),
                        attempts,
                    });
                }
                Err(e) => {
                    tracing::warn!(model, error = %e, "Model tier failed, moving to next");
                }
            }
        }

        Err(AgentError::Exhausted { attempts })
    }

    async fn try_model(&self, model: &str, prompt: &str, attempts: &mut u32) -> Result<Completion> {
        let options = GenerationOptions {
            model: model.to_string(),
            ..self.options.clone()
        };
        let mut attempt = 0;

        loop {
            attempt += 1;
            *attempts += 1;
            tracing::debug!(model, attempt, "Calling model");

            match self.provider.complete(prompt, &options).await {
                Ok(completion) => return validate(completion, model),
                Err(e) if e.is_transient() && attempt < self.retry.max_attempts => {
                    let delay = self.retry.backoff_for(attempt);
                    tracing::warn!(model, attempt, ?delay, error = %e, "Transient provider error, backing off");
                    tokio::time::sleep(delay).await;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

/// Reject replies that carry no text or announce provider overload
fn validate(completion: Completion, model: &str) -> Result<Completion> {
    if completion.content.trim().is_empty() {
        return Err(AgentError::EmptyResponse(model.to_string()));
    }
    if contains_capacity_sentinel(&completion.content) {
        return Err(AgentError::Capacity(format!("{model} reported overload in its reply")));
    }
    Ok(completion)
}

/// Check text for a provider over-capacity phrase
pub fn contains_capacity_sentinel(text: &str) -> bool {
    let lower = text.to_lowercase();
    CAPACITY_SENTINELS.iter().any(|s| lower.contains(s))
}
