//! Advice Generator
//!
//! Answers a question for a profile. The model path runs the prompt through
//! the tier engine and optionally audits the draft; every failure resolves
//! to local text, so callers always get an answer.
//!
//! ```text
//!   no engine ─────────────────────────────▶ static_kb
//!   engine ── tiers answer ── [audit] ─────▶ model
//!          └─ tiers exhausted ─────────────▶ fallback_template
//! ```

pub mod fallback;
pub mod knowledge;
pub mod prompt;

use agent_core::{TierSuccess, TieredGenerator};

use crate::model::{AdviceRequest, AdviceResponse, UserProfile};

/// Run a prompt through the tiers, logging the outcome
///
/// Returns `None` when every tier failed; the caller picks the fallback.
pub(crate) async fn attempt(engine: &TieredGenerator, prompt: &str, task: &str) -> Option<TierSuccess> {
    match engine.generate(prompt).await {
        Ok(success) => {
            tracing::info!(task, model = %success.model, attempts = success.attempts, "Generated with model");
            Some(success)
        }
        Err(e) => {
            tracing::warn!(task, error = %e, "{}; using fallback", e.user_message());
            None
        }
    }
}

/// Tiered advice generation with audit and static fallbacks
#[derive(Clone)]
pub struct AdviceGenerator {
    engine: Option<TieredGenerator>,
    audit: bool,
}

impl AdviceGenerator {
    /// Generator backed by a model engine
    pub fn new(engine: TieredGenerator) -> Self {
        Self {
            engine: Some(engine),
            audit: false,
        }
    }

    /// Generator with no credential; answers from the knowledge base
    pub fn disabled() -> Self {
        Self {
            engine: None,
            audit: false,
        }
    }

    /// Build from an optional engine
    pub fn from_engine(engine: Option<TieredGenerator>) -> Self {
        engine.map_or_else(Self::disabled, Self::new)
    }

    /// Enable the self-critique pass over model drafts
    pub fn with_audit(mut self, enabled: bool) -> Self {
        self.audit = enabled;
        self
    }

    pub fn is_enabled(&self) -> bool {
        self.engine.is_some()
    }

    pub fn audits(&self) -> bool {
        self.audit
    }

    /// Answer a question with no market context
    pub async fn generate(&self, question: &str, profile: &UserProfile) -> AdviceResponse {
        self.respond(&AdviceRequest::new(question, profile.clone())).await
    }

    /// Answer a request; never fails and never returns empty text
    pub async fn respond(&self, request: &AdviceRequest) -> AdviceResponse {
        let question = request.question.trim();
        let profile = &request.profile;

        let Some(engine) = &self.engine else {
            tracing::debug!("No model credential, answering from knowledge base");
            return AdviceResponse::static_kb(knowledge::answer(question, profile));
        };

        if question.is_empty() {
            return AdviceResponse::fallback(fallback::advice(question, profile));
        }

        let prompt = prompt::advice(question, profile, request.market_context.as_deref());
        let Some(draft) = attempt(engine, &prompt, "advice").await else {
            return AdviceResponse::fallback(fallback::advice(question, profile));
        };

        let mut response = AdviceResponse::from_model(draft.text(), &draft.model);

        if self.audit {
            let review = prompt::audit(question, draft.text(), profile);
            match attempt(engine, &review, "audit").await {
                Some(audited) => {
                    response.text = audited.completion.content;
                    response.audited = true;
                }
                None => tracing::info!("Audit unavailable, keeping draft"),
            }
        }

        response
    }
}
