//! Error Types
//!
//! Provider failures are split into transient ones (worth retrying on the
//! same model) and permanent ones (skip straight to the next model tier).

use thiserror::Error;

/// Result type alias for agent operations
pub type Result<T> = std::result::Result<T, AgentError>;

/// Agent error types
#[derive(Error, Debug)]
pub enum AgentError {
    /// LLM provider error that retrying will not fix
    #[error("Provider error: {0}")]
    Provider(String),

    /// Provider unavailable, timing out, or answering with a 5xx
    #[error("Provider unavailable: {0}")]
    ProviderUnavailable(String),

    /// Rate limited (HTTP 429)
    #[error("Rate limited: {0}")]
    RateLimited(String),

    /// Daily or per-minute quota exhausted
    #[error("Quota exceeded: {0}")]
    QuotaExceeded(String),

    /// Provider reports it is over capacity
    #[error("Provider over capacity: {0}")]
    Capacity(String),

    /// Authentication failed
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// Malformed request or unknown model
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Model answered with no usable text
    #[error("Empty response from model {0}")]
    EmptyResponse(String),

    /// Every model tier failed
    #[error("All model tiers exhausted after {attempts} attempts")]
    Exhausted { attempts: u32 },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Parse error (provider payload)
    #[error("Parse error: {0}")]
    Parse(String),
}

/// Wording providers use for quota exhaustion
const QUOTA_MARKERS: &[&str] = &["quota", "resource_exhausted", "resource has been exhausted"];

/// Wording providers use for overload
const CAPACITY_MARKERS: &[&str] = &["overloaded", "capacity", "high demand"];

/// Wording that indicates a temporary outage
const UNAVAILABLE_MARKERS: &[&str] = &[
    "unavailable",
    "timed out",
    "timeout",
    "connection refused",
    "connection reset",
    "internal error",
];

impl AgentError {
    /// Check if the same model is worth another attempt
    pub const fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::ProviderUnavailable(_)
                | Self::RateLimited(_)
                | Self::QuotaExceeded(_)
                | Self::Capacity(_)
        )
    }

    /// Classify an HTTP error status plus body into an error
    pub fn from_status(status: u16, body: &str) -> Self {
        let detail = format!("HTTP {status}: {}", body.trim());
        match status {
            429 => {
                if contains_any(body, QUOTA_MARKERS) {
                    Self::QuotaExceeded(detail)
                } else {
                    Self::RateLimited(detail)
                }
            }
            401 | 403 => Self::Auth(detail),
            500..=599 => {
                if contains_any(body, CAPACITY_MARKERS) {
                    Self::Capacity(detail)
                } else {
                    Self::ProviderUnavailable(detail)
                }
            }
            400 | 404 | 422 => Self::InvalidRequest(detail),
            _ => Self::classify_message(detail),
        }
    }

    /// Classify a free-text error message (client libraries that only give strings)
    pub fn classify_message(message: impl Into<String>) -> Self {
        let message = message.into();
        if message.contains("429") || message.to_lowercase().contains("rate limit") {
            Self::RateLimited(message)
        } else if contains_any(&message, QUOTA_MARKERS) {
            Self::QuotaExceeded(message)
        } else if contains_any(&message, CAPACITY_MARKERS) {
            Self::Capacity(message)
        } else if contains_any(&message, UNAVAILABLE_MARKERS)
            || message.contains("500")
            || message.contains("503")
        {
            Self::ProviderUnavailable(message)
        } else {
            Self::Provider(message)
        }
    }

    /// Convert to a user-friendly message
    pub fn user_message(&self) -> String {
        match self {
            Self::Provider(msg) => format!("The AI service encountered an error: {msg}"),
            Self::ProviderUnavailable(_) | Self::Capacity(_) => {
                "The AI service is currently busy. Please try again.".into()
            }
            Self::RateLimited(_) => "Too many requests. Please wait a moment.".into(),
            Self::QuotaExceeded(_) => "Daily capacity reached. Please try again later.".into(),
            Self::Auth(_) => "Authentication failed. Please check your API key.".into(),
            Self::Exhausted { .. } => "All AI models are unavailable right now.".into(),
            _ => "An unexpected error occurred.".into(),
        }
    }
}

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    let lower = haystack.to_lowercase();
    needles.iter().any(|needle| lower.contains(needle))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_classification() {
        assert!(matches!(AgentError::from_status(429, "slow down"), AgentError::RateLimited(_)));
        assert!(matches!(
            AgentError::from_status(429, r#"{"status":"RESOURCE_EXHAUSTED"}"#),
            AgentError::QuotaExceeded(_)
        ));
        assert!(matches!(AgentError::from_status(503, "The model is overloaded"), AgentError::Capacity(_)));
        assert!(matches!(AgentError::from_status(500, "oops"), AgentError::ProviderUnavailable(_)));
        assert!(matches!(AgentError::from_status(403, "bad key"), AgentError::Auth(_)));
        assert!(matches!(AgentError::from_status(404, "no such model"), AgentError::InvalidRequest(_)));
    }

    #[test]
    fn test_transient_split() {
        assert!(AgentError::RateLimited("x".into()).is_transient());
        assert!(AgentError::QuotaExceeded("x".into()).is_transient());
        assert!(AgentError::Capacity("x".into()).is_transient());
        assert!(AgentError::ProviderUnavailable("x".into()).is_transient());
        assert!(!AgentError::Auth("x".into()).is_transient());
        assert!(!AgentError::InvalidRequest("x".into()).is_transient());
        assert!(!AgentError::Provider("x".into()).is_transient());
    }

    #[test]
    fn test_user_messages_hide_details() {
        let err = AgentError::from_status(403, "API key not valid");
        assert_eq!(err.user_message(), "Authentication failed. Please check your API key.");
        assert_eq!(
            AgentError::Exhausted { attempts: 9 }.user_message(),
            "All AI models are unavailable right now."
        );
    }

    #[test]
    fn test_message_classification() {
        assert!(matches!(AgentError::classify_message("error 429 from upstream"), AgentError::RateLimited(_)));
        assert!(matches!(AgentError::classify_message("Quota exceeded for metric"), AgentError::QuotaExceeded(_)));
        assert!(matches!(AgentError::classify_message("connection refused"), AgentError::ProviderUnavailable(_)));
        assert!(matches!(AgentError::classify_message("model 'x' not found"), AgentError::Provider(_)));
    }
}
