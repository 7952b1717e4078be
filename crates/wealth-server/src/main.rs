//! GoalWealth HTTP Server
//!
//! Axum server exposing chat advice, investment plans, education guides,
//! rebalance reports and market data as JSON endpoints.
//!
//! Runs without any credential: answers then come from the static
//! knowledge base and the deterministic templates.

mod config;
mod handlers;
mod routes;
mod state;

use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use agent_core::LlmProvider;
use agent_runtime::{GeminiConfig, GeminiProvider, OllamaProvider};
use wealth_advisor::{MarketConfig, MarketDataService, YahooChartSource};

use crate::config::{ProviderKind, ServerConfig};
use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment first so RUST_LOG from .env applies
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServerConfig::from_env();

    let provider = build_provider(config.provider)?;
    if let Some(provider) = &provider {
        match provider.health_check().await {
            Ok(true) => tracing::info!("✓ Connected to {}", provider.name()),
            Ok(false) | Err(_) => {
                tracing::warn!("⚠ {} not reachable - answers will fall back to templates", provider.name());
            }
        }
    }

    let tiers = config.tiers();
    for model in tiers.iter() {
        tracing::info!("  Model tier: {}", model);
    }

    let market_config = MarketConfig::from_env();
    let market = match YahooChartSource::new() {
        Ok(source) => MarketDataService::new(Arc::new(source), market_config),
        Err(e) => {
            tracing::warn!("⚠ Market client unavailable ({e}) - using synthetic prices");
            MarketDataService::synthetic_only(market_config)
        }
    };

    if config.audit {
        tracing::info!("✓ Advice audit pass enabled");
    }

    let state = AppState::new(provider, tiers, Arc::new(market), config.audit);
    let app = routes::router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;

    tracing::info!("══════════════════════════════════════════════════");
    tracing::info!("🚀 GoalWealth server running on http://{}", config.bind_addr);
    tracing::info!("══════════════════════════════════════════════════");
    tracing::info!("");
    tracing::info!("Endpoints:");
    tracing::info!("  GET  /health             - Health check");
    tracing::info!("  GET  /api/models         - Configured model tiers");
    tracing::info!("  POST /api/advice         - Ask the advisor");
    tracing::info!("  POST /api/plan           - Investment plan");
    tracing::info!("  POST /api/plan/export    - Plan as text file");
    tracing::info!("  GET  /api/guides         - Guide catalog");
    tracing::info!("  POST /api/guides         - Generate a guide");
    tracing::info!("  POST /api/rebalance      - Rebalance report");
    tracing::info!("  GET  /api/market         - Market snapshot");
    tracing::info!("  GET  /api/yields         - Solana DeFi yields");
    tracing::info!("  POST /api/opportunities  - Opportunity scan");
    tracing::info!("  POST /api/projection     - Growth projection");
    tracing::info!("");

    axum::serve(listener, app).await?;

    Ok(())
}

fn build_provider(kind: ProviderKind) -> anyhow::Result<Option<Arc<dyn LlmProvider>>> {
    match kind {
        ProviderKind::Gemini => match GeminiConfig::from_env() {
            Some(gemini) => Ok(Some(Arc::new(GeminiProvider::new(gemini)?))),
            None => {
                tracing::warn!("⚠ GEMINI_API_KEY not set - serving the static knowledge base");
                Ok(None)
            }
        },
        ProviderKind::Ollama => Ok(Some(Arc::new(OllamaProvider::from_env()))),
    }
}
