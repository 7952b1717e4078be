//! HTTP Handlers

use axum::{
    Json,
    extract::State,
    http::{StatusCode, header},
    response::IntoResponse,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use agent_core::ModelTiers;
use wealth_advisor::{
    AVAILABLE_GUIDES, AdviceRequest, AdviceResponse, AdviceSource, DefiYield, GuideTopic, Holding,
    LearnerLevel, MAX_PROJECTION_YEARS, MarketSnapshot, Opportunity, ProfileInput, ProjectionPoint,
    RiskTolerance, UserProfile, check_opportunities, defi_yields, export_text, market_narrative,
    portfolio_growth_projection,
};

use crate::state::AppState;

const EXPORT_FILENAME: &str = "goalwealth-plan.txt";

// ============================================================================
// Response Types
// ============================================================================

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub provider: Option<String>,
    pub llm_configured: bool,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn bad_request(error: impl Into<String>, code: &str) -> ApiError {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse {
            error: error.into(),
            code: code.into(),
        }),
    )
}

/// Generated text tagged with a request id
#[derive(Debug, Serialize)]
pub struct TextResponse {
    pub request_id: String,
    #[serde(flatten)]
    pub answer: AdviceResponse,
}

impl From<AdviceResponse> for TextResponse {
    fn from(answer: AdviceResponse) -> Self {
        Self {
            request_id: Uuid::new_v4().to_string(),
            answer,
        }
    }
}

#[derive(Serialize)]
pub struct ModelsResponse {
    pub provider: Option<String>,
    pub tiers: ModelTiers,
}

#[derive(Serialize)]
pub struct OpportunitiesResponse {
    pub opportunities: Vec<Opportunity>,
    pub synthetic_market: bool,
}

#[derive(Serialize)]
pub struct ProjectionResponse {
    pub points: Vec<ProjectionPoint>,
    pub final_value: Decimal,
}

// ============================================================================
// Request Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct AdviceBody {
    pub question: String,
    #[serde(default)]
    pub profile: ProfileInput,
    #[serde(default)]
    pub include_market: bool,
}

#[derive(Debug, Default, Deserialize)]
pub struct PlanBody {
    #[serde(default)]
    pub profile: ProfileInput,
    #[serde(default)]
    pub include_market: bool,
}

#[derive(Debug, Default, Deserialize)]
pub struct ExportBody {
    #[serde(default)]
    pub profile: ProfileInput,
    #[serde(default)]
    pub include_market: bool,
    /// Previously generated plan text; a new plan is generated when absent
    #[serde(default)]
    pub plan: Option<String>,
    /// Model that wrote `plan`
    #[serde(default)]
    pub model: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct GuideBody {
    pub topic: String,
    #[serde(default)]
    pub level: LearnerLevel,
}

#[derive(Debug, Deserialize)]
pub struct RebalanceBody {
    pub holdings: Vec<Holding>,
    /// Defaults to the profile's own risk tolerance
    #[serde(default)]
    pub target_risk: Option<String>,
    #[serde(default)]
    pub profile: ProfileInput,
}

#[derive(Debug, Default, Deserialize)]
pub struct OpportunitiesBody {
    #[serde(default)]
    pub profile: ProfileInput,
}

#[derive(Debug, Deserialize)]
pub struct ProjectionBody {
    pub initial_capital: Decimal,
    pub monthly_investment: Decimal,
    pub years: u32,
    #[serde(default = "default_annual_return")]
    pub annual_return: Decimal,
}

fn default_annual_return() -> Decimal {
    Decimal::new(8, 2)
}

// ============================================================================
// Handlers
// ============================================================================

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        provider: state.provider_name().map(str::to_string),
        llm_configured: state.provider.is_some(),
    })
}

pub async fn list_models(State(state): State<AppState>) -> Json<ModelsResponse> {
    Json(ModelsResponse {
        provider: state.provider_name().map(str::to_string),
        tiers: state.tiers.clone(),
    })
}

/// Chat answer; never fails once the body parses
pub async fn advice_handler(State(state): State<AppState>, Json(body): Json<AdviceBody>) -> Json<TextResponse> {
    let mut request = AdviceRequest::new(body.question, UserProfile::from(body.profile));
    if body.include_market {
        request = request.with_market_context(market_context(&state).await);
    }

    Json(state.advisor.respond(&request).await.into())
}

pub async fn plan_handler(State(state): State<AppState>, Json(body): Json<PlanBody>) -> Json<TextResponse> {
    let profile = UserProfile::from(body.profile);
    let context = if body.include_market {
        Some(market_context(&state).await)
    } else {
        None
    };

    Json(state.planner.create_plan(&profile, context.as_deref()).await.into())
}

/// Plan as a downloadable text file
pub async fn export_plan(State(state): State<AppState>, Json(body): Json<ExportBody>) -> impl IntoResponse {
    let profile = UserProfile::from(body.profile);

    let plan = match body.plan.filter(|p| !p.trim().is_empty()) {
        Some(text) => AdviceResponse {
            text,
            source: if body.model.is_some() {
                AdviceSource::Model
            } else {
                AdviceSource::FallbackTemplate
            },
            model: body.model,
            audited: false,
        },
        None => {
            let context = if body.include_market {
                Some(market_context(&state).await)
            } else {
                None
            };
            state.planner.create_plan(&profile, context.as_deref()).await
        }
    };

    (
        [
            (header::CONTENT_TYPE, "text/plain; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{EXPORT_FILENAME}\""),
            ),
        ],
        export_text(&plan, &profile),
    )
}

pub async fn list_guides() -> Json<&'static [GuideTopic]> {
    Json(AVAILABLE_GUIDES)
}

pub async fn guide_handler(
    State(state): State<AppState>,
    Json(body): Json<GuideBody>,
) -> Result<Json<TextResponse>, ApiError> {
    if body.topic.trim().is_empty() {
        return Err(bad_request("Topic must not be empty", "EMPTY_TOPIC"));
    }

    Ok(Json(state.guides.generate_guide(&body.topic, body.level).await.into()))
}

pub async fn rebalance_handler(State(state): State<AppState>, Json(body): Json<RebalanceBody>) -> Json<TextResponse> {
    let profile = UserProfile::from(body.profile);
    let target = body
        .target_risk
        .as_deref()
        .map_or(profile.risk_tolerance, RiskTolerance::parse_lenient);
    let holdings: Vec<Holding> = body
        .holdings
        .into_iter()
        .map(|h| Holding::new(h.symbol, h.quantity, h.cost))
        .collect();

    Json(state.rebalance.analyze_rebalance(&holdings, target, &profile).await.into())
}

pub async fn market_handler(State(state): State<AppState>) -> Json<MarketSnapshot> {
    Json(state.market.get_live_market_data().await)
}

pub async fn yields_handler() -> Json<Vec<DefiYield>> {
    Json(defi_yields())
}

pub async fn opportunities_handler(
    State(state): State<AppState>,
    Json(body): Json<OpportunitiesBody>,
) -> Json<OpportunitiesResponse> {
    let profile = UserProfile::from(body.profile);
    let snapshot = state.market.get_live_market_data().await;

    Json(OpportunitiesResponse {
        opportunities: check_opportunities(&profile, Some(&snapshot)),
        synthetic_market: snapshot.is_synthetic(),
    })
}

pub async fn projection_handler(Json(body): Json<ProjectionBody>) -> Result<Json<ProjectionResponse>, ApiError> {
    if body.years > MAX_PROJECTION_YEARS {
        return Err(bad_request(
            format!("Projection horizon is limited to {MAX_PROJECTION_YEARS} years"),
            "INVALID_YEARS",
        ));
    }
    if body.annual_return <= Decimal::NEGATIVE_ONE {
        return Err(bad_request("Annual return must be greater than -100%", "INVALID_RETURN"));
    }

    let points = portfolio_growth_projection(
        body.initial_capital,
        body.monthly_investment,
        body.years,
        body.annual_return,
    );
    let final_value = points.last().map_or(body.initial_capital, |p| p.value);

    Ok(Json(ProjectionResponse { points, final_value }))
}

async fn market_context(state: &AppState) -> String {
    let snapshot = state.market.get_live_market_data().await;
    market_narrative(&snapshot, &defi_yields())
}
