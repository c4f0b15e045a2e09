//! HTTP API Server for Trust Scores and Age Recommendations
//!
//! Thin JSON surface over the scoring core for the presentation and
//! persistence layers. Handlers hold no state beyond the shared, immutable
//! scorer and recommender.

use axum::{
    extract::{Path, Query, State},
    response::Json,
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::{debug, info};

use crate::config::{ApiConfig, Config};
use crate::error::{Error, Result};
use crate::scoring::{
    age_color, age_label, parse_age_key, recommend_by_age, AgeRange, AgeRecommender,
    ContentItem, ScoredContent, SecurityFlags, TrustAssessment, TrustScorer, UserHistory,
};

/// Shared application state
pub struct AppState {
    pub scorer: TrustScorer,
    pub recommender: AgeRecommender,
}

impl AppState {
    pub fn new(config: &Config) -> Self {
        Self {
            scorer: TrustScorer::new(config.scoring.clone()),
            recommender: AgeRecommender::new(config.scoring.clone()),
        }
    }
}

/// Request body for scoring one item
#[derive(Debug, Deserialize)]
pub struct ScoreRequest {
    pub item: ContentItem,
    pub user_age: Option<u32>,
}

/// Trust assessment plus the safety gates and badge styling
#[derive(Debug, Serialize)]
pub struct ScoreResponse {
    pub content_id: String,
    #[serde(flatten)]
    pub assessment: TrustAssessment,
    pub tier_label: &'static str,
    pub badge_color: &'static str,
    pub safe: bool,
    pub strict_safe: bool,
}

/// Request body for ranking a catalog snapshot
#[derive(Debug, Deserialize)]
pub struct RankRequest {
    pub items: Vec<ContentItem>,
    #[serde(default = "default_limit")]
    pub limit: usize,
    pub user_age: Option<u32>,
}

fn default_limit() -> usize {
    20
}

/// Response for ranking
#[derive(Debug, Serialize)]
pub struct RankResponse {
    pub items: Vec<ScoredContent>,
    pub total: usize,
}

/// Request body for the safety gate
#[derive(Debug, Deserialize)]
pub struct SafetyRequest {
    pub flags: SecurityFlags,
    #[serde(default)]
    pub strict: bool,
}

#[derive(Debug, Serialize)]
pub struct SafetyResponse {
    pub safe: bool,
}

/// Query params for rating display
#[derive(Debug, Deserialize)]
pub struct RatingQuery {
    pub rating: f64,
    pub total: u64,
}

#[derive(Debug, Serialize)]
pub struct RatingResponse {
    pub display: String,
}

/// Query params for age matching
#[derive(Debug, Deserialize)]
pub struct MatchQuery {
    pub user_age: u32,
    pub key: String,
}

#[derive(Debug, Serialize)]
pub struct MatchResponse {
    pub key: String,
    pub score: f64,
}

/// An age band with its presentation details
#[derive(Debug, Serialize)]
pub struct AgeBandResponse {
    pub min: u32,
    pub max: u32,
    pub key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<&'static str>,
}

impl From<AgeRange> for AgeBandResponse {
    fn from(range: AgeRange) -> Self {
        let key = range.key();
        Self {
            min: range.min,
            max: range.max,
            label: age_label(&key),
            color: age_color(&key),
            key,
        }
    }
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Build the API router
pub fn router(state: Arc<AppState>, config: &ApiConfig) -> Router {
    let mut app = Router::new()
        // Health check
        .route("/health", get(health_check))
        // Trust endpoints
        .route("/api/v1/trust/score", post(score_item))
        .route("/api/v1/trust/rank", post(rank_items))
        .route("/api/v1/trust/safety", post(check_safety))
        .route("/api/v1/ratings/display", get(display_rating))
        // Age endpoints
        .route("/api/v1/age/recommend", post(recommend_age))
        .route("/api/v1/age/match", get(match_age))
        .route("/api/v1/age/by-age/:age", get(band_for_age))
        .route("/api/v1/age/bands/:key", get(describe_band))
        .layer(TimeoutLayer::new(config.request_timeout))
        .layer(TraceLayer::new_for_http());

    if config.cors_enabled {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
        app = app.layer(cors);
    }

    app.with_state(state)
}

/// Start the API server and run until `shutdown` resolves
pub async fn start_server(
    config: &Config,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> Result<()> {
    let state = Arc::new(AppState::new(config));
    let app = router(state, &config.api);

    let addr = format!("{}:{}", config.api.host, config.api.port);
    info!("🚀 Starting trust scoring API server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;

    Ok(())
}

/// Health check endpoint
async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Score a single item
async fn score_item(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ScoreRequest>,
) -> Json<ScoreResponse> {
    let assessment = state.scorer.assess(&req.item, req.user_age);

    Json(ScoreResponse {
        content_id: req.item.id,
        tier_label: assessment.tier.display_name(),
        badge_color: assessment.tier.badge_color(),
        safe: state.scorer.is_safe(&req.item.flags, false),
        strict_safe: state.scorer.is_safe(&req.item.flags, true),
        assessment,
    })
}

/// Rank a catalog snapshot by trust score
async fn rank_items(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RankRequest>,
) -> Result<Json<RankResponse>> {
    let total = req.items.len();

    // Scoring is CPU-bound (rayon); keep it off the async workers
    let items = tokio::task::spawn_blocking(move || {
        state
            .scorer
            .rank_for_age(&req.items, req.limit, req.user_age)
    })
    .await
    .map_err(Error::internal)?;

    debug!("Ranked {} catalog items, returning {}", total, items.len());

    Ok(Json(RankResponse { items, total }))
}

/// Boolean safety gate
async fn check_safety(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SafetyRequest>,
) -> Json<SafetyResponse> {
    Json(SafetyResponse {
        safe: state.scorer.is_safe(&req.flags, req.strict),
    })
}

/// Parent rating display text
async fn display_rating(
    State(state): State<Arc<AppState>>,
    Query(query): Query<RatingQuery>,
) -> Json<RatingResponse> {
    Json(RatingResponse {
        display: state.scorer.rating_display(query.rating, query.total),
    })
}

/// Recommend an age band from a history snapshot
async fn recommend_age(
    State(state): State<Arc<AppState>>,
    Json(history): Json<UserHistory>,
) -> Json<AgeBandResponse> {
    Json(state.recommender.recommend(Some(&history)).into())
}

/// Match quality between a user's age and a band key
async fn match_age(
    State(state): State<Arc<AppState>>,
    Query(query): Query<MatchQuery>,
) -> Result<Json<MatchResponse>> {
    let range = parse_age_key(&query.key)
        .ok_or_else(|| Error::bad_request(format!("not a valid age key: {}", query.key)))?;

    Ok(Json(MatchResponse {
        score: state.recommender.match_score(query.user_age, &range),
        key: range.key(),
    }))
}

/// Canonical band for a known age
async fn band_for_age(Path(age): Path<u32>) -> Json<AgeBandResponse> {
    Json(recommend_by_age(age).into())
}

/// Parse a band key and attach its label and color
async fn describe_band(Path(key): Path<String>) -> Result<Json<AgeBandResponse>> {
    let range = parse_age_key(&key)
        .ok_or_else(|| Error::bad_request(format!("not a valid age key: {}", key)))?;
    Ok(Json(range.into()))
}
