mod analysis;
mod insights;

use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, HeaderName, Method, StatusCode},
    response::IntoResponse,
    routing::get,
    Extension, Json, Router,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;

use storescope_analysis::{AnalysisConfig, AnalysisError};
use storescope_scraper::{CacheError, ProfileCache, ProfileCollector, ScrapeError};

use crate::middleware::{request_id, RequestId};

#[derive(Clone)]
pub struct AppState {
    pub cache: Arc<ProfileCache<ProfileCollector>>,
    pub analysis: Arc<AnalysisConfig>,
}

#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ResponseMeta {
    pub request_id: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: ErrorBody,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

impl ResponseMeta {
    pub(super) fn new(request_id: String) -> Self {
        Self {
            request_id,
            timestamp: Utc::now(),
        }
    }
}

impl ApiError {
    pub fn new(
        request_id: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            error: ErrorBody {
                code: code.into(),
                message: message.into(),
            },
            meta: ResponseMeta::new(request_id.into()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match self.error.code.as_str() {
            "invalid_url" | "bad_request" => StatusCode::BAD_REQUEST,
            "unsupported_content" => StatusCode::NOT_FOUND,
            "insufficient_data" | "empty_corpus" => StatusCode::UNPROCESSABLE_ENTITY,
            "upstream_error" => StatusCode::BAD_GATEWAY,
            "upstream_timeout" | "cancelled" => StatusCode::GATEWAY_TIMEOUT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(self)).into_response()
    }
}

/// Maps a profile-pipeline failure onto the error envelope.
pub(super) fn map_cache_error(request_id: String, error: &CacheError) -> ApiError {
    let code = match error.as_scrape() {
        Some(ScrapeError::InvalidUrl { .. }) => "invalid_url",
        Some(ScrapeError::UnsupportedContent { .. }) => "unsupported_content",
        Some(ScrapeError::Timeout { .. }) => "upstream_timeout",
        Some(ScrapeError::Connection { .. } | ScrapeError::HttpStatus { .. }) => "upstream_error",
        Some(ScrapeError::Cancelled) | None => "cancelled",
        Some(ScrapeError::ClientBuild(_)) => "internal_error",
    };
    tracing::warn!(error = %error, code, "profile pipeline failed");
    ApiError::new(request_id, code, error.to_string())
}

/// Maps an analyzer failure onto the error envelope.
pub(super) fn map_analysis_error(request_id: String, error: &AnalysisError) -> ApiError {
    let code = match error {
        AnalysisError::InsufficientData { .. } => "insufficient_data",
        AnalysisError::EmptyCorpus => "empty_corpus",
    };
    tracing::debug!(error = %error, code, "analysis unavailable for profile");
    ApiError::new(request_id, code, error.to_string())
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET])
        .allow_headers([
            header::CONTENT_TYPE,
            HeaderName::from_static("x-request-id"),
        ])
}

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/", get(overview))
        .route("/health", get(health))
        .route("/api/fetch-insights", get(insights::fetch_insights))
        .route("/api/sentiment-analysis", get(analysis::sentiment_analysis))
        .route("/api/marketing-insights", get(analysis::marketing_insights))
        .route(
            "/api/pricing-intelligence",
            get(analysis::pricing_intelligence),
        )
        .route("/api/ai-analysis", get(analysis::ai_analysis))
        .layer(
            ServiceBuilder::new()
                .layer(build_cors())
                .layer(axum::middleware::from_fn(request_id)),
        )
        .with_state(state)
}

#[derive(Debug, Serialize)]
struct HealthData {
    status: &'static str,
    cached_profiles: usize,
}

async fn health(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(ApiResponse {
            data: HealthData {
                status: "ok",
                cached_profiles: state.cache.cached_profile_count(),
            },
            meta: ResponseMeta::new(req_id.0),
        }),
    )
}

#[derive(Debug, Serialize)]
struct OverviewData {
    service: &'static str,
    version: &'static str,
    description: &'static str,
    endpoints: &'static [&'static str],
}

async fn overview(Extension(req_id): Extension<RequestId>) -> impl IntoResponse {
    Json(ApiResponse {
        data: OverviewData {
            service: "storescope",
            version: env!("CARGO_PKG_VERSION"),
            description: "storefront intelligence: extraction and analysis for e-commerce sites",
            endpoints: &[
                "/api/fetch-insights",
                "/api/sentiment-analysis",
                "/api/marketing-insights",
                "/api/pricing-intelligence",
                "/api/ai-analysis",
                "/health",
            ],
        },
        meta: ResponseMeta::new(req_id.0),
    })
}
