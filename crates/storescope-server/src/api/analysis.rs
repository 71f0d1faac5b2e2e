use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Extension, Json,
};
use serde::Serialize;

use storescope_analysis::{
    analyze_marketing, analyze_pricing, analyze_sentiment, compose_unified, MarketingReport,
    PricingReport, SentimentReport, UnifiedReport,
};
use storescope_core::BrandProfile;

use crate::middleware::RequestId;

use super::insights::WebsiteQuery;
use super::{map_analysis_error, map_cache_error, ApiError, ApiResponse, AppState, ResponseMeta};

/// Analysis payloads carry the brand identity alongside the module report.
#[derive(Debug, Serialize)]
pub(super) struct AnalysisData<T: Serialize> {
    pub website_url: String,
    pub brand_name: Option<String>,
    pub report: T,
}

impl<T: Serialize> AnalysisData<T> {
    fn new(profile: &BrandProfile, report: T) -> Self {
        Self {
            website_url: profile.website_url.clone(),
            brand_name: profile.brand_name.clone(),
            report,
        }
    }
}

/// Resolves the profile through the cache, mapping pipeline errors to the
/// envelope. Every analysis endpoint fetches through here, so first contact
/// with a storefront triggers the extraction pipeline transparently.
async fn profile_for(
    state: &AppState,
    req_id: &RequestId,
    query: &WebsiteQuery,
) -> Result<Arc<BrandProfile>, ApiError> {
    state
        .cache
        .get_or_fetch(&query.website_url)
        .await
        .map_err(|e| map_cache_error(req_id.0.clone(), &e))
}

/// `GET /api/sentiment-analysis`
pub(super) async fn sentiment_analysis(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<WebsiteQuery>,
) -> Result<Json<ApiResponse<AnalysisData<SentimentReport>>>, ApiError> {
    let profile = profile_for(&state, &req_id, &query).await?;
    let report = analyze_sentiment(&profile, &state.analysis)
        .map_err(|e| map_analysis_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: AnalysisData::new(&profile, report),
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// `GET /api/marketing-insights`
pub(super) async fn marketing_insights(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<WebsiteQuery>,
) -> Result<Json<ApiResponse<AnalysisData<MarketingReport>>>, ApiError> {
    let profile = profile_for(&state, &req_id, &query).await?;
    let report = analyze_marketing(&profile, &state.analysis);

    Ok(Json(ApiResponse {
        data: AnalysisData::new(&profile, report),
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// `GET /api/pricing-intelligence`
pub(super) async fn pricing_intelligence(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<WebsiteQuery>,
) -> Result<Json<ApiResponse<AnalysisData<PricingReport>>>, ApiError> {
    let profile = profile_for(&state, &req_id, &query).await?;
    let report = analyze_pricing(&profile, &state.analysis)
        .map_err(|e| map_analysis_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: AnalysisData::new(&profile, report),
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// `GET /api/ai-analysis` — all modules plus the unified health score.
pub(super) async fn ai_analysis(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<WebsiteQuery>,
) -> Result<Json<ApiResponse<AnalysisData<UnifiedReport>>>, ApiError> {
    let profile = profile_for(&state, &req_id, &query).await?;
    let report = compose_unified(&profile, &state.analysis)
        .map_err(|e| map_analysis_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: AnalysisData::new(&profile, report),
        meta: ResponseMeta::new(req_id.0),
    }))
}
