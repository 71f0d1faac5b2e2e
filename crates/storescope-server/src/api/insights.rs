use axum::{
    extract::{Query, State},
    Extension, Json,
};
use serde::Deserialize;

use storescope_core::BrandProfile;

use crate::middleware::RequestId;

use super::{map_cache_error, ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Deserialize)]
pub(super) struct WebsiteQuery {
    pub website_url: String,
}

/// `GET /api/fetch-insights` — the extracted profile for a storefront,
/// cache-first.
pub(super) async fn fetch_insights(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<WebsiteQuery>,
) -> Result<Json<ApiResponse<BrandProfile>>, ApiError> {
    let profile = state
        .cache
        .get_or_fetch(&query.website_url)
        .await
        .map_err(|e| map_cache_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: (*profile).clone(),
        meta: ResponseMeta::new(req_id.0),
    }))
}
