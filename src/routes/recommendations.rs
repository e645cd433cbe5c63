use axum::{
    extract::{Query, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    middleware::request_id::RequestId,
    models::RecommendOutcome,
    routes::AppState,
    services::recommendations,
};

/// Upper bound on `top_n`, which also bounds poster lookups per request
pub const MAX_TOP_N: usize = 50;

#[derive(Debug, Deserialize)]
pub struct RecommendQuery {
    pub q: String,
    #[serde(default)]
    pub top_n: Option<usize>,
}

/// Handler for the recommendations endpoint
///
/// An unmatched title is answered with 404 and the `not_found` body.
pub async fn recommend(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    Query(params): Query<RecommendQuery>,
) -> AppResult<(StatusCode, Json<RecommendOutcome>)> {
    if params.q.trim().is_empty() {
        return Err(AppError::InvalidInput("Query cannot be empty".to_string()));
    }

    let top_n = params.top_n.unwrap_or(state.default_top_n);
    if top_n > MAX_TOP_N {
        return Err(AppError::InvalidInput(format!(
            "top_n must be at most {}",
            MAX_TOP_N
        )));
    }

    tracing::info!(
        request_id = %request_id,
        query = %params.q,
        top_n,
        "Processing recommendation request"
    );

    let outcome = recommendations::recommend(
        &state.index,
        state.poster_provider.clone(),
        &params.q,
        top_n,
        state.poster_timeout,
    )
    .await;

    let status = if outcome.is_found() {
        StatusCode::OK
    } else {
        StatusCode::NOT_FOUND
    };

    Ok((status, Json(outcome)))
}
