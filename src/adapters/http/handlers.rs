//! Route handlers.

use axum::extract::State;
use axum::response::Json;

use super::error::ApiError;
use super::extract::JsonOrForm;
use crate::domain::models::{QueryRequest, QueryResponse, StatusResponse};
use crate::services::AppContext;

pub async fn health_check() -> &'static str {
    "OK"
}

pub async fn status(State(ctx): State<AppContext>) -> Json<StatusResponse> {
    Json(StatusResponse::new(ctx.is_rag_active(), ctx.query.model()))
}

pub async fn process_query(
    State(ctx): State<AppContext>,
    JsonOrForm(request): JsonOrForm<QueryRequest>,
) -> Result<Json<QueryResponse>, ApiError> {
    let response = ctx.query.process(request).await?;
    Ok(Json(response))
}
