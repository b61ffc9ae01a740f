use crate::{errors::ApiError, state::AppState};
use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Json,
};
use doh_gateway_application::adapters::{JsonAnswer, JsonQueryParams};
use doh_gateway_domain::{DomainError, InboundKind};
use tracing::{instrument, warn};

#[instrument(skip_all, name = "api_resolve_json")]
pub async fn resolve_json(
    State(state): State<AppState>,
    params: Result<Query<JsonQueryParams>, QueryRejection>,
) -> Result<Json<JsonAnswer>, ApiError> {
    let Query(params) =
        params.map_err(|e| rejected(DomainError::DecodeError(e.body_text())))?;

    let query = params.to_query().map_err(rejected)?;

    let answer = state
        .resolve
        .execute(InboundKind::Json, &query)
        .await
        .map_err(rejected)?;

    Ok(Json(JsonAnswer::from_message(&answer)))
}

fn rejected(error: DomainError) -> ApiError {
    warn!(inbound = InboundKind::Json.label(), error = %error, "JSON query failed");
    ApiError(error)
}
