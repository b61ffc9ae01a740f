use crate::{errors::ApiError, state::AppState};
use axum::{
    body::Bytes,
    extract::{Query, State},
    http::header,
    response::{IntoResponse, Response},
};
use doh_gateway_application::adapters::wire;
use doh_gateway_domain::{DnsMessage, DomainError, InboundKind};
use serde::Deserialize;
use tracing::{debug, instrument, warn};

#[derive(Debug, Deserialize)]
pub struct DnsQueryParams {
    pub dns: Option<String>,
}

#[instrument(skip_all, name = "api_get_dns_query")]
pub async fn get_dns_query(
    State(state): State<AppState>,
    Query(params): Query<DnsQueryParams>,
) -> Result<Response, ApiError> {
    let query = wire::decode_get(params.dns.as_deref().unwrap_or_default()).map_err(rejected)?;
    resolve_wire(&state, query).await
}

#[instrument(skip_all, name = "api_post_dns_query")]
pub async fn post_dns_query(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Response, ApiError> {
    debug!(body_len = body.len(), "DoH POST received");
    let query = wire::decode_post(&body).map_err(rejected)?;
    resolve_wire(&state, query).await
}

async fn resolve_wire(state: &AppState, query: DnsMessage) -> Result<Response, ApiError> {
    let answer = state
        .resolve
        .execute(InboundKind::Wire, &query)
        .await
        .map_err(rejected)?;
    let bytes = wire::encode(&answer).map_err(rejected)?;

    Ok(([(header::CONTENT_TYPE, wire::DNS_MESSAGE_CONTENT_TYPE)], bytes).into_response())
}

fn rejected(error: DomainError) -> ApiError {
    warn!(inbound = InboundKind::Wire.label(), error = %error, "DoH query failed");
    ApiError(error)
}
