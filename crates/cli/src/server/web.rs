use anyhow::Context;
use axum::Router;
use doh_gateway_api::{create_api_routes, AppState};
use doh_gateway_infrastructure::dns::SHUTDOWN_GRACE_PERIOD;
use tokio_util::sync::CancellationToken;
use tower_http::trace::TraceLayer;
use tracing::info;

pub async fn start_web_server(
    bind_addr: &str,
    state: AppState,
    shutdown: CancellationToken,
) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(bind_addr.trim())
        .await
        .with_context(|| format!("failed to bind HTTP listener on {}", bind_addr))?;

    info!(
        bind_address = %listener.local_addr()?,
        doh_url = format!("http://{}/dns-query", bind_addr),
        json_url = format!("http://{}/resolve", bind_addr),
        "Web server started"
    );

    doh_gateway_api::serve(listener, create_app(state), shutdown, SHUTDOWN_GRACE_PERIOD).await?;

    info!("Web server stopped");
    Ok(())
}

fn create_app(state: AppState) -> Router {
    create_api_routes(state).layer(TraceLayer::new_for_http())
}
