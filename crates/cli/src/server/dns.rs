use anyhow::Context;
use doh_gateway_domain::config::ServerConfig;
use doh_gateway_infrastructure::dns::{DnsServerHandler, TcpDnsListener, UdpDnsListener};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::info;

/// Binds the enabled plain DNS listeners and spawns them.
///
/// A bind failure is returned before anything is spawned for that listener,
/// so startup aborts instead of running half-configured.
pub async fn start_dns_listeners(
    server: &ServerConfig,
    handler: DnsServerHandler,
    shutdown: CancellationToken,
) -> anyhow::Result<JoinSet<()>> {
    let mut listeners = JoinSet::new();

    if server.udp_enabled() {
        let udp = UdpDnsListener::bind(server.udp_bind.trim())
            .await
            .with_context(|| format!("failed to bind UDP listener on {}", server.udp_bind))?;
        listeners.spawn(udp.run(handler.clone(), shutdown.clone()));
    }

    if server.tcp_enabled() {
        let tcp = TcpDnsListener::bind(server.tcp_bind.trim())
            .await
            .with_context(|| format!("failed to bind TCP listener on {}", server.tcp_bind))?;
        listeners.spawn(tcp.run(handler, shutdown));
    }

    info!(listeners = listeners.len(), "Plain DNS listeners started");
    Ok(listeners)
}
