use clap::Parser;
use doh_gateway_api::AppState;
use doh_gateway_domain::CliOverrides;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

mod bootstrap;
mod di;
mod server;

#[derive(Parser)]
#[command(name = "doh-gateway")]
#[command(version)]
#[command(about = "DNS-over-HTTPS gateway with JSON API and plain DNS listeners")]
struct Cli {
    /// Configuration file path
    #[arg(short = 'c', long, value_name = "FILE")]
    config: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short = 'l', long)]
    log_level: Option<String>,

    /// HTTP bind address for /dns-query and /resolve
    #[arg(long, value_name = "ADDR")]
    server_bind: Option<String>,

    /// Plain DNS over UDP bind address
    #[arg(long, value_name = "ADDR")]
    udp_bind: Option<String>,

    /// Plain DNS over TCP bind address
    #[arg(long, value_name = "ADDR")]
    tcp_bind: Option<String>,

    /// Enable the answer cache (`--cache=false` disables it)
    #[arg(
        short = 'C',
        long,
        value_name = "BOOL",
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true"
    )]
    cache: Option<bool>,

    /// Answer cache lifetime in seconds
    #[arg(short = 'T', long, value_name = "SECS")]
    cache_ttl: Option<u64>,

    /// Upstream resolver (host:port, or URL for doh)
    #[arg(short = 's', long, value_name = "SERVER")]
    upstream_server: Option<String>,

    /// Upstream network: udp, tcp, tcp-tls or doh
    #[arg(short = 'n', long, value_name = "NET")]
    upstream_net: Option<String>,

    /// Upstream exchange timeout in seconds
    #[arg(short = 't', long, value_name = "SECS")]
    upstream_timeout: Option<u64>,
}

impl Cli {
    fn overrides(&self) -> CliOverrides {
        CliOverrides {
            log_level: self.log_level.clone(),
            http_bind: self.server_bind.clone(),
            udp_bind: self.udp_bind.clone(),
            tcp_bind: self.tcp_bind.clone(),
            cache_enabled: self.cache,
            cache_ttl: self.cache_ttl,
            upstream_server: self.upstream_server.clone(),
            upstream_net: self.upstream_net.clone(),
            upstream_timeout: self.upstream_timeout,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = bootstrap::load_config(cli.config.as_deref(), cli.overrides())?;

    bootstrap::init_logging(&config);

    config.validate()?;

    info!("Starting doh-gateway v{}", env!("CARGO_PKG_VERSION"));
    info!(
        upstream = %config.upstream.server,
        net = %config.upstream.net,
        cache_enabled = config.cache.enabled,
        cache_ttl_secs = config.cache.ttl,
        "Configuration loaded"
    );

    let services = di::GatewayServices::new(&config);
    let shutdown = CancellationToken::new();

    let mut jobs = services.job_runner(&config, shutdown.clone()).start();

    let mut listeners =
        server::start_dns_listeners(&config.server, services.dns_handler(), shutdown.clone())
            .await?;

    tokio::spawn(bootstrap::cancel_on_signal(shutdown.clone()));

    let app_state = AppState {
        resolve: services.resolve.clone(),
    };
    let web_result =
        server::start_web_server(&config.server.http_bind, app_state, shutdown.clone()).await;

    // The HTTP server can also return on error.
    shutdown.cancel();

    while let Some(joined) = listeners.join_next().await {
        if let Err(e) = joined {
            error!(error = %e, "DNS listener task failed");
        }
    }
    while jobs.join_next().await.is_some() {}

    web_result?;

    info!("Server shutdown complete");
    Ok(())
}
