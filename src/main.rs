mod event;
mod lyrics;
mod mpris;
mod server;
mod snapshot;
mod state;
mod timer;

use crate::event::Sampler;
use crate::mpris::MprisSession;
use crate::state::Monitor;
use clap::Parser;
use std::error::Error;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

const DEFAULT_PROVIDERS: [&str; 2] = ["netease", "lrclib"];

/// Application configuration from CLI
#[derive(Parser, Debug, Clone)]
#[command(author, version, about = "Serve the current synced lyric line of the active media player over HTTP")]
pub struct Config {
    /// Port of the local snapshot endpoint
    #[arg(long, default_value_t = 62333)]
    port: u16,
    /// Address to bind the snapshot endpoint to
    #[arg(long, default_value_t = IpAddr::V4(Ipv4Addr::LOCALHOST))]
    bind: IpAddr,
    /// Blocklist for MPRIS player service names (comma-separated, case-insensitive)
    #[arg(
        long = "block",
        value_name = "SERVICE1,SERVICE2",
        value_delimiter = ','
    )]
    block: Vec<String>,
    /// Comma-separated list of lyric providers in preferred order (e.g. "netease,lrclib").
    /// If empty, the LYRIC_PROVIDERS env var will be used as a fallback.
    #[arg(long, value_delimiter = ',')]
    providers: Vec<String>,
    /// Milliseconds between media-session samples
    #[arg(long, default_value_t = 1000)]
    poll_interval_ms: u64,
    /// Milliseconds to wait after a failed sample before retrying
    #[arg(long, default_value_t = 5000)]
    backoff_ms: u64,
    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(long)]
    debug_log: bool,
}

fn normalize<'a>(parts: impl Iterator<Item = &'a str>) -> Vec<String> {
    parts
        .map(|p| p.trim().to_lowercase())
        .filter(|p| !p.is_empty())
        .collect()
}

/// CLI providers win, then `LYRIC_PROVIDERS`, then the built-in order.
fn resolve_providers(cli: &[String], env: Option<&str>) -> Vec<String> {
    let from_cli = normalize(cli.iter().map(String::as_str));
    if !from_cli.is_empty() {
        return from_cli;
    }
    let from_env = env.map(|s| normalize(s.split(','))).unwrap_or_default();
    if !from_env.is_empty() {
        return from_env;
    }
    DEFAULT_PROVIDERS.iter().map(|p| p.to_string()).collect()
}

fn init_logging(debug_log: bool) {
    let fallback = if debug_log { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    let cfg = Config::parse();
    init_logging(cfg.debug_log);

    let provider_names = resolve_providers(&cfg.providers, std::env::var("LYRIC_PROVIDERS").ok().as_deref());
    let providers = lyrics::providers::from_names(&provider_names);
    tracing::info!(providers = ?provider_names, "lyric providers");

    let monitor = Monitor::shared();

    let addr = SocketAddr::new(cfg.bind, cfg.port);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    let server_monitor = monitor.clone();
    tokio::spawn(async move {
        if let Err(e) = server::serve(listener, server_monitor).await {
            tracing::error!(error = %e, "snapshot server stopped");
        }
    });

    let sampler = Sampler::new(MprisSession::new(cfg.block), monitor, providers);
    sampler
        .run(
            Duration::from_millis(cfg.poll_interval_ms),
            Duration::from_millis(cfg.backoff_ms),
        )
        .await;
    Ok(())
}
