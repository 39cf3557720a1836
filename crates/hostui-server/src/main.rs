//! hostui - web host for the agent conversation demo

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use hostui_client::{HostAgentService, HttpClientHandle};
use hostui_server::file_server::WebState;
use hostui_server::pages::Credentials;
use hostui_server::{push, FileServer, HostConfig};
use hostui_state::{AppState, AppStateStore};

#[derive(Parser, Debug)]
#[command(name = "hostui")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to a TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Interface to bind
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on
    #[arg(short, long)]
    port: Option<u16>,

    /// Conversation service URL (defaults to this host)
    #[arg(long)]
    server_url: Option<String>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn init_tracing(verbose: bool) {
    let default = if verbose {
        "hostui=debug,hostui_server=debug,hostui_client=debug,hostui_state=debug"
    } else {
        "info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_file(true)
        .with_line_number(true)
        .init();
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let mut config = HostConfig::load(args.config.as_deref())?;
    config.apply_env();
    if let Some(host) = args.host {
        config.host = host;
    }
    if let Some(port) = args.port {
        config.port = port;
    }
    if let Some(url) = args.server_url {
        config.server_url = Some(url);
    }

    let http = HttpClientHandle::new();
    http.start()?;

    let store = AppStateStore::new(AppState {
        polling_interval: (config.refresh_interval_ms / 1000).max(1),
        ..AppState::default()
    });
    let service = HostAgentService::remote(config.server_url(), http.clone());
    tracing::info!(server_url = %config.server_url(), "conversation service");

    let refresher = tokio::spawn(push::refresh_loop(
        service.clone(),
        store.clone(),
        Duration::from_millis(config.refresh_interval_ms.max(100)),
    ));

    let web = WebState {
        store,
        service,
        credentials: Credentials {
            api_key: config.api_key.clone(),
            uses_vertex_ai: config.uses_vertex_ai,
        },
        push_interval: Duration::from_millis(config.push_interval_ms.max(10)),
    };
    let server = FileServer::new(config.bind_addr(), web, config.resolve_web_root());
    let result = server.run(shutdown_signal()).await;

    refresher.abort();
    http.stop();
    result
}
