use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::{error, info};

use momentum_dashboard::client::BotApiClient;
use momentum_dashboard::config::DashboardConfig;
use momentum_dashboard::page::render_document;
use momentum_dashboard::poller::{run_freshness_clock, DashboardState, Poller};
use momentum_dashboard::server;

#[derive(Parser)]
#[command(name = "momentum-dashboard", about = "Status dashboard for the Momentum YES weather bot")]
struct Cli {
    /// Bot backend base URL (overrides BACKEND_URL)
    #[arg(long)]
    backend: Option<String>,

    /// Dashboard port (overrides DASHBOARD_PORT)
    #[arg(long)]
    port: Option<u16>,

    /// Poll interval in seconds (overrides POLL_INTERVAL_SECS)
    #[arg(long)]
    poll_secs: Option<u64>,

    /// Load config from a specific .env file
    #[arg(long)]
    config_file: Option<String>,

    /// Fetch one snapshot, print the rendered page to stdout, exit
    #[arg(long)]
    once: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut cfg = DashboardConfig::from_env_file(cli.config_file.as_deref())?;
    if let Some(backend) = cli.backend {
        cfg.backend_url = backend;
    }
    if let Some(port) = cli.port {
        cfg.port = port;
    }
    if let Some(secs) = cli.poll_secs {
        cfg.poll_interval_secs = secs;
    }
    cfg.validate()?;

    let client = BotApiClient::new(&cfg.backend_url, cfg.http_timeout());
    let poller = Arc::new(Poller::new(client, DashboardState::shared()));

    if cli.once {
        if let Err(e) = poller.poll_once().await {
            error!("Status fetch from {} failed: {e}", cfg.backend_url);
            bail!("status fetch failed: {e}");
        }
        let state = poller.state().lock().await;
        print!("{}", render_document(&state.surface));
        return Ok(());
    }

    info!("══════════════════════════════════════════════");
    info!("  Momentum YES Dashboard");
    info!("  Backend: {}", cfg.backend_url);
    info!("  http://localhost:{}", cfg.port);
    info!("  Poll: {}s | Price clock: {}s | Timeout: {}s",
        cfg.poll_interval_secs, cfg.freshness_tick_secs, cfg.http_timeout_secs);
    info!("══════════════════════════════════════════════");

    // Graceful shutdown: Ctrl+C
    let (shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);
    tokio::spawn(async move {
        tokio::signal::ctrl_c().await.ok();
        info!("STOP SIGNAL (Ctrl+C)");
        shutdown_tx.send(true).ok();
    });

    tokio::spawn(poller.clone().run(cfg.poll_interval(), shutdown_rx.clone()));
    tokio::spawn(run_freshness_clock(
        poller.state().clone(),
        cfg.freshness_tick(),
        shutdown_rx.clone(),
    ));

    let app = server::router(poller);
    let addr = SocketAddr::from(([0, 0, 0, 0], cfg.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Bind dashboard port {}", cfg.port))?;
    info!("Dashboard listening on {addr}");

    let mut server_shutdown = shutdown_rx;
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            server_shutdown.changed().await.ok();
        })
        .await?;

    info!("Dashboard stopped");
    Ok(())
}
