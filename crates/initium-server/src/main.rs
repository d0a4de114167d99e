use std::{net::SocketAddr, sync::Arc};

use anyhow::Result;
use tracing::info;

use initium_server::state::AppState;

/// `initium health`: liveness probe for Docker HEALTHCHECK.
///
/// Calls `GET http://localhost:$PORT/health`.
/// Exits 0 if the server responds with HTTP 200, exits 1 otherwise.
fn run_health_check() -> ! {
    let port = std::env::var("PORT").unwrap_or_else(|_| "8080".to_string());
    let url = format!("http://localhost:{}/health", port);
    match ureq::get(&url).call() {
        Ok(resp) if resp.status() == 200 => std::process::exit(0),
        _ => std::process::exit(1),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();
    if args.get(1).map(|s| s.as_str()) == Some("health") {
        run_health_check();
    }
    // Structured JSON logging. Level controlled via RUST_LOG env var.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("initium=info".parse()?),
        )
        .json()
        .init();

    let cfg = initium_core::config::Config::from_env().map_err(|e| anyhow::anyhow!(e))?;

    // Creates the data directory, an empty page view array and the default
    // registry on first start.
    let state = Arc::new(AppState::open(cfg.clone()).await?);

    info!(
        pageviews = %cfg.pageviews_path().display(),
        websites = %cfg.websites_path().display(),
        retention_limit = cfg.retention_limit,
        "Data files ready"
    );

    let addr = format!("0.0.0.0:{}", cfg.port);
    let app = initium_server::app::build_app(state);

    info!(port = cfg.port, "Initium listening on {}", addr);
    info!("Dashboard: http://localhost:{}/", cfg.port);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(async move {
        tokio::signal::ctrl_c().await.ok();
    })
    .await?;

    Ok(())
}
