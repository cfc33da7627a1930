//! Focus Timer - A state-managed HTTP server hosting a Pomodoro countdown
//! 
//! This is the main entry point for the focus-timer application.

use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

use focus_timer::{
    api::create_router,
    config::Config,
    services::build_sink,
    state::AppState,
    tasks::live_ticker_task,
    utils::shutdown_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("focus_timer={},tower_http=info", config.log_level()))
        .init();

    info!("Starting focus-timer server v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration: host={}, port={}, refresh={}s",
          config.host, config.port, config.refresh_secs);

    let sink = build_sink(config.silent, config.bell_command.as_deref())
        .map_err(anyhow::Error::msg)?;

    // Create application state
    let state = Arc::new(AppState::new(config.port, config.host.clone(), sink));

    // Start the relative-time refresh broadcast
    tokio::spawn(live_ticker_task(state.refresh_tx.clone(), config.refresh_period()));

    // Create HTTP router with all endpoints
    let app = create_router(state);

    // Bind to the specified address
    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  GET  /timer              - Current timer snapshot");
    info!("  POST /timer/start        - Start or resume the countdown");
    info!("  POST /timer/pause        - Pause the countdown");
    info!("  POST /timer/reset        - Rewind to the full duration");
    info!("  POST /timer/duration     - Set duration in minutes (1-60)");
    info!("  POST /timer/custom       - Load a custom duration");
    info!("  POST /timer/preset/:id   - Load a preset");
    info!("  GET  /presets            - List presets");
    info!("  GET  /events             - Server-sent timer events");
    info!("  GET  /status             - Timer and server status");
    info!("  GET  /health             - Health check");

    // Setup graceful shutdown
    let server = axum::serve(listener, app);

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                tracing::error!("Server error: {}", e);
            }
        }
        _ = shutdown_signal() => {
            info!("Shutdown signal received");
        }
    }

    info!("Server shutdown complete");
    Ok(())
}
