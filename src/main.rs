//! Focus Timer - A focus/break interval timer served over a local HTTP API
//!
//! This is the main entry point for the focus-timer application.

use std::{sync::Arc, time::Duration};
use tokio::{net::TcpListener, sync::mpsc};
use tracing::info;

use focus_timer::{
    api::create_router,
    config::Config,
    services::{CommandTonePlayer, DesktopNotifier, SilentTonePlayer, TonePlayer},
    state::AppState,
    tasks::{timer_event_task, IntervalTicker},
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
    info!("Configuration: host={}, port={}, tone_command={:?}",
          config.host, config.port, config.tone_command);

    let tone_player: Arc<dyn TonePlayer> = match CommandTonePlayer::from_command_line(&config.tone_command) {
        Some(player) => Arc::new(player),
        None => {
            info!("No tone command configured, completion tone disabled");
            Arc::new(SilentTonePlayer)
        }
    };

    // Ticks and delayed auto-starts share one event channel
    let (events_tx, events_rx) = mpsc::unbounded_channel();
    let ticker = IntervalTicker::new(Duration::from_secs(1), events_tx.clone());

    // Create application state
    let state = Arc::new(AppState::new(
        config.port,
        config.host.clone(),
        Box::new(ticker),
        Arc::new(DesktopNotifier::new("focus-timer")),
        tone_player,
        events_tx,
    ));

    // Start the timer event background task
    let timer_state = Arc::clone(&state);
    tokio::spawn(async move {
        timer_event_task(timer_state, events_rx).await;
    });

    // Create HTTP router with all endpoints
    let app = create_router(state);

    // Bind to the specified address
    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  POST  /toggle         - Start or pause the timer");
    info!("  POST  /reset          - Reset the current interval");
    info!("  POST  /mode/:mode     - Switch to focus or break");
    info!("  PATCH /settings       - Edit timer settings");
    info!("  POST  /settings/reset - Restore default settings");
    info!("  GET   /status         - Current timer status");
    info!("  GET   /events         - Timer updates as server-sent events");
    info!("  GET   /health         - Health check");

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
