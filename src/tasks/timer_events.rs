//! Timer event background task

use std::sync::Arc;
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::{error, info};

use crate::state::AppState;

/// Timed input to the timer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerEvent {
    /// One second elapsed under tick-source epoch `epoch`
    Tick { epoch: u64 },
    /// The auto-start delay for pending token `token` ran out
    AutoStart { token: u64 },
}

/// Background task that applies ticks and delayed auto-starts to the timer
pub async fn timer_event_task(state: Arc<AppState>, mut events: UnboundedReceiver<TimerEvent>) {
    info!("Starting timer event task");

    while let Some(event) = events.recv().await {
        if let Err(e) = state.handle_event(event) {
            error!("Failed to handle {:?}: {}", event, e);
        }
    }

    info!("Timer event channel closed, stopping timer event task");
}
