//! One-second tick source

use std::time::Duration;

use tokio::{
    sync::mpsc::UnboundedSender,
    task::JoinHandle,
    time::{interval_at, Instant, MissedTickBehavior},
};
use tracing::debug;

use super::TimerEvent;

/// Periodic tick source with at most one active subscription.
///
/// Every `start` opens a new epoch. Ticks are stamped with the epoch they were
/// produced under so the consumer can drop any that outlived a `stop`.
pub trait TickSource: Send {
    /// Begin ticking, cancelling any active subscription first
    fn start(&mut self) -> u64;
    /// Cancel the active subscription, if any
    fn stop(&mut self);
    fn is_active(&self) -> bool;
    /// Epoch of the current (or most recent) subscription
    fn epoch(&self) -> u64;
}

/// Tick source backed by a tokio interval task
#[derive(Debug)]
pub struct IntervalTicker {
    period: Duration,
    events: UnboundedSender<TimerEvent>,
    handle: Option<JoinHandle<()>>,
    epoch: u64,
}

impl IntervalTicker {
    pub fn new(period: Duration, events: UnboundedSender<TimerEvent>) -> Self {
        Self {
            period,
            events,
            handle: None,
            epoch: 0,
        }
    }
}

impl TickSource for IntervalTicker {
    fn start(&mut self) -> u64 {
        self.stop();
        self.epoch += 1;

        let epoch = self.epoch;
        let period = self.period;
        let events = self.events.clone();

        self.handle = Some(tokio::spawn(async move {
            // First tick one full period after starting
            let mut interval = interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                interval.tick().await;
                if events.send(TimerEvent::Tick { epoch }).is_err() {
                    debug!("Tick receiver dropped, ending ticker epoch {}", epoch);
                    break;
                }
            }
        }));

        debug!("Ticker started, epoch {}", epoch);
        epoch
    }

    fn stop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
            debug!("Ticker stopped, epoch {}", self.epoch);
        }
    }

    fn is_active(&self) -> bool {
        self.handle.is_some()
    }

    fn epoch(&self) -> u64 {
        self.epoch
    }
}

impl Drop for IntervalTicker {
    fn drop(&mut self) {
        self.stop();
    }
}
