//! Main application state management

use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc, Mutex, MutexGuard,
    },
    time::{Duration, Instant},
};
use chrono::{DateTime, Utc};
use tokio::sync::{mpsc::UnboundedSender, watch};
use tracing::{debug, info, warn};

use super::{Completion, Mode, Settings, SettingsUpdate, TimerMachine, TimerSnapshot};
use crate::{
    services::{Notifier, Permission, TonePlayer},
    tasks::{TickSource, TimerEvent},
};

/// Delay between a completion and the automatic start of the next interval
pub const AUTO_START_DELAY: Duration = Duration::from_secs(1);

/// Run blocking collaborator work off the async workers when a runtime is
/// present, inline otherwise
fn dispatch_blocking<F>(task: F)
where
    F: FnOnce() + Send + 'static,
{
    match tokio::runtime::Handle::try_current() {
        Ok(handle) => {
            handle.spawn_blocking(task);
        }
        Err(_) => task(),
    }
}

/// Everything that must change together under one lock
struct Timer {
    machine: TimerMachine,
    ticker: Box<dyn TickSource>,
    pending_auto_start: Option<u64>,
    auto_start_counter: u64,
}

impl Timer {
    /// Start or stop the tick source to match the machine
    fn sync_ticker(&mut self) {
        if self.machine.wants_ticks() {
            if !self.ticker.is_active() {
                self.ticker.start();
            }
        } else if self.ticker.is_active() {
            self.ticker.stop();
        }
    }

    fn cancel_auto_start(&mut self) {
        if let Some(token) = self.pending_auto_start.take() {
            debug!("Cancelled pending auto-start {}", token);
        }
    }
}

/// Application state: the interval timer plus its collaborators
pub struct AppState {
    timer: Mutex<Timer>,
    notifier: Arc<dyn Notifier>,
    permission: Arc<Mutex<Permission>>,
    permission_requested: AtomicBool,
    tone_player: Arc<dyn TonePlayer>,
    events_tx: UnboundedSender<TimerEvent>,
    /// Server metadata
    pub start_time: Instant,
    pub port: u16,
    pub host: String,
    /// Last action tracking
    pub last_action: Mutex<Option<String>>,
    pub last_action_time: Mutex<Option<DateTime<Utc>>>,
    /// Channel for timer updates
    pub timer_update_tx: watch::Sender<TimerSnapshot>,
    /// Keep the receiver alive to prevent channel closure
    _timer_update_rx: watch::Receiver<TimerSnapshot>,
}

impl AppState {
    /// Create a paused focus timer with default settings
    pub fn new(
        port: u16,
        host: String,
        ticker: Box<dyn TickSource>,
        notifier: Arc<dyn Notifier>,
        tone_player: Arc<dyn TonePlayer>,
        events_tx: UnboundedSender<TimerEvent>,
    ) -> Self {
        let settings = Settings::default();
        let notifications_enabled = settings.notifications_enabled;
        let machine = TimerMachine::new(settings);
        let (timer_update_tx, timer_update_rx) = watch::channel(machine.snapshot());

        let state = Self {
            timer: Mutex::new(Timer {
                machine,
                ticker,
                pending_auto_start: None,
                auto_start_counter: 0,
            }),
            notifier,
            permission: Arc::new(Mutex::new(Permission::Undetermined)),
            permission_requested: AtomicBool::new(false),
            tone_player,
            events_tx,
            start_time: Instant::now(),
            port,
            host,
            last_action: Mutex::new(None),
            last_action_time: Mutex::new(None),
            timer_update_tx,
            _timer_update_rx: timer_update_rx,
        };

        // Settings come into existence with notifications on
        if notifications_enabled {
            state.ensure_notification_permission();
        }

        state
    }

    fn lock_timer(&self) -> Result<MutexGuard<'_, Timer>, String> {
        self.timer.lock()
            .map_err(|e| format!("Failed to lock timer state: {}", e))
    }

    /// Run a user action against the timer and publish the result
    fn user_action<F>(&self, action: &str, updater: F) -> Result<TimerSnapshot, String>
    where
        F: FnOnce(&mut Timer),
    {
        let mut timer = self.lock_timer()?;
        timer.cancel_auto_start();
        updater(&mut *timer);
        timer.sync_ticker();
        let snapshot = timer.machine.snapshot();
        drop(timer); // Release the lock early

        self.record_action(action);
        self.publish(snapshot.clone());
        Ok(snapshot)
    }

    fn record_action(&self, action: &str) {
        if let Ok(mut last_action) = self.last_action.lock() {
            *last_action = Some(action.to_string());
        }
        if let Ok(mut last_time) = self.last_action_time.lock() {
            *last_time = Some(Utc::now());
        }
    }

    fn publish(&self, snapshot: TimerSnapshot) {
        if let Err(e) = self.timer_update_tx.send(snapshot) {
            warn!("Failed to send timer update: {}", e);
        }
    }

    /// Start or pause the countdown
    pub fn toggle(&self) -> Result<TimerSnapshot, String> {
        self.user_action("toggle", |timer| {
            if timer.machine.state().running {
                timer.ticker.stop();
            }
            let running = timer.machine.toggle();
            info!("Timer {}", if running { "started" } else { "paused" });
        })
    }

    /// Stop and rewind the current interval
    pub fn reset(&self) -> Result<TimerSnapshot, String> {
        self.user_action("reset", |timer| {
            timer.ticker.stop();
            timer.machine.reset();
            info!("Timer reset to {}s", timer.machine.state().remaining_seconds);
        })
    }

    /// Manually switch to the given mode
    pub fn switch_mode(&self, mode: Mode) -> Result<TimerSnapshot, String> {
        self.user_action(mode.as_str(), |timer| {
            timer.ticker.stop();
            timer.machine.switch_mode(mode);
            info!("Switched to {} mode", mode);
        })
    }

    /// Apply a settings edit from the user
    pub fn update_settings(&self, update: &SettingsUpdate) -> Result<TimerSnapshot, String> {
        self.settings_change("settings", |machine| machine.update_settings(update))
    }

    /// Restore every setting to its default
    pub fn reset_settings(&self) -> Result<TimerSnapshot, String> {
        self.settings_change("settings-reset", TimerMachine::reset_settings)
    }

    fn settings_change<F>(&self, action: &str, change: F) -> Result<TimerSnapshot, String>
    where
        F: FnOnce(&mut TimerMachine) -> Settings,
    {
        let mut timer = self.lock_timer()?;
        let previous = change(&mut timer.machine);
        timer.sync_ticker();
        let settings = timer.machine.settings().clone();
        let snapshot = timer.machine.snapshot();
        drop(timer);

        info!("Settings updated: {:?}", settings);
        if !previous.notifications_enabled && settings.notifications_enabled {
            self.ensure_notification_permission();
        }

        self.record_action(action);
        self.publish(snapshot.clone());
        Ok(snapshot)
    }

    /// Ask for notification permission at most once, off the async workers
    fn ensure_notification_permission(&self) {
        if self.current_permission() != Permission::Undetermined
            || self.permission_requested.swap(true, Ordering::SeqCst)
        {
            return;
        }

        let notifier = Arc::clone(&self.notifier);
        let permission = Arc::clone(&self.permission);
        dispatch_blocking(move || {
            let decision = notifier.request_permission();
            info!("Notification permission: {:?}", decision);
            match permission.lock() {
                Ok(mut permission) => *permission = decision,
                Err(e) => warn!("Failed to lock notification permission: {}", e),
            }
        });
    }

    fn current_permission(&self) -> Permission {
        self.permission.lock()
            .map(|permission| *permission)
            .unwrap_or(Permission::Undetermined)
    }

    /// Process a tick or auto-start event from the background task
    pub fn handle_event(&self, event: TimerEvent) -> Result<(), String> {
        let mut timer = self.lock_timer()?;
        let mut completed = None;

        match event {
            TimerEvent::Tick { epoch } => {
                if !timer.ticker.is_active() || epoch != timer.ticker.epoch() {
                    debug!("Dropping stale tick from epoch {}", epoch);
                    return Ok(());
                }

                if let Some(completion) = timer.machine.tick() {
                    timer.ticker.stop();
                    let settings = timer.machine.settings().clone();

                    if settings.auto_start {
                        self.schedule_auto_start(&mut *timer);
                    }
                    completed = Some((completion, settings));
                }
            }
            TimerEvent::AutoStart { token } => {
                if timer.pending_auto_start != Some(token) {
                    debug!("Ignoring superseded auto-start {}", token);
                    return Ok(());
                }

                timer.pending_auto_start = None;
                timer.machine.start();
                timer.sync_ticker();
                info!("Auto-started {} interval", timer.machine.state().mode);
            }
        }

        let snapshot = timer.machine.snapshot();
        drop(timer);
        self.publish(snapshot);

        if let Some((completion, settings)) = completed {
            self.announce(&completion, &settings);
        }
        Ok(())
    }

    fn schedule_auto_start(&self, timer: &mut Timer) {
        timer.auto_start_counter += 1;
        let token = timer.auto_start_counter;
        timer.pending_auto_start = Some(token);

        let events_tx = self.events_tx.clone();
        tokio::spawn(async move {
            tokio::time::sleep(AUTO_START_DELAY).await;
            if events_tx.send(TimerEvent::AutoStart { token }).is_err() {
                debug!("Timer event channel closed before auto-start {}", token);
            }
        });
    }

    /// Sound and notification side effects of a completion
    fn announce(&self, completion: &Completion, settings: &Settings) {
        if settings.sound_enabled {
            self.tone_player.play(settings.sound_volume);
        }

        if !settings.notifications_enabled {
            return;
        }

        if self.current_permission() != Permission::Granted {
            debug!("Notification permission not granted, skipping notification");
            return;
        }

        let notifier = Arc::clone(&self.notifier);
        let (title, body) = (completion.title(), completion.body());
        dispatch_blocking(move || {
            if let Err(e) = notifier.notify(title, body) {
                warn!("{}", e);
            }
        });
    }

    /// Get current timer snapshot
    pub fn snapshot(&self) -> Result<TimerSnapshot, String> {
        self.lock_timer().map(|timer| timer.machine.snapshot())
    }

    /// Whether the tick source is currently subscribed
    pub fn is_ticking(&self) -> Result<bool, String> {
        self.lock_timer().map(|timer| timer.ticker.is_active())
    }

    /// Subscribe to snapshot updates
    pub fn subscribe(&self) -> watch::Receiver<TimerSnapshot> {
        self.timer_update_tx.subscribe()
    }

    /// Current notification permission
    pub fn notification_permission(&self) -> Result<Permission, String> {
        self.permission.lock()
            .map(|permission| *permission)
            .map_err(|e| format!("Failed to lock notification permission: {}", e))
    }

    /// Calculate server uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        let duration = self.start_time.elapsed();
        let hours = duration.as_secs() / 3600;
        let minutes = (duration.as_secs() % 3600) / 60;
        let seconds = duration.as_secs() % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }

    /// Get last action information
    pub fn get_last_action(&self) -> (Option<String>, Option<DateTime<Utc>>) {
        let last_action = self.last_action.lock().ok().and_then(|a| a.clone());
        let last_action_time = self.last_action_time.lock().ok().and_then(|t| *t);
        (last_action, last_action_time)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tasks::{timer_event_task, IntervalTicker};
    use tokio::sync::mpsc;

    #[derive(Default, Clone)]
    struct ManualTicker {
        log: Arc<Mutex<Vec<&'static str>>>,
        active: bool,
        epoch: u64,
    }

    impl TickSource for ManualTicker {
        fn start(&mut self) -> u64 {
            assert!(!self.active, "ticker started twice without a stop");
            self.active = true;
            self.epoch += 1;
            self.log.lock().unwrap().push("start");
            self.epoch
        }

        fn stop(&mut self) {
            if self.active {
                self.active = false;
                self.log.lock().unwrap().push("stop");
            }
        }

        fn is_active(&self) -> bool {
            self.active
        }

        fn epoch(&self) -> u64 {
            self.epoch
        }
    }

    /// Notifier that answers with a fixed decision, optionally slowly
    struct RecordingNotifier {
        decision: Permission,
        delay: Duration,
        requests: Arc<Mutex<u32>>,
        shown: Arc<Mutex<Vec<(String, String)>>>,
    }

    impl RecordingNotifier {
        fn new(decision: Permission) -> Self {
            Self {
                decision,
                delay: Duration::ZERO,
                requests: Arc::default(),
                shown: Arc::default(),
            }
        }

        fn slow(decision: Permission, delay: Duration) -> Self {
            Self { delay, ..Self::new(decision) }
        }
    }

    impl Notifier for RecordingNotifier {
        fn request_permission(&self) -> Permission {
            std::thread::sleep(self.delay);
            *self.requests.lock().unwrap() += 1;
            self.decision
        }

        fn notify(&self, title: &str, body: &str) -> Result<(), String> {
            std::thread::sleep(self.delay);
            self.shown.lock().unwrap().push((title.to_string(), body.to_string()));
            Ok(())
        }
    }

    async fn wait_until(mut condition: impl FnMut() -> bool) -> bool {
        for _ in 0..200 {
            if condition() {
                return true;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        condition()
    }

    #[derive(Default)]
    struct RecordingTone {
        volumes: Mutex<Vec<u8>>,
    }

    impl TonePlayer for RecordingTone {
        fn play(&self, volume: u8) {
            self.volumes.lock().unwrap().push(volume);
        }
    }

    struct Harness {
        state: AppState,
        ticker_log: Arc<Mutex<Vec<&'static str>>>,
        requests: Arc<Mutex<u32>>,
        shown: Arc<Mutex<Vec<(String, String)>>>,
        tone: Arc<RecordingTone>,
        _events_rx: mpsc::UnboundedReceiver<TimerEvent>,
    }

    fn harness(decision: Permission) -> Harness {
        let ticker = ManualTicker::default();
        let ticker_log = Arc::clone(&ticker.log);
        let notifier = RecordingNotifier::new(decision);
        let requests = Arc::clone(&notifier.requests);
        let shown = Arc::clone(&notifier.shown);
        let tone = Arc::new(RecordingTone::default());
        let (events_tx, events_rx) = mpsc::unbounded_channel();

        let state = AppState::new(
            20525,
            "127.0.0.1".to_string(),
            Box::new(ticker),
            Arc::new(notifier),
            tone.clone(),
            events_tx,
        );

        Harness { state, ticker_log, requests, shown, tone, _events_rx: events_rx }
    }

    fn current_epoch(state: &AppState) -> u64 {
        state.lock_timer().unwrap().ticker.epoch()
    }

    fn tick(state: &AppState) {
        let epoch = current_epoch(state);
        state.handle_event(TimerEvent::Tick { epoch }).unwrap();
    }

    #[test]
    fn toggle_starts_and_stops_the_ticker() {
        let h = harness(Permission::Granted);

        assert!(h.state.toggle().unwrap().running);
        assert!(h.state.is_ticking().unwrap());
        assert!(!h.state.toggle().unwrap().running);
        assert!(!h.state.is_ticking().unwrap());
        assert_eq!(*h.ticker_log.lock().unwrap(), vec!["start", "stop"]);
    }

    #[test]
    fn ticks_after_pause_are_dropped() {
        let h = harness(Permission::Granted);
        h.state.toggle().unwrap();
        let epoch = current_epoch(&h.state);
        tick(&h.state);

        h.state.toggle().unwrap();
        h.state.handle_event(TimerEvent::Tick { epoch }).unwrap();
        assert_eq!(h.state.snapshot().unwrap().remaining_seconds, 1499);
    }

    #[test]
    fn ticks_from_a_previous_epoch_are_dropped() {
        let h = harness(Permission::Granted);
        h.state.toggle().unwrap();
        let old_epoch = current_epoch(&h.state);
        h.state.toggle().unwrap();
        h.state.toggle().unwrap();

        h.state.handle_event(TimerEvent::Tick { epoch: old_epoch }).unwrap();
        assert_eq!(h.state.snapshot().unwrap().remaining_seconds, 1500);

        tick(&h.state);
        assert_eq!(h.state.snapshot().unwrap().remaining_seconds, 1499);
    }

    #[test]
    fn reset_stops_ticking_and_keeps_mode() {
        let h = harness(Permission::Granted);
        h.state.switch_mode(Mode::Break).unwrap();
        h.state.toggle().unwrap();
        tick(&h.state);

        let snapshot = h.state.reset().unwrap();
        assert_eq!(snapshot.mode, Mode::Break);
        assert_eq!(snapshot.remaining_seconds, 300);
        assert!(!snapshot.running);
        assert!(!h.state.is_ticking().unwrap());
        assert_eq!(h.state.get_last_action().0.as_deref(), Some("reset"));
    }

    #[test]
    fn completion_plays_tone_and_notifies() {
        let h = harness(Permission::Granted);
        h.state.update_settings(&SettingsUpdate {
            focus_minutes: Some(1u32.into()),
            sound_volume: Some(70u32.into()),
            ..Default::default()
        }).unwrap();
        h.state.toggle().unwrap();

        for _ in 0..60 {
            tick(&h.state);
        }

        let snapshot = h.state.snapshot().unwrap();
        assert_eq!(snapshot.mode, Mode::Break);
        assert_eq!(snapshot.remaining_seconds, 300);
        assert!(!snapshot.running);
        assert!(!h.state.is_ticking().unwrap());
        assert_eq!(*h.tone.volumes.lock().unwrap(), vec![70]);
        assert_eq!(
            *h.shown.lock().unwrap(),
            vec![("Focus session completed!".to_string(), "Time for a break!".to_string())]
        );
    }

    #[test]
    fn disabled_side_effects_stay_quiet() {
        let h = harness(Permission::Granted);
        h.state.update_settings(&SettingsUpdate {
            sound_enabled: Some(false),
            notifications_enabled: Some(false),
            ..Default::default()
        }).unwrap();
        h.state.switch_mode(Mode::Break).unwrap();
        h.state.toggle().unwrap();

        for _ in 0..300 {
            tick(&h.state);
        }

        assert_eq!(h.state.snapshot().unwrap().mode, Mode::Focus);
        assert!(h.tone.volumes.lock().unwrap().is_empty());
        assert!(h.shown.lock().unwrap().is_empty());
    }

    #[test]
    fn denied_permission_skips_notification_only() {
        let h = harness(Permission::Denied);
        h.state.switch_mode(Mode::Break).unwrap();
        h.state.toggle().unwrap();

        for _ in 0..300 {
            tick(&h.state);
        }

        assert_eq!(h.state.snapshot().unwrap().mode, Mode::Focus);
        assert_eq!(h.tone.volumes.lock().unwrap().len(), 1);
        assert!(h.shown.lock().unwrap().is_empty());
    }

    #[test]
    fn permission_requested_once_when_enabled() {
        let h = harness(Permission::Granted);
        // Defaults start with notifications on
        assert_eq!(*h.requests.lock().unwrap(), 1);
        assert_eq!(h.state.notification_permission().unwrap(), Permission::Granted);

        let off = SettingsUpdate { notifications_enabled: Some(false), ..Default::default() };
        let on = SettingsUpdate { notifications_enabled: Some(true), ..Default::default() };
        h.state.update_settings(&off).unwrap();
        h.state.update_settings(&on).unwrap();
        assert_eq!(*h.requests.lock().unwrap(), 1);
    }

    #[test]
    fn editing_running_focus_duration_keeps_ticking() {
        let h = harness(Permission::Granted);
        h.state.toggle().unwrap();
        tick(&h.state);

        let snapshot = h.state.update_settings(&SettingsUpdate {
            focus_minutes: Some("40".into()),
            ..Default::default()
        }).unwrap();
        assert_eq!(snapshot.remaining_seconds, 2400);
        assert!(snapshot.running);
        assert_eq!(*h.ticker_log.lock().unwrap(), vec!["start"]);
    }

    #[test]
    fn snapshots_are_published() {
        let h = harness(Permission::Granted);
        let mut rx = h.state.subscribe();
        h.state.toggle().unwrap();
        assert!(rx.has_changed().unwrap());
        assert!(rx.borrow_and_update().running);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn slow_notification_does_not_hold_the_timer() {
        let notifier = RecordingNotifier::slow(Permission::Granted, Duration::from_secs(1));
        let shown = Arc::clone(&notifier.shown);
        let (events_tx, _events_rx) = mpsc::unbounded_channel();
        let state = AppState::new(
            20525,
            "127.0.0.1".to_string(),
            Box::new(ManualTicker::default()),
            Arc::new(notifier),
            Arc::new(RecordingTone::default()),
            events_tx,
        );
        assert!(wait_until(|| state.notification_permission().unwrap() == Permission::Granted).await);

        state.update_settings(&SettingsUpdate {
            focus_minutes: Some(1u32.into()),
            ..Default::default()
        }).unwrap();
        state.toggle().unwrap();
        for _ in 0..59 {
            tick(&state);
        }

        let started = Instant::now();
        tick(&state);
        let snapshot = state.snapshot().unwrap();
        assert!(started.elapsed() < Duration::from_millis(500));
        assert_eq!(snapshot.mode, Mode::Break);
        assert!(shown.lock().unwrap().is_empty());

        assert!(wait_until(|| shown.lock().unwrap().len() == 1).await);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn slow_permission_request_does_not_block_startup() {
        let notifier = RecordingNotifier::slow(Permission::Denied, Duration::from_secs(1));
        let requests = Arc::clone(&notifier.requests);
        let (events_tx, _events_rx) = mpsc::unbounded_channel();

        let started = Instant::now();
        let state = AppState::new(
            20525,
            "127.0.0.1".to_string(),
            Box::new(ManualTicker::default()),
            Arc::new(notifier),
            Arc::new(RecordingTone::default()),
            events_tx,
        );
        assert!(started.elapsed() < Duration::from_millis(500));
        assert_eq!(state.notification_permission().unwrap(), Permission::Undetermined);

        // A second transition while the first request is in flight does not re-ask
        let off = SettingsUpdate { notifications_enabled: Some(false), ..Default::default() };
        let on = SettingsUpdate { notifications_enabled: Some(true), ..Default::default() };
        state.update_settings(&off).unwrap();
        state.update_settings(&on).unwrap();

        assert!(wait_until(|| state.notification_permission().unwrap() == Permission::Denied).await);
        assert_eq!(*requests.lock().unwrap(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn auto_start_resumes_one_second_after_completion() {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let ticker = IntervalTicker::new(Duration::from_secs(1), events_tx.clone());
        let state = Arc::new(AppState::new(
            20525,
            "127.0.0.1".to_string(),
            Box::new(ticker),
            Arc::new(RecordingNotifier::new(Permission::Granted)),
            Arc::new(RecordingTone::default()),
            events_tx,
        ));
        tokio::spawn(timer_event_task(Arc::clone(&state), events_rx));

        state.update_settings(&SettingsUpdate {
            focus_minutes: Some(1u32.into()),
            auto_start: Some(true),
            ..Default::default()
        }).unwrap();
        state.toggle().unwrap();

        tokio::time::sleep(Duration::from_millis(60_500)).await;
        let snapshot = state.snapshot().unwrap();
        assert_eq!(snapshot.mode, Mode::Break);
        assert_eq!(snapshot.remaining_seconds, 300);
        assert!(!snapshot.running);

        tokio::time::sleep(Duration::from_secs(1)).await;
        let snapshot = state.snapshot().unwrap();
        assert!(snapshot.running);
        assert_eq!(snapshot.remaining_seconds, 300);

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(state.snapshot().unwrap().remaining_seconds, 299);
    }

    #[tokio::test(start_paused = true)]
    async fn user_action_cancels_pending_auto_start() {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let ticker = IntervalTicker::new(Duration::from_secs(1), events_tx.clone());
        let state = Arc::new(AppState::new(
            20525,
            "127.0.0.1".to_string(),
            Box::new(ticker),
            Arc::new(RecordingNotifier::new(Permission::Granted)),
            Arc::new(RecordingTone::default()),
            events_tx,
        ));
        tokio::spawn(timer_event_task(Arc::clone(&state), events_rx));

        state.update_settings(&SettingsUpdate {
            focus_minutes: Some(1u32.into()),
            auto_start: Some(true),
            ..Default::default()
        }).unwrap();
        state.toggle().unwrap();

        tokio::time::sleep(Duration::from_millis(60_500)).await;
        state.reset().unwrap();

        tokio::time::sleep(Duration::from_secs(2)).await;
        let snapshot = state.snapshot().unwrap();
        assert!(!snapshot.running);
        assert_eq!(snapshot.remaining_seconds, 300);
    }
}
