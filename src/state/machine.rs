//! Focus/break interval state machine
//!
//! Pure bookkeeping: no timers, no I/O. The caller feeds it ticks and user
//! actions and acts on the [`Completion`] records it returns.

use tracing::{debug, info};

use super::{Mode, Settings, SettingsUpdate, TimerSnapshot, TimerState};

/// Outcome of an interval running out
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    /// Mode of the interval that just ended
    pub finished: Mode,
    /// Mode the timer moved into
    pub next: Mode,
    pub long_break: bool,
    pub completed_focus_sessions: u32,
    pub remaining_seconds: u64,
}

impl Completion {
    pub fn title(&self) -> &'static str {
        match self.finished {
            Mode::Focus => "Focus session completed!",
            Mode::Break => "Break time is over!",
        }
    }

    pub fn body(&self) -> &'static str {
        match self.finished {
            Mode::Focus => "Time for a break!",
            Mode::Break => "Ready to focus again?",
        }
    }
}

#[derive(Debug, Clone)]
pub struct TimerMachine {
    settings: Settings,
    state: TimerState,
}

impl TimerMachine {
    pub fn new(settings: Settings) -> Self {
        let state = TimerState::new(&settings);
        Self { settings, state }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn state(&self) -> &TimerState {
        &self.state
    }

    pub fn snapshot(&self) -> TimerSnapshot {
        TimerSnapshot::new(&self.state, &self.settings)
    }

    /// Whether a tick source should currently be delivering ticks
    pub fn wants_ticks(&self) -> bool {
        self.state.running && self.state.remaining_seconds > 0
    }

    /// Advance by one elapsed second
    pub fn tick(&mut self) -> Option<Completion> {
        if !self.wants_ticks() {
            return None;
        }

        self.state.remaining_seconds -= 1;
        debug!("{} tick: {}s remaining", self.state.mode, self.state.remaining_seconds);

        if self.state.remaining_seconds == 0 {
            Some(self.complete())
        } else {
            None
        }
    }

    fn complete(&mut self) -> Completion {
        let finished = self.state.mode;
        self.state.running = false;

        let (next, remaining_seconds, long_break) = match finished {
            Mode::Focus => {
                self.state.completed_focus_sessions += 1;
                if self.settings.is_long_break_due(self.state.completed_focus_sessions) {
                    (Mode::Break, self.settings.long_break_seconds(), true)
                } else {
                    (Mode::Break, self.settings.duration_for(Mode::Break), false)
                }
            }
            Mode::Break => (Mode::Focus, self.settings.duration_for(Mode::Focus), false),
        };

        self.state.mode = next;
        self.state.remaining_seconds = remaining_seconds;

        info!(
            "{} interval complete, switching to {} ({}s, sessions={})",
            finished, next, remaining_seconds, self.state.completed_focus_sessions
        );

        Completion {
            finished,
            next,
            long_break,
            completed_focus_sessions: self.state.completed_focus_sessions,
            remaining_seconds,
        }
    }

    /// Flip between running and paused; returns the new running flag
    pub fn toggle(&mut self) -> bool {
        self.state.running = !self.state.running;
        self.state.running
    }

    pub fn start(&mut self) {
        self.state.running = true;
    }

    /// Stop and rewind the current interval
    pub fn reset(&mut self) {
        self.state.running = false;
        self.state.remaining_seconds = self.settings.duration_for(self.state.mode);
    }

    /// Jump to `mode` with a fresh, paused interval
    pub fn switch_mode(&mut self, mode: Mode) {
        self.state.mode = mode;
        self.state.remaining_seconds = self.settings.duration_for(mode);
        self.state.running = false;
    }

    /// Apply a settings edit and return the settings it replaced.
    ///
    /// Only the active mode's duration is pushed into the countdown; the
    /// running flag is left alone.
    pub fn update_settings(&mut self, update: &SettingsUpdate) -> Settings {
        let mut next = self.settings.clone();
        next.apply(update);
        self.replace_settings(next)
    }

    /// Restore the default settings and return the ones they replaced
    pub fn reset_settings(&mut self) -> Settings {
        self.replace_settings(Settings::default())
    }

    fn replace_settings(&mut self, next: Settings) -> Settings {
        let previous = std::mem::replace(&mut self.settings, next);
        let mode = self.state.mode;

        if previous.duration_for(mode) != self.settings.duration_for(mode) {
            self.state.remaining_seconds = self.settings.duration_for(mode);
            debug!("{} duration changed, remaining reset to {}s", mode, self.state.remaining_seconds);
        }

        previous
    }
}
