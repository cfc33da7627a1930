//! Main application state management

use std::{
    sync::{Arc, Mutex},
    time::Instant,
};
use chrono::{DateTime, Utc};
use tokio::{
    sync::{broadcast, watch},
    task::JoinHandle,
};
use tracing::{debug, info, warn};

use super::{
    engine::{Tick, TimerEngine},
    presets::{Preset, CUSTOM_LABEL},
    TimerState,
};
use crate::{services::NotificationSink, tasks::countdown_task, utils::time::format_uptime};

/// The engine together with the ticker currently driving it
#[derive(Debug)]
pub struct Countdown {
    engine: TimerEngine,
    /// Identifies the armed ticker; bumped on every arm and disarm
    epoch: u64,
    ticker: Option<JoinHandle<()>>,
}

impl Countdown {
    fn new(engine: TimerEngine) -> Self {
        Self {
            engine,
            epoch: 0,
            ticker: None,
        }
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn has_ticker(&self) -> bool {
        self.ticker.is_some()
    }

    fn arm(&mut self, state: Arc<AppState>) {
        self.disarm();
        let epoch = self.epoch;
        debug!("Arming countdown ticker (epoch {})", epoch);
        self.ticker = Some(tokio::spawn(countdown_task(state, epoch)));
    }

    fn disarm(&mut self) {
        self.epoch += 1;
        if let Some(ticker) = self.ticker.take() {
            debug!("Cancelling countdown ticker");
            ticker.abort();
        }
    }
}

/// Main application state that owns the timer and its notification channels
#[derive(Debug)]
pub struct AppState {
    /// Timer engine and its ticker, guarded by one lock
    pub countdown: Arc<Mutex<Countdown>>,
    /// Server metadata
    pub start_time: Instant,
    pub port: u16,
    pub host: String,
    /// Last action tracking
    pub last_action: Arc<Mutex<Option<String>>>,
    pub last_action_time: Arc<Mutex<Option<DateTime<Utc>>>>,
    /// When the countdown last reached zero
    pub last_completed_at: Arc<Mutex<Option<DateTime<Utc>>>>,
    /// Channel for timer updates
    pub timer_update_tx: watch::Sender<TimerState>,
    /// Keep the receiver alive to prevent channel closure
    pub _timer_update_rx: watch::Receiver<TimerState>,
    /// Periodic pulses asking views to refresh relative time labels
    pub refresh_tx: broadcast::Sender<u64>,
}

impl AppState {
    /// Create a new AppState with an idle timer on the default preset
    pub fn new(port: u16, host: String, sink: Box<dyn NotificationSink>) -> Self {
        let engine = TimerEngine::new(sink);
        let (timer_update_tx, timer_update_rx) = watch::channel(engine.snapshot());
        let (refresh_tx, _) = broadcast::channel(16);

        Self {
            countdown: Arc::new(Mutex::new(Countdown::new(engine))),
            start_time: Instant::now(),
            port,
            host,
            last_action: Arc::new(Mutex::new(None)),
            last_action_time: Arc::new(Mutex::new(None)),
            last_completed_at: Arc::new(Mutex::new(None)),
            timer_update_tx,
            _timer_update_rx: timer_update_rx,
            refresh_tx,
        }
    }

    /// Apply a command to the engine, then arm or cancel the ticker to match
    pub fn apply<F>(self: &Arc<Self>, action: &str, command: F) -> Result<TimerState, String>
    where
        F: FnOnce(&mut TimerEngine),
    {
        let mut countdown = self.countdown.lock()
            .map_err(|e| format!("Failed to lock timer: {}", e))?;

        let was_running = countdown.engine.state().is_running();
        command(&mut countdown.engine);
        let snapshot = countdown.engine.snapshot();

        match (was_running, snapshot.is_running()) {
            (false, true) => countdown.arm(Arc::clone(self)),
            (true, false) => countdown.disarm(),
            _ => {}
        }
        // Publish under the lock so watchers always end on the engine's latest state.
        self.publish(snapshot.clone());
        drop(countdown);

        // Update last action tracking
        if let Ok(mut last_action) = self.last_action.lock() {
            *last_action = Some(action.to_string());
        }
        if let Ok(mut last_time) = self.last_action_time.lock() {
            *last_time = Some(Utc::now());
        }

        Ok(snapshot)
    }

    pub fn start(self: &Arc<Self>) -> Result<TimerState, String> {
        self.apply("start", |engine| engine.start())
    }

    pub fn pause(self: &Arc<Self>) -> Result<TimerState, String> {
        self.apply("pause", |engine| engine.pause())
    }

    pub fn reset(self: &Arc<Self>) -> Result<TimerState, String> {
        self.apply("reset", |engine| engine.reset())
    }

    pub fn set_duration(self: &Arc<Self>, minutes: i64) -> Result<TimerState, String> {
        self.apply("set-duration", |engine| engine.set_duration(minutes))
    }

    pub fn select_preset(self: &Arc<Self>, minutes: i64, label: &str) -> Result<TimerState, String> {
        self.apply("select-preset", |engine| engine.select_preset(minutes, label))
    }

    pub fn apply_preset(self: &Arc<Self>, preset: &Preset) -> Result<TimerState, String> {
        info!("Applying preset {}", preset.id);
        self.apply(preset.id, |engine| engine.apply_preset(preset))
    }

    /// Load a user-entered duration under the custom label
    pub fn apply_custom(self: &Arc<Self>, minutes: i64) -> Result<TimerState, String> {
        self.apply("custom", |engine| engine.select_preset(minutes, CUSTOM_LABEL))
    }

    /// Advance the countdown by one second on behalf of the ticker armed at `epoch`
    ///
    /// A ticker whose epoch is no longer current gets [`Tick::Ignored`] and must stop.
    pub fn tick(&self, epoch: u64) -> Result<Tick, String> {
        let mut countdown = self.countdown.lock()
            .map_err(|e| format!("Failed to lock timer: {}", e))?;

        if countdown.epoch != epoch {
            debug!("Stale ticker (epoch {}, current {})", epoch, countdown.epoch);
            return Ok(Tick::Ignored);
        }

        let outcome = countdown.engine.tick();
        let snapshot = countdown.engine.snapshot();
        if !matches!(outcome, Tick::Counting(_)) {
            // The ticker is finishing on its own, detach instead of aborting it.
            countdown.epoch += 1;
            countdown.ticker = None;
        }

        if outcome == Tick::Expired {
            if let Ok(mut completed) = self.last_completed_at.lock() {
                *completed = Some(Utc::now());
            }
        }

        self.publish(snapshot);
        drop(countdown);
        Ok(outcome)
    }

    /// Get current timer state
    pub fn get_timer_state(&self) -> Result<TimerState, String> {
        self.countdown.lock()
            .map(|countdown| countdown.engine.snapshot())
            .map_err(|e| format!("Failed to lock timer: {}", e))
    }

    /// Subscribe to timer snapshots
    pub fn subscribe_timer(&self) -> watch::Receiver<TimerState> {
        self.timer_update_tx.subscribe()
    }

    /// Subscribe to relative-time refresh pulses
    pub fn subscribe_refresh(&self) -> broadcast::Receiver<u64> {
        self.refresh_tx.subscribe()
    }

    /// Calculate server uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        format_uptime(self.start_time.elapsed())
    }

    /// Get last action information
    pub fn get_last_action(&self) -> (Option<String>, Option<DateTime<Utc>>) {
        let last_action = self.last_action.lock().ok().and_then(|a| a.clone());
        let last_action_time = self.last_action_time.lock().ok().and_then(|t| *t);
        (last_action, last_action_time)
    }

    /// Get the time of the most recent expiry
    pub fn get_last_completed(&self) -> Option<DateTime<Utc>> {
        self.last_completed_at.lock().ok().and_then(|t| *t)
    }

    fn publish(&self, snapshot: TimerState) {
        if let Err(e) = self.timer_update_tx.send(snapshot) {
            warn!("Failed to send timer update: {}", e);
        }
    }
}
