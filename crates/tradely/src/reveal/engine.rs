//! Timer-driven progressive disclosure of analysis text

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::debug;

use super::units::{RevealedUnit, split_units};
use crate::analysis::AnalysisResult;
use crate::config::TradelyConfig;
use crate::error::{Result, TradelyError};

/// Text shown while no unit is visible
pub const EMPTY_MESSAGE: &str = "No analysis lines to display.";

#[derive(Debug, Default)]
struct RevealState {
    /// Bumped on every start/stop; timers from older sequences are inert
    generation: u64,
    visible: Vec<RevealedUnit>,
}

/// Reveals analysis units one at a time on a fixed cadence.
///
/// Every timer is armed when [`start`](Self::start) is called: unit *i*
/// becomes visible `i × cadence` later. Each timer is a spawned task whose
/// [`JoinHandle`] doubles as its cancellation token, so [`stop`](Self::stop),
/// a new `start`, or dropping the engine abort every outstanding disclosure.
pub struct RevealEngine {
    cadence: Duration,
    runtime: Handle,
    state: Arc<Mutex<RevealState>>,
    timers: Vec<JoinHandle<()>>,
    total: usize,
    progress: watch::Sender<usize>,
}

impl RevealEngine {
    /// Create an engine bound to the current Tokio runtime
    pub fn new(cadence: Duration) -> Result<Self> {
        let runtime = Handle::try_current()
            .map_err(|e| TradelyError::RuntimeError(format!("reveal engine needs a runtime: {e}")))?;
        Ok(Self::with_handle(cadence, runtime))
    }

    /// Create an engine using the configured cadence
    pub fn from_config(config: &TradelyConfig) -> Result<Self> {
        Self::new(config.reveal_cadence)
    }

    /// Create an engine that schedules its timers on `runtime`
    pub fn with_handle(cadence: Duration, runtime: Handle) -> Self {
        let (progress, _) = watch::channel(0);
        Self {
            cadence,
            runtime,
            state: Arc::new(Mutex::new(RevealState::default())),
            timers: Vec::new(),
            total: 0,
            progress,
        }
    }

    /// Begin revealing `narrative`, replacing any sequence in progress.
    ///
    /// Returns the number of units scheduled. Blank text schedules nothing.
    pub fn start(&mut self, narrative: &str) -> usize {
        self.stop();

        let units: Arc<[RevealedUnit]> = split_units(narrative)
            .into_iter()
            .map(RevealedUnit::new)
            .collect();
        self.total = units.len();
        if units.is_empty() {
            debug!("Nothing to reveal");
            return 0;
        }

        let generation = lock(&self.state).generation;
        for index in 0..units.len() {
            let delay = self.cadence * u32::try_from(index).unwrap_or(u32::MAX);
            let state = Arc::clone(&self.state);
            let units = Arc::clone(&units);
            let progress = self.progress.clone();

            self.timers.push(self.runtime.spawn(async move {
                if !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }
                let mut state = lock(&state);
                if state.generation != generation {
                    return;
                }
                // Reveal as a prefix so the visible order always matches the split order
                let shown = state.visible.len();
                if shown <= index {
                    state.visible.extend_from_slice(&units[shown..=index]);
                }
                // Publish under the lock; a stop in between must see this count first
                progress.send_replace(state.visible.len());
            }));
        }

        debug!(units = self.total, cadence_ms = self.cadence.as_millis(), "Scheduled reveal");
        self.total
    }

    /// Reveal the narrative of an analysis; payloads without one reveal nothing
    pub fn start_analysis(&mut self, analysis: &AnalysisResult) -> usize {
        self.start(analysis.narrative().unwrap_or_default())
    }

    /// Cancel every outstanding disclosure and clear the visible units.
    ///
    /// Safe to call repeatedly.
    pub fn stop(&mut self) {
        let cancelled = self.cancel_timers();

        let mut state = lock(&self.state);
        state.generation = state.generation.wrapping_add(1);
        state.visible.clear();
        self.progress.send_replace(0);
        drop(state);

        self.total = 0;

        if cancelled > 0 {
            debug!(cancelled, "Stopped reveal");
        }
    }

    /// Units disclosed so far, in reveal order
    pub fn visible_units(&self) -> Vec<RevealedUnit> {
        lock(&self.state).visible.clone()
    }

    /// Number of units disclosed so far
    pub fn visible_count(&self) -> usize {
        lock(&self.state).visible.len()
    }

    /// Number of units in the current sequence
    pub fn total_units(&self) -> usize {
        self.total
    }

    /// Timers armed but not yet fired
    pub fn pending(&self) -> usize {
        self.timers.iter().filter(|timer| !timer.is_finished()).count()
    }

    /// Whether the current sequence has been fully disclosed
    pub fn is_complete(&self) -> bool {
        self.visible_count() == self.total
    }

    /// Watch the visible unit count as disclosures happen
    pub fn subscribe(&self) -> watch::Receiver<usize> {
        self.progress.subscribe()
    }

    /// Configured delay between units
    pub fn cadence(&self) -> Duration {
        self.cadence
    }

    fn cancel_timers(&mut self) -> usize {
        let mut cancelled = 0;
        for timer in self.timers.drain(..) {
            if !timer.is_finished() {
                cancelled += 1;
            }
            timer.abort();
        }
        cancelled
    }
}

impl Drop for RevealEngine {
    fn drop(&mut self) {
        self.cancel_timers();
    }
}

fn lock(state: &Mutex<RevealState>) -> MutexGuard<'_, RevealState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}
