//! Cue playback. `AudioSession` is the owned session object the page creates
//! once and tears down on exit; nothing here is process-global.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use shared::domain::{Cue, LoopCue, ViewMode};
use tokio::sync::broadcast;
use tracing::{debug, info};

const CUE_LOG_CAPACITY: usize = 256;
const MASTER_GAIN: f32 = 0.4;

/// Fire-and-forget cue playback. Nothing here blocks.
pub trait CuePlayer: Send + Sync {
    fn play_one_shot(&self, cue: Cue);
    fn start_loop(&self, cue: LoopCue);
    fn stop_loop(&self, cue: LoopCue);
    fn set_mode(&self, _mode: ViewMode) {}
}

/// A started loop cue, stopped when the guard is released or dropped.
pub struct LoopGuard {
    player: Arc<dyn CuePlayer>,
    cue: LoopCue,
    released: bool,
}

impl LoopGuard {
    pub fn acquire(player: Arc<dyn CuePlayer>, cue: LoopCue) -> Self {
        player.start_loop(cue);
        Self {
            player,
            cue,
            released: false,
        }
    }

    pub fn release(mut self) {
        self.stop();
    }

    fn stop(&mut self) {
        if !self.released {
            self.released = true;
            self.player.stop_loop(self.cue);
        }
    }
}

impl Drop for LoopGuard {
    fn drop(&mut self) {
        self.stop();
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum AudioEvent {
    Opened,
    OneShot(Cue),
    LoopStarted(LoopCue),
    LoopStopped(LoopCue),
    DroneRetuned { mode: ViewMode, frequencies: [f32; 3] },
    Closed,
}

/// Drone oscillator frequencies in Hz for a narrative mode.
pub fn drone_tuning(mode: ViewMode) -> [f32; 3] {
    match mode {
        ViewMode::Corporate => [55.0, 55.2, 27.5],
        ViewMode::Forensic => [58.0, 55.0, 110.0],
    }
}

struct AudioState {
    open: bool,
    mode: ViewMode,
    drone: [f32; 3],
    active_loop: Option<LoopCue>,
    cue_log: Vec<Cue>,
}

pub struct AudioSession {
    state: Mutex<AudioState>,
    events: broadcast::Sender<AudioEvent>,
}

impl Default for AudioSession {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioSession {
    /// Creates a closed session. Cues are ignored until `open`.
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(64);
        Self {
            state: Mutex::new(AudioState {
                open: false,
                mode: ViewMode::Corporate,
                drone: drone_tuning(ViewMode::Corporate),
                active_loop: None,
                cue_log: Vec::new(),
            }),
            events,
        }
    }

    /// Starts the ambient drone. Idempotent.
    pub fn open(&self) {
        let mut state = self.lock();
        if state.open {
            return;
        }
        state.open = true;
        state.drone = drone_tuning(state.mode);
        info!(master_gain = MASTER_GAIN, mode = state.mode.as_str(), "audio session opened");
        drop(state);
        let _ = self.events.send(AudioEvent::Opened);
    }

    /// Stops any loop and the drone. Later calls are no-ops until reopened.
    pub fn close(&self) {
        let mut state = self.lock();
        if !state.open {
            return;
        }
        let active_loop = state.active_loop.take();
        state.open = false;
        drop(state);

        if let Some(cue) = active_loop {
            let _ = self.events.send(AudioEvent::LoopStopped(cue));
        }
        info!("audio session closed");
        let _ = self.events.send(AudioEvent::Closed);
    }

    pub fn is_open(&self) -> bool {
        self.lock().open
    }

    pub fn mode(&self) -> ViewMode {
        self.lock().mode
    }

    pub fn drone_frequencies(&self) -> [f32; 3] {
        self.lock().drone
    }

    pub fn active_loop(&self) -> Option<LoopCue> {
        self.lock().active_loop
    }

    /// One-shots played since the session was created, oldest first.
    pub fn cue_log(&self) -> Vec<Cue> {
        self.lock().cue_log.clone()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<AudioEvent> {
        self.events.subscribe()
    }

    fn lock(&self) -> MutexGuard<'_, AudioState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl CuePlayer for AudioSession {
    fn play_one_shot(&self, cue: Cue) {
        let mut state = self.lock();
        if !state.open {
            return;
        }
        if state.cue_log.len() == CUE_LOG_CAPACITY {
            state.cue_log.remove(0);
        }
        state.cue_log.push(cue);
        drop(state);

        debug!(%cue, "cue");
        let _ = self.events.send(AudioEvent::OneShot(cue));
    }

    fn start_loop(&self, cue: LoopCue) {
        let mut state = self.lock();
        if !state.open || state.active_loop.is_some() {
            return;
        }
        state.active_loop = Some(cue);
        drop(state);

        debug!(%cue, "loop started");
        let _ = self.events.send(AudioEvent::LoopStarted(cue));
    }

    fn stop_loop(&self, cue: LoopCue) {
        let mut state = self.lock();
        if state.active_loop != Some(cue) {
            return;
        }
        state.active_loop = None;
        drop(state);

        debug!(%cue, "loop stopped");
        let _ = self.events.send(AudioEvent::LoopStopped(cue));
    }

    fn set_mode(&self, mode: ViewMode) {
        let mut state = self.lock();
        state.mode = mode;
        if !state.open {
            return;
        }
        let frequencies = drone_tuning(mode);
        if state.drone == frequencies {
            return;
        }
        state.drone = frequencies;
        drop(state);

        let _ = self
            .events
            .send(AudioEvent::DroneRetuned { mode, frequencies });
    }
}

#[cfg(test)]
#[path = "tests/audio_tests.rs"]
mod tests;
