//! The cinematic intro that precedes the briefing.

use std::{sync::Arc, time::Duration};

use shared::domain::Cue;
use tokio::{sync::watch, time::Instant};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::{
    audio::{AudioSession, CuePlayer},
    config::MAX_TIME_SCALE,
    script::scale_duration,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntroPhase {
    pub index: u8,
    pub at: Duration,
    pub cue: Option<Cue>,
}

const fn phase(index: u8, at_ms: u64, cue: Option<Cue>) -> IntroPhase {
    IntroPhase {
        index,
        at: Duration::from_millis(at_ms),
        cue,
    }
}

pub const INTRO_TIMELINE: [IntroPhase; 10] = [
    phase(0, 0, Some(Cue::Glitch)),
    phase(1, 4_000, Some(Cue::Scan)),
    phase(2, 8_000, Some(Cue::Success)),
    phase(3, 13_000, Some(Cue::Scan)),
    phase(4, 18_000, Some(Cue::Glitch)),
    phase(5, 23_000, Some(Cue::Glitch)),
    phase(6, 28_000, None),
    phase(7, 34_000, Some(Cue::Alarm)),
    phase(8, 38_000, Some(Cue::Success)),
    phase(9, 45_000, None),
];

/// From this phase on the viewer may commence the briefing or review manually.
pub const CHOICE_PHASE: u8 = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntroOutcome {
    Finished,
    Skipped { at_phase: u8 },
}

pub struct IntroSequence {
    audio: Arc<AudioSession>,
    time_scale: f64,
    phase: watch::Sender<Option<u8>>,
}

impl IntroSequence {
    /// `time_scale` is clamped to the range settings accept.
    pub fn new(audio: Arc<AudioSession>, time_scale: f64) -> Self {
        let (phase, _) = watch::channel(None);
        Self {
            audio,
            time_scale: time_scale.clamp(0.0, MAX_TIME_SCALE),
            phase,
        }
    }

    /// The current phase index; `None` before the intro starts.
    pub fn subscribe(&self) -> watch::Receiver<Option<u8>> {
        self.phase.subscribe()
    }

    pub fn current_phase(&self) -> Option<u8> {
        *self.phase.borrow()
    }

    pub fn choices_available(&self) -> bool {
        self.current_phase()
            .is_some_and(|index| index >= CHOICE_PHASE)
    }

    /// Opens the audio session and walks the timeline, firing each phase's cue
    /// on entry. Cancelling `skip` ends the intro at the current phase.
    pub async fn play(&self, skip: &CancellationToken) -> IntroOutcome {
        self.audio.open();
        let begun = Instant::now();
        info!("intro started");

        for entry in INTRO_TIMELINE {
            let due = begun + scale_duration(entry.at, self.time_scale);
            tokio::select! {
                biased;
                () = skip.cancelled() => {
                    let at_phase = self.current_phase().unwrap_or_default();
                    info!(at_phase, "intro skipped");
                    return IntroOutcome::Skipped { at_phase };
                }
                () = tokio::time::sleep_until(due) => {}
            }

            self.phase.send_replace(Some(entry.index));
            if let Some(cue) = entry.cue {
                self.audio.play_one_shot(cue);
            }
            debug!(phase = entry.index, "intro phase");
        }

        info!("intro finished");
        IntroOutcome::Finished
    }
}

#[cfg(test)]
#[path = "tests/intro_tests.rs"]
mod tests;
