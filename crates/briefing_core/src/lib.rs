use std::{sync::Arc, time::Duration};

use anyhow::Result;
use async_trait::async_trait;
use shared::domain::{Easing, SectionBounds, SectionId};
use tokio_util::sync::CancellationToken;

pub mod audio;
pub mod config;
pub mod controls;
pub mod intro;
pub mod orchestrator;
pub mod script;
pub mod scroll;
pub mod view;

pub use audio::{AudioEvent, AudioSession, CuePlayer, LoopGuard};
pub use config::{load_settings, Settings};
pub use controls::{IntroChoice, PageControls};
pub use intro::{IntroOutcome, IntroSequence};
pub use orchestrator::BriefingOrchestrator;
pub use script::{BriefingScript, BriefingStep, CueAnchor, ScheduledCue, StepAction};
pub use scroll::{AnimatedScroller, Viewport, VirtualPage};
pub use view::{follow_view_mode, ViewModeStore, ViewState};

/// Resolves symbolic sections to page offsets supplied by the host layout.
pub trait SectionLocator: Send + Sync {
    fn section_bounds(&self, section: SectionId) -> Option<SectionBounds>;
    fn viewport_height(&self) -> f64;
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollRequest {
    /// Start offset; the current viewport offset when `None`.
    pub from: Option<f64>,
    pub target: f64,
    pub duration: Duration,
    pub easing: Easing,
}

impl ScrollRequest {
    pub fn to(target: f64, duration: Duration, easing: Easing) -> Self {
        Self {
            from: None,
            target,
            duration,
            easing,
        }
    }

    pub fn between(from: f64, target: f64, duration: Duration, easing: Easing) -> Self {
        Self {
            from: Some(from),
            target,
            duration,
            easing,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollOutcome {
    Arrived,
    /// Cancelled mid-flight; the viewport stays wherever it was.
    Interrupted,
}

#[async_trait]
pub trait ScrollDriver: Send + Sync {
    async fn animate_scroll_to(
        &self,
        request: ScrollRequest,
        cancel: &CancellationToken,
    ) -> Result<ScrollOutcome>;
}

/// The external collaborators the orchestrator drives.
#[derive(Clone)]
pub struct BriefingDeps {
    pub locator: Arc<dyn SectionLocator>,
    pub scroller: Arc<dyn ScrollDriver>,
    pub view: Arc<dyn ViewModeStore>,
    pub cues: Arc<dyn CuePlayer>,
}
