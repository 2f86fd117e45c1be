//! Viewer-initiated page actions outside the scripted briefing.

use std::{sync::Arc, time::Duration};

use serde::{Deserialize, Serialize};
use shared::{
    domain::{Cue, Easing, SectionId, ViewMode},
    error::BriefingError,
};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::{orchestrator::BriefingOrchestrator, BriefingDeps, ScrollOutcome, ScrollRequest};

const REVIEW_SCROLL: Duration = Duration::from_millis(1500);

/// The two ways out of the intro.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntroChoice {
    CommenceBriefing,
    ManualReview,
}

pub struct PageControls {
    orchestrator: Arc<BriefingOrchestrator>,
    deps: BriefingDeps,
}

impl PageControls {
    pub fn new(orchestrator: Arc<BriefingOrchestrator>, deps: BriefingDeps) -> Self {
        Self { orchestrator, deps }
    }

    pub fn orchestrator(&self) -> &Arc<BriefingOrchestrator> {
        &self.orchestrator
    }

    /// Returns whether the briefing was started.
    pub fn choose(&self, choice: IntroChoice) -> bool {
        info!(?choice, "intro choice");
        match choice {
            IntroChoice::CommenceBriefing => self.orchestrator.start(),
            IntroChoice::ManualReview => {
                self.deps.cues.play_one_shot(Cue::Click);
                false
            }
        }
    }

    /// Flips between corporate and forensic. Ignored while a briefing runs.
    pub fn toggle_view(&self) -> Option<ViewMode> {
        if self.orchestrator.is_running() {
            debug!("view toggle ignored during briefing");
            return None;
        }
        let mode = self.deps.view.view_mode().toggled();
        self.deps.view.set_view_mode(mode);
        self.deps.cues.play_one_shot(Cue::Click);
        Some(mode)
    }

    /// Scrolls to the evidence database. Runs on its own token, so aborting
    /// a briefing never cuts it short.
    pub async fn review_data(&self) -> Result<ScrollOutcome, BriefingError> {
        let section = SectionId::Database;
        let bounds = self
            .deps
            .locator
            .section_bounds(section)
            .ok_or(BriefingError::SectionUnavailable { section })?;
        self.deps.cues.play_one_shot(Cue::Click);
        self.deps
            .scroller
            .animate_scroll_to(
                ScrollRequest::to(bounds.top, REVIEW_SCROLL, Easing::EaseInOut),
                &CancellationToken::new(),
            )
            .await
            .map_err(|source| BriefingError::Collaborator {
                collaborator: "scroll driver",
                source,
            })
    }
}

#[cfg(test)]
#[path = "tests/controls_tests.rs"]
mod tests;
