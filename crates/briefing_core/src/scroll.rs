//! Smooth scrolling over an abstract viewport, and an in-memory page to run it against.

use std::{
    sync::{Arc, Mutex, PoisonError},
    time::Duration,
};

use anyhow::{bail, Result};
use async_trait::async_trait;
use shared::domain::{SectionBounds, SectionId};
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::{ScrollDriver, ScrollOutcome, ScrollRequest, SectionLocator};

pub const DEFAULT_FRAME_INTERVAL: Duration = Duration::from_millis(16);

pub trait Viewport: Send + Sync {
    fn scroll_offset(&self) -> f64;
    fn set_scroll_offset(&self, offset: f64);
}

/// Frame-stepped scroll animation. Each frame is raced against the cancel token,
/// so abort latency is at most one frame.
pub struct AnimatedScroller<V: Viewport> {
    viewport: Arc<V>,
    frame_interval: Duration,
}

impl<V: Viewport> AnimatedScroller<V> {
    pub fn new(viewport: Arc<V>) -> Self {
        Self::with_frame_interval(viewport, DEFAULT_FRAME_INTERVAL)
    }

    pub fn with_frame_interval(viewport: Arc<V>, frame_interval: Duration) -> Self {
        Self {
            viewport,
            frame_interval: frame_interval.max(Duration::from_millis(1)),
        }
    }

    pub fn viewport(&self) -> &Arc<V> {
        &self.viewport
    }
}

#[async_trait]
impl<V: Viewport + 'static> ScrollDriver for AnimatedScroller<V> {
    async fn animate_scroll_to(
        &self,
        request: ScrollRequest,
        cancel: &CancellationToken,
    ) -> Result<ScrollOutcome> {
        if !request.target.is_finite() || request.from.is_some_and(|from| !from.is_finite()) {
            bail!(
                "non-finite scroll request from {:?} to {}",
                request.from,
                request.target
            );
        }
        if cancel.is_cancelled() {
            return Ok(ScrollOutcome::Interrupted);
        }
        if request.duration.is_zero() {
            self.viewport.set_scroll_offset(request.target);
            return Ok(ScrollOutcome::Arrived);
        }

        let start = request
            .from
            .unwrap_or_else(|| self.viewport.scroll_offset());
        let distance = request.target - start;
        let total = request.duration.as_secs_f64();
        let begun = Instant::now();

        let mut frames = tokio::time::interval(self.frame_interval);
        frames.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                biased;
                () = cancel.cancelled() => return Ok(ScrollOutcome::Interrupted),
                _ = frames.tick() => {}
            }

            let progress = begun.elapsed().as_secs_f64() / total;
            if progress >= 1.0 {
                self.viewport.set_scroll_offset(request.target);
                return Ok(ScrollOutcome::Arrived);
            }
            self.viewport
                .set_scroll_offset(start + distance * request.easing.apply(progress));
        }
    }
}

/// A page made of stacked sections and a fixed-height viewport.
pub struct VirtualPage {
    sections: Vec<(SectionId, SectionBounds)>,
    viewport_height: f64,
    offset: Mutex<f64>,
}

impl VirtualPage {
    /// Stacks sections top to bottom in the given order.
    pub fn stacked(viewport_height: f64, heights: &[(SectionId, f64)]) -> Self {
        let mut top = 0.0;
        let sections = heights
            .iter()
            .map(|&(section, height)| {
                let bounds = SectionBounds { top, height };
                top += height;
                (section, bounds)
            })
            .collect();

        Self {
            sections,
            viewport_height,
            offset: Mutex::new(0.0),
        }
    }

    /// Proportions of the exposé page: full-screen panels, a long database wall
    /// and a timeline several screens tall.
    pub fn standard(viewport_height: f64) -> Self {
        let vh = viewport_height;
        Self::stacked(
            vh,
            &[
                (SectionId::Hero, vh),
                (SectionId::Globe, vh),
                (SectionId::Database, vh * 2.5),
                (SectionId::Emissions, vh * 1.5),
                (SectionId::Comparison, vh),
                (SectionId::Timeline, vh * 4.0),
                (SectionId::CallToAction, vh * 0.6),
            ],
        )
    }

    pub fn page_height(&self) -> f64 {
        self.sections
            .last()
            .map(|(_, bounds)| bounds.bottom())
            .unwrap_or_default()
    }

    pub fn max_scroll(&self) -> f64 {
        (self.page_height() - self.viewport_height).max(0.0)
    }

    /// Fraction of the page scrolled, in `[0, 1]`.
    pub fn progress(&self) -> f64 {
        let max = self.max_scroll();
        if max <= 0.0 {
            return 0.0;
        }
        self.scroll_offset() / max
    }

    /// The section occupying the top edge of the viewport.
    pub fn section_at_top(&self) -> Option<SectionId> {
        let offset = self.scroll_offset();
        self.sections
            .iter()
            .rev()
            .find(|(_, bounds)| bounds.top <= offset)
            .map(|(section, _)| *section)
    }
}

impl Viewport for VirtualPage {
    fn scroll_offset(&self) -> f64 {
        *self.offset.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn set_scroll_offset(&self, offset: f64) {
        let clamped = offset.clamp(0.0, self.max_scroll());
        *self.offset.lock().unwrap_or_else(PoisonError::into_inner) = clamped;
    }
}

impl SectionLocator for VirtualPage {
    fn section_bounds(&self, section: SectionId) -> Option<SectionBounds> {
        self.sections
            .iter()
            .find(|(candidate, _)| *candidate == section)
            .map(|(_, bounds)| *bounds)
    }

    fn viewport_height(&self) -> f64 {
        self.viewport_height
    }
}

#[cfg(test)]
#[path = "tests/scroll_tests.rs"]
mod tests;
