//! The fixed briefing narrative as data.

use std::time::Duration;

use shared::{
    domain::{Cue, Easing, SectionId, ViewMode},
    error::BriefingError,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CueAnchor {
    /// Relative to the start of the step, before scrolling.
    Departure,
    /// Relative to arriving at the step's section.
    Arrival,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduledCue {
    pub cue: Cue,
    pub anchor: CueAnchor,
    pub delay: Duration,
}

impl ScheduledCue {
    pub fn on_departure(cue: Cue) -> Self {
        Self {
            cue,
            anchor: CueAnchor::Departure,
            delay: Duration::ZERO,
        }
    }

    pub fn on_arrival(cue: Cue) -> Self {
        Self {
            cue,
            anchor: CueAnchor::Arrival,
            delay: Duration::ZERO,
        }
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum StepAction {
    None,
    /// Lock on each label in turn while the data-stream loop plays.
    TargetScan {
        status: String,
        targets: Vec<String>,
    },
    /// Settle at the section top, then pan linearly down to its bottom.
    TimelinePan {
        settle: Duration,
        pan_status: String,
        pan_duration: Duration,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct BriefingStep {
    pub section: SectionId,
    pub scroll_duration: Duration,
    pub easing: Easing,
    pub status: String,
    pub view: Option<ViewMode>,
    pub cues: Vec<ScheduledCue>,
    pub hold: Duration,
    pub action: StepAction,
}

impl BriefingStep {
    pub fn new(section: SectionId, scroll_secs: f64, status: impl Into<String>) -> Self {
        Self {
            section,
            scroll_duration: Duration::from_secs_f64(scroll_secs),
            easing: Easing::EaseInOut,
            status: status.into(),
            view: None,
            cues: Vec::new(),
            hold: Duration::ZERO,
            action: StepAction::None,
        }
    }

    pub fn view(mut self, mode: ViewMode) -> Self {
        self.view = Some(mode);
        self
    }

    pub fn cue(mut self, cue: ScheduledCue) -> Self {
        self.cues.push(cue);
        self
    }

    pub fn hold_secs(mut self, secs: f64) -> Self {
        self.hold = Duration::from_secs_f64(secs);
        self
    }

    pub fn action(mut self, action: StepAction) -> Self {
        self.action = action;
        self
    }

    pub fn cues_at(&self, anchor: CueAnchor) -> impl Iterator<Item = &ScheduledCue> {
        self.cues.iter().filter(move |cue| cue.anchor == anchor)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BriefingScript {
    steps: Vec<BriefingStep>,
}

impl BriefingScript {
    pub fn new(steps: Vec<BriefingStep>) -> Result<Self, BriefingError> {
        let script = Self { steps };
        script.validate()?;
        Ok(script)
    }

    /// Baseline, global reveal, target scan, emissions, comparison,
    /// historical timeline pan, call to action.
    pub fn standard(targets: Vec<String>) -> Self {
        Self {
            steps: vec![
                BriefingStep::new(SectionId::Hero, 0.0, "ESTABLISHING BASELINE...")
                    .view(ViewMode::Corporate)
                    .hold_secs(3.0),
                BriefingStep::new(SectionId::Globe, 2.0, "SCANNING GLOBAL INFRASTRUCTURE...")
                    .cue(ScheduledCue::on_arrival(Cue::Scan))
                    .hold_secs(1.5),
                BriefingStep::new(SectionId::Globe, 0.0, "!!! ANOMALIES DETECTED !!!")
                    .cue(ScheduledCue::on_departure(Cue::Alarm))
                    .view(ViewMode::Forensic)
                    .hold_secs(3.0),
                BriefingStep::new(SectionId::Database, 1.5, "ACCESSING TARGET DATABASE...").action(
                    StepAction::TargetScan {
                        status: "IDENTIFYING HIGH VALUE TARGETS...".to_string(),
                        targets,
                    },
                ),
                BriefingStep::new(SectionId::Emissions, 2.0, "ANALYZING EMISSIONS DATA...")
                    .cue(ScheduledCue::on_departure(Cue::Scan))
                    .hold_secs(3.0),
                BriefingStep::new(SectionId::Comparison, 2.0, "VERIFYING CORPORATE CLAIMS...")
                    .hold_secs(4.0),
                BriefingStep::new(SectionId::Timeline, 1.5, "RECONSTRUCTING TIMELINE...")
                    .action(StepAction::TimelinePan {
                        settle: Duration::from_secs(1),
                        pan_status: "ANALYZING HISTORICAL DATA...".to_string(),
                        pan_duration: Duration::from_secs(15),
                    })
                    .hold_secs(1.0),
                BriefingStep::new(SectionId::CallToAction, 2.0, "MISSION BRIEFING COMPLETE")
                    .cue(ScheduledCue::on_departure(Cue::Success))
                    .hold_secs(2.0),
            ],
        }
    }

    pub fn validate(&self) -> Result<(), BriefingError> {
        if self.steps.is_empty() {
            return Err(BriefingError::InvalidScript(
                "script has no steps".to_string(),
            ));
        }
        for (index, step) in self.steps.iter().enumerate() {
            if let StepAction::TargetScan { targets, .. } = &step.action {
                if targets.is_empty() {
                    return Err(BriefingError::InvalidScript(format!(
                        "step {index} scans an empty target list"
                    )));
                }
            }
        }
        Ok(())
    }

    /// Every duration multiplied by `factor`; a factor of 0.5 plays twice as fast.
    pub fn scaled(&self, factor: f64) -> Self {
        let scale = |duration: Duration| scale_duration(duration, factor);
        let steps = self
            .steps
            .iter()
            .map(|step| {
                let mut step = step.clone();
                step.scroll_duration = scale(step.scroll_duration);
                step.hold = scale(step.hold);
                for cue in &mut step.cues {
                    cue.delay = scale(cue.delay);
                }
                if let StepAction::TimelinePan {
                    settle,
                    pan_duration,
                    ..
                } = &mut step.action
                {
                    *settle = scale(*settle);
                    *pan_duration = scale(*pan_duration);
                }
                step
            })
            .collect();
        Self { steps }
    }

    /// Uninterrupted run time, given the longest per-target scan interval.
    pub fn nominal_duration(&self, scan_interval: Duration) -> Duration {
        self.steps
            .iter()
            .map(|step| {
                let action = match &step.action {
                    StepAction::None => Duration::ZERO,
                    StepAction::TargetScan { targets, .. } => {
                        scan_interval * u32::try_from(targets.len()).unwrap_or(u32::MAX)
                    }
                    StepAction::TimelinePan {
                        settle,
                        pan_duration,
                        ..
                    } => *settle + *pan_duration,
                };
                step.scroll_duration + action + step.hold
            })
            .sum()
    }

    pub fn steps(&self) -> &[BriefingStep] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

/// `duration * factor`, saturating at `Duration::MAX` instead of panicking on
/// overflow. Negative or NaN products collapse to zero.
pub fn scale_duration(duration: Duration, factor: f64) -> Duration {
    let secs = duration.as_secs_f64() * factor;
    if secs.is_nan() || secs <= 0.0 {
        return Duration::ZERO;
    }
    Duration::try_from_secs_f64(secs).unwrap_or(Duration::MAX)
}

#[cfg(test)]
#[path = "tests/script_tests.rs"]
mod tests;
