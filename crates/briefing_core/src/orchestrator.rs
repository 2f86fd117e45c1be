//! The briefing autopilot.
//!
//! One run at a time. The script executes in its own task and suspends only
//! on scroll animations and timed holds, each raced against the run's
//! cancellation token. Whatever ends the script (completion, abort, a
//! collaborator error, a panic) the supervising task runs the same cleanup:
//! clear the target lock and post the manual-control message, stop the
//! data-stream loop, then clear the message after a short delay.

use std::{
    sync::{Arc, Mutex, MutexGuard, PoisonError},
    time::Duration,
};

use chrono::Utc;
use rand::Rng;
use shared::{
    domain::{Cue, Easing, LoopCue, RunId, SectionId},
    error::{BriefingError, BriefingFault, ErrorCode},
    protocol::{BriefingCommand, BriefingPhase, BriefingSnapshot, StopReason},
};
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::{
    audio::LoopGuard,
    config::Settings,
    script::{BriefingScript, BriefingStep, CueAnchor, StepAction},
    BriefingDeps, ScrollOutcome, ScrollRequest,
};

struct ActiveRun {
    run_id: RunId,
    cancel: CancellationToken,
}

#[derive(Debug, Clone, Copy)]
struct Timing {
    scan_min: Duration,
    scan_max: Duration,
    completion_clear: Duration,
    override_clear: Duration,
}

impl Timing {
    fn from_settings(settings: &Settings) -> Self {
        let (scan_min, scan_max) = settings.scan_interval_range();
        Self {
            scan_min,
            scan_max,
            completion_clear: settings.completion_clear_delay(),
            override_clear: settings.override_clear_delay(),
        }
    }

    /// Uniform in `[scan_min, scan_max)`.
    fn next_scan_interval(&self) -> Duration {
        if self.scan_max <= self.scan_min {
            return self.scan_min;
        }
        let min = u64::try_from(self.scan_min.as_nanos()).unwrap_or(u64::MAX);
        let max = u64::try_from(self.scan_max.as_nanos()).unwrap_or(u64::MAX);
        Duration::from_nanos(rand::rng().random_range(min..max))
    }

    fn clear_delay(&self, reason: StopReason) -> Duration {
        match reason {
            StopReason::Completed => self.completion_clear,
            StopReason::UserAbort | StopReason::Failed => self.override_clear,
        }
    }
}

pub struct BriefingOrchestrator {
    deps: BriefingDeps,
    script: BriefingScript,
    timing: Timing,
    state: watch::Sender<BriefingSnapshot>,
    active: Mutex<Option<ActiveRun>>,
}

impl BriefingOrchestrator {
    /// `script` is played at `settings.time_scale`.
    pub fn new(
        deps: BriefingDeps,
        script: BriefingScript,
        settings: &Settings,
    ) -> Result<Arc<Self>, BriefingError> {
        script.validate()?;
        settings.validate()?;
        let (state, _) = watch::channel(BriefingSnapshot::default());
        Ok(Arc::new(Self {
            deps,
            script: script.scaled(settings.time_scale),
            timing: Timing::from_settings(settings),
            state,
            active: Mutex::new(None),
        }))
    }

    /// The standard narrative over the configured scan targets.
    pub fn standard(deps: BriefingDeps, settings: &Settings) -> Result<Arc<Self>, BriefingError> {
        let script = BriefingScript::standard(settings.scan_targets.clone());
        Self::new(deps, script, settings)
    }

    /// Begins a run and returns immediately. Returns `false` without side
    /// effects if a run is already active.
    pub fn start(self: &Arc<Self>) -> bool {
        let mut active = self.lock_active();
        if active.is_some() {
            debug!("briefing already running; start ignored");
            return false;
        }

        let run_id = RunId::new();
        let cancel = CancellationToken::new();
        *active = Some(ActiveRun {
            run_id,
            cancel: cancel.clone(),
        });
        self.publish(|s| {
            s.phase = BriefingPhase::Running;
            s.running = true;
            s.run_id = Some(run_id);
            s.status_text.clear();
            s.scan_target = None;
            s.last_stop = None;
            s.fault = None;
        });
        drop(active);

        info!(%run_id, steps = self.script.len(), "briefing started");
        let this = Arc::clone(self);
        tokio::spawn(async move { this.supervise(run_id, cancel).await });
        true
    }

    /// Requests the active run to stop at its current suspension point.
    /// Returns `false` (and does nothing) when no run is active.
    pub fn abort(&self) -> bool {
        let active = self.lock_active();
        match active.as_ref() {
            Some(run) if !run.cancel.is_cancelled() => {
                info!(run_id = %run.run_id, "briefing abort requested");
                run.cancel.cancel();
                true
            }
            _ => false,
        }
    }

    pub fn handle(self: &Arc<Self>, command: BriefingCommand) -> bool {
        match command {
            BriefingCommand::Start => self.start(),
            BriefingCommand::Abort => self.abort(),
        }
    }

    pub fn is_running(&self) -> bool {
        self.lock_active().is_some()
    }

    pub fn snapshot(&self) -> BriefingSnapshot {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<BriefingSnapshot> {
        self.state.subscribe()
    }

    pub fn script(&self) -> &BriefingScript {
        &self.script
    }

    /// Resolves once no run is active.
    pub async fn wait_stopped(&self) {
        let mut rx = self.subscribe();
        let _ = rx.wait_for(|s| !s.running).await;
    }

    /// Resolves once the status has been cleared and the phase is back to idle.
    pub async fn wait_idle(&self) {
        let mut rx = self.subscribe();
        let _ = rx
            .wait_for(|s| s.phase == BriefingPhase::Idle && !s.running)
            .await;
    }

    async fn supervise(self: Arc<Self>, run_id: RunId, cancel: CancellationToken) {
        let script_task = {
            let this = Arc::clone(&self);
            let cancel = cancel.clone();
            tokio::spawn(async move { this.run_script(&cancel).await })
        };

        let (reason, fault) = match script_task.await {
            Ok(Ok(())) => (StopReason::Completed, None),
            Ok(Err(BriefingError::Interrupted { reason })) => {
                info!(%run_id, %reason, "briefing interrupted");
                (StopReason::UserAbort, None)
            }
            Ok(Err(err)) => {
                warn!(%run_id, error = %err, "briefing failed");
                (StopReason::Failed, Some(BriefingFault::from(&err)))
            }
            Err(join_err) => {
                error!(%run_id, error = %join_err, "briefing task panicked");
                (
                    StopReason::Failed,
                    Some(BriefingFault::new(ErrorCode::Interrupted, join_err.to_string())),
                )
            }
        };
        cancel.cancel();

        self.finish(run_id, reason, fault).await;
    }

    async fn finish(&self, run_id: RunId, reason: StopReason, fault: Option<BriefingFault>) {
        {
            let mut active = self.lock_active();
            self.publish(|s| {
                s.phase = reason.phase();
                s.running = false;
                s.status_text = reason.status_message().to_string();
                s.scan_target = None;
                s.last_stop = Some(reason);
                s.fault = fault;
            });
            if active.as_ref().is_some_and(|run| run.run_id == run_id) {
                *active = None;
            }
        }
        // `active` is already released; a panicking cue player only loses the
        // delayed clear below.
        self.deps.cues.stop_loop(LoopCue::DataStream);
        self.deps.cues.play_one_shot(Cue::Scan);
        info!(%run_id, ?reason, "briefing stopped; manual control engaged");

        tokio::time::sleep(self.timing.clear_delay(reason)).await;
        self.state.send_if_modified(|s| {
            if s.running || s.run_id != Some(run_id) {
                return false;
            }
            s.status_text.clear();
            s.phase = BriefingPhase::Idle;
            s.updated_at = Utc::now();
            true
        });
    }

    async fn run_script(&self, cancel: &CancellationToken) -> Result<(), BriefingError> {
        for (index, step) in self.script.steps().iter().enumerate() {
            ensure_live(cancel)?;
            debug!(step = index, section = %step.section, status = %step.status, "briefing step");
            self.run_step(step, cancel).await?;
        }
        Ok(())
    }

    /// status, departure cues, scroll, arrival cues, step action, hold.
    async fn run_step(
        &self,
        step: &BriefingStep,
        cancel: &CancellationToken,
    ) -> Result<(), BriefingError> {
        self.set_status(&step.status);
        if let Some(mode) = step.view {
            self.deps.view.set_view_mode(mode);
        }
        self.fire_cues(step, CueAnchor::Departure);

        let data_stream = matches!(step.action, StepAction::TargetScan { .. })
            .then(|| LoopGuard::acquire(Arc::clone(&self.deps.cues), LoopCue::DataStream));

        self.scroll_to_section(step.section, step.scroll_duration, step.easing, cancel)
            .await?;
        self.fire_cues(step, CueAnchor::Arrival);

        match &step.action {
            StepAction::None => {}
            StepAction::TargetScan { status, targets } => {
                self.scan_targets(status, targets, data_stream, cancel)
                    .await?;
            }
            StepAction::TimelinePan {
                settle,
                pan_status,
                pan_duration,
            } => {
                self.pan_section(step.section, *settle, pan_status, *pan_duration, cancel)
                    .await?;
            }
        }

        self.hold(step.hold, cancel).await
    }

    async fn scan_targets(
        &self,
        status: &str,
        targets: &[String],
        data_stream: Option<LoopGuard>,
        cancel: &CancellationToken,
    ) -> Result<(), BriefingError> {
        self.set_status(status);
        let result: Result<(), BriefingError> = async {
            for target in targets {
                self.set_scan_target(Some(target.clone()));
                self.deps.cues.play_one_shot(Cue::Acquire);
                debug!(%target, "target locked");
                self.hold(self.timing.next_scan_interval(), cancel).await?;
            }
            Ok(())
        }
        .await;

        self.set_scan_target(None);
        if let Some(guard) = data_stream {
            guard.release();
        }
        result
    }

    async fn pan_section(
        &self,
        section: SectionId,
        settle: Duration,
        pan_status: &str,
        pan_duration: Duration,
        cancel: &CancellationToken,
    ) -> Result<(), BriefingError> {
        self.hold(settle, cancel).await?;

        let Some(bounds) = self.deps.locator.section_bounds(section) else {
            warn!(%section, "section missing from layout; skipping pan");
            return Ok(());
        };
        self.set_status(pan_status);
        let end = bounds.pan_end(self.deps.locator.viewport_height());
        self.scroll(
            ScrollRequest::between(bounds.top, end, pan_duration, Easing::Linear),
            cancel,
        )
        .await
    }

    async fn scroll_to_section(
        &self,
        section: SectionId,
        duration: Duration,
        easing: Easing,
        cancel: &CancellationToken,
    ) -> Result<(), BriefingError> {
        let Some(bounds) = self.deps.locator.section_bounds(section) else {
            warn!(%section, "section missing from layout; skipping scroll");
            return Ok(());
        };
        self.scroll(ScrollRequest::to(bounds.top, duration, easing), cancel)
            .await
    }

    async fn scroll(
        &self,
        request: ScrollRequest,
        cancel: &CancellationToken,
    ) -> Result<(), BriefingError> {
        ensure_live(cancel)?;
        match self.deps.scroller.animate_scroll_to(request, cancel).await {
            Ok(ScrollOutcome::Arrived) => Ok(()),
            Ok(ScrollOutcome::Interrupted) => {
                Err(BriefingError::interrupted("abort observed during scroll"))
            }
            Err(source) => Err(BriefingError::Collaborator {
                collaborator: "scroll driver",
                source,
            }),
        }
    }

    async fn hold(&self, duration: Duration, cancel: &CancellationToken) -> Result<(), BriefingError> {
        if duration.is_zero() {
            return ensure_live(cancel);
        }
        tokio::select! {
            biased;
            () = cancel.cancelled() => Err(BriefingError::interrupted("abort observed during hold")),
            () = tokio::time::sleep(duration) => Ok(()),
        }
    }

    /// Cues are fire-and-forget: delayed ones outlive an abort.
    fn fire_cues(&self, step: &BriefingStep, anchor: CueAnchor) {
        for scheduled in step.cues_at(anchor) {
            if scheduled.delay.is_zero() {
                self.deps.cues.play_one_shot(scheduled.cue);
                continue;
            }
            let cues = Arc::clone(&self.deps.cues);
            let (cue, delay) = (scheduled.cue, scheduled.delay);
            tokio::spawn(async move {
                tokio::time::sleep(delay).await;
                cues.play_one_shot(cue);
            });
        }
    }

    fn set_status(&self, status: &str) {
        self.publish(|s| {
            s.status_text.clear();
            s.status_text.push_str(status);
        });
    }

    fn set_scan_target(&self, target: Option<String>) {
        self.publish(|s| s.scan_target = target);
    }

    fn publish(&self, update: impl FnOnce(&mut BriefingSnapshot)) {
        self.state.send_modify(|s| {
            update(s);
            s.updated_at = Utc::now();
        });
    }

    fn lock_active(&self) -> MutexGuard<'_, Option<ActiveRun>> {
        self.active.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn ensure_live(cancel: &CancellationToken) -> Result<(), BriefingError> {
    if cancel.is_cancelled() {
        return Err(BriefingError::interrupted("abort requested"));
    }
    Ok(())
}

#[cfg(test)]
#[path = "tests/orchestrator_tests.rs"]
mod tests;
