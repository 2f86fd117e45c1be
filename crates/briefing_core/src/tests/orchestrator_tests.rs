use super::*;
use crate::{
    audio::CuePlayer,
    script::ScheduledCue,
    scroll::{AnimatedScroller, Viewport, VirtualPage},
    view::{ViewModeStore, ViewState},
    ScrollDriver, SectionLocator,
};
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use shared::{
    dataset::scan_labels,
    domain::ViewMode,
    protocol::{MANUAL_CONTROL_ENGAGED, MANUAL_OVERRIDE},
};
use tokio::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CueCall {
    OneShot(Cue),
    LoopStart(LoopCue),
    LoopStop(LoopCue),
}

#[derive(Default)]
struct RecordingCues {
    calls: Mutex<Vec<CueCall>>,
    loop_active: Mutex<bool>,
}

impl RecordingCues {
    fn calls(&self) -> Vec<CueCall> {
        self.calls.lock().expect("calls").clone()
    }

    fn one_shots(&self, cue: Cue) -> usize {
        self.calls()
            .iter()
            .filter(|call| **call == CueCall::OneShot(cue))
            .count()
    }

    fn loop_active(&self) -> bool {
        *self.loop_active.lock().expect("loop flag")
    }
}

impl CuePlayer for RecordingCues {
    fn play_one_shot(&self, cue: Cue) {
        self.calls.lock().expect("calls").push(CueCall::OneShot(cue));
    }

    fn start_loop(&self, cue: LoopCue) {
        *self.loop_active.lock().expect("loop flag") = true;
        self.calls.lock().expect("calls").push(CueCall::LoopStart(cue));
    }

    fn stop_loop(&self, cue: LoopCue) {
        *self.loop_active.lock().expect("loop flag") = false;
        self.calls.lock().expect("calls").push(CueCall::LoopStop(cue));
    }
}

#[derive(Clone, Copy)]
enum Fault {
    Error,
    Panic,
}

/// Takes the requested duration on the virtual clock and records every request.
#[derive(Default)]
struct RecordingScroller {
    requests: Mutex<Vec<ScrollRequest>>,
    fail_on_call: Option<(usize, Fault)>,
}

impl RecordingScroller {
    fn failing_on(call: usize, fault: Fault) -> Self {
        Self {
            requests: Mutex::new(Vec::new()),
            fail_on_call: Some((call, fault)),
        }
    }

    fn requests(&self) -> Vec<ScrollRequest> {
        self.requests.lock().expect("requests").clone()
    }
}

#[async_trait]
impl ScrollDriver for RecordingScroller {
    async fn animate_scroll_to(
        &self,
        request: ScrollRequest,
        cancel: &CancellationToken,
    ) -> Result<ScrollOutcome> {
        let call = {
            let mut requests = self.requests.lock().expect("requests");
            requests.push(request);
            requests.len() - 1
        };
        match self.fail_on_call {
            Some((failing, Fault::Error)) if failing == call => {
                return Err(anyhow!("viewport detached"));
            }
            Some((failing, Fault::Panic)) if failing == call => {
                panic!("scroll driver exploded");
            }
            _ => {}
        }

        tokio::select! {
            biased;
            () = cancel.cancelled() => Ok(ScrollOutcome::Interrupted),
            () = tokio::time::sleep(request.duration) => Ok(ScrollOutcome::Arrived),
        }
    }
}

struct Harness {
    orchestrator: Arc<BriefingOrchestrator>,
    page: Arc<VirtualPage>,
    scroller: Arc<RecordingScroller>,
    cues: Arc<RecordingCues>,
    view: Arc<ViewState>,
}

fn harness_with(page: VirtualPage, scroller: RecordingScroller, script: BriefingScript) -> Harness {
    let page = Arc::new(page);
    let scroller = Arc::new(scroller);
    let cues = Arc::new(RecordingCues::default());
    let view = Arc::new(ViewState::default());
    let deps = BriefingDeps {
        locator: page.clone(),
        scroller: scroller.clone(),
        view: view.clone(),
        cues: cues.clone(),
    };
    let orchestrator =
        BriefingOrchestrator::new(deps, script, &Settings::default()).expect("orchestrator");
    Harness {
        orchestrator,
        page,
        scroller,
        cues,
        view,
    }
}

fn harness() -> Harness {
    harness_with(
        VirtualPage::standard(1000.0),
        RecordingScroller::default(),
        BriefingScript::standard(scan_labels()),
    )
}

const STANDARD_SCROLLS: usize = 9;

#[tokio::test(start_paused = true)]
async fn uninterrupted_run_completes_and_returns_to_idle() {
    let h = harness();
    let started = Instant::now();

    assert!(h.orchestrator.start());
    assert!(h.orchestrator.is_running());
    h.orchestrator.wait_stopped().await;
    let elapsed = started.elapsed();

    let snapshot = h.orchestrator.snapshot();
    assert_eq!(snapshot.phase, BriefingPhase::Completed);
    assert!(!snapshot.running);
    assert_eq!(snapshot.status_text, MANUAL_CONTROL_ENGAGED);
    assert_eq!(snapshot.last_stop, Some(StopReason::Completed));
    assert_eq!(snapshot.scan_target, None);
    assert!(!h.orchestrator.is_running());

    assert!(elapsed >= Duration::from_millis(48_100), "ran {elapsed:?}");
    assert!(elapsed <= Duration::from_millis(50_600), "ran {elapsed:?}");

    let requests = h.scroller.requests();
    assert_eq!(requests.len(), STANDARD_SCROLLS);
    let cta = h
        .page
        .section_bounds(SectionId::CallToAction)
        .expect("cta");
    assert_eq!(requests.last().map(|r| r.target), Some(cta.top));

    assert_eq!(h.view.view_mode(), ViewMode::Forensic);
    assert_eq!(h.cues.one_shots(Cue::Acquire), 6);
    assert_eq!(h.cues.one_shots(Cue::Alarm), 1);
    assert_eq!(h.cues.one_shots(Cue::Success), 1);
    assert!(!h.cues.loop_active());
    assert_eq!(h.cues.calls().last(), Some(&CueCall::OneShot(Cue::Scan)));

    h.orchestrator.wait_idle().await;
    let snapshot = h.orchestrator.snapshot();
    assert_eq!(snapshot.phase, BriefingPhase::Idle);
    assert!(snapshot.status_text.is_empty());
    assert!(started.elapsed() - elapsed >= Duration::from_secs(3));
}

#[tokio::test(start_paused = true)]
async fn abort_while_idle_is_a_no_op() {
    let h = harness();

    assert!(!h.orchestrator.abort());
    tokio::time::sleep(Duration::from_secs(5)).await;

    let snapshot = h.orchestrator.snapshot();
    assert_eq!(snapshot.phase, BriefingPhase::Idle);
    assert!(!snapshot.running);
    assert!(snapshot.status_text.is_empty());
    assert!(h.cues.calls().is_empty());
    assert!(h.scroller.requests().is_empty());
}

#[tokio::test(start_paused = true)]
async fn second_start_while_running_is_ignored() {
    let h = harness();

    assert!(h.orchestrator.start());
    assert!(!h.orchestrator.start());
    assert!(!h.orchestrator.handle(BriefingCommand::Start));
    h.orchestrator.wait_stopped().await;

    assert_eq!(h.scroller.requests().len(), STANDARD_SCROLLS);
    assert_eq!(h.cues.one_shots(Cue::Alarm), 1);
}

#[tokio::test(start_paused = true)]
async fn abort_half_a_second_in_stops_before_the_first_move() {
    let h = harness();

    assert!(h.orchestrator.start());
    tokio::time::sleep(Duration::from_millis(500)).await;
    assert_eq!(h.orchestrator.snapshot().status_text, "ESTABLISHING BASELINE...");
    assert!(h.orchestrator.abort());
    assert!(!h.orchestrator.abort(), "abort is idempotent");
    h.orchestrator.wait_stopped().await;

    let snapshot = h.orchestrator.snapshot();
    assert_eq!(snapshot.phase, BriefingPhase::Aborted);
    assert_eq!(snapshot.status_text, MANUAL_OVERRIDE);
    assert_eq!(snapshot.last_stop, Some(StopReason::UserAbort));
    assert_eq!(snapshot.scan_target, None);
    assert!(snapshot.fault.is_none());

    let requests = h.scroller.requests();
    assert_eq!(requests.len(), 1, "only the baseline jump: {requests:?}");
    assert_eq!(requests[0].target, 0.0);
    assert_eq!(h.view.view_mode(), ViewMode::Corporate);

    tokio::time::sleep(Duration::from_secs(60)).await;
    assert_eq!(h.scroller.requests().len(), 1);
    let snapshot = h.orchestrator.snapshot();
    assert_eq!(snapshot.phase, BriefingPhase::Idle);
    assert!(snapshot.status_text.is_empty());
}

#[tokio::test(start_paused = true)]
async fn abort_mid_scan_stops_iteration_and_releases_loop() {
    let h = harness();
    let mut rx = h.orchestrator.subscribe();

    assert!(h.orchestrator.start());
    rx.wait_for(|s| s.scan_target.as_deref() == Some("EXXON"))
        .await
        .expect("reaches second target");
    assert!(h.cues.loop_active());
    assert!(h.orchestrator.abort());
    h.orchestrator.wait_stopped().await;

    assert_eq!(h.cues.one_shots(Cue::Acquire), 2);
    assert!(!h.cues.loop_active());
    assert_eq!(h.orchestrator.snapshot().scan_target, None);
    assert!(h
        .scroller
        .requests()
        .iter()
        .all(|request| request.target <= 2000.0));

    // Script side effects are not rolled back.
    assert_eq!(h.view.view_mode(), ViewMode::Forensic);
}

#[tokio::test(start_paused = true)]
async fn target_scan_visits_each_label_once_in_order() {
    let h = harness();
    let mut rx = h.orchestrator.subscribe();
    let observer = tokio::spawn(async move {
        let mut seen: Vec<String> = Vec::new();
        while rx.changed().await.is_ok() {
            let snapshot = rx.borrow_and_update().clone();
            if let Some(target) = snapshot.scan_target {
                if seen.last() != Some(&target) {
                    seen.push(target);
                }
            }
            if !snapshot.running && snapshot.last_stop.is_some() {
                break;
            }
        }
        seen
    });

    assert!(h.orchestrator.start());
    let seen = observer.await.expect("observer");
    assert_eq!(seen, scan_labels());
}

#[tokio::test(start_paused = true)]
async fn timeline_pans_linearly_from_top_to_bottom_edge() {
    let h = harness();
    assert!(h.orchestrator.start());
    h.orchestrator.wait_stopped().await;

    let timeline = h.page.section_bounds(SectionId::Timeline).expect("timeline");
    let pan = h
        .scroller
        .requests()
        .into_iter()
        .find(|request| request.from.is_some())
        .expect("pan request");

    assert_eq!(pan.from, Some(timeline.top));
    assert_eq!(pan.target, timeline.top + timeline.height - 1000.0);
    assert_eq!(pan.duration, Duration::from_secs(15));
    assert_eq!(pan.easing, Easing::Linear);
}

#[tokio::test(start_paused = true)]
async fn scroll_failure_is_handled_like_an_abort() {
    let h = harness_with(
        VirtualPage::standard(1000.0),
        RecordingScroller::failing_on(1, Fault::Error),
        BriefingScript::standard(scan_labels()),
    );

    assert!(h.orchestrator.start());
    h.orchestrator.wait_stopped().await;

    let snapshot = h.orchestrator.snapshot();
    assert_eq!(snapshot.phase, BriefingPhase::Aborted);
    assert_eq!(snapshot.status_text, MANUAL_OVERRIDE);
    assert_eq!(snapshot.last_stop, Some(StopReason::Failed));
    let fault = snapshot.fault.expect("fault recorded");
    assert_eq!(fault.code, ErrorCode::Collaborator);
    assert!(fault.message.contains("viewport detached"));
    assert_eq!(h.scroller.requests().len(), 2);
}

#[tokio::test(start_paused = true)]
async fn panic_inside_the_script_still_runs_cleanup() {
    let h = harness_with(
        VirtualPage::standard(1000.0),
        RecordingScroller::failing_on(3, Fault::Panic),
        BriefingScript::standard(scan_labels()),
    );

    assert!(h.orchestrator.start());
    h.orchestrator.wait_stopped().await;

    let snapshot = h.orchestrator.snapshot();
    assert_eq!(snapshot.last_stop, Some(StopReason::Failed));
    assert_eq!(snapshot.scan_target, None);
    assert!(!h.cues.loop_active());
    assert!(h
        .cues
        .calls()
        .contains(&CueCall::LoopStart(LoopCue::DataStream)));
    assert!(!h.orchestrator.is_running());

    assert!(h.orchestrator.start(), "a failed run does not wedge the orchestrator");
}

#[tokio::test(start_paused = true)]
async fn stale_status_clear_does_not_touch_a_new_run() {
    let h = harness();

    assert!(h.orchestrator.start());
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert!(h.orchestrator.abort());
    h.orchestrator.wait_stopped().await;

    assert!(h.orchestrator.start());
    tokio::time::sleep(Duration::from_millis(2500)).await;

    let snapshot = h.orchestrator.snapshot();
    assert!(snapshot.running);
    assert_eq!(snapshot.phase, BriefingPhase::Running);
    assert_eq!(snapshot.status_text, "ESTABLISHING BASELINE...");
}

#[tokio::test(start_paused = true)]
async fn missing_section_is_skipped() {
    let page = VirtualPage::stacked(
        1000.0,
        &[
            (SectionId::Hero, 1000.0),
            (SectionId::Globe, 1000.0),
            (SectionId::Database, 2000.0),
            (SectionId::Comparison, 1000.0),
            (SectionId::Timeline, 3000.0),
            (SectionId::CallToAction, 600.0),
        ],
    );
    let h = harness_with(
        page,
        RecordingScroller::default(),
        BriefingScript::standard(scan_labels()),
    );

    assert!(h.orchestrator.start());
    h.orchestrator.wait_stopped().await;

    assert_eq!(h.orchestrator.snapshot().last_stop, Some(StopReason::Completed));
    assert_eq!(h.scroller.requests().len(), STANDARD_SCROLLS - 1);
}

#[tokio::test(start_paused = true)]
async fn delayed_cues_outlive_an_abort() {
    let script = BriefingScript::new(vec![BriefingStep::new(SectionId::Hero, 0.0, "HOLDING")
        .cue(ScheduledCue::on_departure(Cue::Upload).delayed(Duration::from_secs(1)))
        .hold_secs(5.0)])
    .expect("script");
    let h = harness_with(
        VirtualPage::standard(1000.0),
        RecordingScroller::default(),
        script,
    );

    assert!(h.orchestrator.start());
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert!(h.orchestrator.handle(BriefingCommand::Abort));
    h.orchestrator.wait_stopped().await;
    assert_eq!(h.cues.one_shots(Cue::Upload), 0);

    tokio::time::sleep(Duration::from_secs(2)).await;
    assert_eq!(h.cues.one_shots(Cue::Upload), 1);
}

#[tokio::test(start_paused = true)]
async fn time_scale_compresses_the_whole_run() {
    let page = Arc::new(VirtualPage::standard(1000.0));
    let scroller = Arc::new(RecordingScroller::default());
    let deps = BriefingDeps {
        locator: page.clone(),
        scroller: scroller.clone(),
        view: Arc::new(ViewState::default()),
        cues: Arc::new(RecordingCues::default()),
    };
    let settings = Settings {
        time_scale: 0.1,
        ..Settings::default()
    };
    let orchestrator = BriefingOrchestrator::standard(deps, &settings).expect("orchestrator");
    let started = Instant::now();

    assert!(orchestrator.start());
    orchestrator.wait_stopped().await;

    assert!(started.elapsed() <= Duration::from_millis(5_100));
    assert_eq!(scroller.requests().len(), STANDARD_SCROLLS);
}

#[tokio::test(start_paused = true)]
async fn abort_during_timeline_pan_leaves_viewport_mid_section() {
    let page = Arc::new(VirtualPage::standard(1000.0));
    let cues = Arc::new(RecordingCues::default());
    let deps = BriefingDeps {
        locator: page.clone(),
        scroller: Arc::new(AnimatedScroller::new(Arc::clone(&page))),
        view: Arc::new(ViewState::default()),
        cues: cues.clone(),
    };
    let orchestrator =
        BriefingOrchestrator::standard(deps, &Settings::default()).expect("orchestrator");
    let timeline = page.section_bounds(SectionId::Timeline).expect("timeline");
    let pan_end = timeline.pan_end(page.viewport_height());
    let mut rx = orchestrator.subscribe();

    assert!(orchestrator.start());
    rx.wait_for(|s| s.status_text == "ANALYZING HISTORICAL DATA...")
        .await
        .expect("reaches the pan");
    tokio::time::sleep(Duration::from_secs(5)).await;
    assert!(orchestrator.abort());
    orchestrator.wait_stopped().await;

    let snapshot = orchestrator.snapshot();
    assert_eq!(snapshot.phase, BriefingPhase::Aborted);
    assert_eq!(snapshot.last_stop, Some(StopReason::UserAbort));

    let offset = page.scroll_offset();
    assert!(
        offset > timeline.top && offset < pan_end,
        "offset {offset} outside ({}, {pan_end})",
        timeline.top
    );

    tokio::time::sleep(Duration::from_secs(30)).await;
    assert_eq!(page.scroll_offset(), offset, "no call-to-action scroll");
    assert_eq!(page.section_at_top(), Some(SectionId::Timeline));
    assert_eq!(cues.one_shots(Cue::Success), 0);
}

#[tokio::test(start_paused = true)]
async fn abort_during_timeline_pan_issues_no_call_to_action_scroll() {
    let h = harness();
    let mut rx = h.orchestrator.subscribe();

    assert!(h.orchestrator.start());
    rx.wait_for(|s| s.status_text == "ANALYZING HISTORICAL DATA...")
        .await
        .expect("reaches the pan");
    tokio::time::sleep(Duration::from_secs(2)).await;
    assert!(h.orchestrator.abort());
    h.orchestrator.wait_stopped().await;
    tokio::time::sleep(Duration::from_secs(30)).await;

    let cta = h.page.section_bounds(SectionId::CallToAction).expect("cta");
    let requests = h.scroller.requests();
    assert!(requests.last().is_some_and(|r| r.from.is_some()), "pan was last");
    assert!(requests.iter().all(|r| r.target != cta.top));
}

/// Cue player whose loop shutdown always panics.
struct BrokenLoopCues;

impl CuePlayer for BrokenLoopCues {
    fn play_one_shot(&self, _cue: Cue) {}

    fn start_loop(&self, _cue: LoopCue) {}

    fn stop_loop(&self, _cue: LoopCue) {
        panic!("audio backend gone");
    }
}

#[tokio::test(start_paused = true)]
async fn panicking_cue_player_during_cleanup_does_not_block_restart() {
    let page = Arc::new(VirtualPage::standard(1000.0));
    let deps = BriefingDeps {
        locator: page.clone(),
        scroller: Arc::new(RecordingScroller::default()),
        view: Arc::new(ViewState::default()),
        cues: Arc::new(BrokenLoopCues),
    };
    let orchestrator =
        BriefingOrchestrator::standard(deps, &Settings::default()).expect("orchestrator");

    assert!(orchestrator.start());
    tokio::time::sleep(Duration::from_millis(500)).await;
    assert!(orchestrator.abort());
    orchestrator.wait_stopped().await;
    tokio::time::sleep(Duration::from_millis(10)).await;

    assert!(!orchestrator.is_running());
    assert_eq!(orchestrator.snapshot().last_stop, Some(StopReason::UserAbort));
    assert!(orchestrator.start(), "restart after a broken cleanup");
}
