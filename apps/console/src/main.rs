use std::{path::PathBuf, sync::Arc, time::Duration};

use anyhow::Result;
use briefing_core::{
    follow_view_mode, load_settings, AnimatedScroller, AudioSession, BriefingDeps,
    BriefingOrchestrator, IntroChoice, IntroOutcome, IntroSequence, PageControls, ViewState,
    Viewport, VirtualPage,
};
use clap::Parser;
use shared::{domain::ViewMode, protocol::BriefingSnapshot};
use tokio::{sync::watch, task::JoinHandle};
use tokio_util::sync::CancellationToken;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "briefing-console", about = "Plays the exposé briefing on a virtual page")]
struct Args {
    /// Settings file; `briefing.toml` in the working directory is used if present.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Overrides the configured time scale (0.1 plays ten times faster).
    #[arg(long)]
    time_scale: Option<f64>,
    #[arg(long)]
    skip_intro: bool,
    /// Leave the intro for free scrolling instead of the autopilot.
    #[arg(long)]
    manual_review: bool,
    /// Issues a manual override this many milliseconds into the briefing.
    #[arg(long)]
    abort_after_ms: Option<u64>,
    /// Prints snapshots as JSON lines.
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();

    let mut settings = load_settings(args.config.as_deref())?;
    if let Some(time_scale) = args.time_scale {
        settings.time_scale = time_scale;
        settings.validate()?;
    }

    let page = Arc::new(VirtualPage::standard(settings.viewport_height));
    let audio = Arc::new(AudioSession::new());
    let view = Arc::new(ViewState::default());
    let ambience = follow_view_mode(&view, audio.clone());

    let deps = BriefingDeps {
        locator: page.clone(),
        scroller: Arc::new(AnimatedScroller::with_frame_interval(
            Arc::clone(&page),
            settings.frame_interval(),
        )),
        view: view.clone(),
        cues: audio.clone(),
    };
    let orchestrator = BriefingOrchestrator::standard(deps.clone(), &settings)?;
    let controls = PageControls::new(Arc::clone(&orchestrator), deps);

    if args.skip_intro {
        audio.open();
    } else {
        let intro = IntroSequence::new(audio.clone(), settings.time_scale);
        let skip = CancellationToken::new();
        let outcome = tokio::select! {
            outcome = intro.play(&skip) => outcome,
            _ = tokio::signal::ctrl_c() => IntroOutcome::Skipped {
                at_phase: intro.current_phase().unwrap_or_default(),
            },
        };
        info!(?outcome, "intro over");
    }

    let choice = if args.manual_review {
        IntroChoice::ManualReview
    } else {
        IntroChoice::CommenceBriefing
    };
    if !controls.choose(choice) {
        let outcome = controls.review_data().await?;
        println!(
            "manual review: {outcome:?} at offset {:.0} ({:?})",
            page.scroll_offset(),
            page.section_at_top()
        );
        audio.close();
        ambience.abort();
        return Ok(());
    }

    let printer = spawn_printer(orchestrator.subscribe(), view.subscribe(), args.json);
    if let Some(ms) = args.abort_after_ms {
        let orchestrator = Arc::clone(&orchestrator);
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(ms)).await;
            orchestrator.abort();
        });
    }

    tokio::select! {
        () = orchestrator.wait_stopped() => {}
        _ = tokio::signal::ctrl_c() => {
            orchestrator.abort();
        }
    }
    orchestrator.wait_idle().await;

    printer.abort();
    ambience.abort();
    audio.close();

    let last = orchestrator.snapshot();
    info!(
        stop = ?last.last_stop,
        progress = format!("{:.0}%", page.progress() * 100.0),
        cues = audio.cue_log().len(),
        "briefing settled"
    );
    Ok(())
}

fn spawn_printer(
    mut snapshots: watch::Receiver<BriefingSnapshot>,
    mut views: watch::Receiver<ViewMode>,
    json: bool,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut shown: Option<BriefingSnapshot> = None;
        loop {
            tokio::select! {
                changed = snapshots.changed() => {
                    if changed.is_err() {
                        return;
                    }
                    let snapshot = snapshots.borrow_and_update().clone();
                    if shown.as_ref().is_some_and(|prev| prev.same_view(&snapshot)) {
                        continue;
                    }
                    print_snapshot(&snapshot, json);
                    shown = Some(snapshot);
                }
                changed = views.changed() => {
                    if changed.is_err() {
                        return;
                    }
                    let mode = *views.borrow_and_update();
                    if !json {
                        println!("== {} :: {}", mode.headline(), mode.tagline());
                    }
                }
            }
        }
    })
}

fn print_snapshot(snapshot: &BriefingSnapshot, json: bool) {
    if json {
        match serde_json::to_string(snapshot) {
            Ok(line) => println!("{line}"),
            Err(e) => tracing::warn!(error = %e, "failed to encode snapshot"),
        }
        return;
    }

    let phase = format!("{:?}", snapshot.phase).to_uppercase();
    match &snapshot.scan_target {
        Some(target) => println!("[{phase}] {} >> {target}", snapshot.status_text),
        None => println!("[{phase}] {}", snapshot.status_text),
    }
}
