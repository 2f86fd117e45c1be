use std::sync::Arc;

use shared::domain::ViewMode;
use tokio::{sync::watch, task::JoinHandle};
use tracing::debug;

use crate::audio::CuePlayer;

pub trait ViewModeStore: Send + Sync {
    fn view_mode(&self) -> ViewMode;
    fn set_view_mode(&self, mode: ViewMode);
}

/// View mode held in a watch channel; subscribers wake only on actual changes.
pub struct ViewState {
    tx: watch::Sender<ViewMode>,
}

impl Default for ViewState {
    fn default() -> Self {
        Self::new(ViewMode::default())
    }
}

impl ViewState {
    pub fn new(initial: ViewMode) -> Self {
        let (tx, _) = watch::channel(initial);
        Self { tx }
    }

    pub fn subscribe(&self) -> watch::Receiver<ViewMode> {
        self.tx.subscribe()
    }
}

impl ViewModeStore for ViewState {
    fn view_mode(&self) -> ViewMode {
        *self.tx.borrow()
    }

    fn set_view_mode(&self, mode: ViewMode) {
        let changed = self.tx.send_if_modified(|current| {
            if *current == mode {
                return false;
            }
            *current = mode;
            true
        });
        if changed {
            debug!(mode = mode.as_str(), "view mode changed");
        }
    }
}

/// Keeps the cue player's ambience in step with the view mode until the
/// view state is dropped.
pub fn follow_view_mode(view: &ViewState, cues: Arc<dyn CuePlayer>) -> JoinHandle<()> {
    let mut rx = view.subscribe();
    tokio::spawn(async move {
        cues.set_mode(*rx.borrow_and_update());
        while rx.changed().await.is_ok() {
            let mode = *rx.borrow_and_update();
            cues.set_mode(mode);
        }
    })
}
