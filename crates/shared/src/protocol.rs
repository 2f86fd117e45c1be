use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{domain::RunId, error::BriefingFault};

pub const MANUAL_CONTROL_ENGAGED: &str = "MANUAL CONTROL ENGAGED";
pub const MANUAL_OVERRIDE: &str = "MANUAL OVERRIDE";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BriefingPhase {
    #[default]
    Idle,
    Running,
    Completed,
    Aborted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    Completed,
    UserAbort,
    Failed,
}

impl StopReason {
    pub fn phase(self) -> BriefingPhase {
        match self {
            Self::Completed => BriefingPhase::Completed,
            Self::UserAbort | Self::Failed => BriefingPhase::Aborted,
        }
    }

    pub fn status_message(self) -> &'static str {
        match self {
            Self::Completed => MANUAL_CONTROL_ENGAGED,
            Self::UserAbort | Self::Failed => MANUAL_OVERRIDE,
        }
    }
}

/// Trigger surface of the briefing, as queueable values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BriefingCommand {
    Start,
    Abort,
}

/// Everything a UI needs to render the briefing overlay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BriefingSnapshot {
    pub phase: BriefingPhase,
    pub running: bool,
    pub run_id: Option<RunId>,
    pub status_text: String,
    pub scan_target: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_stop: Option<StopReason>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fault: Option<BriefingFault>,
    pub updated_at: DateTime<Utc>,
}

impl Default for BriefingSnapshot {
    fn default() -> Self {
        Self {
            phase: BriefingPhase::Idle,
            running: false,
            run_id: None,
            status_text: String::new(),
            scan_target: None,
            last_stop: None,
            fault: None,
            updated_at: Utc::now(),
        }
    }
}

impl BriefingSnapshot {
    /// Equality that ignores the timestamp, for change detection.
    pub fn same_view(&self, other: &Self) -> bool {
        self.phase == other.phase
            && self.running == other.running
            && self.run_id == other.run_id
            && self.status_text == other.status_text
            && self.scan_target == other.scan_target
            && self.last_stop == other.last_stop
    }
}
