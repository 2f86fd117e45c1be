use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::SectionId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    Interrupted,
    SectionUnavailable,
    Collaborator,
    InvalidScript,
    Settings,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BriefingFault {
    pub code: ErrorCode,
    pub message: String,
}

impl BriefingFault {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum BriefingError {
    #[error("briefing interrupted: {reason}")]
    Interrupted { reason: String },
    #[error("section {section} is not present in the page layout")]
    SectionUnavailable { section: SectionId },
    #[error("{collaborator} failed: {source}")]
    Collaborator {
        collaborator: &'static str,
        source: anyhow::Error,
    },
    #[error("invalid briefing script: {0}")]
    InvalidScript(String),
    #[error("invalid settings: {0}")]
    Settings(String),
}

impl BriefingError {
    pub fn interrupted(reason: impl Into<String>) -> Self {
        Self::Interrupted {
            reason: reason.into(),
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Interrupted { .. } => ErrorCode::Interrupted,
            Self::SectionUnavailable { .. } => ErrorCode::SectionUnavailable,
            Self::Collaborator { .. } => ErrorCode::Collaborator,
            Self::InvalidScript(_) => ErrorCode::InvalidScript,
            Self::Settings(_) => ErrorCode::Settings,
        }
    }
}

impl From<&BriefingError> for BriefingFault {
    fn from(value: &BriefingError) -> Self {
        Self {
            code: value.code(),
            message: value.to_string(),
        }
    }
}
