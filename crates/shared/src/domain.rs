use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(pub Uuid);

        impl $name {
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }
    };
}

id_newtype!(RunId);

/// Narrative state of the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewMode {
    #[default]
    Corporate,
    Forensic,
}

impl ViewMode {
    pub fn toggled(self) -> Self {
        match self {
            Self::Corporate => Self::Forensic,
            Self::Forensic => Self::Corporate,
        }
    }

    pub fn headline(self) -> &'static str {
        match self {
            Self::Corporate => "CLIMATE SAVERS",
            Self::Forensic => "CLIMATE CHEATERS",
        }
    }

    pub fn tagline(self) -> &'static str {
        match self {
            Self::Corporate => "CELEBRATING A SUSTAINABLE FUTURE",
            Self::Forensic => "EXPOSING THE GAPS IN PROGRESS",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Corporate => "corporate",
            Self::Forensic => "forensic",
        }
    }
}

/// Symbolic anchors into the page, top to bottom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionId {
    Hero,
    Globe,
    Database,
    Emissions,
    Comparison,
    Timeline,
    CallToAction,
}

impl SectionId {
    pub const ALL: [SectionId; 7] = [
        SectionId::Hero,
        SectionId::Globe,
        SectionId::Database,
        SectionId::Emissions,
        SectionId::Comparison,
        SectionId::Timeline,
        SectionId::CallToAction,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Hero => "hero",
            Self::Globe => "globe",
            Self::Database => "database",
            Self::Emissions => "emissions",
            Self::Comparison => "comparison",
            Self::Timeline => "timeline",
            Self::CallToAction => "call_to_action",
        }
    }
}

impl fmt::Display for SectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Vertical extent of a section in page pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SectionBounds {
    pub top: f64,
    pub height: f64,
}

impl SectionBounds {
    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    /// Offset at which the section's bottom edge meets the viewport's bottom edge.
    /// Never above the section top.
    pub fn pan_end(&self, viewport_height: f64) -> f64 {
        (self.bottom() - viewport_height).max(self.top)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cue {
    Click,
    Glitch,
    Alarm,
    Scan,
    Upload,
    Success,
    Acquire,
}

impl Cue {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Click => "click",
            Self::Glitch => "glitch",
            Self::Alarm => "alarm",
            Self::Scan => "scan",
            Self::Upload => "upload",
            Self::Success => "success",
            Self::Acquire => "acquire",
        }
    }
}

impl fmt::Display for Cue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoopCue {
    DataStream,
}

impl fmt::Display for LoopCue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DataStream => f.write_str("data_stream"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Easing {
    Linear,
    #[default]
    EaseInOut,
}

impl Easing {
    /// Maps linear progress in `[0, 1]` to eased progress in `[0, 1]`.
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::EaseInOut => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
                }
            }
        }
    }
}
