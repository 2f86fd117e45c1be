use std::{fs, path::Path, time::Duration};

use serde::Deserialize;
use shared::{dataset, error::BriefingError};

use crate::script::scale_duration;

pub const DEFAULT_SETTINGS_FILE: &str = "briefing.toml";
pub const MAX_TIME_SCALE: f64 = 100.0;
/// Upper bound for every millisecond setting (one hour).
pub const MAX_DELAY_MS: u64 = 3_600_000;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Multiplier on every scripted duration; below 1.0 plays faster.
    pub time_scale: f64,
    pub frame_interval_ms: u64,
    pub scan_interval_min_ms: u64,
    pub scan_interval_max_ms: u64,
    pub completion_clear_ms: u64,
    pub override_clear_ms: u64,
    pub viewport_height: f64,
    pub scan_targets: Vec<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            time_scale: 1.0,
            frame_interval_ms: 16,
            scan_interval_min_ms: 600,
            scan_interval_max_ms: 1000,
            completion_clear_ms: 3000,
            override_clear_ms: 2000,
            viewport_height: 900.0,
            scan_targets: dataset::scan_labels(),
        }
    }
}

impl Settings {
    pub fn validate(&self) -> Result<(), BriefingError> {
        if !self.time_scale.is_finite()
            || self.time_scale <= 0.0
            || self.time_scale > MAX_TIME_SCALE
        {
            return Err(BriefingError::Settings(format!(
                "time_scale must be in (0, {MAX_TIME_SCALE}], got {}",
                self.time_scale
            )));
        }
        for (name, value) in [
            ("frame_interval_ms", self.frame_interval_ms),
            ("scan_interval_min_ms", self.scan_interval_min_ms),
            ("scan_interval_max_ms", self.scan_interval_max_ms),
            ("completion_clear_ms", self.completion_clear_ms),
            ("override_clear_ms", self.override_clear_ms),
        ] {
            if value > MAX_DELAY_MS {
                return Err(BriefingError::Settings(format!(
                    "{name} must be at most {MAX_DELAY_MS}, got {value}"
                )));
            }
        }
        if self.frame_interval_ms == 0 {
            return Err(BriefingError::Settings(
                "frame_interval_ms must be at least 1".to_string(),
            ));
        }
        if self.scan_interval_min_ms > self.scan_interval_max_ms {
            return Err(BriefingError::Settings(format!(
                "scan interval range is inverted: {}..{}",
                self.scan_interval_min_ms, self.scan_interval_max_ms
            )));
        }
        if !self.viewport_height.is_finite() || self.viewport_height <= 0.0 {
            return Err(BriefingError::Settings(format!(
                "viewport_height must be positive, got {}",
                self.viewport_height
            )));
        }
        if self.scan_targets.iter().all(|target| target.trim().is_empty()) {
            return Err(BriefingError::Settings(
                "scan_targets must name at least one target".to_string(),
            ));
        }
        Ok(())
    }

    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.frame_interval_ms)
    }

    pub fn scaled(&self, duration: Duration) -> Duration {
        scale_duration(duration, self.time_scale)
    }

    pub fn scan_interval_range(&self) -> (Duration, Duration) {
        (
            self.scaled(Duration::from_millis(self.scan_interval_min_ms)),
            self.scaled(Duration::from_millis(self.scan_interval_max_ms)),
        )
    }

    pub fn completion_clear_delay(&self) -> Duration {
        self.scaled(Duration::from_millis(self.completion_clear_ms))
    }

    pub fn override_clear_delay(&self) -> Duration {
        self.scaled(Duration::from_millis(self.override_clear_ms))
    }
}

/// Defaults, then the settings file, then environment overrides.
///
/// An explicitly named file must exist; the default `briefing.toml` is optional.
pub fn load_settings(path: Option<&Path>) -> Result<Settings, BriefingError> {
    let mut settings = match path {
        Some(path) => {
            let raw = fs::read_to_string(path).map_err(|e| {
                BriefingError::Settings(format!("failed to read {}: {e}", path.display()))
            })?;
            parse_settings(&raw)?
        }
        None => match fs::read_to_string(DEFAULT_SETTINGS_FILE) {
            Ok(raw) => parse_settings(&raw)?,
            Err(_) => Settings::default(),
        },
    };

    apply_overrides(&mut settings, |key| std::env::var(key).ok());
    settings.validate()?;
    Ok(settings)
}

pub fn parse_settings(raw: &str) -> Result<Settings, BriefingError> {
    toml::from_str(raw).map_err(|e| BriefingError::Settings(format!("malformed settings: {e}")))
}

/// Applies environment-style overrides from `lookup`. `APP__*` wins over
/// `BRIEFING_*`; unparsable values are ignored.
pub fn apply_overrides(settings: &mut Settings, lookup: impl Fn(&str) -> Option<String>) {
    let get = |name: &str| {
        lookup(&format!("APP__{name}")).or_else(|| lookup(&format!("BRIEFING_{name}")))
    };

    if let Some(v) = get("TIME_SCALE").and_then(|v| v.parse().ok()) {
        settings.time_scale = v;
    }
    if let Some(v) = get("FRAME_INTERVAL_MS").and_then(|v| v.parse().ok()) {
        settings.frame_interval_ms = v;
    }
    if let Some(v) = get("SCAN_INTERVAL_MIN_MS").and_then(|v| v.parse().ok()) {
        settings.scan_interval_min_ms = v;
    }
    if let Some(v) = get("SCAN_INTERVAL_MAX_MS").and_then(|v| v.parse().ok()) {
        settings.scan_interval_max_ms = v;
    }
    if let Some(v) = get("COMPLETION_CLEAR_MS").and_then(|v| v.parse().ok()) {
        settings.completion_clear_ms = v;
    }
    if let Some(v) = get("OVERRIDE_CLEAR_MS").and_then(|v| v.parse().ok()) {
        settings.override_clear_ms = v;
    }
    if let Some(v) = get("VIEWPORT_HEIGHT").and_then(|v| v.parse().ok()) {
        settings.viewport_height = v;
    }
    if let Some(v) = get("SCAN_TARGETS") {
        settings.scan_targets = v
            .split(',')
            .map(str::trim)
            .filter(|target| !target.is_empty())
            .map(str::to_string)
            .collect();
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
