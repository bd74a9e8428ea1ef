//! Optional TOML tuning file for timing parameters.

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

/// Timing knobs that tune the arcade without recompiling.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct Tuning {
    /// Minimum interval between discrete-press player steps, in milliseconds.
    pub(crate) move_cooldown_ms: u64,
    /// Minimum interval between analog-stick player steps, in milliseconds.
    pub(crate) analog_cooldown_ms: u64,
    /// Interval between falling-block spawns, in milliseconds.
    pub(crate) block_interval_ms: u64,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            move_cooldown_ms: 100,
            analog_cooldown_ms: 120,
            block_interval_ms: 1500,
        }
    }
}

impl Tuning {
    /// Loads the tuning table from a TOML file.
    pub(crate) fn load(path: &Path) -> Result<Self, TuningError> {
        let contents = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    }

    pub(crate) fn move_cooldown(&self) -> Duration {
        Duration::from_millis(self.move_cooldown_ms)
    }

    pub(crate) fn analog_cooldown(&self) -> Duration {
        Duration::from_millis(self.analog_cooldown_ms)
    }

    pub(crate) fn block_interval(&self) -> Duration {
        Duration::from_millis(self.block_interval_ms)
    }
}

/// Failures produced while loading the tuning file.
#[derive(Debug, Error)]
pub(crate) enum TuningError {
    /// The file could not be read from disk.
    #[error("failed to read tuning file: {0}")]
    Io(#[from] std::io::Error),
    /// The file contents were not valid tuning TOML.
    #[error("failed to parse tuning file: {0}")]
    Parse(#[from] toml::de::Error),
}

#[cfg(test)]
mod tests {
    use super::Tuning;

    #[test]
    fn defaults_match_the_arcade_timings() {
        let tuning = Tuning::default();
        assert_eq!(tuning.move_cooldown_ms, 100);
        assert_eq!(tuning.analog_cooldown_ms, 120);
        assert_eq!(tuning.block_interval_ms, 1500);
    }

    #[test]
    fn partial_tables_fall_back_to_defaults() {
        let tuning: Tuning = toml::from_str("move_cooldown_ms = 80").expect("valid toml");
        assert_eq!(tuning.move_cooldown_ms, 80);
        assert_eq!(tuning.block_interval_ms, 1500);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let parsed: Result<Tuning, _> = toml::from_str("bullet_speed = 10");
        assert!(parsed.is_err());
    }
}
