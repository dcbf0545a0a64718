use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use super::error::ConfigError;

/// Timing configuration for the game
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// How long a pad stays lit during playback (ms)
    pub highlight_ms: u64,
    /// Time from one playback highlight starting to the next one starting (ms)
    pub sequence_delay_ms: u64,
    /// Pause between a completed round and the next playback (ms)
    pub round_pause_ms: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            highlight_ms: 500,
            sequence_delay_ms: 800,
            round_pause_ms: 1000,
        }
    }
}

impl GameConfig {
    /// Load a configuration from a JSON file. Missing fields take their defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.highlight_ms == 0 {
            return Err(ConfigError::ZeroDuration {
                field: "highlight_ms",
            });
        }

        if self.sequence_delay_ms == 0 {
            return Err(ConfigError::ZeroDuration {
                field: "sequence_delay_ms",
            });
        }

        if self.highlight_ms > self.sequence_delay_ms {
            return Err(ConfigError::HighlightExceedsDelay {
                highlight_ms: self.highlight_ms,
                sequence_delay_ms: self.sequence_delay_ms,
            });
        }

        Ok(())
    }

    pub fn highlight(&self) -> Duration {
        Duration::from_millis(self.highlight_ms)
    }

    /// Dark time between two playback highlights
    pub fn gap(&self) -> Duration {
        Duration::from_millis(self.sequence_delay_ms.saturating_sub(self.highlight_ms))
    }

    pub fn round_pause(&self) -> Duration {
        Duration::from_millis(self.round_pause_ms)
    }

    /// A pad pressed by the player lights for half a playback highlight
    pub fn input_flash(&self) -> Duration {
        Duration::from_millis(self.highlight_ms / 2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = GameConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.gap(), Duration::from_millis(300));
        assert_eq!(config.input_flash(), Duration::from_millis(250));
        assert_eq!(config.round_pause(), Duration::from_secs(1));
    }

    #[test]
    fn test_validation_rejects_bad_timings() {
        let config = GameConfig {
            highlight_ms: 0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ZeroDuration { field: "highlight_ms" })
        ));

        let config = GameConfig {
            highlight_ms: 900,
            sequence_delay_ms: 800,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::HighlightExceedsDelay { .. })
        ));
    }

    #[test]
    fn test_load_partial_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "highlight_ms": 300 }}"#).unwrap();

        let config = GameConfig::load(file.path()).unwrap();
        assert_eq!(config.highlight_ms, 300);
        assert_eq!(config.sequence_delay_ms, 800);
        assert_eq!(config.round_pause_ms, 1000);
    }

    #[test]
    fn test_load_rejects_invalid_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "highlight_ms": 2000 }}"#).unwrap();
        assert!(GameConfig::load(file.path()).is_err());

        let mut garbage = tempfile::NamedTempFile::new().unwrap();
        write!(garbage, "not json").unwrap();
        assert!(matches!(
            GameConfig::load(garbage.path()),
            Err(ConfigError::Parse(_))
        ));
    }
}
