//! Core types for playback management

use serde::{Deserialize, Serialize};

use crate::error::{PlaybackError, Result};

/// Shuffle mode
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShuffleMode {
    /// Natural (insertion) order governs navigation
    #[default]
    Off,

    /// Shuffle order governs navigation
    On,
}

/// Repeat mode
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RepeatMode {
    /// Stop after the last item of the active order
    #[default]
    Off,

    /// Replay the current item on natural completion
    One,

    /// Wrap around to the first item of the active order
    All,
}

/// Controller state machine states
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EngineState {
    /// No queue, empty queue, or nothing loaded after repeated failures
    #[default]
    Idle,

    /// Renderer is loading the current item
    Preparing,

    /// Item loaded, not playing
    Paused,

    /// Item loaded and playing
    Playing,

    /// Terminal; no further callbacks are delivered
    Shutdown,
}

impl EngineState {
    /// Whether duration and progress are meaningful
    pub fn is_prepared(self) -> bool {
        matches!(self, Self::Paused | Self::Playing)
    }
}

/// A-B loop points, in milliseconds
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AbLoop {
    #[default]
    Unset,

    /// Only A is pointed
    A(u32),

    /// Both points set, `a < b`
    Both { a: u32, b: u32 },
}

impl AbLoop {
    pub fn a_pointed(self) -> bool {
        !matches!(self, Self::Unset)
    }

    pub fn b_pointed(self) -> bool {
        matches!(self, Self::Both { .. })
    }

    /// Loop segment when both points are set
    pub fn segment(self) -> Option<(u32, u32)> {
        match self {
            Self::Both { a, b } => Some((a, b)),
            Self::Unset | Self::A(_) => None,
        }
    }
}

/// Configuration for the player
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Initial shuffle mode (default: Off)
    pub shuffle: ShuffleMode,

    /// Initial repeat mode (default: Off)
    pub repeat: RepeatMode,

    /// Initial playback speed (default: 1.0)
    pub speed: f32,

    /// Initial pitch (default: 1.0)
    pub pitch: f32,

    /// Accepted speed range (default: 0.25-4.0)
    pub min_speed: f32,
    pub max_speed: f32,

    /// Accepted pitch range (default: 0.5-2.0)
    pub min_pitch: f32,
    pub max_pitch: f32,

    /// Progress tick interval while playing (default: 100ms)
    pub progress_interval_ms: u64,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            shuffle: ShuffleMode::Off,
            repeat: RepeatMode::Off,
            speed: 1.0,
            pitch: 1.0,
            min_speed: 0.25,
            max_speed: 4.0,
            min_pitch: 0.5,
            max_pitch: 2.0,
            progress_interval_ms: 100,
        }
    }
}

impl PlayerConfig {
    /// Parse a configuration from JSON; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| PlaybackError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check ranges and that the initial speed/pitch fall inside them
    pub fn validate(&self) -> Result<()> {
        check_range("speed", self.min_speed, self.max_speed)?;
        check_range("pitch", self.min_pitch, self.max_pitch)?;

        if !(self.min_speed..=self.max_speed).contains(&self.speed) {
            return Err(PlaybackError::InvalidConfig(format!(
                "initial speed {} outside [{}, {}]",
                self.speed, self.min_speed, self.max_speed
            )));
        }
        if !(self.min_pitch..=self.max_pitch).contains(&self.pitch) {
            return Err(PlaybackError::InvalidConfig(format!(
                "initial pitch {} outside [{}, {}]",
                self.pitch, self.min_pitch, self.max_pitch
            )));
        }
        if self.progress_interval_ms == 0 {
            return Err(PlaybackError::InvalidConfig(
                "progress_interval_ms must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

fn check_range(name: &str, min: f32, max: f32) -> Result<()> {
    if !min.is_finite() || !max.is_finite() || min <= 0.0 || min > max {
        return Err(PlaybackError::InvalidConfig(format!(
            "{name} range [{min}, {max}] must be positive and ordered"
        )));
    }
    Ok(())
}
