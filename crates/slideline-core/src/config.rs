use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::easing::Easing;

/// Per-instance carousel configuration.
///
/// Every field has a default, so a partial (or absent) config file still
/// yields a working carousel. Offsets left unset are derived from the
/// container width when the panel set is built.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CarouselConfig {
    /// Style property the panels slide along
    #[serde(default = "default_transition_property")]
    pub transition_property: String,
    /// Cross-transition duration in seconds
    #[serde(default = "default_transition_duration")]
    pub transition_duration: f64,
    /// Autoplay interval between slides in seconds
    #[serde(default = "default_transition_delay")]
    pub transition_delay: f64,
    /// Unit appended to numeric offsets when applied to a panel
    #[serde(default = "default_unit")]
    pub unit: String,
    /// Off-stage offset before entering (defaults to -container width)
    #[serde(default)]
    pub start_value: Option<f64>,
    /// On-stage offset (defaults to 0)
    #[serde(default)]
    pub visible_value: Option<f64>,
    /// Off-stage offset after exiting (defaults to +container width)
    #[serde(default)]
    pub end_value: Option<f64>,
    /// Suppress autoplay
    #[serde(default)]
    pub paused: bool,
    /// Easing curve for the cross transition
    #[serde(default)]
    pub easing: Easing,
    /// Frames per second for frame-driven hosts
    #[serde(default = "default_frame_rate")]
    pub frame_rate: u32,
}

impl Default for CarouselConfig {
    fn default() -> Self {
        Self {
            transition_property: default_transition_property(),
            transition_duration: default_transition_duration(),
            transition_delay: default_transition_delay(),
            unit: default_unit(),
            start_value: None,
            visible_value: None,
            end_value: None,
            paused: false,
            easing: Easing::default(),
            frame_rate: default_frame_rate(),
        }
    }
}

/// The three canonical positions a panel passes through.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlideOffsets {
    /// Off-stage, before entering
    pub start: f64,
    /// On-stage
    pub visible: f64,
    /// Off-stage, after exiting
    pub end: f64,
}

impl CarouselConfig {
    /// Load configuration from file or return defaults
    pub fn load() -> crate::Result<Self> {
        let config_path = Self::config_path();

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            toml::from_str(&content).map_err(|e| crate::Error::Config(e.to_string()))
        } else {
            Ok(Self::default())
        }
    }

    /// Get the configuration file path
    /// Always uses ~/.config/slideline/config.toml on all platforms
    pub fn config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config")
            .join("slideline")
            .join("config.toml")
    }

    /// Transition duration as a `Duration`
    #[inline]
    pub fn duration(&self) -> Duration {
        Duration::from_secs_f64(self.transition_duration.max(0.0))
    }

    /// Autoplay delay as a `Duration`
    #[inline]
    pub fn delay(&self) -> Duration {
        Duration::from_secs_f64(self.transition_delay.max(0.0))
    }

    /// Interval between frames for frame-driven hosts.
    ///
    /// Never zero: rates above 1000fps clamp to 1ms, since a zero interval
    /// is not a schedulable tick.
    #[inline]
    pub fn frame_interval(&self) -> Duration {
        if self.frame_rate == 0 {
            Duration::from_millis(16) // ~60fps fallback
        } else {
            Duration::from_millis((1000 / u64::from(self.frame_rate)).max(1))
        }
    }

    /// Resolve the three canonical offsets against the container width.
    ///
    /// Unset values fall back to `-width` / `0` / `+width`.
    pub fn offsets(&self, width: f64) -> SlideOffsets {
        SlideOffsets {
            start: self.start_value.unwrap_or(-width),
            visible: self.visible_value.unwrap_or(0.0),
            end: self.end_value.unwrap_or(width),
        }
    }
}

fn default_transition_property() -> String {
    "left".to_string()
}

fn default_transition_duration() -> f64 {
    0.5
}

fn default_transition_delay() -> f64 {
    3.0
}

fn default_unit() -> String {
    "px".to_string()
}

fn default_frame_rate() -> u32 {
    60
}
