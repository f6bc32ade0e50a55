//! Wheel and picker configuration.
//!
//! Configuration can be built in code with the `with_*` setters or loaded from
//! TOML. Every field has a default, so a file only needs the values it changes:
//!
//! ```
//! use horizon_wheel::PickerConfig;
//!
//! let config = PickerConfig::from_toml_str(r#"
//! hidden_lane_index = 0
//! minimum = [2020, 1, 1]
//!
//! [wheel]
//! item_height = 48.0
//! circular = true
//! "#).unwrap();
//!
//! assert_eq!(config.wheel.item_height, 48.0);
//! assert_eq!(config.wheel.visible_items, 5);
//! ```

use std::path::Path;
use std::time::Duration;

use horizon_wheel_core::logging::targets;
use serde::{Deserialize, Serialize};

use crate::easing::Easing;
use crate::error::{Error, Result};
use crate::picker::PickerMode;
use crate::snap::WheelGeometry;

/// Configuration for a single wheel lane.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WheelConfig {
    /// Height of one item in pixels.
    pub item_height: f32,
    /// Number of rows the viewport shows.
    pub visible_items: usize,
    /// Whether the lane wraps around.
    pub circular: bool,
    /// Whether scrolling plays haptic ticks.
    pub haptic_feedback: bool,
    /// Duration of a settle animation in milliseconds.
    pub settle_duration_ms: u64,
    /// Easing curve of settle animations.
    pub easing: Easing,
    /// Fling deceleration in pixels per second squared.
    pub fling_deceleration: f32,
    /// Flings slower than this (pixels per second) are treated as a plain release.
    pub min_fling_velocity: f32,
}

impl Default for WheelConfig {
    fn default() -> Self {
        Self {
            item_height: 40.0,
            visible_items: 5,
            circular: false,
            haptic_feedback: true,
            settle_duration_ms: 250,
            easing: Easing::EaseOutCubic,
            fling_deceleration: 1500.0,
            min_fling_velocity: 10.0,
        }
    }
}

impl WheelConfig {
    /// Create the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the item height using builder pattern.
    pub fn with_item_height(mut self, height: f32) -> Self {
        self.item_height = height;
        self
    }

    /// Set the visible row count using builder pattern.
    pub fn with_visible_items(mut self, count: usize) -> Self {
        self.visible_items = count;
        self
    }

    /// Set whether the lane wraps using builder pattern.
    pub fn with_circular(mut self, circular: bool) -> Self {
        self.circular = circular;
        self
    }

    /// Enable or disable haptics using builder pattern.
    pub fn with_haptic_feedback(mut self, enabled: bool) -> Self {
        self.haptic_feedback = enabled;
        self
    }

    /// Set the settle animation duration using builder pattern.
    pub fn with_settle_duration(mut self, duration: Duration) -> Self {
        self.settle_duration_ms = u64::try_from(duration.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// Set the settle easing using builder pattern.
    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    /// Set the fling deceleration using builder pattern.
    pub fn with_fling_deceleration(mut self, deceleration: f32) -> Self {
        self.fling_deceleration = deceleration;
        self
    }

    /// Lane geometry described by this configuration.
    pub fn geometry(&self) -> WheelGeometry {
        WheelGeometry::with_visible_items(self.item_height, self.visible_items)
    }

    /// Settle animation duration.
    pub fn settle_duration(&self) -> Duration {
        Duration::from_millis(self.settle_duration_ms)
    }

    /// Check that every value is usable.
    pub fn validate(&self) -> Result<()> {
        if !(self.item_height.is_finite() && self.item_height > 0.0) {
            return Err(Error::invalid_config(
                "item_height",
                format!("must be a positive number, got {}", self.item_height),
            ));
        }
        if self.visible_items == 0 {
            return Err(Error::invalid_config("visible_items", "must be at least 1"));
        }
        if !(self.fling_deceleration.is_finite() && self.fling_deceleration > 0.0) {
            return Err(Error::invalid_config(
                "fling_deceleration",
                format!("must be a positive number, got {}", self.fling_deceleration),
            ));
        }
        if self.min_fling_velocity.is_nan() || self.min_fling_velocity < 0.0 {
            return Err(Error::invalid_config(
                "min_fling_velocity",
                "must not be negative",
            ));
        }
        Ok(())
    }
}

/// Configuration for a dependent picker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PickerConfig {
    /// Configuration shared by every lane.
    pub wheel: WheelConfig,
    /// Initial lane visibility.
    pub mode: PickerMode,
    /// Index hidden lanes are forced to when the mode hides them.
    pub hidden_lane_index: usize,
    /// Zero-padding widths used to compare selection tuples against bounds.
    pub encoding_widths: Vec<usize>,
    /// Inclusive lower bound on the selection tuple.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minimum: Option<Vec<i64>>,
    /// Inclusive upper bound on the selection tuple.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maximum: Option<Vec<i64>>,
}

impl Default for PickerConfig {
    fn default() -> Self {
        Self {
            wheel: WheelConfig::default(),
            mode: PickerMode::default(),
            hidden_lane_index: 1,
            encoding_widths: vec![4, 2, 2],
            minimum: None,
            maximum: None,
        }
    }
}

impl PickerConfig {
    /// Create the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the lane configuration using builder pattern.
    pub fn with_wheel(mut self, wheel: WheelConfig) -> Self {
        self.wheel = wheel;
        self
    }

    /// Set the initial mode using builder pattern.
    pub fn with_mode(mut self, mode: PickerMode) -> Self {
        self.mode = mode;
        self
    }

    /// Set the hidden lane sentinel using builder pattern.
    pub fn with_hidden_lane_index(mut self, index: usize) -> Self {
        self.hidden_lane_index = index;
        self
    }

    /// Set the encoding widths using builder pattern.
    pub fn with_encoding_widths(mut self, widths: impl Into<Vec<usize>>) -> Self {
        self.encoding_widths = widths.into();
        self
    }

    /// Set the lower bound using builder pattern.
    pub fn with_minimum(mut self, minimum: impl Into<Vec<i64>>) -> Self {
        self.minimum = Some(minimum.into());
        self
    }

    /// Set the upper bound using builder pattern.
    pub fn with_maximum(mut self, maximum: impl Into<Vec<i64>>) -> Self {
        self.maximum = Some(maximum.into());
        self
    }

    /// Parse a configuration from TOML text and validate it.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration from a TOML file and validate it.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        tracing::debug!(target: targets::CONFIG, path = %path.display(), "loading picker configuration");
        Self::from_toml_str(&text)
    }

    /// Serialize this configuration as TOML.
    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string(self)?)
    }

    /// Check that every value is usable.
    pub fn validate(&self) -> Result<()> {
        self.wheel.validate()?;
        if self.encoding_widths.is_empty() {
            return Err(Error::invalid_config("encoding_widths", "must not be empty"));
        }
        if self.encoding_widths.contains(&0) {
            return Err(Error::invalid_config(
                "encoding_widths",
                "every width must be at least 1",
            ));
        }
        for (field, bound) in [("minimum", &self.minimum), ("maximum", &self.maximum)] {
            if bound.as_ref().is_some_and(|b| b.is_empty()) {
                return Err(Error::invalid_config(field, "must not be empty"));
            }
        }
        Ok(())
    }
}
