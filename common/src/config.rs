use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Region {
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn pixel_count(&self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// True when the whole rectangle lies inside an image of the given size.
    pub fn fits_within(&self, width: u32, height: u32) -> bool {
        let right = u64::from(self.x) + u64::from(self.width);
        let bottom = u64::from(self.y) + u64::from(self.height);
        right <= u64::from(width) && bottom <= u64::from(height)
    }
}

/// Brightness thresholds on the 16-bit channel scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    pub day_time: f64,
    pub night_time: f64,
    pub daytime_differential: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            day_time: 21_000.0,
            night_time: 17_000.0,
            daytime_differential: 100.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonitorConfig {
    pub display_region: Region,
    pub reference_region: Region,
    #[serde(default)]
    pub thresholds: Thresholds,
    #[serde(default = "default_confirmation_threshold")]
    pub confirmation_threshold: u32,
}

fn default_confirmation_threshold() -> u32 {
    3
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            display_region: Region::new(162, 273, 27, 20),
            reference_region: Region::new(394, 19, 27, 20),
            thresholds: Thresholds::default(),
            confirmation_threshold: default_confirmation_threshold(),
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{name} region is empty: {region:?}")]
    EmptyRegion { name: &'static str, region: Region },

    #[error("day time threshold {day_time} must be greater than night time threshold {night_time}")]
    ThresholdOrder { day_time: f64, night_time: f64 },

    #[error("threshold {name} is not a finite number")]
    NonFiniteThreshold { name: &'static str },

    #[error("discovery payload could not be encoded: {0}")]
    Discovery(String),
}

impl MonitorConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.display_region.is_empty() {
            return Err(ConfigError::EmptyRegion {
                name: "display",
                region: self.display_region,
            });
        }
        if self.reference_region.is_empty() {
            return Err(ConfigError::EmptyRegion {
                name: "reference",
                region: self.reference_region,
            });
        }

        let thresholds = &self.thresholds;
        for (name, value) in [
            ("day_time", thresholds.day_time),
            ("night_time", thresholds.night_time),
            ("daytime_differential", thresholds.daytime_differential),
        ] {
            if !value.is_finite() {
                return Err(ConfigError::NonFiniteThreshold { name });
            }
        }

        if thresholds.day_time <= thresholds.night_time {
            return Err(ConfigError::ThresholdOrder {
                day_time: thresholds.day_time,
                night_time: thresholds.night_time,
            });
        }

        Ok(())
    }
}
