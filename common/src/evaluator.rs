use crate::{
    config::{MonitorConfig, Region, Thresholds},
    sampler::{average_brightness, red_green_differential, RasterImage, SampleError},
    types::{RawState, Reading},
};

/// The reference LED reads strongly red in daylight; above the cutoff it is day.
pub fn is_daytime(differential: f64, cutoff: f64) -> bool {
    differential > cutoff
}

#[derive(Debug, Clone)]
pub struct StateEvaluator {
    display_region: Region,
    reference_region: Region,
    thresholds: Thresholds,
}

impl StateEvaluator {
    pub fn new(config: &MonitorConfig) -> Self {
        Self {
            display_region: config.display_region,
            reference_region: config.reference_region,
            thresholds: config.thresholds,
        }
    }

    /// `None` means the snapshot could not be fetched or decoded.
    pub fn evaluate(&self, image: Option<&RasterImage>) -> Result<Reading, SampleError> {
        let Some(image) = image else {
            return Ok(Reading::unreachable());
        };

        let display = average_brightness(image, self.display_region)?;
        let reference = red_green_differential(image, self.reference_region)?;
        let daytime = is_daytime(reference, self.thresholds.daytime_differential);

        let threshold = if daytime {
            self.thresholds.day_time
        } else {
            self.thresholds.night_time
        };
        let state = if display > threshold {
            RawState::On
        } else {
            RawState::Off
        };

        Ok(Reading {
            state,
            display_brightness: Some(display),
            reference_differential: Some(reference),
            daytime: Some(daytime),
        })
    }
}
