use crate::{
    config::{ConfigError, MonitorConfig},
    debounce::DebounceEngine,
    discovery::DiscoveryConfig,
    driver::PublishDriver,
    evaluator::StateEvaluator,
    sampler::{RasterImage, SampleError},
    types::{Publication, RawState, Reading},
};

#[derive(Debug, Clone, PartialEq)]
pub struct CycleOutcome {
    pub reading: Reading,
    pub confirmed: Option<RawState>,
    pub publications: Vec<Publication>,
}

/// One poll cycle end to end: evaluate the snapshot, debounce the raw state,
/// and decide what to publish.
#[derive(Debug, Clone)]
pub struct Monitor {
    evaluator: StateEvaluator,
    debounce: DebounceEngine,
    driver: PublishDriver,
}

impl Monitor {
    pub fn new(config: MonitorConfig, discovery: &DiscoveryConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let payload = discovery
            .to_payload()
            .map_err(|err| ConfigError::Discovery(err.to_string()))?;

        Ok(Self {
            evaluator: StateEvaluator::new(&config),
            debounce: DebounceEngine::new(config.confirmation_threshold),
            driver: PublishDriver::new(payload),
        })
    }

    pub fn debounce(&self) -> &DebounceEngine {
        &self.debounce
    }

    pub fn cycle(&mut self, image: Option<&RasterImage>) -> Result<CycleOutcome, SampleError> {
        let reading = self.evaluator.evaluate(image)?;
        let confirmed = self.debounce.observe(reading.state);
        let publications = self.driver.cycle(confirmed);

        Ok(CycleOutcome {
            reading,
            confirmed,
            publications,
        })
    }
}
