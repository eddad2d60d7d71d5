pub mod config;
pub mod debounce;
pub mod discovery;
pub mod driver;
pub mod evaluator;
pub mod monitor;
pub mod sampler;
pub mod topics;
pub mod types;

pub use config::{ConfigError, MonitorConfig, Region, Thresholds};
pub use debounce::DebounceEngine;
pub use discovery::DiscoveryConfig;
pub use driver::PublishDriver;
pub use evaluator::{is_daytime, StateEvaluator};
pub use monitor::{CycleOutcome, Monitor};
pub use sampler::{average_brightness, red_green_differential, RasterImage, SampleError};
pub use topics::*;
pub use types::{Publication, RawState, Reading};
