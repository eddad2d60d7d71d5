use crate::topics::{PAYLOAD_OFF, PAYLOAD_ON};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawState {
    On,
    Off,
    Unreachable,
}

impl RawState {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::On => PAYLOAD_ON,
            Self::Off => PAYLOAD_OFF,
            Self::Unreachable => "unreachable",
        }
    }
}

/// Everything measured during one evaluation, kept for logging.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reading {
    pub state: RawState,
    pub display_brightness: Option<f64>,
    pub reference_differential: Option<f64>,
    pub daytime: Option<bool>,
}

impl Reading {
    pub fn unreachable() -> Self {
        Self {
            state: RawState::Unreachable,
            display_brightness: None,
            reference_differential: None,
            daytime: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Publication {
    pub topic: &'static str,
    pub payload: Vec<u8>,
    pub retained: bool,
}

impl Publication {
    pub fn new(topic: &'static str, payload: impl Into<Vec<u8>>) -> Self {
        Self {
            topic,
            payload: payload.into(),
            retained: false,
        }
    }
}
