use crate::{
    topics::{
        PAYLOAD_OFF, PAYLOAD_OFFLINE, PAYLOAD_ON, PAYLOAD_ONLINE, TOPIC_AVAILABILITY,
        TOPIC_DISCOVERY_CONFIG, TOPIC_STATE,
    },
    types::{Publication, RawState},
};

/// Maps the debounced outcome of a cycle onto outbound MQTT messages.
#[derive(Debug, Clone)]
pub struct PublishDriver {
    discovery_payload: Vec<u8>,
}

impl PublishDriver {
    pub fn new(discovery_payload: Vec<u8>) -> Self {
        Self { discovery_payload }
    }

    pub fn cycle(&self, confirmed: Option<RawState>) -> Vec<Publication> {
        let mut publications = vec![Publication::new(
            TOPIC_DISCOVERY_CONFIG,
            self.discovery_payload.clone(),
        )];

        match confirmed {
            None => {}
            // Leave the state topic alone so the last known state survives downstream.
            Some(RawState::Unreachable) => {
                publications.push(Publication::new(TOPIC_AVAILABILITY, PAYLOAD_OFFLINE));
            }
            Some(RawState::On) => {
                publications.push(Publication::new(TOPIC_STATE, PAYLOAD_ON));
                publications.push(Publication::new(TOPIC_AVAILABILITY, PAYLOAD_ONLINE));
            }
            Some(RawState::Off) => {
                publications.push(Publication::new(TOPIC_STATE, PAYLOAD_OFF));
                publications.push(Publication::new(TOPIC_AVAILABILITY, PAYLOAD_ONLINE));
            }
        }

        publications
    }
}
