use serde::Serialize;

use crate::topics::{
    PAYLOAD_OFF, PAYLOAD_OFFLINE, PAYLOAD_ON, PAYLOAD_ONLINE, TOPIC_AVAILABILITY, TOPIC_STATE,
};

#[derive(Debug, Clone, Serialize)]
pub struct DiscoveryDevice {
    pub identifiers: Vec<&'static str>,
    pub model: &'static str,
    pub manufacturer: &'static str,
    pub name: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct DiscoveryOrigin {
    pub name: &'static str,
    pub sw: &'static str,
    pub url: &'static str,
}

/// Home Assistant MQTT discovery descriptor for the running binary sensor.
#[derive(Debug, Clone, Serialize)]
pub struct DiscoveryConfig {
    pub device: DiscoveryDevice,
    pub device_class: &'static str,
    pub name: &'static str,
    pub object_id: &'static str,
    pub origin: DiscoveryOrigin,
    pub state_topic: &'static str,
    pub payload_off: &'static str,
    pub payload_on: &'static str,
    pub availability_topic: &'static str,
    pub payload_available: &'static str,
    pub payload_not_available: &'static str,
    pub enabled_by_default: bool,
    pub entity_category: &'static str,
    pub unique_id: &'static str,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            device: DiscoveryDevice {
                identifiers: vec!["washingmachine"],
                model: "H7 W945WB",
                manufacturer: "Hotpoint",
                name: "Washing Machine",
            },
            device_class: "running",
            name: "Running",
            object_id: "washing_machine_running",
            origin: DiscoveryOrigin {
                name: "Big P Image Compare",
                sw: "0.0.0",
                url: "https://bi.gp",
            },
            state_topic: TOPIC_STATE,
            payload_off: PAYLOAD_OFF,
            payload_on: PAYLOAD_ON,
            availability_topic: TOPIC_AVAILABILITY,
            payload_available: PAYLOAD_ONLINE,
            payload_not_available: PAYLOAD_OFFLINE,
            enabled_by_default: true,
            entity_category: "diagnostic",
            unique_id: "imagecompare_washingmachine",
        }
    }
}

impl DiscoveryConfig {
    pub fn to_payload(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }
}
