pub const TOPIC_DISCOVERY_CONFIG: &str = "homeassistant/binary_sensor/washingmachine/running/config";
pub const TOPIC_STATE: &str = "imagecompare/washingmachine/state";
pub const TOPIC_AVAILABILITY: &str = "imagecompare/washingmachine/availability";

pub const PAYLOAD_ON: &str = "on";
pub const PAYLOAD_OFF: &str = "off";
pub const PAYLOAD_ONLINE: &str = "online";
pub const PAYLOAD_OFFLINE: &str = "offline";
