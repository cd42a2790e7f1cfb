use crate::config::{
    default_client_id, default_command_topic, default_keep_alive_secs, default_mqtt_host,
    default_mqtt_port, default_reconnect_delay_ms, default_request_capacity,
    default_telemetry_topic,
};

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Broker connection and topic configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MqttConfig {
    /// Broker host name.
    #[serde(default = "default_mqtt_host")]
    pub host: String,
    /// Broker port.
    #[serde(default = "default_mqtt_port")]
    pub port: u16,
    /// Client identifier presented to the broker.
    #[serde(default = "default_client_id")]
    pub client_id: String,
    /// MQTT keep-alive interval in seconds.
    #[serde(default = "default_keep_alive_secs")]
    pub keep_alive_secs: u64,
    /// Pause after a connection error before polling again.
    #[serde(default = "default_reconnect_delay_ms")]
    pub reconnect_delay_ms: u64,
    /// Capacity of the client's outbound request queue.
    #[serde(default = "default_request_capacity")]
    pub request_capacity: usize,
    /// Topic carrying sensor samples.
    #[serde(default = "default_telemetry_topic")]
    pub telemetry_topic: String,
    /// Topic actuator commands are published on.
    #[serde(default = "default_command_topic")]
    pub command_topic: String,
}

impl MqttConfig {
    /// Keep-alive as a duration.
    pub fn keep_alive(&self) -> Duration {
        Duration::from_secs(self.keep_alive_secs)
    }

    /// Reconnect back-off as a duration.
    pub fn reconnect_delay(&self) -> Duration {
        Duration::from_millis(self.reconnect_delay_ms)
    }
}

impl Default for MqttConfig {
    fn default() -> Self {
        Self {
            host: default_mqtt_host(),
            port: default_mqtt_port(),
            client_id: default_client_id(),
            keep_alive_secs: default_keep_alive_secs(),
            reconnect_delay_ms: default_reconnect_delay_ms(),
            request_capacity: default_request_capacity(),
            telemetry_topic: default_telemetry_topic(),
            command_topic: default_command_topic(),
        }
    }
}
