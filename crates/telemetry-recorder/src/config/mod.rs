mod buffer_config;
#[allow(clippy::module_inception)]
mod config;
mod identity_config;
mod mqtt_config;
mod server_config;
mod storage_config;
mod writer_config;

pub(crate) use {
    buffer_config::BufferConfig, config::Config, identity_config::IdentityConfig,
    mqtt_config::MqttConfig, server_config::ServerConfig, storage_config::StorageConfig,
    writer_config::WriterConfig,
};

pub(crate) const CONFIG_PATH_ENV: &str = "TELEMETRY_RECORDER_CONFIG";

pub(crate) const DEFAULT_BIND: &str = "0.0.0.0";
pub(crate) const DEFAULT_PORT: u16 = 3001;

pub(crate) const DEFAULT_MQTT_HOST: &str = "test.mosquitto.org";
pub(crate) const DEFAULT_MQTT_PORT: u16 = 1883;
pub(crate) const DEFAULT_CLIENT_ID: &str = "telemetry-recorder";
pub(crate) const DEFAULT_KEEP_ALIVE_SECS: u64 = 30;
pub(crate) const DEFAULT_RECONNECT_DELAY_MS: u64 = 2_000;
pub(crate) const DEFAULT_REQUEST_CAPACITY: usize = 64;
pub(crate) const DEFAULT_TELEMETRY_TOPIC: &str = "esp32/painel/telemetria";
pub(crate) const DEFAULT_COMMAND_TOPIC: &str = "esp32/painel/comando";

pub(crate) const DEFAULT_BUFFER_CAPACITY: usize = 50;
pub(crate) const DEFAULT_QUEUE_CAPACITY: usize = 256;
pub(crate) const DEFAULT_OWNER_HEADER: &str = "x-authenticated-user";

pub(crate) fn default_bind() -> String {
    DEFAULT_BIND.to_string()
}

pub(crate) fn default_port() -> u16 {
    DEFAULT_PORT
}

pub(crate) fn default_mqtt_host() -> String {
    DEFAULT_MQTT_HOST.to_string()
}

pub(crate) fn default_mqtt_port() -> u16 {
    DEFAULT_MQTT_PORT
}

pub(crate) fn default_client_id() -> String {
    DEFAULT_CLIENT_ID.to_string()
}

pub(crate) fn default_keep_alive_secs() -> u64 {
    DEFAULT_KEEP_ALIVE_SECS
}

pub(crate) fn default_reconnect_delay_ms() -> u64 {
    DEFAULT_RECONNECT_DELAY_MS
}

pub(crate) fn default_request_capacity() -> usize {
    DEFAULT_REQUEST_CAPACITY
}

pub(crate) fn default_telemetry_topic() -> String {
    DEFAULT_TELEMETRY_TOPIC.to_string()
}

pub(crate) fn default_command_topic() -> String {
    DEFAULT_COMMAND_TOPIC.to_string()
}

pub(crate) fn default_buffer_capacity() -> usize {
    DEFAULT_BUFFER_CAPACITY
}

pub(crate) fn default_queue_capacity() -> usize {
    DEFAULT_QUEUE_CAPACITY
}

pub(crate) fn default_owner_header() -> String {
    DEFAULT_OWNER_HEADER.to_string()
}
