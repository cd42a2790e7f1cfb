mod mqtt_publisher;
mod mqtt_transport;

pub(crate) use {mqtt_publisher::MqttPublisher, mqtt_transport::MqttTransport};
