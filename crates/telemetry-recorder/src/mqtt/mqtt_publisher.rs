use std::panic::Location;

use error_location::ErrorLocation;
use rumqttc::{AsyncClient, QoS};
use telemetry_recorder_core::{CommandPublisher, CoreError, CoreResult};

/// [`CommandPublisher`] over the MQTT client's request queue.
///
/// `try_publish` only enqueues; the event loop delivers. No broker
/// acknowledgement is awaited.
#[derive(Clone)]
pub struct MqttPublisher {
    client: AsyncClient,
}

impl MqttPublisher {
    /// Wrap a connected client.
    pub fn new(client: AsyncClient) -> Self {
        Self { client }
    }
}

impl CommandPublisher for MqttPublisher {
    #[track_caller]
    fn publish(&self, topic: &str, payload: &[u8]) -> CoreResult<()> {
        self.client
            .try_publish(topic, QoS::AtLeastOnce, false, payload.to_vec())
            .map_err(|e| CoreError::Publish {
                reason: e.to_string(),
                location: ErrorLocation::from(Location::caller()),
            })
    }
}
