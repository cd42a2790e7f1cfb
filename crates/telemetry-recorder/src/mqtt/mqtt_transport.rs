//! MQTT subscription loop feeding the ingestion pipeline.
//!
//! rumqttc reconnects on the next `poll` after a connection error, so the
//! loop only backs off and keeps polling. The telemetry topic is
//! re-subscribed on every ConnAck because clean sessions drop subscriptions.

use crate::{AppError, AppResult, MqttPublisher, config::MqttConfig};

use std::{panic::Location, sync::Arc};

use error_location::ErrorLocation;
use rumqttc::{AsyncClient, Event, EventLoop, MqttOptions, Packet, QoS};
use telemetry_recorder_core::{IngestOutcome, Ingestor};
use tokio::sync::watch;
use tracing::{debug, error, info, instrument, warn};

/// Broker connection driving ingestion.
pub struct MqttTransport {
    client: AsyncClient,
    event_loop: EventLoop,
    config: MqttConfig,
}

impl MqttTransport {
    /// Build the client and event loop. No network I/O happens until [`run`](Self::run).
    #[track_caller]
    pub fn new(config: &MqttConfig) -> AppResult<Self> {
        // rumqttc panics on these client ids instead of returning an error.
        if config.client_id.is_empty() || config.client_id.starts_with(' ') {
            return Err(AppError::TransportError {
                reason: format!("Invalid MQTT client id {:?}", config.client_id),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        let mut options = MqttOptions::new(&config.client_id, &config.host, config.port);
        options.set_keep_alive(config.keep_alive());

        let (client, event_loop) = AsyncClient::new(options, config.request_capacity);

        Ok(Self {
            client,
            event_loop,
            config: config.clone(),
        })
    }

    /// Publisher sharing this transport's connection.
    pub fn publisher(&self) -> MqttPublisher {
        MqttPublisher::new(self.client.clone())
    }

    /// Poll the broker until `shutdown_rx` flips, handing telemetry to `ingestor`.
    #[instrument(skip_all, fields(host = %self.config.host, port = self.config.port))]
    pub async fn run(mut self, ingestor: Arc<Ingestor>, mut shutdown_rx: watch::Receiver<bool>) {
        info!("MQTT transport starting");

        loop {
            tokio::select! {
                _ = shutdown_rx.changed() => {
                    info!("MQTT transport shutting down");
                    break;
                }
                event = self.event_loop.poll() => match event {
                    Ok(Event::Incoming(Packet::ConnAck(_))) => {
                        info!(topic = %self.config.telemetry_topic, "Connected to broker, subscribing");
                        if let Err(e) = self
                            .client
                            .try_subscribe(&self.config.telemetry_topic, QoS::AtMostOnce)
                        {
                            error!(error = ?e, "Failed to queue telemetry subscription");
                        }
                    }
                    Ok(Event::Incoming(Packet::Publish(publish))) => {
                        if publish.topic != self.config.telemetry_topic {
                            debug!(topic = %publish.topic, "Ignoring message on unexpected topic");
                            continue;
                        }
                        if let IngestOutcome::RecordDropped { session_id } =
                            ingestor.handle(&publish.payload)
                        {
                            debug!(session_id = %session_id, "Reading shown live but not recorded");
                        }
                    }
                    Ok(_) => {}
                    Err(e) => {
                        warn!(
                            error = %e,
                            retry_in_ms = self.config.reconnect_delay_ms,
                            "Broker connection error"
                        );
                        tokio::select! {
                            _ = shutdown_rx.changed() => {
                                info!("MQTT transport shutting down");
                                break;
                            }
                            _ = tokio::time::sleep(self.config.reconnect_delay()) => {}
                        }
                    }
                }
            }
        }

        if let Err(e) = self.client.try_disconnect() {
            debug!(error = ?e, "Disconnect request not queued");
        }
    }
}
