use crate::{Action, CoreResult};

use std::sync::Arc;

use tracing::{info, instrument};

/// Outbound half of the transport.
///
/// `publish` must not wait for the broker; it only queues the message.
pub trait CommandPublisher: Send + Sync {
    /// Queue `payload` for delivery on `topic`.
    fn publish(&self, topic: &str, payload: &[u8]) -> CoreResult<()>;
}

/// Validates actuator commands and publishes them fire-and-forget.
#[derive(Clone)]
pub struct CommandDispatcher {
    publisher: Arc<dyn CommandPublisher>,
    topic: String,
}

impl CommandDispatcher {
    /// Dispatcher publishing to `topic`.
    pub fn new(publisher: Arc<dyn CommandPublisher>, topic: impl Into<String>) -> Self {
        Self {
            publisher,
            topic: topic.into(),
        }
    }

    /// Validate `command` and publish it once.
    ///
    /// # Errors
    ///
    /// [`CoreError::InvalidCommand`](crate::CoreError::InvalidCommand) for
    /// unrecognized text (nothing is published), or the publisher's error.
    #[track_caller]
    #[instrument(skip(self))]
    pub fn send(&self, command: &str) -> CoreResult<Action> {
        let action: Action = command.parse()?;
        self.send_action(action)?;
        Ok(action)
    }

    /// Publish an already-validated action once.
    #[instrument(skip(self))]
    pub fn send_action(&self, action: Action) -> CoreResult<()> {
        self.publisher
            .publish(&self.topic, action.as_str().as_bytes())?;

        info!(action = %action, topic = %self.topic, "Command published");

        Ok(())
    }

    /// Topic commands are published on.
    pub fn topic(&self) -> &str {
        &self.topic
    }
}
