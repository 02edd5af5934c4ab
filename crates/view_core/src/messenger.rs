//! Outbound half of the host bridge: fire-and-forget message sends.

use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};
use shared::protocol::ViewMessage;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MessengerError {
    #[error("outbound message queue is full")]
    QueueFull,
    #[error("host message channel disconnected")]
    Disconnected,
}

pub trait HostMessenger {
    fn send(&self, message: ViewMessage) -> Result<(), MessengerError>;
}

/// Queues messages on a bounded channel drained by the host integration.
#[derive(Debug, Clone)]
pub struct ChannelMessenger {
    tx: Sender<ViewMessage>,
}

impl ChannelMessenger {
    pub fn new(tx: Sender<ViewMessage>) -> Self {
        Self { tx }
    }

    pub fn bounded(capacity: usize) -> (Self, Receiver<ViewMessage>) {
        let (tx, rx) = bounded(capacity);
        (Self::new(tx), rx)
    }
}

impl HostMessenger for ChannelMessenger {
    fn send(&self, message: ViewMessage) -> Result<(), MessengerError> {
        let name = message.name();
        match self.tx.try_send(message) {
            Ok(()) => {
                tracing::debug!(message = name, "queued view->host message");
                Ok(())
            }
            Err(TrySendError::Full(_)) => Err(MessengerError::QueueFull),
            Err(TrySendError::Disconnected(_)) => Err(MessengerError::Disconnected),
        }
    }
}

#[cfg(test)]
#[path = "tests/messenger_tests.rs"]
mod tests;
