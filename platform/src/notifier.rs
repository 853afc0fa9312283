// Notification fan-out seam
// The transport (socket layer, push channel) lives outside the core; it
// consumes events through the EventSink trait. Delivery is fire-and-forget:
// a failed or dropped notification never rolls back the state change that
// produced it.

use async_trait::async_trait;
use log::debug;
use poweroyo_common::{api::NotifyEvent, crypto::Id};
use serde_json::Value;
use tokio::sync::mpsc;

/// Delivery sink for notification events
#[async_trait]
pub trait EventSink: Send + Sync {
    /// Deliver one event for one account
    /// Implementations must swallow their own failures
    async fn notify(&self, account: &Id, event: NotifyEvent, payload: Value);
}

/// Sink that drops every event
pub struct NullSink;

#[async_trait]
impl EventSink for NullSink {
    async fn notify(&self, _account: &Id, _event: NotifyEvent, _payload: Value) {}
}

/// One delivered notification
#[derive(Debug, Clone)]
pub struct Notification {
    pub account: Id,
    pub event: NotifyEvent,
    pub payload: Value,
}

/// Sink pushing notifications into an unbounded channel
/// The socket fan-out task (or a test) drains the receiving half
pub struct ChannelSink {
    sender: mpsc::UnboundedSender<Notification>,
}

impl ChannelSink {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Notification>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }
}

#[async_trait]
impl EventSink for ChannelSink {
    async fn notify(&self, account: &Id, event: NotifyEvent, payload: Value) {
        let notification = Notification {
            account: *account,
            event,
            payload,
        };
        if self.sender.send(notification).is_err() {
            debug!("notification channel closed, dropping event for {}", account);
        }
    }
}
