use tokio::sync::mpsc;
use tracing::{debug, error, info};

use crate::domain::notification::{Notification, NotificationKind};

/// Fire-and-forget sink for user-facing messages.
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// Writes notifications to the tracing log.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, notification: Notification) {
        match notification.kind {
            NotificationKind::Error => error!(message = %notification.message, "notification"),
            NotificationKind::Success | NotificationKind::Info => {
                info!(kind = ?notification.kind, message = %notification.message, "notification")
            }
        }
    }
}

/// Forwards notifications to a receiver owned by the UI.
#[derive(Debug, Clone)]
pub struct ChannelNotifier {
    sender: mpsc::UnboundedSender<Notification>,
}

impl ChannelNotifier {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Notification>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }
}

impl Notifier for ChannelNotifier {
    fn notify(&self, notification: Notification) {
        if let Err(err) = self.sender.send(notification) {
            debug!(message = %err.0.message, "Notification dropped, receiver closed");
        }
    }
}
