//! Notifier that writes messages to the tracing log instead of delivering them.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use tracing::info;

use crate::error::ServiceError;
use crate::port::outbound::notifier::{Message, Notifier, Recipient};

/// Logs each message at `info`. Stands in for a mail provider.
#[derive(Debug, Default)]
pub struct LogNotifier {
    sent: AtomicUsize,
}

impl LogNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Messages logged so far.
    pub fn sent_count(&self) -> usize {
        self.sent.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl Notifier for LogNotifier {
    async fn send(&self, recipient: &Recipient, message: &Message) -> Result<(), ServiceError> {
        info!(
            to = %recipient.email,
            name = %recipient.name,
            subject = %message.subject,
            body_len = message.body.len(),
            "Notification sent"
        );
        self.sent.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }
}
