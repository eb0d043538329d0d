//! Notifier port for outgoing e-mail style messages.

use async_trait::async_trait;

use crate::error::ServiceError;

/// Someone who receives notifications.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recipient {
    pub name: String,
    pub email: String,
}

/// A rendered message ready to send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub subject: String,
    pub body: String,
}

/// Delivers rendered messages.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, recipient: &Recipient, message: &Message) -> Result<(), ServiceError>;
}
