//! Log-only delivery, used when SMTP is not configured.

use async_trait::async_trait;

use crate::delivery::email::EmailError;
use crate::notifier::{Notifier, OutboundEmail};

#[derive(Debug, Default, Clone, Copy)]
pub struct LogDelivery;

#[async_trait]
impl Notifier for LogDelivery {
    async fn send(&self, email: OutboundEmail) -> Result<(), EmailError> {
        tracing::warn!(
            to = %email.to,
            subject = %email.subject,
            attachments = email.attachments.len(),
            "SMTP not configured; e-mail not sent",
        );
        Ok(())
    }

    fn channel(&self) -> &'static str {
        "log"
    }
}
