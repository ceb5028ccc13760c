//! The [`Notifier`] trait and its message type.

use std::sync::Arc;

use async_trait::async_trait;

use crate::delivery::email::EmailError;

/// A file attached to an outbound e-mail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailAttachment {
    pub file_name: String,
    pub content_type: String,
    pub content: Vec<u8>,
}

/// A plain-text e-mail with optional attachments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundEmail {
    pub to: String,
    pub subject: String,
    pub body: String,
    pub attachments: Vec<EmailAttachment>,
}

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, email: OutboundEmail) -> Result<(), EmailError>;

    /// Short channel name for logs.
    fn channel(&self) -> &'static str;
}

/// Send `email` on a background task. Failures are logged and never
/// reach the caller.
pub fn dispatch(notifier: Arc<dyn Notifier>, email: OutboundEmail) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let to = email.to.clone();
        let subject = email.subject.clone();
        if let Err(e) = notifier.send(email).await {
            tracing::error!(
                channel = notifier.channel(),
                to = %to,
                subject = %subject,
                error = %e,
                "Failed to deliver e-mail",
            );
        }
    })
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    struct Failing;

    #[async_trait]
    impl Notifier for Failing {
        async fn send(&self, _email: OutboundEmail) -> Result<(), EmailError> {
            Err(EmailError::Build("boom".into()))
        }

        fn channel(&self) -> &'static str {
            "failing"
        }
    }

    #[derive(Default)]
    struct Recording(Mutex<Vec<OutboundEmail>>);

    #[async_trait]
    impl Notifier for Recording {
        async fn send(&self, email: OutboundEmail) -> Result<(), EmailError> {
            self.0.lock().unwrap().push(email);
            Ok(())
        }

        fn channel(&self) -> &'static str {
            "recording"
        }
    }

    fn email() -> OutboundEmail {
        OutboundEmail {
            to: "asha@example.com".into(),
            subject: "Offer".into(),
            body: "Hello".into(),
            attachments: Vec::new(),
        }
    }

    #[tokio::test]
    async fn dispatch_delivers_in_background() {
        let recorder = Arc::new(Recording::default());
        dispatch(recorder.clone(), email()).await.unwrap();
        assert_eq!(recorder.0.lock().unwrap().as_slice(), &[email()]);
    }

    #[tokio::test]
    async fn dispatch_swallows_failures() {
        let handle = dispatch(Arc::new(Failing), email());
        assert!(handle.await.is_ok());
    }
}
