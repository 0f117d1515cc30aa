use async_trait::async_trait;

/// Errors raised while delivering notifications.
#[derive(Debug, thiserror::Error)]
pub enum NotificationError {
    /// Simple email service (SES) errors.
    #[error("AWS SES error: {0}")]
    SesError(String),

    /// Invalid email format.
    #[error("Invalid email format")]
    InvalidEmail,
}

/// Trait for email delivery implementations.
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Sends a plain-text email, returning the provider message id.
    async fn send_email(
        &self,
        to: &str,
        subject: &str,
        body: &str,
    ) -> Result<String, NotificationError>;
}
