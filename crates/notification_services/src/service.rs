use std::sync::Arc;

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_ses::Client as SesClient;

use crate::types::{Mailer, NotificationError};

/// Mailer backed by AWS SES.
#[derive(Debug, Clone)]
pub struct SesMailer {
    ses_client: SesClient,
    from_email: String,
}

impl SesMailer {
    /// Creates a new SES mailer from the ambient AWS configuration.
    pub async fn new() -> Result<Self, NotificationError> {
        let config = aws_config::defaults(BehaviorVersion::latest()).load().await;

        let ses_client = SesClient::new(&config);

        let from_email = std::env::var("FROM_EMAIL")
            .unwrap_or_else(|_| "noreply@yelpcamp.example.com".to_string());

        Ok(Self {
            ses_client,
            from_email,
        })
    }
}

#[async_trait]
impl Mailer for SesMailer {
    async fn send_email(
        &self,
        to: &str,
        subject: &str,
        body: &str,
    ) -> Result<String, NotificationError> {
        let subject_content = aws_sdk_ses::types::Content::builder()
            .data(subject)
            .build()
            .map_err(|e| NotificationError::SesError(format!("Failed to build subject: {}", e)))?;

        let text_content = aws_sdk_ses::types::Content::builder()
            .data(body)
            .build()
            .map_err(|e| NotificationError::SesError(format!("Failed to build body: {}", e)))?;

        let ses_body = aws_sdk_ses::types::Body::builder().text(text_content).build();

        let message = aws_sdk_ses::types::Message::builder()
            .subject(subject_content)
            .body(ses_body)
            .build();

        let destination = aws_sdk_ses::types::Destination::builder()
            .to_addresses(to)
            .build();

        let result = self
            .ses_client
            .send_email()
            .source(&self.from_email)
            .destination(destination)
            .message(message)
            .send()
            .await;

        match result {
            Ok(output) => {
                let message_id = output.message_id().to_string();
                log::info!("Email sent to {} (SES message id {})", to, message_id);
                Ok(message_id)
            }
            Err(e) => {
                log::error!("AWS SES error: {:#?}", e);
                let error_msg = if let Some(service_error) = e.as_service_error() {
                    format!("AWS SES service error: {:?}", service_error)
                } else {
                    format!("AWS SES error: {}", e)
                };
                Err(NotificationError::SesError(error_msg))
            }
        }
    }
}

/// Notification service for transactional mail, currently password resets.
#[derive(Clone)]
pub struct NotificationService {
    mailer: Arc<dyn Mailer>,
    base_url: String,
}

impl NotificationService {
    /// Creates a notification service sending through the given mailer.
    /// `base_url` is the externally reachable address used in emailed links.
    pub fn new(mailer: Arc<dyn Mailer>, base_url: String) -> Self {
        Self { mailer, base_url }
    }

    /// Sends the password-reset email carrying the single-use token link.
    pub async fn send_password_reset_email(
        &self,
        email: &str,
        username: &str,
        reset_token: &str,
    ) -> Result<(), NotificationError> {
        let reset_url = reset_link(&self.base_url, reset_token);

        let subject = "YelpCamp password reset";
        let body = format!(
            "Hi {},\n\n\
             You are receiving this because you (or someone else) requested a reset \
             of the password for your YelpCamp account.\n\n\
             Please visit the following link to complete the process:\n\n\
             {}\n\n\
             The link expires in one hour. If you did not request this, ignore this \
             email and your password will remain unchanged.\n",
            username, reset_url
        );

        self.mailer.send_email(email, subject, &body).await?;

        log::info!("Password reset email sent to {}", email);
        Ok(())
    }
}

/// Builds the reset URL a user follows from the email.
fn reset_link(base_url: &str, token: &str) -> String {
    format!("{}/reset/{}", base_url.trim_end_matches('/'), token)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct RecordingMailer {
        sent: Mutex<Vec<(String, String, String)>>,
    }

    #[async_trait]
    impl Mailer for RecordingMailer {
        async fn send_email(
            &self,
            to: &str,
            subject: &str,
            body: &str,
        ) -> Result<String, NotificationError> {
            self.sent.lock().unwrap().push((
                to.to_string(),
                subject.to_string(),
                body.to_string(),
            ));
            Ok("test-message-id".to_string())
        }
    }

    #[test]
    fn test_reset_link_format() {
        assert_eq!(
            reset_link("https://yelpcamp.example.com", "abc123"),
            "https://yelpcamp.example.com/reset/abc123"
        );
        // Trailing slash must not double up
        assert_eq!(
            reset_link("https://yelpcamp.example.com/", "abc123"),
            "https://yelpcamp.example.com/reset/abc123"
        );
    }

    #[tokio::test]
    async fn test_reset_email_contains_link_and_recipient() {
        let mailer = Arc::new(RecordingMailer {
            sent: Mutex::new(Vec::new()),
        });
        let service = NotificationService::new(
            mailer.clone(),
            "https://yelpcamp.example.com".to_string(),
        );

        service
            .send_password_reset_email("camper@example.com", "camper", "deadbeef")
            .await
            .unwrap();

        let sent = mailer.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        let (to, subject, body) = &sent[0];
        assert_eq!(to, "camper@example.com");
        assert_eq!(subject, "YelpCamp password reset");
        assert!(body.contains("https://yelpcamp.example.com/reset/deadbeef"));
        assert!(body.contains("Hi camper,"));
    }
}
