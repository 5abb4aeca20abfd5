use async_trait::async_trait;
use plume::FrameworkError;
use serde::Deserialize;
use validator::Validate;

/// A submission from the contact form.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ContactMessage {
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    #[validate(email(message = "a valid email address is required"))]
    pub email: String,
    #[validate(length(min = 1, max = 4000, message = "message must not be empty"))]
    pub message: String,
}

#[async_trait]
pub trait ContactService: Send + Sync {
    async fn send(&self, message: ContactMessage) -> Result<(), FrameworkError>;
}

/// Records submissions in the application log. Stands in for an outbound
/// mail integration.
pub struct LoggingContactService {
    recipient: Option<String>,
}

impl LoggingContactService {
    pub fn new(recipient: Option<String>) -> Self {
        Self { recipient }
    }
}

#[async_trait]
impl ContactService for LoggingContactService {
    async fn send(&self, message: ContactMessage) -> Result<(), FrameworkError> {
        message
            .validate()
            .map_err(|e| FrameworkError::domain(e.to_string(), 400))?;
        tracing::info!(
            from = %message.email,
            name = %message.name,
            recipient = self.recipient.as_deref().unwrap_or("(unset)"),
            "contact form submission"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(email: &str, body: &str) -> ContactMessage {
        ContactMessage {
            name: "Maria".to_string(),
            email: email.to_string(),
            message: body.to_string(),
        }
    }

    #[tokio::test]
    async fn valid_message_is_accepted() {
        let svc = LoggingContactService::new(Some("owner@example.com".to_string()));
        assert!(svc.send(message("maria@example.com", "hello")).await.is_ok());
    }

    #[tokio::test]
    async fn invalid_email_is_rejected_with_a_client_error() {
        let svc = LoggingContactService::new(None);
        let err = svc
            .send(message("not-an-email", "hello"))
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), 400);
    }

    #[tokio::test]
    async fn empty_body_is_rejected() {
        let svc = LoggingContactService::new(None);
        assert!(svc.send(message("maria@example.com", "")).await.is_err());
    }
}
