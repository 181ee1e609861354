//! E-mail transport for approval notifications.
//!
//! Uses `lettre` for SMTP transport. Delivery is best effort: callers log
//! failures and move on.

use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor, message::header::ContentType,
    transport::smtp::authentication::Credentials,
};
use thiserror::Error;

use crate::config::EmailConfig;

/// Email service errors.
#[derive(Debug, Error)]
pub enum EmailError {
    /// Failed to build email message.
    #[error("Failed to build email: {0}")]
    BuildError(String),
    /// Failed to send email.
    #[error("Failed to send email: {0}")]
    SendError(String),
    /// Invalid email address.
    #[error("Invalid email address: {0}")]
    InvalidAddress(String),
}

/// A pending approval, as told to the assignee.
#[derive(Debug, Clone)]
pub struct ApprovalRequest<'a> {
    /// Assignee display name.
    pub assignee_name: &'a str,
    /// Document type tag (e.g. `MATERIAL_REQUISITION`).
    pub document_type: &'a str,
    /// Source document id.
    pub document_id: i64,
    /// Workflow instance id.
    pub instance_id: i64,
}

/// Email service for approval notifications.
#[derive(Debug, Clone)]
pub struct EmailService {
    config: EmailConfig,
}

impl EmailService {
    /// Creates a new email service.
    #[must_use]
    pub const fn new(config: EmailConfig) -> Self {
        Self { config }
    }

    /// Returns true when outgoing mail is switched on.
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    fn create_transport(&self) -> Result<AsyncSmtpTransport<Tokio1Executor>, EmailError> {
        let creds = Credentials::new(
            self.config.smtp_username.clone(),
            self.config.smtp_password.clone(),
        );

        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(&self.config.smtp_host)
            .map_err(|e| EmailError::SendError(e.to_string()))?
            .port(self.config.smtp_port)
            .credentials(creds)
            .build();
        Ok(transport)
    }

    /// Renders the subject and body of an approval request.
    #[must_use]
    pub fn render_approval_request(&self, request: &ApprovalRequest<'_>) -> (String, String) {
        let task_url = format!(
            "{}/approvals/{}",
            self.config.frontend_url, request.instance_id
        );
        let subject = format!(
            "Approval required: {} #{}",
            request.document_type, request.document_id
        );
        let body = format!(
            r"Hi {},

{} #{} has been submitted and is waiting for your approval.

Review it here: {task_url}

Regards,
{}",
            request.assignee_name,
            request.document_type,
            request.document_id,
            self.config.from_name
        );
        (subject, body)
    }

    /// Sends an approval request to the assignee.
    ///
    /// # Errors
    ///
    /// Returns an error if the email cannot be sent.
    pub async fn send_approval_request(
        &self,
        to_email: &str,
        request: &ApprovalRequest<'_>,
    ) -> Result<(), EmailError> {
        let (subject, body) = self.render_approval_request(request);
        self.send_email(to_email, &subject, &body).await
    }

    /// Sends a plain-text email.
    ///
    /// # Errors
    ///
    /// Returns an error if the email cannot be sent.
    pub async fn send_email(
        &self,
        to_email: &str,
        subject: &str,
        body: &str,
    ) -> Result<(), EmailError> {
        let from = format!("{} <{}>", self.config.from_name, self.config.from_email);

        let email = Message::builder()
            .from(
                from.parse()
                    .map_err(|e| EmailError::InvalidAddress(format!("{e}")))?,
            )
            .to(to_email
                .parse()
                .map_err(|e| EmailError::InvalidAddress(format!("{e}")))?)
            .subject(subject)
            .header(ContentType::TEXT_PLAIN)
            .body(body.to_string())
            .map_err(|e| EmailError::BuildError(e.to_string()))?;

        let transport = self.create_transport()?;
        transport
            .send(email)
            .await
            .map_err(|e| EmailError::SendError(e.to_string()))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_approval_request() {
        let service = EmailService::new(EmailConfig::default());
        let request = ApprovalRequest {
            assignee_name: "Ayesha",
            document_type: "MATERIAL_REQUISITION",
            document_id: 91,
            instance_id: 5,
        };
        let (subject, body) = service.render_approval_request(&request);
        assert_eq!(subject, "Approval required: MATERIAL_REQUISITION #91");
        assert!(body.starts_with("Hi Ayesha,"));
        assert!(body.contains("http://localhost:3000/approvals/5"));
    }

    #[test]
    fn test_disabled_by_default() {
        assert!(!EmailService::new(EmailConfig::default()).is_enabled());
    }

    #[tokio::test]
    async fn test_invalid_recipient_rejected_before_transport() {
        let service = EmailService::new(EmailConfig::default());
        let result = service.send_email("not-an-address", "s", "b").await;
        assert!(matches!(result, Err(EmailError::InvalidAddress(_))));
    }
}
