//! Outbound notification email via SMTP.
//!
//! [`Mailer`] wraps the `lettre` async SMTP transport. Dispatch is strictly
//! best-effort: intake requests succeed whether or not any email goes out, so
//! every caller logs failures and moves on.

use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use crate::config::SmtpConfig;
use crate::models::{Booking, ContactSubmission};

/// Error type for email delivery failures. Never surfaced to API callers.
#[derive(Debug)]
pub enum EmailError {
    Transport(lettre::transport::smtp::Error),
    Address(lettre::address::AddressError),
    Build(String),
}

impl std::fmt::Display for EmailError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EmailError::Transport(e) => write!(f, "SMTP transport error: {}", e),
            EmailError::Address(e) => write!(f, "Email address parse error: {}", e),
            EmailError::Build(msg) => write!(f, "Email build error: {}", msg),
        }
    }
}

impl std::error::Error for EmailError {}

impl From<lettre::transport::smtp::Error> for EmailError {
    fn from(e: lettre::transport::smtp::Error) -> Self {
        EmailError::Transport(e)
    }
}

impl From<lettre::address::AddressError> for EmailError {
    fn from(e: lettre::address::AddressError) -> Self {
        EmailError::Address(e)
    }
}

/// Sends confirmation and studio-inbox notification emails.
pub struct Mailer {
    config: SmtpConfig,
    contact_inbox: Option<String>,
}

impl Mailer {
    pub fn new(config: SmtpConfig, contact_inbox: Option<String>) -> Self {
        Self {
            config,
            contact_inbox,
        }
    }

    /// Confirmation to the visitor who submitted the contact form.
    pub async fn send_contact_confirmation(
        &self,
        submission: &ContactSubmission,
    ) -> Result<(), EmailError> {
        let body = format!(
            "Hi {},\n\nThanks for reaching out. We received your message and will get back to you shortly.\n\nThe Atelier Team",
            submission.name
        );
        self.send(&submission.email, "We received your message", body)
            .await
    }

    /// Notification to the studio inbox about a new contact submission.
    pub async fn notify_inbox_contact(
        &self,
        submission: &ContactSubmission,
    ) -> Result<(), EmailError> {
        let Some(inbox) = &self.contact_inbox else {
            return Ok(());
        };
        let body = format!(
            "New contact submission\n\nName: {}\nEmail: {}\nPhone: {}\nCompany: {}\n\n{}",
            submission.name,
            submission.email,
            submission.phone.as_deref().unwrap_or("-"),
            submission.company.as_deref().unwrap_or("-"),
            submission.message
        );
        self.send(inbox, "New contact submission", body).await
    }

    /// Confirmation to the visitor who submitted a booking inquiry.
    pub async fn send_booking_confirmation(&self, booking: &Booking) -> Result<(), EmailError> {
        let body = format!(
            "Hi {},\n\nThanks for your booking inquiry. We received it and will confirm the details shortly.\n\nThe Atelier Team",
            booking.name
        );
        self.send(&booking.email, "We received your booking inquiry", body)
            .await
    }

    /// Notification to the studio inbox about a new booking inquiry.
    pub async fn notify_inbox_booking(&self, booking: &Booking) -> Result<(), EmailError> {
        let Some(inbox) = &self.contact_inbox else {
            return Ok(());
        };
        let body = format!(
            "New booking inquiry\n\nName: {}\nEmail: {}\nService: {}\nDate: {}\nTime: {}\nBudget: {}\n\n{}",
            booking.name,
            booking.email,
            booking.service.as_deref().unwrap_or("-"),
            booking.preferred_date.as_deref().unwrap_or("-"),
            booking.preferred_time.as_deref().unwrap_or("-"),
            booking.budget.as_deref().unwrap_or("-"),
            booking.message.as_deref().unwrap_or("-")
        );
        self.send(inbox, "New booking inquiry", body).await
    }

    async fn send(&self, to: &str, subject: &str, body: String) -> Result<(), EmailError> {
        let email = Message::builder()
            .from(self.config.from_address.parse()?)
            .to(to.parse()?)
            .subject(format!("[Atelier] {}", subject))
            .header(ContentType::TEXT_PLAIN)
            .body(body)
            .map_err(|e| EmailError::Build(e.to_string()))?;

        let mut transport_builder =
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&self.config.host)?
                .port(self.config.port);

        if let (Some(user), Some(pass)) = (&self.config.username, &self.config.password) {
            transport_builder =
                transport_builder.credentials(Credentials::new(user.clone(), pass.clone()));
        }

        let mailer = transport_builder.build();
        mailer.send(email).await?;

        tracing::info!(to = to, subject = subject, "Notification email sent");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_error_display() {
        let err = EmailError::Build("missing body".to_string());
        assert_eq!(err.to_string(), "Email build error: missing body");
    }

    #[test]
    fn test_address_error_display() {
        let addr_err: Result<lettre::Address, _> = "not-an-email".parse();
        let err = EmailError::Address(addr_err.unwrap_err());
        assert!(err.to_string().contains("Email address parse error"));
    }
}
