//! SMTP mail client
//!
//! Builds a fresh transport per message from the configured relay and
//! credentials. Delivery is attempted once.

use std::fmt;

use async_trait::async_trait;
use lettre::message::{Mailbox, header::ContentType};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Address, AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::info;

use crate::core::config::MailConfig;
use crate::errors::AdminError;

/// Display name and address of one side of a message.
///
/// The name is kept apart from the address so that quoting is left to the
/// mailbox encoder; names may contain commas, `@` or parentheses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailAddress {
    pub name: String,
    pub email: String,
}

impl MailAddress {
    #[must_use]
    pub fn new(name: &str, email: &str) -> Self {
        Self {
            name: name.trim().to_string(),
            email: email.trim().to_string(),
        }
    }

    /// # Errors
    ///
    /// Returns an error if the address part is not a valid e-mail address.
    pub fn mailbox(&self) -> Result<Mailbox, AdminError> {
        let email: Address = self.email.parse()?;
        let name = (!self.name.is_empty()).then(|| self.name.clone());
        Ok(Mailbox::new(name, email))
    }
}

impl fmt::Display for MailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.name.is_empty() {
            f.write_str(&self.email)
        } else {
            write!(f, "{} <{}>", self.name, self.email)
        }
    }
}

/// A fully rendered e-mail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingMail {
    pub from: MailAddress,
    pub to: MailAddress,
    pub subject: String,
    pub body: String,
}

impl OutgoingMail {
    /// # Errors
    ///
    /// Returns an error if either address is invalid or the message cannot
    /// be assembled.
    pub fn to_message(&self) -> Result<Message, AdminError> {
        Ok(Message::builder()
            .from(self.from.mailbox()?)
            .to(self.to.mailbox()?)
            .subject(self.subject.as_str())
            .header(ContentType::TEXT_PLAIN)
            .body(self.body.clone())?)
    }
}

#[async_trait]
pub trait MailTransport: Send + Sync {
    async fn send(&self, config: &MailConfig, mail: &OutgoingMail) -> Result<(), AdminError>;
}

/// Delivers mail through the SMTP relay named by `MailConfig::service`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SmtpMailer;

impl SmtpMailer {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl MailTransport for SmtpMailer {
    async fn send(&self, config: &MailConfig, mail: &OutgoingMail) -> Result<(), AdminError> {
        if !config.is_configured() {
            return Err(AdminError::MailNotConfigured);
        }

        let message = mail.to_message()?;

        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(&config.service)?
            .credentials(Credentials::new(
                config.user.clone(),
                config.password.clone(),
            ))
            .build();

        let response = transport.send(message).await?;
        info!(relay = %config.service, code = %response.code(), "SMTP relay accepted message");

        Ok(())
    }
}
