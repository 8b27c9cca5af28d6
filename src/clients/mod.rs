//! Outbound clients

pub mod mail_client;

pub use mail_client::{MailAddress, MailTransport, OutgoingMail, SmtpMailer};
