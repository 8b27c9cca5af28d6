use std::sync::Arc;

use tracing::{error, info, warn};

use crate::clients::{MailAddress, MailTransport, OutgoingMail};
use crate::core::config::MailConfig;
use crate::core::models::Account;

pub const REMOVAL_SUBJECT: &str = "Your account was deleted";

/// Result of one notification attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivery {
    Delivered,
    NotConfigured,
    DeliveryFailed(String),
}

/// Builds the message telling `account` it was removed by an administrator.
#[must_use]
pub fn removal_notice(config: &MailConfig, account: &Account, host: &str) -> OutgoingMail {
    OutgoingMail {
        from: MailAddress::new(&config.display_name, &config.user),
        to: MailAddress::new(&account.username, &account.email),
        subject: REMOVAL_SUBJECT.to_string(),
        body: format!(
            "You are receiving this e-mail because admin remove your account.\n\n\
             --------------\n\
             {} http://{}\n",
            config.display_name, host
        ),
    }
}

/// Sends removal notices when a mail transport is configured.
#[derive(Clone)]
pub struct NotificationGateway {
    transport: Arc<dyn MailTransport>,
}

impl NotificationGateway {
    #[must_use]
    pub fn new(transport: Arc<dyn MailTransport>) -> Self {
        Self { transport }
    }

    /// Makes at most one delivery attempt. An unusable configuration is
    /// reported as [`Delivery::NotConfigured`] without touching the transport.
    pub async fn notify(&self, config: &MailConfig, account: &Account, host: &str) -> Delivery {
        if !config.is_configured() {
            warn!(account_id = %account.id, "Mailer is not configured, skipping removal notice");
            return Delivery::NotConfigured;
        }

        let mail = removal_notice(config, account, host);
        match self.transport.send(config, &mail).await {
            Ok(()) => {
                info!(account_id = %account.id, "Removal notice delivered");
                Delivery::Delivered
            }
            Err(e) => {
                error!(account_id = %account.id, "Failed to deliver removal notice: {}", e);
                Delivery::DeliveryFailed(e.to_string())
            }
        }
    }
}
