//! Account removal workflow.
//!
//! Removing an account is a fixed sequence of awaited steps:
//! 1. delete the account record, keeping the removed snapshot
//! 2. resolve the spaces the account owned
//! 3. cascade-delete those spaces and everything inside them
//! 4. e-mail the removed user
//!
//! Nothing is rolled back. Once step 1 has succeeded every later failure is
//! reported with `account_removed` set, and a failed notification still counts
//! as a removal that succeeded with a warning.

pub mod cascade;
pub mod notify;
pub mod spaces;

use std::sync::Arc;

use tracing::{error, info, instrument};

use crate::clients::MailTransport;
use crate::core::config::MailConfig;
use crate::errors::AdminError;
use crate::store::ResourceStore;

pub use cascade::{CascadeDeleter, CascadeReport};
pub use notify::{Delivery, NotificationGateway};
pub use spaces::SpaceResolver;

const MAILER_NOT_CONFIGURED: &str = "Account was removed, but failed to send e-mail notification to user, because mailer is not configured!";
const MAIL_DELIVERY_FAILED: &str =
    "Account was removed, but failed to send e-mail notification to user!";

/// Step of the workflow that produced a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemovalStage {
    DeletingAccount,
    ResolvingSpaces,
    Cascading,
}

impl RemovalStage {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            RemovalStage::DeletingAccount => "account",
            RemovalStage::ResolvingSpaces => "spaces",
            RemovalStage::Cascading => "cascade",
        }
    }
}

#[derive(Debug)]
pub struct RemovalFailure {
    pub stage: RemovalStage,
    pub error: AdminError,
}

impl RemovalFailure {
    /// Every stage after the first runs only once the account record is gone.
    #[must_use]
    pub fn account_removed(&self) -> bool {
        self.stage != RemovalStage::DeletingAccount
    }
}

/// Why a completed removal could not notify the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemovalWarning {
    MailerNotConfigured,
    MailDeliveryFailed(String),
}

impl RemovalWarning {
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            RemovalWarning::MailerNotConfigured => MAILER_NOT_CONFIGURED.to_string(),
            RemovalWarning::MailDeliveryFailed(cause) => format!("{MAIL_DELIVERY_FAILED} {cause}"),
        }
    }
}

#[derive(Debug)]
pub enum RemovalOutcome {
    Success,
    SucceededWithWarning(RemovalWarning),
    Failed(RemovalFailure),
}

impl RemovalOutcome {
    fn failed(stage: RemovalStage, error: AdminError) -> Self {
        RemovalOutcome::Failed(RemovalFailure { stage, error })
    }

    /// Whether the account record is gone from the store.
    #[must_use]
    pub fn account_removed(&self) -> bool {
        match self {
            RemovalOutcome::Success | RemovalOutcome::SucceededWithWarning(_) => true,
            RemovalOutcome::Failed(failure) => failure.account_removed(),
        }
    }
}

/// Runs the removal workflow against a store and a mail transport.
#[derive(Clone)]
pub struct RemovalOrchestrator {
    store: Arc<dyn ResourceStore>,
    gateway: NotificationGateway,
}

impl RemovalOrchestrator {
    #[must_use]
    pub fn new(store: Arc<dyn ResourceStore>, transport: Arc<dyn MailTransport>) -> Self {
        Self {
            store,
            gateway: NotificationGateway::new(transport),
        }
    }

    #[instrument(level = "info", skip(self, mail))]
    pub async fn remove(&self, user_id: &str, mail: &MailConfig, host: &str) -> RemovalOutcome {
        let store = self.store.as_ref();

        let account = match store.delete_account(user_id).await {
            Ok(account) => account,
            Err(e) => {
                error!(user_id = %user_id, "Failed to delete account: {}", e);
                return RemovalOutcome::failed(RemovalStage::DeletingAccount, e);
            }
        };
        info!(user_id = %user_id, username = %account.username, "Account deleted");

        let spaces = match SpaceResolver::new(store).resolve(user_id).await {
            Ok(spaces) => spaces,
            Err(e) => {
                error!(user_id = %user_id, "Account deleted but owned spaces could not be resolved: {}", e);
                return RemovalOutcome::failed(RemovalStage::ResolvingSpaces, e);
            }
        };

        if let Err(e) = CascadeDeleter::new(store).delete_all(&spaces).await {
            error!(user_id = %user_id, "Account deleted but its resources were not fully removed: {}", e);
            return RemovalOutcome::failed(RemovalStage::Cascading, e);
        }

        match self.gateway.notify(mail, &account, host).await {
            Delivery::Delivered => RemovalOutcome::Success,
            Delivery::NotConfigured => {
                RemovalOutcome::SucceededWithWarning(RemovalWarning::MailerNotConfigured)
            }
            Delivery::DeliveryFailed(cause) => {
                RemovalOutcome::SucceededWithWarning(RemovalWarning::MailDeliveryFailed(cause))
            }
        }
    }
}
