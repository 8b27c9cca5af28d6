//! Long-lived dependencies shared by every invocation of a warm Lambda.

use std::sync::Arc;

use tracing::{error, info};

use crate::clients::{MailTransport, SmtpMailer};
use crate::core::config::{AppConfig, MailConfig, StoreBackend};
use crate::core::secrets::resolve_mail_config;
use crate::errors::AdminError;
use crate::removal::RemovalOrchestrator;
use crate::store::{DynamoStore, MemoryStore, ResourceStore};

#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    /// Mail settings with secrets resolved.
    pub mail: MailConfig,
    pub store: Arc<dyn ResourceStore>,
    pub orchestrator: RemovalOrchestrator,
}

impl AppState {
    #[must_use]
    pub fn new(
        config: AppConfig,
        mail: MailConfig,
        store: Arc<dyn ResourceStore>,
        transport: Arc<dyn MailTransport>,
    ) -> Self {
        let orchestrator = RemovalOrchestrator::new(store.clone(), transport);
        Self {
            config,
            mail,
            store,
            orchestrator,
        }
    }

    /// Builds the store and mailer selected by `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if the SMTP password cannot be loaded from SSM.
    pub async fn from_config(config: AppConfig) -> Result<Self, AdminError> {
        let mail = resolve_mail_config(&config).await?;

        let store: Arc<dyn ResourceStore> = match config.store_backend {
            StoreBackend::Memory => Arc::new(MemoryStore::new()),
            StoreBackend::DynamoDb => Arc::new(DynamoStore::from_env(&config.table_prefix).await),
        };
        info!(backend = ?config.store_backend, mail_configured = mail.is_configured(), "Initialized application state");

        Ok(Self::new(config, mail, store, Arc::new(SmtpMailer::new())))
    }

    /// Reads configuration from the environment and builds the state.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration is missing or invalid.
    pub async fn from_env() -> Result<Self, lambda_runtime::Error> {
        let config = AppConfig::from_env().map_err(|e| {
            error!("Config error: {}", e);
            lambda_runtime::Error::from(e)
        })?;

        Self::from_config(config).await.map_err(|e| {
            error!("Failed to initialize application state: {}", e);
            lambda_runtime::Error::from(e.to_string())
        })
    }
}
