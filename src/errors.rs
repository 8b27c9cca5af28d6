use thiserror::Error;

#[derive(Debug, Error)]
pub enum AdminError {
    #[error("Failed to access resource store: {0}")]
    Store(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Failed to delete resources of removed account: {0}")]
    Cascade(String),

    #[error("Mailer is not configured")]
    MailNotConfigured,

    #[error("Failed to deliver e-mail: {0}")]
    MailDelivery(String),

    #[error("Failed to parse request: {0}")]
    Parse(String),

    #[error("Invalid session: {0}")]
    Session(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Failed to interact with AWS services: {0}")]
    Aws(String),
}

impl AdminError {
    /// Whether this error means the addressed record does not exist.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, AdminError::NotFound(_))
    }
}

impl From<anyhow::Error> for AdminError {
    fn from(error: anyhow::Error) -> Self {
        AdminError::Store(error.to_string())
    }
}

impl From<serde_json::Error> for AdminError {
    fn from(error: serde_json::Error) -> Self {
        AdminError::Parse(error.to_string())
    }
}

impl From<lettre::error::Error> for AdminError {
    fn from(error: lettre::error::Error) -> Self {
        AdminError::MailDelivery(error.to_string())
    }
}

impl From<lettre::address::AddressError> for AdminError {
    fn from(error: lettre::address::AddressError) -> Self {
        AdminError::MailDelivery(format!("invalid address: {error}"))
    }
}

impl From<lettre::transport::smtp::Error> for AdminError {
    fn from(error: lettre::transport::smtp::Error) -> Self {
        AdminError::MailDelivery(error.to_string())
    }
}
