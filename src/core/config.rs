use std::env;

const DEFAULT_DISPLAY_NAME: &str = "Admin Console";
const DEFAULT_TABLE_PREFIX: &str = "admin_console_";

/// SMTP identity used to notify users about administrative actions.
///
/// `display_name` doubles as the sender name and the signature line of
/// outgoing messages.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MailConfig {
    pub service: String,
    pub user: String,
    pub password: String,
    pub display_name: String,
}

impl MailConfig {
    /// A transport is only usable when at least one of service, user or
    /// password has been provided.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        !(self.service.is_empty() && self.user.is_empty() && self.password.is_empty())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Memory,
    DynamoDb,
}

impl StoreBackend {
    fn parse(raw: &str) -> Result<Self, String> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(Self::Memory),
            "dynamodb" | "dynamo" => Ok(Self::DynamoDb),
            other => Err(format!("STORE_BACKEND: unknown backend '{other}'")),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub mail: MailConfig,
    /// SSM parameter holding the SMTP password, resolved at startup.
    pub smtp_password_param: Option<String>,
    pub session_secret: String,
    pub store_backend: StoreBackend,
    pub table_prefix: String,
    pub reconcile_dry_run: bool,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, String> {
        let store_backend = match env::var("STORE_BACKEND") {
            Ok(raw) => StoreBackend::parse(&raw)?,
            Err(_) => StoreBackend::DynamoDb,
        };

        Ok(Self {
            mail: MailConfig {
                service: env::var("SMTP_SERVICE").unwrap_or_default(),
                user: env::var("SMTP_EMAIL").unwrap_or_default(),
                password: env::var("SMTP_PASSWORD").unwrap_or_default(),
                display_name: env::var("SMTP_USERNAME")
                    .unwrap_or_else(|_| DEFAULT_DISPLAY_NAME.to_string()),
            },
            smtp_password_param: env::var("SMTP_PASSWORD_PARAM")
                .ok()
                .filter(|p| !p.is_empty()),
            session_secret: env::var("SESSION_SECRET")
                .map_err(|e| format!("SESSION_SECRET: {}", e))?,
            store_backend,
            table_prefix: env::var("TABLE_PREFIX")
                .unwrap_or_else(|_| DEFAULT_TABLE_PREFIX.to_string()),
            reconcile_dry_run: env::var("RECONCILE_DRY_RUN")
                .map(|v| matches!(v.as_str(), "1" | "true" | "yes"))
                .unwrap_or(false),
        })
    }
}
