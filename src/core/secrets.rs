use aws_sdk_ssm::Client as SsmClient;
use tracing::info;

use super::config::{AppConfig, MailConfig};
use crate::errors::AdminError;

/// Returns the mail configuration with the SMTP password filled in from SSM
/// when `SMTP_PASSWORD_PARAM` is set. A plain `SMTP_PASSWORD` is kept as-is.
///
/// # Errors
///
/// Returns an error if the SSM parameter cannot be read.
pub async fn resolve_mail_config(config: &AppConfig) -> Result<MailConfig, AdminError> {
    let mut mail = config.mail.clone();

    let Some(name) = config.smtp_password_param.as_deref() else {
        return Ok(mail);
    };

    let shared = aws_config::from_env().load().await;
    let client = SsmClient::new(&shared);

    let resp = client
        .get_parameter()
        .name(name)
        .with_decryption(true)
        .send()
        .await
        .map_err(|e| AdminError::Aws(format!("ssm get_parameter: {e}")))?;

    let value = resp
        .parameter()
        .and_then(|p| p.value())
        .ok_or_else(|| AdminError::Config(format!("SSM parameter {name} has no value")))?;

    info!(parameter = %name, "Loaded SMTP password from SSM");
    mail.password = value.to_string();

    Ok(mail)
}
