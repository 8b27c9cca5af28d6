use lambda_runtime::{Error, LambdaEvent};
use serde_json::Value;
use tokio::sync::OnceCell;
use tracing::{error, info};

use super::OrphanReconciler;
use crate::state::AppState;

pub use self::function_handler as handler;

static STATE: OnceCell<AppState> = OnceCell::const_new();

/// Scheduled Lambda entry point.
///
/// The event may carry `{"dryRun": true}` to override `RECONCILE_DRY_RUN`.
///
/// # Errors
///
/// Returns an error if state cannot be initialized or the reconciliation
/// fails part way.
#[tracing::instrument(level = "info", skip(event))]
pub async fn function_handler(event: LambdaEvent<Value>) -> Result<Value, Error> {
    let state = STATE.get_or_try_init(AppState::from_env).await?;

    let dry_run = event
        .payload
        .get("dryRun")
        .and_then(Value::as_bool)
        .unwrap_or(state.config.reconcile_dry_run);
    info!(dry_run, "Reconciler received scheduled event");

    let report = OrphanReconciler::new(state.store.as_ref())
        .run(dry_run)
        .await
        .map_err(|e| {
            error!("Orphan reconciliation failed: {}", e);
            Error::from(e.to_string())
        })?;

    Ok(serde_json::to_value(report)?)
}
