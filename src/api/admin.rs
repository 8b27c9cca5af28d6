//! Admin endpoints: account listing, admin flag, removal and impersonation.

use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{error, info};

use super::helpers::{err_response, ok_empty, ok_json, store_error};
use super::session::Session;
use crate::removal::RemovalOutcome;
use crate::state::AppState;
use crate::store::ResourceStore;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveRequest {
    pub user_id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveRequest {
    pub user_id: String,
    pub admin_flag: bool,
}

pub async fn list_accounts(store: &dyn ResourceStore) -> Value {
    match store.find_accounts().await {
        Ok(accounts) => ok_json(&accounts),
        Err(e) => {
            error!("Failed to list accounts: {}", e);
            store_error(&e)
        }
    }
}

pub async fn remove_account(state: &AppState, request: &RemoveRequest, host: &str) -> Value {
    let outcome = state
        .orchestrator
        .remove(&request.user_id, &state.mail, host)
        .await;
    outcome_response(&outcome)
}

/// Maps a removal outcome to a response. A removal whose notice could not be
/// sent is still a 200; the body says the account is gone and why the user was
/// not told.
#[must_use]
pub fn outcome_response(outcome: &RemovalOutcome) -> Value {
    match outcome {
        RemovalOutcome::Success => ok_empty(),
        RemovalOutcome::SucceededWithWarning(warning) => ok_json(&json!({
            "removed": true,
            "warning": warning.message(),
        })),
        RemovalOutcome::Failed(failure) => {
            let status: u16 = if failure.error.is_not_found() { 404 } else { 500 };
            json!({
                "statusCode": status,
                "body": json!({
                    "error": failure.error.to_string(),
                    "stage": failure.stage.as_str(),
                    "accountRemoved": failure.account_removed(),
                })
                .to_string()
            })
        }
    }
}

pub async fn save_admin_flag(store: &dyn ResourceStore, request: &SaveRequest) -> Value {
    match store
        .update_admin_flag(&request.user_id, request.admin_flag)
        .await
    {
        Ok(()) => {
            info!(user_id = %request.user_id, admin = request.admin_flag, "Updated admin flag");
            ok_empty()
        }
        Err(e) => {
            error!(user_id = %request.user_id, "Failed to update admin flag: {}", e);
            store_error(&e)
        }
    }
}

/// Starts viewing the console as another account. The session is only
/// changed when the account exists.
pub async fn become_user(
    store: &dyn ResourceStore,
    viewed_user_id: Option<&str>,
    session: &mut Session,
) -> Value {
    let Some(viewed_user_id) = viewed_user_id.filter(|id| !id.is_empty()) else {
        return err_response(400, "Missing viewedUserId");
    };

    match store.find_account(viewed_user_id).await {
        Ok(Some(account)) => {
            info!(viewed_user_id = %viewed_user_id, "Impersonating account");
            session.viewed_user = Some(account);
            ok_empty()
        }
        Ok(None) => err_response(404, "Account not found"),
        Err(e) => {
            error!(viewed_user_id = %viewed_user_id, "Failed to load account: {}", e);
            err_response(404, "Account not found")
        }
    }
}

pub fn revert_identity(session: &mut Session) -> Value {
    session.viewed_user = None;
    ok_empty()
}
