//! API Lambda handler - thin router that delegates to the admin endpoints.
//!
//! This module handles:
//! - Method and path matching under the `/admin` mount point
//! - Body and query extraction
//! - Loading the signed session and writing it back when it changes

use lambda_runtime::{Error, LambdaEvent};
use serde_json::Value;
use tokio::sync::OnceCell;
use tracing::{error, info};

use super::admin::{self, RemoveRequest, SaveRequest};
use super::helpers::{err_response, with_cookie};
use super::parsing;
use super::session::{encode_session, read_session, session_cookie};
use crate::state::AppState;

pub use self::function_handler as handler;

static STATE: OnceCell<AppState> = OnceCell::const_new();

const REVERT_ROUTE: &str = "/revert/identity";

/// Lambda handler for the API entrypoint.
///
/// # Errors
///
/// Returns an error only when configuration or state initialization fails;
/// request-level problems are returned as error response payloads.
#[tracing::instrument(level = "info", skip(event))]
pub async fn function_handler(event: LambdaEvent<Value>) -> Result<Value, Error> {
    let state = STATE.get_or_try_init(AppState::from_env).await?;
    Ok(route(state, &event.payload).await)
}

/// Dispatches one API Gateway request.
pub async fn route(state: &AppState, payload: &Value) -> Value {
    let method = parsing::request_method(payload).to_ascii_uppercase();
    let Some(route) = parsing::request_path(payload).and_then(parsing::admin_route) else {
        return err_response(404, "Not found");
    };
    info!(method = %method, route = %route, "Admin request");

    let secret = &state.config.session_secret;
    let mut session = read_session(payload, secret);
    let before = session.clone();
    let store = state.store.as_ref();

    let response = match (method.as_str(), route) {
        ("POST", "/list") => admin::list_accounts(store).await,
        ("POST", "/remove") => match parsing::parse_json_body::<RemoveRequest>(payload) {
            Ok(request) => {
                let host = parsing::request_host(payload);
                admin::remove_account(state, &request, host).await
            }
            Err(e) => err_response(400, &e.to_string()),
        },
        ("POST", "/save") => match parsing::parse_json_body::<SaveRequest>(payload) {
            Ok(request) => admin::save_admin_flag(store, &request).await,
            Err(e) => err_response(400, &e.to_string()),
        },
        ("GET", "/become") => {
            let viewed_user_id = parsing::query_param(payload, "viewedUserId");
            admin::become_user(store, viewed_user_id.as_deref(), &mut session).await
        }
        ("GET", REVERT_ROUTE) => admin::revert_identity(&mut session),
        (_, "/list" | "/remove" | "/save" | "/become" | REVERT_ROUTE) => {
            err_response(405, "Method not allowed")
        }
        _ => err_response(404, "Not found"),
    };

    if route != REVERT_ROUTE && session == before {
        return response;
    }

    match encode_session(&session, secret) {
        Ok(value) => with_cookie(response, &session_cookie(&value)),
        Err(e) => {
            error!("Failed to encode session: {}", e);
            err_response(500, "Failed to update session")
        }
    }
}
