mod common;

use std::sync::Arc;

use admin_console::api::route;
use admin_console::api::session::{SESSION_COOKIE, Session, decode_session};
use admin_console::store::{MemoryStore, ResourceStore};
use common::{
    FaultyStore, Op, RecordingMailer, SESSION_SECRET, configured_mail, seed_account, seed_space,
    test_state, unconfigured_mail,
};
use serde_json::{Value, json};

fn post(path: &str, body: &Value) -> Value {
    json!({
        "rawPath": path,
        "requestContext": { "http": { "method": "POST" } },
        "headers": { "Host": "console.example.com", "content-type": "application/json" },
        "body": body.to_string(),
        "isBase64Encoded": false
    })
}

fn get(path: &str, query: &str) -> Value {
    json!({
        "rawPath": path,
        "rawQueryString": query,
        "requestContext": { "http": { "method": "GET" } },
        "headers": { "host": "console.example.com" }
    })
}

fn body_of(response: &Value) -> Value {
    let raw = response["body"].as_str().expect("body should be a string");
    serde_json::from_str(raw).expect("body should be JSON")
}

fn session_from(response: &Value) -> Session {
    let cookie = response["headers"]["Set-Cookie"]
        .as_str()
        .expect("response should set the session cookie");
    let value = cookie
        .strip_prefix(&format!("{SESSION_COOKIE}="))
        .and_then(|rest| rest.split(';').next())
        .expect("cookie should carry a value");
    decode_session(value, SESSION_SECRET).expect("cookie should be correctly signed")
}

#[tokio::test]
async fn list_returns_accounts_sorted_by_username() {
    let memory = MemoryStore::new();
    seed_account(&memory, "u2", "zed").await;
    seed_account(&memory, "u1", "amy").await;
    seed_account(&memory, "u3", "mia").await;
    let state = test_state(Arc::new(memory), RecordingMailer::default(), unconfigured_mail());

    let response = route(&state, &post("/admin/list", &json!({}))).await;

    assert_eq!(response["statusCode"], 200);
    let names: Vec<String> = body_of(&response)
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a["username"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(names, vec!["amy", "mia", "zed"]);
}

#[tokio::test]
async fn list_store_failure_is_a_500() {
    let store = FaultyStore::new(MemoryStore::new());
    store.fail_on(Op::FindAccounts);
    let state = test_state(Arc::new(store), RecordingMailer::default(), unconfigured_mail());

    let response = route(&state, &post("/admin/list", &json!({}))).await;

    assert_eq!(response["statusCode"], 500);
}

#[tokio::test]
async fn remove_with_delivered_notice_returns_empty_200() {
    let memory = MemoryStore::new();
    seed_account(&memory, "u1", "alice").await;
    let mailer = RecordingMailer::default();
    let state = test_state(Arc::new(memory.clone()), mailer.clone(), configured_mail());

    let response = route(&state, &post("/admin/remove", &json!({ "userId": "u1" }))).await;

    assert_eq!(response["statusCode"], 200);
    assert_eq!(response["body"], "{}");
    assert!(mailer.sent()[0].body.contains("http://console.example.com"));
}

#[tokio::test]
async fn remove_without_mailer_returns_200_with_warning() {
    let memory = MemoryStore::new();
    seed_account(&memory, "u1", "alice").await;
    seed_space(&memory, "s1", "u1").await;
    let state = test_state(Arc::new(memory.clone()), RecordingMailer::default(), unconfigured_mail());

    let response = route(&state, &post("/admin/remove", &json!({ "userId": "u1" }))).await;

    assert_eq!(response["statusCode"], 200);
    let body = body_of(&response);
    assert_eq!(body["removed"], true);
    assert!(
        body["warning"]
            .as_str()
            .unwrap()
            .starts_with("Account was removed, but failed to send e-mail notification to user")
    );
    assert!(memory.find_account("u1").await.unwrap().is_none());
}

#[tokio::test]
async fn remove_unknown_account_is_404_and_nothing_removed() {
    let memory = MemoryStore::new();
    seed_account(&memory, "u1", "alice").await;
    let state = test_state(Arc::new(memory.clone()), RecordingMailer::default(), configured_mail());

    let response = route(&state, &post("/admin/remove", &json!({ "userId": "ghost" }))).await;

    assert_eq!(response["statusCode"], 404);
    let body = body_of(&response);
    assert_eq!(body["stage"], "account");
    assert_eq!(body["accountRemoved"], false);
    assert!(memory.find_account("u1").await.unwrap().is_some());
}

#[tokio::test]
async fn remove_cascade_failure_says_account_was_removed() {
    let memory = MemoryStore::new();
    seed_account(&memory, "u1", "alice").await;
    seed_space(&memory, "s1", "u1").await;
    let store = FaultyStore::new(memory);
    store.fail_on(Op::FindSpacesByOwner);
    let state = test_state(Arc::new(store), RecordingMailer::default(), configured_mail());

    let response = route(&state, &post("/admin/remove", &json!({ "userId": "u1" }))).await;

    assert_eq!(response["statusCode"], 500);
    let body = body_of(&response);
    assert_eq!(body["stage"], "spaces");
    assert_eq!(body["accountRemoved"], true);
}

#[tokio::test]
async fn remove_without_user_id_is_a_400() {
    let state = test_state(
        Arc::new(MemoryStore::new()),
        RecordingMailer::default(),
        configured_mail(),
    );

    let response = route(&state, &post("/admin/remove", &json!({}))).await;

    assert_eq!(response["statusCode"], 400);
}

#[tokio::test]
async fn save_updates_only_the_admin_flag() {
    let memory = MemoryStore::new();
    let before = seed_account(&memory, "u1", "alice").await;
    let state = test_state(Arc::new(memory.clone()), RecordingMailer::default(), configured_mail());

    let response = route(
        &state,
        &post("/admin/save", &json!({ "userId": "u1", "adminFlag": true })),
    )
    .await;

    assert_eq!(response["statusCode"], 200);
    let after = memory.find_account("u1").await.unwrap().unwrap();
    assert!(after.admin);
    assert_eq!(after.username, before.username);
    assert_eq!(after.email, before.email);

    let missing = route(
        &state,
        &post("/admin/save", &json!({ "userId": "ghost", "adminFlag": true })),
    )
    .await;
    assert_eq!(missing["statusCode"], 404);
}

#[tokio::test]
async fn become_sets_session_and_revert_clears_it() {
    let memory = MemoryStore::new();
    let viewed = seed_account(&memory, "u7", "bob").await;
    let state = test_state(Arc::new(memory), RecordingMailer::default(), configured_mail());

    let response = route(&state, &get("/admin/become", "viewedUserId=u7")).await;
    assert_eq!(response["statusCode"], 200);
    let session = session_from(&response);
    assert_eq!(session.viewed_user, Some(viewed));

    let cookie = response["headers"]["Set-Cookie"].as_str().unwrap();
    let cookie_pair = cookie.split(';').next().unwrap().to_string();
    let mut revert = get("/admin/revert/identity", "");
    revert["cookies"] = json!([cookie_pair]);

    let response = route(&state, &revert).await;
    assert_eq!(response["statusCode"], 200);
    assert_eq!(session_from(&response), Session::default());
}

#[tokio::test]
async fn become_unknown_user_is_404_without_cookie() {
    let state = test_state(
        Arc::new(MemoryStore::new()),
        RecordingMailer::default(),
        configured_mail(),
    );

    let response = route(&state, &get("/admin/become", "viewedUserId=ghost")).await;

    assert_eq!(response["statusCode"], 404);
    assert!(response.get("headers").is_none());
}

#[tokio::test]
async fn revert_without_session_still_succeeds() {
    let state = test_state(
        Arc::new(MemoryStore::new()),
        RecordingMailer::default(),
        configured_mail(),
    );

    let response = route(&state, &get("/admin/revert/identity", "")).await;

    assert_eq!(response["statusCode"], 200);
    assert_eq!(session_from(&response), Session::default());
}

#[tokio::test]
async fn unknown_routes_and_methods_are_rejected() {
    let state = test_state(
        Arc::new(MemoryStore::new()),
        RecordingMailer::default(),
        configured_mail(),
    );

    let response = route(&state, &get("/admin/list", "")).await;
    assert_eq!(response["statusCode"], 405);

    let response = route(&state, &post("/admin/nope", &json!({}))).await;
    assert_eq!(response["statusCode"], 404);

    let response = route(&state, &post("/elsewhere", &json!({}))).await;
    assert_eq!(response["statusCode"], 404);
}
