use std::sync::Arc;

use super::*;
use crate::config::ClientConfig;
use crate::mock_api::{self, MockApi, VALID_TOKEN};
use crate::store::{MemoryStore, SessionStore, TOKEN_KEY, USER_KEY};
use serde_json::json;

fn signed_in(api: &MockApi) -> (UserGateway, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    store.set(TOKEN_KEY, VALID_TOKEN);
    store.set(USER_KEY, &serde_json::to_string(&mock_api::alice()).unwrap());
    let config = ClientConfig::default().with_base_url(api.base_url.clone());
    let http = HttpClient::new(config, store.clone()).unwrap();
    (UserGateway::new(http), store)
}

#[test]
fn user_path_formats_id() {
    assert_eq!(user_path(42), "/users/42");
}

#[tokio::test]
async fn list_users_unwraps_envelope() {
    let api = MockApi::spawn().await;
    let (users, _store) = signed_in(&api);

    let list = users.list_users().await.unwrap();
    assert_eq!(list, vec![mock_api::alice(), mock_api::bob()]);
    assert_eq!(api.last_request().authorization.as_deref(), Some("Bearer abc"));
}

#[tokio::test]
async fn list_users_empty_envelope_is_empty_vec() {
    let api = MockApi::spawn_with_users(Vec::new()).await;
    let (users, _store) = signed_in(&api);

    let list = users.list_users().await.unwrap();
    assert!(list.is_empty());
}

#[tokio::test]
async fn get_user_returns_record() {
    let api = MockApi::spawn().await;
    let (users, _store) = signed_in(&api);

    assert_eq!(users.get_user(2).await.unwrap(), mock_api::bob());
    assert_eq!(api.last_request().path, "/users/2");
}

#[tokio::test]
async fn get_user_not_found_leaves_session_alone() {
    let api = MockApi::spawn().await;
    let (users, store) = signed_in(&api);

    let err = users.get_user(42).await.unwrap_err();
    assert_eq!(err.status(), Some(404));
    assert_eq!(store.get(TOKEN_KEY).as_deref(), Some(VALID_TOKEN));
    assert!(store.get(USER_KEY).is_some());
}

#[tokio::test]
async fn update_user_sends_only_set_fields() {
    let api = MockApi::spawn().await;
    let (users, _store) = signed_in(&api);
    let update = UserUpdate { email: Some("bobby@x.com".into()), ..UserUpdate::default() };

    let updated = users.update_user(2, &update).await.unwrap();
    assert_eq!(updated.email, "bobby@x.com");
    assert_eq!(updated.username, "bob");

    let req = api.last_request();
    assert_eq!(req.method, "PUT");
    assert_eq!(req.body, json!({ "email": "bobby@x.com" }));
}

#[tokio::test]
async fn update_user_returns_server_record_verbatim() {
    let api = MockApi::spawn().await;
    let (users, _store) = signed_in(&api);
    let update = UserUpdate { role_id: Some(1), role: Some("admin".into()), ..UserUpdate::default() };

    let updated = users.update_user(1, &update).await.unwrap();
    assert_eq!(updated, User { role_id: 1, role: "admin".into(), ..mock_api::alice() });
}

#[tokio::test]
async fn delete_user_then_get_is_not_found() {
    let api = MockApi::spawn().await;
    let (users, _store) = signed_in(&api);

    users.delete_user(2).await.unwrap();
    assert_eq!(api.last_request().method, "DELETE");
    assert_eq!(users.get_user(2).await.unwrap_err().status(), Some(404));
}

#[tokio::test]
async fn delete_missing_user_propagates() {
    let api = MockApi::spawn().await;
    let (users, _store) = signed_in(&api);

    assert_eq!(users.delete_user(99).await.unwrap_err().status(), Some(404));
}

#[tokio::test]
async fn revoked_token_clears_session_on_any_call() {
    let api = MockApi::spawn().await;
    let (users, store) = signed_in(&api);
    api.revoke_token();

    let err = users.list_users().await.unwrap_err();
    assert!(err.is_unauthorized());
    assert!(store.is_empty());
}
