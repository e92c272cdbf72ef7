//! End-to-end active-institution resolution through the middleware
//! stack, observed via the session endpoint.

mod common;

use axum::http::StatusCode;
use common::{body_json, get_request, InMemoryDirectory, TestApp};
use school_service::models::{Account, Role};
use tower::ServiceExt;
use uuid::Uuid;

fn account(role: Role, primary: Option<Uuid>) -> Account {
    Account::new(
        "Scope User".to_string(),
        format!("{}@example.com", Uuid::new_v4()),
        "$argon2id$fake".to_string(),
        role,
        primary,
    )
}

#[tokio::test]
async fn no_header_defaults_to_primary_institution() {
    let primary = Uuid::new_v4();
    let teacher = account(Role::Teacher, Some(primary));

    let app = TestApp::spawn(InMemoryDirectory::new().with_account(teacher.clone()));
    let token = app.token_for(&teacher);

    let response = app
        .router
        .oneshot(get_request("/users/me", Some(&token), None))
        .await
        .unwrap();

    let body = body_json(response).await;
    assert_eq!(body["active_institution_id"], primary.to_string());
}

#[tokio::test]
async fn header_switches_to_linked_institution() {
    let primary = Uuid::new_v4();
    let linked = Uuid::new_v4();
    let teacher = account(Role::Teacher, Some(primary));

    let app = TestApp::spawn(
        InMemoryDirectory::new()
            .with_account(teacher.clone())
            .with_link(teacher.account_id, linked),
    );
    let token = app.token_for(&teacher);

    let response = app
        .router
        .oneshot(get_request(
            "/users/me",
            Some(&token),
            Some(&linked.to_string()),
        ))
        .await
        .unwrap();

    let body = body_json(response).await;
    assert_eq!(body["active_institution_id"], linked.to_string());
    // The accessible set keeps primary first, link second.
    assert_eq!(body["accessible_institution_ids"][0], primary.to_string());
    assert_eq!(body["accessible_institution_ids"][1], linked.to_string());
}

#[tokio::test]
async fn admin_header_is_honored_without_membership() {
    let foreign = Uuid::new_v4();
    let admin = account(Role::Admin, None);

    let app = TestApp::spawn(InMemoryDirectory::new().with_account(admin.clone()));
    let token = app.token_for(&admin);

    let response = app
        .router
        .oneshot(get_request(
            "/users/me",
            Some(&token),
            Some(&foreign.to_string()),
        ))
        .await
        .unwrap();

    let body = body_json(response).await;
    assert_eq!(body["active_institution_id"], foreign.to_string());
}

#[tokio::test]
async fn unentitled_header_falls_back_to_primary() {
    let primary = Uuid::new_v4();
    let foreign = Uuid::new_v4();
    let teacher = account(Role::Teacher, Some(primary));

    let app = TestApp::spawn(InMemoryDirectory::new().with_account(teacher.clone()));
    let token = app.token_for(&teacher);

    let response = app
        .router
        .oneshot(get_request(
            "/users/me",
            Some(&token),
            Some(&foreign.to_string()),
        ))
        .await
        .unwrap();

    // Not a 403: the request proceeds under the fallback institution.
    let body = body_json(response).await;
    assert_eq!(body["active_institution_id"], primary.to_string());
}

#[tokio::test]
async fn unparseable_header_falls_back_to_system_active() {
    let system = Uuid::new_v4();
    let guardian = account(Role::Guardian, None);

    let app = TestApp::spawn(
        InMemoryDirectory::new()
            .with_account(guardian.clone())
            .with_system_active(system),
    );
    let token = app.token_for(&guardian);

    let response = app
        .router
        .oneshot(get_request("/users/me", Some(&token), Some("not-a-uuid")))
        .await
        .unwrap();

    let body = body_json(response).await;
    assert_eq!(body["active_institution_id"], system.to_string());
}

#[tokio::test]
async fn absent_header_never_guesses_system_active() {
    let system = Uuid::new_v4();
    let guardian = account(Role::Guardian, None);

    let app = TestApp::spawn(
        InMemoryDirectory::new()
            .with_account(guardian.clone())
            .with_system_active(system),
    );
    let token = app.token_for(&guardian);

    let response = app
        .router
        .oneshot(get_request("/users/me", Some(&token), None))
        .await
        .unwrap();

    let body = body_json(response).await;
    assert!(body["active_institution_id"].is_null());
}

#[tokio::test]
async fn system_active_header_is_honored_for_non_member() {
    let system = Uuid::new_v4();
    let secretary = account(Role::Secretary, None);

    let app = TestApp::spawn(
        InMemoryDirectory::new()
            .with_account(secretary.clone())
            .with_system_active(system),
    );
    let token = app.token_for(&secretary);

    let response = app
        .router
        .oneshot(get_request(
            "/users/me",
            Some(&token),
            Some(&system.to_string()),
        ))
        .await
        .unwrap();

    let body = body_json(response).await;
    assert_eq!(body["active_institution_id"], system.to_string());
}

#[tokio::test]
async fn capabilities_flow_into_the_session() {
    let secretary = account(Role::Secretary, Some(Uuid::new_v4()));

    let app = TestApp::spawn(
        InMemoryDirectory::new()
            .with_account(secretary.clone())
            .with_grant(Role::Secretary, "students", "read")
            .with_grant(Role::Secretary, "students", "create"),
    );
    let token = app.token_for(&secretary);

    let response = app
        .router
        .oneshot(get_request("/users/me", Some(&token), None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    let caps: Vec<&str> = body["capabilities"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_str().unwrap())
        .collect();
    assert_eq!(caps, vec!["students:create", "students:read"]);
}
