use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use chrono::{Duration, Utc};
use serde_json::{Value, json};
use tower::ServiceExt;

use libero::auth::{TokenPurpose, TokenService};
use libero::mail::Mailer;
use libero::server::{AppState, cors_layer, create_router};
use libero::store::{MemoryStore, Store, seed};
use libero::types::{LicenseType, Role, User};

const PASSWORD: &str = "secret-pass-123";

fn test_state() -> Arc<AppState> {
    let store = MemoryStore::new();
    seed::seed_catalog(&store).expect("seed catalog");

    Arc::new(AppState::new(
        Arc::new(store),
        TokenService::new(b"integration-test-secret"),
        Mailer::new(std::env::temp_dir().join("libero-test-outbox")),
    ))
}

fn test_app(state: &Arc<AppState>) -> Router {
    create_router(state.clone(), cors_layer(&[]))
}

async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(value) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(value.to_string()))
            .expect("build request"),
        None => builder.body(Body::empty()).expect("build request"),
    };

    let response = app.clone().oneshot(request).await.expect("send request");
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("parse body")
    };
    (status, value)
}

async fn register_user(app: &Router, email: &str, licensed: bool) -> (String, Value) {
    let (status, body) = send(
        app,
        "POST",
        "/api/auth/register",
        None,
        Some(json!({
            "email": email,
            "password": PASSWORD,
            "first_name": "Test",
            "last_name": "Player",
            "license_type": "competition",
            "licensed": licensed,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "register failed: {body}");

    let token = body["data"]["token"].as_str().expect("token").to_string();
    (token, body["data"]["user"].clone())
}

/// Inserts a user directly into the store, bypassing the public API.
/// Used to mint staff accounts and to preset counters.
fn insert_user(state: &Arc<AppState>, email: &str, role: Role, licensed: bool) -> (String, String) {
    let user = User {
        id: uuid::Uuid::new_v4().to_string(),
        email: email.to_string(),
        password_hash: state.passwords.hash(PASSWORD).expect("hash"),
        first_name: "Staff".to_string(),
        last_name: "Member".to_string(),
        license_type: LicenseType::Competition,
        licensed,
        role,
        points: 0,
        participations: 0,
        created_at: Utc::now(),
    };
    state.store.create_user(&user).expect("create user");
    let token = state
        .tokens
        .issue(&user.id, None, Duration::days(1))
        .expect("issue token");
    (user.id, token)
}

async fn create_tournament(app: &Router, staff_token: &str, capacity: i64) -> String {
    let (status, body) = send(
        app,
        "POST",
        "/api/tournaments",
        Some(staff_token),
        Some(json!({
            "name": "Tournoi de printemps",
            "description": "Ouvert aux licenciés",
            "starts_on": "2026-04-04",
            "ends_on": "2026-04-05",
            "capacity": capacity,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "create tournament failed: {body}");
    body["data"]["id"].as_str().expect("tournament id").to_string()
}

#[tokio::test]
async fn test_health() {
    let state = test_state();
    let app = test_app(&state);

    let (status, body) = send(&app, "GET", "/api/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "ok");
    assert_eq!(body["data"]["store"], "memory");
}

#[tokio::test]
async fn test_register_and_fetch_profile() {
    let state = test_state();
    let app = test_app(&state);

    let (token, user) = register_user(&app, "a@test.com", true).await;
    assert_eq!(user["email"], "a@test.com");
    assert_eq!(user["role"], "user");

    let (status, body) = send(&app, "GET", "/api/users/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["email"], "a@test.com");
    assert_eq!(body["data"]["participations"], 0);
    assert_eq!(body["data"]["points"], 0);
    assert_eq!(body["data"]["achievements"], json!([]));
    assert!(body["data"]["password_hash"].is_null());
}

#[tokio::test]
async fn test_duplicate_email_is_conflict() {
    let state = test_state();
    let app = test_app(&state);

    register_user(&app, "dup@test.com", true).await;

    // Same address in a different case still collides.
    let (status, body) = send(
        &app,
        "POST",
        "/api/auth/register",
        None,
        Some(json!({
            "email": "DUP@test.com",
            "password": PASSWORD,
            "first_name": "Other",
            "last_name": "Player",
            "license_type": "recreational",
            "licensed": false,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT, "{body}");
}

#[tokio::test]
async fn test_login() {
    let state = test_state();
    let app = test_app(&state);

    let (_, user) = register_user(&app, "login@test.com", true).await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({"email": "login@test.com", "password": "wrong-password"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED, "{body}");

    let (status, body) = send(
        &app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({"email": "login@test.com", "password": PASSWORD})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // The returned token resolves back to the same account.
    let token = body["data"]["token"].as_str().unwrap();
    let (status, me) = send(&app, "GET", "/api/users/me", Some(token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["data"]["id"], user["id"]);
}

#[tokio::test]
async fn test_auth_gate_rejections() {
    let state = test_state();
    let app = test_app(&state);

    let (status, _) = send(&app, "GET", "/api/users/me", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(&app, "GET", "/api/users/me", Some("not-a-token"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (id, _) = insert_user(&state, "expired@test.com", Role::User, true);
    let expired = state.tokens.issue(&id, None, Duration::days(-1)).unwrap();
    let (status, body) = send(&app, "GET", "/api/users/me", Some(&expired), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Token expired");

    // A reset-purpose token is not an identity token.
    let reset = state
        .tokens
        .issue(&id, Some(TokenPurpose::PasswordReset), Duration::minutes(30))
        .unwrap();
    let (status, _) = send(&app, "GET", "/api/users/me", Some(&reset), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // Token of a deleted account no longer resolves.
    let token = state.tokens.issue(&id, None, Duration::days(1)).unwrap();
    state.store.delete_user(&id).unwrap();
    let (status, _) = send(&app, "GET", "/api/users/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_profile_patch() {
    let state = test_state();
    let app = test_app(&state);

    let (token, _) = register_user(&app, "patch@test.com", true).await;

    let (status, body) = send(
        &app,
        "PATCH",
        "/api/users/me",
        Some(&token),
        Some(json!({"first_name": "Camille"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["first_name"], "Camille");

    // Unknown fields alone do not make a valid patch.
    let (status, _) = send(
        &app,
        "PATCH",
        "/api/users/me",
        Some(&token),
        Some(json!({"favorite_color": "blue"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_delete_account() {
    let state = test_state();
    let app = test_app(&state);

    let (token, _) = register_user(&app, "gone@test.com", true).await;

    let (status, _) = send(&app, "DELETE", "/api/users/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&app, "GET", "/api/users/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(
        &app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({"email": "gone@test.com", "password": PASSWORD})),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_content_role_gating() {
    let state = test_state();
    let app = test_app(&state);

    let payload = json!({
        "name": "Tournoi",
        "starts_on": "2026-06-01",
        "ends_on": "2026-06-02",
    });

    let (status, _) = send(&app, "POST", "/api/tournaments", None, Some(payload.clone())).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (member_token, _) = register_user(&app, "member@test.com", true).await;
    let (status, _) = send(
        &app,
        "POST",
        "/api/tournaments",
        Some(&member_token),
        Some(payload.clone()),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // Both staff roles may create content.
    let (_, admin_token) = insert_user(&state, "admin@test.com", Role::Admin, true);
    let (status, _) = send(
        &app,
        "POST",
        "/api/tournaments",
        Some(&admin_token),
        Some(payload.clone()),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, referent_token) = insert_user(&state, "ref@test.com", Role::Referent, true);
    let (status, _) = send(
        &app,
        "POST",
        "/api/tournaments",
        Some(&referent_token),
        Some(payload),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn test_training_schedule_is_referent_only() {
    let state = test_state();
    let app = test_app(&state);

    let payload = json!({
        "day": "Jeudi",
        "starts_at": "19:00:00",
        "ends_at": "21:00:00",
        "kind": "Entraînement",
        "required_license": "competition",
    });

    // Admins manage content, not the training schedule.
    let (_, admin_token) = insert_user(&state, "admin@test.com", Role::Admin, true);
    let (status, _) = send(
        &app,
        "POST",
        "/api/training-schedule",
        Some(&admin_token),
        Some(payload.clone()),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (_, referent_token) = insert_user(&state, "ref@test.com", Role::Referent, true);
    let (status, body) = send(
        &app,
        "POST",
        "/api/training-schedule",
        Some(&referent_token),
        Some(payload),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let slot_id = body["data"]["id"].as_str().unwrap().to_string();

    let (status, body) = send(
        &app,
        "PUT",
        &format!("/api/training-schedule/{slot_id}"),
        Some(&referent_token),
        Some(json!({"day": "Vendredi"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["day"], "Vendredi");

    // The seeded slots plus the new one are publicly listed.
    let (status, body) = send(&app, "GET", "/api/training-schedule", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 6);
}

#[tokio::test]
async fn test_tournament_registration_failures() {
    let state = test_state();
    let app = test_app(&state);

    let (_, staff_token) = insert_user(&state, "admin@test.com", Role::Admin, true);
    let tournament_id = create_tournament(&app, &staff_token, 16).await;

    let (unlicensed_token, _) = register_user(&app, "casual@test.com", false).await;
    let (status, _) = send(
        &app,
        "POST",
        &format!("/api/tournaments/{tournament_id}/register"),
        Some(&unlicensed_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (token, _) = register_user(&app, "player@test.com", true).await;
    let (status, _) = send(
        &app,
        "POST",
        "/api/tournaments/missing/register",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(
        &app,
        "POST",
        &format!("/api/tournaments/{tournament_id}/register"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(
        &app,
        "POST",
        &format!("/api/tournaments/{tournament_id}/register"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Already registered for this tournament");
}

#[tokio::test]
async fn test_tournament_capacity() {
    let state = test_state();
    let app = test_app(&state);

    let (_, staff_token) = insert_user(&state, "admin@test.com", Role::Admin, true);
    let tournament_id = create_tournament(&app, &staff_token, 2).await;

    for i in 0..2 {
        let (token, _) = register_user(&app, &format!("p{i}@test.com"), true).await;
        let (status, _) = send(
            &app,
            "POST",
            &format!("/api/tournaments/{tournament_id}/register"),
            Some(&token),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    let (token, _) = register_user(&app, "late@test.com", true).await;
    let (status, body) = send(
        &app,
        "POST",
        &format!("/api/tournaments/{tournament_id}/register"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");

    let (status, body) = send(
        &app,
        "GET",
        &format!("/api/tournaments/{tournament_id}"),
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "full");
    assert_eq!(body["data"]["participants"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_three_registrations_stay_below_threshold() {
    let state = test_state();
    let app = test_app(&state);

    let (_, staff_token) = insert_user(&state, "admin@test.com", Role::Admin, true);
    let (token, _) = register_user(&app, "a@test.com", true).await;

    for _ in 0..3 {
        let tournament_id = create_tournament(&app, &staff_token, 16).await;
        let (status, _) = send(
            &app,
            "POST",
            &format!("/api/tournaments/{tournament_id}/register"),
            Some(&token),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    let (status, body) = send(&app, "GET", "/api/users/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["participations"], 3);
    assert_eq!(body["data"]["points"], 0);
    assert_eq!(body["data"]["achievements"], json!([]));
}

#[tokio::test]
async fn test_tenth_participation_grants_achievement() {
    let state = test_state();
    let app = test_app(&state);

    let (_, staff_token) = insert_user(&state, "admin@test.com", Role::Admin, true);
    let (id, token) = insert_user(&state, "fidele@test.com", Role::User, true);

    // Nine participations behind them already.
    let mut user = state.store.get_user(&id).unwrap().unwrap();
    user.participations = 9;
    state.store.update_user(&user).unwrap();

    let tournament_id = create_tournament(&app, &staff_token, 16).await;
    let (status, _) = send(
        &app,
        "POST",
        &format!("/api/tournaments/{tournament_id}/register"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&app, "GET", "/api/users/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["participations"], 10);
    assert_eq!(body["data"]["points"], 100);

    let achievements = body["data"]["achievements"].as_array().unwrap();
    assert_eq!(achievements.len(), 1);
    assert_eq!(achievements[0]["id"], "membre_fidele");
}

#[tokio::test]
async fn test_rankings() {
    let state = test_state();
    let app = test_app(&state);

    for (email, points, licensed) in [
        ("bronze@test.com", 100, true),
        ("gold@test.com", 900, true),
        ("hidden@test.com", 9999, false),
    ] {
        let (id, _) = insert_user(&state, email, Role::User, licensed);
        state.store.add_points(&id, points).unwrap();
    }

    let (status, body) = send(&app, "GET", "/api/rankings", None, None).await;
    assert_eq!(status, StatusCode::OK);

    let rankings = body["data"].as_array().unwrap();
    assert_eq!(rankings.len(), 2);
    assert_eq!(rankings[0]["email"], "gold@test.com");
    assert_eq!(rankings[1]["email"], "bronze@test.com");
}

#[tokio::test]
async fn test_forgot_and_reset_password() {
    let state = test_state();
    let app = test_app(&state);

    let (_, user) = register_user(&app, "reset@test.com", true).await;
    let user_id = user["id"].as_str().unwrap();

    // Unknown addresses get the same generic answer as known ones.
    for email in ["reset@test.com", "nobody@test.com"] {
        let (status, body) = send(
            &app,
            "POST",
            "/api/auth/forgot-password",
            None,
            Some(json!({"email": email})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["data"]["message"].as_str().unwrap().starts_with("If the address"));
    }

    let (status, _) = send(
        &app,
        "POST",
        "/api/auth/reset-password",
        None,
        Some(json!({"token": "garbage", "new_password": "brand-new-pass"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // A login token must not work as a reset token.
    let login_token = state.tokens.issue(user_id, None, Duration::days(1)).unwrap();
    let (status, _) = send(
        &app,
        "POST",
        "/api/auth/reset-password",
        None,
        Some(json!({"token": login_token, "new_password": "brand-new-pass"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let reset_token = state
        .tokens
        .issue(user_id, Some(TokenPurpose::PasswordReset), Duration::minutes(30))
        .unwrap();
    let (status, _) = send(
        &app,
        "POST",
        "/api/auth/reset-password",
        None,
        Some(json!({"token": reset_token, "new_password": "brand-new-pass"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(
        &app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({"email": "reset@test.com", "password": PASSWORD})),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(
        &app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({"email": "reset@test.com", "password": "brand-new-pass"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_referent_signup_flow() {
    let state = test_state();
    let app = test_app(&state);

    let (status, _) = send(
        &app,
        "POST",
        "/api/auth/referent-request",
        None,
        Some(json!({
            "email": "newref@test.com",
            "password": PASSWORD,
            "first_name": "Lou",
            "last_name": "Garnier",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let code = state
        .store
        .get_pending_referent("newref@test.com")
        .unwrap()
        .expect("pending request recorded")
        .code;

    let wrong = if code == "000000" { "111111" } else { "000000" };
    let (status, _) = send(
        &app,
        "POST",
        "/api/auth/referent-verify",
        None,
        Some(json!({"email": "newref@test.com", "code": wrong})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(
        &app,
        "POST",
        "/api/auth/referent-verify",
        None,
        Some(json!({"email": "newref@test.com", "code": code})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    assert_eq!(body["data"]["user"]["role"], "referent");

    // The pending record is consumed; the code cannot be replayed.
    let (status, _) = send(
        &app,
        "POST",
        "/api/auth/referent-verify",
        None,
        Some(json!({"email": "newref@test.com", "code": code})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // The new referent can use member management.
    let (status, body) = send(
        &app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({"email": "newref@test.com", "password": PASSWORD})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let referent_token = body["data"]["token"].as_str().unwrap().to_string();

    let (status, _) = send(&app, "GET", "/api/referent/users", Some(&referent_token), None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_referent_verify_rejects_expired_code() {
    let state = test_state();
    let app = test_app(&state);

    let now = Utc::now();
    state
        .store
        .upsert_pending_referent(&libero::types::PendingReferent {
            email: "slow@test.com".to_string(),
            password_hash: state.passwords.hash(PASSWORD).unwrap(),
            first_name: "Lou".to_string(),
            last_name: "Garnier".to_string(),
            code: "123456".to_string(),
            created_at: now - Duration::hours(1),
            expires_at: now - Duration::minutes(30),
        })
        .unwrap();

    let (status, _) = send(
        &app,
        "POST",
        "/api/auth/referent-verify",
        None,
        Some(json!({"email": "slow@test.com", "code": "123456"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // No account was created along the way.
    assert!(state.store.get_user_by_email("slow@test.com").unwrap().is_none());
    // The stale record was purged; retrying changes nothing.
    assert!(state.store.get_pending_referent("slow@test.com").unwrap().is_none());
}

#[tokio::test]
async fn test_closed_tournament_rejects_registration() {
    let state = test_state();
    let app = test_app(&state);

    let (_, staff_token) = insert_user(&state, "admin@test.com", Role::Admin, true);
    let tournament_id = create_tournament(&app, &staff_token, 16).await;

    let (status, _) = send(
        &app,
        "PATCH",
        &format!("/api/tournaments/{tournament_id}"),
        Some(&staff_token),
        Some(json!({"status": "closed"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (token, _) = register_user(&app, "late@test.com", true).await;
    let (status, body) = send(
        &app,
        "POST",
        &format!("/api/tournaments/{tournament_id}/register"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Registrations are closed");
}

#[tokio::test]
async fn test_referent_member_management() {
    let state = test_state();
    let app = test_app(&state);

    let (_, referent_token) = insert_user(&state, "ref@test.com", Role::Referent, true);
    let (_, member) = register_user(&app, "member@test.com", true).await;
    let member_id = member["id"].as_str().unwrap();

    // Admins are locked out of member management.
    let (_, admin_token) = insert_user(&state, "admin@test.com", Role::Admin, true);
    let (status, _) = send(&app, "GET", "/api/referent/users", Some(&admin_token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = send(
        &app,
        "PATCH",
        &format!("/api/referent/users/{member_id}/toggle-license"),
        Some(&referent_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["licensed"], false);

    let (status, body) = send(
        &app,
        "PATCH",
        &format!("/api/referent/users/{member_id}"),
        Some(&referent_token),
        Some(json!({"licensed": true, "points": 250})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["licensed"], true);
    assert_eq!(body["data"]["points"], 250);

    let (status, _) = send(
        &app,
        "PATCH",
        "/api/referent/users/missing",
        Some(&referent_token),
        Some(json!({"licensed": true})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(
        &app,
        "DELETE",
        &format!("/api/referent/users/{member_id}"),
        Some(&referent_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(state.store.get_user(member_id).unwrap().is_none());
}

#[tokio::test]
async fn test_news_and_matches_crud() {
    let state = test_state();
    let app = test_app(&state);

    let (_, staff_token) = insert_user(&state, "admin@test.com", Role::Admin, true);

    let (status, body) = send(
        &app,
        "POST",
        "/api/news",
        Some(&staff_token),
        Some(json!({"title": "Victoire en finale", "body": "Quelle saison !"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["author_name"], "Staff Member");
    let news_id = body["data"]["id"].as_str().unwrap().to_string();

    let (status, body) = send(&app, "GET", "/api/news", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    let (status, body) = send(
        &app,
        "PATCH",
        &format!("/api/news/{news_id}"),
        Some(&staff_token),
        Some(json!({"title": "Victoire en finale !"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["title"], "Victoire en finale !");

    // A match tied to an unknown tournament is rejected.
    let (status, _) = send(
        &app,
        "POST",
        "/api/matches",
        Some(&staff_token),
        Some(json!({
            "tournament_id": "missing",
            "home_team": "Libero VC",
            "away_team": "Rivaux VC",
            "scheduled_on": "2026-06-15",
            "starts_at": "19:00:00",
            "venue": "Gymnase central",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(
        &app,
        "POST",
        "/api/matches",
        Some(&staff_token),
        Some(json!({
            "home_team": "Libero VC",
            "away_team": "Rivaux VC",
            "scheduled_on": "2026-06-15",
            "starts_at": "19:00:00",
            "venue": "Gymnase central",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let match_id = body["data"]["id"].as_str().unwrap().to_string();

    let (status, body) = send(
        &app,
        "PATCH",
        &format!("/api/matches/{match_id}"),
        Some(&staff_token),
        Some(json!({"home_score": 3, "away_score": 1})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["home_score"], 3);

    let (status, _) = send(
        &app,
        "DELETE",
        &format!("/api/news/{news_id}"),
        Some(&staff_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&app, "GET", &format!("/api/news/{news_id}"), None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_achievement_catalog_is_public() {
    let state = test_state();
    let app = test_app(&state);

    let (status, body) = send(&app, "GET", "/api/achievements", None, None).await;
    assert_eq!(status, StatusCode::OK);

    let catalog = body["data"].as_array().unwrap();
    assert_eq!(catalog.len(), 5);
    assert!(catalog.iter().any(|a| a["id"] == "membre_fidele"));
}
