//! # Account and Session Tests
//!
//! Registration, login, bearer sessions and role checks over HTTP.
//!
//! ```bash
//! cargo test --test accounts_test
//! ```

mod common;

use serde_json::{json, Value};

use common::spawn_app;
use course_portal::models::Role;

#[tokio::test]
async fn test_register_rejects_duplicate_email() {
    let app = spawn_app().await;
    let body = json!({ "name": "Dana", "email": "dana@example.com", "password": "pw" });

    let resp = app.client.post(app.url("/api/auth/register")).json(&body).send().await.unwrap();
    assert_eq!(resp.status(), 201);
    let user: Value = resp.json().await.unwrap();
    assert_eq!(user["role"], "USER");
    assert!(user.get("password_hash").is_none());

    // Same address with different case is still taken
    let body = json!({ "name": "Dana", "email": "DANA@example.com", "password": "pw" });
    let resp = app.client.post(app.url("/api/auth/register")).json(&body).send().await.unwrap();
    assert_eq!(resp.status(), 409);
    let err: Value = resp.json().await.unwrap();
    assert_eq!(err["error"], "This email is already registered.");
}

#[tokio::test]
async fn test_passwords_are_stored_as_bcrypt_hashes() {
    let app = spawn_app().await;
    app.account("Eli", "eli@example.com", Role::User).await;

    let stored: String = sqlx::query_scalar("SELECT password_hash FROM users WHERE email = 'eli@example.com'")
        .fetch_one(&app.pool)
        .await
        .unwrap();
    assert!(stored.starts_with("$2b$04$"));
    assert!(!stored.contains("secret123"));

    let resp = app
        .client
        .post(app.url("/api/auth/login"))
        .json(&json!({ "email": "ELI@example.com", "password": "secret123" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let session: Value = resp.json().await.unwrap();
    assert!(session["token"].is_string());
}

#[tokio::test]
async fn test_register_requires_all_fields() {
    let app = spawn_app().await;
    let resp = app
        .client
        .post(app.url("/api/auth/register"))
        .json(&json!({ "name": " ", "email": "x@example.com", "password": "pw" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
    let err: Value = resp.json().await.unwrap();
    assert_eq!(err["error"], "Please fill in all fields.");
}

#[tokio::test]
async fn test_login_errors() {
    let app = spawn_app().await;
    app.account("Eli", "eli@example.com", Role::User).await;

    let resp = app
        .client
        .post(app.url("/api/auth/login"))
        .json(&json!({ "email": "nobody@example.com", "password": "secret123" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 401);
    let err: Value = resp.json().await.unwrap();
    assert_eq!(err["error"], "No account found with this email.");

    let resp = app
        .client
        .post(app.url("/api/auth/login"))
        .json(&json!({ "email": "eli@example.com", "password": "wrong" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 401);
    let err: Value = resp.json().await.unwrap();
    assert_eq!(err["error"], "Incorrect password.");

    let resp = app
        .client
        .post(app.url("/api/auth/login"))
        .json(&json!({ "email": "", "password": "" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
}

#[tokio::test]
async fn test_profile_requires_valid_session() {
    let app = spawn_app().await;
    let eli = app.account("Eli", "eli@example.com", Role::User).await;

    let resp = app.client.get(app.url("/api/profile")).send().await.unwrap();
    assert_eq!(resp.status(), 401);

    let resp = app.get("not-a-token", "/api/profile").await;
    assert_eq!(resp.status(), 401);

    let resp = app.get(&eli.token, "/api/profile").await;
    assert_eq!(resp.status(), 200);
    let profile: Value = resp.json().await.unwrap();
    assert_eq!(profile["email"], "eli@example.com");

    let resp = app
        .client
        .patch(app.url("/api/profile"))
        .bearer_auth(&eli.token)
        .json(&json!({ "name": "Eli Cohen" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let profile: Value = resp.json().await.unwrap();
    assert_eq!(profile["name"], "Eli Cohen");

    let resp = app.post(&eli.token, "/api/auth/logout", json!({})).await;
    assert_eq!(resp.status(), 200);
    let resp = app.get(&eli.token, "/api/profile").await;
    assert_eq!(resp.status(), 401);
}

#[tokio::test]
async fn test_role_gates() {
    let app = spawn_app().await;
    let learner = app.account("Lia", "lia@example.com", Role::User).await;
    let teacher = app.account("Tom", "tom@example.com", Role::Teacher).await;
    let admin = app.account("Ada", "ada@example.com", Role::Admin).await;

    let resp = app.post(&learner.token, "/api/courses", json!({ "title": "Nope" })).await;
    assert_eq!(resp.status(), 403);
    let resp = app.get(&learner.token, "/api/teacher/grading").await;
    assert_eq!(resp.status(), 403);
    let resp = app.get(&teacher.token, "/api/admin/stats").await;
    assert_eq!(resp.status(), 403);

    let resp = app.get(&teacher.token, "/api/teacher/grading").await;
    assert_eq!(resp.status(), 200);
    let resp = app.get(&admin.token, "/api/admin/stats").await;
    assert_eq!(resp.status(), 200);

    // Admin promotes the learner, whose existing session picks up the new role
    let resp = app
        .put(
            &admin.token,
            &format!("/api/admin/users/{}/role", learner.id),
            json!({ "role": "TEACHER" }),
        )
        .await;
    assert_eq!(resp.status(), 200);
    let resp = app.get(&learner.token, "/api/teacher/grading").await;
    assert_eq!(resp.status(), 200);

    let resp = app
        .put(&admin.token, "/api/admin/users/usr_missing/role", json!({ "role": "ADMIN" }))
        .await;
    assert_eq!(resp.status(), 404);
}
