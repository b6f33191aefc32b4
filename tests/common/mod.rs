//! Shared helpers: a router on an ephemeral port backed by a temporary SQLite file.

#![allow(dead_code)]

use serde_json::{json, Value};
use sqlx::SqlitePool;
use std::sync::Arc;
use tokio::net::TcpListener;

use course_portal::accounts;
use course_portal::config::Settings;
use course_portal::db::create_test_connection_in_temporary_file;
use course_portal::models::Role;
use course_portal::serve::{build_router, AppState};

pub struct TestApp {
    pub base_url: String,
    pub pool: SqlitePool,
    pub client: reqwest::Client,
    _guard: tempfile::TempDir,
}

/// A signed-in account
pub struct Account {
    pub id: String,
    pub token: String,
}

pub async fn spawn_app() -> TestApp {
    let (pool, guard) = create_test_connection_in_temporary_file().await.unwrap();
    let state = Arc::new(AppState {
        pool: pool.clone(),
        settings: Settings {
            // cheapest bcrypt cost keeps account setup fast
            password_cost: 4,
            ..Settings::default()
        },
    });
    let app = build_router(state);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;

    TestApp {
        base_url: format!("http://{}", addr),
        pool,
        client: reqwest::Client::new(),
        _guard: guard,
    }
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Register through the API and log in; roles other than USER are set directly
    pub async fn account(&self, name: &str, email: &str, role: Role) -> Account {
        let resp = self
            .client
            .post(self.url("/api/auth/register"))
            .json(&json!({ "name": name, "email": email, "password": "secret123" }))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 201);
        let user: Value = resp.json().await.unwrap();
        let id = user["id"].as_str().unwrap().to_string();

        if role != Role::User {
            accounts::set_role(&self.pool, &id, role).await.unwrap();
        }

        let resp = self
            .client
            .post(self.url("/api/auth/login"))
            .json(&json!({ "email": email, "password": "secret123" }))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 200);
        let body: Value = resp.json().await.unwrap();
        Account {
            id,
            token: body["token"].as_str().unwrap().to_string(),
        }
    }

    pub async fn get(&self, token: &str, path: &str) -> reqwest::Response {
        self.client
            .get(self.url(path))
            .bearer_auth(token)
            .send()
            .await
            .unwrap()
    }

    pub async fn post(&self, token: &str, path: &str, body: Value) -> reqwest::Response {
        self.client
            .post(self.url(path))
            .bearer_auth(token)
            .json(&body)
            .send()
            .await
            .unwrap()
    }

    pub async fn put(&self, token: &str, path: &str, body: Value) -> reqwest::Response {
        self.client
            .put(self.url(path))
            .bearer_auth(token)
            .json(&body)
            .send()
            .await
            .unwrap()
    }

    pub async fn delete(&self, token: &str, path: &str) -> reqwest::Response {
        self.client
            .delete(self.url(path))
            .bearer_auth(token)
            .send()
            .await
            .unwrap()
    }

    /// Teacher-owned course with `lessons` lessons; returns (course id, lesson ids in order)
    pub async fn course_with_lessons(&self, teacher: &Account, lessons: usize) -> (String, Vec<String>) {
        let resp = self
            .post(
                &teacher.token,
                "/api/courses",
                json!({ "title": "Business English", "price": 19.5, "level": "Beginner" }),
            )
            .await;
        assert_eq!(resp.status(), 201);
        let course: Value = resp.json().await.unwrap();
        let course_id = course["id"].as_str().unwrap().to_string();

        let mut lesson_ids = Vec::new();
        for i in 0..lessons {
            let resp = self
                .post(
                    &teacher.token,
                    "/api/lessons",
                    json!({
                        "course_id": course_id,
                        "title": format!("Lesson {}", i + 1),
                        "video_url": "https://www.youtube.com/watch?v=dQw4w9WgXcQ",
                    }),
                )
                .await;
            assert_eq!(resp.status(), 201);
            let lesson: Value = resp.json().await.unwrap();
            lesson_ids.push(lesson["id"].as_str().unwrap().to_string());
        }
        (course_id, lesson_ids)
    }
}
