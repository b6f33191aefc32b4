//! # Enrollment and Progress Tests
//!
//! Enrolling, per-lesson completion, course percentage, the learner dashboard
//! and teacher-managed live session access.
//!
//! ```bash
//! cargo test --test enrollment_progress_test
//! ```

mod common;

use serde_json::{json, Value};

use common::spawn_app;
use course_portal::models::Role;

#[tokio::test]
async fn test_enroll_is_idempotent() {
    let app = spawn_app().await;
    let teacher = app.account("Tamar", "tamar@example.com", Role::Teacher).await;
    let learner = app.account("Lia", "lia@example.com", Role::User).await;
    let (course_id, _) = app.course_with_lessons(&teacher, 1).await;

    let resp = app.post(&learner.token, "/api/enroll", json!({ "courseId": course_id })).await;
    assert_eq!(resp.status(), 201);
    let first: Value = resp.json().await.unwrap();
    assert_eq!(first["already_enrolled"], false);

    let resp = app.post(&learner.token, "/api/enroll", json!({ "course_id": course_id })).await;
    assert_eq!(resp.status(), 200);
    let second: Value = resp.json().await.unwrap();
    assert_eq!(second["already_enrolled"], true);
    assert_eq!(second["enrollment"]["id"], first["enrollment"]["id"]);

    let resp = app.post(&learner.token, "/api/enroll", json!({ "course_id": "crs_missing" })).await;
    assert_eq!(resp.status(), 404);
}

#[tokio::test]
async fn test_malformed_enroll_body_is_json_bad_request() {
    let app = spawn_app().await;
    let learner = app.account("Lia", "lia@example.com", Role::User).await;

    let resp = app.post(&learner.token, "/api/enroll", json!({})).await;
    assert_eq!(resp.status(), 400);
    assert!(resp.headers()["content-type"]
        .to_str()
        .unwrap()
        .starts_with("application/json"));
    let err: Value = resp.json().await.unwrap();
    assert!(err["error"].as_str().unwrap().contains("course_id"));

    let resp = app
        .client
        .post(app.url("/api/enroll"))
        .bearer_auth(&learner.token)
        .header("content-type", "application/json")
        .body("{\"course_id\":")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
    let err: Value = resp.json().await.unwrap();
    assert!(err["error"].is_string());

    let resp = app
        .client
        .post(app.url("/api/enroll"))
        .bearer_auth(&learner.token)
        .body("course_id=crs_1")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
    let err: Value = resp.json().await.unwrap();
    assert!(err["error"].is_string());
}

#[tokio::test]
async fn test_lessons_require_enrollment() {
    let app = spawn_app().await;
    let teacher = app.account("Tamar", "tamar@example.com", Role::Teacher).await;
    let learner = app.account("Lia", "lia@example.com", Role::User).await;
    let (course_id, lessons) = app.course_with_lessons(&teacher, 2).await;

    let resp = app.get(&learner.token, &format!("/api/lessons/{}", lessons[0])).await;
    assert_eq!(resp.status(), 403);
    let resp = app
        .post(&learner.token, "/api/lessons/complete", json!({ "lessonId": lessons[0] }))
        .await;
    assert_eq!(resp.status(), 403);

    // Teachers can preview without enrolling
    let resp = app.get(&teacher.token, &format!("/api/lessons/{}", lessons[0])).await;
    assert_eq!(resp.status(), 200);

    app.post(&learner.token, "/api/enroll", json!({ "course_id": course_id })).await;
    let resp = app.get(&learner.token, &format!("/api/lessons/{}", lessons[0])).await;
    assert_eq!(resp.status(), 200);
    let view: Value = resp.json().await.unwrap();
    assert_eq!(view["course_title"], "Business English");
    assert_eq!(
        view["embed_url"],
        "https://www.youtube.com/embed/dQw4w9WgXcQ?rel=0&modestbranding=1"
    );
    assert_eq!(view["previous_lesson_id"], Value::Null);
    assert_eq!(view["next_lesson_id"], lessons[1].as_str());
    assert_eq!(view["completed"], false);

    let resp = app.get(&learner.token, "/api/lessons/les_missing").await;
    assert_eq!(resp.status(), 404);
}

#[tokio::test]
async fn test_progress_percentage_and_toggle() {
    let app = spawn_app().await;
    let teacher = app.account("Tamar", "tamar@example.com", Role::Teacher).await;
    let learner = app.account("Lia", "lia@example.com", Role::User).await;
    let (course_id, lessons) = app.course_with_lessons(&teacher, 3).await;
    app.post(&learner.token, "/api/enroll", json!({ "course_id": course_id })).await;

    let progress_path = format!("/api/courses/{}/progress", course_id);
    let progress: Value = app.get(&learner.token, &progress_path).await.json().await.unwrap();
    assert_eq!(progress["percentage"], 0);
    assert_eq!(progress["total_lessons"], 3);

    let resp = app
        .post(&learner.token, "/api/lessons/complete", json!({ "lesson_id": lessons[0] }))
        .await;
    assert_eq!(resp.status(), 200);
    // Marking twice keeps a single completion
    app.post(&learner.token, "/api/lessons/complete", json!({ "lesson_id": lessons[0] }))
        .await;
    let progress: Value = app.get(&learner.token, &progress_path).await.json().await.unwrap();
    assert_eq!(progress["percentage"], 33);
    assert_eq!(progress["completed_lessons"], 1);

    let resp = app
        .post(&learner.token, &format!("/api/lessons/{}/toggle", lessons[1]), json!({}))
        .await;
    let toggled: Value = resp.json().await.unwrap();
    assert_eq!(toggled["completed"], true);
    let progress: Value = app.get(&learner.token, &progress_path).await.json().await.unwrap();
    assert_eq!(progress["percentage"], 67);

    let resp = app
        .post(&learner.token, &format!("/api/lessons/{}/toggle", lessons[1]), json!({}))
        .await;
    let toggled: Value = resp.json().await.unwrap();
    assert_eq!(toggled["completed"], false);

    let resp = app
        .post(
            &learner.token,
            "/api/lessons/complete",
            json!({ "lesson_id": lessons[0], "isCompleted": false }),
        )
        .await;
    assert_eq!(resp.status(), 200);
    let progress: Value = app.get(&learner.token, &progress_path).await.json().await.unwrap();
    assert_eq!(progress["percentage"], 0);
}

#[tokio::test]
async fn test_dashboard_and_unenroll() {
    let app = spawn_app().await;
    let teacher = app.account("Tamar", "tamar@example.com", Role::Teacher).await;
    let learner = app.account("Lia", "lia@example.com", Role::User).await;
    let (course_id, lessons) = app.course_with_lessons(&teacher, 2).await;
    app.post(&learner.token, "/api/enroll", json!({ "course_id": course_id })).await;
    app.post(&learner.token, "/api/lessons/complete", json!({ "lesson_id": lessons[0] }))
        .await;

    let dashboard: Value = app.get(&learner.token, "/api/dashboard").await.json().await.unwrap();
    assert_eq!(dashboard["weekly_goal"], 5);
    assert_eq!(dashboard["lessons_completed"], 1);
    assert_eq!(dashboard["lessons_this_week"], 1);
    let courses = dashboard["courses"].as_array().unwrap();
    assert_eq!(courses.len(), 1);
    assert_eq!(courses[0]["percentage"], 50);
    assert_eq!(courses[0]["next_lesson_id"], lessons[1].as_str());
    assert_eq!(dashboard["recent_activity"][0]["lesson_id"], lessons[0].as_str());

    let resp = app.delete(&learner.token, &format!("/api/enroll/{}", course_id)).await;
    assert_eq!(resp.status(), 200);
    let resp = app.delete(&learner.token, &format!("/api/enroll/{}", course_id)).await;
    assert_eq!(resp.status(), 404);

    let dashboard: Value = app.get(&learner.token, "/api/dashboard").await.json().await.unwrap();
    assert!(dashboard["courses"].as_array().unwrap().is_empty());
    // History survives leaving the course
    assert_eq!(dashboard["lessons_completed"], 1);
}

#[tokio::test]
async fn test_teacher_sets_student_access() {
    let app = spawn_app().await;
    let teacher = app.account("Tamar", "tamar@example.com", Role::Teacher).await;
    let learner = app.account("Lia", "lia@example.com", Role::User).await;
    let (course_id, _) = app.course_with_lessons(&teacher, 1).await;

    let resp = app
        .post(
            &learner.token,
            "/api/enroll",
            json!({
                "course_id": course_id,
                "schedule": { "slots": [{ "day": "Mon", "time": "09:00" }] },
            }),
        )
        .await;
    let outcome: Value = resp.json().await.unwrap();
    assert_eq!(outcome["appointments"].as_array().unwrap().len(), 1);

    let view: Value = app
        .get(&teacher.token, &format!("/api/teacher/courses/{}", course_id))
        .await
        .json()
        .await
        .unwrap();
    let students = view["students"].as_array().unwrap();
    assert_eq!(students.len(), 1);
    assert_eq!(students[0]["email"], "lia@example.com");
    let enrollment_id = students[0]["enrollment_id"].as_str().unwrap().to_string();
    let access_path = format!("/api/teacher/enrollments/{}/access", enrollment_id);

    let resp = app
        .put(&teacher.token, &access_path, json!({ "meet_link": "ftp://meet.example.com/x" }))
        .await;
    assert_eq!(resp.status(), 400);
    let resp = app
        .put(
            &teacher.token,
            &access_path,
            json!({ "slots": [{ "day": "Mon", "time": "09:00" }, { "day": "Monday", "time": "9:00" }] }),
        )
        .await;
    assert_eq!(resp.status(), 400);

    let resp = app
        .put(
            &teacher.token,
            &access_path,
            json!({
                "meet_link": "https://meet.google.com/abc-defg-hij",
                "slots": [{ "day": "Thu", "time": "18:30" }, { "day": "Tue", "time": "10:00" }],
            }),
        )
        .await;
    assert_eq!(resp.status(), 200);
    let access: Value = resp.json().await.unwrap();
    assert_eq!(access["enrollment"]["meet_link"], "https://meet.google.com/abc-defg-hij");
    let days: Vec<&str> = access["appointments"]
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a["day_of_week"].as_str().unwrap())
        .collect();
    assert_eq!(days, vec!["Tue", "Thu"]);

    let live: Value = app
        .get(&learner.token, &format!("/api/courses/{}/live", course_id))
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(live["meet_link"], "https://meet.google.com/abc-defg-hij");
    assert_eq!(live["slots"].as_array().unwrap().len(), 2);

    let resp = app.put(&teacher.token, "/api/teacher/enrollments/enr_missing/access", json!({})).await;
    assert_eq!(resp.status(), 404);
}
