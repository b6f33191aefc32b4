//! # Exam, Assignment and Grading Tests
//!
//! Building an exam, learner submissions with auto-scoring, assignment file
//! rules and the teacher grading queue.
//!
//! ```bash
//! cargo test --test submissions_test
//! ```

mod common;

use serde_json::{json, Value};

use common::{spawn_app, Account, TestApp};
use course_portal::models::Role;

/// Course with one lesson and an enrolled learner; returns the lesson id
async fn classroom(app: &TestApp, teacher: &Account, learner: &Account) -> String {
    let (course_id, lessons) = app.course_with_lessons(teacher, 1).await;
    let resp = app.post(&learner.token, "/api/enroll", json!({ "course_id": course_id })).await;
    assert_eq!(resp.status(), 201);
    lessons[0].clone()
}

/// Exam with two questions; returns (exam id, correct option ids, wrong option ids)
async fn two_question_exam(app: &TestApp, teacher: &Account, lesson_id: &str) -> (String, Vec<String>, Vec<String>) {
    let resp = app
        .post(
            &teacher.token,
            "/api/teacher/exams",
            json!({ "lessonId": lesson_id, "title": "Unit quiz" }),
        )
        .await;
    assert_eq!(resp.status(), 201);
    let exam: Value = resp.json().await.unwrap();
    let exam_id = exam["id"].as_str().unwrap().to_string();

    let mut correct = Vec::new();
    let mut wrong = Vec::new();
    for (text, right, other) in [("Past of go?", "went", "goed"), ("Plural of mouse?", "mice", "mouses")] {
        let resp = app
            .post(
                &teacher.token,
                &format!("/api/teacher/exams/{}/questions", exam_id),
                json!({
                    "text": text,
                    "options": [
                        { "text": other, "is_correct": false },
                        { "text": right, "isCorrect": true },
                    ],
                }),
            )
            .await;
        assert_eq!(resp.status(), 201);
        let question: Value = resp.json().await.unwrap();
        for option in question["options"].as_array().unwrap() {
            let id = option["id"].as_str().unwrap().to_string();
            if option["is_correct"] == true {
                correct.push(id);
            } else {
                wrong.push(id);
            }
        }
    }
    (exam_id, correct, wrong)
}

#[tokio::test]
async fn test_question_needs_one_correct_option() {
    let app = spawn_app().await;
    let teacher = app.account("Tamar", "tamar@example.com", Role::Teacher).await;
    let learner = app.account("Lia", "lia@example.com", Role::User).await;
    let lesson_id = classroom(&app, &teacher, &learner).await;
    let (exam_id, _, _) = two_question_exam(&app, &teacher, &lesson_id).await;
    let path = format!("/api/teacher/exams/{}/questions", exam_id);

    let resp = app
        .post(&teacher.token, &path, json!({ "text": "Q", "options": [{ "text": "only", "is_correct": true }] }))
        .await;
    assert_eq!(resp.status(), 400);
    let resp = app
        .post(
            &teacher.token,
            &path,
            json!({ "text": "Q", "options": [{ "text": "a", "is_correct": true }, { "text": "b", "is_correct": true }] }),
        )
        .await;
    assert_eq!(resp.status(), 400);

    let exam: Value = app.get(&teacher.token, &format!("/api/teacher/exams/{}", exam_id)).await.json().await.unwrap();
    let questions = exam["questions"].as_array().unwrap();
    assert_eq!(questions.len(), 2);
    assert_eq!(questions[0]["position"], 0);
    assert_eq!(questions[1]["position"], 1);
}

#[tokio::test]
async fn test_learner_exam_hides_answers_and_auto_scores() {
    let app = spawn_app().await;
    let teacher = app.account("Tamar", "tamar@example.com", Role::Teacher).await;
    let learner = app.account("Lia", "lia@example.com", Role::User).await;
    let lesson_id = classroom(&app, &teacher, &learner).await;
    let (exam_id, correct, wrong) = two_question_exam(&app, &teacher, &lesson_id).await;

    let exam: Value = app.get(&learner.token, &format!("/api/exams/{}", exam_id)).await.json().await.unwrap();
    let options = exam["questions"][0]["options"].as_array().unwrap();
    assert_eq!(options.len(), 2);
    assert!(options.iter().all(|o| o.get("is_correct").is_none()));
    assert_eq!(exam["result"], Value::Null);

    // Two options for the same question
    let resp = app
        .post(
            &learner.token,
            "/api/exams/submit",
            json!({ "exam_id": exam_id, "selected_option_ids": [correct[0], wrong[0]] }),
        )
        .await;
    assert_eq!(resp.status(), 400);

    let resp = app
        .post(
            &learner.token,
            "/api/exams/submit",
            json!({ "examId": exam_id, "selectedOptionIds": [correct[0], wrong[1]] }),
        )
        .await;
    assert_eq!(resp.status(), 201);
    let result: Value = resp.json().await.unwrap();
    assert_eq!(result["score"], 50.0);
    assert_eq!(result["status"], "GRADED");

    let resp = app
        .post(
            &learner.token,
            "/api/exams/submit",
            json!({ "exam_id": exam_id, "selected_option_ids": correct }),
        )
        .await;
    assert_eq!(resp.status(), 409);
    let err: Value = resp.json().await.unwrap();
    assert_eq!(err["error"], "You have already submitted this exam");

    let view: Value = app.get(&learner.token, &format!("/api/lessons/{}", lesson_id)).await.json().await.unwrap();
    assert_eq!(view["exams"][0]["result"]["score"], 50.0);
}

#[tokio::test]
async fn test_submissions_require_enrollment_and_content() {
    let app = spawn_app().await;
    let teacher = app.account("Tamar", "tamar@example.com", Role::Teacher).await;
    let learner = app.account("Lia", "lia@example.com", Role::User).await;
    let outsider = app.account("Omer", "omer@example.com", Role::User).await;
    let lesson_id = classroom(&app, &teacher, &learner).await;
    let (exam_id, correct, _) = two_question_exam(&app, &teacher, &lesson_id).await;

    let resp = app
        .post(&outsider.token, "/api/exams/submit", json!({ "exam_id": exam_id, "selected_option_ids": correct }))
        .await;
    assert_eq!(resp.status(), 403);

    let resp = app.post(&learner.token, "/api/exams/submit", json!({ "exam_id": exam_id })).await;
    assert_eq!(resp.status(), 400);
    let err: Value = resp.json().await.unwrap();
    assert_eq!(err["error"], "Submission is empty");

    let resp = app
        .post(&learner.token, "/api/exams/submit", json!({ "exam_id": exam_id, "file_url": "essay.pdf" }))
        .await;
    assert_eq!(resp.status(), 400);

    let resp = app
        .post(&learner.token, "/api/exams/submit", json!({ "exam_id": "exm_missing", "text_answer": "hi" }))
        .await;
    assert_eq!(resp.status(), 404);
}

#[tokio::test]
async fn test_selections_on_exam_without_questions_are_rejected() {
    let app = spawn_app().await;
    let teacher = app.account("Tamar", "tamar@example.com", Role::Teacher).await;
    let learner = app.account("Lia", "lia@example.com", Role::User).await;
    let lesson_id = classroom(&app, &teacher, &learner).await;

    let resp = app
        .post(&teacher.token, "/api/teacher/exams", json!({ "lesson_id": lesson_id, "title": "Essay" }))
        .await;
    assert_eq!(resp.status(), 201);
    let exam: Value = resp.json().await.unwrap();
    let exam_id = exam["id"].as_str().unwrap();

    let resp = app
        .post(
            &learner.token,
            "/api/exams/submit",
            json!({ "exam_id": exam_id, "selected_option_ids": ["opt_x"] }),
        )
        .await;
    assert_eq!(resp.status(), 400);
    let err: Value = resp.json().await.unwrap();
    assert_eq!(err["error"], "Exam has no questions");

    // nothing was stored, so a written answer still goes through
    let resp = app
        .post(&learner.token, "/api/exams/submit", json!({ "exam_id": exam_id, "text_answer": "My essay" }))
        .await;
    assert_eq!(resp.status(), 201);
    let result: Value = resp.json().await.unwrap();
    assert_eq!(result["status"], "SUBMITTED");
    assert_eq!(result["score"], Value::Null);
}

#[tokio::test]
async fn test_assignment_file_rule_and_grading_queue() {
    let app = spawn_app().await;
    let teacher = app.account("Tamar", "tamar@example.com", Role::Teacher).await;
    let learner = app.account("Lia", "lia@example.com", Role::User).await;
    let lesson_id = classroom(&app, &teacher, &learner).await;
    let (exam_id, _, _) = two_question_exam(&app, &teacher, &lesson_id).await;

    let resp = app
        .post(
            &teacher.token,
            "/api/teacher/assignments",
            json!({ "lesson_id": lesson_id, "title": "Write a cover letter" }),
        )
        .await;
    assert_eq!(resp.status(), 201);
    let assignment: Value = resp.json().await.unwrap();
    assert_eq!(assignment["requires_file"], true);
    let assignment_id = assignment["id"].as_str().unwrap().to_string();

    let resp = app
        .post(
            &learner.token,
            "/api/assignments/submit",
            json!({ "assignment_id": assignment_id, "content": "Dear hiring manager" }),
        )
        .await;
    assert_eq!(resp.status(), 400);
    let err: Value = resp.json().await.unwrap();
    assert_eq!(err["error"], "File is required");

    let resp = app
        .post(
            &learner.token,
            "/api/assignments/submit",
            json!({ "assignmentId": assignment_id, "fileUrl": "https://files.example.com/letter.pdf" }),
        )
        .await;
    assert_eq!(resp.status(), 201);
    let submission: Value = resp.json().await.unwrap();
    let submission_id = submission["id"].as_str().unwrap().to_string();
    assert_eq!(submission["status"], "SUBMITTED");
    assert_eq!(submission["score"], Value::Null);

    // Free-text exam answer waits for a teacher
    let resp = app
        .post(&learner.token, "/api/exams/submit", json!({ "exam_id": exam_id, "text_answer": "went, mice" }))
        .await;
    assert_eq!(resp.status(), 201);
    let result: Value = resp.json().await.unwrap();
    let result_id = result["id"].as_str().unwrap().to_string();
    assert_eq!(result["status"], "SUBMITTED");

    let queue: Vec<Value> = app.get(&teacher.token, "/api/teacher/grading").await.json().await.unwrap();
    assert_eq!(queue.len(), 2);
    assert!(queue.iter().any(|e| e["kind"] == "assignment" && e["user_name"] == "Lia"));
    assert!(queue.iter().any(|e| e["kind"] == "exam" && e["content"] == "went, mice"));

    let resp = app
        .post(
            &teacher.token,
            "/api/teacher/grade",
            json!({ "submissionId": submission_id, "score": 150, "type": "ASSIGNMENT" }),
        )
        .await;
    assert_eq!(resp.status(), 400);

    let resp = app
        .post(
            &teacher.token,
            "/api/teacher/grade",
            json!({ "submission_id": submission_id, "score": 88, "type": "assignment" }),
        )
        .await;
    assert_eq!(resp.status(), 200);
    let graded: Value = resp.json().await.unwrap();
    assert_eq!(graded["status"], "GRADED");

    let resp = app
        .post(
            &teacher.token,
            "/api/teacher/grade",
            json!({ "submission_id": result_id, "score": 95, "type": "EXAM" }),
        )
        .await;
    assert_eq!(resp.status(), 200);

    let resp = app
        .post(
            &teacher.token,
            "/api/teacher/grade",
            json!({ "submission_id": "sub_missing", "score": 10, "type": "assignment" }),
        )
        .await;
    assert_eq!(resp.status(), 404);

    let queue: Vec<Value> = app.get(&teacher.token, "/api/teacher/grading").await.json().await.unwrap();
    assert!(queue.is_empty());

    let view: Value = app.get(&learner.token, &format!("/api/lessons/{}", lesson_id)).await.json().await.unwrap();
    assert_eq!(view["assignments"][0]["submissions"][0]["score"], 88.0);
    assert_eq!(view["exams"][0]["result"]["score"], 95.0);
}

#[tokio::test]
async fn test_materials_and_announcements() {
    let app = spawn_app().await;
    let teacher = app.account("Tamar", "tamar@example.com", Role::Teacher).await;
    let learner = app.account("Lia", "lia@example.com", Role::User).await;
    let lesson_id = classroom(&app, &teacher, &learner).await;

    let resp = app
        .post(
            &teacher.token,
            "/api/teacher/materials",
            json!({ "lesson_id": lesson_id, "title": "Slides", "file_url": "https://files.example.com/slides.pdf" }),
        )
        .await;
    assert_eq!(resp.status(), 201);
    let material: Value = resp.json().await.unwrap();
    let material_id = material["id"].as_str().unwrap().to_string();

    let resp = app
        .post(
            &teacher.token,
            "/api/teacher/materials",
            json!({ "lesson_id": lesson_id, "title": "Notes", "file_url": "/local/notes.pdf" }),
        )
        .await;
    assert_eq!(resp.status(), 400);

    let resp = app
        .post(&learner.token, &format!("/api/materials/{}/read", material_id), json!({}))
        .await;
    assert_eq!(resp.status(), 200);
    let view: Value = app.get(&learner.token, &format!("/api/lessons/{}", lesson_id)).await.json().await.unwrap();
    let materials = view["materials"].as_array().unwrap();
    assert_eq!(materials.len(), 1);
    assert_eq!(materials[0]["read"], true);
    assert!(materials[0]["preview_url"]
        .as_str()
        .unwrap()
        .starts_with("https://docs.google.com/viewer?url="));

    let course: Value = app.get(&teacher.token, "/api/teacher/courses").await.json::<Vec<Value>>().await.unwrap()[0].clone();
    let course_id = course["id"].as_str().unwrap().to_string();
    let resp = app
        .post(
            &teacher.token,
            &format!("/api/teacher/courses/{}/announcements", course_id),
            json!({ "title": "Class moved", "body": "Thursday's class starts at 19:00" }),
        )
        .await;
    assert_eq!(resp.status(), 201);
    let announcement: Value = resp.json().await.unwrap();
    let announcement_id = announcement["id"].as_str().unwrap().to_string();

    let path = format!("/api/courses/{}/announcements", course_id);
    let list: Vec<Value> = app.get(&learner.token, &path).await.json().await.unwrap();
    assert_eq!(list[0]["viewed"], false);

    let resp = app
        .post(&learner.token, &format!("/api/announcements/{}/view", announcement_id), json!({}))
        .await;
    assert_eq!(resp.status(), 200);
    let list: Vec<Value> = app.get(&learner.token, &path).await.json().await.unwrap();
    assert_eq!(list[0]["viewed"], true);
    assert!(list[0]["viewed_at_ms"].as_i64().is_some());

    let resp = app.post(&learner.token, "/api/announcements/ann_missing/view", json!({})).await;
    assert_eq!(resp.status(), 404);
}
