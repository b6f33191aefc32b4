//! Routes for teachers (`/api/teacher/*`) and admins (`/api/admin/*`).

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post, put},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

use crate::accounts;
use crate::admin;
use crate::auth::AuthUser;
use crate::catalog::{self, NewCourse, NewLesson, NewTeacher};
use crate::classroom;
use crate::enrollment::{self, AccessSchedule};
use crate::error::{ApiJson, ApiResult};
use crate::exams::{self, NewOption};
use crate::grading::{self, WorkKind};
use crate::models::{Role, TeacherRow};
use crate::queries::teachers;
use crate::serve::AppState;

type SharedState = State<Arc<AppState>>;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/lessons", post(create_lesson_handler))
        .route("/api/teacher/lessons", post(create_lesson_handler))
        .route("/api/teacher/grade", post(grade_handler))
        .route("/api/teacher/grading", get(grading_queue_handler))
        .route("/api/teacher/courses", get(my_courses_handler))
        .route("/api/teacher/courses/{id}", get(teacher_course_handler))
        .route(
            "/api/teacher/courses/{id}/announcements",
            post(create_announcement_handler),
        )
        .route("/api/teacher/exams", post(create_exam_handler))
        .route("/api/teacher/exams/{id}", get(teacher_exam_handler))
        .route("/api/teacher/exams/{id}/questions", post(add_question_handler))
        .route("/api/teacher/assignments", post(create_assignment_handler))
        .route("/api/teacher/materials", post(create_material_handler))
        .route("/api/teacher/enrollments/{id}/access", put(student_access_handler))
        .route(
            "/api/admin/teacher",
            get(admin_teachers_handler).post(admin_create_teacher_handler),
        )
        .route(
            "/api/admin/teacher/courses",
            get(admin_courses_handler).post(admin_create_course_handler),
        )
        .route("/api/admin/courses/{id}", delete(admin_delete_course_handler))
        .route("/api/admin/students", get(admin_students_handler))
        .route("/api/admin/stats", get(admin_stats_handler))
        .route("/api/admin/users/{id}/role", put(admin_set_role_handler))
}

async fn create_lesson_handler(
    State(state): SharedState,
    auth: AuthUser,
    ApiJson(req): ApiJson<NewLesson>,
) -> ApiResult<impl IntoResponse> {
    auth.require_teacher()?;
    let lesson = catalog::create_lesson(&state.pool, &req).await?;
    Ok((StatusCode::CREATED, Json(lesson)))
}

#[derive(Deserialize)]
struct GradeRequest {
    #[serde(alias = "submissionId")]
    submission_id: String,
    score: f64,
    #[serde(rename = "type")]
    kind: WorkKind,
}

async fn grade_handler(
    State(state): SharedState,
    auth: AuthUser,
    ApiJson(req): ApiJson<GradeRequest>,
) -> ApiResult<impl IntoResponse> {
    auth.require_teacher()?;
    let outcome = grading::grade(&state.pool, req.kind, &req.submission_id, req.score).await?;
    Ok(Json(outcome))
}

async fn grading_queue_handler(State(state): SharedState, auth: AuthUser) -> ApiResult<impl IntoResponse> {
    auth.require_teacher()?;
    Ok(Json(grading::grading_queue(&state.pool).await?))
}

/// Courses attached to the caller's own teacher profile
async fn my_courses_handler(State(state): SharedState, auth: AuthUser) -> ApiResult<impl IntoResponse> {
    auth.require_teacher()?;
    let profile: Option<TeacherRow> = sqlx::query_as(&teachers::select_by_user_id(auth.id()))
        .fetch_optional(&state.pool)
        .await?;
    let courses = match profile {
        Some(profile) => catalog::courses_for_teacher(&state.pool, &profile.id).await?,
        None => Vec::new(),
    };
    Ok(Json(courses))
}

async fn teacher_course_handler(
    State(state): SharedState,
    auth: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    auth.require_teacher()?;
    Ok(Json(catalog::teacher_course_view(&state.pool, &id).await?))
}

#[derive(Deserialize)]
struct NewAnnouncement {
    title: String,
    body: String,
}

async fn create_announcement_handler(
    State(state): SharedState,
    auth: AuthUser,
    Path(id): Path<String>,
    ApiJson(req): ApiJson<NewAnnouncement>,
) -> ApiResult<impl IntoResponse> {
    auth.require_teacher()?;
    let announcement = classroom::create_announcement(&state.pool, &id, &req.title, &req.body).await?;
    Ok((StatusCode::CREATED, Json(announcement)))
}

#[derive(Deserialize)]
struct NewExam {
    #[serde(alias = "lessonId")]
    lesson_id: String,
    title: String,
}

async fn create_exam_handler(
    State(state): SharedState,
    auth: AuthUser,
    ApiJson(req): ApiJson<NewExam>,
) -> ApiResult<impl IntoResponse> {
    auth.require_teacher()?;
    let exam = exams::create_exam(&state.pool, &req.lesson_id, &req.title).await?;
    Ok((StatusCode::CREATED, Json(exam)))
}

async fn teacher_exam_handler(
    State(state): SharedState,
    auth: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    auth.require_teacher()?;
    Ok(Json(exams::exam_for_teacher(&state.pool, &id).await?))
}

#[derive(Deserialize)]
struct NewQuestion {
    text: String,
    options: Vec<NewOption>,
}

async fn add_question_handler(
    State(state): SharedState,
    auth: AuthUser,
    Path(id): Path<String>,
    ApiJson(req): ApiJson<NewQuestion>,
) -> ApiResult<impl IntoResponse> {
    auth.require_teacher()?;
    let question = exams::add_question(&state.pool, &id, &req.text, &req.options).await?;
    Ok((StatusCode::CREATED, Json(question)))
}

#[derive(Deserialize)]
struct NewAssignment {
    #[serde(alias = "lessonId")]
    lesson_id: String,
    title: String,
    description: Option<String>,
    #[serde(alias = "requiresFile")]
    requires_file: Option<bool>,
}

async fn create_assignment_handler(
    State(state): SharedState,
    auth: AuthUser,
    ApiJson(req): ApiJson<NewAssignment>,
) -> ApiResult<impl IntoResponse> {
    auth.require_teacher()?;
    let assignment = grading::create_assignment(
        &state.pool,
        &req.lesson_id,
        &req.title,
        req.description.as_deref(),
        req.requires_file.unwrap_or(true),
    )
    .await?;
    Ok((StatusCode::CREATED, Json(assignment)))
}

#[derive(Deserialize)]
struct NewMaterial {
    #[serde(alias = "lessonId")]
    lesson_id: String,
    title: String,
    #[serde(alias = "fileUrl")]
    file_url: String,
}

async fn create_material_handler(
    State(state): SharedState,
    auth: AuthUser,
    ApiJson(req): ApiJson<NewMaterial>,
) -> ApiResult<impl IntoResponse> {
    auth.require_teacher()?;
    let material =
        classroom::create_material(&state.pool, &req.lesson_id, &req.title, &req.file_url).await?;
    Ok((StatusCode::CREATED, Json(material)))
}

async fn student_access_handler(
    State(state): SharedState,
    auth: AuthUser,
    Path(id): Path<String>,
    ApiJson(req): ApiJson<AccessSchedule>,
) -> ApiResult<impl IntoResponse> {
    auth.require_teacher()?;
    Ok(Json(
        enrollment::update_student_access(&state.pool, &id, &req).await?,
    ))
}

async fn admin_teachers_handler(State(state): SharedState, auth: AuthUser) -> ApiResult<impl IntoResponse> {
    auth.require_admin()?;
    Ok(Json(catalog::list_teachers(&state.pool).await?))
}

async fn admin_create_teacher_handler(
    State(state): SharedState,
    auth: AuthUser,
    ApiJson(req): ApiJson<NewTeacher>,
) -> ApiResult<impl IntoResponse> {
    auth.require_admin()?;
    let teacher = catalog::create_teacher(&state.pool, &req).await?;
    Ok((StatusCode::CREATED, Json(teacher)))
}

async fn admin_courses_handler(State(state): SharedState, auth: AuthUser) -> ApiResult<impl IntoResponse> {
    auth.require_admin()?;
    Ok(Json(catalog::list_courses(&state.pool).await?))
}

async fn admin_create_course_handler(
    State(state): SharedState,
    auth: AuthUser,
    ApiJson(req): ApiJson<NewCourse>,
) -> ApiResult<impl IntoResponse> {
    auth.require_admin()?;
    let course = catalog::create_course_as_admin(&state.pool, &req).await?;
    Ok((StatusCode::CREATED, Json(course)))
}

async fn admin_delete_course_handler(
    State(state): SharedState,
    auth: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    auth.require_admin()?;
    catalog::delete_course(&state.pool, &id).await?;
    Ok(Json(json!({ "success": true })))
}

async fn admin_students_handler(State(state): SharedState, auth: AuthUser) -> ApiResult<impl IntoResponse> {
    auth.require_admin()?;
    Ok(Json(accounts::list_students(&state.pool).await?))
}

async fn admin_stats_handler(State(state): SharedState, auth: AuthUser) -> ApiResult<impl IntoResponse> {
    auth.require_admin()?;
    Ok(Json(admin::stats(&state.pool).await?))
}

#[derive(Deserialize)]
struct RoleUpdate {
    role: Role,
}

async fn admin_set_role_handler(
    State(state): SharedState,
    auth: AuthUser,
    Path(id): Path<String>,
    ApiJson(req): ApiJson<RoleUpdate>,
) -> ApiResult<impl IntoResponse> {
    auth.require_admin()?;
    Ok(Json(accounts::set_role(&state.pool, &id, req.role).await?))
}
