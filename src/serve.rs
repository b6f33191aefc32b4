use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post},
    Json, Router,
};
use chrono::Utc;
use log::info;
use serde::Deserialize;
use serde_json::json;
use sqlx::SqlitePool;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use crate::accounts::{self, LoginRequest, RegisterRequest};
use crate::auth::AuthUser;
use crate::catalog;
use crate::classroom;
use crate::config::{ServerConfig, Settings};
use crate::credentials::{get_admin_password, load_credentials};
use crate::db::prepare_database;
use crate::enrollment::{self, AccessSchedule};
use crate::error::{ApiError, ApiJson, ApiResult, DynError};
use crate::exams;
use crate::grading;
use crate::progress;
use crate::serve_admin;

/// Shared state for every handler
pub struct AppState {
    pub pool: SqlitePool,
    pub settings: Settings,
}

type SharedState = State<Arc<AppState>>;

/// Full API router: learner routes plus the teacher and admin routes
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_handler))
        .route("/api/auth/register", post(register_handler))
        .route("/api/auth/login", post(login_handler))
        .route("/api/auth/logout", post(logout_handler))
        .route("/api/profile", get(profile_handler).patch(update_profile_handler))
        .route("/api/courses", get(courses_handler).post(create_course_handler))
        .route("/api/courses/{id}", get(course_handler))
        .route("/api/courses/{id}/progress", get(course_progress_handler))
        .route("/api/courses/{id}/announcements", get(announcements_handler))
        .route("/api/courses/{id}/live", get(live_handler))
        .route("/api/lessons/complete", post(complete_lesson_handler))
        .route("/api/lessons/{id}", get(lesson_handler))
        .route("/api/lessons/{id}/toggle", post(toggle_lesson_handler))
        .route("/api/enroll", post(enroll_handler))
        .route("/api/enroll/{course_id}", delete(unenroll_handler))
        .route("/api/dashboard", get(dashboard_handler))
        .route("/api/teachers", get(teachers_handler))
        .route("/api/materials/{id}/read", post(material_read_handler))
        .route("/api/announcements/{id}/view", post(announcement_view_handler))
        .route("/api/exams/submit", post(submit_exam_handler))
        .route("/api/exams/{id}", get(exam_handler))
        .route("/api/assignments/submit", post(submit_assignment_handler))
        .merge(serve_admin::routes())
        .layer(cors)
        .with_state(state)
}

/// Create the configured admin account if the credentials file has its password
async fn bootstrap_admin(pool: &SqlitePool, config: &ServerConfig) -> Result<(), DynError> {
    let Some(admin) = &config.admin else {
        return Ok(());
    };
    let credentials = load_credentials()?;
    let password = get_admin_password(&credentials, &admin.credential_profile)?;
    accounts::ensure_admin(pool, admin, &password, config.password_cost).await?;
    Ok(())
}

/// Run the API server until it fails
pub async fn serve(config: &ServerConfig) -> Result<(), DynError> {
    let pool = prepare_database(&config.database_path).await?;
    bootstrap_admin(&pool, config).await?;

    let state = Arc::new(AppState {
        pool,
        settings: config.settings(),
    });
    let app = build_router(state);

    let port = config.api_port;
    let listener = tokio::net::TcpListener::bind(format!("[::]:{}", port))
        .await
        .map_err(|e| format!("Failed to bind to port {}: {}", port, e))?;
    info!("Listening on: http://[::]:{} (IPv4 + IPv6)", port);
    axum::serve(listener, app)
        .await
        .map_err(|e| format!("Server error: {}", e))?;
    Ok(())
}

async fn health_handler() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

async fn register_handler(
    State(state): SharedState,
    ApiJson(req): ApiJson<RegisterRequest>,
) -> ApiResult<impl IntoResponse> {
    let user = accounts::register(&state.pool, &req, state.settings.password_cost).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

async fn login_handler(
    State(state): SharedState,
    ApiJson(req): ApiJson<LoginRequest>,
) -> ApiResult<impl IntoResponse> {
    let response = accounts::login(&state.pool, &req, state.settings.session_ttl_hours).await?;
    Ok(Json(response))
}

async fn logout_handler(State(state): SharedState, auth: AuthUser) -> ApiResult<impl IntoResponse> {
    accounts::logout(&state.pool, &auth.token).await?;
    Ok(Json(json!({ "success": true })))
}

async fn profile_handler(auth: AuthUser) -> impl IntoResponse {
    Json(auth.user)
}

#[derive(Deserialize)]
struct ProfileUpdate {
    name: String,
}

async fn update_profile_handler(
    State(state): SharedState,
    auth: AuthUser,
    ApiJson(req): ApiJson<ProfileUpdate>,
) -> ApiResult<impl IntoResponse> {
    let user = accounts::update_profile(&state.pool, auth.id(), &req.name).await?;
    Ok(Json(user))
}

async fn courses_handler(State(state): SharedState) -> ApiResult<impl IntoResponse> {
    Ok(Json(catalog::list_courses(&state.pool).await?))
}

async fn create_course_handler(
    State(state): SharedState,
    auth: AuthUser,
    ApiJson(req): ApiJson<catalog::NewCourse>,
) -> ApiResult<impl IntoResponse> {
    auth.require_teacher()?;
    let course = catalog::create_course_as_teacher(&state.pool, &auth.user, &req).await?;
    Ok((StatusCode::CREATED, Json(course)))
}

async fn course_handler(State(state): SharedState, Path(id): Path<String>) -> ApiResult<impl IntoResponse> {
    Ok(Json(catalog::course_detail(&state.pool, &id).await?))
}

async fn course_progress_handler(
    State(state): SharedState,
    auth: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    Ok(Json(progress::course_progress(&state.pool, auth.id(), &id).await?))
}

async fn announcements_handler(
    State(state): SharedState,
    auth: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    Ok(Json(
        classroom::announcements_for_course(&state.pool, &id, auth.id()).await?,
    ))
}

async fn live_handler(
    State(state): SharedState,
    auth: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let live = classroom::live_sessions(
        &state.pool,
        auth.id(),
        &id,
        Utc::now(),
        state.settings.live_session_minutes,
    )
    .await?
    .ok_or_else(|| ApiError::not_found("Enrollment"))?;
    Ok(Json(live))
}

async fn lesson_handler(
    State(state): SharedState,
    auth: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    Ok(Json(
        catalog::lesson_view(&state.pool, &auth.user, &id, state.settings.live_session_minutes).await?,
    ))
}

#[derive(Deserialize)]
struct CompleteLesson {
    #[serde(alias = "lessonId")]
    lesson_id: String,
    #[serde(alias = "isCompleted", default = "default_true")]
    completed: bool,
}

fn default_true() -> bool {
    true
}

async fn complete_lesson_handler(
    State(state): SharedState,
    auth: AuthUser,
    ApiJson(req): ApiJson<CompleteLesson>,
) -> ApiResult<impl IntoResponse> {
    let completed =
        progress::set_lesson_completion(&state.pool, auth.id(), &req.lesson_id, req.completed).await?;
    Ok(Json(json!({ "success": true, "completed": completed })))
}

async fn toggle_lesson_handler(
    State(state): SharedState,
    auth: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let completed = progress::toggle_lesson_progress(&state.pool, auth.id(), &id).await?;
    Ok(Json(json!({ "success": true, "completed": completed })))
}

#[derive(Deserialize)]
struct EnrollRequest {
    #[serde(alias = "courseId")]
    course_id: String,
    schedule: Option<AccessSchedule>,
}

async fn enroll_handler(
    State(state): SharedState,
    auth: AuthUser,
    ApiJson(req): ApiJson<EnrollRequest>,
) -> ApiResult<impl IntoResponse> {
    let outcome =
        enrollment::enroll(&state.pool, auth.id(), &req.course_id, req.schedule.as_ref()).await?;
    let status = if outcome.already_enrolled {
        StatusCode::OK
    } else {
        StatusCode::CREATED
    };
    Ok((status, Json(outcome)))
}

async fn unenroll_handler(
    State(state): SharedState,
    auth: AuthUser,
    Path(course_id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    enrollment::unenroll(&state.pool, auth.id(), &course_id).await?;
    Ok(Json(json!({ "success": true })))
}

async fn dashboard_handler(State(state): SharedState, auth: AuthUser) -> ApiResult<impl IntoResponse> {
    Ok(Json(
        progress::dashboard(&state.pool, auth.id(), Utc::now(), state.settings.weekly_goal).await?,
    ))
}

async fn teachers_handler(State(state): SharedState) -> ApiResult<impl IntoResponse> {
    Ok(Json(catalog::teacher_options(&state.pool).await?))
}

async fn material_read_handler(
    State(state): SharedState,
    auth: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    classroom::mark_material_read(&state.pool, auth.id(), &id).await?;
    Ok(Json(json!({ "success": true })))
}

async fn announcement_view_handler(
    State(state): SharedState,
    auth: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    classroom::mark_announcement_viewed(&state.pool, auth.id(), &id).await?;
    Ok(Json(json!({ "success": true })))
}

async fn exam_handler(
    State(state): SharedState,
    auth: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    Ok(Json(exams::exam_for_learner(&state.pool, &id, auth.id()).await?))
}

#[derive(Deserialize)]
struct ExamSubmission {
    #[serde(alias = "examId")]
    exam_id: String,
    #[serde(alias = "textAnswer")]
    text_answer: Option<String>,
    #[serde(alias = "fileUrl")]
    file_url: Option<String>,
    #[serde(alias = "selectedOptionIds", default)]
    selected_option_ids: Vec<String>,
}

async fn submit_exam_handler(
    State(state): SharedState,
    auth: AuthUser,
    ApiJson(req): ApiJson<ExamSubmission>,
) -> ApiResult<impl IntoResponse> {
    let result = grading::submit_exam(
        &state.pool,
        auth.id(),
        &req.exam_id,
        req.text_answer.as_deref(),
        req.file_url.as_deref(),
        &req.selected_option_ids,
    )
    .await?;
    Ok((StatusCode::CREATED, Json(result)))
}

#[derive(Deserialize)]
struct AssignmentSubmission {
    #[serde(alias = "assignmentId")]
    assignment_id: String,
    content: Option<String>,
    #[serde(alias = "fileUrl")]
    file_url: Option<String>,
}

async fn submit_assignment_handler(
    State(state): SharedState,
    auth: AuthUser,
    ApiJson(req): ApiJson<AssignmentSubmission>,
) -> ApiResult<impl IntoResponse> {
    let submission = grading::submit_assignment(
        &state.pool,
        auth.id(),
        &req.assignment_id,
        req.content.as_deref(),
        req.file_url.as_deref(),
    )
    .await?;
    Ok((StatusCode::CREATED, Json(submission)))
}
