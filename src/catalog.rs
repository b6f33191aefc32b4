use chrono::Utc;
use log::info;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use crate::classroom::{embed_url, live_sessions, materials_for_lesson, LiveSessions, MaterialView};
use crate::constants::{generate_id, now_ms};
use crate::enrollment::{find_course, is_enrolled, students_for_course};
use crate::error::{ApiError, ApiResult};
use crate::exams::exams_for_lesson;
use crate::models::{
    Assignment, CourseSummary, EnrolledStudent, Exam, ExamResult, Lesson, Role, Submission,
    Teacher, TeacherOption, TeacherRow, User,
};
use crate::progress::{find_lesson, is_lesson_completed};
use crate::queries::{assignments, courses, exams, lessons, teachers, users};

#[derive(Debug, Clone, Deserialize)]
pub struct NewCourse {
    pub title: String,
    pub description: Option<String>,
    pub price: Option<f64>,
    #[serde(alias = "thumbnail")]
    pub image: Option<String>,
    pub category: Option<String>,
    pub level: Option<String>,
    #[serde(alias = "teacherId")]
    pub teacher_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewLesson {
    #[serde(alias = "courseId")]
    pub course_id: String,
    pub title: String,
    #[serde(alias = "videoUrl")]
    pub video_url: Option<String>,
    pub content: Option<String>,
    #[serde(alias = "order")]
    pub position: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewTeacher {
    pub name: String,
    #[serde(alias = "role")]
    pub title: Option<String>,
    pub image: Option<String>,
    pub bio: Option<String>,
    #[serde(default)]
    pub expertise: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CourseDetail {
    #[serde(flatten)]
    pub summary: CourseSummary,
    pub teacher: Option<Teacher>,
    pub lessons: Vec<Lesson>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TeacherCourseView {
    #[serde(flatten)]
    pub detail: CourseDetail,
    pub students: Vec<EnrolledStudent>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LessonExam {
    #[serde(flatten)]
    pub exam: Exam,
    pub result: Option<ExamResult>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LessonAssignment {
    #[serde(flatten)]
    pub assignment: Assignment,
    pub submissions: Vec<Submission>,
}

/// Everything the classroom page shows for one lesson
#[derive(Debug, Clone, Serialize)]
pub struct LessonView {
    pub lesson: Lesson,
    pub course_title: String,
    pub embed_url: Option<String>,
    pub completed: bool,
    pub previous_lesson_id: Option<String>,
    pub next_lesson_id: Option<String>,
    pub materials: Vec<MaterialView>,
    pub exams: Vec<LessonExam>,
    pub assignments: Vec<LessonAssignment>,
    pub live: Option<LiveSessions>,
}

fn trimmed(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

pub async fn list_courses(pool: &SqlitePool) -> ApiResult<Vec<CourseSummary>> {
    Ok(sqlx::query_as(&courses::select_summaries())
        .fetch_all(pool)
        .await?)
}

pub async fn courses_for_teacher(pool: &SqlitePool, teacher_id: &str) -> ApiResult<Vec<CourseSummary>> {
    Ok(sqlx::query_as(&courses::select_summaries_by_teacher(teacher_id))
        .fetch_all(pool)
        .await?)
}

pub async fn lessons_for_course(pool: &SqlitePool, course_id: &str) -> ApiResult<Vec<Lesson>> {
    Ok(sqlx::query_as(&lessons::select_by_course(course_id))
        .fetch_all(pool)
        .await?)
}

pub async fn find_teacher(pool: &SqlitePool, teacher_id: &str) -> ApiResult<Teacher> {
    let row: TeacherRow = sqlx::query_as(&teachers::select_by_id(teacher_id))
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| ApiError::not_found("Teacher"))?;
    Ok(row.into())
}

pub async fn course_detail(pool: &SqlitePool, course_id: &str) -> ApiResult<CourseDetail> {
    let course = find_course(pool, course_id).await?;
    let teacher = match course.teacher_id.as_deref() {
        Some(id) => find_teacher(pool, id).await.ok(),
        None => None,
    };
    let lessons = lessons_for_course(pool, course_id).await?;
    let teacher_name = teacher.as_ref().map(|t| t.name.clone());
    Ok(CourseDetail {
        summary: CourseSummary {
            course,
            teacher_name,
            lesson_count: lessons.len() as i64,
        },
        teacher,
        lessons,
    })
}

pub async fn teacher_course_view(pool: &SqlitePool, course_id: &str) -> ApiResult<TeacherCourseView> {
    let detail = course_detail(pool, course_id).await?;
    let students = students_for_course(pool, course_id).await?;
    Ok(TeacherCourseView { detail, students })
}

async fn insert_teacher(pool: &SqlitePool, user_id: Option<&str>, req: &NewTeacher) -> ApiResult<Teacher> {
    let name = req.name.trim();
    if name.is_empty() {
        return Err(ApiError::bad_request("Name is required"));
    }
    let expertise: Vec<&str> = req
        .expertise
        .iter()
        .map(|e| e.trim())
        .filter(|e| !e.is_empty())
        .collect();
    let expertise_json =
        serde_json::to_string(&expertise).map_err(|e| ApiError::Internal(e.to_string()))?;

    let id = generate_id("tch");
    sqlx::query(&teachers::insert(
        &id,
        user_id,
        name,
        trimmed(req.title.as_deref()),
        trimmed(req.bio.as_deref()),
        trimmed(req.image.as_deref()),
        &expertise_json,
        now_ms(),
    ))
    .execute(pool)
    .await?;
    find_teacher(pool, &id).await
}

/// Admin-created instructor profile, not tied to an account
pub async fn create_teacher(pool: &SqlitePool, req: &NewTeacher) -> ApiResult<Teacher> {
    let teacher = insert_teacher(pool, None, req).await?;
    info!("Created teacher profile {} ({})", teacher.id, teacher.name);
    Ok(teacher)
}

pub async fn list_teachers(pool: &SqlitePool) -> ApiResult<Vec<Teacher>> {
    let rows: Vec<TeacherRow> = sqlx::query_as(&teachers::select_all())
        .fetch_all(pool)
        .await?;
    Ok(rows.into_iter().map(Teacher::from).collect())
}

pub async fn teacher_options(pool: &SqlitePool) -> ApiResult<Vec<TeacherOption>> {
    Ok(sqlx::query_as(&teachers::select_options())
        .fetch_all(pool)
        .await?)
}

/// Find the caller's teacher profile, creating it on first use
pub async fn ensure_teacher_profile(pool: &SqlitePool, user: &User) -> ApiResult<Teacher> {
    let existing: Option<TeacherRow> = sqlx::query_as(&teachers::select_by_user_id(&user.id))
        .fetch_optional(pool)
        .await?;
    if let Some(row) = existing {
        return Ok(row.into());
    }

    let teacher = insert_teacher(
        pool,
        Some(&user.id),
        &NewTeacher {
            name: user.name.clone(),
            title: None,
            image: user.image.clone(),
            bio: Some("New Teacher Profile".to_string()),
            expertise: Vec::new(),
        },
    )
    .await?;
    if user.role() == Role::User {
        sqlx::query(&users::update_role(&user.id, Role::Teacher.as_str()))
            .execute(pool)
            .await?;
    }
    info!("Created teacher profile {} for user {}", teacher.id, user.id);
    Ok(teacher)
}

async fn insert_course(pool: &SqlitePool, req: &NewCourse, teacher_id: Option<&str>) -> ApiResult<CourseSummary> {
    let title = req.title.trim();
    if title.is_empty() {
        return Err(ApiError::bad_request("Title is required"));
    }
    if let Some(price) = req.price {
        if !price.is_finite() || price < 0.0 {
            return Err(ApiError::bad_request("Price must not be negative"));
        }
    }

    let id = generate_id("crs");
    sqlx::query(&courses::insert(
        &id,
        title,
        trimmed(req.description.as_deref()),
        req.price,
        trimmed(req.image.as_deref()),
        trimmed(req.category.as_deref()),
        trimmed(req.level.as_deref()),
        teacher_id,
        now_ms(),
    ))
    .execute(pool)
    .await?;
    info!("Created course {} ({})", id, title);
    Ok(course_detail(pool, &id).await?.summary)
}

/// Course created by a teacher is attached to their own profile
pub async fn create_course_as_teacher(pool: &SqlitePool, user: &User, req: &NewCourse) -> ApiResult<CourseSummary> {
    let teacher = ensure_teacher_profile(pool, user).await?;
    insert_course(pool, req, Some(&teacher.id)).await
}

/// Admin picks the teacher explicitly (or none)
pub async fn create_course_as_admin(pool: &SqlitePool, req: &NewCourse) -> ApiResult<CourseSummary> {
    let teacher_id = trimmed(req.teacher_id.as_deref());
    if let Some(id) = teacher_id {
        find_teacher(pool, id).await?;
    }
    insert_course(pool, req, teacher_id).await
}

pub async fn delete_course(pool: &SqlitePool, course_id: &str) -> ApiResult<()> {
    let result = sqlx::query(&courses::delete_by_id(course_id))
        .execute(pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(ApiError::not_found("Course"));
    }
    info!("Deleted course {}", course_id);
    Ok(())
}

/// Add a lesson; without an explicit position it goes to the end
pub async fn create_lesson(pool: &SqlitePool, req: &NewLesson) -> ApiResult<Lesson> {
    let title = req.title.trim();
    if title.is_empty() {
        return Err(ApiError::bad_request("Title is required"));
    }
    find_course(pool, &req.course_id).await?;
    let position = match req.position {
        Some(p) if p < 0 => return Err(ApiError::bad_request("Position must not be negative")),
        Some(p) => p,
        None => {
            let max: Option<i64> = sqlx::query_scalar(&lessons::select_max_position(&req.course_id))
                .fetch_one(pool)
                .await?;
            max.map_or(0, |m| m + 1)
        }
    };

    let id = generate_id("les");
    sqlx::query(&lessons::insert(
        &id,
        &req.course_id,
        title,
        trimmed(req.video_url.as_deref()),
        trimmed(req.content.as_deref()),
        position,
        now_ms(),
    ))
    .execute(pool)
    .await?;
    find_lesson(pool, &id).await
}

/// Lesson page for a learner. Teachers and admins may open any lesson.
pub async fn lesson_view(
    pool: &SqlitePool,
    user: &User,
    lesson_id: &str,
    live_session_minutes: u32,
) -> ApiResult<LessonView> {
    let lesson = find_lesson(pool, lesson_id).await?;
    let course = find_course(pool, &lesson.course_id).await?;
    if user.role() == Role::User && !is_enrolled(pool, &user.id, &course.id).await? {
        return Err(ApiError::Forbidden(
            "Enroll in this course to open its lessons".to_string(),
        ));
    }

    let siblings = lessons_for_course(pool, &course.id).await?;
    let index = siblings.iter().position(|l| l.id == lesson.id);
    let previous_lesson_id = index
        .and_then(|i| i.checked_sub(1))
        .and_then(|i| siblings.get(i))
        .map(|l| l.id.clone());
    let next_lesson_id = index
        .and_then(|i| siblings.get(i + 1))
        .map(|l| l.id.clone());

    let mut lesson_exams = Vec::new();
    for exam in exams_for_lesson(pool, &lesson.id).await? {
        let result = sqlx::query_as(&exams::select_result_for_user(&exam.id, &user.id))
            .fetch_optional(pool)
            .await?;
        lesson_exams.push(LessonExam { exam, result });
    }

    let mut lesson_assignments = Vec::new();
    let rows: Vec<Assignment> = sqlx::query_as(&assignments::select_by_lesson(&lesson.id))
        .fetch_all(pool)
        .await?;
    for assignment in rows {
        let submissions = sqlx::query_as(&assignments::select_submissions_for_user(
            &assignment.id,
            &user.id,
        ))
        .fetch_all(pool)
        .await?;
        lesson_assignments.push(LessonAssignment {
            assignment,
            submissions,
        });
    }

    Ok(LessonView {
        embed_url: lesson.video_url.as_deref().and_then(embed_url),
        completed: is_lesson_completed(pool, &user.id, &lesson.id).await?,
        materials: materials_for_lesson(pool, &lesson.id, &user.id).await?,
        live: live_sessions(pool, &user.id, &course.id, Utc::now(), live_session_minutes).await?,
        course_title: course.title,
        previous_lesson_id,
        next_lesson_id,
        exams: lesson_exams,
        assignments: lesson_assignments,
        lesson,
    })
}
