use chrono::{DateTime, Datelike, Duration, NaiveTime, Utc};
use serde::Serialize;
use sqlx::SqlitePool;
use std::collections::HashSet;

use crate::constants::{generate_id, now_ms, RECENT_ACTIVITY_LIMIT};
use crate::enrollment::{enrollments_for_user, find_course, is_enrolled};
use crate::error::{ApiError, ApiResult};
use crate::models::{CompletedLesson, Course, Lesson};
use crate::queries::{lessons, progress};

/// Share of a course's lessons that are completed, rounded half-up to a whole percent.
///
/// Completed ids that do not belong to the course are ignored. A course without
/// lessons is 0%.
pub fn percentage(lesson_ids: &[String], completed: &HashSet<String>) -> u8 {
    let total = lesson_ids.len() as u64;
    if total == 0 {
        return 0;
    }
    let done = lesson_ids.iter().filter(|id| completed.contains(*id)).count() as u64;
    ((200 * done + total) / (2 * total)) as u8
}

/// Sunday 00:00 UTC of the week containing `now`
pub fn start_of_week(now: DateTime<Utc>) -> DateTime<Utc> {
    let days_back = now.weekday().num_days_from_sunday() as i64;
    (now.date_naive() - Duration::days(days_back))
        .and_time(NaiveTime::MIN)
        .and_utc()
}

#[derive(Debug, Clone, Serialize)]
pub struct CourseProgress {
    pub course_id: String,
    pub total_lessons: usize,
    pub completed_lessons: usize,
    pub percentage: u8,
    pub completed_lesson_ids: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardCourse {
    pub course: Course,
    pub percentage: u8,
    pub completed_lessons: usize,
    pub total_lessons: usize,
    /// First lesson not yet completed, or the first lesson once everything is done
    pub next_lesson_id: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Dashboard {
    pub courses: Vec<DashboardCourse>,
    pub lessons_completed: usize,
    pub lessons_this_week: usize,
    pub weekly_goal: u32,
    pub recent_activity: Vec<CompletedLesson>,
}

pub async fn find_lesson(pool: &SqlitePool, lesson_id: &str) -> ApiResult<Lesson> {
    sqlx::query_as(&lessons::select_by_id(lesson_id))
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| ApiError::not_found("Lesson"))
}

pub async fn completed_lesson_ids(pool: &SqlitePool, user_id: &str) -> ApiResult<HashSet<String>> {
    let ids: Vec<String> = sqlx::query_scalar(&progress::select_completed_lesson_ids(user_id))
        .fetch_all(pool)
        .await?;
    Ok(ids.into_iter().collect())
}

pub async fn is_lesson_completed(pool: &SqlitePool, user_id: &str, lesson_id: &str) -> ApiResult<bool> {
    let row: Option<i32> = sqlx::query_scalar(&progress::exists_completed(user_id, lesson_id))
        .fetch_optional(pool)
        .await?;
    Ok(row.is_some())
}

async fn require_enrolled_lesson(pool: &SqlitePool, user_id: &str, lesson_id: &str) -> ApiResult<Lesson> {
    let lesson = find_lesson(pool, lesson_id).await?;
    if !is_enrolled(pool, user_id, &lesson.course_id).await? {
        return Err(ApiError::Forbidden(
            "Enroll in this course to track progress".to_string(),
        ));
    }
    Ok(lesson)
}

async fn write_completion(pool: &SqlitePool, user_id: &str, lesson_id: &str, completed: bool) -> ApiResult<()> {
    let sql = if completed {
        progress::upsert_completed(&generate_id("prg"), user_id, lesson_id, now_ms())
    } else {
        progress::delete(user_id, lesson_id)
    };
    sqlx::query(&sql).execute(pool).await?;
    Ok(())
}

/// Mark a lesson complete (upsert) or not complete (delete)
pub async fn set_lesson_completion(
    pool: &SqlitePool,
    user_id: &str,
    lesson_id: &str,
    completed: bool,
) -> ApiResult<bool> {
    require_enrolled_lesson(pool, user_id, lesson_id).await?;
    write_completion(pool, user_id, lesson_id, completed).await?;
    Ok(completed)
}

/// Flip the completion state and return the new one
pub async fn toggle_lesson_progress(pool: &SqlitePool, user_id: &str, lesson_id: &str) -> ApiResult<bool> {
    require_enrolled_lesson(pool, user_id, lesson_id).await?;
    let completed = !is_lesson_completed(pool, user_id, lesson_id).await?;
    write_completion(pool, user_id, lesson_id, completed).await?;
    Ok(completed)
}

fn summarize(course_id: &str, lesson_ids: &[String], completed: &HashSet<String>) -> CourseProgress {
    let completed_lesson_ids: Vec<String> = lesson_ids
        .iter()
        .filter(|id| completed.contains(*id))
        .cloned()
        .collect();
    CourseProgress {
        course_id: course_id.to_string(),
        total_lessons: lesson_ids.len(),
        completed_lessons: completed_lesson_ids.len(),
        percentage: percentage(lesson_ids, completed),
        completed_lesson_ids,
    }
}

async fn course_lesson_ids(pool: &SqlitePool, course_id: &str) -> ApiResult<Vec<String>> {
    let course_lessons: Vec<Lesson> = sqlx::query_as(&lessons::select_by_course(course_id))
        .fetch_all(pool)
        .await?;
    Ok(course_lessons.into_iter().map(|l| l.id).collect())
}

pub async fn course_progress(pool: &SqlitePool, user_id: &str, course_id: &str) -> ApiResult<CourseProgress> {
    find_course(pool, course_id).await?;
    let lesson_ids = course_lesson_ids(pool, course_id).await?;
    let completed = completed_lesson_ids(pool, user_id).await?;
    Ok(summarize(course_id, &lesson_ids, &completed))
}

/// Learner home: per-course progress, weekly goal and recent completions
pub async fn dashboard(
    pool: &SqlitePool,
    user_id: &str,
    now: DateTime<Utc>,
    weekly_goal: u32,
) -> ApiResult<Dashboard> {
    let history: Vec<CompletedLesson> =
        sqlx::query_as(&progress::select_completed_with_lessons(user_id))
            .fetch_all(pool)
            .await?;
    let completed: HashSet<String> = history.iter().map(|c| c.lesson_id.clone()).collect();

    let mut courses = Vec::new();
    for enrollment in enrollments_for_user(pool, user_id).await? {
        let course = find_course(pool, &enrollment.course_id).await?;
        let lesson_ids = course_lesson_ids(pool, &course.id).await?;
        let summary = summarize(&course.id, &lesson_ids, &completed);
        let next_lesson_id = lesson_ids
            .iter()
            .find(|id| !completed.contains(*id))
            .or_else(|| lesson_ids.first())
            .cloned();
        courses.push(DashboardCourse {
            course,
            percentage: summary.percentage,
            completed_lessons: summary.completed_lessons,
            total_lessons: summary.total_lessons,
            next_lesson_id,
        });
    }

    let week_start_ms = start_of_week(now).timestamp_millis();
    let lessons_this_week = history
        .iter()
        .filter(|c| c.updated_at_ms >= week_start_ms)
        .count();

    Ok(Dashboard {
        courses,
        lessons_completed: history.len(),
        lessons_this_week,
        weekly_goal,
        recent_activity: history.into_iter().take(RECENT_ACTIVITY_LIMIT).collect(),
    })
}
