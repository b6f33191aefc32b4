use serde::Serialize;
use sqlx::SqlitePool;

use crate::error::ApiResult;
use crate::grading::SubmissionStatus;
use crate::models::Role;
use crate::queries::{assignments, courses, enrollments, exams, lessons, teachers, users};

/// Platform-wide totals for the admin overview
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct PlatformStats {
    pub courses: i64,
    pub students: i64,
    pub teachers: i64,
    pub lessons: i64,
    pub enrollments: i64,
    pub pending_grading: i64,
}

async fn count(pool: &SqlitePool, sql: &str) -> ApiResult<i64> {
    Ok(sqlx::query_scalar(sql).fetch_one(pool).await?)
}

pub async fn stats(pool: &SqlitePool) -> ApiResult<PlatformStats> {
    let pending = SubmissionStatus::Submitted.as_str();
    Ok(PlatformStats {
        courses: count(pool, &courses::count()).await?,
        students: count(pool, &users::count_by_role(Role::User.as_str())).await?,
        teachers: count(pool, &teachers::count()).await?,
        lessons: count(pool, &lessons::count()).await?,
        enrollments: count(pool, &enrollments::count()).await?,
        pending_grading: count(pool, &assignments::count_by_status(pending)).await?
            + count(pool, &exams::count_results_by_status(pending)).await?,
    })
}
