//! Enrollment is a single row per (user, course); live-session access hangs off it.

use log::info;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use crate::constants::{generate_id, now_ms};
use crate::error::{ApiError, ApiResult};
use crate::models::{Appointment, Course, EnrolledStudent, Enrollment};
use crate::queries::{courses, enrollments};
use crate::schedule::{normalize_slots, ScheduleSlot, WeeklySlot};

/// Meeting link and weekly slots attached to an enrollment
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AccessSchedule {
    #[serde(alias = "meetLink")]
    pub meet_link: Option<String>,
    #[serde(default)]
    pub slots: Vec<ScheduleSlot>,
}

#[derive(Debug, Serialize)]
pub struct EnrollOutcome {
    pub enrollment: Enrollment,
    pub already_enrolled: bool,
    pub appointments: Vec<Appointment>,
}

#[derive(Debug, Serialize)]
pub struct StudentAccess {
    pub enrollment: Enrollment,
    pub appointments: Vec<Appointment>,
}

fn clean_meet_link(link: Option<&str>) -> ApiResult<Option<String>> {
    match link.map(str::trim).filter(|l| !l.is_empty()) {
        None => Ok(None),
        Some(l) => match url::Url::parse(l) {
            Ok(u) if u.scheme() == "http" || u.scheme() == "https" => Ok(Some(l.to_string())),
            _ => Err(ApiError::bad_request(format!("Invalid meeting link '{}'", l))),
        },
    }
}

fn parse_schedule(schedule: &AccessSchedule) -> ApiResult<(Option<String>, Vec<WeeklySlot>)> {
    let link = clean_meet_link(schedule.meet_link.as_deref())?;
    let slots = normalize_slots(&schedule.slots).map_err(ApiError::BadRequest)?;
    Ok((link, slots))
}

pub async fn find_course(pool: &SqlitePool, course_id: &str) -> ApiResult<Course> {
    sqlx::query_as(&courses::select_by_id(course_id))
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| ApiError::not_found("Course"))
}

pub async fn find_enrollment(pool: &SqlitePool, user_id: &str, course_id: &str) -> ApiResult<Option<Enrollment>> {
    Ok(
        sqlx::query_as(&enrollments::select_by_user_and_course(user_id, course_id))
            .fetch_optional(pool)
            .await?,
    )
}

pub async fn is_enrolled(pool: &SqlitePool, user_id: &str, course_id: &str) -> ApiResult<bool> {
    Ok(find_enrollment(pool, user_id, course_id).await?.is_some())
}

pub async fn appointments_for(pool: &SqlitePool, enrollment_id: &str) -> ApiResult<Vec<Appointment>> {
    Ok(sqlx::query_as(&enrollments::select_appointments(enrollment_id))
        .fetch_all(pool)
        .await?)
}

/// Enroll a learner; repeating the call is harmless and reports `already_enrolled`
pub async fn enroll(
    pool: &SqlitePool,
    user_id: &str,
    course_id: &str,
    schedule: Option<&AccessSchedule>,
) -> ApiResult<EnrollOutcome> {
    find_course(pool, course_id).await?;
    let (meet_link, slots) = match schedule {
        Some(s) => parse_schedule(s)?,
        None => (None, Vec::new()),
    };

    let enrollment_id = generate_id("enr");
    let mut tx = pool.begin().await?;
    let inserted = sqlx::query(&enrollments::insert_or_ignore(
        &enrollment_id,
        user_id,
        course_id,
        meet_link.as_deref(),
        now_ms(),
    ))
    .execute(&mut *tx)
    .await?
    .rows_affected()
        == 1;

    if inserted {
        for slot in &slots {
            let (day, time) = slot.to_db();
            sqlx::query(&enrollments::insert_appointment(
                &generate_id("apt"),
                &enrollment_id,
                &day,
                &time,
            ))
            .execute(&mut *tx)
            .await?;
        }
    }
    tx.commit().await?;

    let enrollment = find_enrollment(pool, user_id, course_id)
        .await?
        .ok_or_else(|| ApiError::Internal("enrollment missing after insert".to_string()))?;
    if inserted {
        info!("User {} enrolled in course {}", user_id, course_id);
    }
    let appointments = appointments_for(pool, &enrollment.id).await?;
    Ok(EnrollOutcome {
        enrollment,
        already_enrolled: !inserted,
        appointments,
    })
}

/// Remove the enrollment row; lesson progress is kept
pub async fn unenroll(pool: &SqlitePool, user_id: &str, course_id: &str) -> ApiResult<()> {
    let result = sqlx::query(&enrollments::delete_by_user_and_course(user_id, course_id))
        .execute(pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(ApiError::not_found("Enrollment"));
    }
    info!("User {} unenrolled from course {}", user_id, course_id);
    Ok(())
}

/// Replace the meeting link and every appointment of an enrollment
pub async fn update_student_access(
    pool: &SqlitePool,
    enrollment_id: &str,
    schedule: &AccessSchedule,
) -> ApiResult<StudentAccess> {
    let (meet_link, slots) = parse_schedule(schedule)?;

    let mut tx = pool.begin().await?;
    let updated = sqlx::query(&enrollments::update_meet_link(enrollment_id, meet_link.as_deref()))
        .execute(&mut *tx)
        .await?;
    if updated.rows_affected() == 0 {
        return Err(ApiError::not_found("Enrollment"));
    }
    sqlx::query(&enrollments::delete_appointments(enrollment_id))
        .execute(&mut *tx)
        .await?;
    for slot in &slots {
        let (day, time) = slot.to_db();
        sqlx::query(&enrollments::insert_appointment(
            &generate_id("apt"),
            enrollment_id,
            &day,
            &time,
        ))
        .execute(&mut *tx)
        .await?;
    }
    tx.commit().await?;

    let enrollment: Enrollment = sqlx::query_as(&enrollments::select_by_id(enrollment_id))
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| ApiError::not_found("Enrollment"))?;
    let appointments = appointments_for(pool, enrollment_id).await?;
    Ok(StudentAccess {
        enrollment,
        appointments,
    })
}

pub async fn enrollments_for_user(pool: &SqlitePool, user_id: &str) -> ApiResult<Vec<Enrollment>> {
    Ok(sqlx::query_as(&enrollments::select_by_user(user_id))
        .fetch_all(pool)
        .await?)
}

pub async fn students_for_course(pool: &SqlitePool, course_id: &str) -> ApiResult<Vec<EnrolledStudent>> {
    Ok(sqlx::query_as(&enrollments::select_students_for_course(course_id))
        .fetch_all(pool)
        .await?)
}
