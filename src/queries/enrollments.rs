use sea_query::{Alias, Expr, Func, OnConflict, Order, Query, SqliteQueryBuilder};

use crate::schema::{Appointments, Enrollments, Users};

const ENROLLMENT_COLUMNS: [Enrollments; 5] = [
    Enrollments::Id,
    Enrollments::UserId,
    Enrollments::CourseId,
    Enrollments::MeetLink,
    Enrollments::EnrolledAtMs,
];

/// INSERT INTO enrollments (id, user_id, course_id, meet_link, enrolled_at_ms) VALUES (...)
/// ON CONFLICT (user_id, course_id) DO NOTHING
pub fn insert_or_ignore(
    id: &str,
    user_id: &str,
    course_id: &str,
    meet_link: Option<&str>,
    enrolled_at_ms: i64,
) -> String {
    Query::insert()
        .into_table(Enrollments::Table)
        .columns(ENROLLMENT_COLUMNS)
        .values_panic([
            id.into(),
            user_id.into(),
            course_id.into(),
            meet_link.map(str::to_string).into(),
            enrolled_at_ms.into(),
        ])
        .on_conflict(
            OnConflict::columns([Enrollments::UserId, Enrollments::CourseId])
                .do_nothing()
                .to_owned(),
        )
        .to_string(SqliteQueryBuilder)
}

/// SELECT ... FROM enrollments WHERE user_id = ? AND course_id = ?
pub fn select_by_user_and_course(user_id: &str, course_id: &str) -> String {
    Query::select()
        .columns(ENROLLMENT_COLUMNS)
        .from(Enrollments::Table)
        .and_where(Expr::col(Enrollments::UserId).eq(user_id))
        .and_where(Expr::col(Enrollments::CourseId).eq(course_id))
        .to_string(SqliteQueryBuilder)
}

/// SELECT ... FROM enrollments WHERE id = ?
pub fn select_by_id(id: &str) -> String {
    Query::select()
        .columns(ENROLLMENT_COLUMNS)
        .from(Enrollments::Table)
        .and_where(Expr::col(Enrollments::Id).eq(id))
        .to_string(SqliteQueryBuilder)
}

/// SELECT ... FROM enrollments WHERE user_id = ? ORDER BY enrolled_at_ms DESC
pub fn select_by_user(user_id: &str) -> String {
    Query::select()
        .columns(ENROLLMENT_COLUMNS)
        .from(Enrollments::Table)
        .and_where(Expr::col(Enrollments::UserId).eq(user_id))
        .order_by(Enrollments::EnrolledAtMs, Order::Desc)
        .to_string(SqliteQueryBuilder)
}

/// SELECT e.id AS enrollment_id, u.id AS user_id, u.name, u.email, e.meet_link, e.enrolled_at_ms
/// FROM enrollments e JOIN users u ON u.id = e.user_id
/// WHERE e.course_id = ? ORDER BY e.enrolled_at_ms
pub fn select_students_for_course(course_id: &str) -> String {
    Query::select()
        .expr_as(
            Expr::col((Enrollments::Table, Enrollments::Id)),
            Alias::new("enrollment_id"),
        )
        .expr_as(Expr::col((Users::Table, Users::Id)), Alias::new("user_id"))
        .column((Users::Table, Users::Name))
        .column((Users::Table, Users::Email))
        .column((Enrollments::Table, Enrollments::MeetLink))
        .column((Enrollments::Table, Enrollments::EnrolledAtMs))
        .from(Enrollments::Table)
        .inner_join(
            Users::Table,
            Expr::col((Users::Table, Users::Id)).equals((Enrollments::Table, Enrollments::UserId)),
        )
        .and_where(Expr::col((Enrollments::Table, Enrollments::CourseId)).eq(course_id))
        .order_by((Enrollments::Table, Enrollments::EnrolledAtMs), Order::Asc)
        .to_string(SqliteQueryBuilder)
}

/// UPDATE enrollments SET meet_link = ? WHERE id = ?
pub fn update_meet_link(id: &str, meet_link: Option<&str>) -> String {
    Query::update()
        .table(Enrollments::Table)
        .value(Enrollments::MeetLink, meet_link.map(str::to_string))
        .and_where(Expr::col(Enrollments::Id).eq(id))
        .to_string(SqliteQueryBuilder)
}

/// DELETE FROM enrollments WHERE user_id = ? AND course_id = ?
pub fn delete_by_user_and_course(user_id: &str, course_id: &str) -> String {
    Query::delete()
        .from_table(Enrollments::Table)
        .and_where(Expr::col(Enrollments::UserId).eq(user_id))
        .and_where(Expr::col(Enrollments::CourseId).eq(course_id))
        .to_string(SqliteQueryBuilder)
}

/// SELECT COUNT(id) FROM enrollments
pub fn count() -> String {
    Query::select()
        .expr(Func::count(Expr::col(Enrollments::Id)))
        .from(Enrollments::Table)
        .to_string(SqliteQueryBuilder)
}

/// INSERT INTO appointments (id, enrollment_id, day_of_week, start_time) VALUES (...)
pub fn insert_appointment(id: &str, enrollment_id: &str, day_of_week: &str, start_time: &str) -> String {
    Query::insert()
        .into_table(Appointments::Table)
        .columns([
            Appointments::Id,
            Appointments::EnrollmentId,
            Appointments::DayOfWeek,
            Appointments::StartTime,
        ])
        .values_panic([
            id.into(),
            enrollment_id.into(),
            day_of_week.into(),
            start_time.into(),
        ])
        .to_string(SqliteQueryBuilder)
}

/// DELETE FROM appointments WHERE enrollment_id = ?
pub fn delete_appointments(enrollment_id: &str) -> String {
    Query::delete()
        .from_table(Appointments::Table)
        .and_where(Expr::col(Appointments::EnrollmentId).eq(enrollment_id))
        .to_string(SqliteQueryBuilder)
}

/// SELECT id, enrollment_id, day_of_week, start_time FROM appointments WHERE enrollment_id = ?
/// Slots are inserted in week order, so rowid order is week order
pub fn select_appointments(enrollment_id: &str) -> String {
    Query::select()
        .columns([
            Appointments::Id,
            Appointments::EnrollmentId,
            Appointments::DayOfWeek,
            Appointments::StartTime,
        ])
        .from(Appointments::Table)
        .and_where(Expr::col(Appointments::EnrollmentId).eq(enrollment_id))
        .order_by_expr(Expr::cust("rowid"), Order::Asc)
        .to_string(SqliteQueryBuilder)
}
