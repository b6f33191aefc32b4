use sea_query::{Expr, Func, Order, Query, SqliteQueryBuilder};

use crate::schema::Lessons;

const LESSON_COLUMNS: [Lessons; 7] = [
    Lessons::Id,
    Lessons::CourseId,
    Lessons::Title,
    Lessons::VideoUrl,
    Lessons::Content,
    Lessons::Position,
    Lessons::CreatedAtMs,
];

/// INSERT INTO lessons (id, course_id, title, video_url, content, position, created_at_ms)
pub fn insert(
    id: &str,
    course_id: &str,
    title: &str,
    video_url: Option<&str>,
    content: Option<&str>,
    position: i64,
    created_at_ms: i64,
) -> String {
    Query::insert()
        .into_table(Lessons::Table)
        .columns(LESSON_COLUMNS)
        .values_panic([
            id.into(),
            course_id.into(),
            title.into(),
            video_url.map(str::to_string).into(),
            content.map(str::to_string).into(),
            position.into(),
            created_at_ms.into(),
        ])
        .to_string(SqliteQueryBuilder)
}

/// SELECT ... FROM lessons WHERE id = ?
pub fn select_by_id(id: &str) -> String {
    Query::select()
        .columns(LESSON_COLUMNS)
        .from(Lessons::Table)
        .and_where(Expr::col(Lessons::Id).eq(id))
        .to_string(SqliteQueryBuilder)
}

/// SELECT ... FROM lessons WHERE course_id = ? ORDER BY position, created_at_ms
pub fn select_by_course(course_id: &str) -> String {
    Query::select()
        .columns(LESSON_COLUMNS)
        .from(Lessons::Table)
        .and_where(Expr::col(Lessons::CourseId).eq(course_id))
        .order_by(Lessons::Position, Order::Asc)
        .order_by(Lessons::CreatedAtMs, Order::Asc)
        .to_string(SqliteQueryBuilder)
}

/// SELECT MAX(position) FROM lessons WHERE course_id = ?
pub fn select_max_position(course_id: &str) -> String {
    Query::select()
        .expr(Func::max(Expr::col(Lessons::Position)))
        .from(Lessons::Table)
        .and_where(Expr::col(Lessons::CourseId).eq(course_id))
        .to_string(SqliteQueryBuilder)
}

/// SELECT COUNT(id) FROM lessons
pub fn count() -> String {
    Query::select()
        .expr(Func::count(Expr::col(Lessons::Id)))
        .from(Lessons::Table)
        .to_string(SqliteQueryBuilder)
}
