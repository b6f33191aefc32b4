use sea_query::{Expr, OnConflict, Order, Query, SqliteQueryBuilder};

use crate::schema::{Lessons, UserProgress};

/// INSERT INTO user_progress (id, user_id, lesson_id, completed, updated_at_ms) VALUES (?, ?, ?, 1, ?)
/// ON CONFLICT (user_id, lesson_id) DO UPDATE SET completed = 1, updated_at_ms = excluded.updated_at_ms
pub fn upsert_completed(id: &str, user_id: &str, lesson_id: &str, updated_at_ms: i64) -> String {
    Query::insert()
        .into_table(UserProgress::Table)
        .columns([
            UserProgress::Id,
            UserProgress::UserId,
            UserProgress::LessonId,
            UserProgress::Completed,
            UserProgress::UpdatedAtMs,
        ])
        .values_panic([
            id.into(),
            user_id.into(),
            lesson_id.into(),
            1i32.into(),
            updated_at_ms.into(),
        ])
        .on_conflict(
            OnConflict::columns([UserProgress::UserId, UserProgress::LessonId])
                .update_columns([UserProgress::Completed, UserProgress::UpdatedAtMs])
                .to_owned(),
        )
        .to_string(SqliteQueryBuilder)
}

/// DELETE FROM user_progress WHERE user_id = ? AND lesson_id = ?
pub fn delete(user_id: &str, lesson_id: &str) -> String {
    Query::delete()
        .from_table(UserProgress::Table)
        .and_where(Expr::col(UserProgress::UserId).eq(user_id))
        .and_where(Expr::col(UserProgress::LessonId).eq(lesson_id))
        .to_string(SqliteQueryBuilder)
}

/// SELECT 1 FROM user_progress WHERE user_id = ? AND lesson_id = ? AND completed = 1
pub fn exists_completed(user_id: &str, lesson_id: &str) -> String {
    Query::select()
        .expr(Expr::val(1))
        .from(UserProgress::Table)
        .and_where(Expr::col(UserProgress::UserId).eq(user_id))
        .and_where(Expr::col(UserProgress::LessonId).eq(lesson_id))
        .and_where(Expr::col(UserProgress::Completed).eq(1))
        .to_string(SqliteQueryBuilder)
}

/// SELECT lesson_id FROM user_progress WHERE user_id = ? AND completed = 1
pub fn select_completed_lesson_ids(user_id: &str) -> String {
    Query::select()
        .column(UserProgress::LessonId)
        .from(UserProgress::Table)
        .and_where(Expr::col(UserProgress::UserId).eq(user_id))
        .and_where(Expr::col(UserProgress::Completed).eq(1))
        .to_string(SqliteQueryBuilder)
}

/// SELECT p.lesson_id, l.course_id, l.title, p.updated_at_ms
/// FROM user_progress p JOIN lessons l ON l.id = p.lesson_id
/// WHERE p.user_id = ? AND p.completed = 1 ORDER BY p.updated_at_ms DESC
pub fn select_completed_with_lessons(user_id: &str) -> String {
    Query::select()
        .column((UserProgress::Table, UserProgress::LessonId))
        .column((Lessons::Table, Lessons::CourseId))
        .column((Lessons::Table, Lessons::Title))
        .column((UserProgress::Table, UserProgress::UpdatedAtMs))
        .from(UserProgress::Table)
        .inner_join(
            Lessons::Table,
            Expr::col((Lessons::Table, Lessons::Id))
                .equals((UserProgress::Table, UserProgress::LessonId)),
        )
        .and_where(Expr::col((UserProgress::Table, UserProgress::UserId)).eq(user_id))
        .and_where(Expr::col((UserProgress::Table, UserProgress::Completed)).eq(1))
        .order_by((UserProgress::Table, UserProgress::UpdatedAtMs), Order::Desc)
        .to_string(SqliteQueryBuilder)
}
