use sea_query::{Expr, OnConflict, Order, Query, SqliteQueryBuilder};

use crate::schema::{MaterialProgress, Materials};

const MATERIAL_COLUMNS: [Materials; 5] = [
    Materials::Id,
    Materials::LessonId,
    Materials::Title,
    Materials::FileUrl,
    Materials::CreatedAtMs,
];

/// INSERT INTO materials (id, lesson_id, title, file_url, created_at_ms) VALUES (...)
pub fn insert(id: &str, lesson_id: &str, title: &str, file_url: &str, created_at_ms: i64) -> String {
    Query::insert()
        .into_table(Materials::Table)
        .columns(MATERIAL_COLUMNS)
        .values_panic([
            id.into(),
            lesson_id.into(),
            title.into(),
            file_url.into(),
            created_at_ms.into(),
        ])
        .to_string(SqliteQueryBuilder)
}

/// SELECT ... FROM materials WHERE id = ?
pub fn select_by_id(id: &str) -> String {
    Query::select()
        .columns(MATERIAL_COLUMNS)
        .from(Materials::Table)
        .and_where(Expr::col(Materials::Id).eq(id))
        .to_string(SqliteQueryBuilder)
}

/// SELECT ... FROM materials WHERE lesson_id = ? ORDER BY created_at_ms
pub fn select_by_lesson(lesson_id: &str) -> String {
    Query::select()
        .columns(MATERIAL_COLUMNS)
        .from(Materials::Table)
        .and_where(Expr::col(Materials::LessonId).eq(lesson_id))
        .order_by(Materials::CreatedAtMs, Order::Asc)
        .to_string(SqliteQueryBuilder)
}

/// INSERT INTO material_progress (user_id, material_id, completed, updated_at_ms) VALUES (?, ?, 1, ?)
/// ON CONFLICT (user_id, material_id) DO UPDATE SET completed = 1, updated_at_ms = excluded.updated_at_ms
pub fn upsert_read(user_id: &str, material_id: &str, updated_at_ms: i64) -> String {
    Query::insert()
        .into_table(MaterialProgress::Table)
        .columns([
            MaterialProgress::UserId,
            MaterialProgress::MaterialId,
            MaterialProgress::Completed,
            MaterialProgress::UpdatedAtMs,
        ])
        .values_panic([
            user_id.into(),
            material_id.into(),
            1i32.into(),
            updated_at_ms.into(),
        ])
        .on_conflict(
            OnConflict::columns([MaterialProgress::UserId, MaterialProgress::MaterialId])
                .update_columns([MaterialProgress::Completed, MaterialProgress::UpdatedAtMs])
                .to_owned(),
        )
        .to_string(SqliteQueryBuilder)
}

/// SELECT material_id FROM material_progress WHERE user_id = ? AND completed = 1
pub fn select_read_material_ids(user_id: &str) -> String {
    Query::select()
        .column(MaterialProgress::MaterialId)
        .from(MaterialProgress::Table)
        .and_where(Expr::col(MaterialProgress::UserId).eq(user_id))
        .and_where(Expr::col(MaterialProgress::Completed).eq(1))
        .to_string(SqliteQueryBuilder)
}
