use sea_query::{Expr, OnConflict, Order, Query, SqliteQueryBuilder};

use crate::schema::{AnnouncementViews, Announcements};

const ANNOUNCEMENT_COLUMNS: [Announcements; 5] = [
    Announcements::Id,
    Announcements::CourseId,
    Announcements::Title,
    Announcements::Body,
    Announcements::CreatedAtMs,
];

/// INSERT INTO announcements (id, course_id, title, body, created_at_ms) VALUES (...)
pub fn insert(id: &str, course_id: &str, title: &str, body: &str, created_at_ms: i64) -> String {
    Query::insert()
        .into_table(Announcements::Table)
        .columns(ANNOUNCEMENT_COLUMNS)
        .values_panic([
            id.into(),
            course_id.into(),
            title.into(),
            body.into(),
            created_at_ms.into(),
        ])
        .to_string(SqliteQueryBuilder)
}

/// SELECT ... FROM announcements WHERE id = ?
pub fn select_by_id(id: &str) -> String {
    Query::select()
        .columns(ANNOUNCEMENT_COLUMNS)
        .from(Announcements::Table)
        .and_where(Expr::col(Announcements::Id).eq(id))
        .to_string(SqliteQueryBuilder)
}

/// SELECT ... FROM announcements WHERE course_id = ? ORDER BY created_at_ms DESC
pub fn select_by_course(course_id: &str) -> String {
    Query::select()
        .columns(ANNOUNCEMENT_COLUMNS)
        .from(Announcements::Table)
        .and_where(Expr::col(Announcements::CourseId).eq(course_id))
        .order_by(Announcements::CreatedAtMs, Order::Desc)
        .to_string(SqliteQueryBuilder)
}

/// INSERT INTO announcement_views (announcement_id, user_id, viewed_at_ms) VALUES (?, ?, ?)
/// ON CONFLICT (announcement_id, user_id) DO UPDATE SET viewed_at_ms = excluded.viewed_at_ms
pub fn upsert_view(announcement_id: &str, user_id: &str, viewed_at_ms: i64) -> String {
    Query::insert()
        .into_table(AnnouncementViews::Table)
        .columns([
            AnnouncementViews::AnnouncementId,
            AnnouncementViews::UserId,
            AnnouncementViews::ViewedAtMs,
        ])
        .values_panic([announcement_id.into(), user_id.into(), viewed_at_ms.into()])
        .on_conflict(
            OnConflict::columns([AnnouncementViews::AnnouncementId, AnnouncementViews::UserId])
                .update_column(AnnouncementViews::ViewedAtMs)
                .to_owned(),
        )
        .to_string(SqliteQueryBuilder)
}

/// SELECT announcement_id, viewed_at_ms FROM announcement_views WHERE user_id = ?
pub fn select_views_for_user(user_id: &str) -> String {
    Query::select()
        .columns([AnnouncementViews::AnnouncementId, AnnouncementViews::ViewedAtMs])
        .from(AnnouncementViews::Table)
        .and_where(Expr::col(AnnouncementViews::UserId).eq(user_id))
        .to_string(SqliteQueryBuilder)
}
