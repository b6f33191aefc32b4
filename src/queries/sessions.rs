use sea_query::{Expr, Query, SqliteQueryBuilder};

use crate::schema::{Sessions, Users};

/// INSERT INTO sessions (token, user_id, created_at_ms, expires_at_ms) VALUES (?, ?, ?, ?)
pub fn insert(token: &str, user_id: &str, created_at_ms: i64, expires_at_ms: i64) -> String {
    Query::insert()
        .into_table(Sessions::Table)
        .columns([
            Sessions::Token,
            Sessions::UserId,
            Sessions::CreatedAtMs,
            Sessions::ExpiresAtMs,
        ])
        .values_panic([
            token.into(),
            user_id.into(),
            created_at_ms.into(),
            expires_at_ms.into(),
        ])
        .to_string(SqliteQueryBuilder)
}

/// SELECT u.id, u.name, u.email, u.role, u.image, u.created_at_ms
/// FROM sessions s JOIN users u ON u.id = s.user_id
/// WHERE s.token = ? AND s.expires_at_ms > ?
pub fn select_user_by_token(token: &str, now_ms: i64) -> String {
    Query::select()
        .column((Users::Table, Users::Id))
        .column((Users::Table, Users::Name))
        .column((Users::Table, Users::Email))
        .column((Users::Table, Users::Role))
        .column((Users::Table, Users::Image))
        .column((Users::Table, Users::CreatedAtMs))
        .from(Sessions::Table)
        .inner_join(
            Users::Table,
            Expr::col((Users::Table, Users::Id)).equals((Sessions::Table, Sessions::UserId)),
        )
        .and_where(Expr::col((Sessions::Table, Sessions::Token)).eq(token))
        .and_where(Expr::col((Sessions::Table, Sessions::ExpiresAtMs)).gt(now_ms))
        .to_string(SqliteQueryBuilder)
}

/// DELETE FROM sessions WHERE token = ?
pub fn delete_by_token(token: &str) -> String {
    Query::delete()
        .from_table(Sessions::Table)
        .and_where(Expr::col(Sessions::Token).eq(token))
        .to_string(SqliteQueryBuilder)
}

/// DELETE FROM sessions WHERE expires_at_ms <= ?
pub fn delete_expired(now_ms: i64) -> String {
    Query::delete()
        .from_table(Sessions::Table)
        .and_where(Expr::col(Sessions::ExpiresAtMs).lte(now_ms))
        .to_string(SqliteQueryBuilder)
}
