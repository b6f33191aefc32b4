use sea_query::{Expr, Func, Order, Query, SqliteQueryBuilder};

use crate::schema::Teachers;

const TEACHER_COLUMNS: [Teachers; 8] = [
    Teachers::Id,
    Teachers::UserId,
    Teachers::Name,
    Teachers::Title,
    Teachers::Bio,
    Teachers::Image,
    Teachers::Expertise,
    Teachers::CreatedAtMs,
];

/// INSERT INTO teachers (id, user_id, name, title, bio, image, expertise, created_at_ms) VALUES (...)
#[allow(clippy::too_many_arguments)]
pub fn insert(
    id: &str,
    user_id: Option<&str>,
    name: &str,
    title: Option<&str>,
    bio: Option<&str>,
    image: Option<&str>,
    expertise_json: &str,
    created_at_ms: i64,
) -> String {
    Query::insert()
        .into_table(Teachers::Table)
        .columns(TEACHER_COLUMNS)
        .values_panic([
            id.into(),
            user_id.map(str::to_string).into(),
            name.into(),
            title.map(str::to_string).into(),
            bio.map(str::to_string).into(),
            image.map(str::to_string).into(),
            expertise_json.into(),
            created_at_ms.into(),
        ])
        .to_string(SqliteQueryBuilder)
}

/// SELECT ... FROM teachers ORDER BY name
pub fn select_all() -> String {
    Query::select()
        .columns(TEACHER_COLUMNS)
        .from(Teachers::Table)
        .order_by(Teachers::Name, Order::Asc)
        .to_string(SqliteQueryBuilder)
}

/// SELECT id, name FROM teachers ORDER BY name
pub fn select_options() -> String {
    Query::select()
        .columns([Teachers::Id, Teachers::Name])
        .from(Teachers::Table)
        .order_by(Teachers::Name, Order::Asc)
        .to_string(SqliteQueryBuilder)
}

/// SELECT ... FROM teachers WHERE id = ?
pub fn select_by_id(id: &str) -> String {
    Query::select()
        .columns(TEACHER_COLUMNS)
        .from(Teachers::Table)
        .and_where(Expr::col(Teachers::Id).eq(id))
        .to_string(SqliteQueryBuilder)
}

/// SELECT ... FROM teachers WHERE user_id = ?
pub fn select_by_user_id(user_id: &str) -> String {
    Query::select()
        .columns(TEACHER_COLUMNS)
        .from(Teachers::Table)
        .and_where(Expr::col(Teachers::UserId).eq(user_id))
        .to_string(SqliteQueryBuilder)
}

/// SELECT COUNT(id) FROM teachers
pub fn count() -> String {
    Query::select()
        .expr(Func::count(Expr::col(Teachers::Id)))
        .from(Teachers::Table)
        .to_string(SqliteQueryBuilder)
}
