use sea_query::{Alias, Expr, Func, Order, Query, SqliteQueryBuilder};

use crate::schema::{Enrollments, Users};

const USER_COLUMNS: [Users; 6] = [
    Users::Id,
    Users::Name,
    Users::Email,
    Users::Role,
    Users::Image,
    Users::CreatedAtMs,
];

/// INSERT INTO users (id, name, email, password_hash, role, created_at_ms) VALUES (...)
pub fn insert(
    id: &str,
    name: &str,
    email: &str,
    password_hash: Option<&str>,
    role: &str,
    created_at_ms: i64,
) -> String {
    Query::insert()
        .into_table(Users::Table)
        .columns([
            Users::Id,
            Users::Name,
            Users::Email,
            Users::PasswordHash,
            Users::Role,
            Users::CreatedAtMs,
        ])
        .values_panic([
            id.into(),
            name.into(),
            email.into(),
            password_hash.map(str::to_string).into(),
            role.into(),
            created_at_ms.into(),
        ])
        .to_string(SqliteQueryBuilder)
}

/// SELECT id, name, email, role, image, created_at_ms FROM users WHERE id = ?
pub fn select_by_id(id: &str) -> String {
    Query::select()
        .columns(USER_COLUMNS)
        .from(Users::Table)
        .and_where(Expr::col(Users::Id).eq(id))
        .to_string(SqliteQueryBuilder)
}

/// SELECT id, name, email, role, image, created_at_ms FROM users WHERE email = ?
pub fn select_by_email(email: &str) -> String {
    Query::select()
        .columns(USER_COLUMNS)
        .from(Users::Table)
        .and_where(Expr::col(Users::Email).eq(email))
        .to_string(SqliteQueryBuilder)
}

/// SELECT id, password_hash FROM users WHERE email = ?
pub fn select_credentials_by_email(email: &str) -> String {
    Query::select()
        .columns([Users::Id, Users::PasswordHash])
        .from(Users::Table)
        .and_where(Expr::col(Users::Email).eq(email))
        .to_string(SqliteQueryBuilder)
}

/// UPDATE users SET name = ? WHERE id = ?
pub fn update_name(id: &str, name: &str) -> String {
    Query::update()
        .table(Users::Table)
        .value(Users::Name, name)
        .and_where(Expr::col(Users::Id).eq(id))
        .to_string(SqliteQueryBuilder)
}

/// UPDATE users SET role = ? WHERE id = ?
pub fn update_role(id: &str, role: &str) -> String {
    Query::update()
        .table(Users::Table)
        .value(Users::Role, role)
        .and_where(Expr::col(Users::Id).eq(id))
        .to_string(SqliteQueryBuilder)
}

/// SELECT u.id, u.name, u.email, u.created_at_ms, COUNT(e.id) AS course_count
/// FROM users u LEFT JOIN enrollments e ON e.user_id = u.id
/// WHERE u.role = 'USER' GROUP BY u.id ORDER BY u.created_at_ms DESC
pub fn select_students_with_course_count() -> String {
    Query::select()
        .column((Users::Table, Users::Id))
        .column((Users::Table, Users::Name))
        .column((Users::Table, Users::Email))
        .column((Users::Table, Users::CreatedAtMs))
        .expr_as(
            Func::count(Expr::col((Enrollments::Table, Enrollments::Id))),
            Alias::new("course_count"),
        )
        .from(Users::Table)
        .left_join(
            Enrollments::Table,
            Expr::col((Enrollments::Table, Enrollments::UserId))
                .equals((Users::Table, Users::Id)),
        )
        .and_where(Expr::col((Users::Table, Users::Role)).eq("USER"))
        .group_by_col((Users::Table, Users::Id))
        .order_by((Users::Table, Users::CreatedAtMs), Order::Desc)
        .to_string(SqliteQueryBuilder)
}

/// SELECT COUNT(*) FROM users WHERE role = ?
pub fn count_by_role(role: &str) -> String {
    Query::select()
        .expr(Func::count(Expr::col(Users::Id)))
        .from(Users::Table)
        .and_where(Expr::col(Users::Role).eq(role))
        .to_string(SqliteQueryBuilder)
}
