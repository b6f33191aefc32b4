use sea_query::{Alias, Expr, Func, Order, Query, SelectStatement, SqliteQueryBuilder};

use crate::schema::{Courses, Lessons, Teachers};

const COURSE_COLUMNS: [Courses; 9] = [
    Courses::Id,
    Courses::Title,
    Courses::Description,
    Courses::Price,
    Courses::Image,
    Courses::Category,
    Courses::Level,
    Courses::TeacherId,
    Courses::CreatedAtMs,
];

/// INSERT INTO courses (id, title, description, price, image, category, level, teacher_id, created_at_ms)
#[allow(clippy::too_many_arguments)]
pub fn insert(
    id: &str,
    title: &str,
    description: Option<&str>,
    price: Option<f64>,
    image: Option<&str>,
    category: Option<&str>,
    level: Option<&str>,
    teacher_id: Option<&str>,
    created_at_ms: i64,
) -> String {
    Query::insert()
        .into_table(Courses::Table)
        .columns(COURSE_COLUMNS)
        .values_panic([
            id.into(),
            title.into(),
            description.map(str::to_string).into(),
            price.into(),
            image.map(str::to_string).into(),
            category.map(str::to_string).into(),
            level.map(str::to_string).into(),
            teacher_id.map(str::to_string).into(),
            created_at_ms.into(),
        ])
        .to_string(SqliteQueryBuilder)
}

/// SELECT ... FROM courses WHERE id = ?
pub fn select_by_id(id: &str) -> String {
    Query::select()
        .columns(COURSE_COLUMNS)
        .from(Courses::Table)
        .and_where(Expr::col(Courses::Id).eq(id))
        .to_string(SqliteQueryBuilder)
}

fn summary_select() -> SelectStatement {
    let mut select = Query::select();
    for col in COURSE_COLUMNS {
        select.column((Courses::Table, col));
    }
    select
        .expr_as(
            Expr::col((Teachers::Table, Teachers::Name)),
            Alias::new("teacher_name"),
        )
        .expr_as(
            Func::count(Expr::col((Lessons::Table, Lessons::Id))),
            Alias::new("lesson_count"),
        )
        .from(Courses::Table)
        .left_join(
            Teachers::Table,
            Expr::col((Teachers::Table, Teachers::Id)).equals((Courses::Table, Courses::TeacherId)),
        )
        .left_join(
            Lessons::Table,
            Expr::col((Lessons::Table, Lessons::CourseId)).equals((Courses::Table, Courses::Id)),
        )
        .group_by_col((Courses::Table, Courses::Id))
        .to_owned()
}

/// SELECT c.*, t.name AS teacher_name, COUNT(l.id) AS lesson_count
/// FROM courses c LEFT JOIN teachers t ... LEFT JOIN lessons l ...
/// GROUP BY c.id ORDER BY c.created_at_ms DESC
pub fn select_summaries() -> String {
    summary_select()
        .order_by((Courses::Table, Courses::CreatedAtMs), Order::Desc)
        .to_string(SqliteQueryBuilder)
}

/// Same as [`select_summaries`] restricted to one teacher
pub fn select_summaries_by_teacher(teacher_id: &str) -> String {
    summary_select()
        .and_where(Expr::col((Courses::Table, Courses::TeacherId)).eq(teacher_id))
        .order_by((Courses::Table, Courses::CreatedAtMs), Order::Desc)
        .to_string(SqliteQueryBuilder)
}

/// DELETE FROM courses WHERE id = ?
pub fn delete_by_id(id: &str) -> String {
    Query::delete()
        .from_table(Courses::Table)
        .and_where(Expr::col(Courses::Id).eq(id))
        .to_string(SqliteQueryBuilder)
}

/// SELECT COUNT(id) FROM courses
pub fn count() -> String {
    Query::select()
        .expr(Func::count(Expr::col(Courses::Id)))
        .from(Courses::Table)
        .to_string(SqliteQueryBuilder)
}
