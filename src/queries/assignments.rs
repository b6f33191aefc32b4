use sea_query::{Alias, Expr, Func, Order, Query, SqliteQueryBuilder};

use crate::schema::{Assignments, Submissions, Users};

const ASSIGNMENT_COLUMNS: [Assignments; 6] = [
    Assignments::Id,
    Assignments::LessonId,
    Assignments::Title,
    Assignments::Description,
    Assignments::RequiresFile,
    Assignments::CreatedAtMs,
];

const SUBMISSION_COLUMNS: [Submissions; 9] = [
    Submissions::Id,
    Submissions::AssignmentId,
    Submissions::UserId,
    Submissions::Content,
    Submissions::FileUrl,
    Submissions::Score,
    Submissions::Status,
    Submissions::SubmittedAtMs,
    Submissions::GradedAtMs,
];

/// INSERT INTO assignments (id, lesson_id, title, description, requires_file, created_at_ms)
pub fn insert(
    id: &str,
    lesson_id: &str,
    title: &str,
    description: Option<&str>,
    requires_file: bool,
    created_at_ms: i64,
) -> String {
    Query::insert()
        .into_table(Assignments::Table)
        .columns(ASSIGNMENT_COLUMNS)
        .values_panic([
            id.into(),
            lesson_id.into(),
            title.into(),
            description.map(str::to_string).into(),
            (requires_file as i32).into(),
            created_at_ms.into(),
        ])
        .to_string(SqliteQueryBuilder)
}

/// SELECT ... FROM assignments WHERE id = ?
pub fn select_by_id(id: &str) -> String {
    Query::select()
        .columns(ASSIGNMENT_COLUMNS)
        .from(Assignments::Table)
        .and_where(Expr::col(Assignments::Id).eq(id))
        .to_string(SqliteQueryBuilder)
}

/// SELECT ... FROM assignments WHERE lesson_id = ? ORDER BY created_at_ms
pub fn select_by_lesson(lesson_id: &str) -> String {
    Query::select()
        .columns(ASSIGNMENT_COLUMNS)
        .from(Assignments::Table)
        .and_where(Expr::col(Assignments::LessonId).eq(lesson_id))
        .order_by(Assignments::CreatedAtMs, Order::Asc)
        .to_string(SqliteQueryBuilder)
}

/// INSERT INTO submissions (...) VALUES (...)
pub fn insert_submission(
    id: &str,
    assignment_id: &str,
    user_id: &str,
    content: Option<&str>,
    file_url: Option<&str>,
    status: &str,
    submitted_at_ms: i64,
) -> String {
    Query::insert()
        .into_table(Submissions::Table)
        .columns(SUBMISSION_COLUMNS)
        .values_panic([
            id.into(),
            assignment_id.into(),
            user_id.into(),
            content.map(str::to_string).into(),
            file_url.map(str::to_string).into(),
            Option::<f64>::None.into(),
            status.into(),
            submitted_at_ms.into(),
            Option::<i64>::None.into(),
        ])
        .to_string(SqliteQueryBuilder)
}

/// SELECT ... FROM submissions WHERE id = ?
pub fn select_submission_by_id(id: &str) -> String {
    Query::select()
        .columns(SUBMISSION_COLUMNS)
        .from(Submissions::Table)
        .and_where(Expr::col(Submissions::Id).eq(id))
        .to_string(SqliteQueryBuilder)
}

/// SELECT ... FROM submissions WHERE assignment_id = ? AND user_id = ? ORDER BY submitted_at_ms DESC
pub fn select_submissions_for_user(assignment_id: &str, user_id: &str) -> String {
    Query::select()
        .columns(SUBMISSION_COLUMNS)
        .from(Submissions::Table)
        .and_where(Expr::col(Submissions::AssignmentId).eq(assignment_id))
        .and_where(Expr::col(Submissions::UserId).eq(user_id))
        .order_by(Submissions::SubmittedAtMs, Order::Desc)
        .to_string(SqliteQueryBuilder)
}

/// UPDATE submissions SET score = ?, status = ?, graded_at_ms = ? WHERE id = ?
pub fn update_submission_grade(id: &str, score: f64, status: &str, graded_at_ms: i64) -> String {
    Query::update()
        .table(Submissions::Table)
        .values([
            (Submissions::Score, score.into()),
            (Submissions::Status, status.into()),
            (Submissions::GradedAtMs, graded_at_ms.into()),
        ])
        .and_where(Expr::col(Submissions::Id).eq(id))
        .to_string(SqliteQueryBuilder)
}

/// SELECT s.id, 'assignment' AS kind, s.user_id, u.name AS user_name, a.title,
///        s.content, s.file_url, s.submitted_at_ms
/// FROM submissions s JOIN users u ON u.id = s.user_id JOIN assignments a ON a.id = s.assignment_id
/// WHERE s.status = ? ORDER BY s.submitted_at_ms
pub fn select_queue(status: &str) -> String {
    Query::select()
        .column((Submissions::Table, Submissions::Id))
        .expr_as(Expr::val("assignment"), Alias::new("kind"))
        .column((Submissions::Table, Submissions::UserId))
        .expr_as(Expr::col((Users::Table, Users::Name)), Alias::new("user_name"))
        .column((Assignments::Table, Assignments::Title))
        .column((Submissions::Table, Submissions::Content))
        .column((Submissions::Table, Submissions::FileUrl))
        .column((Submissions::Table, Submissions::SubmittedAtMs))
        .from(Submissions::Table)
        .inner_join(
            Users::Table,
            Expr::col((Users::Table, Users::Id)).equals((Submissions::Table, Submissions::UserId)),
        )
        .inner_join(
            Assignments::Table,
            Expr::col((Assignments::Table, Assignments::Id))
                .equals((Submissions::Table, Submissions::AssignmentId)),
        )
        .and_where(Expr::col((Submissions::Table, Submissions::Status)).eq(status))
        .order_by((Submissions::Table, Submissions::SubmittedAtMs), Order::Asc)
        .to_string(SqliteQueryBuilder)
}

/// SELECT COUNT(id) FROM submissions WHERE status = ?
pub fn count_by_status(status: &str) -> String {
    Query::select()
        .expr(Func::count(Expr::col(Submissions::Id)))
        .from(Submissions::Table)
        .and_where(Expr::col(Submissions::Status).eq(status))
        .to_string(SqliteQueryBuilder)
}
