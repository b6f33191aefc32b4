use sea_query::{Alias, Expr, Func, Order, Query, SqliteQueryBuilder};

use crate::schema::{ExamResults, Exams, QuestionOptions, Questions, Users};

const EXAM_COLUMNS: [Exams; 4] = [Exams::Id, Exams::LessonId, Exams::Title, Exams::CreatedAtMs];

const RESULT_COLUMNS: [ExamResults; 9] = [
    ExamResults::Id,
    ExamResults::ExamId,
    ExamResults::UserId,
    ExamResults::TextAnswer,
    ExamResults::FileUrl,
    ExamResults::Score,
    ExamResults::Status,
    ExamResults::SubmittedAtMs,
    ExamResults::GradedAtMs,
];

/// INSERT INTO exams (id, lesson_id, title, created_at_ms) VALUES (...)
pub fn insert(id: &str, lesson_id: &str, title: &str, created_at_ms: i64) -> String {
    Query::insert()
        .into_table(Exams::Table)
        .columns(EXAM_COLUMNS)
        .values_panic([id.into(), lesson_id.into(), title.into(), created_at_ms.into()])
        .to_string(SqliteQueryBuilder)
}

/// SELECT ... FROM exams WHERE id = ?
pub fn select_by_id(id: &str) -> String {
    Query::select()
        .columns(EXAM_COLUMNS)
        .from(Exams::Table)
        .and_where(Expr::col(Exams::Id).eq(id))
        .to_string(SqliteQueryBuilder)
}

/// SELECT ... FROM exams WHERE lesson_id = ? ORDER BY created_at_ms
pub fn select_by_lesson(lesson_id: &str) -> String {
    Query::select()
        .columns(EXAM_COLUMNS)
        .from(Exams::Table)
        .and_where(Expr::col(Exams::LessonId).eq(lesson_id))
        .order_by(Exams::CreatedAtMs, Order::Asc)
        .to_string(SqliteQueryBuilder)
}

/// INSERT INTO questions (id, exam_id, text, position) VALUES (...)
pub fn insert_question(id: &str, exam_id: &str, text: &str, position: i64) -> String {
    Query::insert()
        .into_table(Questions::Table)
        .columns([
            Questions::Id,
            Questions::ExamId,
            Questions::Text,
            Questions::Position,
        ])
        .values_panic([id.into(), exam_id.into(), text.into(), position.into()])
        .to_string(SqliteQueryBuilder)
}

/// SELECT MAX(position) FROM questions WHERE exam_id = ?
pub fn select_max_question_position(exam_id: &str) -> String {
    Query::select()
        .expr(Func::max(Expr::col(Questions::Position)))
        .from(Questions::Table)
        .and_where(Expr::col(Questions::ExamId).eq(exam_id))
        .to_string(SqliteQueryBuilder)
}

/// SELECT id, exam_id, text, position FROM questions WHERE exam_id = ? ORDER BY position
pub fn select_questions(exam_id: &str) -> String {
    Query::select()
        .columns([
            Questions::Id,
            Questions::ExamId,
            Questions::Text,
            Questions::Position,
        ])
        .from(Questions::Table)
        .and_where(Expr::col(Questions::ExamId).eq(exam_id))
        .order_by(Questions::Position, Order::Asc)
        .to_string(SqliteQueryBuilder)
}

/// INSERT INTO question_options (id, question_id, text, is_correct) VALUES (...)
pub fn insert_option(id: &str, question_id: &str, text: &str, is_correct: bool) -> String {
    Query::insert()
        .into_table(QuestionOptions::Table)
        .columns([
            QuestionOptions::Id,
            QuestionOptions::QuestionId,
            QuestionOptions::Text,
            QuestionOptions::IsCorrect,
        ])
        .values_panic([
            id.into(),
            question_id.into(),
            text.into(),
            (is_correct as i32).into(),
        ])
        .to_string(SqliteQueryBuilder)
}

/// SELECT o.id, o.question_id, o.text, o.is_correct
/// FROM question_options o JOIN questions q ON q.id = o.question_id
/// WHERE q.exam_id = ? ORDER BY q.position, o.rowid
pub fn select_options_for_exam(exam_id: &str) -> String {
    Query::select()
        .column((QuestionOptions::Table, QuestionOptions::Id))
        .column((QuestionOptions::Table, QuestionOptions::QuestionId))
        .column((QuestionOptions::Table, QuestionOptions::Text))
        .column((QuestionOptions::Table, QuestionOptions::IsCorrect))
        .from(QuestionOptions::Table)
        .inner_join(
            Questions::Table,
            Expr::col((Questions::Table, Questions::Id))
                .equals((QuestionOptions::Table, QuestionOptions::QuestionId)),
        )
        .and_where(Expr::col((Questions::Table, Questions::ExamId)).eq(exam_id))
        .order_by((Questions::Table, Questions::Position), Order::Asc)
        .order_by_expr(Expr::cust("question_options.rowid"), Order::Asc)
        .to_string(SqliteQueryBuilder)
}

/// INSERT INTO exam_results (...) VALUES (...)
#[allow(clippy::too_many_arguments)]
pub fn insert_result(
    id: &str,
    exam_id: &str,
    user_id: &str,
    text_answer: Option<&str>,
    file_url: Option<&str>,
    score: Option<f64>,
    status: &str,
    submitted_at_ms: i64,
    graded_at_ms: Option<i64>,
) -> String {
    Query::insert()
        .into_table(ExamResults::Table)
        .columns(RESULT_COLUMNS)
        .values_panic([
            id.into(),
            exam_id.into(),
            user_id.into(),
            text_answer.map(str::to_string).into(),
            file_url.map(str::to_string).into(),
            score.into(),
            status.into(),
            submitted_at_ms.into(),
            graded_at_ms.into(),
        ])
        .to_string(SqliteQueryBuilder)
}

/// SELECT ... FROM exam_results WHERE id = ?
pub fn select_result_by_id(id: &str) -> String {
    Query::select()
        .columns(RESULT_COLUMNS)
        .from(ExamResults::Table)
        .and_where(Expr::col(ExamResults::Id).eq(id))
        .to_string(SqliteQueryBuilder)
}

/// SELECT ... FROM exam_results WHERE exam_id = ? AND user_id = ?
pub fn select_result_for_user(exam_id: &str, user_id: &str) -> String {
    Query::select()
        .columns(RESULT_COLUMNS)
        .from(ExamResults::Table)
        .and_where(Expr::col(ExamResults::ExamId).eq(exam_id))
        .and_where(Expr::col(ExamResults::UserId).eq(user_id))
        .to_string(SqliteQueryBuilder)
}

/// UPDATE exam_results SET score = ?, status = ?, graded_at_ms = ? WHERE id = ?
pub fn update_result_grade(id: &str, score: f64, status: &str, graded_at_ms: i64) -> String {
    Query::update()
        .table(ExamResults::Table)
        .values([
            (ExamResults::Score, score.into()),
            (ExamResults::Status, status.into()),
            (ExamResults::GradedAtMs, graded_at_ms.into()),
        ])
        .and_where(Expr::col(ExamResults::Id).eq(id))
        .to_string(SqliteQueryBuilder)
}

/// SELECT r.id, 'exam' AS kind, r.user_id, u.name AS user_name, e.title,
///        r.text_answer AS content, r.file_url, r.submitted_at_ms
/// FROM exam_results r JOIN users u ON u.id = r.user_id JOIN exams e ON e.id = r.exam_id
/// WHERE r.status = ? ORDER BY r.submitted_at_ms
pub fn select_queue(status: &str) -> String {
    Query::select()
        .column((ExamResults::Table, ExamResults::Id))
        .expr_as(Expr::val("exam"), Alias::new("kind"))
        .column((ExamResults::Table, ExamResults::UserId))
        .expr_as(Expr::col((Users::Table, Users::Name)), Alias::new("user_name"))
        .column((Exams::Table, Exams::Title))
        .expr_as(
            Expr::col((ExamResults::Table, ExamResults::TextAnswer)),
            Alias::new("content"),
        )
        .column((ExamResults::Table, ExamResults::FileUrl))
        .column((ExamResults::Table, ExamResults::SubmittedAtMs))
        .from(ExamResults::Table)
        .inner_join(
            Users::Table,
            Expr::col((Users::Table, Users::Id)).equals((ExamResults::Table, ExamResults::UserId)),
        )
        .inner_join(
            Exams::Table,
            Expr::col((Exams::Table, Exams::Id)).equals((ExamResults::Table, ExamResults::ExamId)),
        )
        .and_where(Expr::col((ExamResults::Table, ExamResults::Status)).eq(status))
        .order_by((ExamResults::Table, ExamResults::SubmittedAtMs), Order::Asc)
        .to_string(SqliteQueryBuilder)
}

/// SELECT COUNT(id) FROM exam_results WHERE status = ?
pub fn count_results_by_status(status: &str) -> String {
    Query::select()
        .expr(Func::count(Expr::col(ExamResults::Id)))
        .from(ExamResults::Table)
        .and_where(Expr::col(ExamResults::Status).eq(status))
        .to_string(SqliteQueryBuilder)
}
