use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use std::collections::HashMap;

use crate::constants::{generate_id, now_ms};
use crate::error::{ApiError, ApiResult};
use crate::models::{Exam, ExamResult, Question, QuestionOption};
use crate::progress::find_lesson;
use crate::queries::exams;

#[derive(Debug, Clone, Deserialize)]
pub struct NewOption {
    pub text: String,
    #[serde(default, alias = "isCorrect")]
    pub is_correct: bool,
}

/// Option as shown to a learner, without the answer key
#[derive(Debug, Clone, Serialize)]
pub struct LearnerOption {
    pub id: String,
    pub text: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct LearnerQuestion {
    pub id: String,
    pub text: String,
    pub position: i64,
    pub options: Vec<LearnerOption>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LearnerExam {
    pub exam: Exam,
    pub questions: Vec<LearnerQuestion>,
    pub result: Option<ExamResult>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TeacherQuestion {
    #[serde(flatten)]
    pub question: Question,
    pub options: Vec<QuestionOption>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TeacherExam {
    pub exam: Exam,
    pub questions: Vec<TeacherQuestion>,
}

pub async fn find_exam(pool: &SqlitePool, exam_id: &str) -> ApiResult<Exam> {
    sqlx::query_as(&exams::select_by_id(exam_id))
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| ApiError::not_found("Exam"))
}

pub async fn exams_for_lesson(pool: &SqlitePool, lesson_id: &str) -> ApiResult<Vec<Exam>> {
    Ok(sqlx::query_as(&exams::select_by_lesson(lesson_id))
        .fetch_all(pool)
        .await?)
}

pub async fn create_exam(pool: &SqlitePool, lesson_id: &str, title: &str) -> ApiResult<Exam> {
    let title = title.trim();
    if title.is_empty() {
        return Err(ApiError::bad_request("Title is required"));
    }
    find_lesson(pool, lesson_id).await?;
    let id = generate_id("exm");
    sqlx::query(&exams::insert(&id, lesson_id, title, now_ms()))
        .execute(pool)
        .await?;
    find_exam(pool, &id).await
}

/// At least two non-blank options, exactly one of them correct
pub fn validate_options(options: &[NewOption]) -> ApiResult<()> {
    if options.len() < 2 {
        return Err(ApiError::bad_request("A question needs at least two options"));
    }
    if options.iter().any(|o| o.text.trim().is_empty()) {
        return Err(ApiError::bad_request("Option text must not be empty"));
    }
    if options.iter().filter(|o| o.is_correct).count() != 1 {
        return Err(ApiError::bad_request("Exactly one option must be correct"));
    }
    Ok(())
}

/// Append a multiple-choice question to the end of an exam
pub async fn add_question(
    pool: &SqlitePool,
    exam_id: &str,
    text: &str,
    options: &[NewOption],
) -> ApiResult<TeacherQuestion> {
    let text = text.trim();
    if text.is_empty() {
        return Err(ApiError::bad_request("Question text is required"));
    }
    validate_options(options)?;
    find_exam(pool, exam_id).await?;

    let mut tx = pool.begin().await?;
    let max_position: Option<i64> = sqlx::query_scalar(&exams::select_max_question_position(exam_id))
        .fetch_one(&mut *tx)
        .await?;
    let question = Question {
        id: generate_id("qst"),
        exam_id: exam_id.to_string(),
        text: text.to_string(),
        position: max_position.map_or(0, |p| p + 1),
    };
    sqlx::query(&exams::insert_question(
        &question.id,
        exam_id,
        &question.text,
        question.position,
    ))
    .execute(&mut *tx)
    .await?;

    let mut created = Vec::with_capacity(options.len());
    for option in options {
        let row = QuestionOption {
            id: generate_id("opt"),
            question_id: question.id.clone(),
            text: option.text.trim().to_string(),
            is_correct: option.is_correct,
        };
        sqlx::query(&exams::insert_option(
            &row.id,
            &row.question_id,
            &row.text,
            row.is_correct,
        ))
        .execute(&mut *tx)
        .await?;
        created.push(row);
    }
    tx.commit().await?;

    Ok(TeacherQuestion {
        question,
        options: created,
    })
}

async fn load_questions(pool: &SqlitePool, exam_id: &str) -> ApiResult<Vec<TeacherQuestion>> {
    let questions: Vec<Question> = sqlx::query_as(&exams::select_questions(exam_id))
        .fetch_all(pool)
        .await?;
    let options: Vec<QuestionOption> = sqlx::query_as(&exams::select_options_for_exam(exam_id))
        .fetch_all(pool)
        .await?;

    let mut grouped: HashMap<String, Vec<QuestionOption>> = HashMap::new();
    for option in options {
        grouped
            .entry(option.question_id.clone())
            .or_default()
            .push(option);
    }
    Ok(questions
        .into_iter()
        .map(|question| {
            let options = grouped.remove(&question.id).unwrap_or_default();
            TeacherQuestion { question, options }
        })
        .collect())
}

pub async fn exam_for_teacher(pool: &SqlitePool, exam_id: &str) -> ApiResult<TeacherExam> {
    let exam = find_exam(pool, exam_id).await?;
    let questions = load_questions(pool, exam_id).await?;
    Ok(TeacherExam { exam, questions })
}

/// Exam with the answer key stripped, plus the learner's own result if any
pub async fn exam_for_learner(pool: &SqlitePool, exam_id: &str, user_id: &str) -> ApiResult<LearnerExam> {
    let exam = find_exam(pool, exam_id).await?;
    let questions = load_questions(pool, exam_id)
        .await?
        .into_iter()
        .map(|q| LearnerQuestion {
            id: q.question.id,
            text: q.question.text,
            position: q.question.position,
            options: q
                .options
                .into_iter()
                .map(|o| LearnerOption { id: o.id, text: o.text })
                .collect(),
        })
        .collect();
    let result = sqlx::query_as(&exams::select_result_for_user(exam_id, user_id))
        .fetch_optional(pool)
        .await?;
    Ok(LearnerExam {
        exam,
        questions,
        result,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opt(text: &str, is_correct: bool) -> NewOption {
        NewOption {
            text: text.to_string(),
            is_correct,
        }
    }

    #[test]
    fn test_validate_options() {
        assert!(validate_options(&[opt("yes", true), opt("no", false)]).is_ok());
        assert!(validate_options(&[opt("only", true)]).is_err());
        assert!(validate_options(&[opt("a", true), opt("b", true)]).is_err());
        assert!(validate_options(&[opt("a", false), opt("b", false)]).is_err());
        assert!(validate_options(&[opt("a", true), opt("  ", false)]).is_err());
    }
}
