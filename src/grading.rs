//! Submissions for exams and assignments, and the teacher side that scores them.
//!
//! Both kinds of work follow one workflow: a submission starts as `SUBMITTED`
//! and becomes `GRADED` once a score is recorded. Regrading keeps it `GRADED`.

use log::info;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use std::collections::HashMap;

use crate::constants::{generate_id, now_ms, MAX_SCORE};
use crate::enrollment::is_enrolled;
use crate::error::{is_unique_violation, ApiError, ApiResult};
use crate::exams::find_exam;
use crate::models::{Assignment, ExamResult, QueueEntry, Question, QuestionOption, Submission};
use crate::progress::find_lesson;
use crate::queries::{assignments, exams};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SubmissionStatus {
    Submitted,
    Graded,
}

impl SubmissionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubmissionStatus::Submitted => "SUBMITTED",
            SubmissionStatus::Graded => "GRADED",
        }
    }

    pub fn from_db(value: &str) -> Option<Self> {
        match value {
            "SUBMITTED" => Some(SubmissionStatus::Submitted),
            "GRADED" => Some(SubmissionStatus::Graded),
            _ => None,
        }
    }

    /// Recording a score always lands in GRADED
    pub fn after_grading(self) -> SubmissionStatus {
        SubmissionStatus::Graded
    }
}

/// Whether a submission must carry a file reference
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileRequirement {
    Required,
    Optional,
}

impl FileRequirement {
    pub fn for_assignment(assignment: &Assignment) -> Self {
        if assignment.requires_file {
            FileRequirement::Required
        } else {
            FileRequirement::Optional
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkKind {
    #[serde(alias = "EXAM")]
    Exam,
    #[serde(alias = "ASSIGNMENT")]
    Assignment,
}

/// Text and file of a submission after validation
#[derive(Debug, Clone, PartialEq)]
pub struct ValidSubmission {
    pub text: Option<String>,
    pub file_url: Option<String>,
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// The one rule every submission endpoint applies.
///
/// A file reference, when present, must be an absolute http(s) URL. `Required`
/// rejects a missing file. `Optional` still rejects a submission that carries
/// nothing at all.
pub fn validate_submission(
    requirement: FileRequirement,
    text: Option<&str>,
    file_url: Option<&str>,
    has_selections: bool,
) -> ApiResult<ValidSubmission> {
    let text = non_empty(text);
    let file_url = non_empty(file_url);

    if let Some(url) = &file_url {
        match url::Url::parse(url) {
            Ok(parsed) if parsed.scheme() == "http" || parsed.scheme() == "https" => {}
            _ => {
                return Err(ApiError::bad_request(
                    "File URL must be an absolute http(s) URL",
                ))
            }
        }
    }

    match requirement {
        FileRequirement::Required if file_url.is_none() => {
            Err(ApiError::bad_request("File is required"))
        }
        FileRequirement::Optional if file_url.is_none() && text.is_none() && !has_selections => {
            Err(ApiError::bad_request("Submission is empty"))
        }
        _ => Ok(ValidSubmission { text, file_url }),
    }
}

/// Score multiple-choice answers as `round(100 * correct / questions)`.
///
/// Every selected option must belong to the exam and at most one option may be
/// chosen per question. Unanswered questions count as wrong.
pub fn auto_score(
    questions: &[Question],
    options: &[QuestionOption],
    selected_option_ids: &[String],
) -> Result<f64, String> {
    if questions.is_empty() {
        return Err("Exam has no questions".to_string());
    }
    let by_id: HashMap<&str, &QuestionOption> =
        options.iter().map(|o| (o.id.as_str(), o)).collect();

    let mut answered: HashMap<&str, bool> = HashMap::new();
    for option_id in selected_option_ids {
        let option = by_id
            .get(option_id.as_str())
            .ok_or_else(|| format!("Option '{}' does not belong to this exam", option_id))?;
        if answered
            .insert(option.question_id.as_str(), option.is_correct)
            .is_some()
        {
            return Err("Only one option may be selected per question".to_string());
        }
    }

    let total = questions.len() as u64;
    let correct = questions
        .iter()
        .filter(|q| answered.get(q.id.as_str()).copied().unwrap_or(false))
        .count() as u64;
    Ok(((200 * correct + total) / (2 * total)) as f64)
}

pub fn validate_score(score: f64) -> ApiResult<f64> {
    if !score.is_finite() || !(0.0..=MAX_SCORE).contains(&score) {
        return Err(ApiError::bad_request(format!(
            "Score must be between 0 and {}",
            MAX_SCORE
        )));
    }
    Ok(score)
}

async fn require_enrolled_in_lesson(pool: &SqlitePool, user_id: &str, lesson_id: &str) -> ApiResult<()> {
    let lesson = find_lesson(pool, lesson_id).await?;
    if !is_enrolled(pool, user_id, &lesson.course_id).await? {
        return Err(ApiError::Forbidden(
            "Enroll in this course to submit work".to_string(),
        ));
    }
    Ok(())
}

pub async fn find_assignment(pool: &SqlitePool, assignment_id: &str) -> ApiResult<Assignment> {
    sqlx::query_as(&assignments::select_by_id(assignment_id))
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| ApiError::not_found("Assignment"))
}

pub async fn create_assignment(
    pool: &SqlitePool,
    lesson_id: &str,
    title: &str,
    description: Option<&str>,
    requires_file: bool,
) -> ApiResult<Assignment> {
    let title = title.trim();
    if title.is_empty() {
        return Err(ApiError::bad_request("Title is required"));
    }
    find_lesson(pool, lesson_id).await?;
    let id = generate_id("asg");
    sqlx::query(&assignments::insert(
        &id,
        lesson_id,
        title,
        non_empty(description).as_deref(),
        requires_file,
        now_ms(),
    ))
    .execute(pool)
    .await?;
    find_assignment(pool, &id).await
}

/// Hand in an assignment; resubmitting adds another submission
pub async fn submit_assignment(
    pool: &SqlitePool,
    user_id: &str,
    assignment_id: &str,
    content: Option<&str>,
    file_url: Option<&str>,
) -> ApiResult<Submission> {
    let assignment = find_assignment(pool, assignment_id).await?;
    let valid = validate_submission(
        FileRequirement::for_assignment(&assignment),
        content,
        file_url,
        false,
    )?;
    require_enrolled_in_lesson(pool, user_id, &assignment.lesson_id).await?;

    let id = generate_id("sub");
    sqlx::query(&assignments::insert_submission(
        &id,
        assignment_id,
        user_id,
        valid.text.as_deref(),
        valid.file_url.as_deref(),
        SubmissionStatus::Submitted.as_str(),
        now_ms(),
    ))
    .execute(pool)
    .await?;
    info!("User {} submitted assignment {}", user_id, assignment_id);

    sqlx::query_as(&assignments::select_submission_by_id(&id))
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| ApiError::not_found("Submission"))
}

/// Submit an exam once. Multiple-choice answers are scored immediately.
pub async fn submit_exam(
    pool: &SqlitePool,
    user_id: &str,
    exam_id: &str,
    text_answer: Option<&str>,
    file_url: Option<&str>,
    selected_option_ids: &[String],
) -> ApiResult<ExamResult> {
    let exam = find_exam(pool, exam_id).await?;
    let valid = validate_submission(
        FileRequirement::Optional,
        text_answer,
        file_url,
        !selected_option_ids.is_empty(),
    )?;
    require_enrolled_in_lesson(pool, user_id, &exam.lesson_id).await?;

    let questions: Vec<Question> = sqlx::query_as(&exams::select_questions(exam_id))
        .fetch_all(pool)
        .await?;
    let now = now_ms();
    // selections on an exam without questions are rejected by auto_score
    let (score, status, graded_at_ms) = if !selected_option_ids.is_empty() {
        let options: Vec<QuestionOption> = sqlx::query_as(&exams::select_options_for_exam(exam_id))
            .fetch_all(pool)
            .await?;
        let score = auto_score(&questions, &options, selected_option_ids).map_err(ApiError::BadRequest)?;
        (Some(score), SubmissionStatus::Graded, Some(now))
    } else {
        (None, SubmissionStatus::Submitted, None)
    };

    let id = generate_id("exr");
    let sql = exams::insert_result(
        &id,
        exam_id,
        user_id,
        valid.text.as_deref(),
        valid.file_url.as_deref(),
        score,
        status.as_str(),
        now,
        graded_at_ms,
    );
    match sqlx::query(&sql).execute(pool).await {
        Ok(_) => {}
        Err(e) if is_unique_violation(&e) => {
            return Err(ApiError::Conflict(
                "You have already submitted this exam".to_string(),
            ))
        }
        Err(e) => return Err(e.into()),
    }
    info!("User {} submitted exam {} ({})", user_id, exam_id, status.as_str());

    sqlx::query_as(&exams::select_result_by_id(&id))
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| ApiError::not_found("Exam result"))
}

#[derive(Debug, Clone, Serialize)]
pub struct GradeOutcome {
    pub id: String,
    pub kind: WorkKind,
    pub score: f64,
    pub status: SubmissionStatus,
}

/// Record a teacher's score on an exam result or assignment submission
pub async fn grade(pool: &SqlitePool, kind: WorkKind, id: &str, score: f64) -> ApiResult<GradeOutcome> {
    let score = validate_score(score)?;
    let current = match kind {
        WorkKind::Exam => sqlx::query_as::<_, ExamResult>(&exams::select_result_by_id(id))
            .fetch_optional(pool)
            .await?
            .map(|r| r.status),
        WorkKind::Assignment => {
            sqlx::query_as::<_, Submission>(&assignments::select_submission_by_id(id))
                .fetch_optional(pool)
                .await?
                .map(|s| s.status)
        }
    };
    let current = current.ok_or_else(|| ApiError::not_found("Submission"))?;
    let status = SubmissionStatus::from_db(&current)
        .ok_or_else(|| ApiError::Internal(format!("unknown submission status '{}'", current)))?
        .after_grading();

    let now = now_ms();
    let sql = match kind {
        WorkKind::Exam => exams::update_result_grade(id, score, status.as_str(), now),
        WorkKind::Assignment => assignments::update_submission_grade(id, score, status.as_str(), now),
    };
    sqlx::query(&sql).execute(pool).await?;
    info!("Graded {:?} {} with {}", kind, id, score);

    Ok(GradeOutcome {
        id: id.to_string(),
        kind,
        score,
        status,
    })
}

/// Ungraded exam results and assignment submissions, oldest first
pub async fn grading_queue(pool: &SqlitePool) -> ApiResult<Vec<QueueEntry>> {
    let pending = SubmissionStatus::Submitted.as_str();
    let mut queue: Vec<QueueEntry> = sqlx::query_as(&assignments::select_queue(pending))
        .fetch_all(pool)
        .await?;
    let exam_entries: Vec<QueueEntry> = sqlx::query_as(&exams::select_queue(pending))
        .fetch_all(pool)
        .await?;
    queue.extend(exam_entries);
    queue.sort_by_key(|e| e.submitted_at_ms);
    Ok(queue)
}
