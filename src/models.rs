//! Row types shared by queries, operations and HTTP responses.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Account role stored in `users.role`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    User,
    Teacher,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "USER",
            Role::Teacher => "TEACHER",
            Role::Admin => "ADMIN",
        }
    }

    /// Unknown values fall back to the least privileged role
    pub fn from_db(value: &str) -> Self {
        match value {
            "ADMIN" => Role::Admin,
            "TEACHER" => Role::Teacher,
            _ => Role::User,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: String,
    pub image: Option<String>,
    pub created_at_ms: i64,
}

impl User {
    pub fn role(&self) -> Role {
        Role::from_db(&self.role)
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct UserCredentials {
    pub id: String,
    pub password_hash: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct StudentSummary {
    pub id: String,
    pub name: String,
    pub email: String,
    pub created_at_ms: i64,
    pub course_count: i64,
}

#[derive(Debug, Clone, FromRow)]
pub struct TeacherRow {
    pub id: String,
    pub user_id: Option<String>,
    pub name: String,
    pub title: Option<String>,
    pub bio: Option<String>,
    pub image: Option<String>,
    pub expertise: String,
    pub created_at_ms: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Teacher {
    pub id: String,
    pub user_id: Option<String>,
    pub name: String,
    pub title: Option<String>,
    pub bio: Option<String>,
    pub image: Option<String>,
    pub expertise: Vec<String>,
    pub created_at_ms: i64,
}

impl From<TeacherRow> for Teacher {
    fn from(row: TeacherRow) -> Self {
        Teacher {
            expertise: serde_json::from_str(&row.expertise).unwrap_or_default(),
            id: row.id,
            user_id: row.user_id,
            name: row.name,
            title: row.title,
            bio: row.bio,
            image: row.image,
            created_at_ms: row.created_at_ms,
        }
    }
}

/// Minimal teacher listing for course forms
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct TeacherOption {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Course {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub image: Option<String>,
    pub category: Option<String>,
    pub level: Option<String>,
    pub teacher_id: Option<String>,
    pub created_at_ms: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CourseSummary {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub course: Course,
    pub teacher_name: Option<String>,
    pub lesson_count: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Lesson {
    pub id: String,
    pub course_id: String,
    pub title: String,
    pub video_url: Option<String>,
    pub content: Option<String>,
    pub position: i64,
    pub created_at_ms: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Enrollment {
    pub id: String,
    pub user_id: String,
    pub course_id: String,
    pub meet_link: Option<String>,
    pub enrolled_at_ms: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Appointment {
    pub id: String,
    pub enrollment_id: String,
    pub day_of_week: String,
    pub start_time: String,
}

/// A completed lesson with its title, for activity feeds
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CompletedLesson {
    pub lesson_id: String,
    pub course_id: String,
    pub title: String,
    pub updated_at_ms: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Material {
    pub id: String,
    pub lesson_id: String,
    pub title: String,
    pub file_url: String,
    pub created_at_ms: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Exam {
    pub id: String,
    pub lesson_id: String,
    pub title: String,
    pub created_at_ms: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Question {
    pub id: String,
    pub exam_id: String,
    pub text: String,
    pub position: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct QuestionOption {
    pub id: String,
    pub question_id: String,
    pub text: String,
    pub is_correct: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ExamResult {
    pub id: String,
    pub exam_id: String,
    pub user_id: String,
    pub text_answer: Option<String>,
    pub file_url: Option<String>,
    pub score: Option<f64>,
    pub status: String,
    pub submitted_at_ms: i64,
    pub graded_at_ms: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Assignment {
    pub id: String,
    pub lesson_id: String,
    pub title: String,
    pub description: Option<String>,
    pub requires_file: bool,
    pub created_at_ms: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Submission {
    pub id: String,
    pub assignment_id: String,
    pub user_id: String,
    pub content: Option<String>,
    pub file_url: Option<String>,
    pub score: Option<f64>,
    pub status: String,
    pub submitted_at_ms: i64,
    pub graded_at_ms: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Announcement {
    pub id: String,
    pub course_id: String,
    pub title: String,
    pub body: String,
    pub created_at_ms: i64,
}

/// Learner row in a teacher's course roster
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct EnrolledStudent {
    pub enrollment_id: String,
    pub user_id: String,
    pub name: String,
    pub email: String,
    pub meet_link: Option<String>,
    pub enrolled_at_ms: i64,
}

/// Ungraded work waiting in the teacher's grading queue
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct QueueEntry {
    pub id: String,
    /// "exam" or "assignment"
    pub kind: String,
    pub user_id: String,
    pub user_name: String,
    pub title: String,
    pub content: Option<String>,
    pub file_url: Option<String>,
    pub submitted_at_ms: i64,
}
