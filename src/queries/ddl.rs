use sea_query::{
    ColumnDef, ForeignKey, ForeignKeyAction, Index, IndexCreateStatement, SqliteQueryBuilder,
    Table,
};

use crate::schema::{
    AnnouncementViews, Announcements, Appointments, Assignments, Courses, Enrollments,
    ExamResults, Exams, Lessons, MaterialProgress, Materials, Metadata, QuestionOptions,
    Questions, Sessions, Submissions, Teachers, UserProgress, Users,
};

/// CREATE TABLE IF NOT EXISTS metadata (key TEXT PRIMARY KEY, value TEXT NOT NULL)
pub fn create_metadata_table() -> String {
    Table::create()
        .table(Metadata::Table)
        .if_not_exists()
        .col(ColumnDef::new(Metadata::Key).string().primary_key())
        .col(ColumnDef::new(Metadata::Value).string().not_null())
        .to_string(SqliteQueryBuilder)
}

/// CREATE TABLE IF NOT EXISTS users (id TEXT PRIMARY KEY, email TEXT UNIQUE, ...)
pub fn create_users_table() -> String {
    Table::create()
        .table(Users::Table)
        .if_not_exists()
        .col(ColumnDef::new(Users::Id).string().primary_key())
        .col(ColumnDef::new(Users::Name).string().not_null())
        .col(ColumnDef::new(Users::Email).string().not_null().unique_key())
        .col(ColumnDef::new(Users::PasswordHash).string())
        .col(ColumnDef::new(Users::Role).string().not_null().default("USER"))
        .col(ColumnDef::new(Users::Image).string())
        .col(ColumnDef::new(Users::CreatedAtMs).big_integer().not_null())
        .to_string(SqliteQueryBuilder)
}

/// CREATE TABLE IF NOT EXISTS sessions (token TEXT PRIMARY KEY, user_id ... ON DELETE CASCADE)
pub fn create_sessions_table() -> String {
    Table::create()
        .table(Sessions::Table)
        .if_not_exists()
        .col(ColumnDef::new(Sessions::Token).string().primary_key())
        .col(ColumnDef::new(Sessions::UserId).string().not_null())
        .col(ColumnDef::new(Sessions::CreatedAtMs).big_integer().not_null())
        .col(ColumnDef::new(Sessions::ExpiresAtMs).big_integer().not_null())
        .foreign_key(
            ForeignKey::create()
                .from(Sessions::Table, Sessions::UserId)
                .to(Users::Table, Users::Id)
                .on_delete(ForeignKeyAction::Cascade),
        )
        .to_string(SqliteQueryBuilder)
}

/// CREATE TABLE IF NOT EXISTS teachers (..., user_id TEXT UNIQUE REFERENCES users ON DELETE SET NULL)
pub fn create_teachers_table() -> String {
    Table::create()
        .table(Teachers::Table)
        .if_not_exists()
        .col(ColumnDef::new(Teachers::Id).string().primary_key())
        .col(ColumnDef::new(Teachers::UserId).string().unique_key())
        .col(ColumnDef::new(Teachers::Name).string().not_null())
        .col(ColumnDef::new(Teachers::Title).string())
        .col(ColumnDef::new(Teachers::Bio).string())
        .col(ColumnDef::new(Teachers::Image).string())
        .col(ColumnDef::new(Teachers::Expertise).string().not_null().default("[]"))
        .col(ColumnDef::new(Teachers::CreatedAtMs).big_integer().not_null())
        .foreign_key(
            ForeignKey::create()
                .from(Teachers::Table, Teachers::UserId)
                .to(Users::Table, Users::Id)
                .on_delete(ForeignKeyAction::SetNull),
        )
        .to_string(SqliteQueryBuilder)
}

pub fn create_courses_table() -> String {
    Table::create()
        .table(Courses::Table)
        .if_not_exists()
        .col(ColumnDef::new(Courses::Id).string().primary_key())
        .col(ColumnDef::new(Courses::Title).string().not_null())
        .col(ColumnDef::new(Courses::Description).string())
        .col(ColumnDef::new(Courses::Price).double())
        .col(ColumnDef::new(Courses::Image).string())
        .col(ColumnDef::new(Courses::Category).string())
        .col(ColumnDef::new(Courses::Level).string())
        .col(ColumnDef::new(Courses::TeacherId).string())
        .col(ColumnDef::new(Courses::CreatedAtMs).big_integer().not_null())
        .foreign_key(
            ForeignKey::create()
                .from(Courses::Table, Courses::TeacherId)
                .to(Teachers::Table, Teachers::Id)
                .on_delete(ForeignKeyAction::SetNull),
        )
        .to_string(SqliteQueryBuilder)
}

pub fn create_lessons_table() -> String {
    Table::create()
        .table(Lessons::Table)
        .if_not_exists()
        .col(ColumnDef::new(Lessons::Id).string().primary_key())
        .col(ColumnDef::new(Lessons::CourseId).string().not_null())
        .col(ColumnDef::new(Lessons::Title).string().not_null())
        .col(ColumnDef::new(Lessons::VideoUrl).string())
        .col(ColumnDef::new(Lessons::Content).string())
        .col(ColumnDef::new(Lessons::Position).integer().not_null().default(0))
        .col(ColumnDef::new(Lessons::CreatedAtMs).big_integer().not_null())
        .foreign_key(
            ForeignKey::create()
                .from(Lessons::Table, Lessons::CourseId)
                .to(Courses::Table, Courses::Id)
                .on_delete(ForeignKeyAction::Cascade),
        )
        .to_string(SqliteQueryBuilder)
}

pub fn create_enrollments_table() -> String {
    Table::create()
        .table(Enrollments::Table)
        .if_not_exists()
        .col(ColumnDef::new(Enrollments::Id).string().primary_key())
        .col(ColumnDef::new(Enrollments::UserId).string().not_null())
        .col(ColumnDef::new(Enrollments::CourseId).string().not_null())
        .col(ColumnDef::new(Enrollments::MeetLink).string())
        .col(ColumnDef::new(Enrollments::EnrolledAtMs).big_integer().not_null())
        .foreign_key(
            ForeignKey::create()
                .from(Enrollments::Table, Enrollments::UserId)
                .to(Users::Table, Users::Id)
                .on_delete(ForeignKeyAction::Cascade),
        )
        .foreign_key(
            ForeignKey::create()
                .from(Enrollments::Table, Enrollments::CourseId)
                .to(Courses::Table, Courses::Id)
                .on_delete(ForeignKeyAction::Cascade),
        )
        .to_string(SqliteQueryBuilder)
}

pub fn create_appointments_table() -> String {
    Table::create()
        .table(Appointments::Table)
        .if_not_exists()
        .col(ColumnDef::new(Appointments::Id).string().primary_key())
        .col(ColumnDef::new(Appointments::EnrollmentId).string().not_null())
        .col(ColumnDef::new(Appointments::DayOfWeek).string().not_null())
        .col(ColumnDef::new(Appointments::StartTime).string().not_null())
        .foreign_key(
            ForeignKey::create()
                .from(Appointments::Table, Appointments::EnrollmentId)
                .to(Enrollments::Table, Enrollments::Id)
                .on_delete(ForeignKeyAction::Cascade),
        )
        .to_string(SqliteQueryBuilder)
}

pub fn create_user_progress_table() -> String {
    Table::create()
        .table(UserProgress::Table)
        .if_not_exists()
        .col(ColumnDef::new(UserProgress::Id).string().primary_key())
        .col(ColumnDef::new(UserProgress::UserId).string().not_null())
        .col(ColumnDef::new(UserProgress::LessonId).string().not_null())
        .col(ColumnDef::new(UserProgress::Completed).integer().not_null().default(1))
        .col(ColumnDef::new(UserProgress::UpdatedAtMs).big_integer().not_null())
        .foreign_key(
            ForeignKey::create()
                .from(UserProgress::Table, UserProgress::UserId)
                .to(Users::Table, Users::Id)
                .on_delete(ForeignKeyAction::Cascade),
        )
        .foreign_key(
            ForeignKey::create()
                .from(UserProgress::Table, UserProgress::LessonId)
                .to(Lessons::Table, Lessons::Id)
                .on_delete(ForeignKeyAction::Cascade),
        )
        .to_string(SqliteQueryBuilder)
}

pub fn create_materials_table() -> String {
    Table::create()
        .table(Materials::Table)
        .if_not_exists()
        .col(ColumnDef::new(Materials::Id).string().primary_key())
        .col(ColumnDef::new(Materials::LessonId).string().not_null())
        .col(ColumnDef::new(Materials::Title).string().not_null())
        .col(ColumnDef::new(Materials::FileUrl).string().not_null())
        .col(ColumnDef::new(Materials::CreatedAtMs).big_integer().not_null())
        .foreign_key(
            ForeignKey::create()
                .from(Materials::Table, Materials::LessonId)
                .to(Lessons::Table, Lessons::Id)
                .on_delete(ForeignKeyAction::Cascade),
        )
        .to_string(SqliteQueryBuilder)
}

pub fn create_material_progress_table() -> String {
    Table::create()
        .table(MaterialProgress::Table)
        .if_not_exists()
        .col(ColumnDef::new(MaterialProgress::UserId).string().not_null())
        .col(ColumnDef::new(MaterialProgress::MaterialId).string().not_null())
        .col(ColumnDef::new(MaterialProgress::Completed).integer().not_null().default(1))
        .col(ColumnDef::new(MaterialProgress::UpdatedAtMs).big_integer().not_null())
        .foreign_key(
            ForeignKey::create()
                .from(MaterialProgress::Table, MaterialProgress::UserId)
                .to(Users::Table, Users::Id)
                .on_delete(ForeignKeyAction::Cascade),
        )
        .foreign_key(
            ForeignKey::create()
                .from(MaterialProgress::Table, MaterialProgress::MaterialId)
                .to(Materials::Table, Materials::Id)
                .on_delete(ForeignKeyAction::Cascade),
        )
        .to_string(SqliteQueryBuilder)
}

pub fn create_exams_table() -> String {
    Table::create()
        .table(Exams::Table)
        .if_not_exists()
        .col(ColumnDef::new(Exams::Id).string().primary_key())
        .col(ColumnDef::new(Exams::LessonId).string().not_null())
        .col(ColumnDef::new(Exams::Title).string().not_null())
        .col(ColumnDef::new(Exams::CreatedAtMs).big_integer().not_null())
        .foreign_key(
            ForeignKey::create()
                .from(Exams::Table, Exams::LessonId)
                .to(Lessons::Table, Lessons::Id)
                .on_delete(ForeignKeyAction::Cascade),
        )
        .to_string(SqliteQueryBuilder)
}

pub fn create_questions_table() -> String {
    Table::create()
        .table(Questions::Table)
        .if_not_exists()
        .col(ColumnDef::new(Questions::Id).string().primary_key())
        .col(ColumnDef::new(Questions::ExamId).string().not_null())
        .col(ColumnDef::new(Questions::Text).string().not_null())
        .col(ColumnDef::new(Questions::Position).integer().not_null().default(0))
        .foreign_key(
            ForeignKey::create()
                .from(Questions::Table, Questions::ExamId)
                .to(Exams::Table, Exams::Id)
                .on_delete(ForeignKeyAction::Cascade),
        )
        .to_string(SqliteQueryBuilder)
}

pub fn create_question_options_table() -> String {
    Table::create()
        .table(QuestionOptions::Table)
        .if_not_exists()
        .col(ColumnDef::new(QuestionOptions::Id).string().primary_key())
        .col(ColumnDef::new(QuestionOptions::QuestionId).string().not_null())
        .col(ColumnDef::new(QuestionOptions::Text).string().not_null())
        .col(ColumnDef::new(QuestionOptions::IsCorrect).integer().not_null().default(0))
        .foreign_key(
            ForeignKey::create()
                .from(QuestionOptions::Table, QuestionOptions::QuestionId)
                .to(Questions::Table, Questions::Id)
                .on_delete(ForeignKeyAction::Cascade),
        )
        .to_string(SqliteQueryBuilder)
}

pub fn create_exam_results_table() -> String {
    Table::create()
        .table(ExamResults::Table)
        .if_not_exists()
        .col(ColumnDef::new(ExamResults::Id).string().primary_key())
        .col(ColumnDef::new(ExamResults::ExamId).string().not_null())
        .col(ColumnDef::new(ExamResults::UserId).string().not_null())
        .col(ColumnDef::new(ExamResults::TextAnswer).string())
        .col(ColumnDef::new(ExamResults::FileUrl).string())
        .col(ColumnDef::new(ExamResults::Score).double())
        .col(ColumnDef::new(ExamResults::Status).string().not_null())
        .col(ColumnDef::new(ExamResults::SubmittedAtMs).big_integer().not_null())
        .col(ColumnDef::new(ExamResults::GradedAtMs).big_integer())
        .foreign_key(
            ForeignKey::create()
                .from(ExamResults::Table, ExamResults::ExamId)
                .to(Exams::Table, Exams::Id)
                .on_delete(ForeignKeyAction::Cascade),
        )
        .foreign_key(
            ForeignKey::create()
                .from(ExamResults::Table, ExamResults::UserId)
                .to(Users::Table, Users::Id)
                .on_delete(ForeignKeyAction::Cascade),
        )
        .to_string(SqliteQueryBuilder)
}

pub fn create_assignments_table() -> String {
    Table::create()
        .table(Assignments::Table)
        .if_not_exists()
        .col(ColumnDef::new(Assignments::Id).string().primary_key())
        .col(ColumnDef::new(Assignments::LessonId).string().not_null())
        .col(ColumnDef::new(Assignments::Title).string().not_null())
        .col(ColumnDef::new(Assignments::Description).string())
        .col(ColumnDef::new(Assignments::RequiresFile).integer().not_null().default(1))
        .col(ColumnDef::new(Assignments::CreatedAtMs).big_integer().not_null())
        .foreign_key(
            ForeignKey::create()
                .from(Assignments::Table, Assignments::LessonId)
                .to(Lessons::Table, Lessons::Id)
                .on_delete(ForeignKeyAction::Cascade),
        )
        .to_string(SqliteQueryBuilder)
}

pub fn create_submissions_table() -> String {
    Table::create()
        .table(Submissions::Table)
        .if_not_exists()
        .col(ColumnDef::new(Submissions::Id).string().primary_key())
        .col(ColumnDef::new(Submissions::AssignmentId).string().not_null())
        .col(ColumnDef::new(Submissions::UserId).string().not_null())
        .col(ColumnDef::new(Submissions::Content).string())
        .col(ColumnDef::new(Submissions::FileUrl).string())
        .col(ColumnDef::new(Submissions::Score).double())
        .col(ColumnDef::new(Submissions::Status).string().not_null())
        .col(ColumnDef::new(Submissions::SubmittedAtMs).big_integer().not_null())
        .col(ColumnDef::new(Submissions::GradedAtMs).big_integer())
        .foreign_key(
            ForeignKey::create()
                .from(Submissions::Table, Submissions::AssignmentId)
                .to(Assignments::Table, Assignments::Id)
                .on_delete(ForeignKeyAction::Cascade),
        )
        .foreign_key(
            ForeignKey::create()
                .from(Submissions::Table, Submissions::UserId)
                .to(Users::Table, Users::Id)
                .on_delete(ForeignKeyAction::Cascade),
        )
        .to_string(SqliteQueryBuilder)
}

pub fn create_announcements_table() -> String {
    Table::create()
        .table(Announcements::Table)
        .if_not_exists()
        .col(ColumnDef::new(Announcements::Id).string().primary_key())
        .col(ColumnDef::new(Announcements::CourseId).string().not_null())
        .col(ColumnDef::new(Announcements::Title).string().not_null())
        .col(ColumnDef::new(Announcements::Body).string().not_null())
        .col(ColumnDef::new(Announcements::CreatedAtMs).big_integer().not_null())
        .foreign_key(
            ForeignKey::create()
                .from(Announcements::Table, Announcements::CourseId)
                .to(Courses::Table, Courses::Id)
                .on_delete(ForeignKeyAction::Cascade),
        )
        .to_string(SqliteQueryBuilder)
}

pub fn create_announcement_views_table() -> String {
    Table::create()
        .table(AnnouncementViews::Table)
        .if_not_exists()
        .col(ColumnDef::new(AnnouncementViews::AnnouncementId).string().not_null())
        .col(ColumnDef::new(AnnouncementViews::UserId).string().not_null())
        .col(ColumnDef::new(AnnouncementViews::ViewedAtMs).big_integer().not_null())
        .foreign_key(
            ForeignKey::create()
                .from(AnnouncementViews::Table, AnnouncementViews::AnnouncementId)
                .to(Announcements::Table, Announcements::Id)
                .on_delete(ForeignKeyAction::Cascade),
        )
        .foreign_key(
            ForeignKey::create()
                .from(AnnouncementViews::Table, AnnouncementViews::UserId)
                .to(Users::Table, Users::Id)
                .on_delete(ForeignKeyAction::Cascade),
        )
        .to_string(SqliteQueryBuilder)
}

fn unique_pair_index(name: &str) -> IndexCreateStatement {
    Index::create().if_not_exists().unique().name(name).to_owned()
}

/// CREATE UNIQUE INDEX IF NOT EXISTS idx_enrollments_user_course ON enrollments(user_id, course_id)
pub fn create_enrollments_unique_index() -> String {
    unique_pair_index("idx_enrollments_user_course")
        .table(Enrollments::Table)
        .col(Enrollments::UserId)
        .col(Enrollments::CourseId)
        .to_string(SqliteQueryBuilder)
}

/// CREATE UNIQUE INDEX IF NOT EXISTS idx_user_progress_user_lesson ON user_progress(user_id, lesson_id)
pub fn create_user_progress_unique_index() -> String {
    unique_pair_index("idx_user_progress_user_lesson")
        .table(UserProgress::Table)
        .col(UserProgress::UserId)
        .col(UserProgress::LessonId)
        .to_string(SqliteQueryBuilder)
}

/// CREATE UNIQUE INDEX IF NOT EXISTS idx_material_progress_user_material ON material_progress(user_id, material_id)
pub fn create_material_progress_unique_index() -> String {
    unique_pair_index("idx_material_progress_user_material")
        .table(MaterialProgress::Table)
        .col(MaterialProgress::UserId)
        .col(MaterialProgress::MaterialId)
        .to_string(SqliteQueryBuilder)
}

/// CREATE UNIQUE INDEX IF NOT EXISTS idx_exam_results_exam_user ON exam_results(exam_id, user_id)
pub fn create_exam_results_unique_index() -> String {
    unique_pair_index("idx_exam_results_exam_user")
        .table(ExamResults::Table)
        .col(ExamResults::ExamId)
        .col(ExamResults::UserId)
        .to_string(SqliteQueryBuilder)
}

/// CREATE UNIQUE INDEX IF NOT EXISTS idx_announcement_views_pair ON announcement_views(announcement_id, user_id)
pub fn create_announcement_views_unique_index() -> String {
    unique_pair_index("idx_announcement_views_pair")
        .table(AnnouncementViews::Table)
        .col(AnnouncementViews::AnnouncementId)
        .col(AnnouncementViews::UserId)
        .to_string(SqliteQueryBuilder)
}

/// CREATE INDEX IF NOT EXISTS idx_lessons_course_position ON lessons(course_id, position)
pub fn create_lessons_course_index() -> String {
    Index::create()
        .if_not_exists()
        .name("idx_lessons_course_position")
        .table(Lessons::Table)
        .col(Lessons::CourseId)
        .col(Lessons::Position)
        .to_string(SqliteQueryBuilder)
}

/// All statements in creation order; tables before the indexes on them
pub fn all_statements() -> Vec<String> {
    vec![
        create_metadata_table(),
        create_users_table(),
        create_sessions_table(),
        create_teachers_table(),
        create_courses_table(),
        create_lessons_table(),
        create_enrollments_table(),
        create_appointments_table(),
        create_user_progress_table(),
        create_materials_table(),
        create_material_progress_table(),
        create_exams_table(),
        create_questions_table(),
        create_question_options_table(),
        create_exam_results_table(),
        create_assignments_table(),
        create_submissions_table(),
        create_announcements_table(),
        create_announcement_views_table(),
        create_enrollments_unique_index(),
        create_user_progress_unique_index(),
        create_material_progress_unique_index(),
        create_exam_results_unique_index(),
        create_announcement_views_unique_index(),
        create_lessons_course_index(),
    ]
}
