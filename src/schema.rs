use sea_query::Iden;

/// Metadata table - key-value store for database configuration
#[derive(Iden)]
pub enum Metadata {
    Table,
    Key,
    Value,
}

/// Accounts (learners, teachers and admins)
#[derive(Iden)]
pub enum Users {
    Table,
    Id,
    Name,
    Email,
    PasswordHash,
    Role,
    Image,
    CreatedAtMs,
}

/// Bearer tokens issued at login
#[derive(Iden)]
pub enum Sessions {
    Table,
    Token,
    UserId,
    CreatedAtMs,
    ExpiresAtMs,
}

/// Public instructor profiles, optionally linked to an account
#[derive(Iden)]
pub enum Teachers {
    Table,
    Id,
    UserId,
    Name,
    Title,
    Bio,
    Image,
    Expertise,
    CreatedAtMs,
}

#[derive(Iden)]
pub enum Courses {
    Table,
    Id,
    Title,
    Description,
    Price,
    Image,
    Category,
    Level,
    TeacherId,
    CreatedAtMs,
}

#[derive(Iden)]
pub enum Lessons {
    Table,
    Id,
    CourseId,
    Title,
    VideoUrl,
    Content,
    Position,
    CreatedAtMs,
}

/// Join of users and courses, unique on (user_id, course_id)
#[derive(Iden)]
pub enum Enrollments {
    Table,
    Id,
    UserId,
    CourseId,
    MeetLink,
    EnrolledAtMs,
}

/// Weekly live-class slots attached to an enrollment
#[derive(Iden)]
pub enum Appointments {
    Table,
    Id,
    EnrollmentId,
    DayOfWeek,
    StartTime,
}

/// Completed lessons, unique on (user_id, lesson_id)
#[derive(Iden)]
pub enum UserProgress {
    Table,
    Id,
    UserId,
    LessonId,
    Completed,
    UpdatedAtMs,
}

#[derive(Iden)]
pub enum Materials {
    Table,
    Id,
    LessonId,
    Title,
    FileUrl,
    CreatedAtMs,
}

#[derive(Iden)]
pub enum MaterialProgress {
    Table,
    UserId,
    MaterialId,
    Completed,
    UpdatedAtMs,
}

#[derive(Iden)]
pub enum Exams {
    Table,
    Id,
    LessonId,
    Title,
    CreatedAtMs,
}

#[derive(Iden)]
pub enum Questions {
    Table,
    Id,
    ExamId,
    Text,
    Position,
}

/// Multiple-choice options of a question
#[derive(Iden)]
pub enum QuestionOptions {
    Table,
    Id,
    QuestionId,
    Text,
    IsCorrect,
}

/// One row per (exam, user)
#[derive(Iden)]
pub enum ExamResults {
    Table,
    Id,
    ExamId,
    UserId,
    TextAnswer,
    FileUrl,
    Score,
    Status,
    SubmittedAtMs,
    GradedAtMs,
}

#[derive(Iden)]
pub enum Assignments {
    Table,
    Id,
    LessonId,
    Title,
    Description,
    RequiresFile,
    CreatedAtMs,
}

#[derive(Iden)]
pub enum Submissions {
    Table,
    Id,
    AssignmentId,
    UserId,
    Content,
    FileUrl,
    Score,
    Status,
    SubmittedAtMs,
    GradedAtMs,
}

#[derive(Iden)]
pub enum Announcements {
    Table,
    Id,
    CourseId,
    Title,
    Body,
    CreatedAtMs,
}

#[derive(Iden)]
pub enum AnnouncementViews {
    Table,
    AnnouncementId,
    UserId,
    ViewedAtMs,
}
