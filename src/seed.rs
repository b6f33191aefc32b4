use log::info;
use sqlx::SqlitePool;

use crate::catalog::{create_course_as_admin, create_lesson, list_courses, NewCourse, NewLesson};
use crate::error::DynError;
use crate::models::CourseSummary;

const SAMPLE_COURSE_TITLE: &str = "Mastering Conversational English";
const SAMPLE_VIDEO: &str = "https://www.youtube.com/embed/dQw4w9WgXcQ";

const SAMPLE_LESSONS: [(&str, &str); 3] = [
    (
        "Introduction to the Course",
        "Welcome to Lamed English! In this lesson, we outline your path to fluency.",
    ),
    (
        "The 5 Core Tenses",
        "Master the tenses that native speakers actually use every day.",
    ),
    (
        "Common Idioms in Business",
        "Learn how to sound professional in meetings and emails.",
    ),
];

/// Insert the sample course with three lessons unless it is already present
pub async fn seed_sample_course(pool: &SqlitePool) -> Result<Option<CourseSummary>, DynError> {
    let existing = list_courses(pool).await?;
    if existing.iter().any(|c| c.course.title == SAMPLE_COURSE_TITLE) {
        info!("Sample course already present, skipping seed");
        return Ok(None);
    }

    let course = create_course_as_admin(
        pool,
        &NewCourse {
            title: SAMPLE_COURSE_TITLE.to_string(),
            description: Some(
                "Take your English from basic to fluent with this native-led course.".to_string(),
            ),
            price: Some(49.99),
            image: None,
            category: None,
            level: None,
            teacher_id: None,
        },
    )
    .await?;

    for (position, (title, content)) in SAMPLE_LESSONS.iter().enumerate() {
        create_lesson(
            pool,
            &NewLesson {
                course_id: course.course.id.clone(),
                title: title.to_string(),
                video_url: Some(SAMPLE_VIDEO.to_string()),
                content: Some(content.to_string()),
                position: Some(position as i64 + 1),
            },
        )
        .await?;
    }

    info!("Seeded sample course {}", course.course.id);
    Ok(Some(course))
}
