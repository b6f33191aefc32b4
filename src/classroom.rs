//! Lesson media, reading materials, course announcements and live sessions.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::SqlitePool;
use std::collections::{HashMap, HashSet};
use url::Url;

use crate::constants::{generate_id, now_ms};
use crate::enrollment::{appointments_for, find_course, find_enrollment};
use crate::error::{ApiError, ApiResult};
use crate::models::{Announcement, Material};
use crate::progress::find_lesson;
use crate::queries::{announcements, materials};
use crate::schedule::{is_live, minutes_until_start, ScheduleSlot, WeeklySlot};

const YOUTUBE_EMBED: &str = "https://www.youtube.com/embed/";
const VIMEO_EMBED: &str = "https://player.vimeo.com/video/";

fn youtube_id(url: &Url) -> Option<String> {
    let host = url.host_str()?.trim_start_matches("www.").trim_start_matches("m.");
    let id = match host {
        "youtu.be" => url.path_segments()?.next().map(str::to_string),
        "youtube.com" | "youtube-nocookie.com" => {
            let mut segments = url.path_segments()?;
            match segments.next() {
                Some("embed") | Some("shorts") | Some("live") => segments.next().map(str::to_string),
                _ => url
                    .query_pairs()
                    .find(|(k, _)| k == "v")
                    .map(|(_, v)| v.into_owned()),
            }
        }
        _ => None,
    };
    id.filter(|id| !id.is_empty())
}

fn vimeo_id(url: &Url) -> Option<String> {
    let host = url.host_str()?.trim_start_matches("www.");
    if host != "vimeo.com" && host != "player.vimeo.com" {
        return None;
    }
    url.path_segments()?
        .find(|s| !s.is_empty() && s.chars().all(|c| c.is_ascii_digit()))
        .map(str::to_string)
}

/// Rewrite a YouTube or Vimeo link into its embeddable player URL.
///
/// Other links come back unchanged; blank input yields `None`.
pub fn embed_url(video_url: &str) -> Option<String> {
    let trimmed = video_url.trim();
    if trimmed.is_empty() {
        return None;
    }
    let Ok(parsed) = Url::parse(trimmed) else {
        return Some(trimmed.to_string());
    };
    if let Some(id) = youtube_id(&parsed) {
        return Some(format!("{}{}?rel=0&modestbranding=1", YOUTUBE_EMBED, id));
    }
    if let Some(id) = vimeo_id(&parsed) {
        return Some(format!("{}{}", VIMEO_EMBED, id));
    }
    Some(trimmed.to_string())
}

/// In-browser preview for documents served from hosts that refuse framing
pub fn document_preview_url(file_url: &str) -> String {
    format!(
        "https://docs.google.com/viewer?url={}&embedded=true",
        urlencoding::encode(file_url)
    )
}

fn require_http_url(value: &str, field: &str) -> ApiResult<String> {
    let value = value.trim();
    match Url::parse(value) {
        Ok(u) if u.scheme() == "http" || u.scheme() == "https" => Ok(value.to_string()),
        _ => Err(ApiError::bad_request(format!(
            "{} must be an absolute http(s) URL",
            field
        ))),
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MaterialView {
    #[serde(flatten)]
    pub material: Material,
    pub preview_url: String,
    pub read: bool,
}

pub async fn create_material(pool: &SqlitePool, lesson_id: &str, title: &str, file_url: &str) -> ApiResult<Material> {
    let title = title.trim();
    if title.is_empty() {
        return Err(ApiError::bad_request("Title is required"));
    }
    let file_url = require_http_url(file_url, "File URL")?;
    find_lesson(pool, lesson_id).await?;
    let id = generate_id("mat");
    sqlx::query(&materials::insert(&id, lesson_id, title, &file_url, now_ms()))
        .execute(pool)
        .await?;
    find_material(pool, &id).await
}

pub async fn find_material(pool: &SqlitePool, material_id: &str) -> ApiResult<Material> {
    sqlx::query_as(&materials::select_by_id(material_id))
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| ApiError::not_found("Material"))
}

pub async fn materials_for_lesson(pool: &SqlitePool, lesson_id: &str, user_id: &str) -> ApiResult<Vec<MaterialView>> {
    let rows: Vec<Material> = sqlx::query_as(&materials::select_by_lesson(lesson_id))
        .fetch_all(pool)
        .await?;
    let read: Vec<String> = sqlx::query_scalar(&materials::select_read_material_ids(user_id))
        .fetch_all(pool)
        .await?;
    let read: HashSet<String> = read.into_iter().collect();
    Ok(rows
        .into_iter()
        .map(|material| MaterialView {
            preview_url: document_preview_url(&material.file_url),
            read: read.contains(&material.id),
            material,
        })
        .collect())
}

pub async fn mark_material_read(pool: &SqlitePool, user_id: &str, material_id: &str) -> ApiResult<()> {
    find_material(pool, material_id).await?;
    sqlx::query(&materials::upsert_read(user_id, material_id, now_ms()))
        .execute(pool)
        .await?;
    Ok(())
}

#[derive(Debug, Clone, Serialize)]
pub struct AnnouncementView {
    #[serde(flatten)]
    pub announcement: Announcement,
    pub viewed: bool,
    pub viewed_at_ms: Option<i64>,
}

pub async fn create_announcement(pool: &SqlitePool, course_id: &str, title: &str, body: &str) -> ApiResult<Announcement> {
    let (title, body) = (title.trim(), body.trim());
    if title.is_empty() || body.is_empty() {
        return Err(ApiError::bad_request("Title and body are required"));
    }
    find_course(pool, course_id).await?;
    let id = generate_id("ann");
    sqlx::query(&announcements::insert(&id, course_id, title, body, now_ms()))
        .execute(pool)
        .await?;
    sqlx::query_as(&announcements::select_by_id(&id))
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| ApiError::not_found("Announcement"))
}

/// Newest first, each flagged with whether this user has opened it
pub async fn announcements_for_course(
    pool: &SqlitePool,
    course_id: &str,
    user_id: &str,
) -> ApiResult<Vec<AnnouncementView>> {
    find_course(pool, course_id).await?;
    let rows: Vec<Announcement> = sqlx::query_as(&announcements::select_by_course(course_id))
        .fetch_all(pool)
        .await?;
    let views: Vec<(String, i64)> = sqlx::query_as(&announcements::select_views_for_user(user_id))
        .fetch_all(pool)
        .await?;
    let views: HashMap<String, i64> = views.into_iter().collect();
    Ok(rows
        .into_iter()
        .map(|announcement| {
            let viewed_at_ms = views.get(&announcement.id).copied();
            AnnouncementView {
                announcement,
                viewed: viewed_at_ms.is_some(),
                viewed_at_ms,
            }
        })
        .collect())
}

/// Record a view; repeating it refreshes the timestamp
pub async fn mark_announcement_viewed(pool: &SqlitePool, user_id: &str, announcement_id: &str) -> ApiResult<()> {
    let exists: Option<Announcement> = sqlx::query_as(&announcements::select_by_id(announcement_id))
        .fetch_optional(pool)
        .await?;
    if exists.is_none() {
        return Err(ApiError::not_found("Announcement"));
    }
    sqlx::query(&announcements::upsert_view(announcement_id, user_id, now_ms()))
        .execute(pool)
        .await?;
    Ok(())
}

#[derive(Debug, Clone, Serialize)]
pub struct SlotStatus {
    #[serde(flatten)]
    pub slot: ScheduleSlot,
    pub live: bool,
    pub minutes_until_start: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct LiveSessions {
    pub meet_link: Option<String>,
    pub live_now: bool,
    pub slots: Vec<SlotStatus>,
}

/// Meeting link and weekly slots of the learner's enrollment, evaluated at `now`
pub async fn live_sessions(
    pool: &SqlitePool,
    user_id: &str,
    course_id: &str,
    now: DateTime<Utc>,
    duration_mins: u32,
) -> ApiResult<Option<LiveSessions>> {
    let Some(enrollment) = find_enrollment(pool, user_id, course_id).await? else {
        return Ok(None);
    };
    let mut slots = Vec::new();
    for appointment in appointments_for(pool, &enrollment.id).await? {
        let slot = ScheduleSlot {
            day: appointment.day_of_week,
            time: appointment.start_time,
        };
        let weekly = WeeklySlot::parse(&slot).map_err(ApiError::Internal)?;
        slots.push(SlotStatus {
            live: is_live(now, &weekly, duration_mins),
            minutes_until_start: minutes_until_start(now, &weekly),
            slot,
        });
    }
    Ok(Some(LiveSessions {
        live_now: enrollment.meet_link.is_some() && slots.iter().any(|s| s.live),
        meet_link: enrollment.meet_link,
        slots,
    }))
}
