use chrono::{DateTime, Datelike, Timelike, Utc, Weekday};
use serde::{Deserialize, Serialize};

const MINUTES_PER_DAY: u32 = 24 * 60;
const MINUTES_PER_WEEK: u32 = 7 * MINUTES_PER_DAY;

/// A weekly live-session slot as submitted by a teacher, e.g. `{"day": "Tue", "time": "18:30"}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleSlot {
    pub day: String,
    pub time: String,
}

/// Parsed form of a [`ScheduleSlot`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeeklySlot {
    pub day: Weekday,
    pub hour: u32,
    pub minute: u32,
}

/// Parse a time string in "HH:MM" format and return (hour, minute)
pub fn parse_time(time_str: &str) -> Result<(u32, u32), String> {
    let parts: Vec<&str> = time_str.split(':').collect();
    if parts.len() != 2 {
        return Err(format!("Invalid time format '{}', expected HH:MM", time_str));
    }
    let hour: u32 = parts[0]
        .parse()
        .map_err(|_| format!("Invalid hour in '{}'", time_str))?;
    let minute: u32 = parts[1]
        .parse()
        .map_err(|_| format!("Invalid minute in '{}'", time_str))?;
    if hour >= 24 || minute >= 60 {
        return Err(format!("Time '{}' out of range", time_str));
    }
    Ok((hour, minute))
}

/// Accepts "Mon", "monday", "TUE" and so on
pub fn parse_weekday(day: &str) -> Result<Weekday, String> {
    day.trim()
        .parse::<Weekday>()
        .map_err(|_| format!("Invalid day '{}', expected Mon..Sun", day))
}

/// Convert time to minutes since midnight
pub fn time_to_minutes(hour: u32, minute: u32) -> u32 {
    hour * 60 + minute
}

/// Check if current time is in the active window
/// Handles windows that wrap past the end of the period (e.g., Sun 23:30 to Mon 00:30)
pub fn is_in_active_window(current_mins: u32, start_mins: u32, end_mins: u32) -> bool {
    if start_mins <= end_mins {
        current_mins >= start_mins && current_mins < end_mins
    } else {
        current_mins >= start_mins || current_mins < end_mins
    }
}

impl WeeklySlot {
    pub fn parse(slot: &ScheduleSlot) -> Result<Self, String> {
        let day = parse_weekday(&slot.day)?;
        let (hour, minute) = parse_time(slot.time.trim())?;
        Ok(WeeklySlot { day, hour, minute })
    }

    /// Minutes since Monday 00:00
    pub fn week_minute(&self) -> u32 {
        self.day.num_days_from_monday() * MINUTES_PER_DAY + time_to_minutes(self.hour, self.minute)
    }

    /// Canonical stored form: ("Mon", "09:05")
    pub fn to_db(&self) -> (String, String) {
        (
            self.day.to_string(),
            format!("{:02}:{:02}", self.hour, self.minute),
        )
    }
}

/// Minutes since Monday 00:00 UTC for a timestamp
pub fn week_minute_of(now: DateTime<Utc>) -> u32 {
    now.weekday().num_days_from_monday() * MINUTES_PER_DAY + time_to_minutes(now.hour(), now.minute())
}

/// Whether a session in this slot is running at `now`
pub fn is_live(now: DateTime<Utc>, slot: &WeeklySlot, duration_mins: u32) -> bool {
    let start = slot.week_minute();
    let end = (start + duration_mins) % MINUTES_PER_WEEK;
    is_in_active_window(week_minute_of(now), start, end)
}

/// Minutes from `now` until the slot next starts (0 if it starts this minute)
pub fn minutes_until_start(now: DateTime<Utc>, slot: &WeeklySlot) -> u32 {
    let current = week_minute_of(now);
    let start = slot.week_minute();
    if current <= start {
        start - current
    } else {
        MINUTES_PER_WEEK - current + start
    }
}

/// Validate and normalise a list of slots, rejecting duplicates
pub fn normalize_slots(slots: &[ScheduleSlot]) -> Result<Vec<WeeklySlot>, String> {
    let mut parsed: Vec<WeeklySlot> = Vec::with_capacity(slots.len());
    for slot in slots {
        let weekly = WeeklySlot::parse(slot)?;
        if parsed.contains(&weekly) {
            let (day, time) = weekly.to_db();
            return Err(format!("Duplicate schedule slot {} {}", day, time));
        }
        parsed.push(weekly);
    }
    parsed.sort_by_key(|s| s.week_minute());
    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn slot(day: &str, time: &str) -> WeeklySlot {
        WeeklySlot::parse(&ScheduleSlot {
            day: day.to_string(),
            time: time.to_string(),
        })
        .unwrap()
    }

    #[test]
    fn test_parse_time() {
        assert_eq!(parse_time("09:05").unwrap(), (9, 5));
        assert!(parse_time("24:00").is_err());
        assert!(parse_time("9").is_err());
        assert!(parse_time("ab:cd").is_err());
    }

    #[test]
    fn test_parse_weekday_variants() {
        assert_eq!(parse_weekday("Mon").unwrap(), Weekday::Mon);
        assert_eq!(parse_weekday("tuesday").unwrap(), Weekday::Tue);
        assert!(parse_weekday("Funday").is_err());
    }

    #[test]
    fn test_to_db_is_canonical() {
        assert_eq!(
            slot("wednesday", "7:5").to_db(),
            ("Wed".to_string(), "07:05".to_string())
        );
    }

    #[test]
    fn test_is_live_inside_and_outside() {
        // 2024-01-02 is a Tuesday
        let s = slot("Tue", "18:00");
        let during = Utc.with_ymd_and_hms(2024, 1, 2, 18, 30, 0).unwrap();
        let before = Utc.with_ymd_and_hms(2024, 1, 2, 17, 59, 0).unwrap();
        let after = Utc.with_ymd_and_hms(2024, 1, 2, 19, 0, 0).unwrap();
        assert!(is_live(during, &s, 60));
        assert!(!is_live(before, &s, 60));
        assert!(!is_live(after, &s, 60));
    }

    #[test]
    fn test_is_live_wraps_end_of_week() {
        // 2024-01-07 is a Sunday, 2024-01-08 a Monday
        let s = slot("Sun", "23:30");
        let monday_early = Utc.with_ymd_and_hms(2024, 1, 8, 0, 15, 0).unwrap();
        assert!(is_live(monday_early, &s, 60));
        let monday_late = Utc.with_ymd_and_hms(2024, 1, 8, 0, 30, 0).unwrap();
        assert!(!is_live(monday_late, &s, 60));
    }

    #[test]
    fn test_minutes_until_start() {
        let s = slot("Mon", "10:00");
        let monday_nine = Utc.with_ymd_and_hms(2024, 1, 8, 9, 0, 0).unwrap();
        assert_eq!(minutes_until_start(monday_nine, &s), 60);
        let monday_eleven = Utc.with_ymd_and_hms(2024, 1, 8, 11, 0, 0).unwrap();
        assert_eq!(minutes_until_start(monday_eleven, &s), MINUTES_PER_WEEK - 60);
    }

    #[test]
    fn test_normalize_slots_sorts_and_rejects_duplicates() {
        let slots = vec![
            ScheduleSlot { day: "Fri".into(), time: "10:00".into() },
            ScheduleSlot { day: "Mon".into(), time: "10:00".into() },
        ];
        let parsed = normalize_slots(&slots).unwrap();
        assert_eq!(parsed[0].day, Weekday::Mon);

        let dupes = vec![
            ScheduleSlot { day: "Mon".into(), time: "10:00".into() },
            ScheduleSlot { day: "monday".into(), time: "10:00".into() },
        ];
        assert!(normalize_slots(&dupes).is_err());
    }
}
