use rand::Rng;

/// Expected database schema version
/// All databases must use this version for compatibility
pub const EXPECTED_DB_VERSION: &str = "2";

/// bcrypt work factor for stored passwords
pub const DEFAULT_PASSWORD_COST: u32 = 12;

/// Work factors bcrypt accepts
pub const PASSWORD_COST_RANGE: std::ops::RangeInclusive<u32> = 4..=31;

/// Longest session lifetime the config accepts (ten years)
pub const MAX_SESSION_TTL_HOURS: i64 = 24 * 365 * 10;

/// Default number of lessons a learner aims to finish per week
pub const DEFAULT_WEEKLY_GOAL: u32 = 5;

/// Number of recently completed lessons shown on the dashboard
pub const RECENT_ACTIVITY_LIMIT: usize = 5;

/// Highest score a teacher can award
pub const MAX_SCORE: f64 = 100.0;

/// Generate a unique row id with a table prefix, e.g. `crs_Xb3kq0ZP1mAa`
pub fn generate_id(prefix: &str) -> String {
    format!(
        "{}_{}",
        prefix,
        rand::thread_rng()
            .sample_iter(&rand::distributions::Alphanumeric)
            .take(12)
            .map(char::from)
            .collect::<String>()
    )
}

/// Current wall clock in milliseconds since the epoch
pub fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_id_has_prefix_and_length() {
        let id = generate_id("les");
        assert!(id.starts_with("les_"));
        assert_eq!(id.len(), 16);
    }

    #[test]
    fn test_generate_id_is_unique() {
        assert_ne!(generate_id("x"), generate_id("x"));
    }
}
