use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::constants::{
    DEFAULT_PASSWORD_COST, DEFAULT_WEEKLY_GOAL, MAX_SESSION_TTL_HOURS, PASSWORD_COST_RANGE,
};
use crate::error::DynError;

fn default_api_port() -> u16 {
    3000
}

fn default_session_ttl_hours() -> i64 {
    720
}

fn default_weekly_goal() -> u32 {
    DEFAULT_WEEKLY_GOAL
}

fn default_live_session_minutes() -> u32 {
    60
}

fn default_password_cost() -> u32 {
    DEFAULT_PASSWORD_COST
}

/// Server configuration file structure
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Path to the SQLite database file (required)
    pub database_path: PathBuf,
    /// API server port (default: 3000)
    #[serde(default = "default_api_port")]
    pub api_port: u16,
    /// Lifetime of a login session in hours (default: 720 = 30 days)
    #[serde(default = "default_session_ttl_hours")]
    pub session_ttl_hours: i64,
    /// Lessons per week shown as the learner's goal on the dashboard (default: 5)
    #[serde(default = "default_weekly_goal")]
    pub weekly_goal: u32,
    /// Length of a scheduled live session in minutes (default: 60)
    #[serde(default = "default_live_session_minutes")]
    pub live_session_minutes: u32,
    /// bcrypt cost for new password hashes (default: 12)
    #[serde(default = "default_password_cost")]
    pub password_cost: u32,
    /// Bootstrap admin account (maps to [admin] section in TOML)
    pub admin: Option<AdminConfig>,
}

/// Bootstrap admin configuration (maps to [admin] section in TOML)
#[derive(Debug, Clone, Deserialize)]
pub struct AdminConfig {
    /// Login email of the admin account
    pub email: String,
    /// Display name (default: "Administrator")
    pub name: Option<String>,
    /// Credential profile name to look up the password from ~/.config/course_portal/credentials.toml
    pub credential_profile: String,
}

/// Settings the request handlers need at runtime
#[derive(Debug, Clone)]
pub struct Settings {
    pub session_ttl_hours: i64,
    pub weekly_goal: u32,
    pub live_session_minutes: u32,
    pub password_cost: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            session_ttl_hours: default_session_ttl_hours(),
            weekly_goal: default_weekly_goal(),
            live_session_minutes: default_live_session_minutes(),
            password_cost: default_password_cost(),
        }
    }
}

impl ServerConfig {
    /// Read and validate a TOML config file
    pub fn load(path: &Path) -> Result<Self, DynError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file {}: {}", path.display(), e))?;
        let config: ServerConfig = toml::from_str(&content)
            .map_err(|e| format!("Failed to parse config file {}: {}", path.display(), e))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the server cannot run with
    pub fn validate(&self) -> Result<(), String> {
        if self.session_ttl_hours <= 0 || self.session_ttl_hours > MAX_SESSION_TTL_HOURS {
            return Err(format!(
                "session_ttl_hours must be between 1 and {}",
                MAX_SESSION_TTL_HOURS
            ));
        }
        if !PASSWORD_COST_RANGE.contains(&self.password_cost) {
            return Err(format!(
                "password_cost must be between {} and {}",
                PASSWORD_COST_RANGE.start(),
                PASSWORD_COST_RANGE.end()
            ));
        }
        if self.weekly_goal == 0 {
            return Err("weekly_goal must be at least 1".to_string());
        }
        if self.live_session_minutes == 0 || self.live_session_minutes >= 24 * 60 {
            return Err("live_session_minutes must be between 1 and 1439".to_string());
        }
        if let Some(admin) = &self.admin {
            if !admin.email.contains('@') {
                return Err(format!("[admin] email '{}' is not valid", admin.email));
            }
            if admin.credential_profile.trim().is_empty() {
                return Err("[admin] credential_profile must not be empty".to_string());
            }
        }
        Ok(())
    }

    pub fn settings(&self) -> Settings {
        Settings {
            session_ttl_hours: self.session_ttl_hours,
            weekly_goal: self.weekly_goal,
            live_session_minutes: self.live_session_minutes,
            password_cost: self.password_cost,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_applied() {
        let config: ServerConfig = toml::from_str(r#"database_path = "portal.sqlite""#).unwrap();
        assert_eq!(config.api_port, 3000);
        assert_eq!(config.session_ttl_hours, 720);
        assert_eq!(config.weekly_goal, 5);
        assert_eq!(config.live_session_minutes, 60);
        assert_eq!(config.password_cost, 12);
        assert!(config.admin.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_admin_section() {
        let config: ServerConfig = toml::from_str(
            r#"
database_path = "portal.sqlite"
api_port = 8080

[admin]
email = "admin@example.com"
credential_profile = "main"
"#,
        )
        .unwrap();
        let admin = config.admin.as_ref().unwrap();
        assert_eq!(admin.email, "admin@example.com");
        assert_eq!(admin.credential_profile, "main");
        assert!(admin.name.is_none());
        assert_eq!(config.api_port, 8080);
    }

    #[test]
    fn test_validate_rejects_zero_goal() {
        let config: ServerConfig = toml::from_str(
            r#"
database_path = "portal.sqlite"
weekly_goal = 0
"#,
        )
        .unwrap();
        assert!(config.validate().unwrap_err().contains("weekly_goal"));
    }

    #[test]
    fn test_validate_rejects_bad_admin_email() {
        let config: ServerConfig = toml::from_str(
            r#"
database_path = "portal.sqlite"

[admin]
email = "nobody"
credential_profile = "main"
"#,
        )
        .unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_bounds_session_ttl() {
        let config: ServerConfig = toml::from_str(
            r#"
database_path = "portal.sqlite"
session_ttl_hours = 9223372036854775807
"#,
        )
        .unwrap();
        assert!(config.validate().unwrap_err().contains("session_ttl_hours"));

        let config: ServerConfig = toml::from_str(
            r#"
database_path = "portal.sqlite"
session_ttl_hours = 87600
"#,
        )
        .unwrap();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_password_cost_out_of_range() {
        for cost in [3, 32] {
            let config: ServerConfig =
                toml::from_str(&format!("database_path = \"portal.sqlite\"\npassword_cost = {}", cost))
                    .unwrap();
            assert!(config.validate().unwrap_err().contains("password_cost"));
        }
    }
}
