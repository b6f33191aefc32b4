use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::error::DynError;

/// Credentials file structure
///
/// Format:
/// ```toml
/// [admin.profile_name]
/// password = "admin_password_here"
/// ```
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Credentials {
    #[serde(default)]
    pub admin: HashMap<String, CredentialProfile>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CredentialProfile {
    pub password: String,
}

/// Get the default credentials file path: ~/.config/course_portal/credentials.toml
pub fn get_credentials_path() -> Result<PathBuf, DynError> {
    let home = std::env::var("HOME").map_err(|_| "HOME environment variable not set")?;
    Ok(PathBuf::from(home)
        .join(".config")
        .join("course_portal")
        .join("credentials.toml"))
}

/// Load credentials from a file
/// Returns None if the file doesn't exist
pub fn load_credentials_from(path: &Path) -> Result<Option<Credentials>, DynError> {
    if !path.exists() {
        return Ok(None);
    }

    let content = std::fs::read_to_string(path)?;
    let credentials: Credentials = toml::from_str(&content)?;

    Ok(Some(credentials))
}

/// Load credentials from the default location
pub fn load_credentials() -> Result<Option<Credentials>, DynError> {
    load_credentials_from(&get_credentials_path()?)
}

/// Get the admin password for a profile
pub fn get_admin_password(credentials: &Option<Credentials>, profile: &str) -> Result<String, String> {
    match credentials {
        Some(creds) => creds
            .admin
            .get(profile)
            .map(|p| p.password.clone())
            .ok_or_else(|| {
                format!(
                    "Credential profile '[admin.{}]' not found in credentials file",
                    profile
                )
            }),
        None => Err("Credentials file not found".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = load_credentials_from(&dir.path().join("absent.toml")).unwrap();
        assert!(loaded.is_none());
        assert!(get_admin_password(&loaded, "main").is_err());
    }

    #[test]
    fn test_profile_lookup() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("credentials.toml");
        std::fs::write(&path, "[admin.main]\npassword = \"s3cret\"\n").unwrap();

        let loaded = load_credentials_from(&path).unwrap();
        assert_eq!(get_admin_password(&loaded, "main").unwrap(), "s3cret");
        let err = get_admin_password(&loaded, "other").unwrap_err();
        assert!(err.contains("[admin.other]"));
    }
}
