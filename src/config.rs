use std::net::SocketAddr;
use std::path::PathBuf;

/// Application-level constants
pub const APP_NAME: &str = "AcmeMedical";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

pub const DEFAULT_BIND: &str = "127.0.0.1:8080";
pub const DEFAULT_ADMIN_USER: &str = "admin";

const ENV_DB: &str = "ACME_MEDICAL_DB";
const ENV_BIND: &str = "ACME_MEDICAL_BIND";
const ENV_ADMIN_USER: &str = "ACME_MEDICAL_ADMIN_USER";
const ENV_ADMIN_PASSWORD: &str = "ACME_MEDICAL_ADMIN_PASSWORD";
const ENV_PHYSICIAN_PASSWORD: &str = "ACME_MEDICAL_PHYSICIAN_PASSWORD";

/// Get the application data directory
/// ~/AcmeMedical/ on all platforms; the working directory if no home is known
pub fn app_data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_NAME)
}

/// Default location of the SQLite database
pub fn database_path() -> PathBuf {
    app_data_dir().join("acme_medical.db")
}

/// Log filter used when `RUST_LOG` is unset
pub fn default_log_filter() -> &'static str {
    "acme_medical_lib=info,tower_http=warn"
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {var}: {reason}")]
    InvalidValue { var: &'static str, reason: String },
}

/// Runtime settings, read once at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_path: PathBuf,
    pub bind: SocketAddr,
    pub admin_user: String,
    /// Bootstrap administrator password; no administrator is created when unset.
    pub admin_password: Option<String>,
    /// Enables automatic login provisioning for new physicians.
    pub physician_user_password: Option<String>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Build from any variable source; empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |var: &str| lookup(var).filter(|v| !v.trim().is_empty());

        let bind_raw = get(ENV_BIND).unwrap_or_else(|| DEFAULT_BIND.to_string());
        let bind = bind_raw
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidValue {
                var: ENV_BIND,
                reason: format!("{bind_raw}: {e}"),
            })?;

        Ok(Self {
            database_path: get(ENV_DB).map(PathBuf::from).unwrap_or_else(database_path),
            bind,
            admin_user: get(ENV_ADMIN_USER).unwrap_or_else(|| DEFAULT_ADMIN_USER.to_string()),
            admin_password: get(ENV_ADMIN_PASSWORD),
            physician_user_password: get(ENV_PHYSICIAN_PASSWORD),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |var| map.get(var).cloned()
    }

    #[test]
    fn app_data_dir_ends_with_app_name() {
        assert!(app_data_dir().ends_with("AcmeMedical"));
    }

    #[test]
    fn database_under_app_data() {
        let db = database_path();
        assert!(db.starts_with(app_data_dir()));
        assert!(db.ends_with("acme_medical.db"));
    }

    #[test]
    fn app_version_matches_cargo() {
        assert_eq!(APP_VERSION, "0.1.0");
    }

    #[test]
    fn defaults_apply_when_unset() {
        let cfg = AppConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(cfg.bind, DEFAULT_BIND.parse::<SocketAddr>().unwrap());
        assert_eq!(cfg.database_path, database_path());
        assert_eq!(cfg.admin_user, "admin");
        assert!(cfg.admin_password.is_none());
        assert!(cfg.physician_user_password.is_none());
    }

    #[test]
    fn values_read_from_environment() {
        let cfg = AppConfig::from_lookup(lookup(&[
            ("ACME_MEDICAL_DB", "/tmp/acme.db"),
            ("ACME_MEDICAL_BIND", "0.0.0.0:9000"),
            ("ACME_MEDICAL_ADMIN_USER", "root"),
            ("ACME_MEDICAL_ADMIN_PASSWORD", "s3cret"),
            ("ACME_MEDICAL_PHYSICIAN_PASSWORD", "welcome"),
        ]))
        .unwrap();
        assert_eq!(cfg.database_path, PathBuf::from("/tmp/acme.db"));
        assert_eq!(cfg.bind.port(), 9000);
        assert_eq!(cfg.admin_user, "root");
        assert_eq!(cfg.admin_password.as_deref(), Some("s3cret"));
        assert_eq!(cfg.physician_user_password.as_deref(), Some("welcome"));
    }

    #[test]
    fn blank_values_count_as_unset() {
        let cfg = AppConfig::from_lookup(lookup(&[("ACME_MEDICAL_ADMIN_PASSWORD", "  ")])).unwrap();
        assert!(cfg.admin_password.is_none());
    }

    #[test]
    fn bad_bind_address_is_rejected() {
        let err = AppConfig::from_lookup(lookup(&[("ACME_MEDICAL_BIND", "not-an-addr")]))
            .unwrap_err();
        assert!(err.to_string().contains("ACME_MEDICAL_BIND"));
    }
}
