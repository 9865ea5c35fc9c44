//! Configuration module for CloudVault.

use serde::Deserialize;
use std::path::Path;

use crate::{DriveError, Result};

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Path to the log file.
    #[serde(default = "default_log_file")]
    pub file: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_file() -> String {
    "logs/cloudvault.log".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: default_log_file(),
        }
    }
}

/// Display configuration for timestamps in listings.
#[derive(Debug, Clone, Deserialize)]
pub struct DisplayConfig {
    /// Timezone for displaying dates (e.g., "Europe/Berlin", "UTC").
    #[serde(default = "default_timezone")]
    pub timezone: String,
    /// strftime-style format for timestamps.
    #[serde(default = "default_datetime_format")]
    pub datetime_format: String,
}

fn default_timezone() -> String {
    "UTC".to_string()
}

fn default_datetime_format() -> String {
    "%d-%m-%Y %H:%M:%S".to_string()
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            timezone: default_timezone(),
            datetime_format: default_datetime_format(),
        }
    }
}

/// Namespace configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DriveConfig {
    /// Name of the root directory.
    #[serde(default = "default_root_name")]
    pub root_name: String,
    /// Type tag recorded for files without an extension.
    #[serde(default = "default_type_tag")]
    pub default_type_tag: String,
    /// Maximum number of recent-access entries (0 = unbounded).
    #[serde(default)]
    pub recent_capacity: usize,
    /// Maximum length for entry names (in characters).
    #[serde(default = "default_max_name_length")]
    pub max_name_length: usize,
}

fn default_root_name() -> String {
    "Root".to_string()
}

fn default_type_tag() -> String {
    "txt".to_string()
}

fn default_max_name_length() -> usize {
    crate::namespace::MAX_NAME_LENGTH
}

impl Default for DriveConfig {
    fn default() -> Self {
        Self {
            root_name: default_root_name(),
            default_type_tag: default_type_tag(),
            recent_capacity: 0,
            max_name_length: default_max_name_length(),
        }
    }
}

/// Bootstrap administrator account.
#[derive(Debug, Clone, Deserialize)]
pub struct AdminConfig {
    /// Administrator user id.
    #[serde(default = "default_admin_id")]
    pub user_id: String,
    /// Initial administrator password.
    #[serde(default = "default_admin_password")]
    pub password: String,
    /// Security question for password recovery.
    #[serde(default = "default_admin_question")]
    pub security_question: String,
    /// Answer to the security question.
    #[serde(default = "default_admin_answer")]
    pub security_answer: String,
}

fn default_admin_id() -> String {
    "admin".to_string()
}

fn default_admin_password() -> String {
    "password".to_string()
}

fn default_admin_question() -> String {
    "Favorite color?".to_string()
}

fn default_admin_answer() -> String {
    "blue".to_string()
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            user_id: default_admin_id(),
            password: default_admin_password(),
            security_question: default_admin_question(),
            security_answer: default_admin_answer(),
        }
    }
}

/// Password hashing cost.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// Argon2 memory cost in KiB.
    #[serde(default = "default_memory_kib")]
    pub memory_kib: u32,
    /// Argon2 time cost (iterations).
    #[serde(default = "default_iterations")]
    pub iterations: u32,
    /// Argon2 parallelism (lanes).
    #[serde(default = "default_parallelism")]
    pub parallelism: u32,
}

fn default_memory_kib() -> u32 {
    65536
}

fn default_iterations() -> u32 {
    3
}

fn default_parallelism() -> u32 {
    4
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            memory_kib: default_memory_kib(),
            iterations: default_iterations(),
            parallelism: default_parallelism(),
        }
    }
}

impl AuthConfig {
    /// Hash cost described by this section.
    pub fn hash_cost(&self) -> crate::auth::HashCost {
        crate::auth::HashCost {
            memory_kib: self.memory_kib,
            iterations: self.iterations,
            parallelism: self.parallelism,
        }
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Display configuration.
    #[serde(default)]
    pub display: DisplayConfig,
    /// Namespace configuration.
    #[serde(default)]
    pub drive: DriveConfig,
    /// Bootstrap administrator.
    #[serde(default)]
    pub admin: AdminConfig,
    /// Password hashing configuration.
    #[serde(default)]
    pub auth: AuthConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(DriveError::Io)?;
        Self::parse(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|e| DriveError::Config(format!("config parse error: {e}")))
    }

    /// Validate the configuration.
    ///
    /// Returns an error if:
    /// - the root name or admin user id is empty
    /// - the display timezone is unknown
    /// - the maximum name length is zero
    pub fn validate(&self) -> Result<()> {
        if self.drive.root_name.is_empty() {
            return Err(DriveError::Config("drive.root_name is empty".to_string()));
        }
        if self.drive.max_name_length == 0 {
            return Err(DriveError::Config(
                "drive.max_name_length must be positive".to_string(),
            ));
        }
        if self.admin.user_id.is_empty() {
            return Err(DriveError::Config("admin.user_id is empty".to_string()));
        }
        if self.display.timezone.parse::<chrono_tz::Tz>().is_err() {
            return Err(DriveError::Config(format!(
                "unknown timezone '{}'",
                self.display.timezone
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.logging.level, "info");
        assert_eq!(config.logging.file, "logs/cloudvault.log");

        assert_eq!(config.display.timezone, "UTC");
        assert_eq!(config.display.datetime_format, "%d-%m-%Y %H:%M:%S");

        assert_eq!(config.drive.root_name, "Root");
        assert_eq!(config.drive.default_type_tag, "txt");
        assert_eq!(config.drive.recent_capacity, 0);
        assert_eq!(config.drive.max_name_length, 100);

        assert_eq!(config.admin.user_id, "admin");
        assert_eq!(config.admin.password, "password");
        assert_eq!(config.admin.security_answer, "blue");

        assert_eq!(config.auth.memory_kib, 65536);
        assert_eq!(config.auth.iterations, 3);
        assert_eq!(config.auth.parallelism, 4);
    }

    #[test]
    fn test_parse_full_config() {
        let toml = r#"
[logging]
level = "debug"
file = "custom/logs/drive.log"

[display]
timezone = "Asia/Tokyo"
datetime_format = "%Y/%m/%d %H:%M"

[drive]
root_name = "Home"
default_type_tag = "bin"
recent_capacity = 25
max_name_length = 64

[admin]
user_id = "root"
password = "changeme123"
security_question = "First pet?"
security_answer = "rex"

[auth]
memory_kib = 1024
iterations = 1
parallelism = 1
"#;

        let config = Config::parse(toml).unwrap();

        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.file, "custom/logs/drive.log");
        assert_eq!(config.display.timezone, "Asia/Tokyo");
        assert_eq!(config.display.datetime_format, "%Y/%m/%d %H:%M");
        assert_eq!(config.drive.root_name, "Home");
        assert_eq!(config.drive.default_type_tag, "bin");
        assert_eq!(config.drive.recent_capacity, 25);
        assert_eq!(config.drive.max_name_length, 64);
        assert_eq!(config.admin.user_id, "root");
        assert_eq!(config.admin.security_question, "First pet?");
        assert_eq!(config.auth.memory_kib, 1024);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_partial_config() {
        let toml = r#"
[drive]
recent_capacity = 10
"#;

        let config = Config::parse(toml).unwrap();

        assert_eq!(config.drive.recent_capacity, 10);
        assert_eq!(config.drive.root_name, "Root");
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.admin.user_id, "admin");
    }

    #[test]
    fn test_parse_empty_config() {
        let config = Config::parse("").unwrap();
        assert_eq!(config.drive.root_name, "Root");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_invalid_config() {
        let result = Config::parse("this is not valid toml [[[");

        if let Err(DriveError::Config(msg)) = result {
            assert!(msg.contains("config parse error"));
        } else {
            panic!("Expected Config error");
        }
    }

    #[test]
    fn test_load_nonexistent_file() {
        let result = Config::load("nonexistent.toml");
        assert!(matches!(result, Err(DriveError::Io(_))));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[drive]\nroot_name = \"Drive\"").unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.drive.root_name, "Drive");
    }

    #[test]
    fn test_validate_unknown_timezone() {
        let mut config = Config::default();
        config.display.timezone = "Mars/Olympus".to_string();

        let result = config.validate();
        assert!(matches!(result, Err(DriveError::Config(msg)) if msg.contains("Mars/Olympus")));
    }

    #[test]
    fn test_validate_empty_root_name() {
        let mut config = Config::default();
        config.drive.root_name = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_auth_hash_cost() {
        let config = Config::default();
        let cost = config.auth.hash_cost();
        assert_eq!(cost.memory_kib, 65536);
        assert_eq!(cost.iterations, 3);
        assert_eq!(cost.parallelism, 4);
    }
}
