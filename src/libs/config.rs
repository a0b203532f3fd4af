//! Configuration management for the tms application.
//!
//! The configuration is a JSON document stored next to the database in the
//! per-user data directory. Every section has defaults, so a missing file or
//! a missing section is not an error.
//!
//! ## Sections
//!
//! - **database**: file name and the startup connect/retry policy
//! - **auth**: session lifetime, failed-login lockout, security questions
//! - **hashing**: Argon2 cost parameters for passwords and answers
//!
//! ## Usage
//!
//! ```rust,no_run
//! use tms::libs::config::Config;
//!
//! let mut config = Config::read()?;
//! config.auth.session_ttl_minutes = 60;
//! config.save()?;
//! # Ok::<(), anyhow::Error>(())
//! ```

use super::data_storage::DataStorage;
use crate::libs::messages::Message;
use anyhow::Result;
use dialoguer::{theme::ColorfulTheme, Confirm, Input};
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::path::PathBuf;
use std::time::Duration;

/// Configuration file name inside the data directory.
pub const CONFIG_FILE_NAME: &str = "config.json";

/// Longest accepted session lifetime: one week.
pub const MAX_SESSION_TTL_MINUTES: i64 = 7 * 24 * 60;

/// Longest accepted lockout: one day.
pub const MAX_LOCKOUT_SECONDS: i64 = 24 * 60 * 60;

/// Database location and startup connection policy.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct DatabaseConfig {
    /// SQLite file name, resolved inside the data directory unless absolute.
    pub file_name: String,

    /// How many times open + ping is attempted before startup gives up.
    pub connect_retries: u32,

    /// Fixed pause between connection attempts, in seconds.
    pub connect_backoff_seconds: u64,
}

/// Authentication policy.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct AuthConfig {
    /// Lifetime of an issued bearer token.
    pub session_ttl_minutes: i64,

    /// Consecutive failures that lock an identity.
    pub max_login_attempts: u32,

    /// Cooldown applied to a locked identity.
    pub lockout_seconds: i64,

    /// Ask for two security answers at sign-up and offer password recovery.
    pub security_questions: bool,
}

/// Argon2 cost parameters.
///
/// Applied to both password and security answer hashes. Existing hashes keep
/// verifying after a change because the parameters are stored in the PHC string.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct HashingConfig {
    pub memory_cost_kib: u32,
    pub time_cost: u32,
    pub parallelism: u32,
}

/// Root configuration object.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub hashing: HashingConfig,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            file_name: "tms.db".to_string(),
            connect_retries: 3,
            connect_backoff_seconds: 2,
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            session_ttl_minutes: 30,
            max_login_attempts: 3,
            lockout_seconds: 10,
            security_questions: true,
        }
    }
}

impl Default for HashingConfig {
    fn default() -> Self {
        Self {
            memory_cost_kib: 19 * 1024,
            time_cost: 2,
            parallelism: 1,
        }
    }
}

impl DatabaseConfig {
    /// Absolute path of the database file.
    pub fn path(&self) -> Result<PathBuf> {
        let file = PathBuf::from(&self.file_name);
        if file.is_absolute() {
            return Ok(file);
        }
        DataStorage::new().get_path(&self.file_name)
    }

    pub fn connect_backoff(&self) -> Duration {
        Duration::from_secs(self.connect_backoff_seconds)
    }
}

impl AuthConfig {
    /// Saturates at `chrono::Duration::MAX` for values outside its range.
    pub fn session_ttl(&self) -> chrono::Duration {
        chrono::Duration::try_minutes(self.session_ttl_minutes).unwrap_or(chrono::Duration::MAX)
    }

    pub fn lockout(&self) -> chrono::Duration {
        chrono::Duration::try_seconds(self.lockout_seconds).unwrap_or(chrono::Duration::MAX)
    }

    pub fn validate(&self) -> Result<()> {
        if !(1..=MAX_SESSION_TTL_MINUTES).contains(&self.session_ttl_minutes) {
            anyhow::bail!(
                "auth.session_ttl_minutes must be between 1 and {MAX_SESSION_TTL_MINUTES}, got {}",
                self.session_ttl_minutes
            );
        }

        if self.max_login_attempts == 0 {
            anyhow::bail!("auth.max_login_attempts must be at least 1");
        }

        if !(1..=MAX_LOCKOUT_SECONDS).contains(&self.lockout_seconds) {
            anyhow::bail!(
                "auth.lockout_seconds must be between 1 and {MAX_LOCKOUT_SECONDS}, got {}",
                self.lockout_seconds
            );
        }

        Ok(())
    }
}

impl Config {
    /// Reads the configuration file, falling back to defaults when it does not exist.
    ///
    /// A file whose values are out of range is rejected.
    pub fn read() -> Result<Config> {
        let config_file_path = DataStorage::new().get_path(CONFIG_FILE_NAME)?;

        if !config_file_path.exists() {
            return Ok(Config::default());
        }

        let config_str = fs::read_to_string(config_file_path)?;
        let config: Config = serde_json::from_str(&config_str)?;
        config.validate()?;
        Ok(config)
    }

    /// Writes the configuration as pretty-printed JSON.
    pub fn save(&self) -> Result<()> {
        let config_file_path = DataStorage::new().get_path(CONFIG_FILE_NAME)?;

        let config_file = File::create(config_file_path)?;
        serde_json::to_writer_pretty(&config_file, &self)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        self.auth.validate()
    }

    /// Interactive setup wizard, starting from the current values.
    pub fn init() -> Result<Config> {
        let mut config = Config::read()?;
        let theme = ColorfulTheme::default();

        config.database.file_name = Input::with_theme(&theme)
            .with_prompt(Message::PromptDatabaseFile.to_string())
            .default(config.database.file_name.clone())
            .interact_text()?;

        config.auth.session_ttl_minutes = Input::with_theme(&theme)
            .with_prompt(Message::PromptSessionTtl.to_string())
            .default(config.auth.session_ttl_minutes)
            .validate_with(|minutes: &i64| -> Result<(), String> {
                if (1..=MAX_SESSION_TTL_MINUTES).contains(minutes) {
                    Ok(())
                } else {
                    Err(format!("must be between 1 and {MAX_SESSION_TTL_MINUTES}"))
                }
            })
            .interact_text()?;

        config.auth.max_login_attempts = Input::with_theme(&theme)
            .with_prompt(Message::PromptMaxLoginAttempts.to_string())
            .default(config.auth.max_login_attempts)
            .validate_with(|attempts: &u32| -> Result<(), &str> {
                if *attempts > 0 {
                    Ok(())
                } else {
                    Err("must be at least 1")
                }
            })
            .interact_text()?;

        config.auth.lockout_seconds = Input::with_theme(&theme)
            .with_prompt(Message::PromptLockoutSeconds.to_string())
            .default(config.auth.lockout_seconds)
            .validate_with(|seconds: &i64| -> Result<(), String> {
                if (1..=MAX_LOCKOUT_SECONDS).contains(seconds) {
                    Ok(())
                } else {
                    Err(format!("must be between 1 and {MAX_LOCKOUT_SECONDS}"))
                }
            })
            .interact_text()?;

        config.auth.security_questions = Confirm::with_theme(&theme)
            .with_prompt(Message::PromptEnableSecurityQuestions.to_string())
            .default(config.auth.security_questions)
            .interact()?;

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_keeps_defaults() {
        let config: Config = serde_json::from_str(r#"{"auth": {"lockout_seconds": 30}}"#).unwrap();

        assert_eq!(config.auth.lockout_seconds, 30);
        assert_eq!(config.auth.max_login_attempts, 3);
        assert!(config.auth.security_questions);
        assert_eq!(config.database, DatabaseConfig::default());
    }

    #[test]
    fn out_of_range_auth_values_are_rejected() {
        let config: Config =
            serde_json::from_str(r#"{"auth": {"lockout_seconds": 9000000000000}}"#).unwrap();
        assert!(config.validate().is_err());

        let auth = AuthConfig {
            lockout_seconds: i64::MAX,
            ..AuthConfig::default()
        };
        assert!(auth.validate().is_err());
        assert_eq!(auth.lockout(), chrono::Duration::MAX);

        let auth = AuthConfig {
            session_ttl_minutes: i64::MAX,
            ..AuthConfig::default()
        };
        assert!(auth.validate().is_err());
        assert_eq!(auth.session_ttl(), chrono::Duration::MAX);

        let auth = AuthConfig {
            session_ttl_minutes: 0,
            ..AuthConfig::default()
        };
        assert!(auth.validate().is_err());

        assert!(AuthConfig::default().validate().is_ok());
    }

    #[test]
    fn absolute_database_path_is_kept() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("custom.db");
        let db = DatabaseConfig {
            file_name: file.to_string_lossy().to_string(),
            ..DatabaseConfig::default()
        };

        assert_eq!(db.path().unwrap(), file);
    }
}
