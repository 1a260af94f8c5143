//! Core configuration types.

use super::defaults::*;
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Bot configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Bot identity and command prefix.
    #[serde(default)]
    pub bot: BotConfig,
    /// Custom command storage.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Log filter and format.
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Identity used for messages typed on the console.
    #[serde(default)]
    pub console: ConsoleConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }
}

/// Bot identity configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct BotConfig {
    /// Display name used in logs.
    #[serde(default = "default_bot_name")]
    pub name: String,
    /// Prefix every command invocation starts with.
    #[serde(default = "default_prefix")]
    pub prefix: String,
    /// User id of the bot owner; owner-only commands check against it.
    #[serde(default)]
    pub owner_id: u64,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            name: default_bot_name(),
            prefix: default_prefix(),
            owner_id: 0,
        }
    }
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Path to the SQLite file, or `:memory:`.
    #[serde(default = "default_database_path")]
    pub path: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_database_path(),
        }
    }
}

/// Logging configuration. `RUST_LOG` takes precedence over `filter`.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_filter")]
    pub filter: String,
    /// Emit JSON lines instead of human readable output.
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
            json: false,
        }
    }
}

/// Author identity attached to console messages.
#[derive(Debug, Clone, Deserialize)]
pub struct ConsoleConfig {
    /// Defaults to the bot owner.
    #[serde(default)]
    pub user_id: Option<u64>,
    #[serde(default = "default_console_user_name")]
    pub user_name: String,
    /// Guild the console pretends to type in; absent means a direct message.
    #[serde(default)]
    pub guild_id: Option<u64>,
    /// Administrator privilege in `guild_id`.
    #[serde(default)]
    pub admin: bool,
    /// Mark the console author as an automated account.
    #[serde(default)]
    pub bot: bool,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            user_id: None,
            user_name: default_console_user_name(),
            guild_id: None,
            admin: false,
            bot: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.bot.prefix, "!");
        assert_eq!(config.bot.owner_id, 0);
        assert_eq!(config.database.path, "dirk.db");
        assert_eq!(config.logging.filter, "info");
        assert!(!config.logging.json);
        assert!(config.console.guild_id.is_none());
    }

    #[test]
    fn test_full_config_parses() {
        let toml = r#"
[bot]
name = "beneluwux"
prefix = "?"
owner_id = 123

[database]
path = ":memory:"

[logging]
filter = "dirk=debug"
json = true

[console]
user_id = 55
user_name = "tester#0042"
guild_id = 900
admin = true
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.bot.prefix, "?");
        assert_eq!(config.bot.owner_id, 123);
        assert_eq!(config.database.path, ":memory:");
        assert!(config.logging.json);
        assert_eq!(config.console.user_id, Some(55));
        assert_eq!(config.console.guild_id, Some(900));
        assert!(config.console.admin);
        assert!(!config.console.bot);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[bot]\nowner_id = 7").unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.bot.owner_id, 7);
    }

    #[test]
    fn test_load_missing_file() {
        let err = Config::load("/nonexistent/dirk.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn test_load_invalid_toml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[bot\nowner_id = ").unwrap();

        let err = Config::load(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
