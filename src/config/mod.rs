//! Configuration loading and management.
//!
//! This module is split into logical submodules:
//! - [`types`]: Config struct definitions (Config, BotConfig, DatabaseConfig, LoggingConfig, ConsoleConfig)
//! - [`validation`]: Startup checks that collect every problem at once

mod defaults;
mod types;
pub mod validation;

pub use types::{BotConfig, Config, ConfigError, ConsoleConfig, DatabaseConfig, LoggingConfig};
