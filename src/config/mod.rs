//! Configuration management module
//!
//! This module handles loading and validation of application configuration
//! from a config file and environment variables.

pub mod settings;
pub mod validation;

pub use settings::{
    BotConfig, DatabaseConfig, LoggingConfig, MenuConfig, SessionConfig, Settings,
};
