//! Configuration validation module
//!
//! This module provides validation functions for application configuration
//! to ensure all required settings are present before the bot starts serving.

use crate::utils::errors::{OrderPilotError, Result};

use super::Settings;

/// Validate all configuration settings
pub fn validate_settings(settings: &Settings) -> Result<()> {
    validate_bot_config(&settings.bot)?;
    validate_database_config(&settings.database)?;
    validate_session_config(&settings.session)?;
    validate_menu_config(&settings.menu)?;
    validate_logging_config(&settings.logging)?;

    Ok(())
}

/// Validate bot configuration
fn validate_bot_config(config: &super::BotConfig) -> Result<()> {
    if config.token.is_empty() {
        return Err(OrderPilotError::Config("Bot token is required".to_string()));
    }

    Ok(())
}

/// Validate database configuration
fn validate_database_config(config: &super::DatabaseConfig) -> Result<()> {
    // connection_url reports which coordinate is missing
    config.connection_url()?;

    if config.max_connections == 0 {
        return Err(OrderPilotError::Config(
            "Max connections must be greater than 0".to_string(),
        ));
    }

    if config.min_connections > config.max_connections {
        return Err(OrderPilotError::Config(
            "Min connections cannot be greater than max connections".to_string(),
        ));
    }

    Ok(())
}

/// Validate session store configuration
fn validate_session_config(config: &super::SessionConfig) -> Result<()> {
    match config.backend.as_str() {
        "memory" => Ok(()),
        "redis" => {
            if config.redis_url.as_deref().unwrap_or("").is_empty() {
                return Err(OrderPilotError::Config(
                    "Redis URL is required for the redis session backend".to_string(),
                ));
            }
            Ok(())
        }
        other => Err(OrderPilotError::Config(format!(
            "Unknown session backend: {}. Valid backends: memory, redis",
            other
        ))),
    }
}

/// Validate menu configuration
fn validate_menu_config(config: &super::MenuConfig) -> Result<()> {
    if config.path.is_empty() {
        return Err(OrderPilotError::Config(
            "Menu definition path is required".to_string(),
        ));
    }

    Ok(())
}

/// Validate logging configuration
fn validate_logging_config(config: &super::LoggingConfig) -> Result<()> {
    if config.level.is_empty() {
        return Err(OrderPilotError::Config("Log level is required".to_string()));
    }

    let valid_levels = ["trace", "debug", "info", "warn", "error"];
    if !valid_levels.contains(&config.level.as_str()) {
        return Err(OrderPilotError::Config(format!(
            "Invalid log level: {}. Valid levels: {:?}",
            config.level, valid_levels
        )));
    }

    Ok(())
}
