//! Error handling for OrderPilot
//!
//! This module defines the main error type used throughout the application
//! and provides a unified error handling strategy.

use thiserror::Error;

/// Main error type for the OrderPilot application
#[derive(Error, Debug)]
pub enum OrderPilotError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Telegram API error: {0}")]
    Telegram(#[from] teloxide::RequestError),

    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Menu definition error: {0}")]
    MenuDefinition(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("URL parsing error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Result type alias for OrderPilot operations
pub type Result<T> = std::result::Result<T, OrderPilotError>;

impl OrderPilotError {
    /// Errors that should abort startup rather than be retried or degraded
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            OrderPilotError::Config(_) | OrderPilotError::MenuDefinition(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fatal_classification() {
        assert!(OrderPilotError::Config("missing token".to_string()).is_fatal());
        assert!(OrderPilotError::MenuDefinition("dangling node".to_string()).is_fatal());
        assert!(!OrderPilotError::InvalidInput("bad button".to_string()).is_fatal());
    }
}
