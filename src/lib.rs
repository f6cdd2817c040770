//! OrderPilot Telegram Bot
//!
//! A menu-driven intake bot for a digital-services studio. The bot walks a
//! client through a JSON-defined service catalogue, collects project details
//! and a contact username, and files the finished request into Postgres.

#![allow(non_snake_case)]

pub mod config;
pub mod database;
pub mod handlers;
pub mod menu;
pub mod models;
pub mod services;
pub mod state;
pub mod utils;

// Re-export commonly used types
pub use config::Settings;
pub use utils::errors::{OrderPilotError, Result};

// Re-export main components for easy access
pub use database::DatabaseService;
pub use menu::{MenuDefinition, MenuWalker};
pub use services::NotificationService;
pub use state::{Session, SessionStore};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
