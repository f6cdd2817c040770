//! Database module
//!
//! This module handles database connections and operations

pub mod connection;
pub mod repositories;
pub mod service;

// Re-export commonly used database components
pub use connection::{
    create_pool, create_pool_with_retry, health_check, init_schema, DatabaseConfig, DatabasePool,
};
pub use repositories::RequestRepository;
pub use service::DatabaseService;
