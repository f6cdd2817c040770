//! Database service layer
//!
//! This module provides a high-level interface to database operations

use crate::database::{DatabasePool, RequestRepository};

#[derive(Debug, Clone)]
pub struct DatabaseService {
    pub requests: RequestRepository,
}

impl DatabaseService {
    pub fn new(pool: DatabasePool) -> Self {
        Self {
            requests: RequestRepository::new(pool),
        }
    }
}
