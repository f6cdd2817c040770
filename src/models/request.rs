//! Service request model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::state::Session;

/// Status a freshly filed request starts in
pub const PENDING_STATUS: &str = "pending";

/// A persisted service request
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ServiceRequest {
    pub id: i64,
    pub user_id: i64,
    pub username: Option<String>,
    pub category: String,
    pub details: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

/// Fields collected by the conversation, ready to be inserted
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewRequest {
    pub user_id: i64,
    pub username: Option<String>,
    pub category: String,
    pub details: String,
}

impl NewRequest {
    /// Build a request record from a completed conversation session.
    ///
    /// Mirrors what the summary page showed: a stale confirm press with no
    /// category on file is still stored, under an "Unknown" category, rather
    /// than rejected.
    pub fn from_session(session: &Session) -> Self {
        Self {
            user_id: session.user_id,
            username: session.username.clone(),
            category: session
                .category
                .clone()
                .unwrap_or_else(|| "Unknown".to_string()),
            details: session.details.clone().unwrap_or_default(),
        }
    }
}
