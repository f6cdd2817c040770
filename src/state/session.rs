//! Per-user conversation session
//!
//! This module defines the session record tracked for each user: the menu
//! node they are currently looking at and the request fields collected so
//! far. Sessions are ephemeral; losing one only sends the user back to the
//! main menu.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::menu::walker::ROOT_NODE;

/// Per-user conversation state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    /// Telegram user id this session belongs to
    pub user_id: i64,
    /// Name of the menu node currently shown
    pub node: String,
    /// Node to return to when the user presses Back on a description page
    pub parent_node: Option<String>,
    /// Service category picked from the catalogue
    pub category: Option<String>,
    /// Free-text project details
    pub details: Option<String>,
    /// Contact username, stored without the leading @
    pub username: Option<String>,
    /// When this session was last touched
    pub updated_at: DateTime<Utc>,
}

impl Session {
    /// Create a fresh session positioned at the root menu
    pub fn new(user_id: i64) -> Self {
        Self {
            user_id,
            node: ROOT_NODE.to_string(),
            parent_node: None,
            category: None,
            details: None,
            username: None,
            updated_at: Utc::now(),
        }
    }

    /// Discard all collected fields and return to the root menu
    pub fn reset(&mut self) {
        *self = Self::new(self.user_id);
    }

    /// Move the session to another node
    pub fn goto(&mut self, node: &str) {
        self.node = node.to_string();
        self.updated_at = Utc::now();
    }

    /// Whether any request fields have been collected
    pub fn has_draft(&self) -> bool {
        self.category.is_some() || self.details.is_some() || self.username.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session_starts_at_root() {
        let session = Session::new(42);
        assert_eq!(session.user_id, 42);
        assert_eq!(session.node, ROOT_NODE);
        assert!(session.parent_node.is_none());
        assert!(!session.has_draft());
    }

    #[test]
    fn test_reset_discards_draft() {
        let mut session = Session::new(42);
        session.goto("request_summary");
        session.category = Some("Web Design".to_string());
        session.details = Some("Need a 5-page site".to_string());
        session.username = Some("alice".to_string());

        session.reset();

        assert_eq!(session.node, ROOT_NODE);
        assert_eq!(session.user_id, 42);
        assert!(!session.has_draft());
    }

    #[test]
    fn test_goto_moves_node() {
        let mut session = Session::new(42);
        session.goto("services");
        assert_eq!(session.node, "services");
    }
}
