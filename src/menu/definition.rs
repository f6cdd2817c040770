//! Menu definition loading and validation
//!
//! The conversation tree lives in a JSON document mapping node name to
//! display text, button labels and label-to-node transitions. The document
//! is loaded once at startup and validated so that a broken menu aborts the
//! process instead of surfacing mid-conversation.

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;
use tracing::info;

use crate::utils::errors::{OrderPilotError, Result};

use super::walker;

/// A single step in the menu-driven conversation
#[derive(Debug, Clone, Deserialize)]
pub struct MenuNode {
    /// Display message template; `{field}` placeholders are filled from the
    /// session (missing fields render as empty strings)
    #[serde(default)]
    pub message: String,
    /// Button labels shown under the message, one per row
    #[serde(default)]
    pub options: Vec<String>,
    /// Button label to next node name
    #[serde(default)]
    pub next: HashMap<String, String>,
    /// Static description text; when present the node is a service detail
    /// page and gets the standard Request Service / Back buttons
    #[serde(default)]
    pub description: Option<String>,
}

impl MenuNode {
    /// Whether this node is a service description page
    pub fn is_description(&self) -> bool {
        self.description.is_some()
    }
}

/// The immutable conversation tree, loaded once at startup
#[derive(Debug, Clone, Deserialize)]
#[serde(transparent)]
pub struct MenuDefinition {
    nodes: HashMap<String, MenuNode>,
}

impl MenuDefinition {
    /// Load and validate the menu definition from a JSON file
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            OrderPilotError::MenuDefinition(format!(
                "Cannot read menu definition {}: {}",
                path.display(),
                e
            ))
        })?;

        let definition = Self::from_json(&content)?;
        definition.validate()?;

        info!(
            path = %path.display(),
            nodes = definition.nodes.len(),
            "Menu definition loaded"
        );
        Ok(definition)
    }

    /// Parse a menu definition from a JSON string (not yet validated)
    pub fn from_json(content: &str) -> Result<Self> {
        serde_json::from_str(content)
            .map_err(|e| OrderPilotError::MenuDefinition(format!("Invalid menu JSON: {}", e)))
    }

    /// Check the tree for the mistakes that would otherwise only show up
    /// mid-conversation: missing required nodes, transitions into nodes that
    /// do not exist, and buttons that could never do anything.
    pub fn validate(&self) -> Result<()> {
        for required in [
            walker::ROOT_NODE,
            walker::DETAILS_NODE,
            walker::USERNAME_NODE,
            walker::SUMMARY_NODE,
            walker::CONFIRMATION_NODE,
        ] {
            if !self.contains(required) {
                return Err(OrderPilotError::MenuDefinition(format!(
                    "Required node '{}' is missing",
                    required
                )));
            }
        }

        for (name, node) in &self.nodes {
            for (label, target) in &node.next {
                if !self.contains(target) {
                    return Err(OrderPilotError::MenuDefinition(format!(
                        "Node '{}' maps '{}' to unknown node '{}'",
                        name, label, target
                    )));
                }
            }

            for option in &node.options {
                if !walker::is_reserved(option) && !node.next.contains_key(option) {
                    return Err(OrderPilotError::MenuDefinition(format!(
                        "Node '{}' shows button '{}' with no transition",
                        name, option
                    )));
                }
            }
        }

        Ok(())
    }

    /// Look up a node by name
    pub fn node(&self, name: &str) -> Option<&MenuNode> {
        self.nodes.get(name)
    }

    /// Whether a node with this name exists
    pub fn contains(&self, name: &str) -> bool {
        self.nodes.contains_key(name)
    }

    /// Iterate over all node names
    pub fn node_names(&self) -> impl Iterator<Item = &String> {
        self.nodes.keys()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal_menu() -> &'static str {
        r#"{
            "start": {
                "message": "Welcome",
                "options": ["Browse Services"],
                "next": {"Browse Services": "services"}
            },
            "services": {
                "message": "Pick one",
                "options": ["Web Design", "Back"],
                "next": {"Web Design": "web_design"}
            },
            "web_design": {"description": "Sites of all sizes"},
            "request_details": {"message": "Tell me about it"},
            "request_username": {"message": "Who do we contact?"},
            "request_summary": {
                "message": "Service: {category}",
                "options": ["Confirm Request", "Cancel Request"]
            },
            "request_confirmation": {"message": "Done!"}
        }"#
    }

    #[test]
    fn test_minimal_menu_is_valid() {
        let menu = MenuDefinition::from_json(minimal_menu()).unwrap();
        menu.validate().unwrap();
        assert!(menu.contains("web_design"));
        assert!(menu.node("web_design").unwrap().is_description());
    }

    #[test]
    fn test_dangling_next_target_rejected() {
        let menu = MenuDefinition::from_json(
            &minimal_menu().replace("\"web_design\"}", "\"missing_node\"}"),
        )
        .unwrap();

        let err = menu.validate().unwrap_err();
        assert!(err.to_string().contains("missing_node"));
    }

    #[test]
    fn test_unmapped_option_rejected() {
        let menu = MenuDefinition::from_json(
            &minimal_menu().replace("[\"Web Design\", \"Back\"]", "[\"Web Design\", \"Pricing\"]"),
        )
        .unwrap();

        let err = menu.validate().unwrap_err();
        assert!(err.to_string().contains("Pricing"));
    }

    #[test]
    fn test_missing_required_node_rejected() {
        let menu = MenuDefinition::from_json(
            &minimal_menu().replace("request_username", "request_handle"),
        )
        .unwrap();

        assert!(menu.validate().is_err());
    }

    #[test]
    fn test_invalid_json_rejected() {
        assert!(MenuDefinition::from_json("{not json").is_err());
    }

    #[tokio::test]
    async fn test_load_from_file() {
        use std::io::Write;

        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(minimal_menu().as_bytes()).unwrap();

        let menu = MenuDefinition::load(file.path()).await.unwrap();
        assert!(menu.contains("start"));
    }

    #[tokio::test]
    async fn test_load_missing_file_fails() {
        let result = MenuDefinition::load("/nonexistent/menu.json").await;
        assert!(result.is_err());
    }
}
