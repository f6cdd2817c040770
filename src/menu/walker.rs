//! Menu walker
//!
//! The conversation core: given the user's session and their latest input,
//! resolve the next menu node, mutate the session, and produce the text and
//! buttons to show. The walker never touches Telegram or the database —
//! persistence is reported back to the caller as a [`StepEffect`].

use std::collections::HashMap;
use std::sync::Arc;

use tracing::warn;

use crate::state::Session;

use super::definition::{MenuDefinition, MenuNode};

/// Node the conversation starts at and falls back to
pub const ROOT_NODE: &str = "start";
/// Free-text state collecting project details
pub const DETAILS_NODE: &str = "request_details";
/// Free-text state collecting the contact username
pub const USERNAME_NODE: &str = "request_username";
/// Review page shown before submission
pub const SUMMARY_NODE: &str = "request_summary";
/// Page shown after a stored submission
pub const CONFIRMATION_NODE: &str = "request_confirmation";
/// Page listing the user's persisted requests
pub const MY_REQUESTS_NODE: &str = "my_requests";

/// Jump from a service description page into the request flow
pub const REQUEST_SERVICE: &str = "Request Service";
/// Return from a description page to the node it was opened from
pub const BACK: &str = "Back";
/// Submit the reviewed request
pub const CONFIRM_REQUEST: &str = "Confirm Request";
/// Discard the draft and return to the main menu
pub const CANCEL_REQUEST: &str = "Cancel Request";

/// Whether a button label is handled by the walker itself rather than the
/// per-node transition mapping
pub fn is_reserved(label: &str) -> bool {
    matches!(
        label,
        REQUEST_SERVICE | BACK | CONFIRM_REQUEST | CANCEL_REQUEST
    )
}

/// Text and buttons ready to be shown to the user
#[derive(Debug, Clone, PartialEq)]
pub struct Rendered {
    pub text: String,
    pub options: Vec<String>,
}

/// Side effect the caller must perform for a step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepEffect {
    /// Nothing beyond showing the rendered node
    None,
    /// Persist the session's collected fields as a request record
    SubmitRequest,
    /// The session was reset to a fresh root-node session
    SessionCleared,
}

/// Outcome of a button press
#[derive(Debug, Clone)]
pub struct Step {
    pub rendered: Rendered,
    pub effect: StepEffect,
}

/// Resolves menu transitions against the loaded definition
#[derive(Debug, Clone)]
pub struct MenuWalker {
    menu: Arc<MenuDefinition>,
}

impl MenuWalker {
    pub fn new(menu: Arc<MenuDefinition>) -> Self {
        Self { menu }
    }

    pub fn menu(&self) -> &MenuDefinition {
        &self.menu
    }

    /// Render the session's current node.
    ///
    /// A session pointing at a node that no longer exists is sent back to
    /// the root menu with a warning line, keeping the invariant that the
    /// session node is always a key of the definition.
    pub fn render(&self, session: &mut Session) -> Rendered {
        if let Some(node) = self.menu.node(&session.node) {
            return self.render_node(node, session);
        }

        warn!(
            user_id = session.user_id,
            node = %session.node,
            "Session points at unknown menu node, falling back to root"
        );
        session.goto(ROOT_NODE);

        let mut rendered = match self.menu.node(ROOT_NODE) {
            Some(root) => self.render_node(root, session),
            None => Rendered {
                text: String::new(),
                options: Vec::new(),
            },
        };
        rendered.text = format!(
            "⚠️ That menu step no longer exists, taking you back to the main menu.\n\n{}",
            rendered.text
        );
        rendered
    }

    /// Move the session to a node and render it
    pub fn goto(&self, session: &mut Session, node: &str) -> Rendered {
        session.goto(node);
        self.render(session)
    }

    /// Apply a button press.
    ///
    /// Reserved labels are intercepted before the per-node mapping, matching
    /// the precedence users see on description pages. A label that is
    /// neither reserved nor mapped re-renders the current node unchanged.
    pub fn press(&self, session: &mut Session, choice: &str) -> Step {
        match choice {
            CONFIRM_REQUEST => {
                let rendered = self.goto(session, CONFIRMATION_NODE);
                Step {
                    rendered,
                    effect: StepEffect::SubmitRequest,
                }
            }
            CANCEL_REQUEST => {
                session.reset();
                Step {
                    rendered: self.render(session),
                    effect: StepEffect::SessionCleared,
                }
            }
            REQUEST_SERVICE => Step {
                rendered: self.goto(session, DETAILS_NODE),
                effect: StepEffect::None,
            },
            BACK => {
                let parent = session
                    .parent_node
                    .take()
                    .unwrap_or_else(|| ROOT_NODE.to_string());
                Step {
                    rendered: self.goto(session, &parent),
                    effect: StepEffect::None,
                }
            }
            _ => self.follow_mapping(session, choice),
        }
    }

    /// Apply a free-text message.
    ///
    /// Only the two collection states accept raw text; everywhere else the
    /// caller gets `None` and re-prompts with the current menu.
    pub fn text(&self, session: &mut Session, input: &str) -> Option<Rendered> {
        match session.node.as_str() {
            DETAILS_NODE => {
                session.details = Some(input.trim().to_string());
                Some(self.goto(session, USERNAME_NODE))
            }
            USERNAME_NODE => {
                let username = input.trim().trim_start_matches('@').to_string();
                session.username = Some(username);
                Some(self.goto(session, SUMMARY_NODE))
            }
            _ => None,
        }
    }

    fn follow_mapping(&self, session: &mut Session, choice: &str) -> Step {
        let next = self
            .menu
            .node(&session.node)
            .and_then(|node| node.next.get(choice))
            .cloned();

        let rendered = match next {
            Some(target) => {
                // Entering a description page records the pressed label as
                // the draft's category and where Back should lead.
                let entering_description = self
                    .menu
                    .node(&target)
                    .map(MenuNode::is_description)
                    .unwrap_or(false);
                if entering_description {
                    session.parent_node = Some(session.node.clone());
                    session.category = Some(choice.to_string());
                }
                self.goto(session, &target)
            }
            None => self.render(session),
        };

        Step {
            rendered,
            effect: StepEffect::None,
        }
    }

    fn render_node(&self, node: &MenuNode, session: &Session) -> Rendered {
        if let Some(description) = &node.description {
            return Rendered {
                text: description.clone(),
                options: vec![REQUEST_SERVICE.to_string(), BACK.to_string()],
            };
        }

        Rendered {
            text: render_template(&node.message, &session_params(session)),
            options: node.options.clone(),
        }
    }
}

/// Template parameters available to menu messages
fn session_params(session: &Session) -> HashMap<&'static str, String> {
    let mut params = HashMap::new();
    params.insert("category", session.category.clone().unwrap_or_default());
    params.insert("details", session.details.clone().unwrap_or_default());
    params.insert("username", session.username.clone().unwrap_or_default());
    params
}

/// Substitute `{key}` placeholders; unknown or missing keys become empty
/// strings, an unterminated brace stays literal.
fn render_template(template: &str, params: &HashMap<&'static str, String>) -> String {
    let mut result = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        result.push_str(&rest[..open]);
        match rest[open + 1..].find('}') {
            Some(close) => {
                let key = &rest[open + 1..open + 1 + close];
                if let Some(value) = params.get(key) {
                    result.push_str(value);
                }
                rest = &rest[open + close + 2..];
            }
            None => {
                result.push_str(&rest[open..]);
                rest = "";
            }
        }
    }

    result.push_str(rest);
    result
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use proptest::prelude::*;

    use super::*;
    use crate::menu::definition::MenuDefinition;

    fn test_menu() -> Arc<MenuDefinition> {
        Arc::new(
            MenuDefinition::from_json(
                r#"{
                    "start": {
                        "message": "Welcome!",
                        "options": ["Browse Services", "My Requests"],
                        "next": {"Browse Services": "services", "My Requests": "my_requests"}
                    },
                    "services": {
                        "message": "Pick a category:",
                        "options": ["Web Design", "Back"],
                        "next": {"Web Design": "web_design"}
                    },
                    "web_design": {"description": "Sites of all sizes."},
                    "my_requests": {"message": "Your requests:", "options": ["Back"]},
                    "request_details": {"message": "Describe your project."},
                    "request_username": {"message": "Contact username?"},
                    "request_summary": {
                        "message": "Service: {category}\nDetails: {details}\nContact: @{username}",
                        "options": ["Confirm Request", "Cancel Request"]
                    },
                    "request_confirmation": {
                        "message": "Submitted for @{username}!",
                        "options": ["Main Menu"],
                        "next": {"Main Menu": "start"}
                    }
                }"#,
            )
            .unwrap(),
        )
    }

    fn walker() -> MenuWalker {
        let menu = test_menu();
        menu.validate().unwrap();
        MenuWalker::new(menu)
    }

    #[test]
    fn test_every_node_renders_with_empty_session() {
        let walker = walker();
        let names: Vec<String> = walker.menu().node_names().cloned().collect();

        for name in names {
            let mut session = Session::new(1);
            session.goto(&name);
            let rendered = walker.render(&mut session);
            assert!(
                !rendered.text.contains('{'),
                "unrendered placeholder in node {}: {}",
                name,
                rendered.text
            );
        }
    }

    #[test]
    fn test_missing_fields_render_empty() {
        let walker = walker();
        let mut session = Session::new(1);
        session.goto(SUMMARY_NODE);

        let rendered = walker.render(&mut session);
        assert_eq!(rendered.text, "Service: \nDetails: \nContact: @");
    }

    #[test]
    fn test_unknown_button_rerenders_same_node() {
        let walker = walker();
        let mut session = Session::new(1);
        session.goto("services");

        let before = walker.render(&mut session);
        let step = walker.press(&mut session, "No Such Button");

        assert_eq!(session.node, "services");
        assert_eq!(step.rendered, before);
        assert_matches!(step.effect, StepEffect::None);
    }

    #[test]
    fn test_unknown_session_node_falls_back_to_root() {
        let walker = walker();
        let mut session = Session::new(1);
        session.goto("deleted_node");

        let rendered = walker.render(&mut session);

        assert_eq!(session.node, ROOT_NODE);
        assert!(rendered.text.contains("main menu"));
        assert!(rendered.text.contains("Welcome!"));
    }

    #[test]
    fn test_description_page_records_category_and_parent() {
        let walker = walker();
        let mut session = Session::new(1);
        session.goto("services");

        let step = walker.press(&mut session, "Web Design");

        assert_eq!(session.node, "web_design");
        assert_eq!(session.category.as_deref(), Some("Web Design"));
        assert_eq!(session.parent_node.as_deref(), Some("services"));
        assert_eq!(
            step.rendered.options,
            vec![REQUEST_SERVICE.to_string(), BACK.to_string()]
        );
    }

    #[test]
    fn test_back_returns_to_parent_then_root() {
        let walker = walker();
        let mut session = Session::new(1);
        session.goto("services");
        walker.press(&mut session, "Web Design");

        walker.press(&mut session, BACK);
        assert_eq!(session.node, "services");

        // No recorded parent left, Back lands on the root menu.
        walker.press(&mut session, BACK);
        assert_eq!(session.node, ROOT_NODE);
    }

    #[test]
    fn test_full_request_flow_emits_submit_effect() {
        let walker = walker();
        let mut session = Session::new(1);

        walker.press(&mut session, "Browse Services");
        walker.press(&mut session, "Web Design");
        walker.press(&mut session, REQUEST_SERVICE);
        assert_eq!(session.node, DETAILS_NODE);

        assert!(walker.text(&mut session, "Need a 5-page site").is_some());
        assert_eq!(session.node, USERNAME_NODE);

        assert!(walker.text(&mut session, "@alice").is_some());
        assert_eq!(session.node, SUMMARY_NODE);

        let summary = walker.render(&mut session);
        assert!(summary.text.contains("Web Design"));
        assert!(summary.text.contains("Need a 5-page site"));
        assert!(summary.text.contains("@alice"));

        let step = walker.press(&mut session, CONFIRM_REQUEST);
        assert_matches!(step.effect, StepEffect::SubmitRequest);
        assert_eq!(session.node, CONFIRMATION_NODE);
        assert_eq!(session.username.as_deref(), Some("alice"));
    }

    #[test]
    fn test_cancel_request_resets_session() {
        let walker = walker();
        let mut session = Session::new(1);
        session.goto(SUMMARY_NODE);
        session.category = Some("Web Design".to_string());
        session.details = Some("Need a 5-page site".to_string());

        let step = walker.press(&mut session, CANCEL_REQUEST);

        assert_matches!(step.effect, StepEffect::SessionCleared);
        assert_eq!(session.node, ROOT_NODE);
        assert!(!session.has_draft());
    }

    #[test]
    fn test_text_outside_collection_states_is_ignored() {
        let walker = walker();
        let mut session = Session::new(1);

        assert!(walker.text(&mut session, "hello?").is_none());
        assert_eq!(session.node, ROOT_NODE);
        assert!(session.details.is_none());
    }

    #[test]
    fn test_username_strips_leading_at() {
        let walker = walker();
        let mut session = Session::new(1);
        session.goto(USERNAME_NODE);

        walker.text(&mut session, "  @bob  ");
        assert_eq!(session.username.as_deref(), Some("bob"));
    }

    #[test]
    fn test_render_template_edge_cases() {
        let mut params = HashMap::new();
        params.insert("category", "SEO".to_string());

        assert_eq!(render_template("plain text", &params), "plain text");
        assert_eq!(render_template("got {category}", &params), "got SEO");
        assert_eq!(render_template("got {unknown}", &params), "got ");
        assert_eq!(render_template("dangling {brace", &params), "dangling {brace");
        assert_eq!(render_template("{category}{category}", &params), "SEOSEO");
    }

    proptest! {
        #[test]
        fn prop_unmapped_buttons_never_move_the_session(input in "[a-zA-Z0-9 ]{0,24}") {
            let walker = walker();
            prop_assume!(!is_reserved(&input));

            let mut session = Session::new(1);
            session.goto("services");
            let mapped = walker
                .menu()
                .node("services")
                .map(|n| n.next.contains_key(input.as_str()))
                .unwrap_or(false);
            prop_assume!(!mapped);

            let step = walker.press(&mut session, &input);

            prop_assert_eq!(session.node.as_str(), "services");
            prop_assert_eq!(step.effect, StepEffect::None);
        }
    }
}
