//! Menu module
//!
//! The JSON-driven conversation tree and the walker that traverses it.

pub mod definition;
pub mod walker;

// Re-export commonly used menu components
pub use definition::{MenuDefinition, MenuNode};
pub use walker::{MenuWalker, Rendered, Step, StepEffect};
