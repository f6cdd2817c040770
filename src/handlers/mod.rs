//! Bot handlers module
//!
//! This module contains all Telegram bot handlers organized by type:
//! - Command handlers for bot commands
//! - Callback handlers for inline keyboard interactions
//! - Message handlers for text messages
//!
//! The shared helpers here turn the walker's transport-agnostic [`Rendered`]
//! values into actual Telegram messages.

pub mod callbacks;
pub mod commands;
pub mod messages;

use teloxide::{
    prelude::*,
    types::{ChatId, InlineKeyboardButton, InlineKeyboardMarkup, MessageId},
    Bot,
};
use tracing::warn;

use crate::database::DatabaseService;
use crate::menu::Rendered;
use crate::utils::errors::Result;

// Re-export commonly used handler functions
pub use callbacks::handle_callback_query;
pub use commands::{handle_command, Command};
pub use messages::handle_message;

/// Build the inline keyboard for a rendered node, one button per row, with
/// the button label doubling as the callback payload
pub(crate) fn keyboard(options: &[String]) -> Option<InlineKeyboardMarkup> {
    if options.is_empty() {
        return None;
    }

    Some(InlineKeyboardMarkup::new(options.iter().map(|option| {
        vec![InlineKeyboardButton::callback(
            option.clone(),
            option.clone(),
        )]
    })))
}

/// Send a rendered node as a fresh message
pub(crate) async fn send_rendered(bot: &Bot, chat_id: ChatId, rendered: &Rendered) -> Result<()> {
    match keyboard(&rendered.options) {
        Some(markup) => {
            bot.send_message(chat_id, rendered.text.clone())
                .reply_markup(markup)
                .await?;
        }
        None => {
            bot.send_message(chat_id, rendered.text.clone()).await?;
        }
    }

    Ok(())
}

/// Replace an existing menu message in place, the way button-driven menus
/// are expected to behave
pub(crate) async fn edit_rendered(
    bot: &Bot,
    chat_id: ChatId,
    message_id: MessageId,
    rendered: &Rendered,
) -> Result<()> {
    match keyboard(&rendered.options) {
        Some(markup) => {
            bot.edit_message_text(chat_id, message_id, rendered.text.clone())
                .reply_markup(markup)
                .await?;
        }
        None => {
            bot.edit_message_text(chat_id, message_id, rendered.text.clone())
                .await?;
        }
    }

    Ok(())
}

/// Append the user's persisted requests to the my-requests page text.
///
/// A failed lookup degrades to an "unavailable" line; the menu itself still
/// renders.
pub(crate) async fn append_request_history(
    rendered: &mut Rendered,
    database: &DatabaseService,
    user_id: i64,
) {
    match database.requests.list_by_user(user_id).await {
        Ok(requests) if requests.is_empty() => {
            rendered.text.push_str("\n\n(No requests yet.)");
        }
        Ok(requests) => {
            let lines: Vec<String> = requests
                .iter()
                .map(|r| format!("#{} | {} | {}", r.id, r.category, r.status))
                .collect();
            rendered.text.push_str("\n\n");
            rendered.text.push_str(&lines.join("\n"));
        }
        Err(e) => {
            warn!(user_id = user_id, error = %e, "Failed to load request history");
            rendered
                .text
                .push_str("\n\n(Your requests are unavailable right now, please try again later.)");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyboard_one_button_per_row() {
        let markup = keyboard(&["A".to_string(), "B".to_string()]).unwrap();
        assert_eq!(markup.inline_keyboard.len(), 2);
        assert_eq!(markup.inline_keyboard[0].len(), 1);
    }

    #[test]
    fn test_keyboard_empty_options() {
        assert!(keyboard(&[]).is_none());
    }
}
