//! Help command handler

use teloxide::{prelude::*, types::Message, Bot};

use crate::utils::errors::Result;

/// Handle /help command
pub async fn handle_help(bot: Bot, msg: Message) -> Result<()> {
    let help_text = "🤖 OrderPilot Help\n\n\
        /start - Start over from the main menu\n\
        /cancel - Discard the current request draft\n\
        /help - Show this help message\n\n\
        Use the buttons under each message to browse services and file a \
        request. Check My Requests on the main menu for the status of \
        requests you already filed.";

    bot.send_message(msg.chat.id, help_text).await?;
    Ok(())
}
