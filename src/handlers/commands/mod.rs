//! Command handlers module
//!
//! This module contains handlers for all bot commands like /start, /help, etc.

pub mod help;
pub mod start;

use teloxide::{types::Message, utils::command::BotCommands, Bot};

use crate::menu::MenuWalker;
use crate::state::SessionStore;
use crate::utils::errors::Result;

/// All available bot commands
#[derive(BotCommands, Clone)]
#[command(rename_rule = "lowercase", description = "OrderPilot commands:")]
pub enum Command {
    #[command(description = "Start over from the main menu")]
    Start,
    #[command(description = "Show help information")]
    Help,
    #[command(description = "Discard the current request draft")]
    Cancel,
}

/// Main command dispatcher
pub async fn handle_command(
    bot: Bot,
    msg: Message,
    cmd: Command,
    walker: MenuWalker,
    store: SessionStore,
) -> Result<()> {
    match cmd {
        Command::Start => start::handle_start(bot, msg, walker, store).await,
        Command::Help => help::handle_help(bot, msg).await,
        Command::Cancel => start::handle_cancel(bot, msg, store).await,
    }
}
