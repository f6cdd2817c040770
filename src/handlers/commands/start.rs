//! Start and cancel command handlers
//!
//! `/start` always begins a fresh conversation: whatever draft the user had
//! in flight is discarded and the root menu is shown. `/cancel` drops the
//! session without re-opening the menu.

use teloxide::{prelude::*, types::Message, Bot};
use tracing::{debug, info};

use crate::handlers::send_rendered;
use crate::menu::MenuWalker;
use crate::state::{Session, SessionStore};
use crate::utils::errors::{OrderPilotError, Result};
use crate::utils::logging;

/// Handle /start command - reset the session and show the root menu
pub async fn handle_start(
    bot: Bot,
    msg: Message,
    walker: MenuWalker,
    store: SessionStore,
) -> Result<()> {
    let user = msg
        .from
        .as_ref()
        .ok_or_else(|| OrderPilotError::InvalidInput("No user in message".to_string()))?;
    let user_id = user.id.0 as i64;
    let chat_id = msg.chat.id;

    debug!(user_id = user_id, chat_id = ?chat_id, "Processing /start command");

    if !chat_id.is_user() {
        bot.send_message(chat_id, "Please message me privately to file a request.")
            .await?;
        return Ok(());
    }

    let mut session = Session::new(user_id);
    let rendered = walker.render(&mut session);
    store.save(&session).await?;

    send_rendered(&bot, chat_id, &rendered).await?;
    logging::log_user_action(user_id, "start", None);

    Ok(())
}

/// Handle /cancel command - drop the session entirely
pub async fn handle_cancel(bot: Bot, msg: Message, store: SessionStore) -> Result<()> {
    let user = msg
        .from
        .as_ref()
        .ok_or_else(|| OrderPilotError::InvalidInput("No user in message".to_string()))?;
    let user_id = user.id.0 as i64;

    store.delete(user_id).await?;
    info!(user_id = user_id, "Session cancelled");

    bot.send_message(msg.chat.id, "❌ Cancelled. Send /start whenever you're ready.")
        .await?;

    Ok(())
}
