//! Message handlers module
//!
//! Free text only matters in the two collection states (project details and
//! contact username); everywhere else the current menu is shown again with a
//! gentle nudge towards the buttons.

use teloxide::{prelude::*, types::Message, Bot};
use tracing::debug;

use crate::database::DatabaseService;
use crate::handlers::{append_request_history, send_rendered};
use crate::menu::{walker, MenuWalker};
use crate::state::SessionStore;
use crate::utils::errors::Result;

/// Handle incoming text messages
pub async fn handle_message(
    bot: Bot,
    msg: Message,
    menu_walker: MenuWalker,
    store: SessionStore,
    database: DatabaseService,
) -> Result<()> {
    let Some(user) = msg.from.as_ref() else {
        return Ok(());
    };

    // The request flow lives in private chats; group chatter is none of our
    // business.
    if !msg.chat.id.is_user() {
        return Ok(());
    }

    let Some(text) = msg.text() else {
        return Ok(());
    };

    let user_id = user.id.0 as i64;

    // Unrecognized commands fall through the command filter; swallowing them
    // here keeps "/typo" out of a request draft.
    if text.starts_with('/') {
        debug!(user_id = user_id, text = %text, "Ignoring unknown command");
        return Ok(());
    }

    let mut session = store.load_or_new(user_id).await?;

    match menu_walker.text(&mut session, text) {
        Some(rendered) => {
            debug!(user_id = user_id, node = %session.node, "Collected free-text input");
            store.save(&session).await?;
            send_rendered(&bot, msg.chat.id, &rendered).await?;
        }
        None => {
            let mut rendered = menu_walker.render(&mut session);
            if session.node == walker::MY_REQUESTS_NODE {
                append_request_history(&mut rendered, &database, user_id).await;
            }
            rendered.text = format!("⚠️ Please use the menu buttons.\n\n{}", rendered.text);

            // render() may have normalized a stale node back to the root
            store.save(&session).await?;
            send_rendered(&bot, msg.chat.id, &rendered).await?;
        }
    }

    Ok(())
}
