//! Callback query handlers module
//!
//! Every inline button press lands here: the payload is the button label,
//! the walker decides where the conversation goes, and the menu message is
//! edited in place whenever Telegram still lets us reach it.

use teloxide::{prelude::*, types::CallbackQuery, types::ChatId, Bot};
use tracing::{debug, error, info, warn};

use crate::database::DatabaseService;
use crate::handlers::{append_request_history, edit_rendered, send_rendered};
use crate::menu::{walker, MenuWalker, StepEffect};
use crate::models::NewRequest;
use crate::services::NotificationService;
use crate::state::SessionStore;
use crate::utils::errors::Result;
use crate::utils::logging;

/// Main callback query dispatcher
pub async fn handle_callback_query(
    bot: Bot,
    query: CallbackQuery,
    menu_walker: MenuWalker,
    store: SessionStore,
    database: DatabaseService,
    notifier: NotificationService,
) -> Result<()> {
    let user_id = query.from.id.0 as i64;

    // Answer first so the client stops showing the loading state, whatever
    // happens to the press afterwards.
    if let Err(e) = bot.answer_callback_query(query.id.clone()).await {
        warn!(user_id = user_id, error = %e, "Failed to answer callback query");
    }

    let Some(choice) = query.data.clone() else {
        warn!(user_id = user_id, "Callback query without data");
        return Ok(());
    };

    let mut session = store.load_or_new(user_id).await?;
    debug!(
        user_id = user_id,
        node = %session.node,
        choice = %choice,
        "Processing button press"
    );

    let mut step = menu_walker.press(&mut session, &choice);

    match step.effect {
        StepEffect::SubmitRequest => {
            let record = NewRequest::from_session(&session);
            match database.requests.create(record).await {
                Ok(stored) => {
                    info!(
                        user_id = user_id,
                        request_id = stored.id,
                        category = %stored.category,
                        "Request stored"
                    );
                    logging::log_user_action(user_id, "request_submitted", Some(&stored.category));
                    notifier.announce_request(&stored).await;
                }
                Err(e) => {
                    // Deliberately visible: the user is put back on the
                    // summary page instead of seeing a confirmation for a
                    // request that was never stored.
                    error!(user_id = user_id, error = %e, "Failed to store request");
                    session.goto(walker::SUMMARY_NODE);
                    let mut rendered = menu_walker.render(&mut session);
                    rendered.text = format!(
                        "⚠️ Your request could not be saved just now — nothing was lost, \
                         please press Confirm again in a moment.\n\n{}",
                        rendered.text
                    );
                    step.rendered = rendered;
                }
            }
        }
        StepEffect::SessionCleared => {
            debug!(user_id = user_id, "Draft discarded");
        }
        StepEffect::None => {}
    }

    if session.node == walker::MY_REQUESTS_NODE {
        append_request_history(&mut step.rendered, &database, user_id).await;
    }

    store.save(&session).await?;

    match query.message.as_ref() {
        Some(message) => {
            // Re-rendering the same node produces an identical message and
            // Telegram rejects the no-op edit; that is fine.
            if let Err(e) =
                edit_rendered(&bot, message.chat().id, message.id(), &step.rendered).await
            {
                debug!(user_id = user_id, error = %e, "Menu edit skipped");
            }
        }
        None => {
            send_rendered(&bot, ChatId(user_id), &step.rendered).await?;
        }
    }

    Ok(())
}
