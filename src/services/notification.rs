//! Notification service implementation
//!
//! Announces stored requests to the studio's destination channel. The
//! announcement is a side effect of a successful submission: failures are
//! logged and swallowed so the user-facing flow never depends on it.

use teloxide::{prelude::*, types::ChatId, Bot};
use tracing::{debug, error, info};

use crate::models::ServiceRequest;

/// Best-effort channel announcements for new requests
#[derive(Clone)]
pub struct NotificationService {
    bot: Bot,
    channel: Option<ChatId>,
}

impl NotificationService {
    /// Create a new NotificationService; `channel_id` comes from the bot
    /// configuration and disables announcements when unset
    pub fn new(bot: Bot, channel_id: Option<i64>) -> Self {
        Self {
            bot,
            channel: channel_id.map(ChatId),
        }
    }

    /// Announce a stored request to the configured channel
    pub async fn announce_request(&self, request: &ServiceRequest) {
        let Some(channel) = self.channel else {
            debug!(request_id = request.id, "No channel configured, skipping announcement");
            return;
        };

        let text = format!(
            "📨 New request #{}\n\nService: {}\nDetails: {}\nContact: @{}",
            request.id,
            request.category,
            request.details,
            request.username.as_deref().unwrap_or("-"),
        );

        match self.bot.send_message(channel, text).await {
            Ok(_) => {
                info!(request_id = request.id, channel = channel.0, "Request announced to channel");
            }
            Err(e) => {
                error!(
                    request_id = request.id,
                    channel = channel.0,
                    error = %e,
                    "Failed to announce request to channel"
                );
            }
        }
    }
}

impl std::fmt::Debug for NotificationService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotificationService")
            .field("channel", &self.channel)
            .finish_non_exhaustive()
    }
}
