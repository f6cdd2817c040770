//! OrderPilot Telegram Bot
//!
//! Main application entry point

use std::sync::Arc;
use std::time::Duration;

use teloxide::dispatching::UpdateHandler;
use teloxide::{prelude::*, types::Update};
use tracing::{error, info, warn};

use OrderPilot::{
    config::Settings,
    database::{self, DatabaseService},
    handlers::{self, Command},
    menu::{MenuDefinition, MenuWalker},
    services::NotificationService,
    state::SessionStore,
    utils::logging,
};

type HandlerResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    // Load configuration
    let settings = Settings::new()?;
    settings.validate()?;

    // Initialize logging; the guard must live as long as the process
    let _log_guard = logging::init_logging(&settings.logging)?;

    info!("Starting {} v{}...", OrderPilot::NAME, OrderPilot::VERSION);

    // Initialize database connection
    info!("Connecting to database...");
    let db_config = database::DatabaseConfig {
        url: settings.database.connection_url()?,
        max_connections: settings.database.max_connections,
        min_connections: settings.database.min_connections,
        acquire_timeout: Duration::from_secs(30),
        idle_timeout: Some(Duration::from_secs(600)),
        max_lifetime: Some(Duration::from_secs(1800)),
    };
    let db_pool = database::create_pool_with_retry(&db_config, 6, Duration::from_secs(1)).await?;

    info!("Initializing database schema...");
    database::init_schema(&db_pool).await?;
    let database_service = DatabaseService::new(db_pool);

    // Load and validate the conversation tree
    info!("Loading menu definition...");
    let menu = Arc::new(MenuDefinition::load(&settings.menu.path).await?);
    let menu_walker = MenuWalker::new(menu);

    // Initialize session storage
    let store = SessionStore::from_config(&settings.session).await?;
    info!(store = ?store, "Session store ready");

    // Initialize bot and services
    let bot = Bot::new(&settings.bot.token);
    let notifier = NotificationService::new(bot.clone(), settings.bot.channel_id);

    info!("Setting up bot handlers...");
    let handler = create_handler();

    let mut dispatcher = Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![
            Arc::new(menu_walker),
            Arc::new(store),
            Arc::new(database_service),
            Arc::new(notifier)
        ])
        .default_handler(|upd| async move {
            warn!("Unhandled update: {:?}", upd);
        })
        .enable_ctrlc_handler()
        .build();

    info!("OrderPilot is ready, starting polling...");
    dispatcher.dispatch().await;

    info!("OrderPilot has been shut down.");
    Ok(())
}

/// Create the main update handler
fn create_handler() -> UpdateHandler<Box<dyn std::error::Error + Send + Sync + 'static>> {
    use teloxide::dispatching::UpdateFilterExt;

    dptree::entry()
        .branch(
            Update::filter_message()
                .branch(
                    // Handle commands
                    dptree::entry()
                        .filter_command::<Command>()
                        .endpoint(handle_commands),
                )
                .branch(
                    // Handle regular messages
                    dptree::endpoint(handle_messages),
                ),
        )
        .branch(
            // Handle callback queries
            Update::filter_callback_query().endpoint(handle_callbacks),
        )
}

/// Handle bot commands
async fn handle_commands(
    bot: Bot,
    msg: Message,
    cmd: Command,
    menu_walker: Arc<MenuWalker>,
    store: Arc<SessionStore>,
) -> HandlerResult {
    let menu_walker = (*menu_walker).clone();
    let store = (*store).clone();

    if let Err(e) = handlers::handle_command(bot, msg, cmd, menu_walker, store).await {
        error!(error = %e, "Error handling command");
        return Err(e.into());
    }

    Ok(())
}

/// Handle regular messages
async fn handle_messages(
    bot: Bot,
    msg: Message,
    menu_walker: Arc<MenuWalker>,
    store: Arc<SessionStore>,
    database: Arc<DatabaseService>,
) -> HandlerResult {
    let menu_walker = (*menu_walker).clone();
    let store = (*store).clone();
    let database = (*database).clone();

    if let Err(e) = handlers::handle_message(bot, msg, menu_walker, store, database).await {
        error!(error = %e, "Error handling message");
        return Err(e.into());
    }

    Ok(())
}

/// Handle callback queries
async fn handle_callbacks(
    bot: Bot,
    query: teloxide::types::CallbackQuery,
    menu_walker: Arc<MenuWalker>,
    store: Arc<SessionStore>,
    database: Arc<DatabaseService>,
    notifier: Arc<NotificationService>,
) -> HandlerResult {
    let user_id = query.from.id.0 as i64;

    let menu_walker = (*menu_walker).clone();
    let store = (*store).clone();
    let database = (*database).clone();
    let notifier = (*notifier).clone();

    if let Err(e) =
        handlers::handle_callback_query(bot, query, menu_walker, store, database, notifier).await
    {
        error!(user_id = user_id, error = %e, "Error handling callback query");
        return Err(e.into());
    }

    Ok(())
}
