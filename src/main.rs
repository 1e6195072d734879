use serenity::async_trait;
use serenity::model::channel::Message;
use serenity::model::gateway::Ready;
use serenity::prelude::*;
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

mod api;
mod commands;
mod models;
mod services;
mod utils;

use api::yahoo::YahooClient;
use utils::Config;

struct Handler;

struct BotData;

impl TypeMapKey for BotData {
    type Value = Instant;
}

/// Shared, read-only state handed to every command
pub struct AppState {
    pub config: Config,
    pub yahoo: YahooClient,
}

impl TypeMapKey for AppState {
    type Value = Arc<AppState>;
}

/// Fetch the shared state from the client data
pub async fn app_state(ctx: &Context) -> Result<Arc<AppState>, String> {
    let data = ctx.data.read().await;
    data.get::<AppState>()
        .cloned()
        .ok_or_else(|| "Bot state not initialized".to_string())
}

#[async_trait]
impl EventHandler for Handler {
    async fn message(&self, ctx: Context, msg: Message) {
        commands::handle_message(&ctx, &msg).await;
    }

    async fn ready(&self, _ctx: Context, ready: Ready) {
        info!("{} is connected!", ready.user.name);
    }
}

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("index_tracker=debug,serenity=warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .init();

    info!("📈 Starting index tracker...");

    let config = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            error!("Invalid configuration: {}", e);
            return;
        }
    };

    let yahoo = match YahooClient::with_base_url(config.yahoo_base_url.clone()) {
        Ok(client) => client,
        Err(e) => {
            error!("Failed to create quote client: {}", e);
            return;
        }
    };
    info!("Quote provider: {}", yahoo.base_url());

    let intents = GatewayIntents::DIRECT_MESSAGES
        | GatewayIntents::MESSAGE_CONTENT
        | GatewayIntents::GUILD_MESSAGES;

    let mut client = match Client::builder(&config.discord_token, intents)
        .event_handler(Handler)
        .await
    {
        Ok(client) => client,
        Err(e) => {
            error!("Failed to create client: {}", e);
            return;
        }
    };

    // Store the start time and shared state in client data
    {
        let mut data = client.data.write().await;
        data.insert::<BotData>(Instant::now());
        data.insert::<AppState>(Arc::new(AppState { config, yahoo }));
    }

    if let Err(e) = client.start().await {
        error!("Client error: {}", e);
    }
}
