pub mod csv;
pub mod help;
pub mod ping;
pub mod track;

use serenity::builder::{CreateEmbed, CreateMessage};
use serenity::model::channel::Message;
use serenity::prelude::Context;

use crate::utils::extract_clean_error;

/// Split a message into a known command name and its arguments.
/// Returns `None` when the message is not addressed to the bot.
pub fn parse_command<'a>(content: &'a str, prefix: &str) -> Option<(&'a str, Vec<&'a str>)> {
    let mut parts = content.split_whitespace();
    let command = parts.next()?.strip_prefix(prefix)?;
    if command.is_empty() {
        return None;
    }
    Some((command, parts.collect()))
}

pub async fn handle_message(ctx: &Context, msg: &Message) {
    if msg.author.bot {
        return;
    }

    let prefix = match crate::app_state(ctx).await {
        Ok(state) => state.config.command_prefix.clone(),
        Err(e) => {
            tracing::error!("{}", e);
            return;
        }
    };

    let Some((command, args)) = parse_command(&msg.content, &prefix) else {
        return;
    };
    let command = command.to_lowercase();

    let result = match command.as_str() {
        "ping" => ping::execute(ctx, msg).await,
        "help" => help::execute(ctx, msg, &prefix).await,
        "track" | "tracker" | "nifty" => track::execute(ctx, msg, &args).await,
        "csv" | "export" => csv::execute(ctx, msg, &args).await,
        _ => return,
    };

    if let Err(error_msg) = result {
        tracing::warn!("❌ Error executing command {}: {}", command, error_msg);

        let clean_error = extract_clean_error(&error_msg);
        let user_message = if error_msg.contains("429") || error_msg.contains("rate limit") {
            "⚠️ **Rate Limited**: Discord is rate limiting us. Please try again in a moment.".to_string()
        } else if clean_error.is_empty() {
            "❌ An error occurred while executing the command.".to_string()
        } else if clean_error.starts_with('❌') || clean_error.starts_with('⚠') {
            clean_error
        } else {
            format!("❌ {}", clean_error)
        };

        let embed = CreateEmbed::default()
            .title("Command Error")
            .description(user_message)
            .color(0xff0000);

        if let Err(e) = msg.channel_id.send_message(ctx, CreateMessage::default().embed(embed)).await {
            tracing::error!("Failed to send error message: {}", e);
        }
    }
}
