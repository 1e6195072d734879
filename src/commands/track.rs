use serenity::all::{CreateAttachment, CreateEmbed, CreateEmbedFooter, CreateMessage};
use serenity::model::channel::Message;
use serenity::prelude::Context;

use crate::models::Period;
use crate::services::{dashboard_service, options_service};
use crate::utils::TrackerError;

const CHART_FILE_NAME: &str = "chart.png";

pub async fn execute(ctx: &Context, msg: &Message, args: &[&str]) -> Result<(), String> {
    tracing::info!("📈 Track command from user {} with args: {:?}", msg.author.id, args);

    if args.first().map(|a| a.eq_ignore_ascii_case("help")).unwrap_or(false) {
        return send_help(ctx, msg).await;
    }

    let request = options_service::parse_args(args).map_err(|e| TrackerError::from(e).user_message())?;
    let options = request.options;

    let state = crate::app_state(ctx).await?;

    if let Err(e) = msg.channel_id.broadcast_typing(&ctx.http).await {
        tracing::warn!("Failed to broadcast typing: {}", e);
    }

    let chart_size = (state.config.chart_width, state.config.chart_height);
    let dashboard = dashboard_service::build_dashboard(&state.yahoo, &options, request.layout, chart_size)
        .await
        .map_err(|e| {
            tracing::warn!("Render cycle failed for {:?}: {}", options, e);
            e.user_message()
        })?;

    let mut embed = CreateEmbed::default()
        .title(format!("📈 {}", dashboard.title))
        .description(format!("**📊 Data Preview**\n{}", dashboard.preview))
        .image(format!("attachment://{}", CHART_FILE_NAME))
        .color(0x00ff00);

    for series in dashboard.prepared.values() {
        let latest = series.latest_point();
        embed = embed.field(
            format!("{} latest", series.index()),
            format!("**{:.2}** on {}", latest.value, latest.date.format("%d %b %Y")),
            true,
        );
    }

    let footer = format!(
        "{} • {} • {}",
        if options.normalize { "normalized 0–1" } else { "closing price" },
        if options.reverse { "newest first" } else { "oldest first" },
        dashboard.csv_file_name
    );
    embed = embed.footer(CreateEmbedFooter::new(footer));

    let message = CreateMessage::default()
        .embed(embed)
        .add_file(CreateAttachment::bytes(dashboard.chart_png, CHART_FILE_NAME))
        .add_file(CreateAttachment::bytes(dashboard.csv, dashboard.csv_file_name.clone()));

    msg.channel_id
        .send_message(ctx, message)
        .await
        .map_err(|e| format!("Failed to send chart: {}", e))?;

    tracing::info!("✓ Dashboard sent to channel {}", msg.channel_id);
    Ok(())
}

async fn send_help(ctx: &Context, msg: &Message) -> Result<(), String> {
    let periods = Period::ALL
        .iter()
        .map(|p| p.days().to_string())
        .collect::<Vec<_>>()
        .join(", ");

    let help_embed = CreateEmbed::default()
        .title("📈 Track Command")
        .description("Chart NIFTY / BANKNIFTY history with a data preview and CSV download")
        .field("Usage", "`$track [indices] [period] [options]`", false)
        .field(
            "Examples",
            "`$track` (both indices, 90 days, normalized, newest first)\n\
             `$track nifty 30 raw` (NIFTY closing prices, last 30 days)\n\
             `$track nifty,banknifty 365 fwd nohl wide`",
            false,
        )
        .field("Periods", format!("{} (optional `d` suffix)", periods), false)
        .field(
            "Options",
            "`norm` / `raw` - normalize to 0–1 or show closing prices\n\
             `rev` / `fwd` - newest first or oldest first\n\
             `hl` / `nohl` - highlight the latest value\n\
             `long` / `wide` - CSV layout",
            false,
        )
        .color(0x00ff00);

    msg.channel_id
        .send_message(ctx, CreateMessage::default().embed(help_embed))
        .await
        .map_err(|e| e.to_string())?;
    Ok(())
}
