use serenity::builder::CreateEmbed;
use serenity::model::channel::Message;
use serenity::prelude::Context;

pub async fn execute(ctx: &Context, msg: &Message, prefix: &str) -> Result<(), String> {
    let embed = CreateEmbed::default()
        .title("📖 Index Tracker Help")
        .description("Charts and exports historical NIFTY and BANKNIFTY closes.")
        .color(0x00b0f4)
        .field(
            "🎯 General",
            format!("`{p}ping` - Check bot and data source latency\n`{p}help` - Show this help message", p = prefix),
            false,
        )
        .field(
            "📈 Charts",
            format!(
                "`{p}track [indices] [period] [options]` - Chart with preview table and CSV\n`{p}track help` - Options reference",
                p = prefix
            ),
            false,
        )
        .field(
            "📥 Export",
            format!("`{p}csv [indices] [period] [options] [long|wide]` - CSV download only", p = prefix),
            false,
        );

    msg.channel_id
        .send_message(ctx, serenity::builder::CreateMessage::default().embed(embed))
        .await
        .map_err(|e| format!("Failed to send help message: {}", e))?;

    Ok(())
}
