use serenity::all::{CreateAttachment, CreateMessage};
use serenity::model::channel::Message;
use serenity::prelude::Context;

use crate::services::{dashboard_service, export_service, options_service};
use crate::utils::TrackerError;

pub async fn execute(ctx: &Context, msg: &Message, args: &[&str]) -> Result<(), String> {
    tracing::info!("📥 CSV command from user {} with args: {:?}", msg.author.id, args);

    let request = options_service::parse_args(args).map_err(|e| TrackerError::from(e).user_message())?;
    let options = request.options;
    let state = crate::app_state(ctx).await?;

    let prepared = dashboard_service::load_series(&state.yahoo, &options)
        .await
        .map_err(|e| {
            tracing::warn!("CSV render cycle failed for {:?}: {}", options, e);
            e.user_message()
        })?;

    let csv = export_service::export_csv(&prepared, &options, request.layout)
        .map_err(|e| TrackerError::from(e).user_message())?;
    let file_name = export_service::export_file_name(&options);
    tracing::debug!("Exported {} ({} bytes)", file_name, csv.len());

    let message = CreateMessage::default()
        .content(format!("📥 **{}**", file_name))
        .add_file(CreateAttachment::bytes(csv, file_name.clone()));

    msg.channel_id
        .send_message(ctx, message)
        .await
        .map_err(|e| format!("Failed to send CSV: {}", e))?;

    Ok(())
}
