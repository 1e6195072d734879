use std::collections::BTreeMap;

use tracing::info;

use crate::api::yahoo::YahooClient;
use crate::models::{CsvLayout, DisplayOptions, IndexName, PreparedSeries};
use crate::services::{chart_service, export_service, fetch_service, series_service};
use crate::utils::TrackerError;

/// Rows shown in the inline preview table
pub const PREVIEW_ROWS: usize = 10;

/// Everything one `$track` reply carries
pub struct Dashboard {
    pub title: String,
    pub chart_png: Vec<u8>,
    pub preview: String,
    pub csv: Vec<u8>,
    pub csv_file_name: String,
    pub prepared: BTreeMap<IndexName, PreparedSeries>,
}

/// Fetch the selected indices and prepare them for display
pub async fn load_series(
    client: &YahooClient,
    options: &DisplayOptions,
) -> Result<BTreeMap<IndexName, PreparedSeries>, TrackerError> {
    let raw = fetch_service::fetch_indices(client, options).await?;
    let prepared = series_service::prepare(&raw, options)?;
    Ok(prepared)
}

/// Run a full render cycle: fetch, prepare, chart, preview and CSV
pub async fn build_dashboard(
    client: &YahooClient,
    options: &DisplayOptions,
    layout: CsvLayout,
    chart_size: (u32, u32),
) -> Result<Dashboard, TrackerError> {
    let prepared = load_series(client, options).await?;

    let chart_png = chart_service::generate_chart(&prepared, options, chart_size.0, chart_size.1)?;
    let preview = export_service::preview_table(&prepared, options, PREVIEW_ROWS);
    let csv = export_service::export_csv(&prepared, options, layout)?;
    let csv_file_name = export_service::export_file_name(options);

    info!(
        "Render cycle complete: {} series, chart {} bytes, csv {} bytes",
        prepared.len(),
        chart_png.len(),
        csv.len()
    );

    Ok(Dashboard {
        title: chart_service::chart_title(options),
        chart_png,
        preview,
        csv,
        csv_file_name,
        prepared,
    })
}
