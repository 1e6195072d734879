use std::collections::BTreeMap;

use tracing::{debug, info};

use crate::api::yahoo::{FetchError, YahooClient};
use crate::models::{DisplayOptions, IndexName, TimeSeries};

/// Fetch raw daily closes for every index selected in `options`.
///
/// Indices are fetched one after another. An index with no rows comes back
/// as an empty series and is left for preparation to reject.
pub async fn fetch_indices(
    client: &YahooClient,
    options: &DisplayOptions,
) -> Result<BTreeMap<IndexName, TimeSeries>, FetchError> {
    let mut raw = BTreeMap::new();

    for &index in options.indices() {
        debug!("Fetching {} ({}) for {}", index, index.yahoo_symbol(), options.period);
        let series = client
            .get_daily_closes(index.yahoo_symbol(), options.period_days())
            .await?;
        if let Some(last) = series.last() {
            debug!("{} latest close {} on {}", index, last.value, last.date);
        }
        raw.insert(index, series);
    }

    info!(
        "Fetched {} index series ({} points total)",
        raw.len(),
        raw.values().map(TimeSeries::len).sum::<usize>()
    );

    Ok(raw)
}
