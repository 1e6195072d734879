use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use thiserror::Error;

use crate::models::{CsvLayout, DisplayOptions, IndexName, PreparedSeries};
use crate::utils::table::{Align, Table};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Errors raised while serializing the displayed table
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("Failed to finish CSV buffer: {0}")]
    Buffer(String),
}

/// Download name, e.g. `nifty_banknifty_90d.csv`
pub fn export_file_name(options: &DisplayOptions) -> String {
    let names: Vec<String> = options
        .indices()
        .iter()
        .map(|index| index.as_str().to_lowercase())
        .collect();
    format!("{}_{}d.csv", names.join("_"), options.period_days())
}

/// Serialize the prepared series to CSV bytes
pub fn export_csv(
    prepared: &BTreeMap<IndexName, PreparedSeries>,
    options: &DisplayOptions,
    layout: CsvLayout,
) -> Result<Vec<u8>, ExportError> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    match layout {
        CsvLayout::Long => {
            writer.write_record(["index", "date", "value"])?;
            for series in prepared.values() {
                for point in series.points() {
                    writer.write_record([
                        series.index().as_str().to_string(),
                        point.date.format(DATE_FORMAT).to_string(),
                        point.value.to_string(),
                    ])?;
                }
            }
        }
        CsvLayout::Wide => {
            let mut header = vec!["date".to_string()];
            header.extend(prepared.keys().map(|index| index.as_str().to_string()));
            writer.write_record(&header)?;

            for (date, values) in wide_rows(prepared, options.reverse) {
                let mut record = vec![date.format(DATE_FORMAT).to_string()];
                record.extend(values.iter().map(|v| v.map(|v| v.to_string()).unwrap_or_default()));
                writer.write_record(&record)?;
            }
        }
    }

    writer
        .into_inner()
        .map_err(|e| ExportError::Buffer(e.to_string()))
}

/// One row per date across all series, a cell per index.
/// Dates run newest first when `reverse` is set.
pub fn wide_rows(
    prepared: &BTreeMap<IndexName, PreparedSeries>,
    reverse: bool,
) -> Vec<(NaiveDate, Vec<Option<f64>>)> {
    let lookups: Vec<BTreeMap<NaiveDate, f64>> = prepared
        .values()
        .map(|series| series.points().iter().map(|p| (p.date, p.value)).collect())
        .collect();

    let dates: BTreeSet<NaiveDate> = lookups.iter().flat_map(|l| l.keys().copied()).collect();
    let ordered: Vec<NaiveDate> = if reverse {
        dates.into_iter().rev().collect()
    } else {
        dates.into_iter().collect()
    };

    ordered
        .into_iter()
        .map(|date| {
            let values = lookups.iter().map(|l| l.get(&date).copied()).collect();
            (date, values)
        })
        .collect()
}

/// Code block preview of the first `max_rows` display rows.
/// Rows holding a latest point are marked with `*`.
pub fn preview_table(
    prepared: &BTreeMap<IndexName, PreparedSeries>,
    options: &DisplayOptions,
    max_rows: usize,
) -> String {
    let mut headers = vec!["", "Date"];
    headers.extend(prepared.keys().map(IndexName::as_str));

    let mut table = Table::new(headers);
    for column in 2..2 + prepared.len() {
        table = table.align(column, Align::Right);
    }

    let latest_dates: BTreeSet<NaiveDate> = if options.highlight_latest {
        prepared.values().map(|s| s.latest_point().date).collect()
    } else {
        BTreeSet::new()
    };

    let rows = wide_rows(prepared, options.reverse);
    let total = rows.len();

    for (date, values) in rows.into_iter().take(max_rows) {
        let marker = if latest_dates.contains(&date) { "*" } else { "" };
        let mut row = vec![marker.to_string(), date.format(DATE_FORMAT).to_string()];
        row.extend(values.iter().map(|v| match v {
            Some(v) if options.normalize => format!("{:.4}", v),
            Some(v) => format!("{:.2}", v),
            None => "-".to_string(),
        }));
        table.add_row(row);
    }

    table.set_hidden_rows(total.saturating_sub(max_rows));
    table.render()
}
