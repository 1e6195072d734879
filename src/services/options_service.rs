use std::collections::BTreeSet;

use crate::models::{CsvLayout, DisplayOptions, IndexName, OptionsError, Period};

/// Options for one render cycle plus the requested CSV shape
#[derive(Debug, Clone, PartialEq)]
pub struct TrackRequest {
    pub options: DisplayOptions,
    pub layout: CsvLayout,
}

/// Parse command arguments into display options.
///
/// Arguments may come in any order. Anything not given keeps the dashboard
/// default (both indices, 90 days, normalized, newest first, highlighted).
///
/// Examples: `nifty 30 raw`, `nifty,banknifty 365d fwd nohl wide`
pub fn parse_args(args: &[&str]) -> Result<TrackRequest, OptionsError> {
    let defaults = DisplayOptions::default();
    let mut indices: BTreeSet<IndexName> = BTreeSet::new();
    let mut period = defaults.period;
    let mut normalize = defaults.normalize;
    let mut reverse = defaults.reverse;
    let mut highlight_latest = defaults.highlight_latest;
    let mut layout = CsvLayout::default();

    for arg in args {
        match arg.to_lowercase().as_str() {
            "norm" | "normalize" | "normalized" => normalize = true,
            "raw" | "nonorm" | "price" => normalize = false,
            "rev" | "reverse" | "newest" => reverse = true,
            "fwd" | "forward" | "oldest" => reverse = false,
            "hl" | "highlight" => highlight_latest = true,
            "nohl" | "nohighlight" => highlight_latest = false,
            "wide" => layout = CsvLayout::Wide,
            "long" => layout = CsvLayout::Long,
            "all" | "both" => indices.extend(IndexName::ALL),
            token if token.contains(',') => {
                for part in token.split(',').filter(|p| !p.is_empty()) {
                    indices.insert(part.parse().map_err(OptionsError::InvalidIndex)?);
                }
            }
            token => {
                if let Ok(parsed) = token.parse::<Period>() {
                    period = parsed;
                } else if let Ok(index) = token.parse::<IndexName>() {
                    indices.insert(index);
                } else {
                    return Err(OptionsError::UnknownArgument(arg.to_string()));
                }
            }
        }
    }

    if indices.is_empty() {
        indices = defaults.indices().clone();
    }

    let options = DisplayOptions::new(indices, period, normalize, reverse, highlight_latest)?;
    Ok(TrackRequest { options, layout })
}
