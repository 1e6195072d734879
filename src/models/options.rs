//! Display option models

use std::collections::BTreeSet;

use thiserror::Error;

use super::index::{IndexName, Period};

/// Errors raised while building display options
#[derive(Debug, Error, PartialEq)]
pub enum OptionsError {
    #[error("Please select at least one index")]
    NoIndexSelected,
    #[error("{0}")]
    InvalidIndex(String),
    #[error("Unknown argument: '{0}'")]
    UnknownArgument(String),
}

/// How the CSV export arranges rows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CsvLayout {
    /// One `index,date,value` row per point
    #[default]
    Long,
    /// One row per date with a column per index
    Wide,
}

/// Everything the user chose for one render cycle
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayOptions {
    indices: BTreeSet<IndexName>,
    pub period: Period,
    pub normalize: bool,
    pub reverse: bool,
    pub highlight_latest: bool,
}

impl DisplayOptions {
    pub fn new(
        indices: BTreeSet<IndexName>,
        period: Period,
        normalize: bool,
        reverse: bool,
        highlight_latest: bool,
    ) -> Result<Self, OptionsError> {
        if indices.is_empty() {
            return Err(OptionsError::NoIndexSelected);
        }

        Ok(Self {
            indices,
            period,
            normalize,
            reverse,
            highlight_latest,
        })
    }

    /// Selected indices, never empty
    pub fn indices(&self) -> &BTreeSet<IndexName> {
        &self.indices
    }

    pub fn period_days(&self) -> usize {
        self.period.days()
    }
}

impl Default for DisplayOptions {
    fn default() -> Self {
        Self {
            indices: IndexName::ALL.into_iter().collect(),
            period: Period::default(),
            normalize: true,
            reverse: true,
            highlight_latest: true,
        }
    }
}
