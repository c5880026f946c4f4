//! # Statistics Report Module
//!
//! Aggregates per-column statistics of a normalized table into an immutable
//! [`StatisticsReport`] and renders it as text.
//!
//! Every column gets a unique value count and a null count. Columns of the
//! numeric subset additionally get their mean (rounded to one decimal place,
//! ties to even), minimum and maximum. Empty tables and all-absent columns
//! produce well-defined empty values instead of errors.
use crate::table::Column;
use crate::table::ColumnData;
use crate::table::Table;
use std::collections::HashSet;
use thiserror::Error;

mod render;

pub use render::format;
pub use render::format_table_summary;
pub use render::parse_table_summary;
pub use render::FIELD_LABELS;
pub use render::PLACEHOLDER;

/// Errors raised for malformed report text.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ReportError {
    #[error("Malformed table summary line '{0}'")]
    MalformedSummary(String),
}

/// Descriptive statistics of one column.
#[derive(Clone, Debug, PartialEq)]
pub struct ColumnStatistics {
    pub name: String,
    /// Distinct present values
    pub unique_count: usize,
    /// Absent cells
    pub null_count: usize,
    /// Mean rounded to one decimal place, numeric columns only
    pub mean: Option<f64>,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

/// Table-level counts plus per-column statistics in table column order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StatisticsReport {
    row_count: usize,
    column_count: usize,
    columns: Vec<ColumnStatistics>,
}

impl StatisticsReport {
    pub fn row_count(&self) -> usize {
        self.row_count
    }

    pub fn column_count(&self) -> usize {
        self.column_count
    }

    pub fn columns(&self) -> &[ColumnStatistics] {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Option<&ColumnStatistics> {
        self.columns.iter().find(|column| column.name == name)
    }
}

/// Computes the statistics report of a normalized table and its numeric subset.
///
/// Unique and null counts cover every column of `normalized`; mean, min and max
/// are only filled for columns that also appear in `numeric`.
pub fn aggregate(normalized: &Table, numeric: &Table) -> StatisticsReport {
    let columns = normalized
        .columns()
        .iter()
        .map(|column| {
            let summary = numeric
                .column(column.name())
                .map(NumericSummary::of)
                .unwrap_or_default();
            ColumnStatistics {
                name: column.name().to_owned(),
                unique_count: unique_count(column),
                null_count: column.null_count(),
                mean: summary.mean,
                min: summary.min,
                max: summary.max,
            }
        })
        .collect();
    StatisticsReport {
        row_count: normalized.row_count(),
        column_count: normalized.column_count(),
        columns,
    }
}

/// Counts distinct present values. `0.0` and `-0.0` count as one value.
pub fn unique_count(column: &Column) -> usize {
    match column.data() {
        ColumnData::Text(_) => column
            .text_values()
            .into_iter()
            .flatten()
            .flatten()
            .collect::<HashSet<&str>>()
            .len(),
        ColumnData::Float(_) => column
            .present_floats()
            .into_iter()
            .flatten()
            .map(|number| (if number == 0.0 { 0.0f64 } else { number }).to_bits())
            .collect::<HashSet<u64>>()
            .len(),
    }
}

/// Rounds to one decimal place, ties to even on the scaled value.
pub fn round_to_one_decimal(value: f64) -> f64 {
    (value * 10.0).round_ties_even() / 10.0
}

/// Mean, minimum and maximum of a float column's present values.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
struct NumericSummary {
    mean: Option<f64>,
    min: Option<f64>,
    max: Option<f64>,
}

impl NumericSummary {
    fn of(column: &Column) -> Self {
        let Some(values) = column.present_floats() else {
            return Self::default();
        };
        let mut count = 0usize;
        let mut sum = 0f64;
        let mut min: Option<f64> = None;
        let mut max: Option<f64> = None;
        for value in values {
            count += 1;
            sum += value;
            min = Some(min.map_or(value, |min| min.min(value)));
            max = Some(max.map_or(value, |max| max.max(value)));
        }
        Self {
            // inf and -inf average to NaN
            mean: (count > 0)
                .then(|| round_to_one_decimal(sum / count as f64))
                .filter(|mean| !mean.is_nan()),
            min,
            max,
        }
    }
}
