//! # Decimal Normalizer
//!
//! Rewrites comma decimal separators into dots and converts every column whose
//! cells all parse as numbers into a float column. A column that does not fully
//! parse is kept as text; the failed attempt is a regular outcome, not an error.
use crate::table::Column;
use crate::table::Table;
use std::borrow::Cow;

/// Outcome of converting one column to floating point.
#[derive(Clone, Debug, PartialEq)]
pub enum ColumnParse {
    /// Every cell parsed; `None` marks an absent cell.
    Numeric(Vec<Option<f64>>),
    /// At least one present cell is not a number.
    Rejected,
}

/// Normalizes decimal separators and coerces numeric columns to float.
///
/// The input is left untouched. Float columns pass through unchanged, text
/// columns get `,` replaced by `.` in every cell and become float columns only
/// when all of their cells parse.
pub fn normalize(table: &Table) -> Table {
    let columns = table.columns().iter().map(normalize_column).collect();
    Table::from_parts(columns, table.row_count())
}

/// Normalizes a single column.
pub fn normalize_column(column: &Column) -> Column {
    let Some(values) = column.text_values() else {
        return column.clone();
    };
    let substituted: Vec<Option<Cow<'_, str>>> = values
        .map(|value| value.map(replace_decimal_separator))
        .collect();
    match parse_column(substituted.iter().map(Option::as_deref)) {
        ColumnParse::Numeric(numbers) => Column::float(column.name(), numbers),
        ColumnParse::Rejected => Column::text(column.name(), substituted),
    }
}

/// Replaces every `,` with `.`.
pub fn replace_decimal_separator(value: &str) -> Cow<'_, str> {
    if value.contains(',') {
        Cow::Owned(value.replace(',', "."))
    } else {
        Cow::Borrowed(value)
    }
}

/// Attempts to parse every cell of a column as a number.
/// Absent cells always succeed and stay absent.
pub fn parse_column<'a, I>(values: I) -> ColumnParse
where
    I: IntoIterator<Item = Option<&'a str>>,
{
    let mut numbers = Vec::new();
    for value in values {
        match value {
            None => numbers.push(None),
            Some(text) => match parse_number(text) {
                Some(number) => numbers.push(Some(number).filter(|number| !number.is_nan())),
                None => return ColumnParse::Rejected,
            },
        }
    }
    ColumnParse::Numeric(numbers)
}

/// Parses a dot-separated decimal, ignoring surrounding whitespace.
pub fn parse_number(value: &str) -> Option<f64> {
    value.trim().parse::<f64>().ok()
}
