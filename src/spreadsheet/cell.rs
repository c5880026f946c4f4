use crate::error::SheetStatsError;
use crate::spreadsheet::criteria::Criteria;
use crate::spreadsheet::reference::index_to_reference;
use crate::table::Value;
use chrono::Duration;
use chrono::NaiveDate;

/// Day zero of both workbook date systems, before the 1904 offset is applied.
const EXCEL_EPOCH: NaiveDate = match NaiveDate::from_ymd_opt(1899, 12, 30) {
    Some(date) => date,
    None => panic!("invalid epoch"),
};

const MILLISECONDS_PER_DAY: f64 = 86_400_000f64;

/// Types of cell data in a worksheet.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub(crate) enum CellType {
    #[default]
    Empty,
    /// Boolean values stored as 0/1
    Boolean,
    /// Numeric values
    Number,
    /// Date/time values stored as numbers from 1900 epoch
    NumberDateTime1900,
    /// Date values stored as numbers from 1900 epoch
    NumberDate1900,
    /// Time values stored as numbers from 1900 epoch
    NumberTime1900,
    /// Date/time values stored as numbers from 1904 epoch
    NumberDateTime1904,
    /// Date values stored as numbers from 1904 epoch
    NumberDate1904,
    /// Time values stored as numbers from 1904 epoch
    NumberTime1904,
    /// ISO 8601 date/time strings
    IsoDateTime,
    /// Inline or resolved shared string
    Text,
    /// Index into the shared string table
    SharedString,
    /// Error values such as `#DIV/0!`
    Error,
}

impl CellType {
    /// Maps built-in number format IDs to date and time types.
    pub(crate) fn parse_builtin_number_format_id(id: &str, is_1904: bool) -> Option<Self> {
        match id {
            "22" => Some(if is_1904 { Self::NumberDateTime1904 } else { Self::NumberDateTime1900 }),
            "14" | "15" | "16" | "17" => Some(if is_1904 { Self::NumberDate1904 } else { Self::NumberDate1900 }),
            "18" | "19" | "20" | "21" | "45" | "46" | "47" => {
                Some(if is_1904 { Self::NumberTime1904 } else { Self::NumberTime1900 })
            }
            _ => None,
        }
    }

    /// Classifies a custom number format code such as `yyyy-mm-dd hh:mm`.
    ///
    /// Quoted literals, escaped characters and bracketed sections (colors,
    /// conditions) are ignored; a remaining `y`/`d` marks a date, `h`/`s` a time.
    pub(crate) fn parse_custom_number_format(format: &str, is_1904: bool) -> Self {
        let mut is_escaped = false;
        let mut is_literal = false;
        let mut is_bracket = false;
        let mut is_date = false;
        let mut is_time = false;
        for character in format.chars() {
            match character {
                _ if is_escaped => is_escaped = false,
                '_' | '\\' => is_escaped = true,

                '"' if is_literal => is_literal = false,
                '"' if !is_bracket => is_literal = true,

                ']' if is_bracket => is_bracket = false,
                '[' if !is_literal => is_bracket = true,
                _ if is_literal || is_bracket => (),

                'Y' | 'y' | 'D' | 'd' => is_date = true,
                'H' | 'h' | 'S' | 's' => is_time = true,
                _ => (),
            }
        }

        match (is_date, is_time, is_1904) {
            (true, true, false) => Self::NumberDateTime1900,
            (true, true, true) => Self::NumberDateTime1904,
            (true, false, false) => Self::NumberDate1900,
            (true, false, true) => Self::NumberDate1904,
            (false, true, false) => Self::NumberTime1900,
            (false, true, true) => Self::NumberTime1904,
            (false, false, _) => Self::Number,
        }
    }
}

/// A single non-empty cell of a worksheet.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Cell {
    /// Row index (0-based)
    pub(crate) row: usize,
    /// Column index (0-based)
    pub(crate) col: usize,
    pub(crate) kind: CellType,
    /// Raw text of the cell as stored in the sheet
    pub(crate) value: String,
}

impl Cell {
    /// Returns the A1-style reference of the cell.
    pub(crate) fn reference(&self) -> String {
        index_to_reference(self.row, self.col)
    }

    pub(crate) fn to_double(&self) -> Result<f64, SheetStatsError> {
        Ok(self.value.trim().parse::<f64>()?)
    }

    /// Converts the cell into a table value.
    ///
    /// Numbers stay numeric and booleans become `1.0`/`0.0`; dates and times
    /// become ISO text, and null literals or error cells become absent.
    pub(crate) fn to_value(&self, criteria: &Criteria) -> Result<Value, SheetStatsError> {
        let value = match self.kind {
            CellType::Empty | CellType::Error => Value::Absent,
            CellType::Boolean => Value::Float(if self.value.trim() == "1" { 1.0 } else { 0.0 }),
            CellType::Number => Value::Float(self.to_double()?),
            CellType::NumberDate1900 | CellType::NumberDate1904 => {
                let serial = self.to_double()?;
                to_date_string(serial, self.kind == CellType::NumberDate1904)
                    .map_or(Value::Float(serial), Value::Text)
            }
            CellType::NumberDateTime1900 | CellType::NumberDateTime1904 => {
                let serial = self.to_double()?;
                to_datetime_string(serial, self.kind == CellType::NumberDateTime1904)
                    .map_or(Value::Float(serial), Value::Text)
            }
            CellType::NumberTime1900 | CellType::NumberTime1904 => {
                Value::Text(to_time_string(self.to_double()?))
            }
            CellType::IsoDateTime => Value::Text(self.value.replace('T', " ")),
            CellType::Text | CellType::SharedString if criteria.is_null(&self.value) => Value::Absent,
            CellType::Text | CellType::SharedString => Value::Text(self.value.to_owned()),
        };
        Ok(value)
    }
}

/// Splits a serial date into whole days and milliseconds into the day.
fn split_serial(serial: f64) -> (i64, i64) {
    let total = (serial * MILLISECONDS_PER_DAY).round() as i64;
    let day = MILLISECONDS_PER_DAY as i64;
    (total.div_euclid(day), total.rem_euclid(day))
}

/// Converts a serial day number to a date, or None outside the calendar range.
/// The 1900 system counts the nonexistent 1900-02-29, so serials below 60 shift by one.
fn to_date(days: i64, is_1904: bool) -> Option<NaiveDate> {
    let offset = if is_1904 {
        1462
    } else if days < 60 {
        1
    } else {
        0
    };
    EXCEL_EPOCH.checked_add_signed(Duration::try_days(days + offset)?)
}

fn to_date_string(serial: f64, is_1904: bool) -> Option<String> {
    let (days, _) = split_serial(serial);
    Some(to_date(days, is_1904)?.format("%Y-%m-%d").to_string())
}

fn to_datetime_string(serial: f64, is_1904: bool) -> Option<String> {
    let (days, milliseconds) = split_serial(serial);
    let date = to_date(days, is_1904)?.format("%Y-%m-%d");
    Some(format!("{date} {}", format_milliseconds(milliseconds)))
}

/// Converts a day fraction to `HH:MM:SS`. Durations past one day keep counting hours.
fn to_time_string(serial: f64) -> String {
    format_milliseconds((serial * MILLISECONDS_PER_DAY).round() as i64)
}

fn format_milliseconds(total: i64) -> String {
    let milliseconds = total % 1_000;
    let seconds = total / 1_000 % 60;
    let minutes = total / 60_000 % 60;
    let hours = total / 3_600_000;
    if milliseconds > 0 {
        format!("{hours:02}:{minutes:02}:{seconds:02}.{milliseconds:03}")
    } else {
        format!("{hours:02}:{minutes:02}:{seconds:02}")
    }
}
