//! # Spreadsheet Loader
//!
//! Reads one worksheet of an Office Open XML workbook (`.xlsx`, `.xlsm`) into a
//! [`Table`]. The workbook is read straight from its zip container with a
//! streaming XML parser: relationships, sheet list, date system, number formats
//! and shared strings first, then the cells of the selected sheet.
//!
//! The first row holding a value becomes the header. Numbers load as floats,
//! booleans as `1.0`/`0.0`, date and time formatted numbers as ISO text, and
//! error cells and configured null literals as absent values.
use crate::error::SheetStatsError;
use crate::table::Table;
use std::path::Path;
use thiserror::Error;
use tracing::info;
use tracing::warn;

mod cell;
mod criteria;
mod excel;
mod reference;
mod sheet;
mod xlsx;

pub use criteria::Criteria;
pub use criteria::DEFAULT_NULL_LITERALS;

use sheet::Sheet;
use xlsx::XlsxSpreadsheet;

/// File extensions of supported workbooks, lower case.
pub const SUPPORTED_EXTENSIONS: [&str; 2] = ["xlsx", "xlsm"];

/// Errors specific to workbook reading.
#[derive(Error, Debug)]
pub enum SpreadsheetError {
    #[error("Unsupported file format '{0}', expected an .xlsx or .xlsm workbook")]
    UnsupportedFileFormat(String),

    #[error("Workbook '{0}' is password protected")]
    PasswordProtected(String),

    #[error("Workbook '{0}' has no worksheets")]
    EmptyWorkbook(String),

    #[error("Sheet '{sheet}' not found in '{file}', available sheets: {available}")]
    SheetNotFound {
        file: String,
        sheet: String,
        available: String,
    },

    #[error("Workbook part '{0}' is missing")]
    MissingPart(String),

    #[error("Invalid cell value in file '{0}', sheet '{1}', cell {2}: {3}")]
    CellValueError(String, String, String, String),
}

/// A workbook format able to produce the cells of one worksheet.
pub(crate) trait Spreadsheet {
    /// Name of the workbook file
    fn name(&self) -> &str;

    /// Worksheet names in workbook order
    fn sheet_names(&self) -> Vec<&str>;

    /// Reads the worksheet selected by `criteria`.
    fn read_sheet(&mut self, criteria: &Criteria) -> Result<Sheet, SheetStatsError>;
}

/// Opens a workbook, choosing the reader from the file extension.
pub(crate) fn open_spreadsheet(path: &Path) -> Result<Box<dyn Spreadsheet>, SheetStatsError> {
    let extension = path
        .extension()
        .and_then(|extension| extension.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    if !SUPPORTED_EXTENSIONS.contains(&extension.as_str()) {
        Err(SpreadsheetError::UnsupportedFileFormat(path.display().to_string()))?
    }
    let spreadsheet = XlsxSpreadsheet::open(path)?;
    Ok(Box::new(spreadsheet))
}

/// Loads one worksheet of a workbook as a table.
///
/// # Arguments
/// * `path` - Path of the `.xlsx` or `.xlsm` file
/// * `criteria` - Sheet selection and null handling
///
/// # Errors
/// Fails if the file cannot be opened, is not a supported workbook, is password
/// protected, lacks the requested sheet, or holds malformed content.
pub fn load_table(path: impl AsRef<Path>, criteria: &Criteria) -> Result<Table, SheetStatsError> {
    let path = path.as_ref();
    let mut spreadsheet = open_spreadsheet(path)?;
    let sheet = spreadsheet.read_sheet(criteria)?;
    if sheet.is_empty() {
        warn!(workbook = spreadsheet.name(), sheet = %sheet.name, "worksheet has no cells");
    }
    let sheet_name = sheet.name.to_owned();
    let table = sheet.into_table(criteria)?;
    info!(
        workbook = spreadsheet.name(),
        sheet = %sheet_name,
        rows = table.row_count(),
        columns = table.column_count(),
        "worksheet loaded"
    );
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn unsupported_extension() {
        let error = load_table("data.ods", &Criteria::default()).unwrap_err();
        assert!(matches!(
            error,
            SheetStatsError::SpreadsheetError(SpreadsheetError::UnsupportedFileFormat(_))
        ));
        assert!(load_table("no_extension", &Criteria::default()).is_err());
    }

    #[test]
    fn missing_file() {
        let error = load_table("does/not/exist.xlsx", &Criteria::default()).unwrap_err();
        assert!(matches!(error, SheetStatsError::IoError(_)));
    }

    #[test]
    fn password_protected_workbook() {
        let directory = tempfile::tempdir().unwrap();
        let path = directory.path().join("locked.XLSX");
        let mut content = vec![0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1];
        content.resize(512, 0);
        fs::write(&path, content).unwrap();
        let error = load_table(&path, &Criteria::default()).unwrap_err();
        assert!(matches!(
            error,
            SheetStatsError::SpreadsheetError(SpreadsheetError::PasswordProtected(_))
        ));
    }
}
