use thiserror::Error;

/// Main error type for sheet_stats.
/// Aggregates errors from the standard library, dependencies and the crate's own modules.
#[derive(Error, Debug)]
pub enum SheetStatsError {
    #[error("{0}")]
    WithContextError(String),

    // Standard library errors
    #[error("{0}")]
    IoError(#[from] std::io::Error),

    #[error("{0}")]
    ParseIntError(#[from] std::num::ParseIntError),

    #[error("{0}")]
    ParseFloatError(#[from] std::num::ParseFloatError),

    #[error("{0}")]
    StringEncodingError(#[from] std::str::Utf8Error),

    // Third-party library errors
    #[error("{0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("{0}")]
    XmlError(#[from] quick_xml::Error),

    #[error("{0}")]
    XmlEncodingError(#[from] quick_xml::encoding::EncodingError),

    #[error("{0}")]
    XmlAttributeError(#[from] quick_xml::events::attributes::AttrError),

    // Helper module errors
    #[error("{0}")]
    XmlHelperError(#[from] crate::helpers::xml::XmlError),

    // Domain module errors
    #[error("{0}")]
    SpreadsheetError(#[from] crate::spreadsheet::SpreadsheetError),

    #[error("{0}")]
    TableError(#[from] crate::table::TableError),

    #[error("{0}")]
    ReportError(#[from] crate::report::ReportError),

    // Collaborator errors
    #[error("{0}")]
    ExportError(#[from] crate::export::ExportError),

    #[error("{0}")]
    ConfigError(#[from] crate::config::ConfigError),

    #[error("{0}")]
    MailError(#[from] crate::mail::MailError),
}

pub(crate) trait ResultMessage {
    fn with_prefix(self, message: &str) -> Self;
}

impl<T> ResultMessage for Result<T, SheetStatsError> {
    fn with_prefix(self, message: &str) -> Self {
        self.map_err(|e| SheetStatsError::WithContextError(format!("{}: {}", message, e)))
    }
}
