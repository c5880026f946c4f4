//! Append-only statistics log.
//!
//! Every run adds one timestamped entry holding the table summary and the
//! column statistics table, closed by a rule line. Earlier entries are never
//! rewritten.
use crate::error::ResultMessage;
use crate::error::SheetStatsError;
use crate::export::output_path;
use crate::export::ExportError;
use crate::report;
use crate::report::StatisticsReport;
use chrono::Local;
use chrono::NaiveDateTime;
use std::fs::File;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use tracing::info;

/// Width of the rule line closing every entry.
pub const RULE_WIDTH: usize = 150;

/// Timestamp layout of entry headers, e.g. `05-Mar-24 14:02:11`.
pub const TIMESTAMP_FORMAT: &str = "%d-%b-%y %H:%M:%S";

/// Derives `{stem}_statistics.log` from the source workbook path.
pub fn log_path_for(source: &Path, output_dir: Option<&Path>) -> Result<PathBuf, ExportError> {
    output_path(source, output_dir, "_statistics.log")
}

/// Writes statistics entries to a sink.
pub struct StatisticsLog<W: Write> {
    writer: W,
}

impl StatisticsLog<File> {
    /// Opens a log file for appending, creating it if needed.
    pub fn open(path: &Path) -> Result<Self, SheetStatsError> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(SheetStatsError::from)
            .with_prefix(&format!("Open log '{}' failed", path.display()))?;
        Ok(Self::new(file))
    }
}

impl<W: Write> StatisticsLog<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Appends an entry stamped with the current local time.
    pub fn append(&mut self, report: &StatisticsReport) -> Result<(), SheetStatsError> {
        self.append_at(&Local::now().naive_local(), report)
    }

    /// Appends an entry stamped with the given time.
    pub fn append_at(&mut self, timestamp: &NaiveDateTime, report: &StatisticsReport) -> Result<(), SheetStatsError> {
        let entry = render_entry(timestamp, report);
        self.writer.write_all(entry.as_bytes())?;
        self.writer.flush()?;
        info!(
            rows = report.row_count(),
            columns = report.column_count(),
            "statistics entry appended"
        );
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

/// Renders one complete log entry, trailing newline included.
pub fn render_entry(timestamp: &NaiveDateTime, report: &StatisticsReport) -> String {
    format!(
        "{} \n\nTABLE STATISTICS:\n\n{}\n\nCOLUMN STATISTICS:\n\n{}\n{}\n",
        timestamp.format(TIMESTAMP_FORMAT),
        report::format_table_summary(report),
        report::format(report),
        "=".repeat(RULE_WIDTH)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::normalize;
    use crate::numeric::select_numeric;
    use crate::report::aggregate;
    use crate::table::Column;
    use crate::table::Table;
    use chrono::NaiveDate;

    fn timestamp() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 5)
            .unwrap()
            .and_hms_opt(14, 2, 11)
            .unwrap()
    }

    fn report() -> StatisticsReport {
        let table = Table::from_columns(vec![
            Column::float("col1", [Some(1.0), Some(2.0), Some(3.0), Some(4.0)]),
            Column::text("col2", [Some("3,1"), Some("4,5"), Some("8,4"), Some("3,4")]),
        ])
        .unwrap();
        let normalized = normalize(&table);
        aggregate(&normalized, &select_numeric(&normalized))
    }

    #[test]
    fn entry_layout() {
        let entry = render_entry(&timestamp(), &report());
        let expected = format!(
            "05-Mar-24 14:02:11 \n\nTABLE STATISTICS:\n\nNumber of records: 4\nNumber of columns: 2\n\nCOLUMN STATISTICS:\n\n{}\n{}\n",
            report::format(&report()),
            "=".repeat(150)
        );
        assert_eq!(entry, expected);
    }

    #[test]
    fn entries_accumulate() {
        let mut log = StatisticsLog::new(Vec::new());
        log.append_at(&timestamp(), &report()).unwrap();
        log.append(&StatisticsReport::default()).unwrap();
        let text = String::from_utf8(log.into_inner()).unwrap();
        assert_eq!(text.matches("TABLE STATISTICS:").count(), 2);
        assert!(text.starts_with("05-Mar-24 14:02:11 \n"));
        assert!(text.contains("Number of records: 0\nNumber of columns: 0"));
        assert!(text.ends_with(&format!("{}\n", "=".repeat(RULE_WIDTH))));
    }

    #[test]
    fn log_file_is_appended() {
        let directory = tempfile::tempdir().unwrap();
        let path = log_path_for(Path::new("/somewhere/sales.xlsx"), Some(directory.path())).unwrap();
        assert_eq!(path, directory.path().join("sales_statistics.log"));

        StatisticsLog::open(&path).unwrap().append_at(&timestamp(), &report()).unwrap();
        StatisticsLog::open(&path).unwrap().append_at(&timestamp(), &report()).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text, render_entry(&timestamp(), &report()).repeat(2));
    }
}
