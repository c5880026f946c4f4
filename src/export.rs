//! CSV export of normalized tables.
use crate::error::ResultMessage;
use crate::error::SheetStatsError;
use crate::table::Table;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use thiserror::Error;
use tracing::debug;
use tracing::info;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Source path '{0}' has no file name")]
    InvalidSourcePath(String),

    #[error("{0}")]
    CsvError(#[from] csv::Error),
}

/// Derives `{stem}.csv` from the source workbook path.
///
/// The file lands in `output_dir` when given, next to the source otherwise.
pub fn csv_path_for(source: &Path, output_dir: Option<&Path>) -> Result<PathBuf, ExportError> {
    output_path(source, output_dir, ".csv")
}

/// Builds `{stem}{suffix}` inside `output_dir` or the source's directory.
pub(crate) fn output_path(source: &Path, output_dir: Option<&Path>, suffix: &str) -> Result<PathBuf, ExportError> {
    let stem = source
        .file_stem()
        .ok_or_else(|| ExportError::InvalidSourcePath(source.display().to_string()))?;
    let mut file_name = stem.to_os_string();
    file_name.push(suffix);
    let directory = output_dir.or_else(|| source.parent()).unwrap_or_else(|| Path::new(""));
    Ok(directory.join(file_name))
}

/// Writes the table to `path` as UTF-8 CSV, replacing any existing file.
pub fn export_csv(table: &Table, path: &Path) -> Result<(), SheetStatsError> {
    let file = File::create(path)
        .map_err(SheetStatsError::from)
        .with_prefix(&format!("Create '{}' failed", path.display()))?;
    write_csv(table, file).with_prefix(&format!("Write '{}' failed", path.display()))?;
    info!(path = %path.display(), rows = table.row_count(), "table exported to csv");
    Ok(())
}

/// Writes a header line of column names and one record per row.
///
/// Absent cells become empty fields and floats use their natural decimal form.
/// A table without columns produces no output at all.
pub fn write_csv<W: Write>(table: &Table, writer: W) -> Result<(), SheetStatsError> {
    if table.column_count() == 0 {
        debug!("table has no columns, nothing to write");
        return Ok(());
    }
    let mut writer = csv::Writer::from_writer(writer);
    writer.write_record(table.column_names()).map_err(ExportError::from)?;
    for row in table.rows() {
        writer
            .write_record(row.iter().map(ToString::to_string))
            .map_err(ExportError::from)?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::normalize;
    use crate::table::Column;

    fn to_csv(table: &Table) -> String {
        let mut buffer = Vec::new();
        write_csv(table, &mut buffer).unwrap();
        String::from_utf8(buffer).unwrap()
    }

    #[test]
    fn paths() {
        assert_eq!(
            csv_path_for(Path::new("/data/report.xlsx"), None).unwrap(),
            PathBuf::from("/data/report.csv")
        );
        assert_eq!(
            csv_path_for(Path::new("/data/report.xlsx"), Some(Path::new("/out"))).unwrap(),
            PathBuf::from("/out/report.csv")
        );
        assert_eq!(csv_path_for(Path::new("report.xlsx"), None).unwrap(), PathBuf::from("report.csv"));
        assert!(matches!(
            csv_path_for(Path::new("/"), None),
            Err(ExportError::InvalidSourcePath(_))
        ));
    }

    #[test]
    fn normalized_table() {
        let table = Table::from_columns(vec![
            Column::float("col1", [Some(1.0), Some(2.0)]),
            Column::text("col2", [Some("3,1"), None]),
            Column::text("col3", [Some("a, b"), Some("c")]),
        ])
        .unwrap();
        assert_eq!(
            to_csv(&normalize(&table)),
            "col1,col2,col3\n1.0,3.1,a. b\n2.0,,c\n"
        );
    }

    #[test]
    fn header_only_and_no_columns() {
        let table = Table::from_columns(vec![Column::text("a", Vec::<Option<&str>>::new())]).unwrap();
        assert_eq!(to_csv(&table), "a\n");
        assert_eq!(to_csv(&Table::with_row_count(3)), "");
    }

    #[test]
    fn export_to_file() {
        let directory = tempfile::tempdir().unwrap();
        let path = directory.path().join("out.csv");
        std::fs::write(&path, "stale").unwrap();
        let table = Table::from_columns(vec![Column::float("x", [Some(0.5)])]).unwrap();
        export_csv(&table, &path).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "x\n0.5\n");
    }
}
