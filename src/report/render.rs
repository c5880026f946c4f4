use crate::report::ColumnStatistics;
use crate::report::ReportError;
use crate::report::StatisticsReport;
use crate::table::format_float;

/// Rendered in place of an absent statistic.
pub const PLACEHOLDER: &str = "-";

/// Field labels of the column statistics table, in output order.
pub const FIELD_LABELS: [&str; 5] = ["Unique values", "Null values", "Average", "Min", "Max"];

const RECORDS_LABEL: &str = "Number of records: ";
const COLUMNS_LABEL: &str = "Number of columns: ";
const FIELD_SEPARATOR: &str = "  ";

/// Renders the two-line table summary.
pub fn format_table_summary(report: &StatisticsReport) -> String {
    format!(
        "{RECORDS_LABEL}{}\n{COLUMNS_LABEL}{}",
        report.row_count(),
        report.column_count()
    )
}

/// Reads back the (row_count, column_count) pair written by [`format_table_summary`].
///
/// Leading and trailing blank lines are ignored.
///
/// # Errors
///
/// Returns an error if the text does not consist of exactly the two summary lines.
pub fn parse_table_summary(text: &str) -> Result<(usize, usize), ReportError> {
    let mut lines = text.lines().filter(|line| !line.trim().is_empty());
    let row_count = parse_summary_line(lines.next(), RECORDS_LABEL)?;
    let column_count = parse_summary_line(lines.next(), COLUMNS_LABEL)?;
    if let Some(line) = lines.next() {
        Err(ReportError::MalformedSummary(line.to_owned()))?
    }
    Ok((row_count, column_count))
}

fn parse_summary_line(line: Option<&str>, label: &str) -> Result<usize, ReportError> {
    let line = line.unwrap_or_default();
    line.trim()
        .strip_prefix(label)
        .and_then(|count| count.trim().parse::<usize>().ok())
        .ok_or_else(|| ReportError::MalformedSummary(line.to_owned()))
}

/// Renders the column statistics as an aligned text table.
///
/// The first line holds the field labels; every following line starts with the
/// column name and lists the fields in [`FIELD_LABELS`] order, right aligned.
pub fn format(report: &StatisticsReport) -> String {
    let rows: Vec<(&str, [String; 5])> = report
        .columns()
        .iter()
        .map(|column| (column.name.as_str(), fields(column)))
        .collect();

    let name_width = rows
        .iter()
        .map(|(name, _)| name.chars().count())
        .max()
        .unwrap_or(0);
    let mut widths = FIELD_LABELS.map(|label| label.chars().count());
    for (_, fields) in &rows {
        for (width, field) in widths.iter_mut().zip(fields) {
            *width = (*width).max(field.chars().count());
        }
    }

    let mut lines = Vec::with_capacity(rows.len() + 1);
    lines.push(render_line("", name_width, &FIELD_LABELS, &widths));
    for (name, fields) in &rows {
        lines.push(render_line(name, name_width, fields, &widths));
    }
    lines.join("\n")
}

fn fields(column: &ColumnStatistics) -> [String; 5] {
    let float = |value: Option<f64>| {
        value
            .filter(|number| !number.is_nan())
            .map(format_float)
            .unwrap_or_else(|| PLACEHOLDER.to_owned())
    };
    [
        column.unique_count.to_string(),
        column.null_count.to_string(),
        float(column.mean),
        float(column.min),
        float(column.max),
    ]
}

fn render_line<S: AsRef<str>>(name: &str, name_width: usize, fields: &[S; 5], widths: &[usize; 5]) -> String {
    let mut line = format!("{name:<name_width$}");
    for (field, &width) in fields.iter().zip(widths) {
        line.push_str(FIELD_SEPARATOR);
        line.push_str(&format!("{:>width$}", field.as_ref()));
    }
    line
}
