//! End-to-end run: load, normalize, export, aggregate, log and optionally mail.
use crate::config::MailConfig;
use crate::error::ResultMessage;
use crate::error::SheetStatsError;
use crate::export::csv_path_for;
use crate::export::export_csv;
use crate::mail::send_file;
use crate::mail::DeliveryOutcome;
use crate::normalize::normalize;
use crate::numeric::select_numeric;
use crate::report::aggregate;
use crate::report::StatisticsReport;
use crate::spreadsheet::load_table;
use crate::spreadsheet::Criteria;
use crate::statistics_log::log_path_for;
use crate::statistics_log::StatisticsLog;
use crate::table::Table;
use std::path::PathBuf;
use tracing::info;
use tracing::info_span;

/// What to read, where to write and whom to mail.
#[derive(Clone, Debug, Default)]
pub struct PipelineOptions {
    /// Source workbook
    pub input: PathBuf,
    pub criteria: Criteria,
    /// Directory for the CSV and log files; the input's directory when None.
    pub output_dir: Option<PathBuf>,
    pub mail: Option<MailRequest>,
}

/// Mail the source workbook to `recipient` using the account in `config_path`.
#[derive(Clone, Debug)]
pub struct MailRequest {
    pub recipient: String,
    pub config_path: PathBuf,
}

/// Everything one run produced.
#[derive(Debug)]
pub struct PipelineRun {
    pub normalized: Table,
    pub report: StatisticsReport,
    pub csv_path: PathBuf,
    pub log_path: PathBuf,
    /// None when no mail was requested
    pub delivery: Option<DeliveryOutcome>,
}

/// Normalizes a raw table and computes its statistics report.
pub fn analyze(table: &Table) -> (Table, StatisticsReport) {
    let normalized = normalize(table);
    let numeric = select_numeric(&normalized);
    let report = aggregate(&normalized, &numeric);
    (normalized, report)
}

/// Runs the whole pipeline once.
///
/// The CSV file is rewritten and one entry is appended to the statistics log.
/// A mail connection failure is reported in [`PipelineRun::delivery`]; every
/// other failure aborts the run.
pub fn run(options: &PipelineOptions) -> Result<PipelineRun, SheetStatsError> {
    let input = options.input.as_path();
    let _span = info_span!("pipeline", input = %input.display()).entered();
    let output_dir = options.output_dir.as_deref();

    let table = load_table(input, &options.criteria)
        .with_prefix(&format!("Load '{}' failed", input.display()))?;
    let (normalized, report) = analyze(&table);

    let csv_path = csv_path_for(input, output_dir)?;
    export_csv(&normalized, &csv_path)?;

    let log_path = log_path_for(input, output_dir)?;
    StatisticsLog::open(&log_path)?.append(&report)?;

    let delivery = match &options.mail {
        Some(request) => {
            let config = MailConfig::load(&request.config_path)?;
            Some(send_file(&config, &request.recipient, input)?)
        }
        None => None,
    };

    info!(
        rows = report.row_count(),
        columns = report.column_count(),
        csv = %csv_path.display(),
        log = %log_path.display(),
        "pipeline finished"
    );
    Ok(PipelineRun {
        normalized,
        report,
        csv_path,
        log_path,
        delivery,
    })
}
