//! # sheet_stats
//!
//! Reads the first (or a named) worksheet of an Excel workbook, cleans its
//! values and records descriptive statistics about it.
//!
//! ## Pipeline
//!
//! 1. [`spreadsheet::load_table`] decodes an `.xlsx`/`.xlsm` sheet into a [`Table`]
//! 2. [`normalize::normalize`] turns decimal commas into periods and numeric
//!    looking text columns into float columns
//! 3. [`export::export_csv`] writes the normalized table next to the source
//! 4. [`report::aggregate`] computes unique counts, mean, min and max
//! 5. [`statistics_log::StatisticsLog`] appends a timestamped entry to the log
//! 6. [`mail::send_file`] optionally mails the workbook over SMTP
//!
//! [`pipeline::run`] chains all of them and is what the `sheet-stats` binary calls.
pub mod config;
pub mod error;
pub mod export;
mod helpers;
pub mod mail;
pub mod normalize;
pub mod numeric;
pub mod pipeline;
pub mod report;
pub mod spreadsheet;
pub mod statistics_log;
pub mod table;

pub use error::SheetStatsError;
pub use pipeline::run;
pub use pipeline::PipelineOptions;
pub use report::StatisticsReport;
pub use spreadsheet::Criteria;
pub use table::Table;
