//! `sheet-stats` command line entry point.
//!
//! ```bash
//! sheet-stats sales.xlsx
//! sheet-stats sales.xlsx --sheet Q3 --output-dir out/
//! sheet-stats sales.xlsx --recipient boss@example.com --config mail.toml
//! ```
//!
//! Log verbosity follows `RUST_LOG` and defaults to `info`.
use anyhow::Context;
use anyhow::Result;
use clap::Parser;
use sheet_stats::config::DEFAULT_CONFIG_PATH;
use sheet_stats::pipeline;
use sheet_stats::pipeline::MailRequest;
use sheet_stats::pipeline::PipelineOptions;
use sheet_stats::Criteria;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "sheet-stats", version, about = "Clean an Excel sheet, export it to CSV and log its statistics")]
struct Cli {
    /// Workbook to read (.xlsx or .xlsm)
    input: PathBuf,

    /// Sheet to read instead of the first one
    #[arg(short, long)]
    sheet: Option<String>,

    /// Directory for the CSV and log files, defaults to the workbook's directory
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Mail the workbook to this address after processing
    #[arg(short, long)]
    recipient: Option<String>,

    /// Mail account configuration
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Fail on error cells such as #DIV/0! instead of reading them as empty
    #[arg(long)]
    strict_errors: bool,
}

impl Cli {
    fn into_options(self) -> PipelineOptions {
        let mut criteria = match self.sheet {
            Some(sheet) => Criteria::with_sheet(sheet),
            None => Criteria::default(),
        };
        criteria.error_as_null = !self.strict_errors;
        PipelineOptions {
            input: self.input,
            criteria,
            output_dir: self.output_dir,
            mail: self.recipient.map(|recipient| MailRequest {
                recipient,
                config_path: self.config,
            }),
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let options = Cli::parse().into_options();
    let outcome = pipeline::run(&options)
        .with_context(|| format!("Failed to process '{}'", options.input.display()))?;

    println!("Saved to CSV file.");
    println!("Statistics saved to log.");
    if let Some(delivery) = outcome.delivery {
        println!("{delivery}");
    }
    Ok(())
}
