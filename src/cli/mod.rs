use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use std::fs::File;
use std::io::{stdout, Write};
use std::path::{Path, PathBuf};

use crate::application::SettlementService;
use crate::domain::{sort_canonical, SettlementConfig};
use crate::io::{
    read_snapshot_file, render_balances, render_message, write_balances_csv, Exporter,
};

/// settleup - split group expenses and work out who pays whom
#[derive(Parser)]
#[command(name = "settleup")]
#[command(about = "Compute per-currency balances and settlement transfers from a ledger snapshot")]
#[command(version)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Balances below this amount are treated as settled
    #[arg(long, global = true, default_value = "0.01")]
    pub tolerance: Decimal,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Recommend transfers that settle every balance
    Settle {
        /// Ledger snapshot (JSON)
        snapshot: PathBuf,

        /// Output format: text, csv, json
        #[arg(short, long, default_value = "text")]
        format: String,

        /// Sort transfers by currency, then debtor
        #[arg(long)]
        canonical: bool,

        /// Output file path (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show each participant's net balance per currency
    Balances {
        /// Ledger snapshot (JSON)
        snapshot: PathBuf,

        /// Output format: text, csv, json
        #[arg(short, long, default_value = "text")]
        format: String,
    },
}

impl Cli {
    pub fn run(self) -> Result<()> {
        let service = SettlementService::new(SettlementConfig::with_tolerance(self.tolerance));

        match self.command {
            Commands::Settle {
                snapshot,
                format,
                canonical,
                output,
            } => run_settle_command(&service, &snapshot, &format, canonical, output.as_deref()),

            Commands::Balances { snapshot, format } => {
                run_balances_command(&service, &snapshot, &format)
            }
        }
    }
}

fn open_output(output: Option<&Path>) -> Result<Box<dyn Write>> {
    let writer: Box<dyn Write> = match output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create output file: {}", path.display()))?;
            Box::new(file)
        }
        None => Box::new(stdout()),
    };
    Ok(writer)
}

fn run_settle_command(
    service: &SettlementService,
    snapshot_path: &Path,
    format: &str,
    canonical: bool,
    output: Option<&Path>,
) -> Result<()> {
    let snapshot = read_snapshot_file(snapshot_path)?;
    let mut result = service.settle(&snapshot)?;
    if canonical {
        sort_canonical(&mut result.transfers);
    }

    let exporter = Exporter::new(&result);
    let mut writer = open_output(output)?;

    match format {
        "text" => {
            writeln!(writer, "{}", render_message(&result.transfers).trim_end())?;
            writer.flush()?;
        }
        "csv" => {
            let count = exporter.export_transfers_csv(writer)?;
            if output.is_some() {
                eprintln!("Exported {} transfers", count);
            }
        }
        "json" => exporter.export_report_json(writer)?,
        other => bail!("Unknown format '{}'. Use text, csv or json", other),
    }

    Ok(())
}

fn run_balances_command(service: &SettlementService, snapshot_path: &Path, format: &str) -> Result<()> {
    let snapshot = read_snapshot_file(snapshot_path)?;
    let report = service.balance_report(&snapshot)?;

    match format {
        "text" => {
            if report.is_empty() {
                println!("No balances.");
                return Ok(());
            }
            for line in render_balances(&report) {
                println!("{}", line);
            }
        }
        "json" => println!("{}", serde_json::to_string_pretty(&report)?),
        "csv" => {
            write_balances_csv(&report, stdout())?;
        }
        other => bail!("Unknown format '{}'. Use text, csv or json", other),
    }

    Ok(())
}
