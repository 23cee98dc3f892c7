mod archive;
mod error;
mod fetch;
mod parser;
mod pdf;
mod publish;
mod record;
mod settings;
mod validate;

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use tracing::{info, warn};

use record::ProviderRecord;
use settings::Settings;
use validate::Verdict;

#[derive(Parser)]
#[command(name = "roster_parser", about = "Nebraska child care roster PDF → validated CSV")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Download the current roster, validate it and archive PDF + CSV
    Run {
        /// Collection date stamped on records and file names (default: today)
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Parse a local roster PDF and write the CSV if it validates
    Parse {
        pdf: PathBuf,
        /// Output CSV (default: dated file under the data directory)
        #[arg(short, long)]
        out: Option<PathBuf>,
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Parse and validate a local roster PDF without writing anything
    Check { pdf: PathBuf },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();
    let settings = Settings::load().context("Invalid ROSTER_* configuration")?;

    let result = match cli.command {
        Commands::Run { date } => {
            let date = date.unwrap_or_else(today);
            let bytes = fetch::download_pdf(&settings.pdf_url, settings.timeout()).await?;
            let pdf_path = archive::pdf_path(&settings.pdf_dir, date);
            archive::save_pdf(&pdf_path, &bytes)?;
            info!("Saved PDF to {}", pdf_path.display());

            let csv_path = archive::csv_path(&settings.data_dir, date);
            let count = parse_and_publish(&bytes, date, &csv_path, &settings)?;
            println!("Successfully processed {} providers", count);
            println!("  PDF: {}", pdf_path.display());
            println!("  CSV: {}", csv_path.display());
            Ok(())
        }
        Commands::Parse { pdf, out, date } => {
            let date = date.unwrap_or_else(today);
            let bytes = std::fs::read(&pdf).with_context(|| format!("Failed reading {}", pdf.display()))?;
            let csv_path = out.unwrap_or_else(|| archive::csv_path(&settings.data_dir, date));
            let count = parse_and_publish(&bytes, date, &csv_path, &settings)?;
            println!("Wrote {} providers to {}", count, csv_path.display());
            Ok(())
        }
        Commands::Check { pdf } => {
            let bytes = std::fs::read(&pdf).with_context(|| format!("Failed reading {}", pdf.display()))?;
            let (records, verdict) = parse_and_validate(&bytes, today())?;
            verdict.ensure_passed()?;
            println!("{} providers parsed, all checks passed", records.len());
            Ok(())
        }
    };

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        println!("\nDone in {}", format_duration(elapsed));
    }

    result
}

fn parse_and_publish(bytes: &[u8], date: NaiveDate, csv_path: &std::path::Path, settings: &Settings) -> Result<usize> {
    let (records, verdict) = parse_and_validate(bytes, date)?;
    publish::publish(&records, &verdict, &settings.data_dir, csv_path, date)?;
    Ok(records.len())
}

fn parse_and_validate(bytes: &[u8], date: NaiveDate) -> Result<(Vec<ProviderRecord>, Verdict)> {
    let records = parse_bytes(bytes, date)?;
    let rerun = parse_bytes(bytes, date)?;

    let verdict = validate::validate(&records, Some(rerun.as_slice()));
    for w in verdict.warnings() {
        warn!("{}", w);
    }
    println!("{}", verdict);
    Ok((records, verdict))
}

fn parse_bytes(bytes: &[u8], date: NaiveDate) -> Result<Vec<ProviderRecord>> {
    let pages = pdf::extract_pages(bytes)?;
    Ok(parser::parse_document(&pages, date)?)
}

fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

fn format_duration(d: std::time::Duration) -> String {
    let secs = d.as_secs();
    if secs < 60 {
        format!("{:.1}s", d.as_secs_f64())
    } else {
        format!("{}m {}s", secs / 60, secs % 60)
    }
}
