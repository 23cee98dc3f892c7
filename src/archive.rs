use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDate;
use csv::Writer;

use crate::record::{ProviderRecord, COLUMNS};
use crate::validate::Verdict;

const PDF_STEM: &str = "ChildCareRoster";
const CSV_STEM: &str = "child_care_providers";
const REPORT_STEM: &str = "validation";

fn dated(dir: &Path, stem: &str, date: NaiveDate, ext: &str) -> PathBuf {
    dir.join(format!("{}_{}.{}", stem, date.format("%Y-%m-%d"), ext))
}

pub fn pdf_path(dir: &Path, date: NaiveDate) -> PathBuf {
    dated(dir, PDF_STEM, date, "pdf")
}

pub fn csv_path(dir: &Path, date: NaiveDate) -> PathBuf {
    dated(dir, CSV_STEM, date, "csv")
}

pub fn report_path(dir: &Path, date: NaiveDate) -> PathBuf {
    dated(dir, REPORT_STEM, date, "json")
}

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed creating directory {}", parent.display()))?;
    }
    Ok(())
}

pub fn save_pdf(path: &Path, bytes: &[u8]) -> Result<()> {
    ensure_parent(path)?;
    fs::write(path, bytes).with_context(|| format!("Failed writing PDF {}", path.display()))
}

/// Write the dataset via a temp file so a failed write never leaves a partial CSV.
pub fn write_csv(path: &Path, records: &[ProviderRecord]) -> Result<()> {
    ensure_parent(path)?;
    let file_name = path
        .file_name()
        .and_then(|x| x.to_str())
        .unwrap_or("providers.csv");
    let tmp_path = path.with_file_name(format!("{}.tmp", file_name));

    let mut writer = Writer::from_path(&tmp_path)
        .with_context(|| format!("Failed creating temp CSV {}", tmp_path.display()))?;
    writer
        .write_record(COLUMNS)
        .context("Failed writing CSV header")?;
    for record in records {
        writer
            .write_record(record.to_row())
            .with_context(|| format!("Failed writing row for {}", record.provider.license_number))?;
    }
    writer.flush().context("Failed flushing CSV")?;
    drop(writer);

    fs::rename(&tmp_path, path).with_context(|| {
        format!("Failed moving {} to {}", tmp_path.display(), path.display())
    })
}

pub fn write_report(path: &Path, verdict: &Verdict) -> Result<()> {
    ensure_parent(path)?;
    let json = serde_json::to_string_pretty(verdict).context("Failed serializing verdict")?;
    fs::write(path, json).with_context(|| format!("Failed writing report {}", path.display()))
}
