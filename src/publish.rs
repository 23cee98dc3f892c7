use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use tracing::info;

use crate::archive;
use crate::record::ProviderRecord;
use crate::validate::Verdict;

/// Keep the verdict on disk, then write the CSV only when it passed.
///
/// The report is written for every run so a blocked dataset can still be
/// audited. A failing verdict returns `ValidationFailed` and leaves no CSV
/// (or temp file) behind.
pub fn publish(
    records: &[ProviderRecord],
    verdict: &Verdict,
    data_dir: &Path,
    csv_path: &Path,
    date: NaiveDate,
) -> Result<()> {
    let report_path = archive::report_path(data_dir, date);
    archive::write_report(&report_path, verdict)?;
    info!("Wrote validation report to {}", report_path.display());

    verdict.ensure_passed().context("CSV not written")?;
    archive::write_csv(csv_path, records)?;
    info!(providers = records.len(), "Wrote {}", csv_path.display());
    Ok(())
}
