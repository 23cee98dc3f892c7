use std::collections::BTreeMap;
use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use serde_json::{json, Value};

use crate::error::ValidationFailed;
use crate::record::{LicenseType, Provider, ProviderRecord};

/// Share of records that must carry each key field.
pub const REQUIRED_RATE: f64 = 0.90;
/// Fewer providers than this means the document was not really parsed.
pub const MIN_PROVIDERS: usize = 100;
/// Bad phones above this share of records are an error, below it a warning.
const PHONE_ERROR_RATE: f64 = 0.10;
const MAX_REPORTED_MISMATCHES: usize = 3;

static LICENSE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?i:FII?\d+|CCC\d+|PRE\d+|SAOC\d+)$").unwrap());
static PHONE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\(\d{3}\) \d{3}-\d{4}$").unwrap());
static DATE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d{2}/\d{2}/\d{4}$").unwrap());
static ZIP_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d{5}$").unwrap());
static HOURS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d{4} To \d{4}$").unwrap());
static DAYS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[MTWHFSAU]+$").unwrap());

type FieldPresent = fn(&Provider) -> bool;

const KEY_FIELDS: &[(&str, FieldPresent)] = &[
    ("License_Number", |p| !p.license_number.is_empty()),
    ("Provider_Name", |p| !p.provider_name.is_empty()),
    ("Zip_Code", |p| p.zip_code.as_deref().is_some_and(|z| !z.is_empty())),
    ("County", |p| p.county.as_deref().is_some_and(|c| !c.is_empty())),
    ("License_Type", |_| true),
    ("Capacity", |p| p.capacity.is_some()),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckKind {
    Volume,
    Format,
    Completeness,
    Determinism,
}

impl CheckKind {
    pub fn name(self) -> &'static str {
        match self {
            CheckKind::Volume => "volume",
            CheckKind::Format => "format",
            CheckKind::Completeness => "completeness",
            CheckKind::Determinism => "determinism",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CheckOutcome {
    pub kind: CheckKind,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl CheckOutcome {
    fn new(kind: CheckKind) -> Self {
        CheckOutcome {
            kind,
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    pub fn passed(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Aggregate result of every check; publication is allowed only when it passed.
#[derive(Debug, Clone, Serialize)]
pub struct Verdict {
    pub passed: bool,
    pub checks: Vec<CheckOutcome>,
    pub stats: BTreeMap<String, Value>,
}

impl Verdict {
    pub fn failed_checks(&self) -> Vec<CheckKind> {
        self.checks
            .iter()
            .filter(|c| !c.passed())
            .map(|c| c.kind)
            .collect()
    }

    pub fn warnings(&self) -> impl Iterator<Item = &str> {
        self.checks
            .iter()
            .flat_map(|c| c.warnings.iter().map(String::as_str))
    }

    pub fn ensure_passed(&self) -> Result<(), ValidationFailed> {
        if self.passed {
            Ok(())
        } else {
            Err(ValidationFailed {
                failed: self.failed_checks(),
            })
        }
    }
}

/// Run every check over `records`. `rerun` is an independent second parse
/// of the same document; when given, the two must match exactly.
pub fn validate(records: &[ProviderRecord], rerun: Option<&[ProviderRecord]>) -> Verdict {
    let mut stats = BTreeMap::new();

    let mut checks = vec![
        check_volume(records),
        check_format(records, &mut stats),
        check_completeness(records, &mut stats),
    ];
    if let Some(rerun) = rerun {
        checks.push(check_determinism(records, rerun));
    }
    stats.insert("provider_count".into(), json!(records.len()));

    Verdict {
        passed: checks.iter().all(CheckOutcome::passed),
        checks,
        stats,
    }
}

pub fn check_volume(records: &[ProviderRecord]) -> CheckOutcome {
    let mut out = CheckOutcome::new(CheckKind::Volume);
    if records.len() < MIN_PROVIDERS {
        out.errors.push(format!(
            "Too few providers extracted: {} (minimum: {})",
            records.len(),
            MIN_PROVIDERS
        ));
    }
    out
}

pub fn check_determinism(first: &[ProviderRecord], second: &[ProviderRecord]) -> CheckOutcome {
    let mut out = CheckOutcome::new(CheckKind::Determinism);
    if first.len() != second.len() {
        out.errors.push(format!(
            "Provider count differs between runs: {} vs {}",
            first.len(),
            second.len()
        ));
        return out;
    }

    let mismatches: Vec<usize> = first
        .iter()
        .zip(second)
        .enumerate()
        .filter(|(_, (a, b))| a.to_row() != b.to_row())
        .map(|(i, _)| i)
        .collect();

    for i in mismatches.iter().take(MAX_REPORTED_MISMATCHES) {
        out.errors.push(format!("Provider {} differs between runs", i));
    }
    if mismatches.len() > MAX_REPORTED_MISMATCHES {
        out.errors.push(format!(
            "... and {} more mismatches",
            mismatches.len() - MAX_REPORTED_MISMATCHES
        ));
    }
    out
}

pub fn check_format(records: &[ProviderRecord], stats: &mut BTreeMap<String, Value>) -> CheckOutcome {
    let mut out = CheckOutcome::new(CheckKind::Format);

    let mut missing_names = 0usize;
    let mut missing_licenses = 0usize;
    let mut bad_licenses = Vec::new();
    let mut wrong_types = Vec::new();
    let mut bad_phones = Vec::new();
    let mut bad_dates = Vec::new();
    let mut bad_zips = Vec::new();
    let mut bad_hours = Vec::new();
    let mut bad_days = Vec::new();
    let mut distribution: BTreeMap<&str, usize> = BTreeMap::new();

    for (i, r) in records.iter().enumerate() {
        let p = &r.provider;
        if p.provider_name.is_empty() {
            missing_names += 1;
        }
        if p.license_number.is_empty() {
            missing_licenses += 1;
        } else if !LICENSE_RE.is_match(&p.license_number) {
            bad_licenses.push((i, p.license_number.as_str()));
        } else if LicenseType::for_license(&p.license_number).ok() != Some(p.license_type) {
            wrong_types.push((i, p.license_type.label()));
        }
        *distribution.entry(p.license_type.label()).or_default() += 1;

        collect_mismatch(&mut bad_phones, i, p.phone.as_deref(), &PHONE_RE);
        collect_mismatch(&mut bad_dates, i, p.effective_date.as_deref(), &DATE_RE);
        collect_mismatch(&mut bad_zips, i, p.zip_code.as_deref(), &ZIP_RE);
        collect_mismatch(&mut bad_hours, i, p.hours.as_deref(), &HOURS_RE);
        collect_mismatch(&mut bad_days, i, p.days_open.as_deref(), &DAYS_RE);
    }

    if missing_names > 0 {
        out.errors.push(format!("{} providers missing Provider_Name", missing_names));
    }
    if missing_licenses > 0 {
        out.errors.push(format!("{} providers missing License_Number", missing_licenses));
    }
    if let Some(msg) = describe(&bad_licenses, "invalid license numbers") {
        out.errors.push(msg);
    }
    if let Some(msg) = describe(&wrong_types, "license types not matching their prefix") {
        out.errors.push(msg);
    }
    if let Some(msg) = describe(&bad_phones, "invalid phone formats") {
        if share(bad_phones.len(), records.len()) > PHONE_ERROR_RATE {
            out.errors.push(msg);
        } else {
            out.warnings.push(msg);
        }
    }
    if let Some(msg) = describe(&bad_dates, "invalid date formats") {
        out.errors.push(msg);
    }
    if let Some(msg) = describe(&bad_zips, "invalid ZIP codes") {
        out.errors.push(msg);
    }
    if let Some(msg) = describe(&bad_hours, "unexpected hours formats") {
        out.warnings.push(msg);
    }
    if let Some(msg) = describe(&bad_days, "unexpected days-open formats") {
        out.warnings.push(msg);
    }

    stats.insert("license_type_distribution".into(), json!(distribution));
    stats.insert(
        "providers_with_phone".into(),
        json!(records.iter().filter(|r| r.provider.phone.is_some()).count()),
    );
    stats.insert(
        "providers_with_address".into(),
        json!(records.iter().filter(|r| r.provider.address.is_some()).count()),
    );
    out
}

pub fn check_completeness(
    records: &[ProviderRecord],
    stats: &mut BTreeMap<String, Value>,
) -> CheckOutcome {
    let mut out = CheckOutcome::new(CheckKind::Completeness);
    for (field, present) in KEY_FIELDS {
        let populated = records.iter().filter(|r| present(&r.provider)).count();
        let rate = share(populated, records.len());
        stats.insert(format!("{}_rate", field), json!(format!("{:.1}%", rate * 100.0)));
        if rate < REQUIRED_RATE {
            out.errors.push(format!(
                "Field '{}' only populated in {:.1}% of records (required: {:.0}%)",
                field,
                rate * 100.0,
                REQUIRED_RATE * 100.0
            ));
        }
    }
    out
}

fn collect_mismatch<'a>(
    bad: &mut Vec<(usize, &'a str)>,
    idx: usize,
    value: Option<&'a str>,
    re: &Regex,
) {
    if let Some(v) = value.filter(|v| !v.is_empty()) {
        if !re.is_match(v) {
            bad.push((idx, v));
        }
    }
}

fn describe(bad: &[(usize, &str)], what: &str) -> Option<String> {
    let (idx, example) = bad.first()?;
    Some(format!(
        "{} {} (e.g., provider {}: {:?})",
        bad.len(),
        what,
        idx,
        example
    ))
}

fn share(count: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        count as f64 / total as f64
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.passed {
            writeln!(f, "All consistency checks passed")?;
        } else {
            writeln!(f, "Consistency checks FAILED")?;
        }
        for check in &self.checks {
            let status = if check.passed() { "ok" } else { "FAILED" };
            writeln!(f, "  [{}] {}", status, check.kind.name())?;
            for err in &check.errors {
                writeln!(f, "      error: {}", err)?;
            }
            for warn in &check.warnings {
                writeln!(f, "      warning: {}", warn)?;
            }
        }
        writeln!(f, "Stats:")?;
        for (key, val) in &self.stats {
            writeln!(f, "  {}: {}", key, val)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{assemble, sample_provider};
    use chrono::NaiveDate;

    fn records(n: usize) -> Vec<ProviderRecord> {
        let providers = (0..n).map(|i| sample_provider(&format!("FI{}", i + 1))).collect();
        assemble(providers, NaiveDate::from_ymd_opt(2024, 5, 1).unwrap())
    }

    fn check(records: &[ProviderRecord], kind: CheckKind) -> CheckOutcome {
        let verdict = validate(records, None);
        verdict.checks.into_iter().find(|c| c.kind == kind).unwrap()
    }

    #[test]
    fn clean_roster_passes() {
        let recs = records(120);
        let verdict = validate(&recs, Some(recs.as_slice()));
        assert!(verdict.passed, "{}", verdict);
        assert!(verdict.ensure_passed().is_ok());
        assert_eq!(verdict.stats["provider_count"], json!(120));
        assert_eq!(verdict.stats["Zip_Code_rate"], json!("100.0%"));
    }

    #[test]
    fn too_few_providers_fails() {
        let verdict = validate(&records(5), None);
        assert!(!verdict.passed);
        assert_eq!(verdict.failed_checks(), vec![CheckKind::Volume]);
    }

    #[test]
    fn completeness_below_threshold_blocks() {
        let mut recs = records(100);
        for r in recs.iter_mut().take(11) {
            r.provider.zip_code = None;
        }
        let out = check(&recs, CheckKind::Completeness);
        assert!(!out.passed());
        assert!(out.errors[0].contains("Zip_Code"), "{:?}", out.errors);
        assert!(out.errors[0].contains("89.0%"), "{:?}", out.errors);
    }

    #[test]
    fn completeness_at_threshold_passes() {
        let mut recs = records(100);
        for r in recs.iter_mut().take(10) {
            r.provider.county = None;
        }
        assert!(check(&recs, CheckKind::Completeness).passed());
    }

    #[test]
    fn empty_roster_fails_completeness() {
        let verdict = validate(&[], None);
        assert!(verdict.failed_checks().contains(&CheckKind::Completeness));
        assert!(verdict.failed_checks().contains(&CheckKind::Volume));
    }

    #[test]
    fn few_bad_phones_only_warn() {
        let mut recs = records(100);
        recs[3].provider.phone = Some("555-0100".into());
        let out = check(&recs, CheckKind::Format);
        assert!(out.passed());
        assert_eq!(out.warnings.len(), 1);
        assert!(out.warnings[0].contains("provider 3"));
    }

    #[test]
    fn many_bad_phones_fail() {
        let mut recs = records(100);
        for r in recs.iter_mut().take(11) {
            r.provider.phone = Some("555-0100".into());
        }
        assert!(!check(&recs, CheckKind::Format).passed());
    }

    #[test]
    fn bad_date_zip_or_license_fail() {
        let mut recs = records(100);
        recs[0].provider.effective_date = Some("2020-06-01".into());
        let out = check(&recs, CheckKind::Format);
        assert!(out.errors.iter().any(|e| e.contains("invalid date formats")));

        let mut recs = records(100);
        recs[1].provider.zip_code = Some("6850".into());
        let out = check(&recs, CheckKind::Format);
        assert!(out.errors.iter().any(|e| e.contains("invalid ZIP codes")));

        let mut recs = records(100);
        recs[2].provider.license_number = "FX12".into();
        let out = check(&recs, CheckKind::Format);
        assert!(out.errors.iter().any(|e| e.contains("invalid license numbers")));

        let mut recs = records(100);
        recs[4].provider.license_type = LicenseType::Preschool;
        let out = check(&recs, CheckKind::Format);
        assert!(out.errors.iter().any(|e| e.contains("not matching their prefix")));
    }

    #[test]
    fn odd_hours_and_days_only_warn() {
        let mut recs = records(100);
        recs[0].provider.hours = Some("6am To 6pm".into());
        recs[1].provider.days_open = Some("Mon-Fri".into());
        let out = check(&recs, CheckKind::Format);
        assert!(out.passed());
        assert_eq!(out.warnings.len(), 2);
    }

    #[test]
    fn rerun_mismatch_fails_determinism() {
        let recs = records(120);
        let mut rerun = recs.clone();
        rerun[5].provider.capacity = Some(11);
        let verdict = validate(&recs, Some(rerun.as_slice()));
        assert_eq!(verdict.failed_checks(), vec![CheckKind::Determinism]);
        let err = verdict.ensure_passed().unwrap_err();
        assert_eq!(err.failed, vec![CheckKind::Determinism]);
    }

    #[test]
    fn determinism_caps_reported_mismatches() {
        let recs = records(10);
        let mut rerun = recs.clone();
        for r in rerun.iter_mut() {
            r.provider.phone = None;
        }
        let out = check_determinism(&recs, &rerun);
        assert_eq!(out.errors.len(), MAX_REPORTED_MISMATCHES + 1);
        assert_eq!(out.errors.last().unwrap(), "... and 7 more mismatches");
    }

    #[test]
    fn determinism_count_mismatch() {
        let recs = records(10);
        let out = check_determinism(&recs, &recs[..9]);
        assert_eq!(out.errors, vec!["Provider count differs between runs: 10 vs 9"]);
    }

    #[test]
    fn display_names_failed_checks() {
        let text = validate(&records(5), None).to_string();
        assert!(text.contains("FAILED"));
        assert!(text.contains("[FAILED] volume"));
        assert!(text.contains("[ok] format"));
    }
}
