pub mod flags;
pub mod location;
pub mod names;
pub mod schedule;

use std::sync::LazyLock;

use regex::{Match, Regex};

pub use flags::{extract_accredited, extract_quality, extract_subsidy_flags};
pub use location::{extract_facility_type, extract_zip_city};
pub use names::{is_plausible_name, owner_before_date, split_owner};
pub use schedule::{extract_ages, extract_capacity, extract_days, extract_hours};

static LICENSE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(FII?\d+|CCC\d+|PRE\d+|SAOC\d+)\b").unwrap());
static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\((\d{3})\)\s*(\d{3})-?(\d{4})\b").unwrap());
static DATE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(\d{2}/\d{2}/\d{4})\b").unwrap());

/// Locate the first license number on a line, keeping its position.
pub fn find_license_number(text: &str) -> Option<Match<'_>> {
    LICENSE_RE.captures(text).and_then(|c| c.get(1))
}

/// License number as printed (prefix casing preserved).
pub fn extract_license_number(text: &str) -> Option<&str> {
    find_license_number(text).map(|m| m.as_str())
}

pub fn find_phone(text: &str) -> Option<Match<'_>> {
    PHONE_RE.find(text)
}

pub fn find_date(text: &str) -> Option<Match<'_>> {
    DATE_RE.find(text)
}

/// Phone normalized to `(DDD) DDD-DDDD`.
pub fn extract_phone(text: &str) -> Option<String> {
    PHONE_RE
        .captures(text)
        .map(|c| format!("({}) {}-{}", &c[1], &c[2], &c[3]))
}

/// Up to two `MM/DD/YYYY` tokens, in line order.
pub fn extract_dates(text: &str) -> Vec<&str> {
    DATE_RE
        .captures_iter(text)
        .filter_map(|c| c.get(1))
        .map(|m| m.as_str())
        .take(2)
        .collect()
}

pub fn extract_effective_date(text: &str) -> Option<&str> {
    extract_dates(text).into_iter().next()
}
