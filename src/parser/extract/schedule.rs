use std::sync::LazyLock;

use regex::Regex;

static CAPACITY_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"Capacity:\s*(\d+)\b").unwrap());
static AGES_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Ages:\s*(\d+\s*(?:WKS|MOS|YRS)\s+To\s+\d+\s*(?:WKS|MOS|YRS))\b").unwrap()
});
static HOURS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Hours:\s*(\d{4})\s*To\s*(\d{4})\b").unwrap());
static DAYS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Days of Week Open:\s*([MTWHFSAU]+)\b").unwrap());

pub fn extract_capacity(text: &str) -> Option<u32> {
    CAPACITY_RE.captures(text).and_then(|c| c[1].parse().ok())
}

/// e.g. `6 WKS To 13 YRS`
pub fn extract_ages(text: &str) -> Option<String> {
    AGES_RE.captures(text).map(|c| c[1].to_string())
}

/// e.g. `0600 To 1800`
pub fn extract_hours(text: &str) -> Option<String> {
    HOURS_RE
        .captures(text)
        .map(|c| format!("{} To {}", &c[1], &c[2]))
}

pub fn extract_days(text: &str) -> Option<String> {
    DAYS_RE.captures(text).map(|c| c[1].to_string())
}
