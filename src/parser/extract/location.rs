use std::sync::LazyLock;

use regex::Regex;

use crate::record::LicenseType;

static ZIP_CITY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b([A-Za-z][A-Za-z\s.'-]{0,30}?)\s+NE\s+(\d{5})\b").unwrap()
});
// Some lines spell the state out ahead of the abbreviation.
static STATE_WORD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(?:^|\s+)NEBRASKA$").unwrap());

/// `<City words> NE <zip>` → `(city, zip)`.
pub fn extract_zip_city(text: &str) -> Option<(String, String)> {
    let caps = ZIP_CITY_RE.captures(text)?;
    let city = STATE_WORD_RE.replace(caps[1].trim(), "");
    let city = city.split_whitespace().collect::<Vec<_>>().join(" ");
    if city.is_empty() {
        return None;
    }
    Some((city, caps[2].to_string()))
}

/// Facility-type label as printed in the block, if any.
pub fn extract_facility_type(text: &str) -> Option<LicenseType> {
    LicenseType::ALL
        .into_iter()
        .find(|t| text.contains(t.label()))
}
