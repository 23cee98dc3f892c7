use std::sync::LazyLock;

use regex::Regex;

static OWNED_BY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bowned\s+by\b").unwrap());
// "owned by" cut off at the end of a wrapped line.
static TRAILING_FRAGMENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\s+(?:owned|ob)\s*$").unwrap());

/// Split a raw name field into `(provider_name, owner_name)`.
///
/// Everything from the first `owned by` on is removed from the name; the
/// text after it, if any, is the owner.
pub fn split_owner(raw: &str) -> (String, Option<String>) {
    let (name, owner) = match OWNED_BY_RE.find(raw) {
        Some(m) => {
            let owner = raw[m.end()..].trim();
            let owner = (!owner.is_empty()).then(|| owner.to_string());
            (&raw[..m.start()], owner)
        }
        None => (raw, None),
    };
    let name = TRAILING_FRAGMENT_RE.replace(name.trim(), "");
    (name.trim().to_string(), owner)
}

/// Whether a free-standing line can be a provider name: no field label,
/// phone, date or city line.
pub fn is_plausible_name(line: &str) -> bool {
    let line = line.trim();
    !line.is_empty()
        && !line.contains(':')
        && !line.contains('?')
        && super::find_phone(line).is_none()
        && super::find_date(line).is_none()
        && super::extract_zip_city(line).is_none()
}

/// Owner printed ahead of the effective date, e.g. `Jane Smith 04/30/2024`.
pub fn owner_before_date(line: &str, date: &str) -> Option<String> {
    let idx = line.find(date)?;
    let owner = line[..idx].trim();
    if owner.is_empty() || owner.contains(':') || owner.chars().any(|c| c.is_ascii_digit()) {
        return None;
    }
    Some(owner.to_string())
}
