use std::sync::LazyLock;

use regex::Regex;

use crate::record::SubsidyFlags;

static CURRENTLY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Currently Accepts Subsidy\?\s*([YN])\b").unwrap());
static WILLING_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Willing To Accept Subsidy\?\s*([YN])\b").unwrap());
static DOES_NOT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Does Not Accept Subsidy\?\s*([YN])\b").unwrap());
static QUALITY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Step Up To Quality:\s*([1-5])\b").unwrap());
static ACCREDITED_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Accredited\?\s*([YN])\b").unwrap());

fn yes_no(re: &Regex, text: &str) -> Option<bool> {
    re.captures(text).map(|c| &c[1] == "Y")
}

/// The three subsidy questions are independent; any may be answered or not.
pub fn extract_subsidy_flags(text: &str) -> SubsidyFlags {
    SubsidyFlags {
        currently_accepts: yes_no(&CURRENTLY_RE, text),
        willing_to_accept: yes_no(&WILLING_RE, text),
        does_not_accept: yes_no(&DOES_NOT_RE, text),
    }
}

pub fn extract_quality(text: &str) -> Option<u8> {
    QUALITY_RE.captures(text).and_then(|c| c[1].parse().ok())
}

pub fn extract_accredited(text: &str) -> Option<bool> {
    yes_no(&ACCREDITED_RE, text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subsidy_answers() {
        let flags = extract_subsidy_flags(
            "Currently Accepts Subsidy? Y Willing To Accept Subsidy? N Does Not Accept Subsidy?",
        );
        assert_eq!(flags.currently_accepts, Some(true));
        assert_eq!(flags.willing_to_accept, Some(false));
        assert_eq!(flags.does_not_accept, None);
    }

    #[test]
    fn subsidy_unanswered_line() {
        assert_eq!(extract_subsidy_flags("Hours: 0600 To 1800"), SubsidyFlags::default());
    }

    #[test]
    fn quality_rating() {
        assert_eq!(extract_quality("Step Up To Quality: 3 Accredited? N"), Some(3));
        assert_eq!(extract_quality("Step Up To Quality:"), None);
        assert_eq!(extract_quality("Step Up To Quality: 7"), None);
    }

    #[test]
    fn accreditation() {
        assert_eq!(extract_accredited("Step Up To Quality: 3 Accredited? Y"), Some(true));
        assert_eq!(extract_accredited("Accredited? N"), Some(false));
        assert_eq!(extract_accredited("Accredited?"), None);
    }
}
