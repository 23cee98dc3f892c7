use std::sync::LazyLock;

use regex::Regex;

// "68002 Washington", "68502 Lancaster County", "69361 Scotts Bluff".
// Only the state's two-word counties may span two words; a free second
// word would also accept street lines like "12345 Pine Rd".
static ZIP_HEADING_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(\d{5})\s+((?:(?i:Box\s+Butte|Keya\s+Paha|Red\s+Willow|Scotts\s+Bluff)|[A-Za-z]+)(?:\s+County)?)\s*$",
    )
    .unwrap()
});

/// Zip/county grouping carried across provider entries.
///
/// The roster prints a heading once per zip code and lists every provider
/// in that zip below it, so the values stay in force (across page breaks
/// too) until the next heading.
#[derive(Debug, Default)]
pub struct Context {
    current_zip: Option<String>,
    current_county: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    pub zip: Option<String>,
    pub county: Option<String>,
}

impl Context {
    /// Returns true when `line` was a heading and the context changed.
    pub fn update(&mut self, line: &str) -> bool {
        let Some(caps) = ZIP_HEADING_RE.captures(line.trim()) else {
            return false;
        };
        self.current_zip = Some(caps[1].to_string());
        self.current_county = Some(caps[2].split_whitespace().collect::<Vec<_>>().join(" "));
        true
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            zip: self.current_zip.clone(),
            county: self.current_county.clone(),
        }
    }
}

pub fn is_heading(line: &str) -> bool {
    ZIP_HEADING_RE.is_match(line.trim())
}
