use tracing::{debug, error, warn};

use super::context::Snapshot;
use super::extract::{
    extract_accredited, extract_ages, extract_capacity, extract_days, extract_effective_date,
    extract_facility_type, extract_hours, extract_phone, extract_quality, extract_subsidy_flags,
    extract_zip_city, find_date, find_license_number, find_phone, is_plausible_name,
    owner_before_date, split_owner,
};
use crate::record::{LicenseType, Provider, SubsidyFlags, JURISDICTION};

/// Most lines a single provider entry can span.
pub const MAX_BLOCK_LINES: usize = 10;

/// Field labels that end the address on the anchor line.
const ADDRESS_STOP_LABELS: &[&str] = &["Capacity:", "Days of Week Open:", "Ages:", "Hours:"];

/// Consecutive lines hypothesized to describe one provider.
#[derive(Debug, Clone, Copy)]
pub struct RawBlock<'a> {
    /// Unclaimed line just above the block; used as the name when the
    /// anchor line has nothing before its license number.
    pub lead: Option<&'a str>,
    pub lines: &'a [&'a str],
}

/// Turn one block into a provider, or `None` when it is not a provider entry.
///
/// The anchor (first line with a license number) supplies name, owner,
/// license and address. Every other field is taken from the first line at
/// or after the anchor where its extractor hits.
pub fn parse_block(block: &RawBlock<'_>, ctx: &Snapshot) -> Option<Provider> {
    let lines = &block.lines[..block.lines.len().min(MAX_BLOCK_LINES)];

    let (anchor_idx, license) = lines
        .iter()
        .enumerate()
        .find_map(|(i, line)| find_license_number(line).map(|m| (i, m)))?;
    let anchor = lines[anchor_idx];
    let license_number = license.as_str().to_string();

    let license_type = match LicenseType::for_license(&license_number) {
        Ok(t) => t,
        Err(e) => {
            error!(%e, "license pattern and type table disagree");
            return None;
        }
    };

    let before = anchor[..license.start()].trim();
    let raw_name = if before.is_empty() {
        block
            .lead
            .filter(|lead| is_plausible_name(lead))
            .unwrap_or_default()
    } else {
        before
    };
    let (provider_name, owned_by) = split_owner(raw_name);
    if provider_name.is_empty() {
        debug!(license = %license_number, "block has no provider name");
        return None;
    }

    let body = &lines[anchor_idx..];

    let dated = body
        .iter()
        .find_map(|line| extract_effective_date(line).map(|d| (*line, d)));
    let owner_name = owned_by.or_else(|| dated.and_then(|(line, d)| owner_before_date(line, d)));

    let city_zip = first(body, extract_zip_city);
    let (city, address_zip) = match city_zip {
        Some((city, zip)) => (Some(city), Some(zip)),
        None => (None, None),
    };

    if let Some(printed) = printed_facility_type(body) {
        if printed != license_type {
            warn!(
                license = %license_number,
                printed = printed.label(),
                derived = license_type.label(),
                "facility type label disagrees with license prefix"
            );
        }
    }

    let subsidy = body
        .iter()
        .map(|line| extract_subsidy_flags(line))
        .fold(SubsidyFlags::default(), SubsidyFlags::or);

    Some(Provider {
        zip_code: ctx.zip.clone().or(address_zip),
        county: ctx.county.clone(),
        provider_name,
        license_number,
        license_type,
        owner_name,
        effective_date: dated.map(|(_, d)| d.to_string()),
        address: address_after(&anchor[license.end()..]),
        state: city.as_ref().map(|_| JURISDICTION),
        city,
        phone: first(body, extract_phone),
        capacity: first(body, extract_capacity),
        ages: first(body, extract_ages),
        hours: first(body, extract_hours),
        days_open: first(body, extract_days),
        subsidy,
        step_up_quality: first(body, extract_quality),
        accredited: first(body, extract_accredited),
    })
}

/// Facility label printed below the anchor. The anchor line is skipped
/// because provider names often contain words like "Child Care Center".
fn printed_facility_type(body: &[&str]) -> Option<LicenseType> {
    first(body.get(1..).unwrap_or_default(), extract_facility_type)
}

fn first<T>(lines: &[&str], extract: impl Fn(&str) -> Option<T>) -> Option<T> {
    lines.iter().find_map(|line| extract(line))
}

/// Anchor text after the license, up to the first label, phone or date.
fn address_after(tail: &str) -> Option<String> {
    let end = ADDRESS_STOP_LABELS
        .iter()
        .filter_map(|label| tail.find(label))
        .chain(find_phone(tail).map(|m| m.start()))
        .chain(find_date(tail).map(|m| m.start()))
        .min()
        .unwrap_or(tail.len());
    let address = tail[..end].trim();
    (!address.is_empty()).then(|| address.to_string())
}
