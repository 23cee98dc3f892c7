use chrono::NaiveDate;
use serde::Serialize;

use crate::error::UnknownLicenseType;

/// State abbreviation stamped on every provider whose city line resolved.
pub const JURISDICTION: &str = "NE";

/// CSV header, in output order.
pub const COLUMNS: [&str; 21] = [
    "Download_Date",
    "Zip_Code",
    "County",
    "Provider_Name",
    "License_Number",
    "License_Type",
    "Owner_Name",
    "Effective_Date",
    "Address",
    "City",
    "State",
    "Phone",
    "Capacity",
    "Ages",
    "Hours",
    "Days_Open",
    "Currently_Accepts_Subsidy",
    "Willing_To_Accept_Subsidy",
    "Does_Not_Accept_Subsidy",
    "Step_Up_Quality",
    "Accredited",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum LicenseType {
    FamilyHomeI,
    FamilyHomeII,
    Center,
    Preschool,
    SchoolAgeOnly,
}

const PREFIXES: &[(&str, LicenseType)] = &[
    ("SAOC", LicenseType::SchoolAgeOnly),
    ("CCC", LicenseType::Center),
    ("PRE", LicenseType::Preschool),
    ("FII", LicenseType::FamilyHomeII),
    ("FI", LicenseType::FamilyHomeI),
];

impl LicenseType {
    /// Ordered so that no label is tried after a label it contains.
    pub const ALL: [LicenseType; 5] = [
        LicenseType::FamilyHomeII,
        LicenseType::FamilyHomeI,
        LicenseType::SchoolAgeOnly,
        LicenseType::Center,
        LicenseType::Preschool,
    ];

    pub fn label(self) -> &'static str {
        match self {
            LicenseType::FamilyHomeI => "Family Child Care Home I",
            LicenseType::FamilyHomeII => "Family Child Care Home II",
            LicenseType::Center => "Child Care Center",
            LicenseType::Preschool => "Preschool",
            LicenseType::SchoolAgeOnly => "School-Age-Only Child Care Center",
        }
    }

    /// Derive the license type from a license number's alphabetic prefix.
    pub fn for_license(license_number: &str) -> Result<Self, UnknownLicenseType> {
        let prefix: String = license_number
            .chars()
            .take_while(|c| c.is_ascii_alphabetic())
            .collect::<String>()
            .to_ascii_uppercase();
        let digits = &license_number[prefix.len()..];
        if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
            return Err(UnknownLicenseType(license_number.to_string()));
        }
        PREFIXES
            .iter()
            .find(|(p, _)| *p == prefix)
            .map(|(_, t)| *t)
            .ok_or_else(|| UnknownLicenseType(license_number.to_string()))
    }
}

/// One provider entry as recovered from a block, before stamping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Provider {
    pub zip_code: Option<String>,
    pub county: Option<String>,
    pub provider_name: String,
    pub license_number: String,
    pub license_type: LicenseType,
    pub owner_name: Option<String>,
    pub effective_date: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<&'static str>,
    pub phone: Option<String>,
    pub capacity: Option<u32>,
    pub ages: Option<String>,
    pub hours: Option<String>,
    pub days_open: Option<String>,
    pub subsidy: SubsidyFlags,
    pub step_up_quality: Option<u8>,
    pub accredited: Option<bool>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SubsidyFlags {
    pub currently_accepts: Option<bool>,
    pub willing_to_accept: Option<bool>,
    pub does_not_accept: Option<bool>,
}

impl SubsidyFlags {
    /// Keep answers already found, fill the rest from `other`.
    pub fn or(self, other: SubsidyFlags) -> SubsidyFlags {
        SubsidyFlags {
            currently_accepts: self.currently_accepts.or(other.currently_accepts),
            willing_to_accept: self.willing_to_accept.or(other.willing_to_accept),
            does_not_accept: self.does_not_accept.or(other.does_not_accept),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderRecord {
    pub download_date: NaiveDate,
    pub provider: Provider,
}

/// Stamp every accepted provider with the collection date, keeping order.
pub fn assemble(providers: Vec<Provider>, download_date: NaiveDate) -> Vec<ProviderRecord> {
    providers
        .into_iter()
        .map(|provider| ProviderRecord {
            download_date,
            provider,
        })
        .collect()
}

impl ProviderRecord {
    /// Render the fixed 21-column row; absent fields become empty strings.
    pub fn to_row(&self) -> [String; 21] {
        let p = &self.provider;
        [
            self.download_date.format("%Y-%m-%d").to_string(),
            opt(&p.zip_code),
            opt(&p.county),
            p.provider_name.clone(),
            p.license_number.clone(),
            p.license_type.label().to_string(),
            opt(&p.owner_name),
            opt(&p.effective_date),
            opt(&p.address),
            opt(&p.city),
            p.state.unwrap_or_default().to_string(),
            opt(&p.phone),
            p.capacity.map(|c| c.to_string()).unwrap_or_default(),
            opt(&p.ages),
            opt(&p.hours),
            opt(&p.days_open),
            yes_no(p.subsidy.currently_accepts),
            yes_no(p.subsidy.willing_to_accept),
            yes_no(p.subsidy.does_not_accept),
            p.step_up_quality.map(|q| q.to_string()).unwrap_or_default(),
            yes_no(p.accredited),
        ]
    }
}

fn opt(value: &Option<String>) -> String {
    value.clone().unwrap_or_default()
}

fn yes_no(flag: Option<bool>) -> String {
    match flag {
        Some(true) => "Y".into(),
        Some(false) => "N".into(),
        None => String::new(),
    }
}

#[cfg(test)]
pub(crate) fn sample_provider(license_number: &str) -> Provider {
    Provider {
        zip_code: Some("68502".into()),
        county: Some("Lancaster".into()),
        provider_name: "Sunshine Daycare".into(),
        license_number: license_number.into(),
        license_type: LicenseType::for_license(license_number).unwrap(),
        owner_name: None,
        effective_date: Some("06/01/2020".into()),
        address: Some("1 Main St".into()),
        city: Some("Lincoln".into()),
        state: Some(JURISDICTION),
        phone: Some("(402) 555-0100".into()),
        capacity: Some(10),
        ages: None,
        hours: None,
        days_open: None,
        subsidy: SubsidyFlags::default(),
        step_up_quality: None,
        accredited: None,
    }
}
