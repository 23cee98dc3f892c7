pub mod blocks;
pub mod context;
pub mod extract;
pub mod pages;

use chrono::NaiveDate;
use tracing::info;

use crate::error::DocumentError;
use crate::record::{assemble, ProviderRecord};

/// Pages of text lines → stamped provider records, in document order.
pub fn parse_document<S: AsRef<str>>(
    pages: &[Vec<S>],
    download_date: NaiveDate,
) -> Result<Vec<ProviderRecord>, DocumentError> {
    let walk = pages::walk(pages)?;
    info!(
        pages = walk.pages,
        blocks = walk.blocks,
        rejected = walk.rejected,
        providers = walk.providers.len(),
        "roster parsed"
    );
    Ok(assemble(walk.providers, download_date))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdf::page_lines;
    use crate::record::LicenseType;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }

    fn fixture_pages(name: &str) -> Vec<Vec<String>> {
        let text = std::fs::read_to_string(format!("tests/fixtures/{}.txt", name)).unwrap();
        text.split('\x0C').map(page_lines).collect()
    }

    #[test]
    fn two_page_document() {
        let doc = vec![
            vec!["CHILD CARE LICENSING ROSTER".to_string(), "Cover FI1 Capacity: 1".to_string()],
            vec![
                "68502 Lancaster County".to_string(),
                "ABC Daycare FI12345 100 A St Capacity: 10".to_string(),
                "(402) 555-0100".to_string(),
                "06/01/2020".to_string(),
            ],
        ];
        let records = parse_document(&doc, date()).unwrap();
        assert_eq!(records.len(), 1);
        let r = &records[0];
        assert_eq!(r.download_date, date());
        let p = &r.provider;
        assert_eq!(p.zip_code.as_deref(), Some("68502"));
        assert_eq!(p.county.as_deref(), Some("Lancaster County"));
        assert_eq!(p.provider_name, "ABC Daycare");
        assert_eq!(p.license_number, "FI12345");
        assert_eq!(p.license_type.label(), "Family Child Care Home I");
        assert_eq!(p.phone.as_deref(), Some("(402) 555-0100"));
        assert_eq!(p.capacity, Some(10));
        assert_eq!(p.effective_date.as_deref(), Some("06/01/2020"));
    }

    #[test]
    fn two_page_document_one_line_entry() {
        let doc = vec![
            vec!["CHILD CARE LICENSING ROSTER".to_string()],
            vec![
                "68502 Lancaster County".to_string(),
                "ABC Daycare FI12345 100 A St (402) 555-0100 Capacity: 10 06/01/2020".to_string(),
            ],
        ];
        let records = parse_document(&doc, date()).unwrap();
        assert_eq!(records.len(), 1);
        let p = &records[0].provider;
        assert_eq!(p.zip_code.as_deref(), Some("68502"));
        assert_eq!(p.county.as_deref(), Some("Lancaster County"));
        assert_eq!(p.provider_name, "ABC Daycare");
        assert_eq!(p.license_number, "FI12345");
        assert_eq!(p.license_type.label(), "Family Child Care Home I");
        assert_eq!(p.address.as_deref(), Some("100 A St"));
        assert_eq!(p.phone.as_deref(), Some("(402) 555-0100"));
        assert_eq!(p.capacity, Some(10));
        assert_eq!(p.effective_date.as_deref(), Some("06/01/2020"));
    }

    #[test]
    fn fixture_roster() {
        let records = parse_document(&fixture_pages("roster"), date()).unwrap();
        let names: Vec<_> = records.iter().map(|r| r.provider.provider_name.as_str()).collect();
        assert_eq!(
            names,
            [
                "Sunshine Daycare",
                "Tiny Tots Learning Center",
                "Little Acorns Preschool",
                "Hall County Kids Club",
                "Grand Island Home Care",
            ]
        );

        let tots = &records[1].provider;
        assert_eq!(tots.license_type, LicenseType::Center);
        assert_eq!(tots.owner_name.as_deref(), Some("Tots Inc"));
        assert_eq!(tots.city.as_deref(), Some("Lincoln"));
        assert_eq!(tots.county.as_deref(), Some("Lancaster"));

        let club = &records[3].provider;
        assert_eq!(club.license_type, LicenseType::SchoolAgeOnly);
        assert_eq!(club.zip_code.as_deref(), Some("68801"));
        assert_eq!(club.step_up_quality, Some(5));
        assert_eq!(club.accredited, Some(true));

        let home = &records[4].provider;
        assert_eq!(home.license_type, LicenseType::FamilyHomeII);
        assert_eq!(home.county.as_deref(), Some("Hall"));
        assert_eq!(home.owner_name.as_deref(), Some("Maria Lopez"));
    }

    #[test]
    fn every_record_keeps_required_fields() {
        let records = parse_document(&fixture_pages("roster"), date()).unwrap();
        for r in &records {
            assert!(!r.provider.provider_name.is_empty());
            assert_eq!(
                LicenseType::for_license(&r.provider.license_number),
                Ok(r.provider.license_type)
            );
        }
    }

    #[test]
    fn parsing_is_repeatable() {
        let pages = fixture_pages("roster");
        let first = parse_document(&pages, date()).unwrap();
        let second = parse_document(&pages, date()).unwrap();
        assert_eq!(first, second);
    }
}
