use thiserror::Error;

use crate::validate::CheckKind;

/// The document does not look like a roster at all.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DocumentError {
    #[error("document has no pages after skipping the cover page")]
    NoDataPages,
    #[error("no provider entries found across {pages} data pages")]
    NoProviders { pages: usize },
}

/// A license number whose prefix has no mapped type.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("no license type mapped for license number {0:?}")]
pub struct UnknownLicenseType(pub String);

#[derive(Debug, Error)]
#[error("consistency validation failed: {}", failed.iter().map(|c| c.name()).collect::<Vec<_>>().join(", "))]
pub struct ValidationFailed {
    pub failed: Vec<CheckKind>,
}

#[derive(Debug, Error)]
pub enum PdfError {
    #[error("input is not a PDF document")]
    NotPdf,
    #[error("failed to extract text from PDF: {0}")]
    Extraction(String),
    #[error("PDF contains no extractable text")]
    Empty,
}
