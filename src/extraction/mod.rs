use thiserror::Error;
use tracing::{debug, info, warn};

use crate::cli::TextBackend;
use crate::model::ProfileRecord;

mod labels;
mod page_text;
mod synthesize;
#[cfg(test)]
mod tests;
mod units;

use self::labels::FieldExtractor;
use self::page_text::{normalize_document_text, read_page_texts};
pub use self::synthesize::{SynthesisConfig, synthesize};
pub use self::units::{normalize_free_text, normalize_income};

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("pdf text backend '{backend}' is unavailable: {reason}")]
    BackendUnavailable {
        backend: &'static str,
        reason: String,
    },
    #[error("input is not a well-formed PDF: {0}")]
    Malformed(String),
    #[error("failed to extract text from page {page}: {reason}")]
    PageText { page: u32, reason: String },
    #[error("PDF contains no pages")]
    NoPages,
    #[error("invalid label pattern: {0}")]
    Pattern(#[from] regex::Error),
    #[error("i/o failure while decoding PDF: {0}")]
    Io(#[from] std::io::Error),
}

/// Result of one extraction: the record plus provenance for the manifest.
#[derive(Debug, Clone)]
pub struct ExtractedProfile {
    pub record: ProfileRecord,
    pub page_count: usize,
    pub warnings: Vec<String>,
}

/// Decodes `bytes` with the selected backend and infers the profile record.
pub fn extract(bytes: &[u8], backend: TextBackend) -> Result<ExtractedProfile, ExtractionError> {
    let pages = read_page_texts(bytes, backend)?;
    let extractor = FieldExtractor::new()?;

    let mut warnings = Vec::new();
    for (index, page) in pages.iter().enumerate() {
        if page.trim().is_empty() {
            warnings.push(format!("page {} has no text layer", index + 1));
        }
    }

    let text = normalize_document_text(&pages);
    let record = extractor.extract(&text);
    if record.is_empty() {
        warnings.push("no known field labels were found in the document text".to_string());
    }

    for (key, value) in record.iter() {
        debug!(field = %key, value, "extracted field");
    }
    for warning in &warnings {
        warn!(warning = %warning, "pdf extraction warning");
    }
    info!(
        backend = backend.as_str(),
        pages = pages.len(),
        fields = record.len(),
        "extracted profile record"
    );

    Ok(ExtractedProfile {
        record,
        page_count: pages.len(),
        warnings,
    })
}
