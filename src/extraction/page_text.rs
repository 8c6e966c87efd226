use std::fs;
use std::process::Command;

use chrono::Utc;
use lopdf::Document;

use super::ExtractionError;
use crate::cli::TextBackend;

/// Ordered per-page text for the PDF in `bytes`.
pub fn read_page_texts(bytes: &[u8], backend: TextBackend) -> Result<Vec<String>, ExtractionError> {
    match backend {
        TextBackend::Lopdf => pages_with_lopdf(bytes),
        TextBackend::Pdftotext => pages_with_pdftotext(bytes),
    }
}

/// Joins page texts and collapses every whitespace run to a single space.
pub fn normalize_document_text(pages: &[String]) -> String {
    pages
        .iter()
        .flat_map(|page| page.split_whitespace())
        .collect::<Vec<&str>>()
        .join(" ")
}

fn pages_with_lopdf(bytes: &[u8]) -> Result<Vec<String>, ExtractionError> {
    let document =
        Document::load_mem(bytes).map_err(|error| ExtractionError::Malformed(error.to_string()))?;

    let pages = document.get_pages();
    if pages.is_empty() {
        return Err(ExtractionError::NoPages);
    }

    let mut texts = Vec::with_capacity(pages.len());
    for page_number in pages.keys() {
        let text = document
            .extract_text(&[*page_number])
            .map_err(|error| ExtractionError::PageText {
                page: *page_number,
                reason: error.to_string(),
            })?;
        texts.push(text.replace('\u{0000}', ""));
    }

    Ok(texts)
}

fn pages_with_pdftotext(bytes: &[u8]) -> Result<Vec<String>, ExtractionError> {
    if !command_available("pdftotext") {
        return Err(ExtractionError::BackendUnavailable {
            backend: TextBackend::Pdftotext.as_str(),
            reason: "pdftotext was not found on PATH".to_string(),
        });
    }

    let stamp = Utc::now().timestamp_nanos_opt().unwrap_or_default();
    let input_path = std::env::temp_dir().join(format!(
        "autofill_pdftotext_{}_{}.pdf",
        std::process::id(),
        stamp
    ));
    fs::write(&input_path, bytes)?;

    let output = Command::new("pdftotext")
        .arg("-enc")
        .arg("UTF-8")
        .arg(&input_path)
        .arg("-")
        .output();
    let _ = fs::remove_file(&input_path);
    let output = output?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(ExtractionError::Malformed(stderr.trim().to_string()));
    }

    let raw = String::from_utf8_lossy(&output.stdout);
    split_form_feed_pages(&raw)
}

/// Splits pdftotext output on form feeds, dropping trailing blank pages.
pub(super) fn split_form_feed_pages(raw: &str) -> Result<Vec<String>, ExtractionError> {
    let mut pages: Vec<String> = raw
        .split('\u{000C}')
        .map(|chunk| chunk.replace('\u{0000}', ""))
        .collect();

    while let Some(last_page) = pages.last() {
        if last_page.trim().is_empty() {
            pages.pop();
            continue;
        }
        break;
    }

    if pages.is_empty() {
        return Err(ExtractionError::NoPages);
    }
    Ok(pages)
}

fn command_available(program: &str) -> bool {
    Command::new(program).arg("-v").output().is_ok()
}
