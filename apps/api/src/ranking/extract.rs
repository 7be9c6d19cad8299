//! PDF text extraction over in-memory buffers.
//!
//! Extraction never touches the filesystem: uploads are persisted separately by
//! `storage`, and the bytes handed to `extract_pdf_text` are the request's own.
//! Every upload ends in an `ExtractionOutcome` so callers decide what a skip or a
//! failure means for the batch.

use std::panic;

use pdf_extract::{output_doc, Document, OutputError, PlainTextOutput};
use thiserror::Error;

use crate::models::resume::{Intake, ResumeUpload};

/// How far into the buffer the `%PDF-` header may appear. Some producers emit
/// junk bytes before the header and readers tolerate it.
const HEADER_SEARCH_WINDOW: usize = 1024;

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("content is not a PDF document")]
    NotPdf,

    #[error("PDF is encrypted")]
    Encrypted,

    #[error("PDF text layer is unreadable: {0}")]
    Unreadable(String),
}

/// Why an upload was left out of ranking without being an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Multipart part with no filename, i.e. an empty file input.
    NoFile,
    /// Filename does not end in `.pdf` (form intake only).
    NotPdfFilename,
}

impl SkipReason {
    pub fn describe(&self) -> &'static str {
        match self {
            SkipReason::NoFile => "no file was attached",
            SkipReason::NotPdfFilename => "only .pdf files are ranked",
        }
    }
}

#[derive(Debug)]
pub enum ExtractionOutcome {
    Extracted(String),
    Skipped(SkipReason),
    Failed(ExtractionError),
}

/// Decides from the filename alone whether an upload is considered at all.
/// Runs before persistence so skipped files are never written.
pub fn screen_upload(upload: &ResumeUpload, intake: Intake) -> Option<SkipReason> {
    match intake {
        Intake::Form if upload.filename.is_empty() => Some(SkipReason::NoFile),
        Intake::Form if !has_pdf_suffix(&upload.filename) => Some(SkipReason::NotPdfFilename),
        _ => None,
    }
}

pub fn has_pdf_suffix(filename: &str) -> bool {
    filename.to_ascii_lowercase().ends_with(".pdf")
}

/// Screens and extracts one upload.
pub fn extract_upload(upload: &ResumeUpload, intake: Intake) -> ExtractionOutcome {
    if let Some(reason) = screen_upload(upload, intake) {
        return ExtractionOutcome::Skipped(reason);
    }
    match extract_pdf_text(&upload.content) {
        Ok(text) => ExtractionOutcome::Extracted(text),
        Err(e) => ExtractionOutcome::Failed(e),
    }
}

/// Returns the text of every page, in page order.
///
/// Image-only PDFs have no text layer and come back as an empty (or
/// whitespace-only) string rather than an error.
pub fn extract_pdf_text(bytes: &[u8]) -> Result<String, ExtractionError> {
    if !has_pdf_header(bytes) {
        return Err(ExtractionError::NotPdf);
    }

    // The parser panics on some malformed object graphs; contain it to this upload.
    match panic::catch_unwind(|| read_text_layer(bytes)) {
        Ok(Ok(Some(text))) => Ok(text),
        Ok(Ok(None)) => Err(ExtractionError::Encrypted),
        Ok(Err(e)) => Err(ExtractionError::Unreadable(e.to_string())),
        Err(_) => Err(ExtractionError::Unreadable(
            "PDF parser aborted on malformed content".to_string(),
        )),
    }
}

/// Parses the document once. `None` when the trailer carries an `/Encrypt`
/// dictionary; bytes inside content streams never count.
fn read_text_layer(bytes: &[u8]) -> Result<Option<String>, OutputError> {
    let doc = Document::load_mem(bytes)?;
    if doc.is_encrypted() {
        return Ok(None);
    }

    let mut text = String::new();
    {
        let mut output = PlainTextOutput::new(&mut text);
        output_doc(&doc, &mut output)?;
    }
    Ok(Some(text))
}

fn has_pdf_header(bytes: &[u8]) -> bool {
    let window = &bytes[..bytes.len().min(HEADER_SEARCH_WINDOW)];
    window.windows(5).any(|w| w == b"%PDF-")
}
