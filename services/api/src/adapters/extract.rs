//! services/api/src/adapters/extract.rs
//!
//! This module contains the adapter for document text extraction.
//! It implements the `TextExtractionService` port from the `core` crate and
//! owns the temp-file lifecycle for uploaded documents.

use async_trait::async_trait;
use devlearn_core::ports::{PortError, PortResult, TextExtractionService};
use quick_xml::events::Event;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use uuid::Uuid;

pub const MIME_TEXT: &str = "text/plain";
pub const MIME_PDF: &str = "application/pdf";
pub const MIME_DOC: &str = "application/msword";
pub const MIME_DOCX: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

/// Whether an uploaded file's declared MIME type is in the supported set.
pub fn is_supported_mime(mime_type: &str) -> bool {
    matches!(mime_type, MIME_TEXT | MIME_PDF | MIME_DOC | MIME_DOCX)
}

//=========================================================================================
// Temp-file guard
//=========================================================================================

/// A uniquely named temp file holding one request's upload.
///
/// The file is unlinked when the guard drops, on every exit path. Cleanup
/// failures are logged and never escalated, so they cannot mask the
/// request's primary result or error.
pub struct TempUpload {
    path: PathBuf,
}

impl TempUpload {
    /// Spills the uploaded bytes to a fresh file under `dir`.
    pub async fn write(dir: &Path, bytes: &[u8]) -> PortResult<Self> {
        tokio::fs::create_dir_all(dir)
            .await
            .map_err(|e| PortError::Unexpected(format!("failed to create upload dir: {e}")))?;
        let path = dir.join(format!("upload-{}", Uuid::new_v4()));
        tokio::fs::write(&path, bytes)
            .await
            .map_err(|e| PortError::Unexpected(format!("failed to write temp upload: {e}")))?;
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for TempUpload {
    fn drop(&mut self) {
        if let Err(e) = std::fs::remove_file(&self.path) {
            warn!(path = %self.path.display(), "failed to delete temp upload: {e}");
        }
    }
}

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that implements the `TextExtractionService` port for plain
/// text, PDF and Word documents.
#[derive(Clone, Default)]
pub struct DocumentExtractor;

impl DocumentExtractor {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl TextExtractionService for DocumentExtractor {
    async fn extract_text(&self, path: &Path, mime_type: &str) -> PortResult<String> {
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| PortError::Extraction(format!("could not read upload: {e}")))?;

        let text = match mime_type {
            MIME_TEXT => extract_txt(&bytes),
            // PDF parsing is CPU-bound; keep it off the async workers.
            MIME_PDF => {
                tokio::task::spawn_blocking(move || extract_pdf(&bytes))
                    .await
                    .map_err(|e| PortError::Unexpected(e.to_string()))??
            }
            MIME_DOC | MIME_DOCX => extract_word(&bytes)?,
            other => return Err(PortError::UnsupportedDocument(other.to_string())),
        };

        let text = text.trim().to_string();
        if text.is_empty() {
            return Err(PortError::Extraction(
                "document contained no extractable text".to_string(),
            ));
        }
        info!(chars = text.chars().count(), mime_type, "extracted document text");
        Ok(text)
    }
}

//=========================================================================================
// Per-format extraction
//=========================================================================================

fn extract_txt(bytes: &[u8]) -> String {
    // Try UTF-8 first, fall back to lossy conversion.
    String::from_utf8(bytes.to_vec()).unwrap_or_else(|_| String::from_utf8_lossy(bytes).into_owned())
}

fn extract_pdf(bytes: &[u8]) -> PortResult<String> {
    pdf_extract::extract_text_from_mem(bytes).map_err(|e| PortError::Extraction(e.to_string()))
}

/// Reads the main document part of a Word file.
///
/// Modern `.docx` files are zip containers holding `word/document.xml`.
/// Legacy `.doc` uploads are routed through the same reader: exporters
/// commonly mislabel `.docx` payloads as `application/msword`, and a true
/// OLE binary fails cleanly as unreadable.
fn extract_word(bytes: &[u8]) -> PortResult<String> {
    let cursor = std::io::Cursor::new(bytes);
    let mut archive = zip::ZipArchive::new(cursor).map_err(|e| {
        PortError::Extraction(format!("not a readable Word document ({e}); re-save as .docx"))
    })?;
    let mut xml = String::new();
    archive
        .by_name("word/document.xml")
        .map_err(|e| PortError::Extraction(format!("Word document has no body part: {e}")))?
        .read_to_string(&mut xml)
        .map_err(|e| PortError::Extraction(e.to_string()))?;

    let mut reader = quick_xml::Reader::from_str(&xml);
    let mut out = String::new();
    loop {
        match reader.read_event() {
            Ok(Event::Text(t)) => {
                let text = t
                    .unescape()
                    .map_err(|e| PortError::Extraction(e.to_string()))?;
                out.push_str(&text);
            }
            // Paragraph boundaries become newlines.
            Ok(Event::End(e)) if e.name().as_ref() == b"w:p" => out.push('\n'),
            Ok(Event::Eof) => break,
            Err(e) => return Err(PortError::Extraction(e.to_string())),
            Ok(_) => {}
        }
    }
    Ok(out)
}
