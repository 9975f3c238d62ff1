//! Pre-flight inspection of the selected PDF
//!
//! Gives the upload section a one-line summary before anything is sent to
//! the extraction service. Rendering is left to pdf.js; this only reads the
//! header, page tree and Info dictionary.

use lopdf::Document;
use serde::Serialize;
use tracing::warn;

use crate::error::DocumentInfoError;

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct DocumentInfo {
    pub page_count: u32,
    /// Header version, e.g. "1.7"
    pub version: String,
    pub encrypted: bool,
    pub size_bytes: usize,
    pub title: Option<String>,
    pub author: Option<String>,
}

pub fn inspect(bytes: &[u8]) -> Result<DocumentInfo, DocumentInfoError> {
    if bytes.len() < 8 {
        return Err(DocumentInfoError::TooSmall);
    }
    if !bytes.starts_with(b"%PDF-") {
        return Err(DocumentInfoError::MissingHeader);
    }

    let version = header_version(bytes);
    let document =
        Document::load_mem(bytes).map_err(|e| DocumentInfoError::Parse(e.to_string()))?;

    let page_count = document.get_pages().len() as u32;
    if page_count == 0 {
        return Err(DocumentInfoError::NoPages);
    }

    Ok(DocumentInfo {
        page_count,
        version,
        encrypted: document.is_encrypted(),
        size_bytes: bytes.len(),
        title: info_string(&document, b"Title"),
        author: info_string(&document, b"Author"),
    })
}

/// Summary line for the upload section; never fails
pub fn describe(name: &str, bytes: &[u8]) -> String {
    match inspect(bytes) {
        Ok(info) => info.summary(name),
        Err(err) => {
            warn!(name, error = %err, "pre-flight inspection failed");
            format!("{} · {} · unreadable", name, format_bytes(bytes.len()))
        }
    }
}

impl DocumentInfo {
    pub fn summary(&self, name: &str) -> String {
        let pages = if self.page_count == 1 {
            "1 page".to_string()
        } else {
            format!("{} pages", self.page_count)
        };
        let mut line = format!("{} · {} · {}", name, pages, format_bytes(self.size_bytes));
        if self.encrypted {
            line.push_str(" · encrypted");
        }
        line
    }
}

fn header_version(bytes: &[u8]) -> String {
    std::str::from_utf8(&bytes[5..8])
        .map(|v| v.trim().to_string())
        .unwrap_or_else(|_| "1.4".to_string())
}

fn info_string(document: &Document, key: &[u8]) -> Option<String> {
    let info_id = document.trailer.get(b"Info").ok()?.as_reference().ok()?;
    let info = document.objects.get(&info_id)?.as_dict().ok()?;
    let raw = info.get(key).ok()?.as_str().ok()?;
    let decoded = String::from_utf8_lossy(raw).trim().to_string();
    (!decoded.is_empty()).then_some(decoded)
}

/// Format bytes as human-readable string
pub fn format_bytes(bytes: usize) -> String {
    const KB: usize = 1024;
    const MB: usize = KB * 1024;

    if bytes < KB {
        format!("{} B", bytes)
    } else if bytes < MB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    }
}
