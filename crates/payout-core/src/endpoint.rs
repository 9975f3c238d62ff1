//! Remote extraction service endpoints
//!
//! The service runs on a fixed local host/port. Both upload endpoints take a
//! multipart body with a single `file` field and answer with arbitrary JSON.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Base URL of the extraction service
pub const API_BASE: &str = "http://localhost:8001";

/// Multipart field name carrying the uploaded PDF
pub const UPLOAD_FIELD: &str = "file";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Endpoint {
    /// Structured analysis of the uploaded document
    AnalyzePdf,
    /// Raw text extraction, for debugging the analysis input
    DebugExtract,
    /// Liveness probe
    Health,
}

impl Endpoint {
    pub fn path(self) -> &'static str {
        match self {
            Endpoint::AnalyzePdf => "/api/analyze-pdf",
            Endpoint::DebugExtract => "/api/debug-extract",
            Endpoint::Health => "/api/test",
        }
    }

    pub fn method(self) -> &'static str {
        match self {
            Endpoint::AnalyzePdf | Endpoint::DebugExtract => "POST",
            Endpoint::Health => "GET",
        }
    }

    /// Absolute URL against [`API_BASE`]
    pub fn url(self) -> String {
        format!("{}{}", API_BASE, self.path())
    }

    /// Whether the request carries the selected file
    pub fn uploads_file(self) -> bool {
        matches!(self, Endpoint::AnalyzePdf | Endpoint::DebugExtract)
    }

    /// Message shown in the blocking alert when the request fails
    pub fn failure_message(self) -> &'static str {
        match self {
            Endpoint::AnalyzePdf => "Error analyzing PDF. Please try again.",
            Endpoint::DebugExtract => "Error in debug extraction. Please try again.",
            Endpoint::Health => "Extraction service is not reachable.",
        }
    }

    /// Button label while idle
    pub fn idle_label(self) -> &'static str {
        match self {
            Endpoint::AnalyzePdf => "Analyze PDF Structure",
            Endpoint::DebugExtract => "Debug Raw Extract",
            Endpoint::Health => "Check Service",
        }
    }

    /// Button label while any request is in flight
    pub fn busy_label(self) -> &'static str {
        match self {
            Endpoint::AnalyzePdf => "Analyzing...",
            Endpoint::DebugExtract => "Extracting...",
            Endpoint::Health => "Checking...",
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method(), self.path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upload_urls() {
        assert_eq!(
            Endpoint::AnalyzePdf.url(),
            "http://localhost:8001/api/analyze-pdf"
        );
        assert_eq!(
            Endpoint::DebugExtract.url(),
            "http://localhost:8001/api/debug-extract"
        );
    }

    #[test]
    fn test_only_upload_endpoints_carry_file() {
        assert!(Endpoint::AnalyzePdf.uploads_file());
        assert!(Endpoint::DebugExtract.uploads_file());
        assert!(!Endpoint::Health.uploads_file());
        assert_eq!(Endpoint::Health.method(), "GET");
    }

    #[test]
    fn test_display_names_method_and_path() {
        assert_eq!(
            Endpoint::DebugExtract.to_string(),
            "POST /api/debug-extract"
        );
    }
}
