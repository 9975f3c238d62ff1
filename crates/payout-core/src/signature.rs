//! Signature-validation summary and in-band service failures
//!
//! Both are optional shapes inside an analysis result. Anything missing or
//! malformed simply means "nothing to show".

use serde::Serialize;
use serde_json::Value;

use crate::json_view::escape_html;

/// Where the summary lives in current responses
pub const SUMMARY_PATH: &str = "/data/signature_validation";
/// Where older responses put it
pub const LEGACY_SUMMARY_PATH: &str = "/signature_validation";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BannerKind {
    Complete,
    Incomplete,
    Other,
}

impl BannerKind {
    pub fn css_class(self) -> &'static str {
        match self {
            BannerKind::Complete => "signature-banner--complete",
            BannerKind::Incomplete => "signature-banner--incomplete",
            BannerKind::Other => "signature-banner--other",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SignatureSummary {
    /// Upper-cased status label, e.g. `COMPLETE`
    pub status: String,
    pub completed: u32,
    pub total: u32,
    pub notes: Option<String>,
}

impl SignatureSummary {
    /// Look for a summary under the current path, then the legacy one
    pub fn find(result: &Value) -> Option<Self> {
        [SUMMARY_PATH, LEGACY_SUMMARY_PATH]
            .iter()
            .filter_map(|path| result.pointer(path))
            .find_map(Self::from_value)
    }

    pub fn from_value(value: &Value) -> Option<Self> {
        let object = value.as_object()?;

        let status = object.get("status")?.as_str()?.trim();
        if status.is_empty() {
            return None;
        }

        let completed = count(object.get("completed_signatures")?)?;
        let total = count(object.get("total_signatures")?)?;

        let notes = object
            .get("notes")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|notes| !notes.is_empty())
            .map(str::to_string);

        Some(Self {
            status: status.to_uppercase(),
            completed,
            total,
            notes,
        })
    }

    pub fn kind(&self) -> BannerKind {
        match self.status.as_str() {
            "COMPLETE" => BannerKind::Complete,
            "INCOMPLETE" => BannerKind::Incomplete,
            _ => BannerKind::Other,
        }
    }

    /// "3/3 signatures complete"
    pub fn count_text(&self) -> String {
        format!("{}/{} signatures complete", self.completed, self.total)
    }

    pub fn to_html(&self) -> String {
        let mut html = format!(
            r#"<div class="signature-banner {}"><strong class="signature-status">{}</strong> <span class="signature-count">{}</span>"#,
            self.kind().css_class(),
            escape_html(&self.status),
            escape_html(&self.count_text())
        );
        if let Some(notes) = &self.notes {
            html.push_str(&format!(
                r#"<p class="signature-notes">{}</p>"#,
                escape_html(notes)
            ));
        }
        html.push_str("</div>");
        html
    }
}

/// Non-negative integer, or a string holding one
fn count(value: &Value) -> Option<u32> {
    match value {
        Value::Number(n) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Failure reported inside a 2xx response:
/// `{"success": false, "error": "...", "error_code": "..."}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceFailure {
    pub message: String,
    pub code: Option<String>,
}

impl ServiceFailure {
    pub fn find(result: &Value) -> Option<Self> {
        if result.get("success")?.as_bool()? {
            return None;
        }

        let message = result
            .get("error")
            .and_then(Value::as_str)
            .unwrap_or("The extraction service reported a failure")
            .to_string();
        let code = result
            .get("error_code")
            .and_then(Value::as_str)
            .map(str::to_string);

        Some(Self { message, code })
    }

    pub fn to_html(&self) -> String {
        let code = self
            .code
            .as_deref()
            .map(|code| format!(r#" <code class="service-error-code">{}</code>"#, escape_html(code)))
            .unwrap_or_default();
        format!(
            r#"<div class="service-error">{}{}</div>"#,
            escape_html(&self.message),
            code
        )
    }
}
