//! # Document Intelligence
//!
//! Contract for the external service that reads VAT invoices from pasted
//! text or a photo, and the helpers around its answers.
//!
//! ```text
//! parse_vat_from_text(form, text)
//!     │
//!     ├── parser.parse_from_text(text)
//!     │       ├── Ok(Some(draft)) ──► form.apply_draft(draft)
//!     │       ├── Ok(None)        ──► form unchanged, DocumentError::NoResult
//!     │       └── Err(e)          ──► form unchanged, e
//!     │
//!     └── no retry
//! ```

use async_trait::async_trait;
use thiserror::Error;

use servicepro_core::vat::VatDraft;
use servicepro_core::Warehouse;

#[derive(Debug, Error)]
pub enum DocumentError {
    /// No key configured, so there is nothing to call.
    #[error("Document service is not configured")]
    NotConfigured,

    /// The service answered but recognised nothing.
    #[error("No invoice data could be read from the document")]
    NoResult,

    /// Transport or service-side failure.
    #[error("Document service failed: {0}")]
    Service(String),

    /// The answer was not the JSON shape we asked for.
    #[error("Document service returned malformed data: {0}")]
    Malformed(#[from] serde_json::Error),
}

pub type DocumentResult<T> = Result<T, DocumentError>;

/// The document intelligence collaborator.
///
/// Implementations return `Ok(None)` when they ran but found no invoice.
#[async_trait]
pub trait DocumentParser: Send + Sync {
    async fn parse_from_text(&self, text: &str) -> DocumentResult<Option<VatDraft>>;

    async fn parse_from_image(&self, bytes: &[u8], mime_type: &str) -> DocumentResult<Option<VatDraft>>;

    /// One-line repair hint for the reported symptoms.
    async fn suggest_repair_note(&self, symptoms: &str) -> DocumentResult<String>;
}

/// Used when no API key is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnconfiguredParser;

#[async_trait]
impl DocumentParser for UnconfiguredParser {
    async fn parse_from_text(&self, _text: &str) -> DocumentResult<Option<VatDraft>> {
        Err(DocumentError::NotConfigured)
    }

    async fn parse_from_image(&self, _bytes: &[u8], _mime_type: &str) -> DocumentResult<Option<VatDraft>> {
        Err(DocumentError::NotConfigured)
    }

    async fn suggest_repair_note(&self, _symptoms: &str) -> DocumentResult<String> {
        Err(DocumentError::NotConfigured)
    }
}

/// Decodes a service answer into a draft.
///
/// The service is asked for bare JSON but sometimes wraps it in a Markdown
/// code fence (optionally tagged `json`). Blank answers are `None`.
pub fn extract_draft_json(raw: &str) -> DocumentResult<Option<VatDraft>> {
    let body = strip_code_fence(raw);
    if body.is_empty() || body == "{}" || body == "null" {
        return Ok(None);
    }
    Ok(Some(VatDraft::from_json(body)?))
}

fn strip_code_fence(raw: &str) -> &str {
    let text = raw.trim();
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

/// Tells the service which companies are ours, so it can fill
/// `internalCompany` with a warehouse code.
pub fn company_context() -> String {
    let mut context = String::from("MY COMPANIES:\n");
    for (i, warehouse) in Warehouse::ALL.iter().enumerate() {
        context.push_str(&format!(
            "{}. \"{}\" (Matches: {}).\n",
            i + 1,
            warehouse.display_name(),
            warehouse_code(*warehouse)
        ));
    }
    context
}

fn warehouse_code(warehouse: Warehouse) -> String {
    serde_json::to_value(warehouse)
        .ok()
        .and_then(|v| v.as_str().map(str::to_string))
        .unwrap_or_default()
}

/// Prompt for a pasted invoice text.
pub fn text_prompt(text: &str) -> String {
    format!("Extract VAT invoice data. {} Text: \"{}\"", company_context(), text)
}

/// Prompt accompanying an invoice photo.
pub fn image_prompt() -> String {
    format!("Extract invoice data. {}", company_context())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_plain_json() {
        let draft = extract_draft_json(r#"{"invoiceNumber": "0001234", "partnerName": "Lê Nam", "type": "IN"}"#)
            .unwrap()
            .unwrap();
        assert_eq!(draft.invoice_number.as_deref(), Some("0001234"));
        assert_eq!(draft.direction.as_deref(), Some("IN"));
    }

    #[test]
    fn test_extract_fenced_json() {
        let raw = "```json\n{\"invoiceNumber\": \"77\", \"internalCompany\": \"TNC\"}\n```";
        let draft = extract_draft_json(raw).unwrap().unwrap();
        assert_eq!(draft.invoice_number.as_deref(), Some("77"));
        assert_eq!(draft.internal_company.as_deref(), Some("TNC"));

        let bare_fence = "```\n{\"partnerName\": \"Minh Thông\"}\n```";
        assert!(extract_draft_json(bare_fence).unwrap().is_some());
    }

    #[test]
    fn test_extract_empty_and_malformed() {
        assert!(extract_draft_json("  ").unwrap().is_none());
        assert!(extract_draft_json("```json\n{}\n```").unwrap().is_none());
        assert!(matches!(
            extract_draft_json("Xin lỗi, tôi không đọc được"),
            Err(DocumentError::Malformed(_))
        ));
    }

    #[test]
    fn test_company_context_lists_codes() {
        let context = company_context();
        assert!(context.contains("(Matches: TAY_PHAT)"));
        assert!(context.contains("(Matches: TNC)"));
        assert!(text_prompt("HĐ số 12").ends_with("Text: \"HĐ số 12\""));
    }

    #[tokio::test]
    async fn test_unconfigured_parser_refuses() {
        let parser = UnconfiguredParser;
        assert!(matches!(
            parser.parse_from_text("x").await,
            Err(DocumentError::NotConfigured)
        ));
    }
}
