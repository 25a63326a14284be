//! # VAT Invoice Commands
//!
//! Input/output VAT invoice capture, by hand or from a parsed document.
//!
//! ## Capture Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  new_vat_form ──► VatForm ──► parse_vat_from_text / _image (optional)   │
//! │                      │               │                                  │
//! │                      │        Ok  ──► form with the draft overlaid      │
//! │                      │        Err ──► caller keeps its form, shows msg  │
//! │                      ▼                                                  │
//! │               save_vat_invoice ──► VatInvoice (PENDING)                 │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use tracing::{debug, info, warn};

use servicepro_core::access::Action;
use servicepro_core::vat::{VatDraft, VatFilter, VatForm, VatInvoice};
use servicepro_store::new_id;

use crate::document::{DocumentError, DocumentParser, DocumentResult};
use crate::error::ApiError;
use crate::state::{ConfigState, SessionState};

/// Blank form preset with the configured warehouse and VAT rate.
pub fn new_vat_form(config: &ConfigState) -> VatForm {
    VatForm::new(config.default_warehouse, config.vat_rate())
}

/// Form for editing a saved invoice.
pub fn edit_vat_invoice(session: &SessionState, id: String) -> Result<VatForm, ApiError> {
    session.with_session(|s| -> Result<VatForm, ApiError> {
        s.require(Action::ManageVat)?;
        Ok(VatForm::edit(s.store().vat_invoices().require(&id)?))
    })
}

/// Saves the form as a new invoice, or over the one being edited.
pub fn save_vat_invoice(session: &SessionState, form: VatForm) -> Result<VatInvoice, ApiError> {
    debug!(editing = ?form.editing_id, number = %form.invoice_number, "save_vat_invoice command");

    session.with_session_mut(|s| -> Result<VatInvoice, ApiError> {
        s.require(Action::ManageVat)?;
        let invoice = form.finalize(new_id("VAT"), Utc::now().date_naive())?;

        if form.editing_id.is_some() {
            s.store_mut().update_vat_invoice(invoice.clone())?;
        } else {
            s.store_mut().add_vat_invoice(invoice.clone());
        }

        info!(
            id = %invoice.id,
            number = %invoice.invoice_number,
            direction = ?invoice.direction,
            total = %invoice.total_amount,
            "VAT invoice saved"
        );
        Ok(invoice)
    })
}

pub fn list_vat_invoices(session: &SessionState, filter: VatFilter) -> Result<Vec<VatInvoice>, ApiError> {
    session.with_session(|s| -> Result<Vec<VatInvoice>, ApiError> {
        s.require(Action::ManageVat)?;
        Ok(filter
            .apply(s.store().vat_invoices().as_slice())
            .into_iter()
            .cloned()
            .collect())
    })
}

/// Reads pasted invoice text into a copy of `form`.
pub async fn parse_vat_from_text(
    parser: &dyn DocumentParser,
    form: &VatForm,
    text: String,
) -> Result<VatForm, ApiError> {
    debug!(chars = text.chars().count(), "parse_vat_from_text command");
    overlay(form, parser.parse_from_text(&text).await)
}

/// Reads an invoice photo into a copy of `form`.
pub async fn parse_vat_from_image(
    parser: &dyn DocumentParser,
    form: &VatForm,
    bytes: Vec<u8>,
    mime_type: String,
) -> Result<VatForm, ApiError> {
    debug!(bytes = bytes.len(), mime_type = %mime_type, "parse_vat_from_image command");
    overlay(form, parser.parse_from_image(&bytes, &mime_type).await)
}

fn overlay(form: &VatForm, parsed: DocumentResult<Option<VatDraft>>) -> Result<VatForm, ApiError> {
    match parsed {
        Ok(Some(draft)) => {
            let mut next = form.clone();
            next.apply_draft(draft);
            Ok(next)
        }
        Ok(None) => Err(DocumentError::NoResult.into()),
        Err(e) => {
            warn!(error = %e, "Document parsing failed");
            Err(e.into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use async_trait::async_trait;
    use servicepro_core::vat::{VatDirection, VatDraftItem, VatStatus};
    use servicepro_core::Warehouse;
    use servicepro_store::DEMO_PASSWORD;

    /// Answers with a fixed draft, or nothing.
    struct FixedParser(Option<VatDraft>);

    #[async_trait]
    impl DocumentParser for FixedParser {
        async fn parse_from_text(&self, _text: &str) -> DocumentResult<Option<VatDraft>> {
            Ok(self.0.clone())
        }

        async fn parse_from_image(&self, _bytes: &[u8], _mime_type: &str) -> DocumentResult<Option<VatDraft>> {
            Err(DocumentError::Service("quota exceeded".to_string()))
        }

        async fn suggest_repair_note(&self, _symptoms: &str) -> DocumentResult<String> {
            Ok(String::new())
        }
    }

    fn admin() -> SessionState {
        let session = SessionState::default();
        session.with_session_mut(|s| s.login("admin", DEMO_PASSWORD)).unwrap();
        session
    }

    fn draft() -> VatDraft {
        VatDraft {
            invoice_number: Some("0000981".to_string()),
            date: Some("2024-03-15".to_string()),
            partner_name: Some("Công ty Minh Thông".to_string()),
            tax_code: Some("0101234567".to_string()),
            tax_rate: Some(8.0),
            direction: Some("OUT".to_string()),
            internal_company: Some("TNC".to_string()),
            items: Some(vec![VatDraftItem {
                product_name: "Ổ cứng SSD 256GB".to_string(),
                unit: "Cái".to_string(),
                quantity: 2.0,
                unit_price: 650_000.0,
            }]),
        }
    }

    #[tokio::test]
    async fn test_parse_then_save() {
        let session = admin();
        let form = new_vat_form(&ConfigState::default());

        let parsed = parse_vat_from_text(&FixedParser(Some(draft())), &form, "HĐ 981".to_string())
            .await
            .unwrap();
        assert_eq!(parsed.direction, VatDirection::Out);
        assert_eq!(parsed.warehouse, Warehouse::Tnc);

        let saved = save_vat_invoice(&session, parsed).unwrap();
        assert_eq!(saved.status, VatStatus::Pending);
        assert_eq!(saved.total_before_tax.dong(), 1_300_000);
        assert_eq!(saved.tax_amount.dong(), 104_000);
        assert_eq!(saved.total_amount.dong(), 1_404_000);

        let mut edit = edit_vat_invoice(&session, saved.id.clone()).unwrap();
        edit.partner_name = "Kho Sỉ Minh Thông".to_string();
        let edited = save_vat_invoice(&session, edit).unwrap();
        assert_eq!(edited.id, saved.id);

        let found = list_vat_invoices(
            &session,
            VatFilter {
                search: "kho sỉ".to_string(),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(found.len(), 1);
    }

    #[tokio::test]
    async fn test_failed_parse_keeps_form() {
        let mut form = new_vat_form(&ConfigState::default());
        form.invoice_number = "typed by hand".to_string();

        let err = parse_vat_from_text(&FixedParser(None), &form, "???".to_string())
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::DocumentError);

        let err = parse_vat_from_image(&FixedParser(None), &form, vec![0xFF, 0xD8], "image/jpeg".to_string())
            .await
            .unwrap_err();
        assert!(err.message.contains("quota exceeded"));
        assert_eq!(form.invoice_number, "typed by hand");
    }

    #[test]
    fn test_sales_cannot_touch_vat() {
        let session = SessionState::default();
        session.with_session_mut(|s| s.login("sales", DEMO_PASSWORD)).unwrap();

        let err = list_vat_invoices(&session, VatFilter::default()).unwrap_err();
        assert_eq!(err.code, ErrorCode::Forbidden);
    }

    #[test]
    fn test_missing_partner_is_rejected() {
        let session = admin();
        let mut form = new_vat_form(&ConfigState::default());
        form.invoice_number = "0001".to_string();

        let err = save_vat_invoice(&session, form).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
    }
}
