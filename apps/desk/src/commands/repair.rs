//! # Repair Commands
//!
//! Ticket board, intake, technician saves and the delivery counter.
//!
//! ## Ticket Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  open_ticket ──► RECEIVED ──save(diagnosis)──► CHECKING                 │
//! │                                                   │                     │
//! │                                        save(lines) / SEND_QUOTE         │
//! │                                                   ▼                     │
//! │                  IN_PROGRESS ◄──APPROVE_QUOTE── QUOTING                 │
//! │                       │                                                 │
//! │                  MARK_FINISHED                                          │
//! │                       ▼                                                 │
//! │                  COMPLETED ──confirm_delivery──► DELIVERED              │
//! │                                                                         │
//! │  CANCEL from any non-terminal status ──► CANCELLED                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use servicepro_core::access::{available_ticket_actions, Action};
use servicepro_core::repair::{TicketEvent, TicketForm, TicketIntake, TicketTab};
use servicepro_core::{Customer, Invoice, Money};
use servicepro_store::{Committed, MockBackend, RepairDesk, Session};

use crate::commands::mirror_invoice;
use crate::document::DocumentParser;
use crate::error::ApiError;
use crate::print::ReceiptPrinter;
use crate::state::SessionState;

/// A ticket plus the transition buttons the current actor may press.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketView {
    pub ticket: Invoice,
    pub actions: Vec<Action>,
}

fn customer_of(session: &Session, invoice: &Invoice) -> Option<Customer> {
    session.store().customers().get(&invoice.customer_id).cloned()
}

/// Receives a device. Prints the intake slip when `print` is set.
pub async fn open_ticket(
    session: &SessionState,
    backend: &MockBackend,
    printer: &dyn ReceiptPrinter,
    intake: TicketIntake,
    print: bool,
) -> Result<Committed, ApiError> {
    debug!(customer_id = %intake.customer_id, "open_ticket command");

    let (opened, customer) = session.with_session_mut(|s| -> Result<_, ApiError> {
        let opened = RepairDesk::new(s).open_ticket(intake)?;
        let customer = customer_of(s, &opened.invoice);
        Ok((opened, customer))
    })?;

    if print {
        if let Err(e) = printer.print(&opened.receipt) {
            warn!(id = %opened.invoice.id, error = %e, "Intake slip not printed");
        }
    }

    mirror_invoice(backend, &opened.invoice, customer, true).await;
    Ok(opened)
}

/// Saves the ticket form. May move the ticket one step forward.
pub async fn save_ticket(
    session: &SessionState,
    backend: &MockBackend,
    id: String,
    form: TicketForm,
) -> Result<Invoice, ApiError> {
    advance_ticket(session, backend, id, TicketEvent::Save, form).await
}

/// Applies an explicit transition button.
pub async fn advance_ticket(
    session: &SessionState,
    backend: &MockBackend,
    id: String,
    event: TicketEvent,
    form: TicketForm,
) -> Result<Invoice, ApiError> {
    debug!(id = %id, event = ?event, "advance_ticket command");

    let (ticket, customer) = session.with_session_mut(|s| -> Result<_, ApiError> {
        let ticket = RepairDesk::new(s).advance_ticket(&id, event, &form)?;
        let customer = customer_of(s, &ticket);
        Ok((ticket, customer))
    })?;

    mirror_invoice(backend, &ticket, customer, false).await;
    Ok(ticket)
}

/// Default amount for the payment dialog.
pub fn proposed_payment(session: &SessionState, form: TicketForm) -> Money {
    session.with_session_mut(|s| RepairDesk::new(s).proposed_payment(&form))
}

/// Takes payment, hands the device back and prints the delivery slip.
///
/// The slip is printed from the committed record. A printer failure is
/// logged; the delivery stands.
pub async fn confirm_delivery(
    session: &SessionState,
    backend: &MockBackend,
    printer: &dyn ReceiptPrinter,
    id: String,
    form: TicketForm,
    payment: Money,
) -> Result<Committed, ApiError> {
    debug!(id = %id, payment = %payment, "confirm_delivery command");

    let (delivered, customer) = session.with_session_mut(|s| -> Result<_, ApiError> {
        let delivered = RepairDesk::new(s).finalize_delivery(&id, &form, payment)?;
        let customer = customer_of(s, &delivered.invoice);
        Ok((delivered, customer))
    })?;

    if let Err(e) = printer.print(&delivered.receipt) {
        warn!(id = %delivered.invoice.id, error = %e, "Delivery slip not printed");
    }

    mirror_invoice(backend, &delivered.invoice, customer, false).await;
    Ok(delivered)
}

/// Tickets on a board tab, newest first.
pub fn list_tickets(session: &SessionState, tab: TicketTab) -> Vec<Invoice> {
    session.with_session_mut(|s| RepairDesk::new(s).tickets(tab))
}

/// One ticket with the buttons to show for the current actor.
pub fn get_ticket(session: &SessionState, id: String) -> Result<TicketView, ApiError> {
    session.with_session(|s| -> Result<TicketView, ApiError> {
        let role = s.actor()?.role;
        let ticket = s.store().invoices().require(&id)?.clone();
        let actions = match ticket.repair_status() {
            Some(status) => available_ticket_actions(role, status),
            None => Vec::new(),
        };
        Ok(TicketView { ticket, actions })
    })
}

/// Asks the document service for a one-line repair hint.
pub async fn suggest_repair_note(parser: &dyn DocumentParser, symptoms: String) -> Result<String, ApiError> {
    debug!("suggest_repair_note command");
    Ok(parser.suggest_repair_note(&symptoms).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::print::TextReceiptPrinter;
    use crate::state::ConfigState;
    use servicepro_core::invoice::{DeviceInfo, InvoiceItem, RepairStatus};
    use servicepro_core::PaymentStatus;
    use servicepro_store::mirror::MirrorConfig;
    use servicepro_store::{SeedData, DEMO_PASSWORD};

    struct Fixture {
        session: SessionState,
        backend: MockBackend,
        printer: TextReceiptPrinter<Vec<u8>>,
    }

    fn fixture() -> Fixture {
        let mut seed = SeedData::demo();
        seed.customers.push(Customer {
            id: "c1".to_string(),
            name: "Chị Hoa".to_string(),
            phone: "0977".to_string(),
            address: String::new(),
            balance: Money::zero(),
        });
        Fixture {
            session: SessionState::new(seed.clone()),
            backend: MockBackend::new(MirrorConfig::instant(), &seed),
            printer: TextReceiptPrinter::new(ConfigState::default(), Vec::new()),
        }
    }

    fn login(f: &Fixture, username: &str) {
        f.session
            .with_session_mut(|s| s.login(username, DEMO_PASSWORD))
            .unwrap();
    }

    fn intake() -> TicketIntake {
        TicketIntake {
            customer_id: "c1".to_string(),
            device_info: DeviceInfo {
                device_name: "iPhone 12".to_string(),
                symptoms: "Không sạc".to_string(),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_delivery_commits_prints_and_mirrors() {
        let f = fixture();
        login(&f, "admin");
        let id = open_ticket(&f.session, &f.backend, &f.printer, intake(), false)
            .await
            .unwrap()
            .invoice
            .id;

        let service = f.session.with_session(|s| s.store().products().get("s2").cloned()).unwrap();
        let form = TicketForm {
            diagnosis: "Hỏng IC sạc".to_string(),
            note: None,
            items: vec![InvoiceItem::from_product(&service, 3)],
        };
        save_ticket(&f.session, &f.backend, id.clone(), TicketForm { items: Vec::new(), ..form.clone() })
            .await
            .unwrap();
        save_ticket(&f.session, &f.backend, id.clone(), form.clone()).await.unwrap();
        for event in [TicketEvent::ApproveQuote, TicketEvent::MarkFinished] {
            advance_ticket(&f.session, &f.backend, id.clone(), event, form.clone())
                .await
                .unwrap();
        }

        assert_eq!(proposed_payment(&f.session, form.clone()).dong(), 300_000);
        let delivered = confirm_delivery(&f.session, &f.backend, &f.printer, id.clone(), form, Money::from_dong(300_000))
            .await
            .unwrap();

        assert_eq!(delivered.invoice.status, PaymentStatus::Paid);
        assert_eq!(delivered.invoice.repair_status(), Some(RepairStatus::Delivered));

        let mirrored = f.backend.get_invoices().await;
        assert_eq!(mirrored[0].repair_status(), Some(RepairStatus::Delivered));

        let view = get_ticket(&f.session, id).unwrap();
        assert!(view.actions.is_empty());

        let slip = String::from_utf8(f.printer.into_inner()).unwrap();
        assert!(slip.contains("PHIẾU BÀN GIAO"));
    }

    #[tokio::test]
    async fn test_technician_sees_technician_buttons() {
        let f = fixture();
        login(&f, "tech");
        let id = open_ticket(&f.session, &f.backend, &f.printer, intake(), true)
            .await
            .unwrap()
            .invoice
            .id;

        let view = get_ticket(&f.session, id).unwrap();
        assert_eq!(view.actions, vec![Action::SaveTicket]);
        assert_eq!(list_tickets(&f.session, TicketTab::Active).len(), 1);
    }

    #[tokio::test]
    async fn test_cancel_needs_sales_or_admin() {
        let f = fixture();
        login(&f, "tech");
        let id = open_ticket(&f.session, &f.backend, &f.printer, intake(), false)
            .await
            .unwrap()
            .invoice
            .id;

        let err = advance_ticket(&f.session, &f.backend, id, TicketEvent::Cancel, TicketForm::default())
            .await
            .unwrap_err();
        assert_eq!(err.code, crate::error::ErrorCode::Forbidden);
    }
}
