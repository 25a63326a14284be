//! # Repair Desk
//!
//! Front-counter operations on a [`Session`]: each one checks the actor,
//! runs the pure rule from core, and commits through the store.
//!
//! ## Delivery
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  finalize_delivery(id, form, payment)                                   │
//! │       │                                                                 │
//! │       ├── 1. repair::finalize_delivery   (role, status, amounts)        │
//! │       ├── 2. store.replace_invoice       (record + customer debt)       │
//! │       └── 3. ReceiptDocument::project    (from the committed record)    │
//! │                                                                         │
//! │  A failure in 1 or 2 leaves the store untouched and prints nothing.     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;

use servicepro_core::access::Action;
use servicepro_core::invoice::{self, CheckoutRequest};
use servicepro_core::purchase::{ImportRequest, PurchaseOrder};
use servicepro_core::receipt::ReceiptDocument;
use servicepro_core::repair::{self, TicketEvent, TicketForm, TicketIntake, TicketTab};
use servicepro_core::{Invoice, Money};

use crate::error::StoreResult;
use crate::new_id;
use crate::session::Session;

/// A committed record and the slip printed from it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Committed {
    pub invoice: Invoice,
    pub receipt: ReceiptDocument,
}

pub struct RepairDesk<'a> {
    session: &'a mut Session,
}

impl<'a> RepairDesk<'a> {
    pub fn new(session: &'a mut Session) -> Self {
        RepairDesk { session }
    }

    /// Receives a device and opens a ticket; returns it with the intake slip.
    pub fn open_ticket(&mut self, intake: TicketIntake) -> StoreResult<Committed> {
        self.session.require(Action::CreateTicket)?;

        let store = self.session.store();
        let customer = store.customers().get(&intake.customer_id);
        let ticket = repair::open_ticket(intake, customer, new_id("REP"), Utc::now())?;

        info!(
            id = %ticket.id,
            customer_id = %ticket.customer_id,
            device = %ticket.repair().map(|r| r.device_info.device_name.as_str()).unwrap_or_default(),
            "Ticket opened"
        );

        self.session.store_mut().add_invoice(ticket.clone())?;
        Ok(self.project(ticket))
    }

    /// Saves edits, escalating at most one step.
    pub fn save_ticket(&mut self, id: &str, form: &TicketForm) -> StoreResult<Invoice> {
        self.advance_ticket(id, TicketEvent::Save, form)
    }

    /// Applies an explicit event (quote, approve, finish, cancel).
    pub fn advance_ticket(&mut self, id: &str, event: TicketEvent, form: &TicketForm) -> StoreResult<Invoice> {
        let actor = self.session.actor()?.clone();
        let ticket = self.session.store().invoices().require(id)?;
        let from = ticket.repair_status();
        let next = repair::save(&actor, ticket, event, form)?;

        info!(
            id = %id,
            actor = %actor.id,
            event = ?event,
            from = ?from,
            to = ?next.repair_status(),
            "Ticket updated"
        );

        self.session.store_mut().replace_invoice(next)
    }

    /// Amount offered by default on the payment dialog.
    pub fn proposed_payment(&self, form: &TicketForm) -> Money {
        repair::proposed_payment(form)
    }

    /// Takes payment and hands the device back, in one commit.
    pub fn finalize_delivery(&mut self, id: &str, form: &TicketForm, payment: Money) -> StoreResult<Committed> {
        let actor = self.session.actor()?.clone();
        let ticket = self.session.store().invoices().require(id)?;
        let delivered = repair::finalize_delivery(&actor, ticket, form, payment)?;

        let committed = self.session.store_mut().replace_invoice(delivered)?;

        info!(
            id = %committed.id,
            sales_id = %actor.id,
            total = %committed.total_amount,
            paid = %committed.paid_amount,
            status = ?committed.status,
            "Ticket delivered"
        );

        Ok(self.project(committed))
    }

    /// POS sale.
    pub fn checkout(&mut self, request: CheckoutRequest) -> StoreResult<Committed> {
        self.session.require(Action::Checkout)?;

        let customer = self.session.store().customers().get(&request.customer_id);
        let sale = invoice::checkout(request, customer, new_id("INV"), Utc::now())?;

        info!(id = %sale.id, total = %sale.total_amount, paid = %sale.paid_amount, "Sale completed");

        self.session.store_mut().add_invoice(sale.clone())?;
        Ok(self.project(sale))
    }

    /// Confirms an import form: purchase order, supplier debt, stock.
    pub fn import_goods(&mut self, request: ImportRequest) -> StoreResult<PurchaseOrder> {
        self.session.require(Action::ImportGoods)?;

        let supplier = self.session.store().suppliers().get(&request.supplier_id);
        let po = PurchaseOrder::build(request, supplier, new_id("PO"), Utc::now())?;

        self.session.store_mut().import_goods(po.clone())?;
        Ok(po)
    }

    /// Repair tickets on a board tab, newest first.
    pub fn tickets(&self, tab: TicketTab) -> Vec<Invoice> {
        repair::filter_tickets(self.session.store().invoices(), tab)
            .into_iter()
            .cloned()
            .collect()
    }

    fn project(&self, invoice: Invoice) -> Committed {
        let customer = self.session.store().customers().get(&invoice.customer_id);
        let receipt = ReceiptDocument::project(&invoice, customer);
        Committed { invoice, receipt }
    }
}
