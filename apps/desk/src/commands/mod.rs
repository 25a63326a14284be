//! # Desk Commands
//!
//! Every operation the front end can invoke.
//!
//! ## Command Organization
//! ```text
//! commands/
//! ├── mod.rs        ◄─── You are here (exports, mirror helpers)
//! ├── auth.rs       ◄─── Login, logout, menu
//! ├── repair.rs     ◄─── Ticket intake, saves, transitions, delivery
//! ├── sale.rs       ◄─── POS checkout
//! ├── inventory.rs  ◄─── Products, goods import, stock report
//! ├── party.rs      ◄─── Customers, suppliers, employees, debt
//! ├── vat.rs        ◄─── VAT invoices and document parsing
//! └── config.rs     ◄─── Configuration retrieval
//! ```
//!
//! ## How Commands Work
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Command Flow                                         │
//! │                                                                         │
//! │  confirm_delivery(&session, &backend, &printer, id, form, payment)      │
//! │         │                                                               │
//! │         ├── session.with_session_mut(..)   commit (lock held)           │
//! │         │                                                               │
//! │         ├── printer.print(&receipt)        projection of the commit     │
//! │         │                                                               │
//! │         └── backend.update_invoice(..)     mirror (lock released)       │
//! │                                                                         │
//! │  Result<T, ApiError> back to the front end                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Mirror failures are logged and swallowed: the in-memory store is the
//! source of truth for the session.

pub mod auth;
pub mod config;
pub mod inventory;
pub mod party;
pub mod repair;
pub mod sale;
pub mod vat;

use tracing::warn;

use servicepro_core::{Customer, Invoice};
use servicepro_store::{MockBackend, StoreResult};

pub(crate) fn log_mirror_failure(what: &str, id: &str, result: StoreResult<servicepro_store::Ack>) {
    if let Err(e) = result {
        warn!(what = %what, id = %id, error = %e, "Mirror write failed");
    }
}

/// Mirrors an invoice write and the customer balance it moved.
pub(crate) async fn mirror_invoice(
    backend: &MockBackend,
    invoice: &Invoice,
    customer: Option<Customer>,
    created: bool,
) {
    let result = if created {
        backend.add_invoice(invoice.clone()).await
    } else {
        backend.update_invoice(invoice.clone()).await
    };
    log_mirror_failure("invoice", &invoice.id, result);

    if let Some(customer) = customer {
        let id = customer.id.clone();
        log_mirror_failure("customer", &id, backend.update_customer(customer).await);
    }
}
