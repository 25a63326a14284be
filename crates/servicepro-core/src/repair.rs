//! # Repair Ticket Workflow
//!
//! The lifecycle of a repair job, as a pure function from
//! `(current status, event, form snapshot)` to the next status, plus the
//! record updates each step makes.
//!
//! ## Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  open_ticket                                                            │
//! │      │                                                                  │
//! │      ▼          Save + diagnosis         Save + lines / SendQuote       │
//! │  RECEIVED ─────────────────────► CHECKING ─────────────────► QUOTING    │
//! │                                                                 │       │
//! │                                                    ApproveQuote │       │
//! │                                                                 ▼       │
//! │  DELIVERED ◄────────────────── COMPLETED ◄──────────────── IN_PROGRESS  │
//! │        finalize_delivery              MarkFinished                      │
//! │        (payment + ledger)                                               │
//! │                                                                         │
//! │  Cancel: any non-terminal state ──► CANCELLED                           │
//! │  WAITING_PARTS: declared, no event enters or leaves it                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Generic Save
//! A save with no explicit target escalates at most one step. Diagnosis is
//! checked before quote lines, so a RECEIVED ticket saved with both lands in
//! CHECKING.
//!
//! ## Delivery
//! [`finalize_delivery`] is the only step that moves money. It returns the
//! committed ticket; anything printed is projected from that value.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::access::{can_act, Action};
use crate::error::{CoreError, CoreResult, ValidationError};
use crate::invoice::{
    items_total, DeviceInfo, Invoice, InvoiceItem, InvoiceKind, RepairDetails, RepairStatus,
};
use crate::money::Money;
use crate::types::{Customer, Employee, PaymentStatus, Role, Warehouse};
use crate::validation;

// =============================================================================
// Events & Form
// =============================================================================

/// What the actor asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TicketEvent {
    /// Save edits; may escalate one step.
    Save,
    SendQuote,
    ApproveQuote,
    MarkFinished,
    /// Hand the device back. Only [`finalize_delivery`] applies it.
    Deliver,
    Cancel,
}

/// The editable part of a ticket as the actor left it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct TicketForm {
    pub diagnosis: String,
    pub note: Option<String>,
    pub items: Vec<InvoiceItem>,
}

impl TicketForm {
    /// Loads the form from a stored ticket.
    pub fn from_ticket(ticket: &Invoice) -> Self {
        TicketForm {
            diagnosis: ticket
                .repair()
                .and_then(|r| r.device_info.diagnosis.clone())
                .unwrap_or_default(),
            note: ticket.note.clone(),
            items: ticket.items.clone(),
        }
    }

    pub fn has_diagnosis(&self) -> bool {
        !self.diagnosis.trim().is_empty()
    }

    pub fn total(&self) -> Money {
        items_total(&self.items)
    }
}

// =============================================================================
// Transition Function
// =============================================================================

/// Next status for `event`, or `None` when the event is not legal from
/// `current`.
///
/// ```rust
/// use servicepro_core::invoice::RepairStatus;
/// use servicepro_core::repair::{next_status, TicketEvent, TicketForm};
///
/// let form = TicketForm { diagnosis: "Hỏng IC nguồn".into(), ..Default::default() };
/// assert_eq!(
///     next_status(RepairStatus::Received, TicketEvent::Save, &form),
///     Some(RepairStatus::Checking)
/// );
/// assert_eq!(next_status(RepairStatus::Received, TicketEvent::MarkFinished, &form), None);
/// ```
pub fn next_status(current: RepairStatus, event: TicketEvent, form: &TicketForm) -> Option<RepairStatus> {
    use RepairStatus::*;

    if current.is_terminal() {
        return None;
    }

    match (current, event) {
        (Received, TicketEvent::Save) if form.has_diagnosis() => Some(Checking),
        (Checking, TicketEvent::Save) if !form.items.is_empty() => Some(Quoting),
        (_, TicketEvent::Save) => Some(current),
        (Checking, TicketEvent::SendQuote) => Some(Quoting),
        (Quoting, TicketEvent::ApproveQuote) => Some(InProgress),
        (InProgress, TicketEvent::MarkFinished) => Some(Completed),
        (Completed, TicketEvent::Deliver) => Some(Delivered),
        (_, TicketEvent::Cancel) => Some(Cancelled),
        _ => None,
    }
}

/// The permission an actor needs for `event` in this state.
///
/// A save that escalates needs the escalation's permission, not just
/// `SaveTicket`.
pub fn required_action(current: RepairStatus, event: TicketEvent, form: &TicketForm) -> Action {
    match event {
        TicketEvent::Save => match next_status(current, event, form) {
            Some(RepairStatus::Checking) if current == RepairStatus::Received => Action::Diagnose,
            Some(RepairStatus::Quoting) if current == RepairStatus::Checking => Action::SendQuote,
            _ => Action::SaveTicket,
        },
        TicketEvent::SendQuote => Action::SendQuote,
        TicketEvent::ApproveQuote => Action::ApproveQuote,
        TicketEvent::MarkFinished => Action::MarkFinished,
        TicketEvent::Deliver => Action::ConfirmDelivery,
        TicketEvent::Cancel => Action::CancelTicket,
    }
}

/// Checks the actor's role, then the event's legality, and returns the
/// status the ticket moves to.
pub fn advance(role: Role, ticket: &Invoice, event: TicketEvent, form: &TicketForm) -> CoreResult<RepairStatus> {
    let current = ticket.repair_details()?.repair_status;

    let action = required_action(current, event, form);
    if !can_act(role, action) {
        return Err(CoreError::Forbidden { role, action });
    }

    next_status(current, event, form).ok_or_else(|| CoreError::InvalidTransition {
        ticket_id: ticket.id.clone(),
        from: current,
        event,
    })
}

// =============================================================================
// Intake
// =============================================================================

/// Device reception form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct TicketIntake {
    pub customer_id: String,
    pub device_info: DeviceInfo,
    pub note: Option<String>,
    pub warehouse: Warehouse,
    pub technician_id: Option<String>,
}

/// Creates a RECEIVED, UNPAID ticket with no lines.
///
/// ## Rules
/// - Customer must exist
/// - Device name must not be blank
pub fn open_ticket(
    intake: TicketIntake,
    customer: Option<&Customer>,
    id: String,
    now: DateTime<Utc>,
) -> CoreResult<Invoice> {
    let customer = customer.ok_or_else(|| ValidationError::Required {
        field: "customer".to_string(),
    })?;
    validation::validate_required("device name", &intake.device_info.device_name)?;

    Ok(Invoice {
        id,
        customer_id: customer.id.clone(),
        customer_name: customer.name.clone(),
        date: now,
        items: Vec::new(),
        total_amount: Money::zero(),
        paid_amount: Money::zero(),
        warehouse: intake.warehouse,
        status: PaymentStatus::Unpaid,
        note: intake.note.filter(|n| !n.trim().is_empty()),
        kind: InvoiceKind::Repair(RepairDetails {
            repair_status: RepairStatus::Received,
            device_info: intake.device_info,
            technician_id: intake.technician_id,
            sales_id: None,
        }),
    })
}

// =============================================================================
// Save
// =============================================================================

/// Writes the form into the ticket and sets its status.
///
/// Lines, total, note and diagnosis come from the form. Payment fields are
/// left alone, except that a cancelled ticket is marked `CANCELLED`.
fn apply_form(ticket: &Invoice, form: &TicketForm, status: RepairStatus) -> CoreResult<Invoice> {
    validation::validate_quote_lines(&form.items)?;

    let mut next = ticket.clone();
    next.items = form.items.clone();
    next.total_amount = form.total();
    next.note = form.note.clone();
    if status == RepairStatus::Cancelled {
        next.status = PaymentStatus::Cancelled;
    }

    let details = next.repair_details_mut()?;
    details.repair_status = status;
    details.device_info.diagnosis = if form.has_diagnosis() {
        Some(form.diagnosis.clone())
    } else {
        None
    };

    Ok(next)
}

/// Applies a non-delivery event on behalf of `actor`.
///
/// `Deliver` is refused here; it needs a payment and goes through
/// [`finalize_delivery`].
pub fn save(actor: &Employee, ticket: &Invoice, event: TicketEvent, form: &TicketForm) -> CoreResult<Invoice> {
    let current = ticket.repair_details()?.repair_status;
    if event == TicketEvent::Deliver {
        return Err(CoreError::InvalidTransition {
            ticket_id: ticket.id.clone(),
            from: current,
            event,
        });
    }

    let status = advance(actor.role, ticket, event, form)?;
    let mut next = apply_form(ticket, form, status)?;

    // first diagnosis claims the ticket for the technician
    if current == RepairStatus::Received && status == RepairStatus::Checking {
        let details = next.repair_details_mut()?;
        if details.technician_id.is_none() {
            details.technician_id = Some(actor.id.clone());
        }
    }

    Ok(next)
}

// =============================================================================
// Delivery
// =============================================================================

/// Amount offered by default when confirming delivery: the form total.
pub fn proposed_payment(form: &TicketForm) -> Money {
    form.total()
}

/// COMPLETED → DELIVERED with payment, as one step.
///
/// ## Rules
/// - Actor must hold `ConfirmDelivery`; ticket must be COMPLETED
/// - Payment must not be negative
/// - `paid_amount = min(payment, total)`, status from the amounts
/// - The actor is recorded as the responsible salesperson
///
/// The caller commits the returned ticket through the ledger hook and
/// projects any receipt from what was committed.
pub fn finalize_delivery(
    actor: &Employee,
    ticket: &Invoice,
    form: &TicketForm,
    payment: Money,
) -> CoreResult<Invoice> {
    if payment.is_negative() {
        return Err(CoreError::InvalidPaymentAmount {
            reason: format!("payment {} is negative", payment),
        });
    }

    let status = advance(actor.role, ticket, TicketEvent::Deliver, form)?;
    let mut next = apply_form(ticket, form, status)?;

    let total = next.total_amount;
    let paid = payment.min(total);
    next.paid_amount = paid;
    next.status = PaymentStatus::from_amounts(total, paid);
    next.repair_details_mut()?.sales_id = Some(actor.id.clone());

    Ok(next)
}

// =============================================================================
// Ticket Board
// =============================================================================

/// Tabs of the ticket board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TicketTab {
    Active,
    Delivered,
    Cancelled,
}

impl TicketTab {
    pub fn contains(&self, status: RepairStatus) -> bool {
        match self {
            TicketTab::Active => !status.is_terminal(),
            TicketTab::Delivered => status == RepairStatus::Delivered,
            TicketTab::Cancelled => status == RepairStatus::Cancelled,
        }
    }
}

/// Repair tickets on a tab, newest first. Sales invoices never appear.
pub fn filter_tickets<'a, I>(invoices: I, tab: TicketTab) -> Vec<&'a Invoice>
where
    I: IntoIterator<Item = &'a Invoice>,
{
    let mut tickets: Vec<&Invoice> = invoices
        .into_iter()
        .filter(|inv| inv.repair_status().is_some_and(|s| tab.contains(s)))
        .collect();
    tickets.sort_by(|a, b| b.date.cmp(&a.date));
    tickets
}

// =============================================================================
// Unit Tests
// =============================================================================
