//! # Invoices and Repair Tickets
//!
//! A repair ticket is an invoice whose kind is `REPAIR`. Both share the
//! payment fields the ledger reads; only repair tickets carry workflow state
//! and device intake data.
//!
//! ## Shape
//! ```text
//! Invoice
//! ├── id, customer_id, customer_name, date, warehouse, note
//! ├── items ──────────► total_amount = Σ quantity × price
//! ├── paid_amount
//! ├── status           PAID | PARTIAL | UNPAID | CANCELLED
//! └── kind
//!     ├── SALE
//!     └── REPAIR ─────► repair_status, device_info, technician_id, sales_id
//! ```
//!
//! The discriminant decides which payload exists, so a sale can never be
//! asked for a repair status and a repair ticket can never lose its device.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::types::{Customer, PaymentStatus, Product, ProductKind, Warehouse};
use crate::validation;

// =============================================================================
// Line Items
// =============================================================================

/// A line on an invoice or repair quote.
///
/// Name, price and kind are frozen from the product when the line is added.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceItem {
    pub product_id: String,
    pub product_name: String,
    pub quantity: i64,
    pub price: Money,
    pub kind: ProductKind,
}

impl InvoiceItem {
    /// Snapshots a product into a line.
    pub fn from_product(product: &Product, quantity: i64) -> Self {
        InvoiceItem {
            product_id: product.id.clone(),
            product_name: product.name.clone(),
            quantity,
            price: product.price,
            kind: product.kind,
        }
    }

    #[inline]
    pub fn line_total(&self) -> Money {
        self.price.multiply_quantity(self.quantity)
    }
}

/// Sum of quantity × price over the lines.
pub fn items_total(items: &[InvoiceItem]) -> Money {
    items.iter().map(InvoiceItem::line_total).sum()
}

/// Adds one unit of a product, merging with an existing line for the same
/// product.
pub fn add_product_line(items: &mut Vec<InvoiceItem>, product: &Product) {
    match items.iter_mut().find(|i| i.product_id == product.id) {
        Some(line) => line.quantity += 1,
        None => items.push(InvoiceItem::from_product(product, 1)),
    }
}

// =============================================================================
// Repair Payload
// =============================================================================

/// Workflow state of a repair ticket.
///
/// ```text
/// RECEIVED → CHECKING → QUOTING → IN_PROGRESS → COMPLETED → DELIVERED
///
/// WAITING_PARTS: declared, nothing enters or leaves it
/// CANCELLED:     reachable from any non-terminal state
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RepairStatus {
    Received,
    Checking,
    Quoting,
    WaitingParts,
    InProgress,
    Completed,
    Delivered,
    Cancelled,
}

impl RepairStatus {
    /// Terminal states accept no further transitions.
    pub fn is_terminal(&self) -> bool {
        matches!(self, RepairStatus::Delivered | RepairStatus::Cancelled)
    }
}

impl Default for RepairStatus {
    fn default() -> Self {
        RepairStatus::Received
    }
}

/// Device intake metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct DeviceInfo {
    pub device_name: String,
    pub model: Option<String>,
    pub serial: Option<String>,
    pub password: Option<String>,
    /// As reported by the customer.
    pub symptoms: String,
    /// As found by the technician.
    pub diagnosis: Option<String>,
    pub accessories: Option<String>,
    /// Scratches, dents and the like at intake.
    pub appearance: Option<String>,
}

impl DeviceInfo {
    /// True when a non-blank diagnosis is recorded.
    pub fn has_diagnosis(&self) -> bool {
        self.diagnosis
            .as_deref()
            .is_some_and(|d| !d.trim().is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct RepairDetails {
    pub repair_status: RepairStatus,
    pub device_info: DeviceInfo,
    pub technician_id: Option<String>,
    /// Salesperson who confirmed payment and handed the device back.
    pub sales_id: Option<String>,
}

/// Invoice discriminant with its kind-specific payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "invoiceType", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InvoiceKind {
    Sale,
    Repair(RepairDetails),
}

// =============================================================================
// Invoice
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    pub id: String,
    pub customer_id: String,
    /// Name at time of creation (frozen).
    pub customer_name: String,
    #[ts(as = "String")]
    pub date: DateTime<Utc>,
    pub items: Vec<InvoiceItem>,
    pub total_amount: Money,
    pub paid_amount: Money,
    pub warehouse: Warehouse,
    pub status: PaymentStatus,
    pub note: Option<String>,
    #[serde(flatten)]
    pub kind: InvoiceKind,
}

impl Invoice {
    #[inline]
    pub fn is_repair(&self) -> bool {
        matches!(self.kind, InvoiceKind::Repair(_))
    }

    pub fn repair(&self) -> Option<&RepairDetails> {
        match &self.kind {
            InvoiceKind::Repair(details) => Some(details),
            InvoiceKind::Sale => None,
        }
    }

    /// Repair payload or `NotARepairTicket`.
    pub fn repair_details(&self) -> CoreResult<&RepairDetails> {
        self.repair()
            .ok_or_else(|| CoreError::NotARepairTicket(self.id.clone()))
    }

    pub fn repair_details_mut(&mut self) -> CoreResult<&mut RepairDetails> {
        match &mut self.kind {
            InvoiceKind::Repair(details) => Ok(details),
            InvoiceKind::Sale => Err(CoreError::NotARepairTicket(self.id.clone())),
        }
    }

    pub fn repair_status(&self) -> Option<RepairStatus> {
        self.repair().map(|r| r.repair_status)
    }

    /// Cancelled either as a payment record or as a repair job.
    pub fn is_cancelled(&self) -> bool {
        self.status == PaymentStatus::Cancelled
            || self.repair_status() == Some(RepairStatus::Cancelled)
    }
}

// =============================================================================
// Partial Update
// =============================================================================

/// Field-by-field partial update of an invoice.
///
/// `None` leaves a field untouched. Repair-only fields on a sale invoice are
/// rejected rather than silently dropped.
///
/// The total and the payment status are not free fields: the total follows
/// the lines, and the status follows `(total, paid)`. `status` only carries
/// a cancellation, or lifts one; any other value is re-derived.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct InvoicePatch {
    pub items: Option<Vec<InvoiceItem>>,
    pub paid_amount: Option<Money>,
    pub status: Option<PaymentStatus>,
    pub note: Option<String>,
    pub repair_status: Option<RepairStatus>,
    pub device_info: Option<DeviceInfo>,
    pub technician_id: Option<String>,
    pub sales_id: Option<String>,
}

impl InvoicePatch {
    fn touches_repair(&self) -> bool {
        self.repair_status.is_some()
            || self.device_info.is_some()
            || self.technician_id.is_some()
            || self.sales_id.is_some()
    }

    /// Returns the invoice with the patch applied.
    pub fn apply(&self, invoice: &Invoice) -> CoreResult<Invoice> {
        let mut next = invoice.clone();

        if let Some(items) = &self.items {
            next.items = items.clone();
            next.total_amount = items_total(&next.items);
        }
        if let Some(paid) = self.paid_amount {
            next.paid_amount = paid;
        }
        if let Some(note) = &self.note {
            next.note = Some(note.clone());
        }

        if self.touches_repair() {
            let details = next.repair_details_mut()?;
            if let Some(status) = self.repair_status {
                details.repair_status = status;
            }
            if let Some(device) = &self.device_info {
                details.device_info = device.clone();
            }
            if let Some(tech) = &self.technician_id {
                details.technician_id = Some(tech.clone());
            }
            if let Some(sales) = &self.sales_id {
                details.sales_id = Some(sales.clone());
            }
        }

        let cancelled = match self.status {
            Some(status) => status == PaymentStatus::Cancelled,
            None => invoice.is_cancelled(),
        } || next.repair_status() == Some(RepairStatus::Cancelled);

        next.status = if cancelled {
            PaymentStatus::Cancelled
        } else {
            PaymentStatus::from_amounts(next.total_amount, next.paid_amount)
        };

        Ok(next)
    }
}

// =============================================================================
// Checkout (POS sale)
// =============================================================================

/// A cart handed over from the POS screen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutRequest {
    pub customer_id: String,
    pub warehouse: Warehouse,
    pub items: Vec<InvoiceItem>,
    /// Amount tendered now. Anything above the total is not kept as credit.
    pub paid: Money,
    pub note: Option<String>,
}

/// Builds a `SALE` invoice from a cart.
///
/// ## Rules
/// - Customer must exist (the debt has to land somewhere)
/// - At least one line, positive quantities, non-negative prices
/// - `paid_amount` is clamped to `[0, total]`
pub fn checkout(
    request: CheckoutRequest,
    customer: Option<&Customer>,
    id: String,
    now: DateTime<Utc>,
) -> CoreResult<Invoice> {
    let customer = customer.ok_or_else(|| ValidationError::Required {
        field: "customer".to_string(),
    })?;
    validation::validate_line_items(&request.items)?;
    validation::validate_payment_amount(request.paid)?;

    let total = items_total(&request.items);
    let paid = if request.paid > total { total } else { request.paid };

    Ok(Invoice {
        id,
        customer_id: customer.id.clone(),
        customer_name: customer.name.clone(),
        date: now,
        items: request.items,
        total_amount: total,
        paid_amount: paid,
        warehouse: request.warehouse,
        status: PaymentStatus::from_amounts(total, paid),
        note: request.note,
        kind: InvoiceKind::Sale,
    })
}

// =============================================================================
// Unit Tests
// =============================================================================
