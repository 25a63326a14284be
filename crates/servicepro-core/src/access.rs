//! # Access Policy
//!
//! One static table from role to permitted views and actions. Every entry
//! point that exposes or performs something asks here; nothing re-derives
//! role rules locally.
//!
//! ## Views
//! ```text
//! ┌────────────────┬───────┬────────────┬───────┐
//! │ View           │ ADMIN │ TECHNICIAN │ SALES │
//! ├────────────────┼───────┼────────────┼───────┤
//! │ DASHBOARD      │   ✓   │            │   ✓   │
//! │ POS            │   ✓   │            │   ✓   │
//! │ REPAIR_TICKETS │   ✓   │     ✓      │   ✓   │
//! │ INVENTORY      │   ✓   │     ✓      │   ✓   │
//! │ IMPORT_GOODS   │   ✓   │            │   ✓   │
//! │ STOCK_REPORT   │   ✓   │            │   ✓   │
//! │ DEBT           │   ✓   │            │   ✓   │
//! │ VAT_INVOICES   │   ✓   │            │       │
//! │ CUSTOMERS      │   ✓   │            │   ✓   │
//! │ SUPPLIERS      │   ✓   │            │   ✓   │
//! │ EMPLOYEES      │   ✓   │            │       │
//! └────────────────┴───────┴────────────┴───────┘
//! ```
//!
//! `ADMIN` is permitted every view and every action.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::invoice::RepairStatus;
use crate::types::Role;

/// A screen of the back office.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum View {
    Dashboard,
    Pos,
    RepairTickets,
    Inventory,
    ImportGoods,
    StockReport,
    Debt,
    VatInvoices,
    Customers,
    Suppliers,
    Employees,
}

impl View {
    /// Menu order.
    pub const ALL: [View; 11] = [
        View::Dashboard,
        View::Pos,
        View::RepairTickets,
        View::Inventory,
        View::ImportGoods,
        View::StockReport,
        View::Debt,
        View::VatInvoices,
        View::Customers,
        View::Suppliers,
        View::Employees,
    ];
}

/// Something an actor can do that changes state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Action {
    CreateTicket,
    /// Save diagnosis, notes and quote lines without escalating.
    SaveTicket,
    /// RECEIVED → CHECKING on a save with a diagnosis.
    Diagnose,
    /// CHECKING → QUOTING.
    SendQuote,
    /// QUOTING → IN_PROGRESS once the customer agrees.
    ApproveQuote,
    /// IN_PROGRESS → COMPLETED.
    MarkFinished,
    /// COMPLETED → DELIVERED with payment.
    ConfirmDelivery,
    CancelTicket,
    Checkout,
    ImportGoods,
    ManageProducts,
    ManageCustomers,
    ManageSuppliers,
    ManageEmployees,
    ManageVat,
}

// =============================================================================
// Predicates
// =============================================================================

/// Whether the role may open the view.
pub fn can_view(role: Role, view: View) -> bool {
    use View::*;

    match role {
        Role::Admin => true,
        Role::Technician => matches!(view, RepairTickets | Inventory),
        Role::Sales => !matches!(view, VatInvoices | Employees),
    }
}

/// Whether the role may perform the action.
pub fn can_act(role: Role, action: Action) -> bool {
    use Action::*;

    match role {
        Role::Admin => true,
        Role::Technician => matches!(
            action,
            CreateTicket | SaveTicket | Diagnose | SendQuote | ApproveQuote | MarkFinished
        ),
        Role::Sales => matches!(
            action,
            CreateTicket
                | SaveTicket
                | SendQuote
                | ApproveQuote
                | ConfirmDelivery
                | CancelTicket
                | Checkout
                | ImportGoods
                | ManageProducts
                | ManageCustomers
                | ManageSuppliers
        ),
    }
}

/// Views in menu order that the role may open.
pub fn visible_views(role: Role) -> Vec<View> {
    View::ALL.into_iter().filter(|v| can_view(role, *v)).collect()
}

/// Where an actor lands after logging in.
pub fn landing_view(role: Role) -> View {
    match role {
        Role::Technician => View::RepairTickets,
        Role::Admin | Role::Sales => View::Dashboard,
    }
}

/// Transition controls to show for a ticket in `status`.
///
/// Terminal tickets show nothing. A generic save is offered on every open
/// ticket; whether that save may escalate is decided when it happens.
pub fn available_ticket_actions(role: Role, status: RepairStatus) -> Vec<Action> {
    if status.is_terminal() {
        return Vec::new();
    }

    let step = match status {
        RepairStatus::Checking => Some(Action::SendQuote),
        RepairStatus::Quoting => Some(Action::ApproveQuote),
        RepairStatus::InProgress => Some(Action::MarkFinished),
        RepairStatus::Completed => Some(Action::ConfirmDelivery),
        _ => None,
    };

    [Some(Action::SaveTicket), step, Some(Action::CancelTicket)]
        .into_iter()
        .flatten()
        .filter(|a| can_act(role, *a))
        .collect()
}
