//! # servicepro-core: Pure Business Logic for ServicePro
//!
//! Ledger arithmetic, stock adjustment, the repair-ticket workflow and the
//! access policy of a two-company repair shop, as pure functions with zero
//! I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        ServicePro Architecture                          │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Desk (servicepro-desk)                       │   │
//! │  │    commands, config, document parsing, receipt printing         │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    servicepro-store                             │   │
//! │  │    ShopStore, Session, RepairDesk, MockBackend                  │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │             ★ servicepro-core (THIS CRATE) ★                    │   │
//! │  │                                                                 │   │
//! │  │   ┌──────────┐  ┌──────────┐  ┌──────────┐  ┌──────────┐       │   │
//! │  │   │  ledger  │  │  stock   │  │  repair  │  │  access  │       │   │
//! │  │   │  debt Δ  │  │  receipt │  │  status  │  │  role →  │       │   │
//! │  │   │  floor 0 │  │  of POs  │  │  machine │  │  action  │       │   │
//! │  │   └──────────┘  └──────────┘  └──────────┘  └──────────┘       │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO STORAGE • NO NETWORK • PURE FUNCTIONS             │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`money`] - Whole-đồng `Money` with integer tax rounding
//! - [`types`] - Warehouses, products, employees, customers, suppliers
//! - [`invoice`] - Sales invoices and repair tickets (tagged by kind)
//! - [`purchase`] - Supplier purchase orders
//! - [`ledger`] - Outstanding debt and party balance updates
//! - [`stock`] - Receiving purchase orders into warehouse stock
//! - [`repair`] - Repair ticket lifecycle
//! - [`access`] - Role → view / action policy
//! - [`vat`] - VAT invoice totals, drafts and filters
//! - [`report`] - Import / export / on-hand report
//! - [`receipt`] - Printable projection of a committed invoice
//! - [`validation`] - Form validation
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use servicepro_core::ledger::{outstanding, record_debt_change};
//! use servicepro_core::money::Money;
//!
//! // 300.000 ₫ repair, 100.000 ₫ paid at the counter
//! let owed = outstanding(Money::from_dong(300_000), Money::from_dong(100_000), false);
//! assert_eq!(owed.dong(), 200_000);
//! assert_eq!(owed.to_string(), "200.000 ₫");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod access;
pub mod error;
pub mod invoice;
pub mod ledger;
pub mod money;
pub mod purchase;
pub mod receipt;
pub mod repair;
pub mod report;
pub mod stock;
pub mod types;
pub mod validation;
pub mod vat;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use access::{Action, View};
pub use error::{CoreError, CoreResult, ValidationError};
pub use invoice::{Invoice, InvoiceItem, InvoiceKind, InvoicePatch, RepairStatus};
pub use money::Money;
pub use purchase::PurchaseOrder;
pub use repair::{TicketEvent, TicketForm};
pub use types::*;
pub use vat::VatInvoice;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// VAT rate used when a document names none, in percent.
pub const DEFAULT_VAT_PERCENT: u32 = 10;

/// Nominal stock carried by services in every warehouse.
///
/// Display only; a service line never checks or consumes it.
pub const SERVICE_STOCK_SENTINEL: i64 = 9999;

/// Maximum quantity on a single line.
///
/// Catches typing 1000 instead of 10.
pub const MAX_ITEM_QUANTITY: i64 = 999;

/// Maximum unit price on a single line, in đồng (10 tỷ).
///
/// With [`MAX_ITEM_QUANTITY`] this keeps line and invoice totals well inside `i64`.
pub const MAX_ITEM_PRICE: i64 = 10_000_000_000;
