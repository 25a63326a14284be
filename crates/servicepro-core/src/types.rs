//! # Domain Types
//!
//! Shared domain types: warehouses, products, people, parties.
//!
//! ## Type Map
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │    Customer     │   │    Supplier     │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id, sku        │   │  id, phone      │   │  id, phone      │       │
//! │  │  kind           │   │  balance ◄──────┼───┼── Party trait   │       │
//! │  │  stock per      │   │  (owed to us)   │   │  balance        │       │
//! │  │  Warehouse      │   └─────────────────┘   │  (owed by us)   │       │
//! │  └─────────────────┘                         └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Employee     │   │      Role       │   │  PaymentStatus  │       │
//! │  │  id, username   │   │  ADMIN          │   │  PAID / PARTIAL │       │
//! │  │  role ──────────┼──►│  TECHNICIAN     │   │  UNPAID         │       │
//! │  └─────────────────┘   │  SALES          │   │  CANCELLED      │       │
//! │                        └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Cross-entity links are ids only. An invoice never embeds its customer, so
//! updating one record can never silently rewrite another.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;

// =============================================================================
// Tax Rate
// =============================================================================

/// Tax rate represented in basis points (bps).
///
/// VAT invoices in this shop are issued at 8 % or 10 %.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TaxRate(u32);

impl TaxRate {
    /// Creates a tax rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        TaxRate(bps)
    }

    /// Creates a tax rate from a whole percentage (`10` = 10 %).
    #[inline]
    pub const fn from_percent(pct: u32) -> Self {
        TaxRate(pct * 100)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a percentage (for display only).
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }
}

impl Default for TaxRate {
    fn default() -> Self {
        TaxRate::from_percent(crate::DEFAULT_VAT_PERCENT)
    }
}

// =============================================================================
// Warehouse
// =============================================================================

/// The two trading companies whose stock is kept apart.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
)]
#[ts(export)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Warehouse {
    TayPhat,
    Tnc,
}

impl Warehouse {
    /// All warehouses, in display order.
    pub const ALL: [Warehouse; 2] = [Warehouse::TayPhat, Warehouse::Tnc];

    /// Company name printed on documents.
    pub fn display_name(&self) -> &'static str {
        match self {
            Warehouse::TayPhat => "Giải pháp Tây Phát",
            Warehouse::Tnc => "TNC",
        }
    }

    /// Parses the internal company code used by config and parsed documents.
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_ascii_uppercase().as_str() {
            "TAY_PHAT" => Some(Warehouse::TayPhat),
            "TNC" => Some(Warehouse::Tnc),
            _ => None,
        }
    }
}

impl Default for Warehouse {
    fn default() -> Self {
        Warehouse::TayPhat
    }
}

// =============================================================================
// Product
// =============================================================================

/// Physical good vs. repair service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProductKind {
    Goods,
    Service,
}

/// A product or service on the price list.
///
/// ## Stock
/// Goods carry a real, non-negative quantity per warehouse. Services carry
/// [`SERVICE_STOCK_SENTINEL`](crate::SERVICE_STOCK_SENTINEL) so list views can
/// show "in stock" without it constraining anything.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub name: String,
    pub sku: String,
    pub kind: ProductKind,
    /// Selling price.
    pub price: Money,
    /// Last import cost. Not re-averaged on receipt.
    pub cost_price: Money,
    /// On-hand quantity per warehouse. A missing key means zero.
    pub stock: BTreeMap<Warehouse, i64>,
    pub unit: String,
}

impl Product {
    /// On-hand quantity in one warehouse.
    pub fn stock_in(&self, warehouse: Warehouse) -> i64 {
        self.stock.get(&warehouse).copied().unwrap_or(0)
    }

    /// On-hand quantity summed over every warehouse.
    pub fn total_stock(&self) -> i64 {
        self.stock.values().sum()
    }

    #[inline]
    pub fn is_service(&self) -> bool {
        self.kind == ProductKind::Service
    }
}

// =============================================================================
// Employees & Roles
// =============================================================================

/// Staff role. `Admin` is permitted everything.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Admin,
    Technician,
    Sales,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    pub id: String,
    pub name: String,
    pub role: Role,
    /// Login handle.
    pub username: String,
}

// =============================================================================
// Parties
// =============================================================================

/// Anything that carries a running debt balance.
///
/// For customers the balance is what they owe the shop; for suppliers it is
/// what the shop owes them. Either way it is kept equal to the sum of the
/// outstanding amounts of the records that reference the party.
pub trait Party: Clone {
    const ENTITY: &'static str;

    fn id(&self) -> &str;

    fn balance(&self) -> Money;

    /// Returns a copy with the balance replaced.
    fn with_balance(&self, balance: Money) -> Self;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: String,
    pub name: String,
    pub phone: String,
    pub address: String,
    /// Owed to the shop.
    pub balance: Money,
}

impl Party for Customer {
    const ENTITY: &'static str = "Customer";

    fn id(&self) -> &str {
        &self.id
    }

    fn balance(&self) -> Money {
        self.balance
    }

    fn with_balance(&self, balance: Money) -> Self {
        Customer {
            balance,
            ..self.clone()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Supplier {
    pub id: String,
    pub name: String,
    pub phone: String,
    pub address: Option<String>,
    pub contact_person: Option<String>,
    /// Owed by the shop.
    pub balance: Money,
}

impl Party for Supplier {
    const ENTITY: &'static str = "Supplier";

    fn id(&self) -> &str {
        &self.id
    }

    fn balance(&self) -> Money {
        self.balance
    }

    fn with_balance(&self, balance: Money) -> Self {
        Supplier {
            balance,
            ..self.clone()
        }
    }
}

// =============================================================================
// Payment Status
// =============================================================================

/// Payment state of an invoice or repair ticket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    Paid,
    Partial,
    Unpaid,
    Cancelled,
}

impl PaymentStatus {
    /// Derives the status from the amounts.
    ///
    /// `Cancelled` is never derived; it is set explicitly and overrides.
    ///
    /// ```rust
    /// use servicepro_core::money::Money;
    /// use servicepro_core::types::PaymentStatus;
    ///
    /// let total = Money::from_dong(300_000);
    /// assert_eq!(PaymentStatus::from_amounts(total, total), PaymentStatus::Paid);
    /// assert_eq!(
    ///     PaymentStatus::from_amounts(total, Money::from_dong(100_000)),
    ///     PaymentStatus::Partial
    /// );
    /// assert_eq!(PaymentStatus::from_amounts(total, Money::zero()), PaymentStatus::Unpaid);
    /// ```
    pub fn from_amounts(total: Money, paid: Money) -> Self {
        if paid >= total {
            PaymentStatus::Paid
        } else if paid.is_positive() {
            PaymentStatus::Partial
        } else {
            PaymentStatus::Unpaid
        }
    }
}

impl Default for PaymentStatus {
    fn default() -> Self {
        PaymentStatus::Unpaid
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
