//! # Ledger Arithmetic
//!
//! Keeps each party's running balance equal to the sum of what its records
//! still owe.
//!
//! ## Debt Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   old record ──► outstanding(old) ──┐                                   │
//! │                                     ├──► delta = new − old              │
//! │   new record ──► outstanding(new) ──┘          │                        │
//! │                                                ▼                        │
//! │                             apply_debt_delta(party, delta)              │
//! │                                                │                        │
//! │                                                ▼                        │
//! │                          balance' = max(0, balance + delta)             │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## The One Hook
//! Every mutation that touches a record's total, paid amount or cancellation
//! goes through [`record_debt_change`] exactly once. Skipping it leaves the
//! balance stale; calling it twice counts the debt twice. [`reconcile`] is the
//! from-scratch sum the incremental balance can be checked against.

use crate::invoice::Invoice;
use crate::money::Money;
use crate::purchase::PurchaseOrder;
use crate::types::Party;

// =============================================================================
// Outstanding Amount
// =============================================================================

/// What a record still owes: zero when cancelled, else `max(0, total − paid)`.
///
/// ```rust
/// use servicepro_core::ledger::outstanding;
/// use servicepro_core::money::Money;
///
/// let total = Money::from_dong(300_000);
/// assert_eq!(outstanding(total, Money::from_dong(100_000), false).dong(), 200_000);
/// assert_eq!(outstanding(total, Money::from_dong(400_000), false), Money::zero());
/// assert_eq!(outstanding(total, Money::zero(), true), Money::zero());
/// ```
pub fn outstanding(total: Money, paid: Money, cancelled: bool) -> Money {
    if cancelled {
        return Money::zero();
    }
    (total - paid).clamp_non_negative()
}

/// A record that creates debt against a party.
///
/// Invoices create debt a customer owes the shop; purchase orders create
/// debt the shop owes a supplier.
pub trait Receivable {
    fn party_id(&self) -> &str;

    fn total(&self) -> Money;

    fn paid(&self) -> Money;

    fn is_cancelled(&self) -> bool;

    fn outstanding(&self) -> Money {
        outstanding(self.total(), self.paid(), self.is_cancelled())
    }
}

impl Receivable for Invoice {
    fn party_id(&self) -> &str {
        &self.customer_id
    }

    fn total(&self) -> Money {
        self.total_amount
    }

    fn paid(&self) -> Money {
        self.paid_amount
    }

    fn is_cancelled(&self) -> bool {
        Invoice::is_cancelled(self)
    }
}

impl Receivable for PurchaseOrder {
    fn party_id(&self) -> &str {
        &self.supplier_id
    }

    fn total(&self) -> Money {
        self.total_amount
    }

    fn paid(&self) -> Money {
        self.paid_amount
    }

    // Purchase orders have no cancel flow.
    fn is_cancelled(&self) -> bool {
        false
    }
}

// =============================================================================
// Balance Updates
// =============================================================================

/// Returns the party with `balance = max(0, balance + delta)`.
///
/// Prepayment and store credit are not modelled, so a balance never goes
/// below zero.
pub fn apply_debt_delta<P: Party>(party: &P, delta: Money) -> P {
    party.with_balance((party.balance() + delta).clamp_non_negative())
}

/// Change in outstanding debt between two versions of a record.
///
/// `old` is `None` when the record is being created.
pub fn debt_delta<R: Receivable>(old: Option<&R>, new: &R) -> Money {
    let before = old.map(Receivable::outstanding).unwrap_or_default();
    new.outstanding() - before
}

/// Applies the debt change of one record mutation to its party.
pub fn record_debt_change<R: Receivable, P: Party>(old: Option<&R>, new: &R, party: &P) -> P {
    apply_debt_delta(party, debt_delta(old, new))
}

/// Sums the outstanding amount of every record that references the party.
pub fn reconcile<'a, R, I>(party_id: &str, records: I) -> Money
where
    R: Receivable + 'a,
    I: IntoIterator<Item = &'a R>,
{
    records
        .into_iter()
        .filter(|r| r.party_id() == party_id)
        .map(Receivable::outstanding)
        .sum()
}

// =============================================================================
// Unit Tests
// =============================================================================
