//! # Record Collections
//!
//! Immutable, `Arc`-shared lists of records keyed by id.
//!
//! ## Copy-on-Write
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  let before = store.invoices().clone();     // Arc clone, no copy      │
//! │                                                                         │
//! │  store.add_invoice(inv)?;                                               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Collection::insert ──► new Vec ──► new Arc ──► store swaps handle      │
//! │                                                                         │
//! │  before.len()   // unchanged                                            │
//! │  !before.ptr_eq(store.invoices())                                       │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Ids are generated by callers. `insert` does not check for duplicates;
//! a duplicate id is a caller bug and lookups return the newest record.

use std::sync::Arc;

use servicepro_core::purchase::PurchaseOrder;
use servicepro_core::vat::VatInvoice;
use servicepro_core::{Customer, Employee, Invoice, Product, Supplier};

use crate::error::{StoreError, StoreResult};

/// Anything kept in a [`Collection`].
pub trait Record: Clone {
    /// Entity name used in NotFound errors and logs.
    const ENTITY: &'static str;

    fn record_id(&self) -> &str;
}

macro_rules! impl_record {
    ($($ty:ty => $entity:literal),* $(,)?) => {
        $(
            impl Record for $ty {
                const ENTITY: &'static str = $entity;

                fn record_id(&self) -> &str {
                    &self.id
                }
            }
        )*
    };
}

impl_record! {
    Customer => "Customer",
    Supplier => "Supplier",
    Product => "Product",
    Employee => "Employee",
    Invoice => "Invoice",
    PurchaseOrder => "PurchaseOrder",
    VatInvoice => "VatInvoice",
}

/// An immutable list of records, newest first.
#[derive(Debug, Clone)]
pub struct Collection<T> {
    items: Arc<Vec<T>>,
}

impl<T> Default for Collection<T> {
    fn default() -> Self {
        Collection {
            items: Arc::new(Vec::new()),
        }
    }
}

impl<T: Record> Collection<T> {
    pub fn new(items: Vec<T>) -> Self {
        Collection {
            items: Arc::new(items),
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    pub fn get(&self, id: &str) -> Option<&T> {
        self.items.iter().find(|r| r.record_id() == id)
    }

    /// Like [`get`](Self::get), but a missing id is `NotFound`.
    pub fn require(&self, id: &str) -> StoreResult<&T> {
        self.get(id).ok_or_else(|| StoreError::not_found(T::ENTITY, id))
    }

    /// True when both handles share the same underlying list.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.items, &other.items)
    }

    /// New collection with `record` at the front.
    pub fn insert(&self, record: T) -> Self {
        let mut items = Vec::with_capacity(self.items.len() + 1);
        items.push(record);
        items.extend(self.items.iter().cloned());
        Self::new(items)
    }

    /// New collection with the record under `id` replaced by `f(old)`.
    ///
    /// Returns the collection and the updated record.
    pub fn patch_by_id<F>(&self, id: &str, f: F) -> StoreResult<(Self, T)>
    where
        F: FnOnce(&T) -> StoreResult<T>,
    {
        let index = self.index_of(id)?;
        let updated = f(&self.items[index])?;
        let mut items = self.items.as_ref().clone();
        items[index] = updated.clone();
        Ok((Self::new(items), updated))
    }

    /// New collection with the record under `id` replaced wholesale.
    pub fn replace_by_id(&self, id: &str, record: T) -> StoreResult<Self> {
        self.patch_by_id(id, |_| Ok(record)).map(|(next, _)| next)
    }

    /// Replaces the record with the same id, or inserts it at the front.
    pub fn upsert(&self, record: T) -> Self {
        match self.index_of(record.record_id()) {
            Ok(index) => {
                let mut items = self.items.as_ref().clone();
                items[index] = record;
                Self::new(items)
            }
            Err(_) => self.insert(record),
        }
    }

    /// New collection without the record under `id`.
    pub fn remove_by_id(&self, id: &str) -> StoreResult<Self> {
        self.index_of(id)?;
        Ok(Self::new(
            self.items
                .iter()
                .filter(|r| r.record_id() != id)
                .cloned()
                .collect(),
        ))
    }

    fn index_of(&self, id: &str) -> StoreResult<usize> {
        self.items
            .iter()
            .position(|r| r.record_id() == id)
            .ok_or_else(|| StoreError::not_found(T::ENTITY, id))
    }
}

impl<'a, T> IntoIterator for &'a Collection<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use servicepro_core::{Money, Role};

    fn employee(id: &str) -> Employee {
        Employee {
            id: id.to_string(),
            name: format!("Nhân viên {}", id),
            role: Role::Sales,
            username: id.to_string(),
        }
    }

    fn customer(id: &str, balance: i64) -> Customer {
        Customer {
            id: id.to_string(),
            name: id.to_string(),
            phone: String::new(),
            address: String::new(),
            balance: Money::from_dong(balance),
        }
    }

    #[test]
    fn test_insert_prepends_and_leaves_old_handle() {
        let before = Collection::new(vec![employee("emp1")]);
        let after = before.insert(employee("emp2"));

        assert_eq!(before.len(), 1);
        assert_eq!(after.len(), 2);
        assert_eq!(after.as_slice()[0].id, "emp2");
        assert!(!before.ptr_eq(&after));
    }

    #[test]
    fn test_patch_by_id() {
        let customers = Collection::new(vec![customer("c1", 0), customer("c2", 0)]);
        let (next, updated) = customers
            .patch_by_id("c2", |c| Ok(Customer { balance: Money::from_dong(10), ..c.clone() }))
            .unwrap();

        assert_eq!(updated.balance.dong(), 10);
        assert_eq!(next.get("c2").unwrap().balance.dong(), 10);
        assert_eq!(customers.get("c2").unwrap().balance, Money::zero());
    }

    #[test]
    fn test_missing_id_is_not_found() {
        let customers = Collection::new(vec![customer("c1", 0)]);
        assert!(matches!(
            customers.replace_by_id("c9", customer("c9", 0)),
            Err(StoreError::NotFound { entity, id }) if entity == "Customer" && id == "c9"
        ));
        assert!(customers.remove_by_id("c9").is_err());
        assert!(customers.patch_by_id("c9", |c| Ok(c.clone())).is_err());
        assert!(customers.require("c9").is_err());
    }

    #[test]
    fn test_failed_patch_changes_nothing() {
        let customers = Collection::new(vec![customer("c1", 5)]);
        let result = customers.patch_by_id("c1", |_| Err(StoreError::InvalidCredentials));
        assert!(result.is_err());
        assert_eq!(customers.get("c1").unwrap().balance.dong(), 5);
    }

    #[test]
    fn test_upsert_replaces_in_place_or_prepends() {
        let customers = Collection::new(vec![customer("c1", 0), customer("c2", 0)]);
        let replaced = customers.upsert(customer("c2", 99));
        assert_eq!(replaced.as_slice()[1].balance.dong(), 99);
        assert_eq!(replaced.len(), 2);

        let added = replaced.upsert(customer("c3", 0));
        assert_eq!(added.as_slice()[0].id, "c3");
    }

    #[test]
    fn test_remove_by_id() {
        let employees = Collection::new(vec![employee("emp1"), employee("emp2")]);
        let next = employees.remove_by_id("emp1").unwrap();
        assert_eq!(next.len(), 1);
        assert!(next.get("emp1").is_none());
        assert_eq!(employees.len(), 2);
    }
}
