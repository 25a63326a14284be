//! # Purchase Orders
//!
//! Goods bought from a supplier into one warehouse. A purchase order is
//! created when the import is confirmed and never edited afterwards.
//!
//! ```text
//! ImportRequest ──► PurchaseOrder::build ──► store.import_goods
//!                                               ├── purchase_orders.insert
//!                                               ├── supplier.balance += outstanding
//!                                               └── stock::receive_purchase_order
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreResult, ValidationError};
use crate::money::Money;
use crate::types::{Supplier, Warehouse};
use crate::validation;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PurchaseOrderStatus {
    /// Goods received into the warehouse.
    Completed,
    Pending,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseOrderItem {
    pub product_id: String,
    pub product_name: String,
    pub quantity: i64,
    pub import_price: Money,
}

impl PurchaseOrderItem {
    #[inline]
    pub fn line_total(&self) -> Money {
        self.import_price.multiply_quantity(self.quantity)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseOrder {
    pub id: String,
    pub supplier_id: String,
    pub supplier_name: String,
    #[ts(as = "String")]
    pub date: DateTime<Utc>,
    pub warehouse: Warehouse,
    pub items: Vec<PurchaseOrderItem>,
    pub total_amount: Money,
    /// Paid to the supplier at import time.
    pub paid_amount: Money,
    pub status: PurchaseOrderStatus,
}

/// The "import goods" form as submitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ImportRequest {
    pub supplier_id: String,
    pub warehouse: Warehouse,
    pub items: Vec<PurchaseOrderItem>,
    pub paid: Money,
}

impl PurchaseOrder {
    /// Builds a received purchase order from the import form.
    ///
    /// ## Rules
    /// - Supplier must exist
    /// - At least one line, positive quantities, non-negative import prices
    /// - Paid amount must not be negative
    pub fn build(
        request: ImportRequest,
        supplier: Option<&Supplier>,
        id: String,
        now: DateTime<Utc>,
    ) -> CoreResult<Self> {
        let supplier = supplier.ok_or_else(|| ValidationError::Required {
            field: "supplier".to_string(),
        })?;
        if request.items.is_empty() {
            return Err(ValidationError::Empty {
                field: "items".to_string(),
            }
            .into());
        }
        for item in &request.items {
            validation::validate_quantity(item.quantity)?;
            validation::validate_price(item.import_price)?;
        }
        validation::validate_payment_amount(request.paid)?;

        let total = request.items.iter().map(PurchaseOrderItem::line_total).sum();

        Ok(PurchaseOrder {
            id,
            supplier_id: supplier.id.clone(),
            supplier_name: supplier.name.clone(),
            date: now,
            warehouse: request.warehouse,
            items: request.items,
            total_amount: total,
            paid_amount: request.paid,
            status: PurchaseOrderStatus::Completed,
        })
    }

    /// Quantity of one product received on this order, over all its lines.
    pub fn quantity_of(&self, product_id: &str) -> i64 {
        self.items
            .iter()
            .filter(|i| i.product_id == product_id)
            .map(|i| i.quantity)
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn supplier() -> Supplier {
        Supplier {
            id: "sup1".to_string(),
            name: "Linh Kiện Lê Nam".to_string(),
            phone: "0901234567".to_string(),
            address: None,
            contact_person: Some("A. Nam".to_string()),
            balance: Money::zero(),
        }
    }

    fn item(product_id: &str, quantity: i64, price: i64) -> PurchaseOrderItem {
        PurchaseOrderItem {
            product_id: product_id.to_string(),
            product_name: product_id.to_uppercase(),
            quantity,
            import_price: Money::from_dong(price),
        }
    }

    #[test]
    fn test_build_totals_lines() {
        let request = ImportRequest {
            supplier_id: "sup1".to_string(),
            warehouse: Warehouse::Tnc,
            items: vec![item("s3", 10, 20_000), item("p9", 2, 450_000)],
            paid: Money::from_dong(500_000),
        };
        let po = PurchaseOrder::build(request, Some(&supplier()), "PO-1".into(), Utc::now()).unwrap();

        assert_eq!(po.total_amount.dong(), 1_100_000);
        assert_eq!(po.supplier_name, "Linh Kiện Lê Nam");
        assert_eq!(po.status, PurchaseOrderStatus::Completed);
    }

    #[test]
    fn test_build_rejects_missing_supplier_and_bad_lines() {
        let request = ImportRequest {
            supplier_id: "sup1".to_string(),
            warehouse: Warehouse::Tnc,
            items: vec![item("s3", 0, 20_000)],
            paid: Money::zero(),
        };
        assert!(PurchaseOrder::build(request.clone(), None, "PO".into(), Utc::now()).is_err());
        assert!(PurchaseOrder::build(request, Some(&supplier()), "PO".into(), Utc::now()).is_err());
    }

    #[test]
    fn test_quantity_of_sums_duplicate_lines() {
        let request = ImportRequest {
            supplier_id: "sup1".to_string(),
            warehouse: Warehouse::TayPhat,
            items: vec![item("s3", 4, 20_000), item("s3", 6, 20_000)],
            paid: Money::zero(),
        };
        let po = PurchaseOrder::build(request, Some(&supplier()), "PO-2".into(), Utc::now()).unwrap();
        assert_eq!(po.quantity_of("s3"), 10);
        assert_eq!(po.quantity_of("s1"), 0);
    }
}
