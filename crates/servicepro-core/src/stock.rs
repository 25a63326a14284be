//! # Stock Adjustment
//!
//! Applies received purchase orders to per-warehouse stock.
//!
//! ```text
//! PurchaseOrder { warehouse: TNC, items: [s3 × 4, s3 × 6, p9 × 2] }
//!                     │
//!                     ▼
//!   s3.stock[TNC] += 10      p9.stock[TNC] += 2      others unchanged
//! ```
//!
//! Receiving is not idempotent: the same order received twice adds its
//! quantities twice. The store receives each order exactly once, when it
//! is saved. Cost price is left as it was.

use crate::error::{CoreError, CoreResult};
use crate::purchase::PurchaseOrder;
use crate::types::Product;

/// Returns the catalog with the order's quantities added to
/// `stock[po.warehouse]`.
///
/// Every line must reference a product in the catalog. A missing product
/// fails the whole receipt with `NotFound` and nothing is changed.
pub fn receive_purchase_order(products: &[Product], po: &PurchaseOrder) -> CoreResult<Vec<Product>> {
    if let Some(missing) = po
        .items
        .iter()
        .find(|item| !products.iter().any(|p| p.id == item.product_id))
    {
        return Err(CoreError::not_found("Product", missing.product_id.clone()));
    }

    Ok(products
        .iter()
        .map(|product| {
            let received = po.quantity_of(&product.id);
            if received == 0 {
                return product.clone();
            }
            let mut next = product.clone();
            *next.stock.entry(po.warehouse).or_insert(0) += received;
            next
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Money;
    use crate::purchase::{PurchaseOrderItem, PurchaseOrderStatus};
    use crate::types::{ProductKind, Warehouse};
    use chrono::Utc;
    use std::collections::BTreeMap;

    fn catalog() -> Vec<Product> {
        vec![
            Product {
                id: "s3".to_string(),
                name: "Thay Keo tản nhiệt MX4".to_string(),
                sku: "SV-THERMAL".to_string(),
                kind: ProductKind::Goods,
                price: Money::from_dong(50_000),
                cost_price: Money::from_dong(20_000),
                stock: BTreeMap::from([(Warehouse::TayPhat, 50), (Warehouse::Tnc, 50)]),
                unit: "Lần".to_string(),
            },
            Product {
                id: "p9".to_string(),
                name: "SSD 256GB".to_string(),
                sku: "SSD-256".to_string(),
                kind: ProductKind::Goods,
                price: Money::from_dong(650_000),
                cost_price: Money::from_dong(450_000),
                stock: BTreeMap::new(),
                unit: "Cái".to_string(),
            },
        ]
    }

    fn order(items: &[(&str, i64)]) -> PurchaseOrder {
        PurchaseOrder {
            id: "PO-1".to_string(),
            supplier_id: "sup1".to_string(),
            supplier_name: "Linh Kiện Lê Nam".to_string(),
            date: Utc::now(),
            warehouse: Warehouse::Tnc,
            items: items
                .iter()
                .map(|(id, qty)| PurchaseOrderItem {
                    product_id: id.to_string(),
                    product_name: id.to_string(),
                    quantity: *qty,
                    import_price: Money::from_dong(10_000),
                })
                .collect(),
            total_amount: Money::zero(),
            paid_amount: Money::zero(),
            status: PurchaseOrderStatus::Completed,
        }
    }

    #[test]
    fn test_receive_increments_target_warehouse_only() {
        let products = catalog();
        let received = receive_purchase_order(&products, &order(&[("s3", 4), ("s3", 6), ("p9", 2)])).unwrap();

        assert_eq!(received[0].stock_in(Warehouse::Tnc), 60);
        assert_eq!(received[0].stock_in(Warehouse::TayPhat), 50);
        assert_eq!(received[1].stock_in(Warehouse::Tnc), 2);
        // cost price is not re-averaged
        assert_eq!(received[0].cost_price, products[0].cost_price);
        // input untouched
        assert_eq!(products[1].total_stock(), 0);
    }

    #[test]
    fn test_receive_twice_adds_twice() {
        let po = order(&[("p9", 3)]);
        let once = receive_purchase_order(&catalog(), &po).unwrap();
        let twice = receive_purchase_order(&once, &po).unwrap();

        assert_eq!(once[1].stock_in(Warehouse::Tnc), 3);
        assert_eq!(twice[1].stock_in(Warehouse::Tnc), 6);
        assert_ne!(once, twice);
    }

    #[test]
    fn test_receive_unknown_product_is_not_found() {
        let result = receive_purchase_order(&catalog(), &order(&[("s3", 1), ("ghost", 5)]));
        assert!(matches!(
            result,
            Err(CoreError::NotFound { entity, id }) if entity == "Product" && id == "ghost"
        ));
    }

    #[test]
    fn test_unreferenced_products_unchanged() {
        let products = catalog();
        let received = receive_purchase_order(&products, &order(&[("p9", 1)])).unwrap();
        assert_eq!(received[0], products[0]);
    }
}
