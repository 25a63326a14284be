//! # Stock Report
//!
//! Lifetime import / export / on-hand summary per physical product.
//!
//! ```text
//! imported = Σ quantity on purchase orders
//! exported = Σ quantity on sales and repair tickets, cancelled ones skipped
//! current  = Σ stock over warehouses
//! ```
//!
//! Services are left out. Nothing here is reconciled: with no sale
//! decrement, `current` is not `imported − exported`.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::invoice::Invoice;
use crate::purchase::PurchaseOrder;
use crate::types::{Product, ProductKind};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct StockReportRow {
    pub product_id: String,
    pub sku: String,
    pub name: String,
    pub unit: String,
    pub total_imported: i64,
    pub total_exported: i64,
    pub current_stock: i64,
}

/// One row per goods product, in catalog order.
pub fn stock_report(
    products: &[Product],
    invoices: &[Invoice],
    purchase_orders: &[PurchaseOrder],
) -> Vec<StockReportRow> {
    products
        .iter()
        .filter(|p| p.kind == ProductKind::Goods)
        .map(|product| {
            let total_imported = purchase_orders
                .iter()
                .map(|po| po.quantity_of(&product.id))
                .sum();

            let total_exported = invoices
                .iter()
                .filter(|inv| !inv.is_cancelled())
                .flat_map(|inv| inv.items.iter())
                .filter(|item| item.product_id == product.id)
                .map(|item| item.quantity)
                .sum();

            StockReportRow {
                product_id: product.id.clone(),
                sku: product.sku.clone(),
                name: product.name.clone(),
                unit: product.unit.clone(),
                total_imported,
                total_exported,
                current_stock: product.total_stock(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::invoice::{InvoiceItem, InvoiceKind};
    use crate::money::Money;
    use crate::purchase::{PurchaseOrderItem, PurchaseOrderStatus};
    use crate::types::{PaymentStatus, Warehouse};
    use chrono::Utc;
    use std::collections::BTreeMap;

    fn product(id: &str, kind: ProductKind) -> Product {
        Product {
            id: id.to_string(),
            name: id.to_uppercase(),
            sku: format!("SKU-{}", id),
            kind,
            price: Money::from_dong(50_000),
            cost_price: Money::from_dong(20_000),
            stock: BTreeMap::from([(Warehouse::TayPhat, 5), (Warehouse::Tnc, 7)]),
            unit: "Cái".to_string(),
        }
    }

    fn sale(id: &str, product_id: &str, qty: i64, status: PaymentStatus) -> Invoice {
        Invoice {
            id: id.to_string(),
            customer_id: "c1".to_string(),
            customer_name: "Khách".to_string(),
            date: Utc::now(),
            items: vec![InvoiceItem {
                product_id: product_id.to_string(),
                product_name: product_id.to_string(),
                quantity: qty,
                price: Money::from_dong(50_000),
                kind: ProductKind::Goods,
            }],
            total_amount: Money::from_dong(50_000 * qty),
            paid_amount: Money::zero(),
            warehouse: Warehouse::TayPhat,
            status,
            note: None,
            kind: InvoiceKind::Sale,
        }
    }

    #[test]
    fn test_report_counts_goods_only() {
        let products = vec![product("s1", ProductKind::Service), product("s3", ProductKind::Goods)];
        let po = PurchaseOrder {
            id: "PO-1".to_string(),
            supplier_id: "sup1".to_string(),
            supplier_name: "Lê Nam".to_string(),
            date: Utc::now(),
            warehouse: Warehouse::Tnc,
            items: vec![PurchaseOrderItem {
                product_id: "s3".to_string(),
                product_name: "S3".to_string(),
                quantity: 20,
                import_price: Money::from_dong(20_000),
            }],
            total_amount: Money::from_dong(400_000),
            paid_amount: Money::zero(),
            status: PurchaseOrderStatus::Completed,
        };
        let invoices = vec![
            sale("INV-1", "s3", 2, PaymentStatus::Paid),
            sale("INV-2", "s3", 3, PaymentStatus::Unpaid),
            sale("INV-3", "s3", 9, PaymentStatus::Cancelled),
        ];

        let rows = stock_report(&products, &invoices, &[po]);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].product_id, "s3");
        assert_eq!(rows[0].total_imported, 20);
        assert_eq!(rows[0].total_exported, 5);
        assert_eq!(rows[0].current_stock, 12);
    }
}
