//! # Shop Store
//!
//! The explicit owner of every record for one session.
//!
//! ## Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  SeedData ──► ShopStore::new(seed) ──► Session ──► ... ──► drop         │
//! │                                                                         │
//! │  No statics. Two stores built from the same seed never share writes.   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Composite Writes
//! Writes that touch more than one collection compute every new collection
//! first and swap the handles only when all of them succeeded:
//!
//! ```text
//! import_goods(po)
//!   ├── supplier' = record_debt_change(None, po, supplier)   ─┐
//!   ├── products' = receive_purchase_order(products, po)      ├─ any Err → nothing changes
//!   ├── orders'   = purchase_orders.insert(po)               ─┘
//!   └── commit: suppliers, products, purchase_orders
//! ```
//!
//! Every invoice write, whether a new invoice, a patch or a full
//! replacement, passes through the ledger hook exactly once.

use tracing::{debug, info};

use servicepro_core::invoice::InvoicePatch;
use servicepro_core::ledger::{self, record_debt_change};
use servicepro_core::purchase::PurchaseOrder;
use servicepro_core::report::{stock_report, StockReportRow};
use servicepro_core::stock::receive_purchase_order;
use servicepro_core::vat::VatInvoice;
use servicepro_core::{Customer, Employee, Invoice, Money, Product, Supplier};

use crate::collection::Collection;
use crate::error::StoreResult;
use crate::seed::SeedData;

/// In-memory records of the shop.
#[derive(Debug, Clone, Default)]
pub struct ShopStore {
    employees: Collection<Employee>,
    customers: Collection<Customer>,
    suppliers: Collection<Supplier>,
    products: Collection<Product>,
    invoices: Collection<Invoice>,
    purchase_orders: Collection<PurchaseOrder>,
    vat_invoices: Collection<VatInvoice>,
}

impl ShopStore {
    /// Builds a store holding exactly the seed.
    pub fn new(seed: SeedData) -> Self {
        info!(
            employees = seed.employees.len(),
            products = seed.products.len(),
            customers = seed.customers.len(),
            invoices = seed.invoices.len(),
            "Shop store initialized"
        );

        ShopStore {
            employees: Collection::new(seed.employees),
            customers: Collection::new(seed.customers),
            suppliers: Collection::new(seed.suppliers),
            products: Collection::new(seed.products),
            invoices: Collection::new(seed.invoices),
            purchase_orders: Collection::new(seed.purchase_orders),
            vat_invoices: Collection::new(seed.vat_invoices),
        }
    }

    /// Current state as seed data, e.g. to hand to a fresh store.
    pub fn snapshot(&self) -> SeedData {
        SeedData {
            employees: self.employees.as_slice().to_vec(),
            customers: self.customers.as_slice().to_vec(),
            suppliers: self.suppliers.as_slice().to_vec(),
            products: self.products.as_slice().to_vec(),
            invoices: self.invoices.as_slice().to_vec(),
            purchase_orders: self.purchase_orders.as_slice().to_vec(),
            vat_invoices: self.vat_invoices.as_slice().to_vec(),
        }
    }

    // =========================================================================
    // Read Access
    // =========================================================================

    pub fn employees(&self) -> &Collection<Employee> {
        &self.employees
    }

    pub fn customers(&self) -> &Collection<Customer> {
        &self.customers
    }

    pub fn suppliers(&self) -> &Collection<Supplier> {
        &self.suppliers
    }

    pub fn products(&self) -> &Collection<Product> {
        &self.products
    }

    pub fn invoices(&self) -> &Collection<Invoice> {
        &self.invoices
    }

    pub fn purchase_orders(&self) -> &Collection<PurchaseOrder> {
        &self.purchase_orders
    }

    pub fn vat_invoices(&self) -> &Collection<VatInvoice> {
        &self.vat_invoices
    }

    /// Import / export / on-hand summary over current records.
    pub fn stock_report(&self) -> Vec<StockReportRow> {
        stock_report(
            self.products.as_slice(),
            self.invoices.as_slice(),
            self.purchase_orders.as_slice(),
        )
    }

    /// From-scratch outstanding total for a customer.
    pub fn reconcile_customer(&self, customer_id: &str) -> Money {
        ledger::reconcile(customer_id, &self.invoices)
    }

    /// From-scratch outstanding total for a supplier.
    pub fn reconcile_supplier(&self, supplier_id: &str) -> Money {
        ledger::reconcile(supplier_id, &self.purchase_orders)
    }

    // =========================================================================
    // People & Catalog
    // =========================================================================

    pub fn add_employee(&mut self, employee: Employee) {
        debug!(id = %employee.id, role = ?employee.role, "Adding employee");
        self.employees = self.employees.insert(employee);
    }

    pub fn delete_employee(&mut self, id: &str) -> StoreResult<()> {
        debug!(id = %id, "Deleting employee");
        self.employees = self.employees.remove_by_id(id)?;
        Ok(())
    }

    pub fn add_customer(&mut self, customer: Customer) {
        debug!(id = %customer.id, name = %customer.name, "Adding customer");
        self.customers = self.customers.insert(customer);
    }

    pub fn update_customer(&mut self, customer: Customer) -> StoreResult<()> {
        debug!(id = %customer.id, "Updating customer");
        self.customers = self.customers.replace_by_id(&customer.id.clone(), customer)?;
        Ok(())
    }

    pub fn add_supplier(&mut self, supplier: Supplier) {
        debug!(id = %supplier.id, name = %supplier.name, "Adding supplier");
        self.suppliers = self.suppliers.insert(supplier);
    }

    pub fn update_supplier(&mut self, supplier: Supplier) -> StoreResult<()> {
        debug!(id = %supplier.id, "Updating supplier");
        self.suppliers = self.suppliers.replace_by_id(&supplier.id.clone(), supplier)?;
        Ok(())
    }

    /// Adds the product, or replaces the one with the same id.
    pub fn upsert_product(&mut self, product: Product) {
        debug!(id = %product.id, sku = %product.sku, "Saving product");
        self.products = self.products.upsert(product);
    }

    // =========================================================================
    // Invoices (ledger-hooked)
    // =========================================================================

    /// Inserts a sale or repair ticket and books its debt to the customer.
    pub fn add_invoice(&mut self, invoice: Invoice) -> StoreResult<()> {
        let customer = self.customers.require(&invoice.customer_id)?;
        let customer = record_debt_change(None, &invoice, customer);

        debug!(
            id = %invoice.id,
            customer_id = %invoice.customer_id,
            total = %invoice.total_amount,
            paid = %invoice.paid_amount,
            "Adding invoice"
        );

        let customers = self.customers.replace_by_id(&customer.id.clone(), customer)?;
        let invoices = self.invoices.insert(invoice);

        self.customers = customers;
        self.invoices = invoices;
        Ok(())
    }

    /// Applies a partial update and books the debt difference.
    pub fn update_invoice(&mut self, id: &str, patch: &InvoicePatch) -> StoreResult<Invoice> {
        let updated = patch.apply(self.invoices.require(id)?)?;
        self.replace_invoice(updated)
    }

    /// Replaces an invoice wholesale and books the debt difference.
    ///
    /// Returns the record as committed.
    pub fn replace_invoice(&mut self, invoice: Invoice) -> StoreResult<Invoice> {
        let old = self.invoices.require(&invoice.id)?;
        let customer = self.customers.require(&invoice.customer_id)?;
        let delta = ledger::debt_delta(Some(old), &invoice);
        let customer = record_debt_change(Some(old), &invoice, customer);

        debug!(
            id = %invoice.id,
            status = ?invoice.status,
            repair_status = ?invoice.repair_status(),
            delta = %delta,
            "Updating invoice"
        );

        let customers = self.customers.replace_by_id(&customer.id.clone(), customer)?;
        let invoices = self.invoices.replace_by_id(&invoice.id.clone(), invoice.clone())?;

        self.customers = customers;
        self.invoices = invoices;
        Ok(invoice)
    }

    // =========================================================================
    // Purchase Orders
    // =========================================================================

    /// Saves a purchase order, books the supplier debt and receives the
    /// goods into `po.warehouse`. All or nothing.
    pub fn import_goods(&mut self, po: PurchaseOrder) -> StoreResult<()> {
        let supplier = self.suppliers.require(&po.supplier_id)?;
        let supplier = record_debt_change(None, &po, supplier);
        let products = receive_purchase_order(self.products.as_slice(), &po)?;

        info!(
            id = %po.id,
            supplier_id = %po.supplier_id,
            warehouse = ?po.warehouse,
            lines = po.items.len(),
            total = %po.total_amount,
            "Importing goods"
        );

        let suppliers = self.suppliers.replace_by_id(&supplier.id.clone(), supplier)?;
        let purchase_orders = self.purchase_orders.insert(po);

        self.suppliers = suppliers;
        self.products = Collection::new(products);
        self.purchase_orders = purchase_orders;
        Ok(())
    }

    // =========================================================================
    // VAT Invoices
    // =========================================================================

    pub fn add_vat_invoice(&mut self, invoice: VatInvoice) {
        debug!(id = %invoice.id, number = %invoice.invoice_number, "Adding VAT invoice");
        self.vat_invoices = self.vat_invoices.insert(invoice);
    }

    pub fn update_vat_invoice(&mut self, invoice: VatInvoice) -> StoreResult<()> {
        debug!(id = %invoice.id, number = %invoice.invoice_number, "Updating VAT invoice");
        self.vat_invoices = self.vat_invoices.replace_by_id(&invoice.id.clone(), invoice)?;
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreError;
    use chrono::Utc;
    use servicepro_core::invoice::InvoiceKind;
    use servicepro_core::purchase::{PurchaseOrderItem, PurchaseOrderStatus};
    use servicepro_core::{PaymentStatus, Warehouse};

    fn store_with_customer() -> ShopStore {
        let mut store = ShopStore::new(SeedData::demo());
        store.add_customer(Customer {
            id: "c1".to_string(),
            name: "Anh Bảo".to_string(),
            phone: "0911".to_string(),
            address: String::new(),
            balance: Money::zero(),
        });
        store
    }

    fn sale(id: &str, total: i64, paid: i64) -> Invoice {
        let total = Money::from_dong(total);
        let paid = Money::from_dong(paid);
        Invoice {
            id: id.to_string(),
            customer_id: "c1".to_string(),
            customer_name: "Anh Bảo".to_string(),
            date: Utc::now(),
            items: vec![],
            total_amount: total,
            paid_amount: paid,
            warehouse: Warehouse::TayPhat,
            status: PaymentStatus::from_amounts(total, paid),
            note: None,
            kind: InvoiceKind::Sale,
        }
    }

    fn po(items: &[(&str, i64)], total: i64, paid: i64) -> PurchaseOrder {
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
                    import_price: Money::from_dong(20_000),
                })
                .collect(),
            total_amount: Money::from_dong(total),
            paid_amount: Money::from_dong(paid),
            status: PurchaseOrderStatus::Completed,
        }
    }

    #[test]
    fn test_stores_from_same_seed_are_independent() {
        let mut a = ShopStore::new(SeedData::demo());
        let b = ShopStore::new(SeedData::demo());
        a.delete_employee("emp3").unwrap();
        assert_eq!(a.employees().len(), 2);
        assert_eq!(b.employees().len(), 3);
    }

    #[test]
    fn test_add_invoice_books_debt() {
        let mut store = store_with_customer();
        store.add_invoice(sale("INV-1", 500_000, 500_000)).unwrap();
        assert_eq!(store.customers().get("c1").unwrap().balance, Money::zero());

        store.add_invoice(sale("INV-2", 700_000, 0)).unwrap();
        assert_eq!(store.customers().get("c1").unwrap().balance.dong(), 700_000);
        assert_eq!(store.invoices().as_slice()[0].id, "INV-2");
    }

    #[test]
    fn test_add_invoice_for_unknown_customer_changes_nothing() {
        let mut store = store_with_customer();
        let mut invoice = sale("INV-1", 100_000, 0);
        invoice.customer_id = "ghost".to_string();

        assert!(matches!(store.add_invoice(invoice), Err(StoreError::NotFound { .. })));
        assert!(store.invoices().is_empty());
    }

    #[test]
    fn test_update_invoice_books_difference() {
        let mut store = store_with_customer();
        store.add_invoice(sale("INV-1", 700_000, 0)).unwrap();

        let patch = InvoicePatch {
            paid_amount: Some(Money::from_dong(300_000)),
            ..Default::default()
        };
        let updated = store.update_invoice("INV-1", &patch).unwrap();
        assert_eq!(updated.paid_amount.dong(), 300_000);
        assert_eq!(updated.status, PaymentStatus::Partial);
        assert_eq!(store.customers().get("c1").unwrap().balance.dong(), 400_000);
        assert_eq!(store.reconcile_customer("c1").dong(), 400_000);

        let cancel = InvoicePatch {
            status: Some(PaymentStatus::Cancelled),
            ..Default::default()
        };
        store.update_invoice("INV-1", &cancel).unwrap();
        assert_eq!(store.customers().get("c1").unwrap().balance, Money::zero());
    }

    #[test]
    fn test_paying_in_full_marks_paid() {
        let mut store = store_with_customer();
        store.add_invoice(sale("INV-1", 500_000, 0)).unwrap();

        let pay = InvoicePatch {
            paid_amount: Some(Money::from_dong(500_000)),
            ..Default::default()
        };
        let updated = store.update_invoice("INV-1", &pay).unwrap();
        assert_eq!(updated.status, PaymentStatus::Paid);
        assert_eq!(store.customers().get("c1").unwrap().balance, Money::zero());
    }

    #[test]
    fn test_update_missing_invoice_is_not_found() {
        let mut store = store_with_customer();
        let result = store.update_invoice("INV-404", &InvoicePatch::default());
        assert!(matches!(result, Err(StoreError::NotFound { entity, .. }) if entity == "Invoice"));
    }

    #[test]
    fn test_old_handles_do_not_see_writes() {
        let mut store = store_with_customer();
        let before = store.invoices().clone();
        store.add_invoice(sale("INV-1", 100_000, 0)).unwrap();
        assert!(before.is_empty());
        assert!(!before.ptr_eq(store.invoices()));
    }

    #[test]
    fn test_import_goods() {
        let mut store = store_with_customer();
        store.import_goods(po(&[("s3", 10)], 200_000, 50_000)).unwrap();

        assert_eq!(store.products().get("s3").unwrap().stock_in(Warehouse::Tnc), 60);
        assert_eq!(store.suppliers().get("sup1").unwrap().balance.dong(), 150_000);
        assert_eq!(store.purchase_orders().len(), 1);
        assert_eq!(store.reconcile_supplier("sup1").dong(), 150_000);
    }

    #[test]
    fn test_import_goods_with_unknown_product_is_all_or_nothing() {
        let mut store = store_with_customer();
        let result = store.import_goods(po(&[("s3", 10), ("ghost", 1)], 220_000, 0));

        assert!(matches!(result, Err(StoreError::NotFound { id, .. }) if id == "ghost"));
        assert_eq!(store.products().get("s3").unwrap().stock_in(Warehouse::Tnc), 50);
        assert_eq!(store.suppliers().get("sup1").unwrap().balance, Money::zero());
        assert!(store.purchase_orders().is_empty());
    }

    #[test]
    fn test_upsert_product_and_report() {
        let mut store = store_with_customer();
        let mut thermal = store.products().get("s3").unwrap().clone();
        thermal.price = Money::from_dong(60_000);
        store.upsert_product(thermal);

        assert_eq!(store.products().len(), 3);
        assert_eq!(store.products().get("s3").unwrap().price.dong(), 60_000);

        let report = store.stock_report();
        assert_eq!(report.len(), 1);
        assert_eq!(report[0].current_stock, 100);
    }
}
