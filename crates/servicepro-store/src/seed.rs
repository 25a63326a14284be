//! # Seed Data
//!
//! The initial state a [`ShopStore`](crate::ShopStore) is constructed from.
//! Injected, never read from a global, so every session and every test
//! starts from exactly what it was handed.
//!
//! ## Sources
//! - [`SeedData::demo`] - the shop's built-in demo data
//! - [`SeedData::from_json`] - a JSON document in the front end's shape
//! - [`SeedData::default`] - empty

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use servicepro_core::purchase::PurchaseOrder;
use servicepro_core::vat::VatInvoice;
use servicepro_core::{
    Customer, Employee, Invoice, Money, Product, ProductKind, Role, Supplier, Warehouse,
    SERVICE_STOCK_SENTINEL,
};

use crate::error::StoreResult;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SeedData {
    pub employees: Vec<Employee>,
    pub customers: Vec<Customer>,
    pub suppliers: Vec<Supplier>,
    pub products: Vec<Product>,
    pub invoices: Vec<Invoice>,
    pub purchase_orders: Vec<PurchaseOrder>,
    pub vat_invoices: Vec<VatInvoice>,
}

impl SeedData {
    /// Decodes seed data. Missing lists are empty.
    pub fn from_json(json: &str) -> StoreResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> StoreResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Three staff, two suppliers, the basic service list. No customers
    /// or invoices yet.
    pub fn demo() -> Self {
        SeedData {
            employees: vec![
                employee("emp1", "Nguyễn Văn Quản Lý", Role::Admin, "admin"),
                employee("emp2", "Trần Kỹ Thuật", Role::Technician, "tech"),
                employee("emp3", "Lê Bán Hàng", Role::Sales, "sales"),
            ],
            customers: Vec::new(),
            suppliers: vec![
                Supplier {
                    id: "sup1".to_string(),
                    name: "Linh Kiện Lê Nam".to_string(),
                    phone: "0901234567".to_string(),
                    address: None,
                    contact_person: Some("A. Nam".to_string()),
                    balance: Money::zero(),
                },
                Supplier {
                    id: "sup2".to_string(),
                    name: "Kho Sỉ Minh Thông".to_string(),
                    phone: "0987654321".to_string(),
                    address: None,
                    contact_person: Some("C. Thảo".to_string()),
                    balance: Money::from_dong(5_000_000),
                },
            ],
            products: vec![
                Product {
                    id: "s1".to_string(),
                    name: "Dịch vụ Cài Win + Vệ sinh máy".to_string(),
                    sku: "SV-BASIC-01".to_string(),
                    kind: ProductKind::Service,
                    price: Money::from_dong(150_000),
                    cost_price: Money::zero(),
                    stock: both_warehouses(SERVICE_STOCK_SENTINEL),
                    unit: "Lần".to_string(),
                },
                Product {
                    id: "s2".to_string(),
                    name: "Kiểm tra lỗi phần cứng (Phí dịch vụ)".to_string(),
                    sku: "SV-CHECK-01".to_string(),
                    kind: ProductKind::Service,
                    price: Money::from_dong(100_000),
                    cost_price: Money::zero(),
                    stock: both_warehouses(SERVICE_STOCK_SENTINEL),
                    unit: "Lần".to_string(),
                },
                Product {
                    id: "s3".to_string(),
                    name: "Thay Keo tản nhiệt MX4".to_string(),
                    sku: "SV-THERMAL".to_string(),
                    kind: ProductKind::Goods,
                    price: Money::from_dong(50_000),
                    cost_price: Money::from_dong(20_000),
                    stock: both_warehouses(50),
                    unit: "Lần".to_string(),
                },
            ],
            invoices: Vec::new(),
            purchase_orders: Vec::new(),
            vat_invoices: Vec::new(),
        }
    }
}

fn employee(id: &str, name: &str, role: Role, username: &str) -> Employee {
    Employee {
        id: id.to_string(),
        name: name.to_string(),
        role,
        username: username.to_string(),
    }
}

fn both_warehouses(qty: i64) -> BTreeMap<Warehouse, i64> {
    Warehouse::ALL.into_iter().map(|w| (w, qty)).collect()
}
