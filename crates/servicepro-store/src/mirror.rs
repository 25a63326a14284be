//! # Mock Persistence Mirror
//!
//! Stand-in for the remote data service: async list/add/update calls over
//! in-memory collections, each answered after a simulated network delay.
//!
//! ## Contract
//! ```text
//! get_*()     ──► Vec<T>            (a copy; later writes do not show)
//! add_*(r)    ──► Ack { success }   (prepends)
//! update_*(r) ──► Ack { success }   (replaces by id; unknown id is NotFound)
//! add_product ──► upsert
//! ```
//!
//! The store does not wait on or depend on the mirror. It is an eventually
//! consistent copy for whatever persistence layer replaces it.

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tokio::time::sleep;
use tracing::debug;

use servicepro_core::{Customer, Employee, Invoice, Product, Supplier};

use crate::collection::{Collection, Record};
use crate::error::StoreResult;
use crate::seed::SeedData;

/// Simulated round trip of the demo data service.
pub const DEFAULT_LATENCY_MS: u64 = 300;

/// Acknowledgement returned by write calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ack {
    pub success: bool,
}

impl Ack {
    const OK: Ack = Ack { success: true };
}

#[derive(Debug, Clone)]
pub struct MirrorConfig {
    /// Delay before every call returns.
    pub latency: Duration,
}

impl Default for MirrorConfig {
    fn default() -> Self {
        MirrorConfig {
            latency: Duration::from_millis(DEFAULT_LATENCY_MS),
        }
    }
}

impl MirrorConfig {
    /// No delay, for tests.
    pub fn instant() -> Self {
        MirrorConfig {
            latency: Duration::ZERO,
        }
    }

    pub fn with_latency_ms(ms: u64) -> Self {
        MirrorConfig {
            latency: Duration::from_millis(ms),
        }
    }
}

#[derive(Debug, Default)]
struct MirrorState {
    employees: Collection<Employee>,
    products: Collection<Product>,
    customers: Collection<Customer>,
    invoices: Collection<Invoice>,
    suppliers: Collection<Supplier>,
}

/// Cloneable handle to the mock data service.
#[derive(Debug, Clone)]
pub struct MockBackend {
    config: MirrorConfig,
    state: Arc<RwLock<MirrorState>>,
}

impl MockBackend {
    pub fn new(config: MirrorConfig, seed: &SeedData) -> Self {
        let state = MirrorState {
            employees: Collection::new(seed.employees.clone()),
            products: Collection::new(seed.products.clone()),
            customers: Collection::new(seed.customers.clone()),
            invoices: Collection::new(seed.invoices.clone()),
            suppliers: Collection::new(seed.suppliers.clone()),
        };
        MockBackend {
            config,
            state: Arc::new(RwLock::new(state)),
        }
    }

    async fn delay(&self) {
        if !self.config.latency.is_zero() {
            sleep(self.config.latency).await;
        }
    }

    async fn list<T, F>(&self, pick: F) -> Vec<T>
    where
        T: Record,
        F: FnOnce(&MirrorState) -> &Collection<T>,
    {
        self.delay().await;
        let state = self.state.read().await;
        pick(&state).as_slice().to_vec()
    }

    async fn write<F>(&self, op: &str, id: &str, apply: F) -> StoreResult<Ack>
    where
        F: FnOnce(&mut MirrorState) -> StoreResult<()>,
    {
        self.delay().await;
        let mut state = self.state.write().await;
        apply(&mut state)?;
        debug!(op = %op, id = %id, "Mirror write");
        Ok(Ack::OK)
    }

    // =========================================================================
    // Employees
    // =========================================================================

    pub async fn get_employees(&self) -> Vec<Employee> {
        self.list(|s| &s.employees).await
    }

    pub async fn add_employee(&self, employee: Employee) -> StoreResult<Ack> {
        let id = employee.id.clone();
        self.write("add_employee", &id, |s| {
            s.employees = s.employees.insert(employee);
            Ok(())
        })
        .await
    }

    pub async fn delete_employee(&self, id: &str) -> StoreResult<Ack> {
        self.write("delete_employee", id, |s| {
            s.employees = s.employees.remove_by_id(id)?;
            Ok(())
        })
        .await
    }

    // =========================================================================
    // Products
    // =========================================================================

    pub async fn get_products(&self) -> Vec<Product> {
        self.list(|s| &s.products).await
    }

    /// Adds the product, or replaces the one with the same id.
    pub async fn add_product(&self, product: Product) -> StoreResult<Ack> {
        let id = product.id.clone();
        self.write("add_product", &id, |s| {
            s.products = s.products.upsert(product);
            Ok(())
        })
        .await
    }

    // =========================================================================
    // Customers
    // =========================================================================

    pub async fn get_customers(&self) -> Vec<Customer> {
        self.list(|s| &s.customers).await
    }

    pub async fn add_customer(&self, customer: Customer) -> StoreResult<Ack> {
        let id = customer.id.clone();
        self.write("add_customer", &id, |s| {
            s.customers = s.customers.insert(customer);
            Ok(())
        })
        .await
    }

    pub async fn update_customer(&self, customer: Customer) -> StoreResult<Ack> {
        let id = customer.id.clone();
        self.write("update_customer", &id, |s| {
            s.customers = s.customers.replace_by_id(&id, customer)?;
            Ok(())
        })
        .await
    }

    // =========================================================================
    // Invoices
    // =========================================================================

    pub async fn get_invoices(&self) -> Vec<Invoice> {
        self.list(|s| &s.invoices).await
    }

    pub async fn add_invoice(&self, invoice: Invoice) -> StoreResult<Ack> {
        let id = invoice.id.clone();
        self.write("add_invoice", &id, |s| {
            s.invoices = s.invoices.insert(invoice);
            Ok(())
        })
        .await
    }

    pub async fn update_invoice(&self, invoice: Invoice) -> StoreResult<Ack> {
        let id = invoice.id.clone();
        self.write("update_invoice", &id, |s| {
            s.invoices = s.invoices.replace_by_id(&id, invoice)?;
            Ok(())
        })
        .await
    }

    // =========================================================================
    // Suppliers
    // =========================================================================

    pub async fn get_suppliers(&self) -> Vec<Supplier> {
        self.list(|s| &s.suppliers).await
    }

    pub async fn add_supplier(&self, supplier: Supplier) -> StoreResult<Ack> {
        let id = supplier.id.clone();
        self.write("add_supplier", &id, |s| {
            s.suppliers = s.suppliers.insert(supplier);
            Ok(())
        })
        .await
    }
}
