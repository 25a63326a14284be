//! # Party Commands
//!
//! Customers, suppliers, staff and the debt book.
//!
//! Balances are never edited directly: they move only through invoice and
//! purchase-order writes. Edits here keep the stored balance.

use serde::{Deserialize, Serialize};
use tracing::debug;

use servicepro_core::access::Action;
use servicepro_core::validation;
use servicepro_core::{Customer, Employee, Money, Role, Supplier};
use servicepro_store::{new_id, MockBackend};

use crate::commands::log_mirror_failure;
use crate::error::ApiError;
use crate::state::SessionState;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerInput {
    pub name: String,
    pub phone: String,
    pub address: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SupplierInput {
    pub name: String,
    pub phone: String,
    pub address: Option<String>,
    pub contact_person: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeInput {
    pub name: String,
    pub username: String,
    pub role: Role,
}

/// One line of the debt book.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DebtRow {
    pub customer: Customer,
    /// Sum of outstanding amounts over the customer's invoices.
    pub recomputed: Money,
}

// =============================================================================
// Customers
// =============================================================================

pub fn list_customers(session: &SessionState) -> Vec<Customer> {
    session.with_session(|s| s.store().customers().as_slice().to_vec())
}

pub async fn add_customer(session: &SessionState, backend: &MockBackend, input: CustomerInput) -> Result<Customer, ApiError> {
    debug!(name = %input.name, "add_customer command");
    validation::validate_name("name", &input.name)?;

    let customer = Customer {
        id: new_id("C"),
        name: input.name.trim().to_string(),
        phone: input.phone.trim().to_string(),
        address: input.address.trim().to_string(),
        balance: Money::zero(),
    };

    session.with_session_mut(|s| -> Result<(), ApiError> {
        s.require(Action::ManageCustomers)?;
        s.store_mut().add_customer(customer.clone());
        Ok(())
    })?;

    log_mirror_failure("customer", &customer.id, backend.add_customer(customer.clone()).await);
    Ok(customer)
}

pub async fn update_customer(
    session: &SessionState,
    backend: &MockBackend,
    id: String,
    input: CustomerInput,
) -> Result<Customer, ApiError> {
    debug!(id = %id, "update_customer command");
    validation::validate_name("name", &input.name)?;

    let customer = session.with_session_mut(|s| -> Result<Customer, ApiError> {
        s.require(Action::ManageCustomers)?;
        let current = s.store().customers().require(&id)?;
        let customer = Customer {
            name: input.name.trim().to_string(),
            phone: input.phone.trim().to_string(),
            address: input.address.trim().to_string(),
            ..current.clone()
        };
        s.store_mut().update_customer(customer.clone())?;
        Ok(customer)
    })?;

    log_mirror_failure("customer", &customer.id, backend.update_customer(customer.clone()).await);
    Ok(customer)
}

/// Customers who owe something, largest debt first.
pub fn list_debtors(session: &SessionState) -> Vec<DebtRow> {
    session.with_session(|s| {
        let store = s.store();
        let mut rows: Vec<DebtRow> = store
            .customers()
            .iter()
            .filter(|c| c.balance.is_positive())
            .map(|c| DebtRow {
                customer: c.clone(),
                recomputed: store.reconcile_customer(&c.id),
            })
            .collect();
        rows.sort_by(|a, b| b.customer.balance.cmp(&a.customer.balance));
        rows
    })
}

// =============================================================================
// Suppliers
// =============================================================================

pub fn list_suppliers(session: &SessionState) -> Vec<Supplier> {
    session.with_session(|s| s.store().suppliers().as_slice().to_vec())
}

pub async fn add_supplier(session: &SessionState, backend: &MockBackend, input: SupplierInput) -> Result<Supplier, ApiError> {
    debug!(name = %input.name, "add_supplier command");
    validation::validate_name("name", &input.name)?;

    let supplier = Supplier {
        id: new_id("SUP"),
        name: input.name.trim().to_string(),
        phone: input.phone.trim().to_string(),
        address: input.address,
        contact_person: input.contact_person,
        balance: Money::zero(),
    };

    session.with_session_mut(|s| -> Result<(), ApiError> {
        s.require(Action::ManageSuppliers)?;
        s.store_mut().add_supplier(supplier.clone());
        Ok(())
    })?;

    log_mirror_failure("supplier", &supplier.id, backend.add_supplier(supplier.clone()).await);
    Ok(supplier)
}

pub fn update_supplier(session: &SessionState, id: String, input: SupplierInput) -> Result<Supplier, ApiError> {
    debug!(id = %id, "update_supplier command");
    validation::validate_name("name", &input.name)?;

    session.with_session_mut(|s| -> Result<Supplier, ApiError> {
        s.require(Action::ManageSuppliers)?;
        let current = s.store().suppliers().require(&id)?;
        let supplier = Supplier {
            name: input.name.trim().to_string(),
            phone: input.phone.trim().to_string(),
            address: input.address,
            contact_person: input.contact_person,
            ..current.clone()
        };
        s.store_mut().update_supplier(supplier.clone())?;
        Ok(supplier)
    })
}

// =============================================================================
// Employees
// =============================================================================

pub fn list_employees(session: &SessionState) -> Vec<Employee> {
    session.with_session(|s| s.store().employees().as_slice().to_vec())
}

pub async fn add_employee(session: &SessionState, backend: &MockBackend, input: EmployeeInput) -> Result<Employee, ApiError> {
    debug!(username = %input.username, role = ?input.role, "add_employee command");
    validation::validate_name("name", &input.name)?;
    validation::validate_required("username", &input.username)?;

    let employee = Employee {
        id: new_id("EMP"),
        name: input.name.trim().to_string(),
        role: input.role,
        username: input.username.trim().to_string(),
    };

    session.with_session_mut(|s| -> Result<(), ApiError> {
        s.require(Action::ManageEmployees)?;
        s.store_mut().add_employee(employee.clone());
        Ok(())
    })?;

    log_mirror_failure("employee", &employee.id, backend.add_employee(employee.clone()).await);
    Ok(employee)
}

pub async fn delete_employee(session: &SessionState, backend: &MockBackend, id: String) -> Result<(), ApiError> {
    debug!(id = %id, "delete_employee command");

    session.with_session_mut(|s| -> Result<(), ApiError> {
        s.require(Action::ManageEmployees)?;
        s.store_mut().delete_employee(&id)?;
        Ok(())
    })?;

    log_mirror_failure("employee", &id, backend.delete_employee(&id).await);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use servicepro_core::Party;
    use servicepro_store::mirror::MirrorConfig;
    use servicepro_store::{SeedData, DEMO_PASSWORD};

    fn setup(user: &str) -> (SessionState, MockBackend) {
        let seed = SeedData::demo();
        let session = SessionState::new(seed.clone());
        session.with_session_mut(|s| s.login(user, DEMO_PASSWORD)).unwrap();
        (session, MockBackend::new(MirrorConfig::instant(), &seed))
    }

    #[tokio::test]
    async fn test_customer_edit_keeps_balance() {
        let (session, backend) = setup("sales");
        let created = add_customer(
            &session,
            &backend,
            CustomerInput {
                name: " Cô Lan ".to_string(),
                phone: "0904".to_string(),
                address: String::new(),
            },
        )
        .await
        .unwrap();
        assert_eq!(created.name, "Cô Lan");
        assert!(created.id.starts_with("C-"));

        session.with_session_mut(|s| {
            let owing = created.with_balance(Money::from_dong(80_000));
            s.store_mut().update_customer(owing).unwrap();
        });

        let edited = update_customer(
            &session,
            &backend,
            created.id.clone(),
            CustomerInput {
                name: "Cô Lan (Tây Phát)".to_string(),
                phone: "0904".to_string(),
                address: "Tây Phát".to_string(),
            },
        )
        .await
        .unwrap();
        assert_eq!(edited.balance.dong(), 80_000);
        assert_eq!(backend.get_customers().await[0].name, "Cô Lan (Tây Phát)");

        let debtors = list_debtors(&session);
        assert_eq!(debtors.len(), 1);
        assert_eq!(debtors[0].recomputed, Money::zero());
    }

    #[tokio::test]
    async fn test_only_admin_manages_staff() {
        let (session, backend) = setup("sales");
        let input = EmployeeInput {
            name: "Đỗ Thu Ngân".to_string(),
            username: "thungan".to_string(),
            role: Role::Sales,
        };
        let err = add_employee(&session, &backend, input.clone()).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::Forbidden);

        let (session, backend) = setup("admin");
        let created = add_employee(&session, &backend, input).await.unwrap();
        delete_employee(&session, &backend, created.id.clone()).await.unwrap();
        assert_eq!(list_employees(&session).len(), 3);

        let err = delete_employee(&session, &backend, created.id).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn test_supplier_needs_a_name() {
        let (session, backend) = setup("sales");
        let err = add_supplier(&session, &backend, SupplierInput::default()).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert_eq!(list_suppliers(&session).len(), 2);
    }
}
