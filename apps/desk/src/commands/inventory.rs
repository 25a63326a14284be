//! # Inventory Commands
//!
//! Product catalog, goods import and the stock report.

use tracing::debug;

use servicepro_core::access::Action;
use servicepro_core::purchase::{ImportRequest, PurchaseOrder};
use servicepro_core::report::StockReportRow;
use servicepro_core::validation;
use servicepro_core::Product;
use servicepro_store::{new_id, MockBackend, RepairDesk};

use crate::commands::log_mirror_failure;
use crate::error::ApiError;
use crate::state::SessionState;

pub fn list_products(session: &SessionState) -> Vec<Product> {
    session.with_session(|s| s.store().products().as_slice().to_vec())
}

/// Creates or edits a product. An empty id means a new product.
pub async fn add_product(session: &SessionState, backend: &MockBackend, mut product: Product) -> Result<Product, ApiError> {
    debug!(id = %product.id, sku = %product.sku, "add_product command");

    validation::validate_required("name", &product.name)?;
    if product.id.trim().is_empty() {
        product.id = new_id("P");
    }

    let saved = session.with_session_mut(|s| -> Result<Product, ApiError> {
        s.require(Action::ManageProducts)?;
        s.store_mut().upsert_product(product.clone());
        Ok(product)
    })?;

    log_mirror_failure("product", &saved.id, backend.add_product(saved.clone()).await);
    Ok(saved)
}

/// Confirms an import form: saves the purchase order, books the supplier
/// debt and receives the goods.
pub async fn import_goods(
    session: &SessionState,
    backend: &MockBackend,
    request: ImportRequest,
) -> Result<PurchaseOrder, ApiError> {
    debug!(supplier_id = %request.supplier_id, lines = request.items.len(), "import_goods command");

    let (po, received) = session.with_session_mut(|s| -> Result<_, ApiError> {
        let po = RepairDesk::new(s).import_goods(request)?;
        let received: Vec<Product> = s
            .store()
            .products()
            .iter()
            .filter(|p| po.items.iter().any(|line| line.product_id == p.id))
            .cloned()
            .collect();
        Ok((po, received))
    })?;

    for product in received {
        let id = product.id.clone();
        log_mirror_failure("product", &id, backend.add_product(product).await);
    }
    Ok(po)
}

pub fn list_purchase_orders(session: &SessionState) -> Vec<PurchaseOrder> {
    session.with_session(|s| s.store().purchase_orders().as_slice().to_vec())
}

pub fn get_stock_report(session: &SessionState) -> Vec<StockReportRow> {
    debug!("get_stock_report command");
    session.with_session(|s| s.store().stock_report())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use servicepro_core::purchase::PurchaseOrderItem;
    use servicepro_core::{Money, Warehouse};
    use servicepro_store::mirror::MirrorConfig;
    use servicepro_store::{SeedData, DEMO_PASSWORD};

    fn setup(user: &str) -> (SessionState, MockBackend) {
        let seed = SeedData::demo();
        let session = SessionState::new(seed.clone());
        session.with_session_mut(|s| s.login(user, DEMO_PASSWORD)).unwrap();
        (session, MockBackend::new(MirrorConfig::instant(), &seed))
    }

    #[tokio::test]
    async fn test_import_mirrors_received_products() {
        let (session, backend) = setup("sales");

        import_goods(
            &session,
            &backend,
            ImportRequest {
                supplier_id: "sup1".to_string(),
                warehouse: Warehouse::Tnc,
                items: vec![PurchaseOrderItem {
                    product_id: "s3".to_string(),
                    product_name: "Thay Keo tản nhiệt MX4".to_string(),
                    quantity: 10,
                    import_price: Money::from_dong(20_000),
                }],
                paid: Money::from_dong(200_000),
            },
        )
        .await
        .unwrap();

        let mirrored = backend.get_products().await;
        let thermal = mirrored.iter().find(|p| p.id == "s3").unwrap();
        assert_eq!(thermal.stock_in(Warehouse::Tnc), 60);
        assert_eq!(list_purchase_orders(&session).len(), 1);

        let row = get_stock_report(&session).into_iter().find(|r| r.product_id == "s3").unwrap();
        assert_eq!(row.total_imported, 10);
        assert_eq!(row.current_stock, 110);
    }

    #[tokio::test]
    async fn test_technician_cannot_edit_catalog() {
        let (session, backend) = setup("tech");
        let mut product = list_products(&session).remove(0);
        product.price = Money::from_dong(1);

        let err = add_product(&session, &backend, product).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::Forbidden);
        assert_eq!(list_products(&session)[0].price.dong(), 150_000);
    }

    #[tokio::test]
    async fn test_new_product_gets_an_id() {
        let (session, backend) = setup("admin");
        let mut product = list_products(&session).remove(2);
        product.id = String::new();
        product.sku = "PK-SSD-256".to_string();

        let saved = add_product(&session, &backend, product).await.unwrap();
        assert!(saved.id.starts_with("P-"));
        assert_eq!(list_products(&session)[0].id, saved.id);
    }
}
