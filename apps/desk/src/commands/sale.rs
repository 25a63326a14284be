//! # Sale Commands
//!
//! POS counter: cart lines in, sale invoice and slip out.

use tracing::{debug, warn};

use servicepro_core::invoice::{add_product_line, items_total, CheckoutRequest, InvoiceItem};
use servicepro_core::Money;
use servicepro_store::{Committed, MockBackend, RepairDesk};

use crate::commands::mirror_invoice;
use crate::error::ApiError;
use crate::print::ReceiptPrinter;
use crate::state::SessionState;

/// Adds one unit of a product to the cart lines, merging with an existing line.
pub fn add_to_cart(session: &SessionState, mut items: Vec<InvoiceItem>, product_id: String) -> Result<Vec<InvoiceItem>, ApiError> {
    debug!(product_id = %product_id, "add_to_cart command");
    session.with_session(|s| -> Result<Vec<InvoiceItem>, ApiError> {
        let product = s.store().products().require(&product_id)?;
        add_product_line(&mut items, product);
        Ok(items)
    })
}

pub fn cart_total(items: Vec<InvoiceItem>) -> Money {
    items_total(&items)
}

/// Completes a sale and prints its slip.
///
/// Any unpaid remainder is booked to the customer's debt.
pub async fn checkout(
    session: &SessionState,
    backend: &MockBackend,
    printer: &dyn ReceiptPrinter,
    request: CheckoutRequest,
) -> Result<Committed, ApiError> {
    debug!(customer_id = %request.customer_id, lines = request.items.len(), "checkout command");

    let (sale, customer) = session.with_session_mut(|s| -> Result<_, ApiError> {
        let sale = RepairDesk::new(s).checkout(request)?;
        let customer = s.store().customers().get(&sale.invoice.customer_id).cloned();
        Ok((sale, customer))
    })?;

    if let Err(e) = printer.print(&sale.receipt) {
        warn!(id = %sale.invoice.id, error = %e, "Sale slip not printed");
    }

    mirror_invoice(backend, &sale.invoice, customer, true).await;
    Ok(sale)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::print::TextReceiptPrinter;
    use crate::state::ConfigState;
    use servicepro_core::{Customer, Warehouse};
    use servicepro_store::mirror::MirrorConfig;
    use servicepro_store::{SeedData, DEMO_PASSWORD};

    #[tokio::test]
    async fn test_checkout_books_remainder() {
        let mut seed = SeedData::demo();
        seed.customers.push(Customer {
            id: "c1".to_string(),
            name: "Anh Bình".to_string(),
            phone: String::new(),
            address: String::new(),
            balance: Money::zero(),
        });
        let session = SessionState::new(seed.clone());
        let backend = MockBackend::new(MirrorConfig::instant(), &seed);
        let printer = TextReceiptPrinter::new(ConfigState::default(), Vec::new());
        session.with_session_mut(|s| s.login("sales", DEMO_PASSWORD)).unwrap();

        let items = add_to_cart(&session, Vec::new(), "s1".to_string()).unwrap();
        let items = add_to_cart(&session, items, "s1".to_string()).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(cart_total(items.clone()).dong(), 300_000);

        let sale = checkout(
            &session,
            &backend,
            &printer,
            CheckoutRequest {
                customer_id: "c1".to_string(),
                warehouse: Warehouse::Tnc,
                items,
                paid: Money::from_dong(500_000),
                note: None,
            },
        )
        .await
        .unwrap();

        // Overpayment is not kept as credit.
        assert_eq!(sale.invoice.paid_amount.dong(), 300_000);
        let mirrored = backend.get_customers().await;
        assert_eq!(mirrored[0].balance, Money::zero());
        assert_eq!(backend.get_invoices().await.len(), 1);
    }

    #[test]
    fn test_unknown_product_is_not_found() {
        let session = SessionState::default();
        let err = add_to_cart(&session, Vec::new(), "p-404".to_string()).unwrap_err();
        assert_eq!(err.code, crate::error::ErrorCode::NotFound);
    }
}
