//! # Receipt Projection
//!
//! Render-agnostic view of a committed invoice, handed to whatever prints
//! it. Projection only reads; nothing flows back into the store.
//!
//! ```text
//! store.update_invoice(...) ──► committed Invoice ──► ReceiptDocument::project
//!                                                          │
//!                                                          ▼
//!                                                   ReceiptPrinter (desk)
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::invoice::{Invoice, RepairStatus};
use crate::ledger::Receivable;
use crate::money::Money;
use crate::types::{Customer, PaymentStatus};

/// Which slip is being printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReceiptKind {
    Sale,
    /// Handed to the customer when the device is received.
    RepairIntake,
    /// Handed over with the repaired device.
    RepairDelivery,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptLine {
    pub name: String,
    pub quantity: i64,
    pub unit_price: Money,
    pub line_total: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct DeviceSummary {
    pub device_name: String,
    pub serial: Option<String>,
    pub symptoms: String,
    pub diagnosis: Option<String>,
    pub accessories: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptDocument {
    pub kind: ReceiptKind,
    pub invoice_id: String,
    #[ts(as = "String")]
    pub date: DateTime<Utc>,
    /// Issuing company.
    pub company: String,
    pub customer_name: String,
    pub customer_phone: Option<String>,
    pub customer_address: Option<String>,
    pub lines: Vec<ReceiptLine>,
    pub total: Money,
    pub paid: Money,
    pub outstanding: Money,
    pub status: PaymentStatus,
    pub device: Option<DeviceSummary>,
    pub note: Option<String>,
}

impl ReceiptDocument {
    /// Projects a committed invoice.
    ///
    /// Customer contact details are taken from `customer` when given; the
    /// name always comes from the invoice, frozen at creation.
    pub fn project(invoice: &Invoice, customer: Option<&Customer>) -> Self {
        let kind = match invoice.repair_status() {
            None => ReceiptKind::Sale,
            Some(RepairStatus::Delivered) => ReceiptKind::RepairDelivery,
            Some(_) => ReceiptKind::RepairIntake,
        };

        let device = invoice.repair().map(|r| DeviceSummary {
            device_name: r.device_info.device_name.clone(),
            serial: r.device_info.serial.clone(),
            symptoms: r.device_info.symptoms.clone(),
            diagnosis: r.device_info.diagnosis.clone(),
            accessories: r.device_info.accessories.clone(),
        });

        let non_empty = |s: &str| (!s.trim().is_empty()).then(|| s.to_string());

        ReceiptDocument {
            kind,
            invoice_id: invoice.id.clone(),
            date: invoice.date,
            company: invoice.warehouse.display_name().to_string(),
            customer_name: invoice.customer_name.clone(),
            customer_phone: customer.and_then(|c| non_empty(&c.phone)),
            customer_address: customer.and_then(|c| non_empty(&c.address)),
            lines: invoice
                .items
                .iter()
                .map(|i| ReceiptLine {
                    name: i.product_name.clone(),
                    quantity: i.quantity,
                    unit_price: i.price,
                    line_total: i.line_total(),
                })
                .collect(),
            total: invoice.total_amount,
            paid: invoice.paid_amount,
            outstanding: invoice.outstanding(),
            status: invoice.status,
            device,
            note: invoice.note.clone(),
        }
    }
}
