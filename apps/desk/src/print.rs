//! # Receipt Printing
//!
//! Sink for [`ReceiptDocument`]s. Printing only reads the document; a
//! failed print never touches the committed record.
//!
//! ```text
//! ┌──────────────────────────────────────────┐
//! │ Giải pháp Tây Phát                       │
//! │ PHIẾU BÀN GIAO           REP-9f3…        │
//! │ Khách: Anh Tuấn  0912345678              │
//! │ Thiết bị: Dell Latitude 7490             │
//! │ ──────────────────────────────────────── │
//! │ Dịch vụ Cài Win x2          300.000 ₫    │
//! │ ──────────────────────────────────────── │
//! │ Tổng cộng                   300.000 ₫    │
//! │ Đã trả                      300.000 ₫    │
//! │ Còn nợ                            0 ₫    │
//! └──────────────────────────────────────────┘
//! ```

use std::io::Write;
use std::sync::Mutex;

use thiserror::Error;
use tracing::debug;

use servicepro_core::receipt::{ReceiptDocument, ReceiptKind};

use crate::state::ConfigState;

#[derive(Debug, Error)]
pub enum PrintError {
    #[error("Printer write failed: {0}")]
    Io(#[from] std::io::Error),
}

pub trait ReceiptPrinter: Send + Sync {
    fn print(&self, receipt: &ReceiptDocument) -> Result<(), PrintError>;
}

const WIDTH: usize = 42;

/// Plain-text slip written to any `Write` sink (a spool file, a serial
/// port, a buffer in tests).
pub struct TextReceiptPrinter<W: Write + Send> {
    config: ConfigState,
    out: Mutex<W>,
}

impl<W: Write + Send> TextReceiptPrinter<W> {
    pub fn new(config: ConfigState, out: W) -> Self {
        TextReceiptPrinter {
            config,
            out: Mutex::new(out),
        }
    }

    pub fn into_inner(self) -> W {
        self.out.into_inner().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Lays out the slip as lines of at most [`WIDTH`] columns.
    pub fn render(&self, receipt: &ReceiptDocument) -> Vec<String> {
        let money = |m: servicepro_core::Money| self.config.format_currency(m.dong());
        let rule = "-".repeat(WIDTH);
        let title = match receipt.kind {
            ReceiptKind::Sale => "HÓA ĐƠN BÁN HÀNG",
            ReceiptKind::RepairIntake => "PHIẾU TIẾP NHẬN",
            ReceiptKind::RepairDelivery => "PHIẾU BÀN GIAO",
        };

        let mut lines = vec![receipt.company.clone()];
        lines.extend(self.config.shop_address.iter().cloned());
        lines.push(two_columns(title, &receipt.invoice_id));
        lines.push(receipt.date.format("%d/%m/%Y %H:%M").to_string());

        let mut customer = format!("Khách: {}", receipt.customer_name);
        if let Some(phone) = &receipt.customer_phone {
            customer.push_str("  ");
            customer.push_str(phone);
        }
        lines.push(customer);

        if let Some(device) = &receipt.device {
            lines.push(format!("Thiết bị: {}", device.device_name));
            if let Some(serial) = &device.serial {
                lines.push(format!("Serial: {}", serial));
            }
            lines.push(format!("Tình trạng: {}", device.symptoms));
            if let Some(diagnosis) = &device.diagnosis {
                lines.push(format!("Chẩn đoán: {}", diagnosis));
            }
            if let Some(accessories) = &device.accessories {
                lines.push(format!("Phụ kiện: {}", accessories));
            }
        }

        if !receipt.lines.is_empty() {
            lines.push(rule.clone());
            for line in &receipt.lines {
                lines.push(two_columns(
                    &format!("{} x{}", line.name, line.quantity),
                    &money(line.line_total),
                ));
            }
        }

        lines.push(rule);
        lines.push(two_columns("Tổng cộng", &money(receipt.total)));
        if receipt.kind != ReceiptKind::RepairIntake {
            lines.push(two_columns("Đã trả", &money(receipt.paid)));
            lines.push(two_columns("Còn nợ", &money(receipt.outstanding)));
        }
        if let Some(note) = &receipt.note {
            lines.push(format!("Ghi chú: {}", note));
        }
        lines
    }
}

impl<W: Write + Send> ReceiptPrinter for TextReceiptPrinter<W> {
    fn print(&self, receipt: &ReceiptDocument) -> Result<(), PrintError> {
        let lines = self.render(receipt);
        let mut out = self.out.lock().expect("Printer mutex poisoned");
        for line in &lines {
            writeln!(out, "{}", line)?;
        }
        writeln!(out)?;
        out.flush()?;

        debug!(invoice_id = %receipt.invoice_id, kind = ?receipt.kind, lines = lines.len(), "Receipt printed");
        Ok(())
    }
}

fn two_columns(left: &str, right: &str) -> String {
    let used = left.chars().count() + right.chars().count();
    let gap = WIDTH.saturating_sub(used).max(1);
    format!("{}{}{}", left, " ".repeat(gap), right)
}
