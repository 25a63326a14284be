//! # VAT Invoices
//!
//! Red invoices issued to or received from other companies. They live
//! beside the shop's own records and are never reconciled against stock or
//! customer debt.
//!
//! ## Capture Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  PDF text / photo ──► document service ──► VatDraft (JSON)              │
//! │                                               │                         │
//! │  manual entry ────────────────────────────────┤                         │
//! │                                               ▼                         │
//! │                      VatForm ── recompute ──► VatTotals                 │
//! │                         │                                               │
//! │                         ▼ finalize (number + partner required)          │
//! │                      VatInvoice { status: PENDING }                     │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::CoreResult;
use crate::money::Money;
use crate::types::{TaxRate, Warehouse};
use crate::validation;

// =============================================================================
// Types
// =============================================================================

/// Input (purchase) or output (sale) invoice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VatDirection {
    In,
    Out,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VatStatus {
    Pending,
    /// Lines have been imported into inventory.
    Synced,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct VatInvoiceItem {
    pub product_name: String,
    pub unit: String,
    pub quantity: i64,
    pub unit_price: Money,
    /// `quantity × unit_price`, kept in step on every edit.
    pub total: Money,
}

impl VatInvoiceItem {
    fn recomputed(mut self) -> Self {
        self.total = self.unit_price.multiply_quantity(self.quantity);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct VatInvoice {
    pub id: String,
    pub invoice_number: String,
    #[ts(as = "String")]
    pub date: NaiveDate,
    pub partner_name: String,
    pub tax_code: String,
    pub items: Vec<VatInvoiceItem>,
    pub total_before_tax: Money,
    pub tax_rate: TaxRate,
    pub tax_amount: Money,
    pub total_amount: Money,
    pub direction: VatDirection,
    /// Which of the two companies the invoice belongs to.
    pub warehouse: Warehouse,
    pub status: VatStatus,
}

// =============================================================================
// Totals
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct VatTotals {
    pub total_before_tax: Money,
    pub tax_amount: Money,
    pub total_amount: Money,
}

impl VatTotals {
    /// Before-tax sum, rounded tax, and their sum.
    ///
    /// ```rust
    /// use servicepro_core::money::Money;
    /// use servicepro_core::types::TaxRate;
    /// use servicepro_core::vat::{VatInvoiceItem, VatTotals};
    ///
    /// let items = vec![VatInvoiceItem {
    ///     product_name: "Màn hình 24\"".into(),
    ///     unit: "Cái".into(),
    ///     quantity: 3,
    ///     unit_price: Money::from_dong(1_850_005),
    ///     total: Money::zero(),
    /// }];
    /// let totals = VatTotals::compute(&items, TaxRate::from_percent(8));
    /// assert_eq!(totals.total_before_tax.dong(), 5_550_015);
    /// assert_eq!(totals.tax_amount.dong(), 444_001);
    /// assert_eq!(totals.total_amount.dong(), 5_994_016);
    /// ```
    pub fn compute(items: &[VatInvoiceItem], rate: TaxRate) -> Self {
        let total_before_tax: Money = items
            .iter()
            .map(|i| i.unit_price.multiply_quantity(i.quantity))
            .sum();
        let tax_amount = total_before_tax.calculate_tax(rate);
        VatTotals {
            total_before_tax,
            tax_amount,
            total_amount: total_before_tax + tax_amount,
        }
    }
}

// =============================================================================
// Parsed Draft
// =============================================================================

/// One line as extracted by the document service.
///
/// Amounts arrive as plain JSON numbers, possibly with a fraction.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase", default)]
pub struct VatDraftItem {
    pub product_name: String,
    pub unit: String,
    pub quantity: f64,
    pub unit_price: f64,
}

impl From<VatDraftItem> for VatInvoiceItem {
    fn from(d: VatDraftItem) -> Self {
        VatInvoiceItem {
            product_name: d.product_name,
            unit: d.unit,
            quantity: d.quantity.round() as i64,
            unit_price: Money::from_dong(d.unit_price.round() as i64),
            total: Money::zero(),
        }
        .recomputed()
    }
}

/// Structured result of document extraction. Every field may be missing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase", default)]
pub struct VatDraft {
    pub invoice_number: Option<String>,
    pub date: Option<String>,
    pub partner_name: Option<String>,
    pub tax_code: Option<String>,
    /// Percent, e.g. `8`.
    pub tax_rate: Option<f64>,
    /// `"IN"` or `"OUT"`; anything else is ignored.
    #[serde(rename = "type")]
    pub direction: Option<String>,
    /// `"TNC"` or `"TAY_PHAT"`; anything else is ignored.
    pub internal_company: Option<String>,
    pub items: Option<Vec<VatDraftItem>>,
}

impl VatDraft {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    fn direction(&self) -> Option<VatDirection> {
        match self.direction.as_deref().map(str::trim) {
            Some("IN") => Some(VatDirection::In),
            Some("OUT") => Some(VatDirection::Out),
            _ => None,
        }
    }

    fn tax_rate(&self) -> TaxRate {
        match self.tax_rate {
            Some(pct) if pct > 0.0 => TaxRate::from_bps((pct * 100.0).round() as u32),
            _ => TaxRate::from_percent(crate::DEFAULT_VAT_PERCENT),
        }
    }
}

// =============================================================================
// Editable Form
// =============================================================================

/// A VAT invoice being created or edited.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct VatForm {
    /// Set when editing an existing invoice.
    pub editing_id: Option<String>,
    pub invoice_number: String,
    #[ts(as = "Option<String>")]
    pub date: Option<NaiveDate>,
    pub partner_name: String,
    pub tax_code: String,
    pub items: Vec<VatInvoiceItem>,
    pub tax_rate: TaxRate,
    pub direction: VatDirection,
    pub warehouse: Warehouse,
}

impl VatForm {
    /// Blank input-invoice form.
    pub fn new(warehouse: Warehouse, tax_rate: TaxRate) -> Self {
        VatForm {
            editing_id: None,
            invoice_number: String::new(),
            date: None,
            partner_name: String::new(),
            tax_code: String::new(),
            items: Vec::new(),
            tax_rate,
            direction: VatDirection::In,
            warehouse,
        }
    }

    /// Loads an existing invoice for editing.
    pub fn edit(invoice: &VatInvoice) -> Self {
        VatForm {
            editing_id: Some(invoice.id.clone()),
            invoice_number: invoice.invoice_number.clone(),
            date: Some(invoice.date),
            partner_name: invoice.partner_name.clone(),
            tax_code: invoice.tax_code.clone(),
            items: invoice.items.clone(),
            tax_rate: invoice.tax_rate,
            direction: invoice.direction,
            warehouse: invoice.warehouse,
        }
    }

    pub fn totals(&self) -> VatTotals {
        VatTotals::compute(&self.items, self.tax_rate)
    }

    pub fn add_item(&mut self) {
        self.items.push(VatInvoiceItem {
            quantity: 1,
            ..Default::default()
        });
    }

    /// Replaces line `index`, recomputing its total. Out of range is ignored.
    pub fn update_item(&mut self, index: usize, item: VatInvoiceItem) {
        if let Some(slot) = self.items.get_mut(index) {
            *slot = item.recomputed();
        }
    }

    pub fn remove_item(&mut self, index: usize) {
        if index < self.items.len() {
            self.items.remove(index);
        }
    }

    /// Overlays a parsed document onto the form.
    ///
    /// Direction and company are only taken when recognised. Header fields
    /// and lines are replaced; the tax rate falls back to the default when
    /// the document names none.
    pub fn apply_draft(&mut self, draft: VatDraft) {
        if let Some(direction) = draft.direction() {
            self.direction = direction;
        }
        if let Some(warehouse) = draft.internal_company.as_deref().and_then(Warehouse::from_code) {
            self.warehouse = warehouse;
        }
        self.tax_rate = draft.tax_rate();
        self.invoice_number = draft.invoice_number.unwrap_or_default();
        self.date = draft
            .date
            .as_deref()
            .and_then(|d| NaiveDate::parse_from_str(d.trim(), "%Y-%m-%d").ok());
        self.partner_name = draft.partner_name.unwrap_or_default();
        self.tax_code = draft.tax_code.unwrap_or_default();
        self.items = draft
            .items
            .unwrap_or_default()
            .into_iter()
            .map(VatInvoiceItem::from)
            .collect();
    }

    /// Builds the invoice to save.
    ///
    /// ## Rules
    /// - Invoice number and partner name are required
    /// - Date defaults to `today`
    /// - Saved invoices are `PENDING`, including edits
    pub fn finalize(&self, new_id: String, today: NaiveDate) -> CoreResult<VatInvoice> {
        validation::validate_required("invoice number", &self.invoice_number)?;
        validation::validate_required("partner name", &self.partner_name)?;
        validation::validate_tax_rate_bps(self.tax_rate.bps())?;

        let totals = self.totals();
        Ok(VatInvoice {
            id: self.editing_id.clone().unwrap_or(new_id),
            invoice_number: self.invoice_number.trim().to_string(),
            date: self.date.unwrap_or(today),
            partner_name: self.partner_name.trim().to_string(),
            tax_code: self.tax_code.trim().to_string(),
            items: self.items.iter().cloned().map(VatInvoiceItem::recomputed).collect(),
            total_before_tax: totals.total_before_tax,
            tax_rate: self.tax_rate,
            tax_amount: totals.tax_amount,
            total_amount: totals.total_amount,
            direction: self.direction,
            warehouse: self.warehouse,
            status: VatStatus::Pending,
        })
    }
}

// =============================================================================
// Filter
// =============================================================================

/// List filter. Empty search and `None` fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase", default)]
pub struct VatFilter {
    pub search: String,
    pub warehouse: Option<Warehouse>,
    pub direction: Option<VatDirection>,
    #[ts(as = "Option<String>")]
    pub from: Option<NaiveDate>,
    #[ts(as = "Option<String>")]
    pub to: Option<NaiveDate>,
}

impl VatFilter {
    pub fn matches(&self, invoice: &VatInvoice) -> bool {
        let needle = self.search.trim().to_lowercase();
        let matches_search = needle.is_empty()
            || invoice.invoice_number.to_lowercase().contains(&needle)
            || invoice.partner_name.to_lowercase().contains(&needle)
            || invoice.tax_code.to_lowercase().contains(&needle);

        matches_search
            && self.warehouse.map_or(true, |w| invoice.warehouse == w)
            && self.direction.map_or(true, |d| invoice.direction == d)
            && self.from.map_or(true, |from| invoice.date >= from)
            && self.to.map_or(true, |to| invoice.date <= to)
    }

    pub fn apply<'a>(&self, invoices: &'a [VatInvoice]) -> Vec<&'a VatInvoice> {
        invoices.iter().filter(|i| self.matches(i)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn item(qty: i64, price: i64) -> VatInvoiceItem {
        VatInvoiceItem {
            product_name: "Chuột không dây".to_string(),
            unit: "Cái".to_string(),
            quantity: qty,
            unit_price: Money::from_dong(price),
            total: Money::zero(),
        }
    }

    #[test]
    fn test_totals_round_tax() {
        let totals = VatTotals::compute(&[item(1, 15)], TaxRate::from_percent(10));
        // 1.5 rounds up
        assert_eq!(totals.tax_amount.dong(), 2);
        assert_eq!(totals.total_amount.dong(), 17);

        let empty = VatTotals::compute(&[], TaxRate::default());
        assert_eq!(empty.total_amount, Money::zero());
    }

    #[test]
    fn test_form_edits_recompute_line_totals() {
        let mut form = VatForm::new(Warehouse::TayPhat, TaxRate::default());
        form.add_item();
        assert_eq!(form.items[0].quantity, 1);

        form.update_item(0, item(4, 250_000));
        assert_eq!(form.items[0].total.dong(), 1_000_000);
        assert_eq!(form.totals().total_amount.dong(), 1_100_000);

        form.update_item(7, item(1, 1));
        form.remove_item(0);
        assert!(form.items.is_empty());
    }

    #[test]
    fn test_apply_draft() {
        let json = r#"{
            "invoiceNumber": "0001234",
            "date": "2024-05-02",
            "partnerName": "Công ty TNHH Minh Thông",
            "taxCode": "0312345678",
            "taxRate": 8,
            "type": "OUT",
            "internalCompany": "TNC",
            "items": [{"productName": "RAM 8GB", "unit": "Thanh", "quantity": 2, "unitPrice": 450000.0}]
        }"#;
        let mut form = VatForm::new(Warehouse::TayPhat, TaxRate::default());
        form.apply_draft(VatDraft::from_json(json).unwrap());

        assert_eq!(form.direction, VatDirection::Out);
        assert_eq!(form.warehouse, Warehouse::Tnc);
        assert_eq!(form.tax_rate.bps(), 800);
        assert_eq!(form.date, Some(date("2024-05-02")));
        assert_eq!(form.items[0].total.dong(), 900_000);
        assert_eq!(form.totals().tax_amount.dong(), 72_000);
    }

    #[test]
    fn test_apply_draft_keeps_unrecognised_direction_and_company() {
        let mut form = VatForm::new(Warehouse::Tnc, TaxRate::from_percent(8));
        form.direction = VatDirection::Out;
        form.apply_draft(VatDraft {
            direction: Some("PURCHASE".to_string()),
            internal_company: Some("OTHER".to_string()),
            ..Default::default()
        });

        assert_eq!(form.direction, VatDirection::Out);
        assert_eq!(form.warehouse, Warehouse::Tnc);
        assert_eq!(form.tax_rate.bps(), 1000);
        assert!(form.items.is_empty());
    }

    #[test]
    fn test_finalize_requires_number_and_partner() {
        let mut form = VatForm::new(Warehouse::TayPhat, TaxRate::default());
        let today = date("2024-06-01");
        assert!(form.finalize("VAT-1".into(), today).is_err());

        form.invoice_number = "0000099".to_string();
        assert!(form.finalize("VAT-1".into(), today).is_err());

        form.partner_name = "Công ty ABC".to_string();
        let invoice = form.finalize("VAT-1".into(), today).unwrap();
        assert_eq!(invoice.id, "VAT-1");
        assert_eq!(invoice.date, today);
        assert_eq!(invoice.status, VatStatus::Pending);
    }

    #[test]
    fn test_finalize_edit_keeps_id() {
        let mut form = VatForm::new(Warehouse::TayPhat, TaxRate::default());
        form.invoice_number = "0000099".to_string();
        form.partner_name = "Công ty ABC".to_string();
        let saved = form.finalize("VAT-1".into(), date("2024-06-01")).unwrap();

        let mut editing = VatForm::edit(&saved);
        editing.items.push(item(1, 100_000));
        let updated = editing.finalize("VAT-2".into(), date("2024-06-09")).unwrap();
        assert_eq!(updated.id, "VAT-1");
        assert_eq!(updated.date, date("2024-06-01"));
        assert_eq!(updated.total_amount.dong(), 110_000);
    }

    #[test]
    fn test_filter() {
        let mut form = VatForm::new(Warehouse::TayPhat, TaxRate::default());
        form.invoice_number = "0000099".to_string();
        form.partner_name = "Công ty ABC".to_string();
        form.tax_code = "0312345678".to_string();
        let a = form.finalize("VAT-1".into(), date("2024-06-01")).unwrap();

        form.invoice_number = "0000100".to_string();
        form.partner_name = "Điện máy Xanh".to_string();
        form.direction = VatDirection::Out;
        form.warehouse = Warehouse::Tnc;
        let b = form.finalize("VAT-2".into(), date("2024-06-20")).unwrap();

        let all = vec![a, b];
        let by_search = VatFilter { search: "abc".into(), ..Default::default() };
        assert_eq!(by_search.apply(&all).len(), 1);

        let by_tax_code = VatFilter { search: "031234".into(), ..Default::default() };
        assert_eq!(by_tax_code.apply(&all).len(), 2);

        let by_kind = VatFilter {
            direction: Some(VatDirection::Out),
            warehouse: Some(Warehouse::Tnc),
            ..Default::default()
        };
        assert_eq!(by_kind.apply(&all)[0].id, "VAT-2");

        let by_date = VatFilter {
            from: Some(date("2024-06-01")),
            to: Some(date("2024-06-01")),
            ..Default::default()
        };
        assert_eq!(by_date.apply(&all)[0].id, "VAT-1");
        assert_eq!(by_date.apply(&all).len(), 1);
    }
}
