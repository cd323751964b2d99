//! # Receipt Document Generator
//!
//! Turns a sale (fresh or historical) into a fixed-width, paginated
//! text document. Pure functions, no I/O: the UI shell hands the pages
//! to whatever renders fixed-width text blocks (thermal printer, PDF
//! writer, preview pane).
//!
//! ## Layout Contract
//! ```text
//! ┌──────────────────────────────────────────┐ 42 chars (~80mm stock)
//! │               Chai Khana                 │ centered header
//! │            14-A Mall Road                │
//! │            Tel: 042-1234567              │
//! │      Date: 2026-03-14   Time: 09:26      │
//! │              Receipt #: 7                │
//! │------------------------------------------│ rule
//! │Item                 Qty             Price│ column headings
//! │Tea                 3 item        PKR 6.00│ name / qty+unit / value
//! │Basmati Rice        0.5 kg        PKR 1.25│
//! │------------------------------------------│ rule
//! │Total                             PKR 7.25│
//! │------------------------------------------│ rule
//! │       Thank you for your business!       │ footer, wrapped
//! └──────────────────────────────────────────┘
//! ```
//!
//! The line value column carries the **extended** price (unit price ×
//! quantity), already computed by the caller; this generator never does
//! money math beyond formatting.

use serde::{Deserialize, Serialize};

use crate::money::Money;
use crate::types::{SaleLine, Settings, Transaction};

// =============================================================================
// Page Geometry
// =============================================================================

/// Characters per row on 80mm thermal stock. Reused as-is when the
/// document is placed on an A4 page by the external renderer.
pub const PAGE_WIDTH: usize = 42;

/// Text rows per page block. Continuous thermal stock consumes pages
/// back to back; cut-sheet output breaks between them.
pub const PAGE_LINES: usize = 48;

/// Column budget for the item name; longer names are cut with an
/// ellipsis so the quantity and value columns stay aligned.
const NAME_WIDTH: usize = 18;
const QTY_WIDTH: usize = 10;
const VALUE_WIDTH: usize = 14;

// =============================================================================
// Input Shapes
// =============================================================================

/// Store identity block at the top of the receipt.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReceiptHeader {
    pub restaurant_name: String,
    pub address: Option<String>,
    pub phone: Option<String>,
    /// Opaque image bytes, passed through to the external renderer.
    pub logo: Option<Vec<u8>>,
}

impl ReceiptHeader {
    /// Builds the header block from the store settings record.
    pub fn from_settings(settings: &Settings) -> Self {
        ReceiptHeader {
            restaurant_name: settings.restaurant_name.clone(),
            address: settings.address.clone(),
            phone: settings.phone.clone(),
            logo: settings.logo.clone(),
        }
    }
}

/// One printable item row. Both a pre-commit preview and a reloaded
/// historical transaction normalize to this shape before rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReceiptLine {
    pub name: String,
    pub quantity: f64,
    pub unit: String,
    /// Extended line value (unit price × quantity) in cents.
    pub value_cents: i64,
}

impl From<&SaleLine> for ReceiptLine {
    fn from(line: &SaleLine) -> Self {
        ReceiptLine {
            name: line.product_name.clone(),
            quantity: line.quantity,
            unit: line.unit.clone(),
            value_cents: line.subtotal_cents,
        }
    }
}

/// A fully-resolved receipt, ready to lay out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Receipt {
    pub header: ReceiptHeader,
    pub lines: Vec<ReceiptLine>,
    pub total_cents: i64,
    pub currency: String,
    pub receipt_number: String,
    pub date: String,
    pub time: String,
    pub footer: Option<String>,
}

impl Receipt {
    /// Normalizes a historical transaction for reprinting.
    ///
    /// The sale id doubles as the receipt number; the commit timestamp
    /// supplies date and time.
    pub fn from_transaction(tx: &Transaction, settings: &Settings) -> Self {
        Receipt {
            header: ReceiptHeader::from_settings(settings),
            lines: tx.items.iter().map(ReceiptLine::from).collect(),
            total_cents: tx.total_cents,
            currency: tx.currency.clone(),
            receipt_number: tx.id.to_string(),
            date: tx.date(),
            time: tx.time(),
            footer: settings.receipt_footer.clone(),
        }
    }
}

// =============================================================================
// Output Shape
// =============================================================================

/// One page of fixed-width text rows, each at most [`PAGE_WIDTH`] chars.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    pub lines: Vec<String>,
}

/// The rendered document. The logo travels beside the text because the
/// text grid cannot carry pixels; the external renderer places it above
/// the first page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub width: usize,
    pub pages: Vec<Page>,
    pub logo: Option<Vec<u8>>,
}

impl Document {
    /// Total printable rows across all pages.
    pub fn line_count(&self) -> usize {
        self.pages.iter().map(|p| p.lines.len()).sum()
    }
}

// =============================================================================
// Rendering
// =============================================================================

/// Lays out a receipt as a fixed-width, paginated document.
///
/// Deterministic: same receipt in, same pages out. The row order is
/// header block, rule, column headings, item rows, rule, total row,
/// then (when a footer exists) rule and the wrapped footer.
pub fn render_receipt(receipt: &Receipt) -> Document {
    let mut rows: Vec<String> = Vec::new();

    // Header block, centered.
    rows.push(center(&receipt.header.restaurant_name));
    if let Some(address) = receipt.header.address.as_deref() {
        for wrapped in wrap(address, PAGE_WIDTH) {
            rows.push(center(&wrapped));
        }
    }
    if let Some(phone) = receipt.header.phone.as_deref() {
        rows.push(center(&format!("Tel: {phone}")));
    }
    rows.push(center(&format!(
        "Date: {}   Time: {}",
        receipt.date, receipt.time
    )));
    rows.push(center(&format!("Receipt #: {}", receipt.receipt_number)));

    // Item block.
    rows.push(rule());
    rows.push(columns("Item", "Qty", "Price"));
    for line in &receipt.lines {
        rows.push(item_row(line, &receipt.currency));
    }

    // Total block.
    rows.push(rule());
    let total = Money::from_cents(receipt.total_cents).with_currency(&receipt.currency);
    rows.push(format!(
        "{:<left$}{:>right$}",
        "Total",
        total,
        left = PAGE_WIDTH - VALUE_WIDTH,
        right = VALUE_WIDTH
    ));

    // Footer block.
    if let Some(footer) = receipt.footer.as_deref() {
        if !footer.trim().is_empty() {
            rows.push(rule());
            for wrapped in wrap(footer, PAGE_WIDTH) {
                rows.push(center(&wrapped));
            }
        }
    }

    Document {
        width: PAGE_WIDTH,
        pages: paginate(rows),
        logo: receipt.header.logo.clone(),
    }
}

/// Splits the row stream into pages of at most [`PAGE_LINES`] rows.
fn paginate(rows: Vec<String>) -> Vec<Page> {
    let mut pages = Vec::new();
    let mut remaining = rows.as_slice();

    loop {
        let consumed = remaining.len().min(PAGE_LINES);
        pages.push(Page {
            lines: remaining[..consumed].to_vec(),
        });
        remaining = &remaining[consumed..];
        if remaining.is_empty() {
            break;
        }
    }

    pages
}

/// Formats one three-column item row: name / quantity+unit / value.
fn item_row(line: &ReceiptLine, currency: &str) -> String {
    let name = truncate(&line.name, NAME_WIDTH);
    let qty = truncate(
        &format!("{} {}", format_quantity(line.quantity), line.unit),
        QTY_WIDTH,
    );
    let value = Money::from_cents(line.value_cents).with_currency(currency);

    columns(&name, &qty, &value)
}

/// Lays out the three item columns: left / center / right aligned.
fn columns(name: &str, qty: &str, value: &str) -> String {
    format!(
        "{:<nw$}{:^qw$}{:>vw$}",
        name,
        qty,
        value,
        nw = NAME_WIDTH,
        qw = QTY_WIDTH,
        vw = VALUE_WIDTH
    )
}

/// Horizontal rule separating receipt blocks.
fn rule() -> String {
    "-".repeat(PAGE_WIDTH)
}

/// Centers a row within the page width.
fn center(text: &str) -> String {
    format!("{:^width$}", text, width = PAGE_WIDTH)
        .trim_end()
        .to_string()
}

/// Cuts text to a character budget, marking the cut with an ellipsis.
fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }

    let mut cut: String = text.chars().take(width.saturating_sub(1)).collect();
    cut.push('…');
    cut
}

/// Quantities print without a trailing ".0": 3, not 3.0; 0.5 stays 0.5.
fn format_quantity(quantity: f64) -> String {
    if (quantity - quantity.round()).abs() < 1e-9 {
        format!("{}", quantity.round() as i64)
    } else {
        format!("{quantity}")
    }
}

/// Greedy word wrap for the free-text header/footer rows.
fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut out = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        if current.is_empty() {
            current = word.to_string();
        } else if current.chars().count() + 1 + word.chars().count() <= width {
            current.push(' ');
            current.push_str(word);
        } else {
            out.push(std::mem::take(&mut current));
            current = word.to_string();
        }
    }

    if !current.is_empty() {
        out.push(current);
    }

    out
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn tea_receipt() -> Receipt {
        Receipt {
            header: ReceiptHeader {
                restaurant_name: "Chai Khana".to_string(),
                address: Some("14-A Mall Road".to_string()),
                phone: Some("042-1234567".to_string()),
                logo: None,
            },
            lines: vec![ReceiptLine {
                name: "Tea".to_string(),
                quantity: 3.0,
                unit: "item".to_string(),
                value_cents: 600,
            }],
            total_cents: 600,
            currency: "PKR".to_string(),
            receipt_number: "7".to_string(),
            date: "2026-03-14".to_string(),
            time: "09:26".to_string(),
            footer: Some("Thank you for your business!".to_string()),
        }
    }

    fn all_lines(doc: &Document) -> Vec<String> {
        doc.pages.iter().flat_map(|p| p.lines.clone()).collect()
    }

    #[test]
    fn test_single_line_receipt() {
        let doc = render_receipt(&tea_receipt());
        let lines = all_lines(&doc);

        let item = lines
            .iter()
            .find(|l| l.contains("Tea") && !l.contains("Total"))
            .expect("item row present");
        assert!(item.contains("3 item"));
        assert!(item.contains("PKR 6.00"));

        let total = lines
            .iter()
            .find(|l| l.starts_with("Total"))
            .expect("total row present");
        assert!(total.ends_with("PKR 6.00"));
    }

    #[test]
    fn test_rows_fit_page_width() {
        let doc = render_receipt(&tea_receipt());
        for line in all_lines(&doc) {
            assert!(
                line.chars().count() <= PAGE_WIDTH,
                "row overflows: {line:?}"
            );
        }
    }

    #[test]
    fn test_header_and_rules() {
        let doc = render_receipt(&tea_receipt());
        let lines = all_lines(&doc);

        assert!(lines[0].contains("Chai Khana"));
        assert!(lines.iter().any(|l| l.contains("Tel: 042-1234567")));
        assert!(lines.iter().any(|l| l.contains("Receipt #: 7")));

        // Rules fence the item block, the total, and the footer.
        let rules = lines.iter().filter(|l| l.as_str() == rule()).count();
        assert_eq!(rules, 3);

        assert!(lines
            .iter()
            .any(|l| l.contains("Thank you for your business!")));
    }

    #[test]
    fn test_footer_omitted_when_absent() {
        let mut receipt = tea_receipt();
        receipt.footer = None;
        let lines = all_lines(&render_receipt(&receipt));

        let rules = lines.iter().filter(|l| l.as_str() == rule()).count();
        assert_eq!(rules, 2);
    }

    #[test]
    fn test_long_name_truncated_with_ellipsis() {
        let mut receipt = tea_receipt();
        receipt.lines[0].name = "Extra Long Chicken Biryani Family Platter".to_string();

        let lines = all_lines(&render_receipt(&receipt));
        let item = lines
            .iter()
            .find(|l| l.contains('…'))
            .expect("truncated row present");
        assert!(item.contains("PKR 6.00"));
        assert!(item.chars().count() <= PAGE_WIDTH);
    }

    #[test]
    fn test_half_quantity_formatting() {
        let mut receipt = tea_receipt();
        receipt.lines[0].quantity = 0.5;
        receipt.lines[0].unit = "kg".to_string();

        let lines = all_lines(&render_receipt(&receipt));
        assert!(lines.iter().any(|l| l.contains("0.5 kg")));
    }

    #[test]
    fn test_pagination_long_receipt() {
        let mut receipt = tea_receipt();
        receipt.lines = (0..120)
            .map(|i| ReceiptLine {
                name: format!("Item {i}"),
                quantity: 1.0,
                unit: "item".to_string(),
                value_cents: 100,
            })
            .collect();

        let doc = render_receipt(&receipt);
        assert!(doc.pages.len() > 1);
        for page in &doc.pages {
            assert!(page.lines.len() <= PAGE_LINES);
        }
        // Nothing dropped between pages.
        assert!(doc.line_count() >= 120);
    }

    #[test]
    fn test_from_transaction_normalizes() {
        let settings = Settings {
            restaurant_name: "Chai Khana".to_string(),
            currency: "PKR".to_string(),
            receipt_footer: Some("Come again!".to_string()),
            ..Default::default()
        };
        let tx = Transaction {
            id: 42,
            total_cents: 600,
            currency: "PKR".to_string(),
            created_at: Utc.with_ymd_and_hms(2026, 3, 14, 9, 26, 0).unwrap(),
            items: vec![SaleLine {
                id: 1,
                sale_id: 42,
                product_name: "Tea".to_string(),
                unit_price_cents: 200,
                quantity: 3.0,
                unit: "item".to_string(),
                subtotal_cents: 600,
            }],
        };

        let receipt = Receipt::from_transaction(&tx, &settings);
        assert_eq!(receipt.receipt_number, "42");
        assert_eq!(receipt.date, "2026-03-14");
        assert_eq!(receipt.lines.len(), 1);
        assert_eq!(receipt.lines[0].value_cents, 600);

        let doc = render_receipt(&receipt);
        assert!(all_lines(&doc).iter().any(|l| l.contains("Come again!")));
    }

    #[test]
    fn test_document_is_deterministic() {
        let receipt = tea_receipt();
        assert_eq!(render_receipt(&receipt), render_receipt(&receipt));
    }
}
