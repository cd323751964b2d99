//! # Domain Types
//!
//! Core domain types used throughout Mezban POS.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                │
//! │                                                                     │
//! │  ┌───────────────┐   ┌────────────────┐   ┌────────────────┐       │
//! │  │   Product     │   │     Sale       │   │   SaleLine     │       │
//! │  │ ───────────── │   │ ─────────────  │   │ ─────────────  │       │
//! │  │ id (rowid)    │   │ id (rowid)     │   │ sale_id (FK)   │       │
//! │  │ name (unique) │   │ total_cents    │   │ product_name   │       │
//! │  │ price_cents   │   │ currency       │   │ quantity, unit │       │
//! │  │ unit          │   │ created_at     │   │ subtotal_cents │       │
//! │  └───────────────┘   └────────────────┘   └────────────────┘       │
//! │                                                                     │
//! │  Settings (singleton, id = 1) · Analytics view types (derived)     │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Snapshot Pattern
//! A [`SaleLine`] captures the product **name and price as text/cents at
//! the time of sale**, never a foreign key into the catalog. Renaming or
//! deleting a product must not rewrite history. This is intentional; do
//! not "normalize" it away.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::money::Money;

// =============================================================================
// Product
// =============================================================================

/// A catalog entry available for sale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Product {
    /// Store-assigned identifier (monotonic rowid).
    pub id: i64,

    /// Display name, unique case-insensitively within the catalog.
    pub name: String,

    /// Unit price in cents.
    pub price_cents: i64,

    /// Unit label shown next to quantities ("item", "kg", "litre", ...).
    pub unit: String,

    /// When the product was created.
    pub created_at: DateTime<Utc>,
}

impl Product {
    /// Returns the price as a Money type.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }
}

/// Input for creating a catalog entry; the store assigns the id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewProduct {
    pub name: String,
    pub price_cents: i64,
    pub unit: String,
}

// =============================================================================
// Settings
// =============================================================================

/// The store-wide settings record.
///
/// Exactly one row exists (id fixed at 1, seeded on first startup) and it
/// is always saved as a whole record, never patched field by field.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Settings {
    pub restaurant_name: String,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,

    /// Tax rate as a percentage, 0-100. Informational; kept on the
    /// record for the UI shell, not applied by the recorder.
    pub tax_rate: Option<f64>,

    /// ISO-like 3-letter currency tag, e.g. "PKR".
    pub currency: String,

    /// Opening time "HH:MM"; must precede `closing_time` when both set.
    pub opening_time: Option<String>,
    pub closing_time: Option<String>,

    pub receipt_footer: Option<String>,

    /// Raw logo bytes. Stored as a BLOB; crosses the UI boundary as a
    /// base64 string (see the serde attribute).
    #[serde(with = "base64_bytes", default)]
    pub logo: Option<Vec<u8>>,
}

/// Serde codec for optional binary attachments: raw bytes in memory and
/// storage, base64 text on the wire.
mod base64_bytes {
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(bytes: &Option<Vec<u8>>, ser: S) -> Result<S::Ok, S::Error> {
        bytes.as_ref().map(|b| STANDARD.encode(b)).serialize(ser)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(de: D) -> Result<Option<Vec<u8>>, D::Error> {
        let encoded: Option<String> = Option::deserialize(de)?;
        encoded
            .map(|s| STANDARD.decode(s.as_bytes()))
            .transpose()
            .map_err(serde::de::Error::custom)
    }
}

// =============================================================================
// Sales
// =============================================================================

/// One line of a sale as submitted by the caller.
///
/// The subtotal and sale total are NEVER taken from here; the recorder
/// recomputes both before committing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewSaleLine {
    /// Product name snapshot (free text, usually copied from the catalog).
    pub name: String,
    /// Unit price in cents at the time of sale.
    pub unit_price_cents: i64,
    /// Quantity sold; whole steps for `item` units, half steps otherwise.
    pub quantity: f64,
    /// Unit label snapshot.
    pub unit: String,
}

impl NewSaleLine {
    /// Line extension: unit price × quantity, rounded half-up to a cent.
    #[inline]
    pub fn subtotal(&self) -> Money {
        Money::from_cents(self.unit_price_cents).extend(self.quantity)
    }
}

/// A committed sale header row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Sale {
    /// Store-assigned id; doubles as the default receipt number.
    pub id: i64,
    pub total_cents: i64,
    pub currency: String,
    /// Store-assigned commit timestamp (never client-supplied).
    pub created_at: DateTime<Utc>,
}

impl Sale {
    /// Returns the total as Money.
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }
}

/// A persisted line item, owned by exactly one sale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct SaleLine {
    pub id: i64,
    pub sale_id: i64,
    /// Product name at time of sale (frozen text, not a catalog FK).
    pub product_name: String,
    /// Unit price in cents at time of sale (frozen).
    pub unit_price_cents: i64,
    pub quantity: f64,
    pub unit: String,
    /// Line extension (unit price × quantity) in cents.
    pub subtotal_cents: i64,
}

impl SaleLine {
    /// Returns the unit price as Money.
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_cents(self.unit_price_cents)
    }

    /// Returns the line subtotal as Money.
    #[inline]
    pub fn subtotal(&self) -> Money {
        Money::from_cents(self.subtotal_cents)
    }
}

/// A sale joined with its line items, as the transactions screen and the
/// receipt reprint path consume it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: i64,
    pub total_cents: i64,
    pub currency: String,
    pub created_at: DateTime<Utc>,
    pub items: Vec<SaleLine>,
}

impl Transaction {
    /// Calendar date portion of the commit timestamp ("YYYY-MM-DD").
    pub fn date(&self) -> String {
        self.created_at.format("%Y-%m-%d").to_string()
    }

    /// Clock portion of the commit timestamp ("HH:MM").
    pub fn time(&self) -> String {
        self.created_at.format("%H:%M").to_string()
    }

    /// Returns the total as Money.
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }
}

// =============================================================================
// Analytics View Types
// =============================================================================
// Derived, never persisted. The analytics repository aggregates the sale
// history into these shapes; the UI shell charts them as-is.

/// Revenue and order count for one observed calendar date.
///
/// Dates with zero sales are not synthesized; charting callers treat
/// gaps as zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct DailyRevenue {
    pub date: NaiveDate,
    pub revenue_cents: i64,
    pub orders: i64,
}

/// One product's all-history sales weight, for the top-5 table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct TopProduct {
    pub name: String,
    /// Σ quantity across matching sale lines.
    pub sales: f64,
    pub revenue_cents: i64,
}

/// One product's share of total quantity, for the distribution chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct ProductShare {
    pub name: String,
    /// Σ quantity across matching sale lines.
    pub value: f64,
}

/// Whole-window totals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsSummary {
    pub total_orders: i64,
    pub total_revenue_cents: i64,
    /// total_revenue / total_orders, rounded to a cent.
    /// Defined as 0 when there are no orders - never NaN.
    pub average_order_value_cents: i64,
}

/// The full computed analytics view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsSnapshot {
    pub daily_revenue: Vec<DailyRevenue>,
    pub top_products: Vec<TopProduct>,
    pub product_distribution: Vec<ProductShare>,
    pub summary: AnalyticsSummary,
}

// =============================================================================
// Date Range
// =============================================================================

/// Inclusive calendar-date window bounding an analytics or transaction
/// query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    /// A window of `days` calendar days ending at `end` (inclusive).
    ///
    /// `last_days(today, 7)` is the default daily-revenue window: today
    /// and the six days before it.
    pub fn last_days(end: NaiveDate, days: u32) -> Self {
        let span = chrono::Days::new(days.saturating_sub(1) as u64);
        let start = end.checked_sub_days(span).unwrap_or(end);
        DateRange { start, end }
    }

    /// Whether a date falls inside the window.
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_new_sale_line_subtotal() {
        let line = NewSaleLine {
            name: "Tea".to_string(),
            unit_price_cents: 200,
            quantity: 3.0,
            unit: "item".to_string(),
        };
        assert_eq!(line.subtotal().cents(), 600);
    }

    #[test]
    fn test_transaction_date_time_split() {
        let tx = Transaction {
            id: 7,
            total_cents: 600,
            currency: "PKR".to_string(),
            created_at: Utc.with_ymd_and_hms(2026, 3, 14, 9, 26, 53).unwrap(),
            items: Vec::new(),
        };
        assert_eq!(tx.date(), "2026-03-14");
        assert_eq!(tx.time(), "09:26");
    }

    #[test]
    fn test_date_range_last_days() {
        let end = NaiveDate::from_ymd_opt(2026, 3, 14).unwrap();
        let range = DateRange::last_days(end, 7);
        assert_eq!(range.start, NaiveDate::from_ymd_opt(2026, 3, 8).unwrap());
        assert!(range.contains(end));
        assert!(range.contains(range.start));
        assert!(!range.contains(NaiveDate::from_ymd_opt(2026, 3, 7).unwrap()));
    }

    #[test]
    fn test_settings_logo_round_trips_as_base64() {
        let settings = Settings {
            restaurant_name: "Chai Khana".to_string(),
            currency: "PKR".to_string(),
            logo: Some(vec![0x89, 0x50, 0x4e, 0x47]),
            ..Default::default()
        };

        let json = serde_json::to_value(&settings).unwrap();
        assert_eq!(json["logo"], "iVBORw==");

        let back: Settings = serde_json::from_value(json).unwrap();
        assert_eq!(back.logo, settings.logo);
    }

    #[test]
    fn test_settings_logo_absent() {
        let json = serde_json::json!({
            "restaurant_name": "Chai Khana",
            "address": null,
            "phone": null,
            "email": null,
            "tax_rate": null,
            "currency": "PKR",
            "opening_time": null,
            "closing_time": null,
            "receipt_footer": null
        });
        let settings: Settings = serde_json::from_value(json).unwrap();
        assert!(settings.logo.is_none());
    }
}
