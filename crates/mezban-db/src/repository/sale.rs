//! # Sale Repository
//!
//! Atomic sale recording and transaction history.
//!
//! ## Recording Sequence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                     record(lines, currency)                         │
//! │                                                                     │
//! │  1. VALIDATE                                                        │
//! │     └── non-empty, every line name/price/quantity checked           │
//! │                                                                     │
//! │  2. RECOMPUTE                                                       │
//! │     └── every subtotal and the total derived server-side;           │
//! │         a client-supplied total is never trusted                    │
//! │                                                                     │
//! │  3. ONE TRANSACTION                                                 │
//! │     ├── INSERT sales row (store-assigned timestamp)                 │
//! │     ├── INSERT each sale_items row                                  │
//! │     └── COMMIT ─ or the whole sale vanishes                         │
//! │                                                                     │
//! │  A half-written sale (lines without a parent, or a total that       │
//! │  disagrees with its lines) corrupts every downstream analytic,      │
//! │  so partial writes must never be observable.                        │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::HashMap;

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::{db_err, StoreError, StoreResult};
use mezban_core::validation::{validate_currency, validate_sale_lines};
use mezban_core::{DateRange, Money, NewSaleLine, Sale, SaleLine, Transaction};

/// Repository for sale database operations.
#[derive(Debug, Clone)]
pub struct SaleRepository {
    pool: SqlitePool,
}

impl SaleRepository {
    /// Creates a new SaleRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SaleRepository { pool }
    }

    /// Records a sale and its line items as one atomic unit.
    ///
    /// Returns the assigned sale id, which the caller uses as the
    /// default receipt number.
    pub async fn record(&self, lines: &[NewSaleLine], currency: &str) -> StoreResult<i64> {
        validate_sale_lines(lines)?;
        validate_currency(currency)?;

        // Server-side money math. The rows below are written from these
        // values and nothing else.
        let subtotals: Vec<Money> = lines.iter().map(NewSaleLine::subtotal).collect();
        let total: Money = subtotals.iter().copied().sum();

        // Abort rather than persist a header that disagrees with its
        // lines. Never silently corrected.
        let line_sum: i64 = subtotals.iter().map(Money::cents).sum();
        if line_sum != total.cents() {
            return Err(StoreError::Integrity {
                total_cents: total.cents(),
                line_sum_cents: line_sum,
            });
        }

        let now = Utc::now();

        let mut tx = self.pool.begin().await.map_err(db_err("record_sale"))?;

        let result = sqlx::query(
            r#"
            INSERT INTO sales (total_cents, currency, created_at)
            VALUES (?1, ?2, ?3)
            "#,
        )
        .bind(total.cents())
        .bind(currency)
        .bind(now)
        .execute(&mut *tx)
        .await
        .map_err(db_err("record_sale"))?;

        let sale_id = result.last_insert_rowid();

        for (line, subtotal) in lines.iter().zip(&subtotals) {
            sqlx::query(
                r#"
                INSERT INTO sale_items (
                    sale_id, product_name, unit_price_cents,
                    quantity, unit, subtotal_cents
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                "#,
            )
            .bind(sale_id)
            .bind(line.name.trim())
            .bind(line.unit_price_cents)
            .bind(line.quantity)
            .bind(&line.unit)
            .bind(subtotal.cents())
            .execute(&mut *tx)
            .await
            .map_err(db_err("record_sale"))?;
        }

        tx.commit().await.map_err(db_err("record_sale"))?;

        info!(
            sale_id,
            total_cents = total.cents(),
            lines = lines.len(),
            "Sale recorded"
        );

        Ok(sale_id)
    }

    /// Loads sales with their line items, newest first.
    ///
    /// `range` bounds the commit date (inclusive calendar days); `None`
    /// returns the full ledger.
    pub async fn get_transactions(
        &self,
        range: Option<DateRange>,
    ) -> StoreResult<Vec<Transaction>> {
        let sales: Vec<Sale> = if let Some(range) = range {
            sqlx::query_as::<_, Sale>(
                r#"
                SELECT id, total_cents, currency, created_at
                FROM sales
                WHERE DATE(created_at) BETWEEN ?1 AND ?2
                ORDER BY id DESC
                "#,
            )
            .bind(range.start)
            .bind(range.end)
            .fetch_all(&self.pool)
            .await
        } else {
            sqlx::query_as::<_, Sale>(
                r#"
                SELECT id, total_cents, currency, created_at
                FROM sales
                ORDER BY id DESC
                "#,
            )
            .fetch_all(&self.pool)
            .await
        }
        .map_err(db_err("get_transactions"))?;

        if sales.is_empty() {
            return Ok(Vec::new());
        }

        // One pass over all matching line items, grouped in memory,
        // instead of a query per sale.
        let lines: Vec<SaleLine> = if let Some(range) = range {
            sqlx::query_as::<_, SaleLine>(
                r#"
                SELECT si.id, si.sale_id, si.product_name,
                       si.unit_price_cents, si.quantity, si.unit, si.subtotal_cents
                FROM sale_items si
                JOIN sales s ON s.id = si.sale_id
                WHERE DATE(s.created_at) BETWEEN ?1 AND ?2
                ORDER BY si.id ASC
                "#,
            )
            .bind(range.start)
            .bind(range.end)
            .fetch_all(&self.pool)
            .await
        } else {
            sqlx::query_as::<_, SaleLine>(
                r#"
                SELECT id, sale_id, product_name,
                       unit_price_cents, quantity, unit, subtotal_cents
                FROM sale_items
                ORDER BY id ASC
                "#,
            )
            .fetch_all(&self.pool)
            .await
        }
        .map_err(db_err("get_transactions"))?;

        let mut by_sale: HashMap<i64, Vec<SaleLine>> = HashMap::new();
        for line in lines {
            by_sale.entry(line.sale_id).or_default().push(line);
        }

        let transactions = sales
            .into_iter()
            .map(|sale| Transaction {
                items: by_sale.remove(&sale.id).unwrap_or_default(),
                id: sale.id,
                total_cents: sale.total_cents,
                currency: sale.currency,
                created_at: sale.created_at,
            })
            .collect();

        Ok(transactions)
    }

    /// Deletes a sale; its line items cascade with it.
    ///
    /// Fails with `NotFound` when the id does not exist.
    pub async fn delete_transaction(&self, id: i64) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM sales WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_err("delete_transaction"))?;

        if result.rows_affected() == 0 {
            return Err(StoreError::not_found("Sale", id));
        }

        debug!(id, "Transaction deleted");
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
