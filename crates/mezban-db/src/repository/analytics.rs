//! # Analytics Repository
//!
//! Time-windowed aggregation of the sale history into the
//! [`AnalyticsSnapshot`] view the reporting screens chart.
//!
//! ## Windowing Rules
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  snapshot(None)          daily_revenue: last 7 calendar days        │
//! │                          top/distribution/summary: all-time         │
//! │                                                                     │
//! │  snapshot(Some(range))   every bucket filtered by the same range    │
//! │                                                                     │
//! │  Dates with zero sales are NOT synthesized - only observed dates    │
//! │  appear. Charting callers treat gaps as zero.                       │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{db_err, StoreResult};
use mezban_core::analytics::average_order_value;
use mezban_core::{
    AnalyticsSnapshot, AnalyticsSummary, DailyRevenue, DateRange, ProductShare, TopProduct,
};

/// Days in the default daily-revenue window (today inclusive).
const DEFAULT_DAILY_WINDOW_DAYS: u32 = 7;

/// How many products the top-products table keeps.
const TOP_PRODUCTS_LIMIT: i64 = 5;

/// Repository for analytics aggregation.
#[derive(Debug, Clone)]
pub struct AnalyticsRepository {
    pool: SqlitePool,
}

impl AnalyticsRepository {
    /// Creates a new AnalyticsRepository.
    pub fn new(pool: SqlitePool) -> Self {
        AnalyticsRepository { pool }
    }

    /// Computes the full analytics view.
    ///
    /// With `range = None`, the daily series defaults to the last 7
    /// calendar days while the other buckets cover all history. A
    /// caller-supplied range applies identically to every bucket.
    pub async fn snapshot(&self, range: Option<DateRange>) -> StoreResult<AnalyticsSnapshot> {
        let daily_window = range.unwrap_or_else(|| {
            DateRange::last_days(Utc::now().date_naive(), DEFAULT_DAILY_WINDOW_DAYS)
        });

        let daily_revenue = self.daily_revenue(daily_window).await?;
        let top_products = self.top_products(range).await?;
        let product_distribution = self.product_distribution(range).await?;
        let summary = self.summary(range).await?;

        debug!(
            days = daily_revenue.len(),
            orders = summary.total_orders,
            "Analytics snapshot computed"
        );

        Ok(AnalyticsSnapshot {
            daily_revenue,
            top_products,
            product_distribution,
            summary,
        })
    }

    /// Revenue and order count per observed calendar date, ascending.
    async fn daily_revenue(&self, window: DateRange) -> StoreResult<Vec<DailyRevenue>> {
        sqlx::query_as::<_, DailyRevenue>(
            r#"
            SELECT DATE(created_at)  AS date,
                   SUM(total_cents)  AS revenue_cents,
                   COUNT(*)          AS orders
            FROM sales
            WHERE DATE(created_at) BETWEEN ?1 AND ?2
            GROUP BY DATE(created_at)
            ORDER BY date ASC
            "#,
        )
        .bind(window.start)
        .bind(window.end)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err("get_analytics"))
    }

    /// Top products by total quantity sold, capped at five.
    async fn top_products(&self, range: Option<DateRange>) -> StoreResult<Vec<TopProduct>> {
        let query = if let Some(range) = range {
            sqlx::query_as::<_, TopProduct>(
                r#"
                SELECT si.product_name        AS name,
                       SUM(si.quantity)       AS sales,
                       SUM(si.subtotal_cents) AS revenue_cents
                FROM sale_items si
                JOIN sales s ON s.id = si.sale_id
                WHERE DATE(s.created_at) BETWEEN ?1 AND ?2
                GROUP BY si.product_name
                ORDER BY sales DESC, name ASC
                LIMIT ?3
                "#,
            )
            .bind(range.start)
            .bind(range.end)
            .bind(TOP_PRODUCTS_LIMIT)
        } else {
            sqlx::query_as::<_, TopProduct>(
                r#"
                SELECT product_name        AS name,
                       SUM(quantity)       AS sales,
                       SUM(subtotal_cents) AS revenue_cents
                FROM sale_items
                GROUP BY product_name
                ORDER BY sales DESC, name ASC
                LIMIT ?1
                "#,
            )
            .bind(TOP_PRODUCTS_LIMIT)
        };

        query
            .fetch_all(&self.pool)
            .await
            .map_err(db_err("get_analytics"))
    }

    /// Quantity share per product, same grouping as the top table but
    /// untruncated - the distribution chart needs the whole pie.
    async fn product_distribution(
        &self,
        range: Option<DateRange>,
    ) -> StoreResult<Vec<ProductShare>> {
        let query = if let Some(range) = range {
            sqlx::query_as::<_, ProductShare>(
                r#"
                SELECT si.product_name  AS name,
                       SUM(si.quantity) AS value
                FROM sale_items si
                JOIN sales s ON s.id = si.sale_id
                WHERE DATE(s.created_at) BETWEEN ?1 AND ?2
                GROUP BY si.product_name
                ORDER BY value DESC, name ASC
                "#,
            )
            .bind(range.start)
            .bind(range.end)
        } else {
            sqlx::query_as::<_, ProductShare>(
                r#"
                SELECT product_name  AS name,
                       SUM(quantity) AS value
                FROM sale_items
                GROUP BY product_name
                ORDER BY value DESC, name ASC
                "#,
            )
        };

        query
            .fetch_all(&self.pool)
            .await
            .map_err(db_err("get_analytics"))
    }

    /// Whole-window totals with the zero-sales guard applied.
    async fn summary(&self, range: Option<DateRange>) -> StoreResult<AnalyticsSummary> {
        let query = if let Some(range) = range {
            sqlx::query_as::<_, (i64, i64)>(
                r#"
                SELECT COUNT(*), COALESCE(SUM(total_cents), 0)
                FROM sales
                WHERE DATE(created_at) BETWEEN ?1 AND ?2
                "#,
            )
            .bind(range.start)
            .bind(range.end)
        } else {
            sqlx::query_as::<_, (i64, i64)>(
                "SELECT COUNT(*), COALESCE(SUM(total_cents), 0) FROM sales",
            )
        };

        let (total_orders, total_revenue_cents) = query
            .fetch_one(&self.pool)
            .await
            .map_err(db_err("get_analytics"))?;

        Ok(AnalyticsSummary {
            total_orders,
            total_revenue_cents,
            average_order_value_cents: average_order_value(total_revenue_cents, total_orders),
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Store, StoreConfig};
    use chrono::{DateTime, Duration, NaiveDate};
    use mezban_core::NewSaleLine;

    async fn store() -> Store {
        Store::open(StoreConfig::in_memory()).await.unwrap()
    }

    fn line(name: &str, price_cents: i64, quantity: f64) -> NewSaleLine {
        NewSaleLine {
            name: name.to_string(),
            unit_price_cents: price_cents,
            quantity,
            unit: "item".to_string(),
        }
    }

    /// Inserts a sale directly with a chosen timestamp; record() always
    /// stamps "now", which is useless for window tests.
    async fn insert_backdated_sale(
        store: &Store,
        created_at: DateTime<Utc>,
        total_cents: i64,
        items: &[(&str, f64, i64)],
    ) {
        let result = sqlx::query(
            "INSERT INTO sales (total_cents, currency, created_at) VALUES (?1, 'PKR', ?2)",
        )
        .bind(total_cents)
        .bind(created_at)
        .execute(store.pool())
        .await
        .unwrap();
        let sale_id = result.last_insert_rowid();

        for (name, quantity, subtotal_cents) in items {
            sqlx::query(
                r#"
                INSERT INTO sale_items (
                    sale_id, product_name, unit_price_cents,
                    quantity, unit, subtotal_cents
                ) VALUES (?1, ?2, ?3, ?4, 'item', ?5)
                "#,
            )
            .bind(sale_id)
            .bind(name)
            .bind(subtotal_cents)
            .bind(quantity)
            .bind(subtotal_cents)
            .execute(store.pool())
            .await
            .unwrap();
        }
    }

    #[tokio::test]
    async fn test_zero_sales_snapshot() {
        let store = store().await;
        let snapshot = store.analytics().snapshot(None).await.unwrap();

        assert_eq!(snapshot.summary.total_orders, 0);
        assert_eq!(snapshot.summary.total_revenue_cents, 0);
        // Defined as 0, never NaN.
        assert_eq!(snapshot.summary.average_order_value_cents, 0);

        assert!(snapshot.daily_revenue.is_empty());
        assert!(snapshot.top_products.is_empty());
        assert!(snapshot.product_distribution.is_empty());
    }

    #[tokio::test]
    async fn test_same_date_sales_merge_into_one_bucket() {
        let store = store().await;
        let sales = store.sales();

        // 10.00 and 15.00 on the same calendar date.
        sales.record(&[line("Tea", 1000, 1.0)], "PKR").await.unwrap();
        sales.record(&[line("Lassi", 1500, 1.0)], "PKR").await.unwrap();

        let snapshot = store.analytics().snapshot(None).await.unwrap();
        assert_eq!(snapshot.daily_revenue.len(), 1);

        let bucket = &snapshot.daily_revenue[0];
        assert_eq!(bucket.date, Utc::now().date_naive());
        assert_eq!(bucket.revenue_cents, 2500);
        assert_eq!(bucket.orders, 2);
    }

    #[tokio::test]
    async fn test_daily_series_default_window_and_order() {
        let store = store().await;
        let now = Utc::now();

        insert_backdated_sale(&store, now - Duration::days(10), 999, &[]).await;
        insert_backdated_sale(&store, now - Duration::days(3), 1000, &[]).await;
        insert_backdated_sale(&store, now, 2000, &[]).await;

        let snapshot = store.analytics().snapshot(None).await.unwrap();

        // The 10-day-old sale falls outside the 7-day daily window...
        assert_eq!(snapshot.daily_revenue.len(), 2);
        assert!(snapshot.daily_revenue[0].date < snapshot.daily_revenue[1].date);

        // ...but still counts toward the all-time summary.
        assert_eq!(snapshot.summary.total_orders, 3);
        assert_eq!(snapshot.summary.total_revenue_cents, 3999);
        assert_eq!(snapshot.summary.average_order_value_cents, 1333);
    }

    #[tokio::test]
    async fn test_top_products_ranked_by_quantity_and_capped() {
        let store = store().await;
        let sales = store.sales();

        // Six distinct products; quantities 1..=6.
        for (i, name) in ["A", "B", "C", "D", "E", "F"].iter().enumerate() {
            sales
                .record(&[line(name, 100, (i + 1) as f64)], "PKR")
                .await
                .unwrap();
        }

        let snapshot = store.analytics().snapshot(None).await.unwrap();

        // Capped at 5, highest quantity first, lowest seller dropped.
        assert_eq!(snapshot.top_products.len(), 5);
        assert_eq!(snapshot.top_products[0].name, "F");
        assert_eq!(snapshot.top_products[0].sales, 6.0);
        assert_eq!(snapshot.top_products[0].revenue_cents, 600);
        assert!(!snapshot.top_products.iter().any(|p| p.name == "A"));

        // The distribution keeps everything.
        assert_eq!(snapshot.product_distribution.len(), 6);
        assert_eq!(snapshot.product_distribution[0].name, "F");
        assert_eq!(snapshot.product_distribution[5].name, "A");
        assert_eq!(snapshot.product_distribution[5].value, 1.0);
    }

    #[tokio::test]
    async fn test_grouping_is_by_name_across_sales() {
        let store = store().await;
        let sales = store.sales();

        sales.record(&[line("Tea", 200, 2.0)], "PKR").await.unwrap();
        sales.record(&[line("Tea", 200, 3.0)], "PKR").await.unwrap();

        let snapshot = store.analytics().snapshot(None).await.unwrap();
        assert_eq!(snapshot.top_products.len(), 1);
        assert_eq!(snapshot.top_products[0].sales, 5.0);
        assert_eq!(snapshot.top_products[0].revenue_cents, 1000);
    }

    #[tokio::test]
    async fn test_explicit_range_applies_to_every_bucket() {
        let store = store().await;
        let now = Utc::now();

        insert_backdated_sale(
            &store,
            now - Duration::days(30),
            500,
            &[("Old Special", 1.0, 500)],
        )
        .await;
        insert_backdated_sale(&store, now, 1000, &[("Tea", 2.0, 1000)]).await;

        let this_week = DateRange::last_days(now.date_naive(), 7);
        let snapshot = store.analytics().snapshot(Some(this_week)).await.unwrap();

        assert_eq!(snapshot.summary.total_orders, 1);
        assert_eq!(snapshot.summary.total_revenue_cents, 1000);
        assert_eq!(snapshot.daily_revenue.len(), 1);
        assert_eq!(snapshot.top_products.len(), 1);
        assert_eq!(snapshot.top_products[0].name, "Tea");
        assert_eq!(snapshot.product_distribution.len(), 1);
    }

    #[tokio::test]
    async fn test_range_honors_calendar_bounds() {
        let store = store().await;
        let day = NaiveDate::from_ymd_opt(2026, 3, 10).unwrap();
        let ts = day.and_hms_opt(13, 30, 0).unwrap().and_utc();

        insert_backdated_sale(&store, ts, 700, &[("Tea", 1.0, 700)]).await;

        let covering = DateRange { start: day, end: day };
        let snapshot = store.analytics().snapshot(Some(covering)).await.unwrap();
        assert_eq!(snapshot.summary.total_orders, 1);
        assert_eq!(snapshot.daily_revenue[0].date, day);

        let missing = DateRange {
            start: day.succ_opt().unwrap(),
            end: day.succ_opt().unwrap(),
        };
        let snapshot = store.analytics().snapshot(Some(missing)).await.unwrap();
        assert_eq!(snapshot.summary.total_orders, 0);
        assert_eq!(snapshot.summary.average_order_value_cents, 0);
    }
}
