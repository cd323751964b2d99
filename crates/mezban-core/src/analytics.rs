//! # Analytics Derivations
//!
//! Pure math over the aggregated sale history. The storage layer runs
//! the SQL grouping; everything here is a deterministic function of
//! those buckets, so the report view can call it on whatever window it
//! fetched.

use crate::types::DailyRevenue;

/// Revenue growth across a daily series, in percent.
///
/// `(last_bucket.revenue - first_bucket.revenue) / first_bucket.revenue × 100`
///
/// Defined as 0 when fewer than two buckets exist or the first bucket's
/// revenue is 0 - the report view shows a flat trend rather than a NaN.
pub fn growth_rate(daily: &[DailyRevenue]) -> f64 {
    let (Some(first), Some(last)) = (daily.first(), daily.last()) else {
        return 0.0;
    };

    if daily.len() < 2 || first.revenue_cents == 0 {
        return 0.0;
    }

    (last.revenue_cents - first.revenue_cents) as f64 / first.revenue_cents as f64 * 100.0
}

/// Average order value in cents, rounded half-up.
///
/// Defined as 0 when there are no orders - never NaN, never a division
/// by zero. The zero guard is required behavior, not caller courtesy.
pub fn average_order_value(total_revenue_cents: i64, total_orders: i64) -> i64 {
    if total_orders <= 0 {
        return 0;
    }

    // Integer half-up rounding of revenue / orders.
    (total_revenue_cents * 2 + total_orders) / (total_orders * 2)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn bucket(day: u32, revenue_cents: i64) -> DailyRevenue {
        DailyRevenue {
            date: NaiveDate::from_ymd_opt(2026, 3, day).unwrap(),
            revenue_cents,
            orders: 1,
        }
    }

    #[test]
    fn test_growth_rate_basic() {
        let daily = vec![bucket(1, 1000), bucket(2, 1200), bucket(3, 1500)];
        assert!((growth_rate(&daily) - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_growth_rate_decline() {
        let daily = vec![bucket(1, 2000), bucket(2, 1000)];
        assert!((growth_rate(&daily) + 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_growth_rate_degenerate_windows() {
        assert_eq!(growth_rate(&[]), 0.0);
        assert_eq!(growth_rate(&[bucket(1, 1000)]), 0.0);

        // First bucket revenue 0 would divide by zero; defined as 0.
        let daily = vec![bucket(1, 0), bucket(2, 500)];
        assert_eq!(growth_rate(&daily), 0.0);
    }

    #[test]
    fn test_average_order_value() {
        assert_eq!(average_order_value(2500, 2), 1250);
        // 1000 / 3 = 333.33 → 333
        assert_eq!(average_order_value(1000, 3), 333);
        // 500 / 3 = 166.67 → 167
        assert_eq!(average_order_value(500, 3), 167);
    }

    #[test]
    fn test_average_order_value_zero_orders() {
        assert_eq!(average_order_value(0, 0), 0);
        assert_eq!(average_order_value(1234, 0), 0);
    }
}
