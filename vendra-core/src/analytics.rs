use chrono::NaiveDate;
use serde::Serialize;

/// Inclusive date range for analytics queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl DateRange {
    /// Clamps the range so it never reaches past `today` (the current MSK
    /// date). A `from` after the clamped `to` collapses to a single day.
    pub fn clamp_to(self, today: NaiveDate) -> Self {
        let to = self.to.min(today);
        let from = self.from.min(to);
        Self { from, to }
    }
}

/// Order count for a single calendar day.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DayCount {
    pub date: NaiveDate,
    pub count: i64,
}

/// Aggregated orders-over-time response body.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct OrdersChart {
    pub data: Vec<DayCount>,
    pub total_orders: i64,
    pub total_sales: f64,
}

/// Per-product rollup: orders in range, current stock across warehouses,
/// trailing-7-day order velocity and the resulting days-of-stock estimate.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ProductStat {
    pub nmid: i64,
    pub vendorcode: String,
    pub brand: String,
    pub title: String,
    pub subjectname: String,
    pub orders: i64,
    pub quantity: i64,
    pub orders_per_day_7d: f64,
    pub days_of_stock: Option<f64>,
}

impl ProductStat {
    /// Stock divided by trailing daily order rate; `None` when nothing sold
    /// in the trailing week (no meaningful estimate).
    pub fn days_of_stock(quantity: i64, orders_per_day_7d: f64) -> Option<f64> {
        if orders_per_day_7d > 0.0 {
            Some(quantity as f64 / orders_per_day_7d)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn clamp_pulls_future_end_back_to_today() {
        let range = DateRange { from: d(2024, 5, 1), to: d(2024, 6, 15) };
        let clamped = range.clamp_to(d(2024, 5, 20));
        assert_eq!(clamped.from, d(2024, 5, 1));
        assert_eq!(clamped.to, d(2024, 5, 20));
    }

    #[test]
    fn clamp_leaves_past_ranges_alone() {
        let range = DateRange { from: d(2024, 4, 1), to: d(2024, 4, 30) };
        assert_eq!(range.clamp_to(d(2024, 5, 20)), range);
    }

    #[test]
    fn clamp_collapses_fully_future_range() {
        let range = DateRange { from: d(2024, 6, 1), to: d(2024, 6, 10) };
        let clamped = range.clamp_to(d(2024, 5, 20));
        assert_eq!(clamped.from, d(2024, 5, 20));
        assert_eq!(clamped.to, d(2024, 5, 20));
    }

    #[test]
    fn days_of_stock_is_none_without_sales() {
        assert_eq!(ProductStat::days_of_stock(40, 0.0), None);
        assert_eq!(ProductStat::days_of_stock(40, 2.0), Some(20.0));
    }
}
