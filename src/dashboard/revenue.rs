use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::models::{Payment, PaymentStatus};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DailyRevenue {
    pub day: NaiveDate,
    pub amount: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RevenueReport {
    /// Ascending by day
    pub daily: Vec<DailyRevenue>,
    pub total: f64,
}

/// Sums successful payments per day, optionally clipped to `[from, to]` (inclusive).
///
/// Payments without a date cannot be placed on the chart and are left out.
pub fn summarize(payments: &[Payment], from: Option<NaiveDate>, to: Option<NaiveDate>) -> RevenueReport {
    let mut per_day: BTreeMap<NaiveDate, f64> = BTreeMap::new();

    for payment in payments.iter().filter(|p| p.status == PaymentStatus::Success) {
        let Some(day) = payment.payment_date.map(|at| at.date_naive()) else {
            continue;
        };
        if from.is_some_and(|from| day < from) || to.is_some_and(|to| day > to) {
            continue;
        }
        *per_day.entry(day).or_default() += payment.amount;
    }

    let daily: Vec<DailyRevenue> = per_day
        .into_iter()
        .map(|(day, amount)| DailyRevenue { day, amount })
        .collect();
    let total = daily.iter().map(|entry| entry.amount).sum();
    RevenueReport { daily, total }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn payments() -> Vec<Payment> {
        serde_json::from_value(json!([
            { "_id": "1", "amount": 1000, "status": "success", "paymentDate": "2024-02-02T10:00:00Z" },
            { "_id": "2", "amount": 500, "status": "success", "paymentDate": "2024-02-01T09:00:00Z" },
            { "_id": "3", "amount": 700, "status": "failed", "paymentDate": "2024-02-01T11:00:00Z" },
            { "_id": "4", "amount": 250, "status": "success", "paymentDate": "2024-02-02T18:30:00Z" },
            { "_id": "5", "amount": 900, "status": "success", "paymentDate": "2024-03-10" },
            { "_id": "6", "amount": 100, "status": "success" }
        ]))
        .unwrap()
    }

    fn day(raw: &str) -> NaiveDate {
        NaiveDate::parse_from_str(raw, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn sums_successful_payments_per_day() {
        let report = summarize(&payments(), None, None);
        assert_eq!(
            report.daily,
            vec![
                DailyRevenue { day: day("2024-02-01"), amount: 500.0 },
                DailyRevenue { day: day("2024-02-02"), amount: 1250.0 },
                DailyRevenue { day: day("2024-03-10"), amount: 900.0 },
            ]
        );
        assert_eq!(report.total, 2650.0);
    }

    #[test]
    fn range_is_inclusive() {
        let report = summarize(&payments(), Some(day("2024-02-02")), Some(day("2024-02-29")));
        assert_eq!(report.daily.len(), 1);
        assert_eq!(report.total, 1250.0);
    }

    #[test]
    fn no_payments_no_revenue() {
        assert_eq!(summarize(&[], None, None), RevenueReport::default());
    }
}
