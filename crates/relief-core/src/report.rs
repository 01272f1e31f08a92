//! # Daily Activity Report
//!
//! Groups ledger entries by the UTC calendar day of their stored date and
//! sums the amounts per day. Days with no entries are absent, not zero.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::model::{Donation, Expense};

/// Day key format used in report output.
pub const DAY_FORMAT: &str = "%Y-%m-%d";

/// A dated monetary entry that can be aggregated by day.
pub trait Ledger {
    /// When the entry was recorded.
    fn date(&self) -> DateTime<Utc>;
    /// The entry's amount.
    fn amount(&self) -> f64;
}

impl Ledger for Donation {
    fn date(&self) -> DateTime<Utc> {
        self.date
    }

    fn amount(&self) -> f64 {
        self.amount
    }
}

impl Ledger for Expense {
    fn date(&self) -> DateTime<Utc> {
        self.date
    }

    fn amount(&self) -> f64 {
        self.amount
    }
}

/// Sum of amounts recorded on one day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DailyTotal {
    /// Calendar day, `YYYY-MM-DD`.
    pub day: String,
    /// Sum of amounts recorded that day.
    pub total_amount: f64,
}

/// Body of `GET /reports`.
///
/// Entry order is not part of the contract; this implementation emits days
/// in ascending order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ActivityReport {
    /// Daily donation totals.
    pub donations: Vec<DailyTotal>,
    /// Daily expense totals.
    pub expenses: Vec<DailyTotal>,
}

impl ActivityReport {
    /// Aggregate both ledgers.
    pub fn build(donations: &[Donation], expenses: &[Expense]) -> Self {
        Self {
            donations: daily_totals(donations),
            expenses: daily_totals(expenses),
        }
    }
}

/// One [`DailyTotal`] per distinct day present in `entries`.
pub fn daily_totals<L: Ledger>(entries: &[L]) -> Vec<DailyTotal> {
    let mut by_day: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    for entry in entries {
        *by_day.entry(entry.date().date_naive()).or_insert(0.0) += entry.amount();
    }
    by_day
        .into_iter()
        .map(|(day, total_amount)| DailyTotal {
            day: day.format(DAY_FORMAT).to_string(),
            total_amount,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    fn find<'a>(totals: &'a [DailyTotal], day: &str) -> Option<&'a DailyTotal> {
        totals.iter().find(|t| t.day == day)
    }

    #[test]
    fn sums_amounts_per_day() {
        let donations = vec![
            Donation::new(at(2024, 1, 1, 8), 10.0, "A"),
            Donation::new(at(2024, 1, 1, 20), 5.0, "B"),
            Donation::new(at(2024, 1, 2, 12), 3.0, "C"),
        ];
        let totals = daily_totals(&donations);

        assert_eq!(totals.len(), 2);
        assert_eq!(find(&totals, "2024-01-01").unwrap().total_amount, 15.0);
        assert_eq!(find(&totals, "2024-01-02").unwrap().total_amount, 3.0);
    }

    #[test]
    fn days_without_entries_are_absent() {
        let expenses = vec![
            Expense::new(at(2024, 3, 1, 9), 40.0, "Tarpaulins"),
            Expense::new(at(2024, 3, 4, 9), 12.5, "Fuel"),
        ];
        let totals = daily_totals(&expenses);
        assert_eq!(totals.len(), 2);
        assert!(find(&totals, "2024-03-02").is_none());
        assert!(find(&totals, "2024-03-03").is_none());
    }

    #[test]
    fn day_boundary_is_utc_midnight() {
        let donations = vec![
            Donation::new(Utc.with_ymd_and_hms(2024, 5, 1, 23, 59, 59).unwrap(), 1.0, "A"),
            Donation::new(Utc.with_ymd_and_hms(2024, 5, 2, 0, 0, 0).unwrap(), 2.0, "B"),
        ];
        let totals = daily_totals(&donations);
        assert_eq!(find(&totals, "2024-05-01").unwrap().total_amount, 1.0);
        assert_eq!(find(&totals, "2024-05-02").unwrap().total_amount, 2.0);
    }

    #[test]
    fn empty_ledger_yields_empty_report() {
        let report = ActivityReport::build(&[], &[]);
        assert!(report.donations.is_empty());
        assert!(report.expenses.is_empty());
    }

    #[test]
    fn report_serializes_total_amount_camel_case() {
        let report = ActivityReport::build(
            &[Donation::new(at(2024, 1, 1, 8), 10.0, "A")],
            &[Expense::new(at(2024, 1, 1, 8), 4.0, "Water")],
        );
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["donations"][0]["day"], "2024-01-01");
        assert_eq!(json["donations"][0]["totalAmount"], 10.0);
        assert_eq!(json["expenses"][0]["totalAmount"], 4.0);
    }
}
