//! Derived figures for the dashboard and analytics views.
//!
//! Everything here is a pure function over a snapshot of records plus the
//! calendar day treated as "today". Empty input always yields zeros or `None`,
//! never a panic, NaN or infinity.

use chrono::{Datelike, NaiveDate};
use shared::{
    AnalyticsReport, CategoryExtremes, CategoryTotal, DashboardSummary, ExpenseRecord, MonthTotal,
};

/// Window length of the monthly chart
pub const DEFAULT_TRAILING_MONTHS: usize = 6;

const MONTH_LABELS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

fn in_month(date: NaiveDate, year: i32, month: u32) -> bool {
    date.year() == year && date.month() == month
}

/// Calendar month `back` months before (year, month)
fn months_before(year: i32, month: u32, back: i32) -> (i32, u32) {
    let index = year * 12 + month as i32 - 1 - back;
    (index.div_euclid(12), index.rem_euclid(12) as u32 + 1)
}

fn total_for_month(records: &[ExpenseRecord], year: i32, month: u32) -> f64 {
    records
        .iter()
        .filter(|r| in_month(r.date, year, month))
        .map(|r| r.amount)
        .sum()
}

/// Sum of amounts dated in the same calendar month as `today`
pub fn monthly_total(records: &[ExpenseRecord], today: NaiveDate) -> f64 {
    total_for_month(records, today.year(), today.month())
}

/// Monthly total spread over the days elapsed so far this month
pub fn daily_average(records: &[ExpenseRecord], today: NaiveDate) -> f64 {
    let days_elapsed = today.day().max(1);
    monthly_total(records, today) / f64::from(days_elapsed)
}

/// Number of records dated in the current month
pub fn transaction_count(records: &[ExpenseRecord], today: NaiveDate) -> usize {
    records
        .iter()
        .filter(|r| in_month(r.date, today.year(), today.month()))
        .count()
}

/// Per-category sums in order of first appearance; absent categories are omitted
pub fn category_totals(records: &[ExpenseRecord]) -> Vec<CategoryTotal> {
    let mut totals: Vec<CategoryTotal> = Vec::new();
    for record in records {
        match totals.iter_mut().find(|t| t.category == record.category) {
            Some(entry) => entry.total += record.amount,
            None => totals.push(CategoryTotal {
                category: record.category.clone(),
                total: record.amount,
            }),
        }
    }
    totals
}

/// Totals for the `months` calendar months ending with today's month, oldest first
pub fn trailing_months(records: &[ExpenseRecord], today: NaiveDate, months: usize) -> Vec<MonthTotal> {
    (0..months)
        .rev()
        .map(|back| {
            let (year, month) = months_before(today.year(), today.month(), back as i32);
            MonthTotal {
                year,
                month,
                label: MONTH_LABELS[(month - 1) as usize].to_string(),
                total: total_for_month(records, year, month),
            }
        })
        .collect()
}

/// Mean amount across all records, 0 when there are none
pub fn average_transaction(records: &[ExpenseRecord]) -> f64 {
    if records.is_empty() {
        return 0.0;
    }
    let total: f64 = records.iter().map(|r| r.amount).sum();
    total / records.len() as f64
}

/// Highest and lowest spending categories; ties go to the category seen first
pub fn extreme_categories(records: &[ExpenseRecord]) -> Option<CategoryExtremes> {
    let totals = category_totals(records);
    let first = totals.first()?;

    let mut highest = first;
    let mut lowest = first;
    for entry in &totals[1..] {
        if entry.total > highest.total {
            highest = entry;
        }
        if entry.total < lowest.total {
            lowest = entry;
        }
    }

    Some(CategoryExtremes {
        highest: highest.clone(),
        lowest: lowest.clone(),
    })
}

/// Percentage change of this month's total against last month's.
///
/// `None` when last month's total is not positive, or when the ratio is not finite.
pub fn month_over_month_change(records: &[ExpenseRecord], today: NaiveDate) -> Option<f64> {
    let current = monthly_total(records, today);
    let (prev_year, prev_month) = months_before(today.year(), today.month(), 1);
    let previous = total_for_month(records, prev_year, prev_month);

    if previous <= 0.0 {
        return None;
    }
    let change = (current - previous) / previous * 100.0;
    change.is_finite().then_some(change)
}

pub fn dashboard_summary(records: &[ExpenseRecord], today: NaiveDate) -> DashboardSummary {
    DashboardSummary {
        monthly_total: monthly_total(records, today),
        daily_average: daily_average(records, today),
        transaction_count: transaction_count(records, today),
    }
}

pub fn analytics_report(records: &[ExpenseRecord], today: NaiveDate) -> AnalyticsReport {
    AnalyticsReport {
        category_totals: category_totals(records),
        trailing_months: trailing_months(records, today, DEFAULT_TRAILING_MONTHS),
        average_transaction: average_transaction(records),
        extremes: extreme_categories(records),
        month_over_month_change: month_over_month_change(records, today),
    }
}
