//! Display formatting for amounts, dates and expense rows.

use chrono::{DateTime, NaiveDate, Utc};
use shared::{ExpenseRecord, FormattedExpense};

/// US-dollar amount with thousands separators, e.g. `$1,234.50` or `-$4.00`
pub fn format_currency(amount: f64) -> String {
    let cents = (amount.abs() * 100.0).round() as u64;
    let whole = (cents / 100).to_string();
    let fraction = cents % 100;

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if amount < 0.0 && cents > 0 { "-" } else { "" };
    format!("{}${}.{:02}", sign, grouped, fraction)
}

/// Short month, day and year, e.g. `Jan 10, 2024`
pub fn format_date(date: NaiveDate) -> String {
    date.format("%b %-d, %Y").to_string()
}

/// Relative age of a timestamp, falling back to the date after a week
pub fn format_time_ago(timestamp: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let elapsed = now.signed_duration_since(timestamp);
    let minutes = elapsed.num_minutes();
    let hours = elapsed.num_hours();
    let days = elapsed.num_days();

    if elapsed.num_seconds() < 60 {
        "Just now".to_string()
    } else if minutes < 60 {
        format!("{} min ago", minutes)
    } else if hours < 24 {
        format!("{} hours ago", hours)
    } else if days < 7 {
        format!("{} days ago", days)
    } else {
        format_date(timestamp.date_naive())
    }
}

pub fn format_expense(record: &ExpenseRecord) -> FormattedExpense {
    let category = record.display_category();
    FormattedExpense {
        id: record.id.clone(),
        title: record.title.clone(),
        notes: record.notes.clone(),
        category_label: category.label().to_string(),
        category_icon: category.icon().to_string(),
        category_color: category.color().to_string(),
        formatted_date: format_date(record.date),
        formatted_amount: format_currency(record.amount),
        raw_amount: record.amount,
    }
}

/// Display rows in the order given
pub fn expense_rows(records: &[ExpenseRecord]) -> Vec<FormattedExpense> {
    records.iter().map(format_expense).collect()
}
