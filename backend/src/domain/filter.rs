//! Expense list filtering.

use shared::{ExpenseFilter, ExpenseRecord};

/// Records matching every non-empty criterion, in ledger order.
///
/// - `search_term`: case-insensitive substring of the title or the notes
/// - `category`: exact match on the stored category key
/// - `date`: exact calendar day
pub fn filter_expenses(records: &[ExpenseRecord], criteria: &ExpenseFilter) -> Vec<ExpenseRecord> {
    let term = criteria.search_term.to_lowercase();
    let category = criteria.category.as_deref().filter(|c| !c.is_empty());

    records
        .iter()
        .filter(|record| term.is_empty() || matches_term(record, &term))
        .filter(|record| category.map_or(true, |c| record.category == c))
        .filter(|record| criteria.date.map_or(true, |d| record.date == d))
        .cloned()
        .collect()
}

fn matches_term(record: &ExpenseRecord, lowercase_term: &str) -> bool {
    record.title.to_lowercase().contains(lowercase_term)
        || record
            .notes
            .as_deref()
            .map_or(false, |notes| notes.to_lowercase().contains(lowercase_term))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone, Utc};

    fn record(id: &str, title: &str, category: &str, day: u32, notes: Option<&str>) -> ExpenseRecord {
        let ts = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        ExpenseRecord {
            id: id.to_string(),
            title: title.to_string(),
            amount: 10.0,
            category: category.to_string(),
            date: NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
            notes: notes.map(str::to_string),
            created_at: ts,
            updated_at: ts,
        }
    }

    fn sample() -> Vec<ExpenseRecord> {
        vec![
            record("1", "Morning Coffee", "food", 10, None),
            record("2", "Bus ticket", "transport", 10, Some("to the office")),
            record("3", "Groceries", "food", 12, Some("weekly COFFEE beans")),
            record("4", "Electricity", "bills", 15, None),
        ]
    }

    fn ids(records: &[ExpenseRecord]) -> Vec<&str> {
        records.iter().map(|r| r.id.as_str()).collect()
    }

    #[test]
    fn test_empty_filter_returns_input_unchanged() {
        let records = sample();
        assert_eq!(filter_expenses(&records, &ExpenseFilter::default()), records);
    }

    #[test]
    fn test_search_matches_title_or_notes_case_insensitively() {
        let criteria = ExpenseFilter {
            search_term: "CoFfEe".to_string(),
            ..Default::default()
        };
        let result = filter_expenses(&sample(), &criteria);
        assert_eq!(ids(&result), vec!["1", "3"]);
        for r in &result {
            let haystack = format!("{} {}", r.title, r.notes.clone().unwrap_or_default()).to_lowercase();
            assert!(haystack.contains("coffee"));
        }
    }

    #[test]
    fn test_criteria_combine_with_and() {
        let criteria = ExpenseFilter {
            search_term: String::new(),
            category: Some("food".to_string()),
            date: Some(NaiveDate::from_ymd_opt(2024, 1, 12).unwrap()),
        };
        assert_eq!(ids(&filter_expenses(&sample(), &criteria)), vec!["3"]);
    }

    #[test]
    fn test_empty_category_matches_all() {
        let criteria = ExpenseFilter {
            category: Some(String::new()),
            date: Some(NaiveDate::from_ymd_opt(2024, 1, 10).unwrap()),
            ..Default::default()
        };
        assert_eq!(ids(&filter_expenses(&sample(), &criteria)), vec!["1", "2"]);
    }

    #[test]
    fn test_no_matches() {
        let criteria = ExpenseFilter {
            search_term: "rent".to_string(),
            ..Default::default()
        };
        assert!(filter_expenses(&sample(), &criteria).is_empty());
    }
}
