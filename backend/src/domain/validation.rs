//! Input validation for expense drafts and sign-up forms.
//!
//! Validation runs before any state is touched, and collects every problem
//! rather than stopping at the first one.

use chrono::NaiveDate;
use shared::{ExpenseDraft, ValidationIssue};

use crate::error::{TrackerError, TrackerResult};

/// An expense draft that passed validation, with input cleaned up
#[derive(Debug, Clone, PartialEq)]
pub struct ValidExpense {
    pub title: String,
    pub amount: f64,
    pub category: String,
    pub date: NaiveDate,
    pub notes: Option<String>,
}

pub fn validate_expense(draft: &ExpenseDraft) -> TrackerResult<ValidExpense> {
    let mut issues = Vec::new();

    let title = draft.title.trim();
    if title.is_empty() {
        issues.push(ValidationIssue::EmptyTitle);
    }

    if !draft.amount.is_finite() {
        issues.push(ValidationIssue::AmountNotFinite);
    } else if draft.amount <= 0.0 {
        issues.push(ValidationIssue::AmountNotPositive);
    }

    let category = draft.category.trim();
    if category.is_empty() {
        issues.push(ValidationIssue::EmptyCategory);
    }

    let date = match NaiveDate::parse_from_str(draft.date.trim(), "%Y-%m-%d") {
        Ok(date) => Some(date),
        Err(_) => {
            issues.push(ValidationIssue::InvalidDate(draft.date.clone()));
            None
        }
    };

    match date {
        Some(date) if issues.is_empty() => Ok(ValidExpense {
            title: title.to_string(),
            amount: draft.amount,
            category: category.to_string(),
            date,
            notes: draft
                .notes
                .as_deref()
                .map(str::trim)
                .filter(|n| !n.is_empty())
                .map(str::to_string),
        }),
        _ => Err(TrackerError::Validation(issues)),
    }
}

/// Cleaned sign-up fields
#[derive(Debug, Clone, PartialEq)]
pub struct ValidSignUp {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Name and email are trimmed; the password is taken as typed
pub fn validate_sign_up(name: &str, email: &str, password: &str) -> TrackerResult<ValidSignUp> {
    let mut issues = Vec::new();
    let name = name.trim();
    let email = email.trim();

    if name.is_empty() {
        issues.push(ValidationIssue::MissingField("name".to_string()));
    }
    if email.is_empty() {
        issues.push(ValidationIssue::MissingField("email".to_string()));
    }
    if password.is_empty() {
        issues.push(ValidationIssue::MissingField("password".to_string()));
    }

    if !issues.is_empty() {
        return Err(TrackerError::Validation(issues));
    }

    Ok(ValidSignUp {
        name: name.to_string(),
        email: email.to_string(),
        password: password.to_string(),
    })
}
