use shared::{ErrorPayload, ValidationIssue};

/// Error type for every fallible tracker operation.
///
/// Storage failures keep the underlying `anyhow` chain, which names the
/// document and file involved.
#[derive(Debug, thiserror::Error)]
pub enum TrackerError {
    #[error("Expense not found: {0}")]
    NotFound(String),

    #[error("Validation failed: {}", describe_issues(.0))]
    Validation(Vec<ValidationIssue>),

    #[error("Invalid import file: {0}")]
    ImportFormat(String),

    #[error("Storage error: {0:#}")]
    Storage(#[from] anyhow::Error),

    #[error("Email already registered: {0}")]
    EmailAlreadyRegistered(String),

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("No user is signed in")]
    NotAuthenticated,
}

fn describe_issues(issues: &[ValidationIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl TrackerError {
    /// Stable machine-readable kind
    pub fn kind(&self) -> &'static str {
        match self {
            TrackerError::NotFound(_) => "not_found",
            TrackerError::Validation(_) => "validation",
            TrackerError::ImportFormat(_) => "import_format",
            TrackerError::Storage(_) => "storage",
            TrackerError::EmailAlreadyRegistered(_) => "email_already_registered",
            TrackerError::InvalidCredentials => "invalid_credentials",
            TrackerError::NotAuthenticated => "not_authenticated",
        }
    }

    pub fn to_payload(&self) -> ErrorPayload {
        ErrorPayload {
            kind: self.kind().to_string(),
            message: self.to_string(),
        }
    }
}

pub type TrackerResult<T> = Result<T, TrackerError>;

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;

    #[test]
    fn test_validation_message_lists_every_issue() {
        let err = TrackerError::Validation(vec![
            ValidationIssue::EmptyTitle,
            ValidationIssue::AmountNotPositive,
        ]);
        assert_eq!(
            err.to_string(),
            "Validation failed: title must not be empty; amount must be greater than zero"
        );
        assert_eq!(err.kind(), "validation");
    }

    #[test]
    fn test_storage_error_keeps_context_chain() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only");
        let source: anyhow::Result<()> = Err(io).context("Failed to write document 'expense_tracker_expenses'");
        let err = TrackerError::from(source.unwrap_err());

        let payload = err.to_payload();
        assert_eq!(payload.kind, "storage");
        assert!(payload.message.contains("expense_tracker_expenses"));
        assert!(payload.message.contains("read-only"));
    }
}
