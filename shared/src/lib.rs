use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Known expense categories.
///
/// Records store the category as a plain string so that unknown values coming
/// from an import survive a save. Use [`Category::from_key`] to resolve a stored
/// value for display; anything unrecognized renders as [`Category::Other`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Food,
    Transport,
    Shopping,
    Bills,
    Entertainment,
    Health,
    Education,
    Other,
}

impl Category {
    pub const ALL: [Category; 8] = [
        Category::Food,
        Category::Transport,
        Category::Shopping,
        Category::Bills,
        Category::Entertainment,
        Category::Health,
        Category::Education,
        Category::Other,
    ];

    /// Resolve a stored category key, falling back to `Other`
    pub fn from_key(key: &str) -> Category {
        Self::ALL
            .iter()
            .copied()
            .find(|c| c.key() == key)
            .unwrap_or(Category::Other)
    }

    /// Whether `key` names one of the known categories
    pub fn is_known(key: &str) -> bool {
        Self::ALL.iter().any(|c| c.key() == key)
    }

    pub fn key(&self) -> &'static str {
        match self {
            Category::Food => "food",
            Category::Transport => "transport",
            Category::Shopping => "shopping",
            Category::Bills => "bills",
            Category::Entertainment => "entertainment",
            Category::Health => "health",
            Category::Education => "education",
            Category::Other => "other",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Category::Food => "Food",
            Category::Transport => "Transport",
            Category::Shopping => "Shopping",
            Category::Bills => "Bills",
            Category::Entertainment => "Entertainment",
            Category::Health => "Health",
            Category::Education => "Education",
            Category::Other => "Other",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            Category::Food => "🍔",
            Category::Transport => "🚗",
            Category::Shopping => "🛍️",
            Category::Bills => "📄",
            Category::Entertainment => "🎬",
            Category::Health => "💊",
            Category::Education => "📚",
            Category::Other => "📦",
        }
    }

    /// Chart colour as a CSS hex string
    pub fn color(&self) -> &'static str {
        match self {
            Category::Food => "#f97316",
            Category::Transport => "#3b82f6",
            Category::Shopping => "#ec4899",
            Category::Bills => "#8b5cf6",
            Category::Entertainment => "#06b6d4",
            Category::Health => "#10b981",
            Category::Education => "#f59e0b",
            Category::Other => "#6b7280",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A single expense as stored in the ledger document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseRecord {
    /// Opaque unique id, assigned once at creation
    pub id: String,
    pub title: String,
    /// Amount in currency units
    pub amount: f64,
    /// Category key, see [`Category`]
    pub category: String,
    /// Day the expense occurred (YYYY-MM-DD)
    pub date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ExpenseRecord {
    /// Display category for this record
    pub fn display_category(&self) -> Category {
        Category::from_key(&self.category)
    }
}

/// User-entered fields for creating or editing an expense.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseDraft {
    pub title: String,
    pub amount: f64,
    pub category: String,
    /// Date as entered (YYYY-MM-DD)
    pub date: String,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Criteria for the expense list view. Empty or absent criteria match everything.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseFilter {
    #[serde(default)]
    pub search_term: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub date: Option<NaiveDate>,
}

impl ExpenseFilter {
    pub fn is_empty(&self) -> bool {
        self.search_term.is_empty()
            && self.category.as_deref().map_or(true, str::is_empty)
            && self.date.is_none()
    }
}

/// User preferences. Missing keys load as their defaults and unknown keys are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub dark_mode: bool,
    pub notifications: bool,
    pub large_expense_alert: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            dark_mode: false,
            notifications: true,
            large_expense_alert: true,
        }
    }
}

/// Partial settings, as found in an imported document
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsPatch {
    pub dark_mode: Option<bool>,
    pub notifications: Option<bool>,
    pub large_expense_alert: Option<bool>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationType {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationEntry {
    pub id: String,
    pub title: String,
    pub message: String,
    #[serde(rename = "type")]
    pub notification_type: NotificationType,
    pub timestamp: DateTime<Utc>,
    pub read: bool,
}

/// Stored account. `password` is obfuscated, not hashed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// The signed-in user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub name: String,
    pub email: String,
}

/// Backup document produced by export and accepted by import.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportDocument {
    pub user: Option<UserProfile>,
    pub expenses: Vec<ExpenseRecord>,
    pub settings: Settings,
    pub exported_at: DateTime<Utc>,
}

/// Current-month figures shown on the dashboard cards
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DashboardSummary {
    pub monthly_total: f64,
    pub daily_average: f64,
    pub transaction_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryTotal {
    pub category: String,
    pub total: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthTotal {
    pub year: i32,
    /// 1-based month
    pub month: u32,
    /// Short month name, e.g. "Jan"
    pub label: String,
    pub total: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryExtremes {
    pub highest: CategoryTotal,
    pub lowest: CategoryTotal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsReport {
    pub category_totals: Vec<CategoryTotal>,
    pub trailing_months: Vec<MonthTotal>,
    pub average_transaction: f64,
    pub extremes: Option<CategoryExtremes>,
    /// Percentage change against last month; `None` when last month had no spending
    pub month_over_month_change: Option<f64>,
}

/// Expense row prepared for display
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormattedExpense {
    pub id: String,
    pub title: String,
    pub notes: Option<String>,
    pub category_label: String,
    pub category_icon: String,
    pub category_color: String,
    pub formatted_date: String,
    pub formatted_amount: String,
    pub raw_amount: f64,
}

/// Specific validation failures for user input
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ValidationIssue {
    EmptyTitle,
    AmountNotFinite,
    AmountNotPositive,
    EmptyCategory,
    InvalidDate(String),
    MissingField(String),
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationIssue::EmptyTitle => write!(f, "title must not be empty"),
            ValidationIssue::AmountNotFinite => write!(f, "amount must be a number"),
            ValidationIssue::AmountNotPositive => write!(f, "amount must be greater than zero"),
            ValidationIssue::EmptyCategory => write!(f, "category must not be empty"),
            ValidationIssue::InvalidDate(value) => write!(f, "'{}' is not a valid date", value),
            ValidationIssue::MissingField(field) => write!(f, "{} is required", field),
        }
    }
}

/// Commands issued by a presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum Command {
    AddExpense(ExpenseDraft),
    UpdateExpense { id: String, patch: ExpenseDraft },
    DeleteExpense { id: String },
    SetFilter(ExpenseFilter),
    ClearFilter,
    /// Expenses matching the current filter
    ListExpenses,
    /// Expenses matching the current filter, formatted for display
    ExpenseTable,
    Dashboard,
    Analytics,
    GetSettings,
    SetDarkMode { enabled: bool },
    SetNotifications { enabled: bool },
    SetLargeExpenseAlert { enabled: bool },
    ListNotifications,
    MarkNotificationRead { id: String },
    MarkAllNotificationsRead,
    ClearNotifications,
    SignUp { name: String, email: String, password: String },
    Login { email: String, password: String },
    Logout,
    DeleteAccount,
    CurrentUser,
    /// Export; writes a backup file when `directory` is given
    Export {
        #[serde(default)]
        directory: Option<String>,
    },
    Import { contents: String },
    ImportFile { path: String },
}

impl Command {
    /// Wire name of the command, safe to log (carries no payload)
    pub fn name(&self) -> &'static str {
        match self {
            Command::AddExpense(_) => "add_expense",
            Command::UpdateExpense { .. } => "update_expense",
            Command::DeleteExpense { .. } => "delete_expense",
            Command::SetFilter(_) => "set_filter",
            Command::ClearFilter => "clear_filter",
            Command::ListExpenses => "list_expenses",
            Command::ExpenseTable => "expense_table",
            Command::Dashboard => "dashboard",
            Command::Analytics => "analytics",
            Command::GetSettings => "get_settings",
            Command::SetDarkMode { .. } => "set_dark_mode",
            Command::SetNotifications { .. } => "set_notifications",
            Command::SetLargeExpenseAlert { .. } => "set_large_expense_alert",
            Command::ListNotifications => "list_notifications",
            Command::MarkNotificationRead { .. } => "mark_notification_read",
            Command::MarkAllNotificationsRead => "mark_all_notifications_read",
            Command::ClearNotifications => "clear_notifications",
            Command::SignUp { .. } => "sign_up",
            Command::Login { .. } => "login",
            Command::Logout => "logout",
            Command::DeleteAccount => "delete_account",
            Command::CurrentUser => "current_user",
            Command::Export { .. } => "export",
            Command::Import { .. } => "import",
            Command::ImportFile { .. } => "import_file",
        }
    }

    /// Whether the command can change persisted state
    pub fn is_mutation(&self) -> bool {
        !matches!(
            self,
            Command::ListExpenses
                | Command::ExpenseTable
                | Command::Dashboard
                | Command::Analytics
                | Command::GetSettings
                | Command::ListNotifications
                | Command::CurrentUser
                | Command::Export { .. }
        )
    }
}

/// Result of a successfully executed [`Command`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum CommandOutcome {
    Expense(ExpenseRecord),
    Expenses(Vec<ExpenseRecord>),
    ExpenseTable(Vec<FormattedExpense>),
    Deleted { removed: bool },
    Filter(ExpenseFilter),
    Dashboard(DashboardSummary),
    Analytics(AnalyticsReport),
    Settings { settings: Settings, theme: Theme },
    Notifications {
        entries: Vec<NotificationEntry>,
        unread_count: usize,
    },
    User(Option<UserProfile>),
    Exported {
        path: Option<String>,
        document: ExportDocument,
    },
    Imported {
        expense_count: usize,
        settings: Settings,
    },
    Done,
}

/// Which part of the application state changed after a command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StateChange {
    Expenses,
    Filter,
    Settings,
    Notifications,
    Account,
}

/// Structured error for command responses
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorPayload {
    pub kind: String,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_category_falls_back_to_other() {
        assert_eq!(Category::from_key("groceries"), Category::Other);
        assert_eq!(Category::from_key("bills"), Category::Bills);
        assert!(!Category::is_known("groceries"));
    }

    #[test]
    fn test_settings_missing_keys_use_defaults() {
        let settings: Settings = serde_json::from_str(r#"{"darkMode": true, "fontSize": 3}"#).unwrap();
        assert!(settings.dark_mode);
        assert!(settings.notifications);
        assert!(settings.large_expense_alert);
    }

    #[test]
    fn test_expense_record_uses_camel_case_fields() {
        let json = r#"{
            "id": "1704880800000",
            "title": "Coffee",
            "amount": 4.5,
            "category": "food",
            "date": "2024-01-10",
            "notes": "",
            "createdAt": "2024-01-10T09:00:00.000Z",
            "updatedAt": "2024-01-10T09:00:00.000Z"
        }"#;
        let record: ExpenseRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.date, NaiveDate::from_ymd_opt(2024, 1, 10).unwrap());
        assert_eq!(record.notes.as_deref(), Some(""));

        let value = serde_json::to_value(&record).unwrap();
        assert!(value.get("createdAt").is_some());
        assert!(value.get("created_at").is_none());
    }

    #[test]
    fn test_command_wire_format() {
        let command: Command =
            serde_json::from_str(r#"{"command": "delete_expense", "id": "abc"}"#).unwrap();
        assert_eq!(command, Command::DeleteExpense { id: "abc".to_string() });
        assert_eq!(command.name(), "delete_expense");
        assert!(command.is_mutation());

        let command: Command = serde_json::from_str(r#"{"command": "dashboard"}"#).unwrap();
        assert!(!command.is_mutation());
    }

    #[test]
    fn test_filter_payload_uses_camel_case() {
        let command: Command = serde_json::from_str(
            r#"{"command": "set_filter", "searchTerm": "coffee", "category": "food"}"#,
        )
        .unwrap();
        match &command {
            Command::SetFilter(filter) => {
                assert_eq!(filter.search_term, "coffee");
                assert_eq!(filter.category.as_deref(), Some("food"));
                assert_eq!(filter.date, None);
            }
            other => panic!("unexpected command: {:?}", other),
        }

        let value = serde_json::to_value(ExpenseFilter::default()).unwrap();
        assert!(value.get("searchTerm").is_some());
        assert!(value.get("search_term").is_none());
    }
}
