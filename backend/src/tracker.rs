//! # Tracker
//!
//! Owns every domain service for one data store and exposes the operations a
//! presentation layer needs, either as methods or through [`Tracker::execute`].
//!
//! Listeners registered with [`Tracker::subscribe`] hear about each part of the
//! state that a successful mutation changed. Failed operations notify no one,
//! even when a storage error left an in-memory change behind.

use log::{debug, error, info};
use shared::{
    AnalyticsReport, Command, CommandOutcome, DashboardSummary, ExpenseDraft, ExpenseFilter,
    ExpenseRecord, ExportDocument, FormattedExpense, NotificationEntry, NotificationType, Settings,
    StateChange, Theme, UserProfile,
};
use std::path::{Path, PathBuf};

use crate::domain::aggregation::{analytics_report, dashboard_summary};
use crate::domain::formatting::expense_rows;
use crate::domain::{
    filter_expenses, AccountService, Clock, ExportService, Ledger, NotificationLog,
    SettingsService, SystemClock,
};
use crate::error::TrackerResult;
use crate::storage::Connection;

pub type Listener = Box<dyn Fn(StateChange) + Send + Sync>;

pub const WELCOME_TITLE: &str = "Welcome to ExpenseTracker!";
const WELCOME_MESSAGE: &str =
    "Start tracking your expenses to get insights into your spending habits.";

pub struct Tracker<C: Connection> {
    ledger: Ledger<C>,
    notifications: NotificationLog<C>,
    settings: SettingsService<C>,
    accounts: AccountService<C>,
    export_service: ExportService,
    clock: Box<dyn Clock>,
    filter: ExpenseFilter,
    listeners: Vec<Listener>,
}

impl<C: Connection> Tracker<C> {
    /// Load every document from `connection`, using the wall clock
    pub fn open(connection: C) -> TrackerResult<Self> {
        Self::with_clock(connection, SystemClock)
    }

    pub fn with_clock(connection: C, clock: impl Clock + 'static) -> TrackerResult<Self> {
        let tracker = Self {
            ledger: Ledger::load(&connection)?,
            notifications: NotificationLog::load(&connection)?,
            settings: SettingsService::load(&connection)?,
            accounts: AccountService::load(&connection)?,
            export_service: ExportService::new(),
            clock: Box::new(clock),
            filter: ExpenseFilter::default(),
            listeners: Vec::new(),
        };
        info!(
            "Tracker ready: {} expenses, {} notifications",
            tracker.ledger.len(),
            tracker.notifications.len()
        );
        Ok(tracker)
    }

    /// Register a listener for state changes
    pub fn subscribe(&mut self, listener: impl Fn(StateChange) + Send + Sync + 'static) {
        self.listeners.push(Box::new(listener));
    }

    fn notify(&self, changes: &[StateChange]) {
        for change in changes {
            for listener in &self.listeners {
                listener(*change);
            }
        }
    }

    // Expenses

    pub fn add_expense(&mut self, draft: ExpenseDraft) -> TrackerResult<ExpenseRecord> {
        let before = self.notifications.len();
        let settings = self.settings.get();
        let record = self
            .ledger
            .add(draft, self.clock.now(), &settings, &mut self.notifications)?;

        if self.notifications.len() > before {
            self.notify(&[StateChange::Expenses, StateChange::Notifications]);
        } else {
            self.notify(&[StateChange::Expenses]);
        }
        Ok(record)
    }

    pub fn update_expense(&mut self, id: &str, patch: ExpenseDraft) -> TrackerResult<ExpenseRecord> {
        let record = self.ledger.update(id, patch, self.clock.now())?;
        self.notify(&[StateChange::Expenses]);
        Ok(record)
    }

    /// Delete by id; returns whether anything was removed
    pub fn delete_expense(&mut self, id: &str) -> TrackerResult<bool> {
        let removed = self.ledger.remove(id)?;
        if removed {
            self.notify(&[StateChange::Expenses]);
        }
        Ok(removed)
    }

    pub fn expenses(&self) -> Vec<ExpenseRecord> {
        self.ledger.list()
    }

    pub fn expense(&self, id: &str) -> Option<ExpenseRecord> {
        self.ledger.get(id)
    }

    // Filter

    pub fn set_filter(&mut self, filter: ExpenseFilter) -> ExpenseFilter {
        self.filter = filter;
        self.notify(&[StateChange::Filter]);
        self.filter.clone()
    }

    pub fn clear_filter(&mut self) -> ExpenseFilter {
        self.set_filter(ExpenseFilter::default())
    }

    pub fn filter(&self) -> &ExpenseFilter {
        &self.filter
    }

    /// Expenses matching the current filter, in ledger order
    pub fn filtered_expenses(&self) -> Vec<ExpenseRecord> {
        filter_expenses(self.ledger.records(), &self.filter)
    }

    pub fn expense_table(&self) -> Vec<FormattedExpense> {
        expense_rows(&self.filtered_expenses())
    }

    // Reports

    pub fn dashboard(&self) -> DashboardSummary {
        dashboard_summary(self.ledger.records(), self.clock.today())
    }

    pub fn analytics(&self) -> AnalyticsReport {
        analytics_report(self.ledger.records(), self.clock.today())
    }

    // Settings

    pub fn settings(&self) -> Settings {
        self.settings.get()
    }

    pub fn theme(&self) -> Theme {
        self.settings.theme()
    }

    pub fn set_dark_mode(&mut self, enabled: bool) -> TrackerResult<Settings> {
        let settings = self.settings.set_dark_mode(enabled)?;
        self.notify(&[StateChange::Settings]);
        Ok(settings)
    }

    pub fn set_notifications(&mut self, enabled: bool) -> TrackerResult<Settings> {
        let settings = self.settings.set_notifications(enabled)?;
        self.notify(&[StateChange::Settings]);
        Ok(settings)
    }

    pub fn set_large_expense_alert(&mut self, enabled: bool) -> TrackerResult<Settings> {
        let settings = self.settings.set_large_expense_alert(enabled)?;
        self.notify(&[StateChange::Settings]);
        Ok(settings)
    }

    // Notifications

    pub fn notifications(&self) -> Vec<NotificationEntry> {
        self.notifications.list()
    }

    pub fn unread_count(&self) -> usize {
        self.notifications.unread_count()
    }

    pub fn mark_notification_read(&mut self, id: &str) -> TrackerResult<bool> {
        let found = self.notifications.mark_read(id)?;
        if found {
            self.notify(&[StateChange::Notifications]);
        }
        Ok(found)
    }

    pub fn mark_all_notifications_read(&mut self) -> TrackerResult<usize> {
        let changed = self.notifications.mark_all_read()?;
        if changed > 0 {
            self.notify(&[StateChange::Notifications]);
        }
        Ok(changed)
    }

    pub fn clear_notifications(&mut self) -> TrackerResult<()> {
        self.notifications.clear_all()?;
        self.notify(&[StateChange::Notifications]);
        Ok(())
    }

    // Accounts

    pub fn current_user(&self) -> Option<UserProfile> {
        self.accounts.current_user()
    }

    /// Register and sign in, starting from an empty ledger with a welcome notification
    pub fn sign_up(&mut self, name: &str, email: &str, password: &str) -> TrackerResult<UserProfile> {
        let user = self.accounts.sign_up(name, email, password)?;

        self.ledger.clear()?;
        self.notifications.clear_all()?;
        self.filter = ExpenseFilter::default();
        self.notifications.record(
            WELCOME_TITLE,
            WELCOME_MESSAGE,
            NotificationType::Success,
            self.clock.now(),
        )?;

        self.notify(&[
            StateChange::Account,
            StateChange::Expenses,
            StateChange::Notifications,
        ]);
        Ok(user)
    }

    pub fn login(&mut self, email: &str, password: &str) -> TrackerResult<UserProfile> {
        let user = self.accounts.login(email, password)?;
        self.notify(&[StateChange::Account]);
        Ok(user)
    }

    /// Sign out and clear the ledger and notifications
    pub fn logout(&mut self) -> TrackerResult<()> {
        self.accounts.logout()?;
        self.ledger.clear()?;
        self.notifications.clear_all()?;
        self.filter = ExpenseFilter::default();

        self.notify(&[
            StateChange::Account,
            StateChange::Expenses,
            StateChange::Notifications,
        ]);
        Ok(())
    }

    /// Remove the signed-in account and every stored document
    pub fn delete_account(&mut self) -> TrackerResult<UserProfile> {
        let user = self.accounts.delete_account()?;

        self.ledger.remove_document()?;
        self.notifications.remove_document()?;
        self.settings.reset()?;
        self.filter = ExpenseFilter::default();

        self.notify(&[
            StateChange::Account,
            StateChange::Expenses,
            StateChange::Settings,
            StateChange::Notifications,
        ]);
        Ok(user)
    }

    // Export / import

    pub fn export_document(&self) -> ExportDocument {
        self.export_service.build_document(
            self.accounts.current_user(),
            self.ledger.list(),
            self.settings.get(),
            self.clock.now(),
        )
    }

    pub fn export_json(&self) -> TrackerResult<String> {
        self.export_service.to_json(&self.export_document())
    }

    /// Write a dated backup file into `directory` and return its path
    pub fn export_to_directory(&self, directory: &Path) -> TrackerResult<PathBuf> {
        self.export_service
            .write_backup(&self.export_document(), directory)
    }

    /// Apply an import document; nothing changes unless the whole document is valid
    pub fn import_json(&mut self, text: &str) -> TrackerResult<(usize, Settings)> {
        let plan = self.export_service.parse_import(text)?;
        let mut changes = Vec::new();

        if let Some(expenses) = plan.expenses {
            self.ledger.replace_all(expenses)?;
            changes.push(StateChange::Expenses);
        }
        if let Some(patch) = plan.settings {
            self.settings.merge(patch)?;
            changes.push(StateChange::Settings);
        }

        info!("Imported document: {} expenses now in ledger", self.ledger.len());
        self.notify(&changes);
        Ok((self.ledger.len(), self.settings.get()))
    }

    pub fn import_file(&mut self, path: &Path) -> TrackerResult<(usize, Settings)> {
        let contents = self.export_service.read_import_file(path)?;
        self.import_json(&contents)
    }

    // Commands

    /// Run one command and describe its result
    pub fn execute(&mut self, command: Command) -> TrackerResult<CommandOutcome> {
        let name = command.name();
        debug!("Executing command {}", name);

        let outcome = self.dispatch(command);
        if let Err(e) = &outcome {
            error!("Command {} failed: {}", name, e);
        }
        outcome
    }

    fn dispatch(&mut self, command: Command) -> TrackerResult<CommandOutcome> {
        let outcome = match command {
            Command::AddExpense(draft) => CommandOutcome::Expense(self.add_expense(draft)?),
            Command::UpdateExpense { id, patch } => {
                CommandOutcome::Expense(self.update_expense(&id, patch)?)
            }
            Command::DeleteExpense { id } => CommandOutcome::Deleted {
                removed: self.delete_expense(&id)?,
            },
            Command::SetFilter(filter) => CommandOutcome::Filter(self.set_filter(filter)),
            Command::ClearFilter => CommandOutcome::Filter(self.clear_filter()),
            Command::ListExpenses => CommandOutcome::Expenses(self.filtered_expenses()),
            Command::ExpenseTable => CommandOutcome::ExpenseTable(self.expense_table()),
            Command::Dashboard => CommandOutcome::Dashboard(self.dashboard()),
            Command::Analytics => CommandOutcome::Analytics(self.analytics()),
            Command::GetSettings => self.settings_outcome(),
            Command::SetDarkMode { enabled } => {
                self.set_dark_mode(enabled)?;
                self.settings_outcome()
            }
            Command::SetNotifications { enabled } => {
                self.set_notifications(enabled)?;
                self.settings_outcome()
            }
            Command::SetLargeExpenseAlert { enabled } => {
                self.set_large_expense_alert(enabled)?;
                self.settings_outcome()
            }
            Command::ListNotifications => self.notifications_outcome(),
            Command::MarkNotificationRead { id } => {
                self.mark_notification_read(&id)?;
                self.notifications_outcome()
            }
            Command::MarkAllNotificationsRead => {
                self.mark_all_notifications_read()?;
                self.notifications_outcome()
            }
            Command::ClearNotifications => {
                self.clear_notifications()?;
                self.notifications_outcome()
            }
            Command::SignUp {
                name,
                email,
                password,
            } => CommandOutcome::User(Some(self.sign_up(&name, &email, &password)?)),
            Command::Login { email, password } => {
                CommandOutcome::User(Some(self.login(&email, &password)?))
            }
            Command::Logout => {
                self.logout()?;
                CommandOutcome::User(None)
            }
            Command::DeleteAccount => {
                self.delete_account()?;
                CommandOutcome::User(None)
            }
            Command::CurrentUser => CommandOutcome::User(self.current_user()),
            Command::Export { directory } => {
                let document = self.export_document();
                let path = match directory {
                    Some(dir) => Some(
                        self.export_service
                            .write_backup(&document, Path::new(&dir))?
                            .display()
                            .to_string(),
                    ),
                    None => None,
                };
                CommandOutcome::Exported { path, document }
            }
            Command::Import { contents } => {
                let (expense_count, settings) = self.import_json(&contents)?;
                CommandOutcome::Imported {
                    expense_count,
                    settings,
                }
            }
            Command::ImportFile { path } => {
                let (expense_count, settings) = self.import_file(Path::new(&path))?;
                CommandOutcome::Imported {
                    expense_count,
                    settings,
                }
            }
        };
        Ok(outcome)
    }

    fn settings_outcome(&self) -> CommandOutcome {
        CommandOutcome::Settings {
            settings: self.settings(),
            theme: self.theme(),
        }
    }

    fn notifications_outcome(&self) -> CommandOutcome {
        CommandOutcome::Notifications {
            entries: self.notifications(),
            unread_count: self.unread_count(),
        }
    }
}
