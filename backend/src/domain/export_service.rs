//! Export service domain logic.
//!
//! Builds the backup document, writes it to disk, and checks an import
//! document in full before anything is applied. Applying an import plan is
//! left to the tracker, which owns the ledger and settings.

use anyhow::Context;
use chrono::{DateTime, NaiveDate, Utc};
use log::{info, warn};
use serde_json::Value;
use shared::{ExpenseRecord, ExportDocument, Settings, SettingsPatch, UserProfile};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{TrackerError, TrackerResult};

/// Validated contents of an import document
#[derive(Debug, Clone, PartialEq)]
pub struct ImportPlan {
    /// Replacement ledger, when the document carried `expenses`
    pub expenses: Option<Vec<ExpenseRecord>>,
    /// Keys to merge over the current settings
    pub settings: Option<SettingsPatch>,
}

#[derive(Debug, Clone, Default)]
pub struct ExportService;

impl ExportService {
    pub fn new() -> Self {
        Self
    }

    pub fn build_document(
        &self,
        user: Option<UserProfile>,
        expenses: Vec<ExpenseRecord>,
        settings: Settings,
        now: DateTime<Utc>,
    ) -> ExportDocument {
        ExportDocument {
            user,
            expenses,
            settings,
            exported_at: now,
        }
    }

    /// Pretty-printed JSON with two-space indentation
    pub fn to_json(&self, document: &ExportDocument) -> TrackerResult<String> {
        let json = serde_json::to_string_pretty(document).context("Failed to serialize export document")?;
        Ok(json)
    }

    pub fn backup_file_name(&self, date: NaiveDate) -> String {
        format!("expense-tracker-backup-{}.json", date.format("%Y-%m-%d"))
    }

    /// Write the document into `directory`, creating it if needed, and return the file path
    pub fn write_backup(&self, document: &ExportDocument, directory: &Path) -> TrackerResult<PathBuf> {
        info!("📄 EXPORT: Writing backup of {} expenses to {}", document.expenses.len(), directory.display());

        fs::create_dir_all(directory)
            .with_context(|| format!("Failed to create export directory: {}", directory.display()))?;

        let path = directory.join(self.backup_file_name(document.exported_at.date_naive()));
        let json = self.to_json(document)?;
        fs::write(&path, json).with_context(|| format!("Failed to write backup file: {}", path.display()))?;

        info!("✅ EXPORT: Backup written to {}", path.display());
        Ok(path)
    }

    pub fn read_import_file(&self, path: &Path) -> TrackerResult<String> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read import file: {}", path.display()))?;
        Ok(contents)
    }

    /// Check an import document and extract what it would change.
    ///
    /// A key holding `null` counts as absent. The document must carry at
    /// least one of `expenses` or `settings`.
    pub fn parse_import(&self, text: &str) -> TrackerResult<ImportPlan> {
        let value: Value = serde_json::from_str(text).map_err(|e| reject(format!("not valid JSON ({})", e)))?;

        let object = value
            .as_object()
            .ok_or_else(|| reject("expected a JSON object".to_string()))?;

        let expenses = match object.get("expenses") {
            None | Some(Value::Null) => None,
            Some(value @ Value::Array(_)) => {
                let records: Vec<ExpenseRecord> = serde_json::from_value(value.clone())
                    .map_err(|e| reject(format!("invalid expense record ({})", e)))?;
                Some(records)
            }
            Some(_) => return Err(reject("'expenses' must be an array".to_string())),
        };

        let settings = match object.get("settings") {
            None | Some(Value::Null) => None,
            Some(value @ Value::Object(_)) => {
                let patch: SettingsPatch = serde_json::from_value(value.clone())
                    .map_err(|e| reject(format!("invalid settings ({})", e)))?;
                Some(patch)
            }
            Some(_) => return Err(reject("'settings' must be an object".to_string())),
        };

        if expenses.is_none() && settings.is_none() {
            return Err(reject("document has neither expenses nor settings".to_string()));
        }

        info!(
            "📥 IMPORT: Parsed document with {} expenses, settings: {}",
            expenses.as_ref().map_or(0, Vec::len),
            settings.is_some()
        );
        Ok(ImportPlan { expenses, settings })
    }
}

fn reject(reason: String) -> TrackerError {
    warn!("❌ IMPORT: Rejected document: {}", reason);
    TrackerError::ImportFormat(reason)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::TempDir;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 15, 8, 30, 0).unwrap()
    }

    fn sample_record() -> ExpenseRecord {
        ExpenseRecord {
            id: "exp-1".to_string(),
            title: "Coffee".to_string(),
            amount: 4.5,
            category: "food".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
            notes: None,
            created_at: now(),
            updated_at: now(),
        }
    }

    #[test]
    fn test_document_shape() {
        let service = ExportService::new();
        let document = service.build_document(None, vec![sample_record()], Settings::default(), now());
        let json = service.to_json(&document).unwrap();

        let value: Value = serde_json::from_str(&json).unwrap();
        assert!(value["user"].is_null());
        assert_eq!(value["expenses"].as_array().unwrap().len(), 1);
        assert_eq!(value["settings"]["largeExpenseAlert"], Value::Bool(true));
        assert!(value.get("exportedAt").is_some());
        assert!(json.contains("\n  \"expenses\""));
    }

    #[test]
    fn test_write_backup_uses_dated_file_name() {
        let temp_dir = TempDir::new().unwrap();
        let target = temp_dir.path().join("backups");
        let service = ExportService::new();
        let document = service.build_document(None, vec![sample_record()], Settings::default(), now());

        let path = service.write_backup(&document, &target).unwrap();
        assert_eq!(path.file_name().unwrap(), "expense-tracker-backup-2024-01-15.json");

        let contents = service.read_import_file(&path).unwrap();
        let plan = service.parse_import(&contents).unwrap();
        assert_eq!(plan.expenses, Some(vec![sample_record()]));
        assert_eq!(
            plan.settings,
            Some(SettingsPatch {
                dark_mode: Some(false),
                notifications: Some(true),
                large_expense_alert: Some(true),
            })
        );
    }

    #[test]
    fn test_settings_only_document() {
        let plan = ExportService::new()
            .parse_import(r#"{"settings": {"darkMode": true, "theme": "blue"}, "expenses": null}"#)
            .unwrap();
        assert_eq!(plan.expenses, None);
        assert_eq!(plan.settings.unwrap().dark_mode, Some(true));
    }

    #[test]
    fn test_rejected_documents() {
        let service = ExportService::new();
        let cases = [
            "not json at all",
            "[1, 2, 3]",
            r#"{"user": null}"#,
            r#"{"expenses": "many"}"#,
            r#"{"expenses": [{"id": "x"}]}"#,
            r#"{"settings": [true]}"#,
            r#"{"settings": {"darkMode": "yes"}}"#,
        ];
        for case in cases {
            let err = service.parse_import(case).unwrap_err();
            assert!(
                matches!(err, TrackerError::ImportFormat(_)),
                "expected import error for {}",
                case
            );
        }
    }
}
