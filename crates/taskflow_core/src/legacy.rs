//! Import of task lists exported from the TaskFlow web app.
//!
//! The web app kept its list as a JSON array with camelCase keys, numeric
//! ids and either a `completed` flag or a `status` string. Records are
//! normalised into [`Task`] values; due dates are taken as-is since these are
//! existing records rather than new drafts.

use crate::error::AppError;
use crate::model::{Priority, Task, parse_iso_date};
use crate::task_api::ID_PREFIX;
use crate::validation::TITLE_MIN_CHARS;
use serde::Deserialize;
use time::Date;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LegacyTask {
    id: serde_json::Value,
    title: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    priority: String,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    completed: Option<bool>,
    #[serde(default)]
    due_date: Option<String>,
    #[serde(default)]
    created_at: Option<String>,
}

pub const SAMPLE_EXPORT: &str = r#"[
  {
    "id": 1,
    "title": "Complete project report",
    "description": "Finish the Q4 sales report with charts",
    "priority": "high",
    "status": "pending",
    "dueDate": "2026-02-15",
    "createdAt": "2025-01-29"
  },
  {
    "id": 2,
    "title": "Buy groceries",
    "description": "Milk, bread, eggs, vegetables",
    "priority": "low",
    "status": "completed",
    "dueDate": "2025-01-30",
    "createdAt": "2025-01-28"
  },
  {
    "id": 3,
    "title": "Schedule dentist appointment",
    "description": "",
    "priority": "medium",
    "status": "pending",
    "dueDate": "2025-02-05",
    "createdAt": "2025-01-27"
  },
  {
    "id": 4,
    "title": "Reply to client email",
    "description": "Respond to ABC Corp about the proposal",
    "priority": "high",
    "status": "pending",
    "dueDate": "2026-10-01",
    "createdAt": "2025-01-29"
  },
  {
    "id": 5,
    "title": "Pay electricity bill",
    "description": "",
    "priority": "medium",
    "status": "completed",
    "dueDate": "2025-01-25",
    "createdAt": "2025-01-20"
  }
]"#;

pub fn sample_tasks(today: Date) -> Result<Vec<Task>, AppError> {
    parse_legacy_export(SAMPLE_EXPORT, today)
}

/// Converts an exported JSON array into tasks, keeping its order.
/// `today` stands in for records that never recorded a creation date.
pub fn parse_legacy_export(content: &str, today: Date) -> Result<Vec<Task>, AppError> {
    let records: Vec<LegacyTask> = serde_json::from_str(content)
        .map_err(|err| AppError::invalid_data(format!("invalid export: {err}")))?;

    records
        .into_iter()
        .enumerate()
        .map(|(index, record)| {
            convert(record, today)
                .map_err(|message| AppError::invalid_data(format!("record {index}: {message}")))
        })
        .collect()
}

fn convert(record: LegacyTask, today: Date) -> Result<Task, String> {
    let id = match &record.id {
        serde_json::Value::Number(number) => format!("{ID_PREFIX}{number}"),
        serde_json::Value::String(value) if !value.trim().is_empty() => value.trim().to_string(),
        _ => return Err("id must be a number or a non-empty string".to_string()),
    };

    let title = record.title.trim();
    if title.chars().count() < TITLE_MIN_CHARS {
        return Err(format!("title must be at least {TITLE_MIN_CHARS} characters"));
    }

    let priority = record
        .priority
        .parse::<Priority>()
        .map_err(|err| err.message())?;

    let completed = match (record.completed, record.status.as_deref()) {
        (Some(completed), _) => completed,
        (None, Some(status)) => status.trim().eq_ignore_ascii_case("completed"),
        (None, None) => false,
    };

    let due_date = parse_optional_date(record.due_date.as_deref(), "dueDate")?;
    let created_at = parse_optional_date(record.created_at.as_deref(), "createdAt")?.unwrap_or(today);

    Ok(Task {
        id,
        title: title.to_string(),
        description: record.description.unwrap_or_default().trim().to_string(),
        priority,
        due_date,
        completed,
        created_at,
    })
}

fn parse_optional_date(raw: Option<&str>, field: &str) -> Result<Option<Date>, String> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => parse_iso_date(value)
            .map(Some)
            .map_err(|_| format!("{field} '{value}' is not a YYYY-MM-DD date")),
    }
}
