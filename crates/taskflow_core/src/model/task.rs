use crate::error::AppError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use time::Date;
use time::macros::format_description;

time::serde::format_description!(iso_date, Date, "[year]-[month]-[day]");

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub priority: Priority,
    #[serde(default, with = "iso_date::option")]
    pub due_date: Option<Date>,
    #[serde(default)]
    pub completed: bool,
    #[serde(with = "iso_date")]
    pub created_at: Date,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Priority {
    pub fn label(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Priority {
    type Err = AppError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let trimmed = raw.trim();
        [Self::Low, Self::Medium, Self::High]
            .into_iter()
            .find(|priority| priority.label().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| AppError::invalid_input("priority must be Low, Medium or High"))
    }
}

/// Unvalidated form input for a task.
///
/// Every field is kept as the user typed it; an empty `priority` means the
/// priority was never chosen and an empty `due_date` means no due date.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskDraft {
    pub title: String,
    pub description: String,
    pub priority: String,
    pub due_date: String,
}

impl TaskDraft {
    pub fn new<T: Into<String>, P: Into<String>>(title: T, priority: P) -> Self {
        Self {
            title: title.into(),
            priority: priority.into(),
            ..Self::default()
        }
    }

    pub fn with_description<D: Into<String>>(mut self, description: D) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_due_date<D: Into<String>>(mut self, due_date: D) -> Self {
        self.due_date = due_date.into();
        self
    }

    /// Pre-fills a draft with the current values of `task`, as an edit form would.
    pub fn from_task(task: &Task) -> Self {
        Self {
            title: task.title.clone(),
            description: task.description.clone(),
            priority: task.priority.label().to_string(),
            due_date: task.due_date.map(format_iso_date).unwrap_or_default(),
        }
    }
}

pub fn parse_iso_date(raw: &str) -> Result<Date, time::error::Parse> {
    Date::parse(raw.trim(), format_description!("[year]-[month]-[day]"))
}

pub fn format_iso_date(date: Date) -> String {
    format!(
        "{:04}-{:02}-{:02}",
        date.year(),
        u8::from(date.month()),
        date.day()
    )
}
