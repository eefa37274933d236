use crate::model::{Priority, TaskDraft, parse_iso_date};
use std::collections::BTreeMap;
use std::fmt;
use time::Date;

pub const TITLE_MIN_CHARS: usize = 3;

pub const TITLE_TOO_SHORT: &str = "Title must be at least 3 characters";
pub const PRIORITY_REQUIRED: &str = "Priority is required";
pub const PRIORITY_UNKNOWN: &str = "Priority must be Low, Medium or High";
pub const DUE_DATE_MALFORMED: &str = "Due date must be a valid YYYY-MM-DD date";
pub const DUE_DATE_IN_PAST: &str = "Due date cannot be in the past";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    Title,
    Priority,
    DueDate,
}

impl Field {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Priority => "priority",
            Self::DueDate => "due_date",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Field-level errors for a draft. Empty means the draft is valid.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    errors: BTreeMap<Field, String>,
}

impl ValidationErrors {
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn get(&self, field: Field) -> Option<&str> {
        self.errors.get(&field).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, &str)> {
        self.errors
            .iter()
            .map(|(field, message)| (*field, message.as_str()))
    }

    fn insert(&mut self, field: Field, message: &str) {
        self.errors.insert(field, message.to_string());
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, message) in self.iter() {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{field}: {message}")?;
            first = false;
        }
        Ok(())
    }
}

/// Typed fields of a draft that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidDraft {
    pub title: String,
    pub description: String,
    pub priority: Priority,
    pub due_date: Option<Date>,
}

pub fn validate_draft(draft: &TaskDraft, today: Date) -> ValidationErrors {
    match check_draft(draft, today) {
        Ok(_) => ValidationErrors::default(),
        Err(errors) => errors,
    }
}

/// Runs every rule against `draft` and either returns the typed fields or
/// all the field errors found. Rules never short-circuit each other.
pub fn check_draft(draft: &TaskDraft, today: Date) -> Result<ValidDraft, ValidationErrors> {
    let mut errors = ValidationErrors::default();

    let title = draft.title.trim();
    if title.chars().count() < TITLE_MIN_CHARS {
        errors.insert(Field::Title, TITLE_TOO_SHORT);
    }

    let priority = if draft.priority.trim().is_empty() {
        errors.insert(Field::Priority, PRIORITY_REQUIRED);
        None
    } else {
        match draft.priority.parse::<Priority>() {
            Ok(priority) => Some(priority),
            Err(_) => {
                errors.insert(Field::Priority, PRIORITY_UNKNOWN);
                None
            }
        }
    };

    let due_date = if draft.due_date.trim().is_empty() {
        None
    } else {
        match parse_iso_date(&draft.due_date) {
            Ok(date) if date < today => {
                errors.insert(Field::DueDate, DUE_DATE_IN_PAST);
                None
            }
            Ok(date) => Some(date),
            Err(_) => {
                errors.insert(Field::DueDate, DUE_DATE_MALFORMED);
                None
            }
        }
    };

    match priority {
        Some(priority) if errors.is_empty() => Ok(ValidDraft {
            title: title.to_string(),
            description: draft.description.trim().to_string(),
            priority,
            due_date,
        }),
        _ => Err(errors),
    }
}
