pub mod board;
pub mod config;
pub mod error;
pub mod legacy;
pub mod model;
pub mod storage;
pub mod task_api;
pub mod validation;
pub mod view;

pub use board::{Committed, TaskBoard};
pub use error::AppError;
pub use model::{Priority, Task, TaskDraft, Theme};
pub use task_api::{create_task, delete_task, reorder_tasks, toggle_complete, update_task};
pub use validation::{ValidationErrors, validate_draft};
pub use view::{StatusFilter, filter_tasks, is_overdue};

#[cfg(test)]
mod tests {
    use crate::error::AppError;
    use crate::model::{Priority, Task};
    use time::macros::date;

    #[test]
    fn task_has_required_fields() {
        let task = Task {
            id: "task-1".to_string(),
            title: "demo".to_string(),
            description: String::new(),
            priority: Priority::Medium,
            due_date: None,
            completed: false,
            created_at: date!(2025 - 12 - 20),
        };

        assert_eq!(task.id, "task-1");
        assert_eq!(task.title, "demo");
        assert_eq!(task.priority, Priority::Medium);
        assert_eq!(task.created_at, date!(2025 - 12 - 20));
        assert_eq!(task.due_date, None);
        assert!(!task.completed);
    }

    #[test]
    fn app_error_exposes_code() {
        let err = AppError::invalid_input("missing title");
        assert_eq!(err.code(), "invalid_input");
        assert_eq!(err.to_string(), "invalid_input - missing title");

        let err = AppError::OutOfRange { index: 4, len: 2 };
        assert_eq!(err.code(), "out_of_range");
        assert_eq!(err.to_string(), "out_of_range - position 4 is outside 0..2");
    }
}
