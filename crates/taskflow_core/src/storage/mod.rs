use crate::error::AppError;
use crate::model::{Task, Theme};

pub mod json_store;

pub use json_store::JsonStore;

/// Durable home of the task collection and the theme flag.
///
/// `save` followed by `load` must give back the same tasks in the same order,
/// and a failed `save` must leave whatever was stored before untouched.
pub trait TaskRepository {
    fn load(&self) -> Result<Option<Vec<Task>>, AppError>;

    fn save(&mut self, tasks: &[Task]) -> Result<(), AppError>;

    fn load_theme(&self) -> Result<Option<Theme>, AppError>;

    fn save_theme(&mut self, theme: Theme) -> Result<(), AppError>;
}

#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    tasks: Option<Vec<Task>>,
    theme: Option<Theme>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tasks(tasks: Vec<Task>) -> Self {
        Self {
            tasks: Some(tasks),
            theme: None,
        }
    }
}

impl TaskRepository for MemoryStore {
    fn load(&self) -> Result<Option<Vec<Task>>, AppError> {
        Ok(self.tasks.clone())
    }

    fn save(&mut self, tasks: &[Task]) -> Result<(), AppError> {
        self.tasks = Some(tasks.to_vec());
        Ok(())
    }

    fn load_theme(&self) -> Result<Option<Theme>, AppError> {
        Ok(self.theme)
    }

    fn save_theme(&mut self, theme: Theme) -> Result<(), AppError> {
        self.theme = Some(theme);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{MemoryStore, TaskRepository};
    use crate::model::{Priority, Task, Theme};
    use time::macros::date;

    #[test]
    fn memory_store_starts_absent_and_round_trips() {
        let mut store = MemoryStore::new();
        assert_eq!(store.load().unwrap(), None);
        assert_eq!(store.load_theme().unwrap(), None);

        let tasks = vec![Task {
            id: "task-1".to_string(),
            title: "demo".to_string(),
            description: String::new(),
            priority: Priority::Low,
            due_date: None,
            completed: false,
            created_at: date!(2025 - 12 - 20),
        }];
        store.save(&tasks).unwrap();
        store.save_theme(Theme::Dark).unwrap();

        assert_eq!(store.load().unwrap(), Some(tasks));
        assert_eq!(store.load_theme().unwrap(), Some(Theme::Dark));
    }
}
