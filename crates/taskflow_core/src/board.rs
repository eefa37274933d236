use crate::error::AppError;
use crate::model::{Task, TaskDraft, Theme};
use crate::storage::TaskRepository;
use crate::task_api;
use crate::view::{StatusFilter, TaskView, derive_view};
use time::{Date, OffsetDateTime};
use tracing::{info, warn};

/// Outcome of a mutation that was applied in memory.
///
/// `persist_error` is set when writing the new state to the repository
/// failed; the in-memory state stays authoritative either way.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Committed<T> {
    pub value: T,
    pub persist_error: Option<AppError>,
}

impl<T> Committed<T> {
    fn new(value: T, persist_error: Option<AppError>) -> Self {
        Self {
            value,
            persist_error,
        }
    }

    fn unchanged(value: T) -> Self {
        Self::new(value, None)
    }
}

/// Owns the task collection and the theme for the lifetime of a session.
pub struct TaskBoard<R: TaskRepository> {
    repository: R,
    tasks: Vec<Task>,
    theme: Theme,
}

impl<R: TaskRepository> TaskBoard<R> {
    pub fn open(repository: R, default_theme: Theme) -> Result<Self, AppError> {
        let tasks = repository.load()?.unwrap_or_default();
        let theme = repository.load_theme()?.unwrap_or(default_theme);
        info!(count = tasks.len(), theme = %theme, "opened task board");

        Ok(Self {
            repository,
            tasks,
            theme,
        })
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }

    pub fn find(&self, id: &str) -> Option<&Task> {
        task_api::find_task(&self.tasks, id)
    }

    pub fn view(&self, filter: StatusFilter, search: &str, today: Date) -> Vec<TaskView<'_>> {
        derive_view(&self.tasks, filter, search, today)
    }

    pub fn create_task(
        &mut self,
        draft: &TaskDraft,
        now: OffsetDateTime,
    ) -> Result<Committed<Task>, AppError> {
        let next = task_api::create_task(&self.tasks, draft, now)?;
        let created = next
            .first()
            .cloned()
            .ok_or_else(|| AppError::invalid_data("created task missing from collection"))?;
        info!(id = %created.id, "created task");
        let persist_error = self.commit(next);
        Ok(Committed::new(created, persist_error))
    }

    pub fn update_task(
        &mut self,
        id: &str,
        draft: &TaskDraft,
        today: Date,
    ) -> Result<Committed<Option<Task>>, AppError> {
        let Some(next) = task_api::update_task(&self.tasks, id, draft, today)? else {
            return Ok(Committed::unchanged(None));
        };
        let updated = task_api::find_task(&next, id).cloned();
        info!(id = id.trim(), "updated task");
        let persist_error = self.commit(next);
        Ok(Committed::new(updated, persist_error))
    }

    pub fn toggle_complete(&mut self, id: &str) -> Committed<Option<Task>> {
        let Some(next) = task_api::toggle_complete(&self.tasks, id) else {
            return Committed::unchanged(None);
        };
        let toggled = task_api::find_task(&next, id).cloned();
        info!(id = id.trim(), "toggled task completion");
        let persist_error = self.commit(next);
        Committed::new(toggled, persist_error)
    }

    pub fn delete_task(&mut self, id: &str) -> Committed<Option<Task>> {
        let removed = self.find(id).cloned();
        let Some(next) = task_api::delete_task(&self.tasks, id) else {
            return Committed::unchanged(None);
        };
        info!(id = id.trim(), "deleted task");
        let persist_error = self.commit(next);
        Committed::new(removed, persist_error)
    }

    pub fn reorder_tasks(&mut self, from: usize, to: usize) -> Result<Committed<()>, AppError> {
        let next = task_api::reorder_tasks(&self.tasks, from, to)?;
        info!(from, to, "reordered tasks");
        let persist_error = self.commit(next);
        Ok(Committed::new((), persist_error))
    }

    /// Appends `imported` after the current tasks. Ids already in use are
    /// replaced with freshly allocated ones.
    pub fn import_tasks(&mut self, imported: Vec<Task>, now: OffsetDateTime) -> Committed<usize> {
        let mut next = self.tasks.clone();
        let count = imported.len();
        for mut task in imported {
            if next.iter().any(|existing| existing.id == task.id) {
                task.id = task_api::allocate_id(&next, now);
            }
            next.push(task);
        }
        info!(count, "imported tasks");
        let persist_error = self.commit(next);
        Committed::new(count, persist_error)
    }

    pub fn set_theme(&mut self, theme: Theme) -> Committed<Theme> {
        self.theme = theme;
        let persist_error = self.repository.save_theme(theme).err();
        if let Some(err) = persist_error.as_ref() {
            warn!(error = %err, "failed to persist theme");
        }
        Committed::new(theme, persist_error)
    }

    pub fn toggle_theme(&mut self) -> Committed<Theme> {
        self.set_theme(self.theme.toggled())
    }

    fn commit(&mut self, next: Vec<Task>) -> Option<AppError> {
        self.tasks = next;
        match self.repository.save(&self.tasks) {
            Ok(()) => None,
            Err(err) => {
                warn!(error = %err, "failed to persist tasks");
                Some(err)
            }
        }
    }
}
