use crate::error::AppError;
use crate::model::Task;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use time::Date;

pub const EMPTY_SEARCH_MESSAGE: &str = "No tasks found for your search";
pub const EMPTY_LIST_MESSAGE: &str = "No tasks yet. Add your first task!";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusFilter {
    #[default]
    All,
    Pending,
    Completed,
}

impl StatusFilter {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Pending => "pending",
            Self::Completed => "completed",
        }
    }

    pub fn matches(self, task: &Task) -> bool {
        match self {
            Self::All => true,
            Self::Pending => !task.completed,
            Self::Completed => task.completed,
        }
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StatusFilter {
    type Err = AppError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(Self::All),
            "pending" => Ok(Self::Pending),
            "completed" => Ok(Self::Completed),
            other => Err(AppError::invalid_input(format!(
                "unknown filter '{other}', expected all, pending or completed"
            ))),
        }
    }
}

pub fn matches_search(task: &Task, search: &str) -> bool {
    search.is_empty() || task.title.to_lowercase().contains(&search.to_lowercase())
}

/// Tasks passing both the status filter and the title search, in collection order.
pub fn filter_tasks<'a>(tasks: &'a [Task], filter: StatusFilter, search: &str) -> Vec<&'a Task> {
    tasks
        .iter()
        .filter(|task| filter.matches(task) && matches_search(task, search))
        .collect()
}

pub fn is_overdue(task: &Task, today: Date) -> bool {
    if task.completed {
        return false;
    }
    task.due_date.is_some_and(|due| due < today)
}

/// One visible row: the task, its index in the full collection, and its
/// overdue flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskView<'a> {
    pub position: usize,
    pub task: &'a Task,
    pub overdue: bool,
}

pub fn derive_view<'a>(
    tasks: &'a [Task],
    filter: StatusFilter,
    search: &str,
    today: Date,
) -> Vec<TaskView<'a>> {
    tasks
        .iter()
        .enumerate()
        .filter(|(_, task)| filter.matches(task) && matches_search(task, search))
        .map(|(position, task)| TaskView {
            position,
            task,
            overdue: is_overdue(task, today),
        })
        .collect()
}

pub fn empty_message(search: &str) -> &'static str {
    if search.is_empty() {
        EMPTY_LIST_MESSAGE
    } else {
        EMPTY_SEARCH_MESSAGE
    }
}

#[cfg(test)]
mod tests {
    use super::{
        EMPTY_LIST_MESSAGE, EMPTY_SEARCH_MESSAGE, StatusFilter, derive_view, empty_message,
        filter_tasks, is_overdue, matches_search,
    };
    use crate::model::{Priority, Task};
    use time::macros::date;

    const TODAY: time::Date = date!(2026 - 10 - 18);

    fn task(id: &str, title: &str, completed: bool) -> Task {
        Task {
            id: id.to_string(),
            title: title.to_string(),
            description: String::new(),
            priority: Priority::Low,
            due_date: None,
            completed,
            created_at: date!(2025 - 01 - 29),
        }
    }

    fn sample() -> Vec<Task> {
        vec![
            task("task-1", "Complete project report", false),
            task("task-2", "Buy groceries", true),
            task("task-3", "Weekly Report review", true),
            task("task-4", "Reply to client email", false),
            task("task-5", "Archive old report", true),
        ]
    }

    #[test]
    fn status_filter_selects_by_completion() {
        let tasks = sample();

        assert_eq!(filter_tasks(&tasks, StatusFilter::All, "").len(), 5);
        let pending: Vec<&str> = filter_tasks(&tasks, StatusFilter::Pending, "")
            .iter()
            .map(|task| task.id.as_str())
            .collect();
        assert_eq!(pending, vec!["task-1", "task-4"]);
    }

    #[test]
    fn filter_and_search_are_conjunctive_and_stable() {
        let tasks = sample();
        let found: Vec<&str> = filter_tasks(&tasks, StatusFilter::Completed, "report")
            .iter()
            .map(|task| task.id.as_str())
            .collect();

        assert_eq!(found, vec!["task-3", "task-5"]);
    }

    #[test]
    fn search_is_case_insensitive_and_empty_passes() {
        let item = task("task-1", "Buy Groceries", false);
        assert!(matches_search(&item, "groc"));
        assert!(matches_search(&item, "BUY"));
        assert!(matches_search(&item, ""));
        assert!(!matches_search(&item, "milk"));
    }

    #[test]
    fn overdue_requires_pending_and_past_due_date() {
        let mut item = task("task-1", "Pay bill", false);
        assert!(!is_overdue(&item, TODAY));

        item.due_date = Some(date!(2000 - 01 - 01));
        assert!(is_overdue(&item, TODAY));

        item.completed = true;
        assert!(!is_overdue(&item, TODAY));

        item.completed = false;
        item.due_date = Some(TODAY);
        assert!(!is_overdue(&item, TODAY));
    }

    #[test]
    fn derive_view_keeps_collection_positions() {
        let mut tasks = sample();
        tasks[3].due_date = Some(date!(2000 - 01 - 01));

        let view = derive_view(&tasks, StatusFilter::Pending, "", TODAY);

        assert_eq!(view.len(), 2);
        assert_eq!(view[0].position, 0);
        assert!(!view[0].overdue);
        assert_eq!(view[1].position, 3);
        assert!(view[1].overdue);
    }

    #[test]
    fn parses_filter_names() {
        assert_eq!("Completed".parse::<StatusFilter>().unwrap(), StatusFilter::Completed);
        assert_eq!(" all ".parse::<StatusFilter>().unwrap(), StatusFilter::All);
        assert!("done".parse::<StatusFilter>().is_err());
    }

    #[test]
    fn empty_message_depends_on_search() {
        assert_eq!(empty_message(""), EMPTY_LIST_MESSAGE);
        assert_eq!(empty_message("milk"), EMPTY_SEARCH_MESSAGE);
    }
}
