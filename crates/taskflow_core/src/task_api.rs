use crate::error::AppError;
use crate::model::{Task, TaskDraft};
use crate::validation::{ValidationErrors, check_draft};
use time::{Date, OffsetDateTime, UtcOffset};

pub const ID_PREFIX: &str = "task-";

pub fn local_offset() -> UtcOffset {
    UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC)
}

pub fn local_now() -> OffsetDateTime {
    OffsetDateTime::now_utc().to_offset(local_offset())
}

/// Calendar date in the local timezone, not the UTC date.
pub fn today() -> Date {
    local_now().date()
}

/// Picks an id derived from `now` that no task in `tasks` already uses.
pub fn allocate_id(tasks: &[Task], now: OffsetDateTime) -> String {
    let mut candidate = now.unix_timestamp_nanos();
    loop {
        let id = format!("{ID_PREFIX}{candidate}");
        if !tasks.iter().any(|task| task.id == id) {
            return id;
        }
        candidate += 1;
    }
}

pub fn find_task<'a>(tasks: &'a [Task], id: &str) -> Option<&'a Task> {
    let trimmed_id = id.trim();
    tasks.iter().find(|task| task.id == trimmed_id)
}

fn position_of(tasks: &[Task], id: &str) -> Option<usize> {
    let trimmed_id = id.trim();
    tasks.iter().position(|task| task.id == trimmed_id)
}

/// Validates `draft` and returns a new collection with the created task at
/// the front.
pub fn create_task(
    tasks: &[Task],
    draft: &TaskDraft,
    now: OffsetDateTime,
) -> Result<Vec<Task>, ValidationErrors> {
    let today = now.date();
    let valid = check_draft(draft, today)?;

    let task = Task {
        id: allocate_id(tasks, now),
        title: valid.title,
        description: valid.description,
        priority: valid.priority,
        due_date: valid.due_date,
        completed: false,
        created_at: today,
    };

    let mut next = Vec::with_capacity(tasks.len() + 1);
    next.push(task);
    next.extend_from_slice(tasks);
    Ok(next)
}

/// Replaces the editable fields of the task matching `id`.
///
/// Returns `Ok(None)` when no task has that id. `id`, `created_at` and
/// `completed` are never touched.
pub fn update_task(
    tasks: &[Task],
    id: &str,
    draft: &TaskDraft,
    today: Date,
) -> Result<Option<Vec<Task>>, ValidationErrors> {
    let valid = check_draft(draft, today)?;
    let Some(index) = position_of(tasks, id) else {
        return Ok(None);
    };

    let mut next = tasks.to_vec();
    let task = &mut next[index];
    task.title = valid.title;
    task.description = valid.description;
    task.priority = valid.priority;
    task.due_date = valid.due_date;

    Ok(Some(next))
}

pub fn toggle_complete(tasks: &[Task], id: &str) -> Option<Vec<Task>> {
    let index = position_of(tasks, id)?;
    let mut next = tasks.to_vec();
    next[index].completed = !next[index].completed;
    Some(next)
}

pub fn delete_task(tasks: &[Task], id: &str) -> Option<Vec<Task>> {
    let index = position_of(tasks, id)?;
    let mut next = tasks.to_vec();
    next.remove(index);
    Some(next)
}

/// Moves the task at `from` so that it ends up at `to`, shifting the tasks
/// in between.
pub fn reorder_tasks(tasks: &[Task], from: usize, to: usize) -> Result<Vec<Task>, AppError> {
    let len = tasks.len();
    for index in [from, to] {
        if index >= len {
            return Err(AppError::OutOfRange { index, len });
        }
    }

    let mut next = tasks.to_vec();
    let moved = next.remove(from);
    next.insert(to, moved);
    Ok(next)
}
