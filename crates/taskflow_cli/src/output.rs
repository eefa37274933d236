use tabled::settings::Style;
use tabled::{Table, Tabled};
use taskflow_core::model::{Task, format_iso_date};
use taskflow_core::view::TaskView;
use time::Date;

#[derive(Tabled)]
struct TaskRow {
    #[tabled(rename = "#")]
    position: usize,
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Priority")]
    priority: &'static str,
    #[tabled(rename = "Due")]
    due: String,
    #[tabled(rename = "Status")]
    status: &'static str,
}

/// Day-first rendering used wherever a date is shown to the user.
pub fn format_display_date(date: Date) -> String {
    format!(
        "{:02}/{:02}/{:04}",
        date.day(),
        u8::from(date.month()),
        date.year()
    )
}

pub fn status_label(task: &Task, overdue: bool) -> &'static str {
    if task.completed {
        "completed"
    } else if overdue {
        "overdue"
    } else {
        "pending"
    }
}

pub fn render_table(views: &[TaskView<'_>]) -> String {
    let rows = views.iter().map(|view| TaskRow {
        position: view.position,
        id: view.task.id.clone(),
        title: view.task.title.clone(),
        priority: view.task.priority.label(),
        due: view
            .task
            .due_date
            .map(format_display_date)
            .unwrap_or_else(|| "-".to_string()),
        status: status_label(view.task, view.overdue),
    });

    Table::new(rows).with(Style::sharp()).to_string()
}

pub fn render_details(task: &Task, overdue: bool) -> String {
    let description = if task.description.is_empty() {
        "-"
    } else {
        task.description.as_str()
    };
    let due = task
        .due_date
        .map(format_display_date)
        .unwrap_or_else(|| "-".to_string());

    format!(
        "ID:          {}\nTitle:       {}\nDescription: {}\nPriority:    {}\nDue:         {}\nStatus:      {}\nCreated:     {}",
        task.id,
        task.title,
        description,
        task.priority,
        due,
        status_label(task, overdue),
        format_display_date(task.created_at),
    )
}

pub fn task_json(task: &Task, overdue: bool) -> serde_json::Value {
    serde_json::json!({
        "id": task.id,
        "title": task.title,
        "description": task.description,
        "priority": task.priority,
        "due_date": task.due_date.map(format_iso_date),
        "completed": task.completed,
        "created_at": format_iso_date(task.created_at),
        "overdue": overdue,
    })
}

pub fn view_json(views: &[TaskView<'_>]) -> serde_json::Value {
    let payload = views
        .iter()
        .map(|view| {
            let mut value = task_json(view.task, view.overdue);
            value["position"] = serde_json::json!(view.position);
            value
        })
        .collect();
    serde_json::Value::Array(payload)
}
