mod task;
mod theme;

pub use task::{Priority, Task, TaskDraft, format_iso_date, parse_iso_date};
pub use theme::Theme;
