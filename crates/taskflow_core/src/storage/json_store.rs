use crate::error::AppError;
use crate::model::{Task, Theme};
use crate::storage::TaskRepository;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::debug;

pub const SCHEMA_VERSION: u32 = 1;
const STORE_FILE_NAME: &str = "tasks.json";
const STORE_ENV_VAR: &str = "TASKFLOW_STORE_PATH";

#[derive(Debug, Serialize, Deserialize)]
struct StoredTasks {
    schema_version: u32,
    tasks: Vec<Task>,
    #[serde(default)]
    theme: Option<Theme>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskState {
    pub tasks: Vec<Task>,
    pub theme: Option<Theme>,
}

pub fn store_path() -> Result<PathBuf, AppError> {
    if let Ok(path) = std::env::var(STORE_ENV_VAR)
        && !path.trim().is_empty()
    {
        return Ok(PathBuf::from(path));
    }

    if cfg!(windows) {
        let appdata =
            std::env::var("APPDATA").map_err(|_| AppError::invalid_data("APPDATA is not set"))?;
        Ok(PathBuf::from(appdata).join("taskflow").join(STORE_FILE_NAME))
    } else {
        let home = std::env::var("HOME").map_err(|_| AppError::invalid_data("HOME is not set"))?;
        Ok(PathBuf::from(home)
            .join(".config")
            .join("taskflow")
            .join(STORE_FILE_NAME))
    }
}

/// Reads the store document, or `None` when nothing has been saved yet.
#[tracing::instrument(skip(path), fields(file = %path.display()))]
pub fn load_state(path: &Path) -> Result<Option<TaskState>, AppError> {
    if !path.exists() {
        debug!("store file absent");
        return Ok(None);
    }

    let content = std::fs::read_to_string(path).map_err(|err| AppError::io(err.to_string()))?;
    let stored: StoredTasks =
        serde_json::from_str(&content).map_err(|err| AppError::invalid_data(err.to_string()))?;

    if !(1..=SCHEMA_VERSION).contains(&stored.schema_version) {
        return Err(AppError::invalid_data("schema_version mismatch"));
    }

    let mut seen = HashSet::with_capacity(stored.tasks.len());
    for task in &stored.tasks {
        if !seen.insert(task.id.as_str()) {
            return Err(AppError::invalid_data(format!(
                "duplicate task id '{}'",
                task.id
            )));
        }
    }

    debug!(count = stored.tasks.len(), "loaded tasks");
    Ok(Some(TaskState {
        tasks: stored.tasks,
        theme: stored.theme,
    }))
}

/// Writes the whole document to a sibling temp file and renames it over
/// `path`, so readers only ever see the previous or the new version.
#[tracing::instrument(skip(path, state), fields(file = %path.display(), count = state.tasks.len()))]
pub fn save_state(path: &Path, state: &TaskState) -> Result<(), AppError> {
    write_document(path, state, |temp, target| {
        temp.persist(target).map(|_| ()).map_err(|err| {
            AppError::io(format!("failed to persist {}: {}", target.display(), err))
        })
    })?;

    debug!("saved store");
    Ok(())
}

/// Stages the document in a temp file next to `path` and hands it to
/// `commit`. The temp file is removed if `commit` fails.
fn write_document<F>(path: &Path, state: &TaskState, commit: F) -> Result<(), AppError>
where
    F: FnOnce(NamedTempFile, &Path) -> Result<(), AppError>,
{
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir).map_err(|err| AppError::io(err.to_string()))?;

    let stored = StoredTasks {
        schema_version: SCHEMA_VERSION,
        tasks: state.tasks.to_vec(),
        theme: state.theme,
    };
    let content = serde_json::to_string_pretty(&stored)
        .map_err(|err| AppError::invalid_data(err.to_string()))?;

    let mut temp = NamedTempFile::new_in(dir).map_err(|err| AppError::io(err.to_string()))?;
    temp.write_all(content.as_bytes())
        .map_err(|err| AppError::io(err.to_string()))?;
    temp.flush().map_err(|err| AppError::io(err.to_string()))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let permissions = std::fs::Permissions::from_mode(0o600);
        std::fs::set_permissions(temp.path(), permissions)
            .map_err(|err| AppError::io(err.to_string()))?;
    }

    commit(temp, path)
}

#[derive(Debug, Clone)]
pub struct JsonStore {
    path: PathBuf,
}

impl JsonStore {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    pub fn from_env() -> Result<Self, AppError> {
        Ok(Self::new(store_path()?))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TaskRepository for JsonStore {
    fn load(&self) -> Result<Option<Vec<Task>>, AppError> {
        Ok(load_state(&self.path)?.map(|state| state.tasks))
    }

    fn save(&mut self, tasks: &[Task]) -> Result<(), AppError> {
        let theme = load_state(&self.path)?.and_then(|state| state.theme);
        save_state(
            &self.path,
            &TaskState {
                tasks: tasks.to_vec(),
                theme,
            },
        )
    }

    fn load_theme(&self) -> Result<Option<Theme>, AppError> {
        Ok(load_state(&self.path)?.and_then(|state| state.theme))
    }

    fn save_theme(&mut self, theme: Theme) -> Result<(), AppError> {
        let tasks = load_state(&self.path)?
            .map(|state| state.tasks)
            .unwrap_or_default();
        save_state(
            &self.path,
            &TaskState {
                tasks,
                theme: Some(theme),
            },
        )
    }
}
