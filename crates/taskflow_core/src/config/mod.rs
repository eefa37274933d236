use crate::error::AppError;
use crate::model::Theme;
use crate::view::StatusFilter;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

const CONFIG_FILE_NAME: &str = "config.json";
const CONFIG_ENV_VAR: &str = "TASKFLOW_CONFIG_PATH";

#[derive(Debug, Clone)]
pub struct Palette {
    pub accent: &'static str,
    pub muted: &'static str,
    pub alert: &'static str,
    pub reset: &'static str,
}

impl Palette {
    fn paint(&self, color: &str, text: &str) -> String {
        if color.is_empty() {
            text.to_string()
        } else {
            format!("{}{}{}", color, text, self.reset)
        }
    }

    pub fn accentize(&self, text: &str) -> String {
        self.paint(self.accent, text)
    }

    pub fn mutedize(&self, text: &str) -> String {
        self.paint(self.muted, text)
    }

    pub fn alertize(&self, text: &str) -> String {
        self.paint(self.alert, text)
    }
}

pub fn palette_for_theme(theme: Theme) -> Palette {
    match theme {
        Theme::Dark => Palette {
            accent: "\x1b[38;5;208m",
            muted: "\x1b[38;5;250m",
            alert: "\x1b[38;5;203m",
            reset: "\x1b[0m",
        },
        Theme::Light => Palette {
            accent: "",
            muted: "",
            alert: "",
            reset: "",
        },
    }
}

/// Maps free-form theme names onto a [`Theme`]. Returns `None` for names
/// that mean neither light nor dark, including blank ones.
pub fn canonical_theme_name(raw: &str) -> Option<Theme> {
    let mut cleaned = String::new();
    let mut previous_underscore = false;

    for ch in raw.chars() {
        if ch.is_ascii_alphanumeric() {
            cleaned.push(ch.to_ascii_lowercase());
            previous_underscore = false;
        } else if !previous_underscore && !cleaned.is_empty() {
            cleaned.push('_');
            previous_underscore = true;
        }
    }

    match cleaned.trim_matches('_') {
        "light" | "default" | "vanilla" | "light_mode" | "lightmode" => Some(Theme::Light),
        "dark" | "noir" | "dark_mode" | "darkmode" => Some(Theme::Dark),
        _ => None,
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct RawConfig {
    #[serde(default)]
    theme: Option<String>,
    #[serde(default)]
    default_filter: Option<String>,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    pub theme: Option<Theme>,
    pub default_filter: Option<StatusFilter>,
}

impl Config {
    pub fn theme_or_default(&self) -> Theme {
        self.theme.unwrap_or_default()
    }

    pub fn filter_or_default(&self) -> StatusFilter {
        self.default_filter.unwrap_or_default()
    }
}

#[derive(Debug, Clone)]
pub struct ConfigLoad {
    pub config: Config,
    pub error: Option<AppError>,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ConfigOverrides {
    pub theme: Option<String>,
    pub default_filter: Option<String>,
}

pub fn config_path() -> Result<PathBuf, AppError> {
    if let Ok(path) = std::env::var(CONFIG_ENV_VAR)
        && !path.trim().is_empty()
    {
        return Ok(PathBuf::from(path));
    }

    if cfg!(windows) {
        let appdata =
            std::env::var("APPDATA").map_err(|_| AppError::invalid_data("APPDATA is not set"))?;
        Ok(PathBuf::from(appdata)
            .join("taskflow")
            .join(CONFIG_FILE_NAME))
    } else {
        let home = std::env::var("HOME").map_err(|_| AppError::invalid_data("HOME is not set"))?;
        Ok(PathBuf::from(home)
            .join(".config")
            .join("taskflow")
            .join(CONFIG_FILE_NAME))
    }
}

pub fn load_config_with_fallback() -> ConfigLoad {
    match config_path() {
        Ok(path) => load_config_with_fallback_from_path(&path),
        Err(err) => ConfigLoad {
            config: Config::default(),
            error: Some(err),
        },
    }
}

fn load_config_with_fallback_from_path(path: &Path) -> ConfigLoad {
    if !path.exists() {
        debug!(file = %path.display(), "no config file, using defaults");
        return ConfigLoad {
            config: Config::default(),
            error: None,
        };
    }

    match load_config_from_path(path) {
        Ok(config) => ConfigLoad {
            config,
            error: None,
        },
        Err(err) => ConfigLoad {
            config: Config::default(),
            error: Some(err),
        },
    }
}

fn load_config_from_path(path: &Path) -> Result<Config, AppError> {
    let content = std::fs::read_to_string(path)
        .map_err(|err| AppError::io(format!("{}: {}", path.display(), err)))?;
    let raw: RawConfig = serde_json::from_str(&content).map_err(|err| {
        AppError::invalid_data(format!("invalid JSON in {}: {}", path.display(), err))
    })?;

    let config = Config {
        theme: raw.theme.as_deref().map(parse_theme).transpose()?,
        default_filter: raw
            .default_filter
            .as_deref()
            .map(str::parse::<StatusFilter>)
            .transpose()
            .map_err(|err| AppError::invalid_data(format!("{}: {}", path.display(), err.message())))?,
    };
    debug!(file = %path.display(), ?config, "loaded config");
    Ok(config)
}

fn parse_theme(raw: &str) -> Result<Theme, AppError> {
    canonical_theme_name(raw)
        .ok_or_else(|| AppError::invalid_data(format!("unknown theme '{}'", raw.trim())))
}

pub fn merge_overrides(base: &Config, overrides: &ConfigOverrides) -> Result<Config, AppError> {
    let mut merged = *base;
    if let Some(theme) = overrides.theme.as_deref() {
        merged.theme = Some(
            canonical_theme_name(theme)
                .ok_or_else(|| AppError::invalid_input(format!("unknown theme '{}'", theme.trim())))?,
        );
    }

    if let Some(filter) = overrides.default_filter.as_deref() {
        merged.default_filter = Some(filter.parse()?);
    }

    Ok(merged)
}
