use clap::{ArgAction, Parser, Subcommand};
use taskflow_core::config::ConfigOverrides;

#[derive(Parser, Debug)]
#[command(name = "taskflow", author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Output JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Override configuration values (format KEY=VALUE)
    #[arg(long = "config-override", value_name = "KEY=VALUE", global = true)]
    pub config_override: Vec<String>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Add a new task
    ///
    /// Example: taskflow add "Pay bill" -p high --due 2099-01-01
    Add {
        title: Option<String>,
        #[arg(short, long, default_value = "")]
        description: String,
        #[arg(short, long, default_value = "")]
        priority: String,
        #[arg(long, value_name = "YYYY-MM-DD", default_value = "")]
        due: String,
    },
    /// Edit a task; fields not given keep their current value
    ///
    /// Example: taskflow edit task-1 --title "Pay water bill" --priority low
    Edit {
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(short, long)]
        description: Option<String>,
        #[arg(short, long)]
        priority: Option<String>,
        #[arg(long, value_name = "YYYY-MM-DD", conflicts_with = "clear_due")]
        due: Option<String>,
        /// Remove the due date
        #[arg(long)]
        clear_due: bool,
    },
    /// Toggle a task between pending and completed
    ///
    /// Example: taskflow toggle task-1
    #[command(alias = "done")]
    Toggle { id: String },
    /// Delete a task
    ///
    /// Example: taskflow delete task-1
    Delete { id: String },
    /// Move a task to another position (positions as shown by `list`)
    ///
    /// Example: taskflow move 0 2
    Move { from: usize, to: usize },
    /// List tasks
    ///
    /// Example: taskflow list --filter pending --search report
    List {
        /// all, pending or completed
        #[arg(short, long)]
        filter: Option<String>,
        /// Case-insensitive title search
        #[arg(short, long, default_value = "")]
        search: String,
    },
    /// Show details of a task
    ///
    /// Example: taskflow show task-1
    Show { id: String },
    /// Show or change the theme
    ///
    /// Example: taskflow theme toggle
    /// Example: taskflow theme dark
    Theme {
        /// light, dark or toggle
        mode: Option<String>,
    },
    /// Import tasks exported from the TaskFlow web app
    ///
    /// Example: taskflow import tasks-export.json
    Import { file: std::path::PathBuf },
    /// Load the sample tasks into an empty list
    Seed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigOverrideTarget {
    Theme,
    DefaultFilter,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedConfigOverride {
    pub target: ConfigOverrideTarget,
    pub value: String,
}

/// Parse a raw `KEY=VALUE` override string into a structured target.
pub fn parse_config_override(raw: &str) -> Result<ParsedConfigOverride, String> {
    let trimmed = raw.trim();
    let (key_raw, value_raw) = trimmed
        .split_once('=')
        .ok_or_else(|| "override must be in KEY=VALUE format".to_string())?;

    let value = value_raw.trim().to_string();
    let canonical_field = canonicalize_flag_name(key_raw)
        .ok_or_else(|| "override key cannot be empty".to_string())?;

    match canonical_field.as_str() {
        "theme" => Ok(ParsedConfigOverride {
            target: ConfigOverrideTarget::Theme,
            value,
        }),
        "default_filter" | "filter" => Ok(ParsedConfigOverride {
            target: ConfigOverrideTarget::DefaultFilter,
            value,
        }),
        other => Err(format!("unknown config field '{other}'")),
    }
}

pub fn collect_config_overrides(raw: &[String]) -> Result<ConfigOverrides, String> {
    let mut overrides = ConfigOverrides::default();
    for entry in raw {
        let parsed = parse_config_override(entry)?;
        match parsed.target {
            ConfigOverrideTarget::Theme => overrides.theme = Some(parsed.value),
            ConfigOverrideTarget::DefaultFilter => overrides.default_filter = Some(parsed.value),
        }
    }
    Ok(overrides)
}

fn canonicalize_flag_name(name: &str) -> Option<String> {
    let mut cleaned = String::new();
    let mut previous_underscore = false;

    for ch in name.chars() {
        if ch.is_ascii_alphanumeric() {
            cleaned.push(ch.to_ascii_lowercase());
            previous_underscore = false;
        } else if !previous_underscore && !cleaned.is_empty() {
            cleaned.push('_');
            previous_underscore = true;
        }
    }

    let trimmed = cleaned.trim_matches('_');
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Splits an interactive input line into arguments, honouring double quotes.
pub fn split_command_line(line: &str) -> Result<Vec<String>, String> {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut quoted = false;
    let mut escape = false;

    for ch in line.chars() {
        if escape {
            if ch != '"' && ch != '\\' {
                current.push('\\');
            }
            current.push(ch);
            escape = false;
            continue;
        }

        if in_quotes && ch == '\\' {
            escape = true;
            continue;
        }

        if ch == '"' {
            in_quotes = !in_quotes;
            quoted = true;
            continue;
        }

        if ch.is_whitespace() && !in_quotes {
            if !current.is_empty() || quoted {
                args.push(std::mem::take(&mut current));
                quoted = false;
            }
            continue;
        }

        current.push(ch);
    }

    if in_quotes {
        return Err("unterminated quote in command".to_string());
    }

    if !current.is_empty() || quoted {
        args.push(current);
    }

    Ok(args)
}
