use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use std::io::{self, BufRead};
use taskflow_cli::cli::{Cli, Command, collect_config_overrides, split_command_line};
use taskflow_cli::logging::init_tracing;
use taskflow_cli::output;
use taskflow_core::board::{Committed, TaskBoard};
use taskflow_core::config::{
    self, Config, ConfigOverrides, Palette, canonical_theme_name, merge_overrides,
    palette_for_theme,
};
use taskflow_core::error::AppError;
use taskflow_core::legacy;
use taskflow_core::model::{Task, TaskDraft, Theme};
use taskflow_core::storage::JsonStore;
use taskflow_core::task_api;
use taskflow_core::view::{StatusFilter, empty_message, is_overdue};
use tracing::{debug, warn};

struct Session {
    board: TaskBoard<JsonStore>,
    config: Config,
}

impl Session {
    fn open() -> Result<Self, AppError> {
        let loaded = config::load_config_with_fallback();
        if let Some(err) = loaded.error.as_ref() {
            warn!(error = %err, "ignoring unreadable config");
            eprintln!("WARNING: {}", err);
        }

        let store = JsonStore::from_env()?;
        debug!(file = %store.path().display(), "using task store");
        let board = TaskBoard::open(store, loaded.config.theme_or_default())?;

        Ok(Self {
            board,
            config: loaded.config,
        })
    }
}

fn report_persist_error<T>(committed: &Committed<T>) {
    if let Some(err) = committed.persist_error.as_ref() {
        eprintln!("WARNING: changes kept in memory but not saved: {}", err);
    }
}

fn print_task_result(cli_json: bool, palette: &Palette, headline: &str, task: &Task) {
    if cli_json {
        let overdue = is_overdue(task, task_api::today());
        println!("{}", output::task_json(task, overdue));
    } else {
        println!("{} {} ({})", palette.accentize(headline), task.title, task.id);
    }
}

fn parse_theme_argument(raw: &str) -> Result<Theme, AppError> {
    canonical_theme_name(raw).ok_or_else(|| {
        AppError::invalid_input(format!(
            "unknown theme '{}', expected light, dark or toggle",
            raw.trim()
        ))
    })
}

fn normalize_parse_error(err: clap::Error) -> AppError {
    let rendered = err.to_string();
    let first_line = rendered.lines().next().unwrap_or("invalid command").trim();
    let message = first_line
        .strip_prefix("error: ")
        .unwrap_or(first_line)
        .to_string();
    AppError::invalid_input(message)
}

fn print_help() {
    let mut cmd = Cli::command();
    let help = cmd.render_help();
    println!("{help}");
}

fn run_command(session: &mut Session, cli: Cli) -> Result<(), AppError> {
    let overrides: ConfigOverrides =
        collect_config_overrides(&cli.config_override).map_err(AppError::invalid_input)?;
    let config = merge_overrides(&session.config, &overrides)?;
    let display_theme = match overrides.theme {
        Some(_) => config.theme_or_default(),
        None => session.board.theme(),
    };
    let palette = palette_for_theme(display_theme);
    let board = &mut session.board;

    match cli.command {
        Command::Add {
            title,
            description,
            priority,
            due,
        } => {
            let draft = TaskDraft {
                title: title.unwrap_or_default(),
                description,
                priority,
                due_date: due,
            };
            let committed = board.create_task(&draft, task_api::local_now())?;
            report_persist_error(&committed);
            print_task_result(cli.json, &palette, "Task added successfully!", &committed.value);
        }
        Command::Edit {
            id,
            title,
            description,
            priority,
            due,
            clear_due,
        } => {
            let existing = board.find(&id).ok_or_else(|| AppError::not_found(id.trim()))?;
            let mut draft = TaskDraft::from_task(existing);
            if let Some(title) = title {
                draft.title = title;
            }
            if let Some(description) = description {
                draft.description = description;
            }
            if let Some(priority) = priority {
                draft.priority = priority;
            }
            if let Some(due) = due {
                draft.due_date = due;
            }
            if clear_due {
                draft.due_date.clear();
            }

            let committed = board.update_task(&id, &draft, task_api::today())?;
            report_persist_error(&committed);
            let task = committed
                .value
                .ok_or_else(|| AppError::not_found(id.trim()))?;
            print_task_result(cli.json, &palette, "Task updated successfully!", &task);
        }
        Command::Toggle { id } => {
            let committed = board.toggle_complete(&id);
            report_persist_error(&committed);
            let task = committed
                .value
                .ok_or_else(|| AppError::not_found(id.trim()))?;
            let headline = if task.completed {
                "Task completed!"
            } else {
                "Task marked as pending!"
            };
            print_task_result(cli.json, &palette, headline, &task);
        }
        Command::Delete { id } => {
            let committed = board.delete_task(&id);
            report_persist_error(&committed);
            let task = committed
                .value
                .ok_or_else(|| AppError::not_found(id.trim()))?;
            print_task_result(cli.json, &palette, "Task deleted successfully!", &task);
        }
        Command::Move { from, to } => {
            let committed = board.reorder_tasks(from, to)?;
            report_persist_error(&committed);
            if cli.json {
                let today = task_api::today();
                let views = board.view(StatusFilter::All, "", today);
                println!("{}", output::view_json(&views));
            } else {
                println!(
                    "{} {} -> {}",
                    palette.accentize("Task moved!"),
                    from,
                    to
                );
            }
        }
        Command::List { filter, search } => {
            let filter = match filter {
                Some(raw) => raw.parse::<StatusFilter>()?,
                None => config.filter_or_default(),
            };
            let today = task_api::today();
            let views = board.view(filter, &search, today);

            if cli.json {
                println!("{}", output::view_json(&views));
            } else if views.is_empty() {
                println!("{}", palette.mutedize(empty_message(&search)));
            } else {
                println!("{}", output::render_table(&views));
                let overdue = views.iter().filter(|view| view.overdue).count();
                if overdue > 0 {
                    println!("{}", palette.alertize(&format!("{overdue} overdue")));
                }
            }
        }
        Command::Show { id } => {
            let task = board.find(&id).ok_or_else(|| AppError::not_found(id.trim()))?;
            let overdue = is_overdue(task, task_api::today());
            if cli.json {
                println!("{}", output::task_json(task, overdue));
            } else {
                println!("{}", output::render_details(task, overdue));
            }
        }
        Command::Theme { mode } => {
            let theme = match mode.as_deref().map(str::trim) {
                None => board.theme(),
                Some(raw) if raw.eq_ignore_ascii_case("toggle") => {
                    let committed = board.toggle_theme();
                    report_persist_error(&committed);
                    committed.value
                }
                Some(raw) => {
                    let committed = board.set_theme(parse_theme_argument(raw)?);
                    report_persist_error(&committed);
                    committed.value
                }
            };
            if cli.json {
                println!("{}", serde_json::json!({ "theme": theme }));
            } else {
                let palette = palette_for_theme(theme);
                println!("Theme: {}", palette.accentize(theme.as_str()));
            }
        }
        Command::Import { file } => {
            let content = std::fs::read_to_string(&file)
                .map_err(|err| AppError::io(format!("{}: {}", file.display(), err)))?;
            let now = task_api::local_now();
            let tasks = legacy::parse_legacy_export(&content, now.date())?;
            let committed = board.import_tasks(tasks, now);
            report_persist_error(&committed);
            if cli.json {
                println!("{}", serde_json::json!({ "imported": committed.value }));
            } else {
                println!(
                    "{} {}",
                    palette.accentize("Tasks imported successfully!"),
                    committed.value
                );
            }
        }
        Command::Seed => {
            if !board.tasks().is_empty() {
                return Err(AppError::invalid_input(
                    "sample tasks can only be loaded into an empty list",
                ));
            }
            let now = task_api::local_now();
            let committed = board.import_tasks(legacy::sample_tasks(now.date())?, now);
            report_persist_error(&committed);
            if cli.json {
                println!("{}", serde_json::json!({ "imported": committed.value }));
            } else {
                println!(
                    "{} {}",
                    palette.accentize("Sample tasks loaded!"),
                    committed.value
                );
            }
        }
    }

    Ok(())
}

fn run_interactive(session: &mut Session) -> Result<(), AppError> {
    let mut input = String::new();
    let stdin = io::stdin();
    let mut stdin_lock = stdin.lock();

    loop {
        input.clear();
        let bytes = stdin_lock.read_line(&mut input)?;

        if bytes == 0 {
            break;
        }

        let line = input.trim();
        if line.is_empty() {
            continue;
        }

        if line.eq_ignore_ascii_case("exit") || line.eq_ignore_ascii_case("quit") {
            break;
        }

        if line == "help" || line == "?" {
            print_help();
            continue;
        }

        let args = match split_command_line(line) {
            Ok(args) => args,
            Err(message) => {
                eprintln!("ERROR: {}", AppError::invalid_input(message));
                continue;
            }
        };

        if args.is_empty() {
            continue;
        }

        let mut argv = Vec::with_capacity(args.len() + 1);
        argv.push("taskflow".to_string());
        argv.extend(args);

        let cli = match Cli::try_parse_from(argv) {
            Ok(cli) => cli,
            Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
                println!("{err}");
                continue;
            }
            Err(err) => {
                eprintln!("ERROR: {}", normalize_parse_error(err));
                continue;
            }
        };

        if let Err(err) = run_command(session, cli) {
            eprintln!("ERROR: {}", err);
        }
    }

    Ok(())
}

fn fail(err: AppError) -> ! {
    eprintln!("ERROR: {}", err);
    std::process::exit(1);
}

fn main() {
    let mut args = std::env::args_os();
    args.next();
    if args.next().is_none() {
        if let Err(err) = init_tracing(0) {
            fail(err);
        }
        let mut session = Session::open().unwrap_or_else(|err| fail(err));
        if let Err(err) = run_interactive(&mut session) {
            fail(err);
        }
        return;
    }

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            err.exit()
        }
        Err(err) => fail(normalize_parse_error(err)),
    };

    if let Err(err) = init_tracing(cli.verbose) {
        fail(err);
    }

    let mut session = Session::open().unwrap_or_else(|err| fail(err));
    if let Err(err) = run_command(&mut session, cli) {
        fail(err);
    }
}
