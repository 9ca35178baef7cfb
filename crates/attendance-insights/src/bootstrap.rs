use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use attendance_core::settings::APP_DIR_NAME;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

// ── Directory bootstrap ────────────────────────────────────────────────────────

/// Ensure the `~/.attendance-insights/` directory hierarchy exists.
///
/// Creates the following directories if absent (including any missing parents):
/// - `~/.attendance-insights/`
/// - `~/.attendance-insights/logs/`
/// - `~/.attendance-insights/data/`
pub fn ensure_directories() -> anyhow::Result<()> {
    let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
    let app_dir = home.join(APP_DIR_NAME);
    std::fs::create_dir_all(app_dir.join("logs"))?;
    std::fs::create_dir_all(app_dir.join("data"))?;
    Ok(())
}

// ── Logging bootstrap ──────────────────────────────────────────────────────────

/// Map Python-style level names onto an `EnvFilter` directive.
fn level_directive(log_level: &str) -> String {
    match log_level.to_uppercase().as_str() {
        "DEBUG" => "debug".to_string(),
        "INFO" => "info".to_string(),
        "WARNING" => "warn".to_string(),
        "ERROR" | "CRITICAL" => "error".to_string(),
        _ => log_level.to_lowercase(),
    }
}

/// Initialise the global `tracing` subscriber.
///
/// Output goes to stderr, or is appended to `log_file` when one is given so
/// that report output on stdout stays clean.
pub fn setup_logging(log_level: &str, log_file: Option<&PathBuf>) -> anyhow::Result<()> {
    let filter =
        EnvFilter::try_new(level_directive(log_level)).unwrap_or_else(|_| EnvFilter::new("warn"));

    let (file_layer, stderr_layer) = match log_file {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            let layer = fmt::layer()
                .with_target(false)
                .with_ansi(false)
                .with_writer(Mutex::new(file));
            (Some(layer), None)
        }
        None => {
            let layer = fmt::layer()
                .with_target(false)
                .with_thread_ids(false)
                .with_writer(std::io::stderr);
            (None, Some(layer))
        }
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .with(stderr_layer)
        .init();

    Ok(())
}

// ── Data-path discovery ────────────────────────────────────────────────────────

/// Attempt to locate an attendance table when `--data-path` was not given.
///
/// Checks, in order, relative to the working directory and then the home
/// directory:
/// 1. `./data/attendance_sample.xlsx`
/// 2. `./data/attendance_sample.csv`
/// 3. `./data/attendance.csv`
/// 4. `./data/`
/// 5. `~/.attendance-insights/data/` (only when it holds at least one table)
pub fn discover_data_path() -> Option<PathBuf> {
    let cwd = std::env::current_dir().ok()?;
    let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
    discover_data_path_in(&cwd, &home)
}

fn discover_data_path_in(cwd: &Path, home: &Path) -> Option<PathBuf> {
    let local = cwd.join("data");
    let files = [
        local.join("attendance_sample.xlsx"),
        local.join("attendance_sample.csv"),
        local.join("attendance.csv"),
    ];
    if let Some(file) = files.into_iter().find(|p| p.is_file()) {
        return Some(file);
    }
    if local.is_dir() {
        return Some(local);
    }

    let user_data = home.join(APP_DIR_NAME).join("data");
    let has_tables = !attendance_data::reader::find_data_files(&user_data).is_empty();
    has_tables.then_some(user_data)
}

// ── Tests ──────────────────────────────────────────────────────────────────────
