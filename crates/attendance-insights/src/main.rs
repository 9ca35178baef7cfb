mod bootstrap;
mod report;

use anyhow::{Context, Result};
use attendance_core::settings::Settings;
use attendance_data::analysis::EmployeeQuery;
use attendance_runtime::data_manager::DataManager;

fn main() -> Result<()> {
    let settings = Settings::load_with_last_used();

    bootstrap::ensure_directories()?;
    bootstrap::setup_logging(&settings.log_level, settings.log_file.as_ref())?;

    tracing::info!("Attendance Insights v{} starting", env!("CARGO_PKG_VERSION"));

    let data_path = settings
        .data_path
        .clone()
        .or_else(bootstrap::discover_data_path)
        .context("no attendance data found; pass --data-path <FILE|DIR>")?;
    tracing::info!("Using data from {}", data_path.display());

    let manager = DataManager::shared(&data_path);
    let json = settings.wants_json();

    let output = if let Some(raw_id) = settings.employee.as_deref() {
        let query = EmployeeQuery::parse(raw_id)?;
        let report = manager.employee_report(query)?;
        if json {
            serde_json::to_string_pretty(&report)?
        } else {
            report::render_employee(&report)
        }
    } else if settings.list {
        let listing = manager.employees()?;
        if json {
            serde_json::to_string_pretty(&listing)?
        } else {
            report::render_listing(&listing)
        }
    } else {
        let overview = manager.overview()?;
        if json {
            serde_json::to_string_pretty(&overview)?
        } else {
            report::render_overview(&overview)
        }
    };

    println!("{output}");

    if let Some(elapsed) = manager.load_time() {
        tracing::debug!("Dataset load took {:.1} ms", elapsed.as_secs_f64() * 1000.0);
    }

    Ok(())
}
