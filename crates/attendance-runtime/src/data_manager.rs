//! Load-once data manager.
//!
//! The attendance table is read and normalized on first use and kept for the
//! lifetime of the manager. Callers use [`DataManager::employee_report`],
//! [`DataManager::overview`] and [`DataManager::employees`]; none of them
//! touch the disk again after the first successful load. A failed load leaves
//! the manager empty so that the next call retries.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use attendance_core::calculations::BaselineCalculator;
use attendance_core::error::Result;
use attendance_core::models::KpiSummary;
use attendance_data::analysis::{
    analyze_employee, cohort_overview, list_employees, CohortOverview, EmployeeListing,
    EmployeeQuery, EmployeeReport,
};
use attendance_data::reader::{load_dataset, AttendanceDataset};
use once_cell::sync::OnceCell;

static SHARED: OnceCell<DataManager> = OnceCell::new();

/// Dataset plus everything derived from it that every query needs.
#[derive(Debug)]
struct LoadedData {
    dataset: AttendanceDataset,
    baseline: KpiSummary,
    load_time: Duration,
}

// ── DataManager ───────────────────────────────────────────────────────────────

/// Lazily loaded, immutable view of one attendance source.
///
/// # Example
/// ```no_run
/// use attendance_runtime::data_manager::DataManager;
/// use attendance_runtime::data::analysis::EmployeeQuery;
///
/// let mgr = DataManager::new("data/attendance.csv");
/// let report = mgr.employee_report(EmployeeQuery::parse("1042")?)?;
/// println!("{} recommendations", report.recommendations.len());
/// # Ok::<(), attendance_runtime::core::AttendanceError>(())
/// ```
#[derive(Debug)]
pub struct DataManager {
    data_path: PathBuf,
    loaded: OnceCell<LoadedData>,
}

impl DataManager {
    pub fn new(data_path: impl Into<PathBuf>) -> Self {
        Self {
            data_path: data_path.into(),
            loaded: OnceCell::new(),
        }
    }

    /// The process-wide manager.
    ///
    /// The first call fixes the data path; later calls with a different path
    /// get the existing instance and a warning.
    pub fn shared(data_path: &Path) -> &'static DataManager {
        let manager = SHARED.get_or_init(|| DataManager::new(data_path));
        if manager.data_path != data_path {
            tracing::warn!(
                requested = %data_path.display(),
                active = %manager.data_path.display(),
                "shared data manager already bound to another path"
            );
        }
        manager
    }

    // ── Public API ────────────────────────────────────────────────────────

    pub fn data_path(&self) -> &Path {
        &self.data_path
    }

    /// `true` once the dataset has been loaded successfully.
    pub fn is_loaded(&self) -> bool {
        self.loaded.get().is_some()
    }

    /// Wall-clock time the load took, or `None` before the first load.
    pub fn load_time(&self) -> Option<Duration> {
        self.loaded.get().map(|l| l.load_time)
    }

    /// The normalized dataset, loading it on first access.
    pub fn dataset(&self) -> Result<&AttendanceDataset> {
        Ok(&self.load()?.dataset)
    }

    /// Cohort baseline over the whole dataset.
    pub fn baseline(&self) -> Result<&KpiSummary> {
        Ok(&self.load()?.baseline)
    }

    /// Report for one employee, or `EmployeeNotFound`.
    pub fn employee_report(&self, query: EmployeeQuery) -> Result<EmployeeReport> {
        let loaded = self.load()?;
        analyze_employee(&loaded.dataset.records, &loaded.baseline, query.employee_id)
    }

    pub fn overview(&self) -> Result<CohortOverview> {
        Ok(cohort_overview(&self.load()?.dataset))
    }

    /// Every employee in id order.
    pub fn employees(&self) -> Result<Vec<EmployeeListing>> {
        let loaded = self.load()?;
        Ok(list_employees(&loaded.dataset.records, &loaded.baseline))
    }

    // ── Private helpers ───────────────────────────────────────────────────

    fn load(&self) -> Result<&LoadedData> {
        self.loaded.get_or_try_init(|| {
            let start = Instant::now();
            let dataset = load_dataset(&self.data_path)?;
            let baseline = BaselineCalculator::baseline(&dataset.records);
            let load_time = start.elapsed();

            tracing::debug!(
                records = dataset.records.len(),
                dropped = dataset.dropped_records,
                elapsed_ms = load_time.as_millis() as u64,
                "attendance dataset loaded"
            );

            Ok(LoadedData {
                dataset,
                baseline,
                load_time,
            })
        })
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
