//! Analysis pipeline for attendance insights.
//!
//! Combines aggregation, the cohort baseline and the recommendation rules
//! into serializable reports ready for the presentation layer.

use std::str::FromStr;

use attendance_core::calculations::{BaselineCalculator, KpiAggregator};
use attendance_core::error::{AttendanceError, Result};
use attendance_core::models::{KpiSummary, Metric, NormalizedAttendanceRecord};
use attendance_core::rules::{Recommendation, RecommendationEngine};
use serde::Serialize;

use crate::reader::AttendanceDataset;

// ── EmployeeQuery ─────────────────────────────────────────────────────────────

/// A validated employee lookup key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmployeeQuery {
    pub employee_id: u64,
}

impl EmployeeQuery {
    /// Accepts decimal digits only, surrounding whitespace ignored.
    pub fn parse(input: &str) -> Result<Self> {
        let trimmed = input.trim();
        if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
            return Err(AttendanceError::InvalidEmployeeId(input.to_string()));
        }
        trimmed
            .parse::<u64>()
            .map(|employee_id| Self { employee_id })
            .map_err(|_| AttendanceError::InvalidEmployeeId(input.to_string()))
    }
}

impl FromStr for EmployeeQuery {
    type Err = AttendanceError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

// ── Public types ──────────────────────────────────────────────────────────────

/// One metric of an employee set against the cohort baseline.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricComparison {
    pub metric: Metric,
    pub employee: f64,
    pub baseline: f64,
    /// `employee - baseline`.
    pub delta: f64,
    /// Whether the difference reads as good news for this metric.
    pub favorable: bool,
}

impl MetricComparison {
    pub fn new(metric: Metric, employee: f64, baseline: f64) -> Self {
        let delta = employee - baseline;
        let favorable = if metric.higher_is_better() {
            delta >= 0.0
        } else {
            delta <= 0.0
        };
        Self {
            metric,
            employee,
            baseline,
            delta,
            favorable,
        }
    }
}

/// Everything shown for a single employee.
#[derive(Debug, Clone, Serialize)]
pub struct EmployeeReport {
    pub employee_id: u64,
    pub employee_name: Option<String>,
    pub account_code: Option<String>,
    pub kpis: KpiSummary,
    pub baseline: KpiSummary,
    pub comparisons: Vec<MetricComparison>,
    pub recommendations: Vec<Recommendation>,
}

impl EmployeeReport {
    /// Recommendation texts in rule order.
    pub fn messages(&self) -> Vec<&str> {
        self.recommendations.iter().map(|r| r.message.as_str()).collect()
    }
}

/// Headline numbers for the whole cohort.
#[derive(Debug, Clone, Serialize)]
pub struct CohortOverview {
    pub total_employees: usize,
    pub total_records: usize,
    /// Employees whose summary is billed.
    pub billed_employees: usize,
    pub dropped_records: usize,
    pub defaulted_fields: usize,
    pub baseline: KpiSummary,
}

/// One line of the all-employees listing.
#[derive(Debug, Clone, Serialize)]
pub struct EmployeeListing {
    pub employee_id: u64,
    pub employee_name: Option<String>,
    pub kpis: KpiSummary,
    pub recommendation_count: usize,
}

// ── Public functions ──────────────────────────────────────────────────────────

/// Build the report for `employee_id` against a precomputed `baseline`.
///
/// Returns [`AttendanceError::EmployeeNotFound`] when the id has no records.
pub fn analyze_employee(
    records: &[NormalizedAttendanceRecord],
    baseline: &KpiSummary,
    employee_id: u64,
) -> Result<EmployeeReport> {
    let kpis = KpiAggregator::aggregate(records, employee_id)?;

    let employee_name = records
        .iter()
        .filter(|r| r.employee_id == employee_id)
        .find_map(|r| r.employee_name.clone());

    let comparisons = Metric::ALL
        .into_iter()
        .map(|m| MetricComparison::new(m, kpis.value(m), baseline.value(m)))
        .collect();

    let recommendations = RecommendationEngine::evaluate(&kpis, baseline);

    Ok(EmployeeReport {
        employee_id,
        employee_name,
        account_code: kpis.account_code.clone(),
        kpis,
        baseline: baseline.clone(),
        comparisons,
        recommendations,
    })
}

/// Summarize the cohort held in `dataset`.
pub fn cohort_overview(dataset: &AttendanceDataset) -> CohortOverview {
    let per_employee = KpiAggregator::aggregate_by_employee(&dataset.records);
    let billed_employees = per_employee.values().filter(|k| k.billed).count();

    CohortOverview {
        total_employees: per_employee.len(),
        total_records: dataset.records.len(),
        billed_employees,
        dropped_records: dataset.dropped_records,
        defaulted_fields: dataset.defaulted_fields,
        baseline: BaselineCalculator::baseline(&dataset.records),
    }
}

/// Every employee's KPIs and number of recommendations, sorted by id.
pub fn list_employees(
    records: &[NormalizedAttendanceRecord],
    baseline: &KpiSummary,
) -> Vec<EmployeeListing> {
    KpiAggregator::aggregate_by_employee(records)
        .into_iter()
        .map(|(employee_id, kpis)| {
            let employee_name = records
                .iter()
                .filter(|r| r.employee_id == employee_id)
                .find_map(|r| r.employee_name.clone());
            let recommendation_count = RecommendationEngine::evaluate(&kpis, baseline).len();
            EmployeeListing {
                employee_id,
                employee_name,
                kpis,
                recommendation_count,
            }
        })
        .collect()
}

// ── Tests ─────────────────────────────────────────────────────────────────────
