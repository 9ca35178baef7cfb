use std::collections::{BTreeMap, BTreeSet};

use crate::error::{AttendanceError, Result};
use crate::models::{KpiSummary, Metric, MetricKind, NormalizedAttendanceRecord};

// ── KpiAccumulator ────────────────────────────────────────────────────────────

/// Running per-metric totals over a set of normalized records.
#[derive(Debug, Clone, Default)]
struct KpiAccumulator {
    totals: [f64; 8],
    count: usize,
    /// Billing flag and account code of the first record seen.
    first: Option<(bool, Option<String>)>,
}

impl KpiAccumulator {
    fn add_record(&mut self, record: &NormalizedAttendanceRecord) {
        for (total, metric) in self.totals.iter_mut().zip(Metric::ALL) {
            *total += record.value(metric);
        }
        self.count += 1;
        if self.first.is_none() {
            self.first = Some((record.billed, record.account_code.clone()));
        }
    }

    /// Reduce to a summary. Durations are divided by the record count and
    /// counts by `count_divisor`.
    fn finish(self, count_divisor: usize, employee_count: usize) -> KpiSummary {
        if self.count == 0 {
            return KpiSummary::empty();
        }

        let mut values = [0.0; 8];
        for ((value, total), metric) in values.iter_mut().zip(self.totals).zip(Metric::ALL) {
            let divisor = match metric.kind() {
                MetricKind::Duration => self.count,
                MetricKind::Count => count_divisor,
            };
            *value = total / divisor.max(1) as f64;
        }

        let (billed, account_code) = self.first.unwrap_or((false, None));
        KpiSummary::from_values(values, billed, account_code, self.count, employee_count)
    }
}

// ── KpiAggregator ─────────────────────────────────────────────────────────────

/// Reduces one employee's records to a [`KpiSummary`].
///
/// Durations are averaged, leave counts are summed and the billing flag is
/// taken from the first record.
pub struct KpiAggregator;

impl KpiAggregator {
    /// Summarize the records belonging to `employee_id`.
    ///
    /// Returns [`AttendanceError::EmployeeNotFound`] when no record matches,
    /// which callers must keep distinct from an all-zero summary.
    pub fn aggregate(
        records: &[NormalizedAttendanceRecord],
        employee_id: u64,
    ) -> Result<KpiSummary> {
        let mut acc = KpiAccumulator::default();
        for record in records.iter().filter(|r| r.employee_id == employee_id) {
            acc.add_record(record);
        }

        if acc.count == 0 {
            return Err(AttendanceError::EmployeeNotFound(employee_id));
        }
        Ok(acc.finish(1, 1))
    }

    /// Summarize every employee in one pass, keyed and sorted by id.
    pub fn aggregate_by_employee(
        records: &[NormalizedAttendanceRecord],
    ) -> BTreeMap<u64, KpiSummary> {
        let mut map: BTreeMap<u64, KpiAccumulator> = BTreeMap::new();
        for record in records {
            map.entry(record.employee_id).or_default().add_record(record);
        }

        map.into_iter()
            .map(|(id, acc)| (id, acc.finish(1, 1)))
            .collect()
    }
}

// ── BaselineCalculator ────────────────────────────────────────────────────────

/// Reduces the whole cohort to one reference [`KpiSummary`].
pub struct BaselineCalculator;

impl BaselineCalculator {
    /// Cohort baseline over all records.
    ///
    /// * durations → mean over all records
    /// * counts    → total divided by the number of distinct employees, i.e.
    ///   the average per-employee sum, comparable with [`KpiAggregator`]
    /// * billed    → first record's flag
    ///
    /// An empty input yields [`KpiSummary::empty`].
    pub fn baseline(records: &[NormalizedAttendanceRecord]) -> KpiSummary {
        let mut acc = KpiAccumulator::default();
        let mut employees = BTreeSet::new();
        for record in records {
            acc.add_record(record);
            employees.insert(record.employee_id);
        }
        acc.finish(employees.len(), employees.len())
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: u64, office: f64, full: f64, half: f64, billed: bool) -> NormalizedAttendanceRecord {
        NormalizedAttendanceRecord {
            employee_id: id,
            employee_name: None,
            account_code: Some(format!("ACC-{id}")),
            avg_in_time: 9.0,
            avg_out_time: 17.5,
            avg_office_hours: office,
            avg_break_hours: 0.5,
            avg_cafeteria_hours: 0.25,
            avg_ooo_hours: 0.0,
            full_day_leave: full,
            half_day_leave: half,
            billed,
        }
    }

    // ── aggregate ────────────────────────────────────────────────────────────

    #[test]
    fn test_aggregate_means_durations() {
        let records = vec![record(1, 7.0, 0.0, 0.0, true), record(1, 9.0, 0.0, 0.0, true)];
        let kpis = KpiAggregator::aggregate(&records, 1).unwrap();
        assert!((kpis.avg_office_hours - 8.0).abs() < 1e-9);
        assert!((kpis.avg_in_time - 9.0).abs() < 1e-9);
        assert_eq!(kpis.record_count, 2);
        assert_eq!(kpis.employee_count, 1);
    }

    #[test]
    fn test_aggregate_sums_counts() {
        let records = vec![
            record(1, 8.0, 1.0, 2.0, true),
            record(1, 8.0, 2.0, 0.0, true),
            record(2, 8.0, 5.0, 5.0, true),
        ];
        let kpis = KpiAggregator::aggregate(&records, 1).unwrap();
        assert_eq!(kpis.full_day_leave, 3.0);
        assert_eq!(kpis.half_day_leave, 2.0);
    }

    #[test]
    fn test_aggregate_billed_from_first_record() {
        let records = vec![record(4, 8.0, 0.0, 0.0, false), record(4, 8.0, 0.0, 0.0, true)];
        let kpis = KpiAggregator::aggregate(&records, 4).unwrap();
        assert!(!kpis.billed);
        assert_eq!(kpis.account_code.as_deref(), Some("ACC-4"));
    }

    #[test]
    fn test_aggregate_not_found_is_distinct_from_zero() {
        let records = vec![record(1, 0.0, 0.0, 0.0, true)];
        let err = KpiAggregator::aggregate(&records, 9999).unwrap_err();
        assert!(matches!(err, AttendanceError::EmployeeNotFound(9999)));

        // An employee whose KPIs are all zero is still found.
        let zero = KpiAggregator::aggregate(&records, 1).unwrap();
        assert_eq!(zero.avg_office_hours, 0.0);
    }

    #[test]
    fn test_aggregate_order_independent() {
        let a = record(3, 6.0, 1.0, 0.0, true);
        let b = record(3, 10.0, 2.0, 1.0, true);
        let forward = KpiAggregator::aggregate(&[a.clone(), b.clone()], 3).unwrap();
        let backward = KpiAggregator::aggregate(&[b, a], 3).unwrap();
        assert_eq!(forward.avg_office_hours, backward.avg_office_hours);
        assert_eq!(forward.full_day_leave, backward.full_day_leave);
    }

    // ── aggregate_by_employee ────────────────────────────────────────────────

    #[test]
    fn test_aggregate_by_employee_sorted_by_id() {
        let records = vec![
            record(5, 8.0, 0.0, 0.0, true),
            record(2, 6.0, 1.0, 0.0, false),
            record(5, 10.0, 1.0, 0.0, true),
        ];
        let all = KpiAggregator::aggregate_by_employee(&records);
        let ids: Vec<u64> = all.keys().copied().collect();
        assert_eq!(ids, vec![2, 5]);
        assert!((all[&5].avg_office_hours - 9.0).abs() < 1e-9);
        assert_eq!(all[&5].full_day_leave, 1.0);
        assert!(!all[&2].billed);
    }

    #[test]
    fn test_aggregate_by_employee_empty() {
        assert!(KpiAggregator::aggregate_by_employee(&[]).is_empty());
    }

    // ── baseline ─────────────────────────────────────────────────────────────

    #[test]
    fn test_baseline_means_durations_over_records() {
        let records = vec![
            record(1, 6.0, 0.0, 0.0, true),
            record(1, 8.0, 0.0, 0.0, true),
            record(2, 10.0, 0.0, 0.0, true),
        ];
        let base = BaselineCalculator::baseline(&records);
        assert!((base.avg_office_hours - 8.0).abs() < 1e-9);
        assert_eq!(base.record_count, 3);
        assert_eq!(base.employee_count, 2);
    }

    #[test]
    fn test_baseline_counts_are_per_employee_average() {
        let records = vec![
            record(1, 8.0, 1.0, 0.0, true),
            record(1, 8.0, 2.0, 1.0, true),
            record(2, 8.0, 3.0, 1.0, true),
        ];
        let base = BaselineCalculator::baseline(&records);
        assert!((base.full_day_leave - 3.0).abs() < 1e-9);
        assert!((base.half_day_leave - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_baseline_matches_employee_for_single_employee_cohort() {
        let records = vec![record(8, 7.0, 1.0, 2.0, true), record(8, 9.0, 3.0, 0.0, true)];
        let base = BaselineCalculator::baseline(&records);
        let emp = KpiAggregator::aggregate(&records, 8).unwrap();
        for metric in Metric::ALL {
            assert!((base.value(metric) - emp.value(metric)).abs() < 1e-9, "{metric:?}");
        }
    }

    #[test]
    fn test_baseline_empty_dataset() {
        let base = BaselineCalculator::baseline(&[]);
        assert_eq!(base, KpiSummary::empty());
        assert!(!base.billed);
    }
}
