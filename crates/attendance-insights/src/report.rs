//! Plain-text rendering of employee reports, the employee listing and the
//! cohort overview.

use attendance_core::formatting::{format_clock, format_delta, format_hours, format_number};
use attendance_core::models::{KpiSummary, Metric, MetricKind};
use attendance_data::analysis::{CohortOverview, EmployeeListing, EmployeeReport};

const LABEL_WIDTH: usize = 20;
const VALUE_WIDTH: usize = 12;

/// Display form of a single metric value.
fn format_metric(metric: Metric, value: f64) -> String {
    match metric {
        Metric::AvgInTime | Metric::AvgOutTime => format_clock(value),
        _ => match metric.kind() {
            MetricKind::Duration => format_hours(value, 2),
            MetricKind::Count => format_number(value, 1),
        },
    }
}

fn delta_unit(metric: Metric) -> &'static str {
    match metric.kind() {
        MetricKind::Duration => "hrs",
        MetricKind::Count => "days",
    }
}

fn billed_label(billed: bool) -> &'static str {
    if billed {
        "Billed"
    } else {
        "Unbilled"
    }
}

fn rule(title: &str) -> String {
    format!("── {} {}", title, "─".repeat(60usize.saturating_sub(title.chars().count() + 4)))
}

// ── Employee report ───────────────────────────────────────────────────────────

pub fn render_employee(report: &EmployeeReport) -> String {
    let mut lines = vec![
        rule(&format!("Employee {}", report.employee_id)),
        format!(
            "{:<LABEL_WIDTH$}{}",
            "Name",
            report.employee_name.as_deref().unwrap_or("N/A")
        ),
        format!(
            "{:<LABEL_WIDTH$}{}",
            "Account",
            report.account_code.as_deref().unwrap_or("N/A")
        ),
        format!("{:<LABEL_WIDTH$}{}", "Billing", billed_label(report.kpis.billed)),
        format!("{:<LABEL_WIDTH$}{}", "Records", report.kpis.record_count),
        String::new(),
        rule("KPIs vs cohort"),
        format!(
            "{:<LABEL_WIDTH$}{:>VALUE_WIDTH$}{:>VALUE_WIDTH$}  Difference",
            "Metric", "Employee", "Cohort"
        ),
    ];

    for c in &report.comparisons {
        let marker = if c.favorable { ' ' } else { '!' };
        lines.push(format!(
            "{:<LABEL_WIDTH$}{:>VALUE_WIDTH$}{:>VALUE_WIDTH$}  {} {}",
            c.metric.label(),
            format_metric(c.metric, c.employee),
            format_metric(c.metric, c.baseline),
            format_delta(c.delta, delta_unit(c.metric), 2),
            marker,
        ));
    }

    lines.push(String::new());
    lines.push(rule("Recommendations"));
    for (i, rec) in report.recommendations.iter().enumerate() {
        lines.push(format!("{:>2}. {}", i + 1, rec.message));
    }

    lines.join("\n")
}

// ── Employee listing ──────────────────────────────────────────────────────────

pub fn render_listing(listing: &[EmployeeListing]) -> String {
    if listing.is_empty() {
        return "No employees found.".to_string();
    }

    let mut lines = vec![format!(
        "{:>8}  {:<20}{:>7}{:>7}{:>11}{:>7}{:>7}  {:<9}{:>5}",
        "ID", "Name", "In", "Out", "Office", "FDL", "HDL", "Billing", "Recs"
    )];

    for row in listing {
        let k: &KpiSummary = &row.kpis;
        lines.push(format!(
            "{:>8}  {:<20}{:>7}{:>7}{:>11}{:>7}{:>7}  {:<9}{:>5}",
            row.employee_id,
            truncate(row.employee_name.as_deref().unwrap_or("-"), 19),
            format_clock(k.avg_in_time),
            format_clock(k.avg_out_time),
            format_hours(k.avg_office_hours, 1),
            format_number(k.full_day_leave, 0),
            format_number(k.half_day_leave, 0),
            billed_label(k.billed),
            row.recommendation_count,
        ));
    }

    lines.push(format!("{} employees", listing.len()));
    lines.join("\n")
}

fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        let mut out: String = s.chars().take(max_chars.saturating_sub(1)).collect();
        out.push('…');
        out
    }
}

// ── Cohort overview ───────────────────────────────────────────────────────────

pub fn render_overview(overview: &CohortOverview) -> String {
    let mut lines = vec![
        rule("Cohort overview"),
        format!("{:<LABEL_WIDTH$}{}", "Total Employees", overview.total_employees),
        format!("{:<LABEL_WIDTH$}{}", "Total Records", overview.total_records),
        format!("{:<LABEL_WIDTH$}{}", "Billed Employees", overview.billed_employees),
    ];
    if overview.dropped_records > 0 {
        lines.push(format!(
            "{:<LABEL_WIDTH$}{}",
            "Dropped Records", overview.dropped_records
        ));
    }
    if overview.defaulted_fields > 0 {
        lines.push(format!(
            "{:<LABEL_WIDTH$}{}",
            "Defaulted Fields", overview.defaulted_fields
        ));
    }

    lines.push(String::new());
    lines.push(rule("Cohort averages"));
    for (metric, value) in overview.baseline.metrics() {
        lines.push(format!(
            "{:<LABEL_WIDTH$}{:>VALUE_WIDTH$}",
            metric.label(),
            format_metric(metric, value)
        ));
    }

    lines.join("\n")
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use attendance_core::calculations::BaselineCalculator;
    use attendance_core::models::NormalizedAttendanceRecord;
    use attendance_core::rules::MSG_LATE_ARRIVAL;
    use attendance_data::analysis::{analyze_employee, cohort_overview, list_employees};
    use attendance_data::AttendanceDataset;

    fn record(id: u64, name: Option<&str>, in_time: f64) -> NormalizedAttendanceRecord {
        NormalizedAttendanceRecord {
            employee_id: id,
            employee_name: name.map(str::to_string),
            account_code: None,
            avg_in_time: in_time,
            avg_out_time: 18.0,
            avg_office_hours: 8.5,
            avg_break_hours: 0.0,
            avg_cafeteria_hours: 0.0,
            avg_ooo_hours: 0.0,
            full_day_leave: 0.0,
            half_day_leave: 0.0,
            billed: true,
        }
    }

    #[test]
    fn test_format_metric_by_kind() {
        assert_eq!(format_metric(Metric::AvgInTime, 9.5), "09:30");
        assert_eq!(format_metric(Metric::AvgOfficeHours, 8.25), "8.25 hrs");
        assert_eq!(format_metric(Metric::FullDayLeave, 1.5), "1.5");
    }

    #[test]
    fn test_render_employee_contains_sections() {
        let records = vec![record(1, Some("Asha"), 9.6), record(2, None, 9.0)];
        let baseline = BaselineCalculator::baseline(&records);
        let report = analyze_employee(&records, &baseline, 1).unwrap();

        let text = render_employee(&report);
        assert!(text.contains("Employee 1"));
        assert!(text.contains("Asha"));
        assert!(text.contains("Avg. In Time"));
        assert!(text.contains("09:36"));
        assert!(text.contains("+0.30 hrs vs avg"));
        assert!(text.contains(&format!(" 1. {MSG_LATE_ARRIVAL}")));
    }

    #[test]
    fn test_render_employee_missing_name() {
        let records = vec![record(2, None, 9.0)];
        let baseline = BaselineCalculator::baseline(&records);
        let report = analyze_employee(&records, &baseline, 2).unwrap();
        assert!(render_employee(&report).contains("N/A"));
    }

    #[test]
    fn test_render_listing_rows_and_footer() {
        let records = vec![record(1, Some("Asha"), 9.6), record(2, None, 9.0)];
        let baseline = BaselineCalculator::baseline(&records);
        let text = render_listing(&list_employees(&records, &baseline));

        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[1].contains("Asha"));
        assert!(lines[2].trim_start().starts_with('2'));
        assert_eq!(lines[3], "2 employees");
    }

    #[test]
    fn test_render_listing_empty() {
        assert_eq!(render_listing(&[]), "No employees found.");
    }

    #[test]
    fn test_truncate_long_names() {
        assert_eq!(truncate("Short", 19), "Short");
        assert_eq!(truncate("Bartholomew Featherstonehaugh", 10).chars().count(), 10);
    }

    #[test]
    fn test_render_overview_hides_zero_diagnostics() {
        let data = AttendanceDataset {
            records: vec![record(1, None, 9.0)],
            ..Default::default()
        };
        let text = render_overview(&cohort_overview(&data));
        assert!(text.contains("Total Employees"));
        assert!(text.contains("Billed Employees"));
        assert!(!text.contains("Dropped Records"));

        let data = AttendanceDataset {
            dropped_records: 3,
            ..data
        };
        assert!(render_overview(&cohort_overview(&data)).contains("Dropped Records"));
    }
}
