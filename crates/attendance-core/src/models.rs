use serde::{Deserialize, Serialize};

// ── RawField ──────────────────────────────────────────────────────────────────

/// 2^63: integral floats at or above this do not fit an `i64`.
const I64_LIMIT: f64 = 9_223_372_036_854_775_808.0;

/// One raw cell as delivered by the data source, before normalization.
///
/// Deserializes untagged from JSON: non-negative integers stay exact as
/// [`RawField::Integer`], other numbers, booleans and strings map to the
/// matching variant and `null` becomes [`RawField::Missing`].
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawField {
    /// A non-negative integral cell, kept exact (ids beyond 2^53).
    Integer(u64),
    /// A numeric cell.
    Number(f64),
    /// A boolean cell.
    Flag(bool),
    /// A textual cell (numbers as text, durations, clock times, labels).
    Text(String),
    /// The column is absent or the cell is empty.
    #[default]
    Missing,
}

impl RawField {
    /// Build a field from a text cell, treating blank text as missing.
    pub fn from_text(text: &str) -> Self {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            RawField::Missing
        } else {
            RawField::Text(trimmed.to_string())
        }
    }

    /// Build a field from an arbitrary JSON value.
    ///
    /// Arrays and objects carry no usable scalar and are treated as text so
    /// that the normalizer counts them as unparseable rather than absent.
    pub fn from_json(value: &serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => RawField::Missing,
            serde_json::Value::Bool(b) => RawField::Flag(*b),
            serde_json::Value::Number(n) => match n.as_u64() {
                Some(i) => RawField::Integer(i),
                None => n.as_f64().map_or(RawField::Missing, RawField::Number),
            },
            serde_json::Value::String(s) => RawField::from_text(s),
            other => RawField::Text(other.to_string()),
        }
    }

    /// `true` for [`RawField::Missing`].
    pub fn is_missing(&self) -> bool {
        matches!(self, RawField::Missing)
    }

    /// Textual view of the cell, used for the optional name / account columns.
    pub fn as_label(&self) -> Option<String> {
        match self {
            RawField::Text(s) => Some(s.clone()),
            RawField::Integer(i) => Some(i.to_string()),
            RawField::Number(n) if n.fract() == 0.0 && n.abs() < I64_LIMIT => {
                Some(format!("{}", *n as i64))
            }
            RawField::Number(n) => Some(n.to_string()),
            RawField::Flag(b) => Some(b.to_string()),
            RawField::Missing => None,
        }
    }
}

// ── RawAttendanceRecord ───────────────────────────────────────────────────────

/// One row of the attendance table: one employee for one observation period.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RawAttendanceRecord {
    #[serde(default)]
    pub employee_id: RawField,
    #[serde(default)]
    pub employee_name: Option<String>,
    #[serde(default)]
    pub account_code: Option<String>,
    #[serde(default)]
    pub avg_in_time: RawField,
    #[serde(default)]
    pub avg_out_time: RawField,
    #[serde(default)]
    pub avg_office_hours: RawField,
    #[serde(default)]
    pub avg_break_hours: RawField,
    #[serde(default)]
    pub avg_cafeteria_hours: RawField,
    #[serde(default)]
    pub avg_ooo_hours: RawField,
    #[serde(default)]
    pub full_day_leave: RawField,
    #[serde(default)]
    pub half_day_leave: RawField,
    #[serde(default)]
    pub billed: RawField,
}

impl RawAttendanceRecord {
    /// Raw cell backing `metric`.
    pub fn field(&self, metric: Metric) -> &RawField {
        match metric {
            Metric::AvgInTime => &self.avg_in_time,
            Metric::AvgOutTime => &self.avg_out_time,
            Metric::AvgOfficeHours => &self.avg_office_hours,
            Metric::AvgBreakHours => &self.avg_break_hours,
            Metric::AvgCafeteriaHours => &self.avg_cafeteria_hours,
            Metric::AvgOooHours => &self.avg_ooo_hours,
            Metric::FullDayLeave => &self.full_day_leave,
            Metric::HalfDayLeave => &self.half_day_leave,
        }
    }

    /// Mutable access to the raw cell backing `metric`.
    pub fn field_mut(&mut self, metric: Metric) -> &mut RawField {
        match metric {
            Metric::AvgInTime => &mut self.avg_in_time,
            Metric::AvgOutTime => &mut self.avg_out_time,
            Metric::AvgOfficeHours => &mut self.avg_office_hours,
            Metric::AvgBreakHours => &mut self.avg_break_hours,
            Metric::AvgCafeteriaHours => &mut self.avg_cafeteria_hours,
            Metric::AvgOooHours => &mut self.avg_ooo_hours,
            Metric::FullDayLeave => &mut self.full_day_leave,
            Metric::HalfDayLeave => &mut self.half_day_leave,
        }
    }
}

// ── NormalizedAttendanceRecord ────────────────────────────────────────────────

/// A row after normalization: every metric is numeric and the id is valid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedAttendanceRecord {
    pub employee_id: u64,
    pub employee_name: Option<String>,
    pub account_code: Option<String>,
    /// Average arrival, as fractional hour of day.
    pub avg_in_time: f64,
    /// Average departure, as fractional hour of day.
    pub avg_out_time: f64,
    pub avg_office_hours: f64,
    pub avg_break_hours: f64,
    pub avg_cafeteria_hours: f64,
    pub avg_ooo_hours: f64,
    pub full_day_leave: f64,
    pub half_day_leave: f64,
    pub billed: bool,
}

impl NormalizedAttendanceRecord {
    /// Numeric value of `metric` for this row.
    pub fn value(&self, metric: Metric) -> f64 {
        match metric {
            Metric::AvgInTime => self.avg_in_time,
            Metric::AvgOutTime => self.avg_out_time,
            Metric::AvgOfficeHours => self.avg_office_hours,
            Metric::AvgBreakHours => self.avg_break_hours,
            Metric::AvgCafeteriaHours => self.avg_cafeteria_hours,
            Metric::AvgOooHours => self.avg_ooo_hours,
            Metric::FullDayLeave => self.full_day_leave,
            Metric::HalfDayLeave => self.half_day_leave,
        }
    }
}

impl From<&NormalizedAttendanceRecord> for RawAttendanceRecord {
    fn from(record: &NormalizedAttendanceRecord) -> Self {
        let mut raw = RawAttendanceRecord {
            employee_id: RawField::Integer(record.employee_id),
            employee_name: record.employee_name.clone(),
            account_code: record.account_code.clone(),
            billed: RawField::Flag(record.billed),
            ..Default::default()
        };
        for metric in Metric::ALL {
            *raw.field_mut(metric) = RawField::Number(record.value(metric));
        }
        raw
    }
}

// ── Metric ────────────────────────────────────────────────────────────────────

/// How a metric is reduced across several records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetricKind {
    /// Fractional hours; averaged.
    Duration,
    /// Event counts; summed per employee.
    Count,
}

/// The eight numeric KPIs tracked per employee.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    AvgInTime,
    AvgOutTime,
    AvgOfficeHours,
    AvgBreakHours,
    AvgCafeteriaHours,
    AvgOooHours,
    FullDayLeave,
    HalfDayLeave,
}

impl Metric {
    /// All metrics in display order.
    pub const ALL: [Metric; 8] = [
        Metric::AvgInTime,
        Metric::AvgOutTime,
        Metric::AvgOfficeHours,
        Metric::AvgBreakHours,
        Metric::AvgCafeteriaHours,
        Metric::AvgOooHours,
        Metric::FullDayLeave,
        Metric::HalfDayLeave,
    ];

    /// Column label as it appears in attendance exports.
    pub fn label(self) -> &'static str {
        match self {
            Metric::AvgInTime => "Avg. In Time",
            Metric::AvgOutTime => "Avg. Out Time",
            Metric::AvgOfficeHours => "Avg. Office Hrs",
            Metric::AvgBreakHours => "Avg. Break Hrs",
            Metric::AvgCafeteriaHours => "Avg. Cafeteria Hrs",
            Metric::AvgOooHours => "Avg. OOO Hrs",
            Metric::FullDayLeave => "Full Day Leave",
            Metric::HalfDayLeave => "Half Day Leave",
        }
    }

    pub fn kind(self) -> MetricKind {
        match self {
            Metric::FullDayLeave | Metric::HalfDayLeave => MetricKind::Count,
            _ => MetricKind::Duration,
        }
    }

    /// Whether a value above the cohort average reads as good news.
    ///
    /// Later arrivals, longer breaks and more leave are unfavourable.
    pub fn higher_is_better(self) -> bool {
        matches!(self, Metric::AvgOutTime | Metric::AvgOfficeHours)
    }

    fn index(self) -> usize {
        self as usize
    }
}

// ── KpiSummary ────────────────────────────────────────────────────────────────

/// Reduced KPIs for one employee, or for the whole cohort when used as a
/// baseline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KpiSummary {
    pub avg_in_time: f64,
    pub avg_out_time: f64,
    pub avg_office_hours: f64,
    pub avg_break_hours: f64,
    pub avg_cafeteria_hours: f64,
    pub avg_ooo_hours: f64,
    pub full_day_leave: f64,
    pub half_day_leave: f64,
    pub billed: bool,
    /// Account code of the first record; interpolated into the billing message.
    pub account_code: Option<String>,
    /// Number of records that were reduced into this summary.
    pub record_count: usize,
    /// Number of distinct employees covered (1 for an employee summary).
    pub employee_count: usize,
}

impl KpiSummary {
    /// Build a summary from metric values indexed in [`Metric::ALL`] order.
    pub fn from_values(
        values: [f64; 8],
        billed: bool,
        account_code: Option<String>,
        record_count: usize,
        employee_count: usize,
    ) -> Self {
        Self {
            avg_in_time: values[Metric::AvgInTime.index()],
            avg_out_time: values[Metric::AvgOutTime.index()],
            avg_office_hours: values[Metric::AvgOfficeHours.index()],
            avg_break_hours: values[Metric::AvgBreakHours.index()],
            avg_cafeteria_hours: values[Metric::AvgCafeteriaHours.index()],
            avg_ooo_hours: values[Metric::AvgOooHours.index()],
            full_day_leave: values[Metric::FullDayLeave.index()],
            half_day_leave: values[Metric::HalfDayLeave.index()],
            billed,
            account_code,
            record_count,
            employee_count,
        }
    }

    /// The all-zero summary returned for an empty cohort.
    pub fn empty() -> Self {
        Self::from_values([0.0; 8], false, None, 0, 0)
    }

    /// Value of `metric` in this summary.
    pub fn value(&self, metric: Metric) -> f64 {
        match metric {
            Metric::AvgInTime => self.avg_in_time,
            Metric::AvgOutTime => self.avg_out_time,
            Metric::AvgOfficeHours => self.avg_office_hours,
            Metric::AvgBreakHours => self.avg_break_hours,
            Metric::AvgCafeteriaHours => self.avg_cafeteria_hours,
            Metric::AvgOooHours => self.avg_ooo_hours,
            Metric::FullDayLeave => self.full_day_leave,
            Metric::HalfDayLeave => self.half_day_leave,
        }
    }

    /// `(metric, value)` pairs in display order.
    pub fn metrics(&self) -> impl Iterator<Item = (Metric, f64)> + '_ {
        Metric::ALL.into_iter().map(move |m| (m, self.value(m)))
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_record() -> NormalizedAttendanceRecord {
        NormalizedAttendanceRecord {
            employee_id: 7,
            employee_name: Some("Asha".to_string()),
            account_code: Some("ACC-12".to_string()),
            avg_in_time: 9.25,
            avg_out_time: 18.0,
            avg_office_hours: 8.5,
            avg_break_hours: 0.75,
            avg_cafeteria_hours: 0.5,
            avg_ooo_hours: 0.0,
            full_day_leave: 1.0,
            half_day_leave: 2.0,
            billed: true,
        }
    }

    // ── RawField ─────────────────────────────────────────────────────────────

    #[test]
    fn test_raw_field_deserializes_untagged() {
        let fields: Vec<RawField> =
            serde_json::from_value(json!([8.5, "08:30:00", true, null])).unwrap();
        assert_eq!(
            fields,
            vec![
                RawField::Number(8.5),
                RawField::Text("08:30:00".to_string()),
                RawField::Flag(true),
                RawField::Missing,
            ]
        );
    }

    #[test]
    fn test_raw_field_from_text_blank_is_missing() {
        assert_eq!(RawField::from_text("   "), RawField::Missing);
        assert_eq!(RawField::from_text(" 7 "), RawField::Text("7".to_string()));
    }

    #[test]
    fn test_raw_field_from_json_object_is_text() {
        let field = RawField::from_json(&json!({"h": 8}));
        assert!(matches!(field, RawField::Text(_)));
    }

    #[test]
    fn test_raw_field_as_label() {
        assert_eq!(RawField::Number(1042.0).as_label(), Some("1042".to_string()));
        assert_eq!(
            RawField::Text("ACC-9".to_string()).as_label(),
            Some("ACC-9".to_string())
        );
        assert_eq!(RawField::Missing.as_label(), None);
    }

    #[test]
    fn test_raw_field_as_label_huge_numbers_not_saturated() {
        assert_eq!(RawField::Number(1e20).as_label(), Some(1e20.to_string()));
        assert_eq!(RawField::Number(-1e20).as_label(), Some((-1e20).to_string()));
        assert_eq!(
            RawField::Integer(u64::MAX).as_label(),
            Some("18446744073709551615".to_string())
        );
    }

    #[test]
    fn test_raw_field_from_json_keeps_large_integers_exact() {
        let field = RawField::from_json(&json!(9_007_199_254_740_993u64));
        assert_eq!(field, RawField::Integer(9_007_199_254_740_993));
        assert_eq!(RawField::from_json(&json!(-4)), RawField::Number(-4.0));
        assert_eq!(RawField::from_json(&json!(2.5)), RawField::Number(2.5));
    }

    #[test]
    fn test_raw_record_deserializes_with_defaults() {
        let raw: RawAttendanceRecord =
            serde_json::from_value(json!({"employee_id": 3, "avg_in_time": "09:15"})).unwrap();
        assert_eq!(raw.employee_id, RawField::Integer(3));
        assert_eq!(raw.avg_in_time, RawField::Text("09:15".to_string()));
        assert!(raw.billed.is_missing());
        assert!(raw.employee_name.is_none());
    }

    // ── Metric ───────────────────────────────────────────────────────────────

    #[test]
    fn test_metric_kinds() {
        let counts: Vec<Metric> = Metric::ALL
            .into_iter()
            .filter(|m| m.kind() == MetricKind::Count)
            .collect();
        assert_eq!(counts, vec![Metric::FullDayLeave, Metric::HalfDayLeave]);
    }

    #[test]
    fn test_metric_polarity() {
        assert!(Metric::AvgOfficeHours.higher_is_better());
        assert!(Metric::AvgOutTime.higher_is_better());
        assert!(!Metric::AvgInTime.higher_is_better());
        assert!(!Metric::FullDayLeave.higher_is_better());
    }

    // ── Conversions ──────────────────────────────────────────────────────────

    #[test]
    fn test_normalized_to_raw_keeps_values() {
        let record = sample_record();
        let raw = RawAttendanceRecord::from(&record);
        assert_eq!(raw.employee_id, RawField::Integer(7));
        assert_eq!(raw.avg_in_time, RawField::Number(9.25));
        assert_eq!(raw.half_day_leave, RawField::Number(2.0));
        assert_eq!(raw.billed, RawField::Flag(true));
        assert_eq!(raw.account_code.as_deref(), Some("ACC-12"));
    }

    // ── KpiSummary ───────────────────────────────────────────────────────────

    #[test]
    fn test_summary_from_values_matches_metric_order() {
        let values = [9.0, 17.5, 8.0, 1.0, 0.5, 0.25, 2.0, 3.0];
        let summary = KpiSummary::from_values(values, true, None, 2, 1);
        for (i, (metric, value)) in summary.metrics().enumerate() {
            assert_eq!(metric, Metric::ALL[i]);
            assert_eq!(value, values[i]);
        }
        assert_eq!(summary.half_day_leave, 3.0);
    }

    #[test]
    fn test_summary_empty_is_zeroed() {
        let summary = KpiSummary::empty();
        assert!(summary.metrics().all(|(_, v)| v == 0.0));
        assert!(!summary.billed);
        assert_eq!(summary.record_count, 0);
    }
}
