//! Field normalization: turns heterogeneous raw cells into the canonical
//! numeric schema.
//!
//! Nothing in here fails. A cell that cannot be read degrades to its default
//! and a row without a usable employee id is dropped; both are counted in the
//! returned [`NormalizedBatch`].

use chrono::{NaiveDateTime, NaiveTime, Timelike};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, warn};

use crate::models::{Metric, MetricKind, NormalizedAttendanceRecord, RawAttendanceRecord, RawField};

/// `[N day(s)] H:MM[:SS[.fff]]`, the shape of duration exports and of
/// stringified timedeltas.
static DURATION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:(\d+)\s+days?,?\s+)?(\d+):([0-5]?\d)(?::([0-5]?\d(?:\.\d+)?))?$")
        .expect("regex is valid")
});

// ── DurationParser ────────────────────────────────────────────────────────────

/// Parses duration-like cells into fractional hours.
pub struct DurationParser;

impl DurationParser {
    /// Attempt to read `field` as fractional hours.
    ///
    /// Handles:
    /// * numbers        → taken as hours already
    /// * `"8.5"`        → decimal hours
    /// * `"08:30:00"`   → `H:MM[:SS]`, hours may exceed 24
    /// * `"0 days 08:30:00"` → timedelta text
    /// * `"1900-01-01 09:15:00"` → time-of-day of a date-time
    /// * `"9:30 AM"`    → 12-hour clock
    ///
    /// Returns `None` for missing cells and anything unrecognised.
    pub fn parse(field: &RawField) -> Option<f64> {
        match field {
            RawField::Integer(i) => Some(*i as f64),
            RawField::Number(n) => n.is_finite().then_some(*n),
            RawField::Text(s) => Self::parse_str(s),
            RawField::Flag(_) | RawField::Missing => None,
        }
    }

    fn parse_str(s: &str) -> Option<f64> {
        let s = s.trim();
        if s.is_empty() {
            return None;
        }

        if let Ok(n) = s.parse::<f64>() {
            return n.is_finite().then_some(n);
        }

        if let Some(caps) = DURATION_RE.captures(s) {
            let days: f64 = caps.get(1).map_or(Ok(0.0), |m| m.as_str().parse()).ok()?;
            let hours: f64 = caps[2].parse().ok()?;
            let minutes: f64 = caps[3].parse().ok()?;
            let seconds: f64 = caps.get(4).map_or(Ok(0.0), |m| m.as_str().parse()).ok()?;
            let total_seconds = days * 86_400.0 + hours * 3600.0 + minutes * 60.0 + seconds;
            return Some(total_seconds / 3600.0);
        }

        const DATETIME_FORMATS: &[&str] = &[
            "%Y-%m-%d %H:%M:%S%.f",
            "%Y-%m-%d %H:%M:%S",
            "%Y-%m-%dT%H:%M:%S%.f",
            "%Y-%m-%dT%H:%M:%S",
            "%Y-%m-%d %H:%M",
        ];
        for fmt in DATETIME_FORMATS {
            if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
                return Some(time_to_hours(dt.time()));
            }
        }

        const CLOCK_FORMATS: &[&str] = &["%I:%M %p", "%I:%M:%S %p", "%I:%M%p", "%I:%M:%S%p"];
        let upper = s.to_uppercase();
        for fmt in CLOCK_FORMATS {
            if let Ok(t) = NaiveTime::parse_from_str(&upper, fmt) {
                return Some(time_to_hours(t));
            }
        }

        None
    }
}

fn time_to_hours(t: NaiveTime) -> f64 {
    let seconds = t.num_seconds_from_midnight() as f64 + t.nanosecond() as f64 / 1e9;
    seconds / 3600.0
}

// ── CountParser ───────────────────────────────────────────────────────────────

/// Parses count cells (leave days) into numbers.
pub struct CountParser;

impl CountParser {
    /// Numbers and decimal text are accepted; everything else is `None`.
    pub fn parse(field: &RawField) -> Option<f64> {
        match field {
            RawField::Integer(i) => Some(*i as f64),
            RawField::Number(n) => n.is_finite().then_some(*n),
            RawField::Text(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
            RawField::Flag(_) | RawField::Missing => None,
        }
    }
}

// ── IdParser ──────────────────────────────────────────────────────────────────

/// 2^64, the first float that no longer fits a `u64`.
const U64_LIMIT: f64 = 18_446_744_073_709_551_616.0;

/// Resolves the employee id join key.
pub struct IdParser;

impl IdParser {
    /// Accept non-negative integral numbers and integral text (`"7"`, `"7.0"`).
    pub fn parse(field: &RawField) -> Option<u64> {
        match field {
            RawField::Integer(i) => Some(*i),
            RawField::Number(n) => Self::from_f64(*n),
            RawField::Text(s) => {
                let s = s.trim();
                s.parse::<u64>()
                    .ok()
                    .or_else(|| s.parse::<f64>().ok().and_then(Self::from_f64))
            }
            RawField::Flag(_) | RawField::Missing => None,
        }
    }

    fn from_f64(n: f64) -> Option<u64> {
        // `u64::MAX as f64` rounds up to 2^64, so the bound must be strict.
        if n.is_finite() && n >= 0.0 && n.fract() == 0.0 && n < U64_LIMIT {
            Some(n as u64)
        } else {
            None
        }
    }
}

// ── BilledParser ──────────────────────────────────────────────────────────────

/// Resolves the billing flag. Unknown values count as billed.
pub struct BilledParser;

impl BilledParser {
    pub fn parse(field: &RawField) -> Option<bool> {
        match field {
            RawField::Flag(b) => Some(*b),
            RawField::Integer(i) => Some(*i != 0),
            RawField::Number(n) if n.is_finite() => Some(*n != 0.0),
            RawField::Text(s) => match s.trim().to_lowercase().as_str() {
                "billed" | "yes" | "y" | "true" | "1" => Some(true),
                "unbilled" | "not billed" | "non-billed" | "no" | "n" | "false" | "0" => Some(false),
                _ => None,
            },
            _ => None,
        }
    }
}

// ── Normalizer ────────────────────────────────────────────────────────────────

/// Output of [`Normalizer::normalize`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizedBatch {
    pub records: Vec<NormalizedAttendanceRecord>,
    /// Rows dropped because their employee id could not be resolved.
    pub dropped_records: usize,
    /// Present but unreadable cells that were replaced by their default.
    pub defaulted_fields: usize,
}

/// Stateless record normalizer.
pub struct Normalizer;

impl Normalizer {
    /// Normalize a whole table. Input order is preserved.
    pub fn normalize(raw_records: &[RawAttendanceRecord]) -> NormalizedBatch {
        let mut batch = NormalizedBatch::default();

        for (row, raw) in raw_records.iter().enumerate() {
            match Self::normalize_record(raw, &mut batch.defaulted_fields) {
                Some(record) => batch.records.push(record),
                None => {
                    debug!(row, id = ?raw.employee_id, "dropping record without a usable employee id");
                    batch.dropped_records += 1;
                }
            }
        }

        if batch.dropped_records > 0 {
            warn!(
                "Dropped {} of {} attendance records with unparseable employee IDs",
                batch.dropped_records,
                raw_records.len()
            );
        }
        debug!(
            kept = batch.records.len(),
            dropped = batch.dropped_records,
            defaulted = batch.defaulted_fields,
            "normalization finished"
        );

        batch
    }

    /// Normalize one row, or `None` when its id is unusable.
    ///
    /// `defaulted` is incremented once per present-but-unreadable cell.
    pub fn normalize_record(
        raw: &RawAttendanceRecord,
        defaulted: &mut usize,
    ) -> Option<NormalizedAttendanceRecord> {
        let employee_id = IdParser::parse(&raw.employee_id)?;

        let mut values = [0.0; 8];
        for (slot, metric) in values.iter_mut().zip(Metric::ALL) {
            let field = raw.field(metric);
            let parsed = match metric.kind() {
                MetricKind::Duration => DurationParser::parse(field),
                MetricKind::Count => CountParser::parse(field),
            };
            *slot = match parsed {
                Some(v) => v,
                None => {
                    if !field.is_missing() {
                        debug!(employee_id, metric = metric.label(), value = ?field, "unparseable value, using 0.0");
                        *defaulted += 1;
                    }
                    0.0
                }
            };
        }

        let billed = match BilledParser::parse(&raw.billed) {
            Some(b) => b,
            None => {
                if !raw.billed.is_missing() {
                    debug!(employee_id, value = ?raw.billed, "unrecognised billed flag, assuming billed");
                    *defaulted += 1;
                }
                true
            }
        };

        let [avg_in_time, avg_out_time, avg_office_hours, avg_break_hours, avg_cafeteria_hours, avg_ooo_hours, full_day_leave, half_day_leave] = values;

        Some(NormalizedAttendanceRecord {
            employee_id,
            employee_name: raw.employee_name.clone(),
            account_code: raw.account_code.clone(),
            avg_in_time,
            avg_out_time,
            avg_office_hours,
            avg_break_hours,
            avg_cafeteria_hours,
            avg_ooo_hours,
            full_day_leave,
            half_day_leave,
            billed,
        })
    }
}

/// Shorthand for callers that only need the surviving records.
pub fn normalize(raw_records: &[RawAttendanceRecord]) -> Vec<NormalizedAttendanceRecord> {
    Normalizer::normalize(raw_records).records
}

// ── Tests ──────────────────────────────────────────────────────────────────────
