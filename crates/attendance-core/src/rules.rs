//! Rule-based HR recommendations.
//!
//! A flat list of threshold rules evaluated in a fixed category order. Each
//! rule appends at most one message and never suppresses another. The
//! thresholds are absolute, employee-only constants; the cohort baseline is
//! accepted by [`recommend`] but not consulted.

use serde::{Deserialize, Serialize};

use crate::models::KpiSummary;

// ── Thresholds ────────────────────────────────────────────────────────────────

/// Full-day leaves above this trigger a counseling recommendation.
pub const FULL_DAY_LEAVE_HIGH: f64 = 3.0;
/// Full-day leaves above this (up to the high mark) trigger monitoring.
pub const FULL_DAY_LEAVE_MODERATE: f64 = 1.0;
/// Half-day leaves above this trigger a leave-planning discussion.
pub const HALF_DAY_LEAVE_HIGH: f64 = 2.0;
/// Half-day leaves above this (up to the high mark) trigger a handover reminder.
pub const HALF_DAY_LEAVE_MODERATE: f64 = 1.0;

/// Arrival hour-of-day considered consistently late.
pub const IN_TIME_LATE: f64 = 9.5;
/// Arrival hour-of-day considered slightly late; also the commendation limit.
pub const IN_TIME_SLIGHTLY_LATE: f64 = 9.0;
/// Departures before this hour-of-day count as early.
pub const OUT_TIME_EARLY: f64 = 17.0;

/// Daily office hours below this are flagged as low.
pub const OFFICE_HOURS_LOW: f64 = 7.0;
/// Daily office-hours target.
pub const OFFICE_HOURS_TARGET: f64 = 8.0;

/// Daily break hours above this count as long breaks.
pub const BREAK_HOURS_HIGH: f64 = 1.0;
/// Daily cafeteria hours above this are flagged.
pub const CAFETERIA_HOURS_HIGH: f64 = 0.8;
/// Daily out-of-office hours above this are flagged.
pub const OOO_HOURS_HIGH: f64 = 1.5;

// ── Messages ──────────────────────────────────────────────────────────────────

pub const MSG_FULL_DAY_HIGH: &str =
    "🚨 High full-day leaves detected: Schedule counseling session to understand reasons";
pub const MSG_FULL_DAY_MODERATE: &str =
    "⚠️ Moderate full-day leaves: Monitor leave pattern for consistency";
pub const MSG_HALF_DAY_HIGH: &str =
    "⚠️ Frequent half-day leaves: Discuss proper leave planning procedures";
pub const MSG_HALF_DAY_MODERATE: &str =
    "📝 Some half-day leaves: Ensure work handover during leaves";
pub const MSG_LATE_ARRIVAL: &str = "⏰ Consistently late arrivals: Discuss flexible timing options";
pub const MSG_SLIGHTLY_LATE: &str =
    "⏰ Slightly late arrivals: Gentle reminder about office timing";
pub const MSG_EARLY_DEPARTURE: &str =
    "🏃 Early departures: Review workload and task completion status";
pub const MSG_LOW_OFFICE_HOURS: &str =
    "📉 Low office hours: Check task allocation and employee engagement";
pub const MSG_BELOW_TARGET_HOURS: &str =
    "📊 Below target office hours: Monitor productivity and provide support";
pub const MSG_LONG_BREAKS: &str = "☕ Long break hours: Discuss time management and break policies";
pub const MSG_CAFETERIA: &str = "🍽️ Extended cafeteria time: Encourage efficient break usage";
pub const MSG_OOO: &str = "🏠 High OOO hours: Verify work-from-home arrangements";
pub const MSG_NOT_BILLED: &str =
    "💼 Employee not billed: Review project allocation and client assignments";
pub const MSG_EXCELLENT: &str =
    "⭐ Excellent attendance record: Consider for recognition or rewards";
pub const MSG_NORMAL_RANGE: &str =
    "✅ Attendance patterns are within normal ranges. Continue regular monitoring.";

// ── Types ─────────────────────────────────────────────────────────────────────

/// Rule categories in the order their messages are emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleCategory {
    Leave,
    Timing,
    OfficeHours,
    BreakPatterns,
    Billing,
    Positive,
    Fallback,
}

/// One emitted recommendation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    pub category: RuleCategory,
    pub message: String,
}

impl Recommendation {
    fn new(category: RuleCategory, message: impl Into<String>) -> Self {
        Self {
            category,
            message: message.into(),
        }
    }
}

// ── RecommendationEngine ──────────────────────────────────────────────────────

/// Stateless rule evaluator.
pub struct RecommendationEngine;

impl RecommendationEngine {
    /// Evaluate every rule against `employee` and return the tagged results.
    ///
    /// The result is never empty: when no rule fires a single
    /// [`RuleCategory::Fallback`] entry is returned.
    pub fn evaluate(employee: &KpiSummary, _baseline: &KpiSummary) -> Vec<Recommendation> {
        let mut out = Vec::new();

        Self::leave_rules(employee, &mut out);
        Self::timing_rules(employee, &mut out);
        Self::office_hours_rules(employee, &mut out);
        Self::break_rules(employee, &mut out);
        Self::billing_rules(employee, &mut out);
        Self::positive_rules(employee, &mut out);

        if out.is_empty() {
            out.push(Recommendation::new(RuleCategory::Fallback, MSG_NORMAL_RANGE));
        }
        out
    }

    fn leave_rules(k: &KpiSummary, out: &mut Vec<Recommendation>) {
        if k.full_day_leave > FULL_DAY_LEAVE_HIGH {
            out.push(Recommendation::new(RuleCategory::Leave, MSG_FULL_DAY_HIGH));
        } else if k.full_day_leave > FULL_DAY_LEAVE_MODERATE {
            out.push(Recommendation::new(RuleCategory::Leave, MSG_FULL_DAY_MODERATE));
        }

        if k.half_day_leave > HALF_DAY_LEAVE_HIGH {
            out.push(Recommendation::new(RuleCategory::Leave, MSG_HALF_DAY_HIGH));
        } else if k.half_day_leave > HALF_DAY_LEAVE_MODERATE {
            out.push(Recommendation::new(RuleCategory::Leave, MSG_HALF_DAY_MODERATE));
        }
    }

    fn timing_rules(k: &KpiSummary, out: &mut Vec<Recommendation>) {
        if k.avg_in_time > IN_TIME_LATE {
            out.push(Recommendation::new(RuleCategory::Timing, MSG_LATE_ARRIVAL));
        } else if k.avg_in_time > IN_TIME_SLIGHTLY_LATE {
            out.push(Recommendation::new(RuleCategory::Timing, MSG_SLIGHTLY_LATE));
        }

        if k.avg_out_time < OUT_TIME_EARLY {
            out.push(Recommendation::new(RuleCategory::Timing, MSG_EARLY_DEPARTURE));
        }
    }

    fn office_hours_rules(k: &KpiSummary, out: &mut Vec<Recommendation>) {
        if k.avg_office_hours < OFFICE_HOURS_LOW {
            out.push(Recommendation::new(RuleCategory::OfficeHours, MSG_LOW_OFFICE_HOURS));
        } else if k.avg_office_hours < OFFICE_HOURS_TARGET {
            out.push(Recommendation::new(RuleCategory::OfficeHours, MSG_BELOW_TARGET_HOURS));
        }
    }

    fn break_rules(k: &KpiSummary, out: &mut Vec<Recommendation>) {
        if k.avg_break_hours > BREAK_HOURS_HIGH {
            out.push(Recommendation::new(RuleCategory::BreakPatterns, MSG_LONG_BREAKS));
        }
        if k.avg_cafeteria_hours > CAFETERIA_HOURS_HIGH {
            out.push(Recommendation::new(RuleCategory::BreakPatterns, MSG_CAFETERIA));
        }
        if k.avg_ooo_hours > OOO_HOURS_HIGH {
            out.push(Recommendation::new(RuleCategory::BreakPatterns, MSG_OOO));
        }
    }

    fn billing_rules(k: &KpiSummary, out: &mut Vec<Recommendation>) {
        if k.billed {
            return;
        }
        let message = match k.account_code.as_deref().map(str::trim) {
            Some(code) if !code.is_empty() => format!(
                "💼 Employee not billed (account {code}): Review project allocation and client assignments"
            ),
            _ => MSG_NOT_BILLED.to_string(),
        };
        out.push(Recommendation::new(RuleCategory::Billing, message));
    }

    fn positive_rules(k: &KpiSummary, out: &mut Vec<Recommendation>) {
        if k.full_day_leave <= FULL_DAY_LEAVE_MODERATE
            && k.half_day_leave <= HALF_DAY_LEAVE_MODERATE
            && k.avg_office_hours >= OFFICE_HOURS_TARGET
            && k.avg_in_time <= IN_TIME_SLIGHTLY_LATE
            && k.avg_out_time >= OUT_TIME_EARLY
        {
            out.push(Recommendation::new(RuleCategory::Positive, MSG_EXCELLENT));
        }
    }
}

/// Ordered recommendation messages for `employee`. Never empty.
pub fn recommend(employee: &KpiSummary, baseline: &KpiSummary) -> Vec<String> {
    RecommendationEngine::evaluate(employee, baseline)
        .into_iter()
        .map(|r| r.message)
        .collect()
}

// ── Tests ──────────────────────────────────────────────────────────────────────
