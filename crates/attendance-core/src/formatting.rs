/// Format a floating-point number with thousands separators and a fixed number
/// of decimal places.
///
/// # Examples
///
/// ```
/// use attendance_core::formatting::format_number;
///
/// assert_eq!(format_number(1234.5,  1), "1,234.5");
/// assert_eq!(format_number(1234567.0, 0), "1,234,567");
/// assert_eq!(format_number(0.0, 2), "0.00");
/// assert_eq!(format_number(-9876.5, 1), "-9,876.5");
/// ```
pub fn format_number(value: f64, decimals: u32) -> String {
    let negative = value < 0.0;
    let rounded = round_to(value.abs(), decimals);

    let integer_part = rounded.trunc() as u64;
    let grouped = group_thousands(&integer_part.to_string());

    let result = if decimals == 0 {
        grouped
    } else {
        let frac_str = format!("{:.prec$}", rounded.fract(), prec = decimals as usize);
        // `frac_str` starts with "0.", e.g. "0.50".
        format!("{}{}", grouped, &frac_str[1..])
    };

    if negative && rounded != 0.0 {
        format!("-{}", result)
    } else {
        result
    }
}

/// Round `value` to `decimals` places. Non-finite input becomes `0.0`.
///
/// A small relative epsilon is added before rounding so that exact decimal
/// midpoints such as `1.005` round away from zero.
///
/// ```
/// use attendance_core::formatting::round_to;
///
/// assert_eq!(round_to(8.456, 2), 8.46);
/// assert_eq!(round_to(f64::NAN, 2), 0.0);
/// ```
pub fn round_to(value: f64, decimals: u32) -> f64 {
    if !value.is_finite() {
        return 0.0;
    }
    let factor = 10_f64.powi(decimals as i32);
    let epsilon = f64::EPSILON * value.abs() * factor;
    let scaled = value * factor;
    let nudged = if scaled >= 0.0 { scaled + epsilon } else { scaled - epsilon };
    nudged.round() / factor
}

/// Format a duration in fractional hours, e.g. `"8.5 hrs"`.
///
/// ```
/// use attendance_core::formatting::format_hours;
///
/// assert_eq!(format_hours(8.5, 1), "8.5 hrs");
/// assert_eq!(format_hours(0.25, 2), "0.25 hrs");
/// ```
pub fn format_hours(hours: f64, decimals: u32) -> String {
    format!("{} hrs", format_number(hours, decimals))
}

/// Render a fractional hour of day as a 24-hour clock, e.g. `9.5 → "09:30"`.
///
/// Negative and non-finite values render as `"00:00"`.
///
/// ```
/// use attendance_core::formatting::format_clock;
///
/// assert_eq!(format_clock(9.5), "09:30");
/// assert_eq!(format_clock(17.75), "17:45");
/// ```
pub fn format_clock(hour_of_day: f64) -> String {
    let total_minutes = if hour_of_day.is_finite() && hour_of_day > 0.0 {
        (hour_of_day * 60.0).round() as u64
    } else {
        0
    };
    format!("{:02}:{:02}", total_minutes / 60, total_minutes % 60)
}

/// Signed difference against the cohort average, e.g. `"+0.5 hrs vs avg"`.
///
/// `unit` is appended after the number when non-empty.
///
/// ```
/// use attendance_core::formatting::format_delta;
///
/// assert_eq!(format_delta(0.46, "hrs", 1), "+0.5 hrs vs avg");
/// assert_eq!(format_delta(-2.0, "", 0), "-2 vs avg");
/// assert_eq!(format_delta(-0.01, "hrs", 1), "+0.0 hrs vs avg");
/// ```
pub fn format_delta(delta: f64, unit: &str, decimals: u32) -> String {
    let mut rounded = round_to(delta, decimals);
    if rounded == 0.0 {
        // Avoid "-0.0".
        rounded = 0.0;
    }
    let number = format!("{:+.prec$}", rounded, prec = decimals as usize);
    if unit.is_empty() {
        format!("{} vs avg", number)
    } else {
        format!("{} {} vs avg", number, unit)
    }
}

// ── Internal helpers ──────────────────────────────────────────────────────────

/// Insert commas every three digits from the right of an integer string.
fn group_thousands(s: &str) -> String {
    if s.len() <= 3 {
        return s.to_string();
    }
    let chars: Vec<char> = s.chars().collect();
    let mut result = String::with_capacity(s.len() + s.len() / 3);
    let remainder = chars.len() % 3;
    for (i, &c) in chars.iter().enumerate() {
        if i != 0 && (i % 3 == remainder) {
            result.push(',');
        }
        result.push(c);
    }
    result
}

// ── Tests ──────────────────────────────────────────────────────────────────────
