// Numeric parse/format helpers shared by the report engine.
//
// Display amounts are whole numbers with thousands separators. Parsing is
// deliberately lenient: the form layer hands us raw strings and a blank
// field reads as zero everywhere except the valuation multiple, which the
// propagator treats separately.

/// Format a numeric amount for display: zero decimal places, grouped
/// thousands. `40000.4` -> `"40,000"`.
pub fn format_amount(value: f64) -> String {
    let rounded = value.round();
    let negative = rounded < 0.0;
    let mut digits = format!("{}", rounded.abs() as u64);

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    while digits.len() > 3 {
        let tail = digits.split_off(digits.len() - 3);
        grouped = if grouped.is_empty() {
            tail
        } else {
            format!("{},{}", tail, grouped)
        };
    }
    grouped = if grouped.is_empty() {
        digits
    } else {
        format!("{},{}", digits, grouped)
    };

    if negative {
        format!("-{}", grouped)
    } else {
        grouped
    }
}

/// Format a raw field value as an amount. Blank stays blank and anything
/// non-numeric passes through unchanged so an already-formatted or textual
/// value is never clobbered.
pub fn format_amount_field(raw: &str) -> String {
    if raw.trim().is_empty() {
        return String::new();
    }
    match parse_numeric(raw) {
        Some(v) => format_amount(v),
        None => raw.to_string(),
    }
}

/// Strict numeric read of a field value. A blank field reads as zero
/// (matching how the form layer coerces blanks); anything that is not a
/// plain number is `None`.
pub fn parse_numeric(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Some(0.0);
    }
    match trimmed.parse::<f64>() {
        Ok(v) if v.is_finite() => Some(v),
        _ => None,
    }
}

/// Amount read for arithmetic: strips grouping commas, blank or garbage
/// reads as zero. Used for thresholds, EBITDA and profit impacts.
pub fn parse_amount(raw: &str) -> f64 {
    let cleaned: String = raw.trim().replace(',', "");
    if cleaned.is_empty() {
        return 0.0;
    }
    cleaned.parse::<f64>().unwrap_or(0.0)
}

/// Save-path numeric read: strips every character that cannot be part of a
/// number (currency signs, percent marks, grouping), falling back when
/// nothing parseable remains.
pub fn clean_number(raw: &str, fallback: f64) -> f64 {
    if raw.trim().is_empty() {
        return fallback;
    }
    let cleaned: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect();
    match cleaned.parse::<f64>() {
        Ok(v) if v.is_finite() => v,
        _ => fallback,
    }
}
