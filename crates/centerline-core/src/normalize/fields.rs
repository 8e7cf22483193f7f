//! Lenient parsing of raw CSV cells. Unparseable values become `None`
//! instead of failing the row.

/// Trimmed value, or `None` for missing/blank cells.
pub fn clean(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn numeric(value: Option<&str>) -> Option<f64> {
    let raw: String = value?
        .trim()
        .chars()
        .filter(|c| !matches!(c, '$' | ',' | ' '))
        .collect();
    let parsed = raw.parse::<f64>().ok()?;
    (parsed.is_finite() && parsed >= 0.0).then_some(parsed)
}

/// Non-negative whole number ("12,500", "12500.0", "$900").
/// Values that do not fit an `i64` are treated as unparseable.
pub fn parse_integer(value: Option<&str>) -> Option<i64> {
    let rounded = numeric(value)?.round();
    // `i64::MAX as f64` is 2^63, one past the largest i64
    (rounded < i64::MAX as f64).then_some(rounded as i64)
}

/// Non-negative decimal amount.
pub fn parse_decimal(value: Option<&str>) -> Option<f64> {
    numeric(value)
}

/// Truthy spellings used in spreadsheets; anything else is `false`.
pub fn parse_flag(value: Option<&str>) -> bool {
    matches!(
        value.map(|v| v.trim().to_ascii_lowercase()).as_deref(),
        Some("true" | "t" | "yes" | "y" | "1" | "x")
    )
}
