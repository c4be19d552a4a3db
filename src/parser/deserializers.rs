use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use serde_json::Value;

const NAIVE_DT_FMTS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Parse a creation timestamp into a UTC instant.
///
/// Accepted forms:
/// - RFC 3339 with an offset ("2026-01-05T16:24:00+02:00", "...Z"), converted to UTC
/// - "2026-01-05T16:24:00[.fff]" and "2026-01-05 16:24:00[.fff]", read as UTC
/// - "2026-01-05", read as midnight UTC
///
/// Returns None for empty or unparseable strings.
pub fn parse_created_at(s: &str) -> Option<DateTime<Utc>> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.with_timezone(&Utc));
    }
    // Postgres style "+00" offsets
    if let Ok(dt) = DateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M:%S%.f%#z") {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in NAIVE_DT_FMTS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, fmt) {
            return Some(dt.and_utc());
        }
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

/// Storage form of a creation instant: "2026-01-05T16:24:00.000Z".
/// Fixed width, so lexical order is chronological order.
pub fn format_created_at(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Scalar JSON value as trimmed text.
/// "SN-001" → Some("SN-001"), 1042 → Some("1042"), null / "" / objects → None
pub fn json_scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
