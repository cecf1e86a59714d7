use chrono::{DateTime, NaiveDate, Utc};
use serde_json::Value;

/// Parse an RFC 3339 timestamp, or a bare `YYYY-MM-DD` as midnight UTC.
pub fn parse_when(raw: &str) -> Result<DateTime<Utc>, String> {
    if let Ok(at) = DateTime::parse_from_rfc3339(raw) {
        return Ok(at.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|at| at.and_utc())
        .ok_or_else(|| format!("invalid date '{raw}': expected RFC 3339 or YYYY-MM-DD"))
}

/// Split `QUESTION_ID=VALUE`. The value is JSON when it parses, a plain
/// string otherwise, so `yes`, `4`, and `["a","b"]` all work unquoted.
pub fn parse_answer(raw: &str) -> anyhow::Result<(String, Value)> {
    let Some((question_id, value)) = raw.split_once('=') else {
        anyhow::bail!("invalid answer '{raw}': expected QUESTION_ID=VALUE");
    };
    let question_id = question_id.trim();
    if question_id.is_empty() {
        anyhow::bail!("invalid answer '{raw}': missing question ID");
    }
    let value = serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()));
    Ok((question_id.to_string(), value))
}
