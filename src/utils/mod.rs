use std::time::Duration;

pub fn escape_html(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Parses a millisecond count, with or without a trailing `ms`.
pub fn parse_millis(value: &str) -> Result<Duration, String> {
    let trimmed = value.trim();
    let digits = trimmed.strip_suffix("ms").unwrap_or(trimmed).trim();
    if digits.is_empty() {
        return Err("expected a number of milliseconds".to_string());
    }
    let ms: u64 = digits
        .parse()
        .map_err(|_| format!("invalid millisecond value '{digits}'"))?;
    Ok(Duration::from_millis(ms))
}

pub fn format_millis(duration: Duration) -> String {
    format!("{}ms", duration.as_millis())
}

pub fn format_bool(value: bool) -> &'static str {
    if value {
        "true"
    } else {
        "false"
    }
}
