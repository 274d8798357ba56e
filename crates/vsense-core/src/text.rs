//! Text normalization helpers shared by every platform

/// Collapse whitespace runs to a single space and trim both ends
pub fn clean_text(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Truncate to `max_chars` characters, appending "..." when anything was cut
pub fn truncate(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => format!("{}...", &text[..byte_idx]),
        None => text.to_string(),
    }
}

/// First `max_chars` characters, no ellipsis
pub fn prefix(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => &text[..byte_idx],
        None => text,
    }
}

/// Render seconds as "1h 2m 3s", omitting zero components
pub fn format_duration(seconds: u64) -> String {
    if seconds < 1 {
        return "0s".to_string();
    }

    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;

    let mut parts = Vec::new();
    if hours > 0 {
        parts.push(format!("{}h", hours));
    }
    if minutes > 0 {
        parts.push(format!("{}m", minutes));
    }
    if secs > 0 || parts.is_empty() {
        parts.push(format!("{}s", secs));
    }
    parts.join(" ")
}

/// Compact count: 999, 1.2K, 3.4M, 1.0B
pub fn format_count(count: u64) -> String {
    const UNITS: [(u64, &str); 3] = [(1_000_000_000, "B"), (1_000_000, "M"), (1_000, "K")];

    UNITS
        .iter()
        .find(|(scale, _)| count >= *scale)
        .map(|(scale, unit)| format!("{:.1}{}", count as f64 / *scale as f64, unit))
        .unwrap_or_else(|| count.to_string())
}
