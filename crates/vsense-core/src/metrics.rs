//! Abbreviated engagement count parsing ("1.2M views" -> 1_200_000)

use regex::Regex;
use std::sync::OnceLock;

static METRIC_RE: OnceLock<Regex> = OnceLock::new();

/// Separators allowed between digit groups: comma, space, NBSP, narrow NBSP
const GROUP_SEPARATORS: [char; 4] = [',', ' ', '\u{00A0}', '\u{202F}'];

/// Parse a human-readable count into an integer.
///
/// Returns `None` when the text holds no number at all, so callers can tell
/// "unknown" apart from a real zero. Digit groups may be split by commas or
/// spaces ("1 234"). A `K`/`M`/`B` suffix or a `thousand`/`million`/`billion`
/// word only counts when it stands on its own right after the number:
/// "1.2K" scales, "1,234 likes" does not.
pub fn parse_metric(text: &str) -> Option<u64> {
    let re = METRIC_RE.get_or_init(|| {
        Regex::new(concat!(
            r"(?i)(\d+(?:[, \x{00A0}\x{202F}]\d{3})*(?:\.\d+)?|\.\d+)",
            r"\s*(thousand|million|billion|[kmb])?",
        ))
        .unwrap()
    });

    let caps = re.captures(text)?;
    let literal: String = caps
        .get(1)?
        .as_str()
        .chars()
        .filter(|c| !GROUP_SEPARATORS.contains(c))
        .collect();
    let value: f64 = literal.parse().ok()?;

    let multiplier = match caps.get(2) {
        Some(unit) if !starts_word(&text[unit.end()..]) => unit_multiplier(unit.as_str()),
        _ => 1.0,
    };

    let scaled = (value * multiplier).round();
    if !scaled.is_finite() || scaled < 0.0 {
        return None;
    }
    Some(scaled as u64)
}

fn starts_word(rest: &str) -> bool {
    rest.chars().next().is_some_and(|c| c.is_alphabetic())
}

fn unit_multiplier(unit: &str) -> f64 {
    match unit.to_ascii_lowercase().as_str() {
        "k" | "thousand" => 1_000.0,
        "m" | "million" => 1_000_000.0,
        "b" | "billion" => 1_000_000_000.0,
        _ => 1.0,
    }
}
