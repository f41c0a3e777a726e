//! Parsing helpers for human-facing text fields
//!
//! Duration badges and localized view counts arrive as display strings; the
//! evaluator needs them as numbers.

/// Sentinel duration for shorts thumbnails (the overlay text is `SHORTS`
/// instead of a timestamp).
pub const SHORTS_LENGTH: i64 = -2;

/// Parse a duration badge into seconds.
///
/// `"SHORTS"` maps to [`SHORTS_LENGTH`]; `ss`, `mm:ss` and `hh:mm:ss` parse
/// normally; anything else yields `-1`, which never matches a length bound.
pub fn parse_time(time_str: &str) -> i64 {
    if time_str == "SHORTS" {
        return SHORTS_LENGTH;
    }

    let parts: Vec<Option<i64>> = time_str
        .split(':')
        .map(|part| part.trim().parse::<i64>().ok())
        .collect();

    match parts.as_slice() {
        [Some(h), Some(m), Some(s)] => h * 60 * 60 + m * 60 + s,
        [Some(m), Some(s)] => m * 60 + s,
        [Some(s)] => *s,
        _ => -1,
    }
}

/// Parse a localized view-count string (`"1,234 views"`, `"1.2M views"`)
/// into an absolute count. Returns `None` for non-english or unrecognized
/// formatting.
pub fn parse_view_count(view_count: &str) -> Option<u64> {
    let mut parts = view_count.split_whitespace();
    let number = parts.next()?;
    let unit = parts.next()?;
    if unit != "views" && unit != "view" {
        return None;
    }

    let cleaned = number.replace(',', "");
    let (digits, multiplier) = match cleaned.chars().last()? {
        'K' | 'k' => (&cleaned[..cleaned.len() - 1], 1_000.0),
        'M' | 'm' => (&cleaned[..cleaned.len() - 1], 1_000_000.0),
        'B' | 'b' => (&cleaned[..cleaned.len() - 1], 1_000_000_000.0),
        _ => (cleaned.as_str(), 1.0),
    };

    let value: f64 = digits.parse().ok()?;
    Some((value * multiplier) as u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_time_formats() {
        assert_eq!(parse_time("42"), 42);
        assert_eq!(parse_time("2:05"), 125);
        assert_eq!(parse_time("1:02:03"), 3723);
        assert_eq!(parse_time("SHORTS"), SHORTS_LENGTH);
    }

    #[test]
    fn test_parse_time_invalid() {
        assert_eq!(parse_time(""), -1);
        assert_eq!(parse_time("a:b"), -1);
        assert_eq!(parse_time("1:2:3:4"), -1);
    }

    #[test]
    fn test_parse_view_count() {
        assert_eq!(parse_view_count("123 views"), Some(123));
        assert_eq!(parse_view_count("1,234 views"), Some(1234));
        assert_eq!(parse_view_count("1 view"), Some(1));
        assert_eq!(parse_view_count("1.2K views"), Some(1200));
        assert_eq!(parse_view_count("3M views"), Some(3_000_000));
        assert_eq!(parse_view_count("2B views"), Some(2_000_000_000));
    }

    #[test]
    fn test_parse_view_count_non_english() {
        assert_eq!(parse_view_count("123 Aufrufe"), None);
        assert_eq!(parse_view_count("garbage"), None);
    }
}
