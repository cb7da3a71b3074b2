use chrono::{DateTime, Utc};

/// Elapsed milliseconds between two RFC 3339 timestamps.
///
/// A missing or unparseable timestamp on either side yields 0. The result is
/// not clamped: an end before its start produces a negative duration.
pub fn duration_ms(start: Option<&str>, end: Option<&str>) -> i64 {
    match (parse_timestamp(start), parse_timestamp(end)) {
        (Some(start), Some(end)) => (end - start).num_milliseconds(),
        _ => 0,
    }
}

/// Sums `duration_ms` over an ordered sequence of (start, end) pairs.
pub fn sum_ms<'a>(pairs: impl IntoIterator<Item = (Option<&'a str>, Option<&'a str>)>) -> i64 {
    pairs
        .into_iter()
        .map(|(start, end)| duration_ms(start, end))
        .sum()
}

/// Converts milliseconds to minutes, rounded to two decimal places.
pub fn to_minutes(ms: i64) -> f64 {
    round_to_two(ms as f64 / 1000.0 / 60.0)
}

/// Round-half-up to two decimal places.
pub fn round_to_two(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn parse_timestamp(value: Option<&str>) -> Option<DateTime<Utc>> {
    value?.parse::<DateTime<Utc>>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duration_between_valid_timestamps() {
        let ms = duration_ms(
            Some("2023-05-15T10:00:00Z"),
            Some("2023-05-15T10:01:30Z"),
        );
        assert_eq!(ms, 90_000);
    }

    #[test]
    fn duration_is_negative_when_end_precedes_start() {
        let ms = duration_ms(
            Some("2023-05-15T10:01:00Z"),
            Some("2023-05-15T10:00:00Z"),
        );
        assert_eq!(ms, -60_000);
    }

    #[test]
    fn missing_or_malformed_timestamps_are_zero() {
        assert_eq!(duration_ms(None, Some("2023-05-15T10:00:00Z")), 0);
        assert_eq!(duration_ms(Some("2023-05-15T10:00:00Z"), None), 0);
        assert_eq!(duration_ms(None, None), 0);
        assert_eq!(duration_ms(Some("not a date"), Some("2023-05-15T10:00:00Z")), 0);
        assert_eq!(duration_ms(Some("2023-05-15T10:00:00Z"), Some("")), 0);
    }

    #[test]
    fn sum_skips_malformed_pairs() {
        let pairs = vec![
            (Some("2023-05-15T10:00:00Z"), Some("2023-05-15T10:01:00Z")),
            (Some("garbage"), Some("2023-05-15T10:05:00Z")),
            (Some("2023-05-15T11:00:00Z"), Some("2023-05-15T11:00:30Z")),
        ];
        assert_eq!(sum_ms(pairs), 90_000);
    }

    #[test]
    fn minutes_round_to_two_decimals() {
        assert_eq!(to_minutes(90_000), 1.5);
        assert_eq!(to_minutes(125_499), 2.09);
        assert_eq!(to_minutes(0), 0.0);
    }

    #[test]
    fn rounding_is_half_up() {
        assert_eq!(round_to_two(0.125), 0.13);
        assert_eq!(round_to_two(1.754999), 1.75);
    }
}
