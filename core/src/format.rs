//! Display formatting for counts and timestamps.

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime};

const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Compact count rendering: everything from 1000 up shows as whole thousands
/// with a `k` suffix; smaller values print as-is.
pub fn format_number(n: u64) -> String {
    if n >= 1000 {
        format!("{}k", n / 1000)
    } else {
        n.to_string()
    }
}

/// Render a timestamp as zero-padded `YYYY-MM-DD HH:MM:SS` in local time.
///
/// Accepts RFC 3339 strings (converted from their offset to local time),
/// bare `YYYY-MM-DDTHH:MM:SS[.frac]` timestamps (taken as already local, the
/// shape the backend emits), and plain `YYYY-MM-DD` dates (midnight).
/// Returns `None` for anything unparseable.
pub fn format_date(input: &str) -> Option<String> {
    if let Ok(instant) = DateTime::parse_from_rfc3339(input) {
        return Some(instant.with_timezone(&Local).format(DATE_FORMAT).to_string());
    }
    for pattern in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(input, pattern) {
            return Some(naive.format(DATE_FORMAT).to_string());
        }
    }
    let date = NaiveDate::parse_from_str(input, "%Y-%m-%d").ok()?;
    let midnight = date.and_hms_opt(0, 0, 0)?;
    Some(midnight.format(DATE_FORMAT).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn small_counts_print_plain() {
        assert_eq!(format_number(0), "0");
        assert_eq!(format_number(500), "500");
        assert_eq!(format_number(999), "999");
    }

    #[test]
    fn thousands_floor_to_k() {
        assert_eq!(format_number(1000), "1k");
        assert_eq!(format_number(1500), "1k");
        assert_eq!(format_number(9999), "9k");
        assert_eq!(format_number(123456), "123k");
        assert_eq!(format_number(1_000_000), "1000k");
    }

    #[test]
    fn naive_timestamps_render_fixed_width() {
        assert_eq!(
            format_date("2024-03-07T09:05:02"),
            Some("2024-03-07 09:05:02".to_string())
        );
        assert_eq!(
            format_date("2024-03-07T09:05:02.123456"),
            Some("2024-03-07 09:05:02".to_string())
        );
        assert_eq!(
            format_date("2024-12-31 23:59:59"),
            Some("2024-12-31 23:59:59".to_string())
        );
    }

    #[test]
    fn bare_dates_render_as_midnight() {
        assert_eq!(
            format_date("2024-03-07"),
            Some("2024-03-07 00:00:00".to_string())
        );
    }

    #[test]
    fn offset_timestamps_convert_to_local() {
        // The exact wall-clock depends on the host timezone; pin the shape.
        let rendered = format_date("2024-03-07T09:05:02+00:00").unwrap();
        assert_eq!(rendered.len(), 19);
        assert_eq!(&rendered[4..5], "-");
        assert_eq!(&rendered[10..11], " ");
        assert_eq!(&rendered[13..14], ":");
    }

    #[test]
    fn garbage_is_rejected() {
        assert_eq!(format_date(""), None);
        assert_eq!(format_date("yesterday"), None);
        assert_eq!(format_date("2024-13-40"), None);
    }
}
