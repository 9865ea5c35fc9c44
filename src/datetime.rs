//! Date/time utilities for CloudVault display records.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;

use crate::config::DisplayConfig;

/// Format a DateTime<Utc> in the specified timezone.
///
/// Falls back to UTC when the timezone name is unknown.
pub fn format_utc_datetime(dt: &DateTime<Utc>, timezone: &str, format: &str) -> String {
    let tz: Tz = match timezone.parse() {
        Ok(tz) => tz,
        Err(_) => return dt.format(format).to_string(),
    };
    dt.with_timezone(&tz).format(format).to_string()
}

/// Format a timestamp according to the display configuration.
pub fn format_for_display(dt: &DateTime<Utc>, display: &DisplayConfig) -> String {
    format_utc_datetime(dt, &display.timezone, &display.datetime_format)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap()
    }

    #[test]
    fn test_format_utc_datetime_tokyo() {
        let result = format_utc_datetime(&sample(), "Asia/Tokyo", "%Y/%m/%d %H:%M");
        assert_eq!(result, "2024/01/15 19:30");
    }

    #[test]
    fn test_format_utc_datetime_invalid_timezone() {
        let result = format_utc_datetime(&sample(), "Invalid/Zone", "%Y/%m/%d %H:%M");
        assert_eq!(result, "2024/01/15 10:30");
    }

    #[test]
    fn test_format_for_display_default() {
        let display = DisplayConfig::default();
        assert_eq!(format_for_display(&sample(), &display), "15-01-2024 10:30:00");
    }
}
