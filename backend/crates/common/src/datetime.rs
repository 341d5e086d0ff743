use chrono::{DateTime, TimeZone};

/// Datetime layout used in API payloads, e.g. `2013-05-17T14:20:00+0200`.
pub const DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%z";

/// Format a timestamp for API output, keeping its own offset.
pub fn format_datetime<Tz>(value: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    value.format(DATETIME_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, Utc};

    #[test]
    fn formats_utc_with_numeric_offset() {
        let dt = Utc.with_ymd_and_hms(2013, 5, 17, 14, 20, 0).unwrap();
        assert_eq!(format_datetime(&dt), "2013-05-17T14:20:00+0000");
    }

    #[test]
    fn keeps_source_offset() {
        let offset = FixedOffset::east_opt(2 * 3600).unwrap();
        let dt = offset.with_ymd_and_hms(2013, 5, 17, 14, 20, 0).unwrap();
        assert_eq!(format_datetime(&dt), "2013-05-17T14:20:00+0200");
    }
}
