use chrono::{DateTime, SecondsFormat, Utc};

/// `2026-10-17T08:00:00.000Z`: UTC, millisecond precision.
pub fn iso_timestamp(dt: DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_iso_timestamp_format() {
        let dt = Utc.with_ymd_and_hms(2026, 10, 17, 8, 0, 0).unwrap();
        assert_eq!(iso_timestamp(dt), "2026-10-17T08:00:00.000Z");
    }
}
