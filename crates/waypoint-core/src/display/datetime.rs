//! Timestamp display in the local timezone.

use std::fmt;

use jiff::{Timestamp, tz::TimeZone};

/// Formats a `Timestamp` in the system timezone as `YYYY-MM-DD HH:MM:SS TZ`.
///
/// Timestamps are stored in UTC; this wrapper is only for output.
pub struct LocalDateTime<'a>(pub &'a Timestamp);

impl fmt::Display for LocalDateTime<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            self.0
                .to_zoned(TimeZone::system())
                .strftime("%Y-%m-%d %H:%M:%S %Z")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_shape() {
        let ts: Timestamp = "2024-03-01T12:30:45Z".parse().unwrap();
        let output = LocalDateTime(&ts).to_string();
        // date, time and zone abbreviation
        assert_eq!(output.split(' ').count(), 3);
        assert_eq!(output.len() - output.rsplit(' ').next().unwrap().len(), 20);
    }
}
