//! Timestamp formatting in the system time zone.

use std::fmt;

use jiff::{tz::TimeZone, Timestamp};

/// Formats a timestamp as `YYYY-MM-DD HH:MM:SS TZ` in the system time zone.
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

/// Like [`LocalDateTime`] for a creation time the store may not have
/// resolved yet.
pub struct CreatedAt<'a>(pub Option<&'a Timestamp>);

impl fmt::Display for CreatedAt<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(ts) => write!(f, "{}", LocalDateTime(ts)),
            None => f.write_str("pending"),
        }
    }
}
