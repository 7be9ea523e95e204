//! Measurement value type and the wall-clock datetime it is stamped with.

use core::fmt::{self, Display};

use serde::{Deserialize, Serialize};

const SECS_PER_DAY: u64 = 86_400;

/// Wall-clock datetime with second resolution.
///
/// Plain calendar fields rather than an epoch offset, because every consumer
/// (CSV log lines, axis legends, file names) wants the broken-down form.
/// Conversions to and from day counts use the proleptic Gregorian calendar.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateTime {
    pub year: u16,
    pub month: u8,
    pub day: u8,
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
}

impl DateTime {
    /// Build a [`DateTime`] from seconds since the Unix epoch.
    pub fn from_unix(secs: u64) -> Self {
        let days = (secs / SECS_PER_DAY) as i64;
        let rem = secs % SECS_PER_DAY;
        let (year, month, day) = civil_from_days(days);
        Self {
            year,
            month,
            day,
            hour: (rem / 3600) as u8,
            minute: (rem % 3600 / 60) as u8,
            second: (rem % 60) as u8,
        }
    }

    /// Return this datetime advanced by `secs` seconds, with calendar-correct
    /// day, month, and year rollover (including leap days).
    pub fn plus_seconds(self, secs: u64) -> Self {
        let day_secs =
            self.hour as u64 * 3600 + self.minute as u64 * 60 + self.second as u64 + secs;
        let days = days_from_civil(self.year, self.month, self.day) + (day_secs / SECS_PER_DAY) as i64;
        let rem = day_secs % SECS_PER_DAY;
        let (year, month, day) = civil_from_days(days);
        Self {
            year,
            month,
            day,
            hour: (rem / 3600) as u8,
            minute: (rem % 3600 / 60) as u8,
            second: (rem % 60) as u8,
        }
    }
}

impl Display for DateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:04}-{:02}-{:02} {:02}:{:02}:{:02}",
            self.year, self.month, self.day, self.hour, self.minute, self.second
        )
    }
}

/// Days since 1970-01-01 for a civil date (Howard Hinnant's algorithm).
fn days_from_civil(year: u16, month: u8, day: u8) -> i64 {
    let y = year as i64 - if month <= 2 { 1 } else { 0 };
    let era = if y >= 0 { y } else { y - 399 } / 400;
    let yoe = y - era * 400;
    let mp = if month > 2 { month as i64 - 3 } else { month as i64 + 9 };
    let doy = (153 * mp + 2) / 5 + day as i64 - 1;
    let doe = yoe * 365 + yoe / 4 - yoe / 100 + doy;
    era * 146_097 + doe - 719_468
}

/// Civil date for a count of days since 1970-01-01 (inverse of
/// [`days_from_civil`]).
fn civil_from_days(days: i64) -> (u16, u8, u8) {
    let z = days + 719_468;
    let era = if z >= 0 { z } else { z - 146_096 } / 146_097;
    let doe = z - era * 146_097;
    let yoe = (doe - doe / 1460 + doe / 36_524 - doe / 146_096) / 365;
    let y = yoe + era * 400;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let day = (doy - (153 * mp + 2) / 5 + 1) as u8;
    let month = if mp < 10 { mp + 3 } else { mp - 9 } as u8;
    let year = if month <= 2 { y + 1 } else { y } as u16;
    (year, month, day)
}

/// One sensor reading: temperature, relative humidity, and when it was taken.
///
/// Immutable once created and copied by value into the history ring and the
/// persistence hand-off.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    /// Degrees Celsius.
    pub temperature: f32,
    /// Relative humidity in percent.
    pub humidity: f32,
    pub timestamp: DateTime,
}

impl Display for Measurement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[Measurement] {}, {:.1} C, {:.0} %",
            self.timestamp, self.temperature, self.humidity
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_unix_epoch() {
        let dt = DateTime::from_unix(0);
        assert_eq!(
            dt,
            DateTime {
                year: 1970,
                month: 1,
                day: 1,
                hour: 0,
                minute: 0,
                second: 0
            }
        );
    }

    #[test]
    fn test_from_unix_known_instant() {
        // 2001-09-09 01:46:40 UTC
        let dt = DateTime::from_unix(1_000_000_000);
        assert_eq!(
            dt,
            DateTime {
                year: 2001,
                month: 9,
                day: 9,
                hour: 1,
                minute: 46,
                second: 40
            }
        );
    }

    #[test]
    fn test_from_unix_leap_day() {
        // 1709251200 is 2024-03-01 00:00:00 UTC; one day earlier is the leap day.
        let dt = DateTime::from_unix(1_709_251_200 - SECS_PER_DAY);
        assert_eq!(dt.year, 2024);
        assert_eq!(dt.month, 2);
        assert_eq!(dt.day, 29);
    }

    #[test]
    fn test_plus_seconds_year_rollover() {
        let dt = DateTime {
            year: 2023,
            month: 12,
            day: 31,
            hour: 23,
            minute: 59,
            second: 30,
        };
        let later = dt.plus_seconds(45);
        assert_eq!(
            later,
            DateTime {
                year: 2024,
                month: 1,
                day: 1,
                hour: 0,
                minute: 0,
                second: 15
            }
        );
    }

    #[test]
    fn test_plus_seconds_into_leap_day() {
        let dt = DateTime {
            year: 2024,
            month: 2,
            day: 28,
            hour: 12,
            minute: 0,
            second: 0,
        };
        let later = dt.plus_seconds(SECS_PER_DAY);
        assert_eq!(later.month, 2);
        assert_eq!(later.day, 29);
        assert_eq!(later.hour, 12);
    }

    #[test]
    fn test_plus_seconds_non_leap_year() {
        let dt = DateTime {
            year: 2023,
            month: 2,
            day: 28,
            hour: 0,
            minute: 0,
            second: 0,
        };
        let later = dt.plus_seconds(SECS_PER_DAY);
        assert_eq!(later.month, 3);
        assert_eq!(later.day, 1);
    }

    #[test]
    fn test_plus_seconds_zero_is_identity() {
        let dt = DateTime::from_unix(1_000_000_000);
        assert_eq!(dt.plus_seconds(0), dt);
    }

    #[test]
    fn test_datetime_display() {
        let dt = DateTime {
            year: 2024,
            month: 3,
            day: 7,
            hour: 8,
            minute: 5,
            second: 9,
        };
        assert_eq!(alloc::format!("{dt}"), "2024-03-07 08:05:09");
    }
}
