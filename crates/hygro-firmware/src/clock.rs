//! Wall-clock time derived from the monotonic uptime counter.

use embassy_time::Instant;
use embedded_sdmmc::{TimeSource, Timestamp};
use hygro_core::measurement::DateTime;
use hygro_core::sensors::WallClock;

/// The board has no battery-backed RTC; wall-clock time counts up from this
/// fixed epoch at power-on.
pub const CLOCK_BASE: DateTime = DateTime {
    year: 2025,
    month: 1,
    day: 1,
    hour: 0,
    minute: 0,
    second: 0,
};

/// Clock that offsets a fixed base date by the time since boot.
#[derive(Debug, Clone, Copy)]
pub struct UptimeClock {
    base: DateTime,
    boot: Instant,
}

impl UptimeClock {
    pub fn new(base: DateTime) -> Self {
        Self {
            base,
            boot: Instant::now(),
        }
    }
}

impl WallClock for UptimeClock {
    fn now(&self) -> DateTime {
        self.base.plus_seconds(self.boot.elapsed().as_secs())
    }
}

/// Adapter feeding [`UptimeClock`] time into FAT directory entries.
pub struct ClockTimeSource(pub UptimeClock);

impl TimeSource for ClockTimeSource {
    fn get_timestamp(&self) -> Timestamp {
        let now = self.0.now();
        Timestamp {
            year_since_1970: now.year.saturating_sub(1970) as u8,
            zero_indexed_month: now.month - 1,
            zero_indexed_day: now.day - 1,
            hours: now.hour,
            minutes: now.minute,
            seconds: now.second,
        }
    }
}
