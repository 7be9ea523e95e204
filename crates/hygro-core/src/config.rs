//! Application configuration.

use serde::{Deserialize, Serialize};

use crate::ui::HISTORY_CAPACITY;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// Seconds between history samples (ring mutation + log append).
    pub sample_interval_secs: u32,
    /// Seconds between header refreshes (current readouts and clock only).
    pub header_interval_secs: u32,
    /// History ring capacity. Defaults to one sample per graph row.
    pub history_capacity: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sample_interval_secs: 5,
            header_interval_secs: 1,
            history_capacity: HISTORY_CAPACITY,
        }
    }
}
