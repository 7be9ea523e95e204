//! Sensor boundary: the blocking-read contract and the SHT30 driver.

mod sht30;

pub use sht30::Sht30;

use core::future::Future;

use thiserror_no_std::Error;

use crate::measurement::{DateTime, Measurement};

/// Transient sensor failure. The tick that observed it is skipped; the next
/// timer tick retries naturally.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum SensorError {
    #[error("{sensor}: {operation} failed: {details}")]
    ReadFailed {
        sensor: &'static str,
        operation: &'static str,
        details: &'static str,
    },
}

/// A sensor that produces one timestamped [`Measurement`] per invocation.
///
/// The read is bounded by the bus transaction timeouts of the underlying
/// hardware and is expected to be called at sub-minute cadence.
pub trait Sensor {
    fn read(&mut self) -> impl Future<Output = Result<Measurement, SensorError>>;
}

/// Source of wall-clock timestamps, injected into sensor drivers.
pub trait WallClock {
    fn now(&self) -> DateTime;
}
