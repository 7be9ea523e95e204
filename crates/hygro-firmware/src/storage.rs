//! Append-only CSV log sink on the SD card.
//!
//! SD card operations are blocking (the display shares the same SPI bus), so
//! each append opens the volume, writes one line, and closes everything
//! again. That keeps the FAT structures consistent across power loss at the
//! cost of some bus traffic per sample.

use embedded_sdmmc::{Mode, SdCard, SdCardError, TimeSource, VolumeIdx, VolumeManager};
use heapless::String;
use hygro_core::measurement::DateTime;
use hygro_core::persistence::{LOG_HEADER, LogSink, short_log_file_name};

/// One log file per power cycle, named from the boot wall-clock time in
/// 8.3 form (`MMDDHHMM.CSV`).
pub struct SdCardLog<S, D, T>
where
    S: embedded_hal::spi::SpiDevice<u8>,
    D: embedded_hal::delay::DelayNs,
    T: TimeSource,
{
    volume_mgr: VolumeManager<SdCard<S, D>, T, 4, 4, 1>,
    file_name: String<12>,
}

impl<S, D, T> SdCardLog<S, D, T>
where
    S: embedded_hal::spi::SpiDevice<u8>,
    D: embedded_hal::delay::DelayNs,
    T: TimeSource,
{
    /// Creates the log file and writes the CSV header. Fails when no card is
    /// present or the volume cannot be opened; the caller decides whether
    /// that is fatal.
    pub fn new(
        sd_card: SdCard<S, D>,
        ts: T,
        started_at: &DateTime,
    ) -> Result<Self, embedded_sdmmc::Error<SdCardError>> {
        let volume_mgr = VolumeManager::new(sd_card, ts);
        let log = Self {
            volume_mgr,
            file_name: short_log_file_name(started_at),
        };
        log.write(LOG_HEADER, Mode::ReadWriteCreateOrTruncate)?;
        Ok(log)
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    fn write(&self, data: &str, mode: Mode) -> Result<(), embedded_sdmmc::Error<SdCardError>> {
        let volume0 = self.volume_mgr.open_volume(VolumeIdx(0))?;
        let root_dir = volume0.open_root_dir()?;
        let file = root_dir.open_file_in_dir(self.file_name.as_str(), mode)?;

        file.write(data.as_bytes())?;

        // Resources close on drop (RAII), but close explicitly to surface
        // errors.
        file.close()?;
        root_dir.close()?;
        volume0.close()?;

        Ok(())
    }
}

impl<S, D, T> LogSink for SdCardLog<S, D, T>
where
    S: embedded_hal::spi::SpiDevice<u8>,
    D: embedded_hal::delay::DelayNs,
    T: TimeSource,
{
    type Error = embedded_sdmmc::Error<SdCardError>;

    fn append(&mut self, line: &str) -> Result<(), Self::Error> {
        self.write(line, Mode::ReadWriteAppend)
    }
}
