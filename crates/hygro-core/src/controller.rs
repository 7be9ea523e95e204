//! History controller: sampling orchestration and the shared state it drives.
//!
//! The controller owns the lifecycle state machine
//! `Stopped -> Running -> Stopping -> Stopped` and is the only mutator of the
//! history ring. The render path and the persistence worker observe the ring
//! and the hand-off signal through [`AppShared`].

use core::cell::RefCell;
use core::sync::atomic::{AtomicBool, Ordering};

use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;
use log::debug;

use crate::history::RingStore;
use crate::measurement::Measurement;
use crate::sensors::SensorError;

/// Command delivered to the persistence worker through the one-slot hand-off.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LogCommand {
    /// Append this measurement to the log file.
    Record(Measurement),
    /// Exit the worker loop.
    Shutdown,
}

/// State shared between the sampling context, the render path, and the
/// persistence worker.
///
/// Every multi-step read of the ring (length plus indexed peeks) must happen
/// inside [`AppShared::with_history`] so it cannot interleave with a `put`
/// on a preemptive scheduler.
pub struct AppShared {
    /// Ring of recent measurements, behind a blocking mutex.
    history: Mutex<CriticalSectionRawMutex, RefCell<RingStore<Measurement>>>,
    /// Latest reading for the header readouts, independent of ring history.
    current: Mutex<CriticalSectionRawMutex, RefCell<Option<Measurement>>>,
    /// One-slot persistence hand-off. A newer command displaces an
    /// unconsumed one, so bursts coalesce to "still pending".
    pub log_handoff: Signal<CriticalSectionRawMutex, LogCommand>,
    /// Raised whenever the display should redraw.
    pub render: Signal<CriticalSectionRawMutex, ()>,
    /// Raised by the persistence worker as it exits, so the shutdown path
    /// can join it before releasing resources.
    pub worker_done: Signal<CriticalSectionRawMutex, ()>,
    /// Cleared when shutdown begins; the worker re-checks it on every wake.
    pub running: AtomicBool,
    /// True while the info screen covers the graph. Sampling still refreshes
    /// the header readouts but leaves the ring, render, and log alone.
    pub overlay_visible: AtomicBool,
}

impl AppShared {
    /// Wrap a freshly allocated history ring. The info screen starts
    /// visible, matching the page manager's initial page.
    pub fn new(history: RingStore<Measurement>) -> Self {
        Self {
            history: Mutex::new(RefCell::new(history)),
            current: Mutex::new(RefCell::new(None)),
            log_handoff: Signal::new(),
            render: Signal::new(),
            worker_done: Signal::new(),
            running: AtomicBool::new(false),
            overlay_visible: AtomicBool::new(true),
        }
    }

    /// Run `f` with the history ring locked for reading.
    pub fn with_history<R>(&self, f: impl FnOnce(&RingStore<Measurement>) -> R) -> R {
        self.history.lock(|cell| f(&cell.borrow()))
    }

    /// Latest header reading, if any sample has succeeded yet.
    pub fn current(&self) -> Option<Measurement> {
        self.current.lock(|cell| *cell.borrow())
    }

    fn put_history(&self, m: Measurement) {
        self.history.lock(|cell| cell.borrow_mut().put(m));
    }

    fn set_current(&self, m: Measurement) {
        self.current.lock(|cell| {
            cell.borrow_mut().replace(m);
        });
    }
}

/// Controller lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Stopped,
    Running,
    Stopping,
}

/// Drives periodic sampling into the ring and coordinates the two downstream
/// consumers: the render trigger and the persistence hand-off.
pub struct HistoryController<'a> {
    shared: &'a AppShared,
    state: RunState,
}

impl<'a> HistoryController<'a> {
    pub fn new(shared: &'a AppShared) -> Self {
        Self {
            shared,
            state: RunState::Stopped,
        }
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    /// `Stopped -> Running`. Ticks are accepted from here on.
    pub fn start(&mut self) {
        if self.state == RunState::Stopped {
            self.shared.running.store(true, Ordering::Release);
            self.state = RunState::Running;
        }
    }

    /// Sampling-timer tick. On a successful read with the graph visible:
    /// store the measurement, wake the renderer, and hand the measurement to
    /// the persistence worker. A failed read is skipped for this tick.
    ///
    /// Returns whether the measurement entered the ring.
    pub fn on_sample(&mut self, reading: Result<Measurement, SensorError>) -> bool {
        if self.state != RunState::Running {
            return false;
        }
        let m = match reading {
            Ok(m) => m,
            Err(e) => {
                debug!("sensor read failed, skipping sample tick: {e}");
                return false;
            }
        };
        if self.shared.overlay_visible.load(Ordering::Acquire) {
            // Keep the header readouts fresh behind the info screen.
            self.shared.set_current(m);
            return false;
        }
        self.shared.put_history(m);
        self.shared.set_current(m);
        self.shared.render.signal(());
        self.shared.log_handoff.signal(LogCommand::Record(m));
        true
    }

    /// Header-timer tick: refresh the current readouts and clock only.
    /// Never mutates the ring and never reaches the log.
    pub fn on_header(&mut self, reading: Result<Measurement, SensorError>) {
        if self.state != RunState::Running {
            return;
        }
        if let Ok(m) = reading {
            self.shared.set_current(m);
            self.shared.render.signal(());
        }
    }

    /// `Running -> Stopping`. Callers must stop the tick sources first; the
    /// worker is woken once more so it observes the cleared running flag.
    pub fn begin_shutdown(&mut self) {
        if self.state != RunState::Running {
            return;
        }
        self.state = RunState::Stopping;
        self.shared.running.store(false, Ordering::Release);
        self.shared.log_handoff.signal(LogCommand::Shutdown);
    }

    /// `Stopping -> Stopped`, called after the persistence worker has been
    /// joined. Shared resources may be released once this returns.
    pub fn finish_shutdown(&mut self) {
        if self.state == RunState::Stopping {
            self.state = RunState::Stopped;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::measurement::{DateTime, Measurement};

    fn measurement(temperature: f32) -> Measurement {
        Measurement {
            temperature,
            humidity: 50.0,
            timestamp: DateTime::from_unix(1_000_000_000),
        }
    }

    fn shared() -> AppShared {
        let shared = AppShared::new(RingStore::new(8).unwrap());
        shared.overlay_visible.store(false, Ordering::Release);
        shared
    }

    fn read_error() -> SensorError {
        SensorError::ReadFailed {
            sensor: "SHT30",
            operation: "measure",
            details: "test",
        }
    }

    #[test]
    fn test_successful_sample_feeds_ring_render_and_log() {
        let shared = shared();
        let mut controller = HistoryController::new(&shared);
        controller.start();

        let m = measurement(22.5);
        assert!(controller.on_sample(Ok(m)));

        assert_eq!(shared.with_history(|h| h.len()), 1);
        assert_eq!(shared.current(), Some(m));
        assert_eq!(shared.render.try_take(), Some(()));
        assert_eq!(shared.log_handoff.try_take(), Some(LogCommand::Record(m)));
    }

    #[test]
    fn test_failed_read_skips_tick_entirely() {
        let shared = shared();
        let mut controller = HistoryController::new(&shared);
        controller.start();

        assert!(!controller.on_sample(Err(read_error())));

        assert!(shared.with_history(|h| h.is_empty()));
        assert_eq!(shared.current(), None);
        assert_eq!(shared.render.try_take(), None);
        assert_eq!(shared.log_handoff.try_take(), None);
    }

    #[test]
    fn test_overlay_suppresses_ring_render_and_log() {
        let shared = shared();
        shared.overlay_visible.store(true, Ordering::Release);
        let mut controller = HistoryController::new(&shared);
        controller.start();

        let m = measurement(19.0);
        assert!(!controller.on_sample(Ok(m)));

        assert!(shared.with_history(|h| h.is_empty()));
        assert_eq!(shared.render.try_take(), None);
        assert_eq!(shared.log_handoff.try_take(), None);
        // The header still sees the fresh reading.
        assert_eq!(shared.current(), Some(m));
    }

    #[test]
    fn test_header_tick_never_mutates_ring() {
        let shared = shared();
        let mut controller = HistoryController::new(&shared);
        controller.start();

        let m = measurement(21.0);
        controller.on_header(Ok(m));

        assert!(shared.with_history(|h| h.is_empty()));
        assert_eq!(shared.current(), Some(m));
        assert_eq!(shared.render.try_take(), Some(()));
        assert_eq!(shared.log_handoff.try_take(), None);
    }

    #[test]
    fn test_handoff_coalesces_to_latest() {
        let shared = shared();
        let mut controller = HistoryController::new(&shared);
        controller.start();

        controller.on_sample(Ok(measurement(20.0)));
        controller.on_sample(Ok(measurement(21.0)));

        // Both samples reached the ring, but only the newest is pending.
        assert_eq!(shared.with_history(|h| h.len()), 2);
        assert_eq!(
            shared.log_handoff.try_take(),
            Some(LogCommand::Record(measurement(21.0)))
        );
        assert_eq!(shared.log_handoff.try_take(), None);
    }

    #[test]
    fn test_lifecycle_state_machine() {
        let shared = shared();
        let mut controller = HistoryController::new(&shared);
        assert_eq!(controller.state(), RunState::Stopped);

        // Ticks before start are ignored.
        assert!(!controller.on_sample(Ok(measurement(20.0))));
        assert!(shared.with_history(|h| h.is_empty()));

        controller.start();
        assert_eq!(controller.state(), RunState::Running);
        assert!(shared.running.load(Ordering::Acquire));

        controller.begin_shutdown();
        assert_eq!(controller.state(), RunState::Stopping);
        assert!(!shared.running.load(Ordering::Acquire));
        assert_eq!(shared.log_handoff.try_take(), Some(LogCommand::Shutdown));

        // No ticks are processed once stopping has begun.
        assert!(!controller.on_sample(Ok(measurement(20.0))));
        controller.on_header(Ok(measurement(20.0)));
        assert!(shared.with_history(|h| h.is_empty()));
        assert_eq!(shared.current(), None);

        controller.finish_shutdown();
        assert_eq!(controller.state(), RunState::Stopped);
    }
}
