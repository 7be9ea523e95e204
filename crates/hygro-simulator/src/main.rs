//! Desktop simulator for the hygro-rs temperature/humidity logger UI.
//!
//! Renders hygro-core pages in an SDL2 window via `embedded-graphics-simulator`.
//! Generates synthetic sensor data so pages can be exercised without hardware,
//! and writes the CSV log to the current directory.
//!
//! # Key bindings
//!
//! | Key           | Action                    |
//! |---------------|---------------------------|
//! | Return, Space | Short press OK            |
//! | Backspace     | Short press BACK          |
//! | Q, Escape     | Long press BACK (exit)    |

use std::fs::{File, OpenOptions};
use std::future::Future;
use std::io::{self, Write as _};
use std::pin::pin;
use std::task::{Context, Poll, Waker};
use std::thread;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics_simulator::{
    BinaryColorTheme, OutputSettingsBuilder, SimulatorDisplay, SimulatorEvent, Window,
    sdl2::Keycode,
};
use log::{error, info};

use hygro_core::config::Config;
use hygro_core::controller::{AppShared, HistoryController};
use hygro_core::history::RingStore;
use hygro_core::measurement::{DateTime, Measurement};
use hygro_core::pages::PageManager;
use hygro_core::persistence::{LOG_HEADER, LogSink, log_file_name, run_logger};
use hygro_core::sensors::{SensorError, WallClock};
use hygro_core::ui::{Action, Button, DISPLAY_HEIGHT_PX, DISPLAY_WIDTH_PX, InputEvent};

/// Pixel scale factor for the simulator window.
const WINDOW_SCALE: u32 = 4;

/// Target frame duration (~30 FPS).
const FRAME_DURATION: Duration = Duration::from_millis(33);

/// Every Nth synthetic read fails, to exercise the skip-a-tick path.
const FAULT_EVERY: u32 = 30;

// ---------------------------------------------------------------------------
// Synthetic hardware
// ---------------------------------------------------------------------------

/// Host wall clock mapped onto the display/log timestamp type.
#[derive(Clone, Copy)]
struct SystemClock;

impl WallClock for SystemClock {
    fn now(&self) -> DateTime {
        let secs = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs();
        DateTime::from_unix(secs)
    }
}

/// Generates slowly varying temperature/humidity readings, with an injected
/// fault every [`FAULT_EVERY`] reads.
struct SyntheticSensor {
    started: Instant,
    reads: u32,
}

impl SyntheticSensor {
    fn new() -> Self {
        Self {
            started: Instant::now(),
            reads: 0,
        }
    }

    fn read(&mut self) -> Result<Measurement, SensorError> {
        self.reads += 1;
        if self.reads % FAULT_EVERY == 0 {
            return Err(SensorError::ReadFailed {
                sensor: "SHT30",
                operation: "measure",
                details: "injected fault",
            });
        }

        let t = self.started.elapsed().as_secs_f64();

        // Temperature: 20-26 C sinusoidal with slow drift
        let temperature = 23.0 + 3.0 * (t / 120.0).sin() + 0.5 * (t / 37.0).cos();

        // Humidity: 40-60 % with a different period
        let humidity = 50.0 + 10.0 * (t / 180.0).sin() + 2.0 * (t / 23.0).cos();

        Ok(Measurement {
            temperature: temperature as f32,
            humidity: humidity as f32,
            timestamp: SystemClock.now(),
        })
    }
}

/// CSV log file in the current directory, named like the on-device log.
struct FileLog {
    file: File,
}

impl FileLog {
    fn create(start: &DateTime) -> io::Result<Self> {
        let name = log_file_name(start);
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(name.as_str())?;
        file.write_all(LOG_HEADER.as_bytes())?;
        info!("logging to ./{}", name);
        Ok(Self { file })
    }
}

impl LogSink for FileLog {
    type Error = io::Error;

    fn append(&mut self, line: &str) -> Result<(), Self::Error> {
        self.file.write_all(line.as_bytes())
    }
}

// ---------------------------------------------------------------------------
// Persistence worker thread
// ---------------------------------------------------------------------------

/// Drive a future to completion by polling. The worker future only makes
/// progress in response to signals raised by the main thread, so a short
/// sleep between polls is enough.
fn block_on<F: Future>(fut: F) -> F::Output {
    let mut fut = pin!(fut);
    let mut cx = Context::from_waker(Waker::noop());
    loop {
        if let Poll::Ready(out) = fut.as_mut().poll(&mut cx) {
            return out;
        }
        thread::sleep(Duration::from_millis(10));
    }
}

// ---------------------------------------------------------------------------
// Input mapping
// ---------------------------------------------------------------------------

fn keycode_to_event(keycode: Keycode) -> Option<InputEvent> {
    match keycode {
        Keycode::Return | Keycode::Space => Some(InputEvent::ShortPress(Button::Ok)),
        Keycode::Backspace => Some(InputEvent::ShortPress(Button::Back)),
        Keycode::Q | Keycode::Escape => Some(InputEvent::LongPress(Button::Back)),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

fn main() {
    env_logger::init();
    info!("Starting hygro-rs simulator");
    info!(
        "Display: {}x{} (scale {}x)",
        DISPLAY_WIDTH_PX, DISPLAY_HEIGHT_PX, WINDOW_SCALE
    );
    info!("Keys: Return/Space=OK  Backspace=BACK  Q/Esc=long BACK (exit)");

    let config = Config::default();

    let ring = match RingStore::new(config.history_capacity) {
        Ok(ring) => ring,
        Err(e) => {
            error!("failed to allocate history ring: {e}");
            return;
        }
    };
    // The persistence thread needs a 'static borrow; the simulator runs one
    // session per process, so leaking the shared state is fine.
    let shared: &'static AppShared = Box::leak(Box::new(AppShared::new(ring)));

    let mut sensor = SyntheticSensor::new();
    let mut controller = HistoryController::new(shared);
    let mut pages = PageManager::new();

    let worker = match FileLog::create(&SystemClock.now()) {
        Ok(mut sink) => Some(thread::spawn(move || {
            block_on(run_logger(shared, &mut sink));
        })),
        Err(e) => {
            error!("could not open log file, persistence disabled: {e}");
            None
        }
    };

    // SDL2 display and window
    let mut display = SimulatorDisplay::<BinaryColor>::new(Size::new(
        DISPLAY_WIDTH_PX,
        DISPLAY_HEIGHT_PX,
    ));
    let output_settings = OutputSettingsBuilder::new()
        .theme(BinaryColorTheme::OledBlue)
        .scale(WINDOW_SCALE)
        .build();
    let mut window = Window::new("Hygro Simulator", &output_settings);

    controller.start();
    controller.on_sample(sensor.read());

    // The SDL window is lazily initialized on the first `update()` call.
    // We must call `update()` once before `events()` or it will panic.
    let _ = pages.draw(shared, &mut display);
    window.update(&display);

    let sample_interval = Duration::from_secs(config.sample_interval_secs.into());
    let header_interval = Duration::from_secs(config.header_interval_secs.into());
    let mut last_sample = Instant::now();
    let mut last_header = Instant::now();

    'running: loop {
        let frame_start = Instant::now();

        for event in window.events() {
            match event {
                SimulatorEvent::Quit => break 'running,

                SimulatorEvent::KeyDown { keycode, .. } => {
                    if let Some(input) = keycode_to_event(keycode) {
                        if pages.handle_input(shared, input) == Some(Action::Exit) {
                            break 'running;
                        }
                    }
                }

                _ => {}
            }
        }

        if last_sample.elapsed() >= sample_interval {
            controller.on_sample(sensor.read());
            last_sample = Instant::now();
        }
        if last_header.elapsed() >= header_interval {
            controller.on_header(sensor.read());
            last_header = Instant::now();
        }

        if shared.render.try_take().is_some() || pages.is_dirty() {
            let _ = pages.draw(shared, &mut display);
        }
        window.update(&display);

        let elapsed = frame_start.elapsed();
        if elapsed < FRAME_DURATION {
            thread::sleep(FRAME_DURATION - elapsed);
        }
    }

    // Orderly shutdown: stop accepting ticks, wake the worker, join it.
    controller.begin_shutdown();
    if let Some(worker) = worker {
        if worker.join().is_err() {
            error!("persistence worker panicked");
        }
    }
    controller.finish_shutdown();

    info!("Simulator exiting");
}
