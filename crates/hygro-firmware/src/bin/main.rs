#![no_std]
#![no_main]
#![deny(
    clippy::mem_forget,
    reason = "mem::forget is generally not safe to do with esp_hal types, especially those \
    holding buffers for the duration of a data transfer."
)]
#![deny(clippy::large_stack_frames)]

use core::cell::RefCell;

use critical_section::Mutex;
use embassy_executor::Spawner;
use embassy_futures::select::{Either4, select4};
use embassy_sync::channel::Channel;
use embassy_time::{Delay, Duration, Ticker, Timer};
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_hal_bus::spi::CriticalSectionDevice;
use embedded_sdmmc::SdCard;
use esp_hal::Blocking;
use esp_hal::clock::CpuClock;
use esp_hal::gpio::{Input, InputConfig, Level, Output, OutputConfig, Pull};
use esp_hal::i2c::master::{Config as I2cConfig, I2c};
use esp_hal::spi::master::{Config as SpiConfig, Spi};
use esp_hal::timer::timg::TimerGroup;
use log::{error, info, warn};
use static_cell::StaticCell;

use display_interface_spi::SPIInterface;
use ssd1306::Ssd1306;
use ssd1306::prelude::*;

use hygro_core::config::Config;
use hygro_core::controller::{AppShared, HistoryController};
use hygro_core::history::RingStore;
use hygro_core::pages::PageManager;
use hygro_core::persistence::run_logger;
use hygro_core::sensors::{Sensor, Sht30, WallClock};
use hygro_core::ui::{Action, Button};

use hygro_firmware::clock::{CLOCK_BASE, ClockTimeSource, UptimeClock};
use hygro_firmware::input::{InputChannel, watch_button};
use hygro_firmware::storage::SdCardLog;

#[panic_handler]
fn panic(info: &core::panic::PanicInfo) -> ! {
    rtt_target::rprintln!("PANIC: {}", info);
    loop {}
}

extern crate alloc;

// This creates a default app-descriptor required by the esp-idf bootloader.
// For more information see: <https://docs.espressif.com/projects/esp-idf/en/stable/esp32/api-reference/system/app_image_format.html#application-description>
esp_bootloader_esp_idf::esp_app_desc!();

type SharedSpiBus = Mutex<RefCell<Spi<'static, Blocking>>>;
type SpiBusDevice = CriticalSectionDevice<'static, Spi<'static, Blocking>, Output<'static>, Delay>;
type SdLog = SdCardLog<SpiBusDevice, Delay, ClockTimeSource>;

#[embassy_executor::task]
async fn persistence_task(shared: &'static AppShared, mut sink: SdLog) {
    run_logger(shared, &mut sink).await;
}

#[allow(
    clippy::large_stack_frames,
    reason = "it's not unusual to allocate larger buffers etc. in main"
)]
#[esp_rtos::main]
async fn main(spawner: Spawner) -> ! {
    rtt_target::rtt_init_log!();

    let config = esp_hal::Config::default().with_cpu_clock(CpuClock::max());
    let peripherals = esp_hal::init(config);

    esp_alloc::heap_allocator!(size: 65536);

    let timg0 = TimerGroup::new(peripherals.TIMG0);
    esp_rtos::start(timg0.timer0);

    info!("Embassy initialized");

    let app_config = Config::default();
    let clock = UptimeClock::new(CLOCK_BASE);

    let ring = RingStore::new(app_config.history_capacity).expect("history ring allocation");
    static SHARED: StaticCell<AppShared> = StaticCell::new();
    let shared: &'static AppShared = SHARED.init(AppShared::new(ring));

    // SPI bus shared between the OLED and the SD card, each behind its own
    // chip-select device.
    let spi = Spi::new(peripherals.SPI2, SpiConfig::default())
        .expect("SPI init")
        .with_sck(peripherals.GPIO36)
        .with_mosi(peripherals.GPIO37)
        .with_miso(peripherals.GPIO35);
    static SPI_BUS: StaticCell<SharedSpiBus> = StaticCell::new();
    let spi_bus = SPI_BUS.init(Mutex::new(RefCell::new(spi)));

    let display_cs = Output::new(peripherals.GPIO33, Level::High, OutputConfig::default());
    let sd_cs = Output::new(peripherals.GPIO21, Level::High, OutputConfig::default());
    let dc = Output::new(peripherals.GPIO34, Level::Low, OutputConfig::default());
    let mut rst = Output::new(peripherals.GPIO38, Level::High, OutputConfig::default());

    let display_device =
        CriticalSectionDevice::new(spi_bus, display_cs, Delay).expect("display SPI device");
    let sd_device = CriticalSectionDevice::new(spi_bus, sd_cs, Delay).expect("SD SPI device");

    let di = SPIInterface::new(display_device, dc);
    let mut display = Ssd1306::new(di, DisplaySize128x64, DisplayRotation::Rotate0)
        .into_buffered_graphics_mode();
    let mut delay = Delay;
    display.reset(&mut rst, &mut delay).expect("display reset");
    display.init().expect("display init");

    info!("Display initialized");

    // A missing or unreadable card is not fatal: the graph still runs, only
    // persistence is disabled for this power cycle.
    let sd_card = SdCard::new(sd_device, Delay);
    let started_at = clock.now();
    let sink = match SdCardLog::new(sd_card, ClockTimeSource(clock), &started_at) {
        Ok(sink) => {
            info!("logging to SD:/{}", sink.file_name());
            Some(sink)
        }
        Err(e) => {
            warn!("could not open log file, persistence disabled: {e:?}");
            None
        }
    };

    let i2c = I2c::new(peripherals.I2C0, I2cConfig::default())
        .expect("I2C init")
        .with_sda(peripherals.GPIO8)
        .with_scl(peripherals.GPIO9)
        .into_async();
    let mut sensor = Sht30::new(i2c, Delay, clock);

    static INPUT_EVENTS: InputChannel = Channel::new();
    let ok_button = Input::new(
        peripherals.GPIO0,
        InputConfig::default().with_pull(Pull::Up),
    );
    let back_button = Input::new(
        peripherals.GPIO1,
        InputConfig::default().with_pull(Pull::Up),
    );
    spawner
        .spawn(watch_button(ok_button, Button::Ok, &INPUT_EVENTS))
        .expect("spawn OK button watcher");
    spawner
        .spawn(watch_button(back_button, Button::Back, &INPUT_EVENTS))
        .expect("spawn BACK button watcher");

    let worker_running = if let Some(sink) = sink {
        spawner
            .spawn(persistence_task(shared, sink))
            .expect("spawn persistence worker");
        true
    } else {
        false
    };

    let mut controller = HistoryController::new(shared);
    let mut pages = PageManager::new();
    controller.start();

    // Prime the header readouts before the first timer tick.
    controller.on_sample(sensor.read().await);

    let _ = pages.draw(shared, &mut display);
    if let Err(e) = display.flush() {
        error!("display flush failed: {e:?}");
    }

    let mut sample_tick = Ticker::every(Duration::from_secs(app_config.sample_interval_secs.into()));
    let mut header_tick = Ticker::every(Duration::from_secs(app_config.header_interval_secs.into()));

    loop {
        match select4(
            sample_tick.next(),
            header_tick.next(),
            INPUT_EVENTS.receive(),
            shared.render.wait(),
        )
        .await
        {
            Either4::First(()) => {
                controller.on_sample(sensor.read().await);
            }
            Either4::Second(()) => {
                controller.on_header(sensor.read().await);
            }
            Either4::Third(event) => {
                if pages.handle_input(shared, event) == Some(Action::Exit) {
                    break;
                }
            }
            Either4::Fourth(()) => {
                let _ = pages.draw(shared, &mut display);
                if let Err(e) = display.flush() {
                    error!("display flush failed: {e:?}");
                }
            }
        }
    }

    // Tick sources stop here; then wake the worker so it drains and exits
    // before anything on the shared bus is released.
    drop(sample_tick);
    drop(header_tick);
    controller.begin_shutdown();
    if worker_running {
        shared.worker_done.wait().await;
    }
    controller.finish_shutdown();
    info!("stopped");

    let _ = display.clear(BinaryColor::Off);
    let _ = display.flush();

    loop {
        Timer::after(Duration::from_secs(60)).await;
    }
}
