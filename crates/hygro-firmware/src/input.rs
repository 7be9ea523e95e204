//! Button watcher tasks.
//!
//! Each physical button gets its own task that turns pin edges into
//! [`InputEvent`]s on a shared channel. Buttons are active-low with the
//! internal pull-up enabled.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use embassy_time::{Duration, Instant, Timer};
use esp_hal::gpio::Input;
use hygro_core::ui::{Button, InputEvent};

/// Gestures queued faster than the main loop drains them are dropped.
pub type InputChannel = Channel<CriticalSectionRawMutex, InputEvent, 8>;

/// Hold duration that turns a press into a long press.
const LONG_PRESS: Duration = Duration::from_millis(500);
/// Contact settle time after the falling edge.
const DEBOUNCE: Duration = Duration::from_millis(20);

#[embassy_executor::task(pool_size = 2)]
pub async fn watch_button(
    mut pin: Input<'static>,
    button: Button,
    events: &'static InputChannel,
) {
    loop {
        pin.wait_for_falling_edge().await;
        let pressed = Instant::now();
        Timer::after(DEBOUNCE).await;
        pin.wait_for_rising_edge().await;

        let event = if pressed.elapsed() >= LONG_PRESS {
            InputEvent::LongPress(button)
        } else {
            InputEvent::ShortPress(button)
        };

        // Never stall the edge watcher on a full queue.
        if events.try_send(event).is_err() {
            log::warn!("input queue full, dropping {event:?}");
        }
    }
}
