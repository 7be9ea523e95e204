//! Display geometry and the input surface.

pub mod graph;

/// Width of the monochrome panel in pixels.
pub const DISPLAY_WIDTH_PX: u32 = 128;

/// Height of the monochrome panel in pixels.
pub const DISPLAY_HEIGHT_PX: u32 = 64;

/// Default history capacity: one sample per graph row, with the bottom rows
/// reserved for the x-axis legend text.
pub const HISTORY_CAPACITY: usize = (DISPLAY_HEIGHT_PX - 8) as usize;

/// Physical buttons recognized by the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    Ok,
    Back,
}

/// The two recognized gestures. Everything else the input layer produces is
/// ignored by the pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    ShortPress(Button),
    LongPress(Button),
}

/// Control outcome a page returns for an input event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Dismiss the info screen and show the main screen.
    DismissInfo,
    /// Initiate application shutdown.
    Exit,
}
