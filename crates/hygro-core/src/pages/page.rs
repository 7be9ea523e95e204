//! Core page abstraction for the two-screen UI.
//!
//! A page maps input gestures to control [`Action`]s and renders itself to
//! any monochrome [`DrawTarget`]. Pages track their own dirty flag; the
//! [`PageManager`](super::page_manager::PageManager) decides when to draw.

use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;

use crate::controller::AppShared;
use crate::ui::{Action, InputEvent};

/// Unique identifier used for navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageId {
    Info,
    Main,
}

/// Contract every screen implements.
pub trait Page {
    fn id(&self) -> PageId;

    /// Map an input gesture to an optional control action. Unrecognized
    /// input returns `None` and is ignored.
    fn handle_input(&mut self, event: InputEvent) -> Option<Action>;

    /// Render the entire page. Shared state is read-locked per access; the
    /// page never mutates it.
    fn draw_page<D: DrawTarget<Color = BinaryColor>>(
        &mut self,
        shared: &AppShared,
        display: &mut D,
    ) -> Result<(), D::Error>;

    fn is_dirty(&self) -> bool;

    fn mark_clean(&mut self);

    fn mark_dirty(&mut self);
}
