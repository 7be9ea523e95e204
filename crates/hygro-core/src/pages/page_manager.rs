//! Routes input to the active page and keeps the overlay flag in sync.

use core::sync::atomic::Ordering;

use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;

use super::info::InfoPage;
use super::main::MainPage;
use super::page::{Page, PageId};
use crate::controller::AppShared;
use crate::ui::{Action, InputEvent};

/// Owns the two screens and the active-page state.
///
/// Activating the info page marks the sampling overlay state so the
/// controller suspends ring mutation while it is covered; see
/// [`AppShared::overlay_visible`].
pub struct PageManager {
    info: InfoPage,
    main: MainPage,
    active: PageId,
}

impl PageManager {
    /// Starts on the info screen, matching [`AppShared`]'s initial overlay
    /// state.
    pub fn new() -> Self {
        Self {
            info: InfoPage::new(),
            main: MainPage::new(),
            active: PageId::Info,
        }
    }

    pub fn active(&self) -> PageId {
        self.active
    }

    /// Route one gesture to the active page. A `DismissInfo` action also
    /// performs the navigation; `Exit` is returned for the caller's
    /// shutdown path.
    pub fn handle_input(&mut self, shared: &AppShared, event: InputEvent) -> Option<Action> {
        let action = match self.active {
            PageId::Info => self.info.handle_input(event),
            PageId::Main => self.main.handle_input(event),
        };
        if action == Some(Action::DismissInfo) {
            self.activate(PageId::Main, shared);
        }
        action
    }

    pub fn activate(&mut self, id: PageId, shared: &AppShared) {
        self.active = id;
        shared
            .overlay_visible
            .store(id == PageId::Info, Ordering::Release);
        match self.active {
            PageId::Info => self.info.mark_dirty(),
            PageId::Main => self.main.mark_dirty(),
        }
        shared.render.signal(());
    }

    pub fn is_dirty(&self) -> bool {
        match self.active {
            PageId::Info => self.info.is_dirty(),
            PageId::Main => self.main.is_dirty(),
        }
    }

    /// Clear and redraw the active page.
    pub fn draw<D: DrawTarget<Color = BinaryColor>>(
        &mut self,
        shared: &AppShared,
        display: &mut D,
    ) -> Result<(), D::Error> {
        display.clear(BinaryColor::Off)?;
        match self.active {
            PageId::Info => {
                self.info.draw_page(shared, display)?;
                self.info.mark_clean();
            }
            PageId::Main => {
                self.main.draw_page(shared, display)?;
                self.main.mark_clean();
            }
        }
        Ok(())
    }
}

impl Default for PageManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::RingStore;
    use crate::ui::Button;

    fn shared() -> AppShared {
        AppShared::new(RingStore::new(8).unwrap())
    }

    #[test]
    fn test_starts_on_info_with_overlay() {
        let shared = shared();
        let pages = PageManager::new();
        assert_eq!(pages.active(), PageId::Info);
        assert!(shared.overlay_visible.load(Ordering::Acquire));
    }

    #[test]
    fn test_confirm_navigates_to_main_and_clears_overlay() {
        let shared = shared();
        let mut pages = PageManager::new();

        let action = pages.handle_input(&shared, InputEvent::ShortPress(Button::Ok));
        assert_eq!(action, Some(Action::DismissInfo));
        assert_eq!(pages.active(), PageId::Main);
        assert!(!shared.overlay_visible.load(Ordering::Acquire));
        assert_eq!(shared.render.try_take(), Some(()));
    }

    #[test]
    fn test_long_back_exits_from_both_screens() {
        let shared = shared();
        let mut pages = PageManager::new();
        assert_eq!(
            pages.handle_input(&shared, InputEvent::LongPress(Button::Back)),
            Some(Action::Exit)
        );

        pages.activate(PageId::Main, &shared);
        assert_eq!(
            pages.handle_input(&shared, InputEvent::LongPress(Button::Back)),
            Some(Action::Exit)
        );
    }

    #[test]
    fn test_unrecognized_input_is_ignored() {
        let shared = shared();
        let mut pages = PageManager::new();
        assert_eq!(
            pages.handle_input(&shared, InputEvent::ShortPress(Button::Back)),
            None
        );
        assert_eq!(pages.active(), PageId::Info);
    }
}
