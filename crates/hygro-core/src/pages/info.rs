//! Info/splash screen shown at startup.

use embedded_graphics::mono_font::MonoTextStyle;
use embedded_graphics::mono_font::ascii::{FONT_4X6, FONT_6X10};
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;
use embedded_graphics::text::Text;
use embedded_layout::prelude::*;

use super::page::{Page, PageId};
use crate::controller::AppShared;
use crate::ui::{Action, Button, DISPLAY_HEIGHT_PX, DISPLAY_WIDTH_PX, InputEvent};

pub struct InfoPage {
    dirty: bool,
}

impl InfoPage {
    pub fn new() -> Self {
        Self { dirty: true }
    }
}

impl Default for InfoPage {
    fn default() -> Self {
        Self::new()
    }
}

impl Page for InfoPage {
    fn id(&self) -> PageId {
        PageId::Info
    }

    fn handle_input(&mut self, event: InputEvent) -> Option<Action> {
        match event {
            InputEvent::ShortPress(Button::Ok) => Some(Action::DismissInfo),
            InputEvent::LongPress(Button::Back) => Some(Action::Exit),
            _ => None,
        }
    }

    fn draw_page<D: DrawTarget<Color = BinaryColor>>(
        &mut self,
        _shared: &AppShared,
        display: &mut D,
    ) -> Result<(), D::Error> {
        let screen = Rectangle::new(
            Point::zero(),
            Size::new(DISPLAY_WIDTH_PX, DISPLAY_HEIGHT_PX),
        );
        let title_style = MonoTextStyle::new(&FONT_6X10, BinaryColor::On);
        let small_style = MonoTextStyle::new(&FONT_4X6, BinaryColor::On);

        Text::new("hygro-rs", Point::new(0, 12), title_style)
            .align_to(&screen, horizontal::Center, vertical::NoAlignment)
            .draw(display)?;

        Text::new("Each run appends to a", Point::new(0, 24), small_style).draw(display)?;
        Text::new("new CSV log file", Point::new(0, 31), small_style).draw(display)?;
        Text::new("Long press BACK to exit", Point::new(0, 41), small_style).draw(display)?;

        Text::new("Press OK to continue", Point::new(4, 60), title_style).draw(display)?;

        Ok(())
    }

    fn is_dirty(&self) -> bool {
        self.dirty
    }

    fn mark_clean(&mut self) {
        self.dirty = false;
    }

    fn mark_dirty(&mut self) {
        self.dirty = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confirm_dismisses_info() {
        let mut page = InfoPage::new();
        assert_eq!(
            page.handle_input(InputEvent::ShortPress(Button::Ok)),
            Some(Action::DismissInfo)
        );
    }

    #[test]
    fn test_long_back_exits() {
        let mut page = InfoPage::new();
        assert_eq!(
            page.handle_input(InputEvent::LongPress(Button::Back)),
            Some(Action::Exit)
        );
    }

    #[test]
    fn test_other_input_ignored() {
        let mut page = InfoPage::new();
        assert_eq!(page.handle_input(InputEvent::LongPress(Button::Ok)), None);
        assert_eq!(page.handle_input(InputEvent::ShortPress(Button::Back)), None);
    }
}
