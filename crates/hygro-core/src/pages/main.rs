//! Main screen: current readouts, clock, and the temperature history graph.

use core::fmt::Write as _;

use embedded_graphics::mono_font::MonoTextStyle;
use embedded_graphics::mono_font::ascii::FONT_6X10;
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::text::Text;
use heapless::String;

use super::page::{Page, PageId};
use crate::controller::AppShared;
use crate::measurement::Measurement;
use crate::ui::graph::{TemperatureGraph, hhmm};
use crate::ui::{Action, Button, DISPLAY_WIDTH_PX, InputEvent};

pub struct MainPage {
    graph: TemperatureGraph,
    dirty: bool,
}

impl MainPage {
    pub fn new() -> Self {
        Self {
            graph: TemperatureGraph::default(),
            dirty: true,
        }
    }

    fn draw_header<D: DrawTarget<Color = BinaryColor>>(
        &self,
        current: &Measurement,
        display: &mut D,
    ) -> Result<(), D::Error> {
        let style = MonoTextStyle::new(&FONT_6X10, BinaryColor::On);

        let mut readout: String<16> = String::new();
        let _ = write!(readout, "{:.1}C", current.temperature);
        Text::new(&readout, Point::new(2, 12), style).draw(display)?;

        readout.clear();
        let _ = write!(readout, "{:.0}%", current.humidity);
        Text::new(&readout, Point::new(54, 12), style).draw(display)?;

        // Clock, right-aligned: five 6px glyphs.
        let clock = hhmm(&current.timestamp);
        Text::new(&clock, Point::new(DISPLAY_WIDTH_PX as i32 - 6 * 5, 8), style).draw(display)?;

        Ok(())
    }
}

impl Default for MainPage {
    fn default() -> Self {
        Self::new()
    }
}

impl Page for MainPage {
    fn id(&self) -> PageId {
        PageId::Main
    }

    fn handle_input(&mut self, event: InputEvent) -> Option<Action> {
        match event {
            InputEvent::LongPress(Button::Back) => Some(Action::Exit),
            _ => None,
        }
    }

    fn draw_page<D: DrawTarget<Color = BinaryColor>>(
        &mut self,
        shared: &AppShared,
        display: &mut D,
    ) -> Result<(), D::Error> {
        if let Some(current) = shared.current() {
            self.draw_header(&current, display)?;
        }
        shared.with_history(|history| self.graph.draw(history, display))
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
