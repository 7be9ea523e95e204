//! Temperature history graph for the main screen.
//!
//! Renders the ring contents as a polyline scaled to the observed min/max,
//! with min/max legends on the y axis and three timestamps (oldest, middle,
//! newest) along the x axis.

use core::fmt::Write as _;

use embedded_graphics::mono_font::MonoTextStyle;
use embedded_graphics::mono_font::ascii::{FONT_4X6, FONT_6X10};
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{Line, PrimitiveStyle};
use embedded_graphics::text::Text;
use heapless::String;

use super::DISPLAY_HEIGHT_PX;
use crate::history::RingStore;
use crate::measurement::{DateTime, Measurement};

/// Observed temperature range of the samples currently held.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValueRange {
    pub min: f32,
    pub max: f32,
}

impl ValueRange {
    /// Min/max over an oldest-first iteration; `None` when there are no
    /// samples.
    pub fn of_temperatures<'a>(samples: impl Iterator<Item = &'a Measurement>) -> Option<Self> {
        let mut range: Option<ValueRange> = None;
        for m in samples {
            match &mut range {
                None => {
                    range = Some(ValueRange {
                        min: m.temperature,
                        max: m.temperature,
                    })
                }
                Some(r) => {
                    r.min = r.min.min(m.temperature);
                    r.max = r.max.max(m.temperature);
                }
            }
        }
        range
    }

    /// Vertical span used for scaling. A flat series would otherwise divide
    /// by zero; treat it as one unit so every point lands on the same row.
    pub fn span(&self) -> f32 {
        let span = self.max - self.min;
        if span == 0.0 { 1.0 } else { span }
    }
}

/// Graph geometry and rendering.
pub struct TemperatureGraph {
    left_padding: i32,
    bottom_padding: i32,
    width: i32,
    height: i32,
}

impl Default for TemperatureGraph {
    fn default() -> Self {
        // Legend text reserves one small-font row at the bottom and a narrow
        // margin on each side of the plot.
        let bottom_padding = 7;
        let left_padding = 8;
        Self {
            left_padding,
            bottom_padding,
            width: 128 - left_padding * 2,
            height: 43 - bottom_padding,
        }
    }
}

impl TemperatureGraph {
    /// Vertical pixel position for a temperature within `range`.
    pub fn y_position(&self, value: f32, range: &ValueRange) -> i32 {
        let scaled = (value - range.min) / range.span() * self.height as f32;
        DISPLAY_HEIGHT_PX as i32 - self.bottom_padding - scaled as i32
    }

    /// Render the history into `display`, or a placeholder when empty.
    pub fn draw<D>(
        &self,
        history: &RingStore<Measurement>,
        display: &mut D,
    ) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = BinaryColor>,
    {
        let Some(range) = ValueRange::of_temperatures(history.iter()) else {
            return self.draw_placeholder(display);
        };

        self.draw_polyline(history, &range, display)?;
        self.draw_y_legends(&range, display)?;
        self.draw_x_legends(history, display)
    }

    fn draw_polyline<D>(
        &self,
        history: &RingStore<Measurement>,
        range: &ValueRange,
        display: &mut D,
    ) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = BinaryColor>,
    {
        let len = history.len();
        let x_step = if len > 1 {
            self.width as f32 / (len - 1) as f32
        } else {
            0.0
        };
        let style = PrimitiveStyle::with_stroke(BinaryColor::On, 1);

        let mut prev: Option<Point> = None;
        for (i, m) in history.iter().enumerate() {
            let point = Point::new(
                (i as f32 * x_step) as i32 + self.left_padding,
                self.y_position(m.temperature, range),
            );
            if let Some(last) = prev {
                Line::new(last, point).into_styled(style).draw(display)?;
            }
            prev = Some(point);
        }
        Ok(())
    }

    fn draw_y_legends<D>(&self, range: &ValueRange, display: &mut D) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = BinaryColor>,
    {
        let style = MonoTextStyle::new(&FONT_4X6, BinaryColor::On);
        let mut label: String<8> = String::new();

        let _ = write!(label, "{:.1}", range.max);
        Text::new(&label, Point::new(0, 24), style).draw(display)?;

        label.clear();
        let _ = write!(label, "{:.1}", range.min);
        Text::new(&label, Point::new(0, 56), style).draw(display)?;
        Ok(())
    }

    fn draw_x_legends<D>(
        &self,
        history: &RingStore<Measurement>,
        display: &mut D,
    ) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = BinaryColor>,
    {
        let len = history.len();
        let stamps = [
            (20, history.peek_at(0)),
            (58, history.peek_at(len / 2)),
            (104, history.peek_at(len - 1)),
        ];
        let style = MonoTextStyle::new(&FONT_4X6, BinaryColor::On);

        for (x, stamp) in stamps {
            if let Ok(m) = stamp {
                let label = hhmm(&m.timestamp);
                Text::new(&label, Point::new(x, 63), style).draw(display)?;
            }
        }
        Ok(())
    }

    fn draw_placeholder<D>(&self, display: &mut D) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = BinaryColor>,
    {
        let style = MonoTextStyle::new(&FONT_6X10, BinaryColor::On);
        Text::new("No data yet", Point::new(34, 58), style).draw(display)?;
        Ok(())
    }
}

/// `HH:MM` legend text for a timestamp.
pub fn hhmm(ts: &DateTime) -> String<8> {
    let mut label = String::new();
    let _ = write!(label, "{:02}:{:02}", ts.hour, ts.minute);
    label
}

#[cfg(test)]
mod tests {
    use embedded_graphics::mock_display::MockDisplay;

    use super::*;
    use crate::measurement::DateTime;

    fn sample(temperature: f32, unix: u64) -> Measurement {
        Measurement {
            temperature,
            humidity: 50.0,
            timestamp: DateTime::from_unix(unix),
        }
    }

    fn history_of(temps: &[f32]) -> RingStore<Measurement> {
        let mut history = RingStore::new(8).unwrap();
        for (i, &t) in temps.iter().enumerate() {
            history.put(sample(t, 1_000_000_000 + i as u64 * 60));
        }
        history
    }

    fn mock_display() -> MockDisplay<BinaryColor> {
        let mut display = MockDisplay::new();
        // The 128x64 layout exceeds MockDisplay's 64x64 grid, and legend
        // text may overlap the polyline.
        display.set_allow_out_of_bounds_drawing(true);
        display.set_allow_overdraw(true);
        display
    }

    #[test]
    fn test_range_of_samples() {
        let history = history_of(&[21.0, 19.5, 23.0]);
        let range = ValueRange::of_temperatures(history.iter()).unwrap();
        assert_eq!(range, ValueRange { min: 19.5, max: 23.0 });
    }

    #[test]
    fn test_range_empty_is_none() {
        let history = history_of(&[]);
        assert!(ValueRange::of_temperatures(history.iter()).is_none());
    }

    #[test]
    fn test_flat_series_does_not_divide_by_zero() {
        let graph = TemperatureGraph::default();
        let range = ValueRange {
            min: 22.0,
            max: 22.0,
        };
        assert_eq!(range.span(), 1.0);

        // All equal-valued samples render at the same vertical position.
        let y = graph.y_position(22.0, &range);
        assert_eq!(graph.y_position(22.0, &range), y);
        assert!(y >= 0 && y < DISPLAY_HEIGHT_PX as i32);
    }

    #[test]
    fn test_scaling_spans_plot_height() {
        let graph = TemperatureGraph::default();
        let range = ValueRange {
            min: 10.0,
            max: 30.0,
        };
        let bottom = graph.y_position(10.0, &range);
        let top = graph.y_position(30.0, &range);
        assert!(top < bottom);
        assert_eq!(bottom - top, graph.height);
    }

    #[test]
    fn test_draw_flat_history_smoke() {
        let graph = TemperatureGraph::default();
        let history = history_of(&[22.0, 22.0, 22.0]);
        let mut display = mock_display();
        graph.draw(&history, &mut display).unwrap();
    }

    #[test]
    fn test_draw_empty_history_renders_placeholder() {
        let graph = TemperatureGraph::default();
        let history = history_of(&[]);
        let mut display = mock_display();
        graph.draw(&history, &mut display).unwrap();
        // Placeholder text puts at least one pixel on screen.
        assert!(display.affected_area().size.width > 0);
    }

    #[test]
    fn test_single_sample_draws_no_line() {
        let graph = TemperatureGraph::default();
        let history = history_of(&[22.0]);
        let mut display = mock_display();
        graph.draw(&history, &mut display).unwrap();
    }

    #[test]
    fn test_hhmm_format() {
        let ts = DateTime {
            year: 2024,
            month: 1,
            day: 1,
            hour: 7,
            minute: 3,
            second: 59,
        };
        assert_eq!(hhmm(&ts).as_str(), "07:03");
    }
}
