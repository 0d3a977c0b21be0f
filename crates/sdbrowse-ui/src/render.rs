//! Screen drawing.
//!
//! Everything is laid out for a 128x64 monochrome panel with the 6x10 ASCII
//! font: a one-line header, a separator, then `visible_rows` list rows.
//! Every `draw_*` call paints a complete frame and presents it.

use core::fmt::Write;

use embedded_graphics::{
    mono_font::{ascii::FONT_6X10, MonoTextStyle},
    pixelcolor::BinaryColor,
    prelude::*,
    primitives::{Line, PrimitiveStyle, Rectangle},
    text::{Alignment, Baseline, Text, TextStyleBuilder},
};
use heapless::String;

use crate::directory::{DirectoryModel, NAME_CAPACITY};
use crate::startup::{SplashStatus, StartupError};

/// A monochrome frame buffer that is pushed to the panel on `present`
pub trait Screen: DrawTarget<Color = BinaryColor> + OriginDimensions {
    /// Send the current frame to the panel
    fn present(&mut self) -> Result<(), Self::Error>;
}

/// Transient full-screen messages shown after Enter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    /// Enter on a file
    FileSelected,
    /// Enter on a directory that could not be loaded
    OpenFailed,
}

impl Notice {
    pub fn title(self) -> &'static str {
        match self {
            Notice::FileSelected => "Selected file:",
            Notice::OpenFailed => "Open failed:",
        }
    }
}

/// Draws browser screens
#[derive(Debug, Clone, Copy)]
pub struct Renderer {
    visible_rows: usize,
}

impl Renderer {
    pub const CHAR_WIDTH: u32 = 6;
    pub const ROW_HEIGHT: u32 = 10;
    /// Row 0 of the list starts here
    pub const LIST_TOP: i32 = 13;
    const SEPARATOR_Y: i32 = 11;
    const MARGIN_X: i32 = 2;

    pub fn new(visible_rows: usize) -> Self {
        Self {
            visible_rows: visible_rows.max(1),
        }
    }

    /// Number of whole list rows that fit on a panel `height` pixels tall
    pub const fn rows_fitting(height: u32) -> usize {
        (height.saturating_sub(Self::LIST_TOP as u32) / Self::ROW_HEIGHT) as usize
    }

    /// Top edge of list row `row` (0-based within the window)
    pub fn row_top(row: usize) -> i32 {
        Self::LIST_TOP + row as i32 * Self::ROW_HEIGHT as i32
    }

    /// Header, visible window and inverted selection bar
    pub fn draw_list<D: Screen>(
        &self,
        display: &mut D,
        model: &DirectoryModel,
    ) -> Result<(), D::Error> {
        let width = display.size().width;
        let columns = Self::columns(width);
        display.clear(BinaryColor::Off)?;

        // Header: path on the left, position on the right
        let mut position: String<12> = String::new();
        if model.entry_count() > 0 {
            let _ = write!(
                position,
                "{}/{}",
                model.selection_index() + 1,
                model.entry_count()
            );
        }
        let path_columns = columns.saturating_sub(position.len() + 1).max(1);
        draw_text(
            display,
            tail(model.current_path(), path_columns),
            Point::new(Self::MARGIN_X, 0),
            BinaryColor::On,
        )?;
        if !position.is_empty() {
            let x = width as i32 - Self::MARGIN_X - (position.len() as u32 * Self::CHAR_WIDTH) as i32;
            draw_text(display, &position, Point::new(x, 0), BinaryColor::On)?;
        }
        Line::new(
            Point::new(0, Self::SEPARATOR_Y),
            Point::new(width as i32 - 1, Self::SEPARATOR_Y),
        )
        .into_styled(PrimitiveStyle::with_stroke(BinaryColor::On, 1))
        .draw(display)?;

        if model.entry_count() == 0 {
            draw_text(
                display,
                "(empty)",
                Point::new(Self::MARGIN_X, Self::LIST_TOP),
                BinaryColor::On,
            )?;
            return display.present();
        }

        for (row, (index, entry)) in model.visible_entries().enumerate().take(self.visible_rows) {
            let top = Self::row_top(row);
            let selected = index == model.selection_index();

            let mut label: String<{ NAME_CAPACITY + 2 }> = String::new();
            let _ = if entry.is_directory() {
                write!(label, "[{}]", entry.name())
            } else {
                write!(label, "{}", entry.name())
            };

            let color = if selected {
                Rectangle::new(Point::new(0, top), Size::new(width, Self::ROW_HEIGHT))
                    .into_styled(PrimitiveStyle::with_fill(BinaryColor::On))
                    .draw(display)?;
                BinaryColor::Off
            } else {
                BinaryColor::On
            };
            draw_text(
                display,
                clip(&label, columns),
                Point::new(Self::MARGIN_X, top),
                color,
            )?;
        }

        display.present()
    }

    /// Bordered message naming the entry it is about
    pub fn draw_notice<D: Screen>(
        &self,
        display: &mut D,
        notice: Notice,
        name: &str,
    ) -> Result<(), D::Error> {
        let size = display.size();
        display.clear(BinaryColor::Off)?;
        Rectangle::new(Point::zero(), size)
            .into_styled(PrimitiveStyle::with_stroke(BinaryColor::On, 1))
            .draw(display)?;
        draw_centered(display, notice.title(), 14, BinaryColor::On)?;
        draw_centered(
            display,
            clip(name, Self::columns(size.width).saturating_sub(1)),
            32,
            BinaryColor::On,
        )?;
        display.present()
    }

    /// Startup frame: title, status line and a progress bar
    pub fn draw_splash<D: Screen>(
        &self,
        display: &mut D,
        status: SplashStatus,
        progress_permille: u32,
    ) -> Result<(), D::Error> {
        let width = display.size().width;
        display.clear(BinaryColor::Off)?;
        draw_centered(display, "SD BROWSER", 4, BinaryColor::On)?;
        draw_centered(display, status.label(), 22, BinaryColor::On)?;

        let bar = Rectangle::new(Point::new(8, 42), Size::new(width.saturating_sub(16), 10));
        bar.into_styled(PrimitiveStyle::with_stroke(BinaryColor::On, 1))
            .draw(display)?;
        let inner_width = bar.size.width.saturating_sub(4);
        let fill = inner_width * progress_permille.min(1000) / 1000;
        if fill > 0 {
            Rectangle::new(bar.top_left + Point::new(2, 2), Size::new(fill, 6))
                .into_styled(PrimitiveStyle::with_fill(BinaryColor::On))
                .draw(display)?;
        }
        display.present()
    }

    /// Terminal screen after startup verification failed
    pub fn draw_fatal<D: Screen>(
        &self,
        display: &mut D,
        error: &StartupError,
    ) -> Result<(), D::Error> {
        let width = display.size().width;
        display.clear(BinaryColor::Off)?;
        Rectangle::new(Point::zero(), Size::new(width, 12))
            .into_styled(PrimitiveStyle::with_fill(BinaryColor::On))
            .draw(display)?;
        draw_centered(display, "STORAGE ERROR", 1, BinaryColor::Off)?;
        draw_centered(display, error.summary(), 20, BinaryColor::On)?;
        draw_centered(display, "Check the card", 36, BinaryColor::On)?;
        draw_centered(display, "and restart", 48, BinaryColor::On)?;
        display.present()
    }

    fn columns(width: u32) -> usize {
        (width.saturating_sub(Self::MARGIN_X as u32 * 2) / Self::CHAR_WIDTH) as usize
    }
}

fn draw_text<D: DrawTarget<Color = BinaryColor>>(
    display: &mut D,
    text: &str,
    position: Point,
    color: BinaryColor,
) -> Result<(), D::Error> {
    let style = MonoTextStyle::new(&FONT_6X10, color);
    Text::with_baseline(text, position, style, Baseline::Top).draw(display)?;
    Ok(())
}

fn draw_centered<D: DrawTarget<Color = BinaryColor> + OriginDimensions>(
    display: &mut D,
    text: &str,
    y: i32,
    color: BinaryColor,
) -> Result<(), D::Error> {
    let center = display.size().width as i32 / 2;
    let style = MonoTextStyle::new(&FONT_6X10, color);
    let text_style = TextStyleBuilder::new()
        .alignment(Alignment::Center)
        .baseline(Baseline::Top)
        .build();
    Text::with_text_style(text, Point::new(center, y), style, text_style).draw(display)?;
    Ok(())
}

/// First `max_chars` characters of `text`
fn clip(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((i, _)) => &text[..i],
        None => text,
    }
}

/// Last `max_chars` characters of `text`
fn tail(text: &str, max_chars: usize) -> &str {
    let count = text.chars().count();
    if count <= max_chars {
        return text;
    }
    match text.char_indices().nth(count - max_chars) {
        Some((i, _)) => &text[i..],
        None => "",
    }
}
