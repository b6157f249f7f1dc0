//! Draw targets for the layout engine.
//!
//! A [DocumentSink] accepts positioned drawing commands in top-down page
//! coordinates (origin at the top-left corner, y growing towards the bottom of
//! the page) and eventually serialises them. [PdfSink] produces a PDF file;
//! [RecordingSink] only remembers what it was asked to draw.

mod pdf;
mod recording;

pub use pdf::*;
pub use recording::*;

use crate::colour::Colour;
use crate::layout::wrap_text;
use crate::units::Pt;
use crate::ReportError;
use std::path::Path;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum FontWeight {
    Regular,
    Bold,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct TextStyle {
    pub weight: FontWeight,
    pub size: Pt,
}

impl TextStyle {
    pub fn regular(size: Pt) -> TextStyle {
        TextStyle {
            weight: FontWeight::Regular,
            size,
        }
    }

    pub fn bold(size: Pt) -> TextStyle {
        TextStyle {
            weight: FontWeight::Bold,
            size,
        }
    }

    /// Distance between consecutive baselines of wrapped text
    pub fn line_height(&self) -> Pt {
        self.size * 1.25
    }
}

pub trait DocumentSink {
    /// Start a new page; subsequent drawing lands on it
    fn add_page(&mut self);

    fn set_position(&mut self, x: Pt, y: Pt);

    fn position(&self) -> (Pt, Pt);

    /// Width of `text` once drawn in `style`
    fn text_width(&self, text: &str, style: TextStyle) -> Pt;

    /// Draw a single line of text with its top-left corner at the current
    /// position, then move the position to the end of the text
    fn draw_text(&mut self, text: &str, style: TextStyle, colour: Colour);

    /// Draw text wrapped to `width`, starting at the current position. Leaves the
    /// position below the last line and returns the height consumed.
    fn draw_wrapped_text(&mut self, text: &str, width: Pt, style: TextStyle, colour: Colour) -> Pt {
        let (x, y) = self.position();
        let line_height = style.line_height();
        let lines = wrap_text(text, width, |piece| self.text_width(piece, style));

        for (i, line) in lines.iter().enumerate() {
            self.set_position(x, y + line_height * i as f32);
            if !line.is_empty() {
                self.draw_text(line, style, colour);
            }
        }

        let consumed = line_height * lines.len() as f32;
        self.set_position(x, y + consumed);
        consumed
    }

    /// Draw the image at `path` scaled into the given box, `(x, y)` being its
    /// top-left corner
    fn draw_image(&mut self, path: &Path, x: Pt, y: Pt, width: Pt, height: Pt) -> Result<(), ReportError>;

    fn draw_line(&mut self, from: (Pt, Pt), to: (Pt, Pt), colour: Colour);

    /// Serialise everything drawn so far to `path`
    fn finalize(&mut self, path: &Path) -> Result<(), ReportError>;
}
