use super::{DocumentSink, FontWeight, TextStyle};
use crate::colour::Colour;
use crate::document::Document;
use crate::font::{Font, StandardFont};
use crate::image::Image;
use crate::info::Info;
use crate::page::{ImageLayout, LineLayout, Page, SpanFont, SpanLayout};
use crate::pagesize::PageSize;
use crate::rect::Rect;
use crate::units::Pt;
use crate::ReportError;
use id_arena::Id;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

const RULE_WIDTH: Pt = Pt(0.5);

/// Accumulates pages into a [Document] and writes it out as a PDF.
///
/// Positions are taken top-down and flipped into PDF's bottom-up space here.
pub struct PdfSink {
    document: Document,
    page_size: PageSize,
    position: (Pt, Pt),
    regular: Id<Font>,
    bold: Id<Font>,
    /// `None` remembers an image that failed to load
    images: HashMap<PathBuf, Option<Id<Image>>>,
}

fn load_font(path: Option<&Path>, fallback: StandardFont) -> Font {
    let Some(path) = path else {
        return Font::standard(fallback);
    };
    match Font::load_from_disk(path) {
        Ok(font) => font,
        Err(err) => {
            warn!(path = %path.display(), error = %err, ?fallback, "failed to load font, using built-in fallback");
            Font::standard(fallback)
        }
    }
}

impl PdfSink {
    /// Create a sink producing pages of `page_size`. Fonts that are not given or
    /// cannot be loaded fall back to Helvetica.
    pub fn new(page_size: PageSize, info: Info, regular: Option<&Path>, bold: Option<&Path>) -> PdfSink {
        let mut document = Document::default();
        document.set_info(info);
        let regular = document.add_font(load_font(regular, StandardFont::Helvetica));
        let bold = document.add_font(load_font(bold, StandardFont::HelveticaBold));

        PdfSink {
            document,
            page_size,
            position: (Pt(0.0), Pt(0.0)),
            regular,
            bold,
            images: HashMap::new(),
        }
    }

    pub fn page_count(&self) -> usize {
        self.document.pages.len()
    }

    fn font_id(&self, weight: FontWeight) -> Id<Font> {
        match weight {
            FontWeight::Regular => self.regular,
            FontWeight::Bold => self.bold,
        }
    }

    fn page_mut(&mut self) -> &mut Page {
        if self.document.pages.is_empty() {
            debug!("drawing before the first page, starting one");
            self.document.add_page(Page::new(self.page_size));
        }
        let last = self.document.pages.len() - 1;
        &mut self.document.pages[last]
    }

    fn flip(&self, point: (Pt, Pt)) -> (Pt, Pt) {
        (point.0, self.page_size.1 - point.1)
    }

    fn image_id(&mut self, path: &Path) -> Result<Id<Image>, ReportError> {
        match self.images.get(path) {
            Some(Some(id)) => return Ok(*id),
            Some(None) => return Err(ReportError::ImageUnavailable(path.to_path_buf())),
            None => {}
        }

        match Image::load_from_disk(path) {
            Ok(image) => {
                let id = self.document.add_image(image);
                self.images.insert(path.to_path_buf(), Some(id));
                Ok(id)
            }
            Err(err) => {
                self.images.insert(path.to_path_buf(), None);
                Err(err)
            }
        }
    }
}

impl DocumentSink for PdfSink {
    fn add_page(&mut self) {
        self.document.add_page(Page::new(self.page_size));
        self.position = (Pt(0.0), Pt(0.0));
    }

    fn set_position(&mut self, x: Pt, y: Pt) {
        self.position = (x, y);
    }

    fn position(&self) -> (Pt, Pt) {
        self.position
    }

    fn text_width(&self, text: &str, style: TextStyle) -> Pt {
        self.document.fonts[self.font_id(style.weight)].width_of_text(text, style.size)
    }

    fn draw_text(&mut self, text: &str, style: TextStyle, colour: Colour) {
        let (x, y) = self.position;
        let id = self.font_id(style.weight);
        let font = &self.document.fonts[id];
        let width = font.width_of_text(text, style.size);
        let baseline = self.page_size.1 - y - font.ascent(style.size);

        self.page_mut().add_span(SpanLayout {
            text: text.to_string(),
            font: SpanFont {
                id,
                size: style.size,
            },
            colour,
            coords: (x, baseline),
        });
        self.position.0 = x + width;
    }

    fn draw_image(&mut self, path: &Path, x: Pt, y: Pt, width: Pt, height: Pt) -> Result<(), ReportError> {
        let image_id = self.image_id(path)?;
        let bottom = self.page_size.1 - y - height;
        self.page_mut().add_image(ImageLayout {
            image_id,
            position: Rect {
                x1: x,
                y1: bottom,
                x2: x + width,
                y2: bottom + height,
            },
        });
        Ok(())
    }

    fn draw_line(&mut self, from: (Pt, Pt), to: (Pt, Pt), colour: Colour) {
        let from = self.flip(from);
        let to = self.flip(to);
        self.page_mut().add_line(LineLayout {
            from,
            to,
            colour,
            width: RULE_WIDTH,
        });
    }

    fn finalize(&mut self, path: &Path) -> Result<(), ReportError> {
        let mut rendered: Vec<u8> = Vec::new();
        self.document.write(&mut rendered)?;

        if let Err(source) = std::fs::write(path, &rendered) {
            if path.exists() {
                if let Err(err) = std::fs::remove_file(path) {
                    warn!(path = %path.display(), error = %err, "failed to remove partial output");
                }
            }
            return Err(ReportError::Finalize {
                path: path.to_path_buf(),
                source,
            });
        }

        info!(
            path = %path.display(),
            pages = self.document.pages.len(),
            bytes = rendered.len(),
            "wrote document"
        );
        Ok(())
    }
}
