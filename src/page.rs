use crate::colour::Colour;
use crate::content::render_contents;
use crate::font::Font;
use crate::image::Image;
use crate::pagesize::PageSize;
use crate::rect::Rect;
use crate::refs::{ObjectReferences, RefType};
use crate::units::*;
use crate::ReportError;
use id_arena::{Arena, Id};
use miniz_oxide::deflate::{compress_to_vec_zlib, CompressionLevel};
use pdf_writer::{Filter, Finish, Name, Pdf};

#[derive(Copy, Clone, PartialEq, Debug)]
pub struct SpanFont {
    pub id: Id<Font>,
    pub size: Pt,
}

/// A run of text set in a single font and colour, positioned by its baseline origin
#[derive(Clone, PartialEq, Debug)]
pub struct SpanLayout {
    pub text: String,
    pub font: SpanFont,
    pub colour: Colour,
    /// Baseline origin in PDF space (bottom-up)
    pub coords: (Pt, Pt),
}

#[derive(Clone, PartialEq, Debug)]
pub struct ImageLayout {
    pub image_id: Id<Image>,
    pub position: Rect,
}

/// A stroked straight line
#[derive(Clone, PartialEq, Debug)]
pub struct LineLayout {
    pub from: (Pt, Pt),
    pub to: (Pt, Pt),
    pub colour: Colour,
    pub width: Pt,
}

#[derive(Clone, PartialEq, Debug)]
pub enum PageContents {
    Text(Vec<SpanLayout>),
    Image(ImageLayout),
    Line(LineLayout),
}

pub struct Page {
    /// The size of the page
    pub media_box: Rect,
    /// Everything drawn on the page, in painting order
    pub contents: Vec<PageContents>,
}

impl Page {
    pub fn new(size: PageSize) -> Page {
        Page {
            media_box: Rect::sized(size.0, size.1),
            contents: Vec::default(),
        }
    }

    pub fn add_span(&mut self, span: SpanLayout) {
        // consecutive spans share one text group
        if let Some(PageContents::Text(spans)) = self.contents.last_mut() {
            spans.push(span);
        } else {
            self.contents.push(PageContents::Text(vec![span]));
        }
    }

    pub fn add_image(&mut self, image: ImageLayout) {
        self.contents.push(PageContents::Image(image));
    }

    pub fn add_line(&mut self, line: LineLayout) {
        self.contents.push(PageContents::Line(line));
    }

    pub(crate) fn write(
        &self,
        refs: &mut ObjectReferences,
        page_index: usize,
        fonts: &Arena<Font>,
        images: &Arena<Image>,
        writer: &mut Pdf,
    ) -> Result<(), ReportError> {
        let id = refs.require(RefType::Page(page_index))?;
        let parent = refs.require(RefType::PageTree)?;
        let content_id = refs.gen(RefType::ContentForPage(page_index));

        let font_refs = fonts
            .iter()
            .map(|(i, _)| refs.require(RefType::Font(i.index())).map(|r| (i.index(), r)))
            .collect::<Result<Vec<_>, _>>()?;
        let image_refs = images
            .iter()
            .map(|(i, _)| refs.require(RefType::Image(i.index())).map(|r| (i.index(), r)))
            .collect::<Result<Vec<_>, _>>()?;

        let mut page = writer.page(id);
        page.media_box(self.media_box.into());
        page.parent(parent);

        let mut resources = page.resources();
        let mut resource_fonts = resources.fonts();
        for (i, font_ref) in font_refs {
            resource_fonts.pair(Name(format!("F{i}").as_bytes()), font_ref);
        }
        resource_fonts.finish();
        let mut resource_xobjects = resources.x_objects();
        for (i, image_ref) in image_refs {
            resource_xobjects.pair(Name(format!("I{i}").as_bytes()), image_ref);
        }
        resource_xobjects.finish();
        resources.finish();

        page.contents(content_id);
        page.finish();

        let rendered = render_contents(&self.contents, fonts)?;
        let compressed = compress_to_vec_zlib(&rendered, CompressionLevel::DefaultLevel as u8);
        writer
            .stream(content_id, compressed.as_slice())
            .filter(Filter::FlateDecode);
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::colours;
    use crate::font::StandardFont;
    use crate::pagesize::A4;

    #[test]
    fn consecutive_spans_share_a_text_group() {
        let mut fonts: Arena<Font> = Arena::new();
        let id = fonts.alloc(Font::standard(StandardFont::Helvetica));
        let span = SpanLayout {
            text: "hi".into(),
            font: SpanFont { id, size: Pt(12.0) },
            colour: colours::BLACK,
            coords: (Pt(10.0), Pt(10.0)),
        };

        let mut page = Page::new(A4);
        page.add_span(span.clone());
        page.add_span(span.clone());
        page.add_line(LineLayout {
            from: (Pt(0.0), Pt(0.0)),
            to: (Pt(10.0), Pt(0.0)),
            colour: colours::RULE,
            width: Pt(1.0),
        });
        page.add_span(span);

        assert_eq!(page.contents.len(), 3);
        assert!(matches!(&page.contents[0], PageContents::Text(spans) if spans.len() == 2));
        assert_eq!(page.media_box.width(), A4.0);
    }
}
