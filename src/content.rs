//! Content stream rendering for pages.

use crate::colour::Colour;
use crate::font::Font;
use crate::page::{ImageLayout, LineLayout, PageContents, SpanFont, SpanLayout};
use id_arena::Arena;
use std::io::Write;

/// Renders page contents to a PDF content stream.
#[allow(clippy::write_with_newline)]
pub(crate) fn render_contents(
    contents: &[PageContents],
    fonts: &Arena<Font>,
) -> Result<Vec<u8>, std::io::Error> {
    let mut content: Vec<u8> = Vec::default();

    for page_content in contents.iter() {
        match page_content {
            PageContents::Text(spans) => render_text_spans(&mut content, spans, fonts)?,
            PageContents::Image(image) => render_image(&mut content, image)?,
            PageContents::Line(line) => render_line(&mut content, line)?,
        }
    }

    Ok(content)
}

#[allow(clippy::write_with_newline)]
fn render_text_spans(
    content: &mut Vec<u8>,
    spans: &[SpanLayout],
    fonts: &Arena<Font>,
) -> Result<(), std::io::Error> {
    let Some(first) = spans.first() else {
        return Ok(());
    };

    write!(content, "q\n")?;

    let mut current_font: SpanFont = first.font;
    let mut current_colour: Colour = first.colour;
    write_font(content, current_font)?;
    write_fill_colour(content, current_colour)?;

    for span in spans.iter() {
        if span.font != current_font {
            current_font = span.font;
            write_font(content, current_font)?;
        }
        if span.colour != current_colour {
            current_colour = span.colour;
            write_fill_colour(content, current_colour)?;
        }

        // spans referring to a font outside the arena have nothing to encode with
        let Some(font) = fonts.get(current_font.id) else {
            continue;
        };

        write!(content, "BT\n")?;
        write!(content, "{} {} Td\n", span.coords.0, span.coords.1)?;
        write!(content, "<")?;
        for byte in font.encode(&span.text) {
            write!(content, "{byte:02x}")?;
        }
        write!(content, "> Tj\n")?;
        write!(content, "ET\n")?;
    }

    write!(content, "Q\n")?;
    Ok(())
}

#[allow(clippy::write_with_newline)]
fn render_image(content: &mut Vec<u8>, image: &ImageLayout) -> Result<(), std::io::Error> {
    write!(content, "q\n")?;
    write!(
        content,
        "{} 0 0 {} {} {} cm\n",
        image.position.width(),
        image.position.height(),
        image.position.x1,
        image.position.y1
    )?;
    write!(content, "/I{} Do\n", image.image_id.index())?;
    write!(content, "Q\n")?;
    Ok(())
}

#[allow(clippy::write_with_newline)]
fn render_line(content: &mut Vec<u8>, line: &LineLayout) -> Result<(), std::io::Error> {
    write!(content, "q\n")?;
    write_stroke_colour(content, line.colour)?;
    write!(content, "{} w\n", line.width)?;
    write!(content, "{} {} m\n", line.from.0, line.from.1)?;
    write!(content, "{} {} l\n", line.to.0, line.to.1)?;
    write!(content, "S\n")?;
    write!(content, "Q\n")?;
    Ok(())
}

#[allow(clippy::write_with_newline)]
fn write_font(content: &mut Vec<u8>, font: SpanFont) -> Result<(), std::io::Error> {
    write!(content, "/F{} {} Tf\n", font.id.index(), font.size)
}

#[allow(clippy::write_with_newline)]
fn write_fill_colour(content: &mut Vec<u8>, colour: Colour) -> Result<(), std::io::Error> {
    match colour {
        Colour::RGB { r, g, b } => write!(content, "{r} {g} {b} rg\n"),
        Colour::Grey { g } => write!(content, "{g} g\n"),
    }
}

#[allow(clippy::write_with_newline)]
fn write_stroke_colour(content: &mut Vec<u8>, colour: Colour) -> Result<(), std::io::Error> {
    match colour {
        Colour::RGB { r, g, b } => write!(content, "{r} {g} {b} RG\n"),
        Colour::Grey { g } => write!(content, "{g} G\n"),
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::colours;
    use crate::font::StandardFont;
    use crate::units::Pt;

    #[test]
    fn text_is_hex_encoded_between_text_operators() {
        let mut fonts: Arena<Font> = Arena::new();
        let id = fonts.alloc(Font::standard(StandardFont::Helvetica));
        let spans = vec![SpanLayout {
            text: "Hi".into(),
            font: SpanFont { id, size: Pt(12.0) },
            colour: colours::BLACK,
            coords: (Pt(20.0), Pt(700.0)),
        }];

        let rendered = render_contents(&[PageContents::Text(spans)], &fonts).expect("renders");
        let rendered = String::from_utf8(rendered).expect("ascii output");
        assert!(rendered.contains("/F0 12 Tf\n"));
        assert!(rendered.contains("0 g\n"));
        assert!(rendered.contains("20 700 Td\n<4869> Tj\n"));
    }

    #[test]
    fn lines_are_stroked() {
        let fonts: Arena<Font> = Arena::new();
        let line = LineLayout {
            from: (Pt(20.0), Pt(10.0)),
            to: (Pt(100.0), Pt(10.0)),
            colour: colours::RULE,
            width: Pt(1.0),
        };
        let rendered = render_contents(&[PageContents::Line(line)], &fonts).expect("renders");
        let rendered = String::from_utf8(rendered).expect("ascii output");
        assert_eq!(rendered, "q\n0.75 G\n1 w\n20 10 m\n100 10 l\nS\nQ\n");
    }
}
