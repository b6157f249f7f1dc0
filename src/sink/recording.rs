use super::{DocumentSink, TextStyle};
use crate::colour::Colour;
use crate::units::Pt;
use crate::ReportError;
use std::path::{Path, PathBuf};

/// Everything a [RecordingSink] was asked to do, in order. `page` is the 1-based
/// number of the page the command landed on (0 before the first page).
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    AddPage,
    Text {
        page: usize,
        x: Pt,
        y: Pt,
        text: String,
        style: TextStyle,
        colour: Colour,
    },
    Image {
        page: usize,
        path: PathBuf,
        x: Pt,
        y: Pt,
        width: Pt,
        height: Pt,
    },
    Line {
        page: usize,
        from: (Pt, Pt),
        to: (Pt, Pt),
        colour: Colour,
    },
    Finalize(PathBuf),
}

/// A sink that writes nothing and measures every character as half an em wide.
#[derive(Debug, Default, Clone)]
pub struct RecordingSink {
    commands: Vec<DrawCommand>,
    pages: usize,
    position: (Pt, Pt),
    fail_finalize: bool,
}

impl RecordingSink {
    pub fn new() -> RecordingSink {
        RecordingSink::default()
    }

    /// A sink whose `finalize` fails as if the output could not be written
    pub fn failing_finalize() -> RecordingSink {
        RecordingSink {
            fail_finalize: true,
            ..RecordingSink::default()
        }
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn into_commands(self) -> Vec<DrawCommand> {
        self.commands
    }

    pub fn pages(&self) -> usize {
        self.pages
    }
}

impl DocumentSink for RecordingSink {
    fn add_page(&mut self) {
        self.pages += 1;
        self.position = (Pt(0.0), Pt(0.0));
        self.commands.push(DrawCommand::AddPage);
    }

    fn set_position(&mut self, x: Pt, y: Pt) {
        self.position = (x, y);
    }

    fn position(&self) -> (Pt, Pt) {
        self.position
    }

    fn text_width(&self, text: &str, style: TextStyle) -> Pt {
        style.size * 0.5 * text.chars().count() as f32
    }

    fn draw_text(&mut self, text: &str, style: TextStyle, colour: Colour) {
        let (x, y) = self.position;
        self.commands.push(DrawCommand::Text {
            page: self.pages,
            x,
            y,
            text: text.to_string(),
            style,
            colour,
        });
        self.position.0 = x + self.text_width(text, style);
    }

    fn draw_image(&mut self, path: &Path, x: Pt, y: Pt, width: Pt, height: Pt) -> Result<(), ReportError> {
        self.commands.push(DrawCommand::Image {
            page: self.pages,
            path: path.to_path_buf(),
            x,
            y,
            width,
            height,
        });
        Ok(())
    }

    fn draw_line(&mut self, from: (Pt, Pt), to: (Pt, Pt), colour: Colour) {
        self.commands.push(DrawCommand::Line {
            page: self.pages,
            from,
            to,
            colour,
        });
    }

    fn finalize(&mut self, path: &Path) -> Result<(), ReportError> {
        if self.fail_finalize {
            return Err(ReportError::Finalize {
                path: path.to_path_buf(),
                source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "simulated write failure"),
            });
        }
        self.commands.push(DrawCommand::Finalize(path.to_path_buf()));
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::colours;

    #[test]
    fn text_advances_the_position() {
        let mut sink = RecordingSink::new();
        sink.add_page();
        sink.set_position(Pt(10.0), Pt(20.0));
        sink.draw_text("abcd", TextStyle::regular(Pt(10.0)), colours::BLACK);
        assert_eq!(sink.position(), (Pt(30.0), Pt(20.0)));
        assert!(matches!(&sink.commands()[1], DrawCommand::Text { page: 1, text, .. } if text == "abcd"));
    }

    #[test]
    fn wrapped_text_reports_consumed_height() {
        let mut sink = RecordingSink::new();
        sink.add_page();
        sink.set_position(Pt(0.0), Pt(100.0));
        // 5pt per character at size 10, so 4 characters per 20pt line
        let consumed = sink.draw_wrapped_text("aaaa bbbb", Pt(20.0), TextStyle::regular(Pt(10.0)), colours::BLACK);
        assert_eq!(consumed, Pt(25.0));
        assert_eq!(sink.position(), (Pt(0.0), Pt(125.0)));

        let ys: Vec<Pt> = sink
            .commands()
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Text { y, .. } => Some(*y),
                _ => None,
            })
            .collect();
        assert_eq!(ys, vec![Pt(100.0), Pt(112.5)]);
    }

    #[test]
    fn simulated_failure_surfaces_as_finalize_error() {
        let mut sink = RecordingSink::failing_finalize();
        let err = sink.finalize(Path::new("out.pdf")).expect_err("finalize fails");
        assert!(matches!(err, ReportError::Finalize { .. }));
        assert!(sink.commands().is_empty());
    }
}
