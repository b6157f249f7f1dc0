use super::{flow_segments, segment, wrap_text, FlowMetrics, LineItem, PageGeometry, PageState};
use crate::colour::{colours, Colour};
use crate::entry::Entry;
use crate::icons::IconProvider;
use crate::sink::{DocumentSink, TextStyle};
use crate::units::Pt;
use crate::ReportError;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Sizes, offsets and strings for everything the engine draws
#[derive(Debug, Clone, PartialEq)]
pub struct ReportStyle {
    pub title: String,
    pub logo: Option<PathBuf>,
    pub logo_size: Pt,
    /// Horizontal distance of the title from the left margin
    pub title_offset: Pt,
    /// Distance of the header rule above the content region
    pub header_rule_gap: Pt,
    pub footer_label: String,
    /// Distance of the footer rule below the content region
    pub footer_rule_offset: Pt,
    /// Distance of the footer text below the content region
    pub footer_text_offset: Pt,
    /// Printed as "Generated on ..." in every footer when set
    pub generated_at: Option<String>,
    pub title_size: Pt,
    pub metadata_size: Pt,
    pub message_size: Pt,
    pub footer_size: Pt,
    pub metadata_line_height: Pt,
    pub message_line_height: Pt,
    pub entry_spacing: Pt,
    pub timestamp_width: Pt,
    pub icon_size: Pt,
    pub icon_gutter: Pt,
    pub title_colour: Colour,
    pub metadata_colour: Colour,
    pub footer_colour: Colour,
    pub rule_colour: Colour,
    /// `chrono` format string for entry timestamps
    pub timestamp_format: String,
}

impl Default for ReportStyle {
    fn default() -> Self {
        ReportStyle {
            title: "Chat Log Report".to_string(),
            logo: Some(PathBuf::from("logo.png")),
            logo_size: Pt(30.0),
            title_offset: Pt(40.0),
            header_rule_gap: Pt(10.0),
            footer_label: "https://chiphub.com".to_string(),
            footer_rule_offset: Pt(5.0),
            footer_text_offset: Pt(10.0),
            generated_at: None,
            title_size: Pt(24.0),
            metadata_size: Pt(10.0),
            message_size: Pt(12.0),
            footer_size: Pt(10.0),
            metadata_line_height: Pt(20.0),
            message_line_height: Pt(16.0),
            entry_spacing: Pt(15.0),
            timestamp_width: Pt(150.0),
            icon_size: Pt(10.0),
            icon_gutter: Pt(5.0),
            title_colour: colours::BLACK,
            metadata_colour: colours::SLATE,
            footer_colour: colours::SLATE,
            rule_colour: colours::RULE,
            timestamp_format: "%Y-%m-%d %H:%M:%S".to_string(),
        }
    }
}

/// The result of a finished layout: the sink, already finalized, and how many
/// pages were emitted
pub struct Finished<S> {
    pub sink: S,
    pub pages: usize,
}

/// Lays entries out onto a [DocumentSink], one after the other, breaking pages
/// as they fill up.
///
/// The first page and its header are emitted on construction. Every line is
/// checked against the space left above the footer before it is drawn; when
/// it doesn't fit the current page is closed with its footer and a new page
/// with a fresh header is opened first.
pub struct LayoutEngine<'a, S: DocumentSink> {
    sink: S,
    geometry: PageGeometry,
    style: ReportStyle,
    icons: &'a dyn IconProvider,
    state: PageState,
    entries: usize,
}

impl<'a, S: DocumentSink> LayoutEngine<'a, S> {
    pub fn new(sink: S, geometry: PageGeometry, style: ReportStyle, icons: &'a dyn IconProvider) -> Self {
        let mut engine = LayoutEngine {
            sink,
            state: PageState::first(&geometry),
            geometry,
            style,
            icons,
            entries: 0,
        };
        engine.sink.add_page();
        engine.draw_header();
        engine
    }

    pub fn state(&self) -> PageState {
        self.state
    }

    pub fn add_entry(&mut self, entry: &Entry) {
        let left = self.geometry.content_left();

        self.ensure_room(self.style.metadata_line_height);
        let y = self.state.cursor_y;
        let metadata = TextStyle::regular(self.style.metadata_size);
        let timestamp = entry
            .timestamp()
            .format(&self.style.timestamp_format)
            .to_string();
        self.sink.set_position(left, y);
        self.sink.draw_text(&timestamp, metadata, self.style.metadata_colour);
        self.sink.set_position(left + self.style.timestamp_width, y);
        self.sink.draw_text(entry.author(), metadata, self.style.metadata_colour);
        self.state = self.state.advance(self.style.metadata_line_height);

        let segments = segment(entry.message(), self.icons);
        let message = TextStyle::regular(self.style.message_size);
        let metrics = FlowMetrics {
            width: self.geometry.content_width(),
            line_height: self.style.message_line_height,
            icon_size: self.style.icon_size,
            icon_gutter: self.style.icon_gutter,
        };
        let sink = &self.sink;
        let lines = flow_segments(&segments, &metrics, |text| sink.text_width(text, message));
        let colour: Colour = entry.color().into();

        for line in &lines {
            self.ensure_room(line.height);
            let y = self.state.cursor_y;
            for item in &line.items {
                match item {
                    LineItem::Text { text, x } => {
                        self.sink.set_position(left + *x, y);
                        self.sink.draw_text(text, message, colour);
                    }
                    LineItem::Icon {
                        token,
                        resource: Some(path),
                        x,
                    } => self.draw_icon(token, path, left + *x, y),
                    LineItem::Icon { token, resource: None, .. } => {
                        debug!(%token, "no image for icon, leaving its box blank");
                    }
                }
            }
            self.state = self.state.advance(line.height);
        }

        self.state = self.state.advance(self.style.entry_spacing);
        self.entries += 1;
    }

    pub fn extend<'e, I: IntoIterator<Item = &'e Entry>>(&mut self, entries: I) {
        for entry in entries {
            self.add_entry(entry);
        }
    }

    /// Close the last page and serialise the document to `path`
    pub fn finish(mut self, path: &Path) -> Result<Finished<S>, ReportError> {
        self.draw_footer();
        self.sink.finalize(path)?;
        debug!(
            entries = self.entries,
            pages = self.state.page_number(),
            "layout finished"
        );
        Ok(Finished {
            pages: self.state.page_number(),
            sink: self.sink,
        })
    }

    fn ensure_room(&mut self, required: Pt) {
        if self.state.fits(required) {
            return;
        }

        if !self.state.at_top() {
            self.draw_footer();
            self.state = self.state.next_page();
            self.sink.add_page();
            debug!(page = self.state.page_number(), "page break");
            self.draw_header();
        }

        if !self.state.fits(required) {
            warn!(
                required = *required,
                available = *self.geometry.content_height(),
                page = self.state.page_number(),
                "line is taller than the content area, it will be clipped"
            );
        }
    }

    fn draw_icon(&mut self, token: &str, path: &Path, x: Pt, y: Pt) {
        let size = self.style.icon_size;
        if let Err(err) = self.sink.draw_image(path, x, y, size, size) {
            warn!(%token, path = %path.display(), error = %err, "failed to draw icon");
        }
    }

    fn draw_header(&mut self) {
        let margin = self.geometry.margin;

        if let Some(logo) = &self.style.logo {
            if logo.is_file() {
                let size = self.style.logo_size;
                if let Err(err) = self.sink.draw_image(logo, margin, margin, size, size) {
                    warn!(path = %logo.display(), error = %err, "failed to draw logo");
                }
            } else {
                debug!(path = %logo.display(), "no logo found, header drawn without it");
            }
        }

        let rule_y = self.geometry.content_top() - self.style.header_rule_gap;

        // the title stays between the top margin and the header rule
        let title_style = TextStyle::bold(self.style.title_size);
        let title_width = self.geometry.content_width() - self.style.title_offset;
        let sink = &self.sink;
        let mut lines = wrap_text(&self.style.title, title_width, |piece| {
            sink.text_width(piece, title_style)
        });
        let room = ((*(rule_y - margin) / *title_style.line_height()).floor().max(0.0)) as usize;
        if lines.len() > room {
            warn!(
                title = %self.style.title,
                lines = lines.len(),
                room,
                "title does not fit in the header, dropping the lines below the rule"
            );
            lines.truncate(room);
        }
        if !lines.is_empty() {
            let title_x = self.geometry.content_left() + self.style.title_offset;
            self.sink.set_position(title_x, margin);
            self.sink
                .draw_wrapped_text(&lines.join("\n"), title_width, title_style, self.style.title_colour);
        }

        self.sink.draw_line(
            (self.geometry.content_left(), rule_y),
            (self.geometry.content_right(), rule_y),
            self.style.rule_colour,
        );
    }

    fn draw_footer(&mut self) {
        let left = self.geometry.content_left();
        let right = self.geometry.content_right();
        let bottom = self.geometry.content_bottom();

        let rule_y = bottom + self.style.footer_rule_offset;
        self.sink.draw_line((left, rule_y), (right, rule_y), self.style.rule_colour);

        let text_y = bottom + self.style.footer_text_offset;
        let style = TextStyle::regular(self.style.footer_size);
        self.sink.set_position(left, text_y);
        self.sink.draw_text(&self.style.footer_label, style, self.style.footer_colour);

        if let Some(stamp) = &self.style.generated_at {
            let generated = format!("Generated on {stamp}");
            let width = self.sink.text_width(&generated, style);
            self.sink.set_position(left + (self.geometry.content_width() - width) / 2.0, text_y);
            self.sink.draw_text(&generated, style, self.style.footer_colour);
        }

        let page = format!("Page {}", self.state.page_number());
        let width = self.sink.text_width(&page, style);
        self.sink.set_position(right - width, text_y);
        self.sink.draw_text(&page, style, self.style.footer_colour);
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::icons::IconRegistry;
    use crate::sink::{DrawCommand, RecordingSink};
    use chrono::{FixedOffset, TimeZone};

    fn entry(message: &str) -> Entry {
        let at = FixedOffset::east_opt(0)
            .and_then(|tz| tz.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).single())
            .expect("valid time");
        Entry::new(at, "Alice", message, crate::entry::Rgb(0, 128, 0))
    }

    fn style() -> ReportStyle {
        ReportStyle {
            logo: None,
            ..ReportStyle::default()
        }
    }

    fn texts(commands: &[DrawCommand]) -> Vec<&str> {
        commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn metadata_cells_come_before_the_message() {
        let icons = IconRegistry::default();
        let mut engine = LayoutEngine::new(RecordingSink::new(), PageGeometry::default(), style(), &icons);
        engine.add_entry(&entry("hello"));
        let start = engine.state().cursor_y;
        let finished = engine.finish(Path::new("out.pdf")).expect("finishes");

        let commands = finished.sink.commands();
        let drawn = texts(commands);
        let at = drawn
            .iter()
            .position(|t| *t == "2024-03-01 09:30:00")
            .expect("timestamp drawn");
        assert_eq!(&drawn[at..at + 3], ["2024-03-01 09:30:00", "Alice", "hello"]);
        // metadata line, one message line, entry spacing
        assert_eq!(start, Pt(70.0 + 20.0 + 16.0 + 15.0));
        assert_eq!(finished.pages, 1);
        assert!(matches!(commands.last(), Some(DrawCommand::Finalize(_))));
    }

    #[test]
    fn author_is_drawn_one_timestamp_cell_to_the_right() {
        let icons = IconRegistry::default();
        let mut engine = LayoutEngine::new(RecordingSink::new(), PageGeometry::default(), style(), &icons);
        engine.add_entry(&entry("hi"));
        let finished = engine.finish(Path::new("out.pdf")).expect("finishes");

        let author_x = finished.sink.commands().iter().find_map(|c| match c {
            DrawCommand::Text { text, x, .. } if text == "Alice" => Some(*x),
            _ => None,
        });
        assert_eq!(author_x, Some(Pt(170.0)));
    }

    #[test]
    fn missing_icon_reserves_its_box() {
        let icons = IconRegistry::new([("✅", "./no/such/check.png")]);
        let mut engine = LayoutEngine::new(RecordingSink::new(), PageGeometry::default(), style(), &icons);
        engine.add_entry(&entry("ok ✅ done"));
        let finished = engine.finish(Path::new("out.pdf")).expect("finishes");

        let commands = finished.sink.commands();
        assert!(!commands.iter().any(|c| matches!(c, DrawCommand::Image { .. })));
        // "ok " is 3 chars at 6pt, then the 10pt icon box and 5pt gutter
        let done_x = commands.iter().find_map(|c| match c {
            DrawCommand::Text { text, x, .. } if text == " done" => Some(*x),
            _ => None,
        });
        assert_eq!(done_x, Some(Pt(20.0 + 18.0 + 15.0)));
    }

    #[test]
    fn generated_stamp_is_printed_in_every_footer() {
        let icons = IconRegistry::default();
        let style = ReportStyle {
            generated_at: Some("2024-03-01 12:00:00".to_string()),
            ..style()
        };
        let engine = LayoutEngine::new(RecordingSink::new(), PageGeometry::default(), style, &icons);
        let finished = engine.finish(Path::new("out.pdf")).expect("finishes");
        assert!(texts(finished.sink.commands()).contains(&"Generated on 2024-03-01 12:00:00"));
    }

    #[test]
    fn long_title_stays_above_the_header_rule() {
        let icons = IconRegistry::default();
        let geometry = PageGeometry::default();
        let style = ReportStyle {
            title: "Quarterly Connector Compatibility Report For Candidate Parts".to_string(),
            ..style()
        };
        let rule_y = geometry.content_top() - style.header_rule_gap;
        let engine = LayoutEngine::new(RecordingSink::new(), geometry, style, &icons);
        let finished = engine.finish(Path::new("out.pdf")).expect("finishes");

        let title_lines: Vec<(&str, Pt, Pt)> = finished
            .sink
            .commands()
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Text { text, y, style, .. } if style.weight == crate::sink::FontWeight::Bold => {
                    Some((text.as_str(), *y, style.size))
                }
                _ => None,
            })
            .collect();
        // 12pt per character leaves room for 42 characters beside the logo
        assert_eq!(title_lines.len(), 1);
        assert_eq!(title_lines[0].0, "Quarterly Connector Compatibility Report");
        for (_, y, size) in title_lines {
            assert!(y + size <= rule_y);
        }
    }

    #[test]
    fn logo_is_drawn_once_on_every_page() {
        let dir = tempfile::tempdir().expect("can create temp dir");
        let logo = dir.path().join("logo.png");
        crate::icons::IconShape::Target
            .render()
            .save(&logo)
            .expect("can write logo");

        let icons = IconRegistry::default();
        let style = ReportStyle {
            logo: Some(logo.clone()),
            ..ReportStyle::default()
        };
        let mut engine = LayoutEngine::new(RecordingSink::new(), PageGeometry::default(), style, &icons);
        for _ in 0..60 {
            engine.add_entry(&entry("hi"));
        }
        let finished = engine.finish(Path::new("out.pdf")).expect("finishes");
        assert!(finished.pages > 1);

        let logos: Vec<&DrawCommand> = finished
            .sink
            .commands()
            .iter()
            .filter(|c| matches!(c, DrawCommand::Image { path, .. } if *path == logo))
            .collect();
        assert_eq!(logos.len(), finished.pages);
        for (i, command) in logos.into_iter().enumerate() {
            assert_eq!(
                command,
                &DrawCommand::Image {
                    page: i + 1,
                    path: logo.clone(),
                    x: Pt(20.0),
                    y: Pt(20.0),
                    width: Pt(30.0),
                    height: Pt(30.0),
                }
            );
        }
    }

    #[test]
    fn missing_logo_is_skipped() {
        let dir = tempfile::tempdir().expect("can create temp dir");
        let icons = IconRegistry::default();
        let style = ReportStyle {
            logo: Some(dir.path().join("logo.png")),
            ..ReportStyle::default()
        };
        let mut engine = LayoutEngine::new(RecordingSink::new(), PageGeometry::default(), style, &icons);
        engine.add_entry(&entry("hi"));
        let finished = engine.finish(Path::new("out.pdf")).expect("finishes");

        let commands = finished.sink.commands();
        assert!(!commands.iter().any(|c| matches!(c, DrawCommand::Image { .. })));
        assert!(texts(commands).contains(&"Chat Log Report"));
        assert!(matches!(commands.last(), Some(DrawCommand::Finalize(_))));
    }

    #[test]
    fn oversized_lines_are_clipped_rather_than_looping() {
        let icons = IconRegistry::default();
        let style = ReportStyle {
            message_line_height: Pt(1000.0),
            ..style()
        };
        let mut engine = LayoutEngine::new(RecordingSink::new(), PageGeometry::default(), style, &icons);
        engine.add_entry(&entry("tall"));
        engine.add_entry(&entry("taller"));
        let finished = engine.finish(Path::new("out.pdf")).expect("finishes");

        // every metadata line and every message line ends up on a page of its own
        assert_eq!(finished.pages, 4);
        assert!(texts(finished.sink.commands()).contains(&"taller"));
    }
}
