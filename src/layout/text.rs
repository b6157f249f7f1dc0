use super::Segment;
use crate::units::Pt;
use std::path::PathBuf;

const TABSIZE: usize = 4;

/// The box a message is flowed into and the size of the things placed in it
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FlowMetrics {
    /// Maximum line width
    pub width: Pt,
    /// Height of a line that only holds text
    pub line_height: Pt,
    pub icon_size: Pt,
    /// Horizontal space left after every icon
    pub icon_gutter: Pt,
}

/// Something placed on a line, `x` being its offset from the start of the line
#[derive(Debug, Clone, PartialEq)]
pub enum LineItem {
    Text {
        text: String,
        x: Pt,
    },
    Icon {
        token: String,
        resource: Option<PathBuf>,
        x: Pt,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    pub items: Vec<LineItem>,
    pub height: Pt,
}

impl Line {
    /// All the text on the line, icons left out
    pub fn text(&self) -> String {
        self.items
            .iter()
            .filter_map(|item| match item {
                LineItem::Text { text, .. } => Some(text.as_str()),
                LineItem::Icon { .. } => None,
            })
            .collect()
    }

    pub fn has_icon(&self) -> bool {
        self.items
            .iter()
            .any(|item| matches!(item, LineItem::Icon { .. }))
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum Token<'a> {
    Word(&'a str),
    Space(&'a str),
    Newline,
}

fn normalise(text: &str) -> String {
    text.replace('\t', &" ".repeat(TABSIZE))
        .replace("\r\n", "\n")
        .replace('\r', "\n")
}

/// Split normalised text into words, whitespace runs and hard line breaks
fn tokenize(text: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    for (i, line) in text.split('\n').enumerate() {
        if i > 0 {
            tokens.push(Token::Newline);
        }
        let mut rest = line;
        while let Some(first) = rest.chars().next() {
            let space = first.is_whitespace();
            let end = rest
                .find(|c: char| c.is_whitespace() != space)
                .unwrap_or(rest.len());
            let (run, tail) = rest.split_at(end);
            tokens.push(if space {
                Token::Space(run)
            } else {
                Token::Word(run)
            });
            rest = tail;
        }
    }
    tokens
}

struct LineBuilder<'m, M> {
    metrics: &'m FlowMetrics,
    measure: M,
    lines: Vec<Line>,
    items: Vec<LineItem>,
    x: Pt,
    has_icon: bool,
    /// text not yet turned into an item, so runs from one segment merge
    pending: String,
    pending_x: Pt,
    /// the current line was started by wrapping rather than a hard break
    wrapped: bool,
}

impl<'m, M: Fn(&str) -> Pt> LineBuilder<'m, M> {
    fn new(metrics: &'m FlowMetrics, measure: M) -> Self {
        LineBuilder {
            metrics,
            measure,
            lines: Vec::new(),
            items: Vec::new(),
            x: Pt(0.0),
            has_icon: false,
            pending: String::new(),
            pending_x: Pt(0.0),
            wrapped: false,
        }
    }

    fn is_empty(&self) -> bool {
        self.items.is_empty() && self.pending.is_empty()
    }

    fn fits(&self, width: Pt) -> bool {
        self.x + width <= self.metrics.width
    }

    fn push_text(&mut self, text: &str, width: Pt) {
        if self.pending.is_empty() {
            self.pending_x = self.x;
        }
        self.pending.push_str(text);
        self.x += width;
    }

    fn flush_text(&mut self) {
        if !self.pending.is_empty() {
            self.items.push(LineItem::Text {
                text: std::mem::take(&mut self.pending),
                x: self.pending_x,
            });
        }
    }

    fn end_line(&mut self, wrapped: bool) {
        let trimmed = self.pending.trim_end().len();
        self.pending.truncate(trimmed);
        self.flush_text();

        let has_text = self
            .items
            .iter()
            .any(|item| matches!(item, LineItem::Text { .. }));
        let height = match (has_text, self.has_icon) {
            (_, false) => self.metrics.line_height,
            (true, true) => self.metrics.line_height.max(self.metrics.icon_size),
            (false, true) => self.metrics.icon_size,
        };

        self.lines.push(Line {
            items: std::mem::take(&mut self.items),
            height,
        });
        self.x = Pt(0.0);
        self.has_icon = false;
        self.wrapped = wrapped;
    }

    fn push_space(&mut self, run: &str) {
        if self.wrapped && self.is_empty() {
            return;
        }
        let width = (self.measure)(run);
        if !self.fits(width) {
            // whitespace at a wrap point is dropped
            if !self.is_empty() {
                self.end_line(true);
            }
            return;
        }
        self.push_text(run, width);
    }

    fn push_newline(&mut self) {
        // the line already ended at a wrap point, the break only cancels the wrap
        if self.wrapped && self.is_empty() {
            self.wrapped = false;
            return;
        }
        self.end_line(false);
    }

    fn push_word(&mut self, word: &str) {
        let width = (self.measure)(word);
        if self.fits(width) {
            self.push_text(word, width);
            return;
        }
        if !self.is_empty() {
            self.end_line(true);
        }
        if self.fits(width) {
            self.push_text(word, width);
            return;
        }

        // wider than a whole line, break between characters
        let mut buf = [0u8; 4];
        for ch in word.chars() {
            let piece: &str = ch.encode_utf8(&mut buf);
            let piece_width = (self.measure)(piece);
            if !self.fits(piece_width) && !self.is_empty() {
                self.end_line(true);
            }
            self.push_text(piece, piece_width);
        }
    }

    fn push_icon(&mut self, token: &str, resource: &Option<PathBuf>) {
        let size = self.metrics.icon_size;
        if !self.fits(size) && !self.is_empty() {
            self.end_line(true);
        }
        self.flush_text();
        self.items.push(LineItem::Icon {
            token: token.to_string(),
            resource: resource.clone(),
            x: self.x,
        });
        self.x += size + self.metrics.icon_gutter;
        self.has_icon = true;
    }

    fn push_segment_text(&mut self, content: &str) {
        let text = normalise(content);
        for token in tokenize(&text) {
            match token {
                Token::Word(word) => self.push_word(word),
                Token::Space(run) => self.push_space(run),
                Token::Newline => self.push_newline(),
            }
        }
        self.flush_text();
    }

    fn finish(mut self) -> Vec<Line> {
        if !self.is_empty() {
            self.end_line(false);
        }
        self.lines
    }
}

/// Flow segments left to right into lines no wider than `metrics.width`.
///
/// Text wraps at whitespace; a word that is wider than a whole line is broken
/// between characters instead. Icons take `icon_size` and push the following
/// content right by `icon_size + icon_gutter`. `measure` gives the width of a
/// piece of text as it will be drawn.
pub fn flow_segments<M>(segments: &[Segment], metrics: &FlowMetrics, measure: M) -> Vec<Line>
where
    M: Fn(&str) -> Pt,
{
    let mut builder = LineBuilder::new(metrics, measure);
    for segment in segments {
        match segment {
            Segment::Text { content } => builder.push_segment_text(content),
            Segment::Icon { token, resource } => builder.push_icon(token, resource),
        }
    }
    builder.finish()
}

/// Word-wrap plain text to `width`, returning the text of each line
pub fn wrap_text<M>(text: &str, width: Pt, measure: M) -> Vec<String>
where
    M: Fn(&str) -> Pt,
{
    let metrics = FlowMetrics {
        width,
        line_height: Pt(0.0),
        icon_size: Pt(0.0),
        icon_gutter: Pt(0.0),
    };
    flow_segments(&[Segment::text(text)], &metrics, measure)
        .iter()
        .map(Line::text)
        .collect()
}

#[cfg(test)]
mod test {
    use super::*;
    use proptest::prelude::*;

    fn fixed(text: &str) -> Pt {
        Pt(5.0 * text.chars().count() as f32)
    }

    fn metrics(width: f32) -> FlowMetrics {
        FlowMetrics {
            width: Pt(width),
            line_height: Pt(16.0),
            icon_size: Pt(10.0),
            icon_gutter: Pt(5.0),
        }
    }

    fn icon(token: &str) -> Segment {
        Segment::Icon {
            token: token.into(),
            resource: Some(PathBuf::from("check.png")),
        }
    }

    #[test]
    fn icon_sits_between_text_on_one_line() {
        let segments = vec![Segment::text("ok "), icon("✅"), Segment::text(" done")];
        let lines = flow_segments(&segments, &metrics(500.0), fixed);

        assert_eq!(lines.len(), 1);
        assert_eq!(
            lines[0].items,
            vec![
                LineItem::Text {
                    text: "ok ".into(),
                    x: Pt(0.0)
                },
                LineItem::Icon {
                    token: "✅".into(),
                    resource: Some(PathBuf::from("check.png")),
                    x: Pt(15.0)
                },
                LineItem::Text {
                    text: " done".into(),
                    x: Pt(30.0)
                },
            ]
        );
        assert_eq!(lines[0].height, Pt(16.0));
    }

    #[test]
    fn words_wrap_at_whitespace() {
        assert_eq!(wrap_text("aaa bbb ccc", Pt(40.0), fixed), vec!["aaa bbb", "ccc"]);
    }

    #[test]
    fn wrapped_lines_skip_leading_whitespace() {
        assert_eq!(wrap_text("aaaa   bbbb", Pt(20.0), fixed), vec!["aaaa", "bbbb"]);
    }

    #[test]
    fn overlong_words_break_between_characters() {
        assert_eq!(
            wrap_text("abcdefghij", Pt(20.0), fixed),
            vec!["abcd", "efgh", "ij"]
        );
    }

    #[test]
    fn hard_newlines_are_kept() {
        assert_eq!(wrap_text("a\r\n\rb", Pt(100.0), fixed), vec!["a", "", "b"]);
        assert!(wrap_text("", Pt(100.0), fixed).is_empty());
    }

    #[test]
    fn newline_right_after_a_wrap_adds_no_blank_line() {
        assert_eq!(wrap_text("aaaa \nbbbb", Pt(20.0), fixed), vec!["aaaa", "bbbb"]);
        assert_eq!(
            wrap_text("aaaa \n\nbbbb", Pt(20.0), fixed),
            vec!["aaaa", "", "bbbb"]
        );
    }

    #[test]
    fn tabs_expand_to_spaces() {
        assert_eq!(wrap_text("a\tb", Pt(100.0), fixed), vec!["a    b"]);
    }

    #[test]
    fn icon_wraps_when_it_does_not_fit() {
        let segments = vec![Segment::text("abcde"), icon("✅")];
        let lines = flow_segments(&segments, &metrics(30.0), fixed);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].text(), "abcde");
        assert!(!lines[0].has_icon());
        match &lines[1].items[0] {
            LineItem::Icon { x, .. } => assert_eq!(*x, Pt(0.0)),
            other => panic!("expected the icon to open the second line, got {other:?}"),
        }
    }

    #[test]
    fn line_height_grows_to_fit_icons() {
        let tall = FlowMetrics {
            icon_size: Pt(20.0),
            ..metrics(500.0)
        };
        let mixed = flow_segments(&[Segment::text("hi "), icon("✅")], &tall, fixed);
        assert_eq!(mixed[0].height, Pt(20.0));

        let only_icon = flow_segments(&[icon("✅")], &metrics(500.0), fixed);
        assert_eq!(only_icon[0].height, Pt(10.0));
    }

    proptest! {
        #[test]
        fn lines_never_exceed_width_and_keep_every_word(
            words in proptest::collection::vec("[a-z]{1,8}", 1..30),
        ) {
            let text = words.join(" ");
            let width = Pt(60.0);
            let lines = wrap_text(&text, width, fixed);

            for line in &lines {
                prop_assert!(fixed(line) <= width);
            }
            let rewrapped: Vec<String> = lines
                .iter()
                .flat_map(|line| line.split_whitespace().map(str::to_string).collect::<Vec<_>>())
                .collect();
            prop_assert_eq!(rewrapped, words);
        }
    }
}
