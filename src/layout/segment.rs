use crate::icons::IconProvider;
use std::path::PathBuf;

/// A contiguous run of a message: either literal text or a single icon token
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Text {
        content: String,
    },
    Icon {
        token: String,
        /// The image to draw, if the token resolved to a file that exists
        resource: Option<PathBuf>,
    },
}

impl Segment {
    pub fn text<S: Into<String>>(content: S) -> Segment {
        Segment::Text {
            content: content.into(),
        }
    }

    pub fn is_icon(&self) -> bool {
        matches!(self, Segment::Icon { .. })
    }
}

/// Split `message` into text and icon segments, in order.
///
/// Tokens are matched as exact substrings. The earliest occurrence wins and, when
/// several tokens start at the same place, the longest one does. Scanning resumes
/// right after the matched token so adjacent tokens are each found once.
pub fn segment(message: &str, icons: &dyn IconProvider) -> Vec<Segment> {
    let tokens: Vec<&str> = icons
        .tokens()
        .into_iter()
        .filter(|token| !token.is_empty())
        .collect();

    let mut segments = Vec::new();
    let mut rest = message;

    while !rest.is_empty() {
        let next = tokens
            .iter()
            .filter_map(|token| rest.find(token).map(|at| (at, *token)))
            .min_by(|a, b| a.0.cmp(&b.0).then(b.1.len().cmp(&a.1.len())));

        let Some((at, token)) = next else {
            segments.push(Segment::text(rest));
            break;
        };

        if at > 0 {
            segments.push(Segment::text(&rest[..at]));
        }
        segments.push(Segment::Icon {
            token: token.to_string(),
            resource: icons.resolve(token).filter(|path| icons.exists(path)),
        });
        rest = &rest[at + token.len()..];
    }

    segments
}

#[cfg(test)]
mod test {
    use super::*;
    use proptest::prelude::*;
    use std::collections::BTreeMap;
    use std::path::Path;

    /// Icons that "exist" whenever their path doesn't start with `missing`
    struct FakeIcons(BTreeMap<&'static str, &'static str>);

    impl FakeIcons {
        fn new(pairs: &[(&'static str, &'static str)]) -> FakeIcons {
            FakeIcons(pairs.iter().copied().collect())
        }
    }

    impl IconProvider for FakeIcons {
        fn tokens(&self) -> Vec<&str> {
            self.0.keys().copied().collect()
        }

        fn resolve(&self, token: &str) -> Option<PathBuf> {
            self.0.get(token).map(|path| PathBuf::from(*path))
        }

        fn exists(&self, path: &Path) -> bool {
            !path.starts_with("missing")
        }
    }

    fn icon(token: &str, resource: Option<&str>) -> Segment {
        Segment::Icon {
            token: token.into(),
            resource: resource.map(PathBuf::from),
        }
    }

    #[test]
    fn splits_around_a_single_token() {
        let icons = FakeIcons::new(&[("✅", "check.png")]);
        assert_eq!(
            segment("ok ✅ done", &icons),
            vec![
                Segment::text("ok "),
                icon("✅", Some("check.png")),
                Segment::text(" done"),
            ]
        );
    }

    #[test]
    fn empty_message_has_no_segments() {
        let icons = FakeIcons::new(&[("✅", "check.png")]);
        assert!(segment("", &icons).is_empty());
    }

    #[test]
    fn adjacent_tokens_are_each_consumed_once() {
        let icons = FakeIcons::new(&[("✅", "check.png"), ("❌", "close.png")]);
        assert_eq!(
            segment("✅❌✅", &icons),
            vec![
                icon("✅", Some("check.png")),
                icon("❌", Some("close.png")),
                icon("✅", Some("check.png")),
            ]
        );
    }

    #[test]
    fn earliest_token_wins_regardless_of_registration_order() {
        let icons = FakeIcons::new(&[("a", "a.png"), ("z", "z.png")]);
        assert_eq!(
            segment("xzya", &icons),
            vec![
                Segment::text("x"),
                icon("z", Some("z.png")),
                Segment::text("y"),
                icon("a", Some("a.png")),
            ]
        );
    }

    #[test]
    fn longest_token_wins_a_tie() {
        let icons = FakeIcons::new(&[(":)", "smile.png"), (":))", "grin.png")]);
        assert_eq!(
            segment("hi :))", &icons),
            vec![Segment::text("hi "), icon(":))", Some("grin.png"))]
        );
    }

    #[test]
    fn missing_resource_keeps_the_token() {
        let icons = FakeIcons::new(&[("📚", "missing/book.png")]);
        assert_eq!(
            segment("read 📚", &icons),
            vec![Segment::text("read "), icon("📚", None)]
        );
    }

    proptest! {
        #[test]
        fn text_without_tokens_is_one_segment(message in "[a-z ,.!]{1,60}") {
            let icons = FakeIcons::new(&[("✅", "check.png"), ("❌", "close.png")]);
            prop_assert_eq!(segment(&message, &icons), vec![Segment::text(message.clone())]);
        }

        #[test]
        fn one_token_yields_at_most_three_segments(
            before in "[a-z ]{0,30}",
            after in "[a-z ]{0,30}",
        ) {
            let icons = FakeIcons::new(&[("✅", "check.png")]);
            let message = format!("{before}✅{after}");
            let segments = segment(&message, &icons);

            prop_assert!(segments.len() <= 3);
            prop_assert_eq!(segments.iter().filter(|s| s.is_icon()).count(), 1);

            let text: String = segments
                .iter()
                .filter_map(|s| match s {
                    Segment::Text { content } => Some(content.as_str()),
                    Segment::Icon { .. } => None,
                })
                .collect();
            prop_assert_eq!(text, format!("{before}{after}"));
        }
    }
}
