use crate::colour::Colour;
use crate::ReportError;
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// An RGB triple, 0-255 per channel. Serialised as `[r, g, b]`.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl From<Rgb> for Colour {
    fn from(c: Rgb) -> Self {
        Colour::new_rgb_bytes(c.0, c.1, c.2)
    }
}

/// One timestamped message to render
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    timestamp: DateTime<FixedOffset>,
    author: String,
    message: String,
    #[serde(default)]
    color: Rgb,
}

impl Entry {
    pub fn new<A: Into<String>, M: Into<String>>(
        timestamp: DateTime<FixedOffset>,
        author: A,
        message: M,
        color: Rgb,
    ) -> Entry {
        Entry {
            timestamp,
            author: author.into(),
            message: message.into(),
            color,
        }
    }

    pub fn timestamp(&self) -> DateTime<FixedOffset> {
        self.timestamp
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn color(&self) -> Rgb {
        self.color
    }
}

/// Parse a JSON array of entries
pub fn parse_entries(json: &str) -> Result<Vec<Entry>, ReportError> {
    Ok(serde_json::from_str(json)?)
}

pub fn load_entries<P: AsRef<Path>>(path: P) -> Result<Vec<Entry>, ReportError> {
    let contents = std::fs::read_to_string(path)?;
    parse_entries(&contents)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn parses_rfc3339_timestamps_and_colour_triples() {
        let entries = parse_entries(
            r#"[{
                "timestamp": "2024-03-01T09:30:00+02:00",
                "author": "Alice",
                "message": "Project status update ✅",
                "color": [0, 128, 0]
            }]"#,
        )
        .expect("valid entries");

        assert_eq!(entries.len(), 1);
        let entry = &entries[0];
        assert_eq!(entry.author(), "Alice");
        assert_eq!(entry.color(), Rgb(0, 128, 0));
        assert_eq!(entry.timestamp().format("%Y-%m-%d %H:%M:%S").to_string(), "2024-03-01 09:30:00");
    }

    #[test]
    fn colour_defaults_to_black() {
        let entries = parse_entries(
            r#"[{"timestamp": "2024-03-01T09:30:00Z", "author": "Bob", "message": "hi"}]"#,
        )
        .expect("valid entries");
        assert_eq!(entries[0].color(), Rgb(0, 0, 0));
    }

    #[test]
    fn malformed_input_is_a_json_error() {
        assert!(matches!(parse_entries("{not json"), Err(ReportError::Json(_))));
    }

    #[test]
    fn rgb_converts_to_a_device_colour() {
        assert_eq!(Colour::from(Rgb(255, 0, 0)), Colour::new_rgb(1.0, 0.0, 0.0));
    }
}
