//! Report configuration, loaded from TOML.
//!
//! Every key is optional; anything left out takes the built-in default.
//!
//! ```toml
//! title = "Compatibility Report"
//! output = "report.pdf"
//! logo = "logo.png"
//!
//! [page]
//! paper = "letter"
//! margin = 24.0
//!
//! [fonts]
//! regular = "fonts/DejaVuSans.ttf"
//!
//! [footer]
//! label = "https://example.com"
//!
//! [icons]
//! "✅" = "images/check.png"
//! ```

use crate::icons::IconRegistry;
use crate::layout::{PageGeometry, ReportStyle};
use crate::pagesize::PaperSize;
use crate::units::Pt;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur while loading the configuration file.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("Failed to read config file at {path}: {reason}")]
    Read { path: PathBuf, reason: String },

    /// The file is not valid TOML or has unknown keys.
    #[error("Invalid TOML in {path}: {reason}")]
    Parse { path: PathBuf, reason: String },
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ReportConfig {
    pub title: String,
    pub output: PathBuf,
    /// Drawn in the top-left corner of every page when the file exists
    pub logo: Option<PathBuf>,
    pub page: PageConfig,
    pub fonts: FontConfig,
    pub footer: FooterConfig,
    /// Token to image path. When empty, the default icon set in `images/` is used.
    pub icons: BTreeMap<String, PathBuf>,
}

impl Default for ReportConfig {
    fn default() -> Self {
        ReportConfig {
            title: "Chat Log Report".to_string(),
            output: PathBuf::from("chat_log.pdf"),
            logo: Some(PathBuf::from("logo.png")),
            page: PageConfig::default(),
            fonts: FontConfig::default(),
            footer: FooterConfig::default(),
            icons: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct PageConfig {
    pub paper: PaperSize,
    /// Overrides the paper width
    pub width: Option<Pt>,
    /// Overrides the paper height
    pub height: Option<Pt>,
    pub margin: Pt,
    pub header_height: Pt,
    pub footer_height: Pt,
}

impl Default for PageConfig {
    fn default() -> Self {
        PageConfig {
            paper: PaperSize::A4,
            width: None,
            height: None,
            margin: Pt(20.0),
            header_height: Pt(50.0),
            footer_height: Pt(30.0),
        }
    }
}

/// TrueType fonts per weight. Missing or unreadable fonts fall back to Helvetica.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct FontConfig {
    pub regular: Option<PathBuf>,
    pub bold: Option<PathBuf>,
}

impl Default for FontConfig {
    fn default() -> Self {
        FontConfig {
            regular: Some(PathBuf::from("fonts/DejaVuSans.ttf")),
            bold: Some(PathBuf::from("fonts/DejaVuSans-Bold.ttf")),
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct FooterConfig {
    pub label: String,
    /// Printed as "Generated on <stamp>" in every footer
    pub generated_at: Option<String>,
}

impl Default for FooterConfig {
    fn default() -> Self {
        FooterConfig {
            label: "https://chiphub.com".to_string(),
            generated_at: None,
        }
    }
}

impl ReportConfig {
    pub fn geometry(&self) -> PageGeometry {
        let (paper_width, paper_height) = self.page.paper.dimensions();
        PageGeometry::new(
            (
                self.page.width.unwrap_or(paper_width),
                self.page.height.unwrap_or(paper_height),
            ),
            self.page.margin,
            self.page.header_height,
            self.page.footer_height,
        )
    }

    pub fn style(&self) -> ReportStyle {
        ReportStyle {
            title: self.title.clone(),
            logo: self.logo.clone(),
            footer_label: self.footer.label.clone(),
            generated_at: self.footer.generated_at.clone(),
            ..ReportStyle::default()
        }
    }

    pub fn icon_registry(&self) -> IconRegistry {
        if self.icons.is_empty() {
            IconRegistry::with_dir("images")
        } else {
            IconRegistry::new(self.icons.clone())
        }
    }
}

/// Parse configuration from TOML text. `path` is only used in error messages.
pub fn parse_config(contents: &str, path: &Path) -> Result<ReportConfig, ConfigError> {
    toml::from_str(contents).map_err(|e| ConfigError::Parse {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

/// Load configuration from a file. Unlike an absent `--config` flag, a named
/// file that doesn't exist is an error.
pub fn load_config(path: &Path) -> Result<ReportConfig, ConfigError> {
    let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    parse_config(&contents, path)
}

#[cfg(test)]
mod test {
    use super::*;

    fn parse(contents: &str) -> Result<ReportConfig, ConfigError> {
        parse_config(contents, Path::new("report.toml"))
    }

    #[test]
    fn empty_file_is_all_defaults() {
        assert_eq!(parse("").expect("valid"), ReportConfig::default());
    }

    #[test]
    fn sections_override_defaults() {
        let config = parse(
            r#"
            title = "Compatibility Report"

            [page]
            paper = "letter"
            margin = 36.0

            [footer]
            generated_at = "2024-03-01 12:00:00"

            [icons]
            "✅" = "icons/ok.png"
            "#,
        )
        .expect("valid");

        assert_eq!(config.title, "Compatibility Report");
        assert_eq!(config.output, PathBuf::from("chat_log.pdf"));
        assert_eq!(config.page.header_height, Pt(50.0));

        let geometry = config.geometry();
        assert_eq!(geometry.page_width, Pt(612.0));
        assert_eq!(geometry.margin, Pt(36.0));

        let style = config.style();
        assert_eq!(style.title, "Compatibility Report");
        assert_eq!(style.generated_at.as_deref(), Some("2024-03-01 12:00:00"));
        assert_eq!(style.footer_label, "https://chiphub.com");

        let icons = config.icon_registry();
        assert_eq!(icons.len(), 1);
        assert_eq!(icons.get("✅"), Some(Path::new("icons/ok.png")));
    }

    #[test]
    fn explicit_dimensions_beat_the_paper_size() {
        let config = parse("[page]\nwidth = 300.0\nheight = 380.0").expect("valid");
        let geometry = config.geometry();
        assert_eq!(geometry.page_size(), (Pt(300.0), Pt(380.0)));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let result = parse("colour = \"red\"");
        assert!(matches!(result, Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let result = load_config(Path::new("./definitely/not/here.toml"));
        assert!(matches!(result, Err(ConfigError::Read { .. })));
    }

    #[test]
    fn loads_from_disk() {
        let dir = tempfile::tempdir().expect("can create temp dir");
        let path = dir.path().join("report.toml");
        std::fs::write(&path, "output = \"out/report.pdf\"\n").expect("can write config");
        let config = load_config(&path).expect("valid");
        assert_eq!(config.output, PathBuf::from("out/report.pdf"));
    }
}
