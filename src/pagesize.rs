//! Pre-defined page sizes for common paper formats.
//!
//! All sizes are provided in portrait orientation (width, height) where width ≤ height.

use crate::units::*;
use serde::{Deserialize, Serialize};

/// Page dimensions as (width, height) in points.
pub type PageSize = (Pt, Pt);

pub const LETTER: PageSize = (Pt(8.5 * 72.0), Pt(11.0 * 72.0));
pub const LEGAL: PageSize = (Pt(8.5 * 72.0), Pt(14.0 * 72.0));

// iso a-series, rounded to the hundredth of a point
pub const A4: PageSize = (Pt(595.28), Pt(841.89));
pub const A5: PageSize = (Pt(419.53), Pt(595.28));

/// Paper sizes selectable from configuration
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaperSize {
    #[default]
    A4,
    A5,
    Letter,
    Legal,
}

impl PaperSize {
    pub fn dimensions(&self) -> PageSize {
        match self {
            PaperSize::A4 => A4,
            PaperSize::A5 => A5,
            PaperSize::Letter => LETTER,
            PaperSize::Legal => LEGAL,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn a4_matches_millimetre_definition() {
        let (w, h) = PaperSize::A4.dimensions();
        let mm_w: Pt = Mm(210.0).into();
        let mm_h: Pt = Mm(297.0).into();
        assert!((*w - *mm_w).abs() < 0.01);
        assert!((*h - *mm_h).abs() < 0.01);
    }

    #[test]
    fn paper_names_are_lowercase_in_config() {
        #[derive(Deserialize)]
        struct Wrapper {
            paper: PaperSize,
        }
        let parsed: Wrapper = toml::from_str("paper = \"letter\"").expect("valid toml");
        assert_eq!(parsed.paper, PaperSize::Letter);
    }
}
