use crate::pagesize::{PageSize, PaperSize};
use crate::units::Pt;

/// Fixed page dimensions and the regions reserved for the header and footer.
///
/// Everything is measured top-down from the top-left corner of the page. The
/// content region is what is left between the header and the footer, inset
/// by the margin on every side. Nothing here changes from one page to the
/// next, so every page derives exactly the same bounds.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PageGeometry {
    pub page_width: Pt,
    pub page_height: Pt,
    pub margin: Pt,
    pub header_height: Pt,
    pub footer_height: Pt,
}

impl Default for PageGeometry {
    fn default() -> Self {
        PageGeometry::from_paper(PaperSize::A4, Pt(20.0), Pt(50.0), Pt(30.0))
    }
}

impl PageGeometry {
    pub fn new(size: PageSize, margin: Pt, header_height: Pt, footer_height: Pt) -> PageGeometry {
        PageGeometry {
            page_width: size.0,
            page_height: size.1,
            margin,
            header_height,
            footer_height,
        }
    }

    pub fn from_paper(paper: PaperSize, margin: Pt, header_height: Pt, footer_height: Pt) -> PageGeometry {
        PageGeometry::new(paper.dimensions(), margin, header_height, footer_height)
    }

    pub fn page_size(&self) -> PageSize {
        (self.page_width, self.page_height)
    }

    /// First y position available to content, just below the header
    pub fn content_top(&self) -> Pt {
        self.margin + self.header_height
    }

    /// Last y position available to content, just above the footer
    pub fn content_bottom(&self) -> Pt {
        self.page_height - self.margin - self.footer_height
    }

    pub fn content_left(&self) -> Pt {
        self.margin
    }

    pub fn content_right(&self) -> Pt {
        self.page_width - self.margin
    }

    pub fn content_width(&self) -> Pt {
        self.page_width - self.margin * 2.0
    }

    pub fn content_height(&self) -> Pt {
        self.content_bottom() - self.content_top()
    }
}
