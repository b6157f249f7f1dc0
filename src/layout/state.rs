use super::PageGeometry;
use crate::units::Pt;

/// Where the next line goes: the vertical cursor, the current page, and the
/// content bounds the cursor has to stay within.
///
/// Transitions return new values rather than mutating, so the paging rules can
/// be tested without a sink.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PageState {
    pub cursor_y: Pt,
    /// 0-based
    pub page_index: usize,
    pub content_top: Pt,
    pub content_bottom: Pt,
}

impl PageState {
    /// The state at the top of the first page
    pub fn first(geometry: &PageGeometry) -> PageState {
        PageState {
            cursor_y: geometry.content_top(),
            page_index: 0,
            content_top: geometry.content_top(),
            content_bottom: geometry.content_bottom(),
        }
    }

    /// Whether a line of `required` height fits below the cursor on this page
    pub fn fits(&self, required: Pt) -> bool {
        self.cursor_y + required <= self.content_bottom
    }

    /// Nothing has been placed on this page yet
    pub fn at_top(&self) -> bool {
        self.cursor_y <= self.content_top
    }

    pub fn advance(self, dy: Pt) -> PageState {
        PageState {
            cursor_y: self.cursor_y + dy,
            ..self
        }
    }

    pub fn next_page(self) -> PageState {
        PageState {
            cursor_y: self.content_top,
            page_index: self.page_index + 1,
            ..self
        }
    }

    /// 1-based page number, as printed in the footer
    pub fn page_number(&self) -> usize {
        self.page_index + 1
    }
}
