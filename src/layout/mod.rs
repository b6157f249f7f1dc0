//! Pagination and text flow.
//!
//! Messages are split into text and icon [Segment]s, flowed into [Line]s no
//! wider than the content region of a [PageGeometry], and drawn line by line by
//! the [LayoutEngine], which tracks the cursor in a [PageState] and starts a
//! new page (footer, new page, header) whenever the next line would run into
//! the footer.
//!
//! # Example
//!
//! ```
//! use chatlog_pdf::icons::IconRegistry;
//! use chatlog_pdf::layout::{LayoutEngine, PageGeometry, ReportStyle};
//! use chatlog_pdf::sink::RecordingSink;
//! use chatlog_pdf::{Entry, Rgb};
//! use chrono::DateTime;
//!
//! let icons = IconRegistry::new([("✅", "images/check.png")]);
//! let at = DateTime::parse_from_rfc3339("2024-03-01T09:30:00Z").unwrap();
//!
//! let mut engine = LayoutEngine::new(
//!     RecordingSink::new(),
//!     PageGeometry::default(),
//!     ReportStyle::default(),
//!     &icons,
//! );
//! engine.add_entry(&Entry::new(at, "Alice", "ok ✅ done", Rgb(0, 128, 0)));
//! let finished = engine.finish("chat_log.pdf".as_ref()).unwrap();
//! assert_eq!(finished.pages, 1);
//! ```

mod engine;
mod geometry;
mod segment;
mod state;
mod text;

pub use engine::*;
pub use geometry::*;
pub use segment::*;
pub use state::*;
pub use text::*;
