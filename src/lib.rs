//! Render timestamped chat entries into a paginated PDF, with registered glyphs
//! (emoji) replaced by small inline icons and a header and footer on every page.
//!
//! The [layout] module decides where everything goes; a [sink::DocumentSink]
//! receives the resulting draw commands. [sink::PdfSink] builds a PDF out of
//! the [Document] model in this crate, while [sink::RecordingSink] just keeps
//! the commands around.

mod colour;
pub use colour::*;

/// Configuration file loading
pub mod config;

mod content;

mod document;
pub use document::*;

mod entry;
pub use entry::*;

mod font;
pub use font::*;

/// Token to icon mapping and the built-in icon set
pub mod icons;

mod image;
pub use self::image::*;

mod info;
pub use info::*;

pub mod layout;

pub mod logging;

mod page;
pub use page::*;

pub mod pagesize;

mod rect;
pub use rect::*;

pub(crate) mod refs;

mod report;
pub use report::*;

mod sample;
pub use sample::*;

pub mod sink;

mod units;
pub use units::*;

mod error;
pub use error::*;
