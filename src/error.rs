use crate::config::ConfigError;
use std::path::PathBuf;
use thiserror::Error;

/// All errors that the crate can generate
#[derive(Error, Debug)]
pub enum ReportError {
    #[error(transparent)]
    /// An I/O error occurred
    Io(#[from] std::io::Error),

    #[error(transparent)]
    /// [owned_ttf_parser] failed to parse the font
    FontParsing(#[from] owned_ttf_parser::FaceParsingError),

    #[error(transparent)]
    /// [image] failed to decode or encode an image
    Image(#[from] image::ImageError),

    #[error(transparent)]
    /// An entry file could not be parsed
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    /// The configuration file could not be loaded
    Config(#[from] ConfigError),

    #[error("no PDF object reference was generated for {0}")]
    /// An object was written before the object it refers to
    UnresolvedReference(String),

    #[error("image {0:?} could not be loaded earlier and is skipped")]
    /// A previously failed image was requested again
    ImageUnavailable(PathBuf),

    #[error("failed to write document to {path:?}: {source}")]
    /// The finished document could not be written out
    Finalize {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
