//! Error types for scene loading, camera setup and output.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Invalid camera frame.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CameraError {
    #[error("view and up directions must be nonzero")]
    ZeroDirection,

    #[error("view direction and up direction are parallel")]
    ParallelUpDir,
}

/// What went wrong on a scene file line.
#[derive(Error, Debug)]
pub enum ParseErrorKind {
    #[error("unknown tag '{0}'")]
    UnknownTag(String),

    #[error("invalid arguments for '{0}'")]
    InvalidFormat(String),

    #[error("'{tag}' index {index} is out of range, {len} declared")]
    IndexOutOfRange {
        tag: String,
        index: i64,
        len: usize,
    },

    #[error("'{0}' used before any mtlcolor")]
    MissingMaterial(String),

    #[error("'{0}' direction must be nonzero")]
    ZeroDirection(String),

    #[error("required scene parameter '{0}' not specified")]
    MissingParameter(&'static str),

    #[error("image size must be positive")]
    InvalidImageSize,

    #[error("failed to load texture {path:?}: {source}")]
    Texture {
        path: PathBuf,
        source: image::ImageError,
    },
}

/// Scene file error with the line it occurred on.
/// Line 0 refers to checks done after the whole file is read.
#[derive(Debug)]
pub struct ParseError {
    pub line: usize,
    pub kind: ParseErrorKind,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.line == 0 {
            write!(f, "{}", self.kind)
        } else {
            write!(f, "line {}: {}", self.line, self.kind)
        }
    }
}

impl std::error::Error for ParseError {}

impl ParseError {
    pub fn new(line: usize, kind: ParseErrorKind) -> Self {
        Self { line, kind }
    }
}

/// Top level error of a render run.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("failed to access {path:?}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse scene")]
    Parse(#[from] ParseError),

    #[error("invalid camera")]
    Camera(#[from] CameraError),

    #[error("failed to write image")]
    Image(#[from] image::ImageError),

    #[error("render aborted: {panicked} worker threads panicked, {missing} of {total} blocks not rendered")]
    Worker {
        panicked: usize,
        missing: usize,
        total: usize,
    },
}

/// Result type for render runs.
pub type Result<T> = std::result::Result<T, RenderError>;
