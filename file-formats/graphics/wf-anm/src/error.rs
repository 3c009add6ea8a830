use std::io;
use std::path::PathBuf;
use thiserror::Error;

pub use wf_obj::ErrorKind;

/// Error types for animation loading
#[derive(Error, Debug)]
pub enum AnmError {
    /// The animation file could not be opened or read
    #[error("File system error with file {0}, due: {1}")]
    FileSystem(PathBuf, io::Error),

    /// I/O error while reading an already opened stream
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Malformed directive (wrong field count, bad number)
    #[error("Parse error on line {line}: {message}")]
    Parse { line: usize, message: String },

    /// A `t` directive before the first `f`
    #[error("Transform on line {line} appears before any frame marker")]
    MissingFrame { line: usize },
}

impl AnmError {
    /// Classify this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::FileSystem(..) | Self::Io(_) => ErrorKind::FileSystem,
            Self::Parse { .. } | Self::MissingFrame { .. } => ErrorKind::Syntax,
        }
    }

    pub(crate) fn parse(line: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            line,
            message: message.into(),
        }
    }
}

/// Result type using AnmError
pub type Result<T> = std::result::Result<T, AnmError>;
