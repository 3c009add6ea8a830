use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Error types for OBJ/MTL model loading
#[derive(Error, Debug)]
pub enum ObjError {
    /// A model, material library or texture file could not be opened or read
    #[error("File system error with file {0}, due: {1}")]
    FileSystem(PathBuf, io::Error),

    /// I/O error while reading an already opened stream
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Malformed directive (bad number, missing argument)
    #[error("Parse error on line {line}: {message}")]
    Parse { line: usize, message: String },

    /// Face reference pointing outside of the vertex or texture pool
    #[error("Invalid {kind} index {index} on line {line} (pool holds {len})")]
    InvalidIndex {
        line: usize,
        kind: IndexKind,
        index: i64,
        len: usize,
    },

    /// `usemtl` naming a material that no loaded library declares
    #[error("Unknown material '{name}' referenced on line {line}")]
    UnknownMaterial { line: usize, name: String },

    /// Material property directive before any `newmtl`
    #[error("'{directive}' on line {line} appears before any newmtl")]
    NoCurrentMaterial { line: usize, directive: String },

    /// Texture file is not a decodable PNG
    #[error("Texture error with file {path}: {message}")]
    Texture { path: PathBuf, message: String },

    /// Texture decoded to a pixel layout other than 8-bit RGB or RGBA
    #[error("Texture {path} has unsupported color type {color_type}")]
    UnsupportedColorType { path: PathBuf, color_type: String },
}

/// Which vertex pool a face reference indexes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexKind {
    Vertex,
    TexCoord,
}

impl std::fmt::Display for IndexKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Vertex => f.write_str("vertex"),
            Self::TexCoord => f.write_str("texture coordinate"),
        }
    }
}

/// Coarse classification of a load failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A file could not be opened or read
    FileSystem,
    /// The text did not follow the grammar
    Syntax,
    /// A reference (index or material name) did not resolve
    Reference,
    /// The texture payload was rejected
    Texture,
}

impl ObjError {
    /// Classify this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::FileSystem(..) | Self::Io(_) => ErrorKind::FileSystem,
            Self::Parse { .. } | Self::NoCurrentMaterial { .. } => ErrorKind::Syntax,
            Self::InvalidIndex { .. } | Self::UnknownMaterial { .. } => ErrorKind::Reference,
            Self::Texture { .. } | Self::UnsupportedColorType { .. } => ErrorKind::Texture,
        }
    }

    pub(crate) fn parse(line: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            line,
            message: message.into(),
        }
    }
}

/// Result type using ObjError
pub type Result<T> = std::result::Result<T, ObjError>;
