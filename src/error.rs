use std::path::PathBuf;

use thiserror::Error;

use crate::document::{ParseError, WriteError};

/// Errors that abort a dump run
#[derive(Debug, Error)]
pub enum DumpError {
    /// No source document was named
    #[error("no source file given")]
    MissingArgument,

    /// A source or catalog document is not well-formed, or the catalog has the wrong root
    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: ParseError,
    },

    /// A source could not be read or the catalog could not be written
    #[error("failed to access {}: {source}", path.display())]
    FileAccess {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The catalog could not be encoded
    #[error(transparent)]
    Serialize(#[from] WriteError),
}

impl DumpError {
    pub(crate) fn parse(path: impl Into<PathBuf>, source: ParseError) -> Self {
        DumpError::Parse {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn file_access(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        DumpError::FileAccess {
            path: path.into(),
            source,
        }
    }
}
