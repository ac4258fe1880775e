//! Error types for archive decoding, encoding and lookups.

use thiserror::Error;

/// Archive error types
#[derive(Error, Debug)]
pub enum ArchiveError {
    /// IO error on the source stream or the destination sink
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The zip container itself could not be read or written
    #[error("Invalid zip container: {0}")]
    Zip(zip::result::ZipError),

    /// Entry lies deeper than `<base>/<node>/<file>`
    #[error("Invalid archive format: entry {0:?} is nested beyond two levels")]
    NestedEntry(String),

    /// Directory entry found where a node file is expected
    #[error("Invalid archive format: unexpected directory {0:?} at file depth")]
    UnexpectedDirectory(String),

    /// Entry uses a different top-level directory than the first node file
    #[error("Invalid archive format: entry {path:?} is not under base directory {expected:?}")]
    BaseNameMismatch {
        /// Base name recorded from the first node file
        expected: String,
        /// Path of the offending entry
        path: String,
    },

    /// Entry path has an empty base, node or file segment
    #[error("Invalid archive format: entry {0:?} has an empty path segment")]
    EmptySegment(String),

    /// Node, file or base name that cannot be written as one path segment
    #[error("Invalid archive format: {0:?} is not a valid path segment")]
    InvalidName(String),

    /// Nodes present but no base directory to place them under
    #[error("Invalid archive format: archive has nodes but no base directory name")]
    MissingBaseName,

    /// No `workflow.xml` entry in the archive
    #[error("Invalid archive format: manifest entry workflow.xml is absent")]
    MissingManifest,

    /// Unknown node name
    #[error("Node not found: {0}")]
    NodeNotFound(String),

    /// Known node without the requested file
    #[error("File not found: {node}/{file}")]
    FileNotFound {
        /// Node name
        node: String,
        /// File name
        file: String,
    },
}

impl ArchiveError {
    /// True when the input violates the structural contract of a workflow archive.
    pub fn is_format(&self) -> bool {
        matches!(
            self,
            ArchiveError::Zip(_)
                | ArchiveError::NestedEntry(_)
                | ArchiveError::UnexpectedDirectory(_)
                | ArchiveError::BaseNameMismatch { .. }
                | ArchiveError::EmptySegment(_)
                | ArchiveError::InvalidName(_)
                | ArchiveError::MissingBaseName
                | ArchiveError::MissingManifest
        )
    }

    /// True when a caller referenced a node or file the archive does not hold.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            ArchiveError::NodeNotFound(_) | ArchiveError::FileNotFound { .. }
        )
    }
}

impl From<zip::result::ZipError> for ArchiveError {
    fn from(e: zip::result::ZipError) -> Self {
        match e {
            zip::result::ZipError::Io(e) => ArchiveError::Io(e),
            other => ArchiveError::Zip(other),
        }
    }
}

/// Result type alias for archive operations
pub type Result<T> = std::result::Result<T, ArchiveError>;
