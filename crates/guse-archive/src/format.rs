//! Path layout of a workflow archive.
//!
//! ```text
//! workflow.xml                  manifest, always at the container root
//! <base>/                       optional directory entry
//! <base>/<node>/                optional directory entry
//! <base>/<node>/<file>          one script per node
//! ```

use crate::{ArchiveError, Result};

/// Name of the manifest entry. Never prefixed with the base directory.
pub const MANIFEST_NAME: &str = "workflow.xml";

/// Number of path segments in a node file entry.
pub const FILE_DEPTH: usize = 3;

/// Classified zip entry path
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryPath<'a> {
    /// The `workflow.xml` manifest
    Manifest,
    /// Base or node directory entry, ignored on decode
    Skip,
    /// A node file
    File(NodeFilePath<'a>),
}

/// Segments of a `<base>/<node>/<file>` entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeFilePath<'a> {
    /// Shared top-level directory
    pub base: &'a str,
    /// Node (job) name
    pub node: &'a str,
    /// Script file name
    pub file: &'a str,
}

impl<'a> EntryPath<'a> {
    /// Classify an entry by its path and directory flag.
    ///
    /// Trailing empty segments are dropped before counting, so `base/` and
    /// `base/node/` are one and two segments deep.
    pub fn classify(name: &'a str, is_dir: bool) -> Result<Self> {
        if name == MANIFEST_NAME {
            return Ok(EntryPath::Manifest);
        }

        let mut parts: Vec<&'a str> = name.split('/').collect();
        while parts.last().is_some_and(|p| p.is_empty()) {
            parts.pop();
        }

        if parts.len() < FILE_DEPTH {
            return Ok(EntryPath::Skip);
        }
        if parts.len() > FILE_DEPTH {
            return Err(ArchiveError::NestedEntry(name.to_string()));
        }
        if is_dir {
            return Err(ArchiveError::UnexpectedDirectory(name.to_string()));
        }
        if parts.iter().any(|p| p.is_empty()) {
            return Err(ArchiveError::EmptySegment(name.to_string()));
        }

        Ok(EntryPath::File(NodeFilePath {
            base: parts[0],
            node: parts[1],
            file: parts[2],
        }))
    }
}

/// Check that `name` can be written as a single base, node or file segment.
pub fn check_segment(name: &str) -> Result<()> {
    if name.is_empty() || name.contains('/') {
        return Err(ArchiveError::InvalidName(name.to_string()));
    }
    Ok(())
}

/// `<base>/`
pub(crate) fn base_dir(base: &str) -> String {
    format!("{base}/")
}

/// `<base>/<node>/`
pub(crate) fn node_dir(base: &str, node: &str) -> String {
    format!("{base}/{node}/")
}

/// `<base>/<node>/<file>`
pub(crate) fn node_file(base: &str, node: &str, file: &str) -> String {
    format!("{base}/{node}/{file}")
}
