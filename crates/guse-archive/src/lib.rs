//! gUSE workflow archives
//!
//! A workflow archive is a zip holding a `workflow.xml` manifest at its root
//! and one directory per job under a shared base directory, each with the
//! script that job runs. This crate decodes such a zip into a
//! [`WorkflowArchive`], lets callers read and replace node scripts, and
//! encodes the model back into a zip the workflow system accepts.

#![warn(missing_docs)]

mod archive;
pub mod error;
pub mod format;
mod node;
pub mod reader;
pub mod writer;

pub use archive::WorkflowArchive;
pub use error::{ArchiveError, Result};
pub use format::MANIFEST_NAME;
pub use node::Node;
pub use reader::ArchiveReader;
pub use writer::ArchiveWriter;
