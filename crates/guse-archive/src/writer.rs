//! [`WorkflowArchive`](crate::WorkflowArchive) → zip encoding.

use std::io::{Seek, Write};

use tracing::{debug, trace};
use zip::{write::SimpleFileOptions, CompressionMethod, DateTime, ZipWriter};

use crate::{
    format::{base_dir, node_dir, node_file, MANIFEST_NAME},
    ArchiveError, Result, WorkflowArchive,
};

/// Writes a [`WorkflowArchive`] as a workflow zip
pub struct ArchiveWriter<W: Write + Seek> {
    zip: ZipWriter<W>,
    options: SimpleFileOptions,
}

impl<W: Write + Seek> ArchiveWriter<W> {
    /// Create a new writer on top of `inner`
    pub fn new(inner: W) -> Self {
        // Fixed timestamp keeps repeated encodes byte-identical.
        let options = SimpleFileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .last_modified_time(DateTime::default());

        Self {
            zip: ZipWriter::new(inner),
            options,
        }
    }

    /// Write every entry of `archive`.
    ///
    /// Order: `<base>/`, then per node `<base>/<node>/` followed by its files,
    /// then `workflow.xml` at the container root. Fails before writing
    /// anything if the archive holds nodes but has no base name.
    pub fn write_archive(&mut self, archive: &WorkflowArchive) -> Result<()> {
        if archive.base_name().is_none() && archive.nodes().next().is_some() {
            return Err(ArchiveError::MissingBaseName);
        }

        if let Some(base) = archive.base_name() {
            self.zip.add_directory(base_dir(base), self.options)?;

            for node in archive.nodes() {
                self.zip
                    .add_directory(node_dir(base, node.name()), self.options)?;

                for (file, content) in node.files() {
                    let path = node_file(base, node.name(), file);
                    trace!(entry = %path, len = content.len(), "write node file");
                    self.zip.start_file(path, self.options)?;
                    self.zip.write_all(content)?;
                }
            }
        }

        self.zip.start_file(MANIFEST_NAME, self.options)?;
        self.zip.write_all(archive.manifest())?;

        debug!(
            base = archive.base_name().unwrap_or(""),
            nodes = archive.nodes().count(),
            "encoded workflow archive"
        );
        Ok(())
    }

    /// Write the central directory and hand back the sink
    pub fn finalize(self) -> Result<W> {
        Ok(self.zip.finish()?)
    }
}
