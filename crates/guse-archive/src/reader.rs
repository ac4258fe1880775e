//! Zip → [`WorkflowArchive`](crate::WorkflowArchive) decoding.

use std::io::{Read, Seek};

use tracing::{debug, trace};
use zip::ZipArchive;

use crate::{
    format::{EntryPath, NodeFilePath},
    ArchiveError, Node, Result, WorkflowArchive,
};

/// Decodes a workflow zip into a [`WorkflowArchive`]
pub struct ArchiveReader<R: Read + Seek> {
    zip: ZipArchive<R>,
}

impl<R: Read + Seek> ArchiveReader<R> {
    /// Open the zip container. Fails if the central directory is unreadable.
    pub fn new(inner: R) -> Result<Self> {
        Ok(Self {
            zip: ZipArchive::new(inner)?,
        })
    }

    /// Walk every entry in archive order and build the model.
    ///
    /// Consumes the reader, so the underlying stream is dropped whether the
    /// archive decodes or not.
    pub fn read(mut self) -> Result<WorkflowArchive> {
        let mut manifest = None;
        let mut base_name: Option<String> = None;
        let mut nodes = std::collections::BTreeMap::<String, Node>::new();

        for i in 0..self.zip.len() {
            let mut entry = self.zip.by_index(i)?;
            let name = entry.name().to_string();

            match EntryPath::classify(&name, entry.is_dir())? {
                EntryPath::Manifest => {
                    manifest = Some(read_entry(&mut entry)?);
                    trace!(entry = %name, "read manifest");
                }
                EntryPath::Skip => {
                    trace!(entry = %name, "skip");
                }
                EntryPath::File(NodeFilePath { base, node, file }) => {
                    match base_name.as_deref() {
                        None => base_name = Some(base.to_string()),
                        Some(expected) if expected != base => {
                            return Err(ArchiveError::BaseNameMismatch {
                                expected: expected.to_string(),
                                path: name.clone(),
                            });
                        }
                        Some(_) => {}
                    }

                    let content = read_entry(&mut entry)?;
                    trace!(entry = %name, len = content.len(), "read node file");
                    nodes
                        .entry(node.to_string())
                        .or_insert_with(|| Node::new(node))
                        .insert_file(file, content);
                }
            }
        }

        let manifest = manifest.ok_or(ArchiveError::MissingManifest)?;
        debug!(
            base = base_name.as_deref().unwrap_or(""),
            nodes = nodes.len(),
            manifest_len = manifest.len(),
            "decoded workflow archive"
        );

        Ok(WorkflowArchive {
            base_name,
            manifest: manifest.into(),
            nodes,
        })
    }
}

fn read_entry<E: Read>(entry: &mut E) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    entry.read_to_end(&mut buf)?;
    Ok(buf)
}
