use bytes::{Buf, Bytes};
use std::{
    collections::BTreeMap,
    fs::File,
    io::{BufReader, BufWriter, Cursor, Read, Seek, Write},
    path::Path,
};
use tempfile::NamedTempFile;
use tracing::debug;

use crate::{format::check_segment, ArchiveError, ArchiveReader, ArchiveWriter, Node, Result};

/// In-memory gUSE workflow archive.
///
/// Holds the opaque `workflow.xml` manifest and one [`Node`] per job, all
/// under a single base directory name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkflowArchive {
    pub(crate) base_name: Option<String>,
    pub(crate) manifest: Bytes,
    pub(crate) nodes: BTreeMap<String, Node>,
}

impl WorkflowArchive {
    /// Empty archive with the given base directory and manifest.
    pub fn new(base_name: impl Into<String>, manifest: impl Into<Bytes>) -> Result<Self> {
        let base_name = base_name.into();
        check_segment(&base_name)?;
        Ok(Self {
            base_name: Some(base_name),
            manifest: manifest.into(),
            nodes: BTreeMap::new(),
        })
    }

    /// Decode from any seekable reader.
    pub fn from_reader<R: Read + Seek>(reader: R) -> Result<Self> {
        ArchiveReader::new(reader)?.read()
    }

    /// Decode an in-memory zip.
    pub fn from_bytes(bytes: impl Into<Bytes>) -> Result<Self> {
        Self::from_reader(Cursor::new(bytes.into()))
    }

    /// Decode the zip at `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!(path = %path.display(), "open workflow archive");
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }

    /// Encode into `sink` and return it once the zip is finalized.
    pub fn encode_into<W: Write + Seek>(&self, sink: W) -> Result<W> {
        let mut writer = ArchiveWriter::new(sink);
        writer.write_archive(self)?;
        writer.finalize()
    }

    /// Encode into memory, positioned at the start of the zip.
    pub fn as_archive_stream(&self) -> Result<Cursor<Vec<u8>>> {
        Ok(Cursor::new(self.to_bytes()?))
    }

    /// Encode into memory.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(self.encode_into(Cursor::new(Vec::new()))?.into_inner())
    }

    /// Encode into `path`, replacing it if present.
    ///
    /// The zip is written to a temporary file next to `path` and renamed over
    /// it, so a failed encode or write leaves any existing file intact.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let dir = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };

        let tmp = NamedTempFile::new_in(dir)?;
        let mut sink = self.encode_into(BufWriter::new(tmp))?;
        sink.flush()?;
        let tmp = sink.into_inner().map_err(|e| e.into_error())?;
        tmp.as_file().sync_all()?;
        tmp.persist(path).map_err(|e| e.error)?;

        debug!(path = %path.display(), "saved workflow archive");
        Ok(())
    }

    /// Shared top-level directory, `None` when no node file has been decoded.
    pub fn base_name(&self) -> Option<&str> {
        self.base_name.as_deref()
    }

    /// Raw `workflow.xml` bytes.
    pub fn manifest(&self) -> &Bytes {
        &self.manifest
    }

    /// Set the shared top-level directory, e.g. after decoding an archive
    /// that carried only a manifest.
    pub fn set_base_name(&mut self, base_name: impl Into<String>) -> Result<()> {
        let base_name = base_name.into();
        check_segment(&base_name)?;
        self.base_name = Some(base_name);
        Ok(())
    }

    /// Replace the manifest.
    pub fn set_manifest(&mut self, manifest: impl Into<Bytes>) {
        self.manifest = manifest.into();
    }

    /// Node names, sorted.
    pub fn node_names(&self) -> impl Iterator<Item = &str> {
        self.nodes.keys().map(String::as_str)
    }

    /// Nodes, sorted by name.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    /// Node by name.
    pub fn node(&self, name: &str) -> Option<&Node> {
        self.nodes.get(name)
    }

    /// Register an empty node. Returns false if the node already existed.
    pub fn add_node(&mut self, name: impl Into<String>) -> Result<bool> {
        let name = name.into();
        check_segment(&name)?;
        if self.nodes.contains_key(&name) {
            return Ok(false);
        }
        self.nodes.insert(name.clone(), Node::new(name));
        Ok(true)
    }

    /// Store `content` as `file` on an existing node, replacing any previous
    /// content under that name.
    pub fn add_file(
        &mut self,
        node: &str,
        file: impl Into<String>,
        content: impl Into<Bytes>,
    ) -> Result<()> {
        let file = file.into();
        check_segment(&file)?;
        self.node_mut(node)?.insert_file(file, content);
        Ok(())
    }

    /// Like [`add_file`](Self::add_file), reading the content to the end of
    /// `reader`. The archive is untouched if the node is unknown or the read
    /// fails.
    pub fn add_file_from_reader<R: Read>(
        &mut self,
        node: &str,
        file: impl Into<String>,
        mut reader: R,
    ) -> Result<()> {
        let file = file.into();
        check_segment(&file)?;
        let target = self.node_mut(node)?;
        let mut buf = Vec::new();
        reader.read_to_end(&mut buf)?;
        target.insert_file(file, buf);
        Ok(())
    }

    /// Stored content of `file` on `node`.
    pub fn get_file(&self, node: &str, file: &str) -> Result<Bytes> {
        self.nodes
            .get(node)
            .ok_or_else(|| ArchiveError::NodeNotFound(node.to_string()))?
            .file(file)
            .ok_or_else(|| ArchiveError::FileNotFound {
                node: node.to_string(),
                file: file.to_string(),
            })
    }

    /// [`get_file`](Self::get_file) as a reader.
    pub fn file_reader(&self, node: &str, file: &str) -> Result<impl Read> {
        Ok(self.get_file(node, file)?.reader())
    }

    fn node_mut(&mut self, node: &str) -> Result<&mut Node> {
        self.nodes
            .get_mut(node)
            .ok_or_else(|| ArchiveError::NodeNotFound(node.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> WorkflowArchive {
        let mut archive = WorkflowArchive::new("wf", "<graph/>").unwrap();
        archive.add_node("jobA").unwrap();
        archive.add_file("jobA", "run.sh", "echo hi").unwrap();
        archive
    }

    #[test]
    fn add_then_get() {
        let mut archive = sample();
        archive.add_file("jobA", "run.sh", "echo bye").unwrap();

        assert_eq!(archive.get_file("jobA", "run.sh").unwrap().as_ref(), b"echo bye");
    }

    #[test]
    fn add_file_does_not_create_nodes() {
        let mut archive = sample();
        let before = archive.clone();

        let err = archive.add_file("ghost", "run.sh", "x").unwrap_err();

        assert!(err.is_not_found());
        assert!(matches!(err, ArchiveError::NodeNotFound(ref n) if n == "ghost"));
        assert_eq!(archive, before);
    }

    #[test]
    fn add_file_from_reader_reads_to_end() {
        let mut archive = sample();
        archive
            .add_file_from_reader("jobA", "run.py", &b"print(1)"[..])
            .unwrap();

        assert_eq!(archive.get_file("jobA", "run.py").unwrap().as_ref(), b"print(1)");
    }

    #[test]
    fn failed_read_leaves_archive_untouched() {
        struct Broken;
        impl Read for Broken {
            fn read(&mut self, _: &mut [u8]) -> std::io::Result<usize> {
                Err(std::io::Error::other("truncated"))
            }
        }

        let mut archive = sample();
        let before = archive.clone();

        let err = archive
            .add_file_from_reader("jobA", "run.sh", Broken)
            .unwrap_err();

        assert!(matches!(err, ArchiveError::Io(_)));
        assert_eq!(archive, before);
    }

    #[test]
    fn get_file_reports_what_is_missing() {
        let archive = sample();

        assert!(matches!(
            archive.get_file("ghost", "run.sh"),
            Err(ArchiveError::NodeNotFound(_))
        ));
        assert!(matches!(
            archive.get_file("jobA", "other.sh"),
            Err(ArchiveError::FileNotFound { .. })
        ));
    }

    #[test]
    fn file_reader_yields_content() {
        let archive = sample();
        let mut out = String::new();
        archive
            .file_reader("jobA", "run.sh")
            .unwrap()
            .read_to_string(&mut out)
            .unwrap();

        assert_eq!(out, "echo hi");
        // reading does not consume the stored copy
        assert_eq!(archive.get_file("jobA", "run.sh").unwrap().as_ref(), b"echo hi");
    }

    #[test]
    fn add_node_is_idempotent() {
        let mut archive = sample();

        assert!(!archive.add_node("jobA").unwrap());
        assert!(archive.add_node("jobB").unwrap());
        assert_eq!(archive.node_names().collect::<Vec<_>>(), ["jobA", "jobB"]);
        // existing files survive a repeated add_node
        assert!(archive.get_file("jobA", "run.sh").is_ok());
    }

    #[test]
    fn names_must_be_single_segments() {
        assert!(matches!(
            WorkflowArchive::new("a/b", "<graph/>"),
            Err(ArchiveError::InvalidName(ref n)) if n == "a/b"
        ));
        assert!(matches!(
            WorkflowArchive::new("", "<graph/>"),
            Err(ArchiveError::InvalidName(_))
        ));

        let mut archive = sample();
        let before = archive.clone();

        let err = archive.add_node("").unwrap_err();
        assert!(matches!(err, ArchiveError::InvalidName(_)));
        assert!(err.is_format());

        let err = archive.add_node("jobB/sub").unwrap_err();
        assert!(matches!(err, ArchiveError::InvalidName(_)));

        let err = archive.add_file("jobA", "sub/run.sh", "x").unwrap_err();
        assert!(matches!(err, ArchiveError::InvalidName(ref n) if n == "sub/run.sh"));

        let err = archive
            .add_file_from_reader("jobA", "", &b"x"[..])
            .unwrap_err();
        assert!(matches!(err, ArchiveError::InvalidName(_)));

        let err = archive.set_base_name("x/y").unwrap_err();
        assert!(matches!(err, ArchiveError::InvalidName(_)));

        assert_eq!(archive, before);
    }

    #[test]
    fn set_base_name_replaces_the_directory() {
        let mut archive = sample();
        archive.set_base_name("renamed").unwrap();

        assert_eq!(archive.base_name(), Some("renamed"));
        let decoded = WorkflowArchive::from_bytes(archive.to_bytes().unwrap()).unwrap();
        assert_eq!(decoded, archive);
    }
}
