use bytes::Bytes;
use std::collections::BTreeMap;

/// One job of the workflow and its script.
///
/// The workflow format expects exactly one file per node, but the files are
/// kept in a map keyed by file name: an archive carrying two differently
/// named files for one node decodes with both of them, and both are written
/// back on encode. Callers that rely on the single-script convention should
/// check [`Node::file_names`] themselves.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Node {
    name: String,
    files: BTreeMap<String, Bytes>,
}

impl Node {
    /// Create a node without any file.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            files: BTreeMap::new(),
        }
    }

    /// Node name, the second path segment.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Store `content` under `file`, replacing any previous content.
    pub fn insert_file(&mut self, file: impl Into<String>, content: impl Into<Bytes>) {
        self.files.insert(file.into(), content.into());
    }

    /// Cheap clone of the stored content.
    pub fn file(&self, file: &str) -> Option<Bytes> {
        self.files.get(file).cloned()
    }

    /// File names in sorted order.
    pub fn file_names(&self) -> impl Iterator<Item = &str> {
        self.files.keys().map(String::as_str)
    }

    /// `(file name, content)` pairs in sorted order.
    pub fn files(&self) -> impl Iterator<Item = (&str, &Bytes)> {
        self.files.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// True until a file has been stored.
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn last_write_wins() {
        let mut node = Node::new("jobA");
        assert!(node.is_empty());

        node.insert_file("run.sh", "echo one");
        node.insert_file("run.sh", "echo two");

        assert_eq!(node.file("run.sh").unwrap(), Bytes::from_static(b"echo two"));
        assert_eq!(node.file_names().collect::<Vec<_>>(), ["run.sh"]);
    }

    #[test]
    fn distinct_names_are_kept_side_by_side() {
        let mut node = Node::new("jobA");
        node.insert_file("z.sh", "z");
        node.insert_file("a.sh", "a");

        assert_eq!(node.file_names().collect::<Vec<_>>(), ["a.sh", "z.sh"]);
        assert!(node.file("missing").is_none());
    }
}
