use anyhow::{Context, Result};
use std::path::Path;
use tracing::info;

use guse_archive::WorkflowArchive;

#[derive(Default, Debug, Clone)]
pub struct NodeReport {
    pub name: String,
    /// (file name, size in bytes)
    pub files: Vec<(String, usize)>,
}

#[derive(Default, Debug, Clone)]
pub struct ArchiveReport {
    pub base_name: Option<String>,
    pub manifest_bytes: usize,
    pub nodes: Vec<NodeReport>,
}

impl ArchiveReport {
    pub fn from_archive(archive: &WorkflowArchive) -> Self {
        let nodes = archive
            .nodes()
            .map(|node| NodeReport {
                name: node.name().to_string(),
                files: node
                    .files()
                    .map(|(name, content)| (name.to_string(), content.len()))
                    .collect(),
            })
            .collect();

        Self {
            base_name: archive.base_name().map(str::to_string),
            manifest_bytes: archive.manifest().len(),
            nodes,
        }
    }

    /// Nodes that break the one-script-per-node convention.
    pub fn irregular_nodes(&self) -> impl Iterator<Item = &NodeReport> {
        self.nodes.iter().filter(|n| n.files.len() != 1)
    }
}

pub fn inspect_archive(path: &Path) -> Result<ArchiveReport> {
    info!("inspect input={}", path.display());
    let archive =
        WorkflowArchive::open(path).with_context(|| format!("decode {}", path.display()))?;
    let report = ArchiveReport::from_archive(&archive);

    for node in report.irregular_nodes() {
        info!(
            "node {} holds {} files, expected exactly one",
            node.name,
            node.files.len()
        );
    }
    Ok(report)
}

pub fn print_archive_report(rep: &ArchiveReport) {
    println!("base={}", rep.base_name.as_deref().unwrap_or("-"));
    println!("manifest_bytes={}", rep.manifest_bytes);
    println!("nodes={}", rep.nodes.len());
    println!();

    for node in &rep.nodes {
        if node.files.is_empty() {
            println!("{:<24} (no file)", node.name);
            continue;
        }
        for (file, size) in &node.files {
            println!("{:<24} {:<24} {:>10}", node.name, file, size);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_flags_nodes_without_exactly_one_file() {
        let mut archive = WorkflowArchive::new("wf", "<graph/>").unwrap();
        archive.add_node("ok").unwrap();
        archive.add_node("empty").unwrap();
        archive.add_node("double").unwrap();
        archive.add_file("ok", "run.sh", "echo").unwrap();
        archive.add_file("double", "a.sh", "a").unwrap();
        archive.add_file("double", "b.sh", "bb").unwrap();

        let report = ArchiveReport::from_archive(&archive);

        assert_eq!(report.base_name.as_deref(), Some("wf"));
        assert_eq!(report.manifest_bytes, 8);
        let irregular: Vec<_> = report.irregular_nodes().map(|n| n.name.as_str()).collect();
        assert_eq!(irregular, ["double", "empty"]);
        assert_eq!(
            report.nodes[0].files,
            [("a.sh".to_string(), 1), ("b.sh".to_string(), 2)]
        );
    }
}
