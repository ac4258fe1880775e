use anyhow::{Context, Result};
use std::{path::Path, time::Instant};
use tracing::info;

use guse_archive::WorkflowArchive;

/// Decode `path` and write it back out in canonical entry order.
pub fn repack(path: &Path, out: &Path) -> Result<()> {
    let start = Instant::now();

    let archive =
        WorkflowArchive::open(path).with_context(|| format!("decode {}", path.display()))?;
    archive
        .save(out)
        .with_context(|| format!("write {}", out.display()))?;

    info!(
        "repacked {} -> {} ({} nodes) in {:.1?}",
        path.display(),
        out.display(),
        archive.node_names().count(),
        start.elapsed()
    );
    Ok(())
}
