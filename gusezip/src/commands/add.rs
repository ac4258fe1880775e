use anyhow::{Context, Result};
use std::{fs::File, io::BufReader, path::Path};
use tracing::info;

use guse_archive::WorkflowArchive;

/// Replace (or add) `file` on an existing `node` with the contents of `from`,
/// then write the archive to `out` or back over `path`.
pub fn add_file(
    path: &Path,
    node: &str,
    file: &str,
    from: &Path,
    out: Option<&Path>,
) -> Result<()> {
    let mut archive =
        WorkflowArchive::open(path).with_context(|| format!("decode {}", path.display()))?;

    let src = File::open(from).with_context(|| format!("open {}", from.display()))?;
    archive
        .add_file_from_reader(node, file, BufReader::new(src))
        .with_context(|| format!("add {} as {node}/{file}", from.display()))?;

    let out = out.unwrap_or(path);
    archive
        .save(out)
        .with_context(|| format!("write {}", out.display()))?;

    info!(
        "added {} as {node}/{file} -> {}",
        from.display(),
        out.display()
    );
    Ok(())
}
