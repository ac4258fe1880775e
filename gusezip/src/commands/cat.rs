use anyhow::{Context, Result};
use std::{
    fs::File,
    io::{self, BufWriter, Write},
    path::Path,
};
use tracing::info;

use guse_archive::WorkflowArchive;

fn open_out(out_path: Option<&Path>) -> Result<Box<dyn Write>> {
    Ok(match out_path {
        Some(p) => Box::new(BufWriter::new(
            File::create(p).with_context(|| format!("create {}", p.display()))?,
        )),
        None => Box::new(BufWriter::new(io::stdout())),
    })
}

/// Write one node script to `out_path` (stdout if unset).
pub fn cat_file(path: &Path, node: &str, file: &str, out_path: Option<&Path>) -> Result<()> {
    info!("cat input={} node={node} file={file}", path.display());

    let archive =
        WorkflowArchive::open(path).with_context(|| format!("decode {}", path.display()))?;
    let content = archive
        .get_file(node, file)
        .with_context(|| format!("lookup {node}/{file}"))?;

    let mut out = open_out(out_path)?;
    out.write_all(&content)?;
    out.flush().context("flush output")
}

/// Write the raw `workflow.xml` to `out_path` (stdout if unset).
pub fn cat_manifest(path: &Path, out_path: Option<&Path>) -> Result<()> {
    info!("manifest input={}", path.display());

    let archive =
        WorkflowArchive::open(path).with_context(|| format!("decode {}", path.display()))?;

    let mut out = open_out(out_path)?;
    out.write_all(archive.manifest())?;
    out.flush().context("flush output")
}
