use crate::config::SyncConfig;
use crate::error::WorkspaceResult;
use crate::store::DocumentStore;
use std::path::{Path, PathBuf};
use stylebridge_common::FileSystem;
use stylebridge_compiler_css::{generate, write_stylesheets};
use tracing::{info, instrument};

/// Canvas → CSS: load the persisted document, generate and write every
/// enabled stylesheet under the output directory. Errors propagate.
#[instrument(skip(config, fs), fields(root = %root.display()))]
pub fn generate_from_canvas(
    root: &Path,
    config: &SyncConfig,
    fs: &dyn FileSystem,
) -> WorkspaceResult<Vec<PathBuf>> {
    let doc = DocumentStore::new(config.canvas_path(root)).load(fs)?;
    let sheets = generate(&doc, &config.generate_options())?;
    let written = write_stylesheets(fs, &config.output_path(root), &sheets)?;
    info!(files = written.len(), "Generated stylesheets from canvas");
    Ok(written)
}
