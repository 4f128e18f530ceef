use crate::error::{CompileError, CompileResult};
use crate::GeneratedStylesheets;
use std::path::{Path, PathBuf};
use stylebridge_common::{write_atomic, FileSystem};
use tracing::{debug, info, instrument};

/// Write every generated file under `out_dir`, creating it if needed.
///
/// Returns the written paths in file-name order. The first failure stops
/// the write and is returned.
#[instrument(skip(fs, sheets), fields(out_dir = %out_dir.display(), files = sheets.len()))]
pub fn write_stylesheets(
    fs: &dyn FileSystem,
    out_dir: &Path,
    sheets: &GeneratedStylesheets,
) -> CompileResult<Vec<PathBuf>> {
    fs.create_dir_all(out_dir).map_err(|source| CompileError::Write {
        path: out_dir.to_path_buf(),
        source,
    })?;

    let mut written = Vec::with_capacity(sheets.len());
    for (name, contents) in sheets.iter() {
        let path = out_dir.join(name);
        write_atomic(fs, &path, contents).map_err(|source| CompileError::Write {
            path: path.clone(),
            source,
        })?;
        debug!(path = %path.display(), bytes = contents.len(), "Wrote stylesheet");
        written.push(path);
    }

    info!(count = written.len(), "Stylesheets written");
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{generate, GenerateOptions};
    use stylebridge_canvas::CanvasDocument;
    use stylebridge_common::MockFileSystem;

    #[test]
    fn test_writes_into_created_directory() {
        let fs = MockFileSystem::new();
        let sheets = generate(&CanvasDocument::new(), &GenerateOptions::default()).unwrap();
        let out = Path::new("src/styles");

        let written = write_stylesheets(&fs, out, &sheets).unwrap();
        assert_eq!(written.len(), sheets.len());
        assert!(fs.created_dirs().contains(&out.to_path_buf()));
        assert_eq!(
            fs.file(&out.join("utilities.css")).as_deref(),
            sheets.get("utilities.css")
        );
        // No temp files left behind
        assert!(fs.paths().iter().all(|p| p.extension().map_or(true, |e| e != "tmp")));
    }

    #[test]
    fn test_write_failure_propagates() {
        let fs = MockFileSystem::new();
        fs.set_fail_writes(true);
        let sheets = generate(&CanvasDocument::new(), &GenerateOptions::default()).unwrap();

        let err = write_stylesheets(&fs, Path::new("out"), &sheets).unwrap_err();
        assert!(matches!(err, CompileError::Write { .. }));
    }
}
