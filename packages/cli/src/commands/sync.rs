use super::print_change;
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use stylebridge_common::RealFileSystem;
use stylebridge_evaluator::{parse_source, IngestError};
use stylebridge_parser::error::pretty;
use stylebridge_workspace::{PathFilter, SyncSession};
use tracing::debug;
use walkdir::WalkDir;

#[derive(Debug, Args)]
pub struct SyncArgs {
    /// Stylesheets to ingest (defaults to every watched file)
    pub files: Vec<PathBuf>,
}

pub fn sync(args: SyncArgs, cwd: &Path) -> Result<()> {
    let mut session = SyncSession::open(cwd, Arc::new(RealFileSystem))?;

    let files = if args.files.is_empty() {
        find_stylesheets(session.orchestrator().filter())
    } else {
        args.files
            .iter()
            .map(|f| if f.is_absolute() { f.clone() } else { cwd.join(f) })
            .collect()
    };

    if files.is_empty() {
        println!("{}", "⚠️  No stylesheets found".yellow());
        return Ok(());
    }

    println!("{}", "🔄 Syncing stylesheets...".bright_blue().bold());
    for file in &files {
        session.enqueue(file);
    }

    let changes = session.process_pending();
    let mut error_count = 0;
    for change in &changes {
        print_change(change);
        if change.is_error() {
            error_count += 1;
            if let Some(report) = explain_parse_error(&cwd.join(&change.file_path)) {
                eprintln!("{}", report);
            }
        }
    }

    println!();
    if error_count == 0 {
        println!("{} Synced {} files", "✅".green(), changes.len());
    } else {
        println!(
            "{} Synced {} files, {} errors",
            "⚠️".yellow(),
            changes.len() - error_count,
            error_count
        );
    }

    Ok(())
}

/// Every stylesheet under the root that the watch patterns accept
pub(crate) fn find_stylesheets(filter: &PathFilter) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(filter.root())
        .follow_links(true)
        .into_iter()
        .filter_entry(|e| e.file_name() != "node_modules")
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file() && filter.matches(e.path()))
        .map(|e| e.into_path())
        .collect();
    files.sort();
    debug!(count = files.len(), root = %filter.root().display(), "Discovered stylesheets");
    files
}

/// Source-annotated report for a stylesheet that fails to parse
fn explain_parse_error(path: &Path) -> Option<String> {
    let source = fs::read_to_string(path).ok()?;
    match parse_source(&source, path) {
        Err(IngestError::Parse {
            source_text,
            source: error,
            ..
        }) => {
            let name = path
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or("unknown");
            Some(pretty::format_error(&error, name, &source_text))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stylebridge_workspace::SyncConfig;

    #[test]
    fn test_find_stylesheets_respects_filter() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("node_modules/lib")).unwrap();
        fs::create_dir_all(root.join("src/styles")).unwrap();
        fs::write(root.join("app.css"), "").unwrap();
        fs::write(root.join("node_modules/lib/x.css"), "").unwrap();
        fs::write(root.join("src/styles/components.css"), "").unwrap();
        fs::write(root.join("src/readme.md"), "").unwrap();

        let filter = PathFilter::new(root, &SyncConfig::default()).unwrap();
        assert_eq!(find_stylesheets(&filter), vec![root.join("app.css")]);
    }

    #[test]
    fn test_explain_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let broken = dir.path().join("broken.css");
        fs::write(&broken, ".a { color: red;").unwrap();
        assert!(explain_parse_error(&broken).is_some());

        let fine = dir.path().join("fine.css");
        fs::write(&fine, ".a { color: red; }").unwrap();
        assert!(explain_parse_error(&fine).is_none());
    }
}
