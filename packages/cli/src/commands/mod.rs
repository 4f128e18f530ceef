pub mod generate;
pub mod init;
pub mod sync;
pub mod watch;

pub use generate::{generate, GenerateArgs};
pub use init::{init, InitArgs};
pub use sync::{sync, SyncArgs};
pub use watch::{watch, WatchArgs};

use colored::Colorize;
use stylebridge_workspace::ChangeDescriptor;

/// One status line per processed change
pub(crate) fn print_change(change: &ChangeDescriptor) {
    match (&change.error, change.counts) {
        (Some(error), _) => {
            eprintln!("  {} {} - {}", "✗".red(), change.file_path, error.red());
        }
        (None, Some(counts)) => {
            println!(
                "  {} {} ({} kept, {} updated, {} added, {} removed)",
                "✓".green(),
                change.file_path,
                counts.kept,
                counts.updated,
                counts.added,
                counts.removed
            );
        }
        (None, None) => println!("  {} {}", "✓".green(), change.file_path),
    }
    for warning in &change.warnings {
        println!("    {} {}", "⚠️".yellow(), warning);
    }
}
