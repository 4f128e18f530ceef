use super::{print_change, sync::find_stylesheets};
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use std::io::{self, Read};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use stylebridge_common::RealFileSystem;
use stylebridge_workspace::SyncSession;
use tracing::debug;

#[derive(Debug, Args)]
pub struct WatchArgs {
    /// Sync every watched stylesheet once before watching
    #[arg(long)]
    pub initial: bool,

    /// Poll interval in milliseconds
    #[arg(long, default_value_t = 200)]
    pub interval: u64,
}

pub fn watch(args: WatchArgs, cwd: &Path) -> Result<()> {
    let mut session = SyncSession::open(cwd, Arc::new(RealFileSystem))?
        .with_poll_interval(Duration::from_millis(args.interval));
    session.subscribe(Box::new(|_, change| print_change(change)));

    if args.initial {
        for file in find_stylesheets(session.orchestrator().filter()) {
            session.enqueue(file);
        }
        session.process_pending();
    }

    // Closing stdin (Ctrl-D) ends the session
    let stop = Arc::new(AtomicBool::new(false));
    let stdin_stop = stop.clone();
    thread::spawn(move || {
        let mut sink = Vec::new();
        let _ = io::stdin().read_to_end(&mut sink);
        debug!("stdin closed, stopping watch session");
        stdin_stop.store(true, Ordering::SeqCst);
    });

    println!(
        "{} Watching {} (Ctrl-D to stop)",
        "👀".bright_blue(),
        cwd.display()
    );
    let handled = session.run(&stop)?;
    session.stop();

    println!();
    println!("{} Handled {} changes", "✅".green(), handled);
    Ok(())
}
