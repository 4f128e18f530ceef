mod commands;

use clap::{Parser, Subcommand};
use colored::Colorize;
use commands::{generate, init, sync, watch, GenerateArgs, InitArgs, SyncArgs, WatchArgs};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// stylebridge - keep a design canvas and your stylesheets in sync
#[derive(Parser, Debug)]
#[command(name = "stylebridge")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Log debug output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write a default stylebridge.config.json
    Init(InitArgs),

    /// Ingest stylesheets into the canvas document once
    Sync(SyncArgs),

    /// Generate stylesheets from the canvas document
    Generate(GenerateArgs),

    /// Watch stylesheets and sync every change
    Watch(WatchArgs),
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = std::env::current_dir()
        .map_err(anyhow::Error::from)
        .and_then(|cwd| run(cli.command, cwd));

    if let Err(err) = result {
        eprintln!();
        eprintln!("{} {}", "Error:".red().bold(), err);
        eprintln!();
        std::process::exit(1);
    }
}

fn run(command: Command, cwd: PathBuf) -> anyhow::Result<()> {
    match command {
        Command::Init(args) => init(args, &cwd),
        Command::Sync(args) => sync(args, &cwd),
        Command::Generate(args) => generate(args, &cwd),
        Command::Watch(args) => watch(args, &cwd),
    }
}
