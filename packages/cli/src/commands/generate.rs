use anyhow::Result;
use clap::Args;
use colored::Colorize;
use std::path::Path;
use stylebridge_common::RealFileSystem;
use stylebridge_workspace::{generate_from_canvas, SyncConfig};

#[derive(Debug, Args)]
pub struct GenerateArgs {
    /// Output directory (overrides outputDir from the config)
    #[arg(short, long)]
    pub out_dir: Option<String>,

    /// Also generate SCSS token variables
    #[arg(long)]
    pub scss: bool,
}

pub fn generate(args: GenerateArgs, cwd: &Path) -> Result<()> {
    let mut config = SyncConfig::load(&RealFileSystem, cwd)?;
    if let Some(out_dir) = args.out_dir {
        config.output_dir = out_dir;
    }
    config.generate_scss |= args.scss;

    println!("{}", "🎨 Generating stylesheets...".bright_blue().bold());
    let written = generate_from_canvas(cwd, &config, &RealFileSystem)?;

    for path in &written {
        let shown = path.strip_prefix(cwd).unwrap_or(path);
        println!("  {} {}", "✓".green(), shown.display());
    }

    println!();
    println!(
        "{} Generated {} files in {}/",
        "✅".green(),
        written.len(),
        config.output_dir
    );
    Ok(())
}
