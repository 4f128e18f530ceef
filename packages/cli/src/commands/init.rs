use anyhow::Result;
use clap::Args;
use colored::Colorize;
use std::fs;
use std::path::Path;
use stylebridge_workspace::{SyncConfig, CONFIG_FILE_NAME};

#[derive(Debug, Args)]
pub struct InitArgs {
    /// Output directory for generated stylesheets
    #[arg(short, long, default_value = "src/styles")]
    pub out_dir: String,

    /// Also generate SCSS token variables
    #[arg(long)]
    pub scss: bool,

    /// Force overwrite existing config
    #[arg(short, long)]
    pub force: bool,
}

pub fn init(args: InitArgs, cwd: &Path) -> Result<()> {
    let config_path = cwd.join(CONFIG_FILE_NAME);

    if config_path.exists() && !args.force {
        println!(
            "{} {} already exists",
            "⚠️".yellow(),
            CONFIG_FILE_NAME.bright_white()
        );
        println!("Use --force to overwrite");
        return Ok(());
    }

    println!("{}", "📝 Initializing stylebridge...".bright_blue().bold());

    let config = SyncConfig {
        output_dir: args.out_dir.clone(),
        generate_scss: args.scss,
        ..Default::default()
    };
    fs::write(&config_path, config.to_json()?)?;
    println!("  {} Created {}", "✓".green(), CONFIG_FILE_NAME);

    let canvas_dir = config
        .canvas_path(cwd)
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| cwd.to_path_buf());
    if !canvas_dir.exists() {
        fs::create_dir_all(&canvas_dir)?;
        println!("  {} Created {}/", "✓".green(), canvas_dir.display());
    }

    println!();
    println!("{}", "✅ Project initialized!".green().bold());
    println!();
    println!("Next steps:");
    println!("  1. Run: stylebridge sync");
    println!("  2. Run: stylebridge generate");
    println!("  3. Check output in {}/", args.out_dir);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use stylebridge_common::RealFileSystem;

    #[test]
    fn test_init_writes_config_once() {
        let dir = tempfile::tempdir().unwrap();
        let args = || InitArgs {
            out_dir: "css/out".to_string(),
            scss: true,
            force: false,
        };

        init(args(), dir.path()).unwrap();
        let config = SyncConfig::load(&RealFileSystem, dir.path()).unwrap();
        assert_eq!(config.output_dir, "css/out");
        assert!(config.generate_scss);
        assert!(dir.path().join(".stylebridge").is_dir());

        // A second run without --force leaves the file alone
        fs::write(dir.path().join(CONFIG_FILE_NAME), "{}").unwrap();
        init(args(), dir.path()).unwrap();
        assert_eq!(
            fs::read_to_string(dir.path().join(CONFIG_FILE_NAME)).unwrap(),
            "{}"
        );
    }
}
