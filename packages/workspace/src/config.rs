use crate::error::{WorkspaceError, WorkspaceResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use stylebridge_common::FileSystem;
use stylebridge_compiler_css::GenerateOptions;
use stylebridge_editor::UpdateOptions;
use tracing::debug;

pub const CONFIG_FILE_NAME: &str = "stylebridge.config.json";

/// Sync configuration file format
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SyncConfig {
    /// Where generated stylesheets are written, relative to the project root
    pub output_dir: String,
    pub generate_tokens: bool,
    pub generate_components: bool,
    pub generate_layouts: bool,
    pub generate_utilities: bool,
    pub generate_scss: bool,
    /// Glob patterns of stylesheets to ingest
    pub watch_paths: Vec<String>,
    /// Extra exclusions; `node_modules` is always excluded
    pub ignore_paths: Vec<String>,
    pub canvas_data_path: String,
    /// Persist the updated document after each change
    pub update_canvas: bool,
    pub preserve_positions: bool,
    pub proximity_threshold: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placement_seed: Option<u64>,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            output_dir: "src/styles".to_string(),
            generate_tokens: true,
            generate_components: true,
            generate_layouts: true,
            generate_utilities: true,
            generate_scss: false,
            watch_paths: vec!["**/*.css".to_string()],
            ignore_paths: Vec::new(),
            canvas_data_path: ".stylebridge/canvas.json".to_string(),
            update_canvas: true,
            preserve_positions: true,
            proximity_threshold: 50.0,
            placement_seed: None,
        }
    }
}

impl SyncConfig {
    /// Load `stylebridge.config.json` from `root`; defaults when absent
    pub fn load(fs: &dyn FileSystem, root: &Path) -> WorkspaceResult<Self> {
        let path = root.join(CONFIG_FILE_NAME);
        if !fs.exists(&path) {
            debug!(path = %path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }

        let content = fs.read_to_string(&path).map_err(|source| WorkspaceError::Read {
            path: path.clone(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| WorkspaceError::Config { path, source })
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        let mut json = serde_json::to_string_pretty(self)?;
        json.push('\n');
        Ok(json)
    }

    pub fn canvas_path(&self, root: &Path) -> PathBuf {
        root.join(&self.canvas_data_path)
    }

    pub fn output_path(&self, root: &Path) -> PathBuf {
        root.join(&self.output_dir)
    }

    pub fn generate_options(&self) -> GenerateOptions {
        GenerateOptions {
            generate_tokens: self.generate_tokens,
            generate_components: self.generate_components,
            generate_layouts: self.generate_layouts,
            generate_utilities: self.generate_utilities,
            generate_scss: self.generate_scss,
        }
    }

    pub fn update_options(&self) -> UpdateOptions {
        UpdateOptions {
            proximity_threshold: self.proximity_threshold,
            preserve_positions: self.preserve_positions,
            placement_seed: self.placement_seed,
        }
    }
}
