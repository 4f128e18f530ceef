use crate::config::SyncConfig;
use crate::error::WorkspaceResult;
use glob::{MatchOptions, Pattern};
use std::path::{Component, Path, PathBuf};

const ALWAYS_IGNORED: &str = "node_modules";

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// Decides which paths under the project root are ingested
#[derive(Debug, Clone)]
pub struct PathFilter {
    root: PathBuf,
    watch: Vec<Pattern>,
    ignore: Vec<Pattern>,
    output_dir: PathBuf,
}

impl PathFilter {
    pub fn new(root: impl Into<PathBuf>, config: &SyncConfig) -> WorkspaceResult<Self> {
        let watch = config
            .watch_paths
            .iter()
            .map(|p| Pattern::new(p))
            .collect::<Result<Vec<_>, _>>()?;
        let ignore = config
            .ignore_paths
            .iter()
            .map(|p| Pattern::new(p))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            root: root.into(),
            watch,
            ignore,
            output_dir: PathBuf::from(&config.output_dir),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// `path` relative to the root with `/` separators
    pub fn relative(&self, path: &Path) -> String {
        let relative = path.strip_prefix(&self.root).unwrap_or(path);
        relative
            .components()
            .filter_map(|c| match c {
                Component::Normal(part) => Some(part.to_string_lossy()),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join("/")
    }

    pub fn matches(&self, path: &Path) -> bool {
        let relative = self.relative(path);
        let relative_path = Path::new(&relative);

        if relative_path
            .components()
            .any(|c| c.as_os_str() == ALWAYS_IGNORED)
        {
            return false;
        }
        if relative_path.starts_with(&self.output_dir) {
            return false;
        }
        if self
            .ignore
            .iter()
            .any(|p| p.matches_with(&relative, MATCH_OPTIONS))
        {
            return false;
        }
        self.watch
            .iter()
            .any(|p| p.matches_with(&relative, MATCH_OPTIONS))
    }

    /// Directories to hand to the OS watcher: the literal prefix of each
    /// watch pattern, deduplicated
    pub fn base_dirs(&self) -> Vec<PathBuf> {
        let mut dirs: Vec<PathBuf> = Vec::new();
        for pattern in &self.watch {
            let literal: PathBuf = Path::new(pattern.as_str())
                .components()
                .take_while(|c| !c.as_os_str().to_string_lossy().contains(['*', '?', '[']))
                .collect();
            // The last literal component of `src/app.css` is a file
            let base = if literal.as_os_str() == pattern.as_str() {
                literal.parent().map(Path::to_path_buf).unwrap_or_default()
            } else {
                literal
            };
            let dir = self.root.join(base);
            if !dirs.iter().any(|d| dir.starts_with(d)) {
                dirs.retain(|d| !d.starts_with(&dir));
                dirs.push(dir);
            }
        }
        dirs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filter(config: SyncConfig) -> PathFilter {
        PathFilter::new("/project", &config).unwrap()
    }

    #[test]
    fn test_default_patterns() {
        let f = filter(SyncConfig::default());
        assert!(f.matches(Path::new("/project/app.css")));
        assert!(f.matches(Path::new("/project/src/components/card.css")));
        assert!(!f.matches(Path::new("/project/src/app.scss")));
        assert!(!f.matches(Path::new("/project/node_modules/lib/reset.css")));
        assert!(!f.matches(Path::new("/project/src/styles/components.css")));
    }

    #[test]
    fn test_ignore_paths() {
        let f = filter(SyncConfig {
            ignore_paths: vec!["vendor/**".to_string()],
            ..Default::default()
        });
        assert!(!f.matches(Path::new("/project/vendor/grid.css")));
        assert!(f.matches(Path::new("/project/lib/grid.css")));
    }

    #[test]
    fn test_relative_uses_forward_slashes() {
        let f = filter(SyncConfig::default());
        assert_eq!(f.relative(Path::new("/project/src/app.css")), "src/app.css");
        assert_eq!(f.relative(Path::new("src/app.css")), "src/app.css");
    }

    #[test]
    fn test_base_dirs() {
        let f = filter(SyncConfig {
            watch_paths: vec![
                "styles/**/*.css".to_string(),
                "styles/extra/*.css".to_string(),
                "theme/dark.css".to_string(),
            ],
            ..Default::default()
        });
        assert_eq!(
            f.base_dirs(),
            vec![PathBuf::from("/project/styles"), PathBuf::from("/project/theme")]
        );

        let f = filter(SyncConfig::default());
        assert_eq!(f.base_dirs(), vec![PathBuf::from("/project")]);
    }

    #[test]
    fn test_invalid_pattern() {
        let result = PathFilter::new(
            "/project",
            &SyncConfig {
                watch_paths: vec!["[".to_string()],
                ..Default::default()
            },
        );
        assert!(result.is_err());
    }
}
