//! Configuration file handling for the CLI layer.
//!
//! A config file tunes rating thresholds and batch exclude patterns. The
//! core itself never reads configuration from disk; the CLI resolves a
//! `FileConfig` and passes the thresholds down as an `AnalyzeConfig`.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::analysis::{AnalyzeConfig, RatingThresholds};

/// Config file names searched for next to the analyzed path.
pub const DEFAULT_CONFIG_NAMES: &[&str] = &["codescope.yaml", ".codescope.yaml"];

/// Top-level config file schema.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct FileConfig {
    /// Rating thresholds over aggregate complexity.
    #[serde(default)]
    pub rating: Option<RatingThresholds>,
    /// Glob patterns for paths to exclude from directory scans
    /// (e.g., "**/build/**", "**/migrations/**").
    #[serde(default)]
    pub excluded_paths: Vec<String>,
}

impl FileConfig {
    /// Parse a config from a YAML file.
    pub fn parse_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: FileConfig = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Resolve configuration: an explicit path wins; otherwise the default
    /// names are searched in `base` and its parent; otherwise defaults.
    pub fn load_or_discover(
        explicit: Option<&Path>,
        base: &Path,
    ) -> anyhow::Result<Self> {
        if let Some(path) = explicit {
            return Self::parse_file(path);
        }

        let search_dirs = [Some(base), base.parent()];
        for dir in search_dirs.into_iter().flatten() {
            for name in DEFAULT_CONFIG_NAMES {
                let candidate = dir.join(name);
                if candidate.is_file() {
                    return Self::parse_file(&candidate);
                }
            }
        }

        Ok(Self::default())
    }

    /// The analysis configuration carried by this file.
    pub fn analyze_config(&self) -> AnalyzeConfig {
        AnalyzeConfig {
            thresholds: self.rating.unwrap_or_default(),
        }
    }

    /// Compile the exclude patterns into one matcher.
    pub fn exclude_matcher(&self) -> anyhow::Result<globset::GlobSet> {
        let mut builder = globset::GlobSetBuilder::new();
        for pattern in &self.excluded_paths {
            builder.add(globset::Glob::new(pattern)?);
        }
        Ok(builder.build()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_parse_full_config() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("codescope.yaml");
        fs::write(
            &path,
            "rating:\n  simple_below: 5\n  moderate_max: 20\nexcluded_paths:\n  - \"**/build/**\"\n",
        )
        .unwrap();

        let config = FileConfig::parse_file(&path).unwrap();
        let thresholds = config.rating.unwrap();
        assert_eq!(thresholds.simple_below, 5);
        assert_eq!(thresholds.moderate_max, 20);
        assert_eq!(config.excluded_paths, vec!["**/build/**"]);
    }

    #[test]
    fn test_partial_rating_uses_field_defaults() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("codescope.yaml");
        fs::write(&path, "rating:\n  simple_below: 3\n").unwrap();

        let config = FileConfig::parse_file(&path).unwrap();
        let thresholds = config.rating.unwrap();
        assert_eq!(thresholds.simple_below, 3);
        assert_eq!(thresholds.moderate_max, RatingThresholds::default().moderate_max);
    }

    #[test]
    fn test_discover_in_base_dir() {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join(".codescope.yaml"),
            "excluded_paths:\n  - \"**/skip/**\"\n",
        )
        .unwrap();

        let config = FileConfig::load_or_discover(None, temp.path()).unwrap();
        assert_eq!(config.excluded_paths, vec!["**/skip/**"]);
    }

    #[test]
    fn test_missing_config_falls_back_to_defaults() {
        let temp = TempDir::new().unwrap();
        let config = FileConfig::load_or_discover(None, temp.path()).unwrap();
        assert!(config.rating.is_none());
        assert!(config.excluded_paths.is_empty());
        assert_eq!(
            config.analyze_config().thresholds,
            RatingThresholds::default()
        );
    }

    #[test]
    fn test_exclude_matcher() {
        let config = FileConfig {
            rating: None,
            excluded_paths: vec!["**/vendored/**".to_string()],
        };
        let matcher = config.exclude_matcher().unwrap();
        assert!(matcher.is_match("pkg/vendored/mod.py"));
        assert!(!matcher.is_match("pkg/src/mod.py"));
    }
}
