//! Per-store configuration, read from the marker file

use serde::Deserialize;
use std::path::Path;

/// Configuration stored in a store's marker file.
///
/// The marker is a TOML document. A freshly initialized store writes it
/// empty, so every field must have a default.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct StoreConfig {
    /// Whether the scanner follows symlinked directories
    #[serde(default)]
    pub follow_symlinks: bool,
}

impl StoreConfig {
    /// Read a marker file. Unknown keys are ignored.
    pub fn load(path: &Path) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: StoreConfig = toml::from_str(&content)
            .map_err(|e| crate::StoreError::Config(format!("{}: {}", path.display(), e)))?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_empty_marker_is_default_config() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("tag.conf");
        std::fs::write(&path, "").unwrap();

        let config = StoreConfig::load(&path).unwrap();
        assert_eq!(config, StoreConfig::default());
        assert!(!config.follow_symlinks);
    }

    #[test]
    fn test_follow_symlinks_enabled() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("tag.conf");
        std::fs::write(&path, "follow_symlinks = true\nunknown_key = 1\n").unwrap();

        let config = StoreConfig::load(&path).unwrap();
        assert!(config.follow_symlinks);
    }

    #[test]
    fn test_malformed_config_is_config_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("tag.conf");
        std::fs::write(&path, "follow_symlinks = \"maybe\"").unwrap();

        let err = StoreConfig::load(&path).unwrap_err();
        assert!(matches!(err, crate::StoreError::Config(_)));
        assert!(err.to_string().contains("tag.conf"));
    }
}
