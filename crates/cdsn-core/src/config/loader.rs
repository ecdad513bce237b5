//! Configuration file discovery and loading

use super::cdsn_config::CdsnConfig;
use crate::error::NotationError;
use crate::result::Result;
use std::path::{Path, PathBuf};

/// Configuration file names, in priority order.
pub const CONFIG_FILE_NAMES: [&str; 5] = [
    ".cdsnrc.toml",
    ".cdsnrc.json",
    "cdsn.yaml",
    "cdsn.yml",
    "cdsn.json",
];

/// Configuration loader for discovering and loading config files
pub struct ConfigLoader;

impl ConfigLoader {
    /// Auto-discover a config file by walking up from `start_path`
    ///
    /// Each directory is searched for the names in [`CONFIG_FILE_NAMES`]
    /// before moving to its parent, until the filesystem root.
    pub fn auto_discover(start_path: &Path) -> Result<Option<PathBuf>> {
        let mut current = start_path
            .canonicalize()
            .map_err(|e| NotationError::config_error(format!("Invalid path: {e}")))?;

        loop {
            for filename in &CONFIG_FILE_NAMES {
                let config_path = current.join(filename);
                if config_path.is_file() {
                    tracing::debug!("Found config: {}", config_path.display());
                    return Ok(Some(config_path));
                }
            }

            match current.parent() {
                Some(parent) => current = parent.to_path_buf(),
                None => break,
            }
        }

        Ok(None)
    }

    /// Load configuration from a specific file
    pub fn load_from_file(path: &Path) -> Result<CdsnConfig> {
        CdsnConfig::load(path).map_err(|e| {
            NotationError::config_error(format!(
                "Failed to load config from '{}': {}",
                path.display(),
                e
            ))
        })
    }

    /// Load config from `custom_path`, or discover one from `start_dir`
    ///
    /// Discovery finding nothing is not an error; the defaults are used.
    pub fn load(custom_path: Option<&Path>, start_dir: Option<&Path>) -> Result<CdsnConfig> {
        if let Some(path) = custom_path {
            if !path.exists() {
                return Err(NotationError::config_error(format!(
                    "Config file not found: {}",
                    path.display()
                )));
            }
            return Self::load_from_file(path);
        }

        let search_dir = start_dir.unwrap_or_else(|| Path::new("."));
        match Self::auto_discover(search_dir)? {
            Some(path) => Self::load_from_file(&path),
            None => {
                tracing::debug!("No config file found, using defaults");
                Ok(CdsnConfig::default())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use std::fs;
    use tempfile::TempDir;

    fn create_temp_config(dir: &Path, filename: &str, content: &str) -> PathBuf {
        let path = dir.join(filename);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_load_from_file_toml() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = create_temp_config(
            temp_dir.path(),
            ".cdsnrc.toml",
            "[formatter]\nindentSize = 4\n",
        );

        let config = ConfigLoader::load_from_file(&config_path).unwrap();
        assert_eq!(config.indent_size(), 4);
        assert_eq!(config.queue_capacity(), 16);
    }

    #[test]
    fn test_load_from_file_yaml() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = create_temp_config(
            temp_dir.path(),
            "cdsn.yaml",
            "scanner:\n  queueCapacity: 8\nanalyzer:\n  delimiterName: punctuation\n",
        );

        let config = ConfigLoader::load_from_file(&config_path).unwrap();
        assert_eq!(config.queue_capacity(), 8);
        assert_eq!(config.delimiter_name(), "punctuation");
    }

    #[test]
    fn test_auto_discover() {
        let temp_dir = TempDir::new().unwrap();
        let nested = temp_dir.path().join("grammars/nested");
        fs::create_dir_all(&nested).unwrap();
        create_temp_config(temp_dir.path(), "cdsn.json", r#"{"formatter": {"indentSize": 3}}"#);

        let found = ConfigLoader::auto_discover(&nested).unwrap();
        assert!(found.is_some_and(|path| path.ends_with("cdsn.json")));

        let config = ConfigLoader::load(None, Some(&nested)).unwrap();
        assert_eq!(config.indent_size(), 3);
    }

    #[test]
    fn test_dotfile_takes_priority() {
        let temp_dir = TempDir::new().unwrap();
        create_temp_config(temp_dir.path(), "cdsn.json", r#"{"formatter": {"indentSize": 3}}"#);
        create_temp_config(temp_dir.path(), ".cdsnrc.toml", "[formatter]\nindentSize = 5\n");

        let config = ConfigLoader::load(None, Some(temp_dir.path())).unwrap();
        assert_eq!(config.indent_size(), 5);
    }

    #[test]
    fn test_load_nonexistent_file() {
        let result = ConfigLoader::load(Some(Path::new("nonexistent.toml")), None);
        assert_eq!(result.unwrap_err().kind(), ErrorKind::Config);
    }

    #[test]
    fn test_invalid_content_is_a_config_error() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = create_temp_config(temp_dir.path(), "cdsn.json", "{ not json");
        let error = ConfigLoader::load_from_file(&config_path).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Config);
    }

    #[test]
    fn test_unsupported_extension() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = create_temp_config(temp_dir.path(), "cdsn.ini", "indent=2");
        assert!(ConfigLoader::load_from_file(&config_path).is_err());
    }
}
