//! Configuration file loading for the CLI
//!
//! This module handles finding and loading TOML configuration files
//! from various locations (explicit path, local directory, system directory).

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use directories::ProjectDirs;
use log::{debug, info};
use thiserror::Error;

use lexigraph::{LexigraphError, config::AppConfig};

/// Configuration-related errors for CLI
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse TOML configuration {}: {message}", path.display())]
    Parse { path: PathBuf, message: String },

    #[error("Missing configuration file: {}", path.display())]
    MissingFile { path: PathBuf },
}

impl From<ConfigError> for LexigraphError {
    fn from(err: ConfigError) -> Self {
        let kind = match err {
            ConfigError::Parse { .. } => io::ErrorKind::InvalidData,
            ConfigError::MissingFile { .. } => io::ErrorKind::NotFound,
        };
        LexigraphError::Io(io::Error::new(kind, err.to_string()))
    }
}

/// Find and load configuration from various locations
///
/// Search order:
/// 1. Explicit path if provided
/// 2. Local project directory (lexigraph/config.toml)
/// 3. Platform-specific config directory
/// 4. Default config if none found
///
/// # Errors
///
/// Returns error if:
/// - Explicit path is provided but file doesn't exist
/// - Config file exists but cannot be parsed
pub fn load_config(explicit_path: Option<impl AsRef<Path>>) -> Result<AppConfig, LexigraphError> {
    if let Some(path) = explicit_path {
        let path = path.as_ref();
        info!(path = path.display().to_string(); "Loading configuration from explicit path");
        return load_config_file(path);
    }

    let local_config = Path::new("lexigraph/config.toml");
    if local_config.exists() {
        info!(path = local_config.display().to_string(); "Loading configuration from local path");
        return load_config_file(local_config);
    }

    if let Some(proj_dirs) = ProjectDirs::from("com", "lexigraph", "lexigraph") {
        let system_config = proj_dirs.config_dir().join("config.toml");

        if system_config.exists() {
            info!(path = system_config.display().to_string(); "Loading configuration from system path");
            return load_config_file(system_config);
        }

        debug!(path = system_config.display().to_string(); "System configuration file not found");
    } else {
        debug!("Could not determine platform-specific config directory");
    }

    debug!("No configuration file found, using default configuration");
    Ok(AppConfig::default())
}

/// Load configuration from a TOML file
///
/// # Errors
///
/// Returns error if the file is missing, unreadable or not valid TOML.
fn load_config_file(path: impl AsRef<Path>) -> Result<AppConfig, LexigraphError> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(ConfigError::MissingFile {
            path: path.to_path_buf(),
        }
        .into());
    }

    let content = fs::read_to_string(path)?;

    let config: AppConfig = toml::from_str(&content).map_err(|e| ConfigError::Parse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::*;

    fn config_file(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_explicit_file_is_loaded() {
        let file = config_file(
            r##"
[semantic]
max_words = 4

[semantic.local_reasoner]
enabled = false

[layout]
iterations = 25
seed = 9

[render]
original_color = "#112233"
"##,
        );

        let config = load_config(Some(file.path())).unwrap();

        assert_eq!(config.semantic().max_words(), 4);
        assert!(!config.semantic().local_reasoner().enabled());
        assert!(config.semantic().encyclopedia().enabled());
        assert_eq!(config.layout().iterations(), 25);
        assert_eq!(config.layout().seed(), Some(9));
        assert_eq!(config.layout().width(), 1200.0);
    }

    #[test]
    fn test_missing_explicit_file() {
        let err = load_config(Some("/definitely/not/here.toml")).unwrap_err();
        assert!(matches!(err, LexigraphError::Io(e) if e.kind() == io::ErrorKind::NotFound));
    }

    #[test]
    fn test_invalid_toml() {
        let file = config_file("[layout\nwidth = ");
        let err = load_config(Some(file.path())).unwrap_err();
        assert!(matches!(err, LexigraphError::Io(e) if e.kind() == io::ErrorKind::InvalidData));
    }
}
