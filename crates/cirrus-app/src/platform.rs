//! Per-user directories for config and logs.

use std::io;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum PlatformError {
    #[error("could not determine OS configuration directory")]
    NoConfigDir,
    #[error("platform I/O error: {0}")]
    Io(#[from] io::Error),
}

/// OS-specific directory paths (XDG on Linux, Known Folders on Windows,
/// Library on macOS).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformDirs {
    /// `config.ron` lives here.
    pub config_dir: PathBuf,
    pub data_dir: PathBuf,
    pub log_dir: PathBuf,
}

const APP_NAME: &str = "cirrus";

impl PlatformDirs {
    /// Resolve directories without creating them.
    pub fn resolve() -> Result<Self, PlatformError> {
        let config_base = dirs::config_dir().ok_or(PlatformError::NoConfigDir)?;
        let app_config = config_base.join(APP_NAME);

        let data_dir = dirs::data_dir()
            .unwrap_or_else(|| app_config.clone())
            .join(APP_NAME);

        Ok(Self {
            config_dir: app_config,
            log_dir: data_dir.join("logs"),
            data_dir,
        })
    }

    /// Directories rooted under `root`, for tests and `--config` overrides.
    pub fn resolve_with_root(root: &Path) -> Self {
        Self {
            config_dir: root.to_path_buf(),
            data_dir: root.join("data"),
            log_dir: root.join("logs"),
        }
    }

    pub fn create_dirs(&self) -> Result<(), PlatformError> {
        std::fs::create_dir_all(&self.config_dir)?;
        std::fs::create_dir_all(&self.data_dir)?;
        std::fs::create_dir_all(&self.log_dir)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolved_dirs_are_namespaced() {
        let Ok(dirs) = PlatformDirs::resolve() else {
            return;
        };
        assert!(dirs.config_dir.ends_with(APP_NAME));
        assert!(dirs.log_dir.starts_with(&dirs.data_dir));
    }

    #[test]
    fn test_directory_creation_under_root() {
        let tmp = tempfile::tempdir().unwrap();
        let dirs = PlatformDirs::resolve_with_root(tmp.path());
        dirs.create_dirs().unwrap();

        assert_eq!(dirs.config_dir, tmp.path());
        assert!(dirs.data_dir.is_dir());
        assert!(dirs.log_dir.is_dir());
    }
}
