use crate::{AppConfig, DirDiffError};
use directories::ProjectDirs;
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_FILE_NAME: &str = "dirdiff.toml";

#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: AppConfig,
    pub path: PathBuf,
    pub exists: bool,
}

impl LoadedConfig {
    /// Wrap a config that lives at an explicit path (tests, `--config`)
    pub fn at(path: PathBuf) -> Result<Self, DirDiffError> {
        let exists = path.exists();
        let config = if exists {
            read_config(&path)?
        } else {
            AppConfig::default()
        };
        Ok(Self {
            config,
            path,
            exists,
        })
    }
}

pub fn load_config(prefer_portable: bool) -> Result<LoadedConfig, DirDiffError> {
    let path = resolve_config_path(prefer_portable)?;
    let exists = path.exists();

    let config = if exists {
        read_config(&path)?
    } else {
        AppConfig::default()
    };

    Ok(LoadedConfig {
        config,
        path,
        exists,
    })
}

pub fn save_config(path: &Path, config: &AppConfig) -> Result<(), DirDiffError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let data = toml::to_string_pretty(config)
        .map_err(|e| DirDiffError::Serialization(e.to_string()))?;
    fs::write(path, data)?;
    Ok(())
}

/// Persist a user's Ignore decision for `relative_path`
///
/// Returns `false` when the path was already on the list.
pub fn record_ignore(loaded: &mut LoadedConfig, relative_path: &str) -> Result<bool, DirDiffError> {
    if loaded.config.ignored_paths.iter().any(|p| p == relative_path) {
        return Ok(false);
    }
    loaded.config.ignored_paths.push(relative_path.to_string());
    save_config(&loaded.path, &loaded.config)?;
    loaded.exists = true;
    Ok(true)
}

/// Drop `relative_path` from the ignore-list; `false` when it was not there
pub fn forget_ignore(loaded: &mut LoadedConfig, relative_path: &str) -> Result<bool, DirDiffError> {
    let before = loaded.config.ignored_paths.len();
    loaded.config.ignored_paths.retain(|p| p != relative_path);
    if loaded.config.ignored_paths.len() == before {
        return Ok(false);
    }
    save_config(&loaded.path, &loaded.config)?;
    Ok(true)
}

fn read_config(path: &Path) -> Result<AppConfig, DirDiffError> {
    let data = fs::read_to_string(path)?;
    toml::from_str(&data).map_err(|e| DirDiffError::Serialization(e.to_string()))
}

/// A config file next to the executable wins over the per-user one
fn resolve_config_path(prefer_portable: bool) -> Result<PathBuf, DirDiffError> {
    if let Some(portable_path) = portable_config_path() {
        if prefer_portable || portable_path.exists() {
            return Ok(portable_path);
        }
    }

    let dirs = ProjectDirs::from("", "dirdiff", "dirdiff")
        .ok_or_else(|| DirDiffError::Config("Unable to determine config directory".to_string()))?;
    Ok(dirs.config_dir().join(CONFIG_FILE_NAME))
}

fn portable_config_path() -> Option<PathBuf> {
    std::env::current_exe()
        .ok()
        .and_then(|path| path.parent().map(|dir| dir.join(CONFIG_FILE_NAME)))
}
