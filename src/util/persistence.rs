use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use serde_json::Error as SerdeError;
use tracing::{info, warn};

use crate::domain::FeeTables;
use crate::util::version::{is_newer_than_current, APP_VERSION};

const APP_QUALIFIER: &str = "br";
const APP_ORG: &str = "MarketplacePricer";
const APP_NAME: &str = "MarketplacePricer";

/// User-editable settings: fee overrides for sellers whose category or
/// contract differs from the published defaults.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PersistedSettings {
    /// Version of the binary that last wrote the file.
    #[serde(default)]
    pub app_version: String,
    #[serde(default)]
    pub fees: FeeTables,
}

impl PersistedSettings {
    pub fn with_defaults() -> Self {
        Self {
            app_version: APP_VERSION.to_string(),
            fees: FeeTables::default(),
        }
    }
}

pub fn settings_file() -> Option<PathBuf> {
    ProjectDirs::from(APP_QUALIFIER, APP_ORG, APP_NAME)
        .map(|dirs| dirs.config_dir().join("settings.json"))
}

/// Reads settings from `path`; a missing file is not an error.
pub fn load_settings_from(path: &Path) -> Result<Option<PersistedSettings>, SettingsError> {
    let data = match fs::read_to_string(path) {
        Ok(data) => data,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(err) => return Err(err.into()),
    };
    let settings: PersistedSettings = serde_json::from_str(&data)?;
    if is_newer_than_current(&settings.app_version) {
        warn!(
            written_by = %settings.app_version,
            running = APP_VERSION,
            "settings were written by a newer version; unknown fields are ignored"
        );
    }
    Ok(Some(settings))
}

pub fn save_settings_to(path: &Path, settings: &PersistedSettings) -> Result<(), SettingsError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(settings)?;
    fs::write(path, json)?;
    info!(path = %path.display(), "saved settings");
    Ok(())
}

/// Writes the built-in fee tables to `path`, refusing to replace an existing
/// file unless `force` is set.
pub fn init_settings(path: Option<&Path>, force: bool) -> Result<PathBuf, SettingsError> {
    let path = path.ok_or(SettingsError::StorageUnavailable)?;
    if path.exists() && !force {
        return Err(SettingsError::AlreadyExists(path.to_path_buf()));
    }
    save_settings_to(path, &PersistedSettings::with_defaults())?;
    Ok(path.to_path_buf())
}

/// Effective fee tables: the overrides in `path` when present and valid,
/// the built-in defaults otherwise.
pub fn load_fee_tables(path: Option<&Path>) -> Result<FeeTables, SettingsError> {
    let Some(path) = path else {
        return Ok(FeeTables::default());
    };
    let Some(settings) = load_settings_from(path)? else {
        return Ok(FeeTables::default());
    };

    match settings.fees.validate() {
        Ok(()) => {
            info!(path = %path.display(), "loaded fee overrides");
            Ok(settings.fees)
        }
        Err(err) => {
            warn!(path = %path.display(), "ignoring invalid fee overrides: {err}");
            Ok(FeeTables::default())
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("settings directory unavailable; pass --settings")]
    StorageUnavailable,
    #[error("{} already exists; use --force to overwrite it", .0.display())]
    AlreadyExists(PathBuf),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Serde(#[from] SerdeError),
}
