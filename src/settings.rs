use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf, sync::RwLock};

use crate::{
    catalog::CatalogSource,
    favorites::{CorruptFavoritesPolicy, DEFAULT_FAVORITES_KEY},
    storage::{FileStorage, MemoryStorage, SqliteStorage, Storage},
    view::RefreshPolicy,
};

pub const CATALOG_ENV: &str = "CINESTORE_CATALOG";
pub const DEBUG_ENV: &str = "CINESTORE_DEBUG";

/// Backend that plays the role of browser local storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "path", rename_all = "camelCase")]
pub enum StorageBackend {
    Memory,
    File(PathBuf),
    Sqlite(PathBuf),
}

impl Default for StorageBackend {
    fn default() -> Self {
        StorageBackend::File(PathBuf::from("cinestore_storage.json"))
    }
}

impl StorageBackend {
    pub fn open(&self) -> Result<Box<dyn Storage>> {
        Ok(match self {
            StorageBackend::Memory => Box::new(MemoryStorage::new()),
            StorageBackend::File(path) => Box::new(FileStorage::new(path.clone())?),
            StorageBackend::Sqlite(path) => Box::new(SqliteStorage::open(path.clone())?),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub catalog: CatalogSource,
    pub storage: StorageBackend,
    pub favorites_key: String,
    pub refresh_policy: RefreshPolicy,
    pub corrupt_favorites: CorruptFavoritesPolicy,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            catalog: CatalogSource::default(),
            storage: StorageBackend::default(),
            favorites_key: DEFAULT_FAVORITES_KEY.into(),
            refresh_policy: RefreshPolicy::default(),
            corrupt_favorites: CorruptFavoritesPolicy::default(),
        }
    }
}

impl Settings {
    /// Apply a catalog location given on the command line or via `CINESTORE_CATALOG`.
    pub fn with_catalog_override(mut self, raw: Option<&str>) -> Self {
        if let Some(raw) = raw.filter(|value| !value.trim().is_empty()) {
            self.catalog = CatalogSource::parse(raw);
        }
        self
    }
}

pub fn debug_enabled() -> bool {
    std::env::var(DEBUG_ENV)
        .map(|value| value == "1" || value.eq_ignore_ascii_case("true"))
        .unwrap_or(false)
}

pub struct SettingsStore {
    path: PathBuf,
    data: RwLock<Settings>,
}

impl SettingsStore {
    /// Load settings from `path`; a missing file means defaults.
    pub fn new(path: PathBuf) -> Result<Self> {
        let data = if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read settings from {}", path.display()))?;
            serde_json::from_str(&contents)
                .with_context(|| format!("Failed to parse settings in {}", path.display()))?
        } else {
            Settings::default()
        };

        Ok(Self {
            path,
            data: RwLock::new(data),
        })
    }

    pub fn settings(&self) -> Result<Settings> {
        let guard = self
            .data
            .read()
            .map_err(|_| anyhow!("settings lock poisoned"))?;
        Ok(guard.clone())
    }

    pub fn update(&self, apply: impl FnOnce(&mut Settings)) -> Result<()> {
        let mut guard = self
            .data
            .write()
            .map_err(|_| anyhow!("settings lock poisoned"))?;
        apply(&mut guard);
        self.persist(&guard)
    }

    fn persist(&self, data: &Settings) -> Result<()> {
        let serialized = serde_json::to_string_pretty(data)?;
        fs::write(&self.path, serialized)
            .with_context(|| format!("Failed to write settings to {}", self.path.display()))
    }
}
