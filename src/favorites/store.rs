use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tokio::sync::watch;

use crate::storage::Storage;
use crate::{log_debug, log_warn};

const ENABLE_LOGS: bool = true;

pub const DEFAULT_FAVORITES_KEY: &str = "cinestore_favoritos";

/// What to do when the persisted favorites value does not decode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CorruptFavoritesPolicy {
    /// Surface an error and leave the stored value untouched.
    #[default]
    Fail,
    /// Treat the value as an empty list; the next write replaces it.
    Reset,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FavoritesChangeKind {
    Toggled { id: i64, favorited: bool },
    Replaced,
}

/// Snapshot published after every successful write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FavoritesChange {
    pub revision: u64,
    pub kind: Option<FavoritesChangeKind>,
    pub favorites: Vec<i64>,
}

impl FavoritesChange {
    fn initial() -> Self {
        Self {
            revision: 0,
            kind: None,
            favorites: Vec::new(),
        }
    }
}

pub type FavoritesSubscription = watch::Receiver<FavoritesChange>;

pub struct FavoritesStore<S> {
    storage: S,
    key: String,
    on_corrupt: CorruptFavoritesPolicy,
    changes: watch::Sender<FavoritesChange>,
}

impl<S: Storage> FavoritesStore<S> {
    pub fn new(storage: S) -> Self {
        Self::with_key(storage, DEFAULT_FAVORITES_KEY)
    }

    pub fn with_key(storage: S, key: impl Into<String>) -> Self {
        let (changes, _) = watch::channel(FavoritesChange::initial());
        Self {
            storage,
            key: key.into(),
            on_corrupt: CorruptFavoritesPolicy::default(),
            changes,
        }
    }

    pub fn on_corrupt(mut self, policy: CorruptFavoritesPolicy) -> Self {
        self.on_corrupt = policy;
        self
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn get_favorites(&self) -> Result<Vec<i64>> {
        let Some(raw) = self.storage.get_item(&self.key)? else {
            return Ok(Vec::new());
        };

        match serde_json::from_str::<Vec<i64>>(&raw) {
            Ok(ids) => Ok(ids),
            Err(err) => match self.on_corrupt {
                CorruptFavoritesPolicy::Fail => Err(anyhow::Error::new(err).context(format!(
                    "stored favorites under '{}' are not a list of ids",
                    self.key
                ))),
                CorruptFavoritesPolicy::Reset => {
                    log_warn!(
                        "Ignoring unreadable favorites under '{}': {err}",
                        self.key
                    );
                    Ok(Vec::new())
                }
            },
        }
    }

    /// Persist `ids`, collapsing repeats onto their first occurrence.
    pub fn set_favorites(&self, ids: &[i64]) -> Result<()> {
        let mut unique = Vec::with_capacity(ids.len());
        for id in ids {
            if !unique.contains(id) {
                unique.push(*id);
            }
        }

        self.write(&unique)?;
        self.publish(FavoritesChangeKind::Replaced, unique);
        Ok(())
    }

    /// Flip membership of `id`; returns `true` when it is now a favorite.
    pub fn toggle_favorite(&self, id: i64) -> Result<bool> {
        let mut favorites = self.get_favorites()?;

        if favorites.contains(&id) {
            favorites.retain(|fav_id| *fav_id != id);
        } else {
            favorites.push(id);
        }

        self.write(&favorites)?;
        let favorited = favorites.contains(&id);
        log_debug!("Favorite {id} toggled; favorited={favorited}");
        self.publish(FavoritesChangeKind::Toggled { id, favorited }, favorites);
        Ok(favorited)
    }

    /// Drop the stored key entirely; the next read sees an empty list.
    pub fn clear_favorites(&self) -> Result<()> {
        self.storage
            .remove_item(&self.key)
            .with_context(|| format!("failed to clear favorites under '{}'", self.key))?;
        self.publish(FavoritesChangeKind::Replaced, Vec::new());
        Ok(())
    }

    pub fn is_favorite(&self, id: i64) -> Result<bool> {
        Ok(self.get_favorites()?.contains(&id))
    }

    pub fn subscribe(&self) -> FavoritesSubscription {
        self.changes.subscribe()
    }

    fn write(&self, ids: &[i64]) -> Result<()> {
        let serialized = serde_json::to_string(ids)?;
        self.storage
            .set_item(&self.key, &serialized)
            .with_context(|| format!("failed to persist favorites under '{}'", self.key))
    }

    fn publish(&self, kind: FavoritesChangeKind, favorites: Vec<i64>) {
        self.changes.send_modify(|change| {
            change.revision += 1;
            change.kind = Some(kind);
            change.favorites = favorites;
        });
    }
}
