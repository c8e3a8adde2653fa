use serde::{Deserialize, Serialize};

use crate::dom::FAVORITES_CONTAINER;

/// Visual state of one rendered toggle control.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum ToggleState {
    Unfavorited,
    Favorited,
}

impl Default for ToggleState {
    fn default() -> Self {
        ToggleState::Unfavorited
    }
}

impl ToggleState {
    pub fn from_membership(favorited: bool) -> Self {
        if favorited {
            ToggleState::Favorited
        } else {
            ToggleState::Unfavorited
        }
    }

    pub fn is_favorited(self) -> bool {
        matches!(self, ToggleState::Favorited)
    }
}

/// Which list a container shows.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum ViewKind {
    Catalog,
    Favorites,
}

impl ViewKind {
    pub fn for_container(container_id: &str) -> Self {
        if container_id == FAVORITES_CONTAINER {
            ViewKind::Favorites
        } else {
            ViewKind::Catalog
        }
    }
}

/// Which mounted views re-render after a toggle.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum RefreshPolicy {
    /// Only toggles made in the main catalog refresh the favorites view.
    #[default]
    CatalogToFavorites,
    /// Every other mounted view refreshes, whichever view the toggle came from.
    AllViews,
}
