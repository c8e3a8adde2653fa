use std::sync::Arc;

use crate::{
    catalog::{filter_favorites, ApplicationRecord},
    dom::{
        Card, Content, DetailsPanel, Document, ToggleControl, APPS_CONTAINER, DETAILS_CONTAINER,
        DETAIL_TOGGLE, FAVORITES_CONTAINER,
    },
    favorites::{FavoritesChange, FavoritesStore, FavoritesSubscription},
    render::{render_empty, EmptyState},
    storage::Storage,
};
use crate::{log_debug, log_error};

use super::{RefreshPolicy, ToggleState, ViewKind};

const ENABLE_LOGS: bool = true;

/// Renders record lists into containers and keeps them consistent with the
/// favorites store.
///
/// Views rendered through [`render_list`](Self::render_list) are remembered
/// as mounted. After a toggle the synchronizer drains its store subscription
/// and re-renders the views selected by its [`RefreshPolicy`] from the
/// catalog snapshot it was given, so no refetch happens on click.
pub struct ViewSynchronizer<S> {
    store: Arc<FavoritesStore<S>>,
    changes: FavoritesSubscription,
    policy: RefreshPolicy,
    snapshot: Vec<ApplicationRecord>,
    mounted: Vec<String>,
}

impl<S: Storage> ViewSynchronizer<S> {
    pub fn new(store: Arc<FavoritesStore<S>>) -> Self {
        let changes = store.subscribe();
        Self {
            store,
            changes,
            policy: RefreshPolicy::default(),
            snapshot: Vec::new(),
            mounted: Vec::new(),
        }
    }

    pub fn with_policy(mut self, policy: RefreshPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn store(&self) -> &FavoritesStore<S> {
        &self.store
    }

    /// Catalog that dependent views are re-rendered from.
    pub fn set_snapshot(&mut self, records: Vec<ApplicationRecord>) {
        self.snapshot = records;
    }

    pub fn snapshot(&self) -> &[ApplicationRecord] {
        &self.snapshot
    }

    /// Current favorites for rendering; unreadable storage renders as none.
    pub fn current_favorites(&self) -> Vec<i64> {
        match self.store.get_favorites() {
            Ok(ids) => ids,
            Err(err) => {
                log_error!("Failed to read favorites: {err:#}");
                Vec::new()
            }
        }
    }

    /// Render `records` into `container_id` and wire its toggles.
    ///
    /// Rendering the primary catalog container also records `records` as the
    /// snapshot dependent views are redrawn from.
    pub fn render_list(
        &mut self,
        doc: &mut Document,
        records: &[ApplicationRecord],
        container_id: &str,
        favorite_ids: &[i64],
    ) {
        if !doc.has_element(container_id) {
            log_debug!("Container {container_id} not present; skipping render");
            return;
        }

        let content = if records.is_empty() {
            let state = match ViewKind::for_container(container_id) {
                ViewKind::Favorites => EmptyState::NoFavorites,
                ViewKind::Catalog => EmptyState::NoApps,
            };
            Content::Html(render_empty(state))
        } else {
            let cards = records
                .iter()
                .map(|record| Card {
                    record: record.clone(),
                    control: ToggleControl::new(
                        record.id,
                        ToggleState::from_membership(favorite_ids.contains(&record.id)),
                    ),
                })
                .collect();
            Content::Cards(cards)
        };

        doc.set_content(container_id, content);
        wire_controls(doc, container_id);

        if container_id == APPS_CONTAINER {
            self.snapshot = records.to_vec();
        }

        if !self.mounted.iter().any(|id| id == container_id) {
            self.mounted.push(container_id.to_string());
        }

        log_debug!("Rendered {} records into {container_id}", records.len());
    }

    /// Render the details panel with its own wired toggle.
    ///
    /// The panel is not a mounted list view, so toggling it refreshes
    /// nothing else.
    pub fn render_details(
        &mut self,
        doc: &mut Document,
        record: &ApplicationRecord,
        favorited: bool,
    ) -> bool {
        let panel = DetailsPanel {
            record: record.clone(),
            control: ToggleControl::new(record.id, ToggleState::from_membership(favorited))
                .with_element_id(DETAIL_TOGGLE),
        };

        if !doc.set_content(DETAILS_CONTAINER, Content::Details(Box::new(panel))) {
            return false;
        }
        wire_controls(doc, DETAILS_CONTAINER);
        true
    }

    /// Dispatch a click on the toggle for `app_id` inside `container_id`.
    ///
    /// Returns the new membership, or `None` when there is no wired control
    /// or the store rejected the write (the control then keeps its state).
    pub fn click(&mut self, doc: &mut Document, container_id: &str, app_id: i64) -> Option<bool> {
        let control = doc.control_mut(container_id, app_id)?;
        if !control.wired {
            log_debug!("Ignoring click on unwired control {app_id} in {container_id}");
            return None;
        }

        let favorited = match self.store.toggle_favorite(app_id) {
            Ok(favorited) => favorited,
            Err(err) => {
                log_error!("Failed to toggle favorite {app_id}: {err:#}");
                return None;
            }
        };
        control.state = ToggleState::from_membership(favorited);

        self.propagate(doc, container_id);
        Some(favorited)
    }

    /// Re-render every mounted view if the store changed since the last look.
    ///
    /// Picks up writes made outside this synchronizer; returns how many views
    /// were redrawn.
    pub fn refresh(&mut self, doc: &mut Document) -> usize {
        let Some(change) = self.take_change() else {
            return 0;
        };

        let targets = self.mounted.clone();
        for target in &targets {
            self.rerender(doc, target, &change.favorites);
        }
        targets.len()
    }

    fn propagate(&mut self, doc: &mut Document, origin: &str) {
        let Some(change) = self.take_change() else {
            return;
        };

        let targets: Vec<String> = match self.policy {
            RefreshPolicy::CatalogToFavorites => {
                if origin == APPS_CONTAINER {
                    vec![FAVORITES_CONTAINER.to_string()]
                } else {
                    Vec::new()
                }
            }
            RefreshPolicy::AllViews => self
                .mounted
                .iter()
                .filter(|id| id.as_str() != origin)
                .cloned()
                .collect(),
        };

        for target in &targets {
            self.rerender(doc, target, &change.favorites);
        }
    }

    fn rerender(&mut self, doc: &mut Document, container_id: &str, favorites: &[i64]) {
        let records = match ViewKind::for_container(container_id) {
            ViewKind::Favorites => filter_favorites(&self.snapshot, favorites),
            ViewKind::Catalog => self.snapshot.clone(),
        };
        self.render_list(doc, &records, container_id, favorites);
    }

    fn take_change(&mut self) -> Option<FavoritesChange> {
        match self.changes.has_changed() {
            Ok(true) => Some(self.changes.borrow_and_update().clone()),
            _ => None,
        }
    }
}

fn wire_controls(doc: &mut Document, container_id: &str) {
    for control in doc.controls_mut(container_id) {
        control.wired = true;
    }
}
