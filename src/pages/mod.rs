pub mod catalog;
pub mod details;

pub use catalog::{init_catalog_page, render_favorites};
pub use details::{init_details_page, parse_app_id, DetailsOutcome};

use crate::{
    catalog::CatalogProvider,
    dom::{Document, CATALOG_MARKER, DETAILS_CONTAINER},
    storage::Storage,
    view::ViewSynchronizer,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Catalog,
    Details(DetailsOutcome),
    Unknown,
}

/// Pick the controller from the containers the page exposes.
pub async fn boot<S: Storage, P: CatalogProvider>(
    doc: &mut Document,
    sync: &mut ViewSynchronizer<S>,
    provider: &P,
) -> Page {
    if doc.has_element(CATALOG_MARKER) {
        init_catalog_page(doc, sync, provider).await;
        Page::Catalog
    } else if doc.has_element(DETAILS_CONTAINER) {
        Page::Details(init_details_page(doc, sync, provider).await)
    } else {
        Page::Unknown
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    };

    use anyhow::{bail, Result};

    use crate::catalog::{models::sample_record, ApplicationRecord, CatalogProvider};
    use crate::favorites::FavoritesStore;
    use crate::storage::MemoryStorage;
    use crate::view::ViewSynchronizer;

    /// Provider that counts fetches; `None` records simulate a failed fetch.
    pub struct CountingProvider {
        records: Option<Vec<ApplicationRecord>>,
        fetches: AtomicUsize,
    }

    impl CountingProvider {
        pub fn with_ids(ids: &[i64]) -> Self {
            Self {
                records: Some(ids.iter().copied().map(sample_record).collect()),
                fetches: AtomicUsize::new(0),
            }
        }

        pub fn failing() -> Self {
            Self {
                records: None,
                fetches: AtomicUsize::new(0),
            }
        }

        pub fn fetches(&self) -> usize {
            self.fetches.load(Ordering::SeqCst)
        }
    }

    impl CatalogProvider for CountingProvider {
        async fn fetch(&self) -> Result<Vec<ApplicationRecord>> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            match &self.records {
                Some(records) => Ok(records.clone()),
                None => bail!("catalog unavailable"),
            }
        }
    }

    pub fn sync_with(storage: MemoryStorage) -> ViewSynchronizer<MemoryStorage> {
        ViewSynchronizer::new(Arc::new(FavoritesStore::new(storage)))
    }
}
