use crate::{
    catalog::{filter_favorites, load_catalog, CatalogProvider},
    dom::{Document, APPS_CONTAINER, FAVORITES_CONTAINER},
    storage::Storage,
    view::ViewSynchronizer,
};
use crate::log_info;

const ENABLE_LOGS: bool = true;

/// Index page: one fetch, one favorites read, both views from that snapshot.
pub async fn init_catalog_page<S: Storage, P: CatalogProvider>(
    doc: &mut Document,
    sync: &mut ViewSynchronizer<S>,
    provider: &P,
) {
    let records = load_catalog(provider).await;
    let favorite_ids = sync.current_favorites();

    sync.set_snapshot(records.clone());
    sync.render_list(doc, &records, APPS_CONTAINER, &favorite_ids);

    let favorite_records = filter_favorites(&records, &favorite_ids);
    sync.render_list(doc, &favorite_records, FAVORITES_CONTAINER, &favorite_ids);

    log_info!(
        "Catalog page ready: {} apps, {} favorites",
        records.len(),
        favorite_records.len()
    );
}

/// Favorites view on its own, fetching the catalog itself.
pub async fn render_favorites<S: Storage, P: CatalogProvider>(
    doc: &mut Document,
    sync: &mut ViewSynchronizer<S>,
    provider: &P,
) {
    let records = load_catalog(provider).await;
    let favorite_ids = sync.current_favorites();
    let favorite_records = filter_favorites(&records, &favorite_ids);

    sync.set_snapshot(records);
    sync.render_list(doc, &favorite_records, FAVORITES_CONTAINER, &favorite_ids);
}
