pub mod loader;
pub mod models;

pub use loader::{load_catalog, parse_catalog, CatalogProvider, CatalogSource};
pub use models::{filter_favorites, find_record, ApplicationRecord};
