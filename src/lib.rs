pub mod catalog;
pub mod cli;
pub mod dom;
pub mod favorites;
pub mod pages;
pub mod render;
pub mod settings;
pub mod storage;
pub mod utils;
pub mod view;

use anyhow::Context;
use clap::Parser;

pub use catalog::{load_catalog, ApplicationRecord, CatalogProvider, CatalogSource};
pub use dom::Document;
pub use favorites::{CorruptFavoritesPolicy, FavoritesStore};
pub use pages::{boot, init_catalog_page, init_details_page, render_favorites, DetailsOutcome, Page};
pub use storage::{FileStorage, MemoryStorage, SqliteStorage, Storage};
pub use view::{RefreshPolicy, ViewSynchronizer};

pub fn run() -> anyhow::Result<()> {
    // Initialize logging (reads RUST_LOG env var)
    utils::logging::init(settings::debug_enabled());

    log::info!("cinestore starting up...");

    let cli = cli::Cli::parse();
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to build async runtime")?;

    let output = runtime.block_on(cli::execute(cli))?;
    print!("{output}");
    Ok(())
}
