use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use log::{info, warn};
use serde::de::DeserializeOwned;

use crate::{
    dom::{Document, APPS_CONTAINER, DETAILS_CONTAINER, FAVORITES_CONTAINER},
    favorites::{CorruptFavoritesPolicy, FavoritesStore},
    pages::{init_catalog_page, init_details_page, render_favorites, DetailsOutcome},
    settings::{SettingsStore, CATALOG_ENV},
    view::{RefreshPolicy, ViewSynchronizer},
};

#[derive(Debug, Parser)]
#[command(name = "cinestore", version, about = "Browse the app catalog and manage favorites")]
pub struct Cli {
    /// Settings file; missing means defaults.
    #[arg(long, default_value = "cinestore.json")]
    pub settings: PathBuf,

    /// Catalog URL or path, overriding settings and CINESTORE_CATALOG.
    #[arg(long)]
    pub catalog: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Render the index page, optionally clicking catalog toggles first.
    Index {
        #[arg(long = "click")]
        clicks: Vec<i64>,
    },
    /// Render only the favorites view.
    Favorites,
    /// Render the details page for a raw `id` value.
    Details {
        #[arg(long)]
        id: Option<String>,
        /// Click the details toggle after rendering.
        #[arg(long)]
        toggle: bool,
    },
    /// Flip one app's favorite flag.
    Toggle { id: i64 },
    /// Print the stored favorite ids as JSON.
    List,
    /// Remove every stored favorite.
    Clear,
    /// Print the settings file, updating the given fields first.
    Settings {
        /// `catalogToFavorites` or `allViews`.
        #[arg(long, value_parser = parse_camel::<RefreshPolicy>)]
        refresh_policy: Option<RefreshPolicy>,
        /// `fail` or `reset`.
        #[arg(long, value_parser = parse_camel::<CorruptFavoritesPolicy>)]
        corrupt_favorites: Option<CorruptFavoritesPolicy>,
        #[arg(long)]
        favorites_key: Option<String>,
    },
}

/// Read a unit enum variant by its camelCase settings name.
fn parse_camel<T: DeserializeOwned>(raw: &str) -> Result<T, String> {
    serde_json::from_value(serde_json::Value::String(raw.to_string()))
        .map_err(|err| err.to_string())
}

fn update_settings(
    store: &SettingsStore,
    path: &Path,
    refresh_policy: Option<RefreshPolicy>,
    corrupt_favorites: Option<CorruptFavoritesPolicy>,
    favorites_key: Option<String>,
) -> Result<String> {
    if refresh_policy.is_some() || corrupt_favorites.is_some() || favorites_key.is_some() {
        store.update(|settings| {
            if let Some(policy) = refresh_policy {
                settings.refresh_policy = policy;
            }
            if let Some(policy) = corrupt_favorites {
                settings.corrupt_favorites = policy;
            }
            if let Some(key) = favorites_key {
                settings.favorites_key = key;
            }
        })?;
        info!("Settings written to {}", path.display());
    }

    Ok(format!("{}\n", serde_json::to_string_pretty(&store.settings()?)?))
}

/// Run one command and return what should be printed.
pub async fn execute(cli: Cli) -> Result<String> {
    let store = SettingsStore::new(cli.settings.clone())?;

    if let Command::Settings {
        refresh_policy,
        corrupt_favorites,
        favorites_key,
    } = cli.command
    {
        return update_settings(
            &store,
            &cli.settings,
            refresh_policy,
            corrupt_favorites,
            favorites_key,
        );
    }

    let env_catalog = std::env::var(CATALOG_ENV).ok();
    let settings = store
        .settings()?
        .with_catalog_override(env_catalog.as_deref())
        .with_catalog_override(cli.catalog.as_deref());

    let storage = settings.storage.open()?;
    let favorites = Arc::new(
        FavoritesStore::with_key(storage, settings.favorites_key.clone())
            .on_corrupt(settings.corrupt_favorites),
    );
    let mut sync = ViewSynchronizer::new(Arc::clone(&favorites)).with_policy(settings.refresh_policy);

    match cli.command {
        Command::Index { clicks } => {
            let mut doc = Document::catalog_page();
            init_catalog_page(&mut doc, &mut sync, &settings.catalog).await;
            for id in clicks {
                if sync.click(&mut doc, APPS_CONTAINER, id).is_none() {
                    warn!("No usable favorite toggle for app {id} in the catalog view");
                }
            }
            Ok(doc.to_html())
        }
        Command::Favorites => {
            let mut doc = Document::new().with_region(FAVORITES_CONTAINER);
            render_favorites(&mut doc, &mut sync, &settings.catalog).await;
            Ok(doc.to_html())
        }
        Command::Details { id, toggle } => {
            let query = id.map(|raw| format!("?id={raw}")).unwrap_or_default();
            let mut doc = Document::details_page(&query);
            let outcome = init_details_page(&mut doc, &mut sync, &settings.catalog).await;
            if toggle {
                if let DetailsOutcome::Rendered(app_id) = outcome {
                    sync.click(&mut doc, DETAILS_CONTAINER, app_id);
                }
            }
            Ok(doc.to_html())
        }
        Command::Toggle { id } => {
            let favorited = favorites.toggle_favorite(id)?;
            let status = if favorited { "favorited" } else { "unfavorited" };
            Ok(format!("{id} {status}\n"))
        }
        Command::List => Ok(format!(
            "{}\n",
            serde_json::to_string(&favorites.get_favorites()?)?
        )),
        Command::Clear => {
            favorites.clear_favorites()?;
            Ok("favorites cleared\n".to_string())
        }
        Command::Settings { .. } => bail!("settings command does not open storage"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::fs;
    use tempfile::{tempdir, TempDir};

    fn workspace() -> Result<(TempDir, PathBuf)> {
        let dir = tempdir()?;
        let catalog = dir.path().join("apps.json");
        fs::write(
            &catalog,
            json!([
                {"id": 1, "nome": "Um", "descricao": "primeiro", "icone": "i1", "link_apk": "a1"},
                {"id": 2, "nome": "Dois", "descricao": "segundo", "icone": "i2", "link_apk": "a2"}
            ])
            .to_string(),
        )?;

        let settings = dir.path().join("cinestore.json");
        fs::write(
            &settings,
            json!({
                "catalog": {"kind": "file", "location": catalog},
                "storage": {"kind": "file", "path": dir.path().join("storage.json")}
            })
            .to_string(),
        )?;
        Ok((dir, settings))
    }

    async fn run(settings: &PathBuf, args: &[&str]) -> Result<String> {
        let settings = settings.to_string_lossy().into_owned();
        let mut argv = vec!["cinestore", "--settings", settings.as_str()];
        argv.extend_from_slice(args);
        execute(Cli::parse_from(argv)).await
    }

    #[tokio::test]
    async fn toggle_then_list_round_trips_through_storage() -> Result<()> {
        let (_dir, settings) = workspace()?;

        assert_eq!(run(&settings, &["toggle", "2"]).await?, "2 favorited\n");
        assert_eq!(run(&settings, &["toggle", "1"]).await?, "1 favorited\n");
        assert_eq!(run(&settings, &["toggle", "2"]).await?, "2 unfavorited\n");
        assert_eq!(run(&settings, &["list"]).await?, "[1]\n");
        Ok(())
    }

    #[tokio::test]
    async fn index_click_updates_favorites_section() -> Result<()> {
        let (_dir, settings) = workspace()?;

        let html = run(&settings, &["index", "--click", "2"]).await?;
        assert!(html.contains(r#"<div id="favoritos-container"><div class="app-card">"#));
        assert!(html.contains("<h3>Dois</h3>"));
        assert_eq!(run(&settings, &["list"]).await?, "[2]\n");
        Ok(())
    }

    #[tokio::test]
    async fn details_with_bad_id_prints_inline_message() -> Result<()> {
        let (_dir, settings) = workspace()?;

        let html = run(&settings, &["details", "--id", "abc"]).await?;
        assert!(html.contains("ID inválido na URL."));

        let html = run(&settings, &["details"]).await?;
        assert!(html.contains("ID inválido na URL."));
        Ok(())
    }

    #[tokio::test]
    async fn details_toggle_persists() -> Result<()> {
        let (_dir, settings) = workspace()?;

        let html = run(&settings, &["details", "--id", "1", "--toggle"]).await?;
        assert!(html.contains(r#"value="Novo Comentário para: Um""#));
        assert!(html.contains("⭐ Favorito"));
        assert_eq!(run(&settings, &["list"]).await?, "[1]\n");
        Ok(())
    }

    #[tokio::test]
    async fn clear_empties_favorites() -> Result<()> {
        let (_dir, settings) = workspace()?;

        run(&settings, &["toggle", "1"]).await?;
        run(&settings, &["toggle", "2"]).await?;
        assert_eq!(run(&settings, &["clear"]).await?, "favorites cleared\n");
        assert_eq!(run(&settings, &["list"]).await?, "[]\n");
        Ok(())
    }

    #[tokio::test]
    async fn settings_command_updates_file_and_later_commands_use_it() -> Result<()> {
        let (_dir, settings) = workspace()?;
        run(&settings, &["toggle", "1"]).await?;

        let printed = run(
            &settings,
            &["settings", "--refresh-policy", "allViews", "--favorites-key", "outra_lista"],
        )
        .await?;
        let printed: serde_json::Value = serde_json::from_str(&printed)?;
        assert_eq!(printed["refreshPolicy"], "allViews");
        assert_eq!(printed["favoritesKey"], "outra_lista");
        assert_eq!(printed["corruptFavorites"], "fail");

        let reloaded = SettingsStore::new(settings.clone())?.settings()?;
        assert_eq!(reloaded.refresh_policy, RefreshPolicy::AllViews);
        assert_eq!(run(&settings, &["list"]).await?, "[]\n");
        Ok(())
    }

    #[test]
    fn settings_rejects_unknown_policy_names() {
        let parsed = Cli::try_parse_from([
            "cinestore",
            "settings",
            "--corrupt-favorites",
            "ignore",
        ]);
        assert!(parsed.is_err());
    }
}
