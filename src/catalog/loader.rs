use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use super::ApplicationRecord;
use crate::{log_error, log_info};

const ENABLE_LOGS: bool = true;

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Anything that can produce the catalog.
#[allow(async_fn_in_trait)]
pub trait CatalogProvider {
    async fn fetch(&self) -> Result<Vec<ApplicationRecord>>;
}

/// Where the static catalog resource lives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "location", rename_all = "camelCase")]
pub enum CatalogSource {
    Http(String),
    File(PathBuf),
}

impl Default for CatalogSource {
    fn default() -> Self {
        CatalogSource::File(PathBuf::from("apps.json"))
    }
}

impl CatalogSource {
    /// `http://` and `https://` locations are fetched, everything else is a path.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
            CatalogSource::Http(trimmed.to_string())
        } else {
            CatalogSource::File(PathBuf::from(trimmed))
        }
    }
}

impl CatalogProvider for CatalogSource {
    async fn fetch(&self) -> Result<Vec<ApplicationRecord>> {
        let body = match self {
            CatalogSource::Http(url) => fetch_http(url.clone()).await?,
            CatalogSource::File(path) => tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("failed to read catalog from {}", path.display()))?,
        };

        parse_catalog(&body)
    }
}

async fn fetch_http(url: String) -> Result<String> {
    tokio::task::spawn_blocking(move || -> Result<String> {
        let response = ureq::get(&url)
            .set("User-Agent", USER_AGENT)
            .call()
            .with_context(|| format!("failed to fetch catalog from {url}"))?;

        response
            .into_string()
            .context("failed to read catalog response body")
    })
    .await
    .context("catalog fetch task failed to join")?
}

pub fn parse_catalog(body: &str) -> Result<Vec<ApplicationRecord>> {
    serde_json::from_str(body).context("catalog is not an array of application records")
}

/// Fetch the catalog, degrading to an empty list on any failure.
pub async fn load_catalog<P: CatalogProvider>(provider: &P) -> Vec<ApplicationRecord> {
    match provider.fetch().await {
        Ok(records) => {
            log_info!("Loaded {} catalog records", records.len());
            records
        }
        Err(err) => {
            log_error!("Failed to load catalog: {err:#}");
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::tempdir;

    #[test]
    fn parse_distinguishes_urls_from_paths() {
        assert_eq!(
            CatalogSource::parse("https://example.com/apps.json"),
            CatalogSource::Http("https://example.com/apps.json".into())
        );
        assert_eq!(
            CatalogSource::parse(" data/apps.json "),
            CatalogSource::File(PathBuf::from("data/apps.json"))
        );
    }

    #[tokio::test]
    async fn file_source_loads_records() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("apps.json");
        let body = json!([
            {"id": 1, "nome": "Um", "descricao": "d1", "icone": "i1", "link_apk": "a1"},
            {"id": 2, "nome": "Dois", "descricao": "d2", "icone": "i2", "link_apk": "a2"}
        ]);
        std::fs::write(&path, body.to_string())?;

        let records = load_catalog(&CatalogSource::File(path)).await;
        let names: Vec<&str> = records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Um", "Dois"]);
        Ok(())
    }

    #[tokio::test]
    async fn missing_file_degrades_to_empty() -> Result<()> {
        let dir = tempdir()?;
        let source = CatalogSource::File(dir.path().join("absent.json"));

        assert!(source.fetch().await.is_err());
        assert!(load_catalog(&source).await.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn malformed_body_degrades_to_empty() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("apps.json");
        std::fs::write(&path, r#"{"apps": []}"#)?;

        assert!(load_catalog(&CatalogSource::File(path)).await.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn unreachable_host_degrades_to_empty() {
        let source = CatalogSource::Http("http://127.0.0.1:9/apps.json".into());
        assert!(load_catalog(&source).await.is_empty());
    }
}
