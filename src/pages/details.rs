use serde::Serialize;

use crate::{
    catalog::{find_record, load_catalog, CatalogProvider},
    dom::{Document, APP_TITLE, COMMENT_APP_ID, FORM_SUBJECT},
    render::{comment_subject, render_not_found, NotFound},
    storage::Storage,
    view::ViewSynchronizer,
};
use crate::{log_info, log_warn};

const ENABLE_LOGS: bool = true;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase", tag = "status", content = "id")]
pub enum DetailsOutcome {
    InvalidId,
    NotFound(i64),
    Rendered(i64),
}

/// Value of the first `id` parameter, percent-decoded and read as a leading integer.
pub fn parse_app_id(query: &str) -> Option<i64> {
    let query = query.strip_prefix('?').unwrap_or(query);
    let raw = form_urlencoded::parse(query.as_bytes())
        .find(|(key, _)| key == "id")
        .map(|(_, value)| value)?;

    parse_leading_int(&raw)
}

/// Optional sign and digits after leading whitespace; trailing junk is ignored.
fn parse_leading_int(raw: &str) -> Option<i64> {
    let trimmed = raw.trim_start();
    let (negative, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let digits: &str = {
        let end = rest
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(rest.len());
        &rest[..end]
    };
    if digits.is_empty() {
        return None;
    }

    let value: i64 = digits.parse().ok()?;
    Some(if negative { -value } else { value })
}

/// Details page for the `id` in the document's query string.
///
/// Every failure ends up as an inline message in the root container; an
/// invalid id never reaches the catalog provider.
pub async fn init_details_page<S: Storage, P: CatalogProvider>(
    doc: &mut Document,
    sync: &mut ViewSynchronizer<S>,
    provider: &P,
) -> DetailsOutcome {
    let Some(app_id) = parse_app_id(doc.query()) else {
        log_warn!("Details requested with invalid id in '{}'", doc.query());
        doc.set_root_html(&render_not_found(NotFound::InvalidId));
        return DetailsOutcome::InvalidId;
    };

    let records = load_catalog(provider).await;
    let Some(app) = find_record(&records, app_id) else {
        log_warn!("Details requested for unknown app {app_id}");
        doc.set_root_html(&render_not_found(NotFound::UnknownId));
        return DetailsOutcome::NotFound(app_id);
    };

    doc.set_text(APP_TITLE, &app.name);

    let favorited = sync.current_favorites().contains(&app.id);
    sync.render_details(doc, app, favorited);

    doc.set_value(FORM_SUBJECT, &comment_subject(app));
    doc.set_value(COMMENT_APP_ID, &app.id.to_string());

    log_info!("Details page ready for app {}", app.id);
    DetailsOutcome::Rendered(app.id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{DETAILS_CONTAINER, FAVORITES_CONTAINER};
    use crate::favorites::DEFAULT_FAVORITES_KEY;
    use crate::pages::testing::{sync_with, CountingProvider};
    use crate::storage::MemoryStorage;
    use crate::view::ToggleState;

    #[test]
    fn parses_id_like_a_browser_would() {
        assert_eq!(parse_app_id("?id=3"), Some(3));
        assert_eq!(parse_app_id("id=42&x=1"), Some(42));
        assert_eq!(parse_app_id("?x=1&id=7&id=8"), Some(7));
        assert_eq!(parse_app_id("?id=12abc"), Some(12));
        assert_eq!(parse_app_id("?id=+5"), Some(5));
        assert_eq!(parse_app_id("?id=-4"), Some(-4));
        assert_eq!(parse_app_id("?id=abc"), None);
        assert_eq!(parse_app_id("?id="), None);
        assert_eq!(parse_app_id("?id"), None);
        assert_eq!(parse_app_id("?other=1"), None);
        assert_eq!(parse_app_id(""), None);
        assert_eq!(parse_app_id("?id=99999999999999999999"), None);
    }

    #[test]
    fn percent_encoded_ids_are_decoded() {
        assert_eq!(parse_app_id("?id=%31"), Some(1));
        assert_eq!(parse_app_id("?id=%201"), Some(1));
        assert_eq!(parse_app_id("?i%64=4"), Some(4));
        assert_eq!(parse_app_id("?id=%2D2"), Some(-2));
        assert_eq!(parse_app_id("?id=%41"), None);
    }

    #[tokio::test]
    async fn invalid_id_renders_message_without_fetching() {
        let provider = CountingProvider::with_ids(&[1]);
        let mut sync = sync_with(MemoryStorage::new());
        let mut doc = Document::details_page("?id=abc");

        let outcome = init_details_page(&mut doc, &mut sync, &provider).await;

        assert_eq!(outcome, DetailsOutcome::InvalidId);
        assert_eq!(provider.fetches(), 0);
        assert!(doc.root_html().unwrap().contains("ID inválido na URL."));
    }

    #[tokio::test]
    async fn unknown_id_renders_distinct_message() {
        let provider = CountingProvider::with_ids(&[1, 2]);
        let mut sync = sync_with(MemoryStorage::new());
        let mut doc = Document::details_page("?id=9");

        let outcome = init_details_page(&mut doc, &mut sync, &provider).await;

        assert_eq!(outcome, DetailsOutcome::NotFound(9));
        assert_eq!(provider.fetches(), 1);
        let html = doc.root_html().unwrap();
        assert!(html.contains("O ID não corresponde a nenhum app na base de dados."));
        assert!(!html.contains("ID inválido"));
    }

    #[tokio::test]
    async fn found_app_fills_page_and_wires_toggle() {
        let provider = CountingProvider::with_ids(&[1, 2]);
        let mut sync = sync_with(MemoryStorage::new().with_item(DEFAULT_FAVORITES_KEY, "[2]"));
        let mut doc = Document::details_page("?id=2");

        let outcome = init_details_page(&mut doc, &mut sync, &provider).await;

        assert_eq!(outcome, DetailsOutcome::Rendered(2));
        assert_eq!(doc.text(APP_TITLE), Some("App 2"));
        assert_eq!(doc.value(FORM_SUBJECT), Some("Novo Comentário para: App 2"));
        assert_eq!(doc.value(COMMENT_APP_ID), Some("2"));
        assert!(doc
            .inner_html(DETAILS_CONTAINER)
            .unwrap()
            .contains(r#"id="btn-favorito-detalhe" class="btn-favorito favoritado""#));

        assert_eq!(sync.click(&mut doc, DETAILS_CONTAINER, 2), Some(false));
        assert_eq!(doc.controls(DETAILS_CONTAINER)[0].state, ToggleState::Unfavorited);
        assert!(sync.current_favorites().is_empty());
        assert!(!doc.has_element(FAVORITES_CONTAINER));
    }
}
