//! Pure markup construction for cards, the details panel and inline notices.
//!
//! Nothing here touches the document; the view layer decides where the
//! fragments go and keeps control state.

use crate::catalog::ApplicationRecord;

pub const DESCRIPTION_PREVIEW_CHARS: usize = 70;
pub const FAVORITE_CLASS: &str = "favoritado";
pub const FAVORITED_LABEL: &str = "⭐ Favorito";
pub const UNFAVORITED_LABEL: &str = "🤍 Favoritar";

pub const EMPTY_FAVORITES_MESSAGE: &str =
    "Você ainda não adicionou nenhum aplicativo aos favoritos.";
pub const EMPTY_CATALOG_MESSAGE: &str = "Nenhum aplicativo encontrado.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmptyState {
    NoFavorites,
    NoApps,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotFound {
    InvalidId,
    UnknownId,
}

/// First 70 characters plus `...`, always; may cut a word in half.
pub fn truncate_description(description: &str) -> String {
    let mut preview: String = description
        .chars()
        .take(DESCRIPTION_PREVIEW_CHARS)
        .collect();
    preview.push_str("...");
    preview
}

pub fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}

pub fn toggle_class(favorited: bool) -> String {
    if favorited {
        format!("btn-favorito {FAVORITE_CLASS}")
    } else {
        "btn-favorito".to_string()
    }
}

pub fn toggle_label(favorited: bool) -> &'static str {
    if favorited {
        FAVORITED_LABEL
    } else {
        UNFAVORITED_LABEL
    }
}

/// The favorite button; `data-app-id` is what click handling keys on.
pub fn render_toggle(app_id: i64, favorited: bool, element_id: Option<&str>) -> String {
    let id_attr = element_id
        .map(|id| format!(r#" id="{}""#, escape_html(id)))
        .unwrap_or_default();

    format!(
        r#"<button{id_attr} class="{class}" data-app-id="{app_id}">{label}</button>"#,
        class = toggle_class(favorited),
        label = toggle_label(favorited),
    )
}

pub fn render_card(app: &ApplicationRecord, is_favorite: bool) -> String {
    let name = escape_html(&app.name);
    format!(
        concat!(
            r#"<div class="app-card">"#,
            r#"<img src="{icon}" alt="Ícone do {name}" class="app-icon">"#,
            "<h3>{name}</h3>",
            "<p>{preview}</p>",
            r#"<div class="card-actions">"#,
            r#"<a href="detalhes.html?id={id}" class="btn-detalhes">Detalhes</a>"#,
            "{toggle}",
            "</div>",
            "</div>"
        ),
        icon = escape_html(&app.icon),
        name = name,
        preview = escape_html(&truncate_description(&app.description)),
        id = app.id,
        toggle = render_toggle(app.id, is_favorite, None),
    )
}

pub fn render_details(app: &ApplicationRecord, is_favorite: bool, toggle_id: &str) -> String {
    let name = escape_html(&app.name);
    format!(
        concat!(
            r#"<img src="{icon}" alt="Ícone do {name}" class="detalhes-icon">"#,
            r#"<div class="detalhes-info">"#,
            "<h1>{name}</h1>",
            r#"<p class="descricao">{description}</p>"#,
            r#"<div class="detalhes-acoes">"#,
            r#"<a href="{apk}" class="btn-download" target="_blank" rel="noopener noreferrer">⬇️ Baixar APK</a>"#,
            "{toggle}",
            "</div>",
            "</div>"
        ),
        icon = escape_html(&app.icon),
        name = name,
        description = escape_html(&app.description),
        apk = escape_html(&app.apk_link),
        toggle = render_toggle(app.id, is_favorite, Some(toggle_id)),
    )
}

pub fn render_empty(state: EmptyState) -> String {
    let message = match state {
        EmptyState::NoFavorites => EMPTY_FAVORITES_MESSAGE,
        EmptyState::NoApps => EMPTY_CATALOG_MESSAGE,
    };
    format!("<p>{message}</p>")
}

pub fn render_not_found(reason: NotFound) -> String {
    let detail = match reason {
        NotFound::InvalidId => "ID inválido na URL.",
        NotFound::UnknownId => "O ID não corresponde a nenhum app na base de dados.",
    };
    format!("<h2>Aplicativo não encontrado.</h2><p>{detail}</p>")
}

pub fn comment_subject(app: &ApplicationRecord) -> String {
    format!("Novo Comentário para: {}", app.name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::models::sample_record;

    #[test]
    fn short_descriptions_still_get_ellipsis() {
        assert_eq!(truncate_description("Curto"), "Curto...");
        assert_eq!(truncate_description(""), "...");
    }

    #[test]
    fn truncation_counts_characters_and_splits_words() {
        let description = "ação ".repeat(20);
        let preview = truncate_description(&description);

        assert_eq!(preview.chars().count(), DESCRIPTION_PREVIEW_CHARS + 3);
        assert!(preview.starts_with("ação ação"));
        // 70 chars of "ação " (5 chars each) ends on a full word; shift by two to split.
        let shifted = truncate_description(&format!("xy{description}"));
        assert!(shifted.ends_with("açã..."));
    }

    #[test]
    fn card_reflects_favorite_state() {
        let app = sample_record(12);

        let plain = render_card(&app, false);
        assert!(plain.contains(r#"<button class="btn-favorito" data-app-id="12">🤍 Favoritar</button>"#));
        assert!(plain.contains(r#"href="detalhes.html?id=12""#));

        let favorite = render_card(&app, true);
        assert!(favorite.contains(r#"class="btn-favorito favoritado" data-app-id="12">⭐ Favorito<"#));
    }

    #[test]
    fn card_escapes_record_fields() {
        let mut app = sample_record(1);
        app.name = r#"<b>"Evil"</b>"#.into();
        app.description = "a & b".into();

        let card = render_card(&app, false);
        assert!(card.contains("<h3>&lt;b&gt;&quot;Evil&quot;&lt;/b&gt;</h3>"));
        assert!(card.contains("<p>a &amp; b...</p>"));
        assert!(!card.contains("<b>"));
    }

    #[test]
    fn details_carry_full_description_and_named_toggle() {
        let mut app = sample_record(3);
        app.description = "d".repeat(120);

        let details = render_details(&app, true, "btn-favorito-detalhe");
        assert!(details.contains(&"d".repeat(120)));
        assert!(details.contains(r#"<button id="btn-favorito-detalhe" class="btn-favorito favoritado" data-app-id="3">"#));
        assert!(details.contains(r#"href="https://cdn.example.com/apk/3.apk""#));
    }

    #[test]
    fn empty_and_not_found_messages() {
        assert_eq!(
            render_empty(EmptyState::NoFavorites),
            "<p>Você ainda não adicionou nenhum aplicativo aos favoritos.</p>"
        );
        assert_eq!(
            render_empty(EmptyState::NoApps),
            "<p>Nenhum aplicativo encontrado.</p>"
        );
        assert!(render_not_found(NotFound::InvalidId).contains("ID inválido na URL."));
        assert!(render_not_found(NotFound::UnknownId).contains("nenhum app na base de dados"));
    }
}
