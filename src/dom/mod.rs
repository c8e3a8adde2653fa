//! In-memory host page: regions, headings and form fields addressed by id.
//!
//! Containers hold structured content (cards, a details panel, or raw
//! markup) so toggle controls keep their own state and can be updated in
//! place; `inner_html` turns that back into markup on demand.

use crate::{
    catalog::ApplicationRecord,
    render::{escape_html, render_card, render_details, render_toggle},
    view::ToggleState,
};

pub const APPS_CONTAINER: &str = "apps-container";
pub const FAVORITES_CONTAINER: &str = "favoritos-container";
pub const DETAILS_CONTAINER: &str = "detalhes-app";
pub const CATALOG_MARKER: &str = "catalogo";
pub const APP_TITLE: &str = "app-title";
pub const FORM_SUBJECT: &str = "form-subject";
pub const COMMENT_APP_ID: &str = "app-id-comentario";
pub const DETAIL_TOGGLE: &str = "btn-favorito-detalhe";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToggleControl {
    pub app_id: i64,
    pub state: ToggleState,
    /// Set once a click handler is attached; unwired controls ignore clicks.
    pub wired: bool,
    pub element_id: Option<String>,
}

impl ToggleControl {
    pub fn new(app_id: i64, state: ToggleState) -> Self {
        Self {
            app_id,
            state,
            wired: false,
            element_id: None,
        }
    }

    pub fn with_element_id(mut self, element_id: &str) -> Self {
        self.element_id = Some(element_id.to_string());
        self
    }

    pub fn markup(&self) -> String {
        render_toggle(
            self.app_id,
            self.state.is_favorited(),
            self.element_id.as_deref(),
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Card {
    pub record: ApplicationRecord,
    pub control: ToggleControl,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailsPanel {
    pub record: ApplicationRecord,
    pub control: ToggleControl,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Content {
    #[default]
    Empty,
    Text(String),
    Html(String),
    Cards(Vec<Card>),
    Details(Box<DetailsPanel>),
}

impl Content {
    pub fn inner_html(&self) -> String {
        match self {
            Content::Empty => String::new(),
            Content::Text(text) => escape_html(text),
            Content::Html(html) => html.clone(),
            Content::Cards(cards) => cards
                .iter()
                .map(|card| render_card(&card.record, card.control.state.is_favorited()))
                .collect(),
            Content::Details(panel) => {
                let toggle_id = panel.control.element_id.as_deref().unwrap_or(DETAIL_TOGGLE);
                render_details(&panel.record, panel.control.state.is_favorited(), toggle_id)
            }
        }
    }

    fn controls(&self) -> Vec<&ToggleControl> {
        match self {
            Content::Cards(cards) => cards.iter().map(|card| &card.control).collect(),
            Content::Details(panel) => vec![&panel.control],
            _ => Vec::new(),
        }
    }

    fn controls_mut(&mut self) -> Vec<&mut ToggleControl> {
        match self {
            Content::Cards(cards) => cards.iter_mut().map(|card| &mut card.control).collect(),
            Content::Details(panel) => vec![&mut panel.control],
            _ => Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ElementKind {
    Region,
    Heading,
    Field,
}

#[derive(Debug, Clone)]
struct Element {
    id: String,
    kind: ElementKind,
    content: Content,
    value: String,
}

#[derive(Debug, Clone, Default)]
pub struct Document {
    elements: Vec<Element>,
    has_root_container: bool,
    root_override: Option<String>,
    query: String,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// Layout of the index page: catalog marker, catalog and favorites views.
    pub fn catalog_page() -> Self {
        Self::new()
            .with_root_container()
            .with_region(CATALOG_MARKER)
            .with_region(APPS_CONTAINER)
            .with_region(FAVORITES_CONTAINER)
    }

    /// Layout of the details page, including the comment form fields.
    pub fn details_page(query: &str) -> Self {
        Self::new()
            .with_root_container()
            .with_heading(APP_TITLE)
            .with_region(DETAILS_CONTAINER)
            .with_field(FORM_SUBJECT)
            .with_field(COMMENT_APP_ID)
            .with_query(query)
    }

    pub fn with_region(self, id: &str) -> Self {
        self.with_element(id, ElementKind::Region)
    }

    pub fn with_heading(self, id: &str) -> Self {
        self.with_element(id, ElementKind::Heading)
    }

    pub fn with_field(self, id: &str) -> Self {
        self.with_element(id, ElementKind::Field)
    }

    pub fn with_root_container(mut self) -> Self {
        self.has_root_container = true;
        self
    }

    pub fn with_query(mut self, query: &str) -> Self {
        self.query = query.to_string();
        self
    }

    fn with_element(mut self, id: &str, kind: ElementKind) -> Self {
        if !self.has_element(id) {
            self.elements.push(Element {
                id: id.to_string(),
                kind,
                content: Content::Empty,
                value: String::new(),
            });
        }
        self
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn has_element(&self, id: &str) -> bool {
        self.elements.iter().any(|element| element.id == id)
    }

    fn element(&self, id: &str) -> Option<&Element> {
        self.elements.iter().find(|element| element.id == id)
    }

    fn element_mut(&mut self, id: &str) -> Option<&mut Element> {
        self.elements.iter_mut().find(|element| element.id == id)
    }

    pub fn content(&self, id: &str) -> Option<&Content> {
        self.element(id).map(|element| &element.content)
    }

    /// Replace an element's content; `false` when the element is absent.
    pub fn set_content(&mut self, id: &str, content: Content) -> bool {
        match self.element_mut(id) {
            Some(element) => {
                element.content = content;
                true
            }
            None => false,
        }
    }

    pub fn inner_html(&self, id: &str) -> Option<String> {
        self.element(id).map(|element| element.content.inner_html())
    }

    pub fn text(&self, id: &str) -> Option<&str> {
        match self.content(id)? {
            Content::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn set_text(&mut self, id: &str, text: &str) -> bool {
        self.set_content(id, Content::Text(text.to_string()))
    }

    pub fn value(&self, id: &str) -> Option<&str> {
        self.element(id).map(|element| element.value.as_str())
    }

    pub fn set_value(&mut self, id: &str, value: &str) -> bool {
        match self.element_mut(id) {
            Some(element) => {
                element.value = value.to_string();
                true
            }
            None => false,
        }
    }

    /// Replace everything inside the root `.container`.
    pub fn set_root_html(&mut self, html: &str) -> bool {
        if !self.has_root_container {
            return false;
        }
        self.root_override = Some(html.to_string());
        true
    }

    pub fn root_html(&self) -> Option<&str> {
        self.root_override.as_deref()
    }

    pub fn controls(&self, container_id: &str) -> Vec<&ToggleControl> {
        self.element(container_id)
            .map(|element| element.content.controls())
            .unwrap_or_default()
    }

    pub fn controls_mut(&mut self, container_id: &str) -> Vec<&mut ToggleControl> {
        self.element_mut(container_id)
            .map(|element| element.content.controls_mut())
            .unwrap_or_default()
    }

    pub fn control_mut(&mut self, container_id: &str, app_id: i64) -> Option<&mut ToggleControl> {
        self.element_mut(container_id)?
            .content
            .controls_mut()
            .into_iter()
            .find(|control| control.app_id == app_id)
    }

    /// Ids of the cards currently shown in `container_id`, in order.
    pub fn card_ids(&self, container_id: &str) -> Vec<i64> {
        match self.content(container_id) {
            Some(Content::Cards(cards)) => cards.iter().map(|card| card.record.id).collect(),
            _ => Vec::new(),
        }
    }

    pub fn to_html(&self) -> String {
        let body = match &self.root_override {
            Some(html) => html.clone(),
            None => self
                .elements
                .iter()
                .map(|element| element_html(element))
                .collect::<Vec<_>>()
                .join("\n"),
        };

        if self.has_root_container {
            format!("<div class=\"container\">\n{body}\n</div>\n")
        } else {
            format!("{body}\n")
        }
    }
}

fn element_html(element: &Element) -> String {
    let id = escape_html(&element.id);
    match element.kind {
        ElementKind::Region => format!(r#"<div id="{id}">{}</div>"#, element.content.inner_html()),
        ElementKind::Heading => format!(r#"<h1 id="{id}">{}</h1>"#, element.content.inner_html()),
        ElementKind::Field => format!(
            r#"<input type="hidden" id="{id}" name="{id}" value="{}">"#,
            escape_html(&element.value)
        ),
    }
}
