pub mod markup;

pub use markup::{
    comment_subject, escape_html, render_card, render_details, render_empty, render_not_found,
    render_toggle, truncate_description, EmptyState, NotFound,
};
