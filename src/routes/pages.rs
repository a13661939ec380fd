use axum::{response::Html, routing::get, Router};

use crate::{
    state::AppState,
    views::{self, ListMode},
};

/// Pages that need no session.
pub fn pages_routes() -> Router<AppState> {
    Router::new()
        .route("/about", get(about))
        .route("/work", get(work))
}

pub async fn about() -> Html<String> {
    views::about_page()
}

pub async fn work() -> Html<String> {
    views::list_page("Work List", &[], ListMode::ReadOnly)
}
