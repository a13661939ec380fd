use axum::{
    extract::{Path, State},
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
    Form, Router,
};
use tracing::instrument;

use super::dto::{DeleteItemForm, NewItemForm};
use super::repo_types::{ListName, TODAY};
use super::services::{self, list_path, Added, Resolved};
use crate::{
    auth::extractors::AuthUser,
    error::AppResult,
    state::AppState,
    views::{self, ItemView, ListMode},
};

pub fn list_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(today).post(add_item))
        .route("/delete", post(delete_item))
        .route("/drop", get(drop_all))
        .route("/:custom_list_name", get(custom_list))
}

#[instrument(skip(state))]
pub async fn today(State(state): State<AppState>, AuthUser(user_id): AuthUser) -> AppResult<Html<String>> {
    let items = services::today_items(state.store.as_ref(), user_id).await?;
    let rows: Vec<ItemView<'_>> = items
        .iter()
        .map(|i| ItemView { id: i.id, name: &i.name })
        .collect();
    Ok(views::list_page(TODAY, &rows, ListMode::Editable))
}

#[instrument(skip(state))]
pub async fn custom_list(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(custom_list_name): Path<String>,
) -> AppResult<Response> {
    let name = ListName::capitalize(&custom_list_name);
    let resolved = services::resolve_list(state.store.as_ref(), user_id, &name).await?;
    Ok(match resolved {
        Resolved::Today => Redirect::to("/").into_response(),
        Resolved::Created => Redirect::to(&list_path(&name)).into_response(),
        Resolved::Found(list) => {
            let rows: Vec<ItemView<'_>> = list
                .items
                .0
                .iter()
                .map(|i| ItemView { id: i.id, name: &i.name })
                .collect();
            views::list_page(&list.name, &rows, ListMode::Editable).into_response()
        }
    })
}

#[instrument(skip(state, form))]
pub async fn add_item(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Form(form): Form<NewItemForm>,
) -> AppResult<Redirect> {
    let list = ListName::capitalize(&form.list);
    let added = services::add_item(state.store.as_ref(), user_id, &list, &form.new_item).await?;
    // visiting an unknown list's URL would create it without the item
    if added == Added::MissingList {
        return Ok(Redirect::to("/"));
    }
    Ok(Redirect::to(&list_path(&list)))
}

#[instrument(skip(state, form))]
pub async fn delete_item(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Form(form): Form<DeleteItemForm>,
) -> AppResult<Redirect> {
    let list = ListName::capitalize(&form.list_name);
    services::delete_item(state.store.as_ref(), user_id, &list, &form.checkbox).await?;
    Ok(Redirect::to(&list_path(&list)))
}

#[instrument(skip(state))]
pub async fn drop_all(State(state): State<AppState>, AuthUser(user_id): AuthUser) -> AppResult<Redirect> {
    services::drop_all(state.store.as_ref(), user_id).await?;
    Ok(Redirect::to("/"))
}
