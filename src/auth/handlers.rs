use axum::{
    extract::State,
    http::{header::SET_COOKIE, HeaderMap},
    response::{Html, IntoResponse, Redirect, Response},
    routing::get,
    Form, Router,
};
use tracing::{info, instrument, warn};

use crate::{
    auth::{
        dto::{LoginForm, RegisterForm},
        extractors::AuthUser,
        services::{
            self, clear_flash_cookie, clear_session_cookie, flash_cookie, read_cookie,
            session_cookie, session_id_from, Flash, Registration, FLASH_COOKIE,
        },
    },
    error::{AppError, AppResult},
    state::AppState,
    views,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", get(login_form).post(login))
        .route("/logout", get(logout))
        .route("/register", get(register_form).post(register))
}

pub fn profile_routes() -> Router<AppState> {
    Router::new()
        .route("/profile", get(profile))
        .route("/change_password", get(change_password_form))
}

/// Renders `page` with the pending flash message, clearing the flash cookie.
fn with_flash(headers: &HeaderMap, page: fn(Option<Flash>) -> Html<String>) -> Response {
    match read_cookie(headers, FLASH_COOKIE).and_then(Flash::from_code) {
        Some(flash) => ([(SET_COOKIE, clear_flash_cookie())], page(Some(flash))).into_response(),
        None => page(None).into_response(),
    }
}

fn redirect_with_flash(to: &str, flash: Flash) -> Response {
    ([(SET_COOKIE, flash_cookie(flash))], Redirect::to(to)).into_response()
}

pub async fn login_form(headers: HeaderMap) -> Response {
    with_flash(&headers, views::login_page)
}

pub async fn register_form(headers: HeaderMap) -> Response {
    with_flash(&headers, views::register_page)
}

#[instrument(skip(state, form))]
pub async fn login(State(state): State<AppState>, Form(form): Form<LoginForm>) -> AppResult<Response> {
    let cfg = &state.config.session;
    let session = services::login(state.store.as_ref(), cfg, &form.email, &form.password).await?;
    Ok(match session {
        Some(session) => (
            [(SET_COOKIE, session_cookie(&session, cfg))],
            Redirect::to("/"),
        )
            .into_response(),
        None => redirect_with_flash("/login", Flash::InvalidCredentials),
    })
}

#[instrument(skip(state, headers))]
pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> AppResult<Response> {
    let cfg = &state.config.session;
    if let Some(session_id) = session_id_from(&headers, cfg) {
        state.store.delete_session(session_id).await?;
        info!(%session_id, "session ended");
    }
    Ok(([(SET_COOKIE, clear_session_cookie(cfg))], Redirect::to("/login")).into_response())
}

#[instrument(skip(state, form))]
pub async fn register(
    State(state): State<AppState>,
    Form(form): Form<RegisterForm>,
) -> AppResult<Response> {
    let outcome = services::register(
        state.store.as_ref(),
        &form.email,
        &form.password,
        form.first_name,
        form.last_name,
    )
    .await?;
    Ok(match outcome {
        Registration::Created(_) => Redirect::to("/login").into_response(),
        Registration::EmailTaken => Redirect::to("/register").into_response(),
        Registration::Invalid => redirect_with_flash("/register", Flash::InvalidRegistration),
    })
}

#[instrument(skip(state))]
pub async fn profile(State(state): State<AppState>, AuthUser(user_id): AuthUser) -> AppResult<Response> {
    match state.store.find_user(user_id).await? {
        Some(user) => Ok(views::profile_page(&user).into_response()),
        None => {
            warn!(%user_id, "session refers to a missing user");
            Err(AppError::Internal(anyhow::anyhow!("user {user_id} not found")))
        }
    }
}

pub async fn change_password_form(AuthUser(_): AuthUser) -> Html<String> {
    views::change_password_page()
}
