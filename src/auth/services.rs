use axum::http::{header, HeaderMap};
use lazy_static::lazy_static;
use regex::Regex;
use time::{Duration, OffsetDateTime};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::auth::password::{hash_password, verify_password};
use crate::auth::repo_types::{NewUser, Session, User};
use crate::config::SessionConfig;
use crate::storage::TodoStore;

pub const FLASH_COOKIE: &str = "flash";

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

pub(crate) fn normalize_email(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// One-shot message carried across a redirect in a cookie.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flash {
    InvalidCredentials,
    InvalidRegistration,
}

impl Flash {
    pub fn code(self) -> &'static str {
        match self {
            Flash::InvalidCredentials => "invalid_credentials",
            Flash::InvalidRegistration => "invalid_registration",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "invalid_credentials" => Some(Flash::InvalidCredentials),
            "invalid_registration" => Some(Flash::InvalidRegistration),
            _ => None,
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            Flash::InvalidCredentials => "Invalid email or password.",
            Flash::InvalidRegistration => "Please enter a valid email and a password.",
        }
    }
}

/// Value of cookie `name` from the request's `Cookie` headers.
pub fn read_cookie<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(k, _)| *k == name)
        .map(|(_, v)| v)
}

pub fn session_id_from(headers: &HeaderMap, cfg: &SessionConfig) -> Option<Uuid> {
    read_cookie(headers, &cfg.cookie_name).and_then(|v| Uuid::parse_str(v).ok())
}

fn cookie(name: &str, value: &str, max_age_secs: i64, secure: bool) -> String {
    let mut c = format!("{name}={value}; Path=/; HttpOnly; SameSite=Lax; Max-Age={max_age_secs}");
    if secure {
        c.push_str("; Secure");
    }
    c
}

pub fn session_cookie(session: &Session, cfg: &SessionConfig) -> String {
    cookie(&cfg.cookie_name, &session.id.to_string(), cfg.ttl_minutes * 60, cfg.secure)
}

pub fn clear_session_cookie(cfg: &SessionConfig) -> String {
    cookie(&cfg.cookie_name, "", 0, cfg.secure)
}

pub fn flash_cookie(flash: Flash) -> String {
    cookie(FLASH_COOKIE, flash.code(), 60, false)
}

pub fn clear_flash_cookie() -> String {
    cookie(FLASH_COOKIE, "", 0, false)
}

/// Resolves a session id to its user id, ignoring expired sessions.
pub async fn session_user(store: &dyn TodoStore, session_id: Uuid) -> anyhow::Result<Option<Uuid>> {
    let Some(session) = store.find_session(session_id).await? else {
        return Ok(None);
    };
    if session.is_expired(OffsetDateTime::now_utc()) {
        store.delete_session(session.id).await?;
        return Ok(None);
    }
    Ok(Some(session.user_id))
}

/// Checks the credentials and opens a session; `None` on bad email or password.
pub async fn login(
    store: &dyn TodoStore,
    cfg: &SessionConfig,
    email: &str,
    password: &str,
) -> anyhow::Result<Option<Session>> {
    let email = normalize_email(email);
    let Some(user) = store.find_user_by_email(&email).await? else {
        warn!(email = %email, "login unknown email");
        return Ok(None);
    };
    if !verify_password(password, &user.password_hash)? {
        warn!(email = %email, user_id = %user.id, "login invalid password");
        return Ok(None);
    }
    let now = OffsetDateTime::now_utc();
    let purged = store.purge_expired_sessions(now).await?;
    if purged > 0 {
        debug!(purged, "expired sessions removed");
    }
    let session = store
        .create_session(user.id, now + Duration::minutes(cfg.ttl_minutes))
        .await?;
    info!(user_id = %user.id, "user logged in");
    Ok(Some(session))
}

#[derive(Debug)]
pub enum Registration {
    Created(User),
    EmailTaken,
    Invalid,
}

pub async fn register(
    store: &dyn TodoStore,
    email: &str,
    password: &str,
    first_name: Option<String>,
    last_name: Option<String>,
) -> anyhow::Result<Registration> {
    let email = normalize_email(email);
    if !is_valid_email(&email) || password.is_empty() {
        warn!(email = %email, "invalid registration");
        return Ok(Registration::Invalid);
    }
    if store.find_user_by_email(&email).await?.is_some() {
        warn!(email = %email, "email already registered");
        return Ok(Registration::EmailTaken);
    }

    let new = NewUser {
        email,
        password_hash: hash_password(password)?,
        first_name: first_name.filter(|s| !s.trim().is_empty()),
        last_name: last_name.filter(|s| !s.trim().is_empty()),
    };
    match store.create_user(new).await? {
        Some(user) => {
            info!(user_id = %user.id, email = %user.email, "user registered");
            Ok(Registration::Created(user))
        }
        // lost the race against a concurrent registration
        None => Ok(Registration::EmailTaken),
    }
}
