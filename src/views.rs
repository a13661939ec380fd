//! Server-rendered HTML pages.

use axum::response::Html;
use uuid::Uuid;

use crate::auth::{repo_types::User, services::Flash};

/// Row of a rendered list.
pub struct ItemView<'a> {
    pub id: Uuid,
    pub name: &'a str,
}

pub fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

fn layout(title: &str, nav: bool, body: &str) -> Html<String> {
    let nav = if nav {
        r#"<nav><a href="/">Today</a> · <a href="/profile">Profile</a> · <a href="/about">About</a> · <a href="/logout">Log out</a></nav>"#
    } else {
        ""
    };
    Html(format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{title}</title>
<link rel="stylesheet" href="/css/styles.css">
</head>
<body>
{nav}
{body}
<footer>To-do list</footer>
</body>
</html>
"#,
        title = escape(title),
    ))
}

fn flash_block(flash: Option<Flash>) -> String {
    flash
        .map(|f| format!(r#"<p class="flash">{}</p>"#, escape(f.message())))
        .unwrap_or_default()
}

/// Whether a rendered list offers the add and delete forms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListMode {
    Editable,
    ReadOnly,
}

pub fn list_page(title: &str, items: &[ItemView<'_>], mode: ListMode) -> Html<String> {
    let title_attr = escape(title);
    let mut body = format!(
        r#"<div class="box" id="heading"><h1>{title_attr}</h1></div>
<div class="box">
"#
    );
    for item in items {
        let name = escape(item.name);
        let row = match mode {
            ListMode::Editable => format!(
                r#"<form action="/delete" method="post">
<div class="item">
<input type="checkbox" name="checkbox" value="{id}" onchange="this.form.submit()">
<p>{name}</p>
</div>
<input type="hidden" name="listName" value="{title_attr}">
</form>
"#,
                id = item.id,
            ),
            ListMode::ReadOnly => format!("<div class=\"item\"><p>{name}</p></div>\n"),
        };
        body.push_str(&row);
    }
    if mode == ListMode::Editable {
        body.push_str(&format!(
            r#"<form class="item" action="/" method="post">
<input type="text" name="newItem" placeholder="New Item" autocomplete="off">
<button type="submit" name="list" value="{title_attr}">+</button>
</form>
"#
        ));
    }
    body.push_str("</div>\n");
    layout(title, true, &body)
}

pub fn login_page(flash: Option<Flash>) -> Html<String> {
    let body = format!(
        r#"<div class="box" id="heading"><h1>Log in</h1></div>
<div class="box">
{flash}
<form action="/login" method="post">
<div class="item"><input type="email" name="email" placeholder="Email" required></div>
<div class="item"><input type="password" name="password" placeholder="Password" required></div>
<div class="item"><button type="submit">→</button></div>
</form>
<p>No account? <a href="/register">Register</a></p>
</div>
"#,
        flash = flash_block(flash),
    );
    layout("Log in", false, &body)
}

pub fn register_page(flash: Option<Flash>) -> Html<String> {
    let body = format!(
        r#"<div class="box" id="heading"><h1>Register</h1></div>
<div class="box">
{flash}
<form action="/register" method="post">
<div class="item"><input type="text" name="firstName" placeholder="First name"></div>
<div class="item"><input type="text" name="lastName" placeholder="Last name"></div>
<div class="item"><input type="email" name="email" placeholder="Email" required></div>
<div class="item"><input type="password" name="password" placeholder="Password" required></div>
<div class="item"><button type="submit">→</button></div>
</form>
<p>Already registered? <a href="/login">Log in</a></p>
</div>
"#,
        flash = flash_block(flash),
    );
    layout("Register", false, &body)
}

pub fn profile_page(user: &User) -> Html<String> {
    let opt = |v: &Option<String>| escape(v.as_deref().unwrap_or(""));
    let body = format!(
        r#"<div class="box" id="heading"><h1>{name}</h1></div>
<div class="box">
<p>Email: {email}</p>
<p>First name: {first}</p>
<p>Last name: {last}</p>
<p><a href="/change_password">Change password</a></p>
</div>
"#,
        name = escape(&user.display_name()),
        email = escape(&user.email),
        first = opt(&user.first_name),
        last = opt(&user.last_name),
    );
    layout("Profile", true, &body)
}

pub fn change_password_page() -> Html<String> {
    let body = r#"<div class="box" id="heading"><h1>Change password</h1></div>
<div class="box">
<form action="/change_password" method="post">
<div class="item"><input type="password" name="currentPassword" placeholder="Current password" required></div>
<div class="item"><input type="password" name="newPassword" placeholder="New password" required></div>
<div class="item"><button type="submit">→</button></div>
</form>
</div>
"#;
    layout("Change password", true, body)
}

pub fn about_page() -> Html<String> {
    let body = r#"<div class="box" id="heading"><h1>About</h1></div>
<div class="box">
<p>A small to-do list: a "Today" list plus any named list you visit at <code>/&lt;name&gt;</code>.</p>
</div>
"#;
    layout("About", false, body)
}
