//! `Set-Cookie` values for login and session teardown.

use axum::{http::header::SET_COOKIE, http::HeaderName, response::AppendHeaders};
use cookie::{time::Duration, Cookie, SameSite};

use crate::models::user::SessionUser;
use crate::session::{TOKEN_COOKIE, USER_COOKIE};

pub type CookieHeaders = AppendHeaders<Vec<(HeaderName, String)>>;

/// Cookies issued after a successful login or registration. The user is
/// stored as percent-encoded JSON so it survives `;` and `,` in names.
pub fn login_cookies(token: &str, user: &SessionUser, days: i64) -> CookieHeaders {
    let user_json = serde_json::to_string(user).unwrap_or_default();
    headers(vec![
        session_cookie(TOKEN_COOKIE, token.to_string(), days),
        session_cookie(USER_COOKIE, user_json, days),
    ])
}

/// Removal cookies for both the credential and the cached user.
pub fn logout_cookies() -> CookieHeaders {
    headers(
        [TOKEN_COOKIE, USER_COOKIE]
            .into_iter()
            .map(|name| {
                let mut cookie = Cookie::build((name, "")).path("/").build();
                cookie.make_removal();
                cookie.to_string()
            })
            .collect(),
    )
}

fn session_cookie(name: &'static str, value: String, days: i64) -> String {
    Cookie::build((name, value))
        .path("/")
        .same_site(SameSite::Lax)
        .max_age(Duration::days(days))
        .build()
        .encoded()
        .to_string()
}

fn headers(values: Vec<String>) -> CookieHeaders {
    AppendHeaders(values.into_iter().map(|v| (SET_COOKIE, v)).collect())
}
