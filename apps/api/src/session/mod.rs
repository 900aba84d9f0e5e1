//! Session context: the bearer credential and cached user, read per request
//! from cookies.
//!
//! There is no process-wide session state. Handlers receive a `Session` via
//! the extractor below and pass it to the store explicitly; issuing and tearing
//! down the cookies is done by `session::cookies`.

pub mod cookies;
pub mod guard;

use std::convert::Infallible;

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::COOKIE, request::Parts, HeaderMap},
};
use cookie::Cookie;
use tracing::warn;

use crate::models::user::SessionUser;

pub const TOKEN_COOKIE: &str = "token";
pub const USER_COOKIE: &str = "user";
/// Login page path on the frontend.
pub const LOGIN_PATH: &str = "/login";

/// Response extension marking a session teardown. `guard::redirect_expired`
/// turns responses carrying it into a redirect to the login page.
#[derive(Debug, Clone, Copy)]
pub struct SessionExpired;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
    token: Option<String>,
    user: Option<SessionUser>,
}

impl Session {
    /// A session carrying only a credential (no cached user).
    #[cfg(test)]
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: Some(token.into()),
            user: None,
        }
    }

    /// Reads the `token` and `user` cookies from request headers.
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let mut token = None;
        let mut user = None;

        for value in headers.get_all(COOKIE) {
            let Ok(value) = value.to_str() else {
                continue;
            };
            for cookie in Cookie::split_parse_encoded(value).flatten() {
                match cookie.name() {
                    TOKEN_COOKIE => token = Some(cookie.value().to_string()),
                    USER_COOKIE => user = Some(cookie.value().to_string()),
                    _ => {}
                }
            }
        }

        Self::initialize(token, user)
    }

    /// Restores a session from raw cookie values. The cached user is only
    /// restored alongside a token; a malformed user cookie is dropped while
    /// the token is kept.
    pub fn initialize(token: Option<String>, user_json: Option<String>) -> Self {
        let token = token.filter(|t| !t.is_empty());
        let user = match (&token, user_json) {
            (Some(_), Some(raw)) => match serde_json::from_str::<SessionUser>(&raw) {
                Ok(user) => Some(user),
                Err(e) => {
                    warn!("Ignoring unparseable user cookie: {e}");
                    None
                }
            },
            _ => None,
        };
        Self { token, user }
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn user(&self) -> Option<&SessionUser> {
        self.user.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }
}

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for Session {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Session::from_headers(&parts.headers))
    }
}
