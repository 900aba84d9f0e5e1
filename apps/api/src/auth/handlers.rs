use anyhow::Context;
use axum::{extract::State, http::StatusCode, Json};
use reqwest::Url;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::AppError;
use crate::models::user::SessionUser;
use crate::session::cookies::{login_cookies, logout_cookies, CookieHeaders};
use crate::session::Session;
use crate::state::AppState;
use crate::store::{AuthGrant, EmailMessage};

const RESET_SUBJECT: &str = "Password Reset Instructions";

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub identifier: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct ForgotPasswordRequest {
    pub email: String,
}

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub authenticated: bool,
    pub user: Option<SessionUser>,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// POST /api/v1/auth/login
pub async fn handle_login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<(CookieHeaders, Json<SessionResponse>), AppError> {
    require("identifier", &req.identifier)?;
    require("password", &req.password)?;

    let grant = state.auth.login(req.identifier.trim(), &req.password).await?;
    info!("User {} logged in", grant.user.id);
    Ok(start_session(&state, grant))
}

/// POST /api/v1/auth/register
pub async fn handle_register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<(CookieHeaders, Json<SessionResponse>), AppError> {
    require("username", &req.username)?;
    require("email", &req.email)?;
    require("password", &req.password)?;

    let grant = state
        .auth
        .register(req.username.trim(), req.email.trim(), &req.password)
        .await?;
    info!("Registered user {}", grant.user.id);
    Ok(start_session(&state, grant))
}

/// POST /api/v1/auth/logout
pub async fn handle_logout() -> (StatusCode, CookieHeaders) {
    (StatusCode::NO_CONTENT, logout_cookies())
}

/// POST /api/v1/auth/forgot-password
pub async fn handle_forgot_password(
    State(state): State<AppState>,
    Json(req): Json<ForgotPasswordRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    let email = req.email.trim();
    if !email.contains('@') {
        return Err(AppError::Validation(
            "A valid email address is required".to_string(),
        ));
    }

    let link = reset_link(&state.config.frontend_url, email)?;
    let message = EmailMessage {
        to: email.to_string(),
        subject: RESET_SUBJECT.to_string(),
        html: format!(
            "<p>A password reset was requested for your account.</p>\
             <p><a href=\"{link}\">Reset your password</a></p>\
             <p>This link will expire in 1 hour.</p>"
        ),
    };
    state.auth.send_email(&message).await?;
    info!("Password reset instructions sent");

    Ok(Json(MessageResponse {
        message: "Password reset instructions have been sent to your email".to_string(),
    }))
}

/// GET /api/v1/auth/session
pub async fn handle_session(session: Session) -> (StatusCode, Json<SessionResponse>) {
    let status = if session.is_authenticated() {
        StatusCode::OK
    } else {
        StatusCode::UNAUTHORIZED
    };
    (
        status,
        Json(SessionResponse {
            authenticated: session.is_authenticated(),
            user: session.user().cloned(),
        }),
    )
}

fn start_session(state: &AppState, grant: AuthGrant) -> (CookieHeaders, Json<SessionResponse>) {
    let cookies = login_cookies(&grant.jwt, &grant.user, state.config.session_cookie_days);
    (
        cookies,
        Json(SessionResponse {
            authenticated: true,
            user: Some(grant.user),
        }),
    )
}

fn require(name: &str, value: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{name} is required")));
    }
    Ok(())
}

/// `<frontend>/reset-password/?email=<email>`, with the address query-encoded.
pub fn reset_link(frontend_url: &str, email: &str) -> Result<Url, AppError> {
    let base = format!("{}/reset-password/", frontend_url.trim_end_matches('/'));
    let mut link = Url::parse(&base).context("FRONTEND_URL is not a valid URL")?;
    link.query_pairs_mut().append_pair("email", email);
    Ok(link)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reset_link_encodes_email() {
        let link = reset_link("http://localhost:3000/", "jane+cv@x.com").unwrap();
        assert_eq!(
            link.as_str(),
            "http://localhost:3000/reset-password/?email=jane%2Bcv%40x.com"
        );
    }

    #[test]
    fn test_reset_link_rejects_bad_frontend() {
        assert!(matches!(
            reset_link("not a url", "j@x.com"),
            Err(AppError::Internal(_))
        ));
    }

    #[test]
    fn test_require_rejects_blank() {
        assert!(require("password", "  ").is_err());
        assert!(require("password", "pw").is_ok());
    }
}
