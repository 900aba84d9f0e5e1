use axum::{
    body::Body,
    extract::{Request, State},
    http::{
        header::{CONTENT_TYPE, LOCATION},
        HeaderValue, StatusCode,
    },
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use reqwest::Url;
use tracing::{info, warn};

use crate::session::{Session, SessionExpired, LOGIN_PATH};
use crate::state::AppState;

/// Route guard for protected routes: without a `token` cookie the request is
/// redirected to the frontend login page and never reaches a handler (so no
/// store request is issued).
pub async fn require_session(
    State(state): State<AppState>,
    session: Session,
    request: Request,
    next: Next,
) -> Response {
    if session.is_authenticated() {
        return next.run(request).await;
    }

    let path = request.uri().path();
    info!("No session token for {path}, redirecting to login");
    Redirect::to(&login_url(&state.config.frontend_url, Some(path))).into_response()
}

/// Rewrites a session teardown raised by a handler into a redirect to the
/// frontend login page. The removal cookies already on the response are kept.
pub async fn redirect_expired(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let response = next.run(request).await;
    if response.extensions().get::<SessionExpired>().is_none() {
        return response;
    }

    let (mut parts, _) = response.into_parts();
    parts.status = StatusCode::SEE_OTHER;
    parts.headers.remove(CONTENT_TYPE);
    match HeaderValue::try_from(login_url(&state.config.frontend_url, None)) {
        Ok(location) => {
            parts.headers.insert(LOCATION, location);
        }
        Err(e) => warn!("Login URL is not a valid header value: {e}"),
    }
    Response::from_parts(parts, Body::empty())
}

/// `<frontend>/login`, with the originating path as a query-encoded
/// `redirect` parameter when given.
pub fn login_url(frontend_url: &str, redirect: Option<&str>) -> String {
    let base = format!("{}{LOGIN_PATH}", frontend_url.trim_end_matches('/'));
    let Ok(mut url) = Url::parse(&base) else {
        warn!("FRONTEND_URL '{frontend_url}' is not a valid URL, using a relative login path");
        return LOGIN_PATH.to_string();
    };
    if let Some(from) = redirect {
        url.query_pairs_mut().append_pair("redirect", from);
    }
    url.into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_url_points_at_frontend() {
        assert_eq!(
            login_url("http://localhost:3000/", None),
            "http://localhost:3000/login"
        );
    }

    #[test]
    fn test_login_url_encodes_origin_path() {
        assert_eq!(
            login_url("http://localhost:3000", Some("/api/v1/resumes/a&b=c")),
            "http://localhost:3000/login?redirect=%2Fapi%2Fv1%2Fresumes%2Fa%26b%3Dc"
        );
    }

    #[test]
    fn test_login_url_keeps_frontend_base_path() {
        assert_eq!(
            login_url("https://example.com/app", Some("/x")),
            "https://example.com/app/login?redirect=%2Fx"
        );
    }

    #[test]
    fn test_invalid_frontend_falls_back_to_relative_path() {
        assert_eq!(login_url("not a url", None), LOGIN_PATH);
    }
}
