pub mod health;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use crate::auth::handlers as auth;
use crate::resume::handlers as resumes;
use crate::session::guard::{redirect_expired, require_session};
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    // Everything under /api/v1/resumes needs a session cookie.
    let protected = Router::new()
        .route(
            "/api/v1/resumes",
            get(resumes::handle_list).post(resumes::handle_create),
        )
        .route("/api/v1/resumes/new", get(resumes::handle_new))
        .route(
            "/api/v1/resumes/:document_id",
            get(resumes::handle_get)
                .put(resumes::handle_update)
                .delete(resumes::handle_delete),
        )
        .route("/api/v1/resumes/:document_id/edit", get(resumes::handle_edit))
        .route(
            "/api/v1/resumes/:document_id/preview",
            post(resumes::handle_preview),
        )
        .route("/api/v1/resumes/:document_id/pdf", get(resumes::handle_pdf))
        .route("/api/v1/resumes/:document_id/tex", get(resumes::handle_tex))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_session,
        ));

    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/auth/login", post(auth::handle_login))
        .route("/api/v1/auth/register", post(auth::handle_register))
        .route("/api/v1/auth/logout", post(auth::handle_logout))
        .route(
            "/api/v1/auth/forgot-password",
            post(auth::handle_forgot_password),
        )
        .route("/api/v1/auth/session", get(auth::handle_session))
        .merge(protected)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            redirect_expired,
        ))
        .with_state(state)
}
