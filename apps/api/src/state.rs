use std::sync::Arc;

use crate::config::Config;
use crate::render::PdfRenderer;
use crate::store::{AuthGateway, ResumeStore};

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Resume persistence. `CmsClient` in production.
    pub store: Arc<dyn ResumeStore>,
    pub auth: Arc<dyn AuthGateway>,
    pub config: Config,
    pub pdf: PdfRenderer,
}
