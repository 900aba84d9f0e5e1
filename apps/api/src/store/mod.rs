//! Persistence adapter, the only code that talks to the remote resume store.
//!
//! `AppState` holds the store as `Arc<dyn ResumeStore>` and the auth endpoints
//! as `Arc<dyn AuthGateway>`; `CmsClient` implements both over HTTP.

pub mod cms;
pub mod envelope;
#[cfg(test)]
pub mod memory;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::errors::AppError;
use crate::models::resume::{ResumeRecord, ResumeSummary};
use crate::models::user::SessionUser;
use crate::session::Session;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("HTTP error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("{0} not found")]
    NotFound(String),

    /// 401 or 403 from the store: the credential is missing, invalid or expired.
    #[error("Unauthorized (status {status})")]
    Unauthorized { status: u16 },

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Malformed store response: {0}")]
    Decode(String),
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Network(e) => AppError::Network(e.to_string()),
            StoreError::NotFound(what) => AppError::NotFound(format!("{what} not found")),
            StoreError::Unauthorized { .. } => AppError::Unauthorized,
            StoreError::Api { status, message } => AppError::Upstream { status, message },
            StoreError::Decode(msg) => {
                AppError::Internal(anyhow::anyhow!("Malformed store response: {msg}"))
            }
        }
    }
}

/// Resume CRUD. Every call attaches the session credential; single-record
/// operations address records by `documentId`.
#[async_trait]
pub trait ResumeStore: Send + Sync {
    /// Reduced projection of every record visible to the session.
    async fn fetch_list(&self, session: &Session) -> Result<Vec<ResumeSummary>, StoreError>;

    /// One full record, unpadded.
    async fn fetch_one(
        &self,
        session: &Session,
        document_id: &str,
    ) -> Result<ResumeRecord, StoreError>;

    /// Stores a new record; the store assigns `id` and `documentId`.
    async fn create(
        &self,
        session: &Session,
        record: &ResumeRecord,
    ) -> Result<ResumeRecord, StoreError>;

    /// Full replace of the named record's fields. Last write wins.
    async fn update(
        &self,
        session: &Session,
        document_id: &str,
        record: &ResumeRecord,
    ) -> Result<ResumeRecord, StoreError>;

    async fn remove(&self, session: &Session, document_id: &str) -> Result<(), StoreError>;
}

/// Credential + user returned by login and registration.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthGrant {
    pub jwt: String,
    pub user: SessionUser,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    pub html: String,
}

#[async_trait]
pub trait AuthGateway: Send + Sync {
    async fn login(&self, identifier: &str, password: &str) -> Result<AuthGrant, StoreError>;

    async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<AuthGrant, StoreError>;

    /// Opaque notification side channel, used only for password resets.
    async fn send_email(&self, message: &EmailMessage) -> Result<(), StoreError>;
}
