//! In-memory store used by router tests. Counts every call so tests can
//! assert that a request never reached the store.

use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::models::resume::{ResumeRecord, ResumeSummary};
use crate::models::user::SessionUser;
use crate::session::Session;
use crate::store::{AuthGateway, AuthGrant, EmailMessage, ResumeStore, StoreError};

/// Token the fake store treats as expired.
pub const EXPIRED_TOKEN: &str = "expired";
pub const PASSWORD: &str = "secret";

pub struct MemoryStore {
    pub records: Mutex<Vec<ResumeRecord>>,
    pub sent: Mutex<Vec<EmailMessage>>,
    calls: AtomicUsize,
    next_id: AtomicI64,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self {
            records: Mutex::new(Vec::new()),
            sent: Mutex::new(Vec::new()),
            calls: AtomicUsize::new(0),
            next_id: AtomicI64::new(1),
        }
    }
}

impl MemoryStore {
    pub fn with_records(records: Vec<ResumeRecord>) -> Self {
        let store = Self::default();
        *store.records.lock().unwrap() = records;
        store
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn get(&self, document_id: &str) -> Option<ResumeRecord> {
        self.records
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.document_id.as_deref() == Some(document_id))
            .cloned()
    }

    fn enter(&self, session: &Session) -> Result<(), StoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match session.token() {
            Some(EXPIRED_TOKEN) | None => Err(StoreError::Unauthorized { status: 401 }),
            Some(_) => Ok(()),
        }
    }

    fn grant(&self, username: &str, email: &str) -> AuthGrant {
        AuthGrant {
            jwt: format!("jwt-{username}"),
            user: SessionUser {
                id: self.next_id.fetch_add(1, Ordering::SeqCst),
                username: username.to_string(),
                email: email.to_string(),
            },
        }
    }
}

#[async_trait]
impl ResumeStore for MemoryStore {
    async fn fetch_list(&self, session: &Session) -> Result<Vec<ResumeSummary>, StoreError> {
        self.enter(session)?;
        Ok(self
            .records
            .lock()
            .unwrap()
            .iter()
            .map(|r| ResumeSummary {
                id: r.id,
                document_id: r.document_id.clone(),
                full_name: r.full_name.clone(),
                email: r.email.clone(),
                phone: r.phone.clone(),
                summary: r.summary.clone(),
                created_at: None,
            })
            .collect())
    }

    async fn fetch_one(
        &self,
        session: &Session,
        document_id: &str,
    ) -> Result<ResumeRecord, StoreError> {
        self.enter(session)?;
        self.get(document_id)
            .ok_or_else(|| StoreError::NotFound(format!("Resume {document_id}")))
    }

    async fn create(
        &self,
        session: &Session,
        record: &ResumeRecord,
    ) -> Result<ResumeRecord, StoreError> {
        self.enter(session)?;
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let mut stored = record.clone();
        stored.id = Some(id);
        stored.document_id = Some(format!("doc-{id}"));
        self.records.lock().unwrap().push(stored.clone());
        Ok(stored)
    }

    async fn update(
        &self,
        session: &Session,
        document_id: &str,
        record: &ResumeRecord,
    ) -> Result<ResumeRecord, StoreError> {
        self.enter(session)?;
        let mut records = self.records.lock().unwrap();
        let slot = records
            .iter_mut()
            .find(|r| r.document_id.as_deref() == Some(document_id))
            .ok_or_else(|| StoreError::NotFound(format!("Resume {document_id}")))?;
        let (id, document_id) = (slot.id, slot.document_id.clone());
        *slot = ResumeRecord {
            id,
            document_id,
            ..record.clone()
        };
        Ok(slot.clone())
    }

    async fn remove(&self, session: &Session, document_id: &str) -> Result<(), StoreError> {
        self.enter(session)?;
        let mut records = self.records.lock().unwrap();
        let before = records.len();
        records.retain(|r| r.document_id.as_deref() != Some(document_id));
        if records.len() == before {
            return Err(StoreError::NotFound(format!("Resume {document_id}")));
        }
        Ok(())
    }
}

#[async_trait]
impl AuthGateway for MemoryStore {
    async fn login(&self, identifier: &str, password: &str) -> Result<AuthGrant, StoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if password != PASSWORD {
            return Err(StoreError::Api {
                status: 400,
                message: "Invalid identifier or password".to_string(),
            });
        }
        Ok(self.grant(identifier, &format!("{identifier}@example.com")))
    }

    async fn register(
        &self,
        username: &str,
        email: &str,
        _password: &str,
    ) -> Result<AuthGrant, StoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.grant(username, email))
    }

    async fn send_email(&self, message: &EmailMessage) -> Result<(), StoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.sent.lock().unwrap().push(message.clone());
        Ok(())
    }
}
