//! CMS client, the single point of entry for all calls to the remote store.
//!
//! Every resume request carries the session credential as a bearer token.
//! 401/403 responses are reported as `StoreError::Unauthorized` so the service
//! can tear the session down. No request is ever retried.

use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode, Url};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::models::resume::{ResumeRecord, ResumeSummary};
use crate::resume::normalize::normalize;
use crate::session::Session;
use crate::store::envelope::{collection_items, single_item, summary_from, DataEnvelope, ResumeData};
use crate::store::{AuthGateway, AuthGrant, EmailMessage, ResumeStore, StoreError};

const RESUMES: &str = "resumes";

#[derive(Debug, Deserialize)]
struct CmsError {
    error: CmsErrorBody,
}

#[derive(Debug, Deserialize)]
struct CmsErrorBody {
    message: String,
}

#[derive(Clone)]
pub struct CmsClient {
    client: Client,
    base_url: Url,
}

impl CmsClient {
    pub fn new(base_url: &str, timeout: Duration) -> anyhow::Result<Self> {
        let base_url = Url::parse(base_url)
            .with_context(|| format!("CMS_API_URL '{base_url}' is not a valid URL"))?;
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self { client, base_url })
    }

    /// `base_url` with `segments` appended, each percent-encoded.
    fn url(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn authorized(&self, request: RequestBuilder, session: &Session) -> RequestBuilder {
        match session.token() {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Sends a request and classifies the response. `what` names the target
    /// in errors and logs.
    async fn send(&self, request: RequestBuilder, what: &str) -> Result<Value, StoreError> {
        let response = request.send().await?;
        let status = response.status();

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            warn!("Store rejected credential for {what}: {status}");
            return Err(StoreError::Unauthorized {
                status: status.as_u16(),
            });
        }

        if status == StatusCode::NOT_FOUND {
            return Err(StoreError::NotFound(what.to_string()));
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<CmsError>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            warn!("Store returned {status} for {what}: {message}");
            return Err(StoreError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let bytes = response.bytes().await?;
        if bytes.is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_slice(&bytes).map_err(|e| StoreError::Decode(e.to_string()))
    }
}

#[async_trait]
impl ResumeStore for CmsClient {
    async fn fetch_list(&self, session: &Session) -> Result<Vec<ResumeSummary>, StoreError> {
        let request = self.authorized(self.client.get(self.url(&[RESUMES])), session);
        let body = self.send(request, "Resume list").await?;

        let summaries: Vec<_> = collection_items(&body).iter().map(summary_from).collect();
        debug!("Fetched {} resumes", summaries.len());
        Ok(summaries)
    }

    async fn fetch_one(
        &self,
        session: &Session,
        document_id: &str,
    ) -> Result<ResumeRecord, StoreError> {
        let request = self
            .client
            .get(self.url(&[RESUMES]))
            .query(&[("filters[documentId][$eq]", document_id), ("populate", "*")]);
        let what = format!("Resume {document_id}");
        let body = self.send(self.authorized(request, session), &what).await?;

        single_item(&body)
            .map(|item| normalize(&item))
            .ok_or(StoreError::NotFound(what))
    }

    async fn create(
        &self,
        session: &Session,
        record: &ResumeRecord,
    ) -> Result<ResumeRecord, StoreError> {
        let payload = DataEnvelope {
            data: ResumeData::from(record),
        };
        let request = self
            .authorized(self.client.post(self.url(&[RESUMES])), session)
            .json(&payload);
        let body = self.send(request, "Resume").await?;

        let created = single_item(&body)
            .map(|item| normalize(&item))
            .ok_or_else(|| StoreError::Decode("create returned no record".to_string()))?;
        debug!("Created resume {:?}", created.document_id);
        Ok(created)
    }

    async fn update(
        &self,
        session: &Session,
        document_id: &str,
        record: &ResumeRecord,
    ) -> Result<ResumeRecord, StoreError> {
        let payload = DataEnvelope {
            data: ResumeData::from(record),
        };
        let request = self
            .authorized(self.client.put(self.url(&[RESUMES, document_id])), session)
            .json(&payload);
        let body = self
            .send(request, &format!("Resume {document_id}"))
            .await?;

        // Some store versions answer an update with an empty body.
        Ok(single_item(&body).map(|item| normalize(&item)).unwrap_or_else(|| {
            let mut stored = record.clone();
            stored.document_id = Some(document_id.to_string());
            stored
        }))
    }

    async fn remove(&self, session: &Session, document_id: &str) -> Result<(), StoreError> {
        let request = self.authorized(
            self.client.delete(self.url(&[RESUMES, document_id])),
            session,
        );
        self.send(request, &format!("Resume {document_id}")).await?;
        debug!("Deleted resume {document_id}");
        Ok(())
    }
}

#[async_trait]
impl AuthGateway for CmsClient {
    async fn login(&self, identifier: &str, password: &str) -> Result<AuthGrant, StoreError> {
        let request = self
            .client
            .post(self.url(&["auth", "local"]))
            .json(&json!({ "identifier": identifier, "password": password }));
        let body = self.send(request, "Login").await?;
        serde_json::from_value(body).map_err(|e| StoreError::Decode(e.to_string()))
    }

    async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<AuthGrant, StoreError> {
        let request = self
            .client
            .post(self.url(&["auth", "local", "register"]))
            .json(&json!({ "username": username, "email": email, "password": password }));
        let body = self.send(request, "Registration").await?;
        serde_json::from_value(body).map_err(|e| StoreError::Decode(e.to_string()))
    }

    async fn send_email(&self, message: &EmailMessage) -> Result<(), StoreError> {
        let request = self.client.post(self.url(&["send-email"])).json(message);
        self.send(request, "Email endpoint").await?;
        debug!("Dispatched email to {}", message.to);
        Ok(())
    }
}
