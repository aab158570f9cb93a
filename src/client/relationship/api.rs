//! Relationship API Client
//!
//! Creates and deletes relationship records over XRPC, and mutes or unmutes
//! actors. These are the network effects that the toggle queue serializes.

use super::types::{RecordUri, RelationshipKind, Subject};
use crate::shared::config::AppConfig;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from the relationship API
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Request failed: {status} - {body}")]
    Status { status: StatusCode, body: String },

    #[error("Session expired or invalid")]
    Unauthorized,

    #[error("Failed to parse response: {0}")]
    Decode(String),

    #[error("Invalid record URI: {0}")]
    InvalidUri(String),

    #[error("Not authenticated: {0}")]
    NotAuthenticated(&'static str),

    #[error("{kind} records need an {expected} subject")]
    SubjectMismatch {
        kind: RelationshipKind,
        expected: &'static str,
    },
}

#[derive(Debug, Serialize)]
struct CreateRecordRequest<'a> {
    repo: &'a str,
    collection: &'a str,
    record: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct CreateRecordResponse {
    uri: String,
}

#[derive(Debug, Serialize)]
struct DeleteRecordRequest<'a> {
    repo: &'a str,
    collection: &'a str,
    rkey: &'a str,
}

#[derive(Debug, Serialize)]
struct ActorRequest<'a> {
    actor: &'a str,
}

/// XRPC client for relationship records
#[derive(Debug, Clone)]
pub struct RelationshipClient {
    config: AppConfig,
    client: Client,
}

impl RelationshipClient {
    pub fn new(config: AppConfig) -> Self {
        Self {
            config,
            client: Client::new(),
        }
    }

    /// Settings this client was built from
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    fn xrpc_url(&self, nsid: &str) -> String {
        format!("{}/xrpc/{}", self.config.server_url().trim_end_matches('/'), nsid)
    }

    fn repo(&self) -> Result<&str, ClientError> {
        self.config
            .repo_did
            .as_deref()
            .ok_or(ClientError::NotAuthenticated("no repository DID configured"))
    }

    async fn procedure<B: Serialize>(
        &self,
        nsid: &str,
        body: &B,
    ) -> Result<reqwest::Response, ClientError> {
        let token = self
            .config
            .access_token
            .as_deref()
            .ok_or(ClientError::NotAuthenticated("no access token"))?;

        let response = self
            .client
            .post(self.xrpc_url(nsid))
            .bearer_auth(token)
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        if status == StatusCode::UNAUTHORIZED {
            return Err(ClientError::Unauthorized);
        }
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| status.to_string());
        Err(ClientError::Status { status, body })
    }

    /// Create a relationship record, returning its URI
    pub async fn create_record(
        &self,
        kind: RelationshipKind,
        subject: &Subject,
    ) -> Result<RecordUri, ClientError> {
        if kind.targets_actor() != matches!(subject, Subject::Actor { .. }) {
            let expected = if kind.targets_actor() { "actor" } else { "post" };
            return Err(ClientError::SubjectMismatch { kind, expected });
        }
        let repo = self.repo()?;
        let record = serde_json::json!({
            "$type": kind.collection(),
            "subject": subject.to_record_value(),
            "createdAt": chrono::Utc::now().to_rfc3339(),
        });
        let request = CreateRecordRequest {
            repo,
            collection: kind.collection(),
            record,
        };

        let response = self
            .procedure("com.atproto.repo.createRecord", &request)
            .await?
            .json::<CreateRecordResponse>()
            .await
            .map_err(|e| ClientError::Decode(e.to_string()))?;

        let uri = RecordUri::parse(response.uri)?;
        tracing::info!("[RELATIONSHIP] Created {} record: {}", kind, uri);
        Ok(uri)
    }

    /// Delete a relationship record
    pub async fn delete_record(&self, uri: &RecordUri) -> Result<(), ClientError> {
        let request = DeleteRecordRequest {
            repo: self.repo()?,
            collection: uri.collection(),
            rkey: uri.rkey(),
        };
        self.procedure("com.atproto.repo.deleteRecord", &request).await?;
        tracing::info!("[RELATIONSHIP] Deleted record: {}", uri);
        Ok(())
    }

    /// Mute or unmute an actor
    pub async fn set_muted(&self, actor: &str, muted: bool) -> Result<(), ClientError> {
        let nsid = if muted {
            "app.bsky.graph.muteActor"
        } else {
            "app.bsky.graph.unmuteActor"
        };
        self.procedure(nsid, &ActorRequest { actor }).await?;
        tracing::info!("[RELATIONSHIP] Set muted={} for {}", muted, actor);
        Ok(())
    }
}
