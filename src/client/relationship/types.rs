//! Relationship record types

use super::api::ClientError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Toggleable relationship backed by a repository record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RelationshipKind {
    /// Follow an actor
    Follow,
    /// Block an actor
    Block,
    /// Like a post
    Like,
    /// Repost a post
    Repost,
}

impl RelationshipKind {
    /// Record collection NSID
    pub fn collection(self) -> &'static str {
        match self {
            RelationshipKind::Follow => "app.bsky.graph.follow",
            RelationshipKind::Block => "app.bsky.graph.block",
            RelationshipKind::Like => "app.bsky.feed.like",
            RelationshipKind::Repost => "app.bsky.feed.repost",
        }
    }

    /// Whether the record subject is an actor (as opposed to a post)
    pub fn targets_actor(self) -> bool {
        matches!(self, RelationshipKind::Follow | RelationshipKind::Block)
    }
}

impl fmt::Display for RelationshipKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RelationshipKind::Follow => "follow",
            RelationshipKind::Block => "block",
            RelationshipKind::Like => "like",
            RelationshipKind::Repost => "repost",
        };
        f.write_str(name)
    }
}

/// What a relationship record points at
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Subject {
    /// An account, by DID
    Actor { did: String },
    /// A post, by strong reference
    Post { uri: String, cid: String },
}

impl Subject {
    pub fn actor(did: impl Into<String>) -> Self {
        Subject::Actor { did: did.into() }
    }

    pub fn post(uri: impl Into<String>, cid: impl Into<String>) -> Self {
        Subject::Post {
            uri: uri.into(),
            cid: cid.into(),
        }
    }

    /// Stable identifier used as a cache key
    pub fn key(&self) -> &str {
        match self {
            Subject::Actor { did } => did,
            Subject::Post { uri, .. } => uri,
        }
    }

    /// JSON form used in the record's `subject` field
    pub fn to_record_value(&self) -> serde_json::Value {
        match self {
            Subject::Actor { did } => serde_json::Value::String(did.clone()),
            Subject::Post { uri, cid } => serde_json::json!({ "uri": uri, "cid": cid }),
        }
    }
}

/// Cache and queue key for one toggleable entity
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EntityKey {
    pub kind: RelationshipKind,
    pub subject: String,
}

impl EntityKey {
    pub fn new(kind: RelationshipKind, subject: &Subject) -> Self {
        Self {
            kind,
            subject: subject.key().to_string(),
        }
    }
}

impl fmt::Display for EntityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind, self.subject)
    }
}

/// `at://` URI of a repository record
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RecordUri {
    uri: String,
}

impl RecordUri {
    /// Parse `at://<authority>/<collection>/<rkey>`
    pub fn parse(uri: impl Into<String>) -> Result<Self, ClientError> {
        let uri = uri.into();
        let valid = uri
            .strip_prefix("at://")
            .map(|rest| {
                let parts: Vec<&str> = rest.split('/').collect();
                parts.len() == 3 && parts.iter().all(|p| !p.is_empty())
            })
            .unwrap_or(false);
        if !valid {
            return Err(ClientError::InvalidUri(uri));
        }
        Ok(Self { uri })
    }

    fn segment(&self, index: usize) -> &str {
        self.uri["at://".len()..].split('/').nth(index).unwrap_or_default()
    }

    /// Repository DID
    pub fn authority(&self) -> &str {
        self.segment(0)
    }

    pub fn collection(&self) -> &str {
        self.segment(1)
    }

    /// Record key
    pub fn rkey(&self) -> &str {
        self.segment(2)
    }

    pub fn as_str(&self) -> &str {
        &self.uri
    }
}

impl TryFrom<String> for RecordUri {
    type Error = ClientError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        RecordUri::parse(value)
    }
}

impl From<RecordUri> for String {
    fn from(value: RecordUri) -> Self {
        value.uri
    }
}

impl fmt::Display for RecordUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.uri)
    }
}
