//! Investigation report and attachment models.
//!
//! # Invariants
//! - Report and attachment ids are opaque random tokens.
//! - Attachment kind is fixed at creation time from URI or MIME type.

use crate::ids::opaque_id;
use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Display name used when an attachment is added without one.
pub const DEFAULT_ATTACHMENT_NAME: &str = "Arquivo";

static IMAGE_URI_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\.(jpe?g|png|gif)").expect("valid image uri regex"));

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttachmentKind {
    Image,
    Document,
}

impl AttachmentKind {
    /// Infers kind from a URI: image when it mentions a known image extension.
    pub fn infer_from_uri(uri: &str) -> Self {
        if IMAGE_URI_RE.is_match(uri) {
            Self::Image
        } else {
            Self::Document
        }
    }

    /// Infers kind from a MIME type: image for any `image/*`.
    pub fn from_mime(mime: &str) -> Self {
        if mime.trim().to_ascii_lowercase().starts_with("image/") {
            Self::Image
        } else {
            Self::Document
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    pub id: String,
    /// Serialized as `type` to match the persisted layout.
    #[serde(rename = "type")]
    pub kind: AttachmentKind,
    /// Serialized as `url` to match the persisted layout.
    #[serde(rename = "url")]
    pub uri: String,
    pub name: String,
}

impl Attachment {
    /// Creates an attachment referenced by URI, inferring its kind from it.
    pub fn new(uri: impl Into<String>, name: impl Into<String>) -> Self {
        let uri = uri.into();
        let kind = AttachmentKind::infer_from_uri(&uri);
        Self::with_kind(kind, uri, name)
    }

    /// Creates an attachment for an uploaded file with a known MIME type.
    pub fn from_upload(mime: &str, uri: impl Into<String>, name: impl Into<String>) -> Self {
        Self::with_kind(AttachmentKind::from_mime(mime), uri.into(), name)
    }

    fn with_kind(kind: AttachmentKind, uri: String, name: impl Into<String>) -> Self {
        let name = name.into();
        let name = if name.is_empty() {
            DEFAULT_ATTACHMENT_NAME.to_string()
        } else {
            name
        };
        Self {
            id: opaque_id(),
            kind,
            uri,
            name,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub id: String,
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub people_involved: Vec<String>,
    #[serde(default)]
    pub attachments: Vec<Attachment>,
    pub investigator_id: String,
    pub created_at: DateTime<Utc>,
}

impl Report {
    pub fn from_draft(id: String, draft: NewReport, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            title: draft.title,
            content: draft.content,
            people_involved: draft.people_involved,
            attachments: draft.attachments,
            investigator_id: draft.investigator_id,
            created_at,
        }
    }

    pub fn apply(&mut self, patch: ReportPatch) {
        if let Some(value) = patch.title {
            self.title = value;
        }
        if let Some(value) = patch.content {
            self.content = value;
        }
        if let Some(value) = patch.people_involved {
            self.people_involved = value;
        }
        if let Some(value) = patch.attachments {
            self.attachments = value;
        }
        if let Some(value) = patch.investigator_id {
            self.investigator_id = value;
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewReport {
    pub title: String,
    pub content: String,
    pub people_involved: Vec<String>,
    pub attachments: Vec<Attachment>,
    pub investigator_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportPatch {
    pub title: Option<String>,
    pub content: Option<String>,
    pub people_involved: Option<Vec<String>>,
    pub attachments: Option<Vec<Attachment>>,
    pub investigator_id: Option<String>,
}
