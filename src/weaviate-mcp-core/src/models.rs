use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::filter::WhereFilter;

/// Host part of every beacon the server understands
pub const BEACON_PREFIX: &str = "weaviate://localhost";

/// Beacon pointing at an object, optionally qualified by class
pub fn beacon(class_name: Option<&str>, id: Uuid) -> String {
    match class_name {
        Some(class_name) => format!("{}/{}/{}", BEACON_PREFIX, class_name, id),
        None => format!("{}/{}", BEACON_PREFIX, id),
    }
}

/// WeaviateObject represents a stored data object
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeaviateObject {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
    pub class: String,
    #[serde(default)]
    pub properties: serde_json::Map<String, serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vector: Option<Vec<f32>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tenant: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creation_time_unix: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_update_time_unix: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional: Option<serde_json::Value>,
}

impl WeaviateObject {
    pub fn new(class: impl Into<String>) -> Self {
        Self {
            class: class.into(),
            ..Default::default()
        }
    }

    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.creation_time_unix.and_then(DateTime::<Utc>::from_timestamp_millis)
    }

    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.last_update_time_unix
            .and_then(DateTime::<Utc>::from_timestamp_millis)
    }
}

/// ObjectList is the body of `GET /objects`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectList {
    #[serde(default)]
    pub objects: Vec<WeaviateObject>,
    #[serde(default)]
    pub total_results: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct BatchObjectsRequest<'a> {
    pub objects: &'a [WeaviateObject],
}

/// Verbosity of a batch delete report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BatchOutput {
    #[default]
    Minimal,
    Verbose,
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchMatch {
    pub class: String,
    #[serde(rename = "where")]
    pub filter: WhereFilter,
}

/// BatchDeleteRequest is the body of `DELETE /batch/objects`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchDeleteRequest {
    #[serde(rename = "match")]
    pub matcher: BatchMatch,
    pub dry_run: bool,
    pub output: BatchOutput,
}

impl BatchDeleteRequest {
    pub fn new(class: impl Into<String>, filter: WhereFilter) -> Self {
        Self {
            matcher: BatchMatch {
                class: class.into(),
                filter,
            },
            dry_run: false,
            output: BatchOutput::default(),
        }
    }
}

/// One cross-reference in a batch: `from` property beacon to `to` object beacon
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchReference {
    pub from: String,
    pub to: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tenant: Option<String>,
}

impl BatchReference {
    pub fn new(
        from_class: &str,
        from_id: Uuid,
        property: &str,
        to_class: Option<&str>,
        to_id: Uuid,
    ) -> Self {
        Self {
            from: format!("{}/{}", beacon(Some(from_class), from_id), property),
            to: beacon(to_class, to_id),
            tenant: None,
        }
    }

    pub fn with_tenant(mut self, tenant: impl Into<String>) -> Self {
        self.tenant = Some(tenant.into());
        self
    }
}

/// Single reference payload used by the per-object reference endpoints
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SingleRef {
    pub beacon: String,
}

impl SingleRef {
    pub fn to(class_name: Option<&str>, id: Uuid) -> Self {
        Self {
            beacon: beacon(class_name, id),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TenantActivityStatus {
    Hot,
    Cold,
    Frozen,
    Active,
    Inactive,
    Offloaded,
    Offloading,
    Onloading,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tenant {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activity_status: Option<TenantActivityStatus>,
}

impl Tenant {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            activity_status: None,
        }
    }
}

/// Storage backend a backup is written to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackupBackend {
    Filesystem,
    S3,
    Gcs,
    Azure,
}

impl BackupBackend {
    pub fn as_str(self) -> &'static str {
        match self {
            BackupBackend::Filesystem => "filesystem",
            BackupBackend::S3 => "s3",
            BackupBackend::Gcs => "gcs",
            BackupBackend::Azure => "azure",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackupRequest {
    pub id: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub include: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub exclude: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestoreRequest {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub include: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub exclude: Vec<String>,
}

/// Status report for a backup or restore
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackupStatus {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub backend: Option<String>,
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub classes: Vec<String>,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub error: Option<String>,
}

/// ClassificationRequest starts a kNN or zero-shot classification run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassificationRequest {
    pub class: String,
    pub classify_properties: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub based_on_properties: Vec<String>,
    #[serde(rename = "type")]
    pub classification_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings: Option<serde_json::Value>,
}
