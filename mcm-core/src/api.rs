//! Wire models for the CMIS browser binding
//!
//! This module contains the JSON envelopes exchanged with the server:
//! repository descriptors returned by discovery, children pages, and error
//! bodies. Object payloads are kept as raw JSON and interpreted by
//! [`crate::properties::Properties`].

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Error body returned by the server on failure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Exception tag, e.g. `objectNotFound`
    #[serde(default)]
    pub exception: Option<String>,
    /// Human-readable message
    #[serde(default)]
    pub message: Option<String>,
}

impl ErrorResponse {
    /// Create an error body
    pub fn new(exception: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            exception: Some(exception.into()),
            message: Some(message.into()),
        }
    }
}

/// Repository descriptor from the discovery response
///
/// Discovery returns a JSON object mapping repository ids to descriptors (or
/// `null` for repositories the user cannot access). The presence of
/// `myDocuments`, `sharing` or `corporate` decides the repository variant,
/// whatever value the key holds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepositoryInfo {
    /// Id of the root folder; only needed to fetch the root folder
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root_folder_id: Option<String>,
    /// URL used for object and children selectors
    pub root_folder_url: String,
    /// URL of the repository itself
    pub repository_url: String,
    /// Personal marker, holding the home folder id when it is not `null`
    #[serde(
        default,
        deserialize_with = "present_folder_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub my_documents: Option<Option<String>>,
    /// Sharing marker, holding the home folder id when it is not `null`
    #[serde(
        default,
        deserialize_with = "present_folder_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub sharing: Option<Option<String>>,
    /// Corporate marker; any value, `null` included, marks the repository as corporate
    #[serde(
        default,
        deserialize_with = "present_value",
        skip_serializing_if = "Option::is_none"
    )]
    pub corporate: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repository_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repository_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repository_description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vendor_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cmis_version_supported: Option<String>,
}

impl RepositoryInfo {
    /// Create a minimal descriptor
    pub fn new(
        root_folder_id: impl Into<String>,
        root_folder_url: impl Into<String>,
        repository_url: impl Into<String>,
    ) -> Self {
        Self {
            root_folder_id: Some(root_folder_id.into()),
            root_folder_url: root_folder_url.into(),
            repository_url: repository_url.into(),
            my_documents: None,
            sharing: None,
            corporate: None,
            repository_id: None,
            repository_name: None,
            repository_description: None,
            vendor_name: None,
            product_name: None,
            product_version: None,
            cmis_version_supported: None,
        }
    }

    /// Whether the descriptor carries a personal home folder
    pub fn is_my_documents(&self) -> bool {
        self.my_documents.is_some()
    }

    /// Whether the descriptor carries a sharing home folder
    pub fn is_sharing(&self) -> bool {
        self.sharing.is_some()
    }

    /// Whether the descriptor carries the corporate marker
    pub fn is_corporate(&self) -> bool {
        self.corporate.is_some()
    }

    /// Home folder id of a personal repository
    pub fn my_documents_folder_id(&self) -> Option<&str> {
        self.my_documents.as_ref().and_then(|id| id.as_deref())
    }

    /// Home folder id of a sharing repository
    pub fn sharing_folder_id(&self) -> Option<&str> {
        self.sharing.as_ref().and_then(|id| id.as_deref())
    }
}

/// Keep a present `null` apart from a missing key
fn present_value<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

/// Present key holding a folder id of any scalar type, or `null`
fn present_folder_id<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(Some(None)),
        Value::String(id) => Ok(Some(Some(id))),
        Value::Number(id) => Ok(Some(Some(id.to_string()))),
        Value::Bool(id) => Ok(Some(Some(id.to_string()))),
        other => Err(serde::de::Error::custom(format!(
            "expected a folder id, found {}",
            other
        ))),
    }
}

/// One entry of a children page
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectInFolder {
    /// Object payload; entries without one are skipped
    #[serde(default)]
    pub object: Option<Value>,
    /// Path segment, present when requested with `includePathSegment`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path_segment: Option<String>,
}

/// Children page returned by the `children` selector
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChildrenResponse {
    #[serde(default)]
    pub objects: Option<Vec<ObjectInFolder>>,
    #[serde(default)]
    pub has_more_items: Option<bool>,
    /// Total number of children; some servers send `-1` when unknown
    #[serde(default)]
    pub num_items: Option<i64>,
}

impl ChildrenResponse {
    /// Whether the server holds more children past this page (default `false`)
    pub fn has_more_items(&self) -> bool {
        self.has_more_items.unwrap_or(false)
    }

    /// Consume the page, yielding the object payloads in order
    pub fn into_object_payloads(self) -> impl Iterator<Item = Value> {
        self.objects
            .unwrap_or_default()
            .into_iter()
            .filter_map(|entry| entry.object)
    }
}
