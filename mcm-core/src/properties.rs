//! Object properties
//!
//! The browser binding encodes object properties either succinctly
//! (`{"succinctProperties": {id: value}}`) or verbosely
//! (`{"properties": {id: {"value": value, ...}}}`). Both are flattened into a
//! [`Properties`] map keyed by property id.

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

pub const NAME: &str = "cmis:name";
pub const OBJECT_ID: &str = "cmis:objectId";
pub const OBJECT_TYPE_ID: &str = "cmis:objectTypeId";
pub const BASE_TYPE_ID: &str = "cmis:baseTypeId";
pub const CREATED_BY: &str = "cmis:createdBy";
pub const CREATION_DATE: &str = "cmis:creationDate";
pub const LAST_MODIFIED_BY: &str = "cmis:lastModifiedBy";
pub const LAST_MODIFICATION_DATE: &str = "cmis:lastModificationDate";
pub const CHANGE_TOKEN: &str = "cmis:changeToken";
pub const DESCRIPTION: &str = "cmis:description";
pub const SECONDARY_OBJECT_TYPE_IDS: &str = "cmis:secondaryObjectTypeIds";
pub const IS_IMMUTABLE: &str = "cmis:isImmutable";
pub const IS_LATEST_VERSION: &str = "cmis:isLatestVersion";
pub const IS_MAJOR_VERSION: &str = "cmis:isMajorVersion";
pub const IS_LATEST_MAJOR_VERSION: &str = "cmis:isLatestMajorVersion";
pub const VERSION_LABEL: &str = "cmis:versionLabel";
pub const VERSION_SERIES_ID: &str = "cmis:versionSeriesId";
pub const IS_VERSION_SERIES_CHECKED_OUT: &str = "cmis:isVersionSeriesCheckedOut";
pub const VERSION_SERIES_CHECKED_OUT_ID: &str = "cmis:versionSeriesCheckedOutId";
pub const CHECKIN_COMMENT: &str = "cmis:checkinComment";
pub const CONTENT_STREAM_LENGTH: &str = "cmis:contentStreamLength";
pub const CONTENT_STREAM_MIME_TYPE: &str = "cmis:contentStreamMimeType";
pub const CONTENT_STREAM_FILE_NAME: &str = "cmis:contentStreamFileName";
pub const CONTENT_STREAM_ID: &str = "cmis:contentStreamId";
pub const IS_PRIVATE_WORKING_COPY: &str = "cmis:isPrivateWorkingCopy";
pub const PARENT_ID: &str = "cmis:parentId";
pub const ALLOWED_CHILD_OBJECT_TYPE_IDS: &str = "cmis:allowedChildObjectTypeIds";
pub const PATH: &str = "cmis:path";
pub const SOURCE_ID: &str = "cmis:sourceId";
pub const TARGET_ID: &str = "cmis:targetId";
pub const POLICY_TEXT: &str = "cmis:policyText";
pub const EXPIRATION_DATE: &str = "cmis:rm_expirationDate";
pub const START_OF_RETENTION: &str = "cmis:rm_startOfRetention";
pub const DESTRUCTION_DATE: &str = "cmis:rm_destructionDate";
pub const HOLD_IDS: &str = "cmis:rm_holdIds";
pub const CONTENT_STREAM_HASH: &str = "cmis:contentStreamHash";
pub const LATEST_ACCESSIBLE_STATE_ID: &str = "cmis:latestAccessibleStateId";

/// Convert a millisecond epoch value into a UTC timestamp.
///
/// Whole seconds and the leftover milliseconds are converted separately so
/// no precision is lost. Returns `None` when the value is out of range.
pub fn millis_to_datetime(millis: i64) -> Option<DateTime<Utc>> {
    let secs = millis.div_euclid(1000);
    let nanos = (millis.rem_euclid(1000) * 1_000_000) as u32;
    DateTime::from_timestamp(secs, nanos)
}

/// Immutable map of property id to value
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Properties(Map<String, Value>);

impl Properties {
    /// Extract the properties of an object payload.
    ///
    /// `succinctProperties` takes precedence over `properties`. Verbose entries
    /// without a `value` field are skipped.
    pub fn from_object_json(json: &Value) -> Self {
        if let Some(succinct) = json.get("succinctProperties").and_then(Value::as_object) {
            return Self(succinct.clone());
        }

        if let Some(verbose) = json.get("properties").and_then(Value::as_object) {
            let map = verbose
                .iter()
                .filter_map(|(id, property)| {
                    property.get("value").map(|value| (id.clone(), value.clone()))
                })
                .collect();
            return Self(map);
        }

        Self::default()
    }

    /// Raw value of a property
    pub fn get(&self, property_id: &str) -> Option<&Value> {
        self.0.get(property_id)
    }

    /// String value of a property
    pub fn get_str(&self, property_id: &str) -> Option<&str> {
        self.get(property_id).and_then(Value::as_str)
    }

    /// Boolean value of a property
    pub fn get_bool(&self, property_id: &str) -> Option<bool> {
        self.get(property_id).and_then(Value::as_bool)
    }

    /// Integer value of a property
    pub fn get_i64(&self, property_id: &str) -> Option<i64> {
        self.get(property_id).and_then(Value::as_i64)
    }

    /// Datetime value of a property encoded as milliseconds since epoch
    pub fn get_datetime(&self, property_id: &str) -> Option<DateTime<Utc>> {
        self.get_i64(property_id).and_then(millis_to_datetime)
    }

    pub fn contains(&self, property_id: &str) -> bool {
        self.0.contains_key(property_id)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over `(property id, value)` pairs in payload order
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    /// Borrow the underlying JSON map
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }
}

impl From<Map<String, Value>> for Properties {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}
