//! CMIS object model
//!
//! Objects are built from raw JSON payloads by [`convert_object`], which
//! inspects `cmis:baseTypeId` once and picks the matching [`Object`] variant.
//! Every object borrows the [`Repository`] it was fetched from, so folders can
//! list their children without further plumbing.

use crate::children::ChildrenIterator;
use crate::error::{McmError, Result};
use crate::repository::Repository;
use chrono::{DateTime, Utc};
use mcm_core::properties::{self, Properties};
use mcm_core::{BaseType, ChildrenOptions};
use serde_json::Value;
use std::ops::Deref;

/// Generic CMIS object
///
/// Properties are extracted once at construction and never change afterwards.
#[derive(Debug, Clone)]
pub struct CmisObject<'s> {
    repository: Repository<'s>,
    json: Value,
    properties: Properties,
}

impl<'s> CmisObject<'s> {
    /// Wrap an object payload in either succinct or verbose encoding
    pub fn new(repository: Repository<'s>, json: Value) -> Self {
        let properties = Properties::from_object_json(&json);
        Self {
            repository,
            json,
            properties,
        }
    }

    /// Repository this object was fetched from
    pub fn repository(&self) -> Repository<'s> {
        self.repository
    }

    /// Raw payload, including sections not modelled here (allowable actions, ACLs)
    pub fn json(&self) -> &Value {
        &self.json
    }

    pub fn get_properties(&self) -> &Properties {
        &self.properties
    }

    pub fn get_property(&self, property_id: &str) -> Option<&Value> {
        self.properties.get(property_id)
    }

    pub fn get_string_property(&self, property_id: &str) -> Option<&str> {
        self.properties.get_str(property_id)
    }

    pub fn get_bool_property(&self, property_id: &str) -> Option<bool> {
        self.properties.get_bool(property_id)
    }

    pub fn get_integer_property(&self, property_id: &str) -> Option<i64> {
        self.properties.get_i64(property_id)
    }

    /// Datetime property, decoded from milliseconds since epoch
    pub fn get_datetime_property(&self, property_id: &str) -> Option<DateTime<Utc>> {
        self.properties.get_datetime(property_id)
    }

    pub fn id(&self) -> Option<&str> {
        self.get_string_property(properties::OBJECT_ID)
    }

    pub fn name(&self) -> Option<&str> {
        self.get_string_property(properties::NAME)
    }

    pub fn base_type_id(&self) -> Option<&str> {
        self.get_string_property(properties::BASE_TYPE_ID)
    }

    pub fn base_type(&self) -> Option<BaseType> {
        self.base_type_id().and_then(BaseType::from_id)
    }

    pub fn object_type_id(&self) -> Option<&str> {
        self.get_string_property(properties::OBJECT_TYPE_ID)
    }

    pub fn creation_date(&self) -> Option<DateTime<Utc>> {
        self.get_datetime_property(properties::CREATION_DATE)
    }

    pub fn created_by(&self) -> Option<&str> {
        self.get_string_property(properties::CREATED_BY)
    }

    pub fn last_modification_date(&self) -> Option<DateTime<Utc>> {
        self.get_datetime_property(properties::LAST_MODIFICATION_DATE)
    }

    pub fn last_modified_by(&self) -> Option<&str> {
        self.get_string_property(properties::LAST_MODIFIED_BY)
    }

    pub fn change_token(&self) -> Option<&str> {
        self.get_string_property(properties::CHANGE_TOKEN)
    }

    pub fn description(&self) -> Option<&str> {
        self.get_string_property(properties::DESCRIPTION)
    }
}

/// Document object
#[derive(Debug, Clone)]
pub struct Document<'s>(CmisObject<'s>);

impl<'s> Document<'s> {
    pub fn content_stream_length(&self) -> Option<i64> {
        self.get_integer_property(properties::CONTENT_STREAM_LENGTH)
    }

    pub fn content_stream_mime_type(&self) -> Option<&str> {
        self.get_string_property(properties::CONTENT_STREAM_MIME_TYPE)
    }

    pub fn content_stream_file_name(&self) -> Option<&str> {
        self.get_string_property(properties::CONTENT_STREAM_FILE_NAME)
    }

    pub fn version_label(&self) -> Option<&str> {
        self.get_string_property(properties::VERSION_LABEL)
    }

    pub fn version_series_id(&self) -> Option<&str> {
        self.get_string_property(properties::VERSION_SERIES_ID)
    }

    pub fn is_latest_version(&self) -> Option<bool> {
        self.get_bool_property(properties::IS_LATEST_VERSION)
    }

    pub fn is_major_version(&self) -> Option<bool> {
        self.get_bool_property(properties::IS_MAJOR_VERSION)
    }

    pub fn into_inner(self) -> CmisObject<'s> {
        self.0
    }
}

impl<'s> Deref for Document<'s> {
    type Target = CmisObject<'s>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Folder object
#[derive(Debug, Clone)]
pub struct Folder<'s>(CmisObject<'s>);

impl<'s> Folder<'s> {
    /// List one page of this folder's children.
    ///
    /// # Errors
    ///
    /// Returns [`McmError::MissingProperty`] if the folder payload carries no
    /// `cmis:objectId`, otherwise whatever the children request fails with.
    pub fn get_children(&self, options: &ChildrenOptions) -> Result<ChildrenIterator<'s>> {
        let folder_id = self
            .id()
            .ok_or(McmError::MissingProperty(properties::OBJECT_ID))?;
        self.repository().get_children(folder_id, options)
    }

    pub fn parent_id(&self) -> Option<&str> {
        self.get_string_property(properties::PARENT_ID)
    }

    pub fn path(&self) -> Option<&str> {
        self.get_string_property(properties::PATH)
    }

    pub fn into_inner(self) -> CmisObject<'s> {
        self.0
    }
}

impl<'s> Deref for Folder<'s> {
    type Target = CmisObject<'s>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Polymorphic object, tagged by base type at parse time
#[derive(Debug, Clone)]
pub enum Object<'s> {
    Document(Document<'s>),
    Folder(Folder<'s>),
    /// Any other base type (relationship, policy, item, ...) or none at all
    Other(CmisObject<'s>),
}

impl<'s> Object<'s> {
    pub fn is_document(&self) -> bool {
        matches!(self, Object::Document(_))
    }

    pub fn is_folder(&self) -> bool {
        matches!(self, Object::Folder(_))
    }

    pub fn as_document(&self) -> Option<&Document<'s>> {
        match self {
            Object::Document(document) => Some(document),
            _ => None,
        }
    }

    pub fn as_folder(&self) -> Option<&Folder<'s>> {
        match self {
            Object::Folder(folder) => Some(folder),
            _ => None,
        }
    }

    pub fn into_document(self) -> Option<Document<'s>> {
        match self {
            Object::Document(document) => Some(document),
            _ => None,
        }
    }

    pub fn into_folder(self) -> Option<Folder<'s>> {
        match self {
            Object::Folder(folder) => Some(folder),
            _ => None,
        }
    }

    /// Generic view of the object, whatever its variant
    pub fn as_object(&self) -> &CmisObject<'s> {
        match self {
            Object::Document(document) => &document.0,
            Object::Folder(folder) => &folder.0,
            Object::Other(object) => object,
        }
    }
}

impl<'s> Deref for Object<'s> {
    type Target = CmisObject<'s>;

    fn deref(&self) -> &Self::Target {
        self.as_object()
    }
}

/// Build the object variant matching the payload's `cmis:baseTypeId`
pub fn convert_object(repository: Repository<'_>, json: Value) -> Object<'_> {
    let object = CmisObject::new(repository, json);
    match object.base_type() {
        Some(BaseType::Document) => Object::Document(Document(object)),
        Some(BaseType::Folder) => Object::Folder(Folder(object)),
        _ => Object::Other(object),
    }
}
