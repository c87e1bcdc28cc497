//! Core types for CMIS objects

use serde::{Deserialize, Serialize};
use std::fmt;

/// CMIS base type of an object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BaseType {
    #[serde(rename = "cmis:document")]
    Document,
    #[serde(rename = "cmis:folder")]
    Folder,
    #[serde(rename = "cmis:relationship")]
    Relationship,
    #[serde(rename = "cmis:policy")]
    Policy,
    #[serde(rename = "cmis:item")]
    Item,
    #[serde(rename = "cmis:secondary")]
    Secondary,
}

impl BaseType {
    /// Parse a `cmis:baseTypeId` value
    pub fn from_id(id: &str) -> Option<Self> {
        match id {
            "cmis:document" => Some(Self::Document),
            "cmis:folder" => Some(Self::Folder),
            "cmis:relationship" => Some(Self::Relationship),
            "cmis:policy" => Some(Self::Policy),
            "cmis:item" => Some(Self::Item),
            "cmis:secondary" => Some(Self::Secondary),
            _ => None,
        }
    }

    /// The `cmis:baseTypeId` value of this type
    pub fn id(self) -> &'static str {
        match self {
            Self::Document => "cmis:document",
            Self::Folder => "cmis:folder",
            Self::Relationship => "cmis:relationship",
            Self::Policy => "cmis:policy",
            Self::Item => "cmis:item",
            Self::Secondary => "cmis:secondary",
        }
    }
}

impl fmt::Display for BaseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Which relationships to include with an object (`includeRelationships`)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IncludeRelationships {
    #[default]
    None,
    Source,
    Target,
    Both,
}

impl IncludeRelationships {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Source => "source",
            Self::Target => "target",
            Self::Both => "both",
        }
    }
}

impl fmt::Display for IncludeRelationships {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
