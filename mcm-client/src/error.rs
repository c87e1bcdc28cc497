//! Error type for client operations

use mcm_core::{CmisError, CmisErrorKind};
use thiserror::Error;

/// Error returned by [`crate::Session`] and everything borrowed from it
#[derive(Error, Debug)]
pub enum McmError {
    /// The server answered with a failure status
    #[error(transparent)]
    Cmis(#[from] CmisError),

    /// Connection, TLS, or timeout failure
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Response body is not the expected JSON
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    /// An object lacks a property needed for the requested call
    #[error("Object has no {0} property")]
    MissingProperty(&'static str),

    /// Home folder requested from a repository that has none
    #[error("Repository {0} has no home folder")]
    NoHomeFolder(String),

    /// Root folder requested from a descriptor without `rootFolderId`
    #[error("Repository {0} has no root folder id")]
    NoRootFolder(String),
}

impl McmError {
    /// Kind of the server error, if this is one
    pub fn cmis_kind(&self) -> Option<CmisErrorKind> {
        match self {
            McmError::Cmis(err) => Some(err.kind()),
            _ => None,
        }
    }
}

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, McmError>;
