//! Error types for the CMIS browser binding
//!
//! Every failed request is translated into a [`CmisError`] carrying a
//! [`CmisErrorKind`], a human-readable message and the raw error content
//! returned by the server.

use crate::api::ErrorResponse;
use std::fmt;
use thiserror::Error;

/// Kind of a CMIS error
///
/// The first twelve kinds are reported by the server through the `exception`
/// field of an error body. The runtime family (`Runtime`, `ServiceUnavailable`,
/// `Unauthorized`, `ProxyAuthentication`) is derived from HTTP status codes only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CmisErrorKind {
    Constraint,
    ContentAlreadyExists,
    FilterNotValid,
    InvalidArgument,
    NameConstraintViolation,
    NotSupported,
    ObjectNotFound,
    PermissionDenied,
    Storage,
    StreamNotSupported,
    UpdateConflict,
    Versioning,
    /// Generic runtime error for unmapped status codes
    Runtime,
    ServiceUnavailable,
    Unauthorized,
    ProxyAuthentication,
}

/// Kinds the server may name in the `exception` field of an error body
const SERVER_TAGGED_KINDS: [CmisErrorKind; 12] = [
    CmisErrorKind::Constraint,
    CmisErrorKind::ContentAlreadyExists,
    CmisErrorKind::FilterNotValid,
    CmisErrorKind::InvalidArgument,
    CmisErrorKind::NameConstraintViolation,
    CmisErrorKind::NotSupported,
    CmisErrorKind::ObjectNotFound,
    CmisErrorKind::PermissionDenied,
    CmisErrorKind::Storage,
    CmisErrorKind::StreamNotSupported,
    CmisErrorKind::UpdateConflict,
    CmisErrorKind::Versioning,
];

impl CmisErrorKind {
    /// Protocol exception tag for this kind
    pub fn exception_tag(self) -> &'static str {
        match self {
            Self::Constraint => "constraint",
            Self::ContentAlreadyExists => "contentAlreadyExists",
            Self::FilterNotValid => "filterNotValid",
            Self::InvalidArgument => "invalidArgument",
            Self::NameConstraintViolation => "nameConstraintViolation",
            Self::NotSupported => "notSupported",
            Self::ObjectNotFound => "objectNotFound",
            Self::PermissionDenied => "permissionDenied",
            Self::Storage => "storage",
            Self::StreamNotSupported => "streamNotSupported",
            Self::UpdateConflict => "updateConflict",
            Self::Versioning => "versioning",
            Self::Runtime => "runtime",
            Self::ServiceUnavailable => "serviceUnavailable",
            Self::Unauthorized => "unauthorized",
            Self::ProxyAuthentication => "proxyAuthentication",
        }
    }

    /// Look up a server-reported exception tag, ignoring case.
    ///
    /// Only the server-tagged kinds are recognized; runtime kinds are never
    /// produced from a tag.
    pub fn from_exception(tag: &str) -> Option<Self> {
        SERVER_TAGGED_KINDS
            .iter()
            .copied()
            .find(|kind| kind.exception_tag().eq_ignore_ascii_case(tag))
    }

    /// Map an HTTP status code to an error kind
    pub fn from_status(status: u16) -> Self {
        match status {
            400 => Self::InvalidArgument,
            401 => Self::Unauthorized,
            403 => Self::PermissionDenied,
            404 => Self::ObjectNotFound,
            405 => Self::NotSupported,
            407 => Self::ProxyAuthentication,
            409 => Self::Constraint,
            503 => Self::ServiceUnavailable,
            _ => Self::Runtime,
        }
    }

    /// Whether this kind belongs to the runtime family
    pub fn is_runtime(self) -> bool {
        matches!(
            self,
            Self::Runtime
                | Self::ServiceUnavailable
                | Self::Unauthorized
                | Self::ProxyAuthentication
        )
    }
}

impl fmt::Display for CmisErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.exception_tag())
    }
}

/// Error reported by (or derived from) a CMIS server response
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("CMIS {kind} error: {message}")]
pub struct CmisError {
    kind: CmisErrorKind,
    message: String,
    error_content: String,
}

impl CmisError {
    /// Create a new error
    pub fn new(
        kind: CmisErrorKind,
        message: impl Into<String>,
        error_content: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            error_content: error_content.into(),
        }
    }

    /// Translate a failed HTTP response into an error.
    ///
    /// Status 503 always yields [`CmisErrorKind::ServiceUnavailable`]. Otherwise a
    /// recognized `exception` tag in a JSON body wins over the status code. When
    /// the body is not JSON, the reason phrase becomes the message and the raw
    /// body is kept as error content.
    pub fn from_response(status: u16, reason: &str, body: &str) -> Self {
        let mut message = reason.to_string();
        let mut tagged = None;

        if let Ok(error) = serde_json::from_str::<ErrorResponse>(body) {
            if let Some(exception) = error.exception.filter(|e| !e.is_empty()) {
                if let Some(text) = error.message.filter(|m| !m.is_empty()) {
                    message = text;
                }
                tagged = CmisErrorKind::from_exception(&exception);
            }
        }

        let kind = if status == 503 {
            CmisErrorKind::ServiceUnavailable
        } else {
            tagged.unwrap_or_else(|| CmisErrorKind::from_status(status))
        };

        Self::new(kind, message, body)
    }

    /// Kind of the error
    pub fn kind(&self) -> CmisErrorKind {
        self.kind
    }

    /// Human-readable message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Raw error payload as returned by the server
    pub fn error_content(&self) -> &str {
        &self.error_content
    }
}
