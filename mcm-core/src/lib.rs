//! MCM Core Library
//!
//! Wire types, property model, and error taxonomy for the CMIS browser
//! binding spoken by MCM content repositories. This crate has no HTTP
//! dependency; the blocking client lives in `mcm-client`.

pub mod api;
pub mod error;
pub mod options;
pub mod properties;
pub mod types;

// Re-export commonly used types
pub use api::{ChildrenResponse, ErrorResponse, ObjectInFolder, RepositoryInfo};
pub use error::*;
pub use options::{ChildrenOptions, ObjectOptions};
pub use properties::{millis_to_datetime, Properties};
pub use types::*;

/// Result type alias for CMIS operations
pub type Result<T> = std::result::Result<T, CmisError>;
