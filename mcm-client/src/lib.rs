//! MCM Client Library
//!
//! Blocking client for MCM content repositories over the CMIS browser
//! binding.
//!
//! # Public API
//!
//! The entry point is [`Session`], which authenticates, discovers the
//! repositories visible to the user, and hands out [`Repository`] handles.
//! Objects fetched through a repository borrow the session, so they cannot
//! outlive [`Session::close`]. Configuration types are available via
//! [`ClientConfig`] and [`ConfigBuilder`].
//!
//! ```no_run
//! use mcm_client::{ClientConfig, Session};
//!
//! # fn example() -> anyhow::Result<()> {
//! let config = ClientConfig::builder()
//!     .with_config_file(true)?
//!     .with_env_overrides()
//!     .build()?;
//!
//! let session = Session::with_config(&config)?;
//! for (id, repository) in session.get_all_corporate_repositories() {
//!     let root = repository.get_root_folder()?;
//!     println!("{}: {:?}", id, root.name());
//! }
//! # Ok(())
//! # }
//! ```

/// Folder children pages.
pub mod children;

/// Configuration types for the client.
pub mod config;

pub mod error;

/// CMIS objects: documents, folders and everything else.
pub mod object;

/// Repository handles.
pub mod repository;

/// Authenticated sessions.
pub mod session;

#[cfg(test)]
pub mod test_utils;

// Re-export commonly used types
pub use children::ChildrenIterator;
pub use config::{ClientConfig, ConfigBuilder};
pub use error::{McmError, Result};
pub use mcm_core::{
    BaseType, ChildrenOptions, CmisError, CmisErrorKind, IncludeRelationships, ObjectOptions,
    Properties, RepositoryInfo,
};
pub use object::{convert_object, CmisObject, Document, Folder, Object};
pub use repository::{Repository, RepositoryKind, ALL_PROPERTIES};
pub use session::Session;
