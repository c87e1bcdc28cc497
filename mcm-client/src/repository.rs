//! Repositories exposed by an MCM server
//!
//! A [`Repository`] is a cheap, copyable view that borrows its descriptor and
//! the [`Session`] it was discovered by. Navigation calls translate into GET
//! requests against the repository's root folder URL.

use crate::children::ChildrenIterator;
use crate::error::{McmError, Result};
use crate::object::{convert_object, Object};
use crate::session::Session;
use mcm_core::{ChildrenOptions, ChildrenResponse, ObjectOptions, RepositoryInfo};
use serde_json::Value;
use std::fmt;

/// Property filter selecting every property
pub const ALL_PROPERTIES: &str = "*";

/// Repository variant, decided by the descriptor at discovery time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RepositoryKind {
    /// Personal repository, home folder from `myDocuments`
    MyDocuments,
    /// Sharing repository, home folder from `sharing`
    Sharing,
    /// Corporate repository, no home folder
    Corporate,
}

impl fmt::Display for RepositoryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RepositoryKind::MyDocuments => write!(f, "my documents"),
            RepositoryKind::Sharing => write!(f, "sharing"),
            RepositoryKind::Corporate => write!(f, "corporate"),
        }
    }
}

/// Handle on one content repository
#[derive(Debug, Clone, Copy)]
pub struct Repository<'s> {
    session: &'s Session,
    id: &'s str,
    info: &'s RepositoryInfo,
    kind: RepositoryKind,
}

impl<'s> Repository<'s> {
    pub(crate) fn new(
        session: &'s Session,
        id: &'s str,
        info: &'s RepositoryInfo,
        kind: RepositoryKind,
    ) -> Self {
        Self {
            session,
            id,
            info,
            kind,
        }
    }

    /// Repository id, as keyed in the discovery response
    pub fn id(&self) -> &'s str {
        self.id
    }

    pub fn kind(&self) -> RepositoryKind {
        self.kind
    }

    /// Full descriptor from discovery
    pub fn info(&self) -> &'s RepositoryInfo {
        self.info
    }

    pub fn root_folder_id(&self) -> Option<&'s str> {
        self.info.root_folder_id.as_deref()
    }

    pub fn root_folder_url(&self) -> &'s str {
        &self.info.root_folder_url
    }

    pub fn repository_url(&self) -> &'s str {
        &self.info.repository_url
    }

    /// Home folder id; only personal and sharing repositories have one
    pub fn home_folder_id(&self) -> Option<&'s str> {
        match self.kind {
            RepositoryKind::MyDocuments => self.info.my_documents_folder_id(),
            RepositoryKind::Sharing => self.info.sharing_folder_id(),
            RepositoryKind::Corporate => None,
        }
    }

    /// Fetch the root folder with all properties.
    ///
    /// # Errors
    ///
    /// Returns [`McmError::NoRootFolder`] if discovery reported no root folder id.
    pub fn get_root_folder(&self) -> Result<Object<'s>> {
        let root_folder_id = self
            .root_folder_id()
            .ok_or_else(|| McmError::NoRootFolder(self.id.to_string()))?;
        self.get_object(
            root_folder_id,
            &ObjectOptions::default().with_filter(ALL_PROPERTIES),
        )
    }

    /// Fetch the home folder with all properties.
    ///
    /// # Errors
    ///
    /// Returns [`McmError::NoHomeFolder`] for corporate repositories, and for
    /// descriptors whose home folder marker is `null`.
    pub fn get_home_folder(&self) -> Result<Object<'s>> {
        let home_folder_id = self
            .home_folder_id()
            .ok_or_else(|| McmError::NoHomeFolder(self.id.to_string()))?;
        self.get_object(
            home_folder_id,
            &ObjectOptions::default().with_filter(ALL_PROPERTIES),
        )
    }

    /// Fetch a single object by id
    pub fn get_object(&self, object_id: &str, options: &ObjectOptions) -> Result<Object<'s>> {
        let query = options.to_query(object_id);
        let json: Value = self.session.get_json(self.root_folder_url(), &query)?;
        Ok(convert_object(*self, json))
    }

    /// Fetch one page of a folder's children.
    ///
    /// Only the requested page is fetched; use `skip_count` to page further.
    pub fn get_children(
        &self,
        folder_id: &str,
        options: &ChildrenOptions,
    ) -> Result<ChildrenIterator<'s>> {
        let query = options.to_query(folder_id);
        let response: ChildrenResponse = self.session.get_json(self.root_folder_url(), &query)?;

        let has_more_items = response.has_more_items();
        let num_items = response.num_items;
        let children = response
            .into_object_payloads()
            .map(|payload| convert_object(*self, payload))
            .collect();

        Ok(ChildrenIterator::new(children, has_more_items, num_items))
    }
}
