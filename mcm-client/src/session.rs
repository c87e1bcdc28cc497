//! Authenticated session against an MCM server
//!
//! A [`Session`] owns the HTTP client, the credentials and the rotating CSRF
//! token. Repositories are discovered once, when the session is opened.

use crate::config::ClientConfig;
use crate::error::Result;
use crate::repository::{Repository, RepositoryKind};
use mcm_core::{CmisError, RepositoryInfo};
use reqwest::blocking::{Client, Response};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;
use tracing::{debug, info, trace, warn};

/// Default discovery URL
pub const DEFAULT_URL: &str = "https://mdocs.sap.com/mcm/b/json";

/// Header carrying the anti-forgery token in both directions
pub const CSRF_HEADER: &str = "X-CSRF-Token";

/// Token value asking the server to issue a fresh token
pub const CSRF_FETCH: &str = "fetch";

/// Request timeout used when none is configured
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Statuses treated as success; anything else becomes a [`CmisError`]
const SUCCESS_STATUSES: [u16; 4] = [200, 201, 204, 206];

/// Descriptor keys whose presence selects a repository variant
const VARIANT_MARKERS: [&str; 3] = ["myDocuments", "sharing", "corporate"];

/// Whether a discovery entry describes an accessible repository.
///
/// `null`, `false`, zero, and empty strings, arrays or objects do not.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().map_or(true, |n| n != 0.0),
        Value::String(text) => !text.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(fields) => !fields.is_empty(),
    }
}

#[derive(Debug, Clone)]
struct DiscoveredRepository {
    id: String,
    info: RepositoryInfo,
}

/// Session with an MCM server.
///
/// Every request sends the latest CSRF token and stores the one returned by
/// the server. The token mutex is held for the whole round trip, so requests
/// issued through one session from several threads are serialized.
///
/// # Examples
///
/// ```no_run
/// use mcm_client::{ChildrenOptions, Session};
///
/// # fn example() -> mcm_client::Result<()> {
/// let session = Session::new("user", "password", "https://host/mcm/b/json")?;
///
/// if let Some(my_docs) = session.get_my_documents_repository() {
///     let home = my_docs.get_home_folder()?;
///     if let Some(home) = home.as_folder() {
///         for child in home.get_children(&ChildrenOptions::default())? {
///             println!("[{:?}] {:?} ({:?})", child.base_type_id(), child.name(), child.id());
///         }
///     }
/// }
///
/// session.close();
/// # Ok(())
/// # }
/// ```
pub struct Session {
    client: Client,
    user: String,
    password: String,
    url: String,
    csrf_token: Mutex<String>,
    my_documents: Option<DiscoveredRepository>,
    sharing: Option<DiscoveredRepository>,
    corporate: BTreeMap<String, RepositoryInfo>,
}

impl Session {
    /// Open a session with the default timeout and discover its repositories.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built, the discovery
    /// request fails, or the discovery response cannot be parsed. No session
    /// is returned in that case.
    pub fn new(
        user: impl Into<String>,
        password: impl Into<String>,
        url: impl Into<String>,
    ) -> Result<Self> {
        Self::with_timeout(user, password, url, DEFAULT_TIMEOUT)
    }

    /// Open a session from a client configuration
    pub fn with_config(config: &ClientConfig) -> Result<Self> {
        Self::with_timeout(
            config.user.clone(),
            config.password.clone().unwrap_or_default(),
            config.url.clone(),
            config.timeout_duration(),
        )
    }

    /// Open a session with an explicit request timeout
    pub fn with_timeout(
        user: impl Into<String>,
        password: impl Into<String>,
        url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let mut session = Self::unconnected(user.into(), password.into(), url.into(), timeout)?;
        session.load_repositories()?;
        Ok(session)
    }

    fn unconnected(user: String, password: String, url: String, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .cookie_store(true)
            .user_agent(concat!("mcm-client/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            user,
            password,
            url,
            csrf_token: Mutex::new(CSRF_FETCH.to_string()),
            my_documents: None,
            sharing: None,
            corporate: BTreeMap::new(),
        })
    }

    /// Session that has not contacted any server
    #[cfg(test)]
    pub(crate) fn offline(url: &str) -> Result<Self> {
        Self::unconnected(
            "offline".to_string(),
            String::new(),
            url.to_string(),
            DEFAULT_TIMEOUT,
        )
    }

    fn load_repositories(&mut self) -> Result<()> {
        debug!("Discovering repositories at {}", self.url);
        let repositories: Map<String, Value> = self.get_json(&self.url, &[])?;

        for (id, descriptor) in repositories {
            if !is_truthy(&descriptor) {
                debug!("Skipping repository {} without descriptor", id);
                continue;
            }

            let fields: Map<String, Value> = serde_json::from_value(descriptor)?;
            if !VARIANT_MARKERS.iter().any(|key| fields.contains_key(*key)) {
                debug!("Skipping repository {} of unknown variant", id);
                continue;
            }

            let info: RepositoryInfo = serde_json::from_value(Value::Object(fields))?;
            if info.is_my_documents() {
                debug!("Repository {} is the personal repository", id);
                self.my_documents = Some(DiscoveredRepository {
                    id: id.clone(),
                    info: info.clone(),
                });
            }
            if info.is_sharing() {
                debug!("Repository {} is the sharing repository", id);
                self.sharing = Some(DiscoveredRepository {
                    id: id.clone(),
                    info: info.clone(),
                });
            }
            if info.is_corporate() {
                debug!("Repository {} is a corporate repository", id);
                self.corporate.insert(id, info);
            }
        }

        info!(
            "Discovered repositories for {}: personal={}, sharing={}, corporate={}",
            self.user,
            self.my_documents.is_some(),
            self.sharing.is_some(),
            self.corporate.len()
        );
        Ok(())
    }

    /// Issue a GET request, rotating the CSRF token.
    ///
    /// Any status outside 200, 201, 204 and 206 is translated into a
    /// [`CmisError`].
    pub(crate) fn get(&self, url: &str, query: &[(&str, String)]) -> Result<Response> {
        let mut token = self
            .csrf_token
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        debug!("GET {} {:?}", url, query);
        let mut request = self
            .client
            .get(url)
            .basic_auth(&self.user, Some(&self.password))
            .header(CSRF_HEADER, token.as_str());
        if !query.is_empty() {
            request = request.query(query);
        }
        let response = request.send()?;

        if let Some(next) = response
            .headers()
            .get(CSRF_HEADER)
            .and_then(|value| value.to_str().ok())
        {
            if *token != next {
                trace!("CSRF token rotated");
            }
            *token = next.to_string();
        }
        drop(token);

        let status = response.status();
        if SUCCESS_STATUSES.contains(&status.as_u16()) {
            return Ok(response);
        }

        let reason = status.canonical_reason().unwrap_or("Unknown Status");
        let body = match response.text() {
            Ok(body) => body,
            Err(e) => {
                warn!("Failed to read error body from {}: {}", url, e);
                String::new()
            }
        };
        let err = CmisError::from_response(status.as_u16(), reason, &body);
        warn!("GET {} failed with status {}: {}", url, status, err);
        Err(err.into())
    }

    /// Issue a GET request and decode the JSON body
    pub(crate) fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<T> {
        let body = self.get(url, query)?.text()?;
        Ok(serde_json::from_str(&body)?)
    }

    pub fn user(&self) -> &str {
        &self.user
    }

    /// Discovery URL
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Token that the next request will send
    pub fn csrf_token(&self) -> String {
        self.csrf_token
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// The personal repository, if the server exposes one
    pub fn get_my_documents_repository(&self) -> Option<Repository<'_>> {
        self.my_documents.as_ref().map(|discovered| {
            Repository::new(
                self,
                &discovered.id,
                &discovered.info,
                RepositoryKind::MyDocuments,
            )
        })
    }

    /// The sharing repository, if the server exposes one
    pub fn get_sharing_repository(&self) -> Option<Repository<'_>> {
        self.sharing.as_ref().map(|discovered| {
            Repository::new(
                self,
                &discovered.id,
                &discovered.info,
                RepositoryKind::Sharing,
            )
        })
    }

    /// All corporate repositories, keyed by repository id
    pub fn get_all_corporate_repositories(&self) -> BTreeMap<&str, Repository<'_>> {
        self.corporate
            .iter()
            .map(|(id, info)| {
                (
                    id.as_str(),
                    Repository::new(self, id, info, RepositoryKind::Corporate),
                )
            })
            .collect()
    }

    pub fn get_corporate_repository(&self, repository_id: &str) -> Option<Repository<'_>> {
        self.corporate
            .get_key_value(repository_id)
            .map(|(id, info)| Repository::new(self, id, info, RepositoryKind::Corporate))
    }

    /// Close the session and release its connections
    pub fn close(self) {
        debug!("Closing session for {} at {}", self.user, self.url);
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("user", &self.user)
            .field("url", &self.url)
            .field("my_documents", &self.my_documents.as_ref().map(|d| &d.id))
            .field("sharing", &self.sharing.as_ref().map(|d| &d.id))
            .field("corporate", &self.corporate.keys().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}
