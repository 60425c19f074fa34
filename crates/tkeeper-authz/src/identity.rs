//! Identity source: where a session's subject and raw grants come from.
//!
//! The identity source is an external collaborator (typically an HTTP call
//! to a `/me`-style endpoint). This module only defines the seam and the
//! payload it returns.

use std::sync::Arc;

use async_trait::async_trait;
use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::IdentityError;

/// The authenticated subject and its raw permission patterns.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// Subject identifier, if the source reports one.
    #[serde(default)]
    pub subject: Option<String>,

    /// Raw grant patterns. Missing or malformed lists are treated as no
    /// grants; non-string entries are skipped.
    #[serde(default, deserialize_with = "lenient_patterns")]
    pub permissions: Vec<String>,
}

impl Identity {
    /// Create an identity for a subject with the given grants.
    pub fn new<I, S>(subject: impl Into<String>, permissions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            subject: Some(subject.into()),
            permissions: permissions.into_iter().map(Into::into).collect(),
        }
    }

    /// An identity with no subject and no grants.
    pub fn anonymous() -> Self {
        Self::default()
    }
}

fn lenient_patterns<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Entry {
        Pattern(String),
        Other(IgnoredAny),
    }

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Field {
        List(Vec<Entry>),
        Other(IgnoredAny),
    }

    let patterns = match Field::deserialize(deserializer)? {
        Field::List(entries) => entries
            .into_iter()
            .filter_map(|entry| match entry {
                Entry::Pattern(p) => Some(p),
                Entry::Other(_) => None,
            })
            .collect(),
        Field::Other(_) => Vec::new(),
    };

    Ok(patterns)
}

/// Source of the current subject's identity.
///
/// Implementations must be thread-safe (Send + Sync).
#[async_trait]
pub trait IdentitySource: Send + Sync {
    /// Fetch the subject and its raw grants.
    async fn fetch_identity(&self) -> Result<Identity, IdentityError>;
}

#[async_trait]
impl<T: IdentitySource + ?Sized> IdentitySource for Arc<T> {
    async fn fetch_identity(&self) -> Result<Identity, IdentityError> {
        (**self).fetch_identity().await
    }
}

/// In-memory identity sources for tests and embedding.
pub mod memory {
    use super::*;
    use std::sync::{PoisonError, RwLock};
    use std::time::Duration;

    #[derive(Debug, Clone)]
    enum Response {
        Identity(Identity),
        Failure(String),
    }

    /// An identity source answering from memory.
    ///
    /// The answer can be swapped at runtime to simulate re-authentication
    /// or an outage. Thread-safe via RwLock.
    #[derive(Debug)]
    pub struct MemoryIdentity {
        response: RwLock<Response>,
        delay: Option<Duration>,
    }

    impl MemoryIdentity {
        /// A source that always returns `identity`.
        pub fn new(identity: Identity) -> Self {
            Self {
                response: RwLock::new(Response::Identity(identity)),
                delay: None,
            }
        }

        /// A source that always fails with `reason`.
        pub fn failing(reason: impl Into<String>) -> Self {
            Self {
                response: RwLock::new(Response::Failure(reason.into())),
                delay: None,
            }
        }

        /// Delay every answer, e.g. to exercise load timeouts.
        pub fn with_delay(mut self, delay: Duration) -> Self {
            self.delay = Some(delay);
            self
        }

        /// Answer with `identity` from now on.
        pub fn set_identity(&self, identity: Identity) {
            *self.response.write().unwrap_or_else(PoisonError::into_inner) =
                Response::Identity(identity);
        }

        /// Fail with `reason` from now on.
        pub fn set_failure(&self, reason: impl Into<String>) {
            *self.response.write().unwrap_or_else(PoisonError::into_inner) =
                Response::Failure(reason.into());
        }
    }

    #[async_trait]
    impl IdentitySource for MemoryIdentity {
        async fn fetch_identity(&self) -> Result<Identity, IdentityError> {
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }

            let response = self
                .response
                .read()
                .unwrap_or_else(PoisonError::into_inner)
                .clone();

            match response {
                Response::Identity(identity) => Ok(identity),
                Response::Failure(reason) => {
                    Err(IdentityError::unavailable(anyhow::anyhow!(reason)))
                }
            }
        }
    }
}
