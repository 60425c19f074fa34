//! The auth context: the current subject and its permission set.
//!
//! An [`AuthContext`] is an explicit object owned by the caller (one per
//! client session, or one per server request). It is never a global.
//!
//! The current [`Session`] is an immutable snapshot. [`AuthContext::load`]
//! and [`AuthContext::reset`] replace it wholesale, so a snapshot handed to
//! another task keeps answering consistently.

use std::sync::Arc;
use std::time::Duration;

use tkeeper_authz_perms::{PermissionSet, PermissionSetConfig, DEFAULT_CACHE_CAPACITY};

use crate::error::{AuthError, IdentityError, Result, DEFAULT_DENIED_MESSAGE};
use crate::identity::{Identity, IdentitySource};

/// Configuration for an auth context.
#[derive(Debug, Clone)]
pub struct ContextConfig {
    /// Decision cache capacity for each loaded permission set.
    pub cache_capacity: usize,
    /// Upper bound on the identity source call. `None` waits indefinitely.
    pub identity_timeout: Option<Duration>,
}

impl Default for ContextConfig {
    fn default() -> Self {
        Self {
            cache_capacity: DEFAULT_CACHE_CAPACITY,
            identity_timeout: Some(Duration::from_secs(30)),
        }
    }
}

/// Authentication state of a context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthState {
    /// No subject; the permission set grants nothing.
    Unauthenticated,
    /// A session was loaded from the identity source.
    Authenticated,
}

/// An immutable snapshot of the current subject and its permissions.
#[derive(Debug)]
pub struct Session {
    subject: Option<String>,
    permissions: PermissionSet,
    state: AuthState,
}

impl Session {
    /// The unauthenticated session: no subject, no grants.
    pub fn unauthenticated() -> Self {
        Self {
            subject: None,
            permissions: PermissionSet::empty(),
            state: AuthState::Unauthenticated,
        }
    }

    /// Compile an authenticated session from an identity.
    pub fn authenticated(identity: Identity, config: PermissionSetConfig) -> Result<Self> {
        let permissions = PermissionSet::with_config(&identity.permissions, config)?;
        Ok(Self {
            subject: identity.subject,
            permissions,
            state: AuthState::Authenticated,
        })
    }

    pub fn subject(&self) -> Option<&str> {
        self.subject.as_deref()
    }

    pub fn permissions(&self) -> &PermissionSet {
        &self.permissions
    }

    pub fn state(&self) -> AuthState {
        self.state
    }

    pub fn is_authenticated(&self) -> bool {
        self.state == AuthState::Authenticated
    }
}

/// Session-scoped holder of the current subject and its permission set.
pub struct AuthContext<I: IdentitySource> {
    /// Where identities are loaded from.
    identity: I,
    /// Configuration.
    config: ContextConfig,
    /// The current session snapshot.
    session: Arc<Session>,
}

impl<I: IdentitySource> AuthContext<I> {
    /// Create an unauthenticated context.
    pub fn new(identity: I, config: ContextConfig) -> Self {
        Self {
            identity,
            config,
            session: Arc::new(Session::unauthenticated()),
        }
    }

    /// Get the identity source reference.
    pub fn identity_source(&self) -> &I {
        &self.identity
    }

    pub fn config(&self) -> &ContextConfig {
        &self.config
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Session Lifecycle
    // ─────────────────────────────────────────────────────────────────────────

    /// Load the subject and its grants from the identity source.
    ///
    /// On success the context becomes authenticated and the subject is
    /// returned. On failure (identity source error, timeout, or a
    /// malformed grant) the previous session is left untouched.
    pub async fn load(&mut self) -> Result<Option<&str>> {
        let identity = self.fetch_identity().await.map_err(|e| {
            tracing::warn!(error = %e, "identity source failed, keeping previous session");
            e
        })?;

        let session = Session::authenticated(
            identity,
            PermissionSetConfig {
                cache_capacity: self.config.cache_capacity,
            },
        )?;

        tracing::debug!(
            subject = ?session.subject(),
            allow = session.permissions().allow_rules().len(),
            deny = session.permissions().deny_rules().len(),
            "session loaded"
        );

        self.session = Arc::new(session);
        Ok(self.session.subject())
    }

    async fn fetch_identity(&self) -> std::result::Result<Identity, IdentityError> {
        match self.config.identity_timeout {
            Some(limit) => tokio::time::timeout(limit, self.identity.fetch_identity())
                .await
                .map_err(|_| IdentityError::Timeout(limit))?,
            None => self.identity.fetch_identity().await,
        }
    }

    /// Drop the subject and its permissions.
    pub fn reset(&mut self) {
        if self.session.is_authenticated() {
            tracing::debug!(subject = ?self.session.subject(), "session reset");
        }
        self.session = Arc::new(Session::unauthenticated());
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Session Queries
    // ─────────────────────────────────────────────────────────────────────────

    /// A shareable snapshot of the current session.
    pub fn session(&self) -> Arc<Session> {
        Arc::clone(&self.session)
    }

    pub fn state(&self) -> AuthState {
        self.session.state()
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_authenticated()
    }

    pub fn subject(&self) -> Option<&str> {
        self.session.subject()
    }

    pub fn permissions(&self) -> &PermissionSet {
        self.session.permissions()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Guards
    // ─────────────────────────────────────────────────────────────────────────

    /// Check a single permission.
    pub fn has_permission(&self, permission: &str) -> bool {
        self.session.permissions().has(permission)
    }

    /// Fail with [`AuthError::AccessDenied`] unless `permission` is granted.
    pub fn require_permission(&self, permission: &str, message: impl Into<String>) -> Result<()> {
        if self.has_permission(permission) {
            return Ok(());
        }
        Err(self.denied(vec![permission.to_owned()], message.into()))
    }

    /// [`require_permission`](Self::require_permission) with the default message.
    pub fn require(&self, permission: &str) -> Result<()> {
        self.require_permission(permission, DEFAULT_DENIED_MESSAGE)
    }

    /// Fail unless at least one of `permissions` is granted.
    pub fn require_any<P, S>(&self, permissions: P, message: impl Into<String>) -> Result<()>
    where
        P: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let permissions: Vec<String> = permissions
            .into_iter()
            .map(|p| p.as_ref().to_owned())
            .collect();

        if self.session.permissions().any_of(&permissions) {
            return Ok(());
        }
        Err(self.denied(permissions, message.into()))
    }

    /// Fail unless every one of `permissions` is granted.
    pub fn require_all<P, S>(&self, permissions: P, message: impl Into<String>) -> Result<()>
    where
        P: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let permissions: Vec<String> = permissions
            .into_iter()
            .map(|p| p.as_ref().to_owned())
            .collect();

        if self.session.permissions().all_of(&permissions) {
            return Ok(());
        }
        Err(self.denied(permissions, message.into()))
    }

    fn denied(&self, permissions: Vec<String>, message: String) -> AuthError {
        tracing::debug!(
            subject = ?self.session.subject(),
            permissions = ?permissions,
            "access denied"
        );
        AuthError::AccessDenied {
            permissions,
            message,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::memory::MemoryIdentity;

    fn context(patterns: &[&str]) -> AuthContext<MemoryIdentity> {
        AuthContext::new(
            MemoryIdentity::new(Identity::new("alice", patterns.iter().copied())),
            ContextConfig::default(),
        )
    }

    #[test]
    fn test_new_context_is_unauthenticated() {
        let ctx = context(&["*"]);
        assert_eq!(ctx.state(), AuthState::Unauthenticated);
        assert_eq!(ctx.subject(), None);
        assert!(!ctx.has_permission("tkeeper.system.status"));
    }

    #[tokio::test]
    async fn test_load_authenticates() {
        let mut ctx = context(&["tkeeper.system.*"]);
        let subject = ctx.load().await.unwrap();
        assert_eq!(subject, Some("alice"));

        assert!(ctx.is_authenticated());
        assert!(ctx.has_permission("tkeeper.system.seal"));
        assert!(!ctx.has_permission("tkeeper.storage.write"));
    }

    #[tokio::test]
    async fn test_reset_discards_subject_and_permissions() {
        let mut ctx = context(&["tkeeper.system.*"]);
        ctx.load().await.unwrap();
        ctx.reset();

        assert_eq!(ctx.state(), AuthState::Unauthenticated);
        assert_eq!(ctx.subject(), None);
        assert!(ctx.permissions().is_empty());
        assert!(!ctx.has_permission("tkeeper.system.seal"));
    }

    #[tokio::test]
    async fn test_failed_load_keeps_previous_session() {
        let mut ctx = context(&["tkeeper.system.seal"]);
        ctx.load().await.unwrap();

        ctx.identity_source().set_failure("token expired");
        let err = ctx.load().await.unwrap_err();
        assert!(matches!(err, AuthError::IdentitySource(_)));

        assert!(ctx.is_authenticated());
        assert_eq!(ctx.subject(), Some("alice"));
        assert!(ctx.has_permission("tkeeper.system.seal"));
    }

    #[tokio::test]
    async fn test_failed_first_load_stays_unauthenticated() {
        let mut ctx = AuthContext::new(MemoryIdentity::failing("offline"), ContextConfig::default());
        assert!(ctx.load().await.is_err());
        assert_eq!(ctx.state(), AuthState::Unauthenticated);
    }

    #[tokio::test]
    async fn test_malformed_grant_fails_load_without_mutation() {
        let mut ctx = context(&["tkeeper.key.*.sign"]);
        ctx.load().await.unwrap();

        ctx.identity_source()
            .set_identity(Identity::new("mallory", ["tkeeper.**"]));
        let err = ctx.load().await.unwrap_err();
        assert_eq!(err.code(), crate::error::INVALID_PATTERN);

        assert_eq!(ctx.subject(), Some("alice"));
        assert!(ctx.has_permission("tkeeper.key.k1.sign"));
    }

    #[tokio::test]
    async fn test_reload_replaces_permissions() {
        let mut ctx = context(&["tkeeper.system.seal"]);
        ctx.load().await.unwrap();
        assert!(ctx.has_permission("tkeeper.system.seal"));

        ctx.identity_source()
            .set_identity(Identity::new("alice", ["tkeeper.system.unseal"]));
        ctx.load().await.unwrap();

        assert!(!ctx.has_permission("tkeeper.system.seal"));
        assert!(ctx.has_permission("tkeeper.system.unseal"));
    }

    #[tokio::test]
    async fn test_snapshot_survives_reset() {
        let mut ctx = context(&["tkeeper.audit.log.verify"]);
        ctx.load().await.unwrap();

        let snapshot = ctx.session();
        ctx.reset();

        assert!(snapshot.permissions().has("tkeeper.audit.log.verify"));
        assert!(!ctx.has_permission("tkeeper.audit.log.verify"));
    }

    #[tokio::test]
    async fn test_require_permission() {
        let mut ctx = context(&["tkeeper.system.status"]);
        ctx.load().await.unwrap();

        assert!(ctx.require_permission("tkeeper.system.status", "nope").is_ok());

        let err = ctx
            .require_permission("tkeeper.system.seal", "You cannot seal the system")
            .unwrap_err();
        match err {
            AuthError::AccessDenied {
                permissions,
                message,
            } => {
                assert_eq!(permissions, vec!["tkeeper.system.seal"]);
                assert_eq!(message, "You cannot seal the system");
            }
            other => panic!("expected AccessDenied, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_require_uses_default_message() {
        let ctx = context(&[]);
        let err = ctx.require("tkeeper.system.init").unwrap_err();
        assert!(err.to_string().starts_with(DEFAULT_DENIED_MESSAGE));
    }

    #[tokio::test]
    async fn test_require_any_and_all() {
        let mut ctx = context(&["tkeeper.key.k1.verify"]);
        ctx.load().await.unwrap();

        let both = ["tkeeper.key.k1.sign", "tkeeper.key.k1.verify"];
        assert!(ctx.require_any(both, "denied").is_ok());

        let err = ctx.require_all(both, "denied").unwrap_err();
        assert_eq!(err.denied_permissions().map(<[String]>::len), Some(2));

        let err = ctx
            .require_any(["tkeeper.key.k1.sign", "tkeeper.key.k1.destroy"], "denied")
            .unwrap_err();
        assert!(err.is_access_denied());
    }

    #[tokio::test]
    async fn test_load_timeout() {
        let source = MemoryIdentity::new(Identity::new("alice", ["a.b"]))
            .with_delay(Duration::from_millis(200));
        let mut ctx = AuthContext::new(
            source,
            ContextConfig {
                identity_timeout: Some(Duration::from_millis(10)),
                ..ContextConfig::default()
            },
        );

        let err = ctx.load().await.unwrap_err();
        assert!(matches!(
            err,
            AuthError::IdentitySource(IdentityError::Timeout(_))
        ));
        assert!(!ctx.is_authenticated());
    }

    #[tokio::test]
    async fn test_cache_capacity_is_applied() {
        let mut ctx = AuthContext::new(
            MemoryIdentity::new(Identity::new("alice", ["tkeeper.key.*.sign"])),
            ContextConfig {
                cache_capacity: 4,
                ..ContextConfig::default()
            },
        );
        ctx.load().await.unwrap();
        assert_eq!(ctx.permissions().cache_capacity(), 4);
    }
}
