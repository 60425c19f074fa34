//! Test fixtures and helpers.
//!
//! Common subjects and grant lists for integration tests.

use std::sync::Arc;

use tkeeper_authz::identity::memory::MemoryIdentity;
use tkeeper_authz::{AuthContext, ContextConfig, Identity, PermissionSet};

/// Grants of an operator allowed to use every key except the legacy one.
pub const OPERATOR_GRANTS: &[&str] = &[
    "tkeeper.key.*.public",
    "tkeeper.key.*.sign",
    "tkeeper.key.*.verify",
    "-tkeeper.key.legacy.sign",
    "tkeeper.system.status",
    "tkeeper.dkg.*",
];

/// Grants of an auditor: audit and compliance, no key use.
pub const AUDITOR_GRANTS: &[&str] = &[
    "tkeeper.audit.log.verify",
    "tkeeper.compliance.inventory",
    "tkeeper.system.status",
];

/// Grants of an administrator: everything under `tkeeper` up to four
/// segments, except destroying keys.
pub const ADMIN_GRANTS: &[&str] = &[
    "tkeeper.*",
    "tkeeper.*.*",
    "tkeeper.*.*.*",
    "-tkeeper.key.*.destroy",
];

/// A subject with a shared in-memory identity source.
pub struct TestFixture {
    pub identity: Arc<MemoryIdentity>,
    pub config: ContextConfig,
}

impl TestFixture {
    /// Create a fixture for a subject holding `grants`.
    pub fn new(subject: &str, grants: &[&str]) -> Self {
        Self {
            identity: Arc::new(MemoryIdentity::new(Identity::new(
                subject,
                grants.iter().copied(),
            ))),
            config: ContextConfig::default(),
        }
    }

    pub fn operator() -> Self {
        Self::new("operator", OPERATOR_GRANTS)
    }

    pub fn auditor() -> Self {
        Self::new("auditor", AUDITOR_GRANTS)
    }

    pub fn admin() -> Self {
        Self::new("admin", ADMIN_GRANTS)
    }

    /// Use a different context configuration.
    pub fn with_config(mut self, config: ContextConfig) -> Self {
        self.config = config;
        self
    }

    /// An unauthenticated context backed by this fixture's identity source.
    pub fn context(&self) -> AuthContext<Arc<MemoryIdentity>> {
        AuthContext::new(Arc::clone(&self.identity), self.config.clone())
    }
}

/// Compile a grant list directly, panicking on malformed fixtures.
pub fn compile_grants(grants: &[&str]) -> PermissionSet {
    match PermissionSet::new(grants) {
        Ok(set) => set,
        Err(e) => panic!("fixture grants must compile: {e}"),
    }
}

/// Create fixtures for the standard roles: operator, auditor, admin.
pub fn role_fixtures() -> Vec<TestFixture> {
    vec![
        TestFixture::operator(),
        TestFixture::auditor(),
        TestFixture::admin(),
    ]
}
