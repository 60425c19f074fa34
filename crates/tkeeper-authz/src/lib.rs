//! # tkeeper Authz
//!
//! The unified authorization API for tkeeper: a hierarchical permission
//! matcher gating key signing, seal/unseal, key generation, audit
//! verification and inventory access.
//!
//! ## Overview
//!
//! - **Patterns**: dot-segmented permission templates with at most one `*`
//!   per segment, compiled once
//! - **Permission sets**: allow and deny rules; deny always wins, and no
//!   grant means no access
//! - **Auth context**: the current subject and its permission set, loaded
//!   from an [`IdentitySource`], with guards that fail on denial
//!
//! ## Usage
//!
//! ```rust,no_run
//! use tkeeper_authz::{AuthContext, ContextConfig, Identity};
//! use tkeeper_authz::identity::memory::MemoryIdentity;
//!
//! async fn example() -> tkeeper_authz::Result<()> {
//!     let source = MemoryIdentity::new(Identity::new(
//!         "operator",
//!         ["tkeeper.key.*.sign", "-tkeeper.key.legacy.sign"],
//!     ));
//!
//!     let mut auth = AuthContext::new(source, ContextConfig::default());
//!     auth.load().await?;
//!
//!     auth.require_permission("tkeeper.key.prod1.sign", "You cannot sign with this key")?;
//!     assert!(!auth.has_permission("tkeeper.key.legacy.sign"));
//!     Ok(())
//! }
//! ```
//!
//! ## Re-exports
//!
//! This crate re-exports the component crates for convenience:
//!
//! - `tkeeper_authz::core` - Segment matchers, pattern compilation, rules
//! - `tkeeper_authz::perms` - Permission sets and the decision cache

pub mod context;
pub mod error;
pub mod identity;

// Re-export component crates
pub use tkeeper_authz_core as core;
pub use tkeeper_authz_perms as perms;

// Re-export main types for convenience
pub use context::{AuthContext, AuthState, ContextConfig, Session};
pub use error::{AuthError, IdentityError, Result};
pub use identity::{Identity, IdentitySource};

// Re-export commonly used component types
pub use tkeeper_authz_core::{CompileError, CompiledPattern, Effect, Rule, SegmentMatcher};
pub use tkeeper_authz_perms::{PermissionSet, PermissionSetConfig};
