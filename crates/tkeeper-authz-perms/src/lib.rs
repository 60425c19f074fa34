//! # tkeeper Authz Permissions
//!
//! Permission sets: compiled allow/deny rules with a bounded decision cache.
//!
//! ## Overview
//!
//! A [`PermissionSet`] is built once per subject session from the raw grant
//! strings returned by the identity source. Grants prefixed with `-` are
//! deny rules; all others are allow rules.
//!
//! ## Evaluation
//!
//! A permission is granted when:
//!
//! 1. it matches at least one allow rule, and
//! 2. it matches no deny rule.
//!
//! Absence of a grant is always a denial. A deny rule is an unconditional
//! veto, used to carve exceptions out of broad wildcard grants.
//!
//! ## Usage
//!
//! ```rust
//! use tkeeper_authz_perms::PermissionSet;
//!
//! let perms = PermissionSet::new([
//!     "tkeeper.key.*.sign",
//!     "tkeeper.key.*.verify",
//!     "-tkeeper.key.legacy.sign",
//! ])
//! .unwrap();
//!
//! assert!(perms.has("tkeeper.key.prod1.sign"));
//! assert!(!perms.has("tkeeper.key.legacy.sign"));
//! assert!(perms.any_of(["tkeeper.key.legacy.sign", "tkeeper.key.legacy.verify"]));
//! ```

pub mod cache;
pub mod set;

pub use cache::{DecisionCache, DEFAULT_CACHE_CAPACITY};
pub use set::{PermissionSet, PermissionSetConfig};
pub use tkeeper_authz_core::CompileError;

/// Result type for permission set construction.
pub type Result<T> = std::result::Result<T, CompileError>;
