//! # tkeeper Authz Testkit
//!
//! Testing utilities for tkeeper authorization.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Golden vectors**: Grant lists with expected decisions, shared with
//!   other implementations of the matcher
//! - **Generators**: Proptest strategies for permissions and matching patterns
//! - **Fixtures**: Standard subjects (operator, auditor, admin) backed by
//!   in-memory identity sources
//!
//! ## Golden Vectors
//!
//! ```rust
//! use tkeeper_authz_testkit::vectors::{all_vectors, verify_all_vectors};
//!
//! assert!(!all_vectors().is_empty());
//! verify_all_vectors().unwrap();
//! ```
//!
//! ## Property Testing
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use tkeeper_authz_testkit::generators::MatchingPair;
//!
//! proptest! {
//!     #[test]
//!     fn generated_pattern_matches(pair: MatchingPair) {
//!         let pattern = CompiledPattern::compile(&pair.pattern).unwrap();
//!         prop_assert!(pattern.matches(&pair.permission));
//!     }
//! }
//! ```
//!
//! ## Test Fixtures
//!
//! ```rust
//! use tkeeper_authz_testkit::fixtures::TestFixture;
//!
//! let fixture = TestFixture::operator();
//! let ctx = fixture.context();
//! assert!(!ctx.is_authenticated());
//! ```

pub mod fixtures;
pub mod generators;
pub mod vectors;

pub use fixtures::{compile_grants, role_fixtures, TestFixture};
pub use generators::{pattern_for, permission, MatchingPair};
pub use vectors::{all_vectors, verify_all_vectors, verify_vector, Check, GoldenVector};
