//! # tkeeper Authz Core
//!
//! Pure primitives for tkeeper authorization: segment matchers, pattern
//! compilation, and allow/deny rules.
//!
//! This crate contains no I/O and no shared state. Everything here is
//! immutable once compiled and safe to share between threads.
//!
//! ## Key Types
//!
//! - [`SegmentMatcher`] - Compiled predicate for one pattern segment
//! - [`CompiledPattern`] - Ordered segment matchers for a whole pattern
//! - [`Rule`] - A pattern with its [`Effect`] (allow or deny)
//! - [`CompileError`] - Why a pattern was rejected
//!
//! ## Pattern Syntax
//!
//! Patterns are dot-separated. Each segment may hold at most one `*`:
//!
//! ```rust
//! use tkeeper_authz_core::CompiledPattern;
//!
//! let pattern: CompiledPattern = "tkeeper.key.*.sign".parse().unwrap();
//! assert!(pattern.matches("tkeeper.key.prod1.sign"));
//! assert!(!pattern.matches("tkeeper.key.a.b.sign"));
//!
//! assert!("tkeeper.**".parse::<CompiledPattern>().is_err());
//! ```

pub mod error;
pub mod pattern;
pub mod rule;
pub mod segment;

pub use error::{CompileError, Result};
pub use pattern::{split_segments, CompiledPattern, SEGMENT_SEPARATOR};
pub use rule::{Effect, Rule, DENY_PREFIX};
pub use segment::{SegmentMatcher, DEEP_WILDCARD, WILDCARD};
