//! Segment matchers: the compiled predicate for one pattern segment.
//!
//! A pattern segment is compiled exactly once into a [`SegmentMatcher`].
//! Evaluation never re-inspects the raw segment text.

use std::fmt;

use crate::error::{CompileError, Result};

/// The single-segment wildcard character.
pub const WILDCARD: char = '*';

/// A whole segment of `**`. Rejected: there are no cross-segment wildcards.
pub const DEEP_WILDCARD: &str = "**";

/// Compiled matcher for one dot-delimited pattern segment.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SegmentMatcher {
    /// `*`: any non-empty value.
    Any,
    /// No wildcard: the value must equal the segment.
    Exact(String),
    /// `foo*`: the value must start with `foo`.
    Prefix(String),
    /// `*foo`: the value must end with `foo`.
    Suffix(String),
    /// `fo*oo`: the value must start with `fo` and end with `oo`, with the
    /// two parts not overlapping.
    Affix { prefix: String, suffix: String },
}

impl SegmentMatcher {
    /// Compile a raw pattern segment.
    ///
    /// The returned error names the segment as its own pattern; callers
    /// compiling a whole pattern re-attribute it.
    pub fn compile(raw: &str) -> Result<Self> {
        if raw == DEEP_WILDCARD {
            return Err(CompileError::DeepWildcardNotAllowed {
                pattern: raw.to_owned(),
                segment: raw.to_owned(),
            });
        }

        let matcher = match raw.split_once(WILDCARD) {
            None => SegmentMatcher::Exact(raw.to_owned()),
            Some((_, rest)) if rest.contains(WILDCARD) => {
                return Err(CompileError::TooManyWildcardsInSegment {
                    pattern: raw.to_owned(),
                    segment: raw.to_owned(),
                });
            }
            Some(("", "")) => SegmentMatcher::Any,
            Some((prefix, "")) => SegmentMatcher::Prefix(prefix.to_owned()),
            Some(("", suffix)) => SegmentMatcher::Suffix(suffix.to_owned()),
            Some((prefix, suffix)) => SegmentMatcher::Affix {
                prefix: prefix.to_owned(),
                suffix: suffix.to_owned(),
            },
        };

        Ok(matcher)
    }

    /// Check a single permission segment against this matcher.
    pub fn matches(&self, value: &str) -> bool {
        match self {
            SegmentMatcher::Any => !value.is_empty(),
            SegmentMatcher::Exact(expected) => value == expected,
            SegmentMatcher::Prefix(prefix) => value.starts_with(prefix.as_str()),
            SegmentMatcher::Suffix(suffix) => value.ends_with(suffix.as_str()),
            SegmentMatcher::Affix { prefix, suffix } => {
                value.len() >= prefix.len() + suffix.len()
                    && value.starts_with(prefix.as_str())
                    && value.ends_with(suffix.as_str())
            }
        }
    }

    /// Whether this matcher contains a wildcard.
    pub fn is_wildcard(&self) -> bool {
        !matches!(self, SegmentMatcher::Exact(_))
    }
}

impl fmt::Display for SegmentMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SegmentMatcher::Any => write!(f, "{WILDCARD}"),
            SegmentMatcher::Exact(value) => f.write_str(value),
            SegmentMatcher::Prefix(prefix) => write!(f, "{prefix}{WILDCARD}"),
            SegmentMatcher::Suffix(suffix) => write!(f, "{WILDCARD}{suffix}"),
            SegmentMatcher::Affix { prefix, suffix } => write!(f, "{prefix}{WILDCARD}{suffix}"),
        }
    }
}
