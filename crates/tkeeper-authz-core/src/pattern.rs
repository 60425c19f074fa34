//! Pattern compilation and permission splitting.
//!
//! A pattern compiles into an ordered list of [`SegmentMatcher`]s. A
//! permission matches only when it has exactly as many segments as the
//! pattern and every positional matcher accepts its segment.

use std::fmt;
use std::str::FromStr;

use crate::error::{CompileError, Result};
use crate::segment::SegmentMatcher;

/// Separator between permission segments.
pub const SEGMENT_SEPARATOR: char = '.';

/// Split a permission or pattern into its non-empty segments.
///
/// Leading, trailing and doubled separators produce empty segments, which
/// are discarded.
pub fn split_segments(s: &str) -> impl Iterator<Item = &str> {
    s.split(SEGMENT_SEPARATOR).filter(|segment| !segment.is_empty())
}

/// A compiled permission pattern.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CompiledPattern {
    /// The pattern text as given (without any deny prefix).
    source: String,
    /// One matcher per non-empty segment.
    segments: Vec<SegmentMatcher>,
}

impl CompiledPattern {
    /// Compile a pattern string.
    ///
    /// Fails on the first segment that is `**` or holds more than one
    /// wildcard. A pattern with no segments compiles but never matches.
    pub fn compile(raw: &str) -> Result<Self> {
        let segments = split_segments(raw)
            .map(|segment| SegmentMatcher::compile(segment).map_err(|e| e.in_pattern(raw)))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            source: raw.to_owned(),
            segments,
        })
    }

    /// The source text of this pattern.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// The compiled segment matchers, in order.
    pub fn segments(&self) -> &[SegmentMatcher] {
        &self.segments
    }

    /// Number of segments.
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// True if the pattern has no segments (and so matches nothing).
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// True if no segment holds a wildcard.
    pub fn is_literal(&self) -> bool {
        !self.segments.iter().any(SegmentMatcher::is_wildcard)
    }

    /// Match a permission string.
    pub fn matches(&self, permission: &str) -> bool {
        let segments: Vec<&str> = split_segments(permission).collect();
        self.matches_segments(&segments)
    }

    /// Match an already split permission.
    pub fn matches_segments(&self, segments: &[&str]) -> bool {
        if segments.is_empty() || segments.len() != self.segments.len() {
            return false;
        }

        self.segments
            .iter()
            .zip(segments)
            .all(|(matcher, value)| matcher.matches(value))
    }
}

impl FromStr for CompiledPattern {
    type Err = CompileError;

    fn from_str(s: &str) -> Result<Self> {
        Self::compile(s)
    }
}

impl fmt::Display for CompiledPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}
