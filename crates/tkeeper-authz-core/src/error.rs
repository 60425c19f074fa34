//! Error types for pattern compilation.

use thiserror::Error;

/// Errors raised while compiling a permission pattern.
///
/// Both variants carry the full pattern text and the segment that was
/// rejected, so a malformed grant can be reported back to whoever issued it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileError {
    #[error(
        "deep wildcard '**' is not allowed in pattern '{pattern}': permissions must be explicit per segment"
    )]
    DeepWildcardNotAllowed { pattern: String, segment: String },

    #[error("invalid segment '{segment}' in pattern '{pattern}': max one wildcard per segment")]
    TooManyWildcardsInSegment { pattern: String, segment: String },
}

impl CompileError {
    /// The full pattern that failed to compile.
    pub fn pattern(&self) -> &str {
        match self {
            CompileError::DeepWildcardNotAllowed { pattern, .. }
            | CompileError::TooManyWildcardsInSegment { pattern, .. } => pattern,
        }
    }

    /// The offending segment within the pattern.
    pub fn segment(&self) -> &str {
        match self {
            CompileError::DeepWildcardNotAllowed { segment, .. }
            | CompileError::TooManyWildcardsInSegment { segment, .. } => segment,
        }
    }

    /// Re-attribute the error to an enclosing pattern.
    pub(crate) fn in_pattern(self, raw: &str) -> Self {
        match self {
            CompileError::DeepWildcardNotAllowed { segment, .. } => {
                CompileError::DeepWildcardNotAllowed {
                    pattern: raw.to_owned(),
                    segment,
                }
            }
            CompileError::TooManyWildcardsInSegment { segment, .. } => {
                CompileError::TooManyWildcardsInSegment {
                    pattern: raw.to_owned(),
                    segment,
                }
            }
        }
    }
}

/// Result type for compilation.
pub type Result<T> = std::result::Result<T, CompileError>;
