//! Allow and deny rules.
//!
//! A raw grant is a pattern optionally prefixed with `-`. The prefix marks
//! a deny rule; everything else is an allow rule.

use std::fmt;
use std::str::FromStr;

use crate::error::{CompileError, Result};
use crate::pattern::CompiledPattern;

/// Prefix marking a deny rule.
pub const DENY_PREFIX: char = '-';

/// Whether a rule grants or vetoes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Effect {
    /// Grants permissions matching the pattern.
    Allow,
    /// Vetoes permissions matching the pattern, regardless of any grant.
    Deny,
}

/// A compiled rule: an effect and the pattern it applies to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Rule {
    pub effect: Effect,
    pub pattern: CompiledPattern,
}

impl Rule {
    /// Parse a raw grant string into a rule.
    pub fn parse(raw: &str) -> Result<Self> {
        let (effect, body) = match raw.strip_prefix(DENY_PREFIX) {
            Some(body) => (Effect::Deny, body),
            None => (Effect::Allow, raw),
        };

        Ok(Self {
            effect,
            pattern: CompiledPattern::compile(body)?,
        })
    }

    pub fn is_deny(&self) -> bool {
        self.effect == Effect::Deny
    }
}

impl FromStr for Rule {
    type Err = CompileError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.effect {
            Effect::Allow => write!(f, "{}", self.pattern),
            Effect::Deny => write!(f, "{DENY_PREFIX}{}", self.pattern),
        }
    }
}
