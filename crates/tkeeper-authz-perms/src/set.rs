//! Permission set evaluation.
//!
//! A permission set is compiled once from a subject's raw grants and is
//! immutable thereafter. A permission is granted when it matches at least
//! one allow rule and no deny rule. Deny rules are only consulted for
//! permissions that some allow rule already matched.

use tkeeper_authz_core::{split_segments, CompiledPattern, Effect, Rule};

use crate::cache::{DecisionCache, DEFAULT_CACHE_CAPACITY};
use crate::Result;

/// Configuration for a permission set.
#[derive(Debug, Clone)]
pub struct PermissionSetConfig {
    /// Maximum number of cached decisions. Zero disables the cache.
    pub cache_capacity: usize,
}

impl Default for PermissionSetConfig {
    fn default() -> Self {
        Self {
            cache_capacity: DEFAULT_CACHE_CAPACITY,
        }
    }
}

/// Compiled allow and deny rules for one subject.
///
/// The rule lists never change after construction and can be read from
/// any number of threads. The decision cache is the only mutable state.
#[derive(Debug)]
pub struct PermissionSet {
    /// Grant patterns, in the order they were given.
    allow: Vec<CompiledPattern>,

    /// Veto patterns, in the order they were given.
    deny: Vec<CompiledPattern>,

    /// Memoized decisions.
    cache: DecisionCache,
}

impl PermissionSet {
    /// Build a permission set with the default configuration.
    pub fn new<I, S>(patterns: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::with_config(patterns, PermissionSetConfig::default())
    }

    /// Build a permission set from raw grant strings.
    ///
    /// Empty entries are skipped. The first malformed pattern fails the
    /// whole construction; no partially compiled set is ever returned.
    pub fn with_config<I, S>(patterns: I, config: PermissionSetConfig) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut allow = Vec::new();
        let mut deny = Vec::new();

        for raw in patterns {
            let raw = raw.as_ref();
            if raw.is_empty() {
                continue;
            }

            let rule = Rule::parse(raw).map_err(|e| {
                tracing::warn!(pattern = raw, error = %e, "rejecting malformed permission pattern");
                e
            })?;

            match rule.effect {
                Effect::Allow => allow.push(rule.pattern),
                Effect::Deny => deny.push(rule.pattern),
            }
        }

        Ok(Self {
            allow,
            deny,
            cache: DecisionCache::new(config.cache_capacity),
        })
    }

    /// A permission set that grants nothing.
    pub fn empty() -> Self {
        Self {
            allow: Vec::new(),
            deny: Vec::new(),
            cache: DecisionCache::default(),
        }
    }

    /// Check whether a permission is granted.
    ///
    /// Blank permissions are never granted. Results are memoized; the
    /// cache never alters a decision.
    pub fn has(&self, permission: &str) -> bool {
        if permission.trim().is_empty() {
            return false;
        }

        if let Some(decision) = self.cache.get(permission) {
            return decision;
        }

        let decision = self.evaluate(permission);
        self.cache.insert(permission, decision);
        decision
    }

    /// True if at least one permission is granted.
    pub fn any_of<I, S>(&self, permissions: I) -> bool
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        permissions.into_iter().any(|p| self.has(p.as_ref()))
    }

    /// True only if every permission is granted.
    ///
    /// An empty list is vacuously granted.
    pub fn all_of<I, S>(&self, permissions: I) -> bool
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        permissions.into_iter().all(|p| self.has(p.as_ref()))
    }

    /// Evaluate without touching the cache.
    fn evaluate(&self, permission: &str) -> bool {
        let segments: Vec<&str> = split_segments(permission).collect();
        if segments.is_empty() {
            return false;
        }

        let allowed = self.allow.iter().any(|p| p.matches_segments(&segments));
        if !allowed {
            return false;
        }

        !self.deny.iter().any(|p| p.matches_segments(&segments))
    }

    /// The compiled allow rules.
    pub fn allow_rules(&self) -> &[CompiledPattern] {
        &self.allow
    }

    /// The compiled deny rules (without their `-` prefix).
    pub fn deny_rules(&self) -> &[CompiledPattern] {
        &self.deny
    }

    /// True if this set grants nothing at all.
    pub fn is_empty(&self) -> bool {
        self.allow.is_empty()
    }

    /// Number of currently cached decisions.
    pub fn cache_len(&self) -> usize {
        self.cache.len()
    }

    pub fn cache_capacity(&self) -> usize {
        self.cache.capacity()
    }
}

impl Default for PermissionSet {
    fn default() -> Self {
        Self::empty()
    }
}
