//! Golden decision vectors.
//!
//! Each vector is a grant list plus a set of permission probes with their
//! expected decisions. Any implementation of the matcher, in any language,
//! must reproduce every expected decision exactly.

use serde::{Deserialize, Serialize};

use tkeeper_authz_perms::{PermissionSet, PermissionSetConfig};

/// One golden vector.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoldenVector {
    pub name: String,
    pub description: String,

    // Inputs
    pub patterns: Vec<String>,

    // Expected outputs
    pub checks: Vec<Check>,
}

/// A single permission probe and its expected decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Check {
    pub permission: String,
    pub granted: bool,
}

fn vector(name: &str, description: &str, patterns: &[&str], checks: &[(&str, bool)]) -> GoldenVector {
    GoldenVector {
        name: name.to_string(),
        description: description.to_string(),
        patterns: patterns.iter().map(|p| p.to_string()).collect(),
        checks: checks
            .iter()
            .map(|(permission, granted)| Check {
                permission: permission.to_string(),
                granted: *granted,
            })
            .collect(),
    }
}

/// All golden vectors.
pub fn all_vectors() -> Vec<GoldenVector> {
    vec![
        vector(
            "exact_membership",
            "Literal grants: granted iff listed and not denied",
            &["tkeeper.system.seal", "tkeeper.system.status", "-tkeeper.system.status"],
            &[
                ("tkeeper.system.seal", true),
                ("tkeeper.system.status", false),
                ("tkeeper.system.unseal", false),
            ],
        ),
        vector(
            "deny_overrides_allow",
            "Identical allow and deny: deny wins",
            &["a.b.c", "-a.b.c"],
            &[("a.b.c", false)],
        ),
        vector(
            "segment_count",
            "A wildcard matches exactly one segment",
            &["a.*.c"],
            &[("a.b.c", true), ("a.b.d.c", false), ("a.c", false)],
        ),
        vector(
            "prefix_wildcard",
            "Trailing wildcard inside a segment",
            &["key.ab*"],
            &[("key.abc", true), ("key.ab", true), ("key.xab", false)],
        ),
        vector(
            "suffix_wildcard",
            "Leading wildcard inside a segment",
            &["key.*yz"],
            &[("key.xyz", true), ("key.yz", true), ("key.xyzz", false)],
        ),
        vector(
            "affix_wildcard",
            "Wildcard in the middle of a segment; parts may not overlap",
            &["key.a*z", "key.ab*ba"],
            &[
                ("key.az", true),
                ("key.abcz", true),
                ("key.a", false),
                ("key.aba", false),
                ("key.abba", true),
            ],
        ),
        vector(
            "key_signing",
            "Sign and verify any key except the legacy one",
            &[
                "tkeeper.key.*.sign",
                "tkeeper.key.*.verify",
                "-tkeeper.key.legacy.sign",
            ],
            &[
                ("tkeeper.key.prod1.sign", true),
                ("tkeeper.key.legacy.sign", false),
                ("tkeeper.key.legacy.verify", true),
                ("tkeeper.key.prod1.destroy", false),
                ("tkeeper.key.a.b.sign", false),
            ],
        ),
        vector(
            "deny_alone_grants_nothing",
            "Deny rules never grant",
            &["-tkeeper.key.*.destroy"],
            &[("tkeeper.key.k1.destroy", false), ("tkeeper.key.k1.sign", false)],
        ),
        vector(
            "separator_normalization",
            "Empty segments are dropped from grants and permissions",
            &[".tkeeper..audit.log.verify."],
            &[
                ("tkeeper.audit.log.verify", true),
                ("tkeeper..audit.log.verify", true),
                ("", false),
                ("...", false),
            ],
        ),
        vector(
            "literal_star_in_permission",
            "Permissions have no wildcard semantics",
            &["tkeeper.dkg.frost"],
            &[("tkeeper.dkg.*", false), ("tkeeper.dkg.frost", true)],
        ),
        vector(
            "case_sensitive",
            "Segments compare case-sensitively",
            &["tkeeper.compliance.inventory"],
            &[
                ("tkeeper.compliance.inventory", true),
                ("tkeeper.Compliance.inventory", false),
            ],
        ),
    ]
}

/// Check one vector against a permission set with the given cache config.
///
/// Every probe is run twice so cached and uncached answers are both
/// covered. Returns a description of the first mismatch.
pub fn verify_vector(vector: &GoldenVector, config: PermissionSetConfig) -> Result<(), String> {
    let perms = PermissionSet::with_config(&vector.patterns, config)
        .map_err(|e| format!("{}: patterns failed to compile: {e}", vector.name))?;

    for pass in 0..2 {
        for check in &vector.checks {
            let granted = perms.has(&check.permission);
            if granted != check.granted {
                return Err(format!(
                    "{}: pass {pass}: has({:?}) = {granted}, expected {}",
                    vector.name, check.permission, check.granted
                ));
            }
        }
    }

    Ok(())
}

/// Verify every golden vector with the default configuration.
pub fn verify_all_vectors() -> Result<(), String> {
    all_vectors()
        .iter()
        .try_for_each(|v| verify_vector(v, PermissionSetConfig::default()))
}

/// Render all vectors as pretty JSON, for export to other implementations.
pub fn vectors_json() -> serde_json::Result<String> {
    serde_json::to_string_pretty(&all_vectors())
}
