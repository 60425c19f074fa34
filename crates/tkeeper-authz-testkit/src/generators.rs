//! Proptest generators for property-based testing.

use proptest::prelude::*;

/// Generate a permission segment.
pub fn segment() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9-]{0,7}".prop_map(String::from)
}

/// Generate the segments of a permission (1 to 5 segments).
pub fn permission_segments() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(segment(), 1..=5)
}

/// Generate a permission string.
pub fn permission() -> impl Strategy<Value = String> {
    permission_segments().prop_map(|segments| segments.join("."))
}

/// Generate a pattern segment that is guaranteed to match `value`.
///
/// Picks one of the five matcher shapes and derives it from `value` by
/// splitting it at a random point.
pub fn segment_pattern_for(value: String) -> impl Strategy<Value = String> {
    let len = value.len();
    (0usize..5, 0..=len).prop_map(move |(shape, at)| {
        let (head, tail) = value.split_at(at);
        match shape {
            0 => "*".to_string(),
            1 => value.clone(),
            2 => format!("{head}*"),
            3 => format!("*{tail}"),
            _ => format!("{head}*{tail}"),
        }
    })
}

/// Generate a pattern guaranteed to match `permission`, segment by segment.
pub fn pattern_for(segments: Vec<String>) -> BoxedStrategy<String> {
    segments
        .into_iter()
        .map(|s| segment_pattern_for(s).boxed())
        .collect::<Vec<_>>()
        .prop_map(|parts| parts.join("."))
        .boxed()
}

/// Parameters for a permission paired with a pattern that matches it.
#[derive(Debug, Clone)]
pub struct MatchingPair {
    pub permission: String,
    pub pattern: String,
}

impl Arbitrary for MatchingPair {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        permission_segments()
            .prop_flat_map(|segments| {
                let permission = segments.join(".");
                pattern_for(segments).prop_map(move |pattern| MatchingPair {
                    permission: permission.clone(),
                    pattern,
                })
            })
            .boxed()
    }
}

/// Generate a list of raw grants mixing allow and deny rules.
pub fn grants(max: usize) -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(
        (any::<bool>(), permission_segments()).prop_flat_map(|(deny, segments)| {
            pattern_for(segments).prop_map(move |p| if deny { format!("-{p}") } else { p })
        }),
        0..=max,
    )
}
