//! Canonicalization of organization names into index keys.

use regex::Regex;

use crate::resolver::error::ResolverResult;

/// Legal-entity suffix tokens dropped during normalization. Matched as
/// whole words only: "ECOLTD" keeps its "LTD".
const LEGAL_SUFFIX_PATTERN: &str = r"\b(LLC|INC|LTD|CO|CORP|CORPORATION|LIMITED)\b";

/// Collapses free-form organization names into canonical index keys.
///
/// The same function keyed the pre-built dataset, so the step order is
/// load-bearing and must not change.
pub struct NameNormalizer {
    suffixes: Regex,
}

impl NameNormalizer {
    /// Create a normalizer with the suffix pattern compiled.
    ///
    /// # Errors
    /// Returns an error if the suffix pattern fails to compile.
    pub fn new() -> ResolverResult<Self> {
        Ok(Self {
            suffixes: Regex::new(LEGAL_SUFFIX_PATTERN)?,
        })
    }

    /// Collapse a raw name into its canonical key.
    ///
    /// Steps, in order: uppercase, drop standalone legal-entity suffix
    /// tokens, replace every character outside `[A-Z0-9 ]` with a space,
    /// collapse whitespace runs, trim. Idempotent. The result may be
    /// empty; an empty key is "no usable name", not a lookup key.
    #[must_use]
    pub fn normalize(&self, raw: &str) -> String {
        let upper = raw.to_uppercase();
        let stripped = self.suffixes.replace_all(&upper, "");
        let spaced: String = stripped
            .chars()
            .map(|c| {
                if c.is_ascii_uppercase() || c.is_ascii_digit() || c == ' ' {
                    c
                } else {
                    ' '
                }
            })
            .collect();
        spaced.split_whitespace().collect::<Vec<_>>().join(" ")
    }
}
