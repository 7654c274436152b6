//! Exact and prefix matching against an index snapshot.

use crate::resolver::error::ResolverResult;
use crate::resolver::normalizer::NameNormalizer;
use crate::resolver::types::{IndexSnapshot, ResolvedMatch};

/// Resolves raw names against a loaded snapshot.
pub struct Matcher {
    normalizer: NameNormalizer,
}

impl Matcher {
    /// Create a matcher with its normalizer.
    ///
    /// # Errors
    /// Returns an error if the normalizer fails to build.
    pub fn new() -> ResolverResult<Self> {
        Ok(Self {
            normalizer: NameNormalizer::new()?,
        })
    }

    /// Access the underlying normalizer.
    #[must_use]
    pub const fn normalizer(&self) -> &NameNormalizer {
        &self.normalizer
    }

    /// Resolve a raw name to a record in the snapshot.
    ///
    /// An exact key match always wins. When no exact key exists, falls
    /// back to stored keys that start with the query key (a user typing
    /// "ACME" still finds "ACME CONSOLIDATED"); among several candidates
    /// the shortest key wins, with lexicographic order breaking length
    /// ties. Names that are empty or normalize to an empty key resolve
    /// to `None`.
    #[must_use]
    pub fn resolve(&self, snapshot: &IndexSnapshot, raw_name: &str) -> Option<ResolvedMatch> {
        if raw_name.is_empty() {
            return None;
        }
        let key = self.normalizer.normalize(raw_name);
        if key.is_empty() {
            return None;
        }

        if let Some(record) = snapshot.get(&key) {
            return Some(ResolvedMatch::from_record(key, record));
        }

        snapshot
            .entries()
            .filter(|(stored, _)| stored.starts_with(&key))
            .min_by_key(|(stored, _)| (stored.len(), *stored))
            .map(|(stored, record)| ResolvedMatch::from_record(stored, record))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::types::SponsorshipRecord;

    fn matcher() -> Matcher {
        Matcher::new().unwrap_or_else(|_| unreachable!("pattern is valid"))
    }

    fn record(company: &str) -> SponsorshipRecord {
        SponsorshipRecord {
            company: Some(company.to_string()),
            roles: vec!["Engineer".to_string()],
        }
    }

    fn snapshot(keys: &[&str]) -> IndexSnapshot {
        IndexSnapshot::from_entries(
            keys.iter()
                .map(|key| ((*key).to_string(), record(key))),
        )
    }

    #[test]
    fn test_exact_match_beats_prefix_fallback() {
        let snapshot = snapshot(&["ACME", "ACMECORP"]);
        let found = matcher().resolve(&snapshot, "Acme");
        assert_eq!(found.map(|m| m.key), Some("ACME".to_string()));
    }

    #[test]
    fn test_prefix_fallback() {
        let snapshot = snapshot(&["ACMECORPHOLDINGS"]);
        let found = matcher().resolve(&snapshot, "Acme");
        assert_eq!(found.map(|m| m.key), Some("ACMECORPHOLDINGS".to_string()));
    }

    #[test]
    fn test_prefix_tie_break_is_deterministic() {
        let shortest_wins = snapshot(&["ACME GLOBAL HOLDINGS", "ACMEWIDE", "ACMEX"]);
        let found = matcher().resolve(&shortest_wins, "Acme");
        assert_eq!(found.map(|m| m.key), Some("ACMEX".to_string()));

        let lexicographic_on_ties = snapshot(&["ACMEB", "ACMEA"]);
        let found = matcher().resolve(&lexicographic_on_ties, "Acme");
        assert_eq!(found.map(|m| m.key), Some("ACMEA".to_string()));
    }

    #[test]
    fn test_no_match() {
        let snapshot = snapshot(&["OTHERCO"]);
        assert!(matcher().resolve(&snapshot, "Acme").is_none());
    }

    #[test]
    fn test_unusable_names_resolve_to_none() {
        let snapshot = snapshot(&["ACME"]);
        let m = matcher();
        assert!(m.resolve(&snapshot, "").is_none());
        assert!(m.resolve(&snapshot, "  ").is_none());
        assert!(m.resolve(&snapshot, "?!?").is_none());
    }

    #[test]
    fn test_match_carries_record_fields() {
        let snapshot = IndexSnapshot::from_entries([(
            "ACME".to_string(),
            SponsorshipRecord {
                company: Some("Acme, Inc.".to_string()),
                roles: vec!["Engineer".to_string(), "Analyst".to_string()],
            },
        )]);
        let found = matcher().resolve(&snapshot, "acme inc");
        assert_eq!(
            found,
            Some(ResolvedMatch {
                key: "ACME".to_string(),
                company: Some("Acme, Inc.".to_string()),
                roles: vec!["Engineer".to_string(), "Analyst".to_string()],
            })
        );
    }
}
