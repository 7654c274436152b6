//! Candidate selection over host-extracted page signals.
//!
//! The host hands over the raw strings it pulled from a page (site
//! metadata, document title, prominent headings); this module cleans
//! them and picks the most brand-like candidate to feed the resolver.
//! Walking the page itself stays with the host.

use std::collections::HashSet;

/// Headings longer than this are unlikely to be an organization name.
const MAX_HEADING_CHARS: usize = 60;

/// Raw page signals extracted by the host, in signal-priority order.
#[derive(Clone, Debug, Default)]
pub struct PageSignals {
    /// `og:site_name` metadata value.
    pub site_name: Option<String>,
    /// `og:title` metadata value.
    pub open_graph_title: Option<String>,
    /// `application-name` metadata value.
    pub application_name: Option<String>,
    /// Document title.
    pub document_title: Option<String>,
    /// Prominent heading texts, in document order.
    pub headings: Vec<String>,
}

impl PageSignals {
    /// Cleaned candidates in signal-priority order. Headings that stay
    /// longer than `MAX_HEADING_CHARS` after cleanup are dropped.
    #[must_use]
    pub fn candidates(&self) -> Vec<String> {
        let mut candidates = Vec::new();
        for value in [
            &self.site_name,
            &self.open_graph_title,
            &self.application_name,
            &self.document_title,
        ]
        .into_iter()
        .flatten()
        {
            let candidate = clean_candidate(value);
            if !candidate.is_empty() {
                candidates.push(candidate);
            }
        }

        for heading in &self.headings {
            let candidate = clean_candidate(heading);
            if !candidate.is_empty() && candidate.chars().count() <= MAX_HEADING_CHARS {
                candidates.push(candidate);
            }
        }

        candidates
    }

    /// The most brand-like candidate across all signals.
    #[must_use]
    pub fn best_candidate(&self) -> Option<String> {
        pick_best(self.candidates())
    }
}

/// Clean one raw page signal: collapse whitespace, cut everything from
/// the first `|`, cut a trailing `- ...` clause, trim.
///
/// Page titles routinely carry site-name tails ("Careers | Acme" or
/// "Acme - Open Roles"); the cuts keep the brand part.
#[must_use]
pub fn clean_candidate(value: &str) -> String {
    let collapsed = value.split_whitespace().collect::<Vec<_>>().join(" ");
    let cut = cut_dash_tail(cut_pipe_tail(&collapsed));
    cut.trim().to_string()
}

/// Pick the most brand-like candidate from cleaned signals: first-seen
/// deduplication, then the shortest string wins (earlier signals win
/// length ties).
#[must_use]
pub fn pick_best(candidates: Vec<String>) -> Option<String> {
    let mut seen = HashSet::new();
    let mut unique: Vec<String> = candidates
        .into_iter()
        .filter(|candidate| seen.insert(candidate.clone()))
        .collect();
    unique.sort_by_key(|candidate| candidate.chars().count());
    unique.into_iter().next()
}

/// Cut from the first `|` to the end, when anything follows it.
fn cut_pipe_tail(value: &str) -> &str {
    match value.find('|') {
        Some(idx) if idx + 1 < value.len() => &value[..idx],
        _ => value,
    }
}

/// Cut from the first `-` that is followed by whitespace and more text.
/// Hyphenated names ("Acme-Soft") stay intact.
fn cut_dash_tail(value: &str) -> &str {
    let mut search_from = 0;
    while let Some(offset) = value[search_from..].find('-') {
        let idx = search_from + offset;
        let rest = &value[idx + 1..];
        let after_space = rest.trim_start();
        if after_space.len() < rest.len() && !after_space.is_empty() {
            return &value[..idx];
        }
        search_from = idx + 1;
    }
    value
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_collapses_whitespace() {
        assert_eq!(clean_candidate("  Acme \t  Widgets \n"), "Acme Widgets");
    }

    #[test]
    fn test_clean_cuts_pipe_tail() {
        assert_eq!(clean_candidate("Acme | Careers"), "Acme");
        assert_eq!(clean_candidate("Acme |"), "Acme |");
    }

    #[test]
    fn test_clean_cuts_dash_tail() {
        assert_eq!(clean_candidate("Acme - Open Roles"), "Acme");
        assert_eq!(clean_candidate("Acme-Soft"), "Acme-Soft");
        assert_eq!(clean_candidate("Acme-Soft - Careers"), "Acme-Soft");
    }

    #[test]
    fn test_clean_empty_input() {
        assert_eq!(clean_candidate("   "), "");
    }

    #[test]
    fn test_pick_best_prefers_shortest() {
        let best = pick_best(vec![
            "Acme Widgets International".to_string(),
            "Acme".to_string(),
            "Acme Widgets".to_string(),
        ]);
        assert_eq!(best.as_deref(), Some("Acme"));
    }

    #[test]
    fn test_pick_best_deduplicates_and_stays_stable() {
        let best = pick_best(vec![
            "Acme".to_string(),
            "Acme".to_string(),
            "Brio".to_string(),
        ]);
        assert_eq!(best.as_deref(), Some("Acme"));
        assert_eq!(pick_best(Vec::new()), None);
    }

    #[test]
    fn test_signals_priority_and_heading_cap() {
        let signals = PageSignals {
            site_name: Some("Acme | Careers".to_string()),
            open_graph_title: Some("Senior Engineer at Acme".to_string()),
            application_name: None,
            document_title: Some("Acme - Job Board".to_string()),
            headings: vec![
                "A very long heading that keeps going well past the length cap for organization names".to_string(),
                "Acme".to_string(),
            ],
        };

        let candidates = signals.candidates();
        assert_eq!(candidates.first().map(String::as_str), Some("Acme"));
        assert_eq!(candidates.len(), 4);
        assert!(candidates.iter().all(|c| c.chars().count() <= MAX_HEADING_CHARS));
        assert_eq!(signals.best_candidate().as_deref(), Some("Acme"));
    }
}
