//! Core types for the sponsorship index.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::resolver::error::{ErrorKind, ResolverError, ResolverResult};

/// One sponsoring organization entry as stored in the dataset.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct SponsorshipRecord {
    /// Original display name, when the dataset carries one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    /// Job roles the organization has sponsored. May be empty.
    #[serde(default)]
    pub roles: Vec<String>,
}

/// Immutable mapping from canonical key to sponsorship record.
///
/// Built atomically from one fetch and never mutated afterwards; a refresh
/// produces a whole new snapshot. Duplicate keys in the source payload
/// resolve last-write-wins.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IndexSnapshot {
    entries: HashMap<String, SponsorshipRecord>,
}

impl IndexSnapshot {
    /// Parse a snapshot from a JSON payload.
    ///
    /// # Errors
    /// Returns `MalformedDataset` if the payload does not match the
    /// key-to-record schema.
    pub fn parse(payload: &str) -> ResolverResult<Self> {
        serde_json::from_str(payload).map_err(|e| ResolverError::MalformedDataset(e.to_string()))
    }

    /// Build a snapshot from key/record pairs.
    #[must_use]
    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (String, SponsorshipRecord)>,
    {
        Self {
            entries: entries.into_iter().collect(),
        }
    }

    /// Look up a record by canonical key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&SponsorshipRecord> {
        self.entries.get(key)
    }

    /// Iterate over all key/record pairs. Order is unspecified.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &SponsorshipRecord)> {
        self.entries.iter().map(|(key, record)| (key.as_str(), record))
    }

    /// Number of records in the snapshot.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the snapshot holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A resolved match: canonical key plus the record it mapped to.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct ResolvedMatch {
    /// Canonical key the record is stored under.
    pub key: String,
    /// Display name, when present in the dataset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    /// Sponsored roles.
    #[serde(default)]
    pub roles: Vec<String>,
}

impl ResolvedMatch {
    /// Combine a stored key with its record.
    #[must_use]
    pub fn from_record(key: impl Into<String>, record: &SponsorshipRecord) -> Self {
        Self {
            key: key.into(),
            company: record.company.clone(),
            roles: record.roles.clone(),
        }
    }
}

/// Transport-agnostic reply for a lookup request.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LookupResponse {
    /// The lookup ran; `record` is present when a match was found.
    Resolved {
        /// Whether a record matched the queried name.
        matched: bool,
        /// The matched record, if any.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        record: Option<ResolvedMatch>,
    },
    /// The lookup failed with no usable snapshot.
    Failed {
        /// Failure classification.
        error: ErrorKind,
    },
}

impl LookupResponse {
    /// Build a reply from a resolution outcome.
    #[must_use]
    pub fn from_outcome(outcome: ResolverResult<Option<ResolvedMatch>>) -> Self {
        match outcome {
            Ok(record) => Self::Resolved {
                matched: record.is_some(),
                record,
            },
            Err(err) => Self::Failed { error: err.kind() },
        }
    }
}
