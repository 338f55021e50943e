//! Immutable registry snapshot.
//!
//! A snapshot is built once from a [`RegistryDocument`] and never mutated.
//! Refreshing the registry swaps in a whole new snapshot.

use actgate_types::{TrustDomain, TrustLevel};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Wire format of the trust registry.
///
/// ```json
/// {
///   "actions":       [{ "host": "dial.to", "state": "trusted" }],
///   "websites":      [{ "host": "x.com", "state": "trusted" }],
///   "interstitials": [{ "host": "evil.example", "state": "malicious" }]
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryDocument {
    #[serde(default)]
    pub actions: Vec<RegistryEntry>,
    #[serde(default)]
    pub websites: Vec<RegistryEntry>,
    #[serde(default)]
    pub interstitials: Vec<RegistryEntry>,
}

impl RegistryDocument {
    /// Returns the entries of `domain`.
    #[must_use]
    pub fn entries(&self, domain: TrustDomain) -> &[RegistryEntry] {
        match domain {
            TrustDomain::Actions => &self.actions,
            TrustDomain::Websites => &self.websites,
            TrustDomain::Interstitials => &self.interstitials,
        }
    }

    /// Builder-style helper, mostly for tests and static registries.
    #[must_use]
    pub fn with(mut self, domain: TrustDomain, host: &str, state: TrustLevel) -> Self {
        let entry = RegistryEntry {
            host: host.to_string(),
            state,
        };
        match domain {
            TrustDomain::Actions => self.actions.push(entry),
            TrustDomain::Websites => self.websites.push(entry),
            TrustDomain::Interstitials => self.interstitials.push(entry),
        }
        self
    }
}

/// One classified host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryEntry {
    pub host: String,
    pub state: TrustLevel,
}

/// Indexed, read-only view of one registry document.
#[derive(Debug, Clone, Default)]
pub struct RegistrySnapshot {
    tables: HashMap<TrustDomain, HashMap<String, TrustLevel>>,
}

impl RegistrySnapshot {
    /// An empty snapshot: every lookup answers `unknown`.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Indexes `document` by canonical host.
    ///
    /// When a host appears more than once in a table, the most
    /// restrictive state wins.
    #[must_use]
    pub fn from_document(document: &RegistryDocument) -> Self {
        let mut tables = HashMap::new();
        for domain in TrustDomain::ALL {
            let mut table: HashMap<String, TrustLevel> = HashMap::new();
            for entry in document.entries(domain) {
                let key = canonical_identifier(&entry.host);
                let level = table
                    .get(&key)
                    .map_or(entry.state, |existing| {
                        actgate_security::merge(*existing, Some(entry.state))
                    });
                table.insert(key, level);
            }
            tables.insert(domain, table);
        }
        Self { tables }
    }

    /// Classifies `identifier` in `domain`; unrecognized identifiers are `unknown`.
    #[must_use]
    pub fn classify(&self, domain: TrustDomain, identifier: &str) -> TrustLevel {
        self.tables
            .get(&domain)
            .and_then(|table| table.get(&canonical_identifier(identifier)))
            .copied()
            .unwrap_or(TrustLevel::Unknown)
    }

    /// Total number of classified hosts across all domains.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tables.values().map(HashMap::len).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Reduces a URL or bare host to the registry key.
///
/// URLs are keyed by `host[:port]`, lowercased. Anything that does not
/// parse as an absolute URL (a bare host such as `dial.to`) is trimmed,
/// lowercased and stripped of trailing slashes.
#[must_use]
pub fn canonical_identifier(identifier: &str) -> String {
    let raw = identifier.trim();
    if let Ok(parsed) = url::Url::parse(raw) {
        if let Some(host) = parsed.host_str() {
            return match parsed.port() {
                Some(port) => format!("{}:{port}", host.to_ascii_lowercase()),
                None => host.to_ascii_lowercase(),
            };
        }
    }
    raw.trim_end_matches('/').to_ascii_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn document() -> RegistryDocument {
        RegistryDocument::default()
            .with(TrustDomain::Actions, "dial.to", TrustLevel::Trusted)
            .with(TrustDomain::Actions, "drainer.example", TrustLevel::Malicious)
            .with(TrustDomain::Websites, "X.com", TrustLevel::Trusted)
            .with(TrustDomain::Interstitials, "wrap.example:8443", TrustLevel::Trusted)
    }

    #[test]
    fn canonical_identifier_forms() {
        assert_eq!(canonical_identifier("https://Dial.To/api/donate?x=1"), "dial.to");
        assert_eq!(canonical_identifier("dial.to/"), "dial.to");
        assert_eq!(canonical_identifier("  DIAL.TO "), "dial.to");
        assert_eq!(canonical_identifier("https://wrap.example:8443/?a=b"), "wrap.example:8443");
    }

    #[test]
    fn classify_by_host_within_domain() {
        let snap = RegistrySnapshot::from_document(&document());
        assert_eq!(
            snap.classify(TrustDomain::Actions, "https://dial.to/api/donate"),
            TrustLevel::Trusted
        );
        assert_eq!(
            snap.classify(TrustDomain::Actions, "https://drainer.example/claim"),
            TrustLevel::Malicious
        );
        assert_eq!(
            snap.classify(TrustDomain::Websites, "https://x.com/someone/status/1"),
            TrustLevel::Trusted
        );
        assert_eq!(
            snap.classify(TrustDomain::Interstitials, "https://wrap.example:8443/?action=z"),
            TrustLevel::Trusted
        );
    }

    #[test]
    fn domains_are_separate_tables() {
        let snap = RegistrySnapshot::from_document(&document());
        assert_eq!(snap.classify(TrustDomain::Websites, "https://dial.to/"), TrustLevel::Unknown);
    }

    #[test]
    fn unrecognized_is_unknown() {
        let snap = RegistrySnapshot::from_document(&document());
        assert_eq!(snap.classify(TrustDomain::Actions, "https://new.example/"), TrustLevel::Unknown);
        assert_eq!(RegistrySnapshot::empty().classify(TrustDomain::Actions, "dial.to"), TrustLevel::Unknown);
    }

    #[test]
    fn duplicate_hosts_keep_most_restrictive() {
        let doc = RegistryDocument::default()
            .with(TrustDomain::Actions, "twice.example", TrustLevel::Malicious)
            .with(TrustDomain::Actions, "twice.example", TrustLevel::Trusted);
        let snap = RegistrySnapshot::from_document(&doc);
        assert_eq!(snap.classify(TrustDomain::Actions, "twice.example"), TrustLevel::Malicious);
        assert_eq!(snap.len(), 1);
    }

    #[test]
    fn document_parses_with_missing_tables() {
        let doc: RegistryDocument =
            serde_json::from_str(r#"{"actions":[{"host":"dial.to","state":"trusted"}]}"#).unwrap();
        assert_eq!(doc.actions.len(), 1);
        assert!(doc.websites.is_empty());
        assert!(doc.interstitials.is_empty());
    }
}
