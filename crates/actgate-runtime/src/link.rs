//! Discovered action links.
//!
//! Discovery itself (watching a page, expanding short links, decoding
//! interstitials) happens outside this crate. What arrives here is the
//! already-decoded action URL plus, when the link was embedded somewhere,
//! the page or wrapper it was found in.

use crate::registry::TrustLookup;
use actgate_security::{OriginTrust, TrustAssessment};
use actgate_types::TrustDomain;
use serde::{Deserialize, Serialize};

/// Where an action link was found.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkOrigin {
    /// `websites` or `interstitials`; selects both the registry table and the policy.
    pub domain: TrustDomain,
    pub url: String,
}

/// An action link handed over by the discovery layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscoveredLink {
    pub action_url: String,
    pub origin: Option<LinkOrigin>,
}

impl DiscoveredLink {
    /// A direct reference to an action endpoint.
    #[must_use]
    pub fn direct(action_url: impl Into<String>) -> Self {
        Self {
            action_url: action_url.into(),
            origin: None,
        }
    }

    /// An action mapped from a page of a known action-bearing website.
    #[must_use]
    pub fn from_website(action_url: impl Into<String>, page_url: impl Into<String>) -> Self {
        Self::with_origin(action_url, TrustDomain::Websites, page_url)
    }

    /// An action unwrapped from an interstitial URL.
    #[must_use]
    pub fn from_interstitial(action_url: impl Into<String>, wrapper_url: impl Into<String>) -> Self {
        Self::with_origin(action_url, TrustDomain::Interstitials, wrapper_url)
    }

    fn with_origin(action_url: impl Into<String>, domain: TrustDomain, url: impl Into<String>) -> Self {
        Self {
            action_url: action_url.into(),
            origin: Some(LinkOrigin {
                domain,
                url: url.into(),
            }),
        }
    }

    /// The URL the user actually saw.
    #[must_use]
    pub fn original_url(&self) -> &str {
        self.origin.as_ref().map_or(&self.action_url, |o| &o.url)
    }

    /// Classifies the action and its origin against the current registry data.
    #[must_use]
    pub fn assess(&self, lookup: &dyn TrustLookup) -> TrustAssessment {
        let action = lookup.classify(TrustDomain::Actions, &self.action_url);
        let origin = self
            .origin
            .as_ref()
            .map(|o| OriginTrust::new(o.domain, lookup.classify(o.domain, &o.url)));
        TrustAssessment::new(action, origin)
    }
}
