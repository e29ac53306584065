//! # Source Registry
//!
//! Static list of feed endpoints, each tagged with a display name, a
//! category and a credibility tier (1 = highest trust).
//!
//! - Loaded once at startup (see `config::load_registry_default`).
//! - Falls back to a built-in `default_seed()` with the Philadelphia outlets.
//! - Order matters: the deduplicator resolves ties in favour of the source
//!   that appears earlier in the registry.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::article::Category;

/// Ordinal trust level, 1..=3.
///
/// - Tier 1: established outlets with strong editorial standards
/// - Tier 2: digital-native local publications with good track records
/// - Tier 3: aggregators (broad coverage, claims need verification)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct CredibilityTier(u8);

impl CredibilityTier {
    pub const PRIMARY: CredibilityTier = CredibilityTier(1);
    pub const DIGITAL: CredibilityTier = CredibilityTier(2);
    pub const AGGREGATOR: CredibilityTier = CredibilityTier(3);

    pub fn get(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for CredibilityTier {
    type Error = String;

    fn try_from(v: u8) -> Result<Self, Self::Error> {
        match v {
            1..=3 => Ok(Self(v)),
            other => Err(format!("credibility tier must be 1, 2 or 3 (got {other})")),
        }
    }
}

impl From<CredibilityTier> for u8 {
    fn from(t: CredibilityTier) -> u8 {
        t.0
    }
}

impl fmt::Display for CredibilityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tier {}", self.0)
    }
}

/// One configured feed endpoint. Never mutated after startup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedSource {
    pub url: String,
    pub name: String,
    pub category: Category,
    pub tier: CredibilityTier,
}

impl FeedSource {
    pub fn new(url: &str, name: &str, category: Category, tier: CredibilityTier) -> Self {
        Self {
            url: url.to_string(),
            name: name.to_string(),
            category,
            tier,
        }
    }
}

/// Ordered, immutable set of feed sources.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceRegistry {
    #[serde(default)]
    pub sources: Vec<FeedSource>,
}

impl SourceRegistry {
    pub fn new(sources: Vec<FeedSource>) -> Self {
        Self { sources }
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FeedSource> {
        self.sources.iter()
    }

    /// Built-in registry of Philadelphia news sources.
    /// Used when no registry file is configured.
    pub fn default_seed() -> Self {
        use Category::{Local, Top};
        let (t1, t2, t3) = (
            CredibilityTier::PRIMARY,
            CredibilityTier::DIGITAL,
            CredibilityTier::AGGREGATOR,
        );

        let sources = [
            // Primary sources: original reporting
            ("https://www.nbcphiladelphia.com/feed/", "NBC10", Top, t1),
            ("https://6abc.com/feed/", "6ABC", Top, t1),
            ("https://whyy.org/feed/", "WHYY", Top, t1),
            // Digital-native local publications
            ("https://billypenn.com/feed/", "Billy Penn", Local, t2),
            ("https://www.phillyvoice.com/feed/", "PhillyVoice", Local, t2),
            (
                "https://www.phillytrib.com/search/?f=rss&t=article&c=news&l=50&s=start_time&sd=desc",
                "Philadelphia Tribune",
                Local,
                t2,
            ),
            (
                "https://thephiladelphiacitizen.org/feed/",
                "The Philadelphia Citizen",
                Local,
                t2,
            ),
            // Aggregators
            (
                "https://news.google.com/rss/search?q=philadelphia+news&hl=en-US&gl=US&ceid=US:en",
                "Google News",
                Top,
                t3,
            ),
            // Breaking news / crime that cycles out of the main feeds quickly
            (
                "https://news.google.com/rss/search?q=philadelphia+shooting+OR+philadelphia+crime&hl=en-US&gl=US&ceid=US:en",
                "Google News",
                Top,
                t3,
            ),
        ]
        .into_iter()
        .map(|(url, name, category, tier)| FeedSource::new(url, name, category, tier))
        .collect();

        Self { sources }
    }
}

impl<'a> IntoIterator for &'a SourceRegistry {
    type Item = &'a FeedSource;
    type IntoIter = std::slice::Iter<'a, FeedSource>;

    fn into_iter(self) -> Self::IntoIter {
        self.sources.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tier_bounds_are_enforced() {
        assert!(CredibilityTier::try_from(0).is_err());
        assert!(CredibilityTier::try_from(4).is_err());
        assert_eq!(CredibilityTier::try_from(2).unwrap(), CredibilityTier::DIGITAL);
    }

    #[test]
    fn tier_deserializes_from_integer() {
        let s: FeedSource = serde_json::from_str(
            r#"{"url":"https://x.test/feed","name":"X","category":"sports","tier":3}"#,
        )
        .unwrap();
        assert_eq!(s.tier, CredibilityTier::AGGREGATOR);
        assert_eq!(s.category, Category::Sports);

        let bad = serde_json::from_str::<FeedSource>(
            r#"{"url":"https://x.test/feed","name":"X","category":"top","tier":5}"#,
        );
        assert!(bad.is_err());
    }

    #[test]
    fn seed_keeps_registry_order_and_shared_aggregator_name() {
        let r = SourceRegistry::default_seed();
        assert_eq!(r.len(), 9);
        assert_eq!(r.sources[0].name, "NBC10");
        let google: Vec<_> = r.iter().filter(|s| s.name == "Google News").collect();
        assert_eq!(google.len(), 2);
        assert!(google.iter().all(|s| s.tier == CredibilityTier::AGGREGATOR));
    }
}
