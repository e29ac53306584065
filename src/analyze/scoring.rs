//! Scoring helpers for ranking.
//!
//! - `credibility_score`: derived solely from the source tier (1→100, 2→75, 3→50)
//! - `recency_factor`: linear decay from 1.0 (just published) to 0.0 at 48h,
//!   deliberately not clamped
//! - `composite_score`: 80% recency + 20% credibility, used for the top section

use chrono::{DateTime, Utc};

use crate::article::Article;
use crate::sources::CredibilityTier;

pub const RECENCY_WEIGHT: f64 = 0.8;
pub const CREDIBILITY_WEIGHT: f64 = 0.2;
const DECAY_HOURS: f64 = 48.0;

pub fn credibility_score(tier: CredibilityTier) -> u32 {
    match tier.get() {
        1 => 100,
        2 => 75,
        _ => 50,
    }
}

/// `1 - age_hours / 48`. Negative past the window, above 1.0 for future dates.
pub fn recency_factor(published: DateTime<Utc>, now: DateTime<Utc>) -> f64 {
    let age_ms = now.signed_duration_since(published).num_milliseconds() as f64;
    let age_hours = age_ms / 3_600_000.0;
    1.0 - age_hours / DECAY_HOURS
}

pub fn composite_score(article: &Article, now: DateTime<Utc>) -> f64 {
    recency_factor(article.pub_date, now) * RECENCY_WEIGHT
        + (article.credibility_score as f64 / 100.0) * CREDIBILITY_WEIGHT
}
