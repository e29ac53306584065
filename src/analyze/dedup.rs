//! Near-duplicate story detection across sources.
//!
//! Headlines are compared pairwise with Jaccard similarity over their sets of
//! normalized words. A pair at or above `DUPLICATE_THRESHOLD` is a duplicate;
//! the article with the lower credibility score is eliminated, ties keep the
//! one seen first.
//!
//! The pass is greedy and order-sensitive: an eliminated article is skipped
//! in every later comparison, and no transitive clustering is computed. If
//! A~B and B~C but not A~C, the outcome depends on input order. The input
//! order is the fetch order, i.e. source-registry order. Kept as-is; callers
//! who need deterministic clusters must canonicalize the order first.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

use crate::article::Article;

pub const DUPLICATE_THRESHOLD: f64 = 0.6;

static RE_NON_WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\w\s]").expect("non-word regex"));
static RE_WS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("whitespace regex"));

/// Lowercase, drop everything that is neither a word char nor whitespace,
/// collapse whitespace runs.
pub fn normalize_title(title: &str) -> String {
    let lower = title.to_lowercase();
    let stripped = RE_NON_WORD.replace_all(&lower, "");
    RE_WS.replace_all(&stripped, " ").trim().to_string()
}

fn word_set(title: &str) -> HashSet<String> {
    normalize_title(title)
        .split(' ')
        .filter(|w| !w.is_empty())
        .map(str::to_string)
        .collect()
}

/// Jaccard similarity of the two headlines' word sets, in [0.0, 1.0].
/// Two headlines with no words at all are identical (1.0).
pub fn title_similarity(a: &str, b: &str) -> f64 {
    jaccard(&word_set(a), &word_set(b))
}

pub fn is_duplicate(a: &Article, b: &Article) -> bool {
    title_similarity(&a.title, &b.title) >= DUPLICATE_THRESHOLD
}

/// Keep one article per near-duplicate pair, preferring higher credibility.
/// Survivors keep their input order.
pub fn deduplicate(articles: Vec<Article>) -> Vec<Article> {
    let n = articles.len();
    let words: Vec<HashSet<String>> = articles.iter().map(|a| word_set(&a.title)).collect();
    let mut eliminated = vec![false; n];

    for i in 0..n {
        if eliminated[i] {
            continue;
        }
        for j in (i + 1)..n {
            if eliminated[j] {
                continue;
            }
            if jaccard(&words[i], &words[j]) >= DUPLICATE_THRESHOLD {
                if articles[i].credibility_score >= articles[j].credibility_score {
                    eliminated[j] = true;
                } else {
                    eliminated[i] = true;
                    break;
                }
            }
        }
    }

    let removed = eliminated.iter().filter(|&&e| e).count();
    if removed > 0 {
        tracing::debug!(target: "aggregate", removed, "near-duplicates eliminated");
    }

    articles
        .into_iter()
        .zip(eliminated)
        .filter_map(|(a, gone)| (!gone).then_some(a))
        .collect()
}

fn jaccard(a: &HashSet<String>, b: &HashSet<String>) -> f64 {
    let union = a.union(b).count();
    if union == 0 {
        return 1.0;
    }
    a.intersection(b).count() as f64 / union as f64
}
