// src/analyze/mod.rs
//! Synchronous pipeline stages: filter, dedupe, score, rank.
//! Everything here is pure apart from `tracing` output.

pub mod dedup;
pub mod filter;
pub mod rerank;
pub mod rules;
pub mod scoring;

// Re-export convenient types.
pub use crate::analyze::dedup::{deduplicate, title_similarity, DUPLICATE_THRESHOLD};
pub use crate::analyze::filter::{clean_excerpt, filter_item, ContentFilter, Rejection};
pub use crate::analyze::rerank::{ensure_source_diversity, sort_by_composite, sort_by_credibility};
pub use crate::analyze::rules::{HeadlineRule, RuleSet};
pub use crate::analyze::scoring::{composite_score, credibility_score, recency_factor};
