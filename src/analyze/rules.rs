//! Headline classification rules.
//!
//! A `RuleSet` is an ordered list of named predicates over a headline. Rules
//! are plain case-insensitive regexes; the first matching rule wins and its
//! name is reported back so rejections can be logged and counted per rule.
//!
//! Two built-in sets exist:
//! - `red_flag_rules()`: clickbait / sensationalism
//! - `non_news_rules()`: broadcast-schedule and show-name artifacts

use once_cell::sync::Lazy;
use regex::Regex;

#[derive(Debug, Clone)]
pub struct HeadlineRule {
    pub name: String,
    pattern: Regex,
}

impl HeadlineRule {
    /// Compile a rule. The pattern is matched case-insensitively.
    pub fn new(name: &str, pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            name: name.to_string(),
            pattern: Regex::new(&format!("(?i){pattern}"))?,
        })
    }

    pub fn matches(&self, title: &str) -> bool {
        self.pattern.is_match(title)
    }

    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }
}

#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    rules: Vec<HeadlineRule>,
}

impl RuleSet {
    pub fn new(rules: Vec<HeadlineRule>) -> Self {
        Self { rules }
    }

    /// Name of the first rule matching `title`, evaluated in insertion order.
    pub fn first_match(&self, title: &str) -> Option<&str> {
        self.rules
            .iter()
            .find(|r| r.matches(title))
            .map(|r| r.name.as_str())
    }

    pub fn is_match(&self, title: &str) -> bool {
        self.first_match(title).is_some()
    }

    pub fn push(&mut self, rule: HeadlineRule) {
        self.rules.push(rule);
    }

    /// Drop a rule by name; returns whether anything was removed.
    pub fn remove(&mut self, name: &str) -> bool {
        let before = self.rules.len();
        self.rules.retain(|r| r.name != name);
        before != self.rules.len()
    }

    pub fn names(&self) -> Vec<&str> {
        self.rules.iter().map(|r| r.name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

fn compile(table: &[(&str, &str)]) -> RuleSet {
    RuleSet::new(
        table
            .iter()
            .map(|(name, pat)| HeadlineRule::new(name, pat).expect("built-in headline rule"))
            .collect(),
    )
}

const RED_FLAGS: &[(&str, &str)] = &[
    ("you_wont_believe", r"you won['’]t believe"),
    ("shocking", r"shocking"),
    ("numbered_reasons", r"\d+ reasons"),
    ("what_happens_next", r"what happens next"),
    ("gone_wrong", r"gone wrong"),
    ("video_tag", r"\[video\]"),
    ("photos_tag", r"\[photos\]"),
    ("click_here", r"click here"),
];

const NON_NEWS: &[(&str, &str)] = &[
    ("newscast_prefix", r"^newscast for"),
    ("newscast_weekday", r"newscast for \w+day"),
    ("action_news_at", r"^action news at"),
    ("good_morning", r"^good morning"),
    ("live_at_time", r"^live at \d"),
    ("show_name", r"^(?:the source|merv)$"),
    ("eyewitness_news", r"^eyewitness news"),
    ("generic_show", r"^\w+ news$"),
    ("clock_suffix", r"- \d+:\d+ [ap]\.?m\.?$"),
    (
        "embedded_date",
        r"(?:january|february|march|april|may|june|july|august|september|october|november|december) \d{1,2}, \d{4}",
    ),
];

static RED_FLAG_RULES: Lazy<RuleSet> = Lazy::new(|| compile(RED_FLAGS));
static NON_NEWS_RULES: Lazy<RuleSet> = Lazy::new(|| compile(NON_NEWS));

/// Sensationalism patterns.
pub fn red_flag_rules() -> &'static RuleSet {
    &RED_FLAG_RULES
}

/// Broadcast schedules, show names and other non-article entries.
pub fn non_news_rules() -> &'static RuleSet {
    &NON_NEWS_RULES
}
