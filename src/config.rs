// src/config.rs
use anyhow::{anyhow, bail, Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::sources::{FeedSource, SourceRegistry};

pub const ENV_SOURCES_PATH: &str = "NEWS_SOURCES_PATH";
pub const ENV_FETCH_TIMEOUT_SECS: &str = "NEWS_FETCH_TIMEOUT_SECS";
pub const ENV_REVALIDATE_SECS: &str = "NEWS_REVALIDATE_SECS";
pub const ENV_USER_AGENT: &str = "NEWS_USER_AGENT";

pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 10;
/// Hourly, same cadence as the page revalidation it feeds.
pub const DEFAULT_REVALIDATE_SECS: u64 = 3600;

/// Runtime knobs read from the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregatorConfig {
    /// Deadline for one source's fetch + parse.
    pub fetch_timeout: Duration,
    /// How long a built result is served before the next run.
    pub revalidate: Duration,
    pub user_agent: String,
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        Self {
            fetch_timeout: Duration::from_secs(DEFAULT_FETCH_TIMEOUT_SECS),
            revalidate: Duration::from_secs(DEFAULT_REVALIDATE_SECS),
            user_agent: default_user_agent(),
        }
    }
}

impl AggregatorConfig {
    pub fn from_env() -> Self {
        let d = Self::default();
        Self {
            fetch_timeout: Duration::from_secs(parse_secs_env(
                ENV_FETCH_TIMEOUT_SECS,
                std::env::var(ENV_FETCH_TIMEOUT_SECS).ok(),
                DEFAULT_FETCH_TIMEOUT_SECS,
            )),
            revalidate: Duration::from_secs(parse_secs_env(
                ENV_REVALIDATE_SECS,
                std::env::var(ENV_REVALIDATE_SECS).ok(),
                DEFAULT_REVALIDATE_SECS,
            )),
            user_agent: std::env::var(ENV_USER_AGENT)
                .ok()
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .unwrap_or(d.user_agent),
        }
    }
}

fn default_user_agent() -> String {
    format!("metro-headlines/{}", env!("CARGO_PKG_VERSION"))
}

// Zero is rejected too: a zero deadline would drop every source.
fn parse_secs_env(name: &str, raw: Option<String>, default: u64) -> u64 {
    let Some(raw) = raw else {
        return default;
    };
    match raw.trim().parse::<u64>() {
        Ok(v) if v > 0 => v,
        _ => {
            tracing::warn!(env = name, value = %raw, default, "invalid duration, using default");
            default
        }
    }
}

/// Load the source registry from an explicit path. Supports TOML or JSON formats.
pub fn load_registry_from(path: &Path) -> Result<SourceRegistry> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("reading source registry from {}", path.display()))?;
    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase();
    parse_registry(&content, ext.as_str())
        .with_context(|| format!("parsing source registry {}", path.display()))
}

/// Load the source registry using env var + fallbacks:
/// 1) $NEWS_SOURCES_PATH
/// 2) config/sources.toml
/// 3) config/sources.json
/// 4) built-in seed
pub fn load_registry_default() -> Result<SourceRegistry> {
    if let Ok(p) = std::env::var(ENV_SOURCES_PATH) {
        let pb = PathBuf::from(p);
        if pb.exists() {
            return load_registry_from(&pb);
        } else {
            return Err(anyhow!("NEWS_SOURCES_PATH points to non-existent path"));
        }
    }
    let toml_p = PathBuf::from("config/sources.toml");
    if toml_p.exists() {
        return load_registry_from(&toml_p);
    }
    let json_p = PathBuf::from("config/sources.json");
    if json_p.exists() {
        return load_registry_from(&json_p);
    }
    Ok(SourceRegistry::default_seed())
}

fn parse_registry(s: &str, hint_ext: &str) -> Result<SourceRegistry> {
    // Try TOML first if hinted or content looks like toml.
    let try_toml = hint_ext == "toml" || s.contains("[[sources]]");
    if try_toml {
        if let Ok(v) = parse_toml(s) {
            return validate(v);
        }
    }
    if let Ok(v) = parse_json(s) {
        return validate(v);
    }
    if !try_toml {
        if let Ok(v) = parse_toml(s) {
            return validate(v);
        }
    }
    Err(anyhow!("unsupported source registry format"))
}

fn parse_toml(s: &str) -> Result<Vec<FeedSource>> {
    let v: SourceRegistry = toml::from_str(s)?;
    Ok(v.sources)
}

fn parse_json(s: &str) -> Result<Vec<FeedSource>> {
    #[derive(serde::Deserialize)]
    #[serde(untagged)]
    enum JsonRegistry {
        List(Vec<FeedSource>),
        Table(SourceRegistry),
    }
    let v: JsonRegistry = serde_json::from_str(s)?;
    Ok(match v {
        JsonRegistry::List(l) => l,
        JsonRegistry::Table(t) => t.sources,
    })
}

fn validate(items: Vec<FeedSource>) -> Result<SourceRegistry> {
    let mut out = Vec::with_capacity(items.len());
    for (i, mut it) in items.into_iter().enumerate() {
        it.name = it.name.trim().to_string();
        it.url = it.url.trim().to_string();
        if it.name.is_empty() {
            bail!("source #{i} has an empty name");
        }
        if it.url.is_empty() {
            bail!("source #{i} ({}) has an empty url", it.name);
        }
        out.push(it);
    }
    Ok(SourceRegistry::new(out))
}
