// src/lowest.rs
//! Worst known rank per category, refreshed from an auxiliary summary service.
//!
//! The ranked population moves slowly compared to how often people ask for
//! "the lowest ranked player", so one summary fetch per interval is plenty.
//! Failed refreshes keep whatever was there before.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex, RwLock},
    time::Duration,
};

use chrono::{DateTime, Utc};

use crate::config::EngineOptions;
use crate::core::net::Transport;
use crate::model::{AccountCategory, LowestRankEntry};

pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Where lowest-rank figures come from.
pub trait LowestRankSource: Send + Sync {
    /// `None` when the summary could not be obtained.
    fn fetch_summary(&self) -> Option<HashMap<AccountCategory, u32>>;
}

/// No summary service configured; every refresh fails and the fallback holds.
pub struct NoSource;

impl LowestRankSource for NoSource {
    fn fetch_summary(&self) -> Option<HashMap<AccountCategory, u32>> {
        None
    }
}

/// GET a JSON object such as `{"normal": 2134567, "iron": 1500311}`.
pub struct HttpLowestRankSource {
    transport: Arc<dyn Transport>,
    url: String,
}

impl HttpLowestRankSource {
    pub fn new(transport: Arc<dyn Transport>, url: impl Into<String>) -> Self {
        Self { transport, url: url.into() }
    }
}

impl LowestRankSource for HttpLowestRankSource {
    fn fetch_summary(&self) -> Option<HashMap<AccountCategory, u32>> {
        let resp = match self.transport.get(&self.url) {
            Ok(r) if r.is_success() => r,
            Ok(r) => {
                log::error!("lowest-rank summary: HTTP {}", r.status);
                return None;
            }
            Err(e) => {
                log::error!("lowest-rank summary: {e}");
                return None;
            }
        };
        match parse_summary(&resp.body) {
            Ok(map) => Some(map),
            Err(e) => {
                log::error!("lowest-rank summary: {e}");
                None
            }
        }
    }
}

/// Unknown keys and non-positive ranks are skipped.
pub fn parse_summary(body: &str) -> Result<HashMap<AccountCategory, u32>, serde_json::Error> {
    let raw: HashMap<String, i64> = serde_json::from_str(body)?;
    let mut out = HashMap::new();
    for (key, rank) in raw {
        let Ok(category) = key.parse::<AccountCategory>() else {
            log::debug!("lowest-rank summary: skipping key {key:?}");
            continue;
        };
        if !category.is_concrete() {
            continue;
        }
        if let Ok(rank) = u32::try_from(rank) {
            if rank > 0 {
                out.insert(category, rank);
            }
        }
    }
    Ok(out)
}

/// What a call to [`LowestRankCache::refresh`] did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Refresh {
    /// Last successful refresh is younger than the interval.
    Skipped,
    Refreshed,
    /// Source failed; previous values kept.
    Failed,
}

pub struct LowestRankCache {
    source: Box<dyn LowestRankSource>,
    clock: Arc<dyn Clock>,
    interval: Duration,
    fallback: u32,
    entries: RwLock<HashMap<AccountCategory, LowestRankEntry>>,
    // Held for the whole refresh: overlapping callers wait, then see it fresh.
    last_refresh: Mutex<Option<DateTime<Utc>>>,
}

impl LowestRankCache {
    pub fn new(
        source: Box<dyn LowestRankSource>,
        clock: Arc<dyn Clock>,
        interval: Duration,
        fallback: u32,
    ) -> Self {
        Self {
            source,
            clock,
            interval,
            fallback,
            entries: RwLock::new(HashMap::new()),
            last_refresh: Mutex::new(None),
        }
    }

    pub fn from_options(opts: &EngineOptions, transport: Arc<dyn Transport>) -> Self {
        let source: Box<dyn LowestRankSource> = match &opts.lowest_rank_url {
            Some(url) => Box::new(HttpLowestRankSource::new(transport, url.clone())),
            None => Box::new(NoSource),
        };
        Self::new(source, Arc::new(SystemClock), opts.refresh_interval(), opts.fallback_lowest_rank)
    }

    /// Worst known rank, or the fallback ceiling when nothing better is known.
    pub fn get_lowest_rank(&self, category: AccountCategory) -> u32 {
        if let Some(e) = self.entry(category) {
            return e.rank;
        }
        let mut map = self.entries.write().unwrap_or_else(|p| p.into_inner());
        map.entry(category)
            .or_insert(LowestRankEntry { category, rank: self.fallback, last_refreshed: None })
            .rank
    }

    pub fn entry(&self, category: AccountCategory) -> Option<LowestRankEntry> {
        let map = self.entries.read().unwrap_or_else(|p| p.into_inner());
        map.get(&category).copied()
    }

    pub fn refresh(&self) -> Refresh {
        let mut last = self.last_refresh.lock().unwrap_or_else(|p| p.into_inner());
        let now = self.clock.now();

        if let Some(prev) = *last {
            let fresh = now
                .signed_duration_since(prev)
                .to_std()
                .map_or(true, |elapsed| elapsed < self.interval);
            if fresh {
                return Refresh::Skipped;
            }
        }

        let Some(summary) = self.source.fetch_summary() else {
            return Refresh::Failed;
        };

        let mut map = self.entries.write().unwrap_or_else(|p| p.into_inner());
        for (category, rank) in summary {
            map.insert(category, LowestRankEntry { category, rank, last_refreshed: Some(now) });
        }
        *last = Some(now);
        log::info!("lowest-rank cache refreshed ({} categories)", map.len());
        Refresh::Refreshed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_skips_junk() {
        let m = parse_summary(r#"{"normal": 2100000, "iron": -1, "wizard": 5, "hcim": 40000, "locate": 9}"#)
            .unwrap();
        assert_eq!(m.len(), 2);
        assert_eq!(m[&AccountCategory::Normal], 2_100_000);
        assert_eq!(m[&AccountCategory::Hardcore], 40_000);
    }

    #[test]
    fn bad_json_is_error() {
        assert!(parse_summary("<html>").is_err());
    }

    #[test]
    fn fallback_creates_entry_lazily() {
        let cache = LowestRankCache::new(Box::new(NoSource), Arc::new(SystemClock), Duration::from_secs(3600), 2_000_000);
        assert!(cache.entry(AccountCategory::Iron).is_none());
        assert_eq!(cache.get_lowest_rank(AccountCategory::Iron), 2_000_000);
        let entry = cache.entry(AccountCategory::Iron).unwrap();
        assert_eq!(entry.rank, 2_000_000);
        assert_eq!(entry.last_refreshed, None);
        assert_eq!(cache.refresh(), Refresh::Failed);
        assert_eq!(cache.get_lowest_rank(AccountCategory::Iron), 2_000_000);
    }
}
