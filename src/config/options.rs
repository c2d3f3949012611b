// src/config/options.rs
use std::{env, time::Duration};

use serde::Deserialize;

use super::consts::*;
use crate::model::Game;

/// Knobs for one engine instance. Host applications can embed this in their
/// own config file; every field has a default.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct EngineOptions {
    pub game: Game,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    /// JSON summary of previously observed lowest ranks, keyed by category slug.
    pub lowest_rank_url: Option<String>,
    pub refresh_interval_secs: u64,
    pub fallback_lowest_rank: u32,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            game: Game::OldSchool,
            request_timeout_secs: REQUEST_TIMEOUT_SECS,
            user_agent: s!(USER_AGENT),
            lowest_rank_url: None,
            refresh_interval_secs: LOWEST_REFRESH_SECS,
            fallback_lowest_rank: FALLBACK_LOWEST_RANK,
        }
    }
}

impl EngineOptions {
    pub fn new(game: Game) -> Self {
        Self { game, ..Self::default() }
    }

    /// Defaults, then whatever `HISCORE_*` variables are set and parse.
    pub fn from_env() -> Self {
        let mut opts = Self::default();

        if let Ok(v) = env::var(ENV_GAME) {
            match v.parse::<Game>() {
                Ok(game) => opts.game = game,
                Err(e) => log::warn!("Ignoring {ENV_GAME}={v:?}: {e}"),
            }
        }
        if let Ok(v) = env::var(ENV_TIMEOUT) {
            match v.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => opts.request_timeout_secs = secs,
                _ => log::warn!("Ignoring {ENV_TIMEOUT}={v:?}"),
            }
        }
        if let Ok(v) = env::var(ENV_LOWEST_URL) {
            let v = v.trim();
            if !v.is_empty() {
                opts.lowest_rank_url = Some(s!(v));
            }
        }
        opts
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.request_timeout_secs = secs;
        self
    }

    pub fn with_lowest_rank_url(mut self, url: impl Into<String>) -> Self {
        self.lowest_rank_url = Some(url.into());
        self
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_consts() {
        let o = EngineOptions::default();
        assert_eq!(o.game, Game::OldSchool);
        assert_eq!(o.request_timeout(), Duration::from_secs(REQUEST_TIMEOUT_SECS));
        assert_eq!(o.refresh_interval(), Duration::from_secs(3600));
        assert_eq!(o.fallback_lowest_rank, 2_000_000);
        assert!(o.lowest_rank_url.is_none());
    }

    #[test]
    fn zero_timeout_is_clamped() {
        let o = EngineOptions::default().with_timeout(0);
        assert_eq!(o.request_timeout(), Duration::from_secs(1));
    }

    #[test]
    fn deserializes_partial_json() {
        let o: EngineOptions =
            serde_json::from_str(r#"{ "game": "rs3", "request_timeout_secs": 4 }"#).unwrap();
        assert_eq!(o.game, Game::Rs3);
        assert_eq!(o.request_timeout_secs, 4);
        assert_eq!(o.user_agent, USER_AGENT);
    }
}
