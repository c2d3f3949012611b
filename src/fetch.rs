// src/fetch.rs
//! Per-category stats lookups against the `index_lite.ws` endpoints.

use std::sync::Arc;

use crate::config::consts::STATS_TMPL;
use crate::core::net::{self, Transport, TransportError};
use crate::error::EngineError;
use crate::model::{AccountCategory, Game, StatsResponse};

/// How one stats request ended.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FetchOutcome {
    Found(StatsResponse),
    /// 404: the player has no entry in this category.
    NotFound,
    /// 408/504 or no response at all. Says nothing about whether the player exists.
    TimedOut,
    /// Any other non-success status. Consumers treat it like `NotFound`.
    Rejected(u16),
}

impl FetchOutcome {
    pub fn is_transient(&self) -> bool {
        matches!(self, FetchOutcome::TimedOut)
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, FetchOutcome::NotFound | FetchOutcome::Rejected(_))
    }

    pub fn found(self) -> Option<StatsResponse> {
        match self {
            FetchOutcome::Found(s) => Some(s),
            _ => None,
        }
    }
}

pub struct StatsFetcher {
    game: Game,
    transport: Arc<dyn Transport>,
}

impl StatsFetcher {
    pub fn new(game: Game, transport: Arc<dyn Transport>) -> Self {
        Self { game, transport }
    }

    pub fn game(&self) -> Game {
        self.game
    }

    pub fn stats_url(&self, category: AccountCategory, name: &str) -> Result<String, EngineError> {
        let table = self.game.table(category)?;
        Ok(net::fill(STATS_TMPL, &[("table", table), ("name", &net::encode_name(name))]))
    }

    pub fn fetch(&self, category: AccountCategory, name: &str) -> Result<FetchOutcome, EngineError> {
        let url = self.stats_url(category, name)?;

        let resp = match self.transport.get(&url) {
            Ok(r) => r,
            Err(TransportError::TimedOut) => {
                log::warn!("{category} stats for {name:?}: timed out");
                return Ok(FetchOutcome::TimedOut);
            }
            Err(e) => {
                log::warn!("{category} stats for {name:?}: {e}");
                return Ok(FetchOutcome::TimedOut);
            }
        };

        let outcome = match resp.status {
            200..=299 => {
                let fields = tokenize(&resp.body);
                if fields.is_empty() {
                    log::warn!("{category} stats for {name:?}: empty body");
                    FetchOutcome::NotFound
                } else {
                    FetchOutcome::Found(StatsResponse::new(name.trim(), url, category, fields))
                }
            }
            404 => FetchOutcome::NotFound,
            408 | 504 => FetchOutcome::TimedOut,
            other => {
                // Upstream answers some missing players with odd statuses.
                log::warn!("{category} stats for {name:?}: unexpected HTTP {other}, treating as not found");
                FetchOutcome::Rejected(other)
            }
        };
        log::debug!("{category} stats for {name:?}: {}", describe(&outcome));
        Ok(outcome)
    }
}

fn describe(o: &FetchOutcome) -> &'static str {
    match o {
        FetchOutcome::Found(_) => "found",
        FetchOutcome::NotFound => "not found",
        FetchOutcome::TimedOut => "timed out",
        FetchOutcome::Rejected(_) => "rejected",
    }
}

/// Split a lite body on commas and newlines.
pub fn tokenize(body: &str) -> Vec<String> {
    body.split([',', '\n', '\r'])
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::net::HttpResponse;
    use std::sync::Mutex;

    struct OneShot(Mutex<Option<Result<HttpResponse, TransportError>>>);

    impl Transport for OneShot {
        fn get(&self, _url: &str) -> Result<HttpResponse, TransportError> {
            self.0.lock().unwrap().take().unwrap_or(Err(TransportError::Other(s!("drained"))))
        }
    }

    fn fetch_with(reply: Result<HttpResponse, TransportError>) -> FetchOutcome {
        let f = StatsFetcher::new(Game::OldSchool, Arc::new(OneShot(Mutex::new(Some(reply)))));
        f.fetch(AccountCategory::Normal, "Zezima").unwrap()
    }

    fn status(code: u16) -> Result<HttpResponse, TransportError> {
        Ok(HttpResponse { status: code, body: s!() })
    }

    #[test]
    fn tokenize_lines_and_commas() {
        let t = tokenize("1,2,3\r\n4,5,6\n-1,-1\n");
        assert_eq!(t, vec!["1", "2", "3", "4", "5", "6", "-1", "-1"]);
    }

    #[test]
    fn status_classification() {
        assert_eq!(fetch_with(status(404)), FetchOutcome::NotFound);
        assert_eq!(fetch_with(status(408)), FetchOutcome::TimedOut);
        assert_eq!(fetch_with(status(504)), FetchOutcome::TimedOut);
        assert_eq!(fetch_with(status(500)), FetchOutcome::Rejected(500));
        assert_eq!(fetch_with(Err(TransportError::TimedOut)), FetchOutcome::TimedOut);
        assert_eq!(fetch_with(Err(TransportError::Connect(s!("refused")))), FetchOutcome::TimedOut);
        assert!(FetchOutcome::Rejected(503).is_not_found());
    }

    #[test]
    fn success_keeps_url_and_tokens() {
        let out = fetch_with(Ok(HttpResponse::ok("5,99,200000000\n")));
        let stats = out.found().unwrap();
        assert_eq!(stats.fields(), ["5", "99", "200000000"]);
        assert_eq!(
            stats.source_url(),
            "https://secure.runescape.com/m=hiscore_oldschool/index_lite.ws?player=Zezima"
        );
        assert_eq!(stats.category(), AccountCategory::Normal);
    }

    #[test]
    fn blank_success_is_not_found() {
        assert_eq!(fetch_with(Ok(HttpResponse::ok("\n\n"))), FetchOutcome::NotFound);
    }

    #[test]
    fn locate_is_rejected_up_front() {
        let f = StatsFetcher::new(Game::OldSchool, Arc::new(OneShot(Mutex::new(None))));
        assert!(matches!(
            f.fetch(AccountCategory::Locate, "x"),
            Err(EngineError::ConcreteCategoryRequired(_))
        ));
    }
}
