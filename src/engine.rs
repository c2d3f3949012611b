// src/engine.rs
use std::sync::Arc;

use crate::config::{EngineOptions, consts::MAX_NAME_LEN};
use crate::core::net::{HttpTransport, Transport};
use crate::error::EngineError;
use crate::fetch::{FetchOutcome, StatsFetcher};
use crate::lowest::{Clock, LowestRankCache, LowestRankSource};
use crate::model::{AccountCategory, PlayerListing, ResolutionOutcome};
use crate::progress::ProgressSink;
use crate::rank::{Miss, RankLocator};
use crate::resolver::AccountResolver;

/// Which row of a ranking a request is after.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RankQuery {
    Exact(u32),
    Lowest,
    Random,
}

/// What the rest of the application asks for.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LookupRequest {
    pub player_name: String,
    pub category: AccountCategory,
    pub rank: Option<RankQuery>,
}

impl LookupRequest {
    pub fn by_name(name: impl Into<String>, category: AccountCategory) -> Self {
        Self { player_name: name.into(), category, rank: None }
    }

    pub fn locate(name: impl Into<String>) -> Self {
        Self::by_name(name, AccountCategory::Locate)
    }

    pub fn by_rank(category: AccountCategory, rank: RankQuery) -> Self {
        Self { player_name: s!(), category, rank: Some(rank) }
    }
}

/// Outcome plus the ranking row it came from, for rank-driven requests.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Lookup {
    pub outcome: ResolutionOutcome,
    pub listing: Option<PlayerListing>,
}

/// One fully wired engine: fetcher, locator and lowest-rank cache for a game.
/// Cheap to share across threads behind an `Arc`.
pub struct Engine {
    options: EngineOptions,
    fetcher: StatsFetcher,
    locator: RankLocator,
    lowest: Arc<LowestRankCache>,
}

impl Engine {
    pub fn new(options: EngineOptions) -> Result<Self, EngineError> {
        let transport: Arc<dyn Transport> = Arc::new(HttpTransport::new(&options)?);
        let lowest = Arc::new(LowestRankCache::from_options(&options, Arc::clone(&transport)));
        Ok(Self::assemble(options, transport, lowest))
    }

    /// Wire an engine around a caller-supplied transport, summary source and clock.
    pub fn with_parts(
        options: EngineOptions,
        transport: Arc<dyn Transport>,
        source: Box<dyn LowestRankSource>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let lowest = Arc::new(LowestRankCache::new(
            source,
            clock,
            options.refresh_interval(),
            options.fallback_lowest_rank,
        ));
        Self::assemble(options, transport, lowest)
    }

    fn assemble(options: EngineOptions, transport: Arc<dyn Transport>, lowest: Arc<LowestRankCache>) -> Self {
        let game = options.game;
        Self {
            fetcher: StatsFetcher::new(game, Arc::clone(&transport)),
            locator: RankLocator::for_game(game, transport, Arc::clone(&lowest)),
            lowest,
            options,
        }
    }

    pub fn options(&self) -> &EngineOptions { &self.options }
    pub fn fetcher(&self) -> &StatsFetcher { &self.fetcher }
    pub fn locator(&self) -> &RankLocator { &self.locator }
    pub fn lowest(&self) -> &LowestRankCache { &self.lowest }

    pub fn resolver(&self) -> AccountResolver<'_> {
        AccountResolver::new(&self.fetcher, &self.locator)
    }

    pub fn lookup(&self, req: &LookupRequest, progress: &mut dyn ProgressSink) -> Result<Lookup, EngineError> {
        if let Some(query) = req.rank {
            return self.lookup_rank(req.category, query, progress);
        }

        let name = validate_name(&req.player_name)?;
        if req.category == AccountCategory::Locate {
            let outcome = self.resolver().locate_with(&name, progress)?;
            return Ok(Lookup { outcome, listing: None });
        }

        progress.update(&format!("Fetching {} stats for {name}", req.category.label()));
        let outcome = self.stats_outcome(req.category, &name)?;
        finish_stage(&outcome, progress);
        Ok(Lookup { outcome, listing: None })
    }

    fn lookup_rank(
        &self,
        category: AccountCategory,
        query: RankQuery,
        progress: &mut dyn ProgressSink,
    ) -> Result<Lookup, EngineError> {
        if !category.is_concrete() {
            return Err(EngineError::ConcreteCategoryRequired(category));
        }

        let found = match query {
            RankQuery::Exact(rank) => self.locator.find_rank(category, rank, progress)?,
            RankQuery::Lowest => {
                self.lowest.refresh();
                self.locator.find_lowest(category, progress)?
            }
            RankQuery::Random => {
                self.lowest.refresh();
                self.locator.find_random(category, progress)?
            }
        };

        let listing = match found {
            Ok(listing) => listing,
            // Page read fine; nobody holds that rank.
            Err(Miss::Absent) => {
                return Ok(Lookup { outcome: ResolutionOutcome::missing(s!(), category), listing: None });
            }
            Err(Miss::Unreadable) => {
                return Ok(Lookup { outcome: ResolutionOutcome::unavailable(s!(), category), listing: None });
            }
        };

        progress.update(&format!("Fetching {} stats for {}", category.label(), listing.name));
        let outcome = self.stats_outcome(category, &listing.name)?;
        finish_stage(&outcome, progress);
        Ok(Lookup { outcome, listing: Some(listing) })
    }

    fn stats_outcome(&self, category: AccountCategory, name: &str) -> Result<ResolutionOutcome, EngineError> {
        Ok(match self.fetcher.fetch(category, name)? {
            FetchOutcome::Found(stats) => ResolutionOutcome::found(name, stats),
            FetchOutcome::TimedOut => ResolutionOutcome::unavailable(name, category),
            FetchOutcome::NotFound | FetchOutcome::Rejected(_) => ResolutionOutcome::missing(name, category),
        })
    }
}

fn finish_stage(outcome: &ResolutionOutcome, progress: &mut dyn ProgressSink) {
    if outcome.is_found() {
        progress.complete(None);
    } else if outcome.failed {
        progress.fail(Some("the hiscores did not respond"));
    } else {
        progress.fail(Some("no such player"));
    }
}

/// Trimmed display name within the Jagex length limit.
pub fn validate_name(raw: &str) -> Result<String, EngineError> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(EngineError::EmptyName);
    }
    if name.chars().count() > MAX_NAME_LEN {
        return Err(EngineError::NameTooLong { name: s!(name), max: MAX_NAME_LEN });
    }
    Ok(s!(name))
}
