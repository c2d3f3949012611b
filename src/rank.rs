// src/rank.rs
//! Rank → player lookups on the paginated ranking listings.

use std::sync::Arc;

use rand::Rng;

use crate::core::net::{self, Transport};
use crate::core::sanitize::same_name;
use crate::error::EngineError;
use crate::lowest::LowestRankCache;
use crate::model::{AccountCategory, Game, PlayerListing};
use crate::progress::{NullProgress, ProgressSink};
use crate::scrape::PageScraper;

/// 1-indexed page holding `rank`, and the 1-indexed row on that page.
/// A rank on an exact page boundary is the last row of its page.
pub fn page_position(rank: u32, page_size: u32) -> Option<(u32, u32)> {
    if rank == 0 || page_size == 0 {
        return None;
    }
    let page = (rank - 1) / page_size + 1;
    let pos = match rank % page_size {
        0 => page_size,
        r => r,
    };
    Some((page, pos))
}

/// Why a listing lookup came back empty.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Miss {
    /// The page could not be fetched or its layout was not recognised.
    Unreadable,
    /// The page was read and the player or rank is not on it.
    Absent,
}

pub struct RankLocator {
    game: Game,
    scraper: PageScraper,
    lowest: Arc<LowestRankCache>,
}

impl RankLocator {
    pub fn new(game: Game, scraper: PageScraper, lowest: Arc<LowestRankCache>) -> Self {
        Self { game, scraper, lowest }
    }

    pub fn for_game(game: Game, transport: Arc<dyn Transport>, lowest: Arc<LowestRankCache>) -> Self {
        Self::new(game, PageScraper::for_game(game, transport), lowest)
    }

    pub fn page_size(&self) -> u32 {
        self.scraper.page_size()
    }

    pub fn lowest(&self) -> &LowestRankCache {
        &self.lowest
    }

    pub fn ranking_url(&self, category: AccountCategory, page: u32) -> Result<String, EngineError> {
        let table = self.game.table(category)?;
        Ok(net::fill(self.game.page_template(), &[("table", table), ("page", &page.to_string())]))
    }

    pub fn name_url(&self, category: AccountCategory, name: &str) -> Result<String, EngineError> {
        let table = self.game.table(category)?;
        Ok(net::fill(self.game.user_template(), &[("table", table), ("name", &net::encode_name(name))]))
    }

    pub fn by_rank(&self, category: AccountCategory, rank: u32) -> Result<Option<PlayerListing>, EngineError> {
        self.by_rank_with(category, rank, &mut NullProgress)
    }

    pub fn by_rank_with(
        &self,
        category: AccountCategory,
        rank: u32,
        progress: &mut dyn ProgressSink,
    ) -> Result<Option<PlayerListing>, EngineError> {
        Ok(self.find_rank(category, rank, progress)?.ok())
    }

    /// Like [`by_rank_with`](Self::by_rank_with), keeping the reason for a miss.
    pub fn find_rank(
        &self,
        category: AccountCategory,
        rank: u32,
        progress: &mut dyn ProgressSink,
    ) -> Result<Result<PlayerListing, Miss>, EngineError> {
        let Some((page, pos)) = page_position(rank, self.page_size()) else {
            return Err(EngineError::InvalidRank);
        };
        let url = self.ranking_url(category, page)?;

        progress.update(&format!("Looking up rank {rank} on the {} hiscores", category.label()));
        let found = self.pick(&url, rank, pos);
        match &found {
            Ok(p) => progress.complete(Some(&format!("rank {rank} is {}", p.name))),
            Err(Miss::Absent) => progress.fail(Some(&format!("no {} at rank {rank}", category.label()))),
            Err(Miss::Unreadable) => progress.fail(Some("could not read the ranking page")),
        }
        Ok(found)
    }

    fn pick(&self, url: &str, rank: u32, pos: u32) -> Result<PlayerListing, Miss> {
        let entries = self.scraper.fetch_listing_page(url).ok_or(Miss::Unreadable)?;
        let Some(candidate) = entries.get(pos as usize - 1) else {
            log::info!("rank {rank}: page has only {} rows", entries.len());
            return Err(Miss::Absent);
        };
        if candidate.rank != rank {
            // Asking past the end of the ranking silently serves page 1.
            log::info!("rank {rank}: row {pos} holds rank {}, discarding", candidate.rank);
            return Err(Miss::Absent);
        }
        Ok(candidate.clone())
    }

    pub fn by_name(&self, category: AccountCategory, name: &str) -> Result<Option<PlayerListing>, EngineError> {
        Ok(self.find_name(category, name)?.ok())
    }

    /// Row for `name` on its name-targeted listing page.
    pub fn find_name(&self, category: AccountCategory, name: &str) -> Result<Result<PlayerListing, Miss>, EngineError> {
        let url = self.name_url(category, name)?;
        let Some(entries) = self.scraper.fetch_listing_page(&url) else {
            return Ok(Err(Miss::Unreadable));
        };
        Ok(entries.into_iter().find(|e| same_name(&e.name, name)).ok_or(Miss::Absent))
    }

    /// Last player on the category's ranking, based on the cached lowest rank.
    pub fn lowest_ranked(
        &self,
        category: AccountCategory,
        progress: &mut dyn ProgressSink,
    ) -> Result<Option<PlayerListing>, EngineError> {
        Ok(self.find_lowest(category, progress)?.ok())
    }

    pub fn find_lowest(
        &self,
        category: AccountCategory,
        progress: &mut dyn ProgressSink,
    ) -> Result<Result<PlayerListing, Miss>, EngineError> {
        self.game.table(category)?;
        let rank = self.lowest.get_lowest_rank(category);
        let Some((page, _)) = page_position(rank, self.page_size()) else {
            return Err(EngineError::InvalidRank);
        };
        let url = self.ranking_url(category, page)?;

        progress.update(&format!("Looking for the lowest ranked {}", category.label()));
        let found = self.pick_lowest(&url, rank, page);
        match &found {
            Ok(p) => progress.complete(Some(&format!("lowest ranked is {} at rank {}", p.name, p.rank))),
            Err(Miss::Absent) => progress.fail(Some("the ranking ends before the cached lowest rank")),
            Err(Miss::Unreadable) => progress.fail(Some("could not read the end of the ranking")),
        }
        Ok(found)
    }

    fn pick_lowest(&self, url: &str, rank: u32, page: u32) -> Result<PlayerListing, Miss> {
        let entries = self.scraper.fetch_listing_page(url).ok_or(Miss::Unreadable)?;
        if let Some(exact) = entries.iter().find(|e| e.rank == rank) {
            return Ok(exact.clone());
        }
        // Population shrank since the cache was filled; take the page's tail
        // as long as it really is this page and not the page-1 redirect.
        let size = self.page_size();
        let first_on_page = (page - 1) * size + 1;
        let last = entries.last().ok_or(Miss::Unreadable)?;
        if (first_on_page..=page * size).contains(&last.rank) {
            Ok(last.clone())
        } else {
            log::info!("lowest rank {rank}: page {page} not served (last row rank {})", last.rank);
            Err(Miss::Absent)
        }
    }

    /// Any ranked player, uniformly over `1..=lowest`.
    pub fn random_ranked(
        &self,
        category: AccountCategory,
        progress: &mut dyn ProgressSink,
    ) -> Result<Option<PlayerListing>, EngineError> {
        Ok(self.find_random(category, progress)?.ok())
    }

    pub fn find_random(
        &self,
        category: AccountCategory,
        progress: &mut dyn ProgressSink,
    ) -> Result<Result<PlayerListing, Miss>, EngineError> {
        self.game.table(category)?;
        let lowest = self.lowest.get_lowest_rank(category).max(1);
        let rank = rand::rng().random_range(1..=lowest);
        log::debug!("random {category} rank: {rank} of {lowest}");
        self.find_rank(category, rank, progress)
    }
}
