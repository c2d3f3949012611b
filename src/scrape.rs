// src/scrape.rs
use std::sync::Arc;

use scraper::Html;

use crate::core::net::Transport;
use crate::model::{Game, PlayerListing};
use crate::specs::{self, ListingStrategy};

/// Fetches ranking pages and hands them to the game's extraction spec.
///
/// Every failure mode (network, status, markup) collapses to `None`: callers
/// read that as "try again later", never as an empty ranking.
pub struct PageScraper {
    transport: Arc<dyn Transport>,
    strategy: Box<dyn ListingStrategy>,
}

impl PageScraper {
    pub fn new(transport: Arc<dyn Transport>, strategy: Box<dyn ListingStrategy>) -> Self {
        Self { transport, strategy }
    }

    pub fn for_game(game: Game, transport: Arc<dyn Transport>) -> Self {
        Self::new(transport, specs::for_game(game))
    }

    pub fn page_size(&self) -> u32 {
        self.strategy.page_size()
    }

    pub fn fetch_listing_page(&self, url: &str) -> Option<Vec<PlayerListing>> {
        let resp = match self.transport.get(url) {
            Ok(r) => r,
            Err(e) => {
                log::warn!("listing {url}: {e}");
                return None;
            }
        };
        if !resp.is_success() {
            log::warn!("listing {url}: HTTP {}", resp.status);
            return None;
        }

        let rows = self.parse(&resp.body);
        match &rows {
            Some(r) => log::debug!("listing {url}: {} rows", r.len()),
            None => log::warn!("listing {url}: layout not recognised"),
        }
        rows
    }

    /// Extraction only, for pages already in hand.
    pub fn parse(&self, html: &str) -> Option<Vec<PlayerListing>> {
        let doc = Html::parse_document(html);
        self.strategy.extract(&doc)
    }
}
