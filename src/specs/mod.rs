// src/specs/mod.rs
//! # Ranking-page “specs”
//!
//! Each spec knows how one game's hiscores listing is laid out and how to pull
//! `(name, rank)` rows out of it. The selectors here are a contract with the
//! upstream site; when the markup changes, only the matching spec changes and
//! the fixtures under `tests/fixtures/` get re-captured.
//!
//! ## Conventions & invariants
//! - Ranks are comma-grouped in markup; separators are stripped before parsing.
//! - A page whose rows cannot all be read is **not a page**: extraction returns
//!   `None` rather than a partial list, so callers never mistake a markup change
//!   for "fewer players".
//! - An empty table is also `None`. "Zero players" is not an answer a ranking
//!   page can give.
//! - No networking here. `scrape::PageScraper` fetches; specs only read.

use scraper::{ElementRef, Html};

use crate::core::sanitize::normalize_ws;
use crate::model::{Game, PlayerListing};

pub mod oldschool;
pub mod rs3;

/// Pluggable extraction rules for one listing layout.
pub trait ListingStrategy: Send + Sync {
    /// Rows per listing page.
    fn page_size(&self) -> u32;

    /// Ordered rows of the page, or `None` if the layout was not recognised.
    fn extract(&self, doc: &Html) -> Option<Vec<PlayerListing>>;
}

pub fn for_game(game: Game) -> Box<dyn ListingStrategy> {
    match game {
        Game::OldSchool => Box::new(oldschool::OldSchoolListing),
        Game::Rs3 => Box::new(rs3::Rs3Listing),
    }
}

/// Visible text of an element with whitespace collapsed.
pub(crate) fn text_of(el: ElementRef<'_>) -> String {
    normalize_ws(&el.text().collect::<String>())
}

/// True if the element contains an image or class that marks a dead hardcore.
pub(crate) fn has_death_marker(el: ElementRef<'_>) -> bool {
    let marks = |v: &str| {
        let v = v.to_ascii_lowercase();
        v.contains("death") || v.contains("dead") || v.contains("skull")
    };
    el.descendants().filter_map(ElementRef::wrap).any(|d| {
        let e = d.value();
        e.attr("class").is_some_and(marks)
            || (e.name() == "img"
                && (e.attr("src").is_some_and(marks) || e.attr("title").is_some_and(marks)))
    })
}
