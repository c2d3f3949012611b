// src/lib.rs

#[macro_use]
pub mod macros;

pub mod config;
pub mod core;
pub mod error;
pub mod log;
pub mod model;
pub mod progress;
pub mod specs;

pub mod engine;
pub mod fetch;
pub mod lowest;
pub mod rank;
pub mod resolver;
pub mod scrape;

#[cfg(feature = "cli")]
pub mod cli;

pub use config::EngineOptions;
pub use engine::{Engine, Lookup, LookupRequest, RankQuery};
pub use error::EngineError;
pub use fetch::{FetchOutcome, StatsFetcher};
pub use lowest::{LowestRankCache, Refresh};
pub use model::{AccountCategory, Game, PlayerListing, RankedMetric, ResolutionOutcome, StatsResponse};
pub use progress::{NullProgress, ProgressSink};
pub use rank::RankLocator;
pub use resolver::AccountResolver;
pub use scrape::PageScraper;
