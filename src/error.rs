// src/error.rs
use thiserror::Error;

use crate::model::{AccountCategory, Game};

/// Misuse of the engine. Expected upstream conditions (missing players,
/// timeouts, unreadable pages) are ordinary return values, never this type.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("a concrete account category is required here, got {0}")]
    ConcreteCategoryRequired(AccountCategory),

    #[error("{game} has no {category} hiscores")]
    UnsupportedCategory { game: Game, category: AccountCategory },

    #[error("player name is empty")]
    EmptyName,

    #[error("player name {name:?} is longer than {max} characters")]
    NameTooLong { name: String, max: usize },

    #[error("rank must be positive")]
    InvalidRank,

    #[error("unknown {kind}: {value:?}")]
    Unknown { kind: &'static str, value: String },

    #[error("could not build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}
