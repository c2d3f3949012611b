// src/model.rs
//! Value types shared by every stage of the engine.

use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::config::consts::*;
use crate::error::EngineError;

/// Which hiscores family a lookup targets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Game {
    #[serde(alias = "osrs")]
    OldSchool,
    #[serde(alias = "rs")]
    Rs3,
}

impl Game {
    /// The `m=` table for a category, if this game publishes one.
    pub fn table(self, category: AccountCategory) -> Result<&'static str, EngineError> {
        use AccountCategory::*;
        let table = match (self, category) {
            (_, Locate) => return Err(EngineError::ConcreteCategoryRequired(category)),
            (Game::OldSchool, Normal) => Some(OSRS_NORMAL),
            (Game::OldSchool, Iron) => Some(OSRS_IRON),
            (Game::OldSchool, Hardcore) => Some(OSRS_HARDCORE),
            (Game::OldSchool, Ultimate) => Some(OSRS_ULTIMATE),
            (Game::OldSchool, SeasonalLeague) => Some(OSRS_SEASONAL),
            (Game::Rs3, Normal) => Some(RS3_NORMAL),
            (Game::Rs3, Iron) => Some(RS3_IRON),
            (Game::Rs3, Hardcore) => Some(RS3_HARDCORE),
            (Game::Rs3, Ultimate | SeasonalLeague) => None,
        };
        table.ok_or(EngineError::UnsupportedCategory { game: self, category })
    }

    pub fn supports(self, category: AccountCategory) -> bool {
        self.table(category).is_ok()
    }

    pub fn categories(self) -> impl Iterator<Item = AccountCategory> {
        AccountCategory::CONCRETE.into_iter().filter(move |c| self.supports(*c))
    }

    pub(crate) fn page_template(self) -> &'static str {
        match self {
            Game::OldSchool => OSRS_PAGE_TMPL,
            Game::Rs3 => RS3_PAGE_TMPL,
        }
    }

    pub(crate) fn user_template(self) -> &'static str {
        match self {
            Game::OldSchool => OSRS_USER_TMPL,
            Game::Rs3 => RS3_USER_TMPL,
        }
    }
}

impl fmt::Display for Game {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Game::OldSchool => "Old School",
            Game::Rs3 => "RuneScape 3",
        })
    }
}

impl FromStr for Game {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "osrs" | "oldschool" | "old school" | "07" => Ok(Game::OldSchool),
            "rs3" | "rs" | "runescape" => Ok(Game::Rs3),
            _ => Err(EngineError::Unknown { kind: "game", value: s.to_string() }),
        }
    }
}

/// Account mode. `Locate` only ever appears in requests.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AccountCategory {
    Normal,
    Iron,
    Hardcore,
    Ultimate,
    SeasonalLeague,
    Locate,
}

impl AccountCategory {
    pub const CONCRETE: [AccountCategory; 5] = [
        AccountCategory::Normal,
        AccountCategory::Iron,
        AccountCategory::Hardcore,
        AccountCategory::Ultimate,
        AccountCategory::SeasonalLeague,
    ];

    pub fn is_concrete(self) -> bool {
        self != AccountCategory::Locate
    }

    /// Stable key used in summaries and logs.
    pub fn slug(self) -> &'static str {
        match self {
            AccountCategory::Normal => "normal",
            AccountCategory::Iron => "iron",
            AccountCategory::Hardcore => "hardcore",
            AccountCategory::Ultimate => "ultimate",
            AccountCategory::SeasonalLeague => "seasonal",
            AccountCategory::Locate => "locate",
        }
    }

    /// What a person would call an account of this kind.
    pub fn label(self) -> &'static str {
        match self {
            AccountCategory::Normal => "normal account",
            AccountCategory::Iron => "ironman",
            AccountCategory::Hardcore => "hardcore ironman",
            AccountCategory::Ultimate => "ultimate ironman",
            AccountCategory::SeasonalLeague => "seasonal league account",
            AccountCategory::Locate => "account of unknown type",
        }
    }
}

impl fmt::Display for AccountCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for AccountCategory {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .trim()
            .chars()
            .filter(|c| !matches!(c, ' ' | '_' | '-'))
            .collect::<String>()
            .to_ascii_lowercase();
        match key.as_str() {
            "normal" | "main" | "regular" => Ok(AccountCategory::Normal),
            "iron" | "ironman" | "im" => Ok(AccountCategory::Iron),
            "hardcore" | "hardcoreironman" | "hcim" | "hc" => Ok(AccountCategory::Hardcore),
            "ultimate" | "ultimateironman" | "uim" => Ok(AccountCategory::Ultimate),
            "seasonal" | "league" | "leagues" | "seasonalleague" => Ok(AccountCategory::SeasonalLeague),
            "locate" | "auto" | "find" => Ok(AccountCategory::Locate),
            _ => Err(EngineError::Unknown { kind: "account category", value: s.to_string() }),
        }
    }
}

/// A hiscores number that may carry the upstream "not ranked" sentinel.
/// `Unranked` sorts below every real value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RankedMetric {
    Unranked,
    Value(i64),
}

impl RankedMetric {
    /// `None` if the token is not a number at all.
    pub fn parse(token: &str) -> Option<Self> {
        let v: i64 = token.trim().parse().ok()?;
        Some(if v < 0 { RankedMetric::Unranked } else { RankedMetric::Value(v) })
    }

    pub fn value(self) -> Option<i64> {
        match self {
            RankedMetric::Unranked => None,
            RankedMetric::Value(v) => Some(v),
        }
    }

    pub fn is_ranked(self) -> bool {
        matches!(self, RankedMetric::Value(_))
    }
}

impl fmt::Display for RankedMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RankedMetric::Unranked => f.write_str("unranked"),
            RankedMetric::Value(v) => write!(f, "{v}"),
        }
    }
}

/// Raw hiscores payload for one player in one category.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StatsResponse {
    player_name: String,
    source_url: String,
    category: AccountCategory,
    fields: Vec<String>,
}

impl StatsResponse {
    pub(crate) fn new(
        player_name: impl Into<String>,
        source_url: impl Into<String>,
        category: AccountCategory,
        fields: Vec<String>,
    ) -> Self {
        debug_assert!(category.is_concrete());
        Self {
            player_name: player_name.into(),
            source_url: source_url.into(),
            category,
            fields,
        }
    }

    pub fn player_name(&self) -> &str { &self.player_name }
    pub fn source_url(&self) -> &str { &self.source_url }
    pub fn category(&self) -> AccountCategory { self.category }
    pub fn fields(&self) -> &[String] { &self.fields }

    /// Overall rank, first token of the leading triple.
    pub fn overall_rank(&self) -> RankedMetric {
        self.metric_at(0)
    }

    /// Cumulative experience, third token of the leading triple.
    pub fn overall_experience(&self) -> RankedMetric {
        self.metric_at(2)
    }

    fn metric_at(&self, idx: usize) -> RankedMetric {
        self.fields
            .get(idx)
            .and_then(|t| RankedMetric::parse(t))
            .unwrap_or(RankedMetric::Unranked)
    }
}

/// One row of a ranking page.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlayerListing {
    pub name: String,
    pub rank: u32,
    /// Death marker shown next to the name (hardcore listings).
    pub dead: bool,
}

impl PlayerListing {
    pub fn new(name: impl Into<String>, rank: u32) -> Self {
        Self { name: name.into(), rank, dead: false }
    }
}

/// Final answer for a player lookup.
///
/// `failed` means the hiscores did not answer. A player that simply does not
/// exist has `stats == None` with `failed == false`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolutionOutcome {
    pub name: String,
    pub category: AccountCategory,
    pub stats: Option<StatsResponse>,
    pub failed: bool,
}

impl ResolutionOutcome {
    pub fn found(name: impl Into<String>, stats: StatsResponse) -> Self {
        Self { name: name.into(), category: stats.category(), stats: Some(stats), failed: false }
    }

    pub fn missing(name: impl Into<String>, category: AccountCategory) -> Self {
        Self { name: name.into(), category, stats: None, failed: false }
    }

    pub fn unavailable(name: impl Into<String>, category: AccountCategory) -> Self {
        Self { name: name.into(), category, stats: None, failed: true }
    }

    pub fn is_found(&self) -> bool {
        self.stats.is_some()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LowestRankEntry {
    pub category: AccountCategory,
    pub rank: u32,
    /// `None` while the rank is still the fallback ceiling.
    pub last_refreshed: Option<DateTime<Utc>>,
}
