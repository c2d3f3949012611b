// src/resolver.rs
//! Works out which account type a bare player name belongs to.
//!
//! The hiscores only tell us "this name has an entry on table X". Every
//! ironman also appears on the normal table, every hardcore/ultimate also on the
//! ironman table, so the deciding signal is how the overall XP compares across
//! tables: a mode the player left stops gaining XP while the wider table keeps
//! counting.
//!
//! | state          | lookup    | result                                   | next            |
//! |----------------|-----------|------------------------------------------|-----------------|
//! | CheckNormal    | Normal    | missing                                  | not found       |
//! |                |           | found                                    | CheckIron       |
//! | CheckIron      | Iron      | missing                                  | **Normal**      |
//! |                |           | XP(normal) > XP(iron)                    | **Normal**      |
//! |                |           | otherwise                                | CheckHardcore   |
//! | CheckHardcore  | Hardcore  | found, XP(iron) > XP(hc) or died         | **Iron**        |
//! |                |           | found otherwise                          | **Hardcore**    |
//! |                |           | missing                                  | CheckUltimate   |
//! | CheckUltimate  | Ultimate  | found, XP(iron) > XP(uim)                | **Iron**        |
//! |                |           | found otherwise                          | **Ultimate**    |
//! |                |           | missing                                  | **Iron**        |
//!
//! Any timeout, including an unreadable hardcore listing during the death
//! check, ends the run as a transient failure. Steps run strictly in
//! order; each one needs the XP figure from the one before.

use crate::error::EngineError;
use crate::fetch::{FetchOutcome, StatsFetcher};
use crate::model::{AccountCategory, ResolutionOutcome, StatsResponse};
use crate::progress::{NullProgress, ProgressSink};
use crate::rank::{Miss, RankLocator};

#[derive(Debug)]
enum State {
    Start,
    CheckNormal,
    CheckIron { normal: StatsResponse },
    CheckHardcore { iron: StatsResponse },
    CheckUltimate { iron: StatsResponse },
    Resolved(StatsResponse),
    Missing,
    Unavailable,
}

impl State {
    fn is_terminal(&self) -> bool {
        matches!(self, State::Resolved(_) | State::Missing | State::Unavailable)
    }
}

/// Borrowing view over the engine's fetcher and locator.
pub struct AccountResolver<'a> {
    fetcher: &'a StatsFetcher,
    locator: &'a RankLocator,
}

impl<'a> AccountResolver<'a> {
    pub fn new(fetcher: &'a StatsFetcher, locator: &'a RankLocator) -> Self {
        Self { fetcher, locator }
    }

    pub fn locate(&self, name: &str) -> Result<ResolutionOutcome, EngineError> {
        self.locate_with(name, &mut NullProgress)
    }

    pub fn locate_with(
        &self,
        name: &str,
        progress: &mut dyn ProgressSink,
    ) -> Result<ResolutionOutcome, EngineError> {
        let mut state = State::Start;
        while !state.is_terminal() {
            state = self.step(name, state, progress)?;
        }

        let outcome = match state {
            State::Resolved(stats) => ResolutionOutcome::found(name, stats),
            State::Missing => ResolutionOutcome::missing(name, AccountCategory::Locate),
            _ => ResolutionOutcome::unavailable(name, AccountCategory::Locate),
        };
        log::info!(
            "located {name:?}: {} (found={}, failed={})",
            outcome.category,
            outcome.is_found(),
            outcome.failed
        );
        Ok(outcome)
    }

    fn step(&self, name: &str, state: State, progress: &mut dyn ProgressSink) -> Result<State, EngineError> {
        use AccountCategory::*;

        let next = match state {
            State::Start => {
                progress.update(&format!("Working out what kind of account {name} is"));
                State::CheckNormal
            }

            State::CheckNormal => match self.fetcher.fetch(Normal, name)? {
                FetchOutcome::Found(normal) => {
                    progress.complete(Some("player is on the hiscores"));
                    State::CheckIron { normal }
                }
                FetchOutcome::TimedOut => timed_out(progress),
                _ => {
                    progress.fail(Some("player is not on the hiscores"));
                    State::Missing
                }
            },

            State::CheckIron { normal } => match self.fetcher.fetch(Iron, name)? {
                FetchOutcome::Found(iron) => {
                    if normal.overall_experience() > iron.overall_experience() {
                        progress.complete(Some("player is a de-ironed normal account"));
                        State::Resolved(normal)
                    } else {
                        progress.complete(Some("player is an ironman"));
                        State::CheckHardcore { iron }
                    }
                }
                FetchOutcome::TimedOut => timed_out(progress),
                _ => {
                    progress.complete(Some("player is a normal account"));
                    State::Resolved(normal)
                }
            },

            State::CheckHardcore { iron } => match self.fetcher.fetch(Hardcore, name)? {
                FetchOutcome::Found(hardcore) => {
                    if iron.overall_experience() > hardcore.overall_experience() {
                        progress.complete(Some("player is a former hardcore ironman"));
                        State::Resolved(iron)
                    } else {
                        match self.died_as_hardcore(name)? {
                            Some(true) => {
                                progress.complete(Some("player died as a hardcore ironman"));
                                State::Resolved(iron)
                            }
                            Some(false) => {
                                progress.complete(Some("player is a hardcore ironman"));
                                State::Resolved(hardcore)
                            }
                            None => timed_out(progress),
                        }
                    }
                }
                FetchOutcome::TimedOut => timed_out(progress),
                _ => {
                    progress.complete(Some("player is not a hardcore ironman"));
                    State::CheckUltimate { iron }
                }
            },

            State::CheckUltimate { iron } => {
                if !self.fetcher.game().supports(Ultimate) {
                    progress.complete(Some("player is an ironman"));
                    return Ok(State::Resolved(iron));
                }
                match self.fetcher.fetch(Ultimate, name)? {
                    FetchOutcome::Found(ultimate) => {
                        if iron.overall_experience() > ultimate.overall_experience() {
                            progress.complete(Some("player is a former ultimate ironman"));
                            State::Resolved(iron)
                        } else {
                            progress.complete(Some("player is an ultimate ironman"));
                            State::Resolved(ultimate)
                        }
                    }
                    FetchOutcome::TimedOut => timed_out(progress),
                    _ => {
                        progress.complete(Some("player is an ironman"));
                        State::Resolved(iron)
                    }
                }
            }

            terminal => terminal,
        };
        log::debug!("{name:?}: -> {:?}", StateName(&next));
        Ok(next)
    }

    /// Death marker next to the name on the hardcore listing. `None` when the
    /// listing could not be read; a readable page without the name's row
    /// counts as no marker.
    fn died_as_hardcore(&self, name: &str) -> Result<Option<bool>, EngineError> {
        Ok(match self.locator.find_name(AccountCategory::Hardcore, name)? {
            Ok(row) => Some(row.dead),
            Err(Miss::Absent) => {
                log::warn!("{name:?}: no row on the hardcore listing, assuming alive");
                Some(false)
            }
            Err(Miss::Unreadable) => {
                log::warn!("{name:?}: hardcore listing unreadable");
                None
            }
        })
    }
}

fn timed_out(progress: &mut dyn ProgressSink) -> State {
    progress.fail(Some("the hiscores did not respond"));
    State::Unavailable
}

// Keeps debug lines short; the payloads are long.
struct StateName<'s>(&'s State);

impl std::fmt::Debug for StateName<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self.0 {
            State::Start => "Start",
            State::CheckNormal => "CheckNormal",
            State::CheckIron { .. } => "CheckIron",
            State::CheckHardcore { .. } => "CheckHardcore",
            State::CheckUltimate { .. } => "CheckUltimate",
            State::Resolved(_) => "Resolved",
            State::Missing => "Missing",
            State::Unavailable => "Unavailable",
        })
    }
}
