// src/cli.rs
use std::env;

use color_eyre::eyre::{Result, bail, eyre};
use log::LevelFilter;

use crate::{
    config::EngineOptions,
    engine::{Engine, LookupRequest, RankQuery},
    model::{AccountCategory, Game},
    progress::ProgressSink,
};

pub struct Args {
    pub name: Option<String>,
    pub category: AccountCategory,
    pub game: Option<Game>,
    pub rank: Option<RankQuery>,
    pub verbose: bool,
}

impl Default for Args {
    fn default() -> Self {
        Self { name: None, category: AccountCategory::Locate, game: None, rank: None, verbose: false }
    }
}

/// Prints each stage on stderr, numbered.
pub struct StderrProgress {
    stage: usize,
}

impl StderrProgress {
    pub fn new() -> Self {
        Self { stage: 1 }
    }
}

impl ProgressSink for StderrProgress {
    fn update(&mut self, msg: &str) {
        eprintln!("[{}] {msg}…", self.stage);
    }
    fn complete(&mut self, msg: Option<&str>) {
        eprintln!("[{}] ok {}", self.stage, msg.unwrap_or(""));
        self.stage += 1;
    }
    fn fail(&mut self, msg: Option<&str>) {
        eprintln!("[{}] FAILED {}", self.stage, msg.unwrap_or(""));
        self.stage += 1;
    }
}

pub fn run() -> Result<()> {
    let args = parse_args(env::args().skip(1))?;

    let level = if args.verbose { LevelFilter::Debug } else { LevelFilter::Info };
    if let Err(e) = crate::log::init(crate::log::DEFAULT_LOG_FILE, level) {
        eprintln!("Warning: logging disabled: {e}");
    }

    let mut opts = EngineOptions::from_env();
    if let Some(game) = args.game {
        opts.game = game;
    }
    let engine = Engine::new(opts)?;

    let req = match args.rank {
        Some(q) => {
            let category = match args.category {
                AccountCategory::Locate => AccountCategory::Normal,
                c => c,
            };
            LookupRequest::by_rank(category, q)
        }
        None => {
            let name = args.name.ok_or_else(|| eyre!("--name is required unless a rank is given"))?;
            LookupRequest::by_name(name, args.category)
        }
    };

    let found = engine.lookup(&req, &mut StderrProgress::new())?;
    let out = found.outcome;

    if let Some(listing) = &found.listing {
        println!("rank: {} ({})", listing.rank, listing.name);
    }
    if out.failed {
        bail!("the hiscores did not respond, try again later");
    }
    let Some(stats) = out.stats else {
        bail!("no such player: {}", out.name);
    };
    println!("name: {}", stats.player_name());
    println!("type: {}", stats.category().label());
    println!("xp: {}", stats.overall_experience());
    println!("url: {}", stats.source_url());
    println!("{}", stats.fields().join(","));
    Ok(())
}

pub fn parse_args(argv: impl IntoIterator<Item = String>) -> Result<Args> {
    let mut args = Args::default();
    let mut it = argv.into_iter();

    while let Some(a) = it.next() {
        match a.as_str() {
            "-n" | "--name" => args.name = Some(it.next().ok_or_else(|| eyre!("Missing value for --name"))?),
            "-c" | "--category" => {
                let v = it.next().ok_or_else(|| eyre!("Missing value for --category"))?;
                args.category = v.parse()?;
            }
            "-g" | "--game" => {
                let v = it.next().ok_or_else(|| eyre!("Missing value for --game"))?;
                args.game = Some(v.parse()?);
            }
            "-r" | "--rank" => {
                let v: u32 = it.next().ok_or_else(|| eyre!("Missing value for --rank"))?.parse()?;
                if v == 0 { bail!("Rank must be positive"); }
                args.rank = Some(RankQuery::Exact(v));
            }
            "--lowest" => args.rank = Some(RankQuery::Lowest),
            "--random" => args.rank = Some(RankQuery::Random),
            "-v" | "--verbose" => args.verbose = true,
            "-h" | "--help" => {
                eprintln!("Usage: cli --name <player> [--category <normal|iron|hcim|uim|league>] [--game osrs|rs3]");
                eprintln!("       cli [--category <c>] (--rank <n> | --lowest | --random)");
                std::process::exit(0);
            }
            other => bail!("Unknown arg: {other}"),
        }
    }
    Ok(args)
}
