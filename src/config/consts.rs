// src/config/consts.rs

// Net config
pub const HISCORE_ROOT: &str = "https://secure.runescape.com/m=";
pub const USER_AGENT: &str = "hiscore_locate/0.4";
pub const REQUEST_TIMEOUT_SECS: u64 = 10;

// Stats endpoint, `{table}` and `{name}` are filled per request
pub const STATS_TMPL: &str = "{root}{table}/index_lite.ws?player={name}";

// Ranking pages
pub const OSRS_PAGE_TMPL: &str = "{root}{table}/overall?table=0&page={page}";
pub const OSRS_USER_TMPL: &str = "{root}{table}/overall?table=0&user={name}";
pub const RS3_PAGE_TMPL: &str = "{root}{table}/ranking?category_type=0&table=0&page={page}";
pub const RS3_USER_TMPL: &str = "{root}{table}/ranking?category_type=0&table=0&user={name}";

// Hiscore tables (the `m=` value) per game and category
pub const OSRS_NORMAL: &str = "hiscore_oldschool";
pub const OSRS_IRON: &str = "hiscore_oldschool_ironman";
pub const OSRS_HARDCORE: &str = "hiscore_oldschool_hardcore_ironman";
pub const OSRS_ULTIMATE: &str = "hiscore_oldschool_ultimate";
pub const OSRS_SEASONAL: &str = "hiscore_oldschool_seasonal";
pub const RS3_NORMAL: &str = "hiscore";
pub const RS3_IRON: &str = "hiscore_ironman";
pub const RS3_HARDCORE: &str = "hiscore_hardcore_ironman";

// Listings
pub const PAGE_SIZE: u32 = 25;

// Lowest-rank cache
pub const FALLBACK_LOWEST_RANK: u32 = 2_000_000;
pub const LOWEST_REFRESH_SECS: u64 = 60 * 60;

// Display names
pub const MAX_NAME_LEN: usize = 12;

// Env overrides read by `EngineOptions::from_env`
pub const ENV_GAME: &str = "HISCORE_GAME";
pub const ENV_TIMEOUT: &str = "HISCORE_TIMEOUT_SECS";
pub const ENV_LOWEST_URL: &str = "HISCORE_LOWEST_RANK_URL";
