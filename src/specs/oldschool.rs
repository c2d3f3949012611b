// src/specs/oldschool.rs
//! Old School overall listing (`/overall?table=0&page=N`).
//!
//! Layout, one row per player, 25 rows per page:
//! ```text
//! <tr class="personal-hiscores__row">
//!   <td class="right">1,204</td>
//!   <td class="left"><a href="hiscorepersonal?user1=...">Name</a> [<img ... death ...>]</td>
//!   <td class="right">2,277</td>          (level)
//!   <td class="right">4,600,000,000</td>  (xp)
//! </tr>
//! ```

use std::sync::LazyLock;

use scraper::{Html, Selector};

use super::{ListingStrategy, has_death_marker, text_of};
use crate::config::consts::PAGE_SIZE;
use crate::core::sanitize::parse_grouped_u32;
use crate::model::PlayerListing;

static ROW: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("tr.personal-hiscores__row").expect("static selector"));
static CELL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("td").expect("static selector"));
static LINK: LazyLock<Selector> = LazyLock::new(|| Selector::parse("a").expect("static selector"));

pub struct OldSchoolListing;

impl ListingStrategy for OldSchoolListing {
    fn page_size(&self) -> u32 {
        PAGE_SIZE
    }

    fn extract(&self, doc: &Html) -> Option<Vec<PlayerListing>> {
        let mut out = Vec::with_capacity(PAGE_SIZE as usize);

        for row in doc.select(&ROW) {
            let cells: Vec<_> = row.select(&CELL).collect();
            if cells.is_empty() {
                continue; // header row carries the same class, <th> only
            }
            if cells.len() < 2 {
                log::warn!("osrs listing: row with {} cells", cells.len());
                return None;
            }

            let rank = parse_grouped_u32(&text_of(cells[0])).filter(|r| *r > 0)?;
            let name = cells[1]
                .select(&LINK)
                .map(text_of)
                .find(|n| !n.is_empty())
                .unwrap_or_else(|| text_of(cells[1]));
            if name.is_empty() {
                return None;
            }

            out.push(PlayerListing { name, rank, dead: has_death_marker(cells[1]) });
        }

        if out.is_empty() { None } else { Some(out) }
    }
}
